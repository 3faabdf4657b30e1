use std::collections::HashMap;

use crate::app::state::{Changeset, Tracker, ensure_non_negative, ensure_present};
use crate::db::Store;
use crate::error::{TrackerError, TrackerResult};
use crate::types::DailyReport;

impl<S: Store> Tracker<S> {
    /// Files a shift report and adds each reported shift's hours to the
    /// machine's counter. Report and counters are written together.
    pub fn add_daily_report(&mut self, report: DailyReport) -> TrackerResult<()> {
        ensure_present(&report.id, "report id")?;
        if report.equipment_data.is_empty() {
            return Err(TrackerError::invalid(
                "a daily report needs hours for at least one machine",
            ));
        }
        if self.data.daily_reports.iter().any(|r| r.id == report.id) {
            return Err(TrackerError::invalid(format!(
                "daily report '{}' already exists",
                report.id
            )));
        }

        let mut worked: HashMap<usize, f64> = HashMap::new();
        for entry in &report.equipment_data {
            ensure_non_negative(entry.hours, "shift hours")?;
            if let Some(fuel) = entry.fuel_added {
                ensure_non_negative(fuel, "fuel added")?;
            }
            let index = self.equipment_index(&entry.equipment_id)?;
            *worked.entry(index).or_insert(0.0) += entry.hours;
        }

        let mut equipment = self.data.equipment.clone();
        for (index, hours) in worked {
            equipment[index].current_hours += hours;
        }
        let mut reports = self.data.daily_reports.clone();
        reports.push(report);

        self.commit(
            "add_daily_report",
            Changeset::new().daily_reports(reports).equipment(equipment),
        )
    }
}
