use chrono::NaiveDate;
use tracing::info;

use crate::app::state::{Changeset, Tracker, ensure_non_negative, ensure_present};
use crate::db::Store;
use crate::error::{TrackerError, TrackerResult};
use crate::types::{EquipmentId, ServiceRecord};

/// The equipment-side effect of logging a service.
#[derive(Clone, Debug, PartialEq)]
pub struct EquipmentServiceUpdate {
    pub equipment_id: EquipmentId,
    pub last_service_hours: f64,
    pub last_service_date: NaiveDate,
}

/// Logging a service is two writes (the record and its machine) that either
/// both land or neither does.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordService {
    pub service_record: ServiceRecord,
    pub equipment_update: EquipmentServiceUpdate,
}

impl RecordService {
    pub fn new(service_record: ServiceRecord) -> Self {
        let equipment_update = EquipmentServiceUpdate {
            equipment_id: service_record.equipment_id.clone(),
            last_service_hours: service_record.hours_at_service,
            last_service_date: service_record.date,
        };
        Self {
            service_record,
            equipment_update,
        }
    }
}

impl<S: Store> Tracker<S> {
    pub fn add_service_record(&mut self, record: ServiceRecord) -> TrackerResult<()> {
        self.record_service(RecordService::new(record))
    }

    /// Appends the record, then moves the machine's last-service marker.
    /// Records are written first; a failed equipment write restores them.
    pub fn record_service(&mut self, command: RecordService) -> TrackerResult<()> {
        let RecordService {
            service_record: record,
            equipment_update: update,
        } = command;

        ensure_present(&record.id, "service record id")?;
        ensure_present(&record.service_type, "service type")?;
        ensure_non_negative(record.hours_at_service, "hours at service")?;
        ensure_non_negative(record.cost, "cost")?;
        ensure_non_negative(update.last_service_hours, "last service hours")?;
        if update.equipment_id != record.equipment_id {
            return Err(TrackerError::invalid(
                "service record and equipment update name different machines",
            ));
        }
        if self.data.service_records.iter().any(|r| r.id == record.id) {
            return Err(TrackerError::invalid(format!(
                "service record '{}' already exists",
                record.id
            )));
        }
        let index = self.equipment_index(&update.equipment_id)?;
        let current_hours = self.data.equipment[index].current_hours;
        if update.last_service_hours > current_hours {
            return Err(TrackerError::invalid(format!(
                "service at {} h is past the machine's {} h counter",
                update.last_service_hours, current_hours
            )));
        }

        let mut records = self.data.service_records.clone();
        records.push(record);
        let mut equipment = self.data.equipment.clone();
        equipment[index].last_service_hours = update.last_service_hours;
        equipment[index].last_service_date = update.last_service_date;

        self.commit(
            "record_service",
            Changeset::new().service_records(records).equipment(equipment),
        )?;
        info!(
            equipment_id = %update.equipment_id,
            hours = update.last_service_hours,
            "service recorded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::app::test_support::*;
    use crate::db::Collection;
    use crate::error::TrackerError;
    use crate::types::EquipmentStatus;

    #[test]
    fn service_resets_the_interval() {
        let mut tracker = tracker();
        let eq = &tracker.collections().equipment[0];
        assert_eq!(tracker.hours_until_service(eq), 50.0);
        assert_eq!(tracker.equipment_status(eq), EquipmentStatus::Warning);

        tracker.add_service_record(service("s1", "eq1", 500.0)).unwrap();

        let eq = &tracker.collections().equipment[0];
        assert_eq!(eq.last_service_hours, 500.0);
        assert_eq!(eq.last_service_date, today());
        assert_eq!(tracker.hours_until_service(eq), 100.0);
        assert_eq!(tracker.equipment_status(eq), EquipmentStatus::Good);
        assert!(tracker.alerts().is_empty());
    }

    #[test]
    fn record_round_trips_through_the_store() {
        let mut tracker = tracker();
        let mut record = service("s1", "eq1", 500.0);
        record.photos = Some(vec!["file:///photos/1.jpg".into()]);
        record.notes = "Comma, \"quote\" and\nnewline".into();
        tracker.add_service_record(record.clone()).unwrap();

        let stored = reload(&tracker);
        assert_eq!(stored.service_records, vec![record]);
        assert_eq!(stored.equipment[0].last_service_hours, 500.0);
        assert_eq!(
            tracker.store().saved_keys(),
            vec![
                Collection::ServiceRecords.key().to_string(),
                Collection::Equipment.key().to_string()
            ]
        );
    }

    #[test]
    fn failed_equipment_write_rolls_back_the_record() {
        let mut tracker = tracker();
        tracker.store().fail_saves_to(Collection::Equipment);

        let result = tracker.add_service_record(service("s1", "eq1", 500.0));
        assert!(matches!(result, Err(TrackerError::Persistence(_))));

        assert!(tracker.collections().service_records.is_empty());
        assert_eq!(tracker.collections().equipment[0].last_service_hours, 450.0);
        let stored = reload(&tracker);
        assert!(stored.service_records.is_empty());
        assert_eq!(stored.equipment[0].last_service_hours, 450.0);

        tracker.store().heal();
        tracker.add_service_record(service("s1", "eq1", 500.0)).unwrap();
        assert_eq!(reload(&tracker).service_records.len(), 1);
    }

    #[test]
    fn failed_record_write_touches_nothing() {
        let mut tracker = tracker();
        tracker.store().fail_saves_to(Collection::ServiceRecords);
        assert!(tracker.add_service_record(service("s1", "eq1", 500.0)).is_err());
        assert!(tracker.store().saved_keys().is_empty());
        assert_eq!(tracker.collections().equipment[0].last_service_hours, 450.0);
    }

    #[test]
    fn invalid_records_are_refused() {
        let mut tracker = tracker();
        let mut negative = service("s1", "eq1", 500.0);
        negative.cost = -5.0;
        assert!(matches!(
            tracker.add_service_record(negative),
            Err(TrackerError::Validation(_))
        ));

        let mut untyped = service("s1", "eq1", 500.0);
        untyped.service_type = "  ".into();
        assert!(matches!(
            tracker.add_service_record(untyped),
            Err(TrackerError::Validation(_))
        ));

        assert!(matches!(
            tracker.add_service_record(service("s1", "ghost", 500.0)),
            Err(TrackerError::NotFound { .. })
        ));

        tracker.add_service_record(service("s1", "eq1", 500.0)).unwrap();
        assert!(matches!(
            tracker.add_service_record(service("s1", "eq1", 510.0)),
            Err(TrackerError::Validation(_))
        ));
    }

    #[test]
    fn service_beyond_the_hour_counter_is_refused() {
        let mut tracker = tracker();
        assert!(matches!(
            tracker.add_service_record(service("s9", "eq1", 900.0)),
            Err(TrackerError::Validation(_))
        ));
        assert!(tracker.store().saved_keys().is_empty());
        let eq = &tracker.collections().equipment[0];
        assert_eq!(eq.last_service_hours, 450.0);
        assert_eq!(tracker.hours_until_service(eq), 50.0);
    }

    #[test]
    fn mismatched_command_is_refused() {
        let mut tracker = tracker();
        let mut command = super::RecordService::new(service("s1", "eq1", 500.0));
        command.equipment_update.equipment_id = "eq2".into();
        assert!(matches!(
            tracker.record_service(command),
            Err(TrackerError::Validation(_))
        ));
    }
}
