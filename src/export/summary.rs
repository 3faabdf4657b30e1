//! Per-month roll-up of hours, fuel and service spend.
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::types::{Collections, EquipmentId};

/// A calendar month, written `YYYY-MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("'{s}' is not a month, expected YYYY-MM");
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Month::new(year, month).ok_or_else(invalid)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EquipmentBreakdown {
    pub equipment_id: EquipmentId,
    pub display_name: String,
    /// The machine's hour counter, not hours worked within the month.
    pub total_hours: f64,
    pub total_fuel: f64,
    pub fuel_cost: f64,
    pub service_count: usize,
    pub service_cost: f64,
}

impl EquipmentBreakdown {
    pub fn total_cost(&self) -> f64 {
        self.fuel_cost + self.service_cost
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthlySummary {
    pub month: Month,
    pub equipment: Vec<EquipmentBreakdown>,
    pub total_fuel: f64,
    pub total_fuel_cost: f64,
    pub total_service_cost: f64,
    pub service_count: usize,
    pub total_hours: f64,
    /// Litres per hour over all machines; zero when no hours are on record.
    pub average_fuel_consumption: f64,
    pub cost_per_hour: f64,
}

impl MonthlySummary {
    pub fn total_cost(&self) -> f64 {
        self.total_fuel_cost + self.total_service_cost
    }
}

/// Service records and fuel logs are counted when dated inside `month`.
pub fn monthly_summary(data: &Collections, month: Month) -> MonthlySummary {
    let services: Vec<_> = data
        .service_records
        .iter()
        .filter(|r| month.contains(r.date))
        .collect();
    let fuel: Vec<_> = data
        .fuel_logs
        .iter()
        .filter(|l| month.contains(l.date))
        .collect();

    let equipment = data
        .equipment
        .iter()
        .map(|eq| {
            let own_services = services.iter().filter(|r| r.equipment_id == eq.id);
            let own_fuel = fuel.iter().filter(|l| l.equipment_id == eq.id);
            EquipmentBreakdown {
                equipment_id: eq.id.clone(),
                display_name: eq.display_name.clone(),
                total_hours: eq.current_hours,
                total_fuel: own_fuel.clone().map(|l| l.liters_added).sum(),
                fuel_cost: own_fuel.map(|l| l.total_cost).sum(),
                service_count: own_services.clone().count(),
                service_cost: own_services.map(|r| r.cost).sum(),
            }
        })
        .collect();

    let total_fuel: f64 = fuel.iter().map(|l| l.liters_added).sum();
    let total_fuel_cost: f64 = fuel.iter().map(|l| l.total_cost).sum();
    let total_service_cost: f64 = services.iter().map(|r| r.cost).sum();
    let total_hours: f64 = data.equipment.iter().map(|eq| eq.current_hours).sum();
    let (average_fuel_consumption, cost_per_hour) = if total_hours > 0.0 {
        (
            total_fuel / total_hours,
            (total_fuel_cost + total_service_cost) / total_hours,
        )
    } else {
        (0.0, 0.0)
    };

    MonthlySummary {
        month,
        equipment,
        total_fuel,
        total_fuel_cost,
        total_service_cost,
        service_count: services.len(),
        total_hours,
        average_fuel_consumption,
        cost_per_hour,
    }
}

/// Whole-history totals across the fleet, with no month filter.
#[derive(Clone, Debug, PartialEq)]
pub struct FleetTotals {
    pub equipment_count: usize,
    pub total_hours: f64,
    pub service_count: usize,
    pub service_cost: f64,
    pub fuel_liters: f64,
    pub fuel_cost: f64,
    pub average_fuel_consumption: f64,
}

impl FleetTotals {
    pub fn total_cost(&self) -> f64 {
        self.service_cost + self.fuel_cost
    }
}

pub fn fleet_totals(data: &Collections) -> FleetTotals {
    let total_hours: f64 = data.equipment.iter().map(|eq| eq.current_hours).sum();
    let fuel_liters: f64 = data.fuel_logs.iter().map(|l| l.liters_added).sum();
    FleetTotals {
        equipment_count: data.equipment.len(),
        total_hours,
        service_count: data.service_records.len(),
        service_cost: data.service_records.iter().map(|r| r.cost).sum(),
        fuel_liters,
        fuel_cost: data.fuel_logs.iter().map(|l| l.total_cost).sum(),
        average_fuel_consumption: if total_hours > 0.0 {
            fuel_liters / total_hours
        } else {
            0.0
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::sample;

    #[test]
    fn month_parses_and_prints() {
        let month: Month = "2026-10".parse().unwrap();
        assert_eq!(month.to_string(), "2026-10");
        assert!(month.contains(NaiveDate::from_ymd_opt(2026, 10, 31).unwrap()));
        assert!(!month.contains(NaiveDate::from_ymd_opt(2026, 11, 1).unwrap()));
        for bad in ["2026-13", "2026-1", "26-10", "October", "2026-00"] {
            assert!(bad.parse::<Month>().is_err(), "{bad}");
        }
    }

    #[test]
    fn summary_counts_only_the_month() {
        let data = sample();
        let summary = monthly_summary(&data, "2026-10".parse().unwrap());
        assert_eq!(summary.service_count, 1);
        assert_eq!(summary.total_service_cost, 150.0);
        assert_eq!(summary.total_fuel, 100.0);
        assert!((summary.total_fuel_cost - 150.0).abs() < 1e-9);
        assert_eq!(summary.total_hours, 1_500.0);
        assert!((summary.cost_per_hour - 0.2).abs() < 1e-9);
        assert_eq!(summary.equipment[0].service_count, 1);
        assert_eq!(summary.equipment[1].total_fuel, 100.0);

        let september = monthly_summary(&data, "2026-09".parse().unwrap());
        assert_eq!(september.service_count, 1);
        assert_eq!(september.total_fuel, 0.0);
    }

    #[test]
    fn no_hours_means_zero_ratios() {
        let summary = monthly_summary(&Collections::default(), Month::new(2026, 1).unwrap());
        assert_eq!(summary.average_fuel_consumption, 0.0);
        assert_eq!(summary.cost_per_hour, 0.0);
        assert!(summary.equipment.is_empty());
    }

    #[test]
    fn fleet_totals_span_every_month() {
        let totals = fleet_totals(&sample());
        assert_eq!(totals.equipment_count, 2);
        assert_eq!(totals.service_count, 2);
        assert_eq!(totals.service_cost, 240.0);
        assert_eq!(totals.fuel_liters, 100.0);
        assert!((totals.total_cost() - 390.0).abs() < 1e-9);
        assert!((totals.average_fuel_consumption - 100.0 / 1_500.0).abs() < 1e-12);
        assert_eq!(fleet_totals(&Collections::default()).average_fuel_consumption, 0.0);
    }
}
