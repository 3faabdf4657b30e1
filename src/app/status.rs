//! Pure status derivations. Nothing here is cached; callers recompute on demand.
use chrono::{Duration, NaiveDate};

use crate::types::{
    Equipment, EquipmentStatus, Frequency, LubricationPoint, LubricationStatus, PartStatus,
    SparePart,
};

/// Hours-until-service at or below this value puts a machine in `warning`.
pub const SERVICE_WARNING_HOURS: f64 = 50.0;

/// Stock below `minimum_level * LOW_STOCK_FACTOR` is `low`.
pub const LOW_STOCK_FACTOR: f64 = 1.5;

pub fn hours_until_service(equipment: &Equipment) -> f64 {
    let since_service = equipment.current_hours - equipment.last_service_hours;
    equipment.service_interval_hours - since_service
}

pub fn equipment_status(equipment: &Equipment) -> EquipmentStatus {
    let remaining = hours_until_service(equipment);
    if remaining <= 0.0 {
        EquipmentStatus::Overdue
    } else if remaining <= SERVICE_WARNING_HOURS {
        EquipmentStatus::Warning
    } else {
        EquipmentStatus::Good
    }
}

pub fn part_status(current_stock: u32, minimum_level: u32) -> PartStatus {
    if current_stock <= minimum_level {
        PartStatus::Critical
    } else if f64::from(current_stock) < f64::from(minimum_level) * LOW_STOCK_FACTOR {
        PartStatus::Low
    } else {
        PartStatus::Adequate
    }
}

pub fn spare_part_status(part: &SparePart) -> PartStatus {
    part_status(part.current_stock, part.minimum_level)
}

/// `overdue` once the due date has passed, `due` on the day itself, otherwise
/// whatever was last recorded.
pub fn lubrication_status(point: &LubricationPoint, today: NaiveDate) -> LubricationStatus {
    match point.next_due {
        Some(due) if due < today => LubricationStatus::Overdue,
        Some(due) if due == today => LubricationStatus::Due,
        _ => point.status,
    }
}

pub fn next_due(frequency: Frequency, completed: NaiveDate) -> NaiveDate {
    completed + Duration::days(frequency.interval_days())
}

pub fn total_inventory_value(parts: &[SparePart]) -> f64 {
    parts
        .iter()
        .map(|part| f64::from(part.current_stock) * part.price)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EquipmentKind, PartFitment};

    fn equipment(current: f64, last: f64, interval: f64) -> Equipment {
        Equipment {
            id: "eq1".into(),
            name: "Elkon".into(),
            kind: EquipmentKind::Mixer,
            display_name: "Concrete Mixer".into(),
            current_hours: current,
            service_interval_hours: interval,
            last_service_hours: last,
            last_service_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            fuel_efficiency: None,
            fuel_level: None,
            fuel_capacity: None,
        }
    }

    fn part(stock: u32, min: u32, price: f64) -> SparePart {
        SparePart {
            id: "p1".into(),
            name: "Oil filter".into(),
            part_number: "OF-1".into(),
            equipment: PartFitment::All,
            current_stock: stock,
            minimum_level: min,
            price,
            supplier: None,
            notes: None,
            status: PartStatus::Adequate,
        }
    }

    #[test]
    fn equipment_status_follows_hours_until_service() {
        for current in (0..=400).step_by(5) {
            let eq = equipment(f64::from(current), 100.0, 250.0);
            let remaining = 250.0 - (f64::from(current) - 100.0);
            let expected = if remaining <= 0.0 {
                EquipmentStatus::Overdue
            } else if remaining <= 50.0 {
                EquipmentStatus::Warning
            } else {
                EquipmentStatus::Good
            };
            assert_eq!(equipment_status(&eq), expected, "current_hours={current}");
        }
    }

    #[test]
    fn threshold_edges() {
        assert_eq!(equipment_status(&equipment(550.0, 450.0, 100.0)), EquipmentStatus::Overdue);
        assert_eq!(equipment_status(&equipment(500.0, 450.0, 100.0)), EquipmentStatus::Warning);
        assert_eq!(equipment_status(&equipment(499.5, 450.0, 100.0)), EquipmentStatus::Good);
        assert_eq!(hours_until_service(&equipment(500.0, 450.0, 100.0)), 50.0);
    }

    #[test]
    fn part_status_thresholds() {
        assert_eq!(part_status(0, 0), PartStatus::Critical);
        assert_eq!(part_status(4, 4), PartStatus::Critical);
        assert_eq!(part_status(5, 4), PartStatus::Low);
        assert_eq!(part_status(6, 4), PartStatus::Adequate);
        assert_eq!(part_status(14, 10), PartStatus::Low);
        assert_eq!(part_status(15, 10), PartStatus::Adequate);
        assert_eq!(part_status(1, 0), PartStatus::Adequate);
    }

    #[test]
    fn price_never_changes_part_status() {
        for stock in 0..30 {
            for min in 0..12 {
                let cheap = spare_part_status(&part(stock, min, 0.5));
                let dear = spare_part_status(&part(stock, min, 9_999.0));
                assert_eq!(cheap, dear);
                assert_eq!(cheap, part_status(stock, min));
            }
        }
    }

    #[test]
    fn next_due_uses_fixed_day_counts() {
        let done = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        assert_eq!(next_due(Frequency::Daily, done), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(next_due(Frequency::Weekly, done), NaiveDate::from_ymd_opt(2026, 2, 7).unwrap());
        assert_eq!(next_due(Frequency::Monthly, done), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    }

    #[test]
    fn lubrication_status_by_due_date() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut point = LubricationPoint {
            id: "l1".into(),
            name: "Drum bearings".into(),
            kind: "Grease".into(),
            frequency: Frequency::Weekly,
            equipment_id: None,
            last_completed: None,
            next_due: None,
            status: LubricationStatus::Good,
        };
        assert_eq!(lubrication_status(&point, today), LubricationStatus::Good);
        point.next_due = today.pred_opt();
        assert_eq!(lubrication_status(&point, today), LubricationStatus::Overdue);
        point.next_due = Some(today);
        assert_eq!(lubrication_status(&point, today), LubricationStatus::Due);
        point.next_due = today.succ_opt();
        assert_eq!(lubrication_status(&point, today), LubricationStatus::Good);
    }

    #[test]
    fn inventory_value_is_stock_times_price() {
        let parts = vec![part(3, 1, 12.5), part(0, 2, 100.0), part(10, 2, 1.25)];
        assert!((total_inventory_value(&parts) - 50.0).abs() < 1e-9);
        assert_eq!(total_inventory_value(&[]), 0.0);
    }
}
