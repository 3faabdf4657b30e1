//! Alert generation: a full projection of the collections, rebuilt from scratch.
use chrono::NaiveDate;

use crate::app::status::{equipment_status, hours_until_service, spare_part_status};
use crate::types::{Alert, AlertKind, Collections, EquipmentStatus, PartStatus};

/// Equipment alerts first, then spare parts, then lubrication points, each in
/// collection order. Ids are stable per entity so callers can dedupe.
pub fn generate_alerts(data: &Collections, today: NaiveDate) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for equipment in &data.equipment {
        match equipment_status(equipment) {
            EquipmentStatus::Overdue => alerts.push(Alert {
                id: format!("alert-service-{}", equipment.id),
                kind: AlertKind::Overdue,
                title: "Service overdue".to_string(),
                message: format!("{} is due for service", equipment.display_name),
                equipment_id: Some(equipment.id.clone()),
                part_id: None,
            }),
            EquipmentStatus::Warning => alerts.push(Alert {
                id: format!("alert-warning-{}", equipment.id),
                kind: AlertKind::Warning,
                title: "Service due soon".to_string(),
                message: format!(
                    "{} needs service in {} hours",
                    equipment.display_name,
                    hours_until_service(equipment)
                ),
                equipment_id: Some(equipment.id.clone()),
                part_id: None,
            }),
            EquipmentStatus::Good => {}
        }
    }

    for part in &data.spare_parts {
        let (kind, title) = match spare_part_status(part) {
            PartStatus::Critical => (AlertKind::Warning, "Critical stock"),
            PartStatus::Low => (AlertKind::Info, "Low stock"),
            PartStatus::Adequate => continue,
        };
        alerts.push(Alert {
            id: format!("alert-inventory-{}", part.id),
            kind,
            title: title.to_string(),
            message: format!(
                "{} - in stock: {}, minimum: {}",
                part.name, part.current_stock, part.minimum_level
            ),
            equipment_id: None,
            part_id: Some(part.id.clone()),
        });
    }

    for point in &data.lubrication_points {
        let Some(due) = point.next_due else {
            continue;
        };
        if due < today {
            alerts.push(Alert {
                id: format!("alert-lub-{}", point.id),
                kind: AlertKind::Warning,
                title: "Lubrication overdue".to_string(),
                message: format!("{} was due on {due}", point.name),
                equipment_id: point.equipment_id.clone(),
                part_id: None,
            });
        }
    }

    alerts
}
