//! Fixture data written to an empty store on first start.
use chrono::{Duration, NaiveDate};

use crate::app::status::part_status;
use crate::types::{
    Collections, Equipment, EquipmentKind, FuelLog, FuelStock, Frequency, LubricationPoint,
    LubricationStatus, PartFitment, ServiceRecord, SparePart,
};

/// Sample site: one mixer, one loader, one generator, with history dated
/// relative to `today` so the schedule looks current on first launch.
pub fn sample_collections(today: NaiveDate) -> Collections {
    let days_ago = |days: i64| today - Duration::days(days);
    let days_ahead = |days: i64| today + Duration::days(days);

    let equipment = vec![
        Equipment {
            id: "eq-mixer-1".into(),
            name: "Elkon Mix 60".into(),
            kind: EquipmentKind::Mixer,
            display_name: "Concrete Mixer (Elkon)".into(),
            current_hours: 1_240.0,
            service_interval_hours: 250.0,
            last_service_hours: 1_050.0,
            last_service_date: days_ago(24),
            fuel_efficiency: None,
            fuel_level: None,
            fuel_capacity: None,
        },
        Equipment {
            id: "eq-loader-1".into(),
            name: "CAT 950".into(),
            kind: EquipmentKind::Loader,
            display_name: "Wheel Loader (CAT 950)".into(),
            current_hours: 3_480.0,
            service_interval_hours: 250.0,
            last_service_hours: 3_320.0,
            last_service_date: days_ago(18),
            fuel_efficiency: Some(14.5),
            fuel_level: Some(120.0),
            fuel_capacity: Some(290.0),
        },
        Equipment {
            id: "eq-generator-1".into(),
            name: "Aksa 400".into(),
            kind: EquipmentKind::Generator,
            display_name: "Generator (Aksa 400 kVA)".into(),
            current_hours: 6_010.0,
            service_interval_hours: 500.0,
            last_service_hours: 5_600.0,
            last_service_date: days_ago(40),
            fuel_efficiency: Some(48.0),
            fuel_level: Some(300.0),
            fuel_capacity: Some(800.0),
        },
    ];

    let service_records = vec![
        ServiceRecord {
            id: "service-seed-1".into(),
            equipment_id: "eq-mixer-1".into(),
            date: days_ago(24),
            hours_at_service: 1_050.0,
            service_type: "Oil change".into(),
            parts_used: vec!["part-oil-filter".into()],
            cost: 185.0,
            technician: "M. Hodzic".into(),
            notes: "Gearbox oil topped up".into(),
            photos: None,
        },
        ServiceRecord {
            id: "service-seed-2".into(),
            equipment_id: "eq-loader-1".into(),
            date: days_ago(18),
            hours_at_service: 3_320.0,
            service_type: "Filter replacement".into(),
            parts_used: vec!["part-air-filter".into(), "part-fuel-filter".into()],
            cost: 240.5,
            technician: "A. Kovac".into(),
            notes: String::new(),
            photos: None,
        },
        ServiceRecord {
            id: "service-seed-3".into(),
            equipment_id: "eq-generator-1".into(),
            date: days_ago(40),
            hours_at_service: 5_600.0,
            service_type: "Major service".into(),
            parts_used: vec!["part-oil-filter".into(), "part-fuel-filter".into()],
            cost: 620.0,
            technician: "A. Kovac".into(),
            notes: "Coolant replaced".into(),
            photos: None,
        },
    ];

    let fuel_logs = vec![
        FuelLog::new(
            "fuel-seed-1".into(),
            "eq-loader-1".into(),
            days_ago(3),
            150.0,
            1.45,
            3_460.0,
            String::new(),
        ),
        FuelLog::new(
            "fuel-seed-2".into(),
            "eq-generator-1".into(),
            days_ago(2),
            400.0,
            1.45,
            5_990.0,
            "Night shift".into(),
        ),
    ];

    let lubrication_points = vec![
        LubricationPoint {
            id: "lub-drum-bearings".into(),
            name: "Mixer drum bearings".into(),
            kind: "Grease".into(),
            frequency: Frequency::Daily,
            equipment_id: Some("eq-mixer-1".into()),
            last_completed: Some(days_ago(1)),
            next_due: Some(today),
            status: LubricationStatus::Due,
        },
        LubricationPoint {
            id: "lub-loader-pins".into(),
            name: "Loader bucket pins".into(),
            kind: "Grease".into(),
            frequency: Frequency::Weekly,
            equipment_id: Some("eq-loader-1".into()),
            last_completed: Some(days_ago(3)),
            next_due: Some(days_ahead(4)),
            status: LubricationStatus::Good,
        },
        LubricationPoint {
            id: "lub-generator-oil".into(),
            name: "Generator oil level".into(),
            kind: "Inspection".into(),
            frequency: Frequency::Weekly,
            equipment_id: Some("eq-generator-1".into()),
            last_completed: Some(days_ago(6)),
            next_due: Some(days_ahead(1)),
            status: LubricationStatus::Good,
        },
        LubricationPoint {
            id: "lub-conveyor-chain".into(),
            name: "Aggregate conveyor chain".into(),
            kind: "Oil".into(),
            frequency: Frequency::Monthly,
            equipment_id: None,
            last_completed: Some(days_ago(20)),
            next_due: Some(days_ahead(10)),
            status: LubricationStatus::Good,
        },
    ];

    let spare_parts = vec![
        sample_part("part-oil-filter", "Oil filter", "OF-2231", PartFitment::All, 12, 4, 18.5),
        sample_part("part-air-filter", "Air filter", "AF-950", PartFitment::Loader, 3, 2, 64.0),
        sample_part("part-fuel-filter", "Fuel filter", "FF-118", PartFitment::All, 2, 3, 22.0),
        sample_part(
            "part-mixer-blade",
            "Mixer blade",
            "MB-60",
            PartFitment::Mixer,
            6,
            2,
            145.0,
        ),
    ];

    Collections {
        equipment,
        service_records,
        fuel_logs,
        lubrication_points,
        spare_parts,
        daily_reports: Vec::new(),
        fuel_stock: Some(FuelStock {
            current_liters: 4_200.0,
            capacity: 10_000.0,
            minimum_level: 1_500.0,
            last_updated: days_ago(2),
            notes: String::new(),
        }),
    }
}

fn sample_part(
    id: &str,
    name: &str,
    part_number: &str,
    equipment: PartFitment,
    current_stock: u32,
    minimum_level: u32,
    price: f64,
) -> SparePart {
    SparePart {
        id: id.into(),
        name: name.into(),
        part_number: part_number.into(),
        equipment,
        current_stock,
        minimum_level,
        price,
        supplier: None,
        notes: None,
        status: part_status(current_stock, minimum_level),
    }
}
