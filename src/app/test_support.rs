//! Shared fixtures for tracker tests.
use std::cell::RefCell;
use std::collections::HashSet;

use chrono::NaiveDate;

use crate::app::status::part_status;
use crate::app::{SeedPolicy, Tracker};
use crate::clock::FixedClock;
use crate::db::{Collection, SqliteStore, Store, init_in_memory, save_json};
use crate::error::StoreError;
use crate::types::{
    Collections, Equipment, EquipmentKind, FuelStock, Frequency, LubricationPoint,
    LubricationStatus, PartFitment, ServiceRecord, SparePart,
};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

/// SQLite store whose saves can be made to fail per key.
pub struct FlakyStore {
    inner: SqliteStore,
    failing: RefCell<HashSet<String>>,
    saves: RefCell<Vec<String>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: SqliteStore::new(init_in_memory().unwrap()),
            failing: RefCell::new(HashSet::new()),
            saves: RefCell::new(Vec::new()),
        }
    }

    pub fn fail_saves_to(&self, collection: Collection) {
        self.failing.borrow_mut().insert(collection.key().to_string());
    }

    pub fn fail_key(&self, key: &str) {
        self.failing.borrow_mut().insert(key.to_string());
    }

    pub fn heal(&self) {
        self.failing.borrow_mut().clear();
    }

    pub fn saved_keys(&self) -> Vec<String> {
        self.saves.borrow().clone()
    }

    pub fn clear_log(&self) {
        self.saves.borrow_mut().clear();
    }
}

impl Store for FlakyStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.load(key)
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), StoreError> {
        if self.failing.borrow().contains(key) {
            return Err(StoreError::Unavailable(format!("write to {key} refused")));
        }
        self.saves.borrow_mut().push(key.to_string());
        self.inner.save(key, blob)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if self.failing.borrow().contains(key) {
            return Err(StoreError::Unavailable(format!("remove of {key} refused")));
        }
        self.inner.remove(key)
    }
}

pub fn mixer() -> Equipment {
    Equipment {
        id: "eq1".into(),
        name: "Elkon".into(),
        kind: EquipmentKind::Mixer,
        display_name: "Concrete Mixer (Elkon)".into(),
        current_hours: 500.0,
        service_interval_hours: 100.0,
        last_service_hours: 450.0,
        last_service_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        fuel_efficiency: None,
        fuel_level: Some(50.0),
        fuel_capacity: Some(200.0),
    }
}

pub fn loader() -> Equipment {
    Equipment {
        id: "eq2".into(),
        name: "CAT 950".into(),
        kind: EquipmentKind::Loader,
        display_name: "Wheel Loader".into(),
        current_hours: 1_000.0,
        service_interval_hours: 250.0,
        last_service_hours: 900.0,
        last_service_date: NaiveDate::from_ymd_opt(2026, 9, 15).unwrap(),
        fuel_efficiency: Some(14.0),
        fuel_level: None,
        fuel_capacity: None,
    }
}

pub fn part(id: &str, stock: u32, min: u32, price: f64) -> SparePart {
    SparePart {
        id: id.into(),
        name: format!("Part {id}"),
        part_number: id.to_uppercase(),
        equipment: PartFitment::All,
        current_stock: stock,
        minimum_level: min,
        price,
        supplier: None,
        notes: None,
        status: part_status(stock, min),
    }
}

pub fn point(id: &str, frequency: Frequency, next_due: Option<NaiveDate>) -> LubricationPoint {
    LubricationPoint {
        id: id.into(),
        name: format!("Point {id}"),
        kind: "Grease".into(),
        frequency,
        equipment_id: Some("eq1".into()),
        last_completed: None,
        next_due,
        status: LubricationStatus::Good,
    }
}

pub fn site_stock(current: f64) -> FuelStock {
    FuelStock {
        current_liters: current,
        capacity: 5_000.0,
        minimum_level: 500.0,
        last_updated: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
        notes: String::new(),
    }
}

pub fn service(id: &str, equipment_id: &str, hours: f64) -> ServiceRecord {
    ServiceRecord {
        id: id.into(),
        equipment_id: equipment_id.into(),
        date: today(),
        hours_at_service: hours,
        service_type: "Oil change".into(),
        parts_used: vec!["p1".into()],
        cost: 120.0,
        technician: "A. Kovac".into(),
        notes: "Checked hoses".into(),
        photos: None,
    }
}

/// Small site with all-good state: two machines, two healthy parts, one
/// lubrication point due next week and a half-full site tank.
pub fn fixture() -> Collections {
    Collections {
        equipment: vec![mixer(), loader()],
        spare_parts: vec![part("p1", 20, 4, 10.0), part("p2", 10, 2, 2.5)],
        lubrication_points: vec![point(
            "l1",
            Frequency::Weekly,
            Some(today() + chrono::Duration::days(7)),
        )],
        fuel_stock: Some(site_stock(2_500.0)),
        ..Collections::default()
    }
}

pub fn write_collections(store: &impl Store, data: &Collections) {
    save_json(store, Collection::Equipment.key(), &data.equipment).unwrap();
    save_json(store, Collection::ServiceRecords.key(), &data.service_records).unwrap();
    save_json(store, Collection::FuelLogs.key(), &data.fuel_logs).unwrap();
    save_json(store, Collection::LubricationPoints.key(), &data.lubrication_points).unwrap();
    save_json(store, Collection::SpareParts.key(), &data.spare_parts).unwrap();
    save_json(store, Collection::DailyReports.key(), &data.daily_reports).unwrap();
    save_json(store, Collection::FuelStock.key(), &data.fuel_stock).unwrap();
}

/// Tracker over a flaky store pre-filled with `data`, initialized, save log cleared.
pub fn tracker_with(data: &Collections) -> Tracker<FlakyStore> {
    let store = FlakyStore::new();
    write_collections(&store, data);
    let mut tracker = Tracker::new(store)
        .with_clock(FixedClock::new(today()))
        .with_seed_policy(SeedPolicy::EquipmentOnly);
    tracker.initialize().unwrap();
    tracker.store().clear_log();
    tracker
}

pub fn tracker() -> Tracker<FlakyStore> {
    tracker_with(&fixture())
}

/// A second tracker reading the same durable state as `tracker`.
pub fn reload(tracker: &Tracker<FlakyStore>) -> Collections {
    crate::db::load_all(tracker.store())
        .map(|loaded| Collections {
            equipment: loaded.equipment.unwrap_or_default(),
            service_records: loaded.service_records.unwrap_or_default(),
            fuel_logs: loaded.fuel_logs.unwrap_or_default(),
            lubrication_points: loaded.lubrication_points.unwrap_or_default(),
            spare_parts: loaded.spare_parts.unwrap_or_default(),
            daily_reports: loaded.daily_reports.unwrap_or_default(),
            fuel_stock: loaded.fuel_stock,
        })
        .unwrap()
}
