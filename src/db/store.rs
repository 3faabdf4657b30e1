//! The persistent store contract and its SQLite implementation.
use std::fmt;

use rusqlite::Connection;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::db::kv;
use crate::error::StoreError;
use crate::types::{
    DailyReport, Equipment, FuelLog, FuelStock, LubricationPoint, ServiceRecord, SparePart,
};

pub const BACKUP_KEY: &str = "fleetlog_backup";
pub const LAST_BACKUP_KEY: &str = "fleetlog_last_backup";
pub const SETTINGS_KEY: &str = "fleetlog_settings";

/// A flat key/value store of opaque blobs. Every save rewrites the whole value.
pub trait Store {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save(&self, key: &str, blob: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// One persisted collection, each under its own fixed key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Equipment,
    ServiceRecords,
    FuelLogs,
    LubricationPoints,
    SpareParts,
    DailyReports,
    FuelStock,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Equipment,
        Collection::ServiceRecords,
        Collection::FuelLogs,
        Collection::LubricationPoints,
        Collection::SpareParts,
        Collection::DailyReports,
        Collection::FuelStock,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Collection::Equipment => "fleetlog_equipment",
            Collection::ServiceRecords => "fleetlog_service_records",
            Collection::FuelLogs => "fleetlog_fuel_logs",
            Collection::LubricationPoints => "fleetlog_lubrication_points",
            Collection::SpareParts => "fleetlog_spare_parts",
            Collection::DailyReports => "fleetlog_daily_reports",
            Collection::FuelStock => "fleetlog_fuel_stock",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// What `load_all` found. `None` means the key has never been written.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartialCollections {
    pub equipment: Option<Vec<Equipment>>,
    pub service_records: Option<Vec<ServiceRecord>>,
    pub fuel_logs: Option<Vec<FuelLog>>,
    pub lubrication_points: Option<Vec<LubricationPoint>>,
    pub spare_parts: Option<Vec<SparePart>>,
    pub daily_reports: Option<Vec<DailyReport>>,
    pub fuel_stock: Option<FuelStock>,
}

pub fn load_json<T: DeserializeOwned>(
    store: &impl Store,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.load(key)? {
        Some(blob) => Ok(serde_json::from_str(&blob)?),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize + ?Sized>(
    store: &impl Store,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let blob = serde_json::to_string(value)?;
    store.save(key, &blob)
}

/// Reads every collection key. A blob that fails to decode is an error, not an
/// empty collection.
pub fn load_all(store: &impl Store) -> Result<PartialCollections, StoreError> {
    Ok(PartialCollections {
        equipment: load_json(store, Collection::Equipment.key())?,
        service_records: load_json(store, Collection::ServiceRecords.key())?,
        fuel_logs: load_json(store, Collection::FuelLogs.key())?,
        lubrication_points: load_json(store, Collection::LubricationPoints.key())?,
        spare_parts: load_json(store, Collection::SpareParts.key())?,
        daily_reports: load_json(store, Collection::DailyReports.key())?,
        // An explicit `null` and a missing key both mean "no site tank".
        fuel_stock: load_json::<Option<FuelStock>>(store, Collection::FuelStock.key())?.flatten(),
    })
}

/// `Store` over the SQLite `kv_store` table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl Store for SqliteStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(kv::query_value(key, &self.conn)?)
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), StoreError> {
        Ok(kv::upsert_value(key, blob, &self.conn)?)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        Ok(kv::delete_value(key, &self.conn)?)
    }
}
