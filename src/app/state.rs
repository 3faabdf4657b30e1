use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::app::alerts::generate_alerts;
use crate::clock::{Clock, SystemClock};
use crate::db::{Collection, Store, load_all};
use crate::error::{StoreError, TrackerError, TrackerResult};
use crate::seed;
use crate::types::{
    Alert, Collections, DailyReport, Equipment, FuelLog, FuelStock, LubricationPoint,
    ServiceRecord, SparePart,
};

/// How `initialize` fills an empty or partially wiped store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedPolicy {
    /// Seed every collection from fixtures, but only when the equipment
    /// collection is empty. Other empty collections are left alone.
    #[default]
    EquipmentOnly,
    /// Seed each collection that is missing or empty, independently.
    EmptyCollections,
}

/// The read-only view handed to front ends.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub collections: &'a Collections,
    pub alerts: &'a [Alert],
    pub loading: bool,
}

/// Single owner of the domain collections. Every mutation goes through
/// `commit`, which persists before touching memory.
pub struct Tracker<S: Store> {
    store: S,
    pub(crate) clock: Box<dyn Clock>,
    seed_policy: SeedPolicy,
    pub(crate) data: Collections,
    alerts: Vec<Alert>,
    loading: bool,
}

impl<S: Store> Tracker<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Box::new(SystemClock),
            seed_policy: SeedPolicy::default(),
            data: Collections::default(),
            alerts: Vec::new(),
            loading: true,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_seed_policy(mut self, policy: SeedPolicy) -> Self {
        self.seed_policy = policy;
        self
    }

    /// Loads every collection and seeds fixtures according to the seed policy.
    pub fn initialize(&mut self) -> TrackerResult<()> {
        let loaded = match load_all(&self.store) {
            Ok(loaded) => loaded,
            Err(err) => {
                self.loading = false;
                error!(error = %err, "failed to load stored collections");
                return Err(err.into());
            }
        };

        self.data = Collections {
            equipment: loaded.equipment.unwrap_or_default(),
            service_records: loaded.service_records.unwrap_or_default(),
            fuel_logs: loaded.fuel_logs.unwrap_or_default(),
            lubrication_points: loaded.lubrication_points.unwrap_or_default(),
            spare_parts: loaded.spare_parts.unwrap_or_default(),
            daily_reports: loaded.daily_reports.unwrap_or_default(),
            fuel_stock: loaded.fuel_stock,
        };
        self.loading = false;

        let changes = self.seed_changes();
        if changes.is_empty() {
            debug!(
                equipment = self.data.equipment.len(),
                parts = self.data.spare_parts.len(),
                "loaded stored collections"
            );
            self.refresh_alerts();
            return Ok(());
        }

        info!(policy = ?self.seed_policy, collections = changes.len(), "seeding sample data");
        let result = self.commit("seed", changes);
        if result.is_err() {
            // Whatever was loaded is still what the store holds.
            self.refresh_alerts();
        }
        result
    }

    fn seed_changes(&self) -> Changeset {
        let sample = seed::sample_collections(self.clock.today());
        let mut changes = Changeset::new();
        match self.seed_policy {
            SeedPolicy::EquipmentOnly => {
                if self.data.equipment.is_empty() {
                    changes = changes
                        .equipment(sample.equipment)
                        .service_records(sample.service_records)
                        .fuel_logs(sample.fuel_logs)
                        .lubrication_points(sample.lubrication_points)
                        .spare_parts(sample.spare_parts)
                        .daily_reports(sample.daily_reports)
                        .fuel_stock(sample.fuel_stock);
                }
            }
            SeedPolicy::EmptyCollections => {
                if self.data.equipment.is_empty() {
                    changes = changes.equipment(sample.equipment);
                }
                if self.data.service_records.is_empty() {
                    changes = changes.service_records(sample.service_records);
                }
                if self.data.fuel_logs.is_empty() {
                    changes = changes.fuel_logs(sample.fuel_logs);
                }
                if self.data.lubrication_points.is_empty() {
                    changes = changes.lubrication_points(sample.lubrication_points);
                }
                if self.data.spare_parts.is_empty() {
                    changes = changes.spare_parts(sample.spare_parts);
                }
                if self.data.fuel_stock.is_none() {
                    changes = changes.fuel_stock(sample.fuel_stock);
                }
            }
        }
        changes
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            collections: &self.data,
            alerts: &self.alerts,
            loading: self.loading,
        }
    }

    pub fn collections(&self) -> &Collections {
        &self.data
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub(crate) fn equipment_index(&self, id: &str) -> TrackerResult<usize> {
        self.data
            .equipment
            .iter()
            .position(|eq| eq.id == id)
            .ok_or_else(|| TrackerError::not_found("equipment", id))
    }

    pub(crate) fn refresh_alerts(&mut self) {
        self.alerts = generate_alerts(&self.data, self.clock.today());
    }

    pub(crate) fn reset_in_memory(&mut self, data: Collections) {
        self.data = data;
        self.refresh_alerts();
    }

    /// Writes every staged collection in order, then swaps them into memory.
    ///
    /// If any write fails, collections already written are rewritten from the
    /// committed in-memory state and the error is returned; memory is untouched.
    /// `&mut self` keeps writes strictly sequential, and each changeset is built
    /// from committed state, so a later write never carries an older snapshot.
    pub(crate) fn commit(&mut self, operation: &'static str, changes: Changeset) -> TrackerResult<()> {
        let mut encoded = Vec::with_capacity(changes.len());
        for staged in &changes.staged {
            encoded.push((staged.collection(), staged.encode()?));
        }

        let mut written: Vec<Collection> = Vec::with_capacity(encoded.len());
        for (collection, blob) in &encoded {
            if let Err(err) = self.store.save(collection.key(), blob) {
                error!(
                    operation,
                    collection = %collection,
                    error = %err,
                    rolled_back = written.len(),
                    "write failed, rolling back"
                );
                self.roll_back(&written);
                return Err(err.into());
            }
            written.push(*collection);
        }

        for staged in changes.staged {
            staged.apply(&mut self.data);
        }
        self.refresh_alerts();
        info!(operation, collections = written.len(), alerts = self.alerts.len(), "committed");
        Ok(())
    }

    fn roll_back(&self, written: &[Collection]) {
        for collection in written.iter().rev() {
            let restored = encode_committed(&self.data, *collection)
                .and_then(|blob| self.store.save(collection.key(), &blob));
            if let Err(err) = restored {
                warn!(
                    collection = %collection,
                    error = %err,
                    "rollback write failed, store is ahead of memory until the next save"
                );
            }
        }
    }
}

pub(crate) fn ensure_non_negative(value: f64, field: &str) -> TrackerResult<()> {
    if !value.is_finite() {
        return Err(TrackerError::invalid(format!("{field} must be a number")));
    }
    if value < 0.0 {
        return Err(TrackerError::invalid(format!("{field} cannot be negative")));
    }
    Ok(())
}

pub(crate) fn ensure_positive(value: f64, field: &str) -> TrackerResult<()> {
    ensure_non_negative(value, field)?;
    if value == 0.0 {
        return Err(TrackerError::invalid(format!("{field} must be greater than zero")));
    }
    Ok(())
}

pub(crate) fn ensure_present(value: &str, field: &str) -> TrackerResult<()> {
    if value.trim().is_empty() {
        return Err(TrackerError::invalid(format!("{field} is required")));
    }
    Ok(())
}

fn encode_committed(data: &Collections, collection: Collection) -> Result<String, StoreError> {
    let blob = match collection {
        Collection::Equipment => serde_json::to_string(&data.equipment)?,
        Collection::ServiceRecords => serde_json::to_string(&data.service_records)?,
        Collection::FuelLogs => serde_json::to_string(&data.fuel_logs)?,
        Collection::LubricationPoints => serde_json::to_string(&data.lubrication_points)?,
        Collection::SpareParts => serde_json::to_string(&data.spare_parts)?,
        Collection::DailyReports => serde_json::to_string(&data.daily_reports)?,
        Collection::FuelStock => serde_json::to_string(&data.fuel_stock)?,
    };
    Ok(blob)
}

/// A whole replacement value for one collection.
pub(crate) enum Staged {
    Equipment(Vec<Equipment>),
    ServiceRecords(Vec<ServiceRecord>),
    FuelLogs(Vec<FuelLog>),
    LubricationPoints(Vec<LubricationPoint>),
    SpareParts(Vec<SparePart>),
    DailyReports(Vec<DailyReport>),
    FuelStock(Option<FuelStock>),
}

impl Staged {
    fn collection(&self) -> Collection {
        match self {
            Staged::Equipment(_) => Collection::Equipment,
            Staged::ServiceRecords(_) => Collection::ServiceRecords,
            Staged::FuelLogs(_) => Collection::FuelLogs,
            Staged::LubricationPoints(_) => Collection::LubricationPoints,
            Staged::SpareParts(_) => Collection::SpareParts,
            Staged::DailyReports(_) => Collection::DailyReports,
            Staged::FuelStock(_) => Collection::FuelStock,
        }
    }

    fn encode(&self) -> Result<String, StoreError> {
        let blob = match self {
            Staged::Equipment(items) => serde_json::to_string(items)?,
            Staged::ServiceRecords(items) => serde_json::to_string(items)?,
            Staged::FuelLogs(items) => serde_json::to_string(items)?,
            Staged::LubricationPoints(items) => serde_json::to_string(items)?,
            Staged::SpareParts(items) => serde_json::to_string(items)?,
            Staged::DailyReports(items) => serde_json::to_string(items)?,
            Staged::FuelStock(stock) => serde_json::to_string(stock)?,
        };
        Ok(blob)
    }

    fn apply(self, data: &mut Collections) {
        match self {
            Staged::Equipment(items) => data.equipment = items,
            Staged::ServiceRecords(items) => data.service_records = items,
            Staged::FuelLogs(items) => data.fuel_logs = items,
            Staged::LubricationPoints(items) => data.lubrication_points = items,
            Staged::SpareParts(items) => data.spare_parts = items,
            Staged::DailyReports(items) => data.daily_reports = items,
            Staged::FuelStock(stock) => data.fuel_stock = stock,
        }
    }
}

/// An ordered set of collection rewrites that succeed or fail together.
/// Writes happen in the order the collections were staged.
#[derive(Default)]
pub(crate) struct Changeset {
    staged: Vec<Staged>,
}

impl Changeset {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.staged.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub(crate) fn equipment(mut self, items: Vec<Equipment>) -> Self {
        self.staged.push(Staged::Equipment(items));
        self
    }

    pub(crate) fn service_records(mut self, items: Vec<ServiceRecord>) -> Self {
        self.staged.push(Staged::ServiceRecords(items));
        self
    }

    pub(crate) fn fuel_logs(mut self, items: Vec<FuelLog>) -> Self {
        self.staged.push(Staged::FuelLogs(items));
        self
    }

    pub(crate) fn lubrication_points(mut self, items: Vec<LubricationPoint>) -> Self {
        self.staged.push(Staged::LubricationPoints(items));
        self
    }

    pub(crate) fn spare_parts(mut self, items: Vec<SparePart>) -> Self {
        self.staged.push(Staged::SpareParts(items));
        self
    }

    pub(crate) fn daily_reports(mut self, items: Vec<DailyReport>) -> Self {
        self.staged.push(Staged::DailyReports(items));
        self
    }

    pub(crate) fn fuel_stock(mut self, stock: Option<FuelStock>) -> Self {
        self.staged.push(Staged::FuelStock(stock));
        self
    }
}
