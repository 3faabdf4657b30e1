//! The domain state manager and the derivations it runs on every change.
pub mod alerts;
mod backup;
mod daily;
mod equipment;
mod fuel;
mod inventory;
mod lubrication;
mod service;
mod state;
pub mod status;

#[cfg(test)]
pub(crate) mod test_support;

pub use backup::BackupBundle;
pub use service::{EquipmentServiceUpdate, RecordService};
pub use state::{SeedPolicy, Snapshot, Tracker};

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::test_support::*;
    use super::*;
    use crate::clock::FixedClock;
    use crate::db::{Collection, SqliteStore, Store, init_in_memory, load_all, save_json};
    use crate::error::TrackerError;
    use crate::seed::sample_collections;
    use crate::types::{Collections, Equipment, Frequency};

    fn fresh(policy: SeedPolicy) -> Tracker<FlakyStore> {
        Tracker::new(FlakyStore::new())
            .with_clock(FixedClock::new(today()))
            .with_seed_policy(policy)
    }

    #[test]
    fn empty_store_is_seeded_and_persisted() {
        let mut tracker = fresh(SeedPolicy::EquipmentOnly);
        assert!(tracker.is_loading());
        tracker.initialize().unwrap();
        assert!(!tracker.snapshot().loading);

        let sample = sample_collections(today());
        assert_eq!(*tracker.collections(), sample);
        assert_eq!(reload(&tracker), sample);
        assert_eq!(tracker.snapshot().alerts.len(), tracker.alerts().len());
    }

    #[test]
    fn stored_data_is_loaded_without_seeding() {
        let tracker = tracker();
        assert_eq!(*tracker.collections(), fixture());
        assert!(tracker.store().saved_keys().is_empty());
    }

    #[test]
    fn equipment_only_policy_ignores_other_empty_collections() {
        let data = Collections {
            spare_parts: Vec::new(),
            ..fixture()
        };
        let tracker = tracker_with(&data);
        assert!(tracker.collections().spare_parts.is_empty());
        assert!(tracker.collections().service_records.is_empty());
    }

    #[test]
    fn equipment_only_policy_reseeds_everything_when_equipment_is_gone() {
        let store = FlakyStore::new();
        save_json(&store, Collection::SpareParts.key(), &fixture().spare_parts).unwrap();
        let mut tracker = Tracker::new(store)
            .with_clock(FixedClock::new(today()))
            .with_seed_policy(SeedPolicy::EquipmentOnly);
        tracker.initialize().unwrap();
        assert_eq!(tracker.collections().spare_parts, sample_collections(today()).spare_parts);
    }

    #[test]
    fn empty_collections_policy_fills_only_the_gaps() {
        let store = FlakyStore::new();
        let data = Collections {
            spare_parts: Vec::new(),
            fuel_stock: None,
            ..fixture()
        };
        write_collections(&store, &data);
        store.clear_log();
        let mut tracker = Tracker::new(store)
            .with_clock(FixedClock::new(today()))
            .with_seed_policy(SeedPolicy::EmptyCollections);
        tracker.initialize().unwrap();

        let sample = sample_collections(today());
        let loaded = tracker.collections();
        assert_eq!(loaded.equipment, fixture().equipment);
        assert_eq!(loaded.spare_parts, sample.spare_parts);
        assert_eq!(loaded.service_records, sample.service_records);
        assert_eq!(loaded.fuel_logs, sample.fuel_logs);
        assert_eq!(loaded.fuel_stock, sample.fuel_stock);
        assert_eq!(loaded.lubrication_points, fixture().lubrication_points);
        assert!(loaded.daily_reports.is_empty());
        assert!(!tracker.store().saved_keys().contains(&Collection::Equipment.key().to_string()));
    }

    #[test]
    fn failed_seed_write_leaves_tracker_empty_and_reports_it() {
        let tracker_store = FlakyStore::new();
        tracker_store.fail_saves_to(Collection::SpareParts);
        let mut tracker = Tracker::new(tracker_store)
            .with_clock(FixedClock::new(today()))
            .with_seed_policy(SeedPolicy::EquipmentOnly);
        assert!(matches!(tracker.initialize(), Err(TrackerError::Persistence(_))));
        assert!(tracker.collections().equipment.is_empty());
        assert!(!tracker.is_loading());
        assert!(load_all(tracker.store()).unwrap().equipment.unwrap_or_default().is_empty());
    }

    #[test]
    fn unreadable_store_is_reported() {
        let store = SqliteStore::new(init_in_memory().unwrap());
        store.save(Collection::Equipment.key(), "garbage").unwrap();
        let mut tracker = Tracker::new(store).with_clock(FixedClock::new(today()));
        assert!(matches!(tracker.initialize(), Err(TrackerError::Persistence(_))));
        assert!(!tracker.is_loading());
    }

    #[test]
    fn alerts_cover_all_three_sources() {
        let data = Collections {
            equipment: vec![Equipment {
                current_hours: 560.0,
                ..mixer()
            }],
            spare_parts: vec![part("p1", 1, 4, 10.0)],
            lubrication_points: vec![point(
                "l1",
                Frequency::Daily,
                Some(today() - Duration::days(1)),
            )],
            ..fixture()
        };
        let tracker = tracker_with(&data);
        let ids: Vec<&str> = tracker.alerts().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids[0].starts_with("alert-service-"));
        assert!(ids[1].starts_with("alert-inventory-"));
        assert!(ids[2].starts_with("alert-lub-"));
    }
}
