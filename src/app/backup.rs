use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::app::state::{Changeset, Tracker};
use crate::db::{BACKUP_KEY, Collection, LAST_BACKUP_KEY, SETTINGS_KEY, Store, load_json, save_json};
use crate::error::{TrackerError, TrackerResult};
use crate::types::Collections;

/// Every collection at one point in time, stored as a single blob.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupBundle {
    pub timestamp: DateTime<Local>,
    #[serde(flatten)]
    pub collections: Collections,
}

impl<S: Store> Tracker<S> {
    pub fn create_backup(&self) -> TrackerResult<BackupBundle> {
        let bundle = BackupBundle {
            timestamp: self.clock.now(),
            collections: self.data.clone(),
        };
        save_json(self.store(), BACKUP_KEY, &bundle)?;
        // The bundle is already stored; a missing marker only hides its age.
        if let Err(err) = save_json(self.store(), LAST_BACKUP_KEY, &bundle.timestamp) {
            warn!(error = %err, "backup written but its timestamp was not recorded");
        }
        info!(timestamp = %bundle.timestamp, "backup written");
        Ok(bundle)
    }

    pub fn last_backup(&self) -> TrackerResult<Option<DateTime<Local>>> {
        Ok(load_json(self.store(), LAST_BACKUP_KEY)?)
    }

    /// Overwrites every collection with the stored backup, all or nothing.
    pub fn restore_backup(&mut self) -> TrackerResult<DateTime<Local>> {
        let bundle: BackupBundle = load_json(self.store(), BACKUP_KEY)?
            .ok_or_else(|| TrackerError::not_found("backup", BACKUP_KEY))?;
        let BackupBundle {
            timestamp,
            collections,
        } = bundle;

        let changes = Changeset::new()
            .equipment(collections.equipment)
            .service_records(collections.service_records)
            .fuel_logs(collections.fuel_logs)
            .lubrication_points(collections.lubrication_points)
            .spare_parts(collections.spare_parts)
            .daily_reports(collections.daily_reports)
            .fuel_stock(collections.fuel_stock);
        self.commit("restore_backup", changes)?;
        info!(%timestamp, "backup restored");
        Ok(timestamp)
    }

    /// Removes every collection, the backup and the settings. Memory ends up
    /// empty on success, or matching whatever the store still holds on failure.
    pub fn clear_all_data(&mut self) -> TrackerResult<()> {
        let keys = Collection::ALL
            .iter()
            .map(|c| c.key())
            .chain([BACKUP_KEY, LAST_BACKUP_KEY, SETTINGS_KEY]);
        for key in keys {
            if let Err(err) = self.store().remove(key) {
                error!(key, error = %err, "clear failed part way");
                self.resync_from_store();
                return Err(err.into());
            }
        }
        self.reset_in_memory(Collections::default());
        info!("all data cleared");
        Ok(())
    }

    fn resync_from_store(&mut self) {
        match crate::db::load_all(self.store()) {
            Ok(loaded) => self.reset_in_memory(Collections {
                equipment: loaded.equipment.unwrap_or_default(),
                service_records: loaded.service_records.unwrap_or_default(),
                fuel_logs: loaded.fuel_logs.unwrap_or_default(),
                lubrication_points: loaded.lubrication_points.unwrap_or_default(),
                spare_parts: loaded.spare_parts.unwrap_or_default(),
                daily_reports: loaded.daily_reports.unwrap_or_default(),
                fuel_stock: loaded.fuel_stock,
            }),
            Err(err) => error!(error = %err, "could not reload after failed clear"),
        }
    }
}
