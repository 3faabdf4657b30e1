//! User preference toggles, stored apart from the domain collections.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::db::{SETTINGS_KEY, Store, load_json, save_json};
use crate::error::StoreError;

fn enabled() -> bool {
    true
}

/// Every toggle defaults to on, including ones missing from an older bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "enabled")]
    pub notifications_enabled: bool,
    #[serde(default = "enabled")]
    pub maintenance_alerts: bool,
    #[serde(default = "enabled")]
    pub inventory_alerts: bool,
    #[serde(default = "enabled")]
    pub sound_enabled: bool,
    #[serde(default = "enabled")]
    pub vibration_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            maintenance_alerts: true,
            inventory_alerts: true,
            sound_enabled: true,
            vibration_enabled: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    Notifications,
    MaintenanceAlerts,
    InventoryAlerts,
    Sound,
    Vibration,
}

impl Toggle {
    pub const ALL: [Toggle; 5] = [
        Toggle::Notifications,
        Toggle::MaintenanceAlerts,
        Toggle::InventoryAlerts,
        Toggle::Sound,
        Toggle::Vibration,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Toggle::Notifications => "notifications",
            Toggle::MaintenanceAlerts => "maintenance-alerts",
            Toggle::InventoryAlerts => "inventory-alerts",
            Toggle::Sound => "sound",
            Toggle::Vibration => "vibration",
        }
    }
}

impl Settings {
    pub fn get(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Notifications => self.notifications_enabled,
            Toggle::MaintenanceAlerts => self.maintenance_alerts,
            Toggle::InventoryAlerts => self.inventory_alerts,
            Toggle::Sound => self.sound_enabled,
            Toggle::Vibration => self.vibration_enabled,
        }
    }

    pub fn set(&mut self, toggle: Toggle, value: bool) {
        let slot = match toggle {
            Toggle::Notifications => &mut self.notifications_enabled,
            Toggle::MaintenanceAlerts => &mut self.maintenance_alerts,
            Toggle::InventoryAlerts => &mut self.inventory_alerts,
            Toggle::Sound => &mut self.sound_enabled,
            Toggle::Vibration => &mut self.vibration_enabled,
        };
        *slot = value;
    }
}

pub fn load_settings(store: &impl Store) -> Result<Settings, StoreError> {
    Ok(load_json(store, SETTINGS_KEY)?.unwrap_or_default())
}

pub fn save_settings(store: &impl Store, settings: &Settings) -> Result<(), StoreError> {
    save_json(store, SETTINGS_KEY, settings)
}

/// Read-modify-write of a single toggle.
pub fn set_toggle(store: &impl Store, toggle: Toggle, value: bool) -> Result<Settings, StoreError> {
    let mut settings = load_settings(store)?;
    settings.set(toggle, value);
    save_settings(store, &settings)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{SqliteStore, init_in_memory};

    #[test]
    fn missing_bundle_means_everything_on() {
        let store = SqliteStore::new(init_in_memory().unwrap());
        let settings = load_settings(&store).unwrap();
        assert!(Toggle::ALL.iter().all(|t| settings.get(*t)));
    }

    #[test]
    fn toggles_persist_individually() {
        let store = SqliteStore::new(init_in_memory().unwrap());
        set_toggle(&store, Toggle::Sound, false).unwrap();
        set_toggle(&store, Toggle::InventoryAlerts, false).unwrap();
        let settings = load_settings(&store).unwrap();
        assert!(!settings.sound_enabled);
        assert!(!settings.inventory_alerts);
        assert!(settings.vibration_enabled);
    }

    #[test]
    fn partial_bundle_fills_in_defaults() {
        let store = SqliteStore::new(init_in_memory().unwrap());
        store.save(SETTINGS_KEY, r#"{"soundEnabled":false}"#).unwrap();
        let settings = load_settings(&store).unwrap();
        assert!(!settings.sound_enabled);
        assert!(settings.notifications_enabled);
    }
}
