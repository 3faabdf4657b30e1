use tracing::warn;

use crate::app::state::{Changeset, Tracker, ensure_non_negative};
use crate::app::status::{equipment_status, hours_until_service};
use crate::db::Store;
use crate::error::TrackerResult;
use crate::types::{Equipment, EquipmentStatus};

impl<S: Store> Tracker<S> {
    /// Replaces one machine's hour counter.
    ///
    /// Backward corrections are accepted: the counter is whatever the operator
    /// last typed. Only non-numeric and negative readings are refused.
    pub fn update_equipment_hours(&mut self, equipment_id: &str, new_hours: f64) -> TrackerResult<()> {
        ensure_non_negative(new_hours, "hours")?;
        let index = self.equipment_index(equipment_id)?;

        let previous = self.data.equipment[index].current_hours;
        if new_hours < previous {
            warn!(equipment_id, previous, new_hours, "hour counter moved backwards");
        }

        let mut equipment = self.data.equipment.clone();
        equipment[index].current_hours = new_hours;
        self.commit("update_equipment_hours", Changeset::new().equipment(equipment))
    }

    pub fn equipment_status(&self, equipment: &Equipment) -> EquipmentStatus {
        equipment_status(equipment)
    }

    pub fn hours_until_service(&self, equipment: &Equipment) -> f64 {
        hours_until_service(equipment)
    }
}
