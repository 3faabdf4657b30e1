use tracing::info;

use crate::app::state::{Changeset, Tracker, ensure_non_negative, ensure_present};
use crate::app::status::{part_status, spare_part_status, total_inventory_value};
use crate::db::Store;
use crate::error::{TrackerError, TrackerResult};
use crate::types::{PartStatus, SparePart};

impl<S: Store> Tracker<S> {
    /// Sets the stock count; the status is recomputed in the same write.
    pub fn update_part_stock(&mut self, part_id: &str, new_stock: u32) -> TrackerResult<()> {
        let index = self.part_index(part_id)?;
        let mut parts = self.data.spare_parts.clone();
        let part = &mut parts[index];
        part.current_stock = new_stock;
        part.status = part_status(new_stock, part.minimum_level);
        self.commit("update_part_stock", Changeset::new().spare_parts(parts))
    }

    /// Adds a part. Any status on the input is replaced by the derived one.
    pub fn add_spare_part(&mut self, mut part: SparePart) -> TrackerResult<()> {
        ensure_present(&part.id, "part id")?;
        ensure_present(&part.name, "part name")?;
        ensure_non_negative(part.price, "price")?;
        if self.data.spare_parts.iter().any(|p| p.id == part.id) {
            return Err(TrackerError::invalid(format!("part '{}' already exists", part.id)));
        }
        part.status = spare_part_status(&part);

        let mut parts = self.data.spare_parts.clone();
        parts.push(part);
        self.commit("add_spare_part", Changeset::new().spare_parts(parts))
    }

    pub fn delete_spare_part(&mut self, part_id: &str) -> TrackerResult<()> {
        let index = self.part_index(part_id)?;
        let mut parts = self.data.spare_parts.clone();
        let removed = parts.remove(index);
        self.commit("delete_spare_part", Changeset::new().spare_parts(parts))?;
        info!(part_id = %removed.id, name = %removed.name, "spare part deleted");
        Ok(())
    }

    pub fn part_status(&self, part: &SparePart) -> PartStatus {
        spare_part_status(part)
    }

    pub fn total_inventory_value(&self) -> f64 {
        total_inventory_value(&self.data.spare_parts)
    }

    fn part_index(&self, part_id: &str) -> TrackerResult<usize> {
        self.data
            .spare_parts
            .iter()
            .position(|p| p.id == part_id)
            .ok_or_else(|| TrackerError::not_found("spare part", part_id))
    }
}

#[cfg(test)]
mod tests {
    use crate::app::test_support::*;
    use crate::db::Collection;
    use crate::error::TrackerError;
    use crate::types::PartStatus;

    #[test]
    fn stock_and_status_move_together() {
        let mut tracker = tracker();
        tracker.update_part_stock("p1", 4).unwrap();
        let p1 = &tracker.collections().spare_parts[0];
        assert_eq!((p1.current_stock, p1.status), (4, PartStatus::Critical));
        assert_eq!(reload(&tracker).spare_parts[0].status, PartStatus::Critical);
        assert_eq!(tracker.alerts().last().unwrap().id, "alert-inventory-p1");

        tracker.update_part_stock("p1", 5).unwrap();
        assert_eq!(tracker.collections().spare_parts[0].status, PartStatus::Low);
        tracker.update_part_stock("p1", 6).unwrap();
        assert_eq!(tracker.collections().spare_parts[0].status, PartStatus::Adequate);
    }

    #[test]
    fn added_part_gets_derived_status() {
        let mut tracker = tracker();
        let mut new_part = part("p3", 1, 3, 7.0);
        new_part.status = PartStatus::Adequate;
        tracker.add_spare_part(new_part).unwrap();
        assert_eq!(tracker.collections().spare_parts[2].status, PartStatus::Critical);
        assert_eq!(reload(&tracker).spare_parts.len(), 3);
        assert!(matches!(
            tracker.add_spare_part(part("p3", 9, 1, 1.0)),
            Err(TrackerError::Validation(_))
        ));
    }

    #[test]
    fn delete_removes_part_durably() {
        let mut tracker = tracker();
        tracker.delete_spare_part("p1").unwrap();
        assert_eq!(tracker.collections().spare_parts.len(), 1);
        assert_eq!(reload(&tracker).spare_parts[0].id, "p2");
        assert!(matches!(
            tracker.delete_spare_part("p1"),
            Err(TrackerError::NotFound { .. })
        ));
    }

    #[test]
    fn inventory_value_sums_stock_times_price() {
        let mut tracker = tracker();
        assert!((tracker.total_inventory_value() - 225.0).abs() < 1e-9);
        tracker.update_part_stock("p2", 0).unwrap();
        assert!((tracker.total_inventory_value() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn failed_stock_write_keeps_old_stock_and_status() {
        let mut tracker = tracker();
        tracker.store().fail_saves_to(Collection::SpareParts);
        assert!(tracker.update_part_stock("p1", 0).is_err());
        let p1 = &tracker.collections().spare_parts[0];
        assert_eq!((p1.current_stock, p1.status), (20, PartStatus::Adequate));
        assert_eq!(tracker.alerts().len(), 1);
    }
}
