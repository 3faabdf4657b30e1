use chrono::NaiveDate;

use crate::app::state::{Changeset, Tracker};
use crate::app::status::{lubrication_status, next_due};
use crate::db::Store;
use crate::error::{TrackerError, TrackerResult};
use crate::types::{Frequency, LubricationPoint, LubricationStatus};

fn complete(point: &mut LubricationPoint, today: NaiveDate) {
    point.last_completed = Some(today);
    point.next_due = Some(next_due(point.frequency, today));
    point.status = LubricationStatus::Good;
}

impl<S: Store> Tracker<S> {
    /// Marks a point done today. The next due date always counts from today,
    /// never from the previous due date.
    pub fn mark_lubrication_complete(&mut self, point_id: &str) -> TrackerResult<()> {
        let index = self
            .data
            .lubrication_points
            .iter()
            .position(|p| p.id == point_id)
            .ok_or_else(|| TrackerError::not_found("lubrication point", point_id))?;

        let today = self.clock.today();
        let mut points = self.data.lubrication_points.clone();
        complete(&mut points[index], today);
        self.commit("mark_lubrication_complete", Changeset::new().lubrication_points(points))
    }

    /// Completes every weekly point in one write. Returns how many were marked.
    pub fn mark_weekly_lubrication_complete(&mut self) -> TrackerResult<usize> {
        let today = self.clock.today();
        let mut points = self.data.lubrication_points.clone();
        let mut marked = 0;
        for point in points.iter_mut().filter(|p| p.frequency == Frequency::Weekly) {
            complete(point, today);
            marked += 1;
        }
        if marked == 0 {
            return Ok(0);
        }
        self.commit(
            "mark_weekly_lubrication_complete",
            Changeset::new().lubrication_points(points),
        )?;
        Ok(marked)
    }

    pub fn lubrication_status(&self, point: &LubricationPoint) -> LubricationStatus {
        lubrication_status(point, self.clock.today())
    }
}
