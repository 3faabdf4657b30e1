use tracing::{info, warn};

use crate::app::state::{Changeset, Tracker, ensure_non_negative, ensure_positive, ensure_present};
use crate::db::Store;
use crate::error::{Rejection, TrackerError, TrackerResult};
use crate::types::{FuelLog, FuelStock};

/// Absorbs float noise when comparing litre totals against a capacity.
const LITER_EPSILON: f64 = 1e-9;

impl<S: Store> Tracker<S> {
    /// Logs fuel dispensed into a machine from the site tank.
    ///
    /// Refused when the machine's tank would overflow or the site tank holds
    /// too little. On success the log, the site tank and the machine's fuel
    /// level are written together, in that order.
    pub fn add_fuel_log(&mut self, log: FuelLog) -> TrackerResult<()> {
        ensure_present(&log.id, "fuel log id")?;
        ensure_positive(log.liters_added, "liters added")?;
        ensure_non_negative(log.cost_per_liter, "cost per liter")?;
        ensure_non_negative(log.total_cost, "total cost")?;
        ensure_non_negative(log.hours_at_fueling, "hours at fueling")?;
        if self.data.fuel_logs.iter().any(|l| l.id == log.id) {
            return Err(TrackerError::invalid(format!(
                "fuel log '{}' already exists",
                log.id
            )));
        }
        let index = self.equipment_index(&log.equipment_id)?;
        let liters = log.liters_added;

        let machine = &self.data.equipment[index];
        let level = machine.fuel_level.unwrap_or(0.0);
        if let Some(capacity) = machine.fuel_capacity {
            if level + liters > capacity + LITER_EPSILON {
                let rejection = Rejection::TankOverCapacity {
                    equipment: machine.display_name.clone(),
                    level,
                    liters,
                    capacity,
                };
                warn!(equipment_id = %machine.id, %rejection, "fuel log refused");
                return Err(rejection.into());
            }
        }
        let refill_level = (machine.fuel_level.is_some() || machine.fuel_capacity.is_some())
            .then_some(level + liters);

        let stock = match &self.data.fuel_stock {
            Some(stock) if liters > stock.current_liters + LITER_EPSILON => {
                let rejection = Rejection::InsufficientSiteFuel {
                    requested: liters,
                    available: stock.current_liters,
                };
                warn!(%rejection, "fuel log refused");
                return Err(rejection.into());
            }
            Some(stock) => Some(FuelStock {
                current_liters: stock.current_liters - liters,
                last_updated: log.date,
                ..stock.clone()
            }),
            None => None,
        };

        let mut logs = self.data.fuel_logs.clone();
        logs.push(log);
        let mut changes = Changeset::new().fuel_logs(logs);
        if stock.is_some() {
            changes = changes.fuel_stock(stock);
        }
        if let Some(new_level) = refill_level {
            let mut equipment = self.data.equipment.clone();
            equipment[index].fuel_level = Some(new_level);
            changes = changes.equipment(equipment);
        }
        self.commit("add_fuel_log", changes)
    }

    /// Delivery into the site tank.
    pub fn add_fuel_to_stock(&mut self, liters: f64, notes: &str) -> TrackerResult<()> {
        ensure_positive(liters, "liters")?;
        let stock = self.data.fuel_stock.as_ref().ok_or(Rejection::NoFuelStock)?;
        if stock.current_liters + liters > stock.capacity + LITER_EPSILON {
            return Err(Rejection::SiteTankOverCapacity {
                current: stock.current_liters,
                liters,
                capacity: stock.capacity,
            }
            .into());
        }
        let updated = FuelStock {
            current_liters: stock.current_liters + liters,
            last_updated: self.clock.today(),
            notes: notes.to_string(),
            ..stock.clone()
        };
        info!(liters, total = updated.current_liters, "fuel delivered to site tank");
        self.commit("add_fuel_to_stock", Changeset::new().fuel_stock(Some(updated)))
    }

    /// Fuel taken from the site tank for anything other than a logged machine.
    pub fn remove_fuel_from_stock(&mut self, liters: f64, notes: &str) -> TrackerResult<()> {
        ensure_positive(liters, "liters")?;
        let stock = self.data.fuel_stock.as_ref().ok_or(Rejection::NoFuelStock)?;
        if liters > stock.current_liters + LITER_EPSILON {
            return Err(Rejection::InsufficientSiteFuel {
                requested: liters,
                available: stock.current_liters,
            }
            .into());
        }
        let updated = FuelStock {
            current_liters: stock.current_liters - liters,
            last_updated: self.clock.today(),
            notes: notes.to_string(),
            ..stock.clone()
        };
        self.commit("remove_fuel_from_stock", Changeset::new().fuel_stock(Some(updated)))
    }

    pub fn set_fuel_stock(&mut self, stock: FuelStock) -> TrackerResult<()> {
        ensure_non_negative(stock.current_liters, "current liters")?;
        ensure_positive(stock.capacity, "capacity")?;
        ensure_non_negative(stock.minimum_level, "minimum level")?;
        if stock.current_liters > stock.capacity {
            return Err(TrackerError::invalid("current liters exceed tank capacity"));
        }
        self.commit("set_fuel_stock", Changeset::new().fuel_stock(Some(stock)))
    }
}
