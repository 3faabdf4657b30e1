//! Domain records shared by the store, the tracker and the exporters.
use std::fmt;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub type EquipmentId = String;
pub type ServiceRecordId = String;
pub type FuelLogId = String;
pub type LubricationPointId = String;
pub type PartId = String;
pub type DailyReportId = String;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentKind {
    Mixer,
    Loader,
    Generator,
}

impl EquipmentKind {
    pub fn label(self) -> &'static str {
        match self {
            EquipmentKind::Mixer => "Mixer",
            EquipmentKind::Loader => "Loader",
            EquipmentKind::Generator => "Generator",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: EquipmentId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EquipmentKind,
    pub display_name: String,
    pub current_hours: f64,
    pub service_interval_hours: f64,
    pub last_service_hours: f64,
    pub last_service_date: NaiveDate,
    /// Litres per working hour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_efficiency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_capacity: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentStatus {
    Good,
    Warning,
    Overdue,
}

impl fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EquipmentStatus::Good => "good",
            EquipmentStatus::Warning => "warning",
            EquipmentStatus::Overdue => "overdue",
        };
        f.write_str(label)
    }
}

/// A maintenance event logged against one machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub id: ServiceRecordId,
    pub equipment_id: EquipmentId,
    pub date: NaiveDate,
    pub hours_at_service: f64,
    pub service_type: String,
    pub parts_used: Vec<PartId>,
    pub cost: f64,
    pub technician: String,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelLog {
    pub id: FuelLogId,
    pub equipment_id: EquipmentId,
    pub date: NaiveDate,
    pub liters_added: f64,
    pub cost_per_liter: f64,
    pub total_cost: f64,
    pub hours_at_fueling: f64,
    pub notes: String,
}

impl FuelLog {
    /// Builds a log whose total cost is derived from litres and unit price.
    pub fn new(
        id: FuelLogId,
        equipment_id: EquipmentId,
        date: NaiveDate,
        liters_added: f64,
        cost_per_liter: f64,
        hours_at_fueling: f64,
        notes: String,
    ) -> Self {
        Self {
            id,
            equipment_id,
            date,
            liters_added,
            cost_per_liter,
            total_cost: liters_added * cost_per_liter,
            hours_at_fueling,
            notes,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub fn interval_days(self) -> i64 {
        match self {
            Frequency::Daily => 1,
            Frequency::Weekly => 7,
            Frequency::Monthly => 30,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LubricationStatus {
    Good,
    Due,
    Overdue,
}

impl LubricationStatus {
    pub fn label(self) -> &'static str {
        match self {
            LubricationStatus::Good => "Good",
            LubricationStatus::Due => "Due",
            LubricationStatus::Overdue => "Overdue",
        }
    }
}

/// A recurring greasing/oiling/inspection task.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LubricationPoint {
    pub id: LubricationPointId,
    pub name: String,
    /// Grease, oil or inspection.
    #[serde(rename = "type")]
    pub kind: String,
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_id: Option<EquipmentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_due: Option<NaiveDate>,
    pub status: LubricationStatus,
}

/// Which machines a spare part fits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PartFitment {
    Mixer,
    Loader,
    Generator,
    All,
}

impl PartFitment {
    pub fn fits(self, kind: EquipmentKind) -> bool {
        matches!(
            (self, kind),
            (PartFitment::All, _)
                | (PartFitment::Mixer, EquipmentKind::Mixer)
                | (PartFitment::Loader, EquipmentKind::Loader)
                | (PartFitment::Generator, EquipmentKind::Generator)
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            PartFitment::Mixer => "Mixer",
            PartFitment::Loader => "Loader",
            PartFitment::Generator => "Generator",
            PartFitment::All => "All",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartStatus {
    Adequate,
    Low,
    Critical,
}

impl PartStatus {
    pub fn label(self) -> &'static str {
        match self {
            PartStatus::Adequate => "Adequate",
            PartStatus::Low => "Low",
            PartStatus::Critical => "Critical",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SparePart {
    pub id: PartId,
    pub name: String,
    pub part_number: String,
    pub equipment: PartFitment,
    pub current_stock: u32,
    pub minimum_level: u32,
    /// Price per unit.
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: PartStatus,
}

/// The site's bulk fuel tank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelStock {
    pub current_liters: f64,
    pub capacity: f64,
    pub minimum_level: f64,
    pub last_updated: NaiveDate,
    pub notes: String,
}

impl FuelStock {
    pub fn is_below_minimum(&self) -> bool {
        self.current_liters < self.minimum_level
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Afternoon,
    Night,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentHoursEntry {
    pub equipment_id: EquipmentId,
    /// Hours worked during the shift, added on top of the machine's counter.
    pub hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batches: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_added: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub item_id: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

pub const CHECKLIST_ITEM_IDS: &[&str] = &[
    "safety_gear",
    "fire_extinguisher",
    "first_aid",
    "equipment_clean",
    "work_area_safe",
    "tools_organized",
    "fuel_levels",
    "oil_levels",
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub id: DailyReportId,
    pub date: NaiveDate,
    pub shift: Shift,
    pub equipment_data: Vec<EquipmentHoursEntry>,
    pub checklist_items: Vec<ChecklistItem>,
    pub operator: String,
    pub general_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Overdue,
    Warning,
    Info,
}

/// A derived notice; never persisted.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_id: Option<EquipmentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_id: Option<PartId>,
}

/// Every persisted collection held by the tracker.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collections {
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    #[serde(default)]
    pub service_records: Vec<ServiceRecord>,
    #[serde(default)]
    pub fuel_logs: Vec<FuelLog>,
    #[serde(default)]
    pub lubrication_points: Vec<LubricationPoint>,
    #[serde(default)]
    pub spare_parts: Vec<SparePart>,
    #[serde(default)]
    pub daily_reports: Vec<DailyReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_stock: Option<FuelStock>,
}

impl Collections {
    pub fn find_equipment(&self, id: &str) -> Option<&Equipment> {
        self.equipment.iter().find(|eq| eq.id == id)
    }

    pub fn find_part(&self, id: &str) -> Option<&SparePart> {
        self.spare_parts.iter().find(|part| part.id == id)
    }

    pub fn find_lubrication_point(&self, id: &str) -> Option<&LubricationPoint> {
        self.lubrication_points.iter().find(|point| point.id == id)
    }

    /// Display name for an equipment id, or "Unknown" when the id is dangling.
    pub fn equipment_name(&self, id: &str) -> &str {
        self.find_equipment(id)
            .map(|eq| eq.display_name.as_str())
            .unwrap_or("Unknown")
    }
}
