//! Report exporters. Every renderer is a pure function of the collections;
//! only [`write_export`] touches the filesystem.
mod csv_report;
mod summary;
mod text_report;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, NaiveDate};
use clap::ValueEnum;
use tracing::info;

use crate::types::Collections;

pub use csv_report::{
    custom_report_csv, fuel_logs_csv, inventory_csv, monthly_report_csv, service_history_csv,
};
pub use summary::{
    EquipmentBreakdown, FleetTotals, Month, MonthlySummary, fleet_totals, monthly_summary,
};
pub use text_report::{
    custom_report_text, fuel_logs_text, inventory_text, monthly_report_text, service_history_text,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Monthly,
    ServiceHistory,
    Inventory,
    FuelLogs,
    /// Built from a chosen set of [`ReportSection`]s.
    Custom,
}

impl ReportKind {
    pub fn report_name(self) -> &'static str {
        match self {
            ReportKind::Monthly => "MonthlyReport",
            ReportKind::ServiceHistory => "ServiceHistory",
            ReportKind::Inventory => "Inventory",
            ReportKind::FuelLogs => "FuelLogs",
            ReportKind::Custom => "CustomReport",
        }
    }
}

/// Parts of a custom report. They always print in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum ReportSection {
    Equipment,
    Services,
    Fuel,
    Lubrication,
    Inventory,
    FuelStock,
    Summary,
}

impl ReportSection {
    pub const ALL: [ReportSection; 7] = [
        ReportSection::Equipment,
        ReportSection::Services,
        ReportSection::Fuel,
        ReportSection::Lubrication,
        ReportSection::Inventory,
        ReportSection::FuelStock,
        ReportSection::Summary,
    ];

    /// Used when a custom report names no sections.
    pub const DEFAULT: [ReportSection; 5] = [
        ReportSection::Equipment,
        ReportSection::Services,
        ReportSection::Fuel,
        ReportSection::FuelStock,
        ReportSection::Summary,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ReportSection::Equipment => "equipment",
            ReportSection::Services => "services",
            ReportSection::Fuel => "fuel",
            ReportSection::Lubrication => "lubrication",
            ReportSection::Inventory => "inventory",
            ReportSection::FuelStock => "fuel-stock",
            ReportSection::Summary => "summary",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportSection::Equipment => "EQUIPMENT STATUS",
            ReportSection::Services => "SERVICE HISTORY",
            ReportSection::Fuel => "FUEL LOG",
            ReportSection::Lubrication => "LUBRICATION SCHEDULE",
            ReportSection::Inventory => "SPARE PARTS INVENTORY",
            ReportSection::FuelStock => "SITE FUEL STOCK",
            ReportSection::Summary => "SUMMARY",
        }
    }
}

/// Sorted into print order with duplicates dropped.
pub fn normalize_sections(sections: &[ReportSection]) -> Vec<ReportSection> {
    let mut sections = sections.to_vec();
    sections.sort();
    sections.dedup();
    sections
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Txt,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Txt => "txt",
        }
    }
}

/// `<ReportName>_<YYYY-MM-DD>.<ext>`
pub fn export_filename(kind: ReportKind, format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "{}_{}.{}",
        kind.report_name(),
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

#[derive(Clone, Debug)]
pub struct ExportRequest {
    pub kind: ReportKind,
    pub format: ExportFormat,
    /// Only the monthly report looks at this.
    pub month: Month,
    /// Only the custom report looks at this.
    pub sections: Vec<ReportSection>,
    pub generated_at: DateTime<Local>,
}

impl ExportRequest {
    pub fn filename(&self) -> String {
        export_filename(self.kind, self.format, self.generated_at.date_naive())
    }
}

pub fn render(data: &Collections, request: &ExportRequest) -> Result<String> {
    let at = request.generated_at;
    let sections = normalize_sections(&request.sections);
    let out = match (request.kind, request.format) {
        (ReportKind::Monthly, ExportFormat::Csv) => monthly_report_csv(data, request.month)?,
        (ReportKind::Monthly, ExportFormat::Txt) => monthly_report_text(data, request.month, at),
        (ReportKind::ServiceHistory, ExportFormat::Csv) => service_history_csv(data)?,
        (ReportKind::ServiceHistory, ExportFormat::Txt) => service_history_text(data, at),
        (ReportKind::Inventory, ExportFormat::Csv) => inventory_csv(data)?,
        (ReportKind::Inventory, ExportFormat::Txt) => inventory_text(data, at),
        (ReportKind::FuelLogs, ExportFormat::Csv) => fuel_logs_csv(data)?,
        (ReportKind::FuelLogs, ExportFormat::Txt) => fuel_logs_text(data, at),
        (ReportKind::Custom, _) if sections.is_empty() => {
            bail!("A custom report needs at least one section")
        }
        (ReportKind::Custom, ExportFormat::Csv) => {
            custom_report_csv(data, &sections, at.date_naive())?
        }
        (ReportKind::Custom, ExportFormat::Txt) => custom_report_text(data, &sections, at),
    };
    Ok(out)
}

/// Renders the report and writes it into `dir`, creating the directory if needed.
pub fn write_export(dir: &Path, data: &Collections, request: &ExportRequest) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    let path = dir.join(request.filename());
    let contents = render(data, request)?;
    fs::write(&path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), kind = ?request.kind, "report exported");
    Ok(path)
}

pub(crate) fn money(value: f64) -> String {
    format!("{value:.2}")
}

pub(crate) fn liters(value: f64) -> String {
    format!("{value:.1}")
}

/// Whole-number fill percentage, or `None` without a usable capacity.
pub(crate) fn fill_percent(level: f64, capacity: f64) -> Option<String> {
    (capacity > 0.0).then(|| format!("{:.0}", level / capacity * 100.0))
}

/// Stable, so same-day entries keep their logged order.
pub(crate) fn newest_first<T>(items: &[T], date: impl Fn(&T) -> NaiveDate) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| date(b).cmp(&date(a)));
    sorted
}
