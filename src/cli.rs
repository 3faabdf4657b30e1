//! CLI argument parsing and command handling.
use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, builder::BoolishValueParser};

use crate::app::Tracker;
use crate::app::status::{equipment_status, hours_until_service, spare_part_status};
use crate::config::AppConfig;
use crate::db::Store;
use crate::export::{self, ExportFormat, ExportRequest, Month, ReportKind, ReportSection};
use crate::ids::new_id;
use crate::settings::{self, Toggle};
use crate::types::{
    CHECKLIST_ITEM_IDS, ChecklistItem, DailyReport, EquipmentHoursEntry, EquipmentStatus,
    FuelLog, FuelStock, LubricationStatus, PartFitment, PartStatus, ServiceRecord, Shift,
    SparePart,
};

#[derive(Parser)]
#[command(
    name = "fleetlog",
    version,
    about = "Fleetlog - maintenance tracking for construction site equipment"
)]
pub struct Cli {
    /// SQLite database file. Overrides the configured path.
    #[arg(long, global = true)]
    pub db: Option<String>,
    /// Config file to read instead of the default one.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fleet overview: hours, service state, fuel and stock
    Status,
    Alerts,
    /// Set a machine's hour counter
    Hours { equipment: String, hours: f64 },
    /// Log a service and move the machine's last-service marker
    Service {
        equipment: String,
        #[arg(short = 't', long = "type")]
        service_type: String,
        /// Defaults to the machine's current hours.
        #[arg(long)]
        hours: Option<f64>,
        #[arg(long, default_value_t = 0.0)]
        cost: f64,
        #[arg(long, default_value = "")]
        technician: String,
        #[arg(short = 'p', long = "part")]
        parts: Vec<String>,
        #[arg(short = 'n', long, default_value = "")]
        notes: String,
        /// YYYY-MM-DD, defaults to today.
        #[arg(short = 'd', long)]
        date: Option<String>,
    },
    /// Log a refuel from the site tank
    Fuel {
        equipment: String,
        liters: f64,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        hours: Option<f64>,
        #[arg(short = 'n', long, default_value = "")]
        notes: String,
        #[arg(short = 'd', long)]
        date: Option<String>,
    },
    Lube {
        #[command(subcommand)]
        command: LubeCommand,
    },
    Part {
        #[command(subcommand)]
        command: PartCommand,
    },
    /// Site fuel tank
    Stock {
        #[command(subcommand)]
        command: StockCommand,
    },
    /// File a shift report; each entry adds hours to a machine
    Daily {
        #[arg(long, value_enum)]
        shift: Shift,
        #[arg(long)]
        operator: String,
        /// EQUIPMENT=HOURS, repeatable.
        #[arg(short = 'e', long = "entry", value_parser = parse_entry, required = true)]
        entries: Vec<(String, f64)>,
        /// Checklist item ids that were completed, repeatable.
        #[arg(long = "done")]
        done: Vec<String>,
        #[arg(short = 'n', long, default_value = "")]
        notes: String,
        #[arg(short = 'd', long)]
        date: Option<String>,
    },
    Export {
        #[arg(value_enum)]
        kind: ReportKind,
        #[arg(long, value_enum, default_value_t)]
        format: ExportFormat,
        /// YYYY-MM, defaults to the current month.
        #[arg(long)]
        month: Option<Month>,
        /// Sections of a custom report, comma separated or repeated.
        #[arg(long = "section", value_enum, value_delimiter = ',')]
        sections: Vec<ReportSection>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Backup,
    Restore,
    /// Wipe every collection, the backup and the settings
    Clear {
        #[arg(long)]
        yes: bool,
    },
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum LubeCommand {
    Done { point: String },
    /// Complete every weekly point
    Weekly,
    List,
}

#[derive(Subcommand, Debug)]
pub enum PartCommand {
    Add {
        name: String,
        #[arg(long)]
        part_number: String,
        #[arg(long, value_enum, default_value = "all")]
        fits: PartFitment,
        #[arg(long)]
        stock: u32,
        #[arg(long)]
        minimum: u32,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        supplier: Option<String>,
        #[arg(short = 'n', long)]
        notes: Option<String>,
    },
    Stock { part: String, count: u32 },
    Delete { part: String },
    List,
    /// Total stock value
    Value,
}

#[derive(Subcommand, Debug)]
pub enum StockCommand {
    Show,
    Add {
        liters: f64,
        #[arg(short = 'n', long, default_value = "")]
        notes: String,
    },
    Remove {
        liters: f64,
        #[arg(short = 'n', long, default_value = "")]
        notes: String,
    },
    /// Replace the tank record; capacity and minimum default to the current ones
    Set {
        current: f64,
        #[arg(long)]
        capacity: Option<f64>,
        #[arg(long)]
        minimum: Option<f64>,
        #[arg(short = 'n', long, default_value = "")]
        notes: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    Show,
    Set {
        #[arg(value_enum)]
        toggle: Toggle,
        #[arg(value_parser = BoolishValueParser::new(), action = ArgAction::Set)]
        value: bool,
    },
}

/// Execute a CLI command against an initialized tracker.
pub fn run<S: Store>(command: Command, tracker: &mut Tracker<S>, config: &AppConfig) -> Result<()> {
    match command {
        Command::Status => print_status(tracker),
        Command::Alerts => print_alerts(tracker),
        Command::Hours { equipment, hours } => handle_hours(equipment, hours, tracker)?,
        Command::Service {
            equipment,
            service_type,
            hours,
            cost,
            technician,
            parts,
            notes,
            date,
        } => {
            let Some(machine) = tracker.collections().find_equipment(&equipment) else {
                println!("Equipment '{equipment}' not found");
                return Ok(());
            };
            let record = ServiceRecord {
                id: new_id("service", tracker.clock()),
                equipment_id: equipment,
                date: parse_optional_date(date)?.unwrap_or_else(|| tracker.clock().today()),
                hours_at_service: hours.unwrap_or(machine.current_hours),
                service_type,
                parts_used: parts,
                cost,
                technician,
                notes,
                photos: None,
            };
            let id = record.id.clone();
            tracker.add_service_record(record)?;
            println!("Logged service {id}");
        }
        Command::Fuel {
            equipment,
            liters,
            price,
            hours,
            notes,
            date,
        } => {
            let Some(machine) = tracker.collections().find_equipment(&equipment) else {
                println!("Equipment '{equipment}' not found");
                return Ok(());
            };
            let log = FuelLog::new(
                new_id("fuel", tracker.clock()),
                equipment,
                parse_optional_date(date)?.unwrap_or_else(|| tracker.clock().today()),
                liters,
                price,
                hours.unwrap_or(machine.current_hours),
                notes,
            );
            let total = log.total_cost;
            tracker.add_fuel_log(log)?;
            println!("Logged {liters:.1} L (€{total:.2})");
            if let Some(stock) = &tracker.collections().fuel_stock {
                println!("Site tank now at {:.1} L", stock.current_liters);
            }
        }
        Command::Lube { command } => handle_lube(command, tracker)?,
        Command::Part { command } => handle_part(command, tracker)?,
        Command::Stock { command } => handle_stock(command, tracker)?,
        Command::Daily {
            shift,
            operator,
            entries,
            done,
            notes,
            date,
        } => handle_daily(shift, operator, entries, done, notes, date, tracker)?,
        Command::Export {
            kind,
            format,
            month,
            sections,
            out,
        } => {
            let sections = if sections.is_empty() {
                ReportSection::DEFAULT.to_vec()
            } else {
                sections
            };
            let request = ExportRequest {
                kind,
                format,
                month: month.unwrap_or_else(|| Month::of(tracker.clock().today())),
                sections,
                generated_at: tracker.clock().now(),
            };
            let dir = out
                .or_else(|| config.export_dir.clone())
                .unwrap_or_else(|| PathBuf::from("."));
            let path = export::write_export(&dir, tracker.collections(), &request)?;
            println!("Wrote {}", path.display());
        }
        Command::Backup => {
            if let Some(previous) = tracker.last_backup()? {
                println!("Replacing backup from {}", previous.to_rfc3339());
            }
            let bundle = tracker.create_backup()?;
            println!("Backup written at {}", bundle.timestamp.to_rfc3339());
        }
        Command::Restore => {
            let taken_at = tracker.restore_backup()?;
            println!("Restored backup from {}", taken_at.to_rfc3339());
        }
        Command::Clear { yes } => {
            if !yes {
                println!("This deletes all data, the backup and the settings. Re-run with --yes.");
                return Ok(());
            }
            tracker.clear_all_data()?;
            println!("All data cleared. Sample data is loaded again on the next run.");
        }
        Command::Settings { command } => handle_settings(command, tracker)?,
    }
    Ok(())
}

/// The overview printed when no command is given.
pub fn print_status<S: Store>(tracker: &Tracker<S>) {
    let data = tracker.collections();
    println!("Equipment");
    for eq in &data.equipment {
        let status = match equipment_status(eq) {
            EquipmentStatus::Good => "ok".to_string(),
            other => other.to_string().to_uppercase(),
        };
        let fuel = match (eq.fuel_level, eq.fuel_capacity) {
            (Some(level), Some(capacity)) => format!("  fuel {level:.1}/{capacity:.1} L"),
            _ => String::new(),
        };
        println!(
            "  {:<28} {:>9.1} h  next service in {:>6.1} h  [{status}]{fuel}",
            eq.display_name,
            eq.current_hours,
            hours_until_service(eq),
        );
    }

    match &data.fuel_stock {
        Some(stock) => println!(
            "Site fuel: {:.1} / {:.1} L (minimum {:.1}){}",
            stock.current_liters,
            stock.capacity,
            stock.minimum_level,
            if stock.is_below_minimum() { "  LOW" } else { "" }
        ),
        None => println!("Site fuel: no tank configured"),
    }

    let count = |wanted: PartStatus| {
        data.spare_parts
            .iter()
            .filter(|p| spare_part_status(p) == wanted)
            .count()
    };
    println!(
        "Spare parts: {} (value €{:.2}), {} critical, {} low",
        data.spare_parts.len(),
        tracker.total_inventory_value(),
        count(PartStatus::Critical),
        count(PartStatus::Low)
    );

    let lube = |wanted: LubricationStatus| {
        data.lubrication_points
            .iter()
            .filter(|p| tracker.lubrication_status(p) == wanted)
            .count()
    };
    println!(
        "Lubrication: {} points, {} overdue, {} due today",
        data.lubrication_points.len(),
        lube(LubricationStatus::Overdue),
        lube(LubricationStatus::Due)
    );
    println!("Alerts: {}", tracker.alerts().len());
}

fn print_alerts<S: Store>(tracker: &Tracker<S>) {
    if tracker.alerts().is_empty() {
        println!("No alerts.");
        return;
    }
    for alert in tracker.alerts() {
        let kind = format!("{:?}", alert.kind).to_lowercase();
        println!("[{kind}] {}: {}", alert.title, alert.message);
    }
}

fn handle_hours<S: Store>(equipment: String, hours: f64, tracker: &mut Tracker<S>) -> Result<()> {
    tracker.update_equipment_hours(&equipment, hours)?;
    if let Some(eq) = tracker.collections().find_equipment(&equipment) {
        println!(
            "{} at {:.1} h, next service in {:.1} h [{}]",
            eq.display_name,
            eq.current_hours,
            hours_until_service(eq),
            equipment_status(eq)
        );
    }
    Ok(())
}

fn handle_lube<S: Store>(command: LubeCommand, tracker: &mut Tracker<S>) -> Result<()> {
    match command {
        LubeCommand::Done { point } => {
            tracker.mark_lubrication_complete(&point)?;
            if let Some(p) = tracker.collections().find_lubrication_point(&point) {
                let next = p.next_due.map(|d| d.to_string()).unwrap_or_default();
                println!("{} done, next due {next}", p.name);
            }
        }
        LubeCommand::Weekly => {
            let marked = tracker.mark_weekly_lubrication_complete()?;
            println!("Marked {marked} weekly point(s) complete");
        }
        LubeCommand::List => {
            let data = tracker.collections();
            for p in &data.lubrication_points {
                let machine = p
                    .equipment_id
                    .as_deref()
                    .map(|id| data.equipment_name(id))
                    .unwrap_or("-");
                let next = p.next_due.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
                let status = tracker.lubrication_status(p).label().to_lowercase();
                println!(
                    "  {:<24} {:<28} {:<24} {:<8} next {next:<10} [{status}]",
                    p.id,
                    p.name,
                    machine,
                    p.frequency.label().to_lowercase()
                );
            }
        }
    }
    Ok(())
}

fn handle_part<S: Store>(command: PartCommand, tracker: &mut Tracker<S>) -> Result<()> {
    match command {
        PartCommand::Add {
            name,
            part_number,
            fits,
            stock,
            minimum,
            price,
            supplier,
            notes,
        } => {
            let part = SparePart {
                id: new_id("part", tracker.clock()),
                name,
                part_number,
                equipment: fits,
                current_stock: stock,
                minimum_level: minimum,
                price,
                supplier,
                notes,
                status: PartStatus::Adequate,
            };
            let id = part.id.clone();
            tracker.add_spare_part(part)?;
            println!("Added part {id}");
        }
        PartCommand::Stock { part, count } => {
            tracker.update_part_stock(&part, count)?;
            if let Some(p) = tracker.collections().find_part(&part) {
                println!("{}: {} in stock [{}]", p.name, p.current_stock, p.status.label());
            }
        }
        PartCommand::Delete { part } => {
            tracker.delete_spare_part(&part)?;
            println!("Deleted part {part}");
        }
        PartCommand::List => {
            for p in &tracker.collections().spare_parts {
                println!(
                    "  {:<24} {:<28} {:<10} {:>4}/{:<4} {:<9} €{:.2}",
                    p.id,
                    p.name,
                    p.equipment.label(),
                    p.current_stock,
                    p.minimum_level,
                    tracker.part_status(p).label(),
                    f64::from(p.current_stock) * p.price
                );
            }
        }
        PartCommand::Value => println!("Inventory value: €{:.2}", tracker.total_inventory_value()),
    }
    Ok(())
}

fn handle_stock<S: Store>(command: StockCommand, tracker: &mut Tracker<S>) -> Result<()> {
    match command {
        StockCommand::Show => {}
        StockCommand::Add { liters, notes } => tracker.add_fuel_to_stock(liters, &notes)?,
        StockCommand::Remove { liters, notes } => tracker.remove_fuel_from_stock(liters, &notes)?,
        StockCommand::Set {
            current,
            capacity,
            minimum,
            notes,
        } => {
            let existing = tracker.collections().fuel_stock.as_ref();
            let Some(capacity) = capacity.or(existing.map(|s| s.capacity)) else {
                bail!("No site tank yet, --capacity is required");
            };
            let minimum_level = minimum.or(existing.map(|s| s.minimum_level)).unwrap_or(0.0);
            tracker.set_fuel_stock(FuelStock {
                current_liters: current,
                capacity,
                minimum_level,
                last_updated: tracker.clock().today(),
                notes,
            })?;
        }
    }
    match &tracker.collections().fuel_stock {
        Some(stock) => println!(
            "Site fuel: {:.1} / {:.1} L (minimum {:.1}), updated {}{}",
            stock.current_liters,
            stock.capacity,
            stock.minimum_level,
            stock.last_updated,
            if stock.is_below_minimum() { "  LOW" } else { "" }
        ),
        None => println!("No site tank configured"),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_daily<S: Store>(
    shift: Shift,
    operator: String,
    entries: Vec<(String, f64)>,
    done: Vec<String>,
    notes: String,
    date: Option<String>,
    tracker: &mut Tracker<S>,
) -> Result<()> {
    for item in &done {
        if !CHECKLIST_ITEM_IDS.contains(&item.as_str()) {
            println!("Unknown checklist item '{item}', ignoring it.");
        }
    }
    let report = DailyReport {
        id: new_id("report", tracker.clock()),
        date: parse_optional_date(date)?.unwrap_or_else(|| tracker.clock().today()),
        shift,
        equipment_data: entries
            .into_iter()
            .map(|(equipment_id, hours)| EquipmentHoursEntry {
                equipment_id,
                hours,
                batches: None,
                fuel_added: None,
            })
            .collect(),
        checklist_items: CHECKLIST_ITEM_IDS
            .iter()
            .map(|id| ChecklistItem {
                item_id: (*id).to_string(),
                completed: done.iter().any(|d| d == id),
                notes: None,
            })
            .collect(),
        operator,
        general_notes: notes,
        photos: None,
    };
    let id = report.id.clone();
    tracker.add_daily_report(report)?;
    println!("Filed daily report {id}");
    Ok(())
}

fn handle_settings<S: Store>(command: SettingsCommand, tracker: &Tracker<S>) -> Result<()> {
    let current = match command {
        SettingsCommand::Show => settings::load_settings(tracker.store())?,
        SettingsCommand::Set { toggle, value } => {
            settings::set_toggle(tracker.store(), toggle, value)?
        }
    };
    for toggle in Toggle::ALL {
        let state = if current.get(toggle) { "on" } else { "off" };
        println!("  {:<20} {state}", toggle.label());
    }
    Ok(())
}

fn parse_entry(value: &str) -> Result<(String, f64), String> {
    let (equipment, hours) = value
        .split_once('=')
        .ok_or_else(|| format!("'{value}' should look like EQUIPMENT=HOURS"))?;
    let hours = hours
        .trim()
        .parse()
        .map_err(|_| format!("'{hours}' is not a number of hours"))?;
    Ok((equipment.trim().to_string(), hours))
}

fn parse_optional_date(value: Option<String>) -> Result<Option<NaiveDate>> {
    match value {
        Some(s) => Ok(Some(NaiveDate::parse_from_str(&s, "%Y-%m-%d")?)),
        None => Ok(None),
    }
}
