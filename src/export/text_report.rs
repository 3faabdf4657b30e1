use chrono::{DateTime, Local, NaiveDate};

use crate::app::status::{
    equipment_status, hours_until_service, lubrication_status, spare_part_status,
    total_inventory_value,
};
use crate::export::summary::{Month, fleet_totals, monthly_summary};
use crate::export::{ReportSection, fill_percent, liters, money, newest_first};
use crate::types::{Collections, PartStatus};

const NARROW: usize = 80;
const WIDE: usize = 100;

struct Report {
    width: usize,
    lines: Vec<String>,
}

impl Report {
    fn new(width: usize, title: &str, subtitle: Option<String>) -> Self {
        let mut report = Self {
            width,
            lines: Vec::new(),
        };
        report.banner();
        report.push(title);
        if let Some(subtitle) = subtitle {
            report.push(subtitle);
        }
        report.banner();
        report.blank();
        report
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn banner(&mut self) {
        self.lines.push("=".repeat(self.width));
    }

    fn rule(&mut self) {
        self.lines.push("-".repeat(self.width));
    }

    fn section(&mut self, heading: &str) {
        self.push(heading);
        self.rule();
    }

    fn finish(mut self, generated_at: DateTime<Local>) -> String {
        self.banner();
        self.push(format!(
            "Generated: {}",
            generated_at.format("%Y-%m-%d %H:%M")
        ));
        self.banner();
        self.lines.join("\n")
    }
}

fn columns(name: &str, hours: &str, fuel: &str, cost: &str) -> String {
    format!("{name:<30} {hours:<10} {fuel:<15} {cost:<15}")
}

pub fn monthly_report_text(data: &Collections, month: Month, generated_at: DateTime<Local>) -> String {
    let summary = monthly_summary(data, month);
    let mut report = Report::new(NARROW, "FLEET MONTHLY REPORT", Some(format!("Month: {month}")));

    report.section("EQUIPMENT BREAKDOWN");
    report.push(columns("Equipment", "Hours", "Fuel (L)", "Cost (€)"));
    report.rule();
    for b in &summary.equipment {
        report.push(columns(
            &b.display_name,
            &b.total_hours.to_string(),
            &liters(b.total_fuel),
            &money(b.total_cost()),
        ));
    }
    report.rule();
    report.push(columns(
        "TOTAL",
        "",
        &liters(summary.total_fuel),
        &money(summary.total_cost()),
    ));
    report.blank();

    report.section("KEY METRICS");
    report.push(format!(
        "Average fuel consumption: {} L/h",
        money(summary.average_fuel_consumption)
    ));
    report.push(format!("Cost per working hour: €{}/h", money(summary.cost_per_hour)));
    report.push(format!("Total working hours: {}h", summary.total_hours));
    report.push(format!("Services: {}", summary.service_count));
    report.blank();

    let services: Vec<_> = data
        .service_records
        .iter()
        .filter(|r| month.contains(r.date))
        .collect();
    if !services.is_empty() {
        report.section("SERVICES PERFORMED");
        for r in services {
            report.push(format!(
                "{} - {}: {} (€{})",
                r.date,
                data.equipment_name(&r.equipment_id),
                r.service_type,
                money(r.cost)
            ));
        }
        report.blank();
    }

    report.finish(generated_at)
}

pub fn service_history_text(data: &Collections, generated_at: DateTime<Local>) -> String {
    let mut report = Report::new(WIDE, "SERVICE HISTORY", None);
    if data.service_records.is_empty() {
        report.push("No service records on file.");
        report.blank();
        return report.finish(generated_at);
    }

    report.section("COMPLETE SERVICE HISTORY");
    for (index, r) in data.service_records.iter().enumerate() {
        report.push(format!("[{}] {}", index + 1, r.date));
        report.push(format!("    Equipment: {}", data.equipment_name(&r.equipment_id)));
        report.push(format!("    Service type: {}", r.service_type));
        report.push(format!("    Hours at service: {}", r.hours_at_service));
        report.push(format!("    Cost: €{}", money(r.cost)));
        report.push(format!("    Technician: {}", r.technician));
        if !r.notes.is_empty() {
            report.push(format!("    Notes: {}", r.notes));
        }
        if !r.parts_used.is_empty() {
            report.push(format!("    Parts used: {}", r.parts_used.join(", ")));
        }
        report.blank();
    }

    report.rule();
    let total: f64 = data.service_records.iter().map(|r| r.cost).sum();
    report.push(format!("TOTAL SERVICE COST: €{}", money(total)));
    report.push(format!("SERVICES: {}", data.service_records.len()));
    report.blank();
    report.finish(generated_at)
}

pub fn inventory_text(data: &Collections, generated_at: DateTime<Local>) -> String {
    let mut report = Report::new(WIDE, "SPARE PARTS INVENTORY", None);
    if data.spare_parts.is_empty() {
        report.push("No parts in inventory.");
        report.blank();
        return report.finish(generated_at);
    }

    report.section("PARTS ON RECORD");
    for (index, p) in data.spare_parts.iter().enumerate() {
        report.push(format!("[{}] {}", index + 1, p.name));
        report.push(format!("    Part number: {}", p.part_number));
        report.push(format!("    Equipment: {}", p.equipment.label()));
        report.push(format!("    In stock: {}", p.current_stock));
        report.push(format!("    Minimum level: {}", p.minimum_level));
        report.push(format!(
            "    Status: {}",
            spare_part_status(p).label().to_uppercase()
        ));
        report.push(format!("    Unit price: €{}", money(p.price)));
        report.push(format!(
            "    Total value: €{}",
            money(f64::from(p.current_stock) * p.price)
        ));
        if let Some(supplier) = &p.supplier {
            report.push(format!("    Supplier: {supplier}"));
        }
        report.blank();
    }

    report.rule();
    report.push(format!(
        "TOTAL STOCK VALUE: €{}",
        money(total_inventory_value(&data.spare_parts))
    ));
    report.push(format!("PARTS: {}", data.spare_parts.len()));
    let critical: Vec<_> = data
        .spare_parts
        .iter()
        .filter(|p| spare_part_status(p) == PartStatus::Critical)
        .collect();
    if !critical.is_empty() {
        report.push(format!("PARTS AT CRITICAL LEVEL: {}", critical.len()));
        for p in critical {
            report.push(format!(
                "  - {} (in stock: {}, minimum: {})",
                p.name, p.current_stock, p.minimum_level
            ));
        }
    }
    report.blank();
    report.finish(generated_at)
}

pub fn fuel_logs_text(data: &Collections, generated_at: DateTime<Local>) -> String {
    let mut report = Report::new(WIDE, "FUEL LOG", None);
    if data.fuel_logs.is_empty() {
        report.push("No fuel logs on file.");
        report.blank();
        return report.finish(generated_at);
    }

    report.section("REFUELINGS");
    report.push(format!(
        "{:<12} {:<30} {:<12} {:<12} {:<12} {:<10}",
        "Date", "Equipment", "Liters", "€/L", "Total (€)", "Hours"
    ));
    report.rule();
    for log in &data.fuel_logs {
        report.push(format!(
            "{:<12} {:<30} {:<12} {:<12} {:<12} {:<10}",
            log.date.to_string(),
            data.equipment_name(&log.equipment_id),
            liters(log.liters_added),
            money(log.cost_per_liter),
            money(log.total_cost),
            log.hours_at_fueling
        ));
    }
    report.rule();
    let total_liters: f64 = data.fuel_logs.iter().map(|l| l.liters_added).sum();
    let total_cost: f64 = data.fuel_logs.iter().map(|l| l.total_cost).sum();
    report.push(format!("TOTAL FUEL: {} L", liters(total_liters)));
    report.push(format!("TOTAL FUEL COST: €{}", money(total_cost)));
    if let Some(stock) = &data.fuel_stock {
        report.push(format!(
            "SITE TANK: {} / {} L",
            liters(stock.current_liters),
            liters(stock.capacity)
        ));
    }
    report.blank();
    report.finish(generated_at)
}

/// Sections print in the order given, each under its own heading.
pub fn custom_report_text(
    data: &Collections,
    sections: &[ReportSection],
    generated_at: DateTime<Local>,
) -> String {
    let keys: Vec<&str> = sections.iter().map(|s| s.key()).collect();
    let mut report = Report::new(
        WIDE,
        "CUSTOM FLEET REPORT",
        Some(format!("Sections: {}", keys.join(", "))),
    );
    let today = generated_at.date_naive();
    for &section in sections {
        report.section(section.title());
        match section {
            ReportSection::Equipment => equipment_section(&mut report, data),
            ReportSection::Services => services_section(&mut report, data),
            ReportSection::Fuel => fuel_section(&mut report, data),
            ReportSection::Lubrication => lubrication_section(&mut report, data, today),
            ReportSection::Inventory => inventory_section(&mut report, data),
            ReportSection::FuelStock => fuel_stock_section(&mut report, data),
            ReportSection::Summary => summary_section(&mut report, data),
        }
        report.blank();
    }
    report.finish(generated_at)
}

fn equipment_section(report: &mut Report, data: &Collections) {
    let line = |name: &str, hours: &str, last: &str, until: &str, fuel: &str, status: &str| {
        format!("{name:<28} {hours:<8} {last:<13} {until:<14} {fuel:<24} {status}")
    };
    report.push(line("Equipment", "Hours", "Last service", "Until service", "Fuel", "Status"));
    report.rule();
    for eq in &data.equipment {
        let fuel = eq
            .fuel_capacity
            .and_then(|capacity| {
                let level = eq.fuel_level.unwrap_or(0.0);
                fill_percent(level, capacity).map(|pct| {
                    format!("{} / {} L ({pct}%)", liters(level), liters(capacity))
                })
            })
            .unwrap_or_else(|| "N/A".to_string());
        report.push(line(
            &eq.display_name,
            &eq.current_hours.to_string(),
            &eq.last_service_date.to_string(),
            &hours_until_service(eq).to_string(),
            &fuel,
            &equipment_status(eq).to_string().to_uppercase(),
        ));
    }
}

fn services_section(report: &mut Report, data: &Collections) {
    let line = |date: &str, name: &str, kind: &str, tech: &str, hours: &str, cost: &str| {
        format!("{date:<12} {name:<28} {kind:<20} {tech:<16} {hours:<10} {cost}")
    };
    report.push(line("Date", "Equipment", "Service type", "Technician", "Hours", "Cost"));
    report.rule();
    for r in newest_first(&data.service_records, |r| r.date) {
        report.push(line(
            &r.date.to_string(),
            data.equipment_name(&r.equipment_id),
            &r.service_type,
            &r.technician,
            &r.hours_at_service.to_string(),
            &format!("€{}", money(r.cost)),
        ));
    }
    report.rule();
    let total: f64 = data.service_records.iter().map(|r| r.cost).sum();
    report.push(format!("TOTAL SERVICE COST: €{}", money(total)));
}

fn fuel_section(report: &mut Report, data: &Collections) {
    let line = |date: &str, name: &str, added: &str, price: &str, cost: &str, hours: &str| {
        format!("{date:<12} {name:<28} {added:<10} {price:<10} {cost:<12} {hours}")
    };
    report.push(line("Date", "Equipment", "Liters", "Per liter", "Total", "Hours"));
    report.rule();
    for log in newest_first(&data.fuel_logs, |l| l.date) {
        report.push(line(
            &log.date.to_string(),
            data.equipment_name(&log.equipment_id),
            &liters(log.liters_added),
            &money(log.cost_per_liter),
            &money(log.total_cost),
            &log.hours_at_fueling.to_string(),
        ));
    }
    report.rule();
    let total_liters: f64 = data.fuel_logs.iter().map(|l| l.liters_added).sum();
    let total_cost: f64 = data.fuel_logs.iter().map(|l| l.total_cost).sum();
    report.push(format!("TOTAL FUEL: {} L", liters(total_liters)));
    report.push(format!("TOTAL FUEL COST: €{}", money(total_cost)));
}

fn lubrication_section(report: &mut Report, data: &Collections, today: NaiveDate) {
    let line = |name: &str, point: &str, freq: &str, last: &str, next: &str, status: &str| {
        format!("{name:<28} {point:<24} {freq:<10} {last:<14} {next:<12} {status}")
    };
    report.push(line("Equipment", "Point", "Frequency", "Last done", "Next due", "Status"));
    report.rule();
    for point in &data.lubrication_points {
        let na = || "N/A".to_string();
        report.push(line(
            point
                .equipment_id
                .as_deref()
                .map(|id| data.equipment_name(id))
                .unwrap_or("All"),
            &point.name,
            point.frequency.label(),
            &point.last_completed.map(|d| d.to_string()).unwrap_or_else(na),
            &point.next_due.map(|d| d.to_string()).unwrap_or_else(na),
            &lubrication_status(point, today).label().to_uppercase(),
        ));
    }
}

fn inventory_section(report: &mut Report, data: &Collections) {
    let line = |name: &str,
                number: &str,
                stock: &str,
                min: &str,
                price: &str,
                value: &str,
                status: &str| {
        format!("{name:<28} {number:<14} {stock:<10} {min:<10} {price:<12} {value:<12} {status}")
    };
    report.push(line("Part", "Part number", "In stock", "Minimum", "Price", "Value", "Status"));
    report.rule();
    for p in &data.spare_parts {
        report.push(line(
            &p.name,
            &p.part_number,
            &p.current_stock.to_string(),
            &p.minimum_level.to_string(),
            &money(p.price),
            &money(f64::from(p.current_stock) * p.price),
            &spare_part_status(p).label().to_uppercase(),
        ));
    }
    report.rule();
    report.push(format!(
        "TOTAL STOCK VALUE: €{}",
        money(total_inventory_value(&data.spare_parts))
    ));
}

fn fuel_stock_section(report: &mut Report, data: &Collections) {
    let Some(stock) = &data.fuel_stock else {
        report.push("No site fuel tank configured.");
        return;
    };
    report.push(format!("Current stock: {} L", liters(stock.current_liters)));
    report.push(format!("Capacity: {} L", liters(stock.capacity)));
    report.push(format!("Minimum level: {} L", liters(stock.minimum_level)));
    let fill = fill_percent(stock.current_liters, stock.capacity)
        .map(|pct| format!("{pct}%"))
        .unwrap_or_else(|| "N/A".to_string());
    report.push(format!("Fill level: {fill}"));
    let status = if stock.is_below_minimum() {
        "LOW - REFILL NEEDED"
    } else {
        "OK"
    };
    report.push(format!("Status: {status}"));
    report.push(format!("Last updated: {}", stock.last_updated));
}

fn summary_section(report: &mut Report, data: &Collections) {
    let totals = fleet_totals(data);
    report.push(format!("Equipment: {}", totals.equipment_count));
    report.push(format!("Total working hours: {}h", totals.total_hours));
    report.push(format!("Services: {}", totals.service_count));
    report.push(format!("Total service cost: €{}", money(totals.service_cost)));
    report.push(format!("Fuel used: {} L", liters(totals.fuel_liters)));
    report.push(format!("Total fuel cost: €{}", money(totals.fuel_cost)));
    report.push(format!(
        "Average fuel consumption: {} L/h",
        money(totals.average_fuel_consumption)
    ));
    report.push(format!("Total cost: €{}", money(totals.total_cost())));
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::app::test_support::{point, site_stock, today};
    use crate::clock::{Clock, FixedClock};
    use crate::export::tests::sample;
    use crate::types::Frequency;

    fn at() -> DateTime<Local> {
        FixedClock::new(today()).now()
    }

    #[test]
    fn service_history_golden() {
        let mut data = sample();
        data.service_records.truncate(1);
        let bar = "=".repeat(100);
        let rule = "-".repeat(100);
        let expected = [
            bar.as_str(),
            "SERVICE HISTORY",
            bar.as_str(),
            "",
            "COMPLETE SERVICE HISTORY",
            rule.as_str(),
            "[1] 2026-09-10",
            "    Equipment: Concrete Mixer (Elkon)",
            "    Service type: Filter swap",
            "    Hours at service: 400",
            "    Cost: €90.00",
            "    Technician: A. Kovac",
            "",
            rule.as_str(),
            "TOTAL SERVICE COST: €90.00",
            "SERVICES: 1",
            "",
            bar.as_str(),
            "Generated: 2026-10-19 12:00",
            bar.as_str(),
        ]
        .join("\n");
        assert_eq!(service_history_text(&data, at()), expected);
    }

    #[test]
    fn empty_reports_say_so() {
        let empty = Collections::default();
        assert!(service_history_text(&empty, at()).contains("No service records on file."));
        assert!(inventory_text(&empty, at()).contains("No parts in inventory."));
        assert!(fuel_logs_text(&empty, at()).contains("No fuel logs on file."));
    }

    #[test]
    fn monthly_text_has_fixed_columns_and_month_services() {
        let out = monthly_report_text(&sample(), "2026-10".parse().unwrap(), at());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0].len(), NARROW);
        assert_eq!(lines[2], "Month: 2026-10");
        let mixer_row = lines
            .iter()
            .find(|l| l.starts_with("Concrete Mixer"))
            .unwrap();
        assert_eq!(&mixer_row[31..41], "500       ");
        assert!(out.contains("Cost per working hour: €0.20/h"));
        assert!(out.contains("2026-10-05 - Concrete Mixer (Elkon): Oil change (€150.00)"));
        assert!(!out.contains("Filter swap"));
        assert_eq!(lines[lines.len() - 2], "Generated: 2026-10-19 12:00");
    }

    #[test]
    fn inventory_lists_critical_parts() {
        let out = inventory_text(&sample(), at());
        assert!(out.contains("    Status: CRITICAL"));
        assert!(out.contains("    Supplier: Hidraulika d.o.o."));
        assert!(out.contains("PARTS AT CRITICAL LEVEL: 1"));
        assert!(out.contains("  - Hydraulic hose (in stock: 1, minimum: 2)"));
        assert!(out.contains("TOTAL STOCK VALUE: €252.50"));
    }

    #[test]
    fn fuel_text_reports_totals() {
        let out = fuel_logs_text(&sample(), at());
        assert!(out.contains("TOTAL FUEL: 100.0 L"));
        assert!(out.contains("TOTAL FUEL COST: €150.00"));
        assert!(!out.contains("SITE TANK"));
    }

    #[test]
    fn custom_report_golden() {
        let mut data = sample();
        data.fuel_stock = Some(site_stock(2_500.0));
        let bar = "=".repeat(100);
        let rule = "-".repeat(100);
        let expected = [
            bar.as_str(),
            "CUSTOM FLEET REPORT",
            "Sections: equipment, fuel-stock, summary",
            bar.as_str(),
            "",
            "EQUIPMENT STATUS",
            rule.as_str(),
            "Equipment                    Hours    Last service  Until service  Fuel                     Status",
            rule.as_str(),
            "Concrete Mixer (Elkon)       500      2026-09-01    50             50.0 / 200.0 L (25%)     WARNING",
            "Wheel Loader                 1000     2026-09-15    150            N/A                      GOOD",
            "",
            "SITE FUEL STOCK",
            rule.as_str(),
            "Current stock: 2500.0 L",
            "Capacity: 5000.0 L",
            "Minimum level: 500.0 L",
            "Fill level: 50%",
            "Status: OK",
            "Last updated: 2026-10-01",
            "",
            "SUMMARY",
            rule.as_str(),
            "Equipment: 2",
            "Total working hours: 1500h",
            "Services: 2",
            "Total service cost: €240.00",
            "Fuel used: 100.0 L",
            "Total fuel cost: €150.00",
            "Average fuel consumption: 0.07 L/h",
            "Total cost: €390.00",
            "",
            bar.as_str(),
            "Generated: 2026-10-19 12:00",
            bar.as_str(),
        ]
        .join("\n");
        let sections = [
            ReportSection::Equipment,
            ReportSection::FuelStock,
            ReportSection::Summary,
        ];
        assert_eq!(custom_report_text(&data, &sections, at()), expected);
    }

    #[test]
    fn custom_report_orders_history_and_derives_lubrication() {
        let mut data = sample();
        data.lubrication_points = vec![
            point("l1", Frequency::Weekly, Some(today() - Duration::days(1))),
            point("l2", Frequency::Monthly, None),
        ];
        data.lubrication_points[1].equipment_id = None;
        let out = custom_report_text(
            &data,
            &[
                ReportSection::Services,
                ReportSection::Fuel,
                ReportSection::Lubrication,
                ReportSection::Inventory,
            ],
            at(),
        );

        let october = out.find("2026-10-05").unwrap();
        let september = out.find("2026-09-10").unwrap();
        assert!(october < september);
        assert!(out.contains("TOTAL SERVICE COST: €240.00"));
        assert!(out.contains("TOTAL FUEL COST: €150.00"));
        let overdue = out.lines().find(|l| l.contains("Point l1")).unwrap();
        assert!(overdue.starts_with("Concrete Mixer (Elkon)"));
        assert!(overdue.ends_with("2026-10-18   OVERDUE"));
        let general = out.lines().find(|l| l.contains("Point l2")).unwrap();
        assert!(general.starts_with("All "));
        assert!(general.ends_with("N/A          GOOD"));
        assert!(out.contains("TOTAL STOCK VALUE: €252.50"));
        assert!(!out.contains("SUMMARY"));
    }

    #[test]
    fn custom_fuel_stock_without_a_tank() {
        let out = custom_report_text(&sample(), &[ReportSection::FuelStock], at());
        assert!(out.contains("SITE FUEL STOCK"));
        assert!(out.contains("No site fuel tank configured."));
    }
}
