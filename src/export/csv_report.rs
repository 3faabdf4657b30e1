use chrono::NaiveDate;
use csv::WriterBuilder;

use crate::app::status::{
    equipment_status, hours_until_service, lubrication_status, spare_part_status,
    total_inventory_value,
};
use crate::export::summary::{Month, fleet_totals, monthly_summary};
use crate::export::{ReportSection, fill_percent, liters, money, newest_first};
use crate::types::Collections;

type Row = Vec<String>;

/// Writes each block of rows through a flexible CSV writer, with a blank
/// line between blocks. Quoting is left to the writer: only fields holding
/// a comma, quote or line break get quoted.
fn document(blocks: &[Vec<Row>]) -> csv::Result<String> {
    let mut out = Vec::new();
    for (index, block) in blocks.iter().enumerate() {
        if index > 0 {
            out.push(b'\n');
        }
        let mut writer = WriterBuilder::new().flexible(true).from_writer(&mut out);
        for row in block {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn row<const N: usize>(fields: [&str; N]) -> Row {
    fields.into_iter().map(str::to_string).collect()
}

fn with_header<const N: usize>(header: [&str; N], rows: impl IntoIterator<Item = Row>) -> Vec<Row> {
    let mut block = vec![row(header)];
    block.extend(rows);
    block
}

pub fn monthly_report_csv(data: &Collections, month: Month) -> csv::Result<String> {
    let summary = monthly_summary(data, month);
    let breakdown = with_header(
        [
            "Equipment",
            "Total hours",
            "Fuel (L)",
            "Fuel cost (€)",
            "Services",
            "Service cost (€)",
            "Total cost (€)",
        ],
        summary.equipment.iter().map(|b| {
            vec![
                b.display_name.clone(),
                b.total_hours.to_string(),
                liters(b.total_fuel),
                money(b.fuel_cost),
                b.service_count.to_string(),
                money(b.service_cost),
                money(b.total_cost()),
            ]
        }),
    );
    let totals = vec![vec![
        "TOTAL".into(),
        String::new(),
        liters(summary.total_fuel),
        money(summary.total_fuel_cost),
        summary.service_count.to_string(),
        money(summary.total_service_cost),
        money(summary.total_cost()),
    ]];
    let metrics = vec![
        row(["KEY METRICS"]),
        vec![
            "Average fuel consumption (L/h)".into(),
            money(summary.average_fuel_consumption),
        ],
        vec![
            "Cost per working hour (€/h)".into(),
            money(summary.cost_per_hour),
        ],
        vec![
            "Total working hours".into(),
            summary.total_hours.to_string(),
        ],
    ];

    document(&[breakdown, totals, metrics])
}

pub fn service_history_csv(data: &Collections) -> csv::Result<String> {
    let records = with_header(
        [
            "Date",
            "Equipment",
            "Service type",
            "Hours at service",
            "Parts used",
            "Cost (€)",
            "Technician",
            "Notes",
        ],
        data.service_records.iter().map(|r| {
            vec![
                r.date.to_string(),
                data.equipment_name(&r.equipment_id).to_string(),
                r.service_type.clone(),
                r.hours_at_service.to_string(),
                r.parts_used.join("; "),
                money(r.cost),
                r.technician.clone(),
                r.notes.clone(),
            ]
        }),
    );
    let total: f64 = data.service_records.iter().map(|r| r.cost).sum();
    let totals = vec![row(["TOTAL SERVICE COST", "", "", "", "", money(total).as_str()])];

    document(&[records, totals])
}

pub fn inventory_csv(data: &Collections) -> csv::Result<String> {
    let parts = with_header(
        [
            "Part name",
            "Part number",
            "Equipment",
            "In stock",
            "Minimum level",
            "Status",
            "Price (€)",
            "Total value (€)",
            "Supplier",
        ],
        data.spare_parts.iter().map(|p| {
            vec![
                p.name.clone(),
                p.part_number.clone(),
                p.equipment.label().to_string(),
                p.current_stock.to_string(),
                p.minimum_level.to_string(),
                spare_part_status(p).label().to_string(),
                money(p.price),
                money(f64::from(p.current_stock) * p.price),
                p.supplier.clone().unwrap_or_default(),
            ]
        }),
    );
    let value = money(total_inventory_value(&data.spare_parts));
    let totals = vec![row(["TOTAL STOCK VALUE", "", "", "", "", "", "", value.as_str()])];

    document(&[parts, totals])
}

pub fn fuel_logs_csv(data: &Collections) -> csv::Result<String> {
    let logs = with_header(
        [
            "Date",
            "Equipment",
            "Liters added",
            "Price per liter (€)",
            "Total cost (€)",
            "Hours at fueling",
            "Notes",
        ],
        data.fuel_logs.iter().map(|log| {
            vec![
                log.date.to_string(),
                data.equipment_name(&log.equipment_id).to_string(),
                liters(log.liters_added),
                money(log.cost_per_liter),
                money(log.total_cost),
                log.hours_at_fueling.to_string(),
                log.notes.clone(),
            ]
        }),
    );
    let total_liters: f64 = data.fuel_logs.iter().map(|l| l.liters_added).sum();
    let total_cost: f64 = data.fuel_logs.iter().map(|l| l.total_cost).sum();
    let totals = vec![row([
        "TOTAL",
        "",
        liters(total_liters).as_str(),
        "",
        money(total_cost).as_str(),
    ])];

    document(&[logs, totals])
}

/// One block per section, each opened by its title row. `sections` is
/// expected in print order.
pub fn custom_report_csv(
    data: &Collections,
    sections: &[ReportSection],
    today: NaiveDate,
) -> csv::Result<String> {
    let blocks: Vec<Vec<Row>> = sections
        .iter()
        .map(|&section| {
            let mut block = vec![row([section.title()])];
            block.extend(section_rows(data, section, today));
            block
        })
        .collect();
    document(&blocks)
}

fn section_rows(data: &Collections, section: ReportSection, today: NaiveDate) -> Vec<Row> {
    match section {
        ReportSection::Equipment => with_header(
            [
                "Equipment",
                "Current hours",
                "Last service",
                "Hours until service",
                "Fuel level (L)",
                "Fuel capacity (L)",
                "Fuel (%)",
                "Status",
            ],
            data.equipment.iter().map(|eq| {
                let capacity = eq.fuel_capacity;
                let level = capacity.map(|_| eq.fuel_level.unwrap_or(0.0));
                vec![
                    eq.display_name.clone(),
                    eq.current_hours.to_string(),
                    eq.last_service_date.to_string(),
                    hours_until_service(eq).to_string(),
                    level.map(liters).unwrap_or_default(),
                    capacity.map(liters).unwrap_or_default(),
                    capacity
                        .and_then(|c| fill_percent(level.unwrap_or(0.0), c))
                        .unwrap_or_default(),
                    equipment_status(eq).to_string(),
                ]
            }),
        ),
        ReportSection::Services => {
            let mut rows = with_header(
                [
                    "Date",
                    "Equipment",
                    "Service type",
                    "Technician",
                    "Hours at service",
                    "Cost (€)",
                ],
                newest_first(&data.service_records, |r| r.date)
                    .into_iter()
                    .map(|r| {
                        vec![
                            r.date.to_string(),
                            data.equipment_name(&r.equipment_id).to_string(),
                            r.service_type.clone(),
                            r.technician.clone(),
                            r.hours_at_service.to_string(),
                            money(r.cost),
                        ]
                    }),
            );
            let total: f64 = data.service_records.iter().map(|r| r.cost).sum();
            rows.push(row(["TOTAL", "", "", "", "", money(total).as_str()]));
            rows
        }
        ReportSection::Fuel => {
            let mut rows = with_header(
                [
                    "Date",
                    "Equipment",
                    "Liters added",
                    "Price per liter (€)",
                    "Total cost (€)",
                    "Hours at fueling",
                ],
                newest_first(&data.fuel_logs, |l| l.date)
                    .into_iter()
                    .map(|log| {
                        vec![
                            log.date.to_string(),
                            data.equipment_name(&log.equipment_id).to_string(),
                            liters(log.liters_added),
                            money(log.cost_per_liter),
                            money(log.total_cost),
                            log.hours_at_fueling.to_string(),
                        ]
                    }),
            );
            let total_liters: f64 = data.fuel_logs.iter().map(|l| l.liters_added).sum();
            let total_cost: f64 = data.fuel_logs.iter().map(|l| l.total_cost).sum();
            rows.push(row([
                "TOTAL",
                "",
                liters(total_liters).as_str(),
                "",
                money(total_cost).as_str(),
            ]));
            rows
        }
        ReportSection::Lubrication => with_header(
            [
                "Equipment",
                "Point",
                "Frequency",
                "Last completed",
                "Next due",
                "Status",
            ],
            data.lubrication_points.iter().map(|point| {
                vec![
                    point
                        .equipment_id
                        .as_deref()
                        .map(|id| data.equipment_name(id))
                        .unwrap_or("All")
                        .to_string(),
                    point.name.clone(),
                    point.frequency.label().to_string(),
                    point.last_completed.map(|d| d.to_string()).unwrap_or_default(),
                    point.next_due.map(|d| d.to_string()).unwrap_or_default(),
                    lubrication_status(point, today).label().to_string(),
                ]
            }),
        ),
        ReportSection::Inventory => {
            let mut rows = with_header(
                [
                    "Part name",
                    "Part number",
                    "In stock",
                    "Minimum level",
                    "Price (€)",
                    "Total value (€)",
                    "Status",
                ],
                data.spare_parts.iter().map(|p| {
                    vec![
                        p.name.clone(),
                        p.part_number.clone(),
                        p.current_stock.to_string(),
                        p.minimum_level.to_string(),
                        money(p.price),
                        money(f64::from(p.current_stock) * p.price),
                        spare_part_status(p).label().to_string(),
                    ]
                }),
            );
            let value = money(total_inventory_value(&data.spare_parts));
            rows.push(row(["TOTAL STOCK VALUE", "", "", "", "", value.as_str()]));
            rows
        }
        ReportSection::FuelStock => match &data.fuel_stock {
            Some(stock) => vec![
                row([
                    "Current (L)",
                    "Capacity (L)",
                    "Minimum (L)",
                    "Fill (%)",
                    "Status",
                    "Last updated",
                ]),
                vec![
                    liters(stock.current_liters),
                    liters(stock.capacity),
                    liters(stock.minimum_level),
                    fill_percent(stock.current_liters, stock.capacity).unwrap_or_default(),
                    if stock.is_below_minimum() { "Low" } else { "OK" }.to_string(),
                    stock.last_updated.to_string(),
                ],
            ],
            None => vec![row(["No site fuel tank configured"])],
        },
        ReportSection::Summary => {
            let totals = fleet_totals(data);
            vec![
                vec!["Equipment".into(), totals.equipment_count.to_string()],
                vec!["Total working hours".into(), totals.total_hours.to_string()],
                vec!["Services".into(), totals.service_count.to_string()],
                vec!["Service cost (€)".into(), money(totals.service_cost)],
                vec!["Fuel used (L)".into(), liters(totals.fuel_liters)],
                vec!["Fuel cost (€)".into(), money(totals.fuel_cost)],
                vec![
                    "Average fuel consumption (L/h)".into(),
                    money(totals.average_fuel_consumption),
                ],
                vec!["Total cost (€)".into(), money(totals.total_cost())],
            ]
        }
    }
}
