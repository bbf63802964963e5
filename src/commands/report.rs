// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use comfy_table::Table;

use crate::commands::{exporter, load_view};
use crate::config::Settings;
use crate::fetcher::ReportSource;
use crate::utils::{maybe_print_json, pretty_table};
use crate::view::{DrillDownLayout, ReportStatus, ReportView, ViewRow};

pub const HEADERS: [&str; 10] = [
    "SKU",
    "Description",
    "Category",
    "Qty Sold",
    "Ordered",
    "Revenue",
    "Orders",
    "Cost",
    "Sell-Through",
    "Details",
];

pub fn handle(source: &dyn ReportSource, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(source, settings, sub)?,
        Some(("export", sub)) => exporter::handle(source, settings, sub)?,
        _ => {}
    }
    Ok(())
}

/// Load the report and apply the `--expand` / `--expand-all` flags.
pub fn prepare_view(
    source: &dyn ReportSource,
    settings: &Settings,
    sub: &clap::ArgMatches,
) -> Result<ReportView> {
    let mut view = load_view(source, settings, sub)?;
    if sub.get_flag("expand-all") {
        view.expand_all();
    }
    if let Some(skus) = sub.get_many::<String>("expand") {
        for sku in skus {
            let sku = sku.trim();
            if !view.expansion().is_expanded(sku) {
                view.toggle(sku);
            }
        }
    }
    Ok(view)
}

fn show(source: &dyn ReportSource, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let view = prepare_view(source, settings, sub)?;
    let rows = view.rows();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    print_view(&view, &rows, sub.get_flag("logs"));
    Ok(())
}

/// What to print in place of the table, if anything. A failed or missing report is never
/// shown as an empty filter result.
pub fn status_line(view: &ReportView, rows: &[ViewRow]) -> Option<String> {
    match view.status() {
        ReportStatus::Failed(msg) => Some(format!("Fetch failed: {}", msg)),
        ReportStatus::NotLoaded => Some("Report not loaded yet.".to_string()),
        ReportStatus::Ready(_) if rows.is_empty() => {
            Some(format!("No SKUs matched filter '{}'.", view.filter()))
        }
        ReportStatus::Ready(_) => None,
    }
}

pub fn print_view(view: &ReportView, rows: &[ViewRow], with_logs: bool) {
    match status_line(view, rows) {
        Some(line) => println!("{}", line),
        None => {
            println!("Inventory Report");
            println!("{}", report_table(rows, view.layout()));
        }
    }
    let rejected = view.rejected();
    if !rejected.is_empty() {
        eprintln!(
            "warning: {} record(s) could not be decoded and were skipped (run `doctor` for details)",
            rejected.len()
        );
    }
    if with_logs {
        let logs = view.logs();
        if logs.is_empty() {
            println!("(backend sent no derivation log)");
        }
        for line in logs {
            println!("{}", line);
        }
    }
}

pub fn table_rows(rows: &[ViewRow], layout: DrillDownLayout) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    for r in rows {
        out.push(vec![
            r.sku.clone(),
            r.description.clone(),
            r.category.clone().unwrap_or_default(),
            r.total_quantity_sold.to_string(),
            r.ordered_quantity
                .map(|q| q.to_string())
                .unwrap_or_else(|| "-".into()),
            r.total_revenue.clone(),
            r.total_orders.to_string(),
            r.cost.clone(),
            r.sell_through.clone(),
            if r.expanded { "Hide" } else { "Show" }.to_string(),
        ]);
        for s in &r.stores {
            let (revenue, orders) = match layout {
                DrillDownLayout::Full => (
                    s.revenue.clone().unwrap_or_default(),
                    s.orders.map(|o| o.to_string()).unwrap_or_default(),
                ),
                DrillDownLayout::QuantityOnly => (String::new(), String::new()),
            };
            out.push(vec![
                String::new(),
                format!("  Store ID {}", s.store_id),
                String::new(),
                s.quantity_sold.to_string(),
                String::new(),
                revenue,
                orders,
                String::new(),
                String::new(),
                String::new(),
            ]);
        }
    }
    out
}

pub fn report_table(rows: &[ViewRow], layout: DrillDownLayout) -> Table {
    pretty_table(&HEADERS, table_rows(rows, layout))
}
