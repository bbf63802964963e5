// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::commands::load_view;
use crate::config::Settings;
use crate::fetcher::ReportSource;
use crate::view::ViewRow;

pub fn handle(source: &dyn ReportSource, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim().to_string();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let mut view = load_view(source, settings, sub)?;
    if sub.get_flag("stores") {
        view.expand_all();
    }
    let rows = view.rows();
    match fmt.as_str() {
        "csv" => write_csv(Path::new(&out), &rows)?,
        _ => std::fs::write(&out, serde_json::to_string_pretty(&rows)?)
            .with_context(|| format!("Write {}", out))?,
    }
    info!(rows = rows.len(), format = %fmt, "report exported");
    println!("Exported {} SKU(s) to {}", rows.len(), out);
    Ok(())
}

fn write_csv(path: &Path, rows: &[ViewRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Create {}", path.display()))?;
    wtr.write_record([
        "sku",
        "description",
        "category",
        "total_quantity_sold",
        "ordered_quantity",
        "total_revenue",
        "total_orders",
        "cost",
        "sell_through",
        "store_id",
        "store_quantity_sold",
        "store_revenue",
        "store_orders",
    ])?;
    for r in rows {
        let head = [
            r.sku.clone(),
            r.description.clone(),
            r.category.clone().unwrap_or_default(),
            r.total_quantity_sold.to_string(),
            r.ordered_quantity.map(|q| q.to_string()).unwrap_or_default(),
            r.total_revenue.clone(),
            r.total_orders.to_string(),
            r.cost.clone(),
            r.sell_through.clone(),
        ];
        let mut sku_line = head.to_vec();
        sku_line.extend(std::iter::repeat_n(String::new(), 4));
        wtr.write_record(&sku_line)?;
        for s in &r.stores {
            let mut line = vec![r.sku.clone()];
            line.extend(std::iter::repeat_n(String::new(), 8));
            line.push(s.store_id.clone());
            line.push(s.quantity_sold.to_string());
            line.push(s.revenue.clone().unwrap_or_default());
            line.push(s.orders.map(|o| o.to_string()).unwrap_or_default());
            wtr.write_record(&line)?;
        }
    }
    wtr.flush()?;
    Ok(())
}
