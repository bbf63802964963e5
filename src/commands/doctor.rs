// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use crate::commands::load_view;
use crate::config::Settings;
use crate::fetcher::ReportSource;
use crate::models::ReportPayload;
use crate::utils::{maybe_print_json, pretty_table};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub kind: &'static str,
    pub sku: String,
    pub detail: String,
}

/// Report-level inconsistencies worth raising with the backend. Nothing here is corrected;
/// the view keeps showing what the backend sent.
pub fn find_issues(p: &ReportPayload) -> Vec<Issue> {
    let mut out = Vec::new();
    for r in &p.skus {
        // An empty store list means no breakdown, not a zero breakdown
        if !r.stores.is_empty() {
            let sum = r.store_quantity_sum();
            if sum != r.total_quantity_sold {
                out.push(Issue {
                    kind: "store_total_mismatch",
                    sku: r.sku.clone(),
                    detail: format!(
                        "stores sum to {} but totalQuantitySold is {}",
                        sum, r.total_quantity_sold
                    ),
                });
            }
        }
        for s in r.stores.iter().filter(|s| s.quantity_sold == 0 && s.orders == 0) {
            out.push(Issue {
                kind: "inactive_store_listed",
                sku: r.sku.clone(),
                detail: format!("store {} has no sales or orders", s.store_id),
            });
        }
    }
    for rej in &p.rejected {
        out.push(Issue {
            kind: "rejected_record",
            sku: rej.sku.clone().unwrap_or_else(|| format!("#{}", rej.index)),
            detail: rej.reason.clone(),
        });
    }
    out
}

pub fn handle(source: &dyn ReportSource, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let view = load_view(source, settings, sub)?;
    let issues = view.payload().map(find_issues).unwrap_or_default();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &issues)? {
        return Ok(());
    }
    if issues.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows = issues
            .into_iter()
            .map(|i| vec![i.kind.to_string(), i.sku, i.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "SKU", "Detail"], rows));
    }
    Ok(())
}
