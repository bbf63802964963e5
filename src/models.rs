// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Store identifiers arrive as either numbers or strings depending on the backend build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreId {
    Number(u64),
    Text(String),
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreId::Number(n) => write!(f, "{}", n),
            StoreId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreBreakdown {
    pub store_id: StoreId,
    pub quantity_sold: u64,
    pub revenue: Decimal,
    pub orders: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuReport {
    pub sku: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    pub total_quantity_sold: u64,
    #[serde(default)]
    pub ordered_quantity: Option<u64>, // None = not tracked
    pub total_revenue: Decimal,
    pub total_orders: u64,
    #[serde(default)]
    pub cost: Option<Decimal>,
    #[serde(default)]
    pub stores: Vec<StoreBreakdown>,
}

impl SkuReport {
    pub fn store_quantity_sum(&self) -> u64 {
        self.stores.iter().map(|s| s.quantity_sold).sum()
    }
}

/// A SKU element the backend sent that could not be decoded on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    pub index: usize,
    pub sku: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportPayload {
    pub skus: Vec<SkuReport>,
    pub logs: Vec<String>,
    pub rejected: Vec<RejectedRecord>,
}

/// The two body shapes the report endpoint has shipped. Wrapped is tried first, so any
/// object carrying a `data` key resolves to it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReportResponse {
    Wrapped {
        data: Vec<Value>,
        #[serde(default)]
        logs: Vec<String>,
    },
    Bare(Vec<Value>),
}

impl ReportResponse {
    pub fn into_payload(self) -> ReportPayload {
        let (items, logs) = match self {
            ReportResponse::Wrapped { data, logs } => (data, logs),
            ReportResponse::Bare(items) => (items, Vec::new()),
        };
        let mut skus = Vec::with_capacity(items.len());
        let mut rejected = Vec::new();
        for (index, item) in items.into_iter().enumerate() {
            let sku = item
                .get("sku")
                .and_then(Value::as_str)
                .map(|s| s.to_string());
            match serde_json::from_value::<SkuReport>(item) {
                Ok(r) => skus.push(r),
                Err(e) => {
                    tracing::warn!(index, sku = ?sku, error = %e, "skipping malformed SKU record");
                    rejected.push(RejectedRecord {
                        index,
                        sku,
                        reason: e.to_string(),
                    });
                }
            }
        }
        ReportPayload {
            skus,
            logs,
            rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}
