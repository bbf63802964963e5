// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::fetcher::ReportSource;
use crate::filter::SkuFilter;
use crate::metrics::{fmt_money, fmt_optional_money, fmt_percent, sell_through};
use crate::models::{DateRange, RejectedRecord, ReportPayload, SkuReport};

/// Which SKUs currently show their per-store rows. Absent means collapsed.
/// Every transition returns a new state; nothing is edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    entries: BTreeMap<String, bool>,
}

impl ExpansionState {
    pub fn is_expanded(&self, sku: &str) -> bool {
        self.entries.get(sku).copied().unwrap_or(false)
    }

    pub fn toggled(&self, sku: &str) -> Self {
        let mut entries = self.entries.clone();
        entries.insert(sku.to_string(), !self.is_expanded(sku));
        Self { entries }
    }

    pub fn with_expanded<'a>(&self, skus: impl IntoIterator<Item = &'a str>) -> Self {
        let mut entries = self.entries.clone();
        for sku in skus {
            entries.insert(sku.to_string(), true);
        }
        Self { entries }
    }

    /// Drop entries for SKUs that are not in `present`.
    pub fn retained(&self, present: &HashSet<&str>) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|(k, _)| present.contains(k.as_str()))
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Columns shown on drill-down rows. Later report versions show quantity only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrillDownLayout {
    #[default]
    Full,
    QuantityOnly,
}

impl FromStr for DrillDownLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(DrillDownLayout::Full),
            "quantity" | "qty" => Ok(DrillDownLayout::QuantityOnly),
            other => Err(format!("Unknown layout '{}' (use full|quantity)", other)),
        }
    }
}

impl fmt::Display for DrillDownLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrillDownLayout::Full => f.write_str("full"),
            DrillDownLayout::QuantityOnly => f.write_str("quantity"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreRow {
    pub store_id: String,
    pub quantity_sold: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRow {
    pub sku: String,
    pub description: String,
    pub category: Option<String>,
    pub total_quantity_sold: u64,
    pub ordered_quantity: Option<u64>,
    pub total_revenue: String,
    pub total_orders: u64,
    pub cost: String,
    pub sell_through: String,
    pub expanded: bool,
    /// Empty unless `expanded`.
    pub stores: Vec<StoreRow>,
}

impl ViewRow {
    fn build(r: &SkuReport, expanded: bool, layout: DrillDownLayout) -> Self {
        let stores = if expanded {
            r.stores
                .iter()
                .map(|s| StoreRow {
                    store_id: s.store_id.to_string(),
                    quantity_sold: s.quantity_sold,
                    revenue: match layout {
                        DrillDownLayout::Full => Some(fmt_money(s.revenue)),
                        DrillDownLayout::QuantityOnly => None,
                    },
                    orders: match layout {
                        DrillDownLayout::Full => Some(s.orders),
                        DrillDownLayout::QuantityOnly => None,
                    },
                })
                .collect()
        } else {
            Vec::new()
        };
        ViewRow {
            sku: r.sku.clone(),
            description: r.description.clone(),
            category: r.category.clone(),
            total_quantity_sold: r.total_quantity_sold,
            ordered_quantity: r.ordered_quantity,
            total_revenue: fmt_money(r.total_revenue),
            total_orders: r.total_orders,
            cost: fmt_optional_money(r.cost),
            sell_through: fmt_percent(sell_through(r)),
            expanded,
            stores,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ReportStatus {
    #[default]
    NotLoaded,
    Ready(ReportPayload),
    Failed(String),
}

/// Handed out by `begin_fetch`; only the most recent ticket may update the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Failed,
    Superseded,
}

#[derive(Debug, Default)]
pub struct ReportView {
    status: ReportStatus,
    filter: SkuFilter,
    layout: DrillDownLayout,
    expansion: ExpansionState,
    loading: bool,
    issued: u64,
}

impl ReportView {
    pub fn new(filter: SkuFilter, layout: DrillDownLayout) -> Self {
        Self {
            filter,
            layout,
            ..Self::default()
        }
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.loading = true;
        FetchTicket(self.issued)
    }

    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<ReportPayload, FetchError>,
    ) -> FetchOutcome {
        if ticket.0 != self.issued {
            warn!(
                seq = ticket.0,
                latest = self.issued,
                "discarding response from superseded request"
            );
            return FetchOutcome::Superseded;
        }
        self.loading = false;
        match result {
            Ok(payload) => {
                let present: HashSet<&str> = payload.skus.iter().map(|r| r.sku.as_str()).collect();
                self.expansion = self.expansion.retained(&present);
                debug!(seq = ticket.0, skus = payload.skus.len(), "report applied");
                self.status = ReportStatus::Ready(payload);
                FetchOutcome::Applied
            }
            Err(e) => {
                self.status = ReportStatus::Failed(e.to_string());
                FetchOutcome::Failed
            }
        }
    }

    /// Fetch and apply in one step.
    pub fn load(&mut self, source: &dyn ReportSource, range: &DateRange) -> FetchOutcome {
        let ticket = self.begin_fetch();
        let result = source.fetch(range);
        self.complete_fetch(ticket, result)
    }

    pub fn toggle(&mut self, sku: &str) {
        self.expansion = self.expansion.toggled(sku);
    }

    pub fn expand_all(&mut self) {
        if let ReportStatus::Ready(p) = &self.status {
            self.expansion = self
                .expansion
                .with_expanded(p.skus.iter().map(|r| r.sku.as_str()));
        }
    }

    pub fn set_filter(&mut self, filter: SkuFilter) {
        self.filter = filter;
    }

    pub fn set_layout(&mut self, layout: DrillDownLayout) {
        self.layout = layout;
    }

    pub fn filter(&self) -> &SkuFilter {
        &self.filter
    }

    pub fn layout(&self) -> DrillDownLayout {
        self.layout
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn status(&self) -> &ReportStatus {
        &self.status
    }

    pub fn payload(&self) -> Option<&ReportPayload> {
        match &self.status {
            ReportStatus::Ready(p) => Some(p),
            _ => None,
        }
    }

    pub fn logs(&self) -> &[String] {
        self.payload().map(|p| p.logs.as_slice()).unwrap_or(&[])
    }

    pub fn rejected(&self) -> &[RejectedRecord] {
        self.payload().map(|p| p.rejected.as_slice()).unwrap_or(&[])
    }

    /// Filtered, derived rows in backend order. Empty unless a report is ready.
    pub fn rows(&self) -> Vec<ViewRow> {
        let Some(p) = self.payload() else {
            return Vec::new();
        };
        self.filter
            .apply(&p.skus)
            .into_iter()
            .map(|r| ViewRow::build(r, self.expansion.is_expanded(&r.sku), self.layout))
            .collect()
    }
}
