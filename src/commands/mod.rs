// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod browse;
pub mod doctor;
pub mod exporter;
pub mod report;
pub mod settings;

use anyhow::{Result, bail};
use tracing::error;

use crate::config::Settings;
use crate::fetcher::ReportSource;
use crate::filter::SkuFilter;
use crate::utils::parse_range;
use crate::view::{DrillDownLayout, ReportStatus, ReportView};

/// Filter from the flag if given, otherwise from saved settings.
pub fn filter_from(settings: &Settings, sub: &clap::ArgMatches) -> Result<SkuFilter> {
    let raw = sub
        .try_get_one::<String>("filter")
        .ok()
        .flatten()
        .map(|s| s.as_str())
        .unwrap_or(settings.filter.as_str());
    raw.parse::<SkuFilter>().map_err(anyhow::Error::msg)
}

pub fn layout_from(settings: &Settings, sub: &clap::ArgMatches) -> Result<DrillDownLayout> {
    let raw = sub
        .try_get_one::<String>("layout")
        .ok()
        .flatten()
        .map(|s| s.as_str())
        .unwrap_or(settings.layout.as_str());
    raw.parse::<DrillDownLayout>().map_err(anyhow::Error::msg)
}

/// Build a view for the subcommand's date range and load it. A failed fetch is an error,
/// never an empty report.
pub fn load_view(
    source: &dyn ReportSource,
    settings: &Settings,
    sub: &clap::ArgMatches,
) -> Result<ReportView> {
    let range = parse_range(
        sub.get_one::<String>("from").map(|s| s.as_str()).unwrap_or(crate::cli::DEFAULT_FROM),
        sub.get_one::<String>("to").map(|s| s.as_str()).unwrap_or(crate::cli::DEFAULT_TO),
    )?;
    let mut view = ReportView::new(filter_from(settings, sub)?, layout_from(settings, sub)?);
    let ticket = view.begin_fetch();
    if view.is_loading() {
        eprintln!("Loading report {}...", range);
    }
    let result = source.fetch(&range);
    view.complete_fetch(ticket, result);
    if let ReportStatus::Failed(msg) = view.status() {
        error!(%range, "report fetch failed");
        bail!("Report fetch failed: {}", msg);
    }
    Ok(view)
}
