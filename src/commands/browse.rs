// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::debug;

use crate::commands::load_view;
use crate::commands::report::{report_table, status_line};
use crate::config::Settings;
use crate::fetcher::ReportSource;
use crate::filter::SkuFilter;
use crate::models::DateRange;
use crate::utils::parse_range;
use crate::view::{DrillDownLayout, FetchOutcome, ReportView};

const HELP: &str = "commands: t <SKU> toggle | f <filter> | l <full|quantity> | r refetch | logs | q";

pub fn handle(source: &dyn ReportSource, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let range = parse_range(
        sub.get_one::<String>("from").unwrap(),
        sub.get_one::<String>("to").unwrap(),
    )?;
    let view = load_view(source, settings, sub)?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run(source, view, &range, stdin.lock(), stdout.lock())?;
    Ok(())
}

/// Drive the view from line commands until `q` or end of input. Returns the final view.
pub fn run<R: BufRead, W: Write>(
    source: &dyn ReportSource,
    mut view: ReportView,
    range: &DateRange,
    input: R,
    mut out: W,
) -> Result<ReportView> {
    writeln!(out, "{}", HELP)?;
    render(&view, &mut out)?;
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        let (cmd, arg) = match line.split_once(' ') {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };
        debug!(cmd, arg, "browse command");
        match cmd {
            "" => continue,
            "q" | "quit" => break,
            "t" | "toggle" if !arg.is_empty() => view.toggle(arg),
            "f" | "filter" => match arg.parse::<SkuFilter>() {
                Ok(f) => view.set_filter(f),
                Err(e) => {
                    writeln!(out, "{}", e)?;
                    continue;
                }
            },
            "l" | "layout" => match arg.parse::<DrillDownLayout>() {
                Ok(l) => view.set_layout(l),
                Err(e) => {
                    writeln!(out, "{}", e)?;
                    continue;
                }
            },
            "r" | "refresh" => {
                writeln!(out, "Loading report {}...", range)?;
                if view.load(source, range) == FetchOutcome::Superseded {
                    continue;
                }
            }
            "logs" => {
                for l in view.logs() {
                    writeln!(out, "{}", l)?;
                }
                continue;
            }
            _ => {
                writeln!(out, "{}", HELP)?;
                continue;
            }
        }
        render(&view, &mut out)?;
    }
    Ok(view)
}

fn render<W: Write>(view: &ReportView, out: &mut W) -> Result<()> {
    let rows = view.rows();
    match status_line(view, &rows) {
        Some(line) => writeln!(out, "{}", line)?,
        None => writeln!(out, "{}", report_table(&rows, view.layout()))?,
    }
    Ok(())
}
