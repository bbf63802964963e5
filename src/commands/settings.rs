// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::Result;
use clap::parser::ValueSource;

use crate::config::{self, Settings};
use crate::filter::SkuFilter;
use crate::utils::pretty_table;
use crate::view::DrillDownLayout;

pub fn handle(path: &Path, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let s = config::load_from(path)?;
            let rows = vec![
                vec!["base_url".into(), s.resolve_base_url(None)],
                vec!["timeout_secs".into(), s.timeout_secs.to_string()],
                vec!["layout".into(), s.layout],
                vec!["filter".into(), s.filter],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("path", _)) => println!("{}", path.display()),
        Some(("set", sub)) => {
            let s = apply_set(config::load_or_default(path), sub)?;
            config::save_to(path, &s)?;
            println!("Settings saved to {}", path.display());
        }
        _ => {}
    }
    Ok(())
}

/// Apply `config set` flags, validating layout and filter before anything is written.
pub fn apply_set(mut s: Settings, sub: &clap::ArgMatches) -> Result<Settings> {
    // Only an explicit flag is saved; a value that came from the env var stays transient
    if sub.value_source("base-url") == Some(ValueSource::CommandLine) {
        if let Some(url) = sub.get_one::<String>("base-url") {
            s.base_url = Some(url.trim().to_string());
        }
    }
    if let Some(t) = sub.get_one::<u64>("timeout") {
        s.timeout_secs = *t;
    }
    if let Some(l) = sub.get_one::<String>("layout") {
        s.layout = l
            .parse::<DrillDownLayout>()
            .map_err(anyhow::Error::msg)?
            .to_string();
    }
    if let Some(f) = sub.get_one::<String>("filter") {
        s.filter = f.parse::<SkuFilter>().map_err(anyhow::Error::msg)?.to_string();
    }
    Ok(s)
}
