// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use stocklens::{cli, commands, config, fetcher::HttpReportFetcher};

fn init_tracing() {
    let filter = EnvFilter::try_from_env("STOCKLENS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let matches = cli::build_cli().get_matches();

    let cfg_path = match matches.get_one::<String>("config") {
        Some(p) => PathBuf::from(p),
        None => config::config_path()?,
    };
    // `config` must work even when the settings file is unreadable
    if let Some(("config", sub)) = matches.subcommand() {
        return commands::settings::handle(&cfg_path, sub);
    }
    let Some((name, sub)) = matches.subcommand() else {
        cli::build_cli().print_help()?;
        println!();
        return Ok(());
    };

    let settings = config::load_from(&cfg_path)?;
    let base_url = settings.resolve_base_url(matches.get_one::<String>("base-url").map(|s| s.as_str()));
    let fetcher = HttpReportFetcher::new(&base_url, settings.timeout())?;

    match name {
        "report" => commands::report::handle(&fetcher, &settings, sub)?,
        "doctor" => commands::doctor::handle(&fetcher, &settings, sub)?,
        "browse" => commands::browse::handle(&fetcher, &settings, sub)?,
        _ => {}
    }
    Ok(())
}
