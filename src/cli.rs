// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

use crate::config::BASE_URL_ENV;

pub const DEFAULT_FROM: &str = "2025-05-01";
pub const DEFAULT_TO: &str = "2025-05-20";

fn range_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("from")
            .long("from")
            .help("First day of the report, YYYY-MM-DD")
            .default_value(DEFAULT_FROM),
    )
    .arg(
        Arg::new("to")
            .long("to")
            .help("Last day of the report (inclusive), YYYY-MM-DD")
            .default_value(DEFAULT_TO),
    )
}

fn filter_arg() -> Arg {
    Arg::new("filter")
        .long("filter")
        .short('f')
        .help("all | new | new-category | desc:<regex> | category:<regex>")
}

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl"),
    )
    .arg(Arg::new("jsonl").long("jsonl").action(ArgAction::SetTrue))
}

pub fn build_cli() -> Command {
    Command::new("stocklens")
        .version(crate_version!())
        .about("Inventory report viewer: per-SKU sales, sell-through and store drill-down")
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .env(BASE_URL_ENV)
                .help("Reporting API base address"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Settings file to use instead of the platform default"),
        )
        .subcommand(
            Command::new("report")
                .about("Fetch and display the inventory report")
                .subcommand(json_args(range_args(
                    Command::new("show")
                        .arg(filter_arg())
                        .arg(
                            Arg::new("expand")
                                .long("expand")
                                .short('e')
                                .action(ArgAction::Append)
                                .help("Show store rows for this SKU (repeatable)"),
                        )
                        .arg(
                            Arg::new("expand-all")
                                .long("expand-all")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(
                            Arg::new("layout")
                                .long("layout")
                                .help("Store row columns: full | quantity"),
                        )
                        .arg(
                            Arg::new("logs")
                                .long("logs")
                                .action(ArgAction::SetTrue)
                                .help("Print the backend's derivation log"),
                        ),
                )))
                .subcommand(range_args(
                    Command::new("export")
                        .arg(filter_arg())
                        .arg(Arg::new("format").long("format").required(true))
                        .arg(Arg::new("out").long("out").required(true))
                        .arg(
                            Arg::new("stores")
                                .long("stores")
                                .action(ArgAction::SetTrue)
                                .help("Include per-store rows"),
                        ),
                )),
        )
        .subcommand(json_args(range_args(
            Command::new("doctor").about("Check the report for store/SKU total mismatches"),
        )))
        .subcommand(range_args(
            Command::new("browse")
                .about("Interactive view: toggle rows and switch filters")
                .arg(filter_arg()),
        ))
        .subcommand(
            Command::new("config")
                .about("Show or change saved settings")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("path"))
                .subcommand(
                    Command::new("set")
                        .about("Save settings; pass the global --base-url to store an address")
                        .arg(
                            Arg::new("timeout")
                                .long("timeout")
                                .value_parser(clap::value_parser!(u64)),
                        )
                        .arg(Arg::new("layout").long("layout"))
                        .arg(filter_arg()),
                ),
        )
}
