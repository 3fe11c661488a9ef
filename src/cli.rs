// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Category;
use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn top_arg() -> Arg {
    Arg::new("top")
        .long("top")
        .value_parser(value_parser!(usize))
        .help("Only show the N largest categories")
}

fn list_cmd(filter: &'static str, filter_help: &'static str) -> Command {
    json_args(
        Command::new("list")
            .about("List recorded entries, newest first")
            .arg(Arg::new("month").long("month").help("Only entries in YYYY-MM"))
            .arg(Arg::new(filter).long(filter).help(filter_help))
            .arg(
                Arg::new("limit")
                    .long("limit")
                    .value_parser(value_parser!(usize)),
            ),
    )
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .version(crate_version!())
        .about("Flat-file expense and income tracker")
        .arg(
            Arg::new("data_dir")
                .long("data-dir")
                .global(true)
                .env("TALLYBOOK_DATA_DIR")
                .help("Directory holding the ledger files"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .help("Ledger owner; selects expenses_<user>.csv and income_<user>.csv"),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .global(true)
                .env("TALLYBOOK_PASSWORD")
                .hide_env_values(true)
                .help("Password, when one is configured"),
        )
        .subcommand(Command::new("init").about("Create empty ledgers if missing"))
        .subcommand(
            Command::new("expense")
                .about("Record and list expenses")
                .subcommand(
                    Command::new("add")
                        .about("Record an expense")
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, default today"))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .value_parser(Category::NAMES),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_negative_numbers(true),
                        )
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(list_cmd("category", "Only entries in this category")),
        )
        .subcommand(
            Command::new("income")
                .about("Record and list income")
                .subcommand(
                    Command::new("add")
                        .about("Record income")
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, default today"))
                        .arg(Arg::new("source").long("source").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_negative_numbers(true),
                        ),
                )
                .subcommand(list_cmd("source", "Only entries from this source")),
        )
        .subcommand(
            Command::new("report")
                .about("Derived views over both ledgers")
                .subcommand(json_args(
                    Command::new("summary").about("Total expense, income and savings"),
                ))
                .subcommand(json_args(
                    Command::new("categories")
                        .about("Spending per category")
                        .arg(top_arg()),
                ))
                .subcommand(json_args(
                    Command::new("daily").about("Spending per day"),
                ))
                .subcommand(json_args(
                    Command::new("monthly").about("Spending per month and category"),
                ))
                .subcommand(json_args(
                    Command::new("income").about("Income per source and per month"),
                ))
                .subcommand(json_args(
                    Command::new("compare")
                        .about("Income vs expense per month with cumulative savings"),
                ))
                .subcommand(json_args(
                    Command::new("dashboard")
                        .about("Every view at once")
                        .arg(top_arg().default_value("5")),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Write a ledger out as CSV or JSON")
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .required(true)
                        .value_parser(["expenses", "income"]),
                )
                .arg(Arg::new("format").long("format").default_value("csv"))
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("import")
                .about("Summarize an external expense or income CSV")
                .arg(Arg::new("path").long("path").required(true))
                .arg(
                    Arg::new("merge")
                        .long("merge")
                        .action(ArgAction::SetTrue)
                        .help("Also append the records to your ledger"),
                )
                .arg(
                    Arg::new("preview")
                        .long("preview")
                        .value_parser(value_parser!(usize))
                        .default_value("10")
                        .help("Rows to preview"),
                ),
        )
}
