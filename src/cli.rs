// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};
use std::path::PathBuf;

pub fn build_cli() -> Command {
    Command::new("ledgerload")
        .version(crate_version!())
        .about("Load, classify, export and clear bank transaction history")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("SQLite database file (overrides LEDGERLOAD_DB)"),
        )
        .subcommand(
            Command::new("bulk_transaction_create")
                .about("Create transactions from a CSV or XLSX file, all or nothing")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Path to the CSV or XLSX file to upload"),
                )
                .arg(
                    Arg::new("quiet")
                        .long("quiet")
                        .short('q')
                        .action(ArgAction::SetTrue)
                        .help("Do not draw the progress counter"),
                ),
        )
        .subcommand(
            Command::new("bulk_transaction_export")
                .about("Export stored transactions to a CSV file")
                .arg(
                    Arg::new("path")
                        .long("path")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Destination CSV file"),
                )
                .arg(
                    Arg::new("email")
                        .long("email")
                        .help("Address the exported file is meant for"),
                ),
        )
        .subcommand(Command::new("delete_all").about("Delete all transactions after confirmation"))
        .subcommand(
            Command::new("total_amount")
                .about("Show the total number of stored transactions")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print as JSON"),
                ),
        )
}
