// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::io;
use std::path::PathBuf;

use ledgerload::{cli, commands, db};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = cli::build_cli().get_matches();
    let Some((name, sub)) = matches.subcommand() else {
        cli::build_cli().print_help()?;
        println!();
        return Ok(());
    };

    let settings = db::Settings::resolve(matches.get_one::<PathBuf>("db").map(PathBuf::as_path))?;
    let mut store = db::open_or_init(&settings)?;
    match name {
        "bulk_transaction_create" => {
            commands::importer::handle(&mut store, sub)?;
        }
        "bulk_transaction_export" => {
            commands::exporter::handle(&store, sub)?;
        }
        "delete_all" => {
            commands::maintenance::delete_all(&mut store, io::stdin().lock(), io::stdout())?;
        }
        "total_amount" => {
            commands::maintenance::total_amount(&store, sub)?;
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    store.close()?;
    Ok(())
}
