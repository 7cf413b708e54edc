// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::LedgerStore;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use log::info;
use serde_json::json;
use std::io::{BufRead, Write};

/// Asks on `output` and deletes only when the answer read from `input` is `yes`.
/// Returns the number of rows removed, or `None` when the user declined.
pub fn delete_all<R: BufRead, W: Write>(
    store: &mut dyn LedgerStore,
    mut input: R,
    mut output: W,
) -> Result<Option<usize>> {
    write!(
        output,
        "Are you sure you want to delete all transactions? Type 'yes' to confirm: "
    )?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    if !answer.trim().eq_ignore_ascii_case("yes") {
        info!("delete_all: deletion aborted");
        writeln!(output, "Deletion aborted")?;
        return Ok(None);
    }

    let removed = store.delete_all().context("Could not delete transactions")?;
    writeln!(
        output,
        "{}",
        pretty_table(&["Deleted Rows"], vec![vec![removed.to_string()]])
    )?;
    Ok(Some(removed))
}

pub fn total_amount(store: &dyn LedgerStore, sub: &clap::ArgMatches) -> Result<u64> {
    let total = store.count().context("Could not count transactions")?;
    let as_json = sub.get_flag("json");
    if !maybe_print_json(as_json, &json!({ "total": total }))? {
        println!(
            "{}",
            pretty_table(&["Total Count"], vec![vec![total.to_string()]])
        );
    }
    Ok(total)
}
