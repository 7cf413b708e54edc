// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::export::export;
use crate::store::LedgerStore;
use anyhow::{Context, Result, anyhow};
use log::warn;
use std::path::PathBuf;

pub fn handle(store: &dyn LedgerStore, sub: &clap::ArgMatches) -> Result<usize> {
    let out = sub.get_one::<PathBuf>("path").context("--path is required")?;
    let email = sub
        .get_one::<String>("email")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty());
    if let Some(addr) = email {
        if !addr.contains('@') {
            return Err(anyhow!("Invalid email address '{}'", addr));
        }
    }

    let records = store.fetch_all().context("Could not read stored transactions")?;
    let written = export(&records, out)
        .with_context(|| format!("Could not write export to {}", out.display()))?;

    if let Some(addr) = email {
        warn!(
            "bulk_transaction_export: mail delivery is not configured; {} was not sent to {}",
            out.display(),
            addr
        );
    }
    println!("Exported {} transactions to {}", written, out.display());
    Ok(written)
}
