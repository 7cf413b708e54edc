// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ingest::{IngestResult, Ingestor};
use crate::progress::{ProgressReporter, Silent, TerminalProgress};
use crate::store::LedgerStore;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn handle(store: &mut dyn LedgerStore, sub: &clap::ArgMatches) -> Result<IngestResult> {
    let path = sub.get_one::<PathBuf>("file").context("--file is required")?;
    let mut terminal;
    let mut silent = Silent;
    let progress: &mut dyn ProgressReporter = if sub.get_flag("quiet") {
        &mut silent
    } else {
        terminal = TerminalProgress::stderr();
        &mut terminal
    };

    let result = Ingestor::new(store, progress).ingest(path).with_context(|| {
        format!(
            "Import of {} failed; no transactions were saved",
            path.display()
        )
    })?;
    println!(
        "Imported {} transactions from {}",
        result.rows,
        result.source.display()
    );
    Ok(result)
}
