// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Result;
use crate::models::{FIELD_NAMES, StoredTransaction};
use log::info;
use std::io::Write;
use std::path::Path;

/// Writes records to a CSV file at `dest`. The surrogate id is never written.
/// Returns the number of data rows.
pub fn export(records: &[StoredTransaction], dest: &Path) -> Result<usize> {
    let file = std::fs::File::create(dest)?;
    let written = write_records(records, file)?;
    info!(
        "bulk_transaction_export: wrote {} rows to {}",
        written,
        dest.display()
    );
    Ok(written)
}

pub fn write_records<W: Write>(records: &[StoredTransaction], out: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(FIELD_NAMES)?;
    for stored in records {
        let fields = stored.record.to_fields();
        wtr.write_record(fields.iter().map(|f| f.as_deref().unwrap_or("")))?;
    }
    wtr.flush()?;
    Ok(records.len())
}
