// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::ErrorCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Unsupported file format '{0}': expected a .csv or .xlsx file")]
    UnsupportedFormat(String),

    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Store write failed: {0}")]
    StoreWrite(#[source] rusqlite::Error),

    #[error("Store read failed: {0}")]
    StoreRead(#[source] rusqlite::Error),

    #[error("Store unreachable: {0}")]
    Connectivity(#[source] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] calamine::Error),

    #[error("row {row}: {source}")]
    AtRow {
        row: usize,
        #[source]
        source: Box<LedgerError>,
    },
}

impl LedgerError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        LedgerError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Tag an error with the 1-based source row it came from.
    pub fn at_row(self, row: usize) -> Self {
        match self {
            e @ LedgerError::AtRow { .. } => e,
            other => LedgerError::AtRow {
                row,
                source: Box::new(other),
            },
        }
    }

    pub fn row(&self) -> Option<usize> {
        match self {
            LedgerError::AtRow { row, .. } => Some(*row),
            _ => None,
        }
    }

    /// The underlying error with any row tag removed.
    pub fn root(&self) -> &LedgerError {
        match self {
            LedgerError::AtRow { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn write(err: rusqlite::Error) -> Self {
        if is_connectivity(&err) {
            LedgerError::Connectivity(err)
        } else {
            LedgerError::StoreWrite(err)
        }
    }

    pub fn read(err: rusqlite::Error) -> Self {
        if is_connectivity(&err) {
            LedgerError::Connectivity(err)
        } else {
            LedgerError::StoreRead(err)
        }
    }
}

fn is_connectivity(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => matches!(
            e.code,
            ErrorCode::CannotOpen
                | ErrorCode::NotADatabase
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::SystemIoFailure
                | ErrorCode::DatabaseCorrupt
        ),
        rusqlite::Error::InvalidPath(_) => true,
        _ => false,
    }
}
