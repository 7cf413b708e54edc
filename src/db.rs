// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::SqliteStore;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Ledgerload", "ledgerload"));

pub const DB_ENV: &str = "LEDGERLOAD_DB";
pub const MODE_ENV: &str = "LEDGERLOAD_ENV";

/// Where the ledger lives, decided once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
}

impl Settings {
    /// `--db` wins, then `LEDGERLOAD_DB` (a `.env` file is honoured), then
    /// the platform data directory. `LEDGERLOAD_ENV=test` picks a separate
    /// file in the data directory.
    pub fn resolve(cli_override: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();
        Self::resolve_with(cli_override, |key| std::env::var(key).ok())
    }

    pub fn resolve_with(
        cli_override: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        if let Some(p) = cli_override {
            return Ok(Settings {
                db_path: p.to_path_buf(),
            });
        }
        if let Some(p) = env(DB_ENV).filter(|s| !s.trim().is_empty()) {
            return Ok(Settings {
                db_path: PathBuf::from(p.trim()),
            });
        }
        let file = match env(MODE_ENV).as_deref().map(str::trim) {
            Some("test") => "ledgerload-test.sqlite",
            _ => "ledgerload.sqlite",
        };
        Ok(Settings {
            db_path: data_dir()?.join(file),
        })
    }
}

fn data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.to_path_buf())
}

pub fn open_or_init(settings: &Settings) -> Result<SqliteStore> {
    SqliteStore::open(&settings.db_path)
        .with_context(|| format!("Open DB at {}", settings.db_path.display()))
}
