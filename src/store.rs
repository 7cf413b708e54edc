// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persistence of transaction records.
//!
//! [`LedgerStore`] is the boundary the ingestor and the commands talk to.
//! Writes go through a [`WriteScope`], which either commits as a whole or
//! leaves the store as it found it.

use crate::error::{LedgerError, Result};
use crate::models::{Category, StoredTransaction, TransactionRecord, money_string};
use chrono::NaiveDate;
use log::{debug, info};
use rusqlite::{Connection, Row, Transaction, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS history(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        AccountNumber TEXT,
        Date TEXT,
        MainDescription TEXT,
        AdditionalDescription TEXT,
        TransactionType TEXT,
        Amount TEXT,
        Balance TEXT,
        SpendCategory TEXT,
        Currency TEXT,
        Description TEXT NOT NULL CHECK(Description IN ('Revenue','Expenses','Suppliers'))
    );
"#;

const INSERT_SQL: &str = "INSERT INTO history(AccountNumber, Date, MainDescription, \
     AdditionalDescription, TransactionType, Amount, Balance, SpendCategory, Currency, \
     Description) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)";

/// One atomic unit of writes. Dropping a scope without calling
/// [`WriteScope::commit`] discards everything it inserted.
pub trait WriteScope {
    /// Stages one record and returns its surrogate id.
    fn insert(&mut self, record: &TransactionRecord) -> Result<i64>;
    fn commit(self: Box<Self>) -> Result<()>;
    fn rollback(self: Box<Self>) -> Result<()>;
}

pub trait LedgerStore {
    fn begin(&mut self) -> Result<Box<dyn WriteScope + '_>>;
    /// Removes every record and returns how many were removed.
    fn delete_all(&mut self) -> Result<usize>;
    fn count(&self) -> Result<u64>;
    /// All records in insertion order.
    fn fetch_all(&self) -> Result<Vec<StoredTransaction>>;

    /// Inserts a single record in its own scope.
    fn insert(&mut self, record: &TransactionRecord) -> Result<i64> {
        let mut scope = self.begin()?;
        let id = scope.insert(record)?;
        scope.commit()?;
        Ok(id)
    }
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let conn = Connection::open(path).map_err(LedgerError::Connectivity)?;
        debug!("store: opened {}", path.display());
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(LedgerError::Connectivity)?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).map_err(LedgerError::write)?;
        Ok(SqliteStore { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| LedgerError::Connectivity(e))
    }
}

struct SqliteScope<'a> {
    tx: Transaction<'a>,
}

impl WriteScope for SqliteScope<'_> {
    fn insert(&mut self, record: &TransactionRecord) -> Result<i64> {
        let description = record
            .description
            .ok_or_else(|| LedgerError::validation("Description", "record is not classified"))?;
        self.tx
            .prepare_cached(INSERT_SQL)
            .and_then(|mut stmt| {
                stmt.execute(params![
                    record.account_number,
                    record.date.map(|d| d.format("%Y-%m-%d").to_string()),
                    record.main_description,
                    record.additional_description,
                    record.transaction_type,
                    record.amount.map(money_string),
                    record.balance.map(money_string),
                    record.spend_category,
                    record.currency,
                    description.as_str(),
                ])
            })
            .map_err(LedgerError::write)?;
        Ok(self.tx.last_insert_rowid())
    }

    fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().map_err(LedgerError::write)
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().map_err(LedgerError::write)
    }
}

impl LedgerStore for SqliteStore {
    fn begin(&mut self) -> Result<Box<dyn WriteScope + '_>> {
        let tx = self.conn.transaction().map_err(LedgerError::write)?;
        Ok(Box::new(SqliteScope { tx }))
    }

    fn delete_all(&mut self) -> Result<usize> {
        let tx = self.conn.transaction().map_err(LedgerError::write)?;
        let removed = tx
            .execute("DELETE FROM history", [])
            .map_err(LedgerError::write)?;
        tx.commit().map_err(LedgerError::write)?;
        info!("delete_all: removed {} rows", removed);
        Ok(removed)
    }

    fn count(&self) -> Result<u64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM history", [], |r| r.get(0))
            .map_err(LedgerError::read)?;
        Ok(n as u64)
    }

    fn fetch_all(&self) -> Result<Vec<StoredTransaction>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, AccountNumber, Date, MainDescription, AdditionalDescription, \
                 TransactionType, Amount, Balance, SpendCategory, Currency, Description \
                 FROM history ORDER BY id",
            )
            .map_err(LedgerError::read)?;
        let rows = stmt
            .query_map([], row_to_stored)
            .map_err(LedgerError::read)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(LedgerError::read)?);
        }
        Ok(out)
    }
}

fn row_to_stored(r: &Row<'_>) -> rusqlite::Result<StoredTransaction> {
    let date: Option<String> = r.get(2)?;
    let amount: Option<String> = r.get(6)?;
    let balance: Option<String> = r.get(7)?;
    let description: String = r.get(10)?;
    Ok(StoredTransaction {
        id: r.get(0)?,
        record: TransactionRecord {
            account_number: r.get(1)?,
            date: date
                .map(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").map_err(|e| bad_column(2, e)))
                .transpose()?,
            main_description: r.get(3)?,
            additional_description: r.get(4)?,
            transaction_type: r.get(5)?,
            amount: amount.map(|s| decimal_column(6, &s)).transpose()?,
            balance: balance.map(|s| decimal_column(7, &s)).transpose()?,
            spend_category: r.get(8)?,
            currency: r.get(9)?,
            description: Some(Category::parse(&description).ok_or_else(|| {
                bad_column(10, format!("unknown description '{}'", description))
            })?),
        },
    })
}

fn decimal_column(idx: usize, s: &str) -> rusqlite::Result<Decimal> {
    Decimal::from_str(s).map_err(|e| bad_column(idx, e))
}

fn bad_column(
    idx: usize,
    e: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(amount: &str, main: &str) -> TransactionRecord {
        crate::classify::classify(TransactionRecord {
            account_number: Some("11112222".into()),
            date: NaiveDate::from_ymd_opt(2024, 1, 15),
            main_description: Some(main.into()),
            amount: Some(Decimal::from_str(amount).unwrap()),
            currency: Some("GBP".into()),
            ..Default::default()
        })
    }

    #[test]
    fn insert_count_fetch() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.count().unwrap(), 0);
        let a = store.insert(&record("10", "Shop")).unwrap();
        let b = store.insert(&record("-4.5", "FRIDGETNP Ltd")).unwrap();
        assert!(b > a);
        assert_eq!(store.count().unwrap(), 2);

        let all = store.fetch_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, a);
        assert_eq!(all[0].record, record("10", "Shop"));
        assert_eq!(all[1].record.description, Some(Category::Suppliers));
        assert_eq!(all[1].record.balance, None);
    }

    #[test]
    fn amounts_are_stored_to_cents() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert(&record("3.14159", "Shop")).unwrap();
        let stored: String = store
            .connection()
            .query_row("SELECT Amount FROM history", [], |r| r.get(0))
            .unwrap();
        assert_eq!(stored, "3.14");
    }

    #[test]
    fn dropped_scope_rolls_back() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        {
            let mut scope = store.begin().unwrap();
            scope.insert(&record("1", "Shop")).unwrap();
            scope.insert(&record("2", "Shop")).unwrap();
        }
        assert_eq!(store.count().unwrap(), 0);

        let mut scope = store.begin().unwrap();
        scope.insert(&record("1", "Shop")).unwrap();
        scope.rollback().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn unclassified_records_are_refused() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let err = store.insert(&TransactionRecord::default()).unwrap_err();
        assert!(matches!(err, LedgerError::Validation { field: "Description", .. }));
    }

    #[test]
    fn delete_all_reports_removed_rows() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.delete_all().unwrap(), 0);
        store.insert(&record("1", "Shop")).unwrap();
        store.insert(&record("2", "Shop")).unwrap();
        assert_eq!(store.delete_all().unwrap(), 2);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn reopening_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.sqlite");
        let mut store = SqliteStore::open(&path).unwrap();
        store.insert(&record("1", "Shop")).unwrap();
        store.close().unwrap();

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }
}
