// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! All-or-nothing loading of a statement file.
//!
//! Every row of a file is normalized, classified and inserted inside one
//! [`WriteScope`](crate::store::WriteScope). The first failing row rolls the
//! whole scope back, so a file is either loaded completely or not at all.

use crate::classify::classify;
use crate::error::Result;
use crate::normalize::{SourceTable, normalize_row, read_source};
use crate::progress::ProgressReporter;
use crate::store::LedgerStore;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestResult {
    pub source: PathBuf,
    pub rows: usize,
}

pub struct Ingestor<'a> {
    store: &'a mut dyn LedgerStore,
    progress: &'a mut dyn ProgressReporter,
}

impl<'a> Ingestor<'a> {
    pub fn new(store: &'a mut dyn LedgerStore, progress: &'a mut dyn ProgressReporter) -> Self {
        Ingestor { store, progress }
    }

    pub fn ingest(&mut self, path: &Path) -> Result<IngestResult> {
        let table = read_source(path).inspect_err(|e| {
            error!("bulk_transaction_create: could not read {}: {}", path.display(), e)
        })?;
        self.ingest_table(path, &table)
    }

    /// Loads rows that were already read from `source`.
    pub fn ingest_table(&mut self, source: &Path, table: &SourceTable) -> Result<IngestResult> {
        info!(
            "bulk_transaction_create: loading {} rows from {}",
            table.len(),
            source.display()
        );
        self.progress.start(table.len());
        let outcome = self.load(table);
        self.progress.finish();

        match outcome {
            Ok(rows) => {
                info!("bulk_transaction_create: committed {} rows", rows);
                Ok(IngestResult {
                    source: source.to_path_buf(),
                    rows,
                })
            }
            Err(e) => {
                error!("bulk_transaction_create: nothing was loaded: {}", e);
                Err(e)
            }
        }
    }

    fn load(&mut self, table: &SourceTable) -> Result<usize> {
        let mut scope = self.store.begin()?;

        for row in &table.rows {
            let position = row.line;
            let staged = normalize_row(&row.cells)
                .map(classify)
                .and_then(|record| scope.insert(&record));
            match staged {
                Ok(id) => debug!("row {}: staged as id {}", position, id),
                Err(e) => {
                    if let Err(rb) = scope.rollback() {
                        warn!("bulk_transaction_create: rollback failed: {}", rb);
                    }
                    return Err(e.at_row(position));
                }
            }
            self.progress.advance();
        }

        scope.commit()?;
        Ok(table.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::models::{StoredTransaction, TransactionRecord};
    use crate::normalize::Cell;
    use crate::progress::Silent;
    use crate::store::WriteScope;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// In-memory store that can be told to fail the n-th insert.
    #[derive(Default)]
    struct FakeStore {
        committed: Vec<TransactionRecord>,
        fail_on_insert: Option<usize>,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    struct FakeScope<'a> {
        store: &'a mut FakeStore,
        staged: Vec<TransactionRecord>,
    }

    impl WriteScope for FakeScope<'_> {
        fn insert(&mut self, record: &TransactionRecord) -> Result<i64> {
            if self.store.fail_on_insert == Some(self.staged.len() + 1) {
                return Err(LedgerError::StoreWrite(rusqlite::Error::QueryReturnedNoRows));
            }
            self.staged.push(record.clone());
            Ok(self.staged.len() as i64)
        }

        fn commit(self: Box<Self>) -> Result<()> {
            let this = *self;
            this.store.log.borrow_mut().push("commit");
            this.store.committed.extend(this.staged);
            Ok(())
        }

        fn rollback(self: Box<Self>) -> Result<()> {
            self.store.log.borrow_mut().push("rollback");
            Ok(())
        }
    }

    impl LedgerStore for FakeStore {
        fn begin(&mut self) -> Result<Box<dyn WriteScope + '_>> {
            self.log.borrow_mut().push("begin");
            Ok(Box::new(FakeScope {
                store: self,
                staged: Vec::new(),
            }))
        }

        fn delete_all(&mut self) -> Result<usize> {
            let n = self.committed.len();
            self.committed.clear();
            Ok(n)
        }

        fn count(&self) -> Result<u64> {
            Ok(self.committed.len() as u64)
        }

        fn fetch_all(&self) -> Result<Vec<StoredTransaction>> {
            Ok(self
                .committed
                .iter()
                .enumerate()
                .map(|(i, r)| StoredTransaction {
                    id: i as i64 + 1,
                    record: r.clone(),
                })
                .collect())
        }
    }

    #[derive(Default)]
    struct CountingProgress {
        total: Option<usize>,
        advanced: usize,
        finished: bool,
    }

    impl ProgressReporter for CountingProgress {
        fn start(&mut self, total: usize) {
            self.total = Some(total);
        }
        fn advance(&mut self) {
            self.advanced += 1;
        }
        fn finish(&mut self) {
            self.finished = true;
        }
    }

    fn row(amount: &str, main: &str) -> Vec<Cell> {
        ["1", "2024-01-01", main, "", "", amount, "", "", "GBP"]
            .iter()
            .map(|v| Cell::text(v))
            .collect()
    }

    fn table(rows: Vec<Vec<Cell>>) -> SourceTable {
        SourceTable::from_cells(rows)
    }

    #[test]
    fn commits_every_row_once() {
        let mut store = FakeStore::default();
        let mut progress = CountingProgress::default();
        let t = table(vec![row("100", "Shop"), row("-50", "FRIDGETNP Ltd")]);
        let result = Ingestor::new(&mut store, &mut progress)
            .ingest_table(Path::new("in.csv"), &t)
            .unwrap();

        assert_eq!(result.rows, 2);
        assert_eq!(*store.log.borrow(), ["begin", "commit"]);
        let labels: Vec<_> = store
            .committed
            .iter()
            .map(|r| r.description.unwrap().as_str())
            .collect();
        assert_eq!(labels, ["Revenue", "Suppliers"]);
        assert_eq!(progress.total, Some(2));
        assert_eq!(progress.advanced, 2);
        assert!(progress.finished);
    }

    #[test]
    fn any_failing_insert_rolls_back_everything() {
        for k in 1..=4 {
            let mut store = FakeStore {
                fail_on_insert: Some(k),
                ..Default::default()
            };
            let mut progress = CountingProgress::default();
            let t = table((0..4).map(|i| row(&i.to_string(), "Shop")).collect());
            let err = Ingestor::new(&mut store, &mut progress)
                .ingest_table(Path::new("in.csv"), &t)
                .unwrap_err();

            assert_eq!(err.row(), Some(k + 1));
            assert!(matches!(err.root(), LedgerError::StoreWrite(_)));
            assert_eq!(store.count().unwrap(), 0);
            assert_eq!(*store.log.borrow(), ["begin", "rollback"]);
            assert_eq!(progress.advanced, k - 1);
            assert!(progress.finished);
        }
    }

    #[test]
    fn invalid_row_reports_its_position() {
        let mut store = FakeStore::default();
        let t = table(vec![row("1", "Shop"), row("1", "Shop"), row("oops", "Shop")]);
        let err = Ingestor::new(&mut store, &mut Silent)
            .ingest_table(Path::new("in.csv"), &t)
            .unwrap_err();
        assert_eq!(err.row(), Some(4));
        assert!(matches!(err.root(), LedgerError::Validation { field: "Amount", .. }));
        assert!(store.committed.is_empty());
    }

    #[test]
    fn errors_carry_the_source_line() {
        let mut store = FakeStore::default();
        let mut t = table(vec![row("1", "Shop"), row("bad", "Shop")]);
        t.rows[1].line = 7;
        let err = Ingestor::new(&mut store, &mut Silent)
            .ingest_table(Path::new("in.xlsx"), &t)
            .unwrap_err();
        assert_eq!(err.row(), Some(7));
    }

    #[test]
    fn header_only_file_loads_nothing() {
        let mut store = FakeStore::default();
        let result = Ingestor::new(&mut store, &mut Silent)
            .ingest_table(Path::new("in.csv"), &SourceTable::default())
            .unwrap();
        assert_eq!(result.rows, 0);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn unsupported_extension_never_opens_a_scope() {
        let mut store = FakeStore::default();
        let mut progress = CountingProgress::default();
        let err = Ingestor::new(&mut store, &mut progress)
            .ingest(Path::new("statement.txt"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::UnsupportedFormat(_)));
        assert!(store.log.borrow().is_empty());
        assert_eq!(progress.total, None);
    }
}
