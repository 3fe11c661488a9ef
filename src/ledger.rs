// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Result, TallyError};
use crate::ingest::{self, EXPENSE_HEADERS, INCOME_HEADERS};
use crate::models::{ExpenseRecord, IncomeRecord};
use csv::WriterBuilder;
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// The pair of CSV ledgers kept for one user: `expenses_<user>.csv` and
/// `income_<user>.csv`. Rows are only ever appended.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    dir: PathBuf,
    user: String,
}

impl LedgerStore {
    pub fn new(dir: impl Into<PathBuf>, user: impl Into<String>) -> Self {
        LedgerStore {
            dir: dir.into(),
            user: user.into(),
        }
    }

    pub fn expense_path(&self) -> PathBuf {
        self.dir.join(format!("expenses_{}.csv", self.user))
    }

    pub fn income_path(&self) -> PathBuf {
        self.dir.join(format!("income_{}.csv", self.user))
    }

    /// Creates each ledger with just its header row. Existing files are left
    /// alone.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| TallyError::io(&self.dir, e))?;
        init_file(&self.expense_path(), &EXPENSE_HEADERS)?;
        init_file(&self.income_path(), &INCOME_HEADERS)?;
        Ok(())
    }

    pub fn append_expense(&self, rec: &ExpenseRecord) -> Result<()> {
        self.append_expenses(std::slice::from_ref(rec))
    }

    pub fn append_income(&self, rec: &IncomeRecord) -> Result<()> {
        self.append_incomes(std::slice::from_ref(rec))
    }

    /// Appends every record in one write, or nothing if the ledger cannot be
    /// opened.
    pub fn append_expenses(&self, recs: &[ExpenseRecord]) -> Result<()> {
        let rows = recs.iter().map(|rec| {
            [
                rec.date.to_string(),
                rec.category.clone(),
                rec.description.clone(),
                rec.amount.to_string(),
            ]
        });
        append_rows(&self.expense_path(), rows)
    }

    pub fn append_incomes(&self, recs: &[IncomeRecord]) -> Result<()> {
        let rows = recs
            .iter()
            .map(|rec| [rec.date.to_string(), rec.source.clone(), rec.amount.to_string()]);
        append_rows(&self.income_path(), rows)
    }

    pub fn read_expenses(&self) -> Result<Vec<ExpenseRecord>> {
        let path = self.expense_path();
        let table = ingest::read_table(&path)?;
        let records = ingest::expenses_from_table(&table)?;
        log::debug!("read {} expenses from {}", records.len(), path.display());
        Ok(records)
    }

    pub fn read_incomes(&self) -> Result<Vec<IncomeRecord>> {
        let path = self.income_path();
        let table = ingest::read_table(&path)?;
        let records = ingest::incomes_from_table(&table)?;
        log::debug!("read {} incomes from {}", records.len(), path.display());
        Ok(records)
    }
}

fn init_file(path: &Path, headers: &[&str]) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(headers)?;
    wtr.flush().map_err(|e| TallyError::io(path, e))?;
    log::debug!("created ledger {}", path.display());
    Ok(())
}

// Single-process append. Concurrent writers would need a lock around this.
fn append_rows<const N: usize>(
    path: &Path,
    rows: impl IntoIterator<Item = [String; N]>,
) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    let mut count = 0usize;
    for row in rows {
        wtr.write_record(&row)?;
        count += 1;
    }
    let buf = wtr
        .into_inner()
        .map_err(|e| TallyError::io(path, std::io::Error::other(e.to_string())))?;
    if buf.is_empty() {
        return Ok(());
    }

    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .open(path)
        .map_err(|e| TallyError::io(path, e))?;
    let io = |e: std::io::Error| TallyError::io(path, e);
    // A hand-edited ledger may lack a final newline.
    if file.metadata().map_err(io)?.len() > 0 {
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1)).map_err(io)?;
        file.read_exact(&mut last).map_err(io)?;
        if last[0] != b'\n' {
            file.write_all(b"\n").map_err(io)?;
        }
    }
    file.write_all(&buf).map_err(io)?;
    file.flush().map_err(io)?;
    log::debug!("appended {} rows to {}", count, path.display());
    Ok(())
}
