// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Shape checking for CSV tables, shared by the ledger files and by tables
//! supplied from outside.

use crate::error::{Result, TallyError};
use crate::models::{ExpenseRecord, IncomeRecord, MAX_AMOUNT, UndatedEntry};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const DATE: &str = "Date";
pub const CATEGORY: &str = "Category";
pub const DESCRIPTION: &str = "Description";
pub const SOURCE: &str = "Source";
pub const AMOUNT: &str = "Amount";

pub const EXPENSE_HEADERS: [&str; 4] = [DATE, CATEGORY, DESCRIPTION, AMOUNT];
pub const INCOME_HEADERS: [&str; 3] = [DATE, SOURCE, AMOUNT];

#[derive(Debug, Clone)]
pub struct RawRow {
    pub line: u64,
    pub fields: StringRecord,
}

/// A CSV table with its header row, before any field is interpreted.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn require(&self, name: &str) -> Result<usize> {
        self.column(name).ok_or_else(|| {
            TallyError::Schema(format!(
                "missing required column '{}' (found: {})",
                name,
                self.headers.join(", ")
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IngestedTable {
    ExpenseTable(Vec<ExpenseRecord>),
    IncomeTable(Vec<IncomeRecord>),
    /// Category and Amount without a Date column.
    UndatedExpenseTable(Vec<UndatedEntry>),
    /// Source and Amount without a Date column.
    UndatedIncomeTable(Vec<UndatedEntry>),
    Unrecognized { headers: Vec<String> },
}

pub fn parse_table<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let fields = result?;
        let line = fields.position().map(|p| p.line()).unwrap_or(0);
        rows.push(RawRow { line, fields });
    }
    Ok(RawTable { headers, rows })
}

pub fn read_table(path: &Path) -> Result<RawTable> {
    let file = File::open(path).map_err(|e| TallyError::io(path, e))?;
    parse_table(file)
}

/// Accepts a plain ISO date or a timestamp; any time of day is dropped.
pub fn parse_date_field(raw: &str, line: u64) -> Result<NaiveDate> {
    let s = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    Err(TallyError::Parse {
        line,
        message: format!("invalid date '{}', expected YYYY-MM-DD", raw),
    })
}

/// Accepts plain decimals and scientific notation such as `1.5e3`. Values
/// beyond `MAX_AMOUNT` in either direction are rejected.
pub fn parse_amount_field(raw: &str, line: u64) -> Result<Decimal> {
    let s = raw.trim();
    let amount = s
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|_| TallyError::Parse {
            line,
            message: format!("invalid amount '{}'", raw),
        })?;
    if amount.abs() > MAX_AMOUNT {
        return Err(TallyError::Parse {
            line,
            message: format!("amount '{}' exceeds the limit of {}", raw, MAX_AMOUNT),
        });
    }
    Ok(amount)
}

fn field<'a>(row: &'a RawRow, idx: usize) -> &'a str {
    row.fields.get(idx).unwrap_or("")
}

pub fn expenses_from_table(table: &RawTable) -> Result<Vec<ExpenseRecord>> {
    let date = table.require(DATE)?;
    let category = table.require(CATEGORY)?;
    let amount = table.require(AMOUNT)?;
    let description = table.column(DESCRIPTION);

    table
        .rows
        .iter()
        .map(|row| -> Result<ExpenseRecord> {
            Ok(ExpenseRecord {
                date: parse_date_field(field(row, date), row.line)?,
                category: field(row, category).to_string(),
                description: description
                    .map(|i| field(row, i).to_string())
                    .unwrap_or_default(),
                amount: parse_amount_field(field(row, amount), row.line)?,
            })
        })
        .collect()
}

pub fn incomes_from_table(table: &RawTable) -> Result<Vec<IncomeRecord>> {
    let date = table.require(DATE)?;
    let source = table.require(SOURCE)?;
    let amount = table.require(AMOUNT)?;

    table
        .rows
        .iter()
        .map(|row| -> Result<IncomeRecord> {
            Ok(IncomeRecord {
                date: parse_date_field(field(row, date), row.line)?,
                source: field(row, source).to_string(),
                amount: parse_amount_field(field(row, amount), row.line)?,
            })
        })
        .collect()
}

fn undated_from_table(table: &RawTable, label: &str) -> Result<Vec<UndatedEntry>> {
    let label = table.require(label)?;
    let amount = table.require(AMOUNT)?;

    table
        .rows
        .iter()
        .map(|row| -> Result<UndatedEntry> {
            Ok(UndatedEntry {
                label: field(row, label).to_string(),
                amount: parse_amount_field(field(row, amount), row.line)?,
            })
        })
        .collect()
}

/// Decides whether a table holds expenses or income from its header row.
/// A header naming both `Category` and `Source` is rejected rather than
/// guessed at. Without a `Date` column the rows can still be totalled, so they
/// come back as one of the undated variants.
pub fn classify(table: &RawTable) -> Result<IngestedTable> {
    let has_category = table.column(CATEGORY).is_some();
    let has_source = table.column(SOURCE).is_some();
    let dated = table.column(DATE).is_some();
    match (has_category, has_source) {
        (true, true) => Err(TallyError::Schema(format!(
            "ambiguous table: both '{}' and '{}' columns present",
            CATEGORY, SOURCE
        ))),
        (true, false) if dated => Ok(IngestedTable::ExpenseTable(expenses_from_table(table)?)),
        (true, false) => Ok(IngestedTable::UndatedExpenseTable(undated_from_table(
            table, CATEGORY,
        )?)),
        (false, true) if dated => Ok(IngestedTable::IncomeTable(incomes_from_table(table)?)),
        (false, true) => Ok(IngestedTable::UndatedIncomeTable(undated_from_table(
            table, SOURCE,
        )?)),
        (false, false) => {
            log::warn!("unrecognized table columns: {:?}", table.headers);
            Ok(IngestedTable::Unrecognized {
                headers: table.headers.clone(),
            })
        }
    }
}
