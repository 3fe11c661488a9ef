// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Spending categories offered when entering an expense by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Bills,
    Entertainment,
    Other,
}

impl Category {
    pub const NAMES: [&'static str; 6] = [
        "Food",
        "Transport",
        "Shopping",
        "Bills",
        "Entertainment",
        "Other",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }

    /// True when `name` is one of the built-in categories.
    pub fn is_known(name: &str) -> bool {
        Self::NAMES.contains(&name)
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Food" => Ok(Category::Food),
            "Transport" => Ok(Category::Transport),
            "Shopping" => Ok(Category::Shopping),
            "Bills" => Ok(Category::Bills),
            "Entertainment" => Ok(Category::Entertainment),
            "Other" => Ok(Category::Other),
            _ => Err(format!("Unknown category '{}'", s)),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Category is kept as plain text on records: files edited by hand or imported
// from elsewhere may carry names outside the built-in set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub date: NaiveDate,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub date: NaiveDate,
    pub source: String,
    pub amount: Decimal,
}

/// A row from an imported table that has no `Date` column. `label` is the
/// category for expenses or the source for income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UndatedEntry {
    pub label: String,
    pub amount: Decimal,
}

/// Largest magnitude accepted for a single amount (10^15). Keeps every sum over
/// a ledger well inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// A calendar month. Orders chronologically and prints as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn of(date: NaiveDate) -> Self {
        Month {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Month::of(date) == *self
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let first = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .map_err(|_| format!("Invalid month '{}', expected YYYY-MM", s))?;
        Ok(Month::of(first))
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
