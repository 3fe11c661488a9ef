// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived views over the expense and income ledgers.
//!
//! Every function here is pure: it takes the full ledger contents and
//! recomputes its view from scratch. Grouped results are keyed by ordered maps
//! so the output never depends on the order records were appended in.
//!
//! Amounts are assumed to lie within `models::MAX_AMOUNT`, which the parsers
//! enforce; sums over any realistic ledger then stay inside `Decimal` range.

use crate::models::{ExpenseRecord, IncomeRecord, Month, UndatedEntry};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

pub type CategoryTotals = BTreeMap<String, Decimal>;
pub type SourceTotals = BTreeMap<String, Decimal>;
pub type DailySeries = BTreeMap<NaiveDate, Decimal>;
pub type MonthlySeries = BTreeMap<Month, Decimal>;
pub type MonthlyCategorySeries = BTreeMap<(Month, String), Decimal>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub expense: Decimal,
    pub income: Decimal,
    pub savings: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    /// `None` when the ratio does not fit in a `Decimal`, which only happens
    /// when negative amounts cancel the total down to almost nothing.
    pub percent: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyComparison {
    pub month: Month,
    pub income: Decimal,
    pub expense: Decimal,
}

impl MonthlyComparison {
    pub fn net(&self) -> Decimal {
        self.income - self.expense
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavingsPoint {
    pub month: Month,
    pub savings: Decimal,
}

fn sum_by<T, K: Ord>(
    items: &[T],
    key: impl Fn(&T) -> K,
    amount: impl Fn(&T) -> Decimal,
) -> BTreeMap<K, Decimal> {
    let mut out = BTreeMap::new();
    for item in items {
        *out.entry(key(item)).or_insert(Decimal::ZERO) += amount(item);
    }
    out
}

pub fn compute_totals(expenses: &[ExpenseRecord], incomes: &[IncomeRecord]) -> Totals {
    let expense: Decimal = expenses.iter().map(|e| e.amount).sum();
    let income: Decimal = incomes.iter().map(|i| i.amount).sum();
    Totals {
        expense,
        income,
        savings: income - expense,
    }
}

/// Sums expenses per category string as stored, including names outside the
/// built-in set.
pub fn compute_category_totals(expenses: &[ExpenseRecord]) -> CategoryTotals {
    sum_by(expenses, |e| e.category.clone(), |e| e.amount)
}

pub fn compute_source_totals(incomes: &[IncomeRecord]) -> SourceTotals {
    sum_by(incomes, |i| i.source.clone(), |i| i.amount)
}

/// Per-label sums for rows imported without dates.
pub fn compute_label_totals(entries: &[UndatedEntry]) -> BTreeMap<String, Decimal> {
    sum_by(entries, |e| e.label.clone(), |e| e.amount)
}

/// The `n` largest categories, largest first. Equal totals keep the
/// alphabetical grouping order.
pub fn top_categories(totals: &CategoryTotals, n: usize) -> Vec<CategoryTotal> {
    let mut ranked: Vec<CategoryTotal> = totals
        .iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.clone(),
            amount: *amount,
        })
        .collect();
    ranked.sort_by(|a, b| b.amount.cmp(&a.amount));
    ranked.truncate(n);
    ranked
}

/// Each category's percentage of total spending. Empty when nothing was spent.
pub fn compute_category_shares(totals: &CategoryTotals) -> Vec<CategoryShare> {
    let total: Decimal = totals.values().copied().sum();
    if total.is_zero() {
        return Vec::new();
    }
    totals
        .iter()
        .map(|(category, amount)| {
            let percent = amount
                .checked_div(total)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map(|p| p.round_dp(2));
            if percent.is_none() {
                log::warn!("share of '{}' is out of range", category);
            }
            CategoryShare {
                category: category.clone(),
                amount: *amount,
                percent,
            }
        })
        .collect()
}

pub fn compute_daily_series(expenses: &[ExpenseRecord]) -> DailySeries {
    sum_by(expenses, |e| e.date, |e| e.amount)
}

pub fn compute_monthly_category_series(expenses: &[ExpenseRecord]) -> MonthlyCategorySeries {
    sum_by(
        expenses,
        |e| (Month::of(e.date), e.category.clone()),
        |e| e.amount,
    )
}

pub fn compute_monthly_expense_series(expenses: &[ExpenseRecord]) -> MonthlySeries {
    sum_by(expenses, |e| Month::of(e.date), |e| e.amount)
}

pub fn compute_monthly_income_series(incomes: &[IncomeRecord]) -> MonthlySeries {
    sum_by(incomes, |i| Month::of(i.date), |i| i.amount)
}

/// Outer join of monthly income and expense sums. A month present on only one
/// side gets zero on the other.
pub fn compute_monthly_comparison(
    incomes: &[IncomeRecord],
    expenses: &[ExpenseRecord],
) -> Vec<MonthlyComparison> {
    let income = compute_monthly_income_series(incomes);
    let expense = compute_monthly_expense_series(expenses);

    let mut joined: BTreeMap<Month, (Decimal, Decimal)> = BTreeMap::new();
    for (month, amount) in income {
        joined.entry(month).or_insert((Decimal::ZERO, Decimal::ZERO)).0 = amount;
    }
    for (month, amount) in expense {
        joined.entry(month).or_insert((Decimal::ZERO, Decimal::ZERO)).1 = amount;
    }
    joined
        .into_iter()
        .map(|(month, (income, expense))| MonthlyComparison {
            month,
            income,
            expense,
        })
        .collect()
}

/// Running total of `income - expense`, oldest month first.
pub fn compute_cumulative_savings(comparison: &[MonthlyComparison]) -> Vec<SavingsPoint> {
    let mut rows: Vec<&MonthlyComparison> = comparison.iter().collect();
    rows.sort_by_key(|r| r.month);

    let mut running = Decimal::ZERO;
    rows.into_iter()
        .map(|r| {
            running += r.net();
            SavingsPoint {
                month: r.month,
                savings: running,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyPoint {
    pub month: Month,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyCategoryPoint {
    pub month: Month,
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceTotal {
    pub source: String,
    pub amount: Decimal,
}

pub fn daily_points(series: &DailySeries) -> Vec<DailyPoint> {
    series
        .iter()
        .map(|(date, amount)| DailyPoint {
            date: *date,
            amount: *amount,
        })
        .collect()
}

pub fn monthly_points(series: &MonthlySeries) -> Vec<MonthlyPoint> {
    series
        .iter()
        .map(|(month, amount)| MonthlyPoint {
            month: *month,
            amount: *amount,
        })
        .collect()
}

pub fn monthly_category_points(series: &MonthlyCategorySeries) -> Vec<MonthlyCategoryPoint> {
    series
        .iter()
        .map(|((month, category), amount)| MonthlyCategoryPoint {
            month: *month,
            category: category.clone(),
            amount: *amount,
        })
        .collect()
}

/// Every derived view in one pass over the ledgers, in a shape that
/// serializes directly to JSON.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub totals: Totals,
    pub category_shares: Vec<CategoryShare>,
    pub top_categories: Vec<CategoryTotal>,
    pub daily: Vec<DailyPoint>,
    pub monthly_by_category: Vec<MonthlyCategoryPoint>,
    pub income_by_source: Vec<SourceTotal>,
    pub monthly_income: Vec<MonthlyPoint>,
    pub comparison: Vec<MonthlyComparison>,
    pub cumulative_savings: Vec<SavingsPoint>,
}

impl Dashboard {
    pub fn build(expenses: &[ExpenseRecord], incomes: &[IncomeRecord], top_n: usize) -> Self {
        let categories = compute_category_totals(expenses);
        let comparison = compute_monthly_comparison(incomes, expenses);
        let cumulative_savings = compute_cumulative_savings(&comparison);
        Dashboard {
            totals: compute_totals(expenses, incomes),
            category_shares: compute_category_shares(&categories),
            top_categories: top_categories(&categories, top_n),
            daily: daily_points(&compute_daily_series(expenses)),
            monthly_by_category: monthly_category_points(&compute_monthly_category_series(
                expenses,
            )),
            income_by_source: compute_source_totals(incomes)
                .into_iter()
                .map(|(source, amount)| SourceTotal { source, amount })
                .collect(),
            monthly_income: monthly_points(&compute_monthly_income_series(incomes)),
            comparison,
            cumulative_savings,
        }
    }
}
