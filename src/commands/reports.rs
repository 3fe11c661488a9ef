// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{self, Dashboard};
use crate::models::{Category, ExpenseRecord, IncomeRecord, Month};
use crate::session::AppContext;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(ctx, sub)?,
        Some(("categories", sub)) => categories(ctx, sub)?,
        Some(("daily", sub)) => daily(ctx, sub)?,
        Some(("monthly", sub)) => monthly(ctx, sub)?,
        Some(("income", sub)) => income(ctx, sub)?,
        Some(("compare", sub)) => compare(ctx, sub)?,
        Some(("dashboard", sub)) => dashboard(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

/// Reads both ledgers in full. Reports are always recomputed from these.
pub fn load(ctx: &AppContext) -> Result<(Vec<ExpenseRecord>, Vec<IncomeRecord>)> {
    let store = ctx.ledger()?;
    let expenses = store
        .read_expenses()
        .with_context(|| format!("Read {}", store.expense_path().display()))?;
    let incomes = store
        .read_incomes()
        .with_context(|| format!("Read {}", store.income_path().display()))?;
    Ok((expenses, incomes))
}

fn flags(sub: &clap::ArgMatches) -> (bool, bool) {
    (sub.get_flag("json"), sub.get_flag("jsonl"))
}

fn summary(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = flags(sub);
    let (expenses, incomes) = load(ctx)?;
    let totals = engine::compute_totals(&expenses, &incomes);
    if !maybe_print_json(json_flag, jsonl_flag, &totals)? {
        print_totals(ctx, &totals);
    }
    Ok(())
}

fn print_totals(ctx: &AppContext, totals: &engine::Totals) {
    let sym = &ctx.config.currency_symbol;
    println!(
        "{}",
        pretty_table(
            &["Total Expenses", "Total Income", "Savings"],
            vec![vec![
                fmt_money(&totals.expense, sym),
                fmt_money(&totals.income, sym),
                fmt_money(&totals.savings, sym),
            ]],
        )
    );
}

fn categories(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = flags(sub);
    let (expenses, _) = load(ctx)?;
    let totals = engine::compute_category_totals(&expenses);
    for name in totals.keys().filter(|c| !Category::is_known(c)) {
        log::info!("category '{}' is not one of the built-in categories", name);
    }

    if let Some(n) = sub.get_one::<usize>("top") {
        let top = engine::top_categories(&totals, *n);
        if !maybe_print_json(json_flag, jsonl_flag, &top)? {
            print_top(&top);
        }
    } else {
        let shares = engine::compute_category_shares(&totals);
        if !maybe_print_json(json_flag, jsonl_flag, &shares)? {
            print_shares(&shares);
        }
    }
    Ok(())
}

fn print_top(top: &[engine::CategoryTotal]) {
    let rows = top
        .iter()
        .enumerate()
        .map(|(i, c)| {
            vec![
                (i + 1).to_string(),
                c.category.clone(),
                format!("{:.2}", c.amount),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["#", "Category", "Spent"], rows));
}

fn print_shares(shares: &[engine::CategoryShare]) {
    let rows = shares
        .iter()
        .map(|c| {
            vec![
                c.category.clone(),
                format!("{:.2}", c.amount),
                c.percent
                    .map(|p| format!("{:.2}%", p))
                    .unwrap_or_else(|| "n/a".to_string()),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));
}

fn daily(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = flags(sub);
    let (expenses, _) = load(ctx)?;
    let points = engine::daily_points(&engine::compute_daily_series(&expenses));
    if !maybe_print_json(json_flag, jsonl_flag, &points)? {
        print_daily(&points);
    }
    Ok(())
}

fn print_daily(points: &[engine::DailyPoint]) {
    let rows = points
        .iter()
        .map(|p| vec![p.date.to_string(), format!("{:.2}", p.amount)])
        .collect();
    println!("{}", pretty_table(&["Date", "Spent"], rows));
}

fn monthly(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = flags(sub);
    let (expenses, _) = load(ctx)?;
    let points =
        engine::monthly_category_points(&engine::compute_monthly_category_series(&expenses));
    if !maybe_print_json(json_flag, jsonl_flag, &points)? {
        print_monthly_by_category(&points);
    }
    Ok(())
}

fn print_monthly_by_category(points: &[engine::MonthlyCategoryPoint]) {
    let rows = points
        .iter()
        .map(|p| {
            vec![
                p.month.to_string(),
                p.category.clone(),
                format!("{:.2}", p.amount),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Month", "Category", "Spent"], rows));
}

#[derive(Serialize)]
struct IncomeReport {
    by_source: Vec<engine::SourceTotal>,
    monthly: Vec<engine::MonthlyPoint>,
}

fn income(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = flags(sub);
    let (_, incomes) = load(ctx)?;
    let report = IncomeReport {
        by_source: engine::compute_source_totals(&incomes)
            .into_iter()
            .map(|(source, amount)| engine::SourceTotal { source, amount })
            .collect(),
        monthly: engine::monthly_points(&engine::compute_monthly_income_series(&incomes)),
    };
    if !maybe_print_json(json_flag, jsonl_flag, &report)? {
        print_income(&report.by_source, &report.monthly);
    }
    Ok(())
}

fn print_income(by_source: &[engine::SourceTotal], monthly: &[engine::MonthlyPoint]) {
    let rows = by_source
        .iter()
        .map(|s| vec![s.source.clone(), format!("{:.2}", s.amount)])
        .collect();
    println!("{}", pretty_table(&["Source", "Income"], rows));
    let rows = monthly
        .iter()
        .map(|p| vec![p.month.to_string(), format!("{:.2}", p.amount)])
        .collect();
    println!("{}", pretty_table(&["Month", "Income"], rows));
}

#[derive(Debug, Serialize)]
pub struct CompareRow {
    pub month: Month,
    pub income: Decimal,
    pub expense: Decimal,
    pub savings: Decimal,
}

/// Monthly comparison joined with the running savings for the same month.
pub fn compare_rows(expenses: &[ExpenseRecord], incomes: &[IncomeRecord]) -> Vec<CompareRow> {
    let comparison = engine::compute_monthly_comparison(incomes, expenses);
    let savings = engine::compute_cumulative_savings(&comparison);
    join_savings(&comparison, &savings)
}

fn join_savings(
    comparison: &[engine::MonthlyComparison],
    savings: &[engine::SavingsPoint],
) -> Vec<CompareRow> {
    comparison
        .iter()
        .zip(savings)
        .map(|(c, s)| CompareRow {
            month: c.month,
            income: c.income,
            expense: c.expense,
            savings: s.savings,
        })
        .collect()
}

fn compare(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = flags(sub);
    let (expenses, incomes) = load(ctx)?;
    let rows = compare_rows(&expenses, &incomes);
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        print_compare(&rows);
    }
    Ok(())
}

fn print_compare(rows: &[CompareRow]) {
    let data = rows
        .iter()
        .map(|r| {
            vec![
                r.month.to_string(),
                format!("{:.2}", r.income),
                format!("{:.2}", r.expense),
                format!("{:.2}", r.income - r.expense),
                format!("{:.2}", r.savings),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expenses", "Net", "Cumulative Savings"], data)
    );
}

fn dashboard(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = flags(sub);
    let top_n = *sub.get_one::<usize>("top").unwrap_or(&5);
    let (expenses, incomes) = load(ctx)?;
    let dash = Dashboard::build(&expenses, &incomes, top_n);
    if maybe_print_json(json_flag, jsonl_flag, &dash)? {
        return Ok(());
    }

    print_totals(ctx, &dash.totals);
    if !expenses.is_empty() {
        println!("Expense insights");
        print_shares(&dash.category_shares);
        print_top(&dash.top_categories);
        print_daily(&dash.daily);
        print_monthly_by_category(&dash.monthly_by_category);
    }
    if !incomes.is_empty() {
        println!("Income insights");
        print_income(&dash.income_by_source, &dash.monthly_income);
    }
    if !expenses.is_empty() && !incomes.is_empty() {
        println!("Income vs expenses");
        print_compare(&join_savings(&dash.comparison, &dash.cumulative_savings));
    }
    Ok(())
}
