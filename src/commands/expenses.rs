// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, ExpenseRecord};
use crate::session::AppContext;
use crate::utils::{fmt_money, maybe_print_json, parse_amount, parse_date, parse_month, pretty_table};
use anyhow::{Context, Result, anyhow};

pub fn handle(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ctx, sub)?,
        Some(("list", sub)) => list(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => chrono::Local::now().date_naive(),
    };
    let category: Category = sub
        .get_one::<String>("category")
        .unwrap()
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let rec = ExpenseRecord {
        date,
        category: category.to_string(),
        description,
        amount,
    };
    let store = ctx.ledger()?;
    store
        .append_expense(&rec)
        .with_context(|| format!("Append to {}", store.expense_path().display()))?;
    println!(
        "Recorded expense {} on {} ({})",
        fmt_money(&rec.amount, &ctx.config.currency_symbol),
        rec.date,
        rec.category
    );
    Ok(())
}

fn list(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(ctx, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.to_string(),
                    r.category.clone(),
                    r.description.clone(),
                    format!("{:.2}", r.amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Category", "Description", "Amount"], rows)
        );
    }
    Ok(())
}

/// Expenses matching the list filters, newest first. Entries on the same day
/// keep most-recently-recorded first.
pub fn query_rows(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<Vec<ExpenseRecord>> {
    let mut rows = ctx.ledger()?.read_expenses()?;

    if let Some(month) = sub.get_one::<String>("month") {
        let month = parse_month(month)?;
        rows.retain(|r| month.contains(r.date));
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        let cat = cat.trim();
        rows.retain(|r| r.category == cat);
    }
    rows.reverse();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    Ok(rows)
}
