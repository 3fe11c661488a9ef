// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::IncomeRecord;
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
    let source = sub.get_one::<String>("source").unwrap().trim().to_string();
    if source.is_empty() {
        return Err(anyhow!("Income source must not be empty"));
    }
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;

    let rec = IncomeRecord {
        date,
        source,
        amount,
    };
    let store = ctx.ledger()?;
    store
        .append_income(&rec)
        .with_context(|| format!("Append to {}", store.income_path().display()))?;
    println!(
        "Recorded income {} on {} from '{}'",
        fmt_money(&rec.amount, &ctx.config.currency_symbol),
        rec.date,
        rec.source
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
                    r.source.clone(),
                    format!("{:.2}", r.amount),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Date", "Source", "Amount"], rows));
    }
    Ok(())
}

pub fn query_rows(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<Vec<IncomeRecord>> {
    let mut rows = ctx.ledger()?.read_incomes()?;

    if let Some(month) = sub.get_one::<String>("month") {
        let month = parse_month(month)?;
        rows.retain(|r| month.contains(r.date));
    }
    if let Some(source) = sub.get_one::<String>("source") {
        let source = source.trim();
        rows.retain(|r| r.source == source);
    }
    rows.reverse();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    Ok(rows)
}
