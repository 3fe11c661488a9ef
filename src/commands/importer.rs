// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine;
use crate::ingest::{self, IngestedTable, RawTable};
use crate::models::UndatedEntry;
use crate::session::AppContext;
use crate::utils::{fmt_money, pretty_table};
use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use std::path::Path;

pub fn handle(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    let path = m.get_one::<String>("path").unwrap().trim();
    let merge = m.get_flag("merge");
    let preview = *m.get_one::<usize>("preview").unwrap_or(&10);

    // Gate before touching the file so an anonymous session learns nothing.
    let store = ctx.ledger()?;
    let (table, ingested) = ingest_file(Path::new(path))?;
    print_preview(&table, preview);

    let sym = &ctx.config.currency_symbol;
    match ingested {
        IngestedTable::ExpenseTable(expenses) => {
            println!("Detected expense data ({} rows)", expenses.len());
            let totals = engine::compute_totals(&expenses, &[]);
            println!("Total expenses: {}", fmt_money(&totals.expense, sym));

            let rows = engine::compute_category_totals(&expenses)
                .into_iter()
                .map(|(c, a)| vec![c, format!("{:.2}", a)])
                .collect();
            println!("{}", pretty_table(&["Category", "Spent"], rows));
            let rows = engine::compute_monthly_expense_series(&expenses)
                .into_iter()
                .map(|(m, a)| vec![m.to_string(), format!("{:.2}", a)])
                .collect();
            println!("{}", pretty_table(&["Month", "Spent"], rows));

            if merge {
                store
                    .append_expenses(&expenses)
                    .context("Merge into expense ledger")?;
                println!(
                    "Merged {} expenses into {}",
                    expenses.len(),
                    store.expense_path().display()
                );
            }
        }
        IngestedTable::IncomeTable(incomes) => {
            println!("Detected income data ({} rows)", incomes.len());
            let totals = engine::compute_totals(&[], &incomes);
            println!("Total income: {}", fmt_money(&totals.income, sym));

            let rows = engine::compute_source_totals(&incomes)
                .into_iter()
                .map(|(s, a)| vec![s, format!("{:.2}", a)])
                .collect();
            println!("{}", pretty_table(&["Source", "Income"], rows));

            if merge {
                store
                    .append_incomes(&incomes)
                    .context("Merge into income ledger")?;
                println!(
                    "Merged {} income entries into {}",
                    incomes.len(),
                    store.income_path().display()
                );
            }
        }
        IngestedTable::UndatedExpenseTable(entries) => {
            if merge {
                bail!("Cannot merge {}: it has no 'Date' column", path);
            }
            println!("Detected expense data without dates ({} rows)", entries.len());
            print_label_totals(&entries, "Category", "Spent", "Total expenses", sym);
        }
        IngestedTable::UndatedIncomeTable(entries) => {
            if merge {
                bail!("Cannot merge {}: it has no 'Date' column", path);
            }
            println!("Detected income data without dates ({} rows)", entries.len());
            print_label_totals(&entries, "Source", "Income", "Total income", sym);
        }
        IngestedTable::Unrecognized { headers } => {
            println!(
                "Unrecognized file format (columns: {}). Expected a 'Category' column for expenses or a 'Source' column for income.",
                headers.join(", ")
            );
        }
    }
    Ok(())
}

/// Reads and classifies an external CSV. Either every row is accepted or the
/// whole file is rejected.
pub fn ingest_file(path: &Path) -> Result<(RawTable, IngestedTable)> {
    let table = ingest::read_table(path).with_context(|| format!("Open CSV {}", path.display()))?;
    let ingested =
        ingest::classify(&table).with_context(|| format!("Import {}", path.display()))?;
    Ok((table, ingested))
}

// No dates, so no monthly breakdown.
fn print_label_totals(
    entries: &[UndatedEntry],
    label: &str,
    column: &str,
    total_label: &str,
    sym: &str,
) {
    let total: Decimal = entries.iter().map(|e| e.amount).sum();
    println!("{}: {}", total_label, fmt_money(&total, sym));
    let rows = engine::compute_label_totals(entries)
        .into_iter()
        .map(|(l, a)| vec![l, format!("{:.2}", a)])
        .collect();
    println!("{}", pretty_table(&[label, column], rows));
}

fn print_preview(table: &RawTable, n: usize) {
    if n == 0 {
        return;
    }
    let headers: Vec<&str> = table.headers.iter().map(String::as_str).collect();
    let rows = table
        .rows
        .iter()
        .take(n)
        .map(|r| r.fields.iter().map(str::to_string).collect())
        .collect();
    println!("{}", pretty_table(&headers, rows));
}
