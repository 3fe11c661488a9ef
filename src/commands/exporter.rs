// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ingest::{EXPENSE_HEADERS, INCOME_HEADERS};
use crate::session::AppContext;
use anyhow::{Context, Result, anyhow};

pub fn handle(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    let kind = m.get_one::<String>("kind").unwrap().as_str();
    let fmt = m.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = m.get_one::<String>("out").unwrap().trim();

    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let store = ctx.ledger()?;
    match kind {
        "expenses" => {
            let rows = store.read_expenses()?;
            if fmt == "csv" {
                let mut wtr =
                    csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
                wtr.write_record(EXPENSE_HEADERS)?;
                for r in &rows {
                    wtr.write_record([
                        r.date.to_string(),
                        r.category.clone(),
                        r.description.clone(),
                        r.amount.to_string(),
                    ])?;
                }
                wtr.flush()?;
            } else {
                std::fs::write(out, serde_json::to_string_pretty(&rows)?)
                    .with_context(|| format!("Write {}", out))?;
            }
            println!("Exported {} expenses to {}", rows.len(), out);
        }
        "income" => {
            let rows = store.read_incomes()?;
            if fmt == "csv" {
                let mut wtr =
                    csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
                wtr.write_record(INCOME_HEADERS)?;
                for r in &rows {
                    wtr.write_record([r.date.to_string(), r.source.clone(), r.amount.to_string()])?;
                }
                wtr.flush()?;
            } else {
                std::fs::write(out, serde_json::to_string_pretty(&rows)?)
                    .with_context(|| format!("Write {}", out))?;
            }
            println!("Exported {} income entries to {}", rows.len(), out);
        }
        other => return Err(anyhow!("Unknown ledger '{}' (use expenses|income)", other)),
    }
    Ok(())
}
