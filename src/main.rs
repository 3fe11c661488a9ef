// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use tallybook::{cli, commands, config::Config, session::AppContext};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config = Config::from_matches(&matches)?;
    let mut ctx = AppContext::new(config);
    if let Some(pw) = matches.get_one::<String>("password") {
        ctx.session.login(pw)?;
    }

    match matches.subcommand() {
        Some(("init", _)) => {
            let store = ctx.ledger()?;
            store.init()?;
            println!("Expenses ledger: {}", store.expense_path().display());
            println!("Income ledger:   {}", store.income_path().display());
        }
        Some(("expense", sub)) => {
            ensure_ledgers(&ctx)?;
            commands::expenses::handle(&ctx, sub)?
        }
        Some(("income", sub)) => {
            ensure_ledgers(&ctx)?;
            commands::income::handle(&ctx, sub)?
        }
        Some(("report", sub)) => {
            ensure_ledgers(&ctx)?;
            commands::reports::handle(&ctx, sub)?
        }
        Some(("import", sub)) => {
            ensure_ledgers(&ctx)?;
            commands::importer::handle(&ctx, sub)?
        }
        Some(("export", sub)) => {
            ensure_ledgers(&ctx)?;
            commands::exporter::handle(&ctx, sub)?
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

// First use on a fresh data dir behaves like `init`.
fn ensure_ledgers(ctx: &AppContext) -> Result<()> {
    ctx.ledger()?.init()?;
    Ok(())
}
