// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use env_logger::Env;
use log::LevelFilter;

use fintrack::api::ApiClient;
use fintrack::session::Session;
use fintrack::{cli, commands, db};

fn init_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    match verbosity {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        _ => {
            builder.filter_level(LevelFilter::Debug);
        }
    }
    builder.init();
}

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    init_logging(matches.get_count("verbose"));

    let conn = db::open_or_init()?;
    let session = Session::load(
        &conn,
        matches.get_one::<String>("api_url").map(String::as_str),
    )?;
    let client = ApiClient::from_session(&session)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Session store initialized at {}", db::db_path()?.display());
        }
        Some(("config", sub)) => commands::config::handle(&conn, &session, sub)?,
        Some(("auth", sub)) => commands::auth::handle(&conn, &client, sub)?,
        Some(("wallet", sub)) => commands::wallets::handle(&client, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&client, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&client, sub)?,
        Some(("card", sub)) => commands::cards::handle(&client, sub)?,
        Some(("gold", sub)) => commands::gold::handle(&client, sub)?,
        Some(("report", sub)) => commands::reports::handle(&client, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&client, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
