// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;

use super::required;
use crate::db;
use crate::session::{self, Session};

pub fn handle(conn: &Connection, current: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-url", sub)) => {
            let url = required(sub, "url")?.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                bail!("API URL '{}' must start with http:// or https://", url);
            }
            session::set_api_url(conn, url)?;
            println!("API URL set to {}", url.trim_end_matches('/'));
        }
        Some(("show", _)) => {
            println!("API URL:       {}", current.api_url);
            println!(
                "Logged in:     {}",
                if current.token.is_some() { "yes" } else { "no" }
            );
            println!("Session store: {}", db::db_path()?.display());
        }
        _ => {}
    }
    Ok(())
}
