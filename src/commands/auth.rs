// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use log::info;
use rusqlite::Connection;

use super::required;
use crate::api::{ApiClient, LoginRequest, RegisterRequest};
use crate::session;

const PASSWORD_ENV: &str = "FINTRACK_PASSWORD";

pub fn handle(conn: &Connection, client: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("login", sub)) => login(conn, client, sub)?,
        Some(("register", sub)) => register(client, sub)?,
        Some(("logout", _)) => {
            session::clear_token(conn)?;
            println!("Logged out");
        }
        Some(("whoami", _)) => {
            let user = client.me()?;
            println!(
                "{} <{}>{}",
                display_name(&user.full_name, user.username.as_deref()),
                user.email,
                if user.is_admin { " (admin)" } else { "" }
            );
        }
        _ => {}
    }
    Ok(())
}

fn login(conn: &Connection, client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let user = required(sub, "user")?;
    let password = match sub.get_one::<String>("password") {
        Some(p) => p.clone(),
        None => std::env::var(PASSWORD_ENV)
            .with_context(|| format!("Pass --password or set {}", PASSWORD_ENV))?,
    };
    let resp = client.login(&LoginRequest {
        username_or_email: user.trim().to_string(),
        password,
    })?;
    session::store_token(conn, &resp.token)?;
    info!("Stored token for {}", resp.user.email);
    println!(
        "Logged in as {} against {}",
        display_name(&resp.user.full_name, resp.user.username.as_deref()),
        client.base_url()
    );
    Ok(())
}

fn register(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let resp = client.register(&RegisterRequest {
        email: required(sub, "email")?.trim().to_string(),
        username: required(sub, "username")?.trim().to_string(),
        password: required(sub, "password")?.to_string(),
        full_name: required(sub, "full_name")?.trim().to_string(),
    })?;
    if resp.message.is_empty() {
        println!("Registered {}", resp.user.email);
    } else {
        println!("{} ({})", resp.message, resp.user.email);
    }
    println!("Run `fintrack auth login --user {}` to sign in", resp.user.email);
    Ok(())
}

pub fn display_name<'a>(full_name: &'a str, username: Option<&'a str>) -> &'a str {
    if !full_name.trim().is_empty() {
        return full_name;
    }
    username.filter(|u| !u.trim().is_empty()).unwrap_or("(unnamed)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_username() {
        assert_eq!(display_name("Budi Santoso", Some("budi")), "Budi Santoso");
        assert_eq!(display_name("  ", Some("budi")), "budi");
        assert_eq!(display_name("", None), "(unnamed)");
    }
}
