// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use log::info;
use serde::Serialize;

use super::required;
use crate::api::{ApiClient, NewAccount, UpdateAccount};
use crate::metrics::{balance_by_type, total_balance};
use crate::models::{Account, AccountType};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn handle(client: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(client, sub)?,
        Some(("add", sub)) => {
            let kind: AccountType = required(sub, "type")?.parse()?;
            let account = client.create_account(&NewAccount {
                name: required(sub, "name")?.trim().to_string(),
                r#type: kind,
                currency: sub.get_one::<String>("currency").map(|c| c.to_uppercase()),
                parent_account_id: sub.get_one::<String>("parent").cloned(),
            })?;
            info!("Created account {}", account.id);
            println!(
                "Added {} '{}' ({}) id={}",
                account.r#type, account.name, account.currency, account.id
            );
        }
        Some(("edit", sub)) => edit(client, sub)?,
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            client.delete_account(id)?;
            println!("Removed account {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn edit(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "id")?;
    let name = sub.get_one::<String>("name").map(String::as_str);
    let kind = sub
        .get_one::<String>("type")
        .map(|t| t.parse::<AccountType>())
        .transpose()?;
    let currency = sub.get_one::<String>("currency").map(String::as_str);
    if name.is_none() && kind.is_none() && currency.is_none() {
        bail!("Nothing to change: pass --name, --type or --currency");
    }
    let current = client.account(id)?;
    let update = UpdateAccount::merged(&current, name, kind, currency);
    let account = client.update_account(id, &update)?;
    info!("Updated account {}", account.id);
    println!(
        "Updated {} '{}' ({}) id={}",
        account.r#type, account.name, account.currency, account.id
    );
    Ok(())
}

fn list(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let accounts = client.accounts()?;
    let data = wallet_rows(&accounts);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let mut rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                let name = if r.depth > 0 {
                    format!("{}└ {}", "  ".repeat(r.depth - 1), r.name)
                } else {
                    r.name.clone()
                };
                vec![
                    name,
                    r.r#type.to_string(),
                    r.currency.clone(),
                    fmt_money(&r.balance),
                    r.id.clone(),
                ]
            })
            .collect();
        for (kind, bal) in balance_by_type(&accounts) {
            rows.push(vec![
                format!("Total {}", kind),
                String::new(),
                String::new(),
                fmt_money(&bal),
                String::new(),
            ]);
        }
        rows.push(vec![
            "Total".into(),
            String::new(),
            String::new(),
            fmt_money(&total_balance(&accounts)),
            String::new(),
        ]);
        println!(
            "{}",
            pretty_table(&["Account", "Type", "CCY", "Balance", "Id"], rows)
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct WalletRow {
    pub id: String,
    pub name: String,
    pub r#type: AccountType,
    pub currency: String,
    pub balance: rust_decimal::Decimal,
    pub depth: usize,
}

/// Accounts in display order with their pocket nesting depth.
pub fn wallet_rows(accounts: &[Account]) -> Vec<WalletRow> {
    fn walk(accounts: &[Account], depth: usize, out: &mut Vec<WalletRow>) {
        for a in accounts {
            out.push(WalletRow {
                id: a.id.clone(),
                name: a.name.clone(),
                r#type: a.r#type,
                currency: a.currency.clone(),
                balance: a.balance,
                depth,
            });
            walk(&a.sub_accounts, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    walk(accounts, 0, &mut out);
    out
}
