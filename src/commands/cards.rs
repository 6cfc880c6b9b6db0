// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use chrono::NaiveDate;
use log::info;
use rust_decimal::Decimal;
use serde::Serialize;

use super::required;
use crate::api::{ApiClient, NewCreditCard};
use crate::metrics::{DueUrgency, credit_card_usage, days_until_due};
use crate::models::CreditCard;
use crate::utils::{
    fmt_money, fmt_percent, maybe_print_json, parse_amount, parse_date, parse_day_of_month,
    pretty_table, today,
};

pub fn handle(client: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let cards = client.credit_cards()?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cards)? {
                let rows = cards
                    .iter()
                    .map(|c| {
                        vec![
                            format!("{} ****{}", c.card_name, c.last_four_digits),
                            fmt_money(&c.credit_limit),
                            fmt_money(&c.current_balance),
                            c.billing_date.to_string(),
                            c.payment_due_date.to_string(),
                            c.id.clone(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["Card", "Limit", "Balance", "Billing day", "Due day", "Id"],
                        rows
                    )
                );
            }
        }
        Some(("add", sub)) => add(client, sub)?,
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            client.delete_credit_card(id)?;
            println!("Removed credit card {}", id);
        }
        Some(("status", sub)) => {
            let as_of = match sub.get_one::<String>("today") {
                Some(d) => parse_date(d)?,
                None => today(),
            };
            let data = card_status_rows(&client.credit_cards()?, as_of);
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|r| {
                        vec![
                            r.card.clone(),
                            fmt_percent(&r.usage_percent),
                            fmt_money(&r.available),
                            if r.is_near_limit { "yes" } else { "" }.to_string(),
                            format!("{} ({})", r.days_until_due, r.urgency.label()),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Card", "Used", "Available", "Near limit", "Due in days"], rows)
                );
            }
        }
        _ => {}
    }
    Ok(())
}

fn add(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let last4 = required(sub, "last4")?.trim();
    if last4.len() != 4 || !last4.chars().all(|c| c.is_ascii_digit()) {
        bail!("--last4 must be exactly four digits, got '{}'", last4);
    }
    let card = client.create_credit_card(&NewCreditCard {
        card_name: required(sub, "name")?.trim().to_string(),
        last_four_digits: last4.to_string(),
        credit_limit: parse_amount(required(sub, "limit")?)?,
        current_balance: sub
            .get_one::<String>("balance")
            .map(|b| parse_amount(b))
            .transpose()?,
        billing_date: parse_day_of_month(required(sub, "billing_day")?)?,
        payment_due_date: parse_day_of_month(required(sub, "due_day")?)?,
    })?;
    info!("Created credit card {}", card.id);
    println!("Added card {} ****{} id={}", card.card_name, card.last_four_digits, card.id);
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct CardStatusRow {
    pub id: String,
    pub card: String,
    pub credit_limit: Decimal,
    pub current_balance: Decimal,
    pub usage_percent: Decimal,
    pub available: Decimal,
    pub is_near_limit: bool,
    pub days_until_due: i64,
    pub urgency: DueUrgency,
}

/// Cards ordered by the nearest payment due date.
pub fn card_status_rows(cards: &[CreditCard], as_of: NaiveDate) -> Vec<CardStatusRow> {
    let mut rows: Vec<CardStatusRow> = cards
        .iter()
        .map(|c| {
            let usage = credit_card_usage(c);
            let days = days_until_due(c.payment_due_date, as_of);
            CardStatusRow {
                id: c.id.clone(),
                card: format!("{} ****{}", c.card_name, c.last_four_digits),
                credit_limit: c.credit_limit,
                current_balance: c.current_balance,
                usage_percent: usage.usage_percent,
                available: usage.available,
                is_near_limit: usage.is_near_limit,
                days_until_due: days,
                urgency: DueUrgency::from_days(days),
            }
        })
        .collect();
    rows.sort_by_key(|r| r.days_until_due);
    rows
}
