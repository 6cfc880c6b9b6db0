// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use log::info;
use serde::Serialize;

use super::required;
use crate::api::{ApiClient, NewTransaction, TransactionQuery};
use crate::metrics::{category_label, filter_by_month, summarize};
use crate::models::{Transaction, TransactionSummary, TransactionType};
use crate::utils::{
    fmt_money, maybe_print_json, parse_amount, parse_date, parse_month, pretty_table,
};

pub fn handle(client: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(client, sub)?,
        Some(("list", sub)) => list(client, sub)?,
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            client.delete_transaction(id)?;
            println!("Removed transaction {}", id);
        }
        Some(("summary", sub)) => summary(client, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let kind: TransactionType = required(sub, "type")?.parse()?;
    let amount = parse_amount(required(sub, "amount")?)?;
    let date = sub.get_one::<String>("date").map(|d| parse_date(d)).transpose()?;
    let tx = client.create_transaction(&NewTransaction {
        account_id: sub.get_one::<String>("account").cloned(),
        credit_card_id: sub.get_one::<String>("card").cloned(),
        r#type: kind,
        category: required(sub, "category")?.trim().to_string(),
        amount,
        description: sub.get_one::<String>("description").cloned(),
        transaction_date: date.map(|d| d.to_string()),
    })?;
    info!("Created transaction {}", tx.id);
    println!(
        "Recorded {} {} in {} on {} id={}",
        tx.r#type,
        fmt_money(&tx.amount),
        category_label(&tx.category),
        tx.transaction_date,
        tx.id
    );
    Ok(())
}

fn list(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let query = TransactionQuery {
        limit: sub.get_one::<u32>("limit").copied(),
        offset: sub.get_one::<u32>("offset").copied(),
    };
    let month = sub.get_one::<String>("month").map(|s| parse_month(s)).transpose()?;
    let kind = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<TransactionType>())
        .transpose()?;
    let txs = client.transactions(&query)?;
    let data = transaction_rows(&select(&txs, month, kind));
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.r#type.to_string(),
                    r.category.clone(),
                    fmt_money(&r.amount),
                    r.source.clone(),
                    r.description.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Category", "Amount", "Source", "Description", "Id"],
                rows,
            )
        );
    }
    Ok(())
}

/// Narrow a fetched page to one month and/or one type.
pub fn select(
    txs: &[Transaction],
    month: Option<(i32, u32)>,
    kind: Option<TransactionType>,
) -> Vec<Transaction> {
    let scoped = match month {
        Some((year, month)) => filter_by_month(txs, year, month),
        None => txs.to_vec(),
    };
    scoped
        .into_iter()
        .filter(|t| kind.is_none_or(|k| t.r#type == k))
        .collect()
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub r#type: TransactionType,
    pub category: String,
    pub amount: rust_decimal::Decimal,
    pub source: String,
    pub description: String,
}

pub fn transaction_rows(txs: &[Transaction]) -> Vec<TransactionRow> {
    txs.iter()
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: t.transaction_date.to_string(),
            r#type: t.r#type,
            category: category_label(&t.category).to_string(),
            amount: t.amount,
            source: source_label(t),
            description: t.description.clone(),
        })
        .collect()
}

fn source_label(t: &Transaction) -> String {
    match (t.credit_card_id.as_deref(), t.account_id.as_deref()) {
        (Some(card), _) if t.is_credit_card() => format!("card:{}", card),
        (_, Some(acc)) => format!("account:{}", acc),
        _ => String::new(),
    }
}

fn summary(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let s = if sub.get_flag("server") {
        client.transaction_summary()?
    } else {
        summarize(&client.all_transactions()?)
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        print_summary(&s);
    }
    Ok(())
}

fn print_summary(s: &TransactionSummary) {
    println!(
        "{}",
        pretty_table(
            &["Income", "Expense", "Balance"],
            vec![vec![
                fmt_money(&s.total_income),
                fmt_money(&s.total_expense),
                fmt_money(&s.balance),
            ]],
        )
    );
    for (title, totals) in [
        ("Income", &s.income_by_category),
        ("Expense", &s.expense_by_category),
    ] {
        if totals.is_empty() {
            continue;
        }
        let rows = totals
            .iter()
            .map(|c| vec![c.category.clone(), fmt_money(&c.total)])
            .collect();
        println!("{}", pretty_table(&[title, "Total"], rows));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn tx(id: &str, kind: TransactionType, on: (i32, u32, u32), card: Option<&str>) -> Transaction {
        Transaction {
            id: id.into(),
            account_id: if card.is_some() { None } else { Some("acc1".into()) },
            credit_card_id: card.map(String::from),
            r#type: kind,
            category: String::new(),
            amount: dec!(10),
            transaction_date: NaiveDate::from_ymd_opt(on.0, on.1, on.2).unwrap(),
            description: String::new(),
        }
    }

    #[test]
    fn select_by_month_and_type() {
        let txs = vec![
            tx("a", TransactionType::Expense, (2025, 2, 1), None),
            tx("b", TransactionType::Income, (2025, 2, 3), None),
            tx("c", TransactionType::Expense, (2025, 3, 1), None),
        ];
        let ids: Vec<String> = select(&txs, Some((2025, 2)), Some(TransactionType::Expense))
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["a"]);
        assert_eq!(select(&txs, None, None).len(), 3);
    }

    #[test]
    fn rows_label_source_and_blank_category() {
        let txs = vec![
            tx("a", TransactionType::Expense, (2025, 2, 1), Some("cc9")),
            tx("b", TransactionType::Income, (2025, 2, 3), None),
        ];
        let rows = transaction_rows(&txs);
        assert_eq!(rows[0].source, "card:cc9");
        assert_eq!(rows[1].source, "account:acc1");
        assert_eq!(rows[1].category, "Uncategorized");
        assert_eq!(rows[0].date, "2025-02-01");
    }
}
