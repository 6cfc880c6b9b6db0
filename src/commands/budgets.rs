// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use log::info;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{joined, required};
use crate::api::{ApiClient, BudgetQuery, CopyBudgets, NewBudget};
use crate::metrics::{
    BudgetHealth, BudgetLine, BudgetOverview, budget_overview, budget_report, filter_by_month,
};
use crate::models::{Budget, Transaction};
use crate::utils::{
    current_month, fmt_money, fmt_percent, maybe_print_json, parse_amount, parse_month,
    pretty_table,
};

pub fn handle(client: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let (year, month) = parse_month(required(sub, "month")?)?;
            let category = required(sub, "category")?.trim();
            if category.is_empty() {
                bail!("Budget category must not be blank");
            }
            let amount = parse_amount(required(sub, "amount")?)?;
            let b = client.create_budget(&NewBudget {
                category: category.to_string(),
                amount,
                budget_month: month,
                budget_year: year,
            })?;
            info!("Created budget {}", b.id);
            println!(
                "Budget set: {} {:04}-{:02} = {} id={}",
                b.category,
                b.budget_year,
                b.budget_month,
                fmt_money(&b.amount),
                b.id
            );
        }
        Some(("list", sub)) => list(client, sub)?,
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            client.delete_budget(id)?;
            println!("Removed budget {}", id);
        }
        Some(("copy", sub)) => {
            let (from_year, from_month) = parse_month(required(sub, "from")?)?;
            let (to_year, to_month) = parse_month(required(sub, "to")?)?;
            if (from_year, from_month) == (to_year, to_month) {
                bail!("Source and target month are the same");
            }
            let resp = client.copy_budgets(&CopyBudgets {
                from_month,
                from_year,
                to_month,
                to_year,
            })?;
            info!("Copied {} budgets", resp.copied);
            println!(
                "Copied {} budget(s) from {:04}-{:02} to {:04}-{:02}",
                resp.copied, from_year, from_month, to_year, to_month
            );
            if !resp.message.is_empty() {
                println!("{}", resp.message);
            }
        }
        Some(("status", sub)) => status(client, sub)?,
        _ => {}
    }
    Ok(())
}

fn month_arg(sub: &clap::ArgMatches) -> Result<(i32, u32)> {
    match sub.get_one::<String>("month") {
        Some(s) => parse_month(s),
        None => Ok(current_month()),
    }
}

fn list(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = month_arg(sub)?;
    let budgets = client.budgets(&BudgetQuery {
        month: Some(month),
        year: Some(year),
    })?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &budgets)? {
        let rows: Vec<Vec<String>> = budgets
            .iter()
            .map(|b| {
                vec![
                    b.category.clone(),
                    format!("{:04}-{:02}", b.budget_year, b.budget_month),
                    fmt_money(&b.amount),
                    b.id.clone(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Month", "Budget", "Id"], rows));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct BudgetStatusRow {
    pub id: String,
    pub category: String,
    pub budget: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub over_by: Decimal,
    pub percentage_used: Decimal,
    pub health: BudgetHealth,
}

#[derive(Debug, Serialize)]
pub struct BudgetStatus {
    pub year: i32,
    pub month: u32,
    pub overview: BudgetOverview,
    pub budgets: Vec<BudgetStatusRow>,
}

/// Budget lines for one month plus the month's overall position.
pub fn budget_status(
    year: i32,
    month: u32,
    budgets: &[Budget],
    transactions: &[Transaction],
) -> BudgetStatus {
    let in_month: Vec<Budget> = budgets
        .iter()
        .filter(|b| b.budget_year == year && b.budget_month == month)
        .cloned()
        .collect();
    let rows = budget_report(&in_month, transactions)
        .into_iter()
        .map(|BudgetLine { budget, usage }| BudgetStatusRow {
            id: budget.id,
            category: budget.category,
            budget: budget.amount,
            spent: usage.spent,
            remaining: usage.remaining,
            over_by: usage.over_by,
            percentage_used: usage.percentage_used,
            health: usage.health(),
        })
        .collect();
    BudgetStatus {
        year,
        month,
        overview: budget_overview(&in_month, &filter_by_month(transactions, year, month)),
        budgets: rows,
    }
}

fn status(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = month_arg(sub)?;
    let (budgets, txs) = std::thread::scope(|s| -> Result<_> {
        let budgets = s.spawn(|| {
            client.budgets(&BudgetQuery {
                month: Some(month),
                year: Some(year),
            })
        });
        let txs = s.spawn(|| client.all_transactions());
        Ok((joined(budgets)?, joined(txs)?))
    })?;
    let report = budget_status(year, month, &budgets, &txs);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = report
        .budgets
        .iter()
        .map(|r| {
            let left = if r.over_by > Decimal::ZERO {
                format!("-{}", fmt_money(&r.over_by))
            } else {
                fmt_money(&r.remaining)
            };
            vec![
                r.category.clone(),
                fmt_money(&r.budget),
                fmt_money(&r.spent),
                left,
                fmt_percent(&r.percentage_used),
                r.health.label().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Category", "Budget", "Spent", "Remaining", "Used", "Status"],
            rows
        )
    );
    let o = &report.overview;
    println!(
        "{:04}-{:02}: spent {} of {} ({}), remaining {}",
        year,
        month,
        fmt_money(&o.usage.spent),
        fmt_money(&o.total_budget),
        fmt_percent(&o.usage.percentage_used),
        fmt_money(&o.usage.remaining)
    );
    Ok(())
}
