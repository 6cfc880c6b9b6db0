// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::joined;
use crate::api::ApiClient;
use crate::commands::gold::print_portfolio;
use crate::metrics::{
    CategoryShare, GoldPortfolio, MonthlyTotals, SumOptions, category_label, category_shares,
    filter_by_month, gold_portfolio_summary, group_by_category, group_by_month, last_months,
    recent, sum_by_type, total_balance,
};
use crate::models::{Account, CreditCard, GoldAsset, Transaction, TransactionType};
use crate::utils::{
    fmt_money, fmt_percent, maybe_print_json, parse_month, pretty_table, today,
};

const RECENT_COUNT: usize = 5;

pub fn handle(client: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("dashboard", sub)) => dashboard(client, sub)?,
        Some(("cashflow", sub)) => cashflow(client, sub)?,
        Some(("categories", sub)) => categories(client, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub total_balance: Decimal,
    pub month_income: Decimal,
    pub month_expense: Decimal,
    pub month_net: Decimal,
    pub card_debt: Decimal,
    pub gold: GoldPortfolio,
    pub series: Vec<MonthlyTotals>,
    pub top_expenses: Vec<CategoryShare>,
    pub recent: Vec<Transaction>,
}

pub struct DashboardInput<'a> {
    pub accounts: &'a [Account],
    pub transactions: &'a [Transaction],
    pub cards: &'a [CreditCard],
    pub gold_assets: &'a [GoldAsset],
}

/// Figures for the home screen as of `as_of`. Month figures count cash only;
/// the series and category breakdown include card spending.
pub fn build_dashboard(
    input: &DashboardInput<'_>,
    as_of: NaiveDate,
    months: usize,
    top: usize,
) -> Dashboard {
    let this_month = filter_by_month(input.transactions, as_of.year(), as_of.month());
    let month_income = sum_by_type(&this_month, TransactionType::Income, SumOptions::CASH);
    let month_expense = sum_by_type(&this_month, TransactionType::Expense, SumOptions::CASH);
    let series = group_by_month(input.transactions);
    let mut top_expenses =
        category_shares(&group_by_category(&this_month, TransactionType::Expense));
    top_expenses.truncate(top);
    Dashboard {
        total_balance: total_balance(input.accounts),
        month_income,
        month_expense,
        month_net: month_income - month_expense,
        card_debt: input.cards.iter().map(|c| c.current_balance).sum(),
        gold: gold_portfolio_summary(input.gold_assets, None),
        series: last_months(&series, months).to_vec(),
        top_expenses,
        recent: recent(input.transactions, RECENT_COUNT),
    }
}

fn dashboard(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let months = *sub.get_one::<usize>("months").unwrap_or(&12);
    let top = *sub.get_one::<usize>("top").unwrap_or(&5);
    let (accounts, txs, cards, gold) = std::thread::scope(|s| -> Result<_> {
        let accounts = s.spawn(|| client.accounts());
        let txs = s.spawn(|| client.all_transactions());
        let cards = s.spawn(|| client.credit_cards());
        let gold = s.spawn(|| client.gold_assets());
        Ok((joined(accounts)?, joined(txs)?, joined(cards)?, joined(gold)?))
    })?;
    let as_of = today();
    let d = build_dashboard(
        &DashboardInput {
            accounts: &accounts,
            transactions: &txs,
            cards: &cards,
            gold_assets: &gold,
        },
        as_of,
        months,
        top,
    );
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &d)? {
        return Ok(());
    }

    println!(
        "{}",
        pretty_table(
            &["Total balance", "Income (month)", "Expense (month)", "Net (month)", "Card debt"],
            vec![vec![
                fmt_money(&d.total_balance),
                fmt_money(&d.month_income),
                fmt_money(&d.month_expense),
                fmt_money(&d.month_net),
                fmt_money(&d.card_debt),
            ]],
        )
    );
    if !gold.is_empty() {
        print_portfolio(&d.gold);
    }
    println!("{}", pretty_table(&["Month", "Income", "Expense", "Net"], series_rows(&d.series)));
    if !d.top_expenses.is_empty() {
        println!(
            "{}",
            pretty_table(
                &["Top expenses this month", "Total", "Share"],
                share_rows(&d.top_expenses),
            )
        );
    }
    let recent_rows = d
        .recent
        .iter()
        .map(|t| {
            vec![
                t.transaction_date.to_string(),
                t.r#type.to_string(),
                category_label(&t.category).to_string(),
                fmt_money(&t.amount),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Date", "Type", "Category", "Amount"], recent_rows));
    Ok(())
}

fn series_rows(series: &[MonthlyTotals]) -> Vec<Vec<String>> {
    series
        .iter()
        .map(|m| {
            vec![
                m.label(),
                fmt_money(&m.income),
                fmt_money(&m.expense),
                fmt_money(&m.net()),
            ]
        })
        .collect()
}

fn share_rows(shares: &[CategoryShare]) -> Vec<Vec<String>> {
    shares
        .iter()
        .map(|c| vec![c.category.clone(), fmt_money(&c.total), fmt_percent(&c.percent)])
        .collect()
}

/// Monthly series, optionally one year, trimmed to the latest `months`.
pub fn cashflow_series(
    txs: &[Transaction],
    year: Option<i32>,
    months: usize,
) -> Vec<MonthlyTotals> {
    let series: Vec<MonthlyTotals> = group_by_month(txs)
        .into_iter()
        .filter(|m| year.is_none_or(|y| m.year == y))
        .collect();
    last_months(&series, months).to_vec()
}

fn cashflow(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let months = *sub.get_one::<usize>("months").unwrap_or(&12);
    let year = sub.get_one::<i32>("year").copied();
    let txs = client.all_transactions()?;
    let data = cashflow_series(&txs, year, months);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(&["Month", "Income", "Expense", "Net"], series_rows(&data)));
    }
    Ok(())
}

fn categories(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let kind: TransactionType = sub
        .get_one::<String>("type")
        .map(String::as_str)
        .unwrap_or("expense")
        .parse()?;
    let month = sub.get_one::<String>("month").map(|s| parse_month(s)).transpose()?;
    let txs = client.all_transactions()?;
    let scoped = match month {
        Some((y, m)) => filter_by_month(&txs, y, m),
        None => txs,
    };
    let data = category_shares(&group_by_category(&scoped, kind));
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(&["Category", "Total", "Share"], share_rows(&data)));
    }
    Ok(())
}
