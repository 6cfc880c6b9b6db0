// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fintrack::cli;
use fintrack::commands::transactions::{select, transaction_rows};
use fintrack::models::{Transaction, TransactionType};
use fintrack::utils::parse_month;
use rust_decimal_macros::dec;

fn fixture() -> Vec<Transaction> {
    (1..=3)
        .map(|i| Transaction {
            id: format!("t{}", i),
            account_id: Some("a1".into()),
            credit_card_id: None,
            r#type: if i == 2 {
                TransactionType::Income
            } else {
                TransactionType::Expense
            },
            category: "Cat1".into(),
            amount: dec!(10),
            transaction_date: NaiveDate::from_ymd_opt(2025, i, 5).unwrap(),
            description: String::new(),
        })
        .collect()
}

#[test]
fn list_flags_parse() {
    let matches = cli::build_cli().get_matches_from([
        "fintrack", "tx", "list", "--limit", "2", "--offset", "4", "--month", "2025-03", "--type",
        "expense", "--json",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    assert_eq!(list_m.get_one::<u32>("limit"), Some(&2));
    assert_eq!(list_m.get_one::<u32>("offset"), Some(&4));
    assert!(list_m.get_flag("json"));

    let month = parse_month(list_m.get_one::<String>("month").unwrap()).unwrap();
    let kind: TransactionType = list_m.get_one::<String>("type").unwrap().parse().unwrap();
    let rows = transaction_rows(&select(&fixture(), Some(month), Some(kind)));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "t3");
    assert_eq!(rows[0].date, "2025-03-05");
}

#[test]
fn add_requires_type_and_amount() {
    let res = cli::build_cli().try_get_matches_from([
        "fintrack", "tx", "add", "--account", "a1", "--category", "Food",
    ]);
    assert!(res.is_err());

    let ok = cli::build_cli().try_get_matches_from([
        "fintrack", "tx", "add", "--account", "a1", "--type", "expense", "--category", "Food",
        "--amount", "25000",
    ]);
    assert!(ok.is_ok());
}

#[test]
fn select_without_filters_keeps_everything() {
    let all = select(&fixture(), None, None);
    assert_eq!(all.len(), 3);
    let income = select(&fixture(), None, Some(TransactionType::Income));
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].id, "t2");
}
