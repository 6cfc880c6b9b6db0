// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fintrack::cli;
use fintrack::commands::exporter::{ExportFormat, write_transactions};
use fintrack::models::{Transaction, TransactionType};
use rust_decimal_macros::dec;
use serde_json::json;
use tempfile::tempdir;

fn sample() -> Vec<Transaction> {
    vec![
        Transaction {
            id: "t2".into(),
            account_id: None,
            credit_card_id: Some("cc1".into()),
            r#type: TransactionType::Expense,
            category: String::new(),
            amount: dec!(12.34),
            transaction_date: NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
            description: "Online order".into(),
        },
        Transaction {
            id: "t1".into(),
            account_id: Some("a1".into()),
            credit_card_id: None,
            r#type: TransactionType::Income,
            category: "Salary".into(),
            amount: dec!(5000000),
            transaction_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            description: String::new(),
        },
    ]
}

#[test]
fn export_transactions_writes_pretty_json_oldest_first() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.json");
    write_transactions(&sample(), ExportFormat::Json, &out).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": "t1",
                "date": "2025-01-01",
                "type": "income",
                "category": "Salary",
                "amount": "5000000",
                "account_id": "a1",
                "credit_card_id": null,
                "description": ""
            },
            {
                "id": "t2",
                "date": "2025-01-03",
                "type": "expense",
                "category": "Uncategorized",
                "amount": "12.34",
                "account_id": null,
                "credit_card_id": "cc1",
                "description": "Online order"
            }
        ])
    );
}

#[test]
fn export_transactions_writes_csv() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.csv");
    write_transactions(&sample(), ExportFormat::Csv, &out).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[0], "date");
    assert_eq!(&headers[5], "credit_card_id");
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "2025-01-01");
    assert_eq!(&rows[1][2], "Uncategorized");
    assert_eq!(&rows[1][3], "12.34");
}

#[test]
fn export_rejects_unknown_format() {
    let matches = cli::build_cli().get_matches_from([
        "fintrack",
        "export",
        "transactions",
        "--format",
        "xml",
        "--out",
        "ignored.xml",
    ]);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    let Some(("transactions", sub)) = export_m.subcommand() else {
        panic!("no transactions subcommand");
    };
    let fmt = sub.get_one::<String>("format").unwrap();
    assert!(fmt.parse::<ExportFormat>().is_err());
    assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
}
