// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fintrack::cli;
use fintrack::models::{AccountType, GoldType};
use fintrack::utils::{parse_amount, parse_day_of_month, parse_month};

fn leaf(args: &[&str]) -> (String, String, clap::ArgMatches) {
    let matches = cli::build_cli()
        .try_get_matches_from(args.iter().copied())
        .unwrap_or_else(|e| panic!("{:?} failed to parse: {}", args, e));
    let (group, group_m) = matches.subcommand().expect("command group");
    let (cmd, cmd_m) = group_m.subcommand().expect("command");
    (group.to_string(), cmd.to_string(), cmd_m.clone())
}

#[test]
fn wallet_add_pocket() {
    let (group, cmd, m) = leaf(&[
        "fintrack", "wallet", "add", "--name", "Holiday", "--type", "bank", "--parent", "a1",
    ]);
    assert_eq!((group.as_str(), cmd.as_str()), ("wallet", "add"));
    let kind: AccountType = m.get_one::<String>("type").unwrap().parse().unwrap();
    assert_eq!(kind, AccountType::Bank);
    assert_eq!(m.get_one::<String>("parent").map(String::as_str), Some("a1"));
    assert_eq!(m.get_one::<String>("currency"), None);
}

#[test]
fn budget_copy_months() {
    let (_, cmd, m) = leaf(&[
        "fintrack", "budget", "copy", "--from", "2025-01", "--to", "2025-02",
    ]);
    assert_eq!(cmd, "copy");
    assert_eq!(parse_month(m.get_one::<String>("from").unwrap()).unwrap(), (2025, 1));
    assert_eq!(parse_month(m.get_one::<String>("to").unwrap()).unwrap(), (2025, 2));
}

#[test]
fn budget_status_month_is_optional() {
    let (_, _, m) = leaf(&["fintrack", "budget", "status", "--jsonl"]);
    assert_eq!(m.get_one::<String>("month"), None);
    assert!(m.get_flag("jsonl"));
    assert!(!m.get_flag("json"));
}

#[test]
fn card_add_days_and_limit() {
    let (_, _, m) = leaf(&[
        "fintrack", "card", "add", "--name", "BCA Visa", "--last4", "4321", "--limit",
        "10000000", "--billing-day", "25", "--due-day", "10",
    ]);
    assert_eq!(parse_day_of_month(m.get_one::<String>("billing_day").unwrap()).unwrap(), 25);
    assert_eq!(parse_day_of_month(m.get_one::<String>("due_day").unwrap()).unwrap(), 10);
    assert!(parse_amount(m.get_one::<String>("limit").unwrap()).is_ok());
    assert_eq!(m.get_one::<String>("balance"), None);

    let missing_due = cli::build_cli().try_get_matches_from([
        "fintrack", "card", "add", "--name", "X", "--last4", "1111", "--limit", "1",
        "--billing-day", "1",
    ]);
    assert!(missing_due.is_err());
}

#[test]
fn gold_add_and_summary_flags() {
    let (_, _, m) = leaf(&[
        "fintrack", "gold", "add", "--name", "Antam 10g", "--gold-type", "antam", "--weight",
        "10", "--price", "1000000", "--date", "2024-05-01",
    ]);
    let t: GoldType = m.get_one::<String>("gold_type").unwrap().parse().unwrap();
    assert_eq!(t, GoldType::Antam);

    let (_, _, s) = leaf(&["fintrack", "gold", "summary", "--price", "1100000", "--server"]);
    assert!(s.get_flag("server"));
    assert_eq!(s.get_one::<String>("price").map(String::as_str), Some("1100000"));
}

#[test]
fn report_defaults() {
    let (_, _, d) = leaf(&["fintrack", "report", "dashboard"]);
    assert_eq!(d.get_one::<usize>("months"), Some(&12));
    assert_eq!(d.get_one::<usize>("top"), Some(&5));

    let (_, _, c) = leaf(&["fintrack", "report", "categories"]);
    assert_eq!(c.get_one::<String>("type").map(String::as_str), Some("expense"));

    let (_, _, f) = leaf(&["fintrack", "report", "cashflow", "--year", "2024", "--months", "6"]);
    assert_eq!(f.get_one::<i32>("year"), Some(&2024));
    assert_eq!(f.get_one::<usize>("months"), Some(&6));
}

#[test]
fn auth_and_config() {
    let (_, _, login) = leaf(&["fintrack", "auth", "login", "--user", "budi@example.com"]);
    assert_eq!(login.get_one::<String>("password"), None);

    let (_, _, reg) = leaf(&[
        "fintrack", "auth", "register", "--email", "a@b.c", "--username", "ab", "--password",
        "secret", "--full-name", "A B",
    ]);
    assert_eq!(reg.get_one::<String>("full_name").map(String::as_str), Some("A B"));

    let (_, cmd, url) = leaf(&["fintrack", "config", "set-url", "http://api:8001"]);
    assert_eq!(cmd, "set-url");
    assert_eq!(url.get_one::<String>("url").map(String::as_str), Some("http://api:8001"));
}

#[test]
fn verbosity_counts() {
    let m = cli::build_cli()
        .try_get_matches_from(["fintrack", "-vv", "wallet", "list"])
        .unwrap();
    assert_eq!(m.get_count("verbose"), 2);
}

#[test]
fn tx_add_charges_a_credit_card() {
    let (_, cmd, m) = leaf(&[
        "fintrack", "tx", "add", "--card", "c1", "--type", "expense", "--category", "Travel",
        "--amount", "1500000",
    ]);
    assert_eq!(cmd, "add");
    assert_eq!(m.get_one::<String>("card").map(String::as_str), Some("c1"));
    assert_eq!(m.get_one::<String>("account"), None);
}

#[test]
fn tx_add_needs_exactly_one_source() {
    let base = [
        "fintrack", "tx", "add", "--type", "expense", "--category", "Food", "--amount", "1",
    ];

    let neither = cli::build_cli().try_get_matches_from(base);
    assert_eq!(
        neither.unwrap_err().kind(),
        clap::error::ErrorKind::MissingRequiredArgument
    );

    let both: Vec<&str> = base
        .iter()
        .copied()
        .chain(["--account", "a1", "--card", "c1"])
        .collect();
    let err = cli::build_cli().try_get_matches_from(both).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
}

#[test]
fn wallet_edit_flags_are_optional() {
    let (_, cmd, m) = leaf(&["fintrack", "wallet", "edit", "a1", "--currency", "usd"]);
    assert_eq!(cmd, "edit");
    assert_eq!(m.get_one::<String>("id").map(String::as_str), Some("a1"));
    assert_eq!(m.get_one::<String>("currency").map(String::as_str), Some("usd"));
    assert_eq!(m.get_one::<String>("name"), None);
    assert_eq!(m.get_one::<String>("type"), None);
}
