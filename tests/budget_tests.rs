// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fintrack::commands::budgets::budget_status;
use fintrack::metrics::BudgetHealth;
use fintrack::models::{Budget, Transaction, TransactionType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn budget(id: &str, category: &str, amount: Decimal, month: u32) -> Budget {
    Budget {
        id: id.into(),
        category: category.into(),
        amount,
        budget_month: month,
        budget_year: 2025,
    }
}

fn expense(category: &str, amount: Decimal, month: u32, day: u32, card: bool) -> Transaction {
    Transaction {
        id: format!("{}-{}-{}", category, month, day),
        account_id: (!card).then(|| "a1".to_string()),
        credit_card_id: card.then(|| "cc1".to_string()),
        r#type: TransactionType::Expense,
        category: category.into(),
        amount,
        transaction_date: NaiveDate::from_ymd_opt(2025, month, day).unwrap(),
        description: String::new(),
    }
}

#[test]
fn status_measures_only_the_selected_month() {
    let budgets = vec![
        budget("b1", "Dining", dec!(500000), 8),
        budget("b2", "Transport", dec!(200000), 8),
        budget("b3", "Dining", dec!(500000), 7),
    ];
    let txs = vec![
        expense("Dining", dec!(300000), 8, 2, false),
        expense("Dining", dec!(150000), 8, 20, true),
        expense("Dining", dec!(999999), 7, 31, false),
        expense("Transport", dec!(250000), 8, 3, false),
        expense("Groceries", dec!(100000), 8, 4, false),
    ];
    let status = budget_status(2025, 8, &budgets, &txs);

    assert_eq!(status.budgets.len(), 2);
    let dining = &status.budgets[0];
    assert_eq!(dining.category, "Dining");
    assert_eq!(dining.spent, dec!(450000));
    assert_eq!(dining.percentage_used, dec!(90));
    assert_eq!(dining.health, BudgetHealth::Warning);

    let transport = &status.budgets[1];
    assert_eq!(transport.over_by, dec!(50000));
    assert_eq!(transport.health, BudgetHealth::Over);

    assert_eq!(status.overview.total_budget, dec!(700000));
    assert_eq!(status.overview.usage.spent, dec!(800000));
    assert!(status.overview.usage.is_over);
}

#[test]
fn status_with_no_budgets_is_empty_but_counts_spending() {
    let txs = vec![expense("Dining", dec!(10), 8, 1, false)];
    let status = budget_status(2025, 8, &[], &txs);
    assert!(status.budgets.is_empty());
    assert_eq!(status.overview.total_budget, Decimal::ZERO);
    assert_eq!(status.overview.usage.percentage_used, Decimal::ZERO);
    assert_eq!(status.overview.usage.spent, dec!(10));
}
