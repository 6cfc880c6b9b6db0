// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived figures for the dashboards: totals, percentages, groupings and
//! monthly series computed from record snapshots fetched from the API.
//!
//! Every function here is pure and total. Percentages whose denominator is
//! zero come back as zero instead of NaN or an overflow.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{
    Account, AccountType, Budget, CategoryTotal, CreditCard, GoldAsset, Transaction,
    TransactionSummary, TransactionType,
};
use crate::utils::last_day_of_month;

pub const UNCATEGORIZED: &str = "Uncategorized";

/// Budgets above this share of their amount are flagged.
pub const WARNING_PERCENT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);
/// A card is near its limit once less than this fraction of the limit is available.
pub const NEAR_LIMIT_RATIO: Decimal = Decimal::from_parts(2, 0, 0, false, 1);

fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SumOptions {
    pub exclude_credit_card: bool,
}

impl SumOptions {
    /// Cash movement only: card-tagged transactions change debt, not cash.
    pub const CASH: SumOptions = SumOptions {
        exclude_credit_card: true,
    };
}

pub fn sum_by_type(
    transactions: &[Transaction],
    kind: TransactionType,
    opts: SumOptions,
) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.r#type == kind)
        .filter(|t| !(opts.exclude_credit_card && t.is_credit_card()))
        .map(|t| t.amount)
        .sum()
}

pub fn compute_balance(transactions: &[Transaction]) -> Decimal {
    sum_by_type(transactions, TransactionType::Income, SumOptions::CASH)
        - sum_by_type(transactions, TransactionType::Expense, SumOptions::CASH)
}

pub fn filter_by_month(transactions: &[Transaction], year: i32, month: u32) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.transaction_date.year() == year && t.transaction_date.month() == month)
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetHealth {
    OnTrack,
    Warning,
    Over,
}

impl BudgetHealth {
    pub fn label(&self) -> &'static str {
        match self {
            BudgetHealth::OnTrack => "on track",
            BudgetHealth::Warning => "warning",
            BudgetHealth::Over => "over",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetUsage {
    pub spent: Decimal,
    pub percentage_used: Decimal,
    pub is_over: bool,
    pub remaining: Decimal,
    pub over_by: Decimal,
}

impl BudgetUsage {
    fn against(spent: Decimal, amount: Decimal) -> Self {
        BudgetUsage {
            spent,
            percentage_used: percent_of(spent, amount),
            is_over: spent > amount,
            remaining: amount - spent,
            over_by: (spent - amount).max(Decimal::ZERO),
        }
    }

    pub fn health(&self) -> BudgetHealth {
        if self.is_over {
            BudgetHealth::Over
        } else if self.percentage_used > WARNING_PERCENT {
            BudgetHealth::Warning
        } else {
            BudgetHealth::OnTrack
        }
    }
}

/// Spending against one budget. Matches on category only, so `transactions`
/// must already be limited to the budget's month; see [`budget_report`].
pub fn budget_usage(budget: &Budget, transactions: &[Transaction]) -> BudgetUsage {
    let spent = transactions
        .iter()
        .filter(|t| t.r#type == TransactionType::Expense && t.category == budget.category)
        .map(|t| t.amount)
        .sum();
    BudgetUsage::against(spent, budget.amount)
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetLine {
    pub budget: Budget,
    pub usage: BudgetUsage,
}

/// Usage for each budget, each measured only against transactions dated in
/// that budget's own month and year.
pub fn budget_report(budgets: &[Budget], transactions: &[Transaction]) -> Vec<BudgetLine> {
    let mut by_month: HashMap<(i32, u32), Vec<Transaction>> = HashMap::new();
    budgets
        .iter()
        .map(|budget| {
            let key = (budget.budget_year, budget.budget_month);
            let month_txs = by_month
                .entry(key)
                .or_insert_with(|| filter_by_month(transactions, key.0, key.1));
            BudgetLine {
                budget: budget.clone(),
                usage: budget_usage(budget, month_txs),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetOverview {
    pub total_budget: Decimal,
    #[serde(flatten)]
    pub usage: BudgetUsage,
}

/// Month-level totals. Every expense in the month counts, whether or not its
/// category has a budget.
pub fn budget_overview(budgets: &[Budget], month_transactions: &[Transaction]) -> BudgetOverview {
    let total_budget: Decimal = budgets.iter().map(|b| b.amount).sum();
    let total_spent = sum_by_type(
        month_transactions,
        TransactionType::Expense,
        SumOptions::default(),
    );
    BudgetOverview {
        total_budget,
        usage: BudgetUsage::against(total_spent, total_budget),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreditCardUsage {
    pub usage_percent: Decimal,
    pub available: Decimal,
    pub is_near_limit: bool,
}

pub fn credit_card_usage(card: &CreditCard) -> CreditCardUsage {
    let available = card.credit_limit - card.current_balance;
    CreditCardUsage {
        usage_percent: percent_of(card.current_balance, card.credit_limit),
        available,
        is_near_limit: available < card.credit_limit * NEAR_LIMIT_RATIO,
    }
}

/// Days from `today` to the next occurrence of `due_day_of_month`, counting
/// today as zero. A due day past the end of the target month is clamped to
/// that month's last day (the 31st in April means April 30th).
pub fn days_until_due(due_day_of_month: u32, today: NaiveDate) -> i64 {
    let due_day = due_day_of_month.clamp(1, 31);
    let month_offset = if due_day >= today.day() { 0 } else { 1 };
    let target = due_date_in(today, month_offset, due_day);
    (target - today).num_days().max(0)
}

fn due_date_in(today: NaiveDate, month_offset: u32, due_day: u32) -> NaiveDate {
    let Some(first) = today
        .with_day(1)
        .and_then(|d| d.checked_add_months(Months::new(month_offset)))
    else {
        return today;
    };
    let last = last_day_of_month(first.year(), first.month()).unwrap_or(28);
    first.with_day(due_day.min(last)).unwrap_or(first)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DueUrgency {
    Urgent,
    Soon,
    Later,
}

impl DueUrgency {
    pub fn from_days(days: i64) -> Self {
        match days {
            d if d <= 7 => DueUrgency::Urgent,
            d if d <= 14 => DueUrgency::Soon,
            _ => DueUrgency::Later,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DueUrgency::Urgent => "urgent",
            DueUrgency::Soon => "soon",
            DueUrgency::Later => "later",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GoldPosition {
    pub purchase_value: Decimal,
    pub current_value: Decimal,
    pub profit_loss: Decimal,
    pub profit_loss_percent: Decimal,
}

/// Value of one holding. Without an explicit market price the asset's own
/// quoted price is used, then its purchase price (zero profit/loss).
pub fn gold_position_value(
    asset: &GoldAsset,
    current_price_per_gram: Option<Decimal>,
) -> GoldPosition {
    let price = current_price_per_gram
        .or(asset.current_price_per_gram)
        .unwrap_or(asset.purchase_price_per_gram);
    let purchase_value = asset.weight_gram * asset.purchase_price_per_gram;
    let current_value = asset.weight_gram * price;
    let profit_loss = current_value - purchase_value;
    GoldPosition {
        purchase_value,
        current_value,
        profit_loss,
        profit_loss_percent: percent_of(profit_loss, purchase_value),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GoldPortfolio {
    pub total_weight_gram: Decimal,
    pub total_purchase_value: Decimal,
    pub total_current_value: Decimal,
    pub total_profit_loss: Decimal,
    pub profit_loss_percent: Decimal,
}

/// Portfolio totals. The overall percentage comes from the totals, not from
/// averaging per-asset percentages.
pub fn gold_portfolio_summary(
    assets: &[GoldAsset],
    current_price_per_gram: Option<Decimal>,
) -> GoldPortfolio {
    let mut summary = assets.iter().fold(GoldPortfolio::default(), |mut acc, asset| {
        let position = gold_position_value(asset, current_price_per_gram);
        acc.total_weight_gram += asset.weight_gram;
        acc.total_purchase_value += position.purchase_value;
        acc.total_current_value += position.current_value;
        acc.total_profit_loss += position.profit_loss;
        acc
    });
    summary.profit_loss_percent =
        percent_of(summary.total_profit_loss, summary.total_purchase_value);
    summary
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    pub year: i32,
    pub month: u32,
    pub income: Decimal,
    pub expense: Decimal,
}

impl MonthlyTotals {
    pub fn net(&self) -> Decimal {
        self.income - self.expense
    }

    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Income and expense per calendar month present in the input, oldest first.
pub fn group_by_month(transactions: &[Transaction]) -> Vec<MonthlyTotals> {
    let mut buckets: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();
    for t in transactions {
        let key = (t.transaction_date.year(), t.transaction_date.month());
        let entry = buckets.entry(key).or_insert((Decimal::ZERO, Decimal::ZERO));
        match t.r#type {
            TransactionType::Income => entry.0 += t.amount,
            TransactionType::Expense => entry.1 += t.amount,
        }
    }
    buckets
        .into_iter()
        .map(|((year, month), (income, expense))| MonthlyTotals {
            year,
            month,
            income,
            expense,
        })
        .collect()
}

/// The most recent `n` buckets of an ascending series.
pub fn last_months(series: &[MonthlyTotals], n: usize) -> &[MonthlyTotals] {
    &series[series.len().saturating_sub(n)..]
}

pub fn category_label(category: &str) -> &str {
    if category.trim().is_empty() {
        UNCATEGORIZED
    } else {
        category
    }
}

/// Totals per category for one transaction type, ordered by category name.
pub fn group_by_category(
    transactions: &[Transaction],
    kind: TransactionType,
) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for t in transactions.iter().filter(|t| t.r#type == kind) {
        *totals.entry(category_label(&t.category)).or_insert(Decimal::ZERO) += t.amount;
    }
    totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: Decimal,
    pub percent: Decimal,
}

/// Largest first, each as a share of the listed totals' own sum.
pub fn category_shares(totals: &[CategoryTotal]) -> Vec<CategoryShare> {
    let sum: Decimal = totals.iter().map(|c| c.total).sum();
    let mut shares: Vec<CategoryShare> = totals
        .iter()
        .map(|c| CategoryShare {
            category: c.category.clone(),
            total: c.total,
            percent: percent_of(c.total, sum),
        })
        .collect();
    shares.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    shares
}

fn by_total_desc(mut totals: Vec<CategoryTotal>) -> Vec<CategoryTotal> {
    totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    totals
}

/// Local equivalent of the API's transaction summary, over cash transactions.
pub fn summarize(transactions: &[Transaction]) -> TransactionSummary {
    let cash: Vec<Transaction> = transactions
        .iter()
        .filter(|t| !t.is_credit_card())
        .cloned()
        .collect();
    let total_income = sum_by_type(&cash, TransactionType::Income, SumOptions::default());
    let total_expense = sum_by_type(&cash, TransactionType::Expense, SumOptions::default());
    TransactionSummary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        income_by_category: by_total_desc(group_by_category(&cash, TransactionType::Income)),
        expense_by_category: by_total_desc(group_by_category(&cash, TransactionType::Expense)),
    }
}

fn walk_accounts<'a>(accounts: &'a [Account], out: &mut Vec<&'a Account>) {
    for account in accounts {
        out.push(account);
        walk_accounts(&account.sub_accounts, out);
    }
}

/// Every account in the tree, parents before their pockets.
pub fn flatten_accounts(accounts: &[Account]) -> Vec<&Account> {
    let mut out = Vec::new();
    walk_accounts(accounts, &mut out);
    out
}

pub fn total_balance(accounts: &[Account]) -> Decimal {
    flatten_accounts(accounts).iter().map(|a| a.balance).sum()
}

pub fn balance_by_type(accounts: &[Account]) -> Vec<(AccountType, Decimal)> {
    let mut totals: BTreeMap<AccountType, Decimal> = BTreeMap::new();
    for account in flatten_accounts(accounts) {
        *totals.entry(account.r#type).or_insert(Decimal::ZERO) += account.balance;
    }
    totals.into_iter().collect()
}

/// The `n` latest transactions by date; ties keep their input order.
pub fn recent(transactions: &[Transaction], n: usize) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GoldType;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(kind: TransactionType, amount: Decimal, category: &str, on: NaiveDate) -> Transaction {
        Transaction {
            id: format!("{}-{}-{}", kind, category, on),
            account_id: Some("acc".into()),
            credit_card_id: None,
            r#type: kind,
            category: category.into(),
            amount,
            transaction_date: on,
            description: String::new(),
        }
    }

    #[test]
    fn percent_of_zero_denominator_is_zero() {
        assert_eq!(percent_of(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percent_of(dec!(10), dec!(-5)), Decimal::ZERO);
        assert_eq!(percent_of(dec!(1), dec!(4)), dec!(25));
    }

    #[test]
    fn budget_health_thresholds() {
        assert_eq!(BudgetUsage::against(dec!(80), dec!(100)).health(), BudgetHealth::OnTrack);
        assert_eq!(BudgetUsage::against(dec!(81), dec!(100)).health(), BudgetHealth::Warning);
        assert_eq!(BudgetUsage::against(dec!(100), dec!(100)).health(), BudgetHealth::Warning);
        assert_eq!(BudgetUsage::against(dec!(101), dec!(100)).health(), BudgetHealth::Over);
    }

    #[test]
    fn days_until_due_clamps_to_short_month_end() {
        // 31st requested in April: due April 30th.
        assert_eq!(days_until_due(31, date(2025, 4, 10)), 20);
        assert_eq!(days_until_due(31, date(2025, 4, 30)), 0);
        // Rolls into February, which ends on the 28th in 2025.
        assert_eq!(days_until_due(30, date(2025, 1, 31)), 28);
        // Leap year.
        assert_eq!(days_until_due(30, date(2024, 1, 31)), 29);
    }

    #[test]
    fn days_until_due_crosses_year_end() {
        assert_eq!(days_until_due(5, date(2025, 12, 20)), 16);
    }

    #[test]
    fn due_urgency_bands() {
        assert_eq!(DueUrgency::from_days(0), DueUrgency::Urgent);
        assert_eq!(DueUrgency::from_days(7), DueUrgency::Urgent);
        assert_eq!(DueUrgency::from_days(14), DueUrgency::Soon);
        assert_eq!(DueUrgency::from_days(15), DueUrgency::Later);
    }

    #[test]
    fn group_by_month_orders_across_years() {
        let txs = vec![
            tx(TransactionType::Expense, dec!(5), "Food", date(2025, 1, 3)),
            tx(TransactionType::Income, dec!(100), "Salary", date(2024, 12, 25)),
            tx(TransactionType::Expense, dec!(7), "Food", date(2025, 1, 20)),
        ];
        let series = group_by_month(&txs);
        let labels: Vec<String> = series.iter().map(MonthlyTotals::label).collect();
        assert_eq!(labels, vec!["2024-12", "2025-01"]);
        assert_eq!(series[1].expense, dec!(12));
        assert_eq!(series[1].net(), dec!(-12));
        assert_eq!(last_months(&series, 1), &series[1..]);
        assert_eq!(last_months(&series, 12).len(), 2);
    }

    #[test]
    fn blank_category_goes_to_uncategorized() {
        let txs = vec![
            tx(TransactionType::Expense, dec!(5), "", date(2025, 1, 3)),
            tx(TransactionType::Expense, dec!(6), "   ", date(2025, 1, 4)),
            tx(TransactionType::Expense, dec!(1), "Food", date(2025, 1, 4)),
        ];
        let totals = group_by_category(&txs, TransactionType::Expense);
        assert_eq!(
            totals,
            vec![
                CategoryTotal {
                    category: "Food".into(),
                    total: dec!(1),
                },
                CategoryTotal {
                    category: UNCATEGORIZED.into(),
                    total: dec!(11),
                },
            ]
        );
    }

    #[test]
    fn gold_position_prefers_supplied_then_quoted_price() {
        let asset = GoldAsset {
            id: "g1".into(),
            name: "Antam 10g".into(),
            gold_type: GoldType::Antam,
            weight_gram: dec!(10),
            purchase_price_per_gram: dec!(1000),
            purchase_date: date(2024, 5, 1),
            storage_location: String::new(),
            notes: String::new(),
            current_price_per_gram: Some(dec!(1200)),
        };
        assert_eq!(gold_position_value(&asset, Some(dec!(900))).profit_loss, dec!(-1000));
        assert_eq!(gold_position_value(&asset, None).profit_loss_percent, dec!(20));
        let unquoted = GoldAsset {
            current_price_per_gram: None,
            ..asset
        };
        assert_eq!(gold_position_value(&unquoted, None).profit_loss, Decimal::ZERO);
    }

    #[test]
    fn recent_takes_latest_first() {
        let txs = vec![
            tx(TransactionType::Expense, dec!(1), "A", date(2025, 1, 1)),
            tx(TransactionType::Expense, dec!(2), "B", date(2025, 3, 1)),
            tx(TransactionType::Expense, dec!(3), "C", date(2025, 2, 1)),
        ];
        let latest = recent(&txs, 2);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].category, "B");
        assert_eq!(latest[1].category, "C");
    }
}
