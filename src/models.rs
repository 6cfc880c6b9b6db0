// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(anyhow!(
                "Invalid transaction type '{}', expected income|expense",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Bank,
    Wallet,
    Cash,
    Paylater,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Bank => "bank",
            AccountType::Wallet => "wallet",
            AccountType::Cash => "cash",
            AccountType::Paylater => "paylater",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bank" => Ok(AccountType::Bank),
            "wallet" => Ok(AccountType::Wallet),
            "cash" => Ok(AccountType::Cash),
            "paylater" => Ok(AccountType::Paylater),
            other => Err(anyhow!(
                "Invalid account type '{}', expected bank|wallet|cash|paylater",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoldType {
    Antam,
    Ubs,
    Galeri24,
    Pegadaian,
    #[serde(other)]
    Other,
}

impl GoldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoldType::Antam => "antam",
            GoldType::Ubs => "ubs",
            GoldType::Galeri24 => "galeri24",
            GoldType::Pegadaian => "pegadaian",
            GoldType::Other => "other",
        }
    }
}

impl fmt::Display for GoldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoldType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "antam" => Ok(GoldType::Antam),
            "ubs" => Ok(GoldType::Ubs),
            "galeri24" => Ok(GoldType::Galeri24),
            "pegadaian" => Ok(GoldType::Pegadaian),
            "other" => Ok(GoldType::Other),
            other => Err(anyhow!(
                "Invalid gold type '{}', expected antam|ubs|galeri24|pegadaian|other",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card_id: Option<String>,
    pub r#type: TransactionType,
    #[serde(default)]
    pub category: String,
    pub amount: Decimal,
    #[serde(with = "api_date")]
    pub transaction_date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

impl Transaction {
    /// Debt movement on a card rather than cash movement on an account.
    pub fn is_credit_card(&self) -> bool {
        self.credit_card_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub r#type: AccountType,
    #[serde(default)]
    pub balance: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_account_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sub_accounts: Vec<Account>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub category: String,
    pub amount: Decimal,
    pub budget_month: u32, // 1..=12
    pub budget_year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: String,
    pub card_name: String,
    pub last_four_digits: String,
    pub credit_limit: Decimal,
    #[serde(default)]
    pub current_balance: Decimal, // owed amount
    pub billing_date: u32,
    pub payment_due_date: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldAsset {
    pub id: String,
    pub name: String,
    pub gold_type: GoldType,
    pub weight_gram: Decimal,
    pub purchase_price_per_gram: Decimal,
    #[serde(with = "api_date")]
    pub purchase_date: NaiveDate,
    #[serde(default)]
    pub storage_location: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_price_per_gram: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldPrice {
    #[serde(with = "api_date")]
    pub price_date: NaiveDate,
    pub price_per_gram: Decimal,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub income_by_category: Vec<CategoryTotal>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub expense_by_category: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldSummary {
    pub total_weight_gram: Decimal,
    pub total_purchase_value: Decimal,
    pub total_current_value: Decimal,
    pub total_profit_loss: Decimal,
    pub profit_loss_percent: Decimal,
    pub current_price_per_gram: Decimal,
    #[serde(with = "api_date")]
    pub price_date: NaiveDate,
}

fn default_currency() -> String {
    "IDR".to_string()
}

/// The API sends `null` instead of `[]` for empty collections.
pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse an API date: either `YYYY-MM-DD` or a full RFC 3339 timestamp.
/// The calendar date is taken as written, without shifting time zones.
pub fn parse_api_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    let day_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {}", raw, e))
}

pub mod api_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_api_date(&raw).map_err(serde::de::Error::custom)
    }
}
