// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Blocking client for the FinTrack REST API.

use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    Account, AccountType, Budget, CreditCard, GoldAsset, GoldPrice, GoldSummary, GoldType,
    Transaction, TransactionSummary, TransactionType, User,
};
use crate::session::Session;

const UA: &str = concat!(
    "fintrack/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/fintrack)"
);

const PAGE_SIZE: u32 = 500;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("not authenticated: {0} (run `fintrack auth login`)")]
    Unauthorized(String),
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Human-readable message for a failed response.
pub fn error_message(status: u16, is_json: bool, body: &str) -> String {
    if is_json {
        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
            let found = [parsed.message, parsed.error]
                .into_iter()
                .flatten()
                .find(|m| !m.trim().is_empty());
            if let Some(m) = found {
                return m;
            }
        }
    }
    let text = body.trim();
    if text.is_empty() {
        format!("HTTP error! status: {}", status)
    } else {
        text.to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username_or_email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct NewAccount {
    pub name: String,
    pub r#type: AccountType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_account_id: Option<String>,
}

/// Full replacement of an account's editable fields. The server overwrites
/// the name on every update, so it is always sent.
#[derive(Debug, Serialize)]
pub struct UpdateAccount {
    pub name: String,
    pub r#type: AccountType,
    pub currency: String,
}

impl UpdateAccount {
    /// Current values of `account` with the given changes applied.
    pub fn merged(
        account: &Account,
        name: Option<&str>,
        kind: Option<AccountType>,
        currency: Option<&str>,
    ) -> Self {
        UpdateAccount {
            name: name.map(str::trim).unwrap_or(account.name.as_str()).to_string(),
            r#type: kind.unwrap_or(account.r#type),
            currency: currency
                .map(|c| c.trim().to_uppercase())
                .unwrap_or_else(|| account.currency.clone()),
        }
    }
}

/// Exactly one of `account_id` and `credit_card_id` is set.
#[derive(Debug, Serialize)]
pub struct NewTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_card_id: Option<String>,
    pub r#type: TransactionType,
    pub category: String,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct TransactionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct NewBudget {
    pub category: String,
    pub amount: Decimal,
    pub budget_month: u32,
    pub budget_year: i32,
}

#[derive(Debug, Default, Serialize)]
pub struct BudgetQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct CopyBudgets {
    pub from_month: u32,
    pub from_year: i32,
    pub to_month: u32,
    pub to_year: i32,
}

#[derive(Debug, Deserialize)]
pub struct CopyBudgetsResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub copied: u32,
}

#[derive(Debug, Serialize)]
pub struct NewCreditCard {
    pub card_name: String,
    pub last_four_digits: String,
    pub credit_limit: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_balance: Option<Decimal>,
    pub billing_date: u32,
    pub payment_due_date: u32,
}

#[derive(Debug, Serialize)]
pub struct NewGoldAsset {
    pub name: String,
    pub gold_type: GoldType,
    pub weight_gram: Decimal,
    pub purchase_price_per_gram: Decimal,
    pub purchase_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GoldPriceUpdate {
    pub price_per_gram: Decimal,
}

/// One client per session; the token is fixed at construction.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent(UA)
            .build()?;
        Ok(ApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            http,
        })
    }

    pub fn from_session(session: &Session) -> ApiResult<Self> {
        Self::new(&session.api_url, session.token.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        debug!("{} {}{}", method, self.base_url, endpoint);
        let req = self
            .http
            .request(method, format!("{}{}", self.base_url, endpoint))
            .header(CONTENT_TYPE, "application/json");
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ApiResult<T> {
        decode(req.send()?)
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.send(self.request(Method::GET, endpoint))
    }

    /// List endpoints answer `null` when there is nothing to list.
    fn get_list<T: DeserializeOwned>(&self, req: RequestBuilder) -> ApiResult<Vec<T>> {
        let list: Option<Vec<T>> = self.send(req)?;
        Ok(list.unwrap_or_default())
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> ApiResult<T> {
        self.send(self.request(Method::POST, endpoint).json(body))
    }

    fn put<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> ApiResult<T> {
        self.send(self.request(Method::PUT, endpoint).json(body))
    }

    fn delete(&self, endpoint: &str) -> ApiResult<MessageResponse> {
        self.send(self.request(Method::DELETE, endpoint))
    }

    // Auth

    pub fn login(&self, credentials: &LoginRequest) -> ApiResult<LoginResponse> {
        self.post("/api/auth/login", credentials)
    }

    pub fn register(&self, data: &RegisterRequest) -> ApiResult<RegisterResponse> {
        self.post("/api/auth/register", data)
    }

    pub fn me(&self) -> ApiResult<User> {
        self.get("/api/auth/me")
    }

    // Accounts (wallets)

    pub fn accounts(&self) -> ApiResult<Vec<Account>> {
        self.get_list(self.request(Method::GET, "/api/accounts"))
    }

    pub fn account(&self, id: &str) -> ApiResult<Account> {
        self.get(&format!("/api/accounts/{}", id))
    }

    pub fn create_account(&self, data: &NewAccount) -> ApiResult<Account> {
        self.post("/api/accounts", data)
    }

    pub fn update_account(&self, id: &str, data: &UpdateAccount) -> ApiResult<Account> {
        self.put(&format!("/api/accounts/{}", id), data)
    }

    pub fn delete_account(&self, id: &str) -> ApiResult<MessageResponse> {
        self.delete(&format!("/api/accounts/{}", id))
    }

    // Transactions

    pub fn transactions(&self, query: &TransactionQuery) -> ApiResult<Vec<Transaction>> {
        self.get_list(self.request(Method::GET, "/api/transactions").query(query))
    }

    /// Every transaction, fetched page by page. The server caps an unpaged
    /// request at 50 rows.
    pub fn all_transactions(&self) -> ApiResult<Vec<Transaction>> {
        let mut all = Vec::new();
        loop {
            let page = self.transactions(&TransactionQuery {
                limit: Some(PAGE_SIZE),
                offset: Some(all.len() as u32),
            })?;
            let short = page.len() < PAGE_SIZE as usize;
            all.extend(page);
            if short {
                debug!("Fetched {} transactions", all.len());
                return Ok(all);
            }
        }
    }

    pub fn transaction(&self, id: &str) -> ApiResult<Transaction> {
        self.get(&format!("/api/transactions/{}", id))
    }

    pub fn create_transaction(&self, data: &NewTransaction) -> ApiResult<Transaction> {
        self.post("/api/transactions", data)
    }

    pub fn delete_transaction(&self, id: &str) -> ApiResult<MessageResponse> {
        self.delete(&format!("/api/transactions/{}", id))
    }

    pub fn transaction_summary(&self) -> ApiResult<TransactionSummary> {
        self.get("/api/transactions/summary")
    }

    // Budgets

    pub fn budgets(&self, query: &BudgetQuery) -> ApiResult<Vec<Budget>> {
        self.get_list(self.request(Method::GET, "/api/budgets").query(query))
    }

    pub fn budget(&self, id: &str) -> ApiResult<Budget> {
        self.get(&format!("/api/budgets/{}", id))
    }

    pub fn create_budget(&self, data: &NewBudget) -> ApiResult<Budget> {
        self.post("/api/budgets", data)
    }

    pub fn delete_budget(&self, id: &str) -> ApiResult<MessageResponse> {
        self.delete(&format!("/api/budgets/{}", id))
    }

    pub fn copy_budgets(&self, data: &CopyBudgets) -> ApiResult<CopyBudgetsResponse> {
        self.post("/api/budgets/copy", data)
    }

    // Credit cards

    pub fn credit_cards(&self) -> ApiResult<Vec<CreditCard>> {
        self.get_list(self.request(Method::GET, "/api/credit-cards"))
    }

    pub fn credit_card(&self, id: &str) -> ApiResult<CreditCard> {
        self.get(&format!("/api/credit-cards/{}", id))
    }

    pub fn create_credit_card(&self, data: &NewCreditCard) -> ApiResult<CreditCard> {
        self.post("/api/credit-cards", data)
    }

    pub fn delete_credit_card(&self, id: &str) -> ApiResult<MessageResponse> {
        self.delete(&format!("/api/credit-cards/{}", id))
    }

    // Gold

    pub fn gold_price(&self) -> ApiResult<GoldPrice> {
        self.get("/api/gold/price")
    }

    pub fn gold_price_history(&self, limit: Option<u32>) -> ApiResult<Vec<GoldPrice>> {
        #[derive(Serialize)]
        struct HistoryQuery {
            #[serde(skip_serializing_if = "Option::is_none")]
            limit: Option<u32>,
        }
        self.get_list(
            self.request(Method::GET, "/api/gold/price/history")
                .query(&HistoryQuery { limit }),
        )
    }

    pub fn update_gold_price(&self, data: &GoldPriceUpdate) -> ApiResult<GoldPrice> {
        self.post("/api/gold/price", data)
    }

    pub fn gold_assets(&self) -> ApiResult<Vec<GoldAsset>> {
        self.get_list(self.request(Method::GET, "/api/gold/assets"))
    }

    pub fn gold_asset(&self, id: &str) -> ApiResult<GoldAsset> {
        self.get(&format!("/api/gold/assets/{}", id))
    }

    pub fn create_gold_asset(&self, data: &NewGoldAsset) -> ApiResult<GoldAsset> {
        self.post("/api/gold/assets", data)
    }

    pub fn delete_gold_asset(&self, id: &str) -> ApiResult<MessageResponse> {
        self.delete(&format!("/api/gold/assets/{}", id))
    }

    pub fn gold_summary(&self) -> ApiResult<GoldSummary> {
        self.get("/api/gold/summary")
    }
}

fn decode<T: DeserializeOwned>(resp: Response) -> ApiResult<T> {
    let status = resp.status();
    let is_json = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    let body = resp.text()?;
    if !status.is_success() {
        let message = error_message(status.as_u16(), is_json, &body);
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized(message));
        }
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(serde_json::from_str(&body)?)
}
