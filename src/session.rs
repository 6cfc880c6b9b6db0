// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-invocation session: where the API lives and which token to send.
//! Loaded once in `main` and handed to the API client explicitly.

use anyhow::Result;
use rusqlite::Connection;

use crate::utils::{delete_setting, get_setting, set_setting};

pub const DEFAULT_API_URL: &str = "http://localhost:8001";
pub const API_URL_ENV: &str = "FINTRACK_API_URL";

const TOKEN_KEY: &str = "auth_token";
const API_URL_KEY: &str = "api_url";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub api_url: String,
    pub token: Option<String>,
}

impl Session {
    pub fn load(conn: &Connection, url_flag: Option<&str>) -> Result<Self> {
        let stored = get_setting(conn, API_URL_KEY)?;
        let env = std::env::var(API_URL_ENV).ok();
        let token = get_setting(conn, TOKEN_KEY)?.filter(|t| !t.trim().is_empty());
        Ok(Session {
            api_url: resolve_api_url(url_flag, stored.as_deref(), env.as_deref()),
            token,
        })
    }
}

/// First non-blank of: command-line flag, stored setting, environment, default.
pub fn resolve_api_url(flag: Option<&str>, stored: Option<&str>, env: Option<&str>) -> String {
    [flag, stored, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string()
}

pub fn store_token(conn: &Connection, token: &str) -> Result<()> {
    set_setting(conn, TOKEN_KEY, token)
}

pub fn clear_token(conn: &Connection) -> Result<()> {
    delete_setting(conn, TOKEN_KEY)
}

pub fn set_api_url(conn: &Connection, url: &str) -> Result<()> {
    set_setting(conn, API_URL_KEY, url.trim().trim_end_matches('/'))
}
