// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

pub mod auth;
pub mod budgets;
pub mod cards;
pub mod config;
pub mod exporter;
pub mod gold;
pub mod reports;
pub mod transactions;
pub mod wallets;

/// Value of an argument clap has already marked as required.
pub(crate) fn required<'a>(m: &'a clap::ArgMatches, id: &str) -> Result<&'a str> {
    m.get_one::<String>(id)
        .map(String::as_str)
        .with_context(|| format!("Missing required argument '{}'", id))
}

/// Result of one request made on a scoped worker thread.
pub(crate) fn joined<T>(
    handle: std::thread::ScopedJoinHandle<'_, crate::api::ApiResult<T>>,
) -> Result<T> {
    let out = handle
        .join()
        .map_err(|_| anyhow::anyhow!("API worker thread panicked"))?;
    Ok(out?)
}
