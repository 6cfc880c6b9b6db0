// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::{Context, Result, bail};
use log::info;
use serde_json::json;

use super::required;
use crate::api::ApiClient;
use crate::metrics::category_label;
use crate::models::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => bail!("Unknown format: {} (use csv|json)", other),
        }
    }
}

pub fn handle(client: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let fmt: ExportFormat = required(sub, "format")?.parse()?;
            let out = required(sub, "out")?;
            let txs = client.all_transactions()?;
            write_transactions(&txs, fmt, Path::new(out))?;
            println!("Exported {} transactions to {}", txs.len(), out);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Oldest first, one row per transaction.
pub fn write_transactions(txs: &[Transaction], fmt: ExportFormat, out: &Path) -> Result<()> {
    let mut sorted: Vec<&Transaction> = txs.iter().collect();
    sorted.sort_by(|a, b| {
        a.transaction_date
            .cmp(&b.transaction_date)
            .then_with(|| a.id.cmp(&b.id))
    });
    info!("Writing {} transactions as {:?} to {}", sorted.len(), fmt, out.display());

    match fmt {
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out.display()))?;
            wtr.write_record([
                "date",
                "type",
                "category",
                "amount",
                "account_id",
                "credit_card_id",
                "description",
            ])?;
            for t in sorted {
                wtr.write_record([
                    t.transaction_date.to_string(),
                    t.r#type.to_string(),
                    category_label(&t.category).to_string(),
                    t.amount.to_string(),
                    t.account_id.clone().unwrap_or_default(),
                    t.credit_card_id.clone().unwrap_or_default(),
                    t.description.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        ExportFormat::Json => {
            let items: Vec<serde_json::Value> = sorted
                .into_iter()
                .map(|t| {
                    json!({
                        "id": t.id,
                        "date": t.transaction_date.to_string(),
                        "type": t.r#type,
                        "category": category_label(&t.category),
                        "amount": t.amount.to_string(),
                        "account_id": t.account_id,
                        "credit_card_id": t.credit_card_id,
                        "description": t.description,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Write {}", out.display()))?;
        }
    }
    Ok(())
}
