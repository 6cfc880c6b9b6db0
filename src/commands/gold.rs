// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use log::{info, warn};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{joined, required};
use crate::api::{ApiClient, ApiError, GoldPriceUpdate, NewGoldAsset};
use crate::metrics::{GoldPortfolio, gold_portfolio_summary, gold_position_value};
use crate::models::{GoldAsset, GoldType};
use crate::utils::{
    fmt_money, fmt_percent, maybe_print_json, parse_amount, parse_date, parse_decimal,
    pretty_table,
};

pub fn handle(client: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("price", _)) => {
            let p = client.gold_price()?;
            println!(
                "{} per gram on {}{}",
                fmt_money(&p.price_per_gram),
                p.price_date,
                if p.source.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", p.source)
                }
            );
        }
        Some(("history", sub)) => {
            let history = client.gold_price_history(sub.get_one::<u32>("limit").copied())?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &history)? {
                let rows = history
                    .iter()
                    .map(|p| {
                        vec![
                            p.price_date.to_string(),
                            fmt_money(&p.price_per_gram),
                            p.source.clone(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Date", "Price/g", "Source"], rows));
            }
        }
        Some(("set-price", sub)) => {
            let price = parse_amount(required(sub, "price")?)?;
            if price.is_zero() {
                bail!("Gold price must be greater than zero");
            }
            let p = client.update_gold_price(&GoldPriceUpdate {
                price_per_gram: price,
            })?;
            println!(
                "Gold price for {} set to {}",
                p.price_date,
                fmt_money(&p.price_per_gram)
            );
        }
        Some(("assets", sub)) => assets(client, sub)?,
        Some(("add", sub)) => add(client, sub)?,
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            client.delete_gold_asset(id)?;
            println!("Removed gold asset {}", id);
        }
        Some(("summary", sub)) => summary(client, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let gold_type: GoldType = required(sub, "gold_type")?.parse()?;
    let weight = parse_amount(required(sub, "weight")?)?;
    if weight.is_zero() {
        bail!("Weight must be greater than zero");
    }
    let asset = client.create_gold_asset(&NewGoldAsset {
        name: required(sub, "name")?.trim().to_string(),
        gold_type,
        weight_gram: weight,
        purchase_price_per_gram: parse_amount(required(sub, "price")?)?,
        purchase_date: parse_date(required(sub, "date")?)?.to_string(),
        storage_location: sub.get_one::<String>("storage").cloned(),
        notes: sub.get_one::<String>("notes").cloned(),
    })?;
    info!("Created gold asset {}", asset.id);
    println!(
        "Added {} ({}, {} g) id={}",
        asset.name, asset.gold_type, asset.weight_gram, asset.id
    );
    Ok(())
}

/// Price from `--price`, else today's API price. A missing price record is
/// not an error: holdings then fall back to their own quotes.
fn market_price(client: &ApiClient, sub: &clap::ArgMatches) -> Result<Option<Decimal>> {
    if let Some(p) = sub.get_one::<String>("price") {
        return Ok(Some(parse_decimal(p)?));
    }
    match client.gold_price() {
        Ok(p) => Ok(Some(p.price_per_gram)),
        Err(ApiError::Status { status: 404, .. }) => {
            warn!("No gold price recorded; valuing holdings at their own quotes");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Serialize)]
pub struct GoldAssetRow {
    pub id: String,
    pub name: String,
    pub gold_type: GoldType,
    pub weight_gram: Decimal,
    pub purchase_date: String,
    pub purchase_value: Decimal,
    pub current_value: Decimal,
    pub profit_loss: Decimal,
    pub profit_loss_percent: Decimal,
}

pub fn gold_asset_rows(assets: &[GoldAsset], price: Option<Decimal>) -> Vec<GoldAssetRow> {
    assets
        .iter()
        .map(|a| {
            let pos = gold_position_value(a, price);
            GoldAssetRow {
                id: a.id.clone(),
                name: a.name.clone(),
                gold_type: a.gold_type,
                weight_gram: a.weight_gram,
                purchase_date: a.purchase_date.to_string(),
                purchase_value: pos.purchase_value,
                current_value: pos.current_value,
                profit_loss: pos.profit_loss,
                profit_loss_percent: pos.profit_loss_percent,
            }
        })
        .collect()
}

fn assets(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let (assets, price) = std::thread::scope(|s| -> Result<_> {
        let assets = s.spawn(|| client.gold_assets());
        let price = market_price(client, sub)?;
        Ok((joined(assets)?, price))
    })?;
    let data = gold_asset_rows(&assets, price);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.name.clone(),
                    r.gold_type.to_string(),
                    format!("{}", r.weight_gram.normalize()),
                    fmt_money(&r.purchase_value),
                    fmt_money(&r.current_value),
                    fmt_money(&r.profit_loss),
                    fmt_percent(&r.profit_loss_percent),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Name", "Type", "Grams", "Cost", "Value", "P/L", "P/L %", "Id"],
                rows
            )
        );
    }
    Ok(())
}

fn summary(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let portfolio = if sub.get_flag("server") {
        let s = client.gold_summary()?;
        GoldPortfolio {
            total_weight_gram: s.total_weight_gram,
            total_purchase_value: s.total_purchase_value,
            total_current_value: s.total_current_value,
            total_profit_loss: s.total_profit_loss,
            profit_loss_percent: s.profit_loss_percent,
        }
    } else {
        let price = market_price(client, sub)?;
        gold_portfolio_summary(&client.gold_assets()?, price)
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &portfolio)? {
        print_portfolio(&portfolio);
    }
    Ok(())
}

pub fn print_portfolio(p: &GoldPortfolio) {
    println!(
        "{}",
        pretty_table(
            &["Grams", "Cost", "Value", "P/L", "P/L %"],
            vec![vec![
                format!("{}", p.total_weight_gram.normalize()),
                fmt_money(&p.total_purchase_value),
                fmt_money(&p.total_current_value),
                fmt_money(&p.total_profit_loss),
                fmt_percent(&p.profit_loss_percent),
            ]],
        )
    );
}
