// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, Transaction};
use crate::prices::{LayeredPrices, PriceSource};
use crate::session::Session;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

/// `(issue, detail)` rows for records the portfolio silently skips and for
/// holdings valued at a synthetic price.
pub fn diagnose<P: PriceSource>(txs: &[Transaction], prices: &P) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut priced = BTreeSet::new();
    for t in txs.iter().filter(|t| t.category == Category::Investment) {
        let has_symbol = t.note.as_deref().is_some_and(|n| !n.trim().is_empty());
        if !has_symbol {
            rows.push(vec![
                "investment_no_symbol".into(),
                format!("#{} {} {}", t.id, t.date, t.item),
            ]);
        }
        match t.units {
            None => rows.push(vec![
                "investment_no_units".into(),
                format!("#{} {} {}", t.id, t.date, t.item),
            ]),
            Some(u) if u <= Decimal::ZERO => rows.push(vec![
                "investment_bad_units".into(),
                format!("#{} {} units={}", t.id, t.date, u),
            ]),
            _ => {}
        }
        if let Some(symbol) = t.holding_symbol() {
            priced.insert(symbol);
        }
    }
    for symbol in priced {
        if prices.quote(&symbol).is_none() {
            rows.push(vec![
                "synthetic_price".into(),
                format!("{} valued at {}", symbol, prices.price(&symbol)),
            ]);
        }
    }
    rows
}

pub fn handle(conn: &Connection) -> Result<()> {
    let session = Session::load(conn)?;
    let prices = LayeredPrices::load(conn)?;
    let rows = diagnose(&session.transactions, &prices);
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
