// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Market prices for portfolio valuation.
//!
//! Prices are THB per unit. US listings are converted at a flat 35 THB/USD.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use std::collections::HashMap;

const USD_THB: i64 = 35;

static REFERENCE: Lazy<HashMap<&'static str, Decimal>> = Lazy::new(|| {
    let usd = Decimal::from(USD_THB);
    HashMap::from([
        ("AAPL", Decimal::new(17550, 2) * usd),
        ("TSLA", Decimal::new(24030, 2) * usd),
        ("GOOGL", Decimal::new(13520, 2) * usd),
        ("MSFT", Decimal::new(33000, 2) * usd),
        ("NVDA", Decimal::new(46010, 2) * usd),
        ("AMZN", Decimal::new(13000, 2) * usd),
        ("META", Decimal::new(30000, 2) * usd),
        ("PTT", Decimal::new(3350, 2)),
        ("AOT", Decimal::new(7125, 2)),
        ("CPALL", Decimal::new(6200, 2)),
        ("KBANK", Decimal::new(12850, 2)),
        ("SCB", Decimal::new(10500, 2)),
        ("DELTA", Decimal::new(8200, 2)),
        ("GULF", Decimal::new(4500, 2)),
        ("ADVANC", Decimal::new(22000, 2)),
        ("BDMS", Decimal::new(2700, 2)),
        ("SCC", Decimal::new(30000, 2)),
    ])
});

/// Stable stand-in price for symbols nobody quotes: the sum of the symbol's
/// UTF-16 code units, mod 200, plus 50.
pub fn synthetic_price(symbol: &str) -> Decimal {
    let sum: u64 = symbol.encode_utf16().map(u64::from).sum();
    Decimal::from(sum % 200 + 50)
}

pub trait PriceSource {
    /// Known quote for an uppercase symbol.
    fn quote(&self, symbol: &str) -> Option<Decimal>;

    fn price(&self, symbol: &str) -> Decimal {
        let symbol = symbol.trim().to_uppercase();
        self.quote(&symbol)
            .unwrap_or_else(|| synthetic_price(&symbol))
    }
}

/// The built-in table of US and Thai stocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferencePrices;

impl PriceSource for ReferencePrices {
    fn quote(&self, symbol: &str) -> Option<Decimal> {
        REFERENCE.get(symbol.to_uppercase().as_str()).copied()
    }
}

pub fn reference_symbols() -> Vec<(&'static str, Decimal)> {
    let mut v: Vec<_> = REFERENCE.iter().map(|(s, p)| (*s, *p)).collect();
    v.sort_by(|a, b| a.0.cmp(b.0));
    v
}

/// Manual overrides from the `prices` table, consulted before the reference table.
#[derive(Debug, Default, Clone)]
pub struct LayeredPrices {
    overrides: HashMap<String, Decimal>,
}

impl LayeredPrices {
    pub fn new(overrides: HashMap<String, Decimal>) -> Self {
        let overrides = overrides
            .into_iter()
            .map(|(k, v)| (k.to_uppercase(), v))
            .collect();
        Self { overrides }
    }

    pub fn load(conn: &Connection) -> Result<Self> {
        let mut stmt = conn.prepare_cached("SELECT symbol, price FROM prices")?;
        let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
        let mut overrides = HashMap::new();
        for row in rows {
            let (symbol, price_s) = row?;
            let price = Decimal::from_str_exact(&price_s)
                .with_context(|| format!("Invalid stored price '{}' for {}", price_s, symbol))?;
            overrides.insert(symbol, price);
        }
        tracing::debug!(count = overrides.len(), "loaded price overrides");
        Ok(Self::new(overrides))
    }

    pub fn is_override(&self, symbol: &str) -> bool {
        self.overrides.contains_key(&symbol.to_uppercase())
    }
}

impl PriceSource for LayeredPrices {
    fn quote(&self, symbol: &str) -> Option<Decimal> {
        let symbol = symbol.to_uppercase();
        self.overrides
            .get(&symbol)
            .copied()
            .or_else(|| ReferencePrices.quote(&symbol))
    }
}

pub fn set_price(conn: &Connection, symbol: &str, price: Decimal) -> Result<String> {
    let symbol = symbol.trim().to_uppercase();
    let as_of = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO prices(symbol, price, as_of) VALUES (?1, ?2, ?3)
         ON CONFLICT(symbol) DO UPDATE SET price=excluded.price, as_of=excluded.as_of",
        params![symbol, price.to_string(), as_of],
    )?;
    Ok(symbol)
}
