// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{PortfolioItem, PortfolioTotals, Transaction};
use crate::prices::PriceSource;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Quotient that saturates to the bound matching its sign on overflow.
fn saturating_div(num: Decimal, den: Decimal) -> Decimal {
    num.checked_div(den).unwrap_or_else(|| {
        if num.is_sign_negative() == den.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}

fn pl_percentage(pl_amount: Decimal, cost: Decimal) -> Decimal {
    if cost.is_zero() {
        Decimal::ZERO
    } else {
        saturating_div(pl_amount, cost).saturating_mul(Decimal::ONE_HUNDRED)
    }
}

/// Holdings built from every investment purchase in `txs`, largest market
/// value first. Pass the full history, not a period slice.
pub fn portfolio<P: PriceSource + ?Sized>(txs: &[Transaction], prices: &P) -> Vec<PortfolioItem> {
    let mut holdings: HashMap<String, (Decimal, Decimal)> = HashMap::new();
    for t in txs {
        let (Some(symbol), Some(units)) = (t.holding_symbol(), t.units) else {
            continue;
        };
        let entry = holdings
            .entry(symbol)
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        entry.0 = entry.0.saturating_add(units);
        entry.1 = entry.1.saturating_add(t.amount);
    }

    let mut items: Vec<PortfolioItem> = holdings
        .into_iter()
        .filter(|(_, (units, _))| *units > Decimal::ZERO)
        .map(|(symbol, (total_units, total_cost))| {
            let market_price = prices.price(&symbol);
            let market_value = total_units.saturating_mul(market_price);
            let pl_amount = market_value.saturating_sub(total_cost);
            PortfolioItem {
                avg_cost: saturating_div(total_cost, total_units),
                pl_percentage: pl_percentage(pl_amount, total_cost),
                symbol,
                total_units,
                total_cost,
                market_price,
                market_value,
                pl_amount,
            }
        })
        .collect();

    items.sort_by(|a, b| {
        b.market_value
            .cmp(&a.market_value)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    items
}

pub fn portfolio_totals(items: &[PortfolioItem]) -> PortfolioTotals {
    let (market_value, total_cost) = items
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(value, cost), i| {
            (value.saturating_add(i.market_value), cost.saturating_add(i.total_cost))
        });
    let pl_amount = market_value.saturating_sub(total_cost);
    PortfolioTotals {
        market_value,
        total_cost,
        pl_amount,
        pl_percentage: pl_percentage(pl_amount, total_cost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, TransactionType};
    use crate::prices::ReferencePrices;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn buy(symbol: &str, units: Option<Decimal>, amount: Decimal) -> Transaction {
        Transaction {
            id: 0,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            item: format!("buy {}", symbol),
            category: Category::Investment,
            amount,
            r#type: TransactionType::Expense,
            note: Some(symbol.to_string()),
            units,
            slip_image: None,
        }
    }

    #[test]
    fn weighted_average_cost() {
        let txs = vec![
            buy("KBANK", Some(dec!(10)), dec!(1000)),
            buy("kbank", Some(dec!(5)), dec!(650)),
        ];
        let items = portfolio(&txs, &ReferencePrices);
        assert_eq!(items.len(), 1);
        let k = &items[0];
        assert_eq!(k.symbol, "KBANK");
        assert_eq!(k.total_units, dec!(15));
        assert_eq!(k.total_cost, dec!(1650));
        assert_eq!(k.avg_cost, dec!(110));
        assert_eq!(k.market_price, dec!(128.50));
        assert_eq!(k.market_value, dec!(1927.5));
        assert_eq!(k.pl_amount, dec!(277.5));
    }

    #[test]
    fn zero_cost_yields_zero_percentage() {
        let txs = vec![buy("FREE", Some(dec!(3)), dec!(0))];
        let items = portfolio(&txs, &ReferencePrices);
        assert_eq!(items[0].pl_percentage, Decimal::ZERO);
        assert_eq!(portfolio_totals(&items).pl_percentage, Decimal::ZERO);
    }

    #[test]
    fn incomplete_records_are_skipped() {
        let mut no_symbol = buy("", Some(dec!(1)), dec!(10));
        no_symbol.note = None;
        let txs = vec![
            buy("PTT", None, dec!(100)),
            buy("   ", Some(dec!(1)), dec!(100)),
            buy("AOT", Some(dec!(0)), dec!(100)),
            no_symbol,
        ];
        assert!(portfolio(&txs, &ReferencePrices).is_empty());
    }

    #[test]
    fn sorted_by_market_value_descending() {
        let txs = vec![
            buy("PTT", Some(dec!(100)), dec!(3500)),
            buy("AAPL", Some(dec!(1)), dec!(6000)),
            buy("BDMS", Some(dec!(10)), dec!(250)),
        ];
        let symbols: Vec<_> = portfolio(&txs, &ReferencePrices)
            .into_iter()
            .map(|i| i.symbol)
            .collect();
        assert_eq!(symbols, vec!["AAPL", "PTT", "BDMS"]);
    }

    #[test]
    fn huge_units_saturate_market_value() {
        let txs = vec![
            buy("PTT", Some(Decimal::MAX), dec!(3500)),
            buy("AOT", Some(Decimal::MAX), dec!(7000)),
        ];
        let items = portfolio(&txs, &ReferencePrices);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].market_value, Decimal::MAX);
        assert_eq!(items[1].market_value, Decimal::MAX);
        assert_eq!(portfolio_totals(&items).market_value, Decimal::MAX);
    }

    #[test]
    fn tiny_cost_saturates_percentage() {
        let txs = vec![buy("KBANK", Some(dec!(1)), dec!(0.0000000000000000000000000001))];
        let items = portfolio(&txs, &ReferencePrices);
        assert!(items[0].pl_amount > dec!(128));
        assert_eq!(items[0].pl_percentage, Decimal::MAX);
        assert_eq!(portfolio_totals(&items).pl_percentage, Decimal::MAX);
    }
}
