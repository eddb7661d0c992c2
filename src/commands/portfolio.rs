// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{PortfolioItem, PortfolioTotals};
use crate::prices::{LayeredPrices, reference_symbols, set_price};
use crate::session::Session;
use crate::utils::{arg_str, fmt_amount, maybe_print_json, parse_decimal, pretty_table};
use crate::valuation::portfolio_totals;
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("value", sub)) => value(conn, sub)?,
        Some(("price", sub)) => price_cmd(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct PortfolioReport {
    pub items: Vec<PortfolioItem>,
    pub totals: PortfolioTotals,
}

pub fn portfolio_report(conn: &Connection, session: &Session) -> Result<PortfolioReport> {
    let prices = LayeredPrices::load(conn)?;
    let items = session.portfolio(&prices);
    let totals = portfolio_totals(&items);
    Ok(PortfolioReport { items, totals })
}

fn signed(d: &Decimal) -> String {
    if *d > Decimal::ZERO {
        format!("+{}", fmt_amount(d))
    } else {
        fmt_amount(d)
    }
}

fn value(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let session = Session::load(conn)?;
    let report = portfolio_report(conn, &session)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    if report.items.is_empty() {
        println!("No holdings yet. Add an investment transaction with --note and --units");
        return Ok(());
    }

    let mut rows: Vec<Vec<String>> = report
        .items
        .iter()
        .map(|i| {
            vec![
                i.symbol.clone(),
                format!("{}", i.total_units.normalize()),
                fmt_amount(&i.avg_cost),
                fmt_amount(&i.market_price),
                fmt_amount(&i.market_value),
                signed(&i.pl_amount),
                format!("{:.2}%", i.pl_percentage),
            ]
        })
        .collect();
    let t = &report.totals;
    rows.push(vec![
        "TOTAL".into(),
        String::new(),
        fmt_amount(&t.total_cost),
        String::new(),
        fmt_amount(&t.market_value),
        signed(&t.pl_amount),
        format!("{:.2}%", t.pl_percentage),
    ]);
    println!(
        "{}",
        pretty_table(
            &["Symbol", "Units", "Avg Cost", "Price", "Value", "P&L", "P&L %"],
            rows
        )
    );
    Ok(())
}

fn price_cmd(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let price = parse_decimal(arg_str(sub, "price")?)?;
            if price <= Decimal::ZERO {
                return Err(anyhow!("Price must be greater than zero"));
            }
            let symbol = set_price(conn, arg_str(sub, "symbol")?, price)?;
            println!("Price for {} set to {}", symbol, price);
            Ok(())
        }
        Some(("list", _)) => list_prices(conn),
        _ => Ok(()),
    }
}

fn list_prices(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare("SELECT symbol, price, as_of FROM prices ORDER BY symbol")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (sym, px, as_of) = row?;
        data.push(vec![sym, px, as_of, "manual".to_string()]);
    }
    for (sym, px) in reference_symbols() {
        if !data.iter().any(|r| r[0] == sym) {
            data.push(vec![sym.to_string(), px.to_string(), String::new(), "reference".into()]);
        }
    }
    println!(
        "{}",
        pretty_table(&["Symbol", "Price", "As Of", "Source"], data)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use crate::models::UserProfile;
    use rust_decimal_macros::dec;

    fn setup_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO users(id, name, pin_hash) VALUES ('investor', 'Investor', 'x')",
            [],
        )
        .unwrap();
        conn
    }

    fn session(conn: &Connection) -> Session {
        Session::new(
            UserProfile {
                id: "investor".into(),
                name: "Investor".into(),
            },
            crate::db::load_transactions(conn, "investor").unwrap(),
        )
    }

    #[test]
    fn report_uses_manual_price_over_reference() {
        let conn = setup_conn();
        conn.execute(
            "INSERT INTO transactions(user_id, date, item, category, amount, type, note, units)
             VALUES ('investor', '2024-03-20', 'PTT', 'investment', '3500', 'expense', 'ptt', '100')",
            [],
        )
        .unwrap();
        set_price(&conn, " ptt ", dec!(40)).unwrap();

        let report = portfolio_report(&conn, &session(&conn)).unwrap();
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].market_price, dec!(40));
        assert_eq!(report.items[0].market_value, dec!(4000));
        assert_eq!(report.totals.pl_amount, dec!(500));
    }

    #[test]
    fn report_totals_span_all_holdings() {
        let conn = setup_conn();
        conn.execute_batch(
            "INSERT INTO transactions(user_id, date, item, category, amount, type, note, units)
             VALUES ('investor', '2024-01-05', 'PTT', 'investment', '3500', 'expense', 'PTT', '100');
             INSERT INTO transactions(user_id, date, item, category, amount, type, note, units)
             VALUES ('investor', '2023-07-01', 'AOT', 'investment', '7000', 'expense', 'AOT', '100');
             INSERT INTO transactions(user_id, date, item, category, amount, type, note, units)
             VALUES ('investor', '2023-07-02', 'no units', 'investment', '999', 'expense', 'SCB', NULL);",
        )
        .unwrap();

        let report = portfolio_report(&conn, &session(&conn)).unwrap();
        assert_eq!(report.items.len(), 2);
        assert_eq!(report.items[0].symbol, "AOT");
        assert_eq!(report.totals.total_cost, dec!(10500));
        assert_eq!(report.totals.market_value, dec!(10475));
        assert_eq!(report.totals.pl_amount, dec!(-25));
    }
}
