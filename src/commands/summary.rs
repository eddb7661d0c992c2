// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Summary, SummaryPeriod};
use crate::period::period_bounds;
use crate::session::Session;
use crate::utils::{date_or_today, fmt_amount, maybe_print_json, parse_period, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub label: String,
    pub amount: String,
    pub share: String,
    pub color: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub period: SummaryPeriod,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub income: String,
    pub expense: String,
    pub investment: String,
    pub balance: String,
    pub breakdown: Vec<CategoryShare>,
}

pub fn build_report(session: &Session, reference: NaiveDate, period: SummaryPeriod) -> SummaryReport {
    let (from, to) = period_bounds(reference, period);
    report_from(&session.summary(reference, period), period, from, to)
}

fn report_from(s: &Summary, period: SummaryPeriod, from: NaiveDate, to: NaiveDate) -> SummaryReport {
    let breakdown = s
        .chart_points()
        .into_iter()
        .map(|p| CategoryShare {
            category: p.category.key().to_string(),
            label: p.label.to_string(),
            amount: format!("{:.2}", p.value),
            share: format!("{:.1}", p.share),
            color: p.color.to_string(),
        })
        .collect();
    SummaryReport {
        period,
        from,
        to,
        income: format!("{:.2}", s.income),
        expense: format!("{:.2}", s.expense),
        investment: format!("{:.2}", s.investment),
        balance: format!("{:.2}", s.balance),
        breakdown,
    }
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let session = Session::load(conn)?;
    let reference = date_or_today(m.get_one::<String>("date"))?;
    let period = parse_period(m.get_one::<String>("period"))?;
    let (from, to) = period_bounds(reference, period);
    let s = session.summary(reference, period);
    if m.get_flag("json") || m.get_flag("jsonl") {
        let report = report_from(&s, period, from, to);
        maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &report)?;
        return Ok(());
    }
    let points = s.chart_points();

    println!("{} .. {}", from, to);
    println!(
        "{}",
        pretty_table(
            &["Income", "Expense", "Investment", "Balance"],
            vec![vec![
                fmt_amount(&s.income),
                fmt_amount(&s.expense),
                fmt_amount(&s.investment),
                fmt_amount(&s.balance),
            ]],
        )
    );
    if points.is_empty() {
        println!("No spending in this period");
    } else {
        let rows = points
            .into_iter()
            .map(|p| {
                vec![
                    p.label.to_string(),
                    fmt_amount(&p.value),
                    format!("{:.1}%", p.share),
                    p.color.to_string(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Share", "Colour"], rows));
    }
    Ok(())
}
