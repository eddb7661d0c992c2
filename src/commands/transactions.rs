// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{delete_transaction, insert_transaction};
use crate::models::{Category, NewTransaction, Transaction, TransactionType};
use crate::session::Session;
use crate::utils::{
    arg_str, date_or_today, fmt_amount, maybe_print_json, parse_decimal, parse_period,
    pretty_table,
};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;
use std::io::{BufRead, Write, stdin, stdout};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Builds an unsaved transaction from `tx add` arguments.
pub fn new_from_args(sub: &clap::ArgMatches) -> Result<NewTransaction> {
    let date = date_or_today(sub.get_one::<String>("date"))?;
    let r#type: TransactionType = arg_str(sub, "type")?.parse()?;
    let category: Category = arg_str(sub, "category")?.parse()?;
    if !category.allows(r#type) {
        return Err(anyhow!(
            "Category '{}' cannot be used for {} transactions",
            category.key(),
            r#type
        ));
    }
    let amount = parse_decimal(arg_str(sub, "amount")?)?;
    let note = sub
        .get_one::<String>("note")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());
    let units = sub
        .get_one::<String>("units")
        .map(|s| parse_decimal(s))
        .transpose()?;
    let slip_image = sub.get_one::<String>("slip").map(|s| s.trim().to_string());

    let tx = NewTransaction {
        date,
        item: arg_str(sub, "item")?.to_string(),
        category,
        amount,
        r#type,
        note,
        units,
        slip_image,
    };
    tx.validate()?;
    Ok(tx)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let session = Session::load(conn)?;
    let tx = new_from_args(sub)?;
    if tx.category == Category::Investment && (tx.note.is_none() || tx.units.is_none()) {
        eprintln!("Note: investment without --note and --units will not appear in the portfolio");
    }
    let id = insert_transaction(conn, &session.user.id, &tx)?;
    println!(
        "Recorded #{} {} {} '{}' on {} ({})",
        id,
        tx.r#type,
        fmt_amount(&tx.amount),
        tx.item,
        tx.date,
        tx.category.label()
    );
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub item: String,
    pub category: String,
    pub label: String,
    pub r#type: String,
    pub amount: String,
    pub note: String,
    pub units: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            item: t.item.clone(),
            category: t.category.key().to_string(),
            label: t.category.label().to_string(),
            r#type: t.r#type.to_string(),
            amount: t.amount.to_string(),
            note: t.note.clone().unwrap_or_default(),
            units: t.units.map(|u| u.to_string()).unwrap_or_default(),
        }
    }
}

/// History for the selected window, newest first.
pub fn query_rows(session: &Session, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    if sub.get_flag("all") {
        let mut txs: Vec<&Transaction> = session.transactions.iter().collect();
        txs.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        return Ok(txs.into_iter().map(TransactionRow::from).collect());
    }
    let reference = date_or_today(sub.get_one::<String>("date"))?;
    let period = parse_period(sub.get_one::<String>("period"))?;
    Ok(session
        .history(reference, period)
        .into_iter()
        .map(TransactionRow::from)
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let session = Session::load(conn)?;
    let data = query_rows(&session, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                let sign = if r.r#type == "income" { "+" } else { "-" };
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.item.clone(),
                    r.label.clone(),
                    format!("{}{}", sign, r.amount),
                    r.note.clone(),
                    r.units.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Item", "Category", "Amount", "Symbol", "Units"],
                rows
            )
        );
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    stdout().flush()?;
    let mut input = String::new();
    if stdin().lock().read_line(&mut input)? == 0 {
        return Ok(false);
    }
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let session = Session::load(conn)?;
    let id = *sub
        .get_one::<i64>("id")
        .ok_or_else(|| anyhow!("Missing --id"))?;
    let Some(tx) = session.transactions.iter().find(|t| t.id == id) else {
        return Err(anyhow!("Transaction #{} not found", id));
    };
    if !sub.get_flag("yes") && !confirm(&format!("Delete #{} '{}' ({})?", id, tx.item, tx.amount))? {
        println!("Kept #{}", id);
        return Ok(());
    }
    if delete_transaction(conn, &session.user.id, id)? {
        println!("Deleted #{}", id);
    }
    Ok(())
}
