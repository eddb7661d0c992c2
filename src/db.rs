// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, NewTransaction, Transaction, TransactionType};
use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "AIBudget", "aibudget"));

/// Env var that points the CLI at a specific database file.
pub const DB_ENV: &str = "AIBUDGET_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("aibudget.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS users(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        pin_hash TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        date TEXT NOT NULL,
        item TEXT NOT NULL,
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        note TEXT,
        units TEXT,
        slip_image TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);

    -- manual price overrides, THB per unit
    CREATE TABLE IF NOT EXISTS prices(
        symbol TEXT PRIMARY KEY,
        price TEXT NOT NULL,
        as_of TEXT NOT NULL
    );
    "#,
    )?;
    Ok(())
}

fn parse_opt_decimal(raw: Option<String>, what: &str, id: i64) -> Result<Option<Decimal>> {
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| {
            Decimal::from_str_exact(s.trim())
                .with_context(|| format!("Invalid stored {} '{}' on transaction {}", what, s, id))
        })
        .transpose()
}

fn transaction_from_row(r: &Row<'_>) -> Result<Transaction> {
    let id: i64 = r.get(0)?;
    let date_s: String = r.get(1)?;
    let item: String = r.get(2)?;
    let category_s: String = r.get(3)?;
    let amount_s: String = r.get(4)?;
    let type_s: String = r.get(5)?;
    let note: Option<String> = r.get(6)?;
    let units_s: Option<String> = r.get(7)?;
    let slip_image: Option<String> = r.get(8)?;

    let date = crate::utils::parse_date(&date_s)
        .with_context(|| format!("Invalid stored date on transaction {}", id))?;
    let amount = Decimal::from_str_exact(&amount_s)
        .with_context(|| format!("Invalid stored amount '{}' on transaction {}", amount_s, id))?;
    let r#type: TransactionType = type_s
        .parse()
        .map_err(|e| anyhow!("Transaction {}: {}", id, e))?;

    Ok(Transaction {
        id,
        date,
        item,
        category: Category::parse_lenient(&category_s),
        amount,
        r#type,
        note,
        units: parse_opt_decimal(units_s, "units", id)?,
        slip_image,
    })
}

/// Every transaction owned by `user_id`, in insertion order.
pub fn load_transactions(conn: &Connection, user_id: &str) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, item, category, amount, type, note, units, slip_image
         FROM transactions WHERE user_id=?1 ORDER BY id",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(transaction_from_row(r)?);
    }
    Ok(out)
}

pub fn insert_transaction(conn: &Connection, user_id: &str, tx: &NewTransaction) -> Result<i64> {
    tx.validate()?;
    conn.execute(
        "INSERT INTO transactions(user_id, date, item, category, amount, type, note, units, slip_image)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            user_id,
            tx.date.to_string(),
            tx.item.trim(),
            tx.category.key(),
            tx.amount.to_string(),
            tx.r#type.as_str(),
            tx.note,
            tx.units.map(|u| u.to_string()),
            tx.slip_image,
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, user_id, category = tx.category.key(), "transaction recorded");
    Ok(id)
}

/// Returns whether a row was removed.
pub fn delete_transaction(conn: &Connection, user_id: &str, id: i64) -> Result<bool> {
    let n = conn.execute(
        "DELETE FROM transactions WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    tracing::info!(id, user_id, removed = n, "transaction delete");
    Ok(n > 0)
}
