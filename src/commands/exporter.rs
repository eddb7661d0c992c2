// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::session::Session;
use crate::utils::arg_str;
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let session = Session::load(conn)?;
            export_transactions(&session, sub)
        }
        _ => Ok(()),
    }
}

pub fn export_transactions(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = arg_str(sub, "format")?.to_lowercase();
    let out = arg_str(sub, "out")?;
    let txs = &session.transactions;

    match fmt.as_str() {
        "csv" => {
            let mut wtr =
                csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
            wtr.write_record([
                "id", "date", "type", "category", "item", "amount", "note", "units", "slip_image",
            ])?;
            for t in txs {
                wtr.write_record([
                    t.id.to_string(),
                    t.date.to_string(),
                    t.r#type.to_string(),
                    t.category.key().to_string(),
                    t.item.clone(),
                    t.amount.to_string(),
                    t.note.clone().unwrap_or_default(),
                    t.units.map(|u| u.to_string()).unwrap_or_default(),
                    t.slip_image.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = txs
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id, "date": t.date, "type": t.r#type, "category": t.category,
                        "item": t.item, "amount": t.amount.to_string(), "note": t.note,
                        "units": t.units.map(|u| u.to_string()), "slip_image": t.slip_image
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Write {}", out))?;
        }
        other => return Err(anyhow!("Unknown format: {} (use csv|json)", other)),
    }
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}
