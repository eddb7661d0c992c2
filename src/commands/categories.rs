// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, TransactionType};
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", _)) = m.subcommand() {
        let data = Category::ALL
            .iter()
            .map(|c| {
                let kind = match (
                    c.allows(TransactionType::Income),
                    c.allows(TransactionType::Expense),
                ) {
                    (true, true) => "income, expense",
                    (true, false) => "income",
                    _ => "expense",
                };
                vec![
                    c.key().to_string(),
                    c.label().to_string(),
                    kind.to_string(),
                    c.color().to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Key", "Label", "Used for", "Colour"], data)
        );
    }
    Ok(())
}
