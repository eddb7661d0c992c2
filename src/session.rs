// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The logged-in user and their transactions, loaded once per command.

use crate::db;
use crate::models::{PortfolioItem, Summary, SummaryPeriod, Transaction, UserProfile};
use crate::period::filter_period;
use crate::prices::PriceSource;
use crate::summary::summarize;
use crate::utils::get_setting;
use crate::valuation::portfolio;
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};

pub const CURRENT_USER_KEY: &str = "current_user";

#[derive(Debug, Clone)]
pub struct Session {
    pub user: UserProfile,
    pub transactions: Vec<Transaction>,
}

impl Session {
    pub fn new(user: UserProfile, transactions: Vec<Transaction>) -> Self {
        Self { user, transactions }
    }

    /// Loads the user recorded by `user login`.
    pub fn load(conn: &Connection) -> Result<Self> {
        let user_id = get_setting(conn, CURRENT_USER_KEY)?
            .ok_or_else(|| anyhow!("Not logged in. Run `aibudget user login` first"))?;
        let user = find_user(conn, &user_id)?
            .with_context(|| format!("Logged-in user '{}' no longer exists", user_id))?;
        let transactions = db::load_transactions(conn, &user.id)?;
        tracing::debug!(user = %user.id, count = transactions.len(), "session loaded");
        Ok(Self::new(user, transactions))
    }

    /// Window contents, newest first.
    pub fn history(&self, reference: NaiveDate, period: SummaryPeriod) -> Vec<&Transaction> {
        let mut txs = filter_period(&self.transactions, reference, period);
        txs.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        txs
    }

    pub fn summary(&self, reference: NaiveDate, period: SummaryPeriod) -> Summary {
        summarize(filter_period(&self.transactions, reference, period))
    }

    /// Holdings always use the full history.
    pub fn portfolio<P: PriceSource + ?Sized>(&self, prices: &P) -> Vec<PortfolioItem> {
        portfolio(&self.transactions, prices)
    }
}

pub fn find_user(conn: &Connection, id: &str) -> Result<Option<UserProfile>> {
    let user = conn
        .query_row(
            "SELECT id, name FROM users WHERE id=?1",
            params![id],
            |r| {
                Ok(UserProfile {
                    id: r.get(0)?,
                    name: r.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}
