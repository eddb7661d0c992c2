// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::assistant::{Assistant, ChatContext, GeminiAssistant, RuleAssistant, greeting};
use crate::session::Session;
use anyhow::Result;
use rusqlite::Connection;

/// Rule-based unless `live` is set and a Gemini key is configured.
pub fn pick_assistant(live: bool) -> Box<dyn Assistant> {
    if live {
        if let Some(g) = GeminiAssistant::from_env() {
            return Box::new(g);
        }
        tracing::warn!("--live given but GEMINI_API_KEY is not set");
    }
    Box::new(RuleAssistant)
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let session = Session::load(conn)?;
    let Some(message) = m.get_one::<String>("message").map(|s| s.trim()) else {
        println!("{}", greeting(&session.user.name));
        return Ok(());
    };
    if message.is_empty() {
        println!("{}", greeting(&session.user.name));
        return Ok(());
    }
    let ctx = ChatContext {
        user_name: &session.user.name,
        transactions: &session.transactions,
    };
    let reply = pick_assistant(m.get_flag("live")).reply(&ctx, message)?;
    println!("{}", reply);
    Ok(())
}
