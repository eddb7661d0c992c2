// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{UserProfile, ValidationError};
use crate::session::{CURRENT_USER_KEY, find_user};
use crate::utils::{arg_str, clear_setting, get_setting, set_setting};
use anyhow::{Result, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, OptionalExtension, params};
use sha2::{Digest, Sha256};

static PIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{6}$").expect("valid PIN pattern"));

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("register", sub)) => {
            let user = register(
                conn,
                arg_str(sub, "id")?,
                arg_str(sub, "name")?,
                arg_str(sub, "pin")?,
            )?;
            println!("Registered and logged in as {} ({})", user.name, user.id);
        }
        Some(("login", sub)) => {
            let user = login(conn, arg_str(sub, "id")?, arg_str(sub, "pin")?)?;
            println!("Welcome back, {}", user.name);
        }
        Some(("logout", _)) => {
            logout(conn)?;
            println!("Logged out");
        }
        Some(("whoami", _)) => match get_setting(conn, CURRENT_USER_KEY)? {
            Some(id) => match find_user(conn, &id)? {
                Some(u) => println!("{} ({})", u.name, u.id),
                None => println!("Not logged in"),
            },
            None => println!("Not logged in"),
        },
        _ => {}
    }
    Ok(())
}

pub fn validate_username(id: &str) -> Result<(), ValidationError> {
    if id.trim().chars().count() >= 4 {
        Ok(())
    } else {
        Err(ValidationError::ShortUsername)
    }
}

pub fn validate_pin(pin: &str) -> Result<(), ValidationError> {
    if PIN_RE.is_match(pin) {
        Ok(())
    } else {
        Err(ValidationError::BadPin)
    }
}

fn hash_pin(user_id: &str, pin: &str) -> String {
    let mut h = Sha256::new();
    h.update(user_id.as_bytes());
    h.update(b":");
    h.update(pin.as_bytes());
    h.finalize().iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn register(conn: &Connection, id: &str, name: &str, pin: &str) -> Result<UserProfile> {
    let id = id.trim();
    validate_username(id)?;
    validate_pin(pin)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingName.into());
    }
    if find_user(conn, id)?.is_some() {
        return Err(anyhow!("Username '{}' is already taken", id));
    }
    conn.execute(
        "INSERT INTO users(id, name, pin_hash) VALUES (?1, ?2, ?3)",
        params![id, name, hash_pin(id, pin)],
    )?;
    set_setting(conn, CURRENT_USER_KEY, id)?;
    tracing::info!(user = id, "user registered");
    Ok(UserProfile {
        id: id.to_string(),
        name: name.to_string(),
    })
}

pub fn login(conn: &Connection, id: &str, pin: &str) -> Result<UserProfile> {
    let id = id.trim();
    validate_username(id)?;
    validate_pin(pin)?;
    let stored: Option<(String, String)> = conn
        .query_row(
            "SELECT name, pin_hash FROM users WHERE id=?1",
            params![id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    let Some((name, pin_hash)) = stored else {
        return Err(anyhow!("User '{}' not found, please register", id));
    };
    if pin_hash != hash_pin(id, pin) {
        tracing::warn!(user = id, "login rejected");
        return Err(anyhow!("Incorrect PIN"));
    }
    set_setting(conn, CURRENT_USER_KEY, id)?;
    Ok(UserProfile {
        id: id.to_string(),
        name,
    })
}

pub fn logout(conn: &Connection) -> Result<()> {
    clear_setting(conn, CURRENT_USER_KEY)
}
