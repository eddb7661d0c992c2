// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use aibudget::{commands::users, db, models::UserProfile, session::Session};
use rusqlite::Connection;

pub fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    users::register(&conn, "somchai", "Somchai", "123456").unwrap();
    conn
}

pub fn insert(conn: &Connection, date: &str, ty: &str, category: &str, amount: &str) {
    conn.execute(
        "INSERT INTO transactions(user_id, date, item, category, amount, type) VALUES ('somchai', ?1, 'item', ?2, ?3, ?4)",
        (date, category, amount, ty),
    )
    .unwrap();
}

pub fn insert_investment(conn: &Connection, date: &str, symbol: &str, units: Option<&str>, amount: &str) {
    conn.execute(
        "INSERT INTO transactions(user_id, date, item, category, amount, type, note, units) VALUES ('somchai', ?1, 'buy', 'investment', ?2, 'expense', ?3, ?4)",
        (date, amount, symbol, units),
    )
    .unwrap();
}

pub fn session(conn: &Connection) -> Session {
    Session::load(conn).unwrap()
}

pub fn profile() -> UserProfile {
    UserProfile {
        id: "somchai".into(),
        name: "Somchai".into(),
    }
}
