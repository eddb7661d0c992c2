// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use aibudget::{cli, commands::exporter};
use serde_json::Value;
use tempfile::tempdir;

fn export_matches(format: &str, out: &str) -> clap::ArgMatches {
    let matches = cli::build_cli().get_matches_from([
        "aibudget",
        "export",
        "transactions",
        "--format",
        format,
        "--out",
        out,
    ]);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("export command not parsed");
    };
    let Some(("transactions", tx_m)) = export_m.subcommand() else {
        panic!("transactions subcommand not parsed");
    };
    tx_m.clone()
}

#[test]
fn export_json_keeps_investment_fields() {
    let conn = common::setup();
    common::insert(&conn, "2024-03-01", "expense", "food", "100");
    common::insert_investment(&conn, "2024-03-20", "PTT", Some("100"), "3500");

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    exporter::export_transactions(&common::session(&conn), &export_matches("json", &out_str))
        .unwrap();

    let parsed: Value = serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["category"], "food");
    assert_eq!(arr[0]["type"], "expense");
    assert_eq!(arr[1]["note"], "PTT");
    assert_eq!(arr[1]["units"], "100");
    assert_eq!(arr[1]["date"], "2024-03-20");
}

#[test]
fn export_csv_has_header_and_rows() {
    let conn = common::setup();
    common::insert(&conn, "2024-03-15", "income", "salary", "20000");

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    exporter::export_transactions(&common::session(&conn), &export_matches("CSV", &out_str))
        .unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[1], "date");
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][2], "income");
    assert_eq!(&rows[0][3], "salary");
    assert_eq!(&rows[0][5], "20000");
}

#[test]
fn export_rejects_unknown_format() {
    let conn = common::setup();
    let dir = tempdir().unwrap();
    let out_str = dir.path().join("x.xml").to_string_lossy().to_string();
    let err = exporter::export_transactions(&common::session(&conn), &export_matches("xml", &out_str))
        .unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
}
