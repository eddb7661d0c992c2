// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use aibudget::models::{Category, TransactionType};
use aibudget::{cli, commands::transactions, db};
use rust_decimal_macros::dec;

fn sub_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["aibudget", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("tx", tx_m)) => match tx_m.subcommand() {
            Some((_, m)) => m.clone(),
            None => panic!("no tx subcommand"),
        },
        _ => panic!("no tx command"),
    }
}

#[test]
fn add_args_build_an_investment() {
    let m = sub_matches(&[
        "add",
        "--date",
        " 2024-03-20 ",
        "--category",
        "investment",
        "--item",
        " PTT ",
        "--amount",
        " 3500 ",
        "--note",
        " ptt ",
        "--units",
        "100",
    ]);
    let tx = transactions::new_from_args(&m).unwrap();
    assert_eq!(tx.r#type, TransactionType::Expense);
    assert_eq!(tx.category, Category::Investment);
    assert_eq!(tx.amount, dec!(3500));
    assert_eq!(tx.note.as_deref(), Some("ptt"));
    assert_eq!(tx.units, Some(dec!(100)));
    assert_eq!(tx.item, "PTT");
}

#[test]
fn add_args_reject_bad_values() {
    let zero = sub_matches(&["add", "--category", "food", "--item", "x", "--amount", "0"]);
    assert!(transactions::new_from_args(&zero).is_err());

    let salary_expense = sub_matches(&["add", "--category", "salary", "--item", "x", "--amount", "5"]);
    let err = transactions::new_from_args(&salary_expense).unwrap_err();
    assert!(err.to_string().contains("cannot be used"));

    let bad_units = sub_matches(&[
        "add", "--category", "investment", "--item", "x", "--amount", "5", "--units=-1",
    ]);
    assert!(transactions::new_from_args(&bad_units).is_err());

    let bad_type = sub_matches(&[
        "add", "--type", "transfer", "--category", "food", "--item", "x", "--amount", "5",
    ]);
    assert!(transactions::new_from_args(&bad_type).is_err());
}

#[test]
fn unknown_category_is_rejected_at_entry() {
    let m = sub_matches(&[
        "add", "--type", "income", "--category", "lottery", "--item", "win", "--amount", "60",
    ]);
    let err = transactions::new_from_args(&m).unwrap_err();
    assert!(err.to_string().contains("Unknown category 'lottery'"));

    let m = sub_matches(&[
        "add", "--type", "income", "--category", "อื่นๆ", "--item", "win", "--amount", "60",
    ]);
    assert_eq!(transactions::new_from_args(&m).unwrap().category, Category::Other);
}

#[test]
fn add_args_reject_out_of_range_values() {
    let huge_units = sub_matches(&[
        "add",
        "--category",
        "investment",
        "--item",
        "x",
        "--amount",
        "100",
        "--note",
        "PTT",
        "--units",
        "79228162514264337593543950335",
    ]);
    let err = transactions::new_from_args(&huge_units).unwrap_err();
    assert!(err.to_string().contains("out of range"));

    let tiny_amount = sub_matches(&[
        "add", "--category", "food", "--item", "x", "--amount", "0.0000000000000000000000000001",
    ]);
    assert!(transactions::new_from_args(&tiny_amount).is_err());

    let huge_amount = sub_matches(&[
        "add", "--type", "income", "--category", "salary", "--item", "x", "--amount",
        "79228162514264337593543950335",
    ]);
    assert!(transactions::new_from_args(&huge_amount).is_err());
}

#[test]
fn list_respects_period_and_order() {
    let conn = common::setup();
    common::insert(&conn, "2024-03-01", "expense", "food", "100");
    common::insert(&conn, "2024-03-15", "income", "salary", "20000");
    common::insert(&conn, "2024-02-29", "expense", "food", "50");
    let session = common::session(&conn);

    let m = sub_matches(&["list", "--period", "month", "--date", "2024-03-10"]);
    let rows = transactions::query_rows(&session, &m).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2024-03-15");
    assert_eq!(rows[1].label, "ค่าอาหาร");

    let m = sub_matches(&["list", "--all"]);
    assert_eq!(transactions::query_rows(&session, &m).unwrap().len(), 3);
}

#[test]
fn rm_with_yes_deletes() {
    let conn = common::setup();
    common::insert(&conn, "2024-03-01", "expense", "food", "100");
    common::insert(&conn, "2024-03-02", "expense", "food", "200");
    let matches = cli::build_cli().get_matches_from(["aibudget", "tx", "rm", "--id", "1", "--yes"]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx command");
    };
    transactions::handle(&conn, tx_m).unwrap();

    let left = db::load_transactions(&conn, "somchai").unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].amount, dec!(200));

    assert!(transactions::handle(&conn, tx_m).is_err());
}
