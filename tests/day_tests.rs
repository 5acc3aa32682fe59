// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use daybook::commands::day::{self, DayEntry, DayOutcome};
use daybook::commands::{dashboards, transactions};
use daybook::commands::transactions::TransactionForm;
use daybook::error::AppError;
use daybook::models::TxType;
use daybook::session::{self, Session};
use daybook::{cli, db};
use rusqlite::Connection;

fn setup() -> (Connection, Session, i64) {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    let s = session::sign_in(&conn, "alice@example.com").unwrap();
    let dash = dashboards::current(&conn, &s).unwrap();
    (conn, s, dash.id)
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn add(conn: &Connection, s: &Session, dashboard_id: i64, d: &str, t: TxType, cat: &str, amount: &str) {
    transactions::add(
        conn,
        s,
        dashboard_id,
        &TransactionForm {
            date: date(d),
            tx_type: t,
            category: cat.into(),
            amount: amount.into(),
            description: String::new(),
        },
    )
    .unwrap();
}

fn count_on(conn: &Connection, dashboard_id: i64, d: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE dashboard_id=?1 AND date=?2",
        rusqlite::params![dashboard_id, d],
        |r| r.get(0),
    )
    .unwrap()
}

#[test]
fn accepted_entries_drop_blank_and_non_positive() {
    let entries = vec![
        DayEntry::new("12.5", " Food "),
        DayEntry::new("0", "Food"),
        DayEntry::new("-3", "Food"),
        DayEntry::new("abc", "Food"),
        DayEntry::new("", "Food"),
        DayEntry::new("10", "   "),
    ];
    let rows = day::accepted_entries(TxType::Expense, date("2025-01-15"), &entries);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "Food");
    assert_eq!(rows[0].amount, "12.5".parse().unwrap());
    assert_eq!(rows[0].description, "Expense on 2025-01-15");
}

#[test]
fn accepted_entries_bound_amounts_and_trim_labels() {
    let entries = vec![
        DayEntry::new("2e1", "  Tips "),
        DayEntry::new("1e16", "Lottery"),
        DayEntry::new("1000000000000000", "Sale"),
    ];
    let rows = day::accepted_entries(TxType::Income, date("2025-01-15"), &entries);
    let labels: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(labels, vec!["Tips", "Sale"]);
    assert_eq!(rows[0].amount, "20".parse().unwrap());
}

#[test]
fn save_replaces_the_whole_day() {
    let (mut conn, s, dash) = setup();
    add(&conn, &s, dash, "2025-01-15", TxType::Expense, "Old", "99");
    add(&conn, &s, dash, "2025-01-16", TxType::Expense, "Other day", "5");

    let outcome = day::save(
        &mut conn,
        &s,
        dash,
        date("2025-01-15"),
        &[DayEntry::new("100", "Salary")],
        &[DayEntry::new("40", "Food"), DayEntry::new("", "")],
    )
    .unwrap();
    assert_eq!(outcome, DayOutcome::Saved(2));

    let loaded = day::load(&conn, &s, dash, date("2025-01-15")).unwrap();
    let mut labels: Vec<(TxType, String)> =
        loaded.iter().map(|t| (t.tx_type, t.category.clone())).collect();
    labels.sort();
    assert_eq!(
        labels,
        vec![
            (TxType::Income, "Salary".to_string()),
            (TxType::Expense, "Food".to_string())
        ]
    );
    assert!(loaded.iter().any(|t| t.description == "Income on 2025-01-15"));
    assert_eq!(count_on(&conn, dash, "2025-01-16"), 1);
}

#[test]
fn save_with_nothing_valid_clears_the_day() {
    let (mut conn, s, dash) = setup();
    add(&conn, &s, dash, "2025-01-15", TxType::Income, "Salary", "10");
    add(&conn, &s, dash, "2025-01-15", TxType::Expense, "Food", "3");

    let outcome = day::save(
        &mut conn,
        &s,
        dash,
        date("2025-01-15"),
        &[DayEntry::new("0", "Salary")],
        &[DayEntry::new("7", "")],
    )
    .unwrap();
    assert_eq!(outcome, DayOutcome::Cleared);
    assert_eq!(count_on(&conn, dash, "2025-01-15"), 0);
}

#[test]
fn save_leaves_other_dashboards_alone() {
    let (mut conn, s, main) = setup();
    let side = dashboards::create(&conn, &s, "Side").unwrap();
    add(&conn, &s, side.id, "2025-01-15", TxType::Income, "Gig", "50");

    day::save(&mut conn, &s, main, date("2025-01-15"), &[], &[]).unwrap();
    assert_eq!(count_on(&conn, side.id, "2025-01-15"), 1);
}

#[test]
fn failed_insert_rolls_back_the_delete() {
    let (mut conn, s, dash) = setup();
    add(&conn, &s, dash, "2025-01-15", TxType::Income, "Salary", "10");
    conn.execute_batch(
        "CREATE TRIGGER reject_boom BEFORE INSERT ON transactions
         WHEN NEW.category = 'Boom'
         BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
    )
    .unwrap();

    let err = day::save(
        &mut conn,
        &s,
        dash,
        date("2025-01-15"),
        &[DayEntry::new("5", "Fine"), DayEntry::new("6", "Boom")],
        &[],
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Backend(_)));

    let loaded = day::load(&conn, &s, dash, date("2025-01-15")).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].category, "Salary");
}

#[test]
fn save_requires_a_session() {
    let (mut conn, s, dash) = setup();
    add(&conn, &s, dash, "2025-01-15", TxType::Income, "Salary", "10");
    session::sign_out(&conn).unwrap();

    let matches = cli::build_cli().get_matches_from([
        "daybook", "day", "save", "--date", "2025-01-15", "--income", "0:Salary",
    ]);
    let Some(("day", day_m)) = matches.subcommand() else {
        panic!("no day subcommand");
    };
    let err = day::handle(&mut conn, day_m).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::AuthRequired(_))
    ));
    assert_eq!(count_on(&conn, dash, "2025-01-15"), 1);
}

#[test]
fn cli_save_parses_amount_category_pairs() {
    let (mut conn, s, dash) = setup();
    let matches = cli::build_cli().get_matches_from([
        "daybook",
        "day",
        "save",
        "--date",
        "2025-02-03",
        "--income",
        "1500:Salary",
        "--expense",
        "20:Food",
        "--expense",
        "4.5:Coffee",
    ]);
    if let Some(("day", day_m)) = matches.subcommand() {
        day::handle(&mut conn, day_m).unwrap();
    } else {
        panic!("no day subcommand");
    }
    let loaded = day::load(&conn, &s, dash, date("2025-02-03")).unwrap();
    assert_eq!(loaded.len(), 3);
}
