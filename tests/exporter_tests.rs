// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use daybook::commands::transactions::{self, TransactionForm};
use daybook::commands::{dashboards, exporter};
use daybook::error::AppError;
use daybook::models::TxType;
use daybook::session::{self, Session};
use daybook::{cli, db};
use rusqlite::Connection;
use tempfile::tempdir;

fn setup() -> (Connection, Session) {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    let s = session::sign_in(&conn, "alice@example.com").unwrap();
    let dash = dashboards::current(&conn, &s).unwrap();
    for (d, t, cat, amount, desc) in [
        ("2025-01-15", TxType::Income, "Salary", "5000", "Monthly pay"),
        ("2025-01-02", TxType::Income, "Gifts, misc", "40.50", "Gran"),
        ("2025-01-20", TxType::Expense, "Rent", "1200.50", "Jan rent"),
        ("2025-02-01", TxType::Income, "Salary", "5100", "Feb pay"),
    ] {
        transactions::add(
            &conn,
            &s,
            dash.id,
            &TransactionForm {
                date: NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap(),
                tx_type: t,
                category: cat.into(),
                amount: amount.into(),
                description: desc.into(),
            },
        )
        .unwrap();
    }
    (conn, s)
}

fn run_export(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["daybook", "export"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(conn, export_m)
}

#[test]
fn exports_one_type_oldest_first() {
    let (conn, _s) = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("incomes.csv");
    run_export(
        &conn,
        &["transactions", "--type", "INCOME", "--month", "2025-01", "--out", out.to_str().unwrap()],
    )
    .unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        text,
        "Date,Category,Amount,Description\n\
         2025-01-02,\"Gifts, misc\",40.50,\"Gran\"\n\
         2025-01-15,Salary,5000,\"Monthly pay\""
    );
}

#[test]
fn export_without_month_takes_everything() {
    let (conn, _s) = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("all.csv");
    run_export(
        &conn,
        &["transactions", "--type", "income", "--out", out.to_str().unwrap()],
    )
    .unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert!(text.ends_with("2025-02-01,Salary,5100,\"Feb pay\""));
}

#[test]
fn nothing_to_export_writes_no_file() {
    let (conn, _s) = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("expenses.csv");
    let err = run_export(
        &conn,
        &["transactions", "--type", "expense", "--month", "2025-02", "--out", out.to_str().unwrap()],
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::NothingToExport(_))
    ));
    assert_eq!(err.to_string(), "No expense transactions to export");
    assert!(!out.exists());
}

#[test]
fn month_report_has_sections_and_totals() {
    let (conn, _s) = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("report.csv");
    run_export(
        &conn,
        &["report", "--month", "2025-01", "--out", out.to_str().unwrap()],
    )
    .unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        text,
        "Type,Date,Category,Amount,Description\n\
         \n\
         --- INCOMES ---\n\
         INCOME,2025-01-02,\"Gifts, misc\",40.50,\"Gran\"\n\
         INCOME,2025-01-15,Salary,5000,\"Monthly pay\"\n\
         \n\
         --- EXPENSES ---\n\
         EXPENSE,2025-01-20,Rent,1200.50,\"Jan rent\"\n\
         \n\
         --- SUMMARY ---\n\
         Total Income,,,5040.50,\n\
         Total Expense,,,1200.50,\n\
         Net,,,3840.00,"
    );
}

#[test]
fn empty_month_report_is_refused() {
    let (conn, _s) = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("report.csv");
    let err = run_export(
        &conn,
        &["report", "--month", "2024-12", "--out", out.to_str().unwrap()],
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::NothingToExport(_))
    ));
    assert!(!out.exists());
}

#[test]
fn export_requires_a_session() {
    let (conn, _s) = setup();
    session::sign_out(&conn).unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("x.csv");
    let err = run_export(
        &conn,
        &["transactions", "--type", "income", "--out", out.to_str().unwrap()],
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::AuthRequired(_))
    ));
}
