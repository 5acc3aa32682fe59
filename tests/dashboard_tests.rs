// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use daybook::commands::transactions::TransactionForm;
use daybook::commands::{categories, dashboards, profiles, transactions};
use daybook::db;
use daybook::error::AppError;
use daybook::models::TxType;
use daybook::session::{self, Session};
use rusqlite::{Connection, params};

fn setup() -> (Connection, Session) {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    let s = session::sign_in(&conn, "alice@example.com").unwrap();
    (conn, s)
}

fn form(cat: &str, amount: &str) -> TransactionForm {
    TransactionForm {
        date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        tx_type: TxType::Expense,
        category: cat.into(),
        amount: amount.into(),
        description: "note".into(),
    }
}

fn count(conn: &Connection, table: &str, dashboard_id: i64) -> i64 {
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {} WHERE dashboard_id=?1", table),
        params![dashboard_id],
        |r| r.get(0),
    )
    .unwrap()
}

#[test]
fn first_sign_in_creates_profile_and_main_dashboard() {
    let (conn, s) = setup();
    let p = profiles::get(&conn, &s).unwrap();
    assert_eq!(p.email, "alice@example.com");
    assert_eq!(p.username, "alice");

    let again = session::sign_in(&conn, "alice@example.com").unwrap();
    assert_eq!(again.owner_id(), s.owner_id());
    let names: Vec<String> = dashboards::list(&conn, &s)
        .unwrap()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, vec!["Main".to_string()]);
}

#[test]
fn sign_in_rejects_bad_email() {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    for email in ["", "alice", "@example.com", "alice@"] {
        assert!(matches!(
            session::sign_in(&conn, email),
            Err(AppError::Validation(_))
        ));
    }
    assert!(session::current(&conn).unwrap().is_none());
}

#[test]
fn sign_out_requires_new_sign_in() {
    let (conn, _s) = setup();
    session::sign_out(&conn).unwrap();
    let err = session::require(&conn, "save transactions").unwrap_err();
    assert!(matches!(err, AppError::AuthRequired(_)));
    assert_eq!(
        err.to_string(),
        "You must be logged in to save transactions"
    );
}

#[test]
fn dashboard_names_are_unique_per_owner() {
    let (conn, alice) = setup();
    let err = dashboards::create(&conn, &alice, "Main").unwrap_err();
    assert!(matches!(err, AppError::Duplicate("Dashboard")));
    assert_eq!(err.to_string(), "Dashboard already exists");

    let bob = session::sign_in(&conn, "bob@example.com").unwrap();
    let bob_main = dashboards::find_by_name(&conn, &bob, "Main").unwrap();
    assert_eq!(bob_main.owner_id, bob.owner_id());

    dashboards::create(&conn, &alice, "Travel").unwrap();
    dashboards::create(&conn, &bob, "Travel").unwrap();
}

#[test]
fn dashboard_rename_and_validation() {
    let (conn, s) = setup();
    let travel = dashboards::create(&conn, &s, "  Travel  ").unwrap();
    assert_eq!(travel.name, "Travel");
    assert!(matches!(
        dashboards::create(&conn, &s, "   "),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        dashboards::rename(&conn, &s, travel.id, "Main"),
        Err(AppError::Duplicate(_))
    ));
    dashboards::rename(&conn, &s, travel.id, "Trips").unwrap();
    assert_eq!(dashboards::get(&conn, &s, travel.id).unwrap().name, "Trips");
}

#[test]
fn other_owners_cannot_see_dashboards() {
    let (conn, alice) = setup();
    let travel = dashboards::create(&conn, &alice, "Travel").unwrap();
    let bob = session::sign_in(&conn, "bob@example.com").unwrap();
    assert!(matches!(
        dashboards::get(&conn, &bob, travel.id),
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        dashboards::rename(&conn, &bob, travel.id, "Mine"),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn deleting_dashboard_cascades_and_moves_selection() {
    let (mut conn, s) = setup();
    let main = dashboards::current(&conn, &s).unwrap();
    let travel = dashboards::create(&conn, &s, "Travel").unwrap();
    dashboards::select(&conn, &s, travel.id).unwrap();

    categories::add(&conn, &s, travel.id, TxType::Expense, "Hotels").unwrap();
    transactions::add(&conn, &s, travel.id, &form("Hotels", "150")).unwrap();
    transactions::add(&conn, &s, main.id, &form("Rent", "900")).unwrap();

    dashboards::delete(&mut conn, &s, travel.id).unwrap();

    assert_eq!(count(&conn, "transactions", travel.id), 0);
    assert_eq!(count(&conn, "categories", travel.id), 0);
    assert_eq!(count(&conn, "transactions", main.id), 1);
    assert!(matches!(
        dashboards::get(&conn, &s, travel.id),
        Err(AppError::NotFound(_))
    ));
    assert_eq!(dashboards::current(&conn, &s).unwrap().id, main.id);
}

#[test]
fn deleting_last_dashboard_recreates_main_on_next_use() {
    let (mut conn, s) = setup();
    let main = dashboards::current(&conn, &s).unwrap();
    dashboards::delete(&mut conn, &s, main.id).unwrap();
    let again = dashboards::current(&conn, &s).unwrap();
    assert_eq!(again.name, "Main");
    assert_ne!(again.id, main.id);
}

#[test]
fn category_names_unique_per_type() {
    let (conn, s) = setup();
    let main = dashboards::current(&conn, &s).unwrap();
    categories::add(&conn, &s, main.id, TxType::Expense, "Rent").unwrap();
    assert!(matches!(
        categories::add(&conn, &s, main.id, TxType::Expense, "Rent"),
        Err(AppError::Duplicate("Category"))
    ));
    categories::add(&conn, &s, main.id, TxType::Income, "Rent").unwrap();

    let side = dashboards::create(&conn, &s, "Side").unwrap();
    categories::add(&conn, &s, side.id, TxType::Expense, "Rent").unwrap();

    categories::add(&conn, &s, main.id, TxType::Expense, "Food").unwrap();
    let names: Vec<String> = categories::list(&conn, &s, main.id, TxType::Expense)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Food".to_string(), "Rent".to_string()]);
}

#[test]
fn renaming_category_keeps_transaction_labels() {
    let (conn, s) = setup();
    let main = dashboards::current(&conn, &s).unwrap();
    let rent = categories::add(&conn, &s, main.id, TxType::Expense, "Rent").unwrap();
    transactions::add(&conn, &s, main.id, &form("Rent", "900")).unwrap();

    categories::rename(&conn, &s, rent.id, "Housing").unwrap();

    let found = categories::find(&conn, &s, main.id, TxType::Expense, "Housing").unwrap();
    assert_eq!(found.id, rent.id);
    let txs = transactions::fetch(&conn, &s, main.id).unwrap();
    assert_eq!(txs[0].category, "Rent");
}

#[test]
fn category_delete_and_missing() {
    let (conn, s) = setup();
    let main = dashboards::current(&conn, &s).unwrap();
    let food = categories::add(&conn, &s, main.id, TxType::Expense, "Food").unwrap();
    categories::delete(&conn, &s, food.id).unwrap();
    assert!(matches!(
        categories::delete(&conn, &s, food.id),
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        categories::add(&conn, &s, main.id, TxType::Expense, " "),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn profile_rename_requires_a_name() {
    let (conn, s) = setup();
    assert!(matches!(
        profiles::rename(&conn, &s, "  "),
        Err(AppError::Validation(_))
    ));
    profiles::rename(&conn, &s, "Ali").unwrap();
    assert_eq!(profiles::get(&conn, &s).unwrap().username, "Ali");
}
