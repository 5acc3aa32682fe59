// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Editing one calendar day of a dashboard as a whole.
//!
//! Saving a day replaces it: every stored transaction for that date is
//! removed and only the valid edited entries are written back. Both steps
//! share one SQLite transaction, so a failed insert leaves the day as it was.

use crate::aggregate;
use crate::commands::{dashboards, transactions};
use crate::error::AppError;
use crate::models::{NewTransaction, Transaction, TxType};
use crate::session::{self, AppState, Session};
use crate::utils::{fmt_money, maybe_print_json, parse_date, positive_amount, pretty_table};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rusqlite::{Connection, params};

/// One editor line: the amount as typed and the chosen category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayEntry {
    pub amount: String,
    pub category: String,
}

impl DayEntry {
    pub fn new(amount: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            category: category.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOutcome {
    /// Number of transactions written back.
    Saved(usize),
    /// Nothing survived filtering; the day is now empty.
    Cleared,
}

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("save", sub)) => save_cmd(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let AppState { session, dashboard } = session::app_state(conn, "view transactions")?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let entries = load(conn, &session, dashboard.id, date)?;
    if maybe_print_json(sub.get_flag("json"), false, &entries)? {
        return Ok(());
    }
    let rows = entries
        .iter()
        .map(|t| {
            vec![
                t.tx_type.to_string(),
                t.category.clone(),
                fmt_money(&t.amount),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Type", "Category", "Amount"], rows));
    let s = aggregate::summarize(&entries);
    println!(
        "Income {}  Expense {}  Profit {}",
        fmt_money(&s.total_income),
        fmt_money(&s.total_expense),
        fmt_money(&s.net_profit)
    );
    Ok(())
}

fn save_cmd(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let AppState { session, dashboard } = session::app_state(conn, "save transactions")?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let incomes = entries_arg(sub, "income")?;
    let expenses = entries_arg(sub, "expense")?;
    match save(conn, &session, dashboard.id, date, &incomes, &expenses)? {
        DayOutcome::Saved(n) => println!("Saved {} transactions for {}", n, date),
        DayOutcome::Cleared => println!("Cleared all transactions for {}", date),
    }
    Ok(())
}

/// Reads repeated `AMOUNT:CATEGORY` values.
fn entries_arg(sub: &clap::ArgMatches, id: &str) -> Result<Vec<DayEntry>> {
    let Some(values) = sub.get_many::<String>(id) else {
        return Ok(Vec::new());
    };
    values
        .map(|v| {
            v.split_once(':')
                .map(|(amount, category)| DayEntry::new(amount, category))
                .ok_or_else(|| anyhow!("Invalid entry '{}', expected AMOUNT:CATEGORY", v))
        })
        .collect()
}

/// The stored entries for the day, used to pre-fill the editor.
pub fn load(
    conn: &Connection,
    session: &Session,
    dashboard_id: i64,
    date: NaiveDate,
) -> Result<Vec<Transaction>, AppError> {
    transactions::fetch_day(conn, session, dashboard_id, date)
}

/// Keeps entries with a valid amount and a category. Categories are
/// stored trimmed, the same as CSV imports.
pub fn accepted_entries(tx_type: TxType, date: NaiveDate, entries: &[DayEntry]) -> Vec<NewTransaction> {
    entries
        .iter()
        .filter_map(|e| {
            let category = e.category.trim();
            if category.is_empty() {
                return None;
            }
            let amount = positive_amount(&e.amount)?;
            Some(NewTransaction {
                date,
                tx_type,
                category: category.to_string(),
                amount,
                description: format!("{} on {}", tx_type.label(), date),
            })
        })
        .collect()
}

/// Replaces the whole day with the accepted income and expense entries.
pub fn save(
    conn: &mut Connection,
    session: &Session,
    dashboard_id: i64,
    date: NaiveDate,
    incomes: &[DayEntry],
    expenses: &[DayEntry],
) -> Result<DayOutcome, AppError> {
    dashboards::get(conn, session, dashboard_id)?;
    let mut rows = accepted_entries(TxType::Income, date, incomes);
    rows.extend(accepted_entries(TxType::Expense, date, expenses));

    let tx = conn.transaction()?;
    let removed = tx.execute(
        "DELETE FROM transactions WHERE owner_id=?1 AND dashboard_id=?2 AND date=?3",
        params![session.owner_id(), dashboard_id, date],
    )?;
    let inserted = transactions::insert_all(&tx, session, dashboard_id, &rows)?;
    tx.commit()?;

    tracing::info!(
        "replaced {} on dashboard {}: removed {}, inserted {}",
        date,
        dashboard_id,
        removed,
        inserted
    );
    if inserted == 0 {
        Ok(DayOutcome::Cleared)
    } else {
        Ok(DayOutcome::Saved(inserted))
    }
}
