// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate;
use crate::commands::{categories::type_arg, dashboards};
use crate::error::AppError;
use crate::models::{NewTransaction, Transaction, TxType};
use crate::session::{self, AppState, Session};
use crate::utils::{fmt_money, maybe_print_json, parse_date, period_arg, positive_amount, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add_cmd(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let session = session::require(conn, "delete transactions")?;
            let id = *sub.get_one::<i64>("id").unwrap();
            delete(conn, &session, id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let AppState { session, dashboard } = session::app_state(conn, "add transactions")?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let form = TransactionForm {
        date,
        tx_type: type_arg(sub)?,
        category: sub.get_one::<String>("category").cloned().unwrap_or_default(),
        amount: sub.get_one::<String>("amount").cloned().unwrap_or_default(),
        description: sub.get_one::<String>("description").cloned().unwrap_or_default(),
    };
    let t = add(conn, &session, dashboard.id, &form)?;
    println!(
        "Recorded {} {} on {} in '{}' ({})",
        t.tx_type, t.amount, t.date, t.category, dashboard.name
    );
    Ok(())
}

/// Raw values of the single-transaction entry form.
#[derive(Debug, Clone)]
pub struct TransactionForm {
    pub date: NaiveDate,
    pub tx_type: TxType,
    pub category: String,
    pub amount: String,
    pub description: String,
}

pub fn add(
    conn: &Connection,
    session: &Session,
    dashboard_id: i64,
    form: &TransactionForm,
) -> Result<Transaction, AppError> {
    let category = form.category.trim();
    if category.is_empty() || form.amount.trim().is_empty() {
        return Err(AppError::Validation(
            "Please fill in all required fields".into(),
        ));
    }
    let amount = positive_amount(&form.amount).ok_or_else(|| {
        AppError::Validation(format!("Invalid amount '{}'", form.amount.trim()))
    })?;
    dashboards::get(conn, session, dashboard_id)?;

    let new = NewTransaction {
        date: form.date,
        tx_type: form.tx_type,
        category: category.to_string(),
        amount,
        description: form.description.trim().to_string(),
    };
    let id = insert_one(conn, session, dashboard_id, &new)?;
    tracing::info!("added transaction {} to dashboard {}", id, dashboard_id);
    Ok(Transaction {
        id,
        date: new.date,
        tx_type: new.tx_type,
        category: new.category,
        amount: new.amount,
        description: new.description,
        owner_id: session.owner_id(),
        dashboard_id,
    })
}

/// Inserts every row through `conn`. Callers wrap this in a SQLite
/// transaction when the batch has to land as a whole.
pub fn insert_all(
    conn: &Connection,
    session: &Session,
    dashboard_id: i64,
    rows: &[NewTransaction],
) -> Result<usize, AppError> {
    for row in rows {
        insert_one(conn, session, dashboard_id, row)?;
    }
    Ok(rows.len())
}

fn insert_one(
    conn: &Connection,
    session: &Session,
    dashboard_id: i64,
    row: &NewTransaction,
) -> Result<i64, AppError> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO transactions(owner_id, dashboard_id, date, type, category, amount, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    stmt.execute(params![
        session.owner_id(),
        dashboard_id,
        row.date,
        row.tx_type,
        row.category,
        row.amount.to_string(),
        row.description
    ])?;
    Ok(conn.last_insert_rowid())
}

const SELECT_COLUMNS: &str = "SELECT id, date, type, category, amount, description, owner_id, dashboard_id FROM transactions";

/// Every transaction of the dashboard, newest first.
pub fn fetch(conn: &Connection, session: &Session, dashboard_id: i64) -> Result<Vec<Transaction>, AppError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} WHERE owner_id=?1 AND dashboard_id=?2 ORDER BY date DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![session.owner_id(), dashboard_id], row_to_transaction)?;
    collect(rows)
}

/// The transactions recorded on one calendar day, in insertion order.
pub fn fetch_day(
    conn: &Connection,
    session: &Session,
    dashboard_id: i64,
    date: NaiveDate,
) -> Result<Vec<Transaction>, AppError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} WHERE owner_id=?1 AND dashboard_id=?2 AND date=?3 ORDER BY id"
    ))?;
    let rows = stmt.query_map(
        params![session.owner_id(), dashboard_id, date],
        row_to_transaction,
    )?;
    collect(rows)
}

pub fn delete(conn: &Connection, session: &Session, id: i64) -> Result<(), AppError> {
    let removed = conn.execute(
        "DELETE FROM transactions WHERE id=?1 AND owner_id=?2",
        params![id, session.owner_id()],
    )?;
    if removed == 0 {
        return Err(AppError::NotFound("Transaction"));
    }
    tracing::info!("deleted transaction {}", id);
    Ok(())
}

fn collect(
    rows: impl Iterator<Item = rusqlite::Result<Transaction>>,
) -> Result<Vec<Transaction>, AppError> {
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub(crate) fn row_to_transaction(r: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    let amount_raw: String = r.get(4)?;
    let amount = amount_raw
        .parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    Ok(Transaction {
        id: r.get(0)?,
        date: r.get(1)?,
        tx_type: r.get(2)?,
        category: r.get(3)?,
        amount,
        description: r.get(5)?,
        owner_id: r.get(6)?,
        dashboard_id: r.get(7)?,
    })
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.tx_type.to_string(),
                    t.category.clone(),
                    fmt_money(&t.amount),
                    t.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Category", "Amount", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

/// Applies the `tx list` filters to the selected dashboard's transactions.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let AppState { session, dashboard } = session::app_state(conn, "view transactions")?;
    let all = fetch(conn, &session, dashboard.id)?;
    let mut data = aggregate::filter_by_period(&all, period_arg(sub)?);

    let tx_type = match sub.get_one::<String>("type") {
        Some(_) => Some(type_arg(sub)?),
        None => None,
    };
    if let Some(cat) = sub.get_one::<String>("category") {
        let tx_types = match tx_type {
            Some(t) => vec![t],
            None => vec![TxType::Income, TxType::Expense],
        };
        let mut matched = Vec::new();
        for t in tx_types {
            matched.extend(aggregate::filter_by_category(&data, cat.trim(), t));
        }
        matched.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        data = matched;
    } else if let Some(t) = tx_type {
        data.retain(|row| row.tx_type == t);
    }

    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}
