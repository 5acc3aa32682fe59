// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{self, CURRENT_DASHBOARD_KEY};
use crate::error::AppError;
use crate::models::Dashboard;
use crate::session::{self, Session};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};

pub const DEFAULT_DASHBOARD: &str = "Main";

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", _)) => {
            let session = session::require(conn, "view dashboards")?;
            let selected = current(conn, &session)?;
            let data = list(conn, &session)?
                .into_iter()
                .map(|d| {
                    let mark = if d.id == selected.id { "*" } else { "" };
                    vec![mark.to_string(), d.name, d.created_at]
                })
                .collect();
            println!("{}", pretty_table(&["", "Dashboard", "Created"], data));
        }
        Some(("add", sub)) => {
            let session = session::require(conn, "create dashboards")?;
            let d = create(conn, &session, sub.get_one::<String>("name").unwrap())?;
            println!("Created dashboard '{}'", d.name);
        }
        Some(("rename", sub)) => {
            let session = session::require(conn, "rename dashboards")?;
            let from = find_by_name(conn, &session, sub.get_one::<String>("from").unwrap())?;
            let to = sub.get_one::<String>("to").unwrap();
            rename(conn, &session, from.id, to)?;
            println!("Renamed dashboard '{}' to '{}'", from.name, to.trim());
        }
        Some(("rm", sub)) => {
            let session = session::require(conn, "delete dashboards")?;
            let d = find_by_name(conn, &session, sub.get_one::<String>("name").unwrap())?;
            delete(conn, &session, d.id)?;
            println!(
                "Deleted dashboard '{}' with its transactions and categories",
                d.name
            );
        }
        Some(("use", sub)) => {
            let session = session::require(conn, "switch dashboards")?;
            let d = find_by_name(conn, &session, sub.get_one::<String>("name").unwrap())?;
            select(conn, &session, d.id)?;
            println!("Now using dashboard '{}'", d.name);
        }
        _ => {}
    }
    Ok(())
}

const SELECT_COLUMNS: &str = "SELECT id, name, owner_id, created_at FROM finance_dashboards";

/// All dashboards of the owner in creation order. Creates "Main" when none exist.
pub fn list(conn: &Connection, session: &Session) -> Result<Vec<Dashboard>, AppError> {
    let found = list_raw(conn, session)?;
    if found.is_empty() {
        return Ok(vec![ensure_default(conn, session)?]);
    }
    Ok(found)
}

fn list_raw(conn: &Connection, session: &Session) -> Result<Vec<Dashboard>, AppError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} WHERE owner_id=?1 ORDER BY created_at, id"
    ))?;
    let rows = stmt.query_map(params![session.owner_id()], row_to_dashboard)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Returns the first dashboard, creating the default one if the owner has none.
pub fn ensure_default(conn: &Connection, session: &Session) -> Result<Dashboard, AppError> {
    if let Some(first) = list_raw(conn, session)?.into_iter().next() {
        return Ok(first);
    }
    create(conn, session, DEFAULT_DASHBOARD)
}

pub fn create(conn: &Connection, session: &Session, name: &str) -> Result<Dashboard, AppError> {
    let name = required_name(name)?;
    conn.execute(
        "INSERT INTO finance_dashboards(owner_id, name) VALUES (?1, ?2)",
        params![session.owner_id(), name],
    )
    .map_err(AppError::on_unique("Dashboard"))?;
    let id = conn.last_insert_rowid();
    tracing::info!("created dashboard {} '{}'", id, name);
    get(conn, session, id)
}

pub fn get(conn: &Connection, session: &Session, id: i64) -> Result<Dashboard, AppError> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id=?1 AND owner_id=?2"),
        params![id, session.owner_id()],
        row_to_dashboard,
    )
    .optional()?
    .ok_or(AppError::NotFound("Dashboard"))
}

pub fn find_by_name(conn: &Connection, session: &Session, name: &str) -> Result<Dashboard, AppError> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE name=?1 AND owner_id=?2"),
        params![name.trim(), session.owner_id()],
        row_to_dashboard,
    )
    .optional()?
    .ok_or(AppError::NotFound("Dashboard"))
}

pub fn rename(conn: &Connection, session: &Session, id: i64, new_name: &str) -> Result<(), AppError> {
    let new_name = required_name(new_name)?;
    let changed = conn
        .execute(
            "UPDATE finance_dashboards SET name=?1 WHERE id=?2 AND owner_id=?3",
            params![new_name, id, session.owner_id()],
        )
        .map_err(AppError::on_unique("Dashboard"))?;
    if changed == 0 {
        return Err(AppError::NotFound("Dashboard"));
    }
    tracing::info!("renamed dashboard {} to '{}'", id, new_name);
    Ok(())
}

/// Deletes the dashboard after its transactions and categories, atomically.
///
/// If it was the selected dashboard the selection moves to the first one left.
pub fn delete(conn: &mut Connection, session: &Session, id: i64) -> Result<(), AppError> {
    let owner = session.owner_id();
    let tx = conn.transaction()?;
    let removed_tx = tx.execute(
        "DELETE FROM transactions WHERE dashboard_id=?1 AND owner_id=?2",
        params![id, owner],
    )?;
    let removed_cat = tx.execute(
        "DELETE FROM categories WHERE dashboard_id=?1 AND owner_id=?2",
        params![id, owner],
    )?;
    let removed = tx.execute(
        "DELETE FROM finance_dashboards WHERE id=?1 AND owner_id=?2",
        params![id, owner],
    )?;
    if removed == 0 {
        // dropping `tx` rolls back
        return Err(AppError::NotFound("Dashboard"));
    }
    tx.commit()?;
    tracing::info!(
        "deleted dashboard {} ({} transactions, {} categories)",
        id,
        removed_tx,
        removed_cat
    );

    if selected_id(conn)? == Some(id) {
        db::clear_setting(conn, CURRENT_DASHBOARD_KEY)?;
        if let Some(next) = list_raw(conn, session)?.into_iter().next() {
            select(conn, session, next.id)?;
        }
    }
    Ok(())
}

/// The selected dashboard, falling back to the first one (creating "Main" if needed).
pub fn current(conn: &Connection, session: &Session) -> Result<Dashboard, AppError> {
    if let Some(id) = selected_id(conn)? {
        match get(conn, session, id) {
            Ok(d) => return Ok(d),
            Err(AppError::NotFound(_)) => {
                tracing::debug!("selected dashboard {} is gone, falling back", id);
            }
            Err(e) => return Err(e),
        }
    }
    let first = ensure_default(conn, session)?;
    select(conn, session, first.id)?;
    Ok(first)
}

pub fn select(conn: &Connection, session: &Session, id: i64) -> Result<(), AppError> {
    let d = get(conn, session, id)?;
    db::set_setting(conn, CURRENT_DASHBOARD_KEY, &d.id.to_string())?;
    tracing::debug!("selected dashboard {} '{}'", d.id, d.name);
    Ok(())
}

fn selected_id(conn: &Connection) -> Result<Option<i64>, AppError> {
    Ok(db::get_setting(conn, CURRENT_DASHBOARD_KEY)?.and_then(|v| v.parse().ok()))
}

fn required_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Dashboard name is required".into()));
    }
    Ok(name)
}

fn row_to_dashboard(r: &rusqlite::Row<'_>) -> rusqlite::Result<Dashboard> {
    Ok(Dashboard {
        id: r.get(0)?,
        name: r.get(1)?,
        owner_id: r.get(2)?,
        created_at: r.get(3)?,
    })
}
