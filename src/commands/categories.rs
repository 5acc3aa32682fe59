// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::dashboards;
use crate::error::AppError;
use crate::models::{Category, TxType};
use crate::session::{self, AppState, Session};
use crate::utils::pretty_table;
use anyhow::{Result, anyhow};
use rusqlite::{Connection, OptionalExtension, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let AppState { session, dashboard } = session::app_state(conn, "add categories")?;
            let c = add(conn, &session, dashboard.id, type_arg(sub)?, name_arg(sub, "name"))?;
            println!("Added {} category '{}'", c.tx_type, c.name);
        }
        Some(("list", sub)) => {
            let AppState { session, dashboard } = session::app_state(conn, "view categories")?;
            let data = list(conn, &session, dashboard.id, type_arg(sub)?)?
                .into_iter()
                .map(|c| vec![c.name])
                .collect();
            println!("{}", pretty_table(&["Category"], data));
        }
        Some(("rename", sub)) => {
            let AppState { session, dashboard } = session::app_state(conn, "rename categories")?;
            let tx_type = type_arg(sub)?;
            let from = find(conn, &session, dashboard.id, tx_type, name_arg(sub, "from"))?;
            let to = name_arg(sub, "to");
            rename(conn, &session, from.id, to)?;
            println!("Renamed category '{}' to '{}'", from.name, to.trim());
        }
        Some(("rm", sub)) => {
            let AppState { session, dashboard } = session::app_state(conn, "delete categories")?;
            let c = find(conn, &session, dashboard.id, type_arg(sub)?, name_arg(sub, "name"))?;
            delete(conn, &session, c.id)?;
            println!("Removed category '{}'", c.name);
        }
        _ => {}
    }
    Ok(())
}

pub(crate) fn type_arg(sub: &clap::ArgMatches) -> Result<TxType> {
    sub.get_one::<String>("type")
        .unwrap()
        .parse::<TxType>()
        .map_err(|e| anyhow!(e))
}

fn name_arg<'a>(sub: &'a clap::ArgMatches, id: &str) -> &'a str {
    sub.get_one::<String>(id).map(String::as_str).unwrap_or("")
}

const SELECT_COLUMNS: &str = "SELECT id, name, type, owner_id, dashboard_id FROM categories";

pub fn list(
    conn: &Connection,
    session: &Session,
    dashboard_id: i64,
    tx_type: TxType,
) -> Result<Vec<Category>, AppError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} WHERE owner_id=?1 AND dashboard_id=?2 AND type=?3 ORDER BY name"
    ))?;
    let rows = stmt.query_map(
        params![session.owner_id(), dashboard_id, tx_type],
        row_to_category,
    )?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn add(
    conn: &Connection,
    session: &Session,
    dashboard_id: i64,
    tx_type: TxType,
    name: &str,
) -> Result<Category, AppError> {
    let name = required_name(name)?;
    dashboards::get(conn, session, dashboard_id)?;
    conn.execute(
        "INSERT INTO categories(owner_id, dashboard_id, type, name) VALUES (?1, ?2, ?3, ?4)",
        params![session.owner_id(), dashboard_id, tx_type, name],
    )
    .map_err(AppError::on_unique("Category"))?;
    tracing::info!("added {} category '{}' to dashboard {}", tx_type, name, dashboard_id);
    Ok(Category {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        tx_type,
        owner_id: session.owner_id(),
        dashboard_id,
    })
}

pub fn find(
    conn: &Connection,
    session: &Session,
    dashboard_id: i64,
    tx_type: TxType,
    name: &str,
) -> Result<Category, AppError> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE owner_id=?1 AND dashboard_id=?2 AND type=?3 AND name=?4"),
        params![session.owner_id(), dashboard_id, tx_type, name.trim()],
        row_to_category,
    )
    .optional()?
    .ok_or(AppError::NotFound("Category"))
}

/// Renames the category only. Transactions keep the label they were saved with.
pub fn rename(conn: &Connection, session: &Session, id: i64, new_name: &str) -> Result<(), AppError> {
    let new_name = required_name(new_name)?;
    let changed = conn
        .execute(
            "UPDATE categories SET name=?1 WHERE id=?2 AND owner_id=?3",
            params![new_name, id, session.owner_id()],
        )
        .map_err(AppError::on_unique("Category"))?;
    if changed == 0 {
        return Err(AppError::NotFound("Category"));
    }
    tracing::info!("renamed category {} to '{}'", id, new_name);
    Ok(())
}

pub fn delete(conn: &Connection, session: &Session, id: i64) -> Result<(), AppError> {
    let removed = conn.execute(
        "DELETE FROM categories WHERE id=?1 AND owner_id=?2",
        params![id, session.owner_id()],
    )?;
    if removed == 0 {
        return Err(AppError::NotFound("Category"));
    }
    tracing::info!("deleted category {}", id);
    Ok(())
}

fn required_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Category name is required".into()));
    }
    Ok(name)
}

fn row_to_category(r: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        name: r.get(1)?,
        tx_type: r.get(2)?,
        owner_id: r.get(3)?,
        dashboard_id: r.get(4)?,
    })
}
