// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::codec;
use crate::commands::{dashboards, transactions};
use crate::error::AppError;
use crate::models::{NewTransaction, TxType};
use crate::session::{self, AppState, Session};
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub tx_type: TxType,
    pub count: usize,
}

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let AppState { session, dashboard } = session::app_state(conn, "import transactions")?;
    let file_name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid CSV path {}", path))?;
    let text = std::fs::read_to_string(path).with_context(|| format!("Open CSV {}", path))?;

    let summary = import_csv(conn, &session, dashboard.id, file_name, &text)?;
    println!(
        "Successfully imported {} {} transactions into '{}'",
        summary.count,
        summary.tx_type.label().to_lowercase(),
        dashboard.name
    );
    Ok(())
}

/// Imports a CSV upload into the dashboard. All rows land or none do.
pub fn import_csv(
    conn: &mut Connection,
    session: &Session,
    dashboard_id: i64,
    file_name: &str,
    text: &str,
) -> Result<ImportSummary, AppError> {
    let tx_type = codec::type_from_file_name(file_name)?;
    let parsed = codec::parse_csv(text)?;
    tracing::debug!("parsed {} rows from '{}'", parsed.len(), file_name);
    dashboards::get(conn, session, dashboard_id)?;

    let rows: Vec<NewTransaction> = parsed
        .into_iter()
        .map(|row| {
            let description = if row.description.is_empty() {
                format!("{} on {}", tx_type, row.date)
            } else {
                row.description
            };
            NewTransaction {
                date: row.date,
                tx_type,
                category: row.category,
                amount: row.amount,
                description,
            }
        })
        .collect();

    let tx = conn.transaction()?;
    let count = transactions::insert_all(&tx, session, dashboard_id, &rows)?;
    tx.commit()?;
    tracing::info!(
        "imported {} {} rows from '{}' into dashboard {}",
        count,
        tx_type,
        file_name,
        dashboard_id
    );
    Ok(ImportSummary { tx_type, count })
}
