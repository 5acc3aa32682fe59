// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate;
use crate::codec;
use crate::commands::{categories::type_arg, transactions};
use crate::error::AppError;
use crate::models::Period;
use crate::session::{self, AppState};
use crate::utils::{parse_month, period_arg};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use std::path::PathBuf;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        Some(("report", sub)) => export_report(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let AppState { session, dashboard } = session::app_state(conn, "export transactions")?;
    let tx_type = type_arg(sub)?;
    let all = transactions::fetch(conn, &session, dashboard.id)?;
    let mut selected = aggregate::filter_by_period(&all, period_arg(sub)?);
    // oldest first reads naturally in a spreadsheet
    selected.reverse();

    let text = codec::to_csv(&selected, tx_type).map_err(AppError::from)?;
    let out = out_path(sub, || {
        codec::export_file_name(tx_type, chrono::Local::now().date_naive())
    });
    std::fs::write(&out, text)?;
    tracing::info!("exported {} transactions to {}", tx_type, out.display());
    println!("Exported transactions to {}", out.display());
    Ok(())
}

fn export_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let AppState { session, dashboard } = session::app_state(conn, "export transactions")?;
    let Period::Month { year, month } = parse_month(sub.get_one::<String>("month").unwrap())?
    else {
        return Err(anyhow!("A month is required for the report"));
    };
    let mut all = transactions::fetch(conn, &session, dashboard.id)?;
    all.reverse();

    let text = codec::period_report(&all, year, month).map_err(AppError::from)?;
    let default_name = codec::report_file_name(year, month)?;
    let out = out_path(sub, || default_name);
    std::fs::write(&out, text)?;
    tracing::info!("exported {}-{:02} report to {}", year, month, out.display());
    println!("Exported report to {}", out.display());
    Ok(())
}

fn out_path(sub: &clap::ArgMatches, default_name: impl FnOnce() -> String) -> PathBuf {
    sub.get_one::<String>("out")
        .map(|s| PathBuf::from(s.trim()))
        .unwrap_or_else(|| PathBuf::from(default_name()))
}
