// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate;
use crate::commands::{categories::type_arg, transactions};
use crate::models::{Period, Transaction};
use crate::session::{self, AppState};
use crate::utils::{fmt_money, maybe_print_json, parse_month, period_arg, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let Some((name, sub)) = m.subcommand() else {
        return Ok(());
    };
    let AppState { session, dashboard } = session::app_state(conn, "view reports")?;
    let all = transactions::fetch(conn, &session, dashboard.id)?;
    match name {
        "summary" => summary(&all, sub)?,
        "by-category" => by_category(&all, sub)?,
        "category" => category(&all, sub)?,
        "cashflow" => cashflow(&all, sub)?,
        "days" => days(&all, sub)?,
        "years" => {
            let data = aggregate::available_years(&all)
                .into_iter()
                .map(|y| vec![y.to_string()])
                .collect();
            println!("{}", pretty_table(&["Year"], data));
        }
        _ => {}
    }
    Ok(())
}

fn summary(all: &[Transaction], sub: &clap::ArgMatches) -> Result<()> {
    let selected = aggregate::filter_by_period(all, period_arg(sub)?);
    let s = aggregate::summarize(&selected);
    if !maybe_print_json(sub.get_flag("json"), false, &s)? {
        println!(
            "{}",
            pretty_table(
                &["Total Income", "Total Expense", "Net Profit"],
                vec![vec![
                    fmt_money(&s.total_income),
                    fmt_money(&s.total_expense),
                    fmt_money(&s.net_profit),
                ]],
            )
        );
    }
    Ok(())
}

fn by_category(all: &[Transaction], sub: &clap::ArgMatches) -> Result<()> {
    let tx_type = type_arg(sub)?;
    let selected = aggregate::filter_by_period(all, period_arg(sub)?);
    let slices = aggregate::distribution(&selected, tx_type);
    if !maybe_print_json(sub.get_flag("json"), false, &slices)? {
        let data = slices
            .iter()
            .map(|s| {
                vec![
                    s.category.clone(),
                    fmt_money(&s.amount),
                    format!("{}%", s.percent),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Amount", "Share"], data));
    }
    Ok(())
}

fn category(all: &[Transaction], sub: &clap::ArgMatches) -> Result<()> {
    let tx_type = type_arg(sub)?;
    let name = sub.get_one::<String>("name").unwrap().trim();
    let selected = aggregate::filter_by_period(all, period_arg(sub)?);
    let rows = aggregate::filter_by_category(&selected, name, tx_type);
    if rows.is_empty() {
        println!("No transactions found");
        return Ok(());
    }
    let total = aggregate::sum_by_type(&rows, tx_type);
    let data = rows
        .iter()
        .map(|t| vec![t.date.format("%b %-d").to_string(), fmt_money(&t.amount)])
        .collect();
    println!("{}", pretty_table(&["Date", "Amount"], data));
    println!("{} total: {}", name, fmt_money(&total));
    Ok(())
}

fn cashflow(all: &[Transaction], sub: &clap::ArgMatches) -> Result<()> {
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);
    let data = aggregate::monthly_totals(all)
        .iter()
        .rev()
        .take(months)
        .map(|((y, m), s)| {
            vec![
                format!("{}-{:02}", y, m),
                fmt_money(&s.total_income),
                fmt_money(&s.total_expense),
                fmt_money(&s.net_profit),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expense", "Net"], data)
    );
    Ok(())
}

fn days(all: &[Transaction], sub: &clap::ArgMatches) -> Result<()> {
    let Period::Month { year, month } = parse_month(sub.get_one::<String>("month").unwrap())?
    else {
        return Err(anyhow!("A month is required"));
    };
    let data = aggregate::daily_totals(all, year, month)
        .into_iter()
        .map(|(d, s)| {
            vec![
                d.to_string(),
                fmt_money(&s.total_income),
                fmt_money(&s.total_expense),
                fmt_money(&s.net_profit),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Day", "Income", "Expense", "Profit"], data)
    );
    Ok(())
}
