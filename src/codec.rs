// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Reading uploaded transaction CSVs and rendering CSV downloads.
//!
//! Import files carry `Date,Category,Amount[,Description]` rows. The
//! transaction type is not part of the rows; it comes from the file name
//! (see [`type_from_file_name`]).

use crate::aggregate;
use crate::error::CsvError;
use crate::models::{Period, Transaction, TxType};
use crate::utils::positive_amount;
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::fmt::Write as _;

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern compiles"));

const EXPORT_HEADER: &str = "Date,Category,Amount,Description";
const REPORT_HEADER: &str = "Type,Date,Category,Amount,Description";

/// One data row of an imported CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub date: NaiveDate,
    pub category: String,
    pub amount: Decimal,
    pub description: String,
}

/// Parses CSV text with a header row followed by data rows.
///
/// Blank lines are ignored. Line numbers in errors are 1-based and count
/// only non-blank lines, so the first data row is line 2.
pub fn parse_csv(text: &str) -> Result<Vec<ParsedRow>, CsvError> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.len() < 2 {
        return Err(CsvError::EmptyInput);
    }

    let mut rows = Vec::with_capacity(lines.len() - 1);
    for (idx, line) in lines.iter().enumerate().skip(1) {
        let line_no = idx + 1;
        let fields = tokenize(line).ok_or(CsvError::MalformedRow { line: line_no })?;
        if fields.len() < 3 || fields[1].is_empty() {
            return Err(CsvError::MalformedRow { line: line_no });
        }

        let amount =
            positive_amount(&fields[2]).ok_or(CsvError::InvalidAmount { line: line_no })?;

        if !DATE_RE.is_match(&fields[0]) {
            return Err(CsvError::InvalidDate { line: line_no });
        }
        let date = NaiveDate::parse_from_str(&fields[0], "%Y-%m-%d")
            .map_err(|_| CsvError::InvalidDate { line: line_no })?;

        rows.push(ParsedRow {
            date,
            category: fields[1].clone(),
            amount,
            description: fields.get(3).cloned().unwrap_or_default(),
        });
    }
    Ok(rows)
}

/// Splits one line into trimmed fields, honouring double quotes.
fn tokenize(line: &str) -> Option<Vec<String>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(line.as_bytes());
    let record = rdr.records().next()?.ok()?;
    Some(record.iter().map(unquote).collect())
}

/// `csv` leaves quotes in place when whitespace precedes them.
fn unquote(field: &str) -> String {
    let field = field.trim();
    let inner = field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field);
    inner.trim().to_string()
}

/// Decides the import type from the uploaded file name.
pub fn type_from_file_name(name: &str) -> Result<TxType, CsvError> {
    if !name.ends_with(".csv") {
        return Err(CsvError::NotCsv);
    }
    let lower = name.to_lowercase();
    if lower.contains("income") {
        Ok(TxType::Income)
    } else if lower.contains("expense") {
        Ok(TxType::Expense)
    } else {
        Err(CsvError::AmbiguousType)
    }
}

/// Renders the transactions of one type as a downloadable CSV.
pub fn to_csv(transactions: &[Transaction], tx_type: TxType) -> Result<String, CsvError> {
    let mut out = String::from(EXPORT_HEADER);
    let mut written = 0usize;
    for t in transactions.iter().filter(|t| t.tx_type == tx_type) {
        out.push('\n');
        push_row(&mut out, None, t);
        written += 1;
    }
    if written == 0 {
        return Err(CsvError::NothingToExport(format!(
            "{} transactions",
            tx_type.label().to_lowercase()
        )));
    }
    Ok(out)
}

/// Renders the month report: incomes, expenses and a totals section.
pub fn period_report(
    transactions: &[Transaction],
    year: i32,
    month: u32,
) -> Result<String, CsvError> {
    let in_period = aggregate::filter_by_period(transactions, Period::Month { year, month });
    if in_period.is_empty() {
        return Err(CsvError::NothingToExport(
            "transactions for the selected period".to_string(),
        ));
    }
    let summary = aggregate::summarize(&in_period);

    let mut out = String::from(REPORT_HEADER);
    for (tx_type, title) in [
        (TxType::Income, "--- INCOMES ---"),
        (TxType::Expense, "--- EXPENSES ---"),
    ] {
        out.push_str("\n\n");
        out.push_str(title);
        for t in in_period.iter().filter(|t| t.tx_type == tx_type) {
            out.push('\n');
            push_row(&mut out, Some(tx_type), t);
        }
    }
    out.push_str("\n\n--- SUMMARY ---");
    let _ = write!(out, "\nTotal Income,,,{},", summary.total_income);
    let _ = write!(out, "\nTotal Expense,,,{},", summary.total_expense);
    let _ = write!(out, "\nNet,,,{},", summary.net_profit);
    Ok(out)
}

fn push_row(out: &mut String, type_column: Option<TxType>, t: &Transaction) {
    if let Some(tx_type) = type_column {
        out.push_str(tx_type.as_str());
        out.push(',');
    }
    let _ = write!(
        out,
        "{},{},{},{}",
        t.date,
        quote_if_needed(&t.category),
        t.amount,
        quote(&t.description)
    );
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn quote_if_needed(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        quote(s)
    } else {
        s.to_string()
    }
}

/// `incomes_2025-01-31.csv` / `expenses_2025-01-31.csv`
pub fn export_file_name(tx_type: TxType, today: NaiveDate) -> String {
    format!("{}_{}.csv", tx_type.plural(), today)
}

/// `finance_January_2025.csv`
pub fn report_file_name(year: i32, month: u32) -> anyhow::Result<String> {
    Ok(format!(
        "finance_{}_{}.csv",
        crate::utils::month_name(month)?,
        year
    ))
}
