// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Totals and filters over an in-memory set of transactions.
//!
//! Nothing here touches the database; callers fetch a dashboard's
//! transactions once and slice them as the view requires.

use crate::models::{Period, Summary, Transaction, TxType};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub fn sum_by_type(transactions: &[Transaction], tx_type: TxType) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.tx_type == tx_type)
        .map(|t| t.amount)
        .sum()
}

/// Per-category totals for one type. Categories without a matching
/// transaction are absent rather than zero.
pub fn sum_by_category(transactions: &[Transaction], tx_type: TxType) -> BTreeMap<String, Decimal> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in transactions.iter().filter(|t| t.tx_type == tx_type) {
        *totals.entry(t.category.clone()).or_insert(Decimal::ZERO) += t.amount;
    }
    totals
}

pub fn net_profit(transactions: &[Transaction]) -> Decimal {
    sum_by_type(transactions, TxType::Income) - sum_by_type(transactions, TxType::Expense)
}

pub fn summarize(transactions: &[Transaction]) -> Summary {
    let total_income = sum_by_type(transactions, TxType::Income);
    let total_expense = sum_by_type(transactions, TxType::Expense);
    Summary {
        total_income,
        total_expense,
        net_profit: total_income - total_expense,
    }
}

pub fn filter_by_period(transactions: &[Transaction], period: Period) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| period.contains(t.date))
        .cloned()
        .collect()
}

/// Transactions behind one chart slice, newest first.
pub fn filter_by_category(
    transactions: &[Transaction],
    category: &str,
    tx_type: TxType,
) -> Vec<Transaction> {
    let mut out: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.tx_type == tx_type && t.category == category)
        .cloned()
        .collect();
    out.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub category: String,
    pub amount: Decimal,
    /// Share of the type total, one decimal place.
    pub percent: Decimal,
}

/// Chart data: category totals with their share, largest first.
pub fn distribution(transactions: &[Transaction], tx_type: TxType) -> Vec<Slice> {
    let totals = sum_by_category(transactions, tx_type);
    let grand: Decimal = totals.values().copied().sum();
    let mut slices: Vec<Slice> = totals
        .into_iter()
        .map(|(category, amount)| {
            let percent = if grand.is_zero() {
                Decimal::ZERO
            } else {
                (amount / grand * Decimal::ONE_HUNDRED).round_dp(1)
            };
            Slice {
                category,
                amount,
                percent,
            }
        })
        .collect();
    slices.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.category.cmp(&b.category)));
    slices
}

/// Cash flow keyed by `(year, month)`.
pub fn monthly_totals(transactions: &[Transaction]) -> BTreeMap<(i32, u32), Summary> {
    let mut map: BTreeMap<(i32, u32), Summary> = BTreeMap::new();
    for t in transactions {
        let entry = map.entry((t.date.year(), t.date.month())).or_default();
        add_to(entry, t);
    }
    map
}

/// One entry per calendar day of the month, empty days included.
pub fn daily_totals(
    transactions: &[Transaction],
    year: i32,
    month: u32,
) -> Vec<(NaiveDate, Summary)> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let mut days: BTreeMap<NaiveDate, Summary> = first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|d| (d, Summary::default()))
        .collect();
    for t in transactions {
        if let Some(entry) = days.get_mut(&t.date) {
            add_to(entry, t);
        }
    }
    days.into_iter().collect()
}

/// Distinct years with data, newest first.
pub fn available_years(transactions: &[Transaction]) -> Vec<i32> {
    let years: BTreeSet<i32> = transactions.iter().map(|t| t.date.year()).collect();
    years.into_iter().rev().collect()
}

fn add_to(summary: &mut Summary, t: &Transaction) {
    match t.tx_type {
        TxType::Income => summary.total_income += t.amount,
        TxType::Expense => summary.total_expense += t.amount,
    }
    summary.net_profit = summary.total_income - summary.total_expense;
}
