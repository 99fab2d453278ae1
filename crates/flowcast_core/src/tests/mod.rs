//! Integration tests for the dashboard engine.
//!
//! Tests are organized by surface:
//! - `rollups` - monthly aggregation and cash-flow modes
//! - `kpi_windows` - timeframe windows, comparisons and trajectory
//! - `forecast` - trend fitting, seasonality and projections
//! - `dashboard` - full model assembly over synthetic ledgers
//! - `scenario` - what-if projections

mod dashboard;
mod kpi_windows;

use jiff::civil::date;

use crate::model::Transaction;
use crate::month::MonthKey;

/// Income on the 1st of the month.
pub(crate) fn income(year: i16, month: i8, amount: f64) -> Transaction {
    Transaction::from_raw(date(year, month, 1), amount, "Income", Some("Acme Corp".to_string()))
}

/// Expense on the 10th of the month, no payee.
pub(crate) fn expense(year: i16, month: i8, amount: f64, category: &str) -> Transaction {
    Transaction::from_raw(date(year, month, 10), -amount, category, None)
}

pub(crate) fn expense_with_payee(
    year: i16,
    month: i8,
    amount: f64,
    category: &str,
    payee: &str,
) -> Transaction {
    Transaction::from_raw(date(year, month, 10), -amount, category, Some(payee.to_string()))
}

/// `months` consecutive months of steady 5000 income / 3000 rent, starting at
/// `start`.
pub(crate) fn steady_ledger(start: MonthKey, months: usize) -> Vec<Transaction> {
    let mut transactions = Vec::with_capacity(months * 2);
    for i in 0..months {
        let m = start.add_months(i as i32);
        transactions.push(income(m.year(), m.month_number(), 5000.0));
        transactions.push(expense(m.year(), m.month_number(), 3000.0, "Rent"));
    }
    transactions
}
