//! Ledger transaction model.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::month::MonthKey;

/// Whether a ledger entry adds to or draws from cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// One normalized ledger entry.
///
/// Immutable value object: the engine only ever reads it. `kind` is `Income`
/// exactly when `raw_amount >= 0` and `amount` is always `raw_amount.abs()`;
/// [`Transaction::from_raw`] is the constructor that upholds both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: Date,
    pub month: MonthKey,
    pub kind: TransactionKind,
    /// Magnitude, always non-negative.
    pub amount: f64,
    pub category: String,
    pub payee: Option<String>,
    /// Signed amount as it appeared in the source ledger.
    pub raw_amount: f64,
}

impl Transaction {
    /// Build a transaction from a signed ledger amount, deriving the month
    /// bucket, kind and magnitude. Blank categories fall back to
    /// `"Uncategorized"`.
    pub fn from_raw(
        date: Date,
        raw_amount: f64,
        category: impl Into<String>,
        payee: Option<String>,
    ) -> Self {
        let category = category.into();
        let category = if category.trim().is_empty() {
            "Uncategorized".to_string()
        } else {
            category
        };
        let kind = if raw_amount >= 0.0 {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        };
        Self {
            date,
            month: MonthKey::from_date(date),
            kind,
            amount: raw_amount.abs(),
            category,
            payee,
            raw_amount,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_derives_kind_and_amount() {
        let tx = Transaction::from_raw(jiff::civil::date(2024, 3, 15), -42.5, "Rent", None);
        assert_eq!(tx.kind, TransactionKind::Expense);
        assert_eq!(tx.amount, 42.5);
        assert_eq!(tx.raw_amount, -42.5);
        assert_eq!(tx.month, MonthKey::new(2024, 3));

        let tx = Transaction::from_raw(jiff::civil::date(2024, 3, 15), 100.0, "Salary", None);
        assert_eq!(tx.kind, TransactionKind::Income);
        assert_eq!(tx.amount, 100.0);
    }

    #[test]
    fn test_zero_amount_counts_as_income() {
        let tx = Transaction::from_raw(jiff::civil::date(2024, 1, 1), 0.0, "Misc", None);
        assert_eq!(tx.kind, TransactionKind::Income);
    }

    #[test]
    fn test_blank_category_defaults() {
        let tx = Transaction::from_raw(jiff::civil::date(2024, 1, 1), -5.0, "  ", None);
        assert_eq!(tx.category, "Uncategorized");
    }
}
