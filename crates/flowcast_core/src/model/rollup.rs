//! Monthly rollups: per-month revenue/expense/net/savings-rate buckets.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::CashFlowMode;
use crate::model::transaction::{Transaction, TransactionKind};
use crate::month::MonthKey;
use crate::{EPSILON, round2};

/// One month's aggregated cash-flow picture. Monetary fields and the savings
/// rate are rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRollup {
    pub month: MonthKey,
    pub revenue: f64,
    /// Raw expense total; the cash-flow mode only affects `net_cash_flow`.
    pub expenses: f64,
    pub net_cash_flow: f64,
    /// `net_cash_flow / revenue * 100`, 0 when the month had no revenue.
    pub savings_rate: f64,
    pub transaction_count: usize,
}

#[derive(Default)]
struct MonthAccumulator {
    revenue: f64,
    expenses: f64,
    capital_distribution: f64,
    transaction_count: usize,
}

/// Aggregate transactions into per-month rollups, sorted ascending by month.
///
/// Single pass keyed by month. The capital-distribution subtotal never leaves
/// this function — it only feeds the Operating-mode net. Zero transactions
/// produce an empty vec.
pub fn build_monthly_rollups(
    transactions: &[Transaction],
    mode: CashFlowMode,
) -> Vec<MonthlyRollup> {
    let mut buckets: FxHashMap<MonthKey, MonthAccumulator> = FxHashMap::default();

    for tx in transactions {
        let acc = buckets.entry(tx.month).or_default();
        acc.transaction_count += 1;
        match tx.kind {
            TransactionKind::Income => acc.revenue += tx.amount,
            TransactionKind::Expense => {
                acc.expenses += tx.amount;
                if is_capital_distribution(&tx.category) {
                    acc.capital_distribution += tx.amount;
                }
            }
        }
    }

    let mut rollups: Vec<MonthlyRollup> = buckets
        .into_iter()
        .map(|(month, acc)| {
            let effective_expenses = match mode {
                CashFlowMode::Operating => acc.expenses - acc.capital_distribution,
                CashFlowMode::Total => acc.expenses,
            };
            let net = acc.revenue - effective_expenses;
            let savings_rate = if acc.revenue > EPSILON {
                net / acc.revenue * 100.0
            } else {
                0.0
            };
            MonthlyRollup {
                month,
                revenue: round2(acc.revenue),
                expenses: round2(acc.expenses),
                net_cash_flow: round2(net),
                savings_rate: round2(savings_rate),
                transaction_count: acc.transaction_count,
            }
        })
        .collect();

    rollups.sort_by_key(|r| r.month);
    rollups
}

const CAPITAL_DISTRIBUTION: &str = "capital distribution";

/// Exact capital-distribution match: case- and punctuation-insensitive, and
/// any `:`-separated segment counts on its own. Broader synonym matching is
/// deliberately out of scope.
fn is_capital_distribution(category: &str) -> bool {
    normalize_category(category) == CAPITAL_DISTRIBUTION
        || category
            .split(':')
            .any(|segment| normalize_category(segment) == CAPITAL_DISTRIBUTION)
}

/// Lowercase, punctuation mapped to spaces, whitespace collapsed, trimmed.
fn normalize_category(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_space = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category("  Capital   Distribution "), "capital distribution");
        assert_eq!(normalize_category("capital-distribution"), "capital distribution");
        assert_eq!(normalize_category("CAPITAL_DISTRIBUTION"), "capital distribution");
        assert_eq!(normalize_category(""), "");
    }

    #[test]
    fn test_capital_distribution_matching() {
        assert!(is_capital_distribution("Capital Distribution"));
        assert!(is_capital_distribution("capital-distribution"));
        assert!(is_capital_distribution("Owner Draws:Capital Distribution"));
        assert!(is_capital_distribution("Capital Distribution:Q2"));

        assert!(!is_capital_distribution("Capital Distributions"));
        assert!(!is_capital_distribution("Distribution"));
        assert!(!is_capital_distribution("Capital"));
        assert!(!is_capital_distribution("Rent"));
    }
}
