//! Per-month category and payee breakdowns: slices, movers, opportunities.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::{MonthlyRollup, Transaction};
use crate::month::MonthKey;
use crate::{EPSILON, percent_change, round2};

/// Categories shown in the expense breakdown.
pub const EXPENSE_SLICE_CAP: usize = 7;
/// Payees shown in the top-payee list.
pub const TOP_PAYEE_CAP: usize = 8;
/// Categories shown in the movers list.
pub const MOVER_CAP: usize = 8;
/// Opportunities surfaced per month.
pub const OPPORTUNITY_CAP: usize = 8;
/// Overrun below this (in currency units) is noise, not an opportunity.
pub const OPPORTUNITY_MIN_OVERRUN: f64 = 50.0;
/// Prior months averaged into a category's baseline.
pub const OPPORTUNITY_BASELINE_MONTHS: usize = 3;
/// Fallback suggestion: trim total spending by this rate.
pub const FALLBACK_TRIM_RATE: f64 = 0.03;
/// Bucket for transactions with no payee.
pub const UNKNOWN_PAYEE: &str = "Unknown";

/// One category's share of the shown expense breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSlice {
    pub category: String,
    pub amount: f64,
    /// Share of the shown slices' own sum, so the breakdown always totals
    /// 100 across what is displayed.
    pub share_pct: f64,
}

/// One payee's expense total for a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayeeSpend {
    pub payee: String,
    pub amount: f64,
    pub transaction_count: usize,
}

/// A category's month-over-month expense change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMover {
    pub category: String,
    pub current: f64,
    pub previous: f64,
    pub delta: f64,
    pub percent_change: Option<f64>,
}

/// A candidate overspend/saving action for the latest month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub title: String,
    pub savings: f64,
    pub hint: String,
    /// Category behind the overrun; `None` for the generic fallback.
    pub category: Option<String>,
}

/// Expense total per category within one month.
pub fn category_totals(transactions: &[Transaction], month: MonthKey) -> FxHashMap<String, f64> {
    let mut totals: FxHashMap<String, f64> = FxHashMap::default();
    for tx in transactions {
        if tx.month == month && tx.is_expense() {
            *totals.entry(tx.category.clone()).or_insert(0.0) += tx.amount;
        }
    }
    totals
}

/// Top categories of `month` by expense total, shares normalized to the shown
/// slices' own sum.
pub fn expense_slices(transactions: &[Transaction], month: MonthKey) -> Vec<ExpenseSlice> {
    let mut entries: Vec<(String, f64)> = category_totals(transactions, month).into_iter().collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(EXPENSE_SLICE_CAP);

    let shown_total: f64 = entries.iter().map(|(_, amount)| amount).sum();
    if shown_total <= EPSILON {
        return Vec::new();
    }
    entries
        .into_iter()
        .map(|(category, amount)| ExpenseSlice {
            category,
            amount: round2(amount),
            share_pct: round2(amount / shown_total * 100.0),
        })
        .collect()
}

/// Top payees of `month` by expense total; missing payees bucket under
/// [`UNKNOWN_PAYEE`].
pub fn top_payees(transactions: &[Transaction], month: MonthKey) -> Vec<PayeeSpend> {
    let mut totals: FxHashMap<String, (f64, usize)> = FxHashMap::default();
    for tx in transactions {
        if tx.month == month && tx.is_expense() {
            let payee = tx
                .payee
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .unwrap_or(UNKNOWN_PAYEE);
            let entry = totals.entry(payee.to_string()).or_insert((0.0, 0));
            entry.0 += tx.amount;
            entry.1 += 1;
        }
    }
    let mut payees: Vec<PayeeSpend> = totals
        .into_iter()
        .map(|(payee, (amount, transaction_count))| PayeeSpend {
            payee,
            amount: round2(amount),
            transaction_count,
        })
        .collect();
    payees.sort_by(|a, b| b.amount.total_cmp(&a.amount).then_with(|| a.payee.cmp(&b.payee)));
    payees.truncate(TOP_PAYEE_CAP);
    payees
}

/// Categories whose expense total moved most between `previous` and `month`,
/// by absolute delta.
pub fn category_movers(
    transactions: &[Transaction],
    month: MonthKey,
    previous: Option<MonthKey>,
) -> Vec<CategoryMover> {
    let current_totals = category_totals(transactions, month);
    let previous_totals = previous
        .map(|m| category_totals(transactions, m))
        .unwrap_or_default();

    let mut categories: Vec<&String> = current_totals.keys().chain(previous_totals.keys()).collect();
    categories.sort();
    categories.dedup();

    let mut movers: Vec<CategoryMover> = categories
        .into_iter()
        .map(|category| {
            let current = current_totals.get(category).copied().unwrap_or(0.0);
            let prev = previous_totals.get(category).copied().unwrap_or(0.0);
            CategoryMover {
                category: category.clone(),
                current: round2(current),
                previous: round2(prev),
                delta: round2(current - prev),
                percent_change: percent_change(current, prev),
            }
        })
        .collect();
    movers.sort_by(|a, b| {
        b.delta
            .abs()
            .total_cmp(&a.delta.abs())
            .then_with(|| a.category.cmp(&b.category))
    });
    movers.truncate(MOVER_CAP);
    movers
}

/// Categories running ahead of their own recent baseline in the latest month.
///
/// Baseline is the mean of a category's totals over the up-to-3 rollup months
/// strictly before the latest one; a month where the category is absent
/// counts as zero. When nothing clears the overrun threshold (or there is no
/// prior month at all), a single generic trim suggestion takes its place.
pub fn opportunities(transactions: &[Transaction], rollups: &[MonthlyRollup]) -> Vec<Opportunity> {
    let Some(latest) = rollups.last() else {
        return Vec::new();
    };

    let current_totals = category_totals(transactions, latest.month);
    let prior_months: Vec<MonthKey> = rollups[..rollups.len() - 1]
        .iter()
        .rev()
        .take(OPPORTUNITY_BASELINE_MONTHS)
        .map(|r| r.month)
        .collect();

    let mut candidates: Vec<Opportunity> = Vec::new();
    if !prior_months.is_empty() {
        let mut prior_sums: FxHashMap<String, f64> = FxHashMap::default();
        for month in &prior_months {
            for (category, amount) in category_totals(transactions, *month) {
                *prior_sums.entry(category).or_insert(0.0) += amount;
            }
        }
        for (category, &current) in &current_totals {
            let baseline = prior_sums.get(category).copied().unwrap_or(0.0)
                / prior_months.len() as f64;
            let overrun = current - baseline;
            if overrun > OPPORTUNITY_MIN_OVERRUN {
                candidates.push(Opportunity {
                    title: format!("Rein in {category}"),
                    savings: round2(overrun),
                    hint: format!(
                        "{category} ran {overrun:.2} above its recent monthly average of \
                         {baseline:.2}."
                    ),
                    category: Some(category.clone()),
                });
            }
        }
        candidates.sort_by(|a, b| {
            b.savings
                .total_cmp(&a.savings)
                .then_with(|| a.title.cmp(&b.title))
        });
        candidates.truncate(OPPORTUNITY_CAP);
    }

    if candidates.is_empty() {
        candidates.push(Opportunity {
            title: "Set a small reduction target".to_string(),
            savings: round2(FALLBACK_TRIM_RATE * latest.expenses),
            hint: "No single category stands out against its baseline; trimming total spending \
                   by 3% is a realistic starting point."
                .to_string(),
            category: None,
        });
    }
    candidates
}
