//! Named month-window selection over sorted rollups.
//!
//! Every window is a contiguous run of the ascending rollup list, so
//! selection returns subslices rather than copies.

use serde::{Deserialize, Serialize};

use crate::model::MonthlyRollup;
use crate::month::MonthKey;

/// A named rule for selecting a contiguous subsequence of months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    ThisMonth,
    LastMonth,
    Last3Months,
    /// Trailing twelve months.
    Ttm,
    Last24Months,
    Last36Months,
    Ytd,
    AllDates,
}

impl Timeframe {
    /// Every selectable timeframe, in dashboard display order.
    pub const ALL: [Timeframe; 8] = [
        Timeframe::ThisMonth,
        Timeframe::LastMonth,
        Timeframe::Last3Months,
        Timeframe::Ttm,
        Timeframe::Last24Months,
        Timeframe::Last36Months,
        Timeframe::Ytd,
        Timeframe::AllDates,
    ];

    /// Timeframes with a well-defined symmetric prior window.
    pub const COMPARABLE: [Timeframe; 6] = [
        Timeframe::ThisMonth,
        Timeframe::Last3Months,
        Timeframe::Ttm,
        Timeframe::Last24Months,
        Timeframe::Last36Months,
        Timeframe::Ytd,
    ];

    /// Trailing window length, when this timeframe is a trailing-N rule.
    pub fn trailing_months(self) -> Option<usize> {
        match self {
            Timeframe::ThisMonth => Some(1),
            Timeframe::Last3Months => Some(3),
            Timeframe::Ttm => Some(12),
            Timeframe::Last24Months => Some(24),
            Timeframe::Last36Months => Some(36),
            Timeframe::LastMonth | Timeframe::Ytd | Timeframe::AllDates => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Timeframe::ThisMonth => "This Month",
            Timeframe::LastMonth => "Last Month",
            Timeframe::Last3Months => "Last 3 Months",
            Timeframe::Ttm => "Last 12 Months",
            Timeframe::Last24Months => "Last 24 Months",
            Timeframe::Last36Months => "Last 36 Months",
            Timeframe::Ytd => "Year to Date",
            Timeframe::AllDates => "All Time",
        }
    }
}

/// Current/previous window pair for a comparable timeframe.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonBlocks<'a> {
    pub current: &'a [MonthlyRollup],
    pub previous: &'a [MonthlyRollup],
}

/// Extract the window of months a timeframe names. Empty input yields an
/// empty slice for every timeframe.
pub fn select_window(rollups: &[MonthlyRollup], timeframe: Timeframe) -> &[MonthlyRollup] {
    match timeframe {
        Timeframe::ThisMonth => tail(rollups, 1),
        Timeframe::LastMonth => {
            if rollups.len() < 2 {
                &[]
            } else {
                &rollups[rollups.len() - 2..rollups.len() - 1]
            }
        }
        Timeframe::Last3Months => tail(rollups, 3),
        Timeframe::Ttm => tail(rollups, 12),
        Timeframe::Last24Months => tail(rollups, 24),
        Timeframe::Last36Months => tail(rollups, 36),
        Timeframe::Ytd => ytd_window(rollups),
        Timeframe::AllDates => rollups,
    }
}

/// Pair a timeframe's window with its symmetric prior window.
///
/// Trailing-N previous blocks are all-or-nothing: when fewer than `2N` months
/// exist the previous block is empty rather than partially filled, so a thin
/// baseline never masquerades as a full one. Non-comparable timeframes get an
/// empty previous block.
pub fn select_comparison_blocks(
    rollups: &[MonthlyRollup],
    timeframe: Timeframe,
) -> ComparisonBlocks<'_> {
    if let Some(n) = timeframe.trailing_months() {
        let len = rollups.len();
        if len >= 2 * n {
            return ComparisonBlocks {
                current: &rollups[len - n..],
                previous: &rollups[len - 2 * n..len - n],
            };
        }
        return ComparisonBlocks {
            current: tail(rollups, n),
            previous: &[],
        };
    }
    match timeframe {
        Timeframe::Ytd => ComparisonBlocks {
            current: ytd_window(rollups),
            previous: prior_ytd_window(rollups),
        },
        _ => ComparisonBlocks {
            current: select_window(rollups, timeframe),
            previous: &[],
        },
    }
}

fn tail(rollups: &[MonthlyRollup], n: usize) -> &[MonthlyRollup] {
    &rollups[rollups.len().saturating_sub(n)..]
}

/// Months of the latest rollup's calendar year, up to and including it.
fn ytd_window(rollups: &[MonthlyRollup]) -> &[MonthlyRollup] {
    let Some(latest) = rollups.last().map(|r| r.month) else {
        return &[];
    };
    let start = rollups.partition_point(|r| r.month < MonthKey::new(latest.year(), 1));
    &rollups[start..]
}

/// The prior year's January through the latest month's number. Located by
/// binary search over the sorted keys, so gaps in the data shrink the block
/// rather than shifting it.
fn prior_ytd_window(rollups: &[MonthlyRollup]) -> &[MonthlyRollup] {
    let Some(latest) = rollups.last().map(|r| r.month) else {
        return &[];
    };
    let prior_year = latest.year() - 1;
    let start = rollups.partition_point(|r| r.month < MonthKey::new(prior_year, 1));
    let end = rollups
        .partition_point(|r| r.month <= MonthKey::new(prior_year, latest.month_number()));
    &rollups[start..end]
}
