//! Window aggregation and period-over-period comparison.

use serde::{Deserialize, Serialize};

use crate::model::MonthlyRollup;
use crate::month::MonthKey;
use crate::timeframe::{Timeframe, select_comparison_blocks};
use crate::{EPSILON, percent_change, round2};

/// Totals for one timeframe window.
///
/// `savings_rate` is recomputed from the window's summed totals, never an
/// average of the monthly rates. An empty window yields zeroed totals with
/// `None` months and `month_count == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiAggregate {
    pub timeframe: Timeframe,
    pub start_month: Option<MonthKey>,
    pub end_month: Option<MonthKey>,
    pub month_count: usize,
    pub transaction_count: usize,
    pub revenue: f64,
    pub expenses: f64,
    pub net_cash_flow: f64,
    pub savings_rate: f64,
}

/// Sum a window of rollups into one aggregate.
pub fn aggregate(timeframe: Timeframe, window: &[MonthlyRollup]) -> KpiAggregate {
    let revenue: f64 = window.iter().map(|r| r.revenue).sum();
    let expenses: f64 = window.iter().map(|r| r.expenses).sum();
    // Sum the monthly nets rather than recomputing revenue - expenses, so an
    // Operating-mode window stays consistent with its rollups. In Total mode
    // the two are identical.
    let net: f64 = window.iter().map(|r| r.net_cash_flow).sum();
    let savings_rate = if revenue > EPSILON {
        net / revenue * 100.0
    } else {
        0.0
    };
    KpiAggregate {
        timeframe,
        start_month: window.first().map(|r| r.month),
        end_month: window.last().map(|r| r.month),
        month_count: window.len(),
        transaction_count: window.iter().map(|r| r.transaction_count).sum(),
        revenue: round2(revenue),
        expenses: round2(expenses),
        net_cash_flow: round2(net),
        savings_rate: round2(savings_rate),
    }
}

/// One metric's current/previous pairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub current: f64,
    pub previous: f64,
    pub delta: f64,
    /// `None` when the prior value is too close to zero for a meaningful
    /// relative change.
    pub percent_change: Option<f64>,
}

impl MetricComparison {
    fn between(current: f64, previous: f64) -> Self {
        Self {
            current,
            previous,
            delta: round2(current - previous),
            percent_change: percent_change(current, previous),
        }
    }
}

/// Structured range data behind a comparison's header line. The start/end
/// pairs are the contract; `label` is a convenience rendering of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonHeader {
    pub current_start: Option<MonthKey>,
    pub current_end: Option<MonthKey>,
    pub previous_start: Option<MonthKey>,
    pub previous_end: Option<MonthKey>,
    pub label: String,
}

/// A current window paired with its symmetric prior window, per metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiTimeframeComparison {
    pub timeframe: Timeframe,
    pub current: KpiAggregate,
    pub previous: KpiAggregate,
    pub revenue: MetricComparison,
    pub expenses: MetricComparison,
    pub net_cash_flow: MetricComparison,
    pub savings_rate: MetricComparison,
    pub header: ComparisonHeader,
}

/// Compare two window aggregates metric by metric.
pub fn compare(current: KpiAggregate, previous: KpiAggregate) -> KpiTimeframeComparison {
    let header = ComparisonHeader {
        current_start: current.start_month,
        current_end: current.end_month,
        previous_start: previous.start_month,
        previous_end: previous.end_month,
        label: header_label(current.timeframe, &current, &previous),
    };
    KpiTimeframeComparison {
        timeframe: current.timeframe,
        revenue: MetricComparison::between(current.revenue, previous.revenue),
        expenses: MetricComparison::between(current.expenses, previous.expenses),
        net_cash_flow: MetricComparison::between(current.net_cash_flow, previous.net_cash_flow),
        savings_rate: MetricComparison::between(current.savings_rate, previous.savings_rate),
        header,
        current,
        previous,
    }
}

/// Select a timeframe's comparison blocks and compare their aggregates.
pub fn compare_timeframe(
    rollups: &[MonthlyRollup],
    timeframe: Timeframe,
) -> KpiTimeframeComparison {
    let blocks = select_comparison_blocks(rollups, timeframe);
    compare(
        aggregate(timeframe, blocks.current),
        aggregate(timeframe, blocks.previous),
    )
}

fn range_label(start: MonthKey, end: MonthKey) -> String {
    if start == end {
        end.label()
    } else {
        format!("{} – {}", start.label(), end.label())
    }
}

fn header_label(
    timeframe: Timeframe,
    current: &KpiAggregate,
    previous: &KpiAggregate,
) -> String {
    let (Some(cur_start), Some(cur_end)) = (current.start_month, current.end_month) else {
        return "No data".to_string();
    };
    let current_range = range_label(cur_start, cur_end);
    if previous.month_count == 0 {
        return format!("{current_range} (no prior period)");
    }
    match timeframe {
        Timeframe::ThisMonth => match previous.end_month {
            Some(prev) => format!("{current_range} vs {}", prev.label()),
            None => current_range,
        },
        Timeframe::Ytd => format!(
            "YTD through {} vs same months {}",
            cur_end.label(),
            cur_end.year() - 1
        ),
        Timeframe::Last3Months => {
            format!("Last 3 months through {} vs prior 3 months", cur_end.label())
        }
        Timeframe::Ttm => {
            format!("Last 12 months through {} vs prior 12 months", cur_end.label())
        }
        Timeframe::Last24Months => {
            format!("Last 24 months through {} vs prior 24 months", cur_end.label())
        }
        Timeframe::Last36Months => {
            format!("Last 36 months through {} vs prior 36 months", cur_end.label())
        }
        // LastMonth / AllDates only reach here via direct calls; render the
        // plain range pair.
        Timeframe::LastMonth | Timeframe::AllDates => {
            match (previous.start_month, previous.end_month) {
                (Some(prev_start), Some(prev_end)) => {
                    format!("{current_range} vs {}", range_label(prev_start, prev_end))
                }
                _ => current_range,
            }
        }
    }
}
