//! Tests for timeframe windows, KPI comparisons and trajectory signals.

use super::{expense, income, steady_ledger};
use crate::config::CashFlowMode;
use crate::kpi::{aggregate, compare_timeframe};
use crate::model::build_monthly_rollups;
use crate::month::MonthKey;
use crate::timeframe::{Timeframe, select_window};
use crate::trajectory::{Direction, SignalLight, TrajectorySignal};

#[test]
fn test_window_aggregate_recomputes_savings_rate_from_totals() {
    let transactions = vec![
        income(2024, 1, 5000.0),
        expense(2024, 1, 3000.0, "Rent"),
        income(2024, 2, 5200.0),
        expense(2024, 2, 3100.0, "Rent"),
    ];
    let rollups = build_monthly_rollups(&transactions, CashFlowMode::Total);
    let agg = aggregate(Timeframe::AllDates, select_window(&rollups, Timeframe::AllDates));

    assert_eq!(agg.month_count, 2);
    assert_eq!(agg.transaction_count, 4);
    assert_eq!(agg.revenue, 10_200.0);
    assert_eq!(agg.expenses, 6100.0);
    assert_eq!(agg.net_cash_flow, 4100.0);
    // 4100 / 10200, not the mean of 40.0 and 40.38.
    assert_eq!(agg.savings_rate, 40.2);
    assert_eq!(agg.start_month, Some(MonthKey::new(2024, 1)));
    assert_eq!(agg.end_month, Some(MonthKey::new(2024, 2)));
}

#[test]
fn test_aggregate_net_stays_consistent_in_operating_mode() {
    let transactions = vec![
        income(2024, 1, 1000.0),
        expense(2024, 1, 300.0, "Capital Distribution"),
        income(2024, 2, 1000.0),
        expense(2024, 2, 200.0, "Rent"),
    ];
    let rollups = build_monthly_rollups(&transactions, CashFlowMode::Operating);
    let agg = aggregate(Timeframe::AllDates, &rollups);

    let monthly_net_sum: f64 = rollups.iter().map(|r| r.net_cash_flow).sum();
    assert_eq!(agg.net_cash_flow, monthly_net_sum);
    // Raw expense totals still include the distribution.
    assert_eq!(agg.expenses, 500.0);
    assert_eq!(agg.net_cash_flow, 1800.0);
}

#[test]
fn test_empty_window_aggregate_is_zeroed() {
    let agg = aggregate(Timeframe::Ttm, &[]);
    assert_eq!(agg.month_count, 0);
    assert_eq!(agg.transaction_count, 0);
    assert_eq!(agg.start_month, None);
    assert_eq!(agg.end_month, None);
    assert_eq!(agg.revenue, 0.0);
    assert_eq!(agg.savings_rate, 0.0);
}

#[test]
fn test_ttm_comparison_with_two_full_years() {
    // 24 months with revenue stepping up in the second year.
    let mut transactions = Vec::new();
    for i in 0..24 {
        let m = MonthKey::new(2023, 1).add_months(i);
        let amount = if i < 12 { 4000.0 } else { 5000.0 };
        transactions.push(income(m.year(), m.month_number(), amount));
        transactions.push(expense(m.year(), m.month_number(), 2500.0, "Rent"));
    }
    let rollups = build_monthly_rollups(&transactions, CashFlowMode::Total);
    let comparison = compare_timeframe(&rollups, Timeframe::Ttm);

    assert_eq!(comparison.current.month_count, 12);
    assert_eq!(comparison.previous.month_count, 12);
    assert_eq!(comparison.revenue.current, 60_000.0);
    assert_eq!(comparison.revenue.previous, 48_000.0);
    assert_eq!(comparison.revenue.delta, 12_000.0);
    assert_eq!(comparison.revenue.percent_change, Some(25.0));
    assert_eq!(
        comparison.header.label,
        "Last 12 months through Dec 2024 vs prior 12 months"
    );
}

#[test]
fn test_ytd_comparison_uses_same_months_of_prior_year() {
    // Jan 2023 .. Mar 2024; YTD window is Jan-Mar 2024 vs Jan-Mar 2023.
    let mut transactions = Vec::new();
    for i in 0..15 {
        let m = MonthKey::new(2023, 1).add_months(i);
        transactions.push(income(m.year(), m.month_number(), 1000.0));
    }
    let rollups = build_monthly_rollups(&transactions, CashFlowMode::Total);
    let comparison = compare_timeframe(&rollups, Timeframe::Ytd);

    assert_eq!(comparison.current.month_count, 3);
    assert_eq!(comparison.previous.month_count, 3);
    assert_eq!(comparison.header.current_start, Some(MonthKey::new(2024, 1)));
    assert_eq!(comparison.header.previous_start, Some(MonthKey::new(2023, 1)));
    assert_eq!(comparison.header.previous_end, Some(MonthKey::new(2023, 3)));
    assert_eq!(
        comparison.header.label,
        "YTD through Mar 2024 vs same months 2023"
    );
}

/// A 1-month dataset cannot support any comparison: prior blocks are empty,
/// every percent change is undefined, and the trajectory stays neutral.
#[test]
fn test_single_month_dataset_is_all_neutral() {
    let rollups = build_monthly_rollups(&steady_ledger(MonthKey::new(2024, 6), 1), CashFlowMode::Total);

    let comparison = compare_timeframe(&rollups, Timeframe::Last3Months);
    assert_eq!(comparison.previous.month_count, 0);
    assert_eq!(comparison.revenue.percent_change, None);
    assert_eq!(comparison.expenses.percent_change, None);
    assert_eq!(comparison.net_cash_flow.percent_change, None);
    assert_eq!(comparison.savings_rate.percent_change, None);

    let signal = TrajectorySignal::from_comparison(&comparison);
    assert_eq!(signal.light, SignalLight::Neutral);
    assert_eq!(signal.direction, Direction::Flat);
    assert!(!signal.has_sufficient_history);
}

/// Exactly 2N months: the trailing-N previous block fills completely.
/// One month fewer and it must be empty.
#[test]
fn test_trailing_previous_block_boundary() {
    let six = build_monthly_rollups(&steady_ledger(MonthKey::new(2024, 1), 6), CashFlowMode::Total);
    let comparison = compare_timeframe(&six, Timeframe::Last3Months);
    assert_eq!(comparison.current.month_count, 3);
    assert_eq!(comparison.previous.month_count, 3);

    let five = build_monthly_rollups(&steady_ledger(MonthKey::new(2024, 1), 5), CashFlowMode::Total);
    let comparison = compare_timeframe(&five, Timeframe::Last3Months);
    assert_eq!(comparison.current.month_count, 3);
    assert_eq!(comparison.previous.month_count, 0);
    assert_eq!(comparison.revenue.percent_change, None);
}

#[test]
fn test_steady_ledger_compares_flat() {
    // 72 months so even Last36Months has a full prior block.
    let rollups = build_monthly_rollups(&steady_ledger(MonthKey::new(2019, 1), 72), CashFlowMode::Total);
    for timeframe in Timeframe::COMPARABLE {
        let comparison = compare_timeframe(&rollups, timeframe);
        assert_eq!(comparison.net_cash_flow.delta, 0.0, "{timeframe:?}");
        // Identical non-zero windows: defined, zero percent change.
        assert_eq!(comparison.revenue.percent_change, Some(0.0), "{timeframe:?}");
    }
}
