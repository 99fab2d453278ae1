//! Tests for full dashboard model assembly.

use super::{expense, expense_with_payee, income, steady_ledger};
use crate::config::{CashFlowMode, DashboardConfig};
use crate::dashboard::build_dashboard;
use crate::model::{KpiMetric, Transaction};
use crate::month::MonthKey;
use crate::timeframe::Timeframe;
use crate::trajectory::{Direction, SignalLight};

/// A 26-month ledger with growth, a December expense bump, mixed categories
/// and payees.
fn rich_ledger() -> Vec<Transaction> {
    let mut transactions = Vec::new();
    for i in 0..26 {
        let m = MonthKey::new(2022, 6).add_months(i);
        let (year, month) = (m.year(), m.month_number());
        transactions.push(income(year, month, 6000.0 + 50.0 * i as f64));
        transactions.push(expense_with_payee(year, month, 2000.0, "Rent", "Landlord LLC"));
        transactions.push(expense_with_payee(year, month, 600.0, "Groceries", "Grocer"));
        transactions.push(expense(year, month, 150.0, "Utilities"));
        if month == 12 {
            transactions.push(expense_with_payee(year, month, 900.0, "Gifts", "Gift Shop"));
        }
    }
    transactions
}

#[test]
fn test_model_shape() {
    let model = build_dashboard(&rich_ledger(), &DashboardConfig::default());

    assert_eq!(model.rollups.len(), 26);
    assert_eq!(model.kpi_aggregates.len(), 8);
    assert_eq!(model.kpi_comparisons.len(), 6);
    assert_eq!(model.kpi_cards.len(), 4);
    assert_eq!(model.trend_points.len(), 26);
    assert_eq!(model.latest_month, Some(MonthKey::new(2024, 7)));
    assert_eq!(model.previous_month, Some(MonthKey::new(2024, 6)));
    assert_eq!(
        model.forecast.points.len(),
        26 + model.forecast.projected_months
    );
    assert!(!model.summary.is_empty());
    assert!(model.dig_here.is_some());
}

#[test]
fn test_model_is_deterministic_and_order_independent() {
    let ledger = rich_ledger();
    let config = DashboardConfig::default();
    let first = build_dashboard(&ledger, &config);
    let second = build_dashboard(&ledger, &config);
    assert_eq!(first, second);

    let mut reversed = ledger.clone();
    reversed.reverse();
    let from_reversed = build_dashboard(&reversed, &config);
    assert_eq!(first, from_reversed);
}

#[test]
fn test_trajectory_on_growing_ledger() {
    let model = build_dashboard(&rich_ledger(), &DashboardConfig::default());
    // Revenue grows 50/month while expenses are level: every horizon is up.
    assert_eq!(model.trajectory.monthly_trend.light, SignalLight::Green);
    assert_eq!(model.trajectory.short_term_trend.light, SignalLight::Green);
    assert_eq!(model.trajectory.long_term_trend.light, SignalLight::Green);
    assert!(model.trajectory.long_term_trend.has_sufficient_history);
}

#[test]
fn test_kpi_cards_for_selected_timeframe() {
    let config = DashboardConfig::default().with_kpi_timeframe(Timeframe::Last3Months);
    let model = build_dashboard(&rich_ledger(), &config);

    assert_eq!(model.kpi_cards.len(), 4);
    for card in &model.kpi_cards {
        assert_eq!(card.timeframe, Timeframe::Last3Months);
    }
    let revenue_card = &model.kpi_cards[0];
    assert_eq!(revenue_card.metric, KpiMetric::Revenue);
    assert_eq!(revenue_card.direction, Direction::Up);
    assert!(revenue_card.percent_change.is_some());
}

#[test]
fn test_kpi_cards_for_non_comparable_timeframe_are_flat() {
    let config = DashboardConfig::default().with_kpi_timeframe(Timeframe::AllDates);
    let model = build_dashboard(&rich_ledger(), &config);
    for card in &model.kpi_cards {
        assert_eq!(card.direction, Direction::Flat);
        assert_eq!(card.percent_change, None);
        assert_eq!(card.delta, card.value);
    }
}

#[test]
fn test_expense_slices_and_payees() {
    let model = build_dashboard(&rich_ledger(), &DashboardConfig::default());

    // Latest month (Jul 2024) has Rent, Groceries, Utilities.
    assert_eq!(model.expense_slices.len(), 3);
    assert_eq!(model.expense_slices[0].category, "Rent");
    let share_total: f64 = model.expense_slices.iter().map(|s| s.share_pct).sum();
    assert!((share_total - 100.0).abs() < 0.02);

    assert_eq!(model.top_payees[0].payee, "Landlord LLC");
    assert!(model.top_payees.iter().any(|p| p.payee == "Unknown"));
}

#[test]
fn test_mode_switch_only_moves_net() {
    let mut ledger = steady_ledger(MonthKey::new(2024, 1), 6);
    ledger.push(expense(2024, 6, 1000.0, "Capital Distribution"));

    let total = build_dashboard(
        &ledger,
        &DashboardConfig::default().with_cash_flow_mode(CashFlowMode::Total),
    );
    let operating = build_dashboard(
        &ledger,
        &DashboardConfig::default().with_cash_flow_mode(CashFlowMode::Operating),
    );

    let last_total = total.rollups.last().unwrap();
    let last_operating = operating.rollups.last().unwrap();
    assert_eq!(last_total.expenses, last_operating.expenses);
    assert_eq!(last_total.net_cash_flow, 1000.0);
    assert_eq!(last_operating.net_cash_flow, 2000.0);

    // Window aggregates follow their rollups in both modes.
    for model in [&total, &operating] {
        let all = &model.kpi_aggregates[7];
        let monthly_net: f64 = model.rollups.iter().map(|r| r.net_cash_flow).sum();
        assert_eq!(all.timeframe, Timeframe::AllDates);
        assert!((all.net_cash_flow - monthly_net).abs() < 0.01);
    }
}

#[test]
fn test_empty_ledger_yields_empty_model() {
    let model = build_dashboard(&[], &DashboardConfig::default());

    assert_eq!(model.latest_month, None);
    assert_eq!(model.previous_month, None);
    assert!(model.rollups.is_empty());
    assert!(model.trend_points.is_empty());
    assert!(model.forecast.points.is_empty());
    assert!(model.expense_slices.is_empty());
    assert!(model.top_payees.is_empty());
    assert!(model.category_movers.is_empty());
    assert!(model.opportunities.is_empty());
    assert_eq!(model.opportunity_total, 0.0);
    assert!(model.summary.is_empty());
    assert!(model.dig_here.is_none());

    assert_eq!(model.kpi_aggregates.len(), 8);
    for agg in &model.kpi_aggregates {
        assert_eq!(agg.month_count, 0);
        assert_eq!(agg.revenue, 0.0);
    }
    for comparison in &model.kpi_comparisons {
        assert_eq!(comparison.revenue.percent_change, None);
        assert_eq!(comparison.header.label, "No data");
    }
    assert_eq!(model.trajectory.monthly_trend.light, SignalLight::Neutral);
    assert!(!model.trajectory.long_term_trend.has_sufficient_history);
}

#[test]
fn test_opportunity_total_sums_the_list() {
    let model = build_dashboard(&rich_ledger(), &DashboardConfig::default());
    let summed: f64 = model.opportunities.iter().map(|o| o.savings).sum();
    assert!((model.opportunity_total - summed).abs() < 0.01);
    assert!(!model.opportunities.is_empty());
}

#[test]
fn test_model_serializes_as_flat_json() {
    let model = build_dashboard(&rich_ledger(), &DashboardConfig::default());
    let json = serde_json::to_value(&model).unwrap();

    assert_eq!(json["latest_month"], "2024-07");
    assert_eq!(json["rollups"][0]["month"], "2022-06");
    assert!(json["rollups"][0]["net_cash_flow"].is_number());
    assert_eq!(json["kpi_comparisons"][0]["timeframe"], "this_month");
    assert!(json["kpi_comparisons"][0]["header"]["label"].is_string());
    assert_eq!(json["trajectory"]["monthly_trend"]["light"], "green");
    assert_eq!(json["forecast"]["points"][0]["status"], "actual");

    // A percent change with no baseline serializes as null, never Infinity.
    let single = build_dashboard(&steady_ledger(MonthKey::new(2024, 6), 1), &DashboardConfig::default());
    let json = serde_json::to_value(&single).unwrap();
    assert!(json["kpi_comparisons"][0]["revenue"]["percent_change"].is_null());

    // And the model round-trips.
    let back: crate::model::DashboardModel =
        serde_json::from_value(serde_json::to_value(&model).unwrap()).unwrap();
    assert_eq!(back, model);
}
