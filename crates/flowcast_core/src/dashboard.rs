//! Dashboard assembly: one pure pass from ledger to [`DashboardModel`].

use tracing::debug;

use crate::analytics;
use crate::config::DashboardConfig;
use crate::kpi::{KpiAggregate, KpiTimeframeComparison, aggregate, compare, compare_timeframe};
use crate::model::{
    DashboardModel, DigHere, KpiCard, KpiMetric, MonthlyRollup, Transaction, TrendPoint,
    build_monthly_rollups,
};
use crate::round2;
use crate::timeframe::{Timeframe, select_window};
use crate::trajectory::{Direction, TrajectoryOutlook, TrajectorySignal};
use crate::trend::{CashFlowForecast, build_forecast, suggest_margins};

/// Compute the full dashboard model from a normalized transaction list.
///
/// Deterministic and side-effect-free: callers may recompute on every input
/// change (filter, mode toggle, slider drag) without debouncing for
/// correctness.
pub fn build_dashboard(transactions: &[Transaction], config: &DashboardConfig) -> DashboardModel {
    let rollups = build_monthly_rollups(transactions, config.cash_flow_mode);
    let latest_month = rollups.last().map(|r| r.month);
    let previous_month = rollups
        .len()
        .checked_sub(2)
        .map(|second_to_last| rollups[second_to_last].month);

    let kpi_aggregates: Vec<KpiAggregate> = Timeframe::ALL
        .iter()
        .map(|&tf| aggregate(tf, select_window(&rollups, tf)))
        .collect();
    let kpi_comparisons: Vec<KpiTimeframeComparison> = Timeframe::COMPARABLE
        .iter()
        .map(|&tf| compare_timeframe(&rollups, tf))
        .collect();

    let signal = |tf: Timeframe| {
        kpi_comparisons
            .iter()
            .find(|c| c.timeframe == tf)
            .map(TrajectorySignal::from_comparison)
            .unwrap_or_else(TrajectorySignal::neutral)
    };
    let trajectory = TrajectoryOutlook {
        monthly_trend: signal(Timeframe::ThisMonth),
        short_term_trend: signal(Timeframe::Last3Months),
        long_term_trend: signal(Timeframe::Ttm),
    };

    let kpi_cards = match kpi_comparisons
        .iter()
        .find(|c| c.timeframe == config.kpi_timeframe)
    {
        Some(comparison) => build_cards(comparison),
        // LastMonth / AllDates have no prior window; cards carry the bare
        // aggregate with flat arrows.
        None => {
            let window = select_window(&rollups, config.kpi_timeframe);
            let current = aggregate(config.kpi_timeframe, window);
            let empty = aggregate(config.kpi_timeframe, &[]);
            build_cards(&compare(current, empty))
        }
    };

    let trend_points: Vec<TrendPoint> = rollups
        .iter()
        .map(|r| TrendPoint {
            month: r.month,
            income: r.revenue,
            expense: r.expenses,
            net: r.net_cash_flow,
        })
        .collect();

    let forecast = build_forecast(&rollups, config.forecast_horizon);
    let suggested_margins = suggest_margins(&rollups);

    let expense_slices = latest_month
        .map(|m| analytics::expense_slices(transactions, m))
        .unwrap_or_default();
    let top_payees = latest_month
        .map(|m| analytics::top_payees(transactions, m))
        .unwrap_or_default();
    let category_movers = latest_month
        .map(|m| analytics::category_movers(transactions, m, previous_month))
        .unwrap_or_default();
    let opportunities = analytics::opportunities(transactions, &rollups);
    let opportunity_total = round2(opportunities.iter().map(|o| o.savings).sum());

    let summary = summary_bullets(&rollups, &category_movers, &opportunities, &forecast);
    let dig_here = pick_dig_here(&category_movers, &opportunities);

    debug!(
        months = rollups.len(),
        transactions = transactions.len(),
        projected = forecast.projected_months,
        "assembled dashboard model"
    );

    DashboardModel {
        latest_month,
        previous_month,
        rollups,
        kpi_aggregates,
        kpi_comparisons,
        trajectory,
        kpi_cards,
        trend_points,
        forecast,
        suggested_margins,
        expense_slices,
        top_payees,
        category_movers,
        opportunities,
        opportunity_total,
        summary,
        dig_here,
    }
}

/// The four headline cards, in fixed metric order.
fn build_cards(comparison: &KpiTimeframeComparison) -> Vec<KpiCard> {
    let metrics = [
        (KpiMetric::Revenue, &comparison.revenue),
        (KpiMetric::Expenses, &comparison.expenses),
        (KpiMetric::NetCashFlow, &comparison.net_cash_flow),
        (KpiMetric::SavingsRate, &comparison.savings_rate),
    ];
    let has_baseline = comparison.previous.month_count > 0;
    metrics
        .into_iter()
        .map(|(metric, m)| KpiCard {
            metric,
            timeframe: comparison.timeframe,
            value: m.current,
            delta: m.delta,
            percent_change: m.percent_change,
            direction: if has_baseline {
                Direction::from_delta(m.delta)
            } else {
                Direction::Flat
            },
        })
        .collect()
}

fn summary_bullets(
    rollups: &[MonthlyRollup],
    movers: &[analytics::CategoryMover],
    opportunities: &[analytics::Opportunity],
    forecast: &CashFlowForecast,
) -> Vec<String> {
    let mut bullets = Vec::new();
    let Some(latest) = rollups.last() else {
        return bullets;
    };

    bullets.push(format!(
        "{} net cash flow was {:.2} on revenue of {:.2}.",
        latest.month.label(),
        latest.net_cash_flow,
        latest.revenue
    ));
    if rollups.len() >= 2 {
        let previous = &rollups[rollups.len() - 2];
        bullets.push(format!(
            "Net cash flow moved {:+.2} against {}.",
            latest.net_cash_flow - previous.net_cash_flow,
            previous.month.label()
        ));
    }
    if let Some(top) = movers.first() {
        bullets.push(format!(
            "Biggest category move: {} ({:+.2} month over month).",
            top.category, top.delta
        ));
    }
    let savings_total: f64 = opportunities.iter().map(|o| o.savings).sum();
    if savings_total > 0.0 {
        bullets.push(format!(
            "{:.2} in potential monthly savings across {} opportunit{}.",
            savings_total,
            opportunities.len(),
            if opportunities.len() == 1 { "y" } else { "ies" }
        ));
    }
    let projected: Vec<f64> = forecast
        .points
        .iter()
        .filter(|p| p.status == crate::trend::PointStatus::Projected)
        .map(|p| p.net_cash_flow)
        .collect();
    if !projected.is_empty() {
        let average = projected.iter().sum::<f64>() / projected.len() as f64;
        bullets.push(format!(
            "Projection averages {:.2}/month net cash flow over the next {} months.",
            average,
            projected.len()
        ));
    }
    bullets
}

/// The most notable category: the largest absolute mover, falling back to
/// the top category-backed opportunity.
fn pick_dig_here(
    movers: &[analytics::CategoryMover],
    opportunities: &[analytics::Opportunity],
) -> Option<DigHere> {
    if let Some(top) = movers.first() {
        return Some(DigHere {
            category: top.category.clone(),
            amount: top.current,
            reason: format!(
                "Largest month-over-month change ({:+.2}).",
                top.delta
            ),
        });
    }
    opportunities.iter().find_map(|o| {
        o.category.as_ref().map(|category| DigHere {
            category: category.clone(),
            amount: o.savings,
            reason: o.hint.clone(),
        })
    })
}
