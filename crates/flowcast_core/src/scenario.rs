//! What-if projection from a trailing baseline, independent of the trend
//! model.

use serde::{Deserialize, Serialize};

use crate::model::DashboardModel;
use crate::month::MonthKey;
use crate::round2;

/// Months averaged into the scenario baseline.
pub const SCENARIO_BASELINE_MONTHS: usize = 3;

/// Growth/reduction assumptions for a what-if run. Percentages are taken as
/// given — the engine does not reject out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub revenue_growth_pct: f64,
    pub expense_reduction_pct: f64,
    pub months: u32,
}

/// One projected month under a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPoint {
    pub month: MonthKey,
    pub revenue: f64,
    pub expenses: f64,
    pub net_cash_flow: f64,
    pub cumulative_net: f64,
}

/// Project `input.months` future months by compounding the growth/reduction
/// rates on the trailing-3-month baseline averages. Returns empty when the
/// model has no rollups to take a baseline from.
pub fn project_scenario(model: &DashboardModel, input: &ScenarioInput) -> Vec<ScenarioPoint> {
    let rollups = &model.rollups;
    let Some(last) = rollups.last() else {
        return Vec::new();
    };
    let window = &rollups[rollups.len().saturating_sub(SCENARIO_BASELINE_MONTHS)..];
    let base_revenue = window.iter().map(|r| r.revenue).sum::<f64>() / window.len() as f64;
    let base_expenses = window.iter().map(|r| r.expenses).sum::<f64>() / window.len() as f64;

    let growth = 1.0 + input.revenue_growth_pct / 100.0;
    let decay = 1.0 - input.expense_reduction_pct / 100.0;

    let mut cumulative = 0.0;
    (1..=input.months)
        .map(|k| {
            let revenue = base_revenue * growth.powi(k as i32);
            let expenses = base_expenses * decay.powi(k as i32);
            let net = revenue - expenses;
            cumulative += net;
            ScenarioPoint {
                month: last.month.add_months(k as i32),
                revenue: round2(revenue),
                expenses: round2(expenses),
                net_cash_flow: round2(net),
                cumulative_net: round2(cumulative),
            }
        })
        .collect()
}
