//! The assembled dashboard output consumed by presentation collaborators.
//!
//! Everything here is derived data: a pure function of the transaction list
//! and the mode flags, recomputed wholesale on every input change and
//! serialized as flat JSON mirroring the field names.

use serde::{Deserialize, Serialize};

use crate::analytics::{CategoryMover, ExpenseSlice, Opportunity, PayeeSpend};
use crate::kpi::{KpiAggregate, KpiTimeframeComparison};
use crate::model::rollup::MonthlyRollup;
use crate::month::MonthKey;
use crate::timeframe::Timeframe;
use crate::trajectory::{Direction, TrajectoryOutlook};
use crate::trend::{CashFlowForecast, SuggestedMargins};

/// Metric behind one KPI card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiMetric {
    Revenue,
    Expenses,
    NetCashFlow,
    SavingsRate,
}

/// One headline card: a value plus its move against the prior window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiCard {
    pub metric: KpiMetric,
    pub timeframe: Timeframe,
    pub value: f64,
    pub delta: f64,
    pub percent_change: Option<f64>,
    /// Trend arrow; `Flat` when there is no prior window to move against.
    pub direction: Direction,
}

/// Income/expense/net for one month of the trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub month: MonthKey,
    pub income: f64,
    pub expense: f64,
    pub net: f64,
}

/// Pointer at the single most notable category this month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigHere {
    pub category: String,
    pub amount: f64,
    pub reason: String,
}

/// Everything the dashboard needs, in one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardModel {
    pub latest_month: Option<MonthKey>,
    pub previous_month: Option<MonthKey>,
    pub rollups: Vec<MonthlyRollup>,
    /// One aggregate per timeframe, in [`Timeframe::ALL`] order.
    pub kpi_aggregates: Vec<KpiAggregate>,
    /// One comparison per comparable timeframe, in [`Timeframe::COMPARABLE`]
    /// order.
    pub kpi_comparisons: Vec<KpiTimeframeComparison>,
    pub trajectory: TrajectoryOutlook,
    pub kpi_cards: Vec<KpiCard>,
    pub trend_points: Vec<TrendPoint>,
    pub forecast: CashFlowForecast,
    pub suggested_margins: SuggestedMargins,
    pub expense_slices: Vec<ExpenseSlice>,
    pub top_payees: Vec<PayeeSpend>,
    pub category_movers: Vec<CategoryMover>,
    pub opportunities: Vec<Opportunity>,
    pub opportunity_total: f64,
    /// Narrative summary bullets for the header.
    pub summary: Vec<String>,
    pub dig_here: Option<DigHere>,
}
