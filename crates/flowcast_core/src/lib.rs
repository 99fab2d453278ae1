//! Cash-flow dashboard engine
//!
//! Turns a normalized ledger of dated transactions into time-bucketed
//! aggregates, multi-timeframe KPI comparisons, trend- and seasonality-aware
//! cash-flow forecasts and what-if scenario projections, all numerically
//! consistent with each other under filtering, re-aggregation and mode
//! switching.
//!
//! The whole crate is a pure, synchronous function of
//! `(transactions, config, scenario input)`: no I/O, no shared state, no
//! incremental update path — every model is recomputed wholesale on every
//! input change, which is cheap at realistic ledger sizes.
//!
//! ```ignore
//! use flowcast_core::{DashboardConfig, ScenarioInput, build_dashboard, project_scenario};
//!
//! let model = build_dashboard(&transactions, &DashboardConfig::default());
//! let what_if = project_scenario(
//!     &model,
//!     &ScenarioInput { revenue_growth_pct: 5.0, expense_reduction_pct: 2.0, months: 12 },
//! );
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analytics;
pub mod dashboard;
pub mod error;
pub mod kpi;
pub mod month;
pub mod scenario;
pub mod timeframe;
pub mod trajectory;
pub mod trend;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{CashFlowMode, DashboardConfig};
pub use dashboard::build_dashboard;
pub use model::{DashboardModel, MonthlyRollup, Transaction, TransactionKind};
pub use month::MonthKey;
pub use scenario::{ScenarioInput, ScenarioPoint, project_scenario};
pub use timeframe::Timeframe;

/// Near-zero guard shared by percent-change and rate computations.
pub const EPSILON: f64 = 1e-9;

/// Round money and percent outputs to 2 decimal places.
#[inline]
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Relative change of `current` against the magnitude of `previous`, `None`
/// when the baseline is too close to zero to divide by.
#[inline]
pub(crate) fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if previous.abs() <= EPSILON {
        None
    } else {
        Some(round2((current - previous) / previous.abs() * 100.0))
    }
}
