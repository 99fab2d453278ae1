//! Engine configuration and mode flags.
//!
//! The whole pipeline is a pure function of `(transactions, config)`; the
//! flags here are the only knobs, threaded explicitly through every call
//! chain rather than held as ambient state.

use serde::{Deserialize, Serialize};

use crate::timeframe::Timeframe;

/// Upper bound on precomputed projected months. The engine always computes
/// the forecast up to this horizon so a UI range control never triggers a
/// model refit.
pub const FORECAST_HORIZON_MAX: usize = 36;

/// Whether capital-distribution expenses count against net cash flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowMode {
    /// Capital distributions are excluded from effective expenses.
    Operating,
    /// Every expense counts.
    #[default]
    Total,
}

/// Mode flags for one dashboard computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub cash_flow_mode: CashFlowMode,
    /// Timeframe the KPI cards summarize.
    pub kpi_timeframe: Timeframe,
    /// Projected months appended to the forecast, capped at
    /// [`FORECAST_HORIZON_MAX`].
    pub forecast_horizon: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            cash_flow_mode: CashFlowMode::Total,
            kpi_timeframe: Timeframe::ThisMonth,
            forecast_horizon: FORECAST_HORIZON_MAX,
        }
    }
}

impl DashboardConfig {
    pub fn with_cash_flow_mode(mut self, mode: CashFlowMode) -> Self {
        self.cash_flow_mode = mode;
        self
    }

    pub fn with_kpi_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.kpi_timeframe = timeframe;
        self
    }

    pub fn with_forecast_horizon(mut self, months: usize) -> Self {
        self.forecast_horizon = months.min(FORECAST_HORIZON_MAX);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_horizon_is_capped() {
        let config = DashboardConfig::default().with_forecast_horizon(120);
        assert_eq!(config.forecast_horizon, FORECAST_HORIZON_MAX);

        let config = DashboardConfig::default().with_forecast_horizon(6);
        assert_eq!(config.forecast_horizon, 6);
    }
}
