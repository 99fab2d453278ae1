//! Three-tier directional outlook derived from comparison deltas.

use serde::{Deserialize, Serialize};

use crate::EPSILON;
use crate::kpi::KpiTimeframeComparison;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    /// Sign of a delta with the shared near-zero tolerance.
    pub fn from_delta(delta: f64) -> Self {
        if delta.abs() <= EPSILON {
            Direction::Flat
        } else if delta > 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalLight {
    Green,
    Red,
    Neutral,
}

/// One horizon's up/down/flat signal over net cash flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySignal {
    pub direction: Direction,
    pub light: SignalLight,
    pub has_sufficient_history: bool,
    pub net_delta: f64,
}

impl TrajectorySignal {
    /// The signal shown when a horizon cannot be judged at all.
    pub fn neutral() -> Self {
        Self {
            direction: Direction::Flat,
            light: SignalLight::Neutral,
            has_sufficient_history: false,
            net_delta: 0.0,
        }
    }

    /// Derive a signal from a comparison's net-cash-flow delta.
    ///
    /// Both windows need at least one month. A current window with no prior
    /// block produces a raw delta equal to the whole current net; the history
    /// gate keeps that from lighting up as a genuine move.
    pub fn from_comparison(comparison: &KpiTimeframeComparison) -> Self {
        let net_delta = comparison.net_cash_flow.delta;
        let has_sufficient_history =
            comparison.current.month_count >= 1 && comparison.previous.month_count >= 1;
        if !has_sufficient_history {
            return Self {
                direction: Direction::Flat,
                light: SignalLight::Neutral,
                has_sufficient_history,
                net_delta,
            };
        }
        let direction = Direction::from_delta(net_delta);
        let light = match direction {
            Direction::Up => SignalLight::Green,
            Direction::Down => SignalLight::Red,
            Direction::Flat => SignalLight::Neutral,
        };
        Self {
            direction,
            light,
            has_sufficient_history,
            net_delta,
        }
    }
}

/// The three fixed signals: month over month, trailing quarter, trailing
/// year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryOutlook {
    pub monthly_trend: TrajectorySignal,
    pub short_term_trend: TrajectorySignal,
    pub long_term_trend: TrajectorySignal,
}
