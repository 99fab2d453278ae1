//! Trend fitting, seasonality detection and the cash-flow forecast.
//!
//! The thresholds in this module are tuned product policy, not statistical
//! law. They are named constants so the tests can pin current behavior; a
//! change to any of them is a deliberate product decision, not a bug fix.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FORECAST_HORIZON_MAX;
use crate::model::MonthlyRollup;
use crate::month::MonthKey;
use crate::{EPSILON, round2};

/// Minimum observed months before a sloped projection is considered.
pub const TREND_MIN_MONTHS: usize = 6;
/// Minimum fit quality for a sloped projection.
pub const TREND_MIN_R_SQUARED: f64 = 0.35;
/// Slope must clear this fraction of the series range...
pub const SLOPE_RANGE_FRACTION: f64 = 0.03;
/// ...and this fraction of the rolling baseline...
pub const SLOPE_BASELINE_FRACTION: f64 = 0.005;
/// ...and this absolute floor, or the series is treated as flat.
pub const SLOPE_FLOOR: f64 = 1.0;
/// Trailing window for the flat-projection baseline.
pub const ROLLING_WINDOW: usize = 3;
/// Trailing window for the reported drift of a flat projection.
pub const REPORTED_SLOPE_WINDOW: usize = 6;
/// Seasonality gate: minimum months of history.
pub const SEASONAL_MIN_MONTHS: usize = 18;
/// Seasonality gate: minimum distinct calendar months observed.
pub const SEASONAL_MIN_DISTINCT_MONTHS: usize = 10;
/// Seasonality gate: minimum adjustment-to-noise ratio.
pub const SEASONAL_MIN_STRENGTH: f64 = 0.45;
/// Seasonality gate: alternative lag-12 autocorrelation floor.
pub const SEASONAL_MIN_AUTOCORRELATION: f64 = 0.35;
/// Trailing window for volatility scoring.
pub const VOLATILITY_WINDOW: usize = 12;
/// Minimum months of history before margins are suggested.
pub const MARGIN_MIN_MONTHS: usize = 6;

/// Ordinary least-squares line against index 0..n-1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Fit a series against its month index. A series with no variance reports
/// `r_squared = 0` so the decision rule falls through to the rolling average.
pub fn linear_regression(series: &[f64]) -> LinearFit {
    let n = series.len();
    if n < 2 {
        return LinearFit {
            slope: 0.0,
            intercept: series.first().copied().unwrap_or(0.0),
            r_squared: 0.0,
        };
    }
    let n_f = n as f64;
    let mean_x = (n_f - 1.0) / 2.0;
    let mean_y = series.iter().sum::<f64>() / n_f;
    let mut ss_xy = 0.0;
    let mut ss_xx = 0.0;
    for (i, &y) in series.iter().enumerate() {
        let dx = i as f64 - mean_x;
        ss_xy += dx * (y - mean_y);
        ss_xx += dx * dx;
    }
    let slope = ss_xy / ss_xx;
    let intercept = mean_y - slope * mean_x;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (i, &y) in series.iter().enumerate() {
        let fitted = intercept + slope * i as f64;
        ss_res += (y - fitted) * (y - fitted);
        ss_tot += (y - mean_y) * (y - mean_y);
    }
    let r_squared = if ss_tot <= EPSILON {
        0.0
    } else {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    };
    LinearFit {
        slope,
        intercept,
        r_squared,
    }
}

/// Projection model chosen for one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TrendModel {
    /// Sloped projection from a confident regression fit.
    LinearTrend(LinearFit),
    /// Flat projection at the trailing baseline. `reported_slope` is the mean
    /// month-over-month delta of the trailing months, surfaced for display
    /// only — it never feeds the projection.
    RollingAverage { baseline: f64, reported_slope: f64 },
}

impl TrendModel {
    /// Value the model assigns to an already-observed index.
    pub fn fitted(&self, index: usize) -> f64 {
        match self {
            TrendModel::LinearTrend(fit) => fit.intercept + fit.slope * index as f64,
            TrendModel::RollingAverage { baseline, .. } => *baseline,
        }
    }

    /// Projection `offset` months past the last of `observed_len` points.
    pub fn project(&self, observed_len: usize, offset: usize) -> f64 {
        match self {
            TrendModel::LinearTrend(fit) => {
                fit.intercept + fit.slope * (observed_len - 1 + offset) as f64
            }
            TrendModel::RollingAverage { baseline, .. } => *baseline,
        }
    }

    /// Slope surfaced to callers, whichever model was chosen.
    pub fn reported_slope(&self) -> f64 {
        match self {
            TrendModel::LinearTrend(fit) => fit.slope,
            TrendModel::RollingAverage { reported_slope, .. } => *reported_slope,
        }
    }
}

/// Choose between a sloped and a flat projection for one series.
///
/// A linear trend must have enough history, a decent fit and a slope big
/// enough to matter at the series' own scale; anything else projects flat at
/// the trailing baseline.
pub fn fit_series(label: &str, series: &[f64]) -> TrendModel {
    let n = series.len();
    let fit = linear_regression(series);
    let baseline = rolling_baseline(series);
    let range = series.iter().cloned().fold(f64::MIN, f64::max)
        - series.iter().cloned().fold(f64::MAX, f64::min);
    let range = if series.is_empty() { 0.0 } else { range };
    let slope_threshold = (SLOPE_RANGE_FRACTION * range)
        .max(SLOPE_BASELINE_FRACTION * baseline.abs())
        .max(SLOPE_FLOOR);

    if n >= TREND_MIN_MONTHS
        && fit.r_squared >= TREND_MIN_R_SQUARED
        && fit.slope.abs() >= slope_threshold
    {
        debug!(
            series = label,
            slope = fit.slope,
            r_squared = fit.r_squared,
            "selected linear trend"
        );
        TrendModel::LinearTrend(fit)
    } else {
        let reported_slope = mean_month_over_month_delta(series);
        debug!(
            series = label,
            baseline,
            r_squared = fit.r_squared,
            "selected rolling average"
        );
        TrendModel::RollingAverage {
            baseline,
            reported_slope,
        }
    }
}

/// Mean of the trailing `min(ROLLING_WINDOW, n)` values.
fn rolling_baseline(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let window = ROLLING_WINDOW.min(series.len());
    series[series.len() - window..].iter().sum::<f64>() / window as f64
}

/// Mean month-over-month delta of the trailing `min(REPORTED_SLOPE_WINDOW, n)`
/// values.
fn mean_month_over_month_delta(series: &[f64]) -> f64 {
    let window = REPORTED_SLOPE_WINDOW.min(series.len());
    let tail = &series[series.len() - window..];
    if tail.len() < 2 {
        return 0.0;
    }
    tail.windows(2).map(|w| w[1] - w[0]).sum::<f64>() / (tail.len() - 1) as f64
}

/// Per-calendar-month adjustments for recurring annual expense patterns,
/// re-centered so the size-weighted mean adjustment is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalProfile {
    /// Index 0 = January.
    pub adjustments: [f64; 12],
    pub strength: f64,
    pub lag12_autocorrelation: f64,
    /// Whether the gate passed; adjustments are only applied when true.
    pub confident: bool,
}

impl SeasonalProfile {
    fn unconfident() -> Self {
        Self {
            adjustments: [0.0; 12],
            strength: 0.0,
            lag12_autocorrelation: 0.0,
            confident: false,
        }
    }

    /// Adjustment for a projected month, zero unless confident.
    pub fn adjustment_for(&self, month: MonthKey) -> f64 {
        if self.confident {
            self.adjustments[(month.month_number() - 1) as usize]
        } else {
            0.0
        }
    }
}

/// Detect a recurring monthly pattern in the residuals of a fitted series.
pub fn seasonal_profile(
    months: &[MonthKey],
    series: &[f64],
    model: &TrendModel,
) -> SeasonalProfile {
    debug_assert_eq!(months.len(), series.len());
    let n = series.len();
    if n < SEASONAL_MIN_MONTHS {
        return SeasonalProfile::unconfident();
    }

    let residuals: Vec<f64> = series
        .iter()
        .enumerate()
        .map(|(i, &y)| y - model.fitted(i))
        .collect();

    let mut group_sum = [0.0_f64; 12];
    let mut group_count = [0usize; 12];
    for (month, &residual) in months.iter().zip(&residuals) {
        let slot = (month.month_number() - 1) as usize;
        group_sum[slot] += residual;
        group_count[slot] += 1;
    }
    let distinct_months = group_count.iter().filter(|&&c| c > 0).count();
    if distinct_months < SEASONAL_MIN_DISTINCT_MONTHS {
        return SeasonalProfile::unconfident();
    }

    // Re-center by the overall mean residual so the size-weighted mean
    // adjustment is exactly zero — the trend keeps the level, seasonality
    // only redistributes it across the year.
    let overall_mean = residuals.iter().sum::<f64>() / n as f64;
    let mut adjustments = [0.0_f64; 12];
    for slot in 0..12 {
        if group_count[slot] > 0 {
            adjustments[slot] = group_sum[slot] / group_count[slot] as f64 - overall_mean;
        }
    }

    let per_observation: Vec<f64> = months
        .iter()
        .map(|m| adjustments[(m.month_number() - 1) as usize])
        .collect();
    let deseasonalized: Vec<f64> = residuals
        .iter()
        .zip(&per_observation)
        .map(|(r, a)| r - a)
        .collect();
    let strength = stdev(&per_observation) / stdev(&deseasonalized).max(EPSILON);
    let lag12_autocorrelation = lag_autocorrelation(&residuals, 12);

    let confident =
        strength >= SEASONAL_MIN_STRENGTH || lag12_autocorrelation >= SEASONAL_MIN_AUTOCORRELATION;
    debug!(
        strength,
        lag12_autocorrelation, confident, "seasonality gate evaluated"
    );

    SeasonalProfile {
        adjustments,
        strength,
        lag12_autocorrelation,
        confident,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn stdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64).sqrt()
}

fn lag_autocorrelation(values: &[f64], lag: usize) -> f64 {
    if values.len() <= lag {
        return 0.0;
    }
    let m = mean(values);
    let denom: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    if denom <= EPSILON {
        return 0.0;
    }
    let numer: f64 = (0..values.len() - lag)
        .map(|i| (values[i] - m) * (values[i + lag] - m))
        .sum();
    numer / denom
}

/// Whether a forecast point is observed history or synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointStatus {
    Actual,
    Projected,
}

/// One month on the combined actual + projected cash-flow line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlowForecastPoint {
    pub month: MonthKey,
    pub revenue: f64,
    pub expenses: f64,
    pub net_cash_flow: f64,
    pub status: PointStatus,
}

/// Actual history plus trend/seasonality projections and model notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowForecast {
    pub points: Vec<CashFlowForecastPoint>,
    pub projected_months: usize,
    pub revenue_note: String,
    pub expense_note: String,
}

/// Build the forecast line: the actual prefix is exactly the rollups, then
/// `horizon` projected months (capped at [`FORECAST_HORIZON_MAX`]) each one
/// calendar month after the last.
///
/// Revenue and expense component lines are floored at zero; the projected net
/// is their difference and may go negative.
pub fn build_forecast(rollups: &[MonthlyRollup], horizon: usize) -> CashFlowForecast {
    let horizon = horizon.min(FORECAST_HORIZON_MAX);
    let Some(last) = rollups.last() else {
        let note = "No transaction history to project from.".to_string();
        return CashFlowForecast {
            points: Vec::new(),
            projected_months: 0,
            revenue_note: note.clone(),
            expense_note: note,
        };
    };

    let months: Vec<MonthKey> = rollups.iter().map(|r| r.month).collect();
    let revenue: Vec<f64> = rollups.iter().map(|r| r.revenue).collect();
    let expenses: Vec<f64> = rollups.iter().map(|r| r.expenses).collect();

    let revenue_model = fit_series("revenue", &revenue);
    let expense_model = fit_series("expenses", &expenses);
    let seasonal = seasonal_profile(&months, &expenses, &expense_model);

    let n = rollups.len();
    let mut points: Vec<CashFlowForecastPoint> = rollups
        .iter()
        .map(|r| CashFlowForecastPoint {
            month: r.month,
            revenue: r.revenue,
            expenses: r.expenses,
            net_cash_flow: r.net_cash_flow,
            status: PointStatus::Actual,
        })
        .collect();

    for offset in 1..=horizon {
        let month = last.month.add_months(offset as i32);
        let projected_revenue = revenue_model.project(n, offset).max(0.0);
        let projected_expenses =
            (expense_model.project(n, offset) + seasonal.adjustment_for(month)).max(0.0);
        points.push(CashFlowForecastPoint {
            month,
            revenue: round2(projected_revenue),
            expenses: round2(projected_expenses),
            net_cash_flow: round2(projected_revenue - projected_expenses),
            status: PointStatus::Projected,
        });
    }

    CashFlowForecast {
        points,
        projected_months: horizon,
        revenue_note: model_note("Revenue", &revenue_model, n, None),
        expense_note: model_note("Expenses", &expense_model, n, Some(&seasonal)),
    }
}

fn model_note(
    series: &str,
    model: &TrendModel,
    n: usize,
    seasonal: Option<&SeasonalProfile>,
) -> String {
    let mut note = match model {
        TrendModel::LinearTrend(fit) => format!(
            "{series}: linear trend over {n} months ({:+.2}/month, R\u{b2} {:.2}).",
            fit.slope, fit.r_squared
        ),
        TrendModel::RollingAverage {
            baseline,
            reported_slope,
        } => format!(
            "{series}: {}-month rolling average ({:.2}/month); trend confidence too low for a \
             sloped projection (recent drift {:+.2}/month).",
            ROLLING_WINDOW.min(n),
            baseline,
            reported_slope
        ),
    };
    if let Some(seasonal) = seasonal {
        if seasonal.confident {
            note.push_str(" Recurring monthly pattern detected; seasonal adjustments applied.");
        } else {
            note.push_str(" No reliable seasonal pattern detected.");
        }
    }
    note
}

/// Suggested planning haircuts layered on top of the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedMargins {
    /// Zero or negative: plan revenue this far below the projection.
    pub revenue_margin_pct: f64,
    /// Zero or positive: plan expenses this far above the projection.
    pub expense_margin_pct: f64,
    pub revenue_note: String,
    pub expense_note: String,
}

/// Ascending volatility thresholds onto the revenue haircut ladder.
const REVENUE_MARGIN_STEPS: [(f64, f64); 9] = [
    (0.05, 0.0),
    (0.10, -5.0),
    (0.15, -10.0),
    (0.20, -15.0),
    (0.25, -20.0),
    (0.30, -25.0),
    (0.35, -30.0),
    (0.45, -35.0),
    (f64::INFINITY, -40.0),
];

/// Ascending volatility thresholds onto the expense cushion ladder.
const EXPENSE_MARGIN_STEPS: [(f64, f64); 5] = [
    (0.05, 0.0),
    (0.15, 5.0),
    (0.25, 10.0),
    (0.35, 15.0),
    (f64::INFINITY, 20.0),
];

/// Score volatility over the trailing actual months and map each series onto
/// its margin ladder. Thin history defaults both margins to zero with an
/// explanatory note.
pub fn suggest_margins(rollups: &[MonthlyRollup]) -> SuggestedMargins {
    if rollups.len() < MARGIN_MIN_MONTHS {
        let note = format!(
            "Fewer than {MARGIN_MIN_MONTHS} months of history; margin left at 0%."
        );
        return SuggestedMargins {
            revenue_margin_pct: 0.0,
            expense_margin_pct: 0.0,
            revenue_note: note.clone(),
            expense_note: note,
        };
    }

    let window = &rollups[rollups.len().saturating_sub(VOLATILITY_WINDOW)..];
    let revenue: Vec<f64> = window.iter().map(|r| r.revenue).collect();
    let expenses: Vec<f64> = window.iter().map(|r| r.expenses).collect();
    let revenue_volatility = volatility_score(&revenue);
    let expense_volatility = volatility_score(&expenses);
    let revenue_margin_pct = margin_for(revenue_volatility, &REVENUE_MARGIN_STEPS);
    let expense_margin_pct = margin_for(expense_volatility, &EXPENSE_MARGIN_STEPS);

    SuggestedMargins {
        revenue_margin_pct,
        expense_margin_pct,
        revenue_note: format!(
            "Revenue volatility {revenue_volatility:.2} over the last {} months suggests \
             planning {revenue_margin_pct:.0}% relative to the projection.",
            window.len()
        ),
        expense_note: format!(
            "Expense volatility {expense_volatility:.2} over the last {} months suggests \
             planning {expense_margin_pct:+.0}% relative to the projection.",
            window.len()
        ),
    }
}

/// `0.6 * coefficient of variation + 0.4 * mean |month-over-month relative
/// change|`.
fn volatility_score(series: &[f64]) -> f64 {
    let m = mean(series);
    let cv = if m.abs() <= EPSILON {
        0.0
    } else {
        stdev(series) / m.abs()
    };
    let mut total = 0.0;
    let mut count = 0usize;
    for pair in series.windows(2) {
        if pair[0].abs() > EPSILON {
            total += ((pair[1] - pair[0]) / pair[0]).abs();
            count += 1;
        }
    }
    let mom = if count == 0 { 0.0 } else { total / count as f64 };
    0.6 * cv + 0.4 * mom
}

fn margin_for(volatility: f64, steps: &[(f64, f64)]) -> f64 {
    for &(threshold, margin) in steps {
        if volatility < threshold {
            return margin;
        }
    }
    steps.last().map_or(0.0, |&(_, margin)| margin)
}
