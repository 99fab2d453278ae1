mod results;
mod rollup;
mod transaction;

pub use results::{DashboardModel, DigHere, KpiCard, KpiMetric, TrendPoint};
pub use rollup::{MonthlyRollup, build_monthly_rollups};
pub use transaction::{Transaction, TransactionKind};
