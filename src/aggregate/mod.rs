//! Aggregator module - grouped, normalized, and tallied summary tables.
//!
//! Every table produced here is a finished artifact: deterministically
//! sorted, with stable column names, ready for a renderer to consume as-is.

use polars::prelude::PolarsError;
use thiserror::Error;

mod composition;
mod period;
mod seasonal;
mod severity;
mod streets;

pub use composition::{CompositionAnalysis, Measure, TrendPoints};
pub use period::PeriodFactorTrends;
pub use seasonal::SeasonalImpairment;
pub use severity::SeatPositionSeverity;
pub use streets::StreetIncidents;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}
