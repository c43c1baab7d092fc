//! Stats module - trend fitting

mod calculator;

pub use calculator::LinearTrend;
