//! Core data structures: terms, timeframes, series, and forecast results.

mod forecast;
mod series;

pub use forecast::{ErrorMetrics, ForecastOutput, ForecastPoint, ModelMeta};
pub use series::{SeriesPoint, Term, TimeSeries, Timeframe};
