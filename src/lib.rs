//! # trendcast
//!
//! Statistical analysis and forecasting for bucketed event-count time
//! series (search terms, page hits, mentions — anything counted per
//! period).
//!
//! The library is organized around a small set of components:
//!
//! - [`core`] — terms, timeframes, series, and forecast output types
//! - [`stats`] — descriptive statistics, trend lines, global outliers
//! - [`detection`] — rolling-window spike and drop detection
//! - [`models`] — double/triple exponential smoothing, linear
//!   regression, an ensemble combiner, and prediction intervals
//! - [`similarity`] — correlation, DTW/Euclidean/cosine distances, and
//!   lead/lag relationships between terms
//! - [`store`] — the [`store::SeriesStore`] boundary and per-term cache
//! - [`analyzer`] — the [`analyzer::TrendAnalyzer`] facade tying it all
//!   together
//!
//! ## Example
//!
//! ```
//! use trendcast::prelude::*;
//!
//! # fn main() -> trendcast::Result<()> {
//! let mut store = MemoryStore::new();
//! let base = chrono::Utc::now();
//! let series = TimeSeries::from_pairs(
//!     Term::new("rust"),
//!     Timeframe::Daily,
//!     (0..30u64).map(|i| (Timeframe::Daily.advance(base, i as usize), 100 + i)),
//! )?;
//! store.insert(&series);
//!
//! let mut analyzer = TrendAnalyzer::new(store);
//! let forecast = analyzer.forecast_holt(&Term::new("rust"), Timeframe::Daily, 7)?;
//! assert_eq!(forecast.horizon(), 7);
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod core;
pub mod detection;
pub mod error;
pub mod models;
pub mod similarity;
pub mod stats;
pub mod store;

pub use error::{Result, TrendError};

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::analyzer::TrendAnalyzer;
    pub use crate::core::{
        ErrorMetrics, ForecastOutput, ForecastPoint, ModelMeta, SeriesPoint, Term, TimeSeries,
        Timeframe,
    };
    pub use crate::detection::{detect_anomalies, AnomalyKind, AnomalyReport};
    pub use crate::error::{Result, TrendError};
    pub use crate::models::{
        apply_intervals, ensemble_forecast, fit_forecast, ConfidenceLevel,
        DoubleExponentialSmoothing, Forecaster, LinearRegression, TripleExponentialSmoothing,
    };
    pub use crate::similarity::{compare, CorrelationMatrix, SimilarityReport};
    pub use crate::stats::{analyze, StatisticsReport};
    pub use crate::store::{MemoryStore, SeriesCache, SeriesStore};
}
