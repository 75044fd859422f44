//! Error types for the trendcast library.

use thiserror::Error;

/// Result type alias for trendcast operations.
pub type Result<T> = std::result::Result<T, TrendError>;

/// Errors that can occur during series analysis and forecasting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrendError {
    /// Series is shorter than the operation's minimum.
    #[error("not enough historical data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Seasonal model needs at least two full seasons.
    #[error("not enough historical data for seasonal analysis: need at least {needed}, got {got}")]
    InsufficientSeasonalData { needed: usize, got: usize },

    /// Similarity comparison needs a minimum period overlap.
    #[error("insufficient overlapping data points: need at least {needed}, got {got}")]
    InsufficientOverlap { needed: usize, got: usize },

    /// Degenerate input shape (zero variance, zero max) where no safe
    /// fallback applies.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Period ordering violation when constructing a series.
    #[error("period error: {0}")]
    PeriodError(String),

    /// Model has not been fitted yet.
    #[error("model must be fitted before forecasting")]
    FitRequired,

    /// A mandatory ensemble member failed.
    #[error("ensemble member {model} failed: {source}")]
    EnsembleMember {
        model: String,
        #[source]
        source: Box<TrendError>,
    },

    /// The external series store could not produce the series.
    #[error("series store unavailable: {0}")]
    StoreUnavailable(String),
}
