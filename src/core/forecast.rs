//! Forecast result types shared by all models.

use crate::core::series::SeriesPoint;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One forecasted period with an optional prediction interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub period: DateTime<Utc>,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
}

impl ForecastPoint {
    pub fn new(period: DateTime<Utc>, value: f64) -> Self {
        Self {
            period,
            value,
            lower_bound: None,
            upper_bound: None,
        }
    }
}

/// Model identity and fitted parameters, tagged for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelMeta {
    DoubleExponential {
        alpha: f64,
        beta: f64,
    },
    TripleExponential {
        alpha: f64,
        beta: f64,
        gamma: f64,
        season_length: usize,
    },
    LinearRegression {
        slope: f64,
        intercept: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        r_squared: Option<f64>,
    },
    Ensemble {
        members: Vec<String>,
    },
}

/// Fit-error summary backing a prediction interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorMetrics {
    /// Mean absolute error of fitted vs. actual.
    pub mae: f64,
    /// Standard deviation of the absolute fit errors.
    pub std_dev_error: f64,
}

/// A complete forecast: history, in-sample fit, future points, and model
/// metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastOutput {
    /// The observed series the model consumed.
    pub historical: Vec<SeriesPoint>,
    /// Fitted/smoothed values aligned 1:1 with `historical`.
    pub fitted: Vec<f64>,
    /// Future points, one per horizon step.
    pub forecast: Vec<ForecastPoint>,
    pub model: ModelMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_metrics: Option<ErrorMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<f64>,
}

impl ForecastOutput {
    pub fn horizon(&self) -> usize {
        self.forecast.len()
    }

    /// Point forecast values without periods or bounds.
    pub fn forecast_values(&self) -> Vec<f64> {
        self.forecast.iter().map(|p| p.value).collect()
    }

    pub fn has_intervals(&self) -> bool {
        self.forecast
            .iter()
            .all(|p| p.lower_bound.is_some() && p.upper_bound.is_some())
            && !self.forecast.is_empty()
    }
}
