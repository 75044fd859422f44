//! Double exponential smoothing (Holt's linear trend).
//!
//! Suitable for series with a trend but no seasonality. Smoothing
//! constants are fixed, not fit from the data.

use crate::core::{ModelMeta, TimeSeries};
use crate::error::{Result, TrendError};
use crate::models::Forecaster;

/// Default level smoothing constant.
pub const DEFAULT_ALPHA: f64 = 0.7;
/// Default trend smoothing constant.
pub const DEFAULT_BETA: f64 = 0.3;

/// Holt's linear-trend forecaster.
///
/// - Level: `l_t = α·y_t + (1-α)·(l_{t-1} + b_{t-1})`
/// - Trend: `b_t = β·(l_t - l_{t-1}) + (1-β)·b_{t-1}`
/// - Forecast: `ŷ_{t+h} = max(0, l_t + h·b_t)`
///
/// The smoothed history is the running level after each update; its first
/// entry is the initial level `y_0`.
#[derive(Debug, Clone)]
pub struct DoubleExponentialSmoothing {
    alpha: f64,
    beta: f64,
    level: Option<f64>,
    trend: Option<f64>,
    smoothed: Option<Vec<f64>>,
}

impl DoubleExponentialSmoothing {
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self {
            alpha,
            beta,
            level: None,
            trend: None,
            smoothed: None,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Final level state after fitting.
    pub fn level(&self) -> Option<f64> {
        self.level
    }

    /// Final trend state after fitting.
    pub fn trend(&self) -> Option<f64> {
        self.trend
    }
}

impl Default for DoubleExponentialSmoothing {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA, DEFAULT_BETA)
    }
}

impl Forecaster for DoubleExponentialSmoothing {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.values();
        if values.len() < 2 {
            return Err(TrendError::InsufficientData {
                needed: 2,
                got: values.len(),
            });
        }

        let mut level = values[0];
        let mut trend = values[1] - values[0];

        let mut smoothed = Vec::with_capacity(values.len());
        smoothed.push(level);

        for &y in values.iter().skip(1) {
            let prev_level = level;
            level = self.alpha * y + (1.0 - self.alpha) * (level + trend);
            trend = self.beta * (level - prev_level) + (1.0 - self.beta) * trend;
            smoothed.push(level);
        }

        self.level = Some(level);
        self.trend = Some(trend);
        self.smoothed = Some(smoothed);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let level = self.level.ok_or(TrendError::FitRequired)?;
        let trend = self.trend.ok_or(TrendError::FitRequired)?;

        Ok((1..=horizon)
            .map(|h| (level + h as f64 * trend).max(0.0))
            .collect())
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.smoothed.as_deref()
    }

    fn meta(&self) -> Result<ModelMeta> {
        if self.level.is_none() {
            return Err(TrendError::FitRequired);
        }
        Ok(ModelMeta::DoubleExponential {
            alpha: self.alpha,
            beta: self.beta,
        })
    }

    fn name(&self) -> &'static str {
        "double_exponential"
    }
}
