//! Prediction intervals derived from historical fit error.

use crate::core::{ErrorMetrics, ForecastOutput, TimeSeries};
use crate::error::{Result, TrendError};
use crate::stats::{mean, moving_average, std_dev};
use serde::Serialize;

/// Interval widening per horizon step.
const HORIZON_GROWTH: f64 = 0.05;

/// Window for the moving-average fit proxy when a model has no fitted
/// values of its own.
const PROXY_WINDOW: usize = 7;

/// Supported confidence levels and their normal z-scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ConfidenceLevel {
    #[serde(rename = "0.90")]
    P90,
    #[default]
    #[serde(rename = "0.95")]
    P95,
    #[serde(rename = "0.99")]
    P99,
}

impl ConfidenceLevel {
    pub fn z_score(&self) -> f64 {
        match self {
            ConfidenceLevel::P90 => 1.645,
            ConfidenceLevel::P95 => 1.96,
            ConfidenceLevel::P99 => 2.576,
        }
    }

    pub fn level(&self) -> f64 {
        match self {
            ConfidenceLevel::P90 => 0.90,
            ConfidenceLevel::P95 => 0.95,
            ConfidenceLevel::P99 => 0.99,
        }
    }
}

/// Moving-average stand-in for fitted values. The leading undefined slots
/// are back-filled with the first computed average so every residual is
/// defined.
fn fitted_proxy(values: &[f64]) -> Vec<f64> {
    let window = PROXY_WINDOW.min(values.len()).max(1);
    let averages = moving_average(values, window);
    let first = averages
        .iter()
        .flatten()
        .next()
        .copied()
        .unwrap_or(values[0]);
    averages.into_iter().map(|a| a.unwrap_or(first)).collect()
}

/// Attach lower/upper bounds to every forecast point, widening with the
/// horizon, and record the fit-error metrics on the output.
///
/// The error baseline is the model's own fitted history when present,
/// otherwise a moving-average proxy over the observed series.
pub fn apply_intervals(
    output: &mut ForecastOutput,
    series: &TimeSeries,
    confidence: ConfidenceLevel,
) -> Result<()> {
    let actual = series.values();
    if actual.is_empty() {
        return Err(TrendError::InsufficientData { needed: 1, got: 0 });
    }

    let baseline: Vec<f64> = if output.fitted.len() == actual.len() && !output.fitted.is_empty() {
        output.fitted.clone()
    } else {
        fitted_proxy(actual)
    };

    let abs_errors: Vec<f64> = actual
        .iter()
        .zip(baseline.iter())
        .map(|(a, f)| (a - f).abs())
        .collect();
    let mae = mean(&abs_errors);
    let std_dev_error = std_dev(&abs_errors);

    let z = confidence.z_score();
    for (k, point) in output.forecast.iter_mut().enumerate() {
        let half_width = std_dev_error * z * (1.0 + HORIZON_GROWTH * k as f64);
        point.lower_bound = Some((point.value - half_width).max(0.0));
        point.upper_bound = Some(point.value + half_width);
    }

    output.error_metrics = Some(ErrorMetrics { mae, std_dev_error });
    output.confidence_level = Some(confidence.level());
    Ok(())
}
