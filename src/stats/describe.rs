//! Full descriptive analysis of a single series.

use crate::core::TimeSeries;
use crate::error::{Result, TrendError};
use crate::stats::{mean, median, moving_average, std_dev, variance};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Moving-average windows reported by the analyzer.
const SHORT_WINDOW: usize = 7;
const LONG_WINDOW: usize = 30;

/// Global outlier threshold in standard deviations.
const OUTLIER_Z: f64 = 3.0;

/// Trend strength thresholds on |slope|.
const STRONG_SLOPE: f64 = 0.1;
const MODERATE_SLOPE: f64 = 0.01;

/// Basic distribution summary of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub count: usize,
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

impl SeriesSummary {
    /// Summarize a non-empty value slice.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(TrendError::InsufficientData { needed: 1, got: 0 });
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Ok(Self {
            count: values.len(),
            mean: mean(values),
            variance: variance(values),
            std_dev: std_dev(values),
            median: median(values),
            min,
            max,
            range: max - min,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Upward,
    Downward,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStrength {
    Strong,
    Moderate,
    Weak,
}

/// Least-squares linear fit over index positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    pub direction: TrendDirection,
    pub strength: TrendStrength,
}

impl TrendLine {
    fn classify(slope: f64, intercept: f64) -> Self {
        let direction = if slope > 0.0 {
            TrendDirection::Upward
        } else if slope < 0.0 {
            TrendDirection::Downward
        } else {
            TrendDirection::Stable
        };
        let strength = if slope.abs() > STRONG_SLOPE {
            TrendStrength::Strong
        } else if slope.abs() > MODERATE_SLOPE {
            TrendStrength::Moderate
        } else {
            TrendStrength::Weak
        };
        Self {
            slope,
            intercept,
            direction,
            strength,
        }
    }
}

/// A value more than [`OUTLIER_Z`] standard deviations from the mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Outlier {
    pub index: usize,
    pub period: DateTime<Utc>,
    pub value: f64,
    pub z_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverages {
    pub short_window: usize,
    pub long_window: usize,
    pub short: Vec<Option<f64>>,
    pub long: Vec<Option<f64>>,
}

/// Complete descriptive report for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub summary: SeriesSummary,
    /// Absent for a single-point series, where the slope is undefined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendLine>,
    /// Percentage growth `(last/first - 1) * 100`; absent when the first
    /// value is 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_rate: Option<f64>,
    pub moving_averages: MovingAverages,
    pub outliers: Vec<Outlier>,
}

/// Ordinary least squares of `values` against index positions 0..n-1.
///
/// Returns `(slope, intercept)`; requires at least two points.
pub(crate) fn linear_fit(values: &[f64]) -> Option<(f64, f64)> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let nf = n as f64;
    let sum_x: f64 = (0..n).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, &y)| i as f64 * y).sum();
    let sum_xx: f64 = (0..n).map(|i| (i * i) as f64).sum();

    let denom = nf * sum_xx - sum_x * sum_x;
    if denom == 0.0 {
        return None;
    }
    let slope = (nf * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / nf;
    Some((slope, intercept))
}

/// Analyze a series: summary stats, trend, growth, moving averages,
/// outliers.
pub fn analyze(series: &TimeSeries) -> Result<StatisticsReport> {
    let values = series.values();
    let summary = SeriesSummary::from_values(values)?;

    let trend = linear_fit(values).map(|(slope, intercept)| TrendLine::classify(slope, intercept));

    let first = values[0];
    let last = values[values.len() - 1];
    let growth_rate = if first == 0.0 {
        None
    } else {
        Some((last / first - 1.0) * 100.0)
    };

    let moving_averages = MovingAverages {
        short_window: SHORT_WINDOW,
        long_window: LONG_WINDOW,
        short: moving_average(values, SHORT_WINDOW),
        long: moving_average(values, LONG_WINDOW),
    };

    let mut outliers = Vec::new();
    if summary.std_dev > 0.0 {
        for (i, (&v, point)) in values.iter().zip(series.points()).enumerate() {
            let z = (v - summary.mean) / summary.std_dev;
            if z.abs() > OUTLIER_Z {
                outliers.push(Outlier {
                    index: i,
                    period: point.period,
                    value: v,
                    z_score: z,
                });
            }
        }
    }

    Ok(StatisticsReport {
        summary,
        trend,
        growth_rate,
        moving_averages,
        outliers,
    })
}
