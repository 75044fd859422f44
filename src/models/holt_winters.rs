//! Triple exponential smoothing (Holt-Winters, multiplicative).
//!
//! Extends the Holt recurrence with a multiplicative seasonal component.
//! Smoothing constants and the season length are fixed at construction.

use crate::core::{ModelMeta, TimeSeries};
use crate::error::{Result, TrendError};
use crate::models::Forecaster;

pub const DEFAULT_ALPHA: f64 = 0.7;
pub const DEFAULT_BETA: f64 = 0.3;
/// Default seasonal smoothing constant.
pub const DEFAULT_GAMMA: f64 = 0.4;
/// Default season length (one week of daily buckets).
pub const DEFAULT_SEASON_LENGTH: usize = 7;

/// Multiplicative Holt-Winters forecaster.
///
/// - Level: `l_t = α·(y_t / s_{t-m}) + (1-α)·(l_{t-1} + b_{t-1})`
/// - Trend: `b_t = β·(l_t - l_{t-1}) + (1-β)·b_{t-1}`
/// - Seasonal: `s_t = γ·(y_t / l_t) + (1-γ)·s_{t-m}`
/// - Forecast: `ŷ_{t+h} = max(0, (l_t + h·b_t)·s)` at phase `(n+h-1) mod m`
///
/// Requires at least two full seasons of history; callers should fetch
/// four or more seasons for a stable seasonal profile.
#[derive(Debug, Clone)]
pub struct TripleExponentialSmoothing {
    alpha: f64,
    beta: f64,
    gamma: f64,
    season_length: usize,
    level: Option<f64>,
    trend: Option<f64>,
    seasonals: Option<Vec<f64>>,
    smoothed: Option<Vec<f64>>,
    n: usize,
}

impl TripleExponentialSmoothing {
    pub fn new(alpha: f64, beta: f64, gamma: f64, season_length: usize) -> Self {
        Self {
            alpha,
            beta,
            gamma,
            season_length,
            level: None,
            trend: None,
            seasonals: None,
            smoothed: None,
            n: 0,
        }
    }

    /// Default constants with a caller-supplied season length.
    pub fn with_season_length(season_length: usize) -> Self {
        Self::new(DEFAULT_ALPHA, DEFAULT_BETA, DEFAULT_GAMMA, season_length)
    }

    pub fn season_length(&self) -> usize {
        self.season_length
    }

    /// Seasonal indices after fitting, one per phase.
    pub fn seasonals(&self) -> Option<&[f64]> {
        self.seasonals.as_deref()
    }

    /// Per-phase averages over the whole series, normalized so the
    /// indices sum to the season length. Normalization is skipped when
    /// the raw sum is 0 (an all-zero series).
    fn initial_seasonals(values: &[f64], period: usize) -> Vec<f64> {
        let mut seasonals = vec![0.0; period];
        for phase in 0..period {
            let mut sum = 0.0;
            let mut count = 0usize;
            let mut i = phase;
            while i < values.len() {
                sum += values[i];
                count += 1;
                i += period;
            }
            seasonals[phase] = sum / count as f64;
        }

        let total: f64 = seasonals.iter().sum();
        if total != 0.0 {
            let scale = period as f64 / total;
            for s in seasonals.iter_mut() {
                *s *= scale;
            }
        }
        seasonals
    }
}

impl Default for TripleExponentialSmoothing {
    fn default() -> Self {
        Self::with_season_length(DEFAULT_SEASON_LENGTH)
    }
}

impl Forecaster for TripleExponentialSmoothing {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        if self.season_length == 0 {
            return Err(TrendError::InvalidParameter(
                "season length must be positive".to_string(),
            ));
        }

        let values = series.values();
        let m = self.season_length;
        if values.len() < 2 * m {
            return Err(TrendError::InsufficientSeasonalData {
                needed: 2 * m,
                got: values.len(),
            });
        }

        let mut seasonals = Self::initial_seasonals(values, m);
        let mut level = values[0];
        let mut trend = (values[m] - values[0]) / m as f64;

        let mut smoothed = Vec::with_capacity(values.len());
        smoothed.push(level * seasonals[0]);

        for (i, &y) in values.iter().enumerate().skip(1) {
            let phase = i % m;
            // A zero seasonal index or zero level would divide by zero;
            // treat the factor as neutral instead.
            let season = if seasonals[phase] != 0.0 {
                seasonals[phase]
            } else {
                1.0
            };

            let prev_level = level;
            level = self.alpha * (y / season) + (1.0 - self.alpha) * (level + trend);
            trend = self.beta * (level - prev_level) + (1.0 - self.beta) * trend;
            let deseason = if level != 0.0 { y / level } else { 1.0 };
            seasonals[phase] = self.gamma * deseason + (1.0 - self.gamma) * seasonals[phase];

            smoothed.push(level * seasonals[phase]);
        }

        self.level = Some(level);
        self.trend = Some(trend);
        self.seasonals = Some(seasonals);
        self.smoothed = Some(smoothed);
        self.n = values.len();
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let level = self.level.ok_or(TrendError::FitRequired)?;
        let trend = self.trend.ok_or(TrendError::FitRequired)?;
        let seasonals = self.seasonals.as_ref().ok_or(TrendError::FitRequired)?;
        let m = self.season_length;

        Ok((1..=horizon)
            .map(|h| {
                let phase = (self.n + h - 1) % m;
                ((level + h as f64 * trend) * seasonals[phase]).max(0.0)
            })
            .collect())
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.smoothed.as_deref()
    }

    fn meta(&self) -> Result<ModelMeta> {
        if self.level.is_none() {
            return Err(TrendError::FitRequired);
        }
        Ok(ModelMeta::TripleExponential {
            alpha: self.alpha,
            beta: self.beta,
            gamma: self.gamma,
            season_length: self.season_length,
        })
    }

    fn name(&self) -> &'static str {
        "triple_exponential"
    }
}
