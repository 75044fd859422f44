//! Multi-model ensemble forecasting.
//!
//! Double exponential smoothing and linear regression always run; the
//! seasonal model joins opportunistically when the series carries enough
//! history for it. Member forecasts are combined with an unweighted
//! arithmetic mean.

use crate::core::{ForecastOutput, ForecastPoint, ModelMeta, TimeSeries};
use crate::error::{Result, TrendError};
use crate::models::{
    DoubleExponentialSmoothing, Forecaster, LinearRegression, TripleExponentialSmoothing,
};

/// Ensemble runner over the three forecast models.
pub struct EnsembleForecast {
    season_length: usize,
}

impl EnsembleForecast {
    pub fn new(season_length: usize) -> Self {
        Self { season_length }
    }

    /// Run the ensemble: both mandatory members must succeed; the
    /// seasonal member is included only if it fits.
    pub fn run(&self, series: &TimeSeries, horizon: usize) -> Result<ForecastOutput> {
        let mut members: Vec<Box<dyn Forecaster>> = Vec::with_capacity(3);

        let mut holt = DoubleExponentialSmoothing::default();
        holt.fit(series).map_err(|e| member_error(&holt, e))?;
        members.push(Box::new(holt));

        let mut regression = LinearRegression::new();
        regression
            .fit(series)
            .map_err(|e| member_error(&regression, e))?;
        members.push(Box::new(regression));

        let mut seasonal = TripleExponentialSmoothing::with_season_length(self.season_length);
        if seasonal.fit(series).is_ok() {
            members.push(Box::new(seasonal));
        }

        let member_names: Vec<String> = members.iter().map(|m| m.name().to_string()).collect();

        let forecasts: Vec<Vec<f64>> = members
            .iter()
            .map(|m| m.predict(horizon))
            .collect::<Result<_>>()?;
        let combined = mean_by_step(&forecasts, horizon);

        let fitted_series: Vec<&[f64]> = members
            .iter()
            .filter_map(|m| m.fitted_values())
            .collect();
        let fitted = mean_fitted(&fitted_series, series.len());

        let last = series.last_period().ok_or(TrendError::InsufficientData {
            needed: 2,
            got: 0,
        })?;
        let timeframe = series.timeframe();
        let forecast = combined
            .into_iter()
            .enumerate()
            .map(|(k, value)| ForecastPoint::new(timeframe.advance(last, k + 1), value))
            .collect();

        Ok(ForecastOutput {
            historical: series.points().to_vec(),
            fitted,
            forecast,
            model: ModelMeta::Ensemble {
                members: member_names,
            },
            error_metrics: None,
            confidence_level: None,
        })
    }
}

impl Default for EnsembleForecast {
    fn default() -> Self {
        Self::new(crate::models::holt_winters::DEFAULT_SEASON_LENGTH)
    }
}

/// Run the default ensemble over a series.
pub fn ensemble_forecast(series: &TimeSeries, horizon: usize) -> Result<ForecastOutput> {
    EnsembleForecast::default().run(series, horizon)
}

fn member_error(model: &dyn Forecaster, source: TrendError) -> TrendError {
    TrendError::EnsembleMember {
        model: model.name().to_string(),
        source: Box::new(source),
    }
}

/// Arithmetic mean of the member forecasts at each horizon step.
fn mean_by_step(forecasts: &[Vec<f64>], horizon: usize) -> Vec<f64> {
    (0..horizon)
        .map(|h| forecasts.iter().map(|f| f[h]).sum::<f64>() / forecasts.len() as f64)
        .collect()
}

/// Per-index mean of the member fitted histories.
fn mean_fitted(fitted: &[&[f64]], n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| fitted.iter().map(|f| f[i]).sum::<f64>() / fitted.len() as f64)
        .collect()
}
