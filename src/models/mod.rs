//! Forecasting models.

mod ensemble;
mod holt;
mod holt_winters;
mod intervals;
mod regression;

pub use ensemble::{ensemble_forecast, EnsembleForecast};
pub use holt::DoubleExponentialSmoothing;
pub use holt_winters::{TripleExponentialSmoothing, DEFAULT_SEASON_LENGTH};
pub use intervals::{apply_intervals, ConfidenceLevel};
pub use regression::LinearRegression;

use crate::core::{ForecastOutput, ForecastPoint, ModelMeta, TimeSeries};
use crate::error::{Result, TrendError};

/// Common interface for the forecasting models.
///
/// Object-safe so models can run behind `Box<dyn Forecaster>` in the
/// ensemble.
pub trait Forecaster {
    /// Fit the model to the series.
    fn fit(&mut self, series: &TimeSeries) -> Result<()>;

    /// Point forecast values for the given horizon, clamped to ≥ 0.
    fn predict(&self, horizon: usize) -> Result<Vec<f64>>;

    /// In-sample fitted/smoothed values, aligned 1:1 with the history.
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Model identity and fitted parameters.
    fn meta(&self) -> Result<ModelMeta>;

    /// Short stable model name, used in ensemble error reporting.
    fn name(&self) -> &'static str;

    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}

/// Fit a model and assemble a complete [`ForecastOutput`], with forecast
/// periods stepped from the last observation by the series timeframe.
pub fn fit_forecast(
    model: &mut dyn Forecaster,
    series: &TimeSeries,
    horizon: usize,
) -> Result<ForecastOutput> {
    model.fit(series)?;
    let values = model.predict(horizon)?;
    let fitted = model
        .fitted_values()
        .ok_or(TrendError::FitRequired)?
        .to_vec();

    let last = series.last_period().ok_or(TrendError::InsufficientData {
        needed: 1,
        got: 0,
    })?;
    let timeframe = series.timeframe();
    let forecast = values
        .into_iter()
        .enumerate()
        .map(|(k, value)| ForecastPoint::new(timeframe.advance(last, k + 1), value))
        .collect();

    Ok(ForecastOutput {
        historical: series.points().to_vec(),
        fitted,
        forecast,
        model: model.meta()?,
        error_metrics: None,
        confidence_level: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Term, Timeframe};
    use chrono::{TimeZone, Utc};

    fn make_series(counts: &[u64]) -> TimeSeries {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        TimeSeries::from_pairs(
            Term::new("test"),
            Timeframe::Daily,
            counts
                .iter()
                .enumerate()
                .map(|(i, &c)| (base + chrono::Duration::days(i as i64), c)),
        )
        .unwrap()
    }

    #[test]
    fn fit_forecast_steps_periods_by_timeframe() {
        let ts = make_series(&[5, 6, 7, 8, 9]);
        let mut model = DoubleExponentialSmoothing::default();
        let output = fit_forecast(&mut model, &ts, 3).unwrap();

        assert_eq!(output.horizon(), 3);
        assert_eq!(output.fitted.len(), 5);
        assert_eq!(output.historical.len(), 5);

        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(output.forecast[0].period, base + chrono::Duration::days(5));
        assert_eq!(output.forecast[2].period, base + chrono::Duration::days(7));
    }

    #[test]
    fn fit_forecast_works_through_trait_objects() {
        let ts = make_series(&[10, 12, 14, 16, 18, 20]);
        let mut models: Vec<Box<dyn Forecaster>> = vec![
            Box::new(DoubleExponentialSmoothing::default()),
            Box::new(LinearRegression::new()),
        ];

        for model in models.iter_mut() {
            let output = fit_forecast(model.as_mut(), &ts, 2).unwrap();
            assert_eq!(output.horizon(), 2);
        }
    }
}
