//! Ordinary least-squares trend model.

use crate::core::{ModelMeta, TimeSeries};
use crate::error::{Result, TrendError};
use crate::models::Forecaster;
use crate::stats::linear_fit;

/// Linear regression of counts against index positions 0..n-1.
///
/// The fitted value at index i is `intercept + slope·i`; the forecast at
/// step h continues the line from the last index.
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    slope: Option<f64>,
    intercept: Option<f64>,
    r_squared: Option<f64>,
    fitted: Option<Vec<f64>>,
    n: usize,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slope(&self) -> Option<f64> {
        self.slope
    }

    pub fn intercept(&self) -> Option<f64> {
        self.intercept
    }

    /// Coefficient of determination; `None` before fitting or for a
    /// constant series (zero total sum of squares).
    pub fn r_squared(&self) -> Option<f64> {
        self.r_squared
    }
}

impl Forecaster for LinearRegression {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.values();
        let n = values.len();
        // A single point leaves the slope undefined.
        if n < 2 {
            return Err(TrendError::InsufficientData { needed: 2, got: n });
        }

        let (slope, intercept) =
            linear_fit(values).ok_or(TrendError::InsufficientData { needed: 2, got: n })?;

        let fitted: Vec<f64> = (0..n).map(|i| intercept + slope * i as f64).collect();

        let mean_y = values.iter().sum::<f64>() / n as f64;
        let ss_tot: f64 = values.iter().map(|y| (y - mean_y).powi(2)).sum();
        let ss_res: f64 = values
            .iter()
            .zip(fitted.iter())
            .map(|(y, f)| (y - f).powi(2))
            .sum();
        let r_squared = if ss_tot == 0.0 {
            None
        } else {
            Some(1.0 - ss_res / ss_tot)
        };

        self.slope = Some(slope);
        self.intercept = Some(intercept);
        self.r_squared = r_squared;
        self.fitted = Some(fitted);
        self.n = n;
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let slope = self.slope.ok_or(TrendError::FitRequired)?;
        let intercept = self.intercept.ok_or(TrendError::FitRequired)?;
        let last_index = (self.n - 1) as f64;

        Ok((1..=horizon)
            .map(|h| (intercept + slope * (last_index + h as f64)).max(0.0))
            .collect())
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn meta(&self) -> Result<ModelMeta> {
        Ok(ModelMeta::LinearRegression {
            slope: self.slope.ok_or(TrendError::FitRequired)?,
            intercept: self.intercept.ok_or(TrendError::FitRequired)?,
            r_squared: self.r_squared,
        })
    }

    fn name(&self) -> &'static str {
        "linear_regression"
    }
}
