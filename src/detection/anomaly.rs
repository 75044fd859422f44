//! Spike/drop detection against a trailing rolling baseline.
//!
//! Each point is compared with the mean and standard deviation of the
//! `window` points strictly before it; the point itself is excluded so a
//! genuine spike cannot inflate its own baseline.

use crate::core::TimeSeries;
use crate::error::{Result, TrendError};
use crate::stats::{mean, std_dev};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Bounds multiplier: mean ± BAND_SIGMA × stddev.
const BAND_SIGMA: f64 = 3.0;

const MIN_WINDOW: usize = 7;
const MAX_WINDOW: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    Spike,
    Drop,
}

/// One flagged observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnomalyRecord {
    pub period: DateTime<Utc>,
    pub observed: f64,
    /// Rolling mean of the trailing window.
    pub expected: f64,
    /// Signed deviation in baseline standard deviations; infinite when the
    /// baseline has zero variance and the value still escapes the bounds.
    pub z_score: f64,
    pub kind: AnomalyKind,
}

/// Detection result, including the rolling baseline series for callers
/// that chart or audit the bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyReport {
    pub window: usize,
    /// Index of the first evaluated point; the rolling series start here.
    pub first_index: usize,
    pub anomalies: Vec<AnomalyRecord>,
    pub rolling_mean: Vec<f64>,
    pub rolling_std_dev: Vec<f64>,
}

/// Window size for a series of length `n`: n/3 rounded, clamped to 7..=30.
fn window_for(n: usize) -> usize {
    let raw = (n as f64 / 3.0).round() as usize;
    raw.clamp(MIN_WINDOW, MAX_WINDOW)
}

/// Scan a series for rolling-window spikes and drops.
pub fn detect_anomalies(series: &TimeSeries) -> Result<AnomalyReport> {
    let values = series.values();
    let n = values.len();
    let window = window_for(n);
    if n < window {
        return Err(TrendError::InsufficientData {
            needed: window,
            got: n,
        });
    }

    let mut anomalies = Vec::new();
    let mut rolling_mean = Vec::with_capacity(n - window + 1);
    let mut rolling_std_dev = Vec::with_capacity(n - window + 1);

    for i in window..n {
        let baseline = &values[i - window..i];
        let m = mean(baseline);
        let sd = std_dev(baseline);
        rolling_mean.push(m);
        rolling_std_dev.push(sd);

        let v = values[i];
        let upper = m + BAND_SIGMA * sd;
        let lower = m - BAND_SIGMA * sd;

        let kind = if v > upper {
            Some(AnomalyKind::Spike)
        } else if v < lower {
            Some(AnomalyKind::Drop)
        } else {
            None
        };

        if let Some(kind) = kind {
            let z = if sd > 0.0 {
                (v - m) / sd
            } else if v > m {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            };
            anomalies.push(AnomalyRecord {
                period: series.points()[i].period,
                observed: v,
                expected: m,
                z_score: z,
                kind,
            });
        }
    }

    Ok(AnomalyReport {
        window,
        first_index: window,
        anomalies,
        rolling_mean,
        rolling_std_dev,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Term, Timeframe};
    use approx::assert_relative_eq;
    use chrono::TimeZone;

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
    fn window_clamps_between_seven_and_thirty() {
        assert_eq!(window_for(10), 7);
        assert_eq!(window_for(45), 15);
        assert_eq!(window_for(300), 30);
    }

    #[test]
    fn short_series_fails_with_insufficient_data() {
        let ts = make_series(&[1, 2, 3]);
        assert!(matches!(
            detect_anomalies(&ts),
            Err(TrendError::InsufficientData { needed: 7, got: 3 })
        ));
    }

    #[test]
    fn spike_after_flat_baseline_is_flagged() {
        let ts = make_series(&[10, 10, 10, 10, 10, 10, 10, 100, 10, 10]);
        let report = detect_anomalies(&ts).unwrap();

        assert_eq!(report.window, 7);
        let spike = report
            .anomalies
            .iter()
            .find(|a| a.kind == AnomalyKind::Spike)
            .expect("spike should be flagged");
        assert_relative_eq!(spike.observed, 100.0, epsilon = 1e-10);
        assert!(spike.z_score > 3.0);
    }

    #[test]
    fn drop_below_lower_bound_is_flagged() {
        let mut counts: Vec<u64> = (0..20).map(|i| 100 + (i % 3)).collect();
        counts[15] = 1;
        let ts = make_series(&counts);
        let report = detect_anomalies(&ts).unwrap();

        let drop = report
            .anomalies
            .iter()
            .find(|a| a.kind == AnomalyKind::Drop)
            .expect("drop should be flagged");
        assert_relative_eq!(drop.observed, 1.0, epsilon = 1e-10);
        assert!(drop.z_score < -3.0);
    }

    #[test]
    fn steady_series_has_no_anomalies() {
        let counts: Vec<u64> = (0..30).map(|i| 50 + (i % 5)).collect();
        let ts = make_series(&counts);
        let report = detect_anomalies(&ts).unwrap();
        assert!(report.anomalies.is_empty());
    }

    #[test]
    fn rolling_series_cover_every_evaluated_index() {
        let counts: Vec<u64> = (0..21).map(|i| 10 + i).collect();
        let ts = make_series(&counts);
        let report = detect_anomalies(&ts).unwrap();

        assert_eq!(report.first_index, report.window);
        assert_eq!(report.rolling_mean.len(), counts.len() - report.window);
        assert_eq!(report.rolling_std_dev.len(), counts.len() - report.window);
        // Baseline for the first evaluated index is the first `window`
        // values: 10..=16 for window 7.
        assert_relative_eq!(report.rolling_mean[0], 13.0, epsilon = 1e-10);
    }
}
