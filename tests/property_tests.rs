//! End-to-end behavioral properties of the analysis and forecasting
//! components, exercised through the public API.

use approx::assert_relative_eq;
use chrono::{DateTime, TimeZone, Utc};
use trendcast::prelude::*;
use trendcast::similarity::{dtw_distance, pearson};
use trendcast::stats::moving_average;

fn day(i: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(i)
}

fn make_series(counts: &[u64]) -> TimeSeries {
    TimeSeries::from_pairs(
        Term::new("test"),
        Timeframe::Daily,
        counts.iter().enumerate().map(|(i, &c)| (day(i as i64), c)),
    )
    .unwrap()
}

#[test]
fn constant_series_forecasts_the_constant() {
    let ts = make_series(&[42; 15]);
    let mut model = DoubleExponentialSmoothing::default();
    let output = fit_forecast(&mut model, &ts, 10).unwrap();

    for point in &output.forecast {
        assert_relative_eq!(point.value, 42.0, epsilon = 1e-9);
    }
    assert_relative_eq!(model.trend().unwrap(), 0.0, epsilon = 1e-12);
}

#[test]
fn linear_series_yields_exact_regression() {
    let ts = make_series(&[1, 2, 3, 4, 5]);
    let mut model = LinearRegression::new();
    let output = fit_forecast(&mut model, &ts, 2).unwrap();

    assert_relative_eq!(model.slope().unwrap(), 1.0, epsilon = 1e-10);
    assert_relative_eq!(model.intercept().unwrap(), 1.0, epsilon = 1e-10);
    assert_relative_eq!(model.r_squared().unwrap(), 1.0, epsilon = 1e-10);
    assert_relative_eq!(output.forecast[0].value, 6.0, epsilon = 1e-10);
    assert_relative_eq!(output.forecast[1].value, 7.0, epsilon = 1e-10);
}

#[test]
fn pearson_self_correlation_is_one_and_symmetric() {
    let a: Vec<f64> = (0..20).map(|i| (10 + (i * i) % 13) as f64).collect();
    let b: Vec<f64> = (0..20).map(|i| (5 + (i * 3) % 11) as f64).collect();

    assert_relative_eq!(pearson(&a, &a), 1.0, epsilon = 1e-10);
    assert_relative_eq!(pearson(&a, &b), pearson(&b, &a), epsilon = 1e-12);
}

#[test]
fn dtw_self_distance_is_zero() {
    let a: Vec<f64> = (0..25).map(|i| (i as f64 * 0.7).sin() * 10.0 + 20.0).collect();
    assert_relative_eq!(dtw_distance(&a, &a), 0.0, epsilon = 1e-12);
}

#[test]
fn window_one_moving_average_is_identity() {
    let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
    let averaged = moving_average(&values, 1);
    for (avg, &v) in averaged.iter().zip(values.iter()) {
        assert_relative_eq!(avg.unwrap(), v, epsilon = 1e-12);
    }
}

#[test]
fn isolated_spike_is_flagged_with_high_z() {
    let ts = make_series(&[10, 10, 10, 10, 10, 10, 10, 100, 10, 10]);
    let report = detect_anomalies(&ts).unwrap();

    assert_eq!(report.window, 7);
    let spike = report
        .anomalies
        .iter()
        .find(|a| a.observed == 100.0)
        .expect("the 100 must be flagged");
    assert_eq!(spike.kind, AnomalyKind::Spike);
    assert!(spike.z_score > 3.0);
}

#[test]
fn ensemble_is_the_mean_of_its_members() {
    // Four weekly cycles, enough for all three models to fit.
    let counts: Vec<u64> = (0..28)
        .map(|i| [10u64, 12, 11, 13, 15, 30, 28][i % 7] + i as u64)
        .collect();
    let ts = make_series(&counts);
    let horizon = 5;

    let mut holt = DoubleExponentialSmoothing::default();
    let mut seasonal = TripleExponentialSmoothing::default();
    let mut linear = LinearRegression::new();
    let holt_out = fit_forecast(&mut holt, &ts, horizon).unwrap();
    let seasonal_out = fit_forecast(&mut seasonal, &ts, horizon).unwrap();
    let linear_out = fit_forecast(&mut linear, &ts, horizon).unwrap();

    let combined = ensemble_forecast(&ts, horizon).unwrap();
    match &combined.model {
        ModelMeta::Ensemble { members } => assert_eq!(members.len(), 3),
        other => panic!("expected ensemble metadata, got {other:?}"),
    }

    for k in 0..horizon {
        let expected = (holt_out.forecast[k].value
            + seasonal_out.forecast[k].value
            + linear_out.forecast[k].value)
            / 3.0;
        assert_relative_eq!(combined.forecast[k].value, expected, epsilon = 1e-9);
    }
}

#[test]
fn interval_half_width_grows_with_horizon() {
    let counts: Vec<u64> = (0..40).map(|i| 50 + ((i * 13) % 17) as u64).collect();
    let ts = make_series(&counts);

    let mut output = ensemble_forecast(&ts, 10).unwrap();
    apply_intervals(&mut output, &ts, ConfidenceLevel::P95).unwrap();

    let mut previous = 0.0;
    for point in &output.forecast {
        let lower = point.lower_bound.unwrap();
        let upper = point.upper_bound.unwrap();
        let half_width = (upper - lower) / 2.0;
        assert!(half_width > previous, "half-width must strictly increase");
        assert!(lower >= 0.0);
        previous = half_width;
    }
}

#[test]
fn statistics_on_empty_and_single_point_series() {
    let empty = make_series(&[]);
    assert!(matches!(
        analyze(&empty),
        Err(TrendError::InsufficientData { .. })
    ));

    let single = make_series(&[7]);
    let report = analyze(&single).unwrap();
    assert_relative_eq!(report.summary.mean, 7.0, epsilon = 1e-12);
    assert_relative_eq!(report.summary.median, 7.0, epsilon = 1e-12);
    assert_relative_eq!(report.summary.min, 7.0, epsilon = 1e-12);
    assert_relative_eq!(report.summary.max, 7.0, epsilon = 1e-12);
    // Slope of a single point is undefined, not an error.
    assert!(report.trend.is_none());
}

#[test]
fn short_overlap_rejects_similarity() {
    let a = make_series(&[1, 2, 3, 4, 5]);
    let b = make_series(&[5, 4, 3, 2, 1]);
    assert!(matches!(
        compare(&a, &b),
        Err(TrendError::InsufficientOverlap { .. })
    ));
}
