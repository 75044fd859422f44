//! High-level facade wiring the store, cache, and analysis components.

use crate::core::{ForecastOutput, Term, TimeSeries, Timeframe};
use crate::detection::{detect_anomalies, AnomalyReport};
use crate::error::Result;
use crate::models::{
    apply_intervals, ensemble_forecast, fit_forecast, ConfidenceLevel, DoubleExponentialSmoothing,
    LinearRegression, TripleExponentialSmoothing, DEFAULT_SEASON_LENGTH,
};
use crate::similarity::{compare, CorrelationMatrix, SimilarityReport};
use crate::stats::{analyze, StatisticsReport};
use crate::store::{SeriesCache, SeriesStore};
use tracing::debug;

/// Default number of periods fetched per analysis.
pub const DEFAULT_FETCH_LIMIT: usize = 90;

/// Minimum seasons of history requested for seasonal forecasts.
const MIN_SEASONS: usize = 4;

/// One-stop entry point over a [`SeriesStore`].
///
/// Owns a per-term [`SeriesCache`], so repeated operations on the same
/// term reuse the fetched series instead of hitting the store again.
pub struct TrendAnalyzer<S: SeriesStore> {
    store: S,
    cache: SeriesCache,
    fetch_limit: usize,
}

impl<S: SeriesStore> TrendAnalyzer<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: SeriesCache::new(),
            fetch_limit: DEFAULT_FETCH_LIMIT,
        }
    }

    pub fn with_fetch_limit(store: S, fetch_limit: usize) -> Self {
        Self {
            store,
            cache: SeriesCache::new(),
            fetch_limit,
        }
    }

    fn fetch(&mut self, term: &Term, timeframe: Timeframe) -> Result<&TimeSeries> {
        self.cache.fetch(&self.store, term, timeframe, self.fetch_limit)
    }

    fn fetch_at_least(
        &mut self,
        term: &Term,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<&TimeSeries> {
        let limit = self.fetch_limit.max(limit);
        self.cache.fetch(&self.store, term, timeframe, limit)
    }

    /// Descriptive statistics, trend line, and global outliers.
    pub fn statistics(&mut self, term: &Term, timeframe: Timeframe) -> Result<StatisticsReport> {
        let series = self.fetch(term, timeframe)?;
        analyze(series)
    }

    /// Rolling-window spike and drop detection.
    pub fn anomalies(&mut self, term: &Term, timeframe: Timeframe) -> Result<AnomalyReport> {
        let series = self.fetch(term, timeframe)?;
        detect_anomalies(series)
    }

    /// Double exponential smoothing forecast.
    pub fn forecast_holt(
        &mut self,
        term: &Term,
        timeframe: Timeframe,
        horizon: usize,
    ) -> Result<ForecastOutput> {
        let series = self.fetch(term, timeframe)?;
        let mut model = DoubleExponentialSmoothing::default();
        fit_forecast(&mut model, series, horizon)
    }

    /// Seasonal (Holt-Winters multiplicative) forecast. Requests at
    /// least four seasons of history from the store.
    pub fn forecast_seasonal(
        &mut self,
        term: &Term,
        timeframe: Timeframe,
        season_length: usize,
        horizon: usize,
    ) -> Result<ForecastOutput> {
        let series = self.fetch_at_least(term, timeframe, MIN_SEASONS * season_length)?;
        let mut model = TripleExponentialSmoothing::with_season_length(season_length);
        fit_forecast(&mut model, series, horizon)
    }

    /// Ordinary least squares trend forecast.
    pub fn forecast_linear(
        &mut self,
        term: &Term,
        timeframe: Timeframe,
        horizon: usize,
    ) -> Result<ForecastOutput> {
        let series = self.fetch(term, timeframe)?;
        let mut model = LinearRegression::new();
        fit_forecast(&mut model, series, horizon)
    }

    /// Combined forecast averaging the available models.
    pub fn ensemble(
        &mut self,
        term: &Term,
        timeframe: Timeframe,
        horizon: usize,
    ) -> Result<ForecastOutput> {
        let series = self.fetch_at_least(term, timeframe, MIN_SEASONS * DEFAULT_SEASON_LENGTH)?;
        ensemble_forecast(series, horizon)
    }

    /// Ensemble forecast with prediction intervals at the given
    /// confidence level.
    pub fn forecast_with_intervals(
        &mut self,
        term: &Term,
        timeframe: Timeframe,
        horizon: usize,
        confidence: ConfidenceLevel,
    ) -> Result<ForecastOutput> {
        let series = self
            .fetch_at_least(term, timeframe, MIN_SEASONS * DEFAULT_SEASON_LENGTH)?
            .clone();
        let mut output = ensemble_forecast(&series, horizon)?;
        apply_intervals(&mut output, &series, confidence)?;
        Ok(output)
    }

    /// Full similarity comparison between two terms.
    pub fn similarity(
        &mut self,
        a: &Term,
        b: &Term,
        timeframe: Timeframe,
    ) -> Result<SimilarityReport> {
        let series_a = self.fetch(a, timeframe)?.clone();
        let series_b = self.fetch(b, timeframe)?;
        compare(&series_a, series_b)
    }

    /// Pairwise Pearson correlation matrix over a set of terms.
    pub fn correlation_matrix(
        &mut self,
        terms: &[Term],
        timeframe: Timeframe,
    ) -> Result<CorrelationMatrix> {
        debug!(count = terms.len(), ?timeframe, "building correlation matrix");
        let mut series = Vec::with_capacity(terms.len());
        for term in terms {
            series.push(self.fetch(term, timeframe)?.clone());
        }
        Ok(CorrelationMatrix::build(&series))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ModelMeta;
    use crate::store::MemoryStore;
    use chrono::{DateTime, TimeZone, Utc};

    fn day(i: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(i)
    }

    fn seeded_store(entries: &[(&str, Vec<u64>)]) -> MemoryStore {
        let mut store = MemoryStore::new();
        for (name, counts) in entries {
            let series = TimeSeries::from_pairs(
                Term::new(*name),
                Timeframe::Daily,
                counts.iter().enumerate().map(|(i, &c)| (day(i as i64), c)),
            )
            .unwrap();
            store.insert(&series);
        }
        store
    }

    fn rising(n: usize) -> Vec<u64> {
        (0..n).map(|i| 10 + i as u64).collect()
    }

    #[test]
    fn statistics_through_the_facade() {
        let store = seeded_store(&[("rust", rising(30))]);
        let mut analyzer = TrendAnalyzer::new(store);
        let report = analyzer
            .statistics(&Term::new("rust"), Timeframe::Daily)
            .unwrap();
        assert_eq!(report.summary.count, 30);
    }

    #[test]
    fn anomalies_through_the_facade() {
        let mut counts = vec![10u64; 20];
        counts.push(500);
        counts.push(10);
        let store = seeded_store(&[("rust", counts)]);
        let mut analyzer = TrendAnalyzer::new(store);
        let report = analyzer
            .anomalies(&Term::new("rust"), Timeframe::Daily)
            .unwrap();
        assert!(!report.anomalies.is_empty());
    }

    #[test]
    fn each_model_forecasts_through_the_facade() {
        let store = seeded_store(&[("rust", rising(40))]);
        let mut analyzer = TrendAnalyzer::new(store);
        let term = Term::new("rust");

        let holt = analyzer.forecast_holt(&term, Timeframe::Daily, 5).unwrap();
        assert_eq!(holt.horizon(), 5);
        assert!(matches!(holt.model, ModelMeta::DoubleExponential { .. }));

        let seasonal = analyzer
            .forecast_seasonal(&term, Timeframe::Daily, 7, 5)
            .unwrap();
        assert!(matches!(
            seasonal.model,
            ModelMeta::TripleExponential { .. }
        ));

        let linear = analyzer.forecast_linear(&term, Timeframe::Daily, 5).unwrap();
        assert!(matches!(linear.model, ModelMeta::LinearRegression { .. }));

        let ensemble = analyzer.ensemble(&term, Timeframe::Daily, 5).unwrap();
        assert!(matches!(ensemble.model, ModelMeta::Ensemble { .. }));
    }

    #[test]
    fn intervals_attach_bounds_and_metrics() {
        let store = seeded_store(&[("rust", rising(40))]);
        let mut analyzer = TrendAnalyzer::new(store);
        let output = analyzer
            .forecast_with_intervals(
                &Term::new("rust"),
                Timeframe::Daily,
                5,
                ConfidenceLevel::P95,
            )
            .unwrap();
        assert!(output.has_intervals());
        assert!(output.error_metrics.is_some());
        assert_eq!(output.confidence_level, Some(0.95));
    }

    #[test]
    fn similarity_and_matrix_through_the_facade() {
        let store = seeded_store(&[
            ("a", rising(30)),
            ("b", rising(30).iter().map(|v| v * 2).collect()),
        ]);
        let mut analyzer = TrendAnalyzer::new(store);

        let report = analyzer
            .similarity(&Term::new("a"), &Term::new("b"), Timeframe::Daily)
            .unwrap();
        assert!(report.correlation > 0.99);

        let matrix = analyzer
            .correlation_matrix(&[Term::new("a"), Term::new("b")], Timeframe::Daily)
            .unwrap();
        assert!(matrix.get("a", "b").unwrap() > 0.99);
    }

    #[test]
    fn missing_term_surfaces_store_error() {
        let store = seeded_store(&[]);
        let mut analyzer = TrendAnalyzer::new(store);
        let err = analyzer
            .statistics(&Term::new("ghost"), Timeframe::Daily)
            .unwrap_err();
        assert!(matches!(err, crate::error::TrendError::StoreUnavailable(_)));
    }
}
