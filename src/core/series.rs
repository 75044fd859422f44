//! Term identifiers, timeframes, and the TimeSeries data structure.

use crate::error::{Result, TrendError};
use chrono::{DateTime, Duration, Months, Utc};
use serde::Serialize;

/// An opaque term being tracked, with an optional category tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Term {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
}

impl Term {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: None,
        }
    }

    pub fn with_category(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: Some(category.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Aggregation granularity of the bucketed event counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Hourly,
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Timeframe {
    /// Advance a period by a whole number of timeframe units.
    ///
    /// Months step by calendar month, not by a fixed day count.
    pub fn advance(&self, start: DateTime<Utc>, steps: usize) -> DateTime<Utc> {
        match self {
            Timeframe::Hourly => start + Duration::hours(steps as i64),
            Timeframe::Daily => start + Duration::days(steps as i64),
            Timeframe::Weekly => start + Duration::weeks(steps as i64),
            Timeframe::Monthly => start + Months::new(steps as u32),
        }
    }
}

/// A single observation: one period and its event count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub period: DateTime<Utc>,
    pub count: u64,
}

impl SeriesPoint {
    pub fn new(period: DateTime<Utc>, count: u64) -> Self {
        Self { period, count }
    }
}

/// An ordered series of event counts for one (Term, Timeframe).
///
/// Periods are strictly increasing with no duplicates. The series is
/// immutable after construction; counts are materialized once as `f64`
/// values for the numeric components.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    term: Term,
    timeframe: Timeframe,
    points: Vec<SeriesPoint>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a series, validating period ordering.
    pub fn new(term: Term, timeframe: Timeframe, points: Vec<SeriesPoint>) -> Result<Self> {
        for window in points.windows(2) {
            if window[1].period <= window[0].period {
                return Err(TrendError::PeriodError(
                    "periods must be strictly increasing".to_string(),
                ));
            }
        }

        let values = points.iter().map(|p| p.count as f64).collect();
        Ok(Self {
            term,
            timeframe,
            points,
            values,
        })
    }

    /// Convenience constructor from bare (period, count) pairs.
    pub fn from_pairs(
        term: Term,
        timeframe: Timeframe,
        pairs: impl IntoIterator<Item = (DateTime<Utc>, u64)>,
    ) -> Result<Self> {
        let points = pairs
            .into_iter()
            .map(|(period, count)| SeriesPoint::new(period, count))
            .collect();
        Self::new(term, timeframe, points)
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Counts as floats, aligned 1:1 with `points`.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn last_period(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(|p| p.period)
    }

    /// The period `steps` timeframe units after the last observation.
    pub fn future_period(&self, steps: usize) -> Option<DateTime<Utc>> {
        self.last_period()
            .map(|last| self.timeframe.advance(last, steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(i: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1 + i, 0, 0, 0).unwrap()
    }

    #[test]
    fn series_constructs_and_exposes_values() {
        let ts = TimeSeries::from_pairs(
            Term::new("rust"),
            Timeframe::Daily,
            (0..5).map(|i| (day(i), 10 + i as u64)),
        )
        .unwrap();

        assert_eq!(ts.len(), 5);
        assert!(!ts.is_empty());
        assert_eq!(ts.values(), &[10.0, 11.0, 12.0, 13.0, 14.0]);
        assert_eq!(ts.term().name(), "rust");
        assert_eq!(ts.timeframe(), Timeframe::Daily);
        assert_eq!(ts.last_period(), Some(day(4)));
    }

    #[test]
    fn series_rejects_non_increasing_periods() {
        let result = TimeSeries::from_pairs(
            Term::new("rust"),
            Timeframe::Daily,
            vec![(day(0), 1), (day(2), 2), (day(1), 3)],
        );
        assert!(matches!(result, Err(TrendError::PeriodError(_))));

        let result = TimeSeries::from_pairs(
            Term::new("rust"),
            Timeframe::Daily,
            vec![(day(0), 1), (day(1), 2), (day(1), 3)],
        );
        assert!(matches!(result, Err(TrendError::PeriodError(_))));
    }

    #[test]
    fn empty_series_is_valid() {
        let ts = TimeSeries::new(Term::new("quiet"), Timeframe::Weekly, vec![]).unwrap();
        assert!(ts.is_empty());
        assert_eq!(ts.last_period(), None);
        assert_eq!(ts.future_period(1), None);
    }

    #[test]
    fn timeframe_advance_steps_whole_units() {
        let base = day(0);
        assert_eq!(
            Timeframe::Hourly.advance(base, 3),
            base + Duration::hours(3)
        );
        assert_eq!(Timeframe::Daily.advance(base, 2), day(2));
        assert_eq!(
            Timeframe::Weekly.advance(base, 1),
            base + Duration::weeks(1)
        );
        assert_eq!(
            Timeframe::Monthly.advance(base, 2),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn future_period_advances_from_last_observation() {
        let ts = TimeSeries::from_pairs(
            Term::new("rust"),
            Timeframe::Daily,
            (0..3).map(|i| (day(i), 1)),
        )
        .unwrap();
        assert_eq!(ts.future_period(2), Some(day(4)));
    }

    #[test]
    fn term_display_and_category() {
        let plain = Term::new("rust");
        assert_eq!(plain.to_string(), "rust");
        assert_eq!(plain.category(), None);

        let tagged = Term::with_category("rust", "languages");
        assert_eq!(tagged.category(), Some("languages"));
    }
}
