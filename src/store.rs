//! Series storage boundary and the per-analyzer series cache.

use crate::core::{SeriesPoint, Term, TimeSeries, Timeframe};
use crate::error::{Result, TrendError};
use std::collections::HashMap;
use tracing::debug;

/// Source of bucketed event counts for a term.
///
/// Implementations return periods in ascending order, at most `limit`
/// of the most recent buckets. Periods with no events are absent, not
/// zero-filled.
pub trait SeriesStore {
    fn get_series(&self, term: &Term, timeframe: Timeframe, limit: usize)
        -> Result<Vec<SeriesPoint>>;
}

/// In-memory store, keyed by term name and timeframe.
#[derive(Debug, Default)]
pub struct MemoryStore {
    series: HashMap<(String, Timeframe), Vec<SeriesPoint>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the full history for a (term, timeframe).
    pub fn insert(&mut self, series: &TimeSeries) {
        self.series.insert(
            (series.term().name().to_string(), series.timeframe()),
            series.points().to_vec(),
        );
    }
}

impl SeriesStore for MemoryStore {
    fn get_series(
        &self,
        term: &Term,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<SeriesPoint>> {
        let points = self
            .series
            .get(&(term.name().to_string(), timeframe))
            .ok_or_else(|| {
                TrendError::StoreUnavailable(format!("no series for term '{term}'"))
            })?;
        let skip = points.len().saturating_sub(limit);
        Ok(points[skip..].to_vec())
    }
}

/// Per-term cache of fetched series, owned by one analysis pass.
///
/// Each term holds at most one entry. Requesting the same term at a
/// different timeframe replaces the entry rather than keeping both.
#[derive(Debug, Default)]
pub struct SeriesCache {
    entries: HashMap<String, TimeSeries>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a series through the cache, hitting the store on miss or
    /// timeframe mismatch.
    pub fn fetch<S: SeriesStore>(
        &mut self,
        store: &S,
        term: &Term,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<&TimeSeries> {
        let cached_timeframe = self
            .entries
            .get(term.name())
            .map(|series| series.timeframe());

        match cached_timeframe {
            Some(tf) if tf == timeframe => {
                debug!(term = %term, ?timeframe, "series cache hit");
            }
            Some(tf) => {
                debug!(term = %term, cached = ?tf, requested = ?timeframe, "series cache replace");
                let series = Self::load(store, term, timeframe, limit)?;
                self.entries.insert(term.name().to_string(), series);
            }
            None => {
                debug!(term = %term, ?timeframe, limit, "series cache miss");
                let series = Self::load(store, term, timeframe, limit)?;
                self.entries.insert(term.name().to_string(), series);
            }
        }

        // The entry was just verified or inserted above.
        self.entries
            .get(term.name())
            .ok_or_else(|| TrendError::StoreUnavailable(format!("no series for term '{term}'")))
    }

    fn load<S: SeriesStore>(
        store: &S,
        term: &Term,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<TimeSeries> {
        debug!(term = %term, ?timeframe, limit, "fetching series from store");
        let points = store.get_series(term, timeframe, limit)?;
        TimeSeries::new(term.clone(), timeframe, points)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
