//! Cross-series similarity: correlation, distances, and lead/lag.

mod dtw;

pub use dtw::{dtw_distance, euclidean_distance};

use crate::core::TimeSeries;
use crate::error::{Result, TrendError};
use crate::stats::SeriesSummary;
use serde::Serialize;
use std::collections::HashMap;

/// Minimum overlapping periods for any comparison.
pub const MIN_OVERLAP: usize = 7;

/// Cap on the lead/lag sweep range.
const MAX_LAG: usize = 30;

/// A lagged correlation must beat the zero-lag correlation by this factor
/// before a lead/lag relationship is reported.
const LEAD_GAIN: f64 = 1.1;

/// Qualitative correlation strength on |r|.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
    Negligible,
}

impl CorrelationStrength {
    pub fn classify(r: f64) -> Self {
        let a = r.abs();
        if a > 0.9 {
            CorrelationStrength::VeryStrong
        } else if a > 0.7 {
            CorrelationStrength::Strong
        } else if a > 0.5 {
            CorrelationStrength::Moderate
        } else if a > 0.3 {
            CorrelationStrength::Weak
        } else {
            CorrelationStrength::Negligible
        }
    }

    /// Sign-qualified label, e.g. "strong negative".
    pub fn qualified_label(r: f64) -> String {
        let strength = match Self::classify(r) {
            CorrelationStrength::VeryStrong => "very strong",
            CorrelationStrength::Strong => "strong",
            CorrelationStrength::Moderate => "moderate",
            CorrelationStrength::Weak => "weak",
            CorrelationStrength::Negligible => "negligible",
        };
        let sign = if r < 0.0 { "negative" } else { "positive" };
        format!("{strength} {sign}")
    }
}

/// Lead/lag relationship between two aligned series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "relationship", rename_all = "snake_case")]
pub enum LeadLag {
    /// No lag clearly beats the concurrent correlation.
    Concurrent,
    /// `leader`'s pattern precedes the other series by `lag` periods.
    Leads {
        leader: String,
        lag: usize,
        correlation: f64,
    },
}

/// Full similarity comparison of two same-timeframe series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityReport {
    pub term_a: String,
    pub term_b: String,
    /// Number of overlapping periods the comparison ran on.
    pub overlap: usize,
    pub correlation: f64,
    pub strength: CorrelationStrength,
    /// Euclidean distance on max-normalized values.
    pub euclidean_distance: f64,
    /// DTW distance on max-normalized values.
    pub dtw_distance: f64,
    /// Cosine similarity on raw values.
    pub cosine_similarity: f64,
    pub lead_lag: LeadLag,
    pub summary_a: SeriesSummary,
    pub summary_b: SeriesSummary,
}

/// Pearson correlation; 0 when either side has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// Cosine similarity on raw values; 0 when either vector is all zeros.
pub fn cosine_similarity(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    let dot: f64 = (0..n).map(|i| x[i] * y[i]).sum();
    let norm_x: f64 = x[..n].iter().map(|v| v * v).sum::<f64>().sqrt();
    let norm_y: f64 = y[..n].iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm_x == 0.0 || norm_y == 0.0 {
        return 0.0;
    }
    dot / (norm_x * norm_y)
}

/// Scale a series by its own maximum; all zeros when the max is 0.
fn max_normalize(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| v / max).collect()
}

/// Align two series on the intersection of their periods.
fn align(a: &TimeSeries, b: &TimeSeries) -> (Vec<f64>, Vec<f64>) {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let (pa, pb) = (a.points(), b.points());
    let (mut i, mut j) = (0, 0);
    while i < pa.len() && j < pb.len() {
        match pa[i].period.cmp(&pb[j].period) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                xs.push(pa[i].count as f64);
                ys.push(pb[j].count as f64);
                i += 1;
                j += 1;
            }
        }
    }
    (xs, ys)
}

/// Pearson correlation with `x` shifted `lag` periods ahead of `y`.
///
/// A positive lag pairs `x[i]` with `y[i + lag]`: x's pattern precedes
/// y's. `None` when the shifted overlap is 7 points or fewer.
fn correlation_at_lag(x: &[f64], y: &[f64], lag: isize) -> Option<f64> {
    let n = x.len();
    let shift = lag.unsigned_abs();
    if n <= shift || n - shift <= MIN_OVERLAP {
        return None;
    }
    let m = n - shift;
    let (xs, ys) = if lag >= 0 {
        (&x[..m], &y[shift..])
    } else {
        (&x[shift..], &y[..m])
    };
    Some(pearson(xs, ys))
}

/// Sweep lags and report a lead/lag relationship when one clearly beats
/// the concurrent correlation.
fn detect_lead_lag(x: &[f64], y: &[f64], term_a: &str, term_b: &str) -> LeadLag {
    let n = x.len();
    let max_lag = MAX_LAG.min(n / 4) as isize;
    let zero_corr = pearson(x, y);

    let mut best_lag = 0isize;
    let mut best_corr = zero_corr;
    for lag in -max_lag..=max_lag {
        if let Some(corr) = correlation_at_lag(x, y, lag) {
            if corr > best_corr {
                best_corr = corr;
                best_lag = lag;
            }
        }
    }

    if best_lag.unsigned_abs() > 1 && best_corr > LEAD_GAIN * zero_corr {
        let leader = if best_lag > 0 { term_a } else { term_b };
        LeadLag::Leads {
            leader: leader.to_string(),
            lag: best_lag.unsigned_abs(),
            correlation: best_corr,
        }
    } else {
        LeadLag::Concurrent
    }
}

/// Compare two series for the same timeframe.
pub fn compare(a: &TimeSeries, b: &TimeSeries) -> Result<SimilarityReport> {
    if a.timeframe() != b.timeframe() {
        return Err(TrendError::InvalidParameter(
            "series must share a timeframe".to_string(),
        ));
    }

    let (xs, ys) = align(a, b);
    if xs.len() < MIN_OVERLAP {
        return Err(TrendError::InsufficientOverlap {
            needed: MIN_OVERLAP,
            got: xs.len(),
        });
    }

    let correlation = pearson(&xs, &ys);
    let norm_x = max_normalize(&xs);
    let norm_y = max_normalize(&ys);

    Ok(SimilarityReport {
        term_a: a.term().name().to_string(),
        term_b: b.term().name().to_string(),
        overlap: xs.len(),
        correlation,
        strength: CorrelationStrength::classify(correlation),
        euclidean_distance: euclidean_distance(&norm_x, &norm_y),
        dtw_distance: dtw_distance(&norm_x, &norm_y),
        cosine_similarity: cosine_similarity(&xs, &ys),
        lead_lag: detect_lead_lag(&xs, &ys, a.term().name(), b.term().name()),
        summary_a: SeriesSummary::from_values(&xs)?,
        summary_b: SeriesSummary::from_values(&ys)?,
    })
}

/// Symmetric Term×Term Pearson correlation map. Pairs without enough
/// overlap are simply absent; the diagonal is always 1.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    terms: Vec<String>,
    entries: HashMap<String, f64>,
}

impl CorrelationMatrix {
    /// Build from one series per term.
    pub fn build(series: &[TimeSeries]) -> Self {
        let terms: Vec<String> = series.iter().map(|s| s.term().name().to_string()).collect();
        let mut entries = HashMap::new();

        for i in 0..series.len() {
            for j in (i + 1)..series.len() {
                let (xs, ys) = align(&series[i], &series[j]);
                if xs.len() >= MIN_OVERLAP {
                    entries.insert(Self::key(&terms[i], &terms[j]), pearson(&xs, &ys));
                }
            }
        }

        Self { terms, entries }
    }

    fn key(a: &str, b: &str) -> String {
        if a <= b {
            format!("{a}\u{1f}{b}")
        } else {
            format!("{b}\u{1f}{a}")
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Correlation for a term pair; 1.0 on the diagonal, `None` when the
    /// pair could not be compared.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        if a == b && self.terms.iter().any(|t| t == a) {
            return Some(1.0);
        }
        self.entries.get(&Self::key(a, b)).copied()
    }
}
