//! Rolling-window anomaly detection.

mod anomaly;

pub use anomaly::{detect_anomalies, AnomalyKind, AnomalyRecord, AnomalyReport};
