//! Run summary and metrics.

use std::fmt;
use std::time::Duration;

/// Metrics from a completed run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Pairs requested by configuration.
    pub requested: u64,
    /// Configured batch size.
    pub batch_size: usize,
    /// Batches written per entity.
    pub batch_count: u64,
    /// Control objects written.
    pub control_objects: u64,
    /// Facial features vectors written.
    pub feature_vectors: u64,
    /// Wall-clock time since process start.
    pub elapsed: Duration,
    /// Time spent generating records.
    pub generation_duration: Duration,
    /// Time spent inserting records.
    pub insert_duration: Duration,
}

impl RunSummary {
    /// Calculate pairs written per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.control_objects as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "inserted {} ({} in req) pairs (ControlObject x FacialFeaturesVector) to ClickHouse DB in {:?}",
            self.requested, self.batch_size, self.elapsed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_per_second() {
        let summary = RunSummary {
            requested: 1000,
            control_objects: 1000,
            feature_vectors: 1000,
            elapsed: Duration::from_secs(10),
            ..Default::default()
        };

        assert_eq!(summary.rows_per_second(), 100.0);
        assert_eq!(RunSummary::default().rows_per_second(), 0.0);
    }

    #[test]
    fn test_display() {
        let summary = RunSummary {
            requested: 10,
            batch_size: 3,
            elapsed: Duration::from_millis(1500),
            ..Default::default()
        };

        assert_eq!(
            summary.to_string(),
            "inserted 10 (3 in req) pairs (ControlObject x FacialFeaturesVector) to ClickHouse DB in 1.5s"
        );
    }
}
