//! Merging detector outputs into one sorted point list.

use tracing::warn;

use super::{CriticalPoint, DetectorTag, RawPoint};
use crate::error::{Error, Result};

/// Points gathered from every detector plus the failures that were skipped.
#[derive(Debug, Default)]
pub struct Collection {
    /// Points sorted by timestamp, ties broken by detector priority.
    pub points: Vec<CriticalPoint>,
    /// One `Error::DetectorFailure` per detector that was dropped.
    pub failures: Vec<Error>,
}

/// Accumulates tagged detector outputs for one buffer.
///
/// A detector that fails, or returns a point outside the buffer, is dropped
/// as a whole and recorded; the others are unaffected.
#[derive(Debug)]
pub struct CriticalPointCollector {
    duration_ms: f64,
    collection: Collection,
}

impl CriticalPointCollector {
    /// Create a collector for a buffer of the given duration.
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            collection: Collection::default(),
        }
    }

    /// Add one detector's result.
    pub fn add(&mut self, tag: DetectorTag, output: Result<Vec<RawPoint>>) {
        let checked = output.and_then(|raw| self.check(tag, &raw).map(|()| raw));

        match checked {
            Ok(raw) => {
                self.collection
                    .points
                    .extend(raw.into_iter().map(|(timestamp_ms, weight)| CriticalPoint {
                        timestamp_ms,
                        source: tag,
                        weight,
                    }));
            }
            Err(e) => {
                let failure = match e {
                    failure @ Error::DetectorFailure { .. } => failure,
                    other => Error::DetectorFailure {
                        detector: tag,
                        reason: other.to_string(),
                    },
                };
                warn!("Skipping detector: {failure}");
                self.collection.failures.push(failure);
            }
        }
    }

    /// Sort and return everything collected.
    pub fn finish(mut self) -> Collection {
        self.collection.points.sort_by(|a, b| {
            a.timestamp_ms
                .total_cmp(&b.timestamp_ms)
                .then(a.source.cmp(&b.source))
        });
        self.collection
    }

    fn check(&self, tag: DetectorTag, raw: &[RawPoint]) -> Result<()> {
        for (i, &(timestamp_ms, weight)) in raw.iter().enumerate() {
            if !(0.0..=self.duration_ms).contains(&timestamp_ms) {
                return Err(Error::DetectorFailure {
                    detector: tag,
                    reason: format!(
                        "point {i} at {timestamp_ms} ms lies outside 0-{} ms",
                        self.duration_ms
                    ),
                });
            }
            if !weight.is_finite() {
                return Err(Error::DetectorFailure {
                    detector: tag,
                    reason: format!("point {i} has non-finite weight"),
                });
            }
        }
        Ok(())
    }
}
