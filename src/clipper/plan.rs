//! Intervals and the clip plan.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::detect::DetectorTag;

/// A candidate or planned clip span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interval {
    /// Start in milliseconds.
    pub start_ms: f64,
    /// End in milliseconds, always greater than `start_ms`.
    pub end_ms: f64,
    /// Detectors that contributed to this span.
    pub sources: BTreeSet<DetectorTag>,
    /// Sum of the contributing point weights.
    pub weight: f64,
}

impl Interval {
    /// Length in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.end_ms - self.start_ms
    }

    /// Extend this interval over `other`, pooling sources and weight.
    pub(crate) fn absorb(&mut self, other: Self) {
        self.start_ms = self.start_ms.min(other.start_ms);
        self.end_ms = self.end_ms.max(other.end_ms);
        self.sources.extend(other.sources);
        self.weight += other.weight;
    }
}

/// Sorted, non-overlapping, bounded set of intervals to extract.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ClipPlan {
    intervals: Vec<Interval>,
}

impl ClipPlan {
    /// Wrap intervals that are already sorted and disjoint.
    pub(crate) fn from_sorted(intervals: Vec<Interval>) -> Self {
        debug_assert!(
            intervals.windows(2).all(|w| w[0].end_ms < w[1].start_ms),
            "plan intervals must be sorted and disjoint"
        );
        Self { intervals }
    }

    /// Planned intervals in start order.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Number of planned clips.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Whether nothing was planned.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Iterate planned intervals.
    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    /// `(start_ms, end_ms)` pairs, for consumers that only need bounds.
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        self.intervals
            .iter()
            .map(|i| (i.start_ms, i.end_ms))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ClipPlan {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
