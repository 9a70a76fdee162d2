//! Turning critical points into a clip plan.
//!
//! The pipeline is: fuse points that different detectors placed within
//! `fusion_epsilon_ms` of each other, window each fused event into a
//! candidate interval, clamp candidates to the recording, merge overlaps,
//! then keep the heaviest `max_clips` intervals. Ranking is global, so the
//! whole point set must be present before anything is emitted.

use std::collections::BTreeSet;

use tracing::debug;

use super::{ClipPlan, Interval};
use crate::analysis::search;
use crate::config::SynthesisConfig;
use crate::detect::{CriticalPoint, DetectorTag};

/// Slack for floating point when comparing interval lengths to bounds.
const LENGTH_TOLERANCE_MS: f64 = 1e-6;

/// Points from one or more detectors treated as a single event.
#[derive(Debug, Clone, PartialEq)]
pub struct FusedEvent {
    /// Timestamp of the earliest member.
    pub timestamp_ms: f64,
    /// Detectors that contributed.
    pub sources: BTreeSet<DetectorTag>,
    /// Sum of member weights.
    pub weight: f64,
}

impl FusedEvent {
    fn from_point(point: &CriticalPoint) -> Self {
        Self {
            timestamp_ms: point.timestamp_ms,
            sources: BTreeSet::from([point.source]),
            weight: point.weight,
        }
    }

    /// Whether this event marks one end of a span rather than a moment.
    fn is_paired(&self) -> bool {
        self.sources.iter().all(|tag| tag.is_paired())
    }

    fn span_to(self, end: Self) -> Interval {
        let mut sources = self.sources;
        sources.extend(end.sources);
        Interval {
            start_ms: self.timestamp_ms,
            end_ms: end.timestamp_ms,
            sources,
            weight: self.weight + end.weight,
        }
    }
}

/// Builds clip plans under length and count bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalSynthesizer {
    min_clip_ms: f64,
    max_clip_ms: f64,
    fusion_epsilon_ms: f64,
    max_clips: usize,
}

impl IntervalSynthesizer {
    /// Create a synthesizer.
    pub fn new(
        min_clip_ms: f64,
        max_clip_ms: f64,
        fusion_epsilon_ms: f64,
        max_clips: usize,
    ) -> Self {
        Self {
            min_clip_ms,
            max_clip_ms,
            fusion_epsilon_ms,
            max_clips,
        }
    }

    /// Create a synthesizer from configuration.
    pub fn from_config(config: &SynthesisConfig) -> Self {
        Self::new(
            config.min_clip_ms,
            config.max_clip_ms,
            config.fusion_epsilon_ms,
            config.max_clips,
        )
    }

    /// Build a plan from points sorted by timestamp.
    ///
    /// Deterministic: the same input always yields the same plan.
    pub fn synthesize(&self, points: &[CriticalPoint], duration_ms: f64) -> ClipPlan {
        let events = fuse_events(points, self.fusion_epsilon_ms);
        let candidates: Vec<Interval> = self
            .window(events)
            .into_iter()
            .filter_map(|c| self.clamp(c, duration_ms))
            .collect();

        let merged: Vec<Interval> = merge_overlaps(candidates)
            .into_iter()
            .map(|i| self.truncate(i))
            .collect();

        debug!(
            "Synthesized {} interval(s) from {} point(s), keeping at most {}",
            merged.len(),
            points.len(),
            self.max_clips
        );

        ClipPlan::from_sorted(enforce_budget(merged, self.max_clips))
    }

    /// Point-like events get a window of `min_clip_ms` centred on them;
    /// beat events are paired with the next beat, an unpaired last beat is
    /// dropped.
    fn window(&self, events: Vec<FusedEvent>) -> Vec<Interval> {
        let pad = self.min_clip_ms / 2.0;
        let mut intervals = Vec::with_capacity(events.len());
        let mut open_beat: Option<FusedEvent> = None;

        for event in events {
            if event.is_paired() {
                match open_beat.take() {
                    Some(start) => intervals.push(start.span_to(event)),
                    None => open_beat = Some(event),
                }
            } else {
                intervals.push(Interval {
                    start_ms: event.timestamp_ms - pad,
                    end_ms: event.timestamp_ms + pad,
                    sources: event.sources,
                    weight: event.weight,
                });
            }
        }

        if let Some(beat) = open_beat {
            debug!("Dropping unpaired beat at {:.1} ms", beat.timestamp_ms);
        }

        intervals
    }

    fn clamp(&self, mut interval: Interval, duration_ms: f64) -> Option<Interval> {
        interval.start_ms = interval.start_ms.max(0.0);
        interval.end_ms = interval.end_ms.min(duration_ms);
        if interval.duration_ms() + LENGTH_TOLERANCE_MS < self.min_clip_ms {
            return None;
        }
        Some(self.truncate(interval))
    }

    fn truncate(&self, mut interval: Interval) -> Interval {
        if interval.duration_ms() > self.max_clip_ms {
            interval.end_ms = interval.start_ms + self.max_clip_ms;
        }
        interval
    }
}

/// Fuse points within `epsilon_ms` of a group's first point.
///
/// Sources are unioned and weights summed; the group keeps the timestamp of
/// its first (highest priority) member.
pub fn fuse_events(points: &[CriticalPoint], epsilon_ms: f64) -> Vec<FusedEvent> {
    let timestamps: Vec<f64> = points.iter().map(|p| p.timestamp_ms).collect();
    let mut events = Vec::new();

    let mut i = 0;
    while i < points.len() {
        let anchor = timestamps[i];
        let mut event = FusedEvent::from_point(&points[i]);
        let mut next = i + 1;

        // The next unconsumed timestamp is either an exact match or the
        // upper neighbour of the anchor within the remaining slice
        while next < timestamps.len() {
            let near = search(&timestamps[next..], anchor, epsilon_ms);
            if near.mid != Some(0) && near.high != Some(0) {
                break;
            }
            event.sources.insert(points[next].source);
            event.weight += points[next].weight;
            next += 1;
        }

        events.push(event);
        i = next;
    }

    events
}

/// Sort by start and merge every pair where the next starts at or before
/// the current end.
pub fn merge_overlaps(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_by(|a, b| {
        a.start_ms
            .total_cmp(&b.start_ms)
            .then(a.end_ms.total_cmp(&b.end_ms))
    });

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(current) if interval.start_ms <= current.end_ms => current.absorb(interval),
            _ => merged.push(interval),
        }
    }
    merged
}

/// Keep the `max_clips` heaviest intervals (earlier wins ties), in start
/// order.
pub fn enforce_budget(mut intervals: Vec<Interval>, max_clips: usize) -> Vec<Interval> {
    if intervals.len() <= max_clips {
        return intervals;
    }

    intervals.sort_by(|a, b| {
        b.weight
            .total_cmp(&a.weight)
            .then(a.start_ms.total_cmp(&b.start_ms))
    });
    intervals.truncate(max_clips);
    intervals.sort_by(|a, b| a.start_ms.total_cmp(&b.start_ms));
    intervals
}
