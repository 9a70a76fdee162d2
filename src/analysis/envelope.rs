//! Hysteresis envelope of a loudness curve.
//!
//! A running "buoy" follows the per-sample level upward, at most
//! `drift_step` dB per sample, and never follows it down inside a chunk.
//! Short loud spikes therefore barely move the envelope while sustained
//! rises are tracked.

use crate::constants::envelope::{DEFAULT_CHUNK_WIDTH, DEFAULT_DRIFT_STEP_DB, DEFAULT_FLOOR_DB};

/// How the buoy is seeded at the start of each chunk after the first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reseed {
    /// Continue from the previous chunk's final value.
    #[default]
    Carry,
    /// Restart every chunk from the floor, letting the envelope fall.
    Floor,
}

/// Per-chunk envelope levels in dB.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    chunk_width: usize,
    levels: Vec<f32>,
}

impl Envelope {
    /// Samples per chunk.
    pub fn chunk_width(&self) -> usize {
        self.chunk_width
    }

    /// Levels in chunk order.
    pub fn levels(&self) -> &[f32] {
        &self.levels
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the envelope has no chunks.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// `(chunk_index, level_db)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.levels.iter().copied().enumerate()
    }
}

/// Stateless configuration of the hysteresis filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeFilter {
    chunk_width: usize,
    drift_step: f32,
    floor: f32,
    reseed: Reseed,
}

impl Default for EnvelopeFilter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_WIDTH, DEFAULT_DRIFT_STEP_DB, DEFAULT_FLOOR_DB)
    }
}

impl EnvelopeFilter {
    /// Create a filter. A zero chunk width is treated as one.
    pub fn new(chunk_width: usize, drift_step: f32, floor: f32) -> Self {
        Self {
            chunk_width: chunk_width.max(1),
            drift_step,
            floor,
            reseed: Reseed::Carry,
        }
    }

    /// Choose how chunks after the first are seeded.
    #[must_use]
    pub fn with_reseed(mut self, reseed: Reseed) -> Self {
        self.reseed = reseed;
        self
    }

    /// Samples per chunk.
    pub fn chunk_width(&self) -> usize {
        self.chunk_width
    }

    /// Samples the buoy needs to climb from the floor to `target_db`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn samples_to_reach(&self, target_db: f32) -> usize {
        if target_db <= self.floor {
            0
        } else if self.drift_step <= 0.0 {
            usize::MAX
        } else {
            ((target_db - self.floor) / self.drift_step).ceil() as usize
        }
    }

    /// Filter a per-sample dB curve into one level per chunk.
    ///
    /// The last chunk may be shorter than `chunk_width`; it is processed as
    /// is rather than padded.
    pub fn apply(&self, levels_db: &[f32]) -> Envelope {
        let mut levels = Vec::with_capacity(levels_db.len().div_ceil(self.chunk_width));
        let mut buoy = self.floor;

        for chunk in levels_db.chunks(self.chunk_width) {
            if self.reseed == Reseed::Floor {
                buoy = self.floor;
            }
            for &sample in chunk {
                buoy = self.step(buoy, sample);
            }
            levels.push(buoy);
        }

        Envelope {
            chunk_width: self.chunk_width,
            levels,
        }
    }

    fn step(&self, buoy: f32, sample: f32) -> f32 {
        if sample > buoy + self.drift_step {
            buoy + self.drift_step
        } else if sample > buoy {
            sample
        } else {
            buoy
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_length_is_ceil_of_chunks() {
        let filter = EnvelopeFilter::new(4, 0.1, -20.0);
        for len in 0..20 {
            let env = filter.apply(&vec![-30.0; len]);
            assert_eq!(env.len(), len.div_ceil(4), "input length {len}");
        }
    }

    #[test]
    fn test_empty_input_gives_empty_envelope() {
        let env = EnvelopeFilter::default().apply(&[]);
        assert!(env.is_empty());
        assert_eq!(env.chunk_width(), 441);
    }

    #[test]
    fn test_tracks_small_rises_directly() {
        let filter = EnvelopeFilter::new(3, 0.5, -20.0);
        let env = filter.apply(&[-19.8, -19.6, -19.3]);
        assert!((env.levels()[0] - -19.3).abs() < 1e-5);
    }

    #[test]
    fn test_spike_rises_at_drift_rate() {
        let filter = EnvelopeFilter::new(5, 0.1, -20.0);
        let env = filter.apply(&[0.0, -40.0, -40.0, 0.0, -40.0]);
        // Two loud samples move the buoy by two drift steps only
        assert!((env.levels()[0] - -19.8).abs() < 1e-5);
    }

    #[test]
    fn test_never_tracks_downward_with_carry() {
        let filter = EnvelopeFilter::new(2, 1.0, -20.0);
        let env = filter.apply(&[-19.0, -18.5, -60.0, -60.0]);
        assert_eq!(env.levels(), &[-18.5, -18.5]);
    }

    #[test]
    fn test_floor_reseed_lets_level_fall() {
        let filter = EnvelopeFilter::new(2, 1.0, -20.0).with_reseed(Reseed::Floor);
        let env = filter.apply(&[-19.0, -18.5, -60.0, -60.0]);
        assert_eq!(env.levels(), &[-18.5, -20.0]);
    }

    #[test]
    fn test_short_tail_is_not_padded() {
        let filter = EnvelopeFilter::new(441, 0.1, -20.0).with_reseed(Reseed::Floor);
        let env = filter.apply(&vec![-10.0; 442]);
        assert_eq!(env.len(), 2);
        // One real sample in the tail: a single drift step above the floor
        assert!((env.levels()[1] - -19.9).abs() < 1e-5);
    }

    #[test]
    fn test_samples_to_reach() {
        let filter = EnvelopeFilter::new(160, 0.1, -20.0);
        assert_eq!(filter.samples_to_reach(-15.0), 50);
        assert_eq!(filter.samples_to_reach(-25.0), 0);
        let stuck = EnvelopeFilter::new(160, 0.0, -20.0);
        assert_eq!(stuck.samples_to_reach(-15.0), usize::MAX);
    }

    #[test]
    fn test_iter_yields_indices() {
        let filter = EnvelopeFilter::new(1, 0.1, -20.0);
        let pairs: Vec<_> = filter.apply(&[-30.0, -30.0]).iter().collect();
        assert_eq!(pairs, vec![(0, -20.0), (1, -20.0)]);
    }
}
