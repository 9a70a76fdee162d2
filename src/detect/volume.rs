//! Low-volume detection on the hysteresis envelope.

use super::{DetectionInput, Detector, DetectorTag, RawPoint};
use crate::analysis::{EnvelopeFilter, Reseed};
use crate::audio::amplitude_to_db;
use crate::error::Result;

/// Emits one point at the centre of every run of quiet envelope chunks.
///
/// The envelope restarts from its floor each chunk so it can fall back
/// after loud passages. A run's weight grows with how far it sits below
/// the threshold.
#[derive(Debug, Clone, Copy)]
pub struct VolumeDetector {
    filter: EnvelopeFilter,
    threshold_db: f32,
}

impl VolumeDetector {
    /// Create a detector around an envelope filter.
    pub fn new(filter: EnvelopeFilter, threshold_db: f32) -> Self {
        Self {
            filter: filter.with_reseed(Reseed::Floor),
            threshold_db,
        }
    }
}

impl VolumeDetector {
    /// Envelope levels with a short tail chunk replaced by its predecessor.
    ///
    /// A floor-seeded tail shorter than the climb to the threshold reads as
    /// quiet whatever its content. It takes the previous chunk's level, or is
    /// dropped when it is the only chunk.
    fn judged_levels(&self, levels: &[f32], width: usize, total: usize) -> Vec<f32> {
        let mut judged = levels.to_vec();
        let tail_len = total - width * levels.len().saturating_sub(1);
        if levels.is_empty() || tail_len >= self.filter.samples_to_reach(self.threshold_db) {
            return judged;
        }
        judged.pop();
        if let Some(&previous) = judged.last() {
            judged.push(previous);
        }
        judged
    }
}

impl Detector for VolumeDetector {
    fn tag(&self) -> DetectorTag {
        DetectorTag::Volume
    }

    #[allow(clippy::cast_precision_loss)]
    fn detect(&self, input: &DetectionInput<'_>) -> Result<Vec<RawPoint>> {
        let envelope = self.filter.apply(&amplitude_to_db(input.mono));
        let width = envelope.chunk_width();
        let sample_rate = f64::from(input.buffer.sample_rate());
        let total = input.mono.len();
        let levels = self.judged_levels(envelope.levels(), width, total);

        let mut points = Vec::new();
        let mut run: Option<(usize, f32)> = None;

        // Trailing sentinel closes a run that reaches the end
        let items = levels
            .iter()
            .copied()
            .enumerate()
            .map(Some)
            .chain(std::iter::once(None));
        for item in items {
            match (item, run) {
                (Some((index, level)), None) if level < self.threshold_db => {
                    run = Some((index, self.threshold_db - level));
                }
                (Some((_, level)), Some((start, depth))) if level < self.threshold_db => {
                    run = Some((start, depth + (self.threshold_db - level)));
                }
                (item, Some((start, depth))) => {
                    let end = item.map_or(levels.len(), |(index, _)| index);
                    let first = start * width;
                    let last = (end * width).min(total);
                    let centre_ms = (first + last) as f64 / 2.0 * 1000.0 / sample_rate;
                    let mean_depth = f64::from(depth) / (end - start) as f64;
                    points.push((centre_ms, 1.0 + mean_depth / 10.0));
                    run = None;
                }
                (_, None) => {}
            }
        }

        Ok(points)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::audio::{AudioBuffer, reduce_to_mono};

    fn tone_with_gap(
        sample_rate: u32,
        total_ms: usize,
        gap: std::ops::Range<usize>,
    ) -> AudioBuffer {
        let per_ms = sample_rate as usize / 1000;
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        let samples = (0..total_ms * per_ms)
            .map(|i| {
                if gap.contains(&(i / per_ms)) {
                    0
                } else {
                    ((i as f32 * 0.3).sin() * 20_000.0) as i32
                }
            })
            .collect();
        AudioBuffer::new(samples, sample_rate, 1, 16).unwrap()
    }

    #[test]
    fn test_finds_centre_of_quiet_run() {
        let buffer = tone_with_gap(8_000, 3_000, 1_000..2_000);
        let mono = reduce_to_mono(&buffer).unwrap();
        let detector = VolumeDetector::new(EnvelopeFilter::new(160, 0.1, -20.0), -15.0);
        let points = detector
            .detect(&DetectionInput {
                buffer: &buffer,
                mono: &mono,
            })
            .unwrap();

        assert_eq!(points.len(), 1);
        assert!((points[0].0 - 1_500.0).abs() < 20.0, "got {}", points[0].0);
        assert!(points[0].1 > 1.0);
    }

    #[test]
    fn test_loud_signal_has_no_points() {
        let buffer = tone_with_gap(8_000, 1_000, 0..0);
        let mono = reduce_to_mono(&buffer).unwrap();
        let detector = VolumeDetector::new(EnvelopeFilter::new(160, 0.1, -20.0), -15.0);
        let input = DetectionInput {
            buffer: &buffer,
            mono: &mono,
        };
        assert!(detector.detect(&input).unwrap().is_empty());
    }

    fn loud_tone(frames: usize) -> AudioBuffer {
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        let samples = (0..frames)
            .map(|i| ((i as f32 * 0.3).sin() * 20_000.0) as i32)
            .collect();
        AudioBuffer::new(samples, 8_000, 1, 16).unwrap()
    }

    #[test]
    fn test_loud_signal_with_short_tail_has_no_points() {
        let detector = VolumeDetector::new(EnvelopeFilter::new(160, 0.1, -20.0), -15.0);
        for frames in [24_000, 24_001, 24_005, 24_049, 24_159] {
            let buffer = loud_tone(frames);
            let mono = reduce_to_mono(&buffer).unwrap();
            let input = DetectionInput {
                buffer: &buffer,
                mono: &mono,
            };
            let points = detector.detect(&input).unwrap();
            assert!(points.is_empty(), "{frames} frames gave {points:?}");
        }
    }

    #[test]
    fn test_quiet_run_extends_through_short_tail() {
        // 2 s of tone, then silence to the end with a 5-sample tail chunk
        let mut samples: Vec<i32> = loud_tone(16_000).samples().to_vec();
        samples.resize(24_005, 0);
        let buffer = AudioBuffer::new(samples, 8_000, 1, 16).unwrap();
        let mono = reduce_to_mono(&buffer).unwrap();
        let detector = VolumeDetector::new(EnvelopeFilter::new(160, 0.1, -20.0), -15.0);
        let points = detector
            .detect(&DetectionInput {
                buffer: &buffer,
                mono: &mono,
            })
            .unwrap();

        assert_eq!(points.len(), 1);
        // Centre of 16_000..24_005 samples
        assert!((points[0].0 - 2_500.3125).abs() < 1e-6, "got {}", points[0].0);
    }

    #[test]
    fn test_short_single_chunk_is_not_judged() {
        let buffer = AudioBuffer::new(vec![0; 10], 8_000, 1, 16).unwrap();
        let mono = reduce_to_mono(&buffer).unwrap();
        let detector = VolumeDetector::new(EnvelopeFilter::new(160, 0.1, -20.0), -15.0);
        let input = DetectionInput {
            buffer: &buffer,
            mono: &mono,
        };
        assert!(detector.detect(&input).unwrap().is_empty());
    }

    #[test]
    fn test_empty_buffer_has_no_points() {
        let buffer = AudioBuffer::new(Vec::new(), 8_000, 1, 16).unwrap();
        let detector = VolumeDetector::new(EnvelopeFilter::default(), -15.0);
        let input = DetectionInput {
            buffer: &buffer,
            mono: &[],
        };
        assert!(detector.detect(&input).unwrap().is_empty());
    }
}
