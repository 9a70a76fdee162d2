//! Silence detection in an isolated voice signal.

use super::{DetectionInput, Detector, DetectorTag, RawPoint};
use crate::constants::detection::VOICE_GAP_HOP_MS;
use crate::error::Result;

/// Emits a point at the centre of every sufficiently long silent stretch.
///
/// The signal is scanned in quarter-second hops; a hop is silent when its
/// peak magnitude does not exceed `threshold`. Weight is the gap length in
/// seconds, so long pauses outrank brief breaths.
#[derive(Debug, Clone, Copy)]
pub struct VoiceGapDetector {
    threshold: f32,
    min_gap_ms: f64,
}

impl VoiceGapDetector {
    /// Create a detector.
    pub fn new(threshold: f32, min_gap_ms: f64) -> Self {
        Self {
            threshold,
            min_gap_ms,
        }
    }
}

impl Detector for VoiceGapDetector {
    fn tag(&self) -> DetectorTag {
        DetectorTag::VoiceGap
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn detect(&self, input: &DetectionInput<'_>) -> Result<Vec<RawPoint>> {
        let sample_rate = f64::from(input.buffer.sample_rate());
        let hop = ((VOICE_GAP_HOP_MS * sample_rate / 1000.0).round() as usize).max(1);
        let to_ms = |sample: usize| sample as f64 * 1000.0 / sample_rate;

        let silent: Vec<bool> = input
            .mono
            .chunks(hop)
            .map(|window| window.iter().all(|s| s.abs() <= self.threshold))
            .collect();

        let mut points = Vec::new();
        let mut start = None;
        for (index, is_silent) in silent.iter().copied().chain(std::iter::once(false)).enumerate() {
            match (is_silent, start) {
                (true, None) => start = Some(index),
                (false, Some(first)) => {
                    let begin = first * hop;
                    let end = (index * hop).min(input.mono.len());
                    let length_ms = to_ms(end - begin);
                    if length_ms >= self.min_gap_ms {
                        points.push((to_ms(begin + end) / 2.0, length_ms / 1000.0));
                    }
                    start = None;
                }
                _ => {}
            }
        }

        Ok(points)
    }
}
