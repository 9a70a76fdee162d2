//! Onset-based beat tracking.

use super::{DetectionInput, Detector, DetectorTag, RawPoint};
use crate::constants::detection::{
    BEAT_FRAME_LENGTH, BEAT_HOP_LENGTH, BEAT_REFRACTORY_MS, BEAT_THRESHOLD_RADIUS,
};
use crate::error::Result;

/// Tracks beats from positive jumps in log frame energy.
///
/// A frame is a beat when its energy flux is a local maximum, exceeds the
/// mean plus one standard deviation of its neighbourhood, and is at least
/// `BEAT_REFRACTORY_MS` after the previous beat. Only every `stride`-th
/// beat is reported, so that adjacent reported beats span whole bars.
#[derive(Debug, Clone, Copy)]
pub struct BeatDetector {
    stride: usize,
}

impl BeatDetector {
    /// Create a detector keeping every `stride`-th beat (at least 1).
    pub fn new(stride: usize) -> Self {
        Self {
            stride: stride.max(1),
        }
    }
}

impl Detector for BeatDetector {
    fn tag(&self) -> DetectorTag {
        DetectorTag::Beat
    }

    #[allow(clippy::cast_precision_loss)]
    fn detect(&self, input: &DetectionInput<'_>) -> Result<Vec<RawPoint>> {
        let sample_rate = f64::from(input.buffer.sample_rate());
        let duration_ms = input.mono.len() as f64 * 1000.0 / sample_rate;
        let flux = onset_flux(input.mono);

        let peak = flux.iter().copied().fold(0.0f64, f64::max);
        if peak <= 0.0 {
            return Ok(Vec::new());
        }

        let mut beats = Vec::new();
        let mut last_ms = f64::NEG_INFINITY;
        for (i, &value) in flux.iter().enumerate() {
            let prev = if i > 0 { flux[i - 1] } else { 0.0 };
            let next = flux.get(i + 1).copied().unwrap_or(0.0);
            if value <= 0.0 || value < prev || value <= next {
                continue;
            }
            if value <= local_threshold(&flux, i) {
                continue;
            }

            let centre = (i * BEAT_HOP_LENGTH + BEAT_FRAME_LENGTH / 2) as f64;
            let time_ms = (centre * 1000.0 / sample_rate).min(duration_ms);
            if time_ms - last_ms < BEAT_REFRACTORY_MS {
                continue;
            }
            last_ms = time_ms;
            beats.push((time_ms, value / peak));
        }

        Ok(beats.into_iter().step_by(self.stride).collect())
    }
}

/// Half-wave rectified difference of log energy between consecutive frames.
#[allow(clippy::cast_precision_loss)]
fn onset_flux(mono: &[f32]) -> Vec<f64> {
    let mut flux = Vec::with_capacity(mono.len() / BEAT_HOP_LENGTH + 1);
    let mut previous: Option<f64> = None;

    let mut start = 0;
    while start < mono.len() {
        let end = (start + BEAT_FRAME_LENGTH).min(mono.len());
        let energy: f64 = mono[start..end]
            .iter()
            .map(|&s| f64::from(s) * f64::from(s))
            .sum::<f64>()
            / BEAT_FRAME_LENGTH as f64;
        let log_energy = (energy + 1e-10).ln();

        flux.push(previous.map_or(0.0, |p| (log_energy - p).max(0.0)));
        previous = Some(log_energy);
        start += BEAT_HOP_LENGTH;
    }

    flux
}

/// Mean plus one standard deviation of the flux around `index`.
#[allow(clippy::cast_precision_loss)]
fn local_threshold(flux: &[f64], index: usize) -> f64 {
    let lo = index.saturating_sub(BEAT_THRESHOLD_RADIUS);
    let hi = (index + BEAT_THRESHOLD_RADIUS + 1).min(flux.len());
    let window = &flux[lo..hi];
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    mean + variance.sqrt()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_precision_loss)]
mod tests {
    use super::*;
    use crate::audio::AudioBuffer;

    /// 8 kHz signal with a 25 ms tone burst every 500 ms starting at 250 ms.
    fn click_track(seconds: usize) -> Vec<f32> {
        let rate = 8_000;
        let mut mono = vec![0.0f32; seconds * rate];
        let mut onset = rate / 4;
        while onset + 200 < mono.len() {
            for (k, sample) in mono[onset..onset + 200].iter_mut().enumerate() {
                *sample = 0.8 * (k as f32 * 0.7).sin();
            }
            onset += rate / 2;
        }
        mono
    }

    fn detect(mono: &[f32], stride: usize) -> Vec<RawPoint> {
        let buffer = AudioBuffer::new(vec![0; mono.len()], 8_000, 1, 16).unwrap();
        BeatDetector::new(stride)
            .detect(&DetectionInput { buffer: &buffer, mono })
            .unwrap()
    }

    #[test]
    fn test_one_beat_per_click() {
        let beats = detect(&click_track(4), 1);
        assert_eq!(beats.len(), 8);
        for pair in beats.windows(2) {
            let spacing = pair[1].0 - pair[0].0;
            assert!((spacing - 500.0).abs() < 70.0, "spacing {spacing}");
        }
        assert!(beats.iter().all(|&(_, w)| w > 0.0 && w <= 1.0));
    }

    #[test]
    fn test_stride_keeps_every_nth() {
        let all = detect(&click_track(4), 1);
        let strided = detect(&click_track(4), 4);
        assert_eq!(strided.len(), 2);
        assert!((strided[0].0 - all[0].0).abs() < f64::EPSILON);
        assert!((strided[1].0 - all[4].0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_silence_has_no_beats() {
        assert!(detect(&vec![0.0; 16_000], 1).is_empty());
        assert!(detect(&[], 1).is_empty());
    }
}
