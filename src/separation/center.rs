//! Centre-channel vocal isolation.

use std::f64::consts::PI;

use super::{SeparationError, Separator};
use crate::audio::AudioBuffer;

/// Keeps what is common to all channels within the vocal band.
///
/// The mid signal is band-limited by a one-pole high-pass and a one-pole
/// low-pass, then written back to every channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterChannelIsolator {
    low_cut_hz: f32,
    high_cut_hz: f32,
}

impl CenterChannelIsolator {
    /// Create an isolator for the given band.
    pub fn new(low_cut_hz: f32, high_cut_hz: f32) -> Self {
        Self {
            low_cut_hz,
            high_cut_hz,
        }
    }
}

impl Separator for CenterChannelIsolator {
    fn name(&self) -> &str {
        "center-channel"
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn separate(&self, input: &AudioBuffer) -> Result<AudioBuffer, SeparationError> {
        let nyquist = f64::from(input.sample_rate()) / 2.0;
        if f64::from(self.low_cut_hz) >= nyquist {
            return Err(format!(
                "low cut {} Hz is at or above Nyquist ({nyquist} Hz)",
                self.low_cut_hz
            )
            .into());
        }

        let channels = usize::from(input.channels());
        let mid: Vec<f64> = input
            .samples()
            .chunks_exact(channels)
            .map(|frame| frame.iter().map(|&s| f64::from(s)).sum::<f64>() / channels as f64)
            .collect();

        let dt = 1.0 / f64::from(input.sample_rate());
        let band = low_pass(&high_pass(mid, self.low_cut_hz, dt), self.high_cut_hz, dt);

        let (lo, hi) = (f64::from(input.min_value()), f64::from(input.max_value()));
        let samples = band
            .iter()
            .flat_map(|&v| std::iter::repeat_n(v.round().clamp(lo, hi) as i32, channels))
            .collect();

        Ok(input.with_samples(samples))
    }
}

fn rc(cutoff_hz: f32) -> f64 {
    1.0 / (2.0 * PI * f64::from(cutoff_hz))
}

fn high_pass(signal: Vec<f64>, cutoff_hz: f32, dt: f64) -> Vec<f64> {
    if cutoff_hz <= 0.0 || signal.is_empty() {
        return signal;
    }
    let rc = rc(cutoff_hz);
    let alpha = rc / (rc + dt);

    let mut out = Vec::with_capacity(signal.len());
    let mut prev_in = signal[0];
    let mut prev_out = signal[0];
    out.push(prev_out);
    for &x in &signal[1..] {
        prev_out = alpha * (prev_out + x - prev_in);
        prev_in = x;
        out.push(prev_out);
    }
    out
}

fn low_pass(signal: &[f64], cutoff_hz: f32, dt: f64) -> Vec<f64> {
    let rc = rc(cutoff_hz);
    let alpha = dt / (rc + dt);

    let mut state = signal.first().copied().unwrap_or_default();
    signal
        .iter()
        .map(|&x| {
            state += alpha * (x - state);
            state
        })
        .collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
mod tests {
    use super::*;

    fn sine(freq: f64, sample_rate: u32, frames: usize, amplitude: f64) -> Vec<f64> {
        (0..frames)
            .map(|i| amplitude * (2.0 * PI * freq * i as f64 / f64::from(sample_rate)).sin())
            .collect()
    }

    fn rms(samples: &[i32]) -> f64 {
        let sum: f64 = samples.iter().map(|&s| f64::from(s).powi(2)).sum();
        (sum / samples.len() as f64).sqrt()
    }

    #[test]
    fn test_keeps_shape() {
        let samples: Vec<i32> = (0..2_000).map(|i| (i % 200) * 10).collect();
        let input = AudioBuffer::new(samples, 8_000, 2, 16).unwrap();
        let output = CenterChannelIsolator::new(200.0, 4_000.0)
            .separate(&input)
            .unwrap();
        assert_eq!(output.frames(), input.frames());
        assert_eq!(output.channels(), 2);
        assert_eq!(output.sample_rate(), 8_000);
        assert_eq!(output.sample_width(), 16);
    }

    #[test]
    fn test_removes_side_signal() {
        // Opposite-phase channels cancel in the mid signal
        let wave = sine(440.0, 16_000, 4_000, 10_000.0);
        let samples: Vec<i32> = wave
            .iter()
            .flat_map(|&v| [v as i32, -(v as i32)])
            .collect();
        let input = AudioBuffer::new(samples, 16_000, 2, 16).unwrap();
        let output = CenterChannelIsolator::new(200.0, 4_000.0)
            .separate(&input)
            .unwrap();
        assert!(output.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_attenuates_out_of_band() {
        let rate = 16_000;
        let low: Vec<i32> = sine(20.0, rate, 16_000, 10_000.0)
            .iter()
            .map(|&v| v as i32)
            .collect();
        let voice: Vec<i32> = sine(1_000.0, rate, 16_000, 10_000.0)
            .iter()
            .map(|&v| v as i32)
            .collect();
        let isolator = CenterChannelIsolator::new(200.0, 4_000.0);

        let low_out = isolator
            .separate(&AudioBuffer::new(low, rate, 1, 16).unwrap())
            .unwrap();
        let voice_out = isolator
            .separate(&AudioBuffer::new(voice, rate, 1, 16).unwrap())
            .unwrap();
        assert!(rms(low_out.samples()) * 4.0 < rms(voice_out.samples()));
    }

    #[test]
    fn test_rejects_band_above_nyquist() {
        let input = AudioBuffer::new(vec![0; 100], 8_000, 1, 16).unwrap();
        let result = CenterChannelIsolator::new(5_000.0, 6_000.0).separate(&input);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_buffer() {
        let input = AudioBuffer::new(Vec::new(), 8_000, 2, 16).unwrap();
        let output = CenterChannelIsolator::new(200.0, 4_000.0)
            .separate(&input)
            .unwrap();
        assert!(output.is_empty());
    }
}
