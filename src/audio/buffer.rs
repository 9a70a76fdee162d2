//! Interleaved integer PCM buffers and mono reduction.

use std::ops::Range;

use crate::error::{Error, Result};

/// An immutable block of interleaved integer PCM audio.
///
/// Samples are stored right-aligned in `i32` at their native bit depth, so a
/// 16-bit recording holds values in `-32768..=32767`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    samples: Vec<i32>,
    sample_rate: u32,
    channels: u16,
    sample_width: u16,
}

impl AudioBuffer {
    /// Create a buffer from interleaved samples.
    ///
    /// A trailing partial frame is dropped.
    ///
    /// # Arguments
    ///
    /// * `samples` - Interleaved samples at `sample_width` bits
    /// * `sample_rate` - Sample rate in Hz
    /// * `channels` - Channel count
    /// * `sample_width` - Bits per sample (8 to 32)
    pub fn new(
        mut samples: Vec<i32>,
        sample_rate: u32,
        channels: u16,
        sample_width: u16,
    ) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidBuffer {
                reason: "sample rate must be positive".to_string(),
            });
        }
        if channels == 0 {
            return Err(Error::InvalidBuffer {
                reason: "channel count must be positive".to_string(),
            });
        }
        if !(8..=32).contains(&sample_width) {
            return Err(Error::InvalidBuffer {
                reason: format!("sample width must be 8 to 32 bits, got {sample_width}"),
            });
        }

        let whole_frames = samples.len() / usize::from(channels) * usize::from(channels);
        samples.truncate(whole_frames);

        Ok(Self {
            samples,
            sample_rate,
            channels,
            sample_width,
        })
    }

    /// Quantize normalized float samples into a buffer of the given shape.
    pub fn from_normalized(
        samples: &[f32],
        sample_rate: u32,
        channels: u16,
        sample_width: u16,
    ) -> Result<Self> {
        let probe = Self::new(Vec::new(), sample_rate, channels, sample_width)?;
        let scale = probe.full_scale();
        let (min, max) = (probe.min_value(), probe.max_value());

        #[allow(clippy::cast_possible_truncation)]
        let quantized: Vec<i32> = samples
            .iter()
            .map(|&s| {
                let v = (f64::from(s) * scale).round();
                (v as i64).clamp(i64::from(min), i64::from(max)) as i32
            })
            .collect();

        Self::new(quantized, sample_rate, channels, sample_width)
    }

    /// Interleaved samples.
    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Bits per sample.
    pub fn sample_width(&self) -> u16 {
        self.sample_width
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels)
    }

    /// Whether the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in milliseconds.
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_ms(&self) -> f64 {
        self.frames() as f64 * 1000.0 / f64::from(self.sample_rate)
    }

    /// Magnitude that maps to 1.0 when normalizing, `2^(bits - 1)`.
    pub fn full_scale(&self) -> f64 {
        f64::from(1u32 << (self.sample_width - 1))
    }

    /// Largest representable sample.
    #[allow(clippy::cast_possible_truncation)]
    pub fn max_value(&self) -> i32 {
        ((1i64 << (self.sample_width - 1)) - 1) as i32
    }

    /// Smallest representable sample.
    #[allow(clippy::cast_possible_truncation)]
    pub fn min_value(&self) -> i32 {
        (-(1i64 << (self.sample_width - 1))) as i32
    }

    /// Frame index nearest to a timestamp, clamped to the buffer length.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn frame_at(&self, ms: f64) -> usize {
        let frame = (ms * f64::from(self.sample_rate) / 1000.0).round().max(0.0) as usize;
        frame.min(self.frames())
    }

    /// Copy a frame range into a new buffer of the same shape.
    pub fn slice_frames(&self, frames: Range<usize>) -> Self {
        let ch = usize::from(self.channels);
        let end = frames.end.min(self.frames());
        let start = frames.start.min(end);
        Self {
            samples: self.samples[start * ch..end * ch].to_vec(),
            sample_rate: self.sample_rate,
            channels: self.channels,
            sample_width: self.sample_width,
        }
    }

    /// Build a buffer of the same shape around new samples.
    pub(crate) fn with_samples(&self, samples: Vec<i32>) -> Self {
        Self {
            samples,
            sample_rate: self.sample_rate,
            channels: self.channels,
            sample_width: self.sample_width,
        }
    }
}

/// Collapse a mono or stereo buffer into normalized mono floats.
///
/// Stereo frames are averaged; integer samples are divided by
/// `2^(bits - 1)` so the result lies in `[-1.0, 1.0]`.
#[allow(clippy::cast_possible_truncation)]
pub fn reduce_to_mono(buffer: &AudioBuffer) -> Result<Vec<f32>> {
    let scale = buffer.full_scale();

    match buffer.channels() {
        1 => Ok(buffer
            .samples()
            .iter()
            .map(|&s| (f64::from(s) / scale) as f32)
            .collect()),
        2 => Ok(buffer
            .samples()
            .chunks_exact(2)
            .map(|frame| ((f64::from(frame[0]) + f64::from(frame[1])) / 2.0 / scale) as f32)
            .collect()),
        channels => Err(Error::UnsupportedChannelLayout { channels }),
    }
}
