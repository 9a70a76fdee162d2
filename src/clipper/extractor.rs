//! Cutting planned intervals out of a buffer and fading their edges.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ClipPlan, Interval};
use crate::audio::AudioBuffer;
use crate::config::ExtractionConfig;
use crate::error::{Error, Result};

/// Gain curve applied across a fade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FadeCurve {
    /// Gain rises in proportion to position.
    #[default]
    Linear,
    /// Quarter sine; keeps perceived loudness steady across joins.
    EqualPower,
    /// Gain rises with the square of position.
    Quadratic,
}

impl FadeCurve {
    /// Gain for a position `t` in `[0, 1]`, where 0 is silence.
    pub fn gain(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EqualPower => (t * std::f64::consts::FRAC_PI_2).sin(),
            Self::Quadratic => t * t,
        }
    }
}

impl std::fmt::Display for FadeCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::EqualPower => write!(f, "equal-power"),
            Self::Quadratic => write!(f, "quadratic"),
        }
    }
}

impl std::str::FromStr for FadeCurve {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "linear" => Ok(Self::Linear),
            "equal-power" | "sine" => Ok(Self::EqualPower),
            "quadratic" => Ok(Self::Quadratic),
            other => Err(format!("unknown fade curve: {other}")),
        }
    }
}

/// An extracted, faded clip.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    /// The planned interval this clip was cut from.
    pub interval: Interval,
    /// Clip audio, same shape as the source buffer.
    pub audio: AudioBuffer,
    /// Fade-in actually applied, in milliseconds.
    pub fade_in_ms: f64,
    /// Fade-out actually applied, in milliseconds.
    pub fade_out_ms: f64,
}

/// Cuts clips out of a buffer according to a plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipExtractor {
    fade_in_ms: f64,
    fade_out_ms: f64,
    curve: FadeCurve,
}

impl ClipExtractor {
    /// Create an extractor with linear fades.
    #[must_use]
    pub fn new(fade_in_ms: f64, fade_out_ms: f64) -> Self {
        Self {
            fade_in_ms: fade_in_ms.max(0.0),
            fade_out_ms: fade_out_ms.max(0.0),
            curve: FadeCurve::Linear,
        }
    }

    /// Use a different fade curve.
    #[must_use]
    pub fn with_curve(mut self, curve: FadeCurve) -> Self {
        self.curve = curve;
        self
    }

    /// Create an extractor from configuration.
    #[must_use]
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.fade_in_ms, config.fade_out_ms).with_curve(config.fade_curve)
    }

    /// Extract every planned interval, in plan order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IntervalOutOfRange`] if any interval does not fit
    /// inside the buffer.
    pub fn extract(&self, buffer: &AudioBuffer, plan: &ClipPlan) -> Result<Vec<Clip>> {
        plan.iter()
            .map(|interval| self.extract_interval(buffer, interval))
            .collect()
    }

    /// Extract a single interval.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IntervalOutOfRange`] if the interval is empty, starts
    /// before zero, or ends after the buffer.
    pub fn extract_interval(&self, buffer: &AudioBuffer, interval: &Interval) -> Result<Clip> {
        let duration_ms = buffer.duration_ms();
        // Half a frame of slack for plans built from rounded timestamps
        let tolerance_ms = 500.0 / f64::from(buffer.sample_rate());

        if interval.start_ms < 0.0
            || interval.start_ms >= interval.end_ms
            || interval.end_ms > duration_ms + tolerance_ms
        {
            return Err(Error::IntervalOutOfRange {
                start_ms: interval.start_ms,
                end_ms: interval.end_ms,
                duration_ms,
            });
        }

        let start = buffer.frame_at(interval.start_ms);
        let end = buffer.frame_at(interval.end_ms);
        let mut audio = buffer.slice_frames(start..end);

        let frames = audio.frames();
        let fade_in = ms_to_frames(self.fade_in_ms, buffer.sample_rate()).min(frames / 2);
        let fade_out = ms_to_frames(self.fade_out_ms, buffer.sample_rate()).min(frames / 2);
        audio = self.apply_fades(&audio, fade_in, fade_out);

        debug!(
            "Extracted {:.1}-{:.1} ms ({frames} frames, fades {fade_in}/{fade_out})",
            interval.start_ms, interval.end_ms
        );

        Ok(Clip {
            interval: interval.clone(),
            audio,
            fade_in_ms: frames_to_ms(fade_in, buffer.sample_rate()),
            fade_out_ms: frames_to_ms(fade_out, buffer.sample_rate()),
        })
    }

    /// Scale the first `fade_in` frames up from silence and the last
    /// `fade_out` frames down to silence.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn apply_fades(&self, audio: &AudioBuffer, fade_in: usize, fade_out: usize) -> AudioBuffer {
        let channels = usize::from(audio.channels());
        let frames = audio.frames();
        let (lo, hi) = (f64::from(audio.min_value()), f64::from(audio.max_value()));

        let samples = audio
            .samples()
            .chunks_exact(channels)
            .enumerate()
            .flat_map(|(k, frame)| {
                let gain = if k < fade_in {
                    self.curve.gain(k as f64 / fade_in as f64)
                } else if k >= frames - fade_out {
                    self.curve.gain((frames - 1 - k) as f64 / fade_out as f64)
                } else {
                    1.0
                };
                frame
                    .iter()
                    .map(move |&s| (f64::from(s) * gain).round().clamp(lo, hi) as i32)
            })
            .collect();

        audio.with_samples(samples)
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn ms_to_frames(ms: f64, sample_rate: u32) -> usize {
    (ms * f64::from(sample_rate) / 1000.0).round().max(0.0) as usize
}

#[allow(clippy::cast_precision_loss)]
fn frames_to_ms(frames: usize, sample_rate: u32) -> f64 {
    frames as f64 * 1000.0 / f64::from(sample_rate)
}
