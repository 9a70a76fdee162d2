//! Configuration type definitions.

use crate::clipper::FadeCurve;
use crate::constants::{detection, envelope, extraction, separation, synthesis};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hysteresis envelope settings.
    pub envelope: EnvelopeConfig,

    /// Detector registration and thresholds.
    pub detection: DetectionConfig,

    /// Clip plan bounds.
    pub synthesis: SynthesisConfig,

    /// Clip fade settings.
    pub extraction: ExtractionConfig,

    /// Voice separation settings.
    pub separation: SeparationConfig,

    /// Output settings.
    pub output: OutputConfig,
}

/// Hysteresis envelope settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// Samples per envelope chunk.
    pub chunk_width_samples: usize,

    /// Maximum upward buoy movement per sample, in dB.
    pub drift_step_db: f32,

    /// Starting level of the buoy, in dB.
    pub floor_db: f32,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            chunk_width_samples: envelope::DEFAULT_CHUNK_WIDTH,
            drift_step_db: envelope::DEFAULT_DRIFT_STEP_DB,
            floor_db: envelope::DEFAULT_FLOOR_DB,
        }
    }
}

/// Detector registration and thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Detectors to register, by name or index.
    pub detectors: Vec<String>,

    /// Envelope level below which a volume point is emitted.
    pub low_volume_threshold_db: f32,

    /// Peak magnitude at or below which the voice counts as silent.
    pub voice_gap_threshold: f32,

    /// Shortest voice gap reported, in milliseconds.
    pub voice_gap_min_ms: f64,

    /// Keep every n-th beat.
    pub beat_stride: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            detectors: detection::DEFAULT_DETECTORS
                .iter()
                .map(ToString::to_string)
                .collect(),
            low_volume_threshold_db: detection::DEFAULT_LOW_VOLUME_THRESHOLD_DB,
            voice_gap_threshold: detection::DEFAULT_VOICE_GAP_THRESHOLD,
            voice_gap_min_ms: detection::DEFAULT_VOICE_GAP_MIN_MS,
            beat_stride: detection::DEFAULT_BEAT_STRIDE,
        }
    }
}

/// Clip plan bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Shortest clip in milliseconds.
    pub min_clip_ms: f64,

    /// Longest clip in milliseconds.
    pub max_clip_ms: f64,

    /// Maximum number of clips.
    pub max_clips: usize,

    /// Window within which points from different detectors fuse.
    pub fusion_epsilon_ms: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            min_clip_ms: synthesis::DEFAULT_MIN_CLIP_MS,
            max_clip_ms: synthesis::DEFAULT_MAX_CLIP_MS,
            max_clips: synthesis::DEFAULT_MAX_CLIPS,
            fusion_epsilon_ms: synthesis::DEFAULT_FUSION_EPSILON_MS,
        }
    }
}

/// Clip fade settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Fade-in length in milliseconds.
    pub fade_in_ms: f64,

    /// Fade-out length in milliseconds.
    pub fade_out_ms: f64,

    /// Gain curve for both fades.
    pub fade_curve: FadeCurve,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            fade_in_ms: extraction::DEFAULT_FADE_IN_MS,
            fade_out_ms: extraction::DEFAULT_FADE_OUT_MS,
            fade_curve: FadeCurve::default(),
        }
    }
}

/// Voice separation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparationConfig {
    /// Refinement passes before detection; 0 disables separation.
    pub passes: u32,

    /// High-pass corner of the built-in isolator, in Hz.
    pub low_cut_hz: f32,

    /// Low-pass corner of the built-in isolator, in Hz.
    pub high_cut_hz: f32,
}

impl Default for SeparationConfig {
    fn default() -> Self {
        Self {
            passes: separation::DEFAULT_PASSES,
            low_cut_hz: separation::DEFAULT_LOW_CUT_HZ,
            high_cut_hz: separation::DEFAULT_HIGH_CUT_HZ,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory clips are written under.
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(extraction::DEFAULT_OUTPUT_DIR),
        }
    }
}
