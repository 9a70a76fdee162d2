//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "audiobot";

/// Hysteresis envelope defaults.
pub mod envelope {
    /// Samples per envelope chunk (10 ms at 44.1 kHz).
    pub const DEFAULT_CHUNK_WIDTH: usize = 441;

    /// Maximum upward movement of the buoy per sample, in dB.
    pub const DEFAULT_DRIFT_STEP_DB: f32 = 0.1;

    /// Level the first chunk is seeded from, in dB.
    pub const DEFAULT_FLOOR_DB: f32 = -20.0;
}

/// Amplitude to decibel conversion.
pub mod loudness {
    /// Smallest amplitude considered, avoids `log10(0)`.
    pub const AMIN: f32 = 1e-5;

    /// Reference amplitude mapped to 0 dB.
    pub const REFERENCE: f32 = 1.0;

    /// Dynamic range kept below the loudest sample.
    pub const TOP_DB: f32 = 80.0;
}

/// Built-in detector defaults.
pub mod detection {
    /// Envelope level below which a volume critical point is emitted.
    pub const DEFAULT_LOW_VOLUME_THRESHOLD_DB: f32 = -15.0;

    /// Peak magnitude at or below which the isolated voice counts as silent.
    pub const DEFAULT_VOICE_GAP_THRESHOLD: f32 = 0.01;

    /// Shortest silent run reported as a voice gap.
    pub const DEFAULT_VOICE_GAP_MIN_MS: f64 = 500.0;

    /// Voice gap scan hop.
    pub const VOICE_GAP_HOP_MS: f64 = 250.0;

    /// Keep every n-th tracked beat so adjacent pairs span whole bars.
    pub const DEFAULT_BEAT_STRIDE: usize = 8;

    /// Onset analysis frame length in samples.
    pub const BEAT_FRAME_LENGTH: usize = 1024;

    /// Onset analysis hop in samples.
    pub const BEAT_HOP_LENGTH: usize = 512;

    /// Minimum spacing between two tracked beats.
    pub const BEAT_REFRACTORY_MS: f64 = 250.0;

    /// Frames on either side used for the adaptive onset threshold.
    pub const BEAT_THRESHOLD_RADIUS: usize = 16;

    /// Detectors registered when the configuration names none.
    pub const DEFAULT_DETECTORS: &[&str] = &["voice-gap", "volume", "beat"];
}

/// Interval synthesis defaults.
pub mod synthesis {
    /// Shortest clip, derived from the 3 s base duration.
    pub const DEFAULT_MIN_CLIP_MS: f64 = 3_000.0;

    /// Longest clip.
    pub const DEFAULT_MAX_CLIP_MS: f64 = 10_000.0;

    /// Output cardinality cap.
    pub const DEFAULT_MAX_CLIPS: usize = 10;

    /// Cross-detector correlation window.
    pub const DEFAULT_FUSION_EPSILON_MS: f64 = 100.0;
}

/// Clip extraction defaults.
pub mod extraction {
    /// Fade-in length.
    pub const DEFAULT_FADE_IN_MS: f64 = 500.0;

    /// Fade-out length.
    pub const DEFAULT_FADE_OUT_MS: f64 = 500.0;

    /// Default output directory for clips.
    pub const DEFAULT_OUTPUT_DIR: &str = "clips";
}

/// Voice separation defaults.
pub mod separation {
    /// Number of refinement passes.
    pub const DEFAULT_PASSES: u32 = 1;

    /// High-pass corner of the center-channel isolator.
    pub const DEFAULT_LOW_CUT_HZ: f32 = 200.0;

    /// Low-pass corner of the center-channel isolator.
    pub const DEFAULT_HIGH_CUT_HZ: f32 = 4_000.0;
}

/// Supported audio file extensions for input collection.
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "flac", "mp3", "m4a", "aac"];
