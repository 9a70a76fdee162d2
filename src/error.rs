//! Error types for audiobot.

use crate::detect::DetectorTag;

/// Result type alias for audiobot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for audiobot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// A detector or model selection did not name a known entry.
    #[error("invalid selection '{value}' (available: {available})")]
    InvalidSelection {
        /// The rejected selection as the caller wrote it.
        value: String,
        /// Comma-separated list of valid names.
        available: String,
    },

    /// No valid audio files found.
    #[error("no valid audio files found in the provided paths")]
    NoValidAudioFiles,

    /// Failed to open audio file.
    #[error("failed to open audio file '{path}'")]
    AudioOpen {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to decode audio.
    #[error("failed to decode audio from '{path}'")]
    AudioDecode {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No audio tracks found.
    #[error("no audio tracks found in '{path}'")]
    NoAudioTracks {
        /// Path to the audio file.
        path: std::path::PathBuf,
    },

    /// Buffer parameters that cannot describe integer PCM audio.
    #[error("invalid audio buffer: {reason}")]
    InvalidBuffer {
        /// Description of the problem.
        reason: String,
    },

    /// Buffer has a channel layout the mono reducer cannot fold.
    #[error("unsupported channel layout: {channels} channels (expected 1 or 2)")]
    UnsupportedChannelLayout {
        /// Channel count of the rejected buffer.
        channels: u16,
    },

    /// A single detector failed or returned malformed points.
    ///
    /// Collected as a warning; never aborts a run.
    #[error("{detector} detector failed: {reason}")]
    DetectorFailure {
        /// Detector that failed.
        detector: DetectorTag,
        /// Description of the failure.
        reason: String,
    },

    /// A planned interval does not fit inside the buffer it is cut from.
    #[error("interval {start_ms:.1}-{end_ms:.1} ms lies outside buffer of {duration_ms:.1} ms")]
    IntervalOutOfRange {
        /// Interval start in milliseconds.
        start_ms: f64,
        /// Interval end in milliseconds.
        end_ms: f64,
        /// Buffer duration in milliseconds.
        duration_ms: f64,
    },

    /// The separation collaborator failed during a refinement pass.
    #[error("separation pass {pass} of {total_passes} failed in {collaborator}")]
    SeparationPassFailure {
        /// One-based pass number.
        pass: u32,
        /// Total passes requested.
        total_passes: u32,
        /// Name of the separator that failed.
        collaborator: String,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to write WAV file.
    #[error("failed to write WAV file '{path}'")]
    WavWriteFailed {
        /// Path to the WAV file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: hound::Error,
    },

    /// Failed to create output directory.
    #[error("failed to create output directory '{path}'")]
    OutputDirCreateFailed {
        /// Path to the output directory.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write JSON output.
    #[error("failed to write JSON output")]
    JsonWrite {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}
