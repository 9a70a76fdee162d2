//! Voice separation.
//!
//! A [`Separator`] takes a buffer and returns one of the same shape that
//! keeps only the isolated voice. The pass orchestrator feeds each pass's
//! output into the next.

mod center;

pub use center::CenterChannelIsolator;

use crate::audio::AudioBuffer;
use crate::config::SeparationConfig;

/// Error type returned by separators.
pub type SeparationError = Box<dyn std::error::Error + Send + Sync>;

/// A voice separation collaborator.
pub trait Separator: Send + Sync {
    /// Name used in logs and failure reports.
    fn name(&self) -> &str;

    /// Return an isolated-voice buffer with the input's channel count,
    /// sample rate and length.
    fn separate(&self, input: &AudioBuffer) -> Result<AudioBuffer, SeparationError>;
}

/// Build the built-in separator from configuration.
pub fn build_separator(config: &SeparationConfig) -> Box<dyn Separator> {
    Box::new(CenterChannelIsolator::new(config.low_cut_hz, config.high_cut_hz))
}
