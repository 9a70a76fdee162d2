//! Critical point detection.
//!
//! Detectors are pluggable: anything implementing [`Detector`] can be
//! registered with the pass orchestrator. The built-in ones cover voice
//! gaps, low volume and beats; pitch and tempo are tags only and have no
//! built-in implementation.

mod beat;
mod collector;
mod point;
mod selection;
mod voice_gap;
mod volume;

pub use beat::BeatDetector;
pub use collector::{Collection, CriticalPointCollector};
pub use point::{CriticalPoint, DetectorTag};
pub use selection::{BUILTIN_DETECTORS, Selection, build_detectors, resolve_detector};
pub use voice_gap::VoiceGapDetector;
pub use volume::VolumeDetector;

use crate::audio::AudioBuffer;
use crate::error::Result;

/// A raw detector output: `(timestamp_ms, weight)`.
pub type RawPoint = (f64, f64);

/// What a detector sees: the buffer and its normalized mono mix.
#[derive(Debug, Clone, Copy)]
pub struct DetectionInput<'a> {
    /// The buffer being analyzed.
    pub buffer: &'a AudioBuffer,
    /// Mono reduction of `buffer`.
    pub mono: &'a [f32],
}

/// A source of critical points.
pub trait Detector: Send + Sync {
    /// Tag attached to every point this detector emits.
    fn tag(&self) -> DetectorTag;

    /// Produce timestamps within `[0, buffer duration]`.
    fn detect(&self, input: &DetectionInput<'_>) -> Result<Vec<RawPoint>>;
}
