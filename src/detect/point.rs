//! Critical point types.

use serde::{Deserialize, Serialize};

/// Which detector produced a critical point.
///
/// Declaration order is tie-break priority: when two points share a
/// timestamp the earlier variant sorts first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum DetectorTag {
    /// Silence in the isolated voice.
    VoiceGap,
    /// Low envelope level.
    Volume,
    /// Tracked beat.
    Beat,
    /// Pitch change (no built-in detector).
    Pitch,
    /// Tempo change (no built-in detector).
    Tempo,
}

impl DetectorTag {
    /// All tags in priority order.
    pub const ALL: [Self; 5] = [
        Self::VoiceGap,
        Self::Volume,
        Self::Beat,
        Self::Pitch,
        Self::Tempo,
    ];

    /// Stable name used in configuration and output.
    pub const fn name(self) -> &'static str {
        match self {
            Self::VoiceGap => "voice-gap",
            Self::Volume => "volume",
            Self::Beat => "beat",
            Self::Pitch => "pitch",
            Self::Tempo => "tempo",
        }
    }

    /// Whether events of this tag are paired into spans rather than
    /// windowed around a single instant.
    pub const fn is_paired(self) -> bool {
        matches!(self, Self::Beat)
    }
}

impl std::fmt::Display for DetectorTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A timestamp flagged by a detector as a candidate clip boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriticalPoint {
    /// Position in the recording.
    pub timestamp_ms: f64,
    /// Detector that emitted the point.
    pub source: DetectorTag,
    /// Relative importance, summed when points fuse.
    pub weight: f64,
}
