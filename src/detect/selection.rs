//! Detector selection by index or name.

use std::convert::Infallible;
use std::str::FromStr;

use super::{BeatDetector, Detector, DetectorTag, VoiceGapDetector, VolumeDetector};
use crate::analysis::EnvelopeFilter;
use crate::config::Config;
use crate::error::{Error, Result};

/// Detectors that ship with the crate, in index order.
pub const BUILTIN_DETECTORS: [DetectorTag; 3] =
    [DetectorTag::VoiceGap, DetectorTag::Volume, DetectorTag::Beat];

/// A user's choice of detector, either positional or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Position in [`BUILTIN_DETECTORS`].
    Index(usize),
    /// Detector name, e.g. `voice-gap`.
    Name(String),
}

impl FromStr for Selection {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Ok(s.parse::<usize>()
            .map_or_else(|_| Self::Name(s.to_lowercase().replace('_', "-")), Self::Index))
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Resolve a selection against the built-in detectors.
pub fn resolve_detector(selection: &Selection) -> Result<DetectorTag> {
    let found = match selection {
        Selection::Index(i) => BUILTIN_DETECTORS.get(*i).copied(),
        Selection::Name(name) => BUILTIN_DETECTORS
            .iter()
            .copied()
            .find(|tag| tag.name() == name),
    };

    found.ok_or_else(|| Error::InvalidSelection {
        value: selection.to_string(),
        available: BUILTIN_DETECTORS
            .iter()
            .enumerate()
            .map(|(i, tag)| format!("[{i}] {tag}"))
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Build the detectors named in the configuration, in the order given.
///
/// Duplicate selections are registered once.
pub fn build_detectors(config: &Config) -> Result<Vec<Box<dyn Detector>>> {
    let detection = &config.detection;
    let mut tags: Vec<DetectorTag> = Vec::new();
    for raw in &detection.detectors {
        let Ok(selection) = raw.parse::<Selection>();
        let tag = resolve_detector(&selection)?;
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    let filter = EnvelopeFilter::new(
        config.envelope.chunk_width_samples,
        config.envelope.drift_step_db,
        config.envelope.floor_db,
    );

    Ok(tags
        .into_iter()
        .filter_map(|tag| -> Option<Box<dyn Detector>> {
            match tag {
                DetectorTag::VoiceGap => Some(Box::new(VoiceGapDetector::new(
                    detection.voice_gap_threshold,
                    detection.voice_gap_min_ms,
                ))),
                DetectorTag::Volume => Some(Box::new(VolumeDetector::new(
                    filter,
                    detection.low_volume_threshold_db,
                ))),
                DetectorTag::Beat => Some(Box::new(BeatDetector::new(detection.beat_stride))),
                DetectorTag::Pitch | DetectorTag::Tempo => None,
            }
        })
        .collect())
}
