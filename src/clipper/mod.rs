//! Clip planning and extraction.
//!
//! Critical points are synthesized into a bounded [`ClipPlan`], which the
//! [`ClipExtractor`] cuts out of the source buffer and the [`WavWriter`]
//! persists.

mod extractor;
mod plan;
mod synthesizer;
mod writer;

pub use extractor::{Clip, ClipExtractor, FadeCurve};
pub use plan::{ClipPlan, Interval};
pub use synthesizer::{FusedEvent, IntervalSynthesizer, enforce_budget, fuse_events, merge_overlaps};
pub use writer::WavWriter;
