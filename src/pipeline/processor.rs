//! Single file processing pipeline.

use crate::audio::decode_audio_file;
use crate::clipper::{ClipExtractor, ClipPlan, WavWriter};
use crate::error::Result;
use crate::pipeline::{PassOrchestrator, ProcessOptions, clip_stem};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Process a single audio file: decode, plan, and write clips.
///
/// Clips are cut from the decoded (unseparated) audio; separation only
/// steers where the cuts go.
///
/// # Arguments
///
/// * `input_path` - Path to input audio file
/// * `orchestrator` - Pass orchestrator holding the separator and detectors
/// * `extractor` - Clip extractor with fade settings
/// * `options` - Output directory and plan-only switch
pub fn process_file(
    input_path: &Path,
    orchestrator: &PassOrchestrator,
    extractor: &ClipExtractor,
    options: &ProcessOptions,
) -> Result<ProcessResult> {
    use crate::output::progress;

    let start_time = Instant::now();

    info!("Processing: {}", input_path.display());

    let buffer = decode_audio_file(input_path)?;
    let audio_duration_secs = buffer.duration_ms() / 1000.0;
    info!(
        "Decoded {} of audio ({} ch, {} Hz, {}-bit)",
        progress::format_duration(audio_duration_secs),
        buffer.channels(),
        buffer.sample_rate(),
        buffer.sample_width()
    );

    let outcome = orchestrator.run(&buffer)?;
    let detector_failures: Vec<String> = outcome.failures.iter().map(ToString::to_string).collect();
    info!(
        "Found {} critical point(s), planned {} clip(s)",
        outcome.points.len(),
        outcome.plan.len()
    );

    let mut clips_written = Vec::new();
    if !options.plan_only && !outcome.plan.is_empty() {
        let clips = extractor.extract(&buffer, &outcome.plan)?;
        let writer = WavWriter::new(options.output_dir.clone());
        let stem = clip_stem(input_path);
        for (index, clip) in clips.iter().enumerate() {
            let path = writer.write_clip(clip, &stem, index + 1)?;
            debug!("Wrote {}", path.display());
            clips_written.push(path);
        }
    }

    let duration_secs = start_time.elapsed().as_secs_f64();
    let realtime_factor = if duration_secs > 0.0 {
        audio_duration_secs / duration_secs
    } else {
        0.0
    };
    info!(
        "Processed {} in {:.2}s ({:.1}x realtime)",
        input_path.display(),
        duration_secs,
        realtime_factor
    );

    Ok(ProcessResult {
        plan: outcome.plan,
        clips_written,
        detector_failures,
        duration_secs,
        audio_duration_secs,
    })
}

/// Result of processing a single file.
#[derive(Debug)]
pub struct ProcessResult {
    /// The clip plan for the file.
    pub plan: ClipPlan,
    /// Paths of written clips, empty in plan-only mode.
    pub clips_written: Vec<PathBuf>,
    /// Detectors that were skipped, as messages.
    pub detector_failures: Vec<String>,
    /// Processing duration in seconds.
    pub duration_secs: f64,
    /// Audio duration in seconds.
    pub audio_duration_secs: f64,
}
