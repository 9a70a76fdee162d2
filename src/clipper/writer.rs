//! WAV file writing.
//!
//! Writes clips to WAV files grouped by source recording.

use std::fs;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter as HoundWriter};

use super::Clip;
use crate::Error;
use crate::audio::AudioBuffer;

/// Writes clips to WAV files.
pub struct WavWriter {
    /// Output directory for clips.
    output_dir: PathBuf,
}

impl WavWriter {
    /// Create a new WAV writer with the given output directory.
    #[must_use]
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Write a clip to a WAV file.
    ///
    /// Creates a subdirectory named after the source recording and writes
    /// the clip at the source's channel count, rate and bit depth.
    ///
    /// # Arguments
    ///
    /// * `clip` - Extracted clip
    /// * `stem` - Source file stem, used for the directory name
    /// * `index` - Position of the clip in its plan
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn write_clip(&self, clip: &Clip, stem: &str, index: usize) -> Result<PathBuf, Error> {
        let safe_stem = sanitize_filename(stem);

        let clip_dir = self.output_dir.join(&safe_stem);
        fs::create_dir_all(&clip_dir).map_err(|e| Error::OutputDirCreateFailed {
            path: clip_dir.clone(),
            source: e,
        })?;

        let filename = generate_filename(
            index,
            clip.interval.start_ms / 1000.0,
            clip.interval.end_ms / 1000.0,
        );
        let output_path = clip_dir.join(filename);

        write_wav_file(&output_path, &clip.audio)?;

        Ok(output_path)
    }
}

/// Sanitize a string for use as a filename/directory name.
///
/// Replaces characters that are invalid in filenames across platforms
/// and prevents path traversal attacks.
fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect();

    sanitized.replace("..", "__")
}

/// Format: `clip_<index>_<start>-<end>.wav`, times in seconds.
fn generate_filename(index: usize, start_time: f64, end_time: f64) -> String {
    format!("clip_{index:02}_{start_time:.1}-{end_time:.1}.wav")
}

/// Smallest WAV container width that holds `bits`.
fn container_bits(bits: u16) -> u16 {
    match bits {
        0..=8 => 8,
        9..=16 => 16,
        17..=24 => 24,
        _ => 32,
    }
}

/// Write a buffer to a WAV file.
fn write_wav_file(path: &Path, audio: &AudioBuffer) -> Result<(), Error> {
    let bits = container_bits(audio.sample_width());
    let shift = bits - audio.sample_width();

    let spec = WavSpec {
        channels: audio.channels(),
        sample_rate: audio.sample_rate(),
        bits_per_sample: bits,
        sample_format: SampleFormat::Int,
    };

    let wav_error = |e| Error::WavWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let mut writer = HoundWriter::create(path, spec).map_err(wav_error)?;

    for &sample in audio.samples() {
        writer.write_sample(sample << shift).map_err(wav_error)?;
    }

    writer.finalize().map_err(wav_error)?;

    Ok(())
}
