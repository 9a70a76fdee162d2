//! Pipeline coordination for file processing.

use crate::constants::AUDIO_EXTENSIONS;
use crate::error::Result;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Options for processing a single file.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Root directory for written clips.
    pub output_dir: PathBuf,
    /// Plan only; do not extract or write audio.
    pub plan_only: bool,
}

/// Name used for a file's clip directory.
pub fn clip_stem(input: &Path) -> Cow<'_, str> {
    // Non-UTF-8 names are kept with replacement characters
    input
        .file_stem()
        .map_or(Cow::Borrowed("output"), |s| s.to_string_lossy())
}

/// Collect input files from paths (files and directories).
///
/// Directory contents are returned sorted so runs are reproducible.
pub fn collect_input_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_audio_file(path) {
                files.push(path.clone());
            } else {
                warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            let mut found = Vec::new();
            collect_audio_files_recursive(path, &mut found)?;
            found.sort();
            files.extend(found);
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    Ok(files)
}

/// Recursively collect audio files from a directory.
fn collect_audio_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            collect_audio_files_recursive(&path, files)?;
        } else if is_audio_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

/// Check if a file is a supported audio format.
fn is_audio_file(path: &Path) -> bool {
    use std::ffi::OsStr;

    path.extension().is_some_and(|ext| {
        AUDIO_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(OsStr::new(known)))
    })
}
