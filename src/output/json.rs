//! JSON clip plan output.

use crate::clipper::ClipPlan;
use crate::error::{Error, Result};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Plan for one input file.
#[derive(Debug, Serialize)]
pub struct FilePlan {
    /// Source audio file.
    pub file: PathBuf,
    /// Audio duration in milliseconds.
    pub duration_ms: f64,
    /// Planned clips.
    pub clips: ClipPlan,
    /// Detectors skipped for this file.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Set when the file could not be processed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FilePlan {
    /// Entry for a file that failed before a plan was produced.
    pub fn failed(file: PathBuf, error: &Error) -> Self {
        Self {
            file,
            duration_ms: 0.0,
            clips: ClipPlan::default(),
            warnings: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Write plans as a pretty-printed JSON array followed by a newline.
pub fn write_plans<W: Write>(mut writer: W, plans: &[FilePlan]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, plans).map_err(|e| Error::JsonWrite { source: e })?;
    writeln!(writer)?;
    Ok(())
}
