//! Processing pipeline components.

mod coordinator;
mod orchestrator;
mod processor;

pub use coordinator::{ProcessOptions, clip_stem, collect_input_files};
pub use orchestrator::{PassOrchestrator, PassOutcome};
pub use processor::{ProcessResult, process_file};
