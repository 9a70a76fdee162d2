//! Plan output and progress display.

mod json;
pub mod progress;

pub use json::{FilePlan, write_plans};
