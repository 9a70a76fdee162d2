//! Signal-level building blocks shared by the detectors and the clipper.

mod envelope;
mod search;

pub use envelope::{Envelope, EnvelopeFilter, Reseed};
pub use search::{Neighbors, search};
