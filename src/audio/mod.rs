//! Audio buffers, decoding and loudness conversion.

mod buffer;
mod decode;
mod loudness;

pub use buffer::{AudioBuffer, reduce_to_mono};
pub use decode::decode_audio_file;
pub use loudness::amplitude_to_db;
