//! Amplitude to decibel conversion.

use crate::constants::loudness::{AMIN, REFERENCE, TOP_DB};

/// Convert normalized amplitudes to decibels relative to full scale.
///
/// Magnitudes are floored at `AMIN`, and the result is clipped to
/// `TOP_DB` below its loudest sample.
pub fn amplitude_to_db(samples: &[f32]) -> Vec<f32> {
    let ref_db = 20.0 * REFERENCE.max(AMIN).log10();
    let mut levels: Vec<f32> = samples
        .iter()
        .map(|&s| 20.0 * s.abs().max(AMIN).log10() - ref_db)
        .collect();

    let peak = levels.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let floor = peak - TOP_DB;
    for level in &mut levels {
        *level = level.max(floor);
    }

    levels
}
