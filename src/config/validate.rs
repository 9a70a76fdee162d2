//! Configuration validation.

use crate::config::Config;
use crate::detect::{Selection, resolve_detector};
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_envelope(config)?;
    validate_detection(config)?;
    validate_synthesis(config)?;
    validate_extraction(config)?;
    validate_separation(config)?;
    Ok(())
}

fn invalid(message: String) -> Error {
    Error::ConfigValidation { message }
}

fn validate_envelope(config: &Config) -> Result<()> {
    let envelope = &config.envelope;

    if envelope.chunk_width_samples == 0 {
        return Err(invalid("chunk_width_samples must be at least 1".to_string()));
    }

    if envelope.drift_step_db <= 0.0 || !envelope.drift_step_db.is_finite() {
        return Err(invalid(format!(
            "drift_step_db must be positive, got {}",
            envelope.drift_step_db
        )));
    }

    Ok(())
}

fn validate_detection(config: &Config) -> Result<()> {
    let detection = &config.detection;

    for raw in &detection.detectors {
        let Ok(selection) = raw.parse::<Selection>();
        resolve_detector(&selection)?;
    }

    if detection.beat_stride == 0 {
        return Err(invalid("beat_stride must be at least 1".to_string()));
    }

    if detection.voice_gap_threshold < 0.0 {
        return Err(invalid(format!(
            "voice_gap_threshold must be non-negative, got {}",
            detection.voice_gap_threshold
        )));
    }

    if detection.voice_gap_min_ms < 0.0 {
        return Err(invalid(format!(
            "voice_gap_min_ms must be non-negative, got {}",
            detection.voice_gap_min_ms
        )));
    }

    Ok(())
}

fn validate_synthesis(config: &Config) -> Result<()> {
    let synthesis = &config.synthesis;

    if synthesis.min_clip_ms <= 0.0 {
        return Err(invalid(format!(
            "min_clip_ms must be positive, got {}",
            synthesis.min_clip_ms
        )));
    }

    if synthesis.min_clip_ms > synthesis.max_clip_ms {
        return Err(invalid(format!(
            "min_clip_ms ({}) exceeds max_clip_ms ({})",
            synthesis.min_clip_ms, synthesis.max_clip_ms
        )));
    }

    if synthesis.fusion_epsilon_ms < 0.0 {
        return Err(invalid(format!(
            "fusion_epsilon_ms must be non-negative, got {}",
            synthesis.fusion_epsilon_ms
        )));
    }

    Ok(())
}

fn validate_extraction(config: &Config) -> Result<()> {
    let extraction = &config.extraction;

    if extraction.fade_in_ms < 0.0 || extraction.fade_out_ms < 0.0 {
        return Err(invalid(format!(
            "fades must be non-negative, got in={} out={}",
            extraction.fade_in_ms, extraction.fade_out_ms
        )));
    }

    Ok(())
}

fn validate_separation(config: &Config) -> Result<()> {
    let separation = &config.separation;

    if separation.low_cut_hz < 0.0 || separation.low_cut_hz >= separation.high_cut_hz {
        return Err(invalid(format!(
            "separation band must satisfy 0 <= low_cut_hz < high_cut_hz, got {}-{}",
            separation.low_cut_hz, separation.high_cut_hz
        )));
    }

    Ok(())
}
