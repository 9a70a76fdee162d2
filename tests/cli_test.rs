//! End-to-end tests for the audiobot binary.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Tone, two seconds of silence, tone again: 12 s at 8 kHz.
fn write_gapped_recording(dir: &Path) -> PathBuf {
    let path = dir.join("gapped.wav");
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for i in 0..(8_000 * 12) {
        let t = f64::from(i) / 8_000.0;
        let value = if (4.0..6.0).contains(&t) {
            0
        } else {
            (12_000.0 * (2.0 * PI * 440.0 * t).sin()) as i16
        };
        writer.write_sample(value).unwrap();
    }
    writer.finalize().unwrap();
    path
}

fn audiobot(config_dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("audiobot");
    cmd.env("AUDIOBOT_CONFIG", config_dir.path().join("config.toml"))
        .env_remove("RUST_LOG")
        .env_remove("AUDIOBOT_OUTPUT_DIR")
        .env_remove("AUDIOBOT_DETECTORS")
        .env_remove("AUDIOBOT_PASSES");
    cmd
}

#[test]
fn test_config_path_uses_env_override() {
    let config_dir = TempDir::new().unwrap();

    audiobot(&config_dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            config_dir.path().join("config.toml").to_string_lossy().as_ref(),
        ));
}

#[test]
fn test_config_init_then_show() {
    let config_dir = TempDir::new().unwrap();

    audiobot(&config_dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(config_dir.path().join("config.toml").exists());

    audiobot(&config_dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[synthesis]"))
        .stdout(predicate::str::contains("max_clips = 10"));
}

#[test]
fn test_plan_only_prints_json() {
    let config_dir = TempDir::new().unwrap();
    let input = write_gapped_recording(config_dir.path());

    let output = audiobot(&config_dir)
        .arg(&input)
        .args(["--plan-only", "--no-progress", "--detectors", "voice-gap"])
        .assert()
        .success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let json: Value = serde_json::from_str(&stdout).expect("valid JSON plan");

    let files = json.as_array().unwrap();
    assert_eq!(files.len(), 1);
    let clips = files[0]["clips"].as_array().unwrap();
    assert_eq!(clips.len(), 1);

    let start = clips[0]["start_ms"].as_f64().unwrap();
    let end = clips[0]["end_ms"].as_f64().unwrap();
    assert!((start - 3_500.0).abs() < 300.0, "start {start}");
    assert!((end - start - 3_000.0).abs() < 1e-6);
    assert_eq!(clips[0]["sources"][0], "voice-gap");
}

#[test]
fn test_writes_clips_to_output_directory() {
    let config_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let input = write_gapped_recording(config_dir.path());

    audiobot(&config_dir)
        .arg(&input)
        .arg("--output")
        .arg(out_dir.path())
        .args(["--no-progress", "-q", "--passes", "0"])
        .assert()
        .success();

    let clip_dir = out_dir.path().join("gapped");
    let written: Vec<PathBuf> = std::fs::read_dir(&clip_dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert!(!written.is_empty());

    for path in &written {
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("clip_") && name.ends_with(".wav"), "{name}");
        let reader = hound::WavReader::open(path).unwrap();
        assert_eq!(reader.spec().sample_rate, 8_000);
        assert_eq!(reader.spec().channels, 1);
    }
}

#[test]
fn test_missing_input_fails() {
    let config_dir = TempDir::new().unwrap();

    audiobot(&config_dir)
        .arg(config_dir.path().join("missing.wav"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no valid audio files"));
}

#[test]
fn test_unknown_detector_fails() {
    let config_dir = TempDir::new().unwrap();
    let input = write_gapped_recording(config_dir.path());

    audiobot(&config_dir)
        .arg(&input)
        .args(["--detectors", "spectral"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid selection 'spectral'"));
}
