//! Audiobot - critical point detection and clip slicing for recordings.
//!
//! A recording is decoded, optionally refined by voice separation passes,
//! scanned by pluggable detectors for critical points, and the points are
//! synthesized into a bounded set of non-overlapping clips that are cut
//! from the original audio with edge fades.

#![warn(missing_docs)]

pub mod analysis;
pub mod audio;
pub mod cli;
pub mod clipper;
pub mod config;
pub mod constants;
pub mod detect;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod separation;

use clap::{CommandFactory, Parser};
use cli::{Cli, ClipArgs, Command};
use clipper::ClipExtractor;
use config::{Config, config_file_path, load_default_config, save_default_config, validate_config};
use output::FilePlan;
use pipeline::{PassOrchestrator, ProcessOptions, collect_input_files, process_file};
use std::path::PathBuf;
use tracing::{error, info, warn};

pub use error::{Error, Result};

/// Main entry point for the audiobot CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.clip.verbose, cli.clip.quiet);

    if let Some(command) = cli.command {
        return handle_command(command);
    }

    if cli.inputs.is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }

    let config = resolve_config(load_default_config()?, &cli.clip)?;
    clip_files(&cli.inputs, &cli.clip, &config)
}

/// Apply command line overrides on top of the loaded configuration.
///
/// # Errors
///
/// Returns [`Error::ConfigValidation`] or [`Error::InvalidSelection`] if the
/// combined configuration is invalid.
pub fn resolve_config(mut config: Config, args: &ClipArgs) -> Result<Config> {
    if let Some(output) = &args.output {
        config.output.directory.clone_from(output);
    }
    if let Some(detectors) = &args.detectors {
        config.detection.detectors.clone_from(detectors);
    }
    if let Some(passes) = args.passes {
        config.separation.passes = passes;
    }
    if let Some(max_clips) = args.max_clips {
        config.synthesis.max_clips = max_clips;
    }
    if let Some(min_clip_ms) = args.min_clip_ms {
        config.synthesis.min_clip_ms = min_clip_ms;
    }
    if let Some(max_clip_ms) = args.max_clip_ms {
        config.synthesis.max_clip_ms = max_clip_ms;
    }
    if let Some(fade_in) = args.fade_in {
        config.extraction.fade_in_ms = fade_in;
    }
    if let Some(fade_out) = args.fade_out {
        config.extraction.fade_out_ms = fade_out;
    }
    if let Some(curve) = args.fade_curve {
        config.extraction.fade_curve = curve;
    }

    validate_config(&config)?;
    Ok(config)
}

/// Clip every input file with the given options.
fn clip_files(inputs: &[PathBuf], args: &ClipArgs, config: &Config) -> Result<()> {
    use crate::output::progress;
    use std::time::Instant;

    let total_start = Instant::now();

    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        return Err(Error::NoValidAudioFiles);
    }

    info!("Found {} audio file(s) to process", files.len());

    let orchestrator = PassOrchestrator::from_config(config)?;
    let extractor = ClipExtractor::from_config(&config.extraction);
    let options = ProcessOptions {
        output_dir: config.output.directory.clone(),
        plan_only: args.plan_only,
    };

    info!(
        "Detectors: {}; separation passes: {}; at most {} clip(s) of {}-{} ms",
        config.detection.detectors.join(", "),
        orchestrator.total_passes(),
        config.synthesis.max_clips,
        config.synthesis.min_clip_ms,
        config.synthesis.max_clip_ms
    );

    let progress_enabled = !args.quiet && !args.no_progress;
    let file_progress = progress::create_file_progress(files.len(), progress_enabled);

    let mut processed = 0;
    let mut errors = 0;
    let mut total_clips = 0;
    let mut plans = Vec::new();

    for file in &files {
        let name = file.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        progress::set_progress_message(file_progress.as_ref(), &name);

        match process_file(file, &orchestrator, &extractor, &options) {
            Ok(result) => {
                processed += 1;
                if args.plan_only {
                    total_clips += result.plan.len();
                    plans.push(FilePlan {
                        file: file.clone(),
                        duration_ms: result.audio_duration_secs * 1000.0,
                        clips: result.plan,
                        warnings: result.detector_failures,
                        error: None,
                    });
                } else {
                    total_clips += result.clips_written.len();
                }
            }
            Err(e) => {
                error!("Failed to process {}: {}", file.display(), e);
                errors += 1;
                if args.fail_fast {
                    progress::finish_progress(file_progress, "Failed");
                    return Err(e);
                }
                if args.plan_only {
                    plans.push(FilePlan::failed(file.clone(), &e));
                }
            }
        }
        progress::inc_progress(file_progress.as_ref());
    }

    progress::finish_progress(file_progress, "Complete");

    if args.plan_only {
        output::write_plans(std::io::stdout().lock(), &plans)?;
    }

    let total_duration = total_start.elapsed().as_secs_f64();
    info!(
        "Complete: {} processed, {} errors, {} clip(s) in {:.2}s",
        processed, errors, total_clips, total_duration
    );

    if errors > 0 {
        warn!("{} file(s) had errors", errors);
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    // Stdout is reserved for plan output
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_command(command: Command) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action),
    }
}

fn handle_config_command(action: cli::ConfigAction) -> Result<()> {
    use cli::ConfigAction;

    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let saved_path = save_default_config(&Config::default())?;
                println!("Created configuration file: {}", saved_path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            let contents =
                toml::to_string_pretty(&config).map_err(|e| Error::ConfigSerialize { source: e })?;
            print!("{contents}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> ClipArgs {
        let mut full = vec!["audiobot", "in.wav"];
        full.extend_from_slice(argv);
        Cli::try_parse_from(full).unwrap().clip
    }

    #[test]
    fn test_resolve_config_applies_overrides() {
        let config = resolve_config(
            Config::default(),
            &args(&["--max-clips", "3", "--passes", "0", "-o", "out", "-d", "beat"]),
        )
        .unwrap();
        assert_eq!(config.synthesis.max_clips, 3);
        assert_eq!(config.separation.passes, 0);
        assert_eq!(config.output.directory, PathBuf::from("out"));
        assert_eq!(config.detection.detectors, vec!["beat"]);
    }

    #[test]
    fn test_resolve_config_keeps_unset_values() {
        let config = resolve_config(Config::default(), &args(&[])).unwrap();
        assert_eq!(config.synthesis.min_clip_ms, 3_000.0);
        assert_eq!(config.extraction.fade_in_ms, 500.0);
    }

    #[test]
    fn test_resolve_config_validates_combination() {
        let result = resolve_config(Config::default(), &args(&["--min-clip-ms", "20000"]));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));

        let result = resolve_config(Config::default(), &args(&["-d", "spectral"]));
        assert!(matches!(result, Err(Error::InvalidSelection { .. })));
    }
}
