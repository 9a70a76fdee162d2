//! CLI argument definitions.

use crate::cli::validators::{parse_clip_length_ms, parse_duration_ms};
use crate::clipper::FadeCurve;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Find the interesting parts of recordings and cut them into clips.
#[derive(Debug, Parser)]
#[command(name = "audiobot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Input files or directories to clip.
    pub inputs: Vec<PathBuf>,

    /// Common options for clipping.
    #[command(flatten)]
    pub clip: ClipArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for clipping inputs.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct ClipArgs {
    /// Output directory for clips.
    #[arg(short, long, env = "AUDIOBOT_OUTPUT_DIR")]
    pub output: Option<PathBuf>,

    /// Detectors to run, by name or index (comma-separated).
    #[arg(short, long, value_delimiter = ',', env = "AUDIOBOT_DETECTORS")]
    pub detectors: Option<Vec<String>>,

    /// Number of voice separation passes (0 disables separation).
    #[arg(long, env = "AUDIOBOT_PASSES")]
    pub passes: Option<u32>,

    /// Maximum number of clips per file.
    #[arg(long)]
    pub max_clips: Option<usize>,

    /// Shortest clip in milliseconds.
    #[arg(long, value_parser = parse_clip_length_ms)]
    pub min_clip_ms: Option<f64>,

    /// Longest clip in milliseconds.
    #[arg(long, value_parser = parse_clip_length_ms)]
    pub max_clip_ms: Option<f64>,

    /// Fade-in length in milliseconds.
    #[arg(long, value_parser = parse_duration_ms)]
    pub fade_in: Option<f64>,

    /// Fade-out length in milliseconds.
    #[arg(long, value_parser = parse_duration_ms)]
    pub fade_out: Option<f64>,

    /// Fade curve (linear, equal-power, quadratic).
    #[arg(long)]
    pub fade_curve: Option<FadeCurve>,

    /// Print the clip plan as JSON instead of writing audio.
    #[arg(long)]
    pub plan_only: bool,

    /// Disable the progress bar.
    #[arg(long)]
    pub no_progress: bool,

    /// Stop on first error.
    #[arg(long)]
    pub fail_fast: bool,

    /// Only log warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_simple() {
        let cli = Cli::try_parse_from(["audiobot", "song.wav"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        assert_eq!(cli.inputs.len(), 1);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_with_options() {
        let cli = Cli::try_parse_from([
            "audiobot",
            "song.wav",
            "--passes",
            "2",
            "--max-clips",
            "4",
            "--min-clip-ms",
            "2000",
            "--fade-in",
            "250",
            "--fade-curve",
            "equal-power",
            "-d",
            "volume,0",
            "-q",
        ])
        .unwrap();
        assert_eq!(cli.clip.passes, Some(2));
        assert_eq!(cli.clip.max_clips, Some(4));
        assert_eq!(cli.clip.min_clip_ms, Some(2000.0));
        assert_eq!(cli.clip.fade_in, Some(250.0));
        assert_eq!(cli.clip.fade_curve, Some(FadeCurve::EqualPower));
        assert_eq!(
            cli.clip.detectors,
            Some(vec!["volume".to_string(), "0".to_string()])
        );
        assert!(cli.clip.quiet);
    }

    #[test]
    fn test_cli_rejects_bad_lengths() {
        assert!(Cli::try_parse_from(["audiobot", "a.wav", "--min-clip-ms", "0"]).is_err());
        assert!(Cli::try_parse_from(["audiobot", "a.wav", "--fade-out", "-5"]).is_err());
        assert!(Cli::try_parse_from(["audiobot", "a.wav", "--fade-curve", "cubic"]).is_err());
    }

    #[test]
    fn test_cli_verbosity_count() {
        let cli = Cli::try_parse_from(["audiobot", "a.wav", "-vv"]).unwrap();
        assert_eq!(cli.clip.verbose, 2);
    }

    #[test]
    fn test_cli_parse_config_subcommand() {
        let cli = Cli::try_parse_from(["audiobot", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Show
            })
        ));
    }
}
