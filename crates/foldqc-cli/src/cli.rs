use clap::{Args, Parser};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "foldqc contributors",
    version,
    about = "foldqc - Summarize structure-prediction confidence reports: per-job average pLDDT, PAE heatmaps and one consolidated score table.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    /// Root folder holding one sub-folder per prediction job.
    #[arg(required = true, value_name = "ROOT")]
    pub root: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // Overrides `failure-policy` from the config file.
    #[command(flatten)]
    pub failure_policy: FailurePolicyFlags,

    /// Skip the average pLDDT stage (no score files, no consolidated report).
    #[arg(long)]
    pub no_scores: bool,

    /// Skip the PAE heatmap stage.
    #[arg(long)]
    pub no_heatmaps: bool,

    /// Override the heatmap resolution in dots per inch.
    #[arg(long, value_name = "DPI")]
    pub dpi: Option<u32>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S heatmap.figure-size=6
    ///
    /// Keys: failure-policy, scan.document-suffix, scan.ignore-suffixes (comma-separated),
    /// scores.enabled, scores.report-file, heatmap.enabled, heatmap.dpi, heatmap.figure-size,
    /// heatmap.max-render-bytes, heatmap.color-scale (auto | fixed:MIN:MAX).
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Mutually exclusive switches for the per-job failure policy.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct FailurePolicyFlags {
    /// Abort the whole run on the first unreadable document (default).
    #[arg(long)]
    pub fail_fast: bool,
    /// Record per-job failures, keep going, write a partial report and exit non-zero.
    #[arg(long)]
    pub isolate_failures: bool,
}
