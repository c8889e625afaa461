use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// msmkit Markov chain analysis.
#[derive(Parser)]
#[command(
    name = "msmkit",
    version,
    about = "Assessment, spectral analysis and expected counts of Markov chains"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Analyze one transition or rate matrix and print a JSON report.
    Analyze(AnalyzeArgs),
}

/// Arguments for the `analyze` subcommand.
#[derive(clap::Args)]
pub struct AnalyzeArgs {
    /// Path to the TOML matrix description.
    #[arg(short, long, default_value = "matrix.toml")]
    pub input: PathBuf,

    /// Write the JSON report here instead of standard output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
