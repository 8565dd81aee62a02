// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line arguments for `mdjob`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mdjob",
    version,
    about = "Stage, run and collect containerised MD simulations on a Slurm cluster.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// If the default file is absent, built-in defaults are used.
    #[arg(long, global = true, value_name = "PATH", default_value = "Mdjob.toml")]
    pub config: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `MDJOB_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Stage the current directory to scratch, run the simulation and
    /// collect results (intended to run inside a Slurm allocation).
    Run(RunArgs),

    /// Run `sbatch submit.sh` in every subdirectory that has one.
    Submit(SubmitArgs),

    /// Generate one submission directory per temperature/pressure pair.
    Sweep(SweepArgs),

    /// Print the batch script rendered from the scheduler directives.
    Script,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Job identifier; overrides `SLURM_JOB_ID`.
    #[arg(long, value_name = "ID")]
    pub job_id: Option<String>,

    /// Number of MPI processes; overrides `SLURM_NTASKS`.
    #[arg(long, value_name = "N")]
    pub ntasks: Option<u32>,

    /// Base directory for results; overrides `SLURM_SUBMIT_DIR`.
    #[arg(long, value_name = "DIR")]
    pub submit_dir: Option<PathBuf>,

    /// Resolve paths and print the launch command without running anything.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Args)]
pub struct SubmitArgs {
    /// Directory whose immediate subdirectories are scanned.
    #[arg(value_name = "ROOT", default_value = ".")]
    pub root: PathBuf,

    /// List the directories that would be submitted.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Args)]
pub struct SweepArgs {
    /// Output directory; overrides `[sweep].base_dir`.
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Temperatures in K; overrides `[sweep].temperatures`.
    #[arg(long = "temp", value_name = "K", num_args = 1.., value_delimiter = ',')]
    pub temperatures: Vec<f64>,

    /// Pressures in bar; overrides `[sweep].pressures`.
    #[arg(long = "pressure", value_name = "BAR", num_args = 1.., value_delimiter = ',')]
    pub pressures: Vec<f64>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
