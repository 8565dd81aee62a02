// src/lib.rs

pub mod batch;
pub mod cli;
pub mod config;
pub mod env;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod job;
pub mod logging;
pub mod types;

use std::path::Path;
use std::sync::Arc;

use anyhow::anyhow;
use tracing::{debug, info};

use crate::batch::{generate_sweep, render_batch_script, submit_all, SweepPlan};
use crate::cli::{CliArgs, Command, RunArgs, SubmitArgs, SweepArgs};
use crate::config::{load_or_default, ConfigFile};
use crate::env::{EnvOverrides, JobEnvironment};
use crate::errors::Result;
use crate::exec::TokioProcessBackend;
use crate::fs::{FileSystem, RealFileSystem};
use crate::job::JobRunner;

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(&args.config)?;
    debug!(config = %args.config.display(), "configuration loaded");

    match args.command {
        Command::Run(run_args) => run_job(cfg, run_args).await,
        Command::Submit(submit_args) => submit(submit_args).await,
        Command::Sweep(sweep_args) => sweep(cfg, &args.config, sweep_args),
        Command::Script => {
            let config_path = existing_config(&args.config);
            print!("{}", render_batch_script(&cfg.scheduler, config_path.as_deref()));
            Ok(())
        }
    }
}

async fn run_job(cfg: ConfigFile, args: RunArgs) -> Result<()> {
    let overrides = EnvOverrides {
        job_id: args.job_id,
        ntasks: args.ntasks,
        submit_dir: args.submit_dir,
    };
    let env = JobEnvironment::from_process(&overrides)?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let mut runner = JobRunner::new(fs, TokioProcessBackend::new(), cfg, env);

    if args.dry_run {
        let (paths, spec) = runner.plan()?;
        println!("mdjob dry-run");
        println!("  source:    {}", paths.source.display());
        println!("  workspace: {}", paths.workspace.display());
        println!("  results:   {}", paths.results.display());
        println!("  command:   {spec}");
        return Ok(());
    }

    let report = runner.run().await?;
    info!(
        staged = report.staged.files,
        collected = report.collected.files,
        results = %report.paths.results.display(),
        "run complete"
    );
    Ok(())
}

async fn submit(args: SubmitArgs) -> Result<()> {
    let fs = RealFileSystem;

    if args.dry_run {
        for dir in batch::submit::submission_dirs(&fs, &args.root)? {
            println!("{}", dir.display());
        }
        return Ok(());
    }

    let mut backend = TokioProcessBackend::new();
    let summary = submit_all(&fs, &mut backend, &args.root).await?;

    println!(
        "submitted {} job(s), {} failed",
        summary.submitted.len(),
        summary.failed.len()
    );
    for (dir, reason) in summary.failed.iter() {
        println!("  failed: {} ({reason})", dir.display());
    }

    if summary.all_ok() {
        Ok(())
    } else {
        Err(anyhow!("{} submission(s) failed", summary.failed.len()).into())
    }
}

fn sweep(cfg: ConfigFile, config_path: &Path, args: SweepArgs) -> Result<()> {
    let mut plan = SweepPlan::from_config(&cfg, args.base_dir, args.temperatures, args.pressures);
    plan.config_path = existing_config(config_path);

    let dirs = generate_sweep(&RealFileSystem, &cfg, &plan)?;
    for dir in dirs.iter() {
        println!("{}", dir.display());
    }
    Ok(())
}

/// Absolute path of the config file, if one is actually on disk.
fn existing_config(path: &Path) -> Option<std::path::PathBuf> {
    std::fs::canonicalize(path).ok()
}
