// src/batch/sweep.rs

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use tracing::{debug, info};

use crate::config::ConfigFile;
use crate::errors::{JobError, Result};
use crate::fs::FileSystem;

use super::script::{render_batch_script, SUBMIT_SCRIPT};

/// Used when no pressure is configured: 1 atm expressed in bar.
pub const DEFAULT_PRESSURE_BAR: f64 = 1.01325;

const BAR_TO_ATM: f64 = 0.986923;

/// Everything needed to lay out a sweep.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    pub base_dir: PathBuf,
    pub temperatures: Vec<f64>,
    /// Bar.
    pub pressures: Vec<f64>,
    pub template: PathBuf,
    pub aux_files: Vec<PathBuf>,
    /// Config path embedded in each `submit.sh`.
    pub config_path: Option<PathBuf>,
}

impl SweepPlan {
    /// Take the `[sweep]` section, letting non-empty CLI values win.
    pub fn from_config(
        cfg: &ConfigFile,
        base_dir: Option<PathBuf>,
        temperatures: Vec<f64>,
        pressures: Vec<f64>,
    ) -> Self {
        let pick = |cli: Vec<f64>, file: &Vec<f64>| if cli.is_empty() { file.clone() } else { cli };
        Self {
            base_dir: base_dir.unwrap_or_else(|| cfg.sweep.base_dir.clone()),
            temperatures: pick(temperatures, &cfg.sweep.temperatures),
            pressures: pick(pressures, &cfg.sweep.pressures),
            template: cfg.sweep.template.clone(),
            aux_files: cfg.sweep.aux_files.clone(),
            config_path: None,
        }
    }

    fn effective_pressures(&self) -> Vec<f64> {
        if self.pressures.is_empty() {
            vec![DEFAULT_PRESSURE_BAR]
        } else {
            self.pressures.clone()
        }
    }
}

pub fn point_dir_name(temp: f64, pressure_bar: f64) -> String {
    format!("T_{temp}_P_{pressure_bar}")
}

/// Substitute `{temp}` (K) and `{press}` (atm) in the input template.
pub fn render_input(template: &str, temp: f64, pressure_bar: f64) -> String {
    let pressure_atm = pressure_bar * BAR_TO_ATM;
    template
        .replace("{temp}", &temp.to_string())
        .replace("{press}", &pressure_atm.to_string())
}

/// Create one directory per (temperature, pressure) pair containing the
/// rendered input, the auxiliary files and a batch script.
///
/// Directories are created if missing; files inside are overwritten.
/// Returns the directories in generation order.
pub fn generate_sweep(
    fs: &dyn FileSystem,
    cfg: &ConfigFile,
    plan: &SweepPlan,
) -> Result<Vec<PathBuf>> {
    if plan.temperatures.is_empty() {
        return Err(JobError::ConfigError(
            "no temperatures given (set [sweep].temperatures or pass --temp)".to_string(),
        ));
    }
    for v in plan.temperatures.iter().chain(plan.pressures.iter()) {
        if !v.is_finite() || *v <= 0.0 {
            return Err(JobError::ConfigError(format!(
                "sweep values must be positive (got {v})"
            )));
        }
    }

    let template = fs
        .read_to_string(&plan.template)
        .with_context(|| format!("reading input template {:?}", plan.template))?;
    for aux in plan.aux_files.iter() {
        if !fs.is_file(aux) {
            return Err(anyhow!("auxiliary file {:?} not found", aux).into());
        }
    }

    let script = render_batch_script(&cfg.scheduler, plan.config_path.as_deref());
    let input_name = &cfg.launcher.input_file;

    fs.create_dir_all(&plan.base_dir)?;

    let mut created = Vec::new();
    for &temp in plan.temperatures.iter() {
        for pressure in plan.effective_pressures() {
            let dir = plan.base_dir.join(point_dir_name(temp, pressure));
            fs.create_dir_all(&dir)?;

            let input = render_input(&template, temp, pressure);
            fs.write(&dir.join(input_name), input.as_bytes())?;
            for aux in plan.aux_files.iter() {
                copy_into(fs, aux, &dir)?;
            }
            fs.write(&dir.join(SUBMIT_SCRIPT), script.as_bytes())?;

            debug!(dir = %dir.display(), temp, pressure, "sweep point written");
            created.push(dir);
        }
    }

    info!(
        count = created.len(),
        base_dir = %plan.base_dir.display(),
        "sweep directories created"
    );
    Ok(created)
}

fn copy_into(fs: &dyn FileSystem, file: &Path, dir: &Path) -> Result<()> {
    let name = file
        .file_name()
        .ok_or_else(|| anyhow!("auxiliary path {:?} has no file name", file))?;
    fs.copy_file(file, &dir.join(name))?;
    Ok(())
}
