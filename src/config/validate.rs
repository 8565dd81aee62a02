// src/config/validate.rs

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{JobError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = JobError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_workspace(cfg)?;
    validate_launcher(cfg)?;
    validate_scheduler(cfg)?;
    validate_sweep(cfg)?;
    Ok(())
}

fn config_error(msg: impl Into<String>) -> JobError {
    JobError::ConfigError(msg.into())
}

fn validate_workspace(cfg: &RawConfigFile) -> Result<()> {
    let ws = &cfg.workspace;

    if ws.tmp_root.as_os_str().is_empty() {
        return Err(config_error("[workspace].tmp_root must not be empty"));
    }
    if ws.results_prefix.is_empty() {
        return Err(config_error("[workspace].results_prefix must not be empty"));
    }
    ensure_plain_file_name("[workspace].marker_file", &ws.marker_file)?;

    for pattern in ws.exclude.iter() {
        Glob::new(pattern).map_err(|e| {
            config_error(format!("[workspace].exclude has invalid glob '{pattern}': {e}"))
        })?;
    }

    Ok(())
}

fn validate_launcher(cfg: &RawConfigFile) -> Result<()> {
    let l = &cfg.launcher;

    for (field, value) in [
        ("mpi", &l.mpi),
        ("container", &l.container),
        ("image", &l.image),
        ("binary", &l.binary),
    ] {
        if value.trim().is_empty() {
            return Err(config_error(format!("[launcher].{field} must not be empty")));
        }
    }

    ensure_plain_file_name("[launcher].input_file", &l.input_file)?;

    if l.omp_num_threads == 0 {
        return Err(config_error(
            "[launcher].omp_num_threads must be >= 1 (got 0)",
        ));
    }

    Ok(())
}

fn validate_scheduler(cfg: &RawConfigFile) -> Result<()> {
    let s = &cfg.scheduler;

    for (field, value) in [
        ("nodes", s.nodes),
        ("ntasks", s.ntasks),
        ("cpus_per_task", s.cpus_per_task),
    ] {
        if value == Some(0) {
            return Err(config_error(format!("[scheduler].{field} must be >= 1 (got 0)")));
        }
    }

    if s.mail_type.is_some() && s.mail_user.is_none() {
        return Err(config_error(
            "[scheduler].mail_type is set but [scheduler].mail_user is missing",
        ));
    }

    Ok(())
}

fn validate_sweep(cfg: &RawConfigFile) -> Result<()> {
    for t in cfg.sweep.temperatures.iter() {
        if !t.is_finite() || *t <= 0.0 {
            return Err(config_error(format!(
                "[sweep].temperatures must be positive (got {t})"
            )));
        }
    }
    for p in cfg.sweep.pressures.iter() {
        if !p.is_finite() || *p <= 0.0 {
            return Err(config_error(format!(
                "[sweep].pressures must be positive (got {p})"
            )));
        }
    }
    Ok(())
}

/// Names that are joined onto the workspace must stay inside it.
fn ensure_plain_file_name(field: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(config_error(format!("{field} must not be empty")));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(config_error(format!(
            "{field} must be a plain file name (got '{name}')"
        )));
    }
    Ok(())
}
