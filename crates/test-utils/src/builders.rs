#![allow(dead_code)]

use std::path::{Path, PathBuf};

use mdjob::config::{ConfigFile, RawConfigFile};
use mdjob::env::JobEnvironment;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn tmp_root(mut self, root: impl AsRef<Path>) -> Self {
        self.config.workspace.tmp_root = root.as_ref().to_path_buf();
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.config.workspace.exclude.push(pattern.to_string());
        self
    }

    pub fn input_file(mut self, name: &str) -> Self {
        self.config.launcher.input_file = name.to_string();
        self
    }

    pub fn image(mut self, image: &str) -> Self {
        self.config.launcher.image = image.to_string();
        self
    }

    pub fn job_name(mut self, name: &str) -> Self {
        self.config.scheduler.job_name = Some(name.to_string());
        self
    }

    pub fn template(mut self, path: impl AsRef<Path>) -> Self {
        self.config.sweep.template = path.as_ref().to_path_buf();
        self
    }

    pub fn aux_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config.sweep.aux_files.push(path.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `JobEnvironment`, standing in for the scheduler's variables.
pub struct JobEnvBuilder {
    job_id: String,
    ntasks: u32,
    dir: PathBuf,
    submit_dir: Option<PathBuf>,
}

impl JobEnvBuilder {
    /// Job launched from (and collecting into) `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            job_id: "1000".to_string(),
            ntasks: 4,
            dir: dir.as_ref().to_path_buf(),
            submit_dir: None,
        }
    }

    pub fn job_id(mut self, id: &str) -> Self {
        self.job_id = id.to_string();
        self
    }

    pub fn ntasks(mut self, n: u32) -> Self {
        self.ntasks = n;
        self
    }

    pub fn submit_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.submit_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> JobEnvironment {
        JobEnvironment {
            job_id: self.job_id.parse().expect("valid job id"),
            ntasks: self.ntasks,
            submit_dir: self.submit_dir.unwrap_or_else(|| self.dir.clone()),
            current_dir: self.dir,
        }
    }
}
