// src/config/model.rs

use std::ops::Deref;
use std::path::PathBuf;

use serde::Deserialize;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [workspace]
/// tmp_root = "/scratch"
/// exclude = ["results_*"]
///
/// [launcher]
/// image = "/apps/lammps/lammps_2Aug2023.sif"
///
/// [scheduler]
/// job_name = "water"
/// time = "48:00:00"
/// ntasks = 32
///
/// [sweep]
/// temperatures = [313, 323, 333]
/// pressures = [1, 10, 20]
/// aux_files = ["system.data", "system.in.init"]
/// ```
///
/// Every section is optional and defaults to the stock layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub workspace: WorkspaceSection,

    #[serde(default)]
    pub launcher: LauncherSection,

    #[serde(default)]
    pub scheduler: SchedulerSection,

    #[serde(default)]
    pub sweep: SweepSection,
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`), so
/// holders can rely on the checked invariants.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    inner: RawConfigFile,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(inner: RawConfigFile) -> Self {
        Self { inner }
    }
}

impl Deref for ConfigFile {
    type Target = RawConfigFile;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// `[workspace]`: where staging and collection happen.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceSection {
    /// Root under which `{dirname}_{job_id}` scratch directories are created.
    #[serde(default = "default_tmp_root")]
    pub tmp_root: PathBuf,

    /// Results go to `{submit_dir}/{results_prefix}{job_id}`.
    #[serde(default = "default_results_prefix")]
    pub results_prefix: String,

    /// One-line file written into the workspace naming where it came from.
    #[serde(default = "default_marker_file")]
    pub marker_file: String,

    /// Globs (relative to the submission directory) skipped during staging.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_tmp_root() -> PathBuf {
    PathBuf::from("/tmp")
}

fn default_results_prefix() -> String {
    "results_".to_string()
}

fn default_marker_file() -> String {
    "origin_dir.txt".to_string()
}

impl Default for WorkspaceSection {
    fn default() -> Self {
        Self {
            tmp_root: default_tmp_root(),
            results_prefix: default_results_prefix(),
            marker_file: default_marker_file(),
            exclude: Vec::new(),
        }
    }
}

/// `[launcher]`: how the containerised engine is started under MPI.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LauncherSection {
    #[serde(default = "default_mpi")]
    pub mpi: String,

    /// Extra arguments placed after `-np N`.
    #[serde(default)]
    pub mpi_args: Vec<String>,

    #[serde(default = "default_container")]
    pub container: String,

    #[serde(default = "default_container_args")]
    pub container_args: Vec<String>,

    #[serde(default = "default_image")]
    pub image: String,

    #[serde(default = "default_binary")]
    pub binary: String,

    /// Input script passed as `-in`; must exist in the staged workspace.
    #[serde(default = "default_input_file")]
    pub input_file: String,

    /// Exported as `OMP_NUM_THREADS` to the launched process.
    #[serde(default = "default_omp_num_threads")]
    pub omp_num_threads: u32,
}

fn default_mpi() -> String {
    "mpirun".to_string()
}

fn default_container() -> String {
    "apptainer".to_string()
}

fn default_container_args() -> Vec<String> {
    vec!["exec".to_string()]
}

fn default_image() -> String {
    "lammps.sif".to_string()
}

fn default_binary() -> String {
    "lmp".to_string()
}

fn default_input_file() -> String {
    "run.lmp".to_string()
}

fn default_omp_num_threads() -> u32 {
    1
}

impl Default for LauncherSection {
    fn default() -> Self {
        Self {
            mpi: default_mpi(),
            mpi_args: Vec::new(),
            container: default_container(),
            container_args: default_container_args(),
            image: default_image(),
            binary: default_binary(),
            input_file: default_input_file(),
            omp_num_threads: default_omp_num_threads(),
        }
    }
}

/// `[scheduler]`: `#SBATCH` directives for the generated batch script.
///
/// These are consumed by Slurm before `mdjob run` starts; the runner itself
/// never reads them.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerSection {
    #[serde(default)]
    pub job_name: Option<String>,

    /// `%j` is replaced by Slurm with the job id.
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_error")]
    pub error: String,

    /// Wall-clock limit, e.g. `"24:00:00"`.
    #[serde(default)]
    pub time: Option<String>,

    #[serde(default)]
    pub partition: Option<String>,

    #[serde(default)]
    pub nodes: Option<u32>,

    #[serde(default)]
    pub ntasks: Option<u32>,

    #[serde(default)]
    pub cpus_per_task: Option<u32>,

    #[serde(default)]
    pub mem: Option<String>,

    #[serde(default)]
    pub mail_type: Option<String>,

    #[serde(default)]
    pub mail_user: Option<String>,
}

fn default_output() -> String {
    "slurm-%j.out".to_string()
}

fn default_error() -> String {
    "slurm-%j.err".to_string()
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            job_name: None,
            output: default_output(),
            error: default_error(),
            time: None,
            partition: None,
            nodes: None,
            ntasks: None,
            cpus_per_task: None,
            mem: None,
            mail_type: None,
            mail_user: None,
        }
    }
}

/// `[sweep]`: parameter grid for `mdjob sweep`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepSection {
    /// Kelvin.
    #[serde(default)]
    pub temperatures: Vec<f64>,

    /// Bar. Empty means a single run at atmospheric pressure.
    #[serde(default)]
    pub pressures: Vec<f64>,

    /// Input template with `{temp}` and `{press}` placeholders.
    #[serde(default = "default_template")]
    pub template: PathBuf,

    /// Files copied verbatim into every generated directory.
    #[serde(default)]
    pub aux_files: Vec<PathBuf>,

    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
}

fn default_template() -> PathBuf {
    PathBuf::from("run.lmp.in")
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("simulations")
}

impl Default for SweepSection {
    fn default() -> Self {
        Self {
            temperatures: Vec::new(),
            pressures: Vec::new(),
            template: default_template(),
            aux_files: Vec::new(),
            base_dir: default_base_dir(),
        }
    }
}
