// src/exec/launch.rs

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::LauncherSection;

/// A fully-specified process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory of the child.
    pub cwd: PathBuf,
    /// Variables added to (not replacing) the inherited environment.
    pub env: Vec<(String, String)>,
}

impl LaunchSpec {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// Shell-like rendering, used for logs and `--dry-run`.
impl fmt::Display for LaunchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, v) in self.env.iter() {
            write!(f, "{k}={} ", shell_quote(v))?;
        }
        write!(f, "{}", shell_quote(&self.program))?;
        for a in self.args.iter() {
            write!(f, " {}", shell_quote(a))?;
        }
        Ok(())
    }
}

/// Quote `s` for a POSIX shell; plain words are left bare.
pub fn shell_quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:%,+@".contains(c));
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// `mpirun -np N [mpi_args] apptainer exec [..] image lmp -in run.lmp`,
/// run inside `workspace` with `OMP_NUM_THREADS` pinned.
pub fn simulation_command(launcher: &LauncherSection, ntasks: u32, workspace: &Path) -> LaunchSpec {
    LaunchSpec::new(launcher.mpi.clone(), workspace)
        .arg("-np")
        .arg(ntasks.to_string())
        .args(launcher.mpi_args.iter().cloned())
        .arg(launcher.container.clone())
        .args(launcher.container_args.iter().cloned())
        .arg(launcher.image.clone())
        .arg(launcher.binary.clone())
        .arg("-in")
        .arg(launcher.input_file.clone())
        .env("OMP_NUM_THREADS", launcher.omp_num_threads.to_string())
}

/// `sbatch submit.sh` inside `dir`.
pub fn sbatch_command(dir: &Path, script: &str) -> LaunchSpec {
    LaunchSpec::new("sbatch", dir).arg(script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_launcher_command_line() {
        let spec = simulation_command(&LauncherSection::default(), 8, Path::new("/tmp/w_1"));

        assert_eq!(spec.program, "mpirun");
        assert_eq!(
            spec.args,
            vec!["-np", "8", "apptainer", "exec", "lammps.sif", "lmp", "-in", "run.lmp"]
        );
        assert_eq!(spec.cwd, PathBuf::from("/tmp/w_1"));
        assert_eq!(
            spec.env,
            vec![("OMP_NUM_THREADS".to_string(), "1".to_string())]
        );
    }

    #[test]
    fn mpi_args_follow_process_count() {
        let launcher = LauncherSection {
            mpi_args: vec!["--bind-to".into(), "core".into()],
            ..LauncherSection::default()
        };
        let spec = simulation_command(&launcher, 2, Path::new("/w"));
        assert_eq!(&spec.args[..4], &["-np", "2", "--bind-to", "core"]);
    }

    #[test]
    fn display_quotes_awkward_arguments() {
        let spec = LaunchSpec::new("echo", "/").arg("two words").arg("it's");
        assert_eq!(spec.to_string(), r"echo 'two words' 'it'\''s'");
    }
}
