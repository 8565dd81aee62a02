// src/job/paths.rs

use std::path::{Path, PathBuf};

use crate::config::WorkspaceSection;
use crate::env::JobEnvironment;
use crate::errors::{JobError, Result};
use crate::types::JobId;

/// Per-job filesystem locations.
///
/// Both paths embed the job id, which the scheduler guarantees unique, so
/// concurrent jobs from the same directory never share either of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPaths {
    /// Staged from; the current directory at launch.
    pub source: PathBuf,
    /// `{tmp_root}/{basename(source)}_{job_id}`
    pub workspace: PathBuf,
    /// `{submit_dir}/{results_prefix}{job_id}`
    pub results: PathBuf,
}

impl JobPaths {
    pub fn resolve(workspace: &WorkspaceSection, env: &JobEnvironment) -> Result<Self> {
        Ok(Self {
            source: env.current_dir.clone(),
            workspace: workspace_path(&workspace.tmp_root, &env.current_dir, &env.job_id)?,
            results: results_path(&env.submit_dir, &workspace.results_prefix, &env.job_id),
        })
    }
}

pub fn workspace_path(tmp_root: &Path, source: &Path, job_id: &JobId) -> Result<PathBuf> {
    let base = source.file_name().ok_or_else(|| {
        JobError::Environment(format!(
            "cannot derive a workspace name from {:?} (no final component)",
            source
        ))
    })?;
    Ok(tmp_root.join(format!("{}_{}", base.to_string_lossy(), job_id)))
}

pub fn results_path(submit_dir: &Path, prefix: &str, job_id: &JobId) -> PathBuf {
    submit_dir.join(format!("{prefix}{job_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(s: &str) -> JobId {
        s.parse().unwrap()
    }

    #[test]
    fn paths_follow_naming_scheme() {
        let env = JobEnvironment {
            job_id: id("4711"),
            ntasks: 4,
            submit_dir: PathBuf::from("/home/u/sims/T_313_P_1"),
            current_dir: PathBuf::from("/home/u/sims/T_313_P_1"),
        };
        let paths = JobPaths::resolve(&WorkspaceSection::default(), &env).unwrap();

        assert_eq!(paths.workspace, PathBuf::from("/tmp/T_313_P_1_4711"));
        assert_eq!(
            paths.results,
            PathBuf::from("/home/u/sims/T_313_P_1/results_4711")
        );
    }

    #[test]
    fn root_directory_has_no_workspace_name() {
        let err = workspace_path(Path::new("/tmp"), Path::new("/"), &id("1")).unwrap_err();
        assert!(matches!(err, JobError::Environment(_)));
    }

    proptest! {
        #[test]
        fn distinct_job_ids_never_collide(
            dir in "[A-Za-z0-9_.-]{1,12}",
            a in "[0-9]{1,8}",
            b in "[0-9]{1,8}",
        ) {
            prop_assume!(a != b && dir != "." && dir != "..");
            let source = PathBuf::from("/home/u").join(&dir);
            let (ja, jb) = (id(&a), id(&b));

            let wa = workspace_path(Path::new("/tmp"), &source, &ja).unwrap();
            let wb = workspace_path(Path::new("/tmp"), &source, &jb).unwrap();
            prop_assert_ne!(wa, wb);

            let ra = results_path(&source, "results_", &ja);
            let rb = results_path(&source, "results_", &jb);
            prop_assert_ne!(ra, rb);
        }
    }
}
