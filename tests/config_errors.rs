// tests/config_errors.rs

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use mdjob::config::load_and_validate;
use mdjob::env::{EnvOverrides, JobEnvironment, SLURM_NTASKS};
use mdjob::errors::JobError;

#[test]
fn zero_scheduler_tasks_returns_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[scheduler]
job_name = "water"
ntasks = 0
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(JobError::ConfigError(msg)) => {
            assert!(msg.contains("ntasks"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn malformed_toml_returns_toml_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[workspace\ntmp_root = ").unwrap();

    assert!(matches!(
        load_and_validate(file.path()),
        Err(JobError::TomlError(_))
    ));
}

#[test]
fn missing_job_id_fails_before_anything_else() {
    let vars: HashMap<String, String> =
        [(SLURM_NTASKS.to_string(), "4".to_string())].into_iter().collect();

    let err = JobEnvironment::from_map(&vars, PathBuf::from("/w"), &EnvOverrides::default())
        .unwrap_err();

    assert!(matches!(err, JobError::Environment(_)));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(err.phase(), None);
}
