// tests/batch.rs

mod common;
use crate::common::builders::ConfigFileBuilder;
use crate::common::{init_tracing, FakeBackend};

use std::error::Error;
use std::fs;

use tempfile::tempdir;

use mdjob::batch::{generate_sweep, submit_all, SweepPlan};
use mdjob::fs::RealFileSystem;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn submit_continues_past_failures() -> TestResult {
    init_tracing();

    let root = tempdir()?;
    for name in ["T_313_P_1", "T_323_P_1", "T_333_P_1"] {
        let dir = root.path().join(name);
        fs::create_dir(&dir)?;
        fs::write(dir.join("submit.sh"), "#!/bin/bash\n")?;
    }
    fs::create_dir(root.path().join("notes"))?;

    // Second submission is rejected by the scheduler.
    let mut backend = FakeBackend::new().exiting_with(&[0, 1, 0]);
    let launched = backend.launched();

    let summary = submit_all(&RealFileSystem, &mut backend, root.path()).await?;

    assert_eq!(summary.submitted.len(), 2);
    assert_eq!(summary.failed.len(), 1);
    assert!(summary.failed[0].0.ends_with("T_323_P_1"));
    assert!(summary.failed[0].1.contains("code 1"));
    assert!(!summary.all_ok());

    let launched = launched.lock().unwrap();
    assert_eq!(launched.len(), 3);
    for spec in launched.iter() {
        assert_eq!(spec.program, "sbatch");
        assert_eq!(spec.args, vec!["submit.sh"]);
    }
    assert!(launched[0].cwd.ends_with("T_313_P_1"));

    Ok(())
}

#[test]
fn sweep_directories_are_ready_to_submit() -> TestResult {
    init_tracing();

    let root = tempdir()?;
    let template = root.path().join("run.lmp.in");
    let data = root.path().join("system.data");
    fs::write(&template, "variable temp equal {temp}\nvariable press equal {press}\n")?;
    fs::write(&data, "atoms\n")?;

    let cfg = ConfigFileBuilder::new()
        .template(&template)
        .aux_file(&data)
        .job_name("water")
        .build();
    let plan = SweepPlan::from_config(
        &cfg,
        Some(root.path().join("simulations")),
        vec![313.0, 323.0],
        vec![1.0],
    );

    let dirs = generate_sweep(&RealFileSystem, &cfg, &plan)?;
    assert_eq!(dirs.len(), 2);

    let point = root.path().join("simulations/T_313_P_1");
    let input = fs::read_to_string(point.join("run.lmp"))?;
    assert!(input.starts_with("variable temp equal 313\n"));
    assert!(input.contains("variable press equal 0.986923"));
    assert_eq!(fs::read_to_string(point.join("system.data"))?, "atoms\n");

    let script = fs::read_to_string(point.join("submit.sh"))?;
    assert!(script.contains("#SBATCH --job-name=water"));
    assert!(script.trim_end().ends_with("mdjob run"));

    // Regenerating over existing directories is allowed.
    generate_sweep(&RealFileSystem, &cfg, &plan)?;

    Ok(())
}
