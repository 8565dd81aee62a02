// src/batch/script.rs

use std::fmt::Write;
use std::path::Path;

use crate::config::SchedulerSection;
use crate::exec::shell_quote;

/// Name of the batch script inside each submission directory.
pub const SUBMIT_SCRIPT: &str = "submit.sh";

/// Render `submit.sh`: `#SBATCH` directives followed by `mdjob run`.
///
/// `config` is embedded as `--config` so jobs find the same settings when
/// they start in their own directory.
pub fn render_batch_script(sched: &SchedulerSection, config: Option<&Path>) -> String {
    let mut out = String::from("#!/bin/bash\n");

    let mut directive = |flag: &str, value: &dyn std::fmt::Display| {
        let _ = writeln!(out, "#SBATCH --{flag}={value}");
    };

    if let Some(ref v) = sched.job_name {
        directive("job-name", v);
    }
    directive("output", &sched.output);
    directive("error", &sched.error);
    if let Some(ref v) = sched.time {
        directive("time", v);
    }
    if let Some(ref v) = sched.partition {
        directive("partition", v);
    }
    if let Some(v) = sched.nodes {
        directive("nodes", &v);
    }
    if let Some(v) = sched.ntasks {
        directive("ntasks", &v);
    }
    if let Some(v) = sched.cpus_per_task {
        directive("cpus-per-task", &v);
    }
    if let Some(ref v) = sched.mem {
        directive("mem", v);
    }
    if let Some(ref v) = sched.mail_type {
        directive("mail-type", v);
    }
    if let Some(ref v) = sched.mail_user {
        directive("mail-user", v);
    }

    out.push_str("\nset -euo pipefail\n\n");
    match config {
        Some(path) => {
            let path = path.display().to_string();
            let _ = writeln!(out, "mdjob --config {} run", shell_quote(&path));
        }
        None => out.push_str("mdjob run\n"),
    }
    out
}
