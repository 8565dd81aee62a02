// src/types.rs

use std::fmt;
use std::str::FromStr;

/// Scheduler-assigned job identifier.
///
/// Opaque, but spliced into directory names, so it must be non-empty and
/// free of path separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for JobId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("job id must not be empty".to_string());
        }
        if s.contains('/') || s.contains('\\') || s == "." || s == ".." {
            return Err(format!("job id must not contain path separators (got '{s}')"));
        }
        Ok(JobId(s.to_string()))
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The phases of one run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Stage,
    Execute,
    Collect,
    Cleanup,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Stage => "stage",
            Phase::Execute => "execute",
            Phase::Collect => "collect",
            Phase::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}
