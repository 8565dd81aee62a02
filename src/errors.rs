// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! The runner's taxonomy is flat: every variant is terminal for the run.
//! `Staging`, `Execution` and `Collection` correspond to the phases an
//! operator can observe; the rest cover setup before the first phase.

use thiserror::Error;

use crate::types::Phase;

#[derive(Error, Debug)]
pub enum JobError {
    #[error("Environment error: {0}")]
    Environment(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Staging failed: {0:#}")]
    Staging(anyhow::Error),

    #[error("Simulation could not be started: {0:#}")]
    Launch(anyhow::Error),

    #[error("Simulation exited with {}", describe_code(.code))]
    Execution { code: Option<i32> },

    #[error("Collection failed: {0:#}")]
    Collection(anyhow::Error),

    #[error("Cleanup failed: {0:#}")]
    Cleanup(anyhow::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {c}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl JobError {
    /// Process exit code to report for this error.
    ///
    /// A failed simulation propagates its own non-zero code so the scheduler
    /// records it; everything else maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            JobError::Execution { code: Some(c) } if *c != 0 => *c,
            _ => 1,
        }
    }

    /// The run phase this error aborted, if it happened inside one.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            JobError::Staging(_) => Some(Phase::Stage),
            JobError::Launch(_) | JobError::Execution { .. } => Some(Phase::Execute),
            JobError::Collection(_) => Some(Phase::Collect),
            JobError::Cleanup(_) => Some(Phase::Cleanup),
            _ => None,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, JobError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_error_propagates_child_code() {
        assert_eq!(JobError::Execution { code: Some(137) }.exit_code(), 137);
        assert_eq!(JobError::Execution { code: None }.exit_code(), 1);
        assert_eq!(JobError::Environment("x".into()).exit_code(), 1);
    }

    #[test]
    fn execution_error_message_mentions_signal() {
        let msg = JobError::Execution { code: None }.to_string();
        assert!(msg.contains("signal"));
    }
}
