//! Runner module - Process execution layer
//!
//! This module spawns exactly one external process per call:
//! - `LocalRunner`: direct execution on the host via `tokio::process`
//!
//! The runner module does NOT:
//! - Know about languages, compile phases or workspaces
//! - Retry failed invocations

pub mod local;
#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Command specification for execution
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    /// Program path or name
    pub program: String,
    /// Arguments to the program
    pub args: Vec<String>,
    /// Working directory
    pub work_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            work_dir: None,
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(|a| a.into()).collect();
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_work_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.work_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Convert to a vector of strings (program + args)
    pub fn to_vec(&self) -> Vec<String> {
        let mut v = vec![self.program.clone()];
        v.extend(self.args.clone());
        v
    }
}

/// Why a single invocation did not produce output
#[derive(Debug, Error)]
pub enum RunError {
    /// The program could not be started at all
    #[error("Error spawning process {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// Non-zero exit, death by signal, or anything written to stderr
    #[error("Process failed with code {}: {stderr}", display_code(.exit_code))]
    Process {
        exit_code: Option<i32>,
        stderr: String,
    },
    /// Wall-clock budget exceeded; the process was killed
    #[error("Process {program} timed out after {}ms", .timeout.as_millis())]
    Timeout { program: String, timeout: Duration },
    /// Pipe plumbing failed after a successful spawn
    #[error("I/O error while running process: {0}")]
    Io(#[from] std::io::Error),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "null".to_string(),
    }
}

/// Runner trait for executing programs
#[async_trait]
pub trait Runner: Send + Sync {
    /// Run a command to completion, returning its stdout on success.
    ///
    /// `stdin` is written and closed only when it is non-empty.
    async fn run(
        &self,
        cmd: &CommandSpec,
        stdin: Option<&str>,
        timeout: Duration,
    ) -> Result<String, RunError>;
}

// Re-exports
pub use local::LocalRunner;
