//! Backends module - per-language execution protocols
//!
//! Each backend turns source text (plus optional user input) into captured
//! stdout by composing a workspace and one or two runner invocations:
//! - `CompiledBackend`: compile, then run the artifact (Java, C++)
//! - `InterpretedBackend`: hand a script file to an interpreter (JavaScript, Python)
//!
//! Language specifics live in small adapters (`JavaAdapter`, `CppAdapter`, ...)
//! that only build commands.

pub mod compiled;
pub mod cpp;
pub mod interpreted;
pub mod java;
pub mod javascript;
pub mod python;
pub mod registry;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::ExecutorConfig;
use crate::languages::Language;
use crate::runner::{RunError, Runner};
use crate::workspace::WorkspaceManager;

pub use compiled::{CompiledBackend, CompiledToolchain};
pub use interpreted::{InterpretedBackend, InterpretedToolchain};
pub use registry::build_backends;

/// Step of a request that produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Compile,
    Run,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Compile => "compile",
            Phase::Run => "run",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{} failed: {source}", step_name(.phase))]
    Step {
        phase: Phase,
        #[source]
        source: RunError,
    },
    /// Creating the workspace or writing the source failed
    #[error("Workspace error: {0}")]
    Workspace(#[from] std::io::Error),
}

fn step_name(phase: &Phase) -> &'static str {
    match phase {
        Phase::Compile => "Compilation",
        Phase::Run => "Execution",
    }
}

impl BackendError {
    pub fn step(phase: Phase, source: RunError) -> Self {
        BackendError::Step { phase, source }
    }

    pub fn phase(&self) -> Option<Phase> {
        match self {
            BackendError::Step { phase, .. } => Some(*phase),
            BackendError::Workspace(_) => None,
        }
    }
}

/// Shared collaborators handed to every backend
#[derive(Clone)]
pub struct BackendContext {
    pub runner: Arc<dyn Runner>,
    pub workspaces: Arc<WorkspaceManager>,
    pub compile_timeout: Duration,
    pub run_timeout: Duration,
}

impl BackendContext {
    /// Context carrying the configured timeouts and workspace root
    pub fn from_config(config: &ExecutorConfig, runner: Arc<dyn Runner>) -> Self {
        Self {
            runner,
            workspaces: Arc::new(WorkspaceManager::new(config.workspace_root.clone())),
            compile_timeout: config.compile_timeout,
            run_timeout: config.run_timeout,
        }
    }
}

/// Backend contract for one language
#[async_trait]
pub trait Backend: Send + Sync {
    fn language(&self) -> Language;

    /// Execute `source`, returning captured stdout
    async fn execute(&self, source: &str, input: Option<&str>) -> Result<String, BackendError>;
}
