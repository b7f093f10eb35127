//! Compile-then-run protocol for compiled languages

use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

use super::{Backend, BackendContext, BackendError, Phase};
use crate::languages::Language;
use crate::runner::CommandSpec;
use crate::workspace::Workspace;

/// Adapter contract for a compiled language
pub trait CompiledToolchain: Send + Sync {
    fn language(&self) -> Language;
    /// Fixed source file name inside the workspace directory
    fn source_file(&self) -> &'static str;
    fn compile_command(&self, workspace: &Path) -> CommandSpec;
    fn run_command(&self, workspace: &Path) -> CommandSpec;
}

/// Where a compiled-language request currently is
#[derive(Debug)]
enum Stage {
    Compiling,
    Running,
    Done(String),
    Failed(BackendError),
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::Compiling => "compiling",
            Stage::Running => "running",
            Stage::Done(_) => "done",
            Stage::Failed(_) => "failed",
        }
    }
}

pub struct CompiledBackend<T> {
    toolchain: T,
    ctx: BackendContext,
}

impl<T: CompiledToolchain> CompiledBackend<T> {
    pub fn new(toolchain: T, ctx: BackendContext) -> Self {
        Self { toolchain, ctx }
    }

    async fn drive(
        &self,
        workspace: &Workspace,
        source: &str,
        input: Option<&str>,
    ) -> Result<String, BackendError> {
        tokio::fs::write(workspace.join(self.toolchain.source_file()), source).await?;

        let mut stage = Stage::Compiling;
        loop {
            debug!(language = %self.toolchain.language(), stage = stage.name(), "Advancing");
            stage = match stage {
                Stage::Compiling => {
                    let cmd = self.toolchain.compile_command(workspace.path());
                    // compiler output is discarded; only success matters
                    match self.ctx.runner.run(&cmd, None, self.ctx.compile_timeout).await {
                        Ok(_) => Stage::Running,
                        Err(e) => Stage::Failed(BackendError::step(Phase::Compile, e)),
                    }
                }
                Stage::Running => {
                    let cmd = self.toolchain.run_command(workspace.path());
                    match self.ctx.runner.run(&cmd, input, self.ctx.run_timeout).await {
                        Ok(output) => Stage::Done(output),
                        Err(e) => Stage::Failed(BackendError::step(Phase::Run, e)),
                    }
                }
                Stage::Done(output) => return Ok(output),
                Stage::Failed(e) => return Err(e),
            };
        }
    }
}

#[async_trait]
impl<T: CompiledToolchain> Backend for CompiledBackend<T> {
    fn language(&self) -> Language {
        self.toolchain.language()
    }

    async fn execute(&self, source: &str, input: Option<&str>) -> Result<String, BackendError> {
        let workspace = self.ctx.workspaces.directory()?;
        let result = self.drive(&workspace, source, input).await;
        workspace.release();
        result
    }
}
