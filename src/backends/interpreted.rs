//! Single-invocation protocol for interpreted languages

use async_trait::async_trait;
use std::path::Path;

use super::{Backend, BackendContext, BackendError, Phase};
use crate::languages::Language;
use crate::runner::CommandSpec;
use crate::workspace::Workspace;

/// Adapter contract for an interpreted language
pub trait InterpretedToolchain: Send + Sync {
    fn language(&self) -> Language;
    /// File name suffix for the script, including the dot
    fn suffix(&self) -> &'static str;
    /// Interpreter command for `script`, and the payload (if any) to pipe to stdin
    fn command<'a>(&self, script: &Path, input: Option<&'a str>) -> (CommandSpec, Option<&'a str>);
}

pub struct InterpretedBackend<T> {
    toolchain: T,
    ctx: BackendContext,
}

impl<T: InterpretedToolchain> InterpretedBackend<T> {
    pub fn new(toolchain: T, ctx: BackendContext) -> Self {
        Self { toolchain, ctx }
    }

    async fn interpret(
        &self,
        workspace: &Workspace,
        source: &str,
        input: Option<&str>,
    ) -> Result<String, BackendError> {
        tokio::fs::write(workspace.path(), source).await?;

        let (cmd, stdin) = self.toolchain.command(workspace.path(), input);
        self.ctx
            .runner
            .run(&cmd, stdin, self.ctx.run_timeout)
            .await
            .map_err(|e| BackendError::step(Phase::Run, e))
    }
}

#[async_trait]
impl<T: InterpretedToolchain> Backend for InterpretedBackend<T> {
    fn language(&self) -> Language {
        self.toolchain.language()
    }

    async fn execute(&self, source: &str, input: Option<&str>) -> Result<String, BackendError> {
        let workspace = self.ctx.workspaces.file(self.toolchain.suffix())?;

        let result = self.interpret(&workspace, source, input).await;

        workspace.release();
        result
    }
}
