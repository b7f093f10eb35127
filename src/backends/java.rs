use std::path::Path;

use super::CompiledToolchain;
use crate::languages::Language;
use crate::runner::CommandSpec;

/// Submitted source must declare a public class `Main`
pub const ENTRY_CLASS: &str = "Main";

#[derive(Debug, Clone)]
pub struct JavaAdapter {
    compiler: String,
    runtime: String,
}

impl JavaAdapter {
    pub fn new(compiler: impl Into<String>, runtime: impl Into<String>) -> Self {
        Self {
            compiler: compiler.into(),
            runtime: runtime.into(),
        }
    }
}

impl Default for JavaAdapter {
    fn default() -> Self {
        Self::new("javac", "java")
    }
}

impl CompiledToolchain for JavaAdapter {
    fn language(&self) -> Language {
        Language::Java
    }

    fn source_file(&self) -> &'static str {
        "Main.java"
    }

    fn compile_command(&self, workspace: &Path) -> CommandSpec {
        CommandSpec::new(&self.compiler)
            .arg(workspace.join(self.source_file()).to_string_lossy())
            .with_work_dir(workspace)
    }

    fn run_command(&self, workspace: &Path) -> CommandSpec {
        CommandSpec::new(&self.runtime)
            .with_args(["-cp".to_string(), workspace.to_string_lossy().into_owned()])
            .arg(ENTRY_CLASS)
            .with_work_dir(workspace)
    }
}
