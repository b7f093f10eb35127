use std::path::Path;

use super::CompiledToolchain;
use crate::languages::Language;
use crate::runner::CommandSpec;

/// Name of the produced executable inside the workspace
pub const BINARY_NAME: &str = "main";

#[derive(Debug, Clone)]
pub struct CppAdapter {
    compiler: String,
    compile_args: Vec<String>,
}

impl CppAdapter {
    pub fn new(compiler: impl Into<String>, compile_args: Vec<String>) -> Self {
        Self {
            compiler: compiler.into(),
            compile_args,
        }
    }
}

impl Default for CppAdapter {
    fn default() -> Self {
        Self::new("g++", Vec::new())
    }
}

impl CompiledToolchain for CppAdapter {
    fn language(&self) -> Language {
        Language::Cpp
    }

    fn source_file(&self) -> &'static str {
        "main.cpp"
    }

    fn compile_command(&self, workspace: &Path) -> CommandSpec {
        CommandSpec::new(&self.compiler)
            .with_args(self.compile_args.iter().cloned())
            .arg(workspace.join(self.source_file()).to_string_lossy())
            .arg("-o")
            .arg(workspace.join(BINARY_NAME).to_string_lossy())
            .with_work_dir(workspace)
    }

    fn run_command(&self, workspace: &Path) -> CommandSpec {
        CommandSpec::new(workspace.join(BINARY_NAME).to_string_lossy()).with_work_dir(workspace)
    }
}
