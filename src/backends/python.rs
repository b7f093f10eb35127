use std::path::Path;

use super::InterpretedToolchain;
use crate::languages::Language;
use crate::runner::CommandSpec;

/// User input is piped to the script's stdin
#[derive(Debug, Clone)]
pub struct PythonAdapter {
    interpreter: String,
}

impl PythonAdapter {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }
}

impl Default for PythonAdapter {
    fn default() -> Self {
        Self::new("python3")
    }
}

impl InterpretedToolchain for PythonAdapter {
    fn language(&self) -> Language {
        Language::Python
    }

    fn suffix(&self) -> &'static str {
        ".py"
    }

    fn command<'a>(&self, script: &Path, input: Option<&'a str>) -> (CommandSpec, Option<&'a str>) {
        let cmd = CommandSpec::new(&self.interpreter).arg(script.to_string_lossy());
        (cmd, input)
    }
}
