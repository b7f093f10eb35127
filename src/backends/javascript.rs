use std::path::Path;

use super::InterpretedToolchain;
use crate::languages::Language;
use crate::runner::CommandSpec;

/// User input is split on whitespace and passed as command-line arguments.
///
/// Nothing is written to stdin. This differs from every other backend and is
/// part of the JavaScript contract: scripts read `process.argv.slice(2)`.
#[derive(Debug, Clone)]
pub struct JavaScriptAdapter {
    interpreter: String,
}

impl JavaScriptAdapter {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }
}

impl Default for JavaScriptAdapter {
    fn default() -> Self {
        Self::new("node")
    }
}

impl InterpretedToolchain for JavaScriptAdapter {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn suffix(&self) -> &'static str {
        ".js"
    }

    fn command<'a>(&self, script: &Path, input: Option<&'a str>) -> (CommandSpec, Option<&'a str>) {
        let mut cmd = CommandSpec::new(&self.interpreter).arg(script.to_string_lossy());
        for token in input.unwrap_or_default().split_whitespace() {
            cmd = cmd.arg(token);
        }
        (cmd, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::test_support;
    use crate::backends::{Backend, InterpretedBackend};

    #[test]
    fn test_input_becomes_argv() {
        let (cmd, stdin) =
            JavaScriptAdapter::default().command(Path::new("/tmp/x.js"), Some(" alpha  beta\ngamma "));
        assert_eq!(cmd.to_vec(), vec!["node", "/tmp/x.js", "alpha", "beta", "gamma"]);
        assert_eq!(stdin, None);
    }

    #[test]
    fn test_no_input_means_no_extra_args() {
        let adapter = JavaScriptAdapter::default();
        for input in [None, Some(""), Some("   ")] {
            let (cmd, stdin) = adapter.command(Path::new("/tmp/x.js"), input);
            assert_eq!(cmd.to_vec(), vec!["node", "/tmp/x.js"]);
            assert_eq!(stdin, None);
        }
    }

    #[tokio::test]
    async fn test_hello_world() {
        if !test_support::tool_available("node") {
            return;
        }
        let (root, ctx) = test_support::local_context();
        let backend = InterpretedBackend::new(JavaScriptAdapter::default(), ctx);

        let out = backend
            .execute("console.log('Hello from JavaScript');", None)
            .await
            .unwrap();
        assert_eq!(out, "Hello from JavaScript\n");
        assert!(test_support::is_empty(&root));
    }

    #[tokio::test]
    async fn test_prints_arguments_not_stdin() {
        if !test_support::tool_available("node") {
            return;
        }
        let (root, ctx) = test_support::local_context();
        let backend = InterpretedBackend::new(JavaScriptAdapter::default(), ctx);

        let source = "console.log(JSON.stringify(process.argv.slice(2)));";
        let out = backend.execute(source, Some("3 4  five")).await.unwrap();
        assert_eq!(out, "[\"3\",\"4\",\"five\"]\n");
        assert!(test_support::is_empty(&root));
    }
}
