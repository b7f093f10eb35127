//! Dispatcher - validates the requested language and routes to its backend
//!
//! Backend failures are wrapped into a single `ExecutionError` carrying the
//! language, the failure kind and (when known) the phase.

use std::collections::HashMap;
use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

use crate::backends::{build_backends, Backend, BackendContext, BackendError, Phase};
use crate::core::{ExecutionRequest, FailureKind};
use crate::languages::{Language, LanguageTable};
use crate::runner::RunError;

#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Rejected before any filesystem or process work
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("Error executing {language} code: {source}")]
    Failed {
        language: Language,
        kind: FailureKind,
        #[source]
        source: BackendError,
    },
}

impl ExecutionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ExecutionError::UnsupportedLanguage(_) => FailureKind::UnsupportedLanguage,
            ExecutionError::Failed { kind, .. } => *kind,
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        match self {
            ExecutionError::UnsupportedLanguage(_) => None,
            ExecutionError::Failed { source, .. } => source.phase(),
        }
    }
}

/// Map a backend failure onto the caller-facing taxonomy
fn classify(err: &BackendError) -> FailureKind {
    match err {
        BackendError::Workspace(_) => FailureKind::Workspace,
        BackendError::Step { phase, source } => match source {
            RunError::Spawn { .. } => FailureKind::Spawn,
            RunError::Timeout { .. } => FailureKind::Timeout,
            RunError::Process { .. } | RunError::Io(_) => match phase {
                Phase::Compile => FailureKind::Compile,
                Phase::Run => FailureKind::Runtime,
            },
        },
    }
}

pub struct Dispatcher {
    backends: HashMap<Language, Box<dyn Backend>>,
}

impl Dispatcher {
    pub fn new(backends: HashMap<Language, Box<dyn Backend>>) -> Self {
        Self { backends }
    }

    /// Dispatcher with a backend for every language in `table`
    pub fn from_table(table: &LanguageTable, ctx: &BackendContext) -> Self {
        Self::new(build_backends(table, ctx))
    }

    pub fn supported_languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self.backends.keys().copied().collect();
        languages.sort_by_key(|l| l.id());
        languages
    }

    /// Run one request to completion
    pub async fn execute(&self, request: &ExecutionRequest) -> Result<String, ExecutionError> {
        let unsupported = || ExecutionError::UnsupportedLanguage(request.language.clone());
        let language: Language = request.language.parse().map_err(|_| unsupported())?;
        let backend = self.backends.get(&language).ok_or_else(unsupported)?;

        info!(
            language = %language,
            source_bytes = request.code.len(),
            has_input = request.user_input.is_some(),
            "Executing request"
        );
        let started = Instant::now();

        match backend
            .execute(&request.code, request.user_input.as_deref())
            .await
        {
            Ok(output) => {
                info!(
                    language = %language,
                    output_bytes = output.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Execution succeeded"
                );
                Ok(output)
            }
            Err(source) => {
                let kind = classify(&source);
                warn!(
                    language = %language,
                    kind = %kind,
                    phase = ?source.phase(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %source,
                    "Execution failed"
                );
                Err(ExecutionError::Failed {
                    language,
                    kind,
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::test_support;
    use crate::runner::mock::{Reply, ScriptedRunner};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn dispatcher(replies: Vec<Reply>) -> (TempDir, Arc<ScriptedRunner>, Dispatcher) {
        let runner = Arc::new(ScriptedRunner::new(replies));
        let (root, ctx) = test_support::context(runner.clone());
        let table = LanguageTable::embedded().unwrap();
        (root, runner, Dispatcher::from_table(&table, &ctx))
    }

    #[tokio::test]
    async fn test_unsupported_language_touches_nothing() {
        let (root, runner, dispatcher) = dispatcher(vec![]);

        let err = dispatcher
            .execute(&ExecutionRequest::new("ruby", "puts 'hi'"))
            .await
            .unwrap_err();

        assert!(matches!(err, ExecutionError::UnsupportedLanguage(ref l) if l == "ruby"));
        assert_eq!(err.kind(), FailureKind::UnsupportedLanguage);
        assert_eq!(err.phase(), None);
        assert!(runner.calls().is_empty());
        assert!(test_support::is_empty(&root));
    }

    #[tokio::test]
    async fn test_supported_languages() {
        let (_root, _runner, dispatcher) = dispatcher(vec![]);
        assert_eq!(
            dispatcher.supported_languages(),
            vec![Language::Cpp, Language::Java, Language::JavaScript, Language::Python]
        );
    }

    #[tokio::test]
    async fn test_success_returns_output() {
        let (root, runner, dispatcher) = dispatcher(vec![Reply::Output("hello\n".into())]);

        let out = dispatcher
            .execute(&ExecutionRequest::new("python", "print('hello')"))
            .await
            .unwrap();

        assert_eq!(out, "hello\n");
        assert_eq!(runner.calls()[0].cmd.program, "python3");
        assert!(test_support::is_empty(&root));
    }

    #[tokio::test]
    async fn test_compile_failure_is_tagged() {
        let (root, runner, dispatcher) = dispatcher(vec![Reply::Fail {
            exit_code: 1,
            stderr: "main.cpp:1:1: error: expected unqualified-id".into(),
        }]);

        let err = dispatcher
            .execute(&ExecutionRequest::new("cpp", "garbage").with_input("1 2"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Compile);
        assert_eq!(err.phase(), Some(Phase::Compile));
        assert_eq!(
            err.to_string(),
            "Error executing C++ code: Compilation failed: Process failed with code 1: \
             main.cpp:1:1: error: expected unqualified-id"
        );
        // run step never happened
        assert_eq!(runner.calls().len(), 1);
        assert_eq!(runner.calls()[0].cmd.program, "g++");
        assert!(test_support::is_empty(&root));
    }

    #[tokio::test]
    async fn test_failure_kinds() {
        let cases = [
            ("java", vec![Reply::NotFound], FailureKind::Spawn, Some(Phase::Compile)),
            (
                "java",
                vec![Reply::Output(String::new()), Reply::Timeout],
                FailureKind::Timeout,
                Some(Phase::Run),
            ),
            (
                "javascript",
                vec![Reply::Fail {
                    exit_code: 1,
                    stderr: "ReferenceError".into(),
                }],
                FailureKind::Runtime,
                Some(Phase::Run),
            ),
            ("python", vec![Reply::Timeout], FailureKind::Timeout, Some(Phase::Run)),
        ];

        for (language, replies, kind, phase) in cases {
            let (root, _runner, dispatcher) = dispatcher(replies);
            let err = dispatcher
                .execute(&ExecutionRequest::new(language, "code"))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), kind, "{language}");
            assert_eq!(err.phase(), phase, "{language}");
            assert!(test_support::is_empty(&root));
        }
    }

    #[tokio::test]
    async fn test_input_contracts_differ_by_language() {
        let (_root, runner, dispatcher) = dispatcher(vec![
            Reply::Output(String::new()),
            Reply::Output(String::new()),
        ]);

        dispatcher
            .execute(&ExecutionRequest::new("python", "x").with_input("a b c"))
            .await
            .unwrap();
        dispatcher
            .execute(&ExecutionRequest::new("javascript", "x").with_input("a b c"))
            .await
            .unwrap();

        let calls = runner.calls();
        // python: stdin
        assert_eq!(calls[0].stdin.as_deref(), Some("a b c"));
        assert_eq!(calls[0].cmd.args.len(), 1);
        // javascript: argv
        assert_eq!(calls[1].stdin, None);
        assert_eq!(&calls[1].cmd.args[1..], ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_repeated_request_is_idempotent() {
        let (root, runner, dispatcher) = dispatcher(vec![
            Reply::Output(String::new()),
            Reply::Output("7\n".into()),
            Reply::Output(String::new()),
            Reply::Output("7\n".into()),
        ]);
        let request = ExecutionRequest::new("java", "class Main {}").with_input("3 4");

        let first = dispatcher.execute(&request).await.unwrap();
        let second = dispatcher.execute(&request).await.unwrap();
        assert_eq!(first, second);

        let calls = runner.calls();
        // run steps used distinct workspace classpaths
        assert_ne!(calls[1].cmd.args[1], calls[3].cmd.args[1]);
        assert!(test_support::is_empty(&root));
    }

    #[tokio::test]
    async fn test_end_to_end_python() {
        if !test_support::tool_available("python3") {
            return;
        }
        let (root, ctx) = test_support::local_context();
        let table = LanguageTable::embedded().unwrap();
        let dispatcher = Dispatcher::from_table(&table, &ctx);

        let out = dispatcher
            .execute(&ExecutionRequest::new("python", "print(input()[::-1])").with_input("olleh"))
            .await
            .unwrap();
        assert_eq!(out, "hello\n");
        assert!(test_support::is_empty(&root));
    }
}
