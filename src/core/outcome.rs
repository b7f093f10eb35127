use serde::Serialize;
use std::fmt;

use crate::dispatcher::ExecutionError;

/// Classified reason an execution did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    UnsupportedLanguage,
    Spawn,
    Compile,
    Runtime,
    Timeout,
    Workspace,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::UnsupportedLanguage => "unsupported_language",
            FailureKind::Spawn => "spawn",
            FailureKind::Compile => "compile",
            FailureKind::Runtime => "runtime",
            FailureKind::Timeout => "timeout",
            FailureKind::Workspace => "workspace",
        };
        write!(f, "{}", s)
    }
}

/// Terminal result of one request
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Success(String),
    Failure { kind: FailureKind, message: String },
}

impl From<Result<String, ExecutionError>> for ExecutionOutcome {
    fn from(result: Result<String, ExecutionError>) -> Self {
        match result {
            Ok(output) => ExecutionOutcome::Success(output),
            Err(e) => ExecutionOutcome::Failure {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_display_matches_serde() {
        for kind in [
            FailureKind::UnsupportedLanguage,
            FailureKind::Spawn,
            FailureKind::Compile,
            FailureKind::Runtime,
            FailureKind::Timeout,
            FailureKind::Workspace,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }

    #[test]
    fn test_from_unsupported_language() {
        let outcome = ExecutionOutcome::from(Err(ExecutionError::UnsupportedLanguage(
            "ruby".into(),
        )));
        assert_eq!(
            outcome,
            ExecutionOutcome::Failure {
                kind: FailureKind::UnsupportedLanguage,
                message: "Unsupported language: ruby".into(),
            }
        );
    }

    #[test]
    fn test_from_success() {
        let outcome = ExecutionOutcome::from(Ok("hi\n".to_string()));
        assert_eq!(outcome, ExecutionOutcome::Success("hi\n".into()));
    }
}
