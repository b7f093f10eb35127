//! Executor configuration
//!
//! Loaded once from the environment at start-up and handed to the
//! components that need it.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

/// Executor configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorConfig {
    /// Wall-clock budget for run/interpret steps (default: 20000ms)
    pub run_timeout: Duration,
    /// Wall-clock budget for compile steps (default: 30000ms)
    pub compile_timeout: Duration,
    /// Parent directory for workspaces (default: OS temp dir)
    pub workspace_root: Option<PathBuf>,
    /// HTTP listen address
    pub bind_addr: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            run_timeout: Duration::from_millis(20_000),
            compile_timeout: Duration::from_millis(30_000),
            workspace_root: None,
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl ExecutorConfig {
    /// Build from process environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, falling back to defaults for unset keys
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let run_timeout = match lookup("EXEC_TIMEOUT_MS") {
            Some(raw) => parse_timeout("EXEC_TIMEOUT_MS", &raw)?,
            None => defaults.run_timeout,
        };
        let compile_timeout = match lookup("COMPILE_TIMEOUT_MS") {
            Some(raw) => parse_timeout("COMPILE_TIMEOUT_MS", &raw)?,
            None => defaults.compile_timeout,
        };

        Ok(Self {
            run_timeout,
            compile_timeout,
            workspace_root: lookup("WORKSPACE_ROOT")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
        })
    }
}

fn parse_timeout(key: &str, raw: &str) -> anyhow::Result<Duration> {
    let ms: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid {}: {:?}", key, raw))?;
    if ms == 0 {
        anyhow::bail!("{} must be greater than zero", key);
    }
    Ok(Duration::from_millis(ms))
}
