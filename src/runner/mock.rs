//! Scripted runner for protocol tests
//!
//! Records every invocation and answers from a queue of canned results.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use super::{CommandSpec, RunError, Runner};

/// One recorded invocation
#[derive(Debug, Clone)]
pub struct Invocation {
    pub cmd: CommandSpec,
    pub stdin: Option<String>,
    pub timeout: Duration,
    /// Absolute path arguments that existed when the call was made
    pub existing_paths: Vec<String>,
}

pub enum Reply {
    Output(String),
    Fail { exit_code: i32, stderr: String },
    Timeout,
    NotFound,
}

#[derive(Default)]
pub struct ScriptedRunner {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Runner for ScriptedRunner {
    async fn run(
        &self,
        cmd: &CommandSpec,
        stdin: Option<&str>,
        timeout: Duration,
    ) -> Result<String, RunError> {
        let existing_paths = cmd
            .args
            .iter()
            .filter(|a| a.starts_with('/') && std::path::Path::new(a.as_str()).exists())
            .cloned()
            .collect();

        self.calls.lock().unwrap().push(Invocation {
            cmd: cmd.clone(),
            stdin: stdin.map(str::to_string),
            timeout,
            existing_paths,
        });

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Output(String::new()));

        match reply {
            Reply::Output(out) => Ok(out),
            Reply::Fail { exit_code, stderr } => Err(RunError::Process {
                exit_code: Some(exit_code),
                stderr,
            }),
            Reply::Timeout => Err(RunError::Timeout {
                program: cmd.program.clone(),
                timeout,
            }),
            Reply::NotFound => Err(RunError::Spawn {
                program: cmd.program.clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }
}
