//! Local runner implementation
//!
//! Executes programs directly on the host with piped stdio and a wall-clock timeout.

use async_trait::async_trait;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{CommandSpec, RunError, Runner};

type Drain = JoinHandle<std::io::Result<Vec<u8>>>;

/// Runner that spawns processes on the local host
#[derive(Debug, Default, Clone)]
pub struct LocalRunner;

impl LocalRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Runner for LocalRunner {
    async fn run(
        &self,
        cmd: &CommandSpec,
        stdin: Option<&str>,
        timeout: Duration,
    ) -> Result<String, RunError> {
        debug!(
            command = ?cmd.to_vec(),
            timeout_ms = timeout.as_millis() as u64,
            "Spawning process"
        );
        let started = Instant::now();

        let mut command = Command::new(&cmd.program);
        command
            .args(&cmd.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // own process group so a timeout can take out grandchildren too
            .process_group(0)
            .kill_on_drop(true);
        if let Some(dir) = &cmd.work_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| {
            warn!(program = %cmd.program, error = %source, "Failed to spawn process");
            RunError::Spawn {
                program: cmd.program.clone(),
                source,
            }
        })?;
        let pid = child.id();

        let mut stdout_task = drain(child.stdout.take());
        let mut stderr_task = drain(child.stderr.take());

        // An empty payload leaves stdin open and untouched
        let held_stdin = match (child.stdin.take(), stdin.filter(|s| !s.is_empty())) {
            (Some(mut pipe), Some(input)) => {
                let input = input.as_bytes().to_vec();
                tokio::spawn(async move {
                    if let Err(e) = pipe.write_all(&input).await {
                        debug!(error = %e, "Process stopped reading stdin");
                    }
                    // dropping the pipe closes the child's stdin
                });
                None
            }
            (pipe, _) => pipe,
        };

        let collected = tokio::time::timeout(
            timeout,
            collect(&mut child, &mut stdout_task, &mut stderr_task),
        )
        .await;
        drop(held_stdin);

        let (status, stdout, stderr) = match collected {
            Ok(result) => result?,
            Err(_) => {
                terminate(&mut child, pid).await;
                stdout_task.abort();
                stderr_task.abort();
                warn!(
                    program = %cmd.program,
                    timeout_ms = timeout.as_millis() as u64,
                    "Process timed out and was killed"
                );
                return Err(RunError::Timeout {
                    program: cmd.program.clone(),
                    timeout,
                });
            }
        };

        let stderr = String::from_utf8_lossy(&stderr).into_owned();
        debug!(
            program = %cmd.program,
            exit_code = ?status.code(),
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Process finished"
        );

        // stderr output counts as failure even on a zero exit code
        if status.success() && stderr.is_empty() {
            Ok(String::from_utf8_lossy(&stdout).into_owned())
        } else {
            Err(RunError::Process {
                exit_code: status.code(),
                stderr,
            })
        }
    }
}

fn drain<R>(pipe: Option<R>) -> Drain
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf).await?;
        }
        Ok(buf)
    })
}

async fn collect(
    child: &mut Child,
    stdout_task: &mut Drain,
    stderr_task: &mut Drain,
) -> Result<(ExitStatus, Vec<u8>, Vec<u8>), RunError> {
    let status = child.wait().await?;
    let stdout = stdout_task.await.map_err(std::io::Error::other)??;
    let stderr = stderr_task.await.map_err(std::io::Error::other)??;
    Ok((status, stdout, stderr))
}

/// Kill the whole process group, then reap the direct child
async fn terminate(child: &mut Child, pid: Option<u32>) {
    if let Some(pid) = pid {
        if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            debug!(pid, error = %e, "killpg failed");
        }
    }
    if let Err(e) = child.kill().await {
        debug!(error = %e, "Failed to reap killed process");
    }
}
