use std::fmt;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Poll interval while waiting on a target with a timeout configured.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Errors local to the execution of a single candidate input.
///
/// None of these corrupt harness state: the next candidate runs against a
/// freshly spawned process.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("failed to spawn target command '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("target stdin was not available after piping")]
    StdinUnavailable,
    #[error("failed to write input to target stdin: {0}")]
    StdinWrite(std::io::Error),
    #[error("failed to drain target output stream: {0}")]
    StreamRead(std::io::Error),
    #[error("failed while waiting for target termination: {0}")]
    Wait(std::io::Error),
}

/// How one target execution terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// The target exited on its own with this exit code.
    Exited(i32),
    /// The target was terminated by a signal (Unix only).
    Signaled(i32),
    /// The target exceeded the configured wall-clock bound and was killed.
    TimedOut,
}

impl ExecutionStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionStatus::Exited(0))
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStatus::Exited(code) => write!(f, "exited with code {code}"),
            ExecutionStatus::Signaled(signal) => write!(f, "terminated by signal {signal}"),
            ExecutionStatus::TimedOut => write!(f, "timed out"),
        }
    }
}

/// The outcome of driving the target to completion on one candidate input.
#[derive(Debug, Clone)]
pub struct ExecutionRecord {
    pub input: String,
    pub status: ExecutionStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Spawn specification for the fuzz target.
///
/// The command string is handed to the platform interpreter as a single
/// argument (`sh -c` on POSIX, `cmd /c` on Windows) and is never tokenized
/// by the harness itself.
#[derive(Debug, Clone)]
pub struct TargetCommand {
    pub command: String,
    pub working_dir: PathBuf,
    pub timeout: Option<Duration>,
}

impl TargetCommand {
    pub fn new(command: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            working_dir: working_dir.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[cfg(windows)]
    fn shell_command(&self) -> Command {
        let mut command = Command::new("cmd");
        command.arg("/c").arg(&self.command);
        command
    }

    #[cfg(not(windows))]
    fn shell_command(&self) -> Command {
        let mut command = Command::new("sh");
        command.arg("-c").arg(&self.command);
        command
    }

    /// Runs the target once: spawn, write `input` to stdin, close it, drain
    /// stdout and stderr to end-of-stream, wait for termination.
    pub fn execute(&self, input: &str) -> Result<ExecutionRecord, HarnessError> {
        let mut command = self.shell_command();
        command
            .current_dir(&self.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().map_err(|source| HarnessError::Spawn {
            command: self.command.clone(),
            source,
        })?;

        // Both output streams are drained concurrently so a chatty target
        // cannot fill one pipe while we block on the other.
        let stdout_reader = match child.stdout.take() {
            Some(stream) => drain_stream(stream),
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(HarnessError::StreamRead(std::io::Error::other(
                    "target stdout was not available after piping",
                )));
            }
        };
        let stderr_reader = match child.stderr.take() {
            Some(stream) => drain_stream(stream),
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(HarnessError::StreamRead(std::io::Error::other(
                    "target stderr was not available after piping",
                )));
            }
        };

        match child.stdin.take() {
            Some(mut stdin) => {
                if let Err(e) = stdin.write_all(input.as_bytes()) {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(HarnessError::StdinWrite(e));
                }
                // Dropping the handle closes the pipe and signals EOF.
                drop(stdin);
            }
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(HarnessError::StdinUnavailable);
            }
        }

        let status = match self.timeout {
            Some(limit) => self.wait_with_deadline(&mut child, limit)?,
            None => {
                let exit = child.wait().map_err(HarnessError::Wait)?;
                decode_exit_status(exit)
            }
        };

        let stdout = join_drained(stdout_reader)?;
        let stderr = join_drained(stderr_reader)?;

        Ok(ExecutionRecord {
            input: input.to_string(),
            status,
            stdout,
            stderr,
        })
    }

    /// Polls the child until it terminates or the deadline passes; on expiry
    /// the child is killed and reaped, and the outcome is `TimedOut`.
    fn wait_with_deadline(
        &self,
        child: &mut Child,
        limit: Duration,
    ) -> Result<ExecutionStatus, HarnessError> {
        let start = Instant::now();
        loop {
            match child.try_wait().map_err(HarnessError::Wait)? {
                Some(exit) => return Ok(decode_exit_status(exit)),
                None => {
                    if start.elapsed() > limit {
                        child.kill().map_err(HarnessError::Wait)?;
                        child.wait().map_err(HarnessError::Wait)?;
                        return Ok(ExecutionStatus::TimedOut);
                    }
                    thread::sleep(WAIT_POLL_INTERVAL);
                }
            }
        }
    }
}

fn decode_exit_status(exit: std::process::ExitStatus) -> ExecutionStatus {
    if let Some(code) = exit.code() {
        return ExecutionStatus::Exited(code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = exit.signal() {
            return ExecutionStatus::Signaled(signal);
        }
    }
    ExecutionStatus::Exited(-1)
}

fn drain_stream<S: Read + Send + 'static>(mut stream: S) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        stream.read_to_end(&mut buffer)?;
        Ok(buffer)
    })
}

fn join_drained(handle: JoinHandle<std::io::Result<Vec<u8>>>) -> Result<String, HarnessError> {
    let bytes = handle
        .join()
        .map_err(|_| HarnessError::StreamRead(std::io::Error::other("stream reader panicked")))?
        .map_err(HarnessError::StreamRead)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
