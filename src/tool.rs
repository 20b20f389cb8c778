//! # External Packaging Tool
//!
//! Packing and publishing both shell out to `nuget` (or a compatible tool).
//! This module runs the tool with a bounded wait and decides whether the run
//! counts as a failure.
//!
//! Standard output and standard error are drained on two reader threads
//! while the main thread waits for the process, so a tool that writes more
//! than a pipe buffer's worth of output cannot stall. When the timeout
//! elapses the process is killed and reaped. A background process that
//! inherits the pipes cannot stretch the wait either: the pipes are read
//! until the same deadline and whatever arrived by then is kept.
//!
//! Whether a finished run failed depends on the [`FailurePolicy`]. The
//! default, [`FailurePolicy::Stderr`], treats any non-blank error output as
//! failure regardless of the exit code, which is how `nuget.exe` has
//! historically been judged by build integrations.

use std::fmt;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use wait_timeout::ChildExt;

use crate::defaults;
use crate::error::{Error, Result};

const REDACTED: &str = "********";

/// How long to keep reading the pipes once the process is gone.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Which signals of a finished run count as failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Non-blank standard error fails the run; the exit code is ignored.
    #[default]
    Stderr,
    /// A non-zero exit code fails the run; standard error is only logged.
    ExitCode,
    /// Either signal fails the run.
    Any,
}

/// The operation a tool run performs, for messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Pack,
    Publish,
}

impl Operation {
    fn gerund(self) -> &'static str {
        match self {
            Operation::Pack => "creating",
            Operation::Publish => "publishing",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Operation::Pack => "Creating the NuGet package",
            Operation::Publish => "Publishing the NuGet package",
        }
    }
}

/// Where the tool lives, how long it may run and how its result is judged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSettings {
    pub program: PathBuf,
    pub timeout: Duration,
    pub failure_policy: FailurePolicy,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            program: PathBuf::from(defaults::TOOL),
            timeout: defaults::tool_timeout(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// A fully specified tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    /// Argument values that must not appear in logs.
    pub secrets: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            secrets: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add an argument whose value is masked in [`ToolCommand::display_line`].
    pub fn secret_arg(mut self, arg: impl Into<String>) -> Self {
        let arg = arg.into();
        if !arg.is_empty() {
            self.secrets.push(arg.clone());
        }
        self.args.push(arg);
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// The command line as it may be shown to a user, secrets masked.
    pub fn display_line(&self) -> String {
        let mut line = quote(&self.program.to_string_lossy());
        for arg in &self.args {
            line.push(' ');
            if self.secrets.iter().any(|s| s == arg) {
                line.push_str(REDACTED);
            } else {
                line.push_str(&quote(arg));
            }
        }
        line
    }
}

fn quote(arg: &str) -> String {
    if arg.is_empty() || arg.contains(char::is_whitespace) {
        format!("\"{}\"", arg)
    } else {
        arg.to_string()
    }
}

/// How a tool run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    TimedOut,
    /// Non-zero exit; `-1` when the process was ended by a signal.
    NonZeroExit(i32),
    CleanExitWithStderr,
    CleanExit,
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolStatus::TimedOut => write!(f, "timed out"),
            ToolStatus::NonZeroExit(code) => write!(f, "exited with code {}", code),
            ToolStatus::CleanExitWithStderr => write!(f, "exited cleanly with error output"),
            ToolStatus::CleanExit => write!(f, "exited cleanly"),
        }
    }
}

/// Everything observed from one tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub status: ToolStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    fn has_stderr(&self) -> bool {
        !self.stderr.trim().is_empty()
    }

    /// Judge the run under `policy`.
    ///
    /// Returns the output unchanged when it counts as success.
    pub fn evaluate(
        self,
        policy: FailurePolicy,
        operation: Operation,
        timeout: Duration,
    ) -> Result<Self> {
        let failed = match self.status {
            ToolStatus::TimedOut => {
                return Err(Error::ToolTimeout {
                    operation: operation.gerund().to_string(),
                    seconds: timeout.as_secs(),
                })
            }
            ToolStatus::NonZeroExit(_) => match policy {
                FailurePolicy::Stderr => self.has_stderr(),
                FailurePolicy::ExitCode | FailurePolicy::Any => true,
            },
            ToolStatus::CleanExitWithStderr => policy != FailurePolicy::ExitCode,
            ToolStatus::CleanExit => false,
        };

        if !failed {
            if self.has_stderr() {
                warn!("{}: {}", operation.description(), self.stderr.trim());
            }
            if let ToolStatus::NonZeroExit(_) = self.status {
                warn!(
                    "{}: the tool {} but produced no error output",
                    operation.description(),
                    self.status
                );
            }
            return Ok(self);
        }

        let message = if self.has_stderr() {
            self.stderr.trim().to_string()
        } else {
            format!("the tool {}", self.status)
        };
        error!("{}", message);
        Err(Error::ToolFailed {
            operation: operation.description().to_string(),
            message,
        })
    }
}

type PipeChunk = std::io::Result<Vec<u8>>;

/// Read `pipe` on its own thread, sending chunks as they arrive. The channel
/// disconnects once the pipe reaches end of file.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> mpsc::Receiver<PipeChunk> {
    let (tx, rx) = mpsc::channel();
    if let Some(mut pipe) = pipe {
        thread::spawn(move || {
            let mut buffer = [0u8; 8192];
            loop {
                match pipe.read(&mut buffer) {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(Ok(buffer[..n].to_vec())).is_err() {
                            break;
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        let _ = tx.send(Err(e));
                        break;
                    }
                }
            }
        });
    }
    rx
}

/// Gather what a reader thread sends until its pipe closes or `deadline`
/// passes, whichever comes first.
fn collect(rx: &mpsc::Receiver<PipeChunk>, deadline: Instant, stream: &str) -> String {
    let mut bytes = Vec::new();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(Ok(chunk)) => bytes.extend_from_slice(&chunk),
            Ok(Err(e)) => {
                warn!("Failed to read tool {}: {}", stream, e);
                break;
            }
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "Tool {} is still held open by another process, keeping the {} bytes read so far",
                    stream,
                    bytes.len()
                );
                break;
            }
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

fn spawn(command: &ToolCommand) -> Result<Child> {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = &command.working_dir {
        cmd.current_dir(dir);
    }

    cmd.spawn().map_err(|e| Error::ToolSpawn {
        tool: command.program.display().to_string(),
        hint: (e.kind() == std::io::ErrorKind::NotFound)
            .then(|| crate::suggestions::tool_not_found_hint(&command.program)),
        message: e.to_string(),
    })
}

/// Run `command`, giving up after `timeout`.
///
/// Only a failure to start or wait for the process is an error here; how
/// the run ended is reported in [`ToolOutput::status`].
pub fn run_tool(command: &ToolCommand, timeout: Duration) -> Result<ToolOutput> {
    info!("Running {}", command.display_line());
    let deadline = Instant::now() + timeout;
    let mut child = spawn(command)?;

    let stdout_rx = drain(child.stdout.take());
    let stderr_rx = drain(child.stderr.take());

    let waited = child.wait_timeout(timeout).map_err(|e| Error::ToolSpawn {
        tool: command.program.display().to_string(),
        message: format!("failed to wait for the process: {}", e),
        hint: None,
    })?;

    let output = match waited {
        Some(exit) => {
            // Background processes may inherit the pipes and outlive the tool.
            let drain_deadline = deadline.max(Instant::now() + DRAIN_GRACE);
            let stdout = collect(&stdout_rx, drain_deadline, "stdout");
            let stderr = collect(&stderr_rx, drain_deadline, "stderr");
            let status = if !exit.success() {
                ToolStatus::NonZeroExit(exit.code().unwrap_or(-1))
            } else if !stderr.trim().is_empty() {
                ToolStatus::CleanExitWithStderr
            } else {
                ToolStatus::CleanExit
            };
            ToolOutput {
                status,
                stdout,
                stderr,
            }
        }
        None => {
            warn!(
                "{} did not finish within {} seconds, killing it",
                command.program.display(),
                timeout.as_secs()
            );
            let _ = child.kill();
            let _ = child.wait();
            let drain_deadline = Instant::now() + DRAIN_GRACE;
            ToolOutput {
                status: ToolStatus::TimedOut,
                stdout: collect(&stdout_rx, drain_deadline, "stdout"),
                stderr: collect(&stderr_rx, drain_deadline, "stderr"),
            }
        }
    };

    for line in output.stdout.lines().filter(|l| !l.trim().is_empty()) {
        info!("{}", line);
    }
    debug!("{} {}", command.program.display(), output.status);
    Ok(output)
}
