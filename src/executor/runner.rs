//! Async process execution with timeout support
//!
//! Provides a unified interface for running an [`Invocation`] with:
//! - Streaming (inherited stdio) or captured output
//! - Output truncation for large captured outputs
//! - Configurable timeouts
//! - Working directory control
//! - Exit code pass-through, including signal deaths

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};

use crate::command::Invocation;
use crate::error::DispatchError;

/// Maximum captured output size before truncation (in bytes)
const MAX_OUTPUT_SIZE: usize = 100_000;

/// Truncation marker for large outputs
const TRUNCATION_MARKER: &str = "\n... [output truncated] ...\n";

/// Options for process execution
#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// Working directory for the command
    pub working_dir: Option<PathBuf>,
    /// Capture output instead of inheriting the terminal
    pub capture_output: bool,
    /// Maximum captured output size before truncation
    pub max_output_size: usize,
    /// Show a spinner on stderr while a captured command runs
    pub spinner: bool,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            working_dir: None,
            capture_output: false,
            max_output_size: MAX_OUTPUT_SIZE,
            spinner: false,
        }
    }
}

impl ExecOptions {
    /// Create options with a working directory
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
            ..Default::default()
        }
    }

    /// Capture output instead of streaming it
    pub fn captured(mut self) -> Self {
        self.capture_output = true;
        self
    }

    /// Set maximum output size
    pub fn with_max_output(mut self, size: usize) -> Self {
        self.max_output_size = size;
        self
    }
}

/// Result of process execution
#[derive(Debug)]
pub struct ExecResult {
    /// Exit code to propagate; `128 + signal` for signal deaths
    pub exit_code: i32,
    /// Captured standard output (empty when streaming)
    pub stdout: String,
    /// Whether stdout was truncated
    pub stdout_truncated: bool,
    /// Captured standard error (empty when streaming)
    pub stderr: String,
    /// Whether stderr was truncated
    pub stderr_truncated: bool,
    /// Duration of execution
    pub duration: Duration,
}

impl ExecResult {
    /// Whether the command exited with code 0
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Finds programs before they are spawned
#[cfg_attr(test, mockall::automock)]
pub trait ProgramLocator: Send + Sync {
    /// Full path of `program` as it would be run from `working_dir`
    fn locate(&self, program: &str, working_dir: &Path) -> Option<PathBuf>;
}

/// Locates programs on `PATH`, or relative to the working directory when
/// the program name contains a path separator
#[derive(Debug, Default, Clone, Copy)]
pub struct PathLocator;

impl ProgramLocator for PathLocator {
    fn locate(&self, program: &str, working_dir: &Path) -> Option<PathBuf> {
        if program.contains(std::path::MAIN_SEPARATOR) || program.contains('/') {
            let path = working_dir.join(program);
            return path.is_file().then_some(path);
        }
        which::which(program).ok()
    }
}

/// Exit code for a finished process
///
/// Uses the process's own code when it has one, otherwise the shell
/// convention of `128 + signal`.
pub fn exit_code_of(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

/// Execute an invocation and wait for it
///
/// An invocation with a timeout runs in its own process group with stdin
/// closed, so that the whole tree can be killed when the timeout expires.
/// Ctrl-C is forwarded to that group while waiting.
///
/// # Errors
/// * `DispatchError::SpawnFailed` - If the command couldn't be spawned
/// * `DispatchError::Timeout` - If the invocation's timeout expired; the process group is killed
pub async fn exec_invocation(
    invocation: &Invocation,
    options: &ExecOptions,
) -> Result<ExecResult, DispatchError> {
    let start = Instant::now();
    let command_str = invocation.command_line();
    let isolated = cfg!(unix) && invocation.timeout.is_some();

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);
    cmd.envs(&invocation.env);
    cmd.kill_on_drop(true);

    if let Some(ref dir) = options.working_dir {
        cmd.current_dir(dir);
    }

    if options.capture_output {
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
    }

    // A background process group must not read the terminal
    if options.capture_output || isolated {
        cmd.stdin(Stdio::null());
    } else {
        cmd.stdin(Stdio::inherit());
    }

    #[cfg(unix)]
    {
        if isolated {
            cmd.process_group(0);
        }
    }

    tracing::debug!("Executing: {}", command_str);

    let child = cmd.spawn().map_err(|e| DispatchError::SpawnFailed {
        command: command_str.clone(),
        error: e.to_string(),
    })?;
    let group = if isolated { child.id() } else { None };

    let spinner = (options.capture_output && options.spinner).then(|| start_spinner(&command_str));

    let deadline = async {
        match invocation.timeout {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    let wait = wait_for_exit(child, options);
    tokio::pin!(wait);

    let waited = loop {
        tokio::select! {
            result = &mut wait => break result,
            _ = &mut deadline => {
                if let Some(pgid) = group {
                    signal_group(pgid, "KILL").await;
                }
                if let Some(pb) = spinner {
                    pb.finish_and_clear();
                }
                // Dropping the wait future drops the child, which kills it
                return Err(DispatchError::Timeout {
                    command: command_str,
                    timeout_secs: invocation.timeout.map(|t| t.as_secs()).unwrap_or_default(),
                });
            }
            interrupted = tokio::signal::ctrl_c(), if group.is_some() => {
                if interrupted.is_ok() {
                    if let Some(pgid) = group {
                        signal_group(pgid, "INT").await;
                    }
                }
            }
        }
    };

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let waited = waited?;
    let duration = start.elapsed();

    tracing::debug!(
        "{} exited with {} after {}ms",
        command_str,
        waited.exit_code,
        duration.as_millis()
    );

    Ok(ExecResult {
        exit_code: waited.exit_code,
        stdout: waited.stdout,
        stdout_truncated: waited.stdout_truncated,
        stderr: waited.stderr,
        stderr_truncated: waited.stderr_truncated,
        duration,
    })
}

/// Send `signal` to every process in the group `pgid`
async fn signal_group(pgid: u32, signal: &str) {
    let result = Command::new("kill")
        .arg(format!("-{}", signal))
        .arg("--")
        .arg(format!("-{}", pgid))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    match result {
        Ok(status) if status.success() => {}
        Ok(status) => tracing::debug!("kill -{} -{} exited with {}", signal, pgid, status),
        Err(e) => tracing::warn!("Failed to signal process group {}: {}", pgid, e),
    }
}

fn start_spinner(command: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        pb.set_style(style);
    }
    pb.set_message(command.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Internal result from waiting for a process
struct WaitResult {
    exit_code: i32,
    stdout: String,
    stderr: String,
    stdout_truncated: bool,
    stderr_truncated: bool,
}

/// Wait for a child process, draining its pipes if output is captured
async fn wait_for_exit(
    mut child: Child,
    options: &ExecOptions,
) -> Result<WaitResult, DispatchError> {
    let max_output_size = options.max_output_size;
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    // Drain both pipes concurrently so neither can fill up and block the child
    let stdout_handle = tokio::spawn(async move {
        match stdout {
            Some(stdout) => read_and_truncate(stdout, max_output_size).await,
            None => (String::new(), false),
        }
    });

    let stderr_handle = tokio::spawn(async move {
        match stderr {
            Some(stderr) => read_and_truncate(stderr, max_output_size).await,
            None => (String::new(), false),
        }
    });

    let status = child.wait().await?;

    let (stdout, stdout_truncated) = stdout_handle
        .await
        .map_err(|e| std::io::Error::other(format!("stdout task failed: {}", e)))?;

    let (stderr, stderr_truncated) = stderr_handle
        .await
        .map_err(|e| std::io::Error::other(format!("stderr task failed: {}", e)))?;

    Ok(WaitResult {
        exit_code: exit_code_of(&status),
        stdout,
        stderr,
        stdout_truncated,
        stderr_truncated,
    })
}

/// Read raw bytes from an async reader, keeping at most `max_size` of them
///
/// Reading continues to EOF after truncation so the child never blocks on
/// a full pipe. Output that is not valid UTF-8 is converted lossily.
async fn read_and_truncate<R: AsyncRead + Unpin>(mut reader: R, max_size: usize) -> (String, bool) {
    let mut output: Vec<u8> = Vec::with_capacity(max_size.min(64 * 1024));
    let mut chunk = [0u8; 8192];
    let mut truncated = false;

    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(_) if truncated => {}
            Ok(n) => {
                let remaining = max_size.saturating_sub(output.len());
                if n > remaining {
                    output.extend_from_slice(&chunk[..remaining]);
                    truncated = true;
                } else {
                    output.extend_from_slice(&chunk[..n]);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => {
                tracing::warn!("Error reading output: {}", e);
                break;
            }
        }
    }

    let mut text = String::from_utf8_lossy(&output).into_owned();
    if truncated {
        text.push_str(TRUNCATION_MARKER);
    }
    (text, truncated)
}
