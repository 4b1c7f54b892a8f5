//! Running forge as a child process
//!
//! Forge can print far more than a single buffered read tolerates at high
//! verbosity, so both pipes are drained chunk by chunk, concurrently, until
//! the child exits.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use sim_types::ForgeInvocationConfig;

use crate::binary::{binary_dir, ForgeBinary};
use crate::error::{ForgeError, ForgeResult};

/// Environment variable carrying the simulation payload
pub const PAYLOAD_ENV: &str = "SIMULATION_JSON_DATA";

/// Environment variable selecting the foundry profile
pub const PROFILE_ENV: &str = "FOUNDRY_PROFILE";

const DEFAULT_TERM: &str = "xterm-256color";
const READ_CHUNK: usize = 8 * 1024;

/// Everything needed to start one forge run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgeInvocation {
    /// Positional arguments after the binary
    pub args: Vec<String>,
    /// `FOUNDRY_PROFILE` value
    pub profile: String,
    /// `SIMULATION_JSON_DATA` value
    pub payload: String,
}

impl ForgeInvocation {
    /// Build from a resolved config and serialized payload
    pub fn new(config: &ForgeInvocationConfig, payload: String) -> Self {
        Self {
            args: config.args(),
            profile: config.profile.clone(),
            payload,
        }
    }
}

/// Captured output of a finished forge run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProcessOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
}

impl RawProcessOutput {
    /// Accept only a zero exit that produced stdout.
    ///
    /// Forge occasionally swallows its own output while still exiting 0, so
    /// the exit code alone is not trusted. Both streams are logged before
    /// the error is returned.
    pub fn check(self) -> ForgeResult<Self> {
        let empty_stdout = self.stdout.is_empty();
        if self.code == Some(0) && !empty_stdout {
            return Ok(self);
        }

        self.log_streams();
        Err(ForgeError::ProcessExecution {
            code: self.code,
            empty_stdout,
        })
    }

    fn log_streams(&self) {
        tracing::error!("----- stdout -----\n{}", self.stdout);
        tracing::error!("----- stderr -----\n{}", self.stderr);
    }
}

/// Something that can run a forge invocation.
///
/// Implementations return whatever the process produced, whatever its exit
/// code; callers apply [`RawProcessOutput::check`].
#[async_trait]
pub trait ForgeExecutor: Send + Sync {
    /// Run forge to completion
    async fn execute(&self, invocation: &ForgeInvocation) -> ForgeResult<RawProcessOutput>;
}

/// Runs the real forge binary
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    binary: ForgeBinary,
    working_dir: Option<PathBuf>,
    timeout: Duration,
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self {
            binary: ForgeBinary::Lookup,
            working_dir: None,
            timeout: Duration::from_secs(600),
        }
    }
}

impl ProcessExecutor {
    /// Create an executor for the given binary
    pub fn new(binary: ForgeBinary) -> Self {
        Self {
            binary,
            ..Default::default()
        }
    }

    /// Run forge from this directory (the foundry project root)
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Kill forge if it runs longer than this
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configured timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn command(&self, program: &Path, invocation: &ForgeInvocation) -> ForgeResult<Command> {
        let mut command = Command::new(program);
        command
            .args(&invocation.args)
            .env(PROFILE_ENV, &invocation.profile)
            .env("PATH", augmented_path(program)?)
            .env(PAYLOAD_ENV, &invocation.payload)
            .env(
                "TERM",
                std::env::var_os("TERM").unwrap_or_else(|| DEFAULT_TERM.into()),
            )
            .env("FORCE_COLOR", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        Ok(command)
    }
}

#[async_trait]
impl ForgeExecutor for ProcessExecutor {
    async fn execute(&self, invocation: &ForgeInvocation) -> ForgeResult<RawProcessOutput> {
        let program = self.binary.resolve().await?;
        tracing::debug!("Running {} {}", program.display(), invocation.args.join(" "));

        let mut child = self
            .command(&program, invocation)?
            .spawn()
            .map_err(ForgeError::ProcessSpawn)?;

        let stdout_pipe = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;
        let stderr_pipe = child.stderr.take().ok_or_else(|| missing_pipe("stderr"))?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        let run = async {
            let (out, err, status) = tokio::join!(
                drain(stdout_pipe, &mut stdout, "stdout"),
                drain(stderr_pipe, &mut stderr, "stderr"),
                child.wait(),
            );
            out?;
            err?;
            status
        };

        let status = match tokio::time::timeout(self.timeout, run).await {
            Ok(status) => status?,
            Err(_) => {
                if let Err(e) = child.kill().await {
                    tracing::warn!("Failed to kill forge after timeout: {}", e);
                }
                let partial = RawProcessOutput {
                    stdout: String::from_utf8_lossy(&stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&stderr).into_owned(),
                    code: None,
                };
                tracing::error!("forge timed out after {:?}", self.timeout);
                partial.log_streams();
                return Err(ForgeError::ProcessTimeout(self.timeout));
            }
        };

        tracing::debug!(
            "forge exited with {:?} ({} bytes stdout, {} bytes stderr)",
            status.code(),
            stdout.len(),
            stderr.len()
        );

        Ok(RawProcessOutput {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            code: status.code(),
        })
    }
}

/// Accumulate a pipe until EOF
async fn drain<R>(mut pipe: R, captured: &mut Vec<u8>, stream: &str) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        let read = pipe.read(&mut chunk).await?;
        if read == 0 {
            return Ok(());
        }
        captured.extend_from_slice(&chunk[..read]);
        tracing::trace!("forge {}: +{} bytes ({} total)", stream, read, captured.len());
    }
}

fn missing_pipe(stream: &str) -> ForgeError {
    ForgeError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("forge {} was not captured", stream),
    ))
}

/// Inherited `PATH` with the binary's directory appended
fn augmented_path(program: &Path) -> ForgeResult<OsString> {
    let inherited = std::env::var_os("PATH").unwrap_or_default();
    let mut paths: Vec<PathBuf> = std::env::split_paths(&inherited).collect();
    if let Some(dir) = binary_dir(program) {
        paths.push(dir.to_path_buf());
    }
    std::env::join_paths(paths).map_err(|e| {
        ForgeError::ProcessSpawn(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
    })
}
