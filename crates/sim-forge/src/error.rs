//! Simulation error types

use std::time::Duration;

use thiserror::Error;

/// Errors raised while running forge and reading its report
#[derive(Debug, Error)]
pub enum ForgeError {
    /// The forge binary could not be located
    #[error("missing 'forge' binary: {0}. Make sure foundry is properly installed")]
    BinaryNotFound(String),

    /// The OS refused to start the process
    #[error("failed to start forge: {0}")]
    ProcessSpawn(#[source] std::io::Error),

    /// Nonzero exit, or exit 0 without any stdout
    #[error("{}. See logs above for stdout/stderr", describe_exit(.code, .empty_stdout))]
    ProcessExecution {
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// Exit code was 0 but stdout was empty
        empty_stdout: bool,
    },

    /// Forge ran past the configured timeout and was killed
    #[error("forge did not finish within {0:?} and was killed")]
    ProcessTimeout(Duration),

    /// Reading the child's pipes failed
    #[error("io error while reading forge output: {0}")]
    Io(#[from] std::io::Error),

    /// The request payload could not be serialized
    #[error("failed to serialize simulation payload: {0}")]
    Payload(#[source] serde_json::Error),

    /// Human-readable output was requested, there is no report to decode
    #[error("forge ran with the default log format; output was logged for inspection")]
    UnstructuredOutput,

    /// Stdout was not valid JSON
    #[error("unexpected error parsing forge JSON output: {0}")]
    MalformedReport(#[source] serde_json::Error),

    /// The report lacks the expected suite or test key
    #[error("forge report has no entry for '{0}'")]
    MissingReportKey(String),
}

fn describe_exit(code: &Option<i32>, empty_stdout: &bool) -> String {
    match (code, empty_stdout) {
        (Some(0), true) => "forge exited with code 0 but wrote nothing to stdout".to_string(),
        (Some(code), _) => format!("forge exited with code {}", code),
        (None, _) => "forge was terminated by a signal".to_string(),
    }
}

/// Result type for forge operations
pub type ForgeResult<T> = Result<T, ForgeError>;
