//! Locating the forge binary on the host

use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::error::{ForgeError, ForgeResult};

/// Name of the forge executable
pub const FORGE_COMMAND: &str = "forge";

/// Where to find forge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ForgeBinary {
    /// Search `PATH` with `which` (`where` on Windows)
    #[default]
    Lookup,
    /// Use this file
    Path(PathBuf),
}

impl ForgeBinary {
    /// Resolve to an absolute path of an existing file
    pub async fn resolve(&self) -> ForgeResult<PathBuf> {
        match self {
            Self::Path(path) if path.is_file() => Ok(path.clone()),
            Self::Path(path) => Err(ForgeError::BinaryNotFound(format!(
                "{} does not exist",
                path.display()
            ))),
            Self::Lookup => lookup(FORGE_COMMAND).await,
        }
    }
}

fn lookup_command() -> &'static str {
    if cfg!(windows) {
        "where"
    } else {
        "which"
    }
}

/// Ask the host's lookup tool for `command`
pub async fn lookup(command: &str) -> ForgeResult<PathBuf> {
    let tool = lookup_command();
    let output = Command::new(tool)
        .arg(command)
        .output()
        .await
        .map_err(|e| ForgeError::BinaryNotFound(format!("`{} {}` failed: {}", tool, command, e)))?;

    if !output.status.success() {
        return Err(ForgeError::BinaryNotFound(format!(
            "`{} {}` found nothing",
            tool, command
        )));
    }

    // `where` lists every match, one per line
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| {
            ForgeError::BinaryNotFound(format!("`{} {}` printed no path", tool, command))
        })
}

/// Directory containing the binary, appended to the child's `PATH`
pub fn binary_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|dir| !dir.as_os_str().is_empty())
}
