//! CLI argument parsing for forge-sim

use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;

/// Forge shortcut simulation server
#[derive(Parser, Debug, Clone)]
#[command(name = "forge-sim")]
#[command(about = "Simulates shortcut transactions by running forge fork tests")]
#[command(version)]
pub struct Cli {
    /// Listen host
    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Listen port
    #[arg(long, env = "SIM_ENSO_CHECKOUT_PORT", default_value = "3000")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Path to the forge binary (looked up on PATH if not specified)
    #[arg(long)]
    pub forge_bin: Option<PathBuf>,

    /// Foundry project root forge runs in (current directory if not specified)
    #[arg(long)]
    pub project_root: Option<PathBuf>,

    /// Default fork RPC URL, used when a request does not set `rpcUrl`
    #[arg(long, default_value = "127.0.0.1:8545")]
    pub fork_url: String,

    /// Kill forge after this many seconds
    #[arg(long, default_value = "600")]
    pub timeout_secs: u64,

    /// Ignore request bodies and always simulate the bundled mock request
    #[arg(long)]
    pub mock_request: bool,

    /// Maximum request body size in bytes
    #[arg(long, default_value = "10485760")]
    pub max_body_size: usize,

    /// Disable permissive CORS headers
    #[arg(long)]
    pub no_cors: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
