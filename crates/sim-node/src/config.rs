//! Configuration types for forge-sim

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use sim_forge::{ForgeBinary, ProcessExecutor};
use sim_server::ServerConfig;
use sim_types::ForgeDefaults;

use crate::cli::Cli;

/// Everything the binary needs to start
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// How forge is run
    pub forge: ForgeConfig,
    /// Defaults for requests without `forgeData`
    pub defaults: ForgeDefaults,
    /// Serve the bundled mock request instead of request bodies
    pub mock_request: bool,
}

/// Forge process configuration
#[derive(Debug, Clone)]
pub struct ForgeConfig {
    /// Binary location
    pub binary: ForgeBinary,
    /// Foundry project root
    pub project_root: Option<PathBuf>,
    /// Process timeout
    pub timeout: Duration,
}

impl ForgeConfig {
    /// Build the process executor
    pub fn executor(&self) -> ProcessExecutor {
        let executor = ProcessExecutor::new(self.binary.clone()).with_timeout(self.timeout);
        match &self.project_root {
            Some(root) => executor.with_working_dir(root),
            None => executor,
        }
    }
}

impl From<&Cli> for SimConfig {
    fn from(cli: &Cli) -> Self {
        let binary = match &cli.forge_bin {
            Some(path) => ForgeBinary::Path(path.clone()),
            None => ForgeBinary::Lookup,
        };

        Self {
            server: ServerConfig {
                listen_addr: SocketAddr::new(cli.host, cli.port),
                max_body_size: cli.max_body_size,
                enable_cors: !cli.no_cors,
            },
            forge: ForgeConfig {
                binary,
                project_root: cli.project_root.clone(),
                timeout: Duration::from_secs(cli.timeout_secs),
            },
            defaults: ForgeDefaults {
                rpc_url: cli.fork_url.clone(),
                ..Default::default()
            },
            mock_request: cli.mock_request,
        }
    }
}
