//! # sim-server
//!
//! HTTP boundary of the forge shortcut simulator.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/simulate` | Run a simulation; always HTTP 200, failures are `success: false` |
//! | `GET` | `/health` | `{"status": "ok", "timestamp": "<RFC 3339>"}` |
//!
//! ## Usage
//!
//! ```ignore
//! use sim_server::{ServerConfig, ServerState, SimServer};
//!
//! let state = ServerState::new(simulator);
//! let server = SimServer::new(ServerConfig::default(), state);
//! server.run(shutdown_signal()).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod routes;
pub mod server;

pub use error::{ServerError, ServerResult};
pub use routes::{health, simulate, ServerState};
pub use server::{ServerConfig, SimServer};
