//! # sim-types
//!
//! Wire types for the forge shortcut simulator.
//!
//! - [`SimulationRequest`]: what `POST /simulate` accepts
//! - [`SimulationPayload`]: the exact JSON forge's scripting layer reads from
//!   `SIMULATION_JSON_DATA`
//! - [`ForgeInvocationConfig`]: request overrides resolved against [`ForgeDefaults`]
//! - [`TestReport`]: forge's `--json` test output
//! - [`SimulationResponse`] / [`HealthResponse`]: what the HTTP layer returns

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod fixtures;
pub mod forge;
pub mod report;
pub mod request;
pub mod response;

pub use forge::{ForgeData, ForgeDefaults, ForgeInvocationConfig, LogFormat, LogVerbosity};
pub use report::{SuiteDuration, SuiteReport, TestReport, TestResult, TestResults, TestStatus};
pub use request::{
    AddressArg, HexString, InvalidTokenType, ShortcutData, SimulationPayload, SimulationRequest,
    TokenType,
};
pub use response::{HealthResponse, SimulationResponse};
