//! # sim-forge
//!
//! Runs a forge fork test for a shortcut simulation request and turns its
//! `--json` report into a [`SimulationResponse`](sim_types::SimulationResponse).
//!
//! ## Flow
//!
//! 1. Resolve `forgeData` overrides against [`ForgeDefaults`](sim_types::ForgeDefaults)
//! 2. Serialize the payload into `SIMULATION_JSON_DATA`
//! 3. Run `forge test --match-contract <c> --match-test <t> -vvvv --json --fork-url <rpc>`
//! 4. Reject nonzero exits and empty stdout
//! 5. Decode the report, look up `<path>:<contract>` then `<test>()`
//! 6. Classify as setup failure, test failure or success
//!
//! ## Usage
//!
//! ```ignore
//! use sim_forge::{ForgeBinary, ProcessExecutor, Simulator};
//! use sim_types::ForgeDefaults;
//! use std::sync::Arc;
//!
//! let executor = ProcessExecutor::new(ForgeBinary::Lookup).with_working_dir("./contracts");
//! let simulator = Simulator::new(Arc::new(executor), ForgeDefaults::default());
//! let response = simulator.simulate(&request).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binary;
pub mod error;
pub mod outcome;
pub mod process;
pub mod simulator;

#[cfg(test)]
mod test_log;

pub use binary::ForgeBinary;
pub use error::{ForgeError, ForgeResult};
pub use outcome::{classify, decode_report, SimulationOutcome};
pub use process::{ForgeExecutor, ForgeInvocation, ProcessExecutor, RawProcessOutput};
pub use simulator::Simulator;
