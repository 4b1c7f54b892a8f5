//! Request → forge → response

use std::sync::Arc;

use sim_types::{ForgeDefaults, LogFormat, SimulationRequest, SimulationResponse, TestResult};

use crate::error::{ForgeError, ForgeResult};
use crate::outcome::{classify, decode_report, SimulationOutcome};
use crate::process::{ForgeExecutor, ForgeInvocation};

/// Runs shortcut simulations through a [`ForgeExecutor`]
#[derive(Clone)]
pub struct Simulator {
    executor: Arc<dyn ForgeExecutor>,
    defaults: ForgeDefaults,
}

impl Simulator {
    /// Create a simulator
    pub fn new(executor: Arc<dyn ForgeExecutor>, defaults: ForgeDefaults) -> Self {
        Self { executor, defaults }
    }

    /// Defaults applied to requests without overrides
    pub fn defaults(&self) -> &ForgeDefaults {
        &self.defaults
    }

    /// Run one simulation.
    ///
    /// Setup and test failures are `Ok` responses with `success: false`;
    /// `Err` means forge could not be run or its output could not be read.
    pub async fn simulate(&self, request: &SimulationRequest) -> ForgeResult<SimulationResponse> {
        let config = self.defaults.resolve(request.forge_data.as_ref());

        if config.is_tx_data_logged {
            tracing::info!("Simulation JSON data sent to forge: {:?}", request);
        }

        let payload = request.payload().to_json().map_err(ForgeError::Payload)?;
        let invocation = ForgeInvocation::new(&config, payload);

        let output = self.executor.execute(&invocation).await?.check()?;

        if config.log_format == LogFormat::Default {
            tracing::info!("{}", output.stdout);
            return Err(ForgeError::UnstructuredOutput);
        }

        let report = decode_report(&output.stdout)?;
        let outcome = classify(report, &config)?;

        match &outcome {
            SimulationOutcome::SetupFailure(result) => {
                tracing::error!("setUp() failed: {}", reason(result));
            }
            SimulationOutcome::TestFailure { test, result } => {
                if config.is_test_results_logged {
                    tracing::info!("Simulation forge decoded logs:\n{}", result.decoded_logs.join("\n"));
                }
                tracing::error!("{}() failed: {}", test, reason(result));
            }
            SimulationOutcome::Success(results) => {
                if config.is_test_results_logged {
                    if let Some(result) = results.get(&config.test_key()) {
                        tracing::info!(
                            "Simulation forge decoded logs:\n{}",
                            result.decoded_logs.join("\n")
                        );
                    }
                }
            }
        }

        Ok(outcome.into_response())
    }
}

fn reason(result: &TestResult) -> &str {
    result.reason.as_deref().unwrap_or("no reason reported")
}
