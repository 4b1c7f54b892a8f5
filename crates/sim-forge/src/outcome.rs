//! Report decoding and outcome classification

use sim_types::forge::SETUP_TEST_KEY;
use sim_types::{ForgeInvocationConfig, SimulationResponse, TestReport, TestResult, TestResults};

use crate::error::{ForgeError, ForgeResult};

/// Message returned when the target test passes
pub const SUCCESS_MESSAGE: &str = "Forge test completed successfully";

/// Classified result of one forge run
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationOutcome {
    /// `setUp()` failed; the target test never ran
    SetupFailure(TestResult),
    /// `setUp()` passed (or was not reported) but the target test failed
    TestFailure {
        /// Test function name
        test: String,
        /// Its result
        result: TestResult,
    },
    /// The target test passed; carries every result of the suite
    Success(TestResults),
}

impl SimulationOutcome {
    /// Map to the HTTP envelope
    pub fn into_response(self) -> SimulationResponse {
        match self {
            Self::SetupFailure(result) => {
                SimulationResponse::failure(failure_message(SETUP_TEST_KEY))
                    .with_error(result.reason)
            }
            Self::TestFailure { test, result } => {
                SimulationResponse::failure(failure_message(&test)).with_error(result.reason)
            }
            Self::Success(results) => SimulationResponse::success(SUCCESS_MESSAGE, results),
        }
    }

    /// Whether the target test passed
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

fn failure_message(function: &str) -> String {
    format!(
        "Forge simulation failed in '{}'. Re-run with the '--json' log format to inspect the forge logs",
        function
    )
}

/// Parse forge stdout as a report
pub fn decode_report(stdout: &str) -> ForgeResult<TestReport> {
    TestReport::from_json(stdout).map_err(ForgeError::MalformedReport)
}

/// Pick the suite and target test out of a report and classify them.
///
/// Order matters: a failing `setUp()` wins over the target test. `setUp()` is
/// only reported at `-vvvvv` or when it failed, so its absence is normal;
/// the suite key and target test key must be present.
pub fn classify(
    report: TestReport,
    config: &ForgeInvocationConfig,
) -> ForgeResult<SimulationOutcome> {
    let suite_key = config.suite_key();
    if report.suite(&suite_key).is_none() {
        tracing::error!(
            "Suite '{}' not in forge report; found {:?}",
            suite_key,
            report.suite_keys().collect::<Vec<_>>()
        );
    }
    let suite = report
        .into_suite(&suite_key)
        .ok_or(ForgeError::MissingReportKey(suite_key))?;
    let mut results = suite.test_results;

    if results.get(SETUP_TEST_KEY).is_some_and(TestResult::is_failure) {
        if let Some(setup) = results.remove(SETUP_TEST_KEY) {
            return Ok(SimulationOutcome::SetupFailure(setup));
        }
    }

    let test_key = config.test_key();
    let failed = results
        .get(&test_key)
        .ok_or_else(|| ForgeError::MissingReportKey(test_key.clone()))?
        .is_failure();

    if failed {
        if let Some(result) = results.remove(&test_key) {
            return Ok(SimulationOutcome::TestFailure {
                test: config.test.clone(),
                result,
            });
        }
    }

    Ok(SimulationOutcome::Success(results))
}
