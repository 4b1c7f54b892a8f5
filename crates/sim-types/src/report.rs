//! Forge `--json` test report
//!
//! ```json
//! { "<path>:<contract>": {
//!     "duration": { "secs": 0, "nanos": 0 },
//!     "test_results": { "<fn>()": { "status": "Success", ... } } } }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Test results keyed by function signature (`"test_bar()"`)
pub type TestResults = BTreeMap<String, TestResult>;

/// Decoded report, keyed by `"<relativePath>:<contractName>"`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestReport {
    suites: BTreeMap<String, SuiteReport>,
}

impl TestReport {
    /// Parse forge stdout
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Look up a suite by its composite key
    pub fn suite(&self, key: &str) -> Option<&SuiteReport> {
        self.suites.get(key)
    }

    /// Take ownership of a suite by its composite key
    pub fn into_suite(mut self, key: &str) -> Option<SuiteReport> {
        self.suites.remove(key)
    }

    /// Suite keys present in the report
    pub fn suite_keys(&self) -> impl Iterator<Item = &str> {
        self.suites.keys().map(|k| k.as_str())
    }
}

/// Wall time of a suite run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteDuration {
    /// Whole seconds
    pub secs: u64,
    /// Sub-second nanoseconds
    pub nanos: u32,
}

/// Results of one test contract
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Suite wall time
    #[serde(default)]
    pub duration: SuiteDuration,
    /// Per-function results
    #[serde(default)]
    pub test_results: TestResults,
    /// Fields not modelled here (warnings, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SuiteReport {
    /// Result for a function key such as `"setUp()"`
    pub fn result(&self, key: &str) -> Option<&TestResult> {
        self.test_results.get(key)
    }
}

/// Outcome marker of a single test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    /// Passed
    Success,
    /// Failed or reverted
    Failure,
    /// Skipped via `vm.skip`
    Skipped,
}

/// Result of a single test function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Outcome
    pub status: TestStatus,
    /// Failure reason
    #[serde(default)]
    pub reason: Option<String>,
    /// Minimal failing input for fuzz/invariant tests
    #[serde(default)]
    pub counterexample: Option<Value>,
    /// Raw event logs
    #[serde(default)]
    pub logs: Vec<Value>,
    /// Human-readable log lines
    #[serde(default)]
    pub decoded_logs: Vec<String>,
    /// Address labels set through `vm.label`
    #[serde(default)]
    pub labeled_addresses: BTreeMap<String, String>,
    /// Everything else forge emits (traces, gas, kind, ...), passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TestResult {
    /// Whether forge marked this test as failed
    pub fn is_failure(&self) -> bool {
        self.status == TestStatus::Failure
    }
}
