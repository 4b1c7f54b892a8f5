//! HTTP response envelopes

use serde::{Deserialize, Serialize};

use crate::report::TestResults;

/// `POST /simulate` response, always sent with HTTP 200
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    /// Whether the target test passed
    pub success: bool,
    /// Human-readable summary
    pub message: String,
    /// Full test results of the suite (success only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<TestResults>,
    /// Failure reason reported by forge, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SimulationResponse {
    /// Successful simulation carrying the suite's results
    pub fn success(message: impl Into<String>, output: TestResults) -> Self {
        Self {
            success: true,
            message: message.into(),
            output: Some(output),
            error: None,
        }
    }

    /// Failed simulation
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            output: None,
            error: None,
        }
    }

    /// Attach a failure reason
    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }
}

/// `GET /health` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`
    pub status: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

impl HealthResponse {
    /// Healthy status at the given time
    pub fn ok(timestamp: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: timestamp.into(),
        }
    }
}
