//! Route handlers and shared server context

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{SecondsFormat, Utc};

use sim_forge::Simulator;
use sim_types::{HealthResponse, SimulationRequest, SimulationResponse};

/// Context shared by all handlers; built once at startup
pub struct ServerState {
    /// Runs simulations
    pub simulator: Simulator,
    /// When set, `/simulate` ignores the body and runs this request
    pub mock_request: Option<SimulationRequest>,
}

impl ServerState {
    /// Create state that simulates inbound requests
    pub fn new(simulator: Simulator) -> Self {
        Self {
            simulator,
            mock_request: None,
        }
    }

    /// Always simulate `request`, whatever the body says
    pub fn with_mock_request(mut self, request: SimulationRequest) -> Self {
        self.mock_request = Some(request);
        self
    }
}

fn failed(error: impl std::fmt::Display) -> Json<SimulationResponse> {
    let message = error.to_string();
    tracing::error!("Error in /simulate endpoint: {}", message);
    Json(SimulationResponse::failure(format!(
        "Simulation failed: {}",
        message
    )))
}

/// `POST /simulate`.
///
/// Always answers 200; an unreadable body or a forge error becomes
/// `success: false` with the error text.
pub async fn simulate(
    State(state): State<Arc<ServerState>>,
    body: Result<Json<SimulationRequest>, JsonRejection>,
) -> Json<SimulationResponse> {
    let request = match (&state.mock_request, body) {
        (Some(mock), _) => {
            tracing::info!("Mock request mode: ignoring the request body");
            mock.clone()
        }
        (None, Ok(Json(request))) => request,
        (None, Err(rejection)) => return failed(rejection.body_text()),
    };

    tracing::info!("Received simulation request: {:?}", request);

    match state.simulator.simulate(&request).await {
        Ok(response) => Json(response),
        Err(e) => failed(e),
    }
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok(
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sim_forge::{ForgeError, ForgeExecutor, ForgeInvocation, ForgeResult, RawProcessOutput};
    use sim_types::fixtures::mock_request_body;
    use sim_types::ForgeDefaults;

    struct NoForge;

    #[async_trait]
    impl ForgeExecutor for NoForge {
        async fn execute(&self, _invocation: &ForgeInvocation) -> ForgeResult<RawProcessOutput> {
            Err(ForgeError::BinaryNotFound("`which forge` found nothing".to_string()))
        }
    }

    fn state() -> Arc<ServerState> {
        Arc::new(ServerState::new(Simulator::new(
            Arc::new(NoForge),
            ForgeDefaults::default(),
        )))
    }

    #[tokio::test]
    async fn test_health_timestamp_is_rfc3339() {
        let Json(health) = health().await;
        assert_eq!(health.status, "ok");
        assert!(chrono::DateTime::parse_from_rfc3339(&health.timestamp).is_ok());
    }

    #[tokio::test]
    async fn test_simulate_error_becomes_failure() {
        let Json(response) = simulate(State(state()), Ok(Json(mock_request_body()))).await;
        assert!(!response.success);
        assert!(response.message.starts_with("Simulation failed: "));
        assert!(response.message.contains("forge"));
    }

    #[test]
    fn test_mock_request_mode() {
        let state = ServerState::new(Simulator::new(Arc::new(NoForge), ForgeDefaults::default()))
            .with_mock_request(mock_request_body());
        assert_eq!(state.mock_request, Some(mock_request_body()));
    }
}
