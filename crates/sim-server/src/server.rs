//! HTTP server implementation

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::{ServerError, ServerResult};
use crate::routes::{health, simulate, ServerState};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address
    pub listen_addr: SocketAddr,
    /// Maximum request body size (default: 10MB)
    pub max_body_size: usize,
    /// Enable CORS (default: true)
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            max_body_size: 10 * 1024 * 1024,
            enable_cors: true,
        }
    }
}

impl ServerConfig {
    /// Create a new server config with the given address
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            ..Default::default()
        }
    }
}

/// Simulation HTTP server
pub struct SimServer {
    config: ServerConfig,
    state: Arc<ServerState>,
}

impl SimServer {
    /// Create a new server
    pub fn new(config: ServerConfig, state: ServerState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// Build the router.
    ///
    /// The body limit is enforced by the `Json` extractor, so oversized
    /// bodies still reach `/simulate` and are answered with a JSON envelope.
    pub fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/simulate", post(simulate))
            .route("/health", get(health))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(DefaultBodyLimit::max(self.config.max_body_size)),
            );

        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        router.with_state(self.state.clone())
    }

    /// Bind the configured address and serve until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.listen_addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// In-flight requests are allowed to finish before this returns.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.build_router();
        let addr = listener.local_addr()?;

        tracing::info!("Server running on http://{}", addr);
        tracing::info!("POST /simulate - Run forge test");
        tracing::info!("GET  /health   - Health check");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        tracing::info!("Server on {} stopped", addr);
        Ok(())
    }

    /// Get the server listen address
    pub fn listen_addr(&self) -> SocketAddr {
        self.config.listen_addr
    }
}
