//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router for `POST /`
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Hand each request to the current [`Gateway`] snapshot
//! - Swap in a new snapshot when a reloaded config arrives

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::gateway::{BuildError, Gateway};
use crate::http::request::{inbound_request, request_id, UuidRequestId, X_REQUEST_ID};
use crate::http::response::into_http_response;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ArcSwap<Gateway>>,
    pub max_body_bytes: usize,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    gateway: Arc<ArcSwap<Gateway>>,
}

impl HttpServer {
    /// Create a server whose gateway is built from `config`.
    pub fn new(config: GatewayConfig) -> Result<Self, BuildError> {
        let gateway = Gateway::from_config(&config)?;
        Ok(Self::with_gateway(config, gateway))
    }

    /// Create a server around an already built gateway.
    pub fn with_gateway(config: GatewayConfig, gateway: Gateway) -> Self {
        let gateway = Arc::new(ArcSwap::from_pointee(gateway));
        let state = AppState {
            gateway: gateway.clone(),
            max_body_bytes: config.limits.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            gateway,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let request_id_header = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route("/", post(invoke_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(request_id_header.clone(), UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(request_id_header))
                    .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
                    .layer(TimeoutLayer::with_status_code(
                        StatusCode::REQUEST_TIMEOUT,
                        Duration::from_secs(config.limits.request_timeout_secs),
                    )),
            )
    }

    /// A clone of the router, for serving it elsewhere or driving it in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Configs received on `config_updates` replace the gateway for all
    /// subsequent requests until shutdown. Listener and limits are fixed at
    /// startup.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            api = %self.config.api.name,
            description = %self.config.api.description,
            "HTTP server starting"
        );

        let gateway = self.gateway.clone();
        let mut reload_stop = shutdown.clone();
        tokio::spawn(async move {
            loop {
                let new_config = tokio::select! {
                    _ = reload_stop.wait() => break,
                    update = config_updates.recv() => match update {
                        Some(config) => config,
                        None => break,
                    },
                };
                match Gateway::from_config(&new_config) {
                    Ok(next) => {
                        gateway.store(Arc::new(next));
                        tracing::info!(backend = ?new_config.backend.kind, "Gateway reloaded");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Rejected reloaded config, keeping current gateway");
                    }
                }
            }
            tracing::debug!("Reload task stopped");
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let mut shutdown = shutdown;
                shutdown.wait().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Handler for `POST /`.
async fn invoke_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts);

    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to read request body");
            metrics::record_request(StatusCode::PAYLOAD_TOO_LARGE.as_u16(), start_time);
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({"message": "Request Too Long"})),
            )
                .into_response();
        }
    };

    tracing::debug!(request_id = %request_id, bytes = body.len(), "Invoking gateway");

    let gateway = state.gateway.load_full();
    let response = match gateway
        .handle(inbound_request(&parts, body))
        .await
        .and_then(into_http_response)
    {
        Ok(response) => response,
        Err(e) => {
            if e.status().is_server_error() {
                tracing::error!(request_id = %request_id, error = %e, "Request failed");
            } else {
                tracing::info!(request_id = %request_id, error = %e, "Request rejected");
            }
            e.into_response()
        }
    };

    metrics::record_request(response.status().as_u16(), start_time);
    response
}
