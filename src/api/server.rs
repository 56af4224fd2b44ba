//! API Server Module
//!
//! This module implements the HTTP server in front of the loan engine.
//! Request bodies are decoded into `RawLoanInput`, run through the engine,
//! and the resulting envelope is returned with a status that matches it:
//! 200 on success, 400 on validation failure.

use crate::{
    config::{ApiConfig, Config},
    engine::LoanEngine,
    error::{LoanError, Result},
    response::CalculationResponse,
    RawLoanInput,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

pub const CALCULATE_PATH: &str = "/api/loan/calculate";
pub const HEALTH_PATH: &str = "/health";

/// Shared application state that is accessible across all request handlers
///
/// The engine is stateless, so handlers share it through an `Arc` without
/// any locking.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<LoanEngine>,
}

impl AppState {
    pub fn new(engine: LoanEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// The main API server struct
///
/// Encapsulates the server configuration and application state.
pub struct Server {
    config: Config,
    state: AppState,
}

impl Server {
    /// Creates a new API server instance with an engine bound to the
    /// configured input limits.
    pub fn new(config: Config) -> Self {
        let state = AppState::new(LoanEngine::new(config.limits));
        Self { config, state }
    }

    /// Builds the router: the calculate endpoint, the health check, CORS and
    /// request tracing.
    pub fn router(&self) -> Result<Router> {
        build_router(self.state.clone(), &self.config.api)
    }

    /// Starts the API server and serves until Ctrl+C is received
    ///
    /// # Returns
    /// `Ok(())` after a graceful shutdown, or an error if binding fails
    pub async fn start(self) -> Result<()> {
        let app = self.router()?;

        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("API server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

pub fn build_router(state: AppState, api: &ApiConfig) -> Result<Router> {
    let router = Router::new()
        .route(CALCULATE_PATH, post(calculate_loan))
        .route(HEALTH_PATH, get(health_check))
        .with_state(state)
        .layer(cors_layer(api)?)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

/// The loan form is served from a different origin than the API.
fn cors_layer(api: &ApiConfig) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if api.cors_allowed_origins.iter().any(|origin| origin == "*") {
        return Ok(cors.allow_origin(Any));
    }

    let origins = api
        .cors_allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| LoanError::InvalidConfig {
                field: "api.cors_allowed_origins".to_string(),
                reason: format!("'{}' is not a valid origin", origin),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(cors.allow_origin(AllowOrigin::list(origins)))
}

/// Handles `POST /api/loan/calculate`
///
/// A body that is not a JSON object is answered with the rejection's status
/// and an envelope carrying neither `data` nor `errors`.
async fn calculate_loan(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RawLoanInput>, JsonRejection>,
) -> (StatusCode, Json<CalculationResponse>) {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            warn!("Rejected malformed loan request: {}", rejection.body_text());
            return (
                rejection.status(),
                Json(CalculationResponse::invalid_body(&rejection.body_text())),
            );
        }
    };

    let response = state.engine.process(&input);
    let status = if response.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    (status, Json(response))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
