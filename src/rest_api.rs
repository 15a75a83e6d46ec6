//! REST API for the deadlock analyzer
//!
//! Every request is an independent, synchronous detection run; handler state
//! only holds the immutable analyzer limits.

use crate::analysis::{Analyzer, DetectionReport};
use crate::config::DetectorConfig;
use crate::detection::Mode;
use crate::error::{Error, Result};
use crate::scenario::Scenario;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// REST API configuration
#[derive(Debug, Clone)]
pub struct RestApiConfig {
    pub bind_addr: SocketAddr,
    pub enable_cors: bool,
    pub enable_compression: bool,
    pub enable_tracing: bool,
    /// Maximum request body size (bytes)
    pub max_body_size: usize,
    pub request_timeout: Duration,
}

impl Default for RestApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            enable_cors: true,
            enable_compression: false,
            enable_tracing: true,
            max_body_size: 1024 * 1024,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl RestApiConfig {
    pub fn from_detector_config(config: &DetectorConfig) -> Result<Self> {
        Ok(Self {
            bind_addr: config.bind_addr()?,
            enable_cors: config.server.enable_cors,
            enable_compression: config.server.enable_compression,
            enable_tracing: config.server.enable_tracing,
            max_body_size: config.server.max_body_size,
            request_timeout: config.request_timeout_duration(),
        })
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    analyzer: Arc<Analyzer>,
}

impl AppState {
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }
}

/// Generic API response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateRequest {
    #[serde(default)]
    pub mode: Mode,
    pub processes: usize,
    pub resources: usize,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::MalformedScenario(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::LimitExceeded(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ApiResponse::<()>::err(message))).into_response()
    }
}

/// REST API server
pub struct RestApiServer {
    config: RestApiConfig,
    state: AppState,
}

impl RestApiServer {
    pub fn new(config: RestApiConfig, analyzer: Analyzer) -> Self {
        Self {
            config,
            state: AppState::new(analyzer),
        }
    }

    /// Build the router with all endpoints
    pub fn router(&self) -> Router {
        let mut app = Router::new()
            .route("/health", get(health_handler))
            .route("/api/v1/validate", post(validate_handler))
            .route("/api/v1/detect", post(detect_handler))
            .route("/api/v1/template", post(template_handler))
            .layer(DefaultBodyLimit::max(self.config.max_body_size))
            .layer(TimeoutLayer::new(self.config.request_timeout))
            .with_state(self.state.clone());

        if self.config.enable_compression {
            app = app.layer(CompressionLayer::new());
        }

        if self.config.enable_cors {
            app = app.layer(CorsLayer::permissive());
        }

        if self.config.enable_tracing {
            app = app.layer(TraceLayer::new_for_http());
        }

        app
    }

    pub async fn start(self) -> Result<()> {
        let app = self.router();
        let addr = self.config.bind_addr;

        info!("Starting deadlock analyzer API on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

// ============================================================================
// Handler Functions
// ============================================================================

async fn health_handler() -> impl IntoResponse {
    Json(ApiResponse::ok(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

/// Bodies are taken as text so that JSON errors surface as malformed scenarios.
async fn validate_handler(State(state): State<AppState>, body: String) -> impl IntoResponse {
    let outcome =
        Scenario::from_json(&body).and_then(|scenario| state.analyzer.validate(&scenario));

    let response = match outcome {
        Ok(()) => ValidationResponse {
            valid: true,
            error: None,
        },
        Err(e) => ValidationResponse {
            valid: false,
            error: Some(e.to_string()),
        },
    };
    Json(ApiResponse::ok(response))
}

async fn detect_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ApiResponse<DetectionReport>>> {
    let report = state.analyzer.analyze_json(&body)?;
    Ok(Json(ApiResponse::ok(report)))
}

async fn template_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ApiResponse<Scenario>>> {
    let request: TemplateRequest = serde_json::from_str(&body)
        .map_err(|e| Error::MalformedScenario(e.into()))?;
    let scenario = state
        .analyzer
        .template(request.mode, request.processes, request.resources)?;
    Ok(Json(ApiResponse::ok(scenario)))
}
