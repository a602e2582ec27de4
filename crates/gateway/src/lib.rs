//! HTTP API gateway for lexgate.
//!
//! Exposes the service banner, a health check, and the v1 legal assistant
//! API under `/api/v1`.
//!
//! Built on Axum.

pub mod api_v1;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::{HeaderValue, Method, header},
    response::Json,
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use lexgate_assistant::{LegalAssistant, Mode};
use lexgate_config::{AppConfig, GatewayConfig};

pub use api_v1::{ApiState, SharedApiState};

/// Build the full router: banner, health, and `/api/v1`.
///
/// Layers applied:
/// - CORS restricted to the configured origins
/// - Request body size limit
/// - HTTP trace logging
pub fn build_router(state: SharedApiState, gateway: &GatewayConfig) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .with_state(state.clone())
        .nest("/api/v1", api_v1::v1_router(state))
        .layer(DefaultBodyLimit::max(gateway.body_limit_bytes))
        .layer(cors_layer(&gateway.cors_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// CORS for the configured origins. Unparseable origins are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Start the gateway HTTP server.
///
/// Builds the assistant once (documents, index, model) and serves until
/// Ctrl-C.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let assistant = LegalAssistant::from_config(&config).await;
    info!(
        mode = %assistant.mode(),
        documents = assistant.document_count(),
        vectors = assistant.vector_source(),
        "Assistant ready"
    );

    let state = Arc::new(ApiState::new(assistant));
    let app = build_router(state, &config.gateway);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

// --- Handlers ---

#[derive(Serialize)]
struct RootResponse {
    message: &'static str,
    version: &'static str,
    status: &'static str,
    mode: Mode,
    endpoints: Vec<&'static str>,
}

async fn root_handler(State(state): State<SharedApiState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "lexgate legal assistant API",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        mode: state.assistant.mode(),
        endpoints: vec![
            "GET /health",
            "POST /api/v1/generate-document",
            "POST /api/v1/legal-search",
            "POST /api/v1/chat",
        ],
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    mode: Mode,
    documents: usize,
    uptime_secs: u64,
}

async fn health_handler(State(state): State<SharedApiState>) -> Json<HealthResponse> {
    let uptime = chrono::Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds()
        .max(0) as u64;

    Json(HealthResponse {
        status: "healthy",
        service: "lexgate",
        mode: state.assistant.mode(),
        documents: state.assistant.document_count(),
        uptime_secs: uptime,
    })
}
