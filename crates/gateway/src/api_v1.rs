//! HTTP API v1: the legal assistant operations.
//!
//! Endpoints:
//!
//! - `POST /api/v1/generate-document`: Draft a legal document
//! - `POST /api/v1/legal-search`: Answer a question from retrieved sources
//! - `POST /api/v1/chat`: One chat exchange, history round-tripped
//!
//! Request bodies also accept the legacy French field names. None of these
//! operations fail once the body parses: the answer is live or degraded.

use axum::{
    Router,
    extract::State,
    response::Json,
    routing::post,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use lexgate_assistant::{ChatOutcome, DocumentOutcome, LegalAssistant, SearchOutcome};
use lexgate_core::{ConversationHistory, GenerationParameters};

// ── State ─────────────────────────────────────────────────────────────────

/// Shared state for the API. Read-only after startup.
pub struct ApiState {
    pub assistant: LegalAssistant,
    pub start_time: chrono::DateTime<chrono::Utc>,
}

impl ApiState {
    pub fn new(assistant: LegalAssistant) -> Self {
        Self {
            assistant,
            start_time: chrono::Utc::now(),
        }
    }
}

pub type SharedApiState = Arc<ApiState>;

// ── Router ────────────────────────────────────────────────────────────────

/// Build the v1 API router. Nest this under "/api/v1" in the main router.
pub fn v1_router(state: SharedApiState) -> Router {
    Router::new()
        .route("/generate-document", post(generate_document_handler))
        .route("/legal-search", post(legal_search_handler))
        .route("/chat", post(chat_handler))
        .with_state(state)
}

// ── DTOs ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateDocumentRequest {
    #[serde(alias = "type_document")]
    pub document_type: String,
    #[serde(default, alias = "parametres")]
    pub parameters: GenerationParameters,
}

#[derive(Debug, Deserialize)]
pub struct LegalSearchRequest {
    pub question: String,
    #[serde(default, alias = "contexte")]
    pub context: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, alias = "historique")]
    pub history: ConversationHistory,
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn generate_document_handler(
    State(state): State<SharedApiState>,
    Json(payload): Json<GenerateDocumentRequest>,
) -> Json<DocumentOutcome> {
    info!(
        document_type = %payload.document_type,
        params = payload.parameters.len(),
        "generate-document request"
    );

    let outcome = state
        .assistant
        .generate_document(&payload.document_type, &payload.parameters)
        .await;
    Json(outcome)
}

async fn legal_search_handler(
    State(state): State<SharedApiState>,
    Json(payload): Json<LegalSearchRequest>,
) -> Json<SearchOutcome> {
    info!(question_len = payload.question.len(), "legal-search request");

    let outcome = state
        .assistant
        .legal_search(&payload.question, payload.context.as_deref())
        .await;
    Json(outcome)
}

async fn chat_handler(
    State(state): State<SharedApiState>,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatOutcome> {
    info!(
        message_len = payload.message.len(),
        history_len = payload.history.len(),
        "chat request"
    );

    let outcome = state.assistant.chat(&payload.message, payload.history).await;
    Json(outcome)
}
