//! # lexgate Core
//!
//! Domain types, traits, and error definitions for the lexgate legal assistant.
//! This crate has **no framework dependencies**: it defines the domain model
//! that the retrieval, assistant, and gateway crates implement against.
//!
//! ## Design Philosophy
//!
//! The upstream model is a trait here ([`Provider`]). Implementations live in
//! `lexgate-providers`. This enables:
//! - Swapping the hosted model without touching prompt or fallback logic
//! - Testing the whole pipeline with scripted or failing mock providers
//! - A clean dependency graph (all crates depend inward on core)

pub mod conversation;
pub mod document;
pub mod error;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use conversation::{ConversationHistory, ConversationTurn, Role};
pub use document::{Document, GenerationParameters, SourceReference};
pub use error::{Error, ProviderError, Result, RetrievalError};
pub use provider::{
    EmbeddingRequest, EmbeddingResponse, Provider, ProviderRequest, ProviderResponse,
};
