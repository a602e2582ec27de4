//! Configuration loading, validation, and management for lexgate.
//!
//! Loads configuration from `./lexgate.toml` (or the file named by
//! `LEXGATE_CONFIG`) with environment variable overrides. Validates all
//! settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Values that ship in sample `.env` files and must not count as a credential.
const PLACEHOLDER_KEYS: &[&str] = &["YOUR_API_KEY_HERE", "VOTRE_CLÉ_API_ICI"];

/// The root configuration structure.
///
/// Maps directly to `lexgate.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model API key. Absent means every request is answered in degraded mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Generation model
    #[serde(default = "default_model")]
    pub model: String,

    /// HTTP server configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Upstream call behaviour (timeout, retries)
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Document store and vector index configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Prompt and degraded-answer configuration
    #[serde(default)]
    pub assistant: AssistantConfig,
}

fn default_model() -> String {
    "gemini-1.5-flash".into()
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("gateway", &self.gateway)
            .field("upstream", &self.upstream)
            .field("retrieval", &self.retrieval)
            .field("assistant", &self.assistant)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Origins allowed by the CORS layer.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_port() -> u16 {
    8000
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5500".into(),
        "http://127.0.0.1:5500".into(),
        "http://localhost:3000".into(),
        "http://localhost:8080".into(),
    ]
}
fn default_body_limit() -> usize {
    1024 * 1024
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            cors_origins: default_cors_origins(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the model API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bound on each individual model call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per request; 1 means no retry
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, doubled after each further failure
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_attempts() -> u32 {
    1
}
fn default_backoff_ms() -> u64 {
    250
}
fn default_temperature() -> f32 {
    0.7
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

/// Where document vectors come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorSourceKind {
    /// Random placeholder vectors (demo / tests)
    Random,
    /// Embeddings from the configured model provider
    Model,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Directory scanned for `*.txt` documents at startup
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Sources returned per legal search
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Vector dimension for the random source
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Maximum excerpt length in characters
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,

    #[serde(default = "default_vector_source")]
    pub vector_source: VectorSourceKind,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Fixed seed for reproducible random vectors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_top_k() -> usize {
    3
}
fn default_dimension() -> usize {
    384
}
fn default_excerpt_chars() -> usize {
    200
}
fn default_vector_source() -> VectorSourceKind {
    VectorSourceKind::Random
}
fn default_embedding_model() -> String {
    "text-embedding-004".into()
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            top_k: default_top_k(),
            dimension: default_dimension(),
            excerpt_chars: default_excerpt_chars(),
            vector_source: default_vector_source(),
            embedding_model: default_embedding_model(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Number of past turns serialized into a chat prompt
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Closing note of every degraded research answer
    #[serde(default = "default_disclaimer")]
    pub degraded_disclaimer: String,
}

fn default_history_window() -> usize {
    5
}
pub fn default_disclaimer() -> String {
    "Note: this answer was generated for demonstration purposes only and does not constitute legal advice."
        .into()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            degraded_disclaimer: default_disclaimer(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location.
    ///
    /// `LEXGATE_CONFIG` names the file; otherwise `./lexgate.toml` is used.
    /// Environment variables are applied on top, see [`AppConfig::apply_env`].
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("LEXGATE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("lexgate.toml"));
        let mut config = Self::load_from(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// - `LEXGATE_API_KEY` (highest priority), then `GEMINI_API_KEY`
    /// - `LEXGATE_MODEL`
    /// - `LEXGATE_DATA_DIR`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("LEXGATE_API_KEY").or_else(|| lookup("GEMINI_API_KEY")) {
            self.api_key = Some(key);
        }

        if let Some(model) = lookup("LEXGATE_MODEL") {
            self.model = model;
        }

        if let Some(dir) = lookup("LEXGATE_DATA_DIR") {
            self.retrieval.data_dir = PathBuf::from(dir);
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.temperature < 0.0 || self.upstream.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "upstream.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.upstream.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "upstream.max_attempts must be at least 1".into(),
            ));
        }

        if self.retrieval.top_k == 0 || self.retrieval.dimension == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.top_k and retrieval.dimension must be > 0".into(),
            ));
        }

        if self.assistant.history_window == 0 {
            return Err(ConfigError::ValidationError(
                "assistant.history_window must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// The usable model credential, if any.
    ///
    /// Blank keys and known placeholder values count as absent.
    pub fn model_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !PLACEHOLDER_KEYS.contains(k))
    }

    /// Whether requests should try the live model at all.
    pub fn is_model_configured(&self) -> bool {
        self.model_api_key().is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            gateway: GatewayConfig::default(),
            upstream: UpstreamConfig::default(),
            retrieval: RetrievalConfig::default(),
            assistant: AssistantConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
