//! Degradation controller: live model call or canned answer, per request.
//!
//! Each call decides on its own: with no model configured it answers from
//! the canned set straight away; otherwise it tries the model once (the
//! provider may retry internally) and falls back to the canned answer if
//! that fails. Nothing is latched between calls.

use std::sync::Arc;

use lexgate_config::AppConfig;
use lexgate_core::provider::{Provider, ProviderRequest};
use lexgate_core::GenerationParameters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::canned;

/// Which path produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Live,
    Degraded,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Degraded => "degraded",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The request being answered, with what the canned path needs.
#[derive(Debug, Clone, Copy)]
pub enum Operation<'a> {
    Document {
        document_type: &'a str,
        parameters: &'a GenerationParameters,
    },
    Research {
        question: &'a str,
        source_count: usize,
    },
    Chat {
        message: &'a str,
    },
}

impl Operation<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Document { .. } => "document",
            Self::Research { .. } => "research",
            Self::Chat { .. } => "chat",
        }
    }
}

/// Answer text plus the mode that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub mode: Mode,
}

/// Generation settings forwarded with every live request.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".into(),
            temperature: 0.7,
            max_tokens: None,
        }
    }
}

pub struct DegradationController {
    model: Option<Arc<dyn Provider>>,
    settings: GenerationSettings,
    disclaimer: String,
}

impl DegradationController {
    /// `model` is `None` when no credential is configured.
    pub fn new(
        model: Option<Arc<dyn Provider>>,
        settings: GenerationSettings,
        disclaimer: impl Into<String>,
    ) -> Self {
        Self {
            model,
            settings,
            disclaimer: disclaimer.into(),
        }
    }

    pub fn from_config(config: &AppConfig, model: Option<Arc<dyn Provider>>) -> Self {
        Self::new(
            model,
            GenerationSettings {
                model: config.model.clone(),
                temperature: config.upstream.temperature,
                max_tokens: config.upstream.max_tokens,
            },
            config.assistant.degraded_disclaimer.clone(),
        )
    }

    /// `Live` if requests will try the model first.
    pub fn mode(&self) -> Mode {
        if self.model.is_some() {
            Mode::Live
        } else {
            Mode::Degraded
        }
    }

    pub fn disclaimer(&self) -> &str {
        &self.disclaimer
    }

    /// Answer `operation`, sending `prompt` to the model when one is configured.
    ///
    /// Never fails: any model error is logged and replaced by the canned answer.
    pub async fn respond(&self, operation: Operation<'_>, prompt: &str) -> Reply {
        let Some(model) = &self.model else {
            debug!(
                operation = operation.kind(),
                "No model configured, answering in degraded mode"
            );
            return self.degraded(operation);
        };

        let mut request = ProviderRequest::new(&self.settings.model, prompt);
        request.temperature = self.settings.temperature;
        request.max_tokens = self.settings.max_tokens;

        match model.complete(request).await {
            Ok(response) => {
                info!(
                    operation = operation.kind(),
                    provider = model.name(),
                    model = %response.model,
                    "Live answer"
                );
                Reply {
                    text: response.text,
                    mode: Mode::Live,
                }
            }
            Err(e) => {
                warn!(
                    operation = operation.kind(),
                    provider = model.name(),
                    error = %e,
                    "Upstream call failed, answering in degraded mode"
                );
                self.degraded(operation)
            }
        }
    }

    /// The canned answer for `operation`.
    pub fn degraded(&self, operation: Operation<'_>) -> Reply {
        let text = match operation {
            Operation::Document {
                document_type,
                parameters,
            } => canned::document(document_type, parameters),
            Operation::Research {
                question,
                source_count,
            } => canned::research_answer(question, source_count, &self.disclaimer),
            Operation::Chat { message } => canned::chat_reply(message),
        };

        Reply {
            text,
            mode: Mode::Degraded,
        }
    }
}
