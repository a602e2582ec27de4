//! The legal assistant service.
//!
//! One explicitly constructed object holds the read-only retriever and the
//! degradation controller. It is shared behind an `Arc` by the gateway and
//! the CLI; requests never mutate it.

use std::sync::Arc;

use lexgate_config::AppConfig;
use lexgate_core::provider::Provider;
use lexgate_core::{ConversationHistory, GenerationParameters, SourceReference};
use lexgate_retrieval::{DocumentStore, Retriever, build_vector_source};
use serde::Serialize;
use tracing::{info, instrument};

use crate::degrade::{DegradationController, Mode, Operation};
use crate::prompt;

/// Result of document generation.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutcome {
    pub document: String,
    pub document_type: String,
    pub success: bool,
    pub message: String,
    pub mode: Mode,
}

/// Result of a legal search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub answer: String,
    pub sources: Vec<SourceReference>,
    pub question: String,
    pub success: bool,
    pub message: String,
    pub mode: Mode,
}

/// Result of a chat exchange; `history` is the input history plus this exchange.
#[derive(Debug, Clone, Serialize)]
pub struct ChatOutcome {
    pub answer: String,
    pub history: ConversationHistory,
    pub success: bool,
    pub message: String,
    pub mode: Mode,
}

/// Tunables for the service.
#[derive(Debug, Clone, Copy)]
pub struct AssistantSettings {
    pub top_k: usize,
    pub history_window: usize,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            top_k: 3,
            history_window: 5,
        }
    }
}

pub struct LegalAssistant {
    retriever: Retriever,
    controller: DegradationController,
    settings: AssistantSettings,
    corpus_fallback: bool,
}

impl LegalAssistant {
    pub fn new(
        retriever: Retriever,
        controller: DegradationController,
        settings: AssistantSettings,
    ) -> Self {
        Self {
            retriever,
            controller,
            settings,
            corpus_fallback: false,
        }
    }

    /// Build the whole pipeline from configuration.
    ///
    /// Loads the document store, builds the vector index, and wires the
    /// model when a credential is present.
    pub async fn from_config(config: &AppConfig) -> Self {
        let model: Option<Arc<dyn Provider>> = match lexgate_providers::build_from_config(config) {
            Ok(provider) => Some(provider),
            Err(e) => {
                info!(reason = %e, "Model not configured, all answers will be degraded");
                None
            }
        };

        let store = DocumentStore::load(&config.retrieval.data_dir);
        let source = build_vector_source(&config.retrieval, model.clone());
        let retriever = Retriever::build(&store, source, config.retrieval.excerpt_chars).await;
        let controller = DegradationController::from_config(config, model);

        let mut assistant = Self::new(
            retriever,
            controller,
            AssistantSettings {
                top_k: config.retrieval.top_k,
                history_window: config.assistant.history_window,
            },
        );
        assistant.corpus_fallback = store.is_fallback();
        assistant
    }

    /// `Live` when requests try the model first.
    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    pub fn document_count(&self) -> usize {
        self.retriever.len()
    }

    /// Whether the built-in corpus stands in for the data directory.
    pub fn uses_fallback_corpus(&self) -> bool {
        self.corpus_fallback
    }

    pub fn vector_source(&self) -> &str {
        self.retriever.source_name()
    }

    #[instrument(skip(self, parameters), fields(params = parameters.len()))]
    pub async fn generate_document(
        &self,
        document_type: &str,
        parameters: &GenerationParameters,
    ) -> DocumentOutcome {
        let prompt = prompt::document_prompt(document_type, parameters);
        let reply = self
            .controller
            .respond(
                Operation::Document {
                    document_type,
                    parameters,
                },
                &prompt,
            )
            .await;

        DocumentOutcome {
            document: reply.text,
            document_type: document_type.to_string(),
            success: true,
            message: status_message("Document generated", reply.mode),
            mode: reply.mode,
        }
    }

    #[instrument(skip(self, context))]
    pub async fn legal_search(&self, question: &str, context: Option<&str>) -> SearchOutcome {
        let sources = self.retriever.search(question, self.settings.top_k).await;
        let prompt = prompt::research_prompt_with_context(question, &sources, context);
        let reply = self
            .controller
            .respond(
                Operation::Research {
                    question,
                    source_count: sources.len(),
                },
                &prompt,
            )
            .await;

        SearchOutcome {
            answer: reply.text,
            sources,
            question: question.to_string(),
            success: true,
            message: status_message("Search completed", reply.mode),
            mode: reply.mode,
        }
    }

    #[instrument(skip(self, history), fields(history_len = history.len()))]
    pub async fn chat(&self, message: &str, history: ConversationHistory) -> ChatOutcome {
        let prompt = prompt::chat_prompt(message, &history, self.settings.history_window);
        let reply = self
            .controller
            .respond(Operation::Chat { message }, &prompt)
            .await;

        let message_text = status_message("Reply generated", reply.mode);
        ChatOutcome {
            history: history.with_exchange(message, reply.text.clone()),
            answer: reply.text,
            success: true,
            message: message_text,
            mode: reply.mode,
        }
    }
}

fn status_message(action: &str, mode: Mode) -> String {
    match mode {
        Mode::Live => format!("{action} successfully"),
        Mode::Degraded => format!("{action} in demonstration mode"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::degrade::GenerationSettings;
    use crate::test_helpers::*;
    use lexgate_core::{ConversationTurn, Role};
    use lexgate_retrieval::RandomVectorSource;
    use serde_json::json;

    const DISCLAIMER: &str = "Note: demonstration only, not legal advice.";

    async fn assistant(model: Option<Arc<dyn Provider>>) -> LegalAssistant {
        let store = DocumentStore::fallback();
        let retriever =
            Retriever::build(&store, Arc::new(RandomVectorSource::seeded(384, 1)), 200).await;
        let controller =
            DegradationController::new(model, GenerationSettings::default(), DISCLAIMER);
        LegalAssistant::new(retriever, controller, AssistantSettings::default())
    }

    fn acme_jane() -> GenerationParameters {
        let mut params = GenerationParameters::new();
        params.insert("employer".into(), json!("Acme"));
        params.insert("employee".into(), json!("Jane"));
        params
    }

    #[tokio::test]
    async fn contract_on_upstream_failure_uses_static_template() {
        let failing = Arc::new(FailingProvider::network());
        let a = assistant(Some(failing.clone())).await;

        let outcome = a.generate_document("contract", &acme_jane()).await;
        assert!(outcome.success);
        assert_eq!(outcome.mode, Mode::Degraded);
        assert_eq!(outcome.document_type, "contract");
        assert!(outcome.document.contains("EMPLOYMENT CONTRACT"));
        assert!(outcome.document.contains("Acme"));
        assert!(outcome.document.contains("Jane"));
        assert_eq!(failing.call_count(), 1);
    }

    #[tokio::test]
    async fn live_document_sends_composed_prompt() {
        let provider = Arc::new(ScriptedProvider::new(["Generated contract"]));
        let a = assistant(Some(provider.clone())).await;

        let outcome = a.generate_document("contract", &acme_jane()).await;
        assert_eq!(outcome.mode, Mode::Live);
        assert_eq!(outcome.document, "Generated contract");
        assert_eq!(outcome.message, "Document generated successfully");
        assert_eq!(
            provider.prompts(),
            vec![prompt::document_prompt("contract", &acme_jane())]
        );
    }

    #[tokio::test]
    async fn probation_search_unconfigured() {
        let a = assistant(None).await;

        let outcome = a.legal_search("What is a probation period?", None).await;
        assert!(outcome.success);
        assert_eq!(outcome.mode, Mode::Degraded);
        assert!(!outcome.sources.is_empty());
        assert!(outcome.sources.len() <= 3);
        assert!(outcome.sources.iter().all(|s| s.score > 0.0));
        assert!(outcome.answer.contains(DISCLAIMER));
        assert!(outcome.answer.contains(&format!(
            "This answer is based on {} relevant legal source(s).",
            outcome.sources.len()
        )));
    }

    #[tokio::test]
    async fn live_search_includes_sources_in_prompt() {
        let provider = Arc::new(ScriptedProvider::new(["Probation is limited."]));
        let a = assistant(Some(provider.clone())).await;

        let outcome = a
            .legal_search("What is a probation period?", Some("Full-time employee"))
            .await;
        assert_eq!(outcome.answer, "Probation is limited.");

        let sent = &provider.prompts()[0];
        for source in &outcome.sources {
            assert!(sent.contains(&format!("Source: {}", source.filename)));
        }
        assert!(sent.contains("Full-time employee"));
    }

    #[tokio::test]
    async fn chat_appends_exactly_one_exchange() {
        let a = assistant(None).await;
        let history: ConversationHistory = vec![
            ConversationTurn::user("first"),
            ConversationTurn::assistant("reply"),
        ]
        .into();

        let outcome = a.chat("Tell me about my contract", history.clone()).await;
        assert_eq!(outcome.history.len(), history.len() + 2);
        assert_eq!(&outcome.history.turns()[..2], history.turns());

        let new_turns = &outcome.history.turns()[2..];
        assert_eq!(new_turns[0], ConversationTurn::user("Tell me about my contract"));
        assert_eq!(new_turns[1].role, Role::Assistant);
        assert_eq!(new_turns[1].content, outcome.answer);
        assert!(outcome.answer.starts_with("I can help with employment contracts"));
    }

    #[tokio::test]
    async fn chat_unmatched_echoes_message() {
        let a = assistant(Some(Arc::new(FailingProvider::network()))).await;
        let outcome = a.chat("Can I appeal a parking fine?", ConversationHistory::new()).await;
        assert!(outcome.answer.contains("Can I appeal a parking fine?"));
        assert_eq!(outcome.message, "Reply generated in demonstration mode");
    }

    #[tokio::test]
    async fn chat_prompt_is_windowed() {
        let provider = Arc::new(ScriptedProvider::new(["ok"]));
        let a = assistant(Some(provider.clone())).await;

        let mut history = ConversationHistory::new();
        for i in 0..5 {
            history.push_exchange(format!("question {i}"), format!("answer {i}"));
        }
        a.chat("latest", history).await;

        let sent = &provider.prompts()[0];
        assert!(!sent.contains("question 2"));
        assert!(sent.contains("answer 2"));
        assert!(sent.contains("question 4"));
    }

    #[tokio::test]
    async fn from_config_without_key_is_degraded() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.retrieval.data_dir = dir.path().to_path_buf();

        let a = LegalAssistant::from_config(&config).await;
        assert_eq!(a.mode(), Mode::Degraded);
        assert!(a.uses_fallback_corpus());
        assert_eq!(a.document_count(), 3);
        assert_eq!(a.vector_source(), "random");
    }
}
