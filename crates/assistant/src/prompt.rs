//! Prompt composition.
//!
//! Three pure functions build the text sent to the model for each
//! operation. They never fail and never read anything but their
//! arguments: the same inputs always yield the same prompt.
//!
//! Document templates use `{{name}}` placeholders. A placeholder with no
//! matching parameter renders as a bracketed label (`{{employee}}` becomes
//! `[EMPLOYEE]`).

use std::sync::LazyLock;

use lexgate_core::{ConversationHistory, GenerationParameters, SourceReference};
use regex_lite::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern is a valid regex")
});

/// Document kinds with a dedicated template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Contract,
    DemandLetter,
    Other,
}

impl DocumentKind {
    /// Recognizes the English names and the legacy French ones.
    pub fn parse(document_type: &str) -> Self {
        match document_type.trim().to_lowercase().as_str() {
            "contract" | "contrat" => Self::Contract,
            "demand_letter" | "mise_en_demeure" => Self::DemandLetter,
            _ => Self::Other,
        }
    }
}

/// Replace every `{{name}}` in `template` with `lookup(name)`, or with the
/// placeholder label when `lookup` has nothing.
///
/// Substituted values are inserted verbatim and never re-scanned.
pub fn render(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let key = &caps[1];
            lookup(key).unwrap_or_else(|| placeholder_label(key))
        })
        .into_owned()
}

/// `[KEY IN CAPS]` for a missing parameter.
pub fn placeholder_label(key: &str) -> String {
    format!("[{}]", key.replace('_', " ").to_uppercase())
}

/// A parameter value as text. Strings render raw, anything else as JSON.
pub fn parameter_text(parameters: &GenerationParameters, key: &str) -> Option<String> {
    parameters.get(key).map(|value| match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// `- key: value` lines for every parameter, in key order.
pub fn parameter_list(parameters: &GenerationParameters) -> String {
    if parameters.is_empty() {
        return "- (no parameters supplied)".into();
    }
    parameters
        .keys()
        .filter_map(|key| parameter_text(parameters, key).map(|v| format!("- {key}: {v}")))
        .collect::<Vec<_>>()
        .join("\n")
}

const CONTRACT_PROMPT: &str = "\
Draft a professional employment contract. Include every essential clause of an \
employment contract: parties, purpose, position, duration, probation period, \
remuneration, working hours, termination, and signatures.

Employer: {{employer}}
Employee: {{employee}}
Position: {{position}}
Salary: {{salary}}
Duration: {{duration}}

All information supplied:
{{parameter_list}}";

const DEMAND_LETTER_PROMPT: &str = "\
Draft a formal demand letter that follows the usual legal formalities: \
identification of the parties, the obligation at issue, the deadline to comply, \
and the consequences of non-compliance.

Sender: {{sender}}
Recipient: {{recipient}}
Subject: {{subject}}
Deadline (days): {{deadline}}

All information supplied:
{{parameter_list}}";

const GENERIC_PROMPT: &str = "\
Draft a professional legal document of type \"{{document_type}}\".

Use the following information:
{{parameter_list}}";

/// Prompt for generating a document of `document_type`.
pub fn document_prompt(document_type: &str, parameters: &GenerationParameters) -> String {
    let template = match DocumentKind::parse(document_type) {
        DocumentKind::Contract => CONTRACT_PROMPT,
        DocumentKind::DemandLetter => DEMAND_LETTER_PROMPT,
        DocumentKind::Other => GENERIC_PROMPT,
    };

    render(template, |key| match key {
        "parameter_list" => Some(parameter_list(parameters)),
        "document_type" if !parameters.contains_key(key) => Some(document_type.to_string()),
        _ => parameter_text(parameters, key),
    })
}

/// Prompt for answering `question` from retrieved `sources`.
pub fn research_prompt(question: &str, sources: &[SourceReference]) -> String {
    research_prompt_with_context(question, sources, None)
}

/// [`research_prompt`] plus optional background supplied by the caller.
pub fn research_prompt_with_context(
    question: &str,
    sources: &[SourceReference],
    context: Option<&str>,
) -> String {
    let source_block = if sources.is_empty() {
        "(no relevant sources found)".to_string()
    } else {
        sources
            .iter()
            .map(|s| format!("Source: {}\n{}", s.filename, s.excerpt))
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    let mut prompt = String::from(
        "As an expert legal assistant, answer the question below using the information \
         in the context. Structure the answer, name the sources you rely on, and end with \
         a short disclaimer that the answer is not legal advice.\n\n",
    );
    prompt.push_str("Context:\n");
    prompt.push_str(&source_block);
    prompt.push_str("\n\n");

    if let Some(extra) = context.map(str::trim).filter(|c| !c.is_empty()) {
        prompt.push_str("Background from the user:\n");
        prompt.push_str(extra);
        prompt.push_str("\n\n");
    }

    prompt.push_str("Question: ");
    prompt.push_str(question);
    prompt.push_str("\n\nAnswer:");
    prompt
}

/// Prompt for the next chat reply.
///
/// Only the last `window` turns of `history` are included.
pub fn chat_prompt(message: &str, history: &ConversationHistory, window: usize) -> String {
    let mut prompt = String::from(
        "You are a virtual legal assistant. Answer legal questions professionally and \
         precisely. If you are not sure of an answer, say so clearly and recommend \
         consulting a lawyer.\n\n",
    );

    let recent = history.recent(window);
    if !recent.is_empty() {
        for turn in recent {
            prompt.push_str(turn.role.as_str());
            prompt.push_str(": ");
            prompt.push_str(&turn.content);
            prompt.push('\n');
        }
        prompt.push('\n');
    }

    prompt.push_str("user: ");
    prompt.push_str(message);
    prompt.push_str("\n\nassistant:");
    prompt
}
