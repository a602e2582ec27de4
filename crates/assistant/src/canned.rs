//! Canned answers for degraded mode.
//!
//! Everything here is deterministic and total: when the model cannot be
//! used, these functions still produce a usable answer.

use lexgate_core::GenerationParameters;

use crate::prompt::{DocumentKind, parameter_list, parameter_text, render};

/// Ordered chat rules. The first rule with a keyword among the message's
/// words wins. Keywords are whole words; a multi-word keyword must appear as
/// a contiguous run.
const CHAT_RULES: &[(&[&str], &str)] = &[
    (
        &["contract", "contracts", "employment", "work", "working"],
        "I can help with employment contracts. A contract must state the duration, \
         the remuneration, and the working conditions required by labor law.",
    ),
    (
        &["liability", "damage", "damages", "compensation"],
        "Liability can be civil, criminal, or administrative. Contractual liability \
         requires repairing the damage caused by failing to perform an obligation.",
    ),
    (
        &["procedure", "procedures"],
        "Legal procedures must respect the statutory deadlines and prescribed forms. \
         For a specific case, I recommend consulting a lawyer.",
    ),
    (
        &["probation", "trial period"],
        "A probation period lets either party end the contract easily at the start. \
         It is limited by law, typically 2 months for employees and 4 months for executives.",
    ),
    (
        &["hello", "hi", "good"],
        "Hello! I am your virtual legal assistant. Ask me about contracts, liability, \
         or legal procedures.",
    ),
    (
        &["thank", "thanks"],
        "You're welcome! Feel free to ask if you have other legal questions.",
    ),
];

/// Reply to `message` from the keyword rules, or the generic fallback.
pub fn chat_reply(message: &str) -> String {
    let lowered = message.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    CHAT_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| contains_phrase(&words, k)))
        .map(|(_, reply)| reply.to_string())
        .unwrap_or_else(|| generic_chat_reply(message))
}

fn contains_phrase(words: &[&str], keyword: &str) -> bool {
    let phrase: Vec<&str> = keyword.split(' ').collect();
    words.windows(phrase.len()).any(|run| run == phrase.as_slice())
}

fn generic_chat_reply(message: &str) -> String {
    format!(
        "Thank you for your question: \"{message}\". As a legal assistant, I recommend \
         consulting a legal professional for personalized advice. This demonstration \
         shows what a legal language model can do."
    )
}

const CONTRACT_TEMPLATE: &str = "\
EMPLOYMENT CONTRACT

Between:
- Employer: {{employer}}
- Employee: {{employee}}

Article 1 - Purpose
This contract sets out the engagement of {{employee}} as {{position}}.

Article 2 - Duration
The contract is concluded for the following duration: {{duration}}.

Article 3 - Remuneration
The gross monthly remuneration is set at {{salary}}.

Signed at [PLACE], on [DATE]
Signatures: [SIGNATURES]
";

const DEMAND_LETTER_TEMPLATE: &str = "\
FORMAL DEMAND LETTER

Sender: {{sender}}
Recipient: {{recipient}}

Subject: Formal demand regarding {{subject}}

Dear Sir or Madam,

We hereby formally demand that you fulfil your obligations concerning {{subject}}.

You have {{deadline}} days from receipt of this letter to remedy the situation.

Failing that, we reserve the right to take legal action.

Signed at [PLACE], on [DATE]
Signature: [SIGNATURE]
";

/// A filled-in static document for `document_type`.
pub fn document(document_type: &str, parameters: &GenerationParameters) -> String {
    match DocumentKind::parse(document_type) {
        DocumentKind::Contract => render(CONTRACT_TEMPLATE, |k| parameter_text(parameters, k)),
        DocumentKind::DemandLetter => {
            render(DEMAND_LETTER_TEMPLATE, |k| parameter_text(parameters, k))
        }
        DocumentKind::Other => format!(
            "Document of type \"{document_type}\" generated with the following parameters:\n{}\n",
            parameter_list(parameters)
        ),
    }
}

/// The research answer used when the model is unavailable.
pub fn research_answer(question: &str, source_count: usize, disclaimer: &str) -> String {
    format!(
        "Answer to your question: \"{question}\"\n\n\
         Based on the available legal material, the key points are:\n\n\
         1. The law contains specific provisions on this question.\n\
         2. The applicable legal procedures must be followed.\n\
         3. If in doubt, consult a specialized lawyer.\n\n\
         This answer is based on {source_count} relevant legal source(s).\n\n\
         {disclaimer}\n"
    )
}
