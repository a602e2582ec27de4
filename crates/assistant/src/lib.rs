//! # lexgate Assistant
//!
//! The request pipeline behind every operation:
//!
//! 1. **Retrieve** context (legal search only) from the vector index
//! 2. **Compose** a deterministic prompt ([`prompt`])
//! 3. **Respond** live from the model, or from the canned set when the model
//!    is unconfigured or fails ([`degrade`])
//!
//! [`LegalAssistant`] ties the steps together and is the only type the
//! gateway and CLI need.

pub mod canned;
pub mod degrade;
pub mod prompt;
pub mod service;

pub use degrade::{DegradationController, GenerationSettings, Mode, Operation, Reply};
pub use service::{
    AssistantSettings, ChatOutcome, DocumentOutcome, LegalAssistant, SearchOutcome,
};

#[cfg(test)]
pub(crate) mod test_helpers;
