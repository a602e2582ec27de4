//! Model provider implementations for lexgate.
//!
//! All providers implement the `lexgate_core::Provider` trait.
//! [`config::build_from_config`] assembles the provider stack from
//! configuration, or reports that no credential is configured.

pub mod config;
pub mod gemini;
pub mod retry;

pub use config::build_from_config;
pub use gemini::GeminiProvider;
pub use retry::{RetryPolicy, RetryProvider};
