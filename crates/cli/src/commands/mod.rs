//! Subcommand implementations.

pub mod chat;
pub mod gateway;
pub mod generate;
pub mod search;
pub mod status;

use lexgate_assistant::LegalAssistant;
use lexgate_config::AppConfig;

pub(crate) fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Load config and build the assistant pipeline.
pub(crate) async fn build_assistant() -> Result<LegalAssistant, Box<dyn std::error::Error>> {
    let config = load_config()?;
    Ok(LegalAssistant::from_config(&config).await)
}
