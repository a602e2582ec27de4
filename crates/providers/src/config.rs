//! Provider construction from configuration.

use std::sync::Arc;
use std::time::Duration;

use lexgate_config::AppConfig;
use lexgate_core::error::ProviderError;
use lexgate_core::provider::Provider;

use crate::gemini::GeminiProvider;
use crate::retry::{RetryPolicy, RetryProvider};

/// Build the upstream model stack: Gemini wrapped in the retry policy.
///
/// Returns `ProviderError::NotConfigured` when no usable credential is
/// present, so callers can go straight to degraded answers without a call.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config.model_api_key().ok_or_else(|| {
        ProviderError::NotConfigured("no model API key (set GEMINI_API_KEY)".into())
    })?;

    let gemini = GeminiProvider::with_timeout(
        api_key,
        Duration::from_secs(config.upstream.timeout_secs),
    )?
    .with_base_url(&config.upstream.base_url);

    Ok(Arc::new(RetryProvider::new(
        Arc::new(gemini),
        RetryPolicy::from_config(&config.upstream),
    )))
}
