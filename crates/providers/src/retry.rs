//! Provider retry: bounded attempts with a per-attempt timeout.
//!
//! Wraps a single provider. Each attempt is cut off after `timeout`; failed
//! attempts are retried up to `max_attempts` in total, sleeping `backoff`
//! before the first retry and doubling it after each further failure. When
//! every attempt fails, the last error is returned.

use async_trait::async_trait;
use lexgate_core::error::ProviderError;
use lexgate_core::provider::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// How many times to try, how long each try may take, and how long to wait.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub timeout: Duration,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    /// A single attempt bounded at 30 seconds.
    fn default() -> Self {
        Self {
            max_attempts: 1,
            timeout: Duration::from_secs(30),
            backoff: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &lexgate_config::UpstreamConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            timeout: Duration::from_secs(config.timeout_secs),
            backoff: Duration::from_millis(config.backoff_ms),
        }
    }

    /// Delay before attempt number `attempt` (1-based; attempt 1 has none).
    fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        self.backoff.saturating_mul(1 << (attempt - 2).min(16))
    }
}

/// A provider that retries its inner provider under a [`RetryPolicy`].
pub struct RetryProvider {
    inner: Arc<dyn lexgate_core::Provider>,
    policy: RetryPolicy,
}

impl RetryProvider {
    pub fn new(inner: Arc<dyn lexgate_core::Provider>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Not-configured and authentication failures will not go away on retry.
    fn is_retryable(error: &ProviderError) -> bool {
        !matches!(
            error,
            ProviderError::NotConfigured(_) | ProviderError::AuthenticationFailed(_)
        )
    }
}

#[async_trait]
impl lexgate_core::Provider for RetryProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let provider_name = self.inner.name().to_string();
        let attempts = self.policy.max_attempts.max(1);
        let mut last_error = ProviderError::NotConfigured("No attempts made".into());

        for attempt in 1..=attempts {
            let delay = self.policy.delay_before(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            debug!(
                provider = %provider_name,
                attempt,
                total = attempts,
                "Upstream: sending request"
            );

            match tokio::time::timeout(self.policy.timeout, self.inner.complete(request.clone()))
                .await
            {
                Ok(Ok(response)) => return Ok(response),
                Ok(Err(e)) => {
                    warn!(
                        provider = %provider_name,
                        attempt,
                        error = %e,
                        "Upstream: attempt failed"
                    );
                    let retryable = Self::is_retryable(&e);
                    last_error = e;
                    if !retryable {
                        break;
                    }
                }
                Err(_) => {
                    warn!(
                        provider = %provider_name,
                        attempt,
                        timeout_ms = self.policy.timeout.as_millis() as u64,
                        "Upstream: attempt timed out"
                    );
                    last_error = ProviderError::Timeout(format!(
                        "Provider '{}' timed out after {}ms",
                        provider_name,
                        self.policy.timeout.as_millis()
                    ));
                }
            }
        }

        Err(last_error)
    }

    async fn embed(
        &self,
        request: EmbeddingRequest,
    ) -> std::result::Result<EmbeddingResponse, ProviderError> {
        match tokio::time::timeout(self.policy.timeout, self.inner.embed(request)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(format!(
                "Embedding via '{}' timed out",
                self.inner.name()
            ))),
        }
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        self.inner.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// A mock provider that fails a fixed number of times, then succeeds.
    struct FlakyProvider {
        failures_left: Mutex<usize>,
        error: ProviderError,
        call_count: Mutex<usize>,
    }

    impl FlakyProvider {
        fn new(failures: usize, error: ProviderError) -> Self {
            Self {
                failures_left: Mutex::new(failures),
                error,
                call_count: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl lexgate_core::Provider for FlakyProvider {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> std::result::Result<ProviderResponse, ProviderError> {
            *self.call_count.lock().unwrap() += 1;
            let mut left = self.failures_left.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                return Err(self.error.clone());
            }
            Ok(ProviderResponse {
                text: "success".into(),
                model: request.model,
                usage: None,
            })
        }
    }

    /// A mock provider that hangs forever (for timeout testing).
    struct HangingProvider;

    #[async_trait]
    impl lexgate_core::Provider for HangingProvider {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> std::result::Result<ProviderResponse, ProviderError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!()
        }
    }

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            timeout: Duration::from_secs(5),
            backoff: Duration::from_millis(1),
        }
    }

    fn test_request() -> ProviderRequest {
        ProviderRequest::new("test", "hello")
    }

    fn server_error() -> ProviderError {
        ProviderError::ApiError {
            status_code: 500,
            message: "Internal Server Error".into(),
        }
    }

    #[tokio::test]
    async fn first_attempt_succeeds() {
        let inner = Arc::new(FlakyProvider::new(0, server_error()));
        let retry = RetryProvider::new(inner.clone(), policy(3));

        let result = retry.complete(test_request()).await;
        assert_eq!(result.unwrap().text, "success");
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn single_attempt_policy_does_not_retry() {
        let inner = Arc::new(FlakyProvider::new(1, server_error()));
        let retry = RetryProvider::new(inner.clone(), policy(1));

        let result = retry.complete(test_request()).await;
        assert!(matches!(result, Err(ProviderError::ApiError { .. })));
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let inner = Arc::new(FlakyProvider::new(
            2,
            ProviderError::RateLimited {
                retry_after_secs: 1,
            },
        ));
        let retry = RetryProvider::new(inner.clone(), policy(3));

        let result = retry.complete(test_request()).await;
        assert!(result.is_ok());
        assert_eq!(inner.calls(), 3);
    }

    #[tokio::test]
    async fn exhausted_attempts_return_last_error() {
        let inner = Arc::new(FlakyProvider::new(10, ProviderError::Network("refused".into())));
        let retry = RetryProvider::new(inner.clone(), policy(3));

        match retry.complete(test_request()).await {
            Err(ProviderError::Network(_)) => {}
            other => panic!("Expected Network, got: {other:?}"),
        }
        assert_eq!(inner.calls(), 3);
    }

    #[tokio::test]
    async fn authentication_failure_is_not_retried() {
        let inner = Arc::new(FlakyProvider::new(
            10,
            ProviderError::AuthenticationFailed("bad key".into()),
        ));
        let retry = RetryProvider::new(inner.clone(), policy(5));

        assert!(retry.complete(test_request()).await.is_err());
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn timeout_becomes_timeout_error() {
        let retry = RetryProvider::new(
            Arc::new(HangingProvider),
            RetryPolicy {
                max_attempts: 2,
                timeout: Duration::from_millis(20),
                backoff: Duration::from_millis(1),
            },
        );

        match retry.complete(test_request()).await {
            Err(ProviderError::Timeout(msg)) => assert!(msg.contains("hanging")),
            other => panic!("Expected Timeout, got: {other:?}"),
        }
    }

    #[test]
    fn backoff_doubles_per_retry() {
        let p = RetryPolicy {
            max_attempts: 4,
            timeout: Duration::from_secs(1),
            backoff: Duration::from_millis(100),
        };
        assert_eq!(p.delay_before(1), Duration::ZERO);
        assert_eq!(p.delay_before(2), Duration::from_millis(100));
        assert_eq!(p.delay_before(3), Duration::from_millis(200));
        assert_eq!(p.delay_before(4), Duration::from_millis(400));
    }

    #[test]
    fn policy_from_config() {
        let cfg = lexgate_config::UpstreamConfig {
            max_attempts: 3,
            timeout_secs: 10,
            backoff_ms: 50,
            ..Default::default()
        };
        let p = RetryPolicy::from_config(&cfg);
        assert_eq!(p.max_attempts, 3);
        assert_eq!(p.timeout, Duration::from_secs(10));
        assert_eq!(p.backoff, Duration::from_millis(50));
    }
}
