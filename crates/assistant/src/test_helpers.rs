//! Mock providers shared by the assistant tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use lexgate_core::error::ProviderError;
use lexgate_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};

/// Returns scripted replies in order, after an optional run of failures.
///
/// Once the script runs out the last reply is repeated.
pub struct ScriptedProvider {
    failures_left: Mutex<usize>,
    replies: Mutex<VecDeque<String>>,
    last_reply: Mutex<String>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new<'a>(replies: impl IntoIterator<Item = &'a str>) -> Self {
        Self::with_failures(0, replies)
    }

    pub fn with_failures<'a>(failures: usize, replies: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            failures_left: Mutex::new(failures),
            replies: Mutex::new(replies.into_iter().map(String::from).collect()),
            last_reply: Mutex::new(String::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.prompt.clone())
            .collect()
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let model = request.model.clone();
        self.requests.lock().unwrap().push(request);

        let mut failures = self.failures_left.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(ProviderError::Network("scripted failure".into()));
        }

        let mut last = self.last_reply.lock().unwrap();
        if let Some(next) = self.replies.lock().unwrap().pop_front() {
            *last = next;
        }

        Ok(ProviderResponse {
            text: last.clone(),
            model,
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
        })
    }
}

/// Fails every call with the same error.
pub struct FailingProvider {
    error: ProviderError,
    calls: Mutex<usize>,
}

impl FailingProvider {
    pub fn new(error: ProviderError) -> Self {
        Self {
            error,
            calls: Mutex::new(0),
        }
    }

    pub fn network() -> Self {
        Self::new(ProviderError::Network("connection refused".into()))
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        *self.calls.lock().unwrap() += 1;
        Err(self.error.clone())
    }
}
