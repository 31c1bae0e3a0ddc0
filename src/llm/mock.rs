use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{LlmClient, LlmError};

/// Mock LLM client for testing. Returns a configurable response.
pub struct MockLlmClient {
    response: String,
    /// Prompts containing this marker fail with a connection error.
    fail_marker: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            fail_marker: None,
            delay: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A client whose every request fails.
    pub fn failing() -> Self {
        Self::new("").fail_when_prompt_contains("")
    }

    /// Fail only the requests whose prompt contains `marker`.
    pub fn fail_when_prompt_contains(mut self, marker: &str) -> Self {
        self.fail_marker = Some(marker.to_string());
        self
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl LlmClient for MockLlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.fail_marker {
            Some(marker) if prompt.contains(marker.as_str()) => {
                Err(LlmError::Connection("mock://unavailable".into()))
            }
            _ => Ok(self.response.clone()),
        }
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
