//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// Refinement requests carry the full current text, so no conversation
/// state is kept between calls.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request and wait for the full response
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Model identifier requests are sent to
    fn model(&self) -> &str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Mock LLM client for unit tests
    ///
    /// Each call consumes the next scripted result; `Err` entries are
    /// returned as `LlmError::ApiError` with the given message.
    pub struct MockLlmClient {
        results: Vec<Result<CompletionResponse, String>>,
        call_count: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl MockLlmClient {
        pub fn new(results: Vec<Result<String, String>>) -> Self {
            debug!(result_count = %results.len(), "MockLlmClient::new: called");
            Self::responses(results.into_iter().map(|r| r.map(CompletionResponse::text)).collect())
        }

        /// Client that answers with full responses, including stop reasons
        pub fn responses(results: Vec<Result<CompletionResponse, String>>) -> Self {
            Self {
                results,
                call_count: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// Client that answers with the given texts in order
        pub fn texts(texts: &[&str]) -> Self {
            Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Prompts received so far
        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            debug!(%idx, "MockLlmClient::complete: fetching response");
            if let Some(message) = request.messages.last() {
                self.prompts.lock().unwrap().push(message.content.clone());
            }

            match self.results.get(idx) {
                Some(Ok(response)) => Ok(response.clone()),
                Some(Err(message)) => Err(LlmError::ApiError {
                    status: 500,
                    message: message.clone(),
                }),
                None => Err(LlmError::InvalidResponse("No more mock responses".to_string())),
            }
        }

        fn model(&self) -> &str {
            "mock-model"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_client_returns_responses() {
            let client = MockLlmClient::new(vec![Ok("Response 1".to_string()), Err("boom".to_string())]);

            let req = CompletionRequest::prompt("Test", 1000, 0.7);

            let resp1 = client.complete(req.clone()).await.unwrap();
            assert_eq!(resp1.content, Some("Response 1".to_string()));

            let resp2 = client.complete(req.clone()).await;
            assert!(matches!(resp2, Err(LlmError::ApiError { status: 500, .. })));

            assert_eq!(client.call_count(), 2);
            assert_eq!(client.prompts(), vec!["Test".to_string(), "Test".to_string()]);
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockLlmClient::texts(&[]);
            let result = client.complete(CompletionRequest::prompt("Test", 1000, 0.7)).await;
            assert!(result.is_err());
        }
    }
}
