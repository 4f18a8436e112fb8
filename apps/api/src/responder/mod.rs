//! Prompt Responder — the memoized get-or-compute layer over the completion
//! backend. Every generated panel in the service flows through [`respond`].

pub mod cache;

use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::{ChatCompletion, SupportedModel};

use cache::ResponseCache;

/// The cache key: the exact triple sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PromptRequest {
    pub system: String,
    pub user: String,
    pub model: SupportedModel,
}

/// Returns the completion for `request`, consulting `cache` first.
///
/// A hit returns the stored text with no backend call. A miss issues exactly
/// one completion (two messages: system + user), trims the text, stores it
/// under the triple, and returns it. Placeholder models are rejected before
/// any backend call.
pub async fn respond(
    backend: &dyn ChatCompletion,
    cache: &ResponseCache,
    request: &PromptRequest,
) -> Result<String, AppError> {
    let Some(model_id) = request.model.api_id() else {
        return Err(AppError::ModelUnavailable(request.model.label().to_string()));
    };

    if let Some(hit) = cache.get(request) {
        debug!("Responder cache hit (model: {})", request.model);
        return Ok(hit);
    }

    let text = backend
        .complete(&request.system, &request.user, model_id)
        .await
        .map_err(|e| AppError::Llm(format!("Completion call failed: {e}")))?;

    let text = text.trim().to_string();
    cache.insert(request.clone(), text.clone());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::llm_client::LlmError;

    /// Stub backend that counts invocations and echoes its input back.
    #[derive(Default)]
    struct CountingBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ChatCompletion for CountingBackend {
        async fn complete(
            &self,
            system: &str,
            user: &str,
            _model_id: &str,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("  {system}|{user}  "))
        }
    }

    fn request(user: &str) -> PromptRequest {
        PromptRequest {
            system: "sys".to_string(),
            user: user.to_string(),
            model: SupportedModel::ClaudeSonnet45,
        }
    }

    #[tokio::test]
    async fn test_identical_requests_hit_the_backend_once() {
        let backend = CountingBackend::default();
        let cache = ResponseCache::new();

        let first = respond(&backend, &cache, &request("hello")).await.unwrap();
        let second = respond(&backend, &cache, &request("hello")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_responses_are_whitespace_trimmed() {
        let backend = CountingBackend::default();
        let cache = ResponseCache::new();

        let text = respond(&backend, &cache, &request("hello")).await.unwrap();
        assert_eq!(text, "sys|hello");
    }

    #[tokio::test]
    async fn test_distinct_prompts_are_distinct_entries() {
        let backend = CountingBackend::default();
        let cache = ResponseCache::new();

        respond(&backend, &cache, &request("one")).await.unwrap();
        respond(&backend, &cache, &request("two")).await.unwrap();

        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_clear_forces_exactly_one_new_call() {
        let backend = CountingBackend::default();
        let cache = ResponseCache::new();

        respond(&backend, &cache, &request("hello")).await.unwrap();
        cache.clear();
        respond(&backend, &cache, &request("hello")).await.unwrap();
        respond(&backend, &cache, &request("hello")).await.unwrap();

        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_placeholder_model_never_reaches_the_backend() {
        let backend = CountingBackend::default();
        let cache = ResponseCache::new();

        let mut req = request("hello");
        req.model = SupportedModel::ClaudeNext;

        let err = respond(&backend, &cache, &req).await.unwrap_err();
        assert!(matches!(err, AppError::ModelUnavailable(_)));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert!(cache.is_empty());
    }
}
