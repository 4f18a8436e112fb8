//! Read-through response cache.
//!
//! Keyed by the exact (system, user, model) triple. No TTL, no selective
//! invalidation — only a full clear. Growth is unbounded; request variety is
//! small and the cache dies with its session.

use std::collections::HashMap;
use std::sync::Mutex;

use super::PromptRequest;

#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<PromptRequest, String>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, request: &PromptRequest) -> Option<String> {
        self.entries
            .lock()
            .expect("response cache poisoned")
            .get(request)
            .cloned()
    }

    pub fn insert(&self, request: PromptRequest, response: String) {
        self.entries
            .lock()
            .expect("response cache poisoned")
            .insert(request, response);
    }

    /// Drops every entry. The only supported eviction.
    pub fn clear(&self) {
        self.entries
            .lock()
            .expect("response cache poisoned")
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("response cache poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::SupportedModel;

    fn request(user: &str) -> PromptRequest {
        PromptRequest {
            system: "system".to_string(),
            user: user.to_string(),
            model: SupportedModel::ClaudeSonnet45,
        }
    }

    #[test]
    fn test_get_after_insert_returns_stored_response() {
        let cache = ResponseCache::new();
        assert!(cache.get(&request("q")).is_none());

        cache.insert(request("q"), "a".to_string());
        assert_eq!(cache.get(&request("q")).as_deref(), Some("a"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_key_is_the_full_triple() {
        let cache = ResponseCache::new();
        cache.insert(request("q"), "a".to_string());

        let mut other_model = request("q");
        other_model.model = SupportedModel::ClaudeOpus41;
        assert!(cache.get(&other_model).is_none());
    }

    #[test]
    fn test_clear_empties_everything() {
        let cache = ResponseCache::new();
        cache.insert(request("one"), "1".to_string());
        cache.insert(request("two"), "2".to_string());
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(&request("one")).is_none());
    }
}
