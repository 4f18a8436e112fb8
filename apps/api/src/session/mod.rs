//! Session state — explicit, process-local, independent per session.
//!
//! Each session carries its own upload set, digest, source files and
//! response cache; nothing is shared across sessions and nothing survives
//! the process.

pub mod handlers;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dataset::models::{SourceFile, TableSample};
use crate::dataset::sampler::build_digest;
use crate::llm_client::SupportedModel;
use crate::responder::cache::ResponseCache;

/// Session lifecycle, decoupled from any rendering concern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    DataLoaded,
    ContentGenerated,
}

impl SessionPhase {
    /// A dataset upload always lands in DataLoaded — including after
    /// generation, since a changed digest makes generated content stale.
    pub fn on_data_loaded(self) -> SessionPhase {
        SessionPhase::DataLoaded
    }

    pub fn on_content_generated(self) -> SessionPhase {
        SessionPhase::ContentGenerated
    }
}

#[derive(Debug, Default)]
struct SessionData {
    phase: SessionPhase,
    samples: Vec<TableSample>,
    digest: String,
    sources: Vec<SourceFile>,
}

/// One user session. Mutable pieces sit behind a `Mutex` that is never held
/// across an await point; the response cache has its own interior locking.
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub model: SupportedModel,
    pub cache: ResponseCache,
    data: Mutex<SessionData>,
}

/// Serializable snapshot returned by the session endpoints.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub model: SupportedModel,
    pub phase: SessionPhase,
    pub tables: Vec<String>,
    pub source_files: Vec<String>,
    pub cached_responses: usize,
    pub created_at: DateTime<Utc>,
}

impl Session {
    fn new(model: SupportedModel) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            model,
            cache: ResponseCache::new(),
            data: Mutex::new(SessionData::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionData> {
        self.data.lock().expect("session state poisoned")
    }

    pub fn phase(&self) -> SessionPhase {
        self.lock().phase
    }

    /// Appends samples, recomputes the digest from the full upload set and
    /// advances the phase. Returns the new phase.
    pub fn add_samples(&self, new: Vec<TableSample>) -> SessionPhase {
        let mut data = self.lock();
        data.samples.extend(new);
        let digest = build_digest(&data.samples);
        data.digest = digest;
        data.phase = data.phase.on_data_loaded();
        data.phase
    }

    pub fn add_sources(&self, new: Vec<SourceFile>) {
        self.lock().sources.extend(new);
    }

    pub fn mark_generated(&self) -> SessionPhase {
        let mut data = self.lock();
        data.phase = data.phase.on_content_generated();
        data.phase
    }

    pub fn digest(&self) -> String {
        self.lock().digest.clone()
    }

    pub fn table_count(&self) -> usize {
        self.lock().samples.len()
    }

    pub fn samples(&self) -> Vec<TableSample> {
        self.lock().samples.clone()
    }

    pub fn sources(&self) -> Vec<SourceFile> {
        self.lock().sources.clone()
    }

    pub fn view(&self) -> SessionView {
        let data = self.lock();
        SessionView {
            id: self.id,
            model: self.model,
            phase: data.phase,
            tables: data.samples.iter().map(|s| s.name.clone()).collect(),
            source_files: data.sources.iter().map(|s| s.name.clone()).collect(),
            cached_responses: self.cache.len(),
            created_at: self.created_at,
        }
    }
}

/// Process-local registry of live sessions.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Arc<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, model: SupportedModel) -> Arc<Session> {
        let session = Arc::new(Session::new(model));
        self.inner
            .write()
            .expect("session store poisoned")
            .insert(session.id, Arc::clone(&session));
        session
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<Session>> {
        self.inner
            .read()
            .expect("session store poisoned")
            .get(id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str) -> TableSample {
        TableSample {
            name: name.to_string(),
            header: vec!["id".to_string()],
            rows: vec![vec!["1".to_string()]],
        }
    }

    #[test]
    fn test_new_session_starts_idle_and_empty() {
        let store = SessionStore::new();
        let session = store.create(SupportedModel::ClaudeSonnet45);

        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.digest(), "");
        assert_eq!(session.table_count(), 0);
        assert!(store.get(&session.id).is_some());
    }

    #[test]
    fn test_upload_moves_to_data_loaded_and_builds_digest() {
        let store = SessionStore::new();
        let session = store.create(SupportedModel::ClaudeSonnet45);

        let phase = session.add_samples(vec![table("a.csv")]);
        assert_eq!(phase, SessionPhase::DataLoaded);
        assert_eq!(session.digest(), "Table: a.csv\nid\n1\n\n");
    }

    #[test]
    fn test_generation_moves_to_content_generated() {
        let session = SessionStore::new().create(SupportedModel::ClaudeSonnet45);
        session.add_samples(vec![table("a.csv")]);

        assert_eq!(session.mark_generated(), SessionPhase::ContentGenerated);
        assert_eq!(session.phase(), SessionPhase::ContentGenerated);
    }

    #[test]
    fn test_reupload_after_generation_returns_to_data_loaded() {
        let session = SessionStore::new().create(SupportedModel::ClaudeSonnet45);
        session.add_samples(vec![table("a.csv")]);
        session.mark_generated();

        let phase = session.add_samples(vec![table("b.csv")]);
        assert_eq!(phase, SessionPhase::DataLoaded);
        assert_eq!(session.table_count(), 2);
        // Digest covers the full upload set, in upload order.
        assert_eq!(
            session.digest(),
            "Table: a.csv\nid\n1\n\nTable: b.csv\nid\n1\n\n"
        );
    }

    #[test]
    fn test_sessions_are_independent() {
        let store = SessionStore::new();
        let first = store.create(SupportedModel::ClaudeSonnet45);
        let second = store.create(SupportedModel::ClaudeOpus41);

        first.add_samples(vec![table("a.csv")]);
        assert_eq!(second.phase(), SessionPhase::Idle);
        assert_eq!(second.table_count(), 0);
    }
}
