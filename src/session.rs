//! Sessions
//!
//! Lazy, on-demand session access for a single request. The session store is
//! only consulted when a handler actually asks for a session.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Server-side session state.
#[derive(Debug)]
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,
    attributes: RwLock<HashMap<String, Value>>,
    invalidated: AtomicBool,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            attributes: RwLock::new(HashMap::new()),
            invalidated: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes.read().get(name).cloned()
    }

    pub fn set_attribute(&self, name: impl Into<String>, value: Value) {
        self.attributes.write().insert(name.into(), value);
    }

    pub fn remove_attribute(&self, name: &str) -> Option<Value> {
        self.attributes.write().remove(name)
    }

    /// Attribute names, sorted
    pub fn attribute_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.attributes.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Discard all attributes; the store forgets the session on next lookup.
    pub fn invalidate(&self) {
        self.invalidated.store(true, Ordering::SeqCst);
        self.attributes.write().clear();
    }

    pub fn is_invalidated(&self) -> bool {
        self.invalidated.load(Ordering::SeqCst)
    }
}

/// Backing storage for sessions. Calls may block.
pub trait SessionStore: Send + Sync {
    /// Create and register a fresh session
    fn create(&self) -> Arc<Session>;

    /// Live (non-invalidated) session by id
    fn get(&self, id: &str) -> Option<Arc<Session>>;

    fn remove(&self, id: &str) -> Option<Arc<Session>>;
}

/// Process-local session store.
pub struct InMemorySessionStore {
    id_prefix: String,
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    counter: AtomicU64,
}

impl InMemorySessionStore {
    pub fn new(id_prefix: impl Into<String>) -> Self {
        Self {
            id_prefix: id_prefix.into(),
            sessions: RwLock::new(HashMap::new()),
            counter: AtomicU64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    fn next_id(&self) -> String {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let now = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let mut hasher = blake3::Hasher::new();
        hasher.update(&now.to_le_bytes());
        hasher.update(&std::process::id().to_le_bytes());
        hasher.update(&seq.to_le_bytes());
        let digest = hex::encode(&hasher.finalize().as_bytes()[..16]);
        format!("{}{}", self.id_prefix, digest)
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self) -> Arc<Session> {
        let session = Arc::new(Session::new(self.next_id()));
        self.sessions
            .write()
            .insert(session.id().to_string(), session.clone());
        info!(session_id = %session.id(), "Created session");
        session
    }

    fn get(&self, id: &str) -> Option<Arc<Session>> {
        let session = self.sessions.read().get(id).cloned()?;
        if session.is_invalidated() {
            self.remove(id);
            return None;
        }
        Some(session)
    }

    fn remove(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.write().remove(id)
    }
}

/// Per-request session access; creates the session at most once.
pub struct SessionAccessor {
    store: Arc<dyn SessionStore>,
    requested_id: Option<String>,
    session: Mutex<Option<Arc<Session>>>,
}

impl SessionAccessor {
    /// `requested_id` is the session id the client presented, if any.
    pub fn new(store: Arc<dyn SessionStore>, requested_id: Option<String>) -> Self {
        Self {
            store,
            requested_id,
            session: Mutex::new(None),
        }
    }

    /// Current session; with `create == false` a missing session yields `None`.
    pub fn get_session(&self, create: bool) -> Option<Arc<Session>> {
        let mut slot = self.session.lock();
        if let Some(existing) = slot.as_ref() {
            if !existing.is_invalidated() {
                return Some(existing.clone());
            }
            debug!(session_id = %existing.id(), "Dropping invalidated session");
            *slot = None;
        }

        if let Some(found) = self.requested_id.as_deref().and_then(|id| self.store.get(id)) {
            *slot = Some(found.clone());
            return Some(found);
        }

        if !create {
            return None;
        }
        let created = self.store.create();
        *slot = Some(created.clone());
        Some(created)
    }

    /// Whether a session is already bound, without touching the store
    pub fn has_session(&self) -> bool {
        self.session
            .lock()
            .as_ref()
            .is_some_and(|s| !s.is_invalidated())
    }
}
