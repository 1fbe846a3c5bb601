//! HTTP session table.
//!
//! Sessions are opaque ids handed out on first contact and echoed back in
//! `x-session-id`. Only the creation time is recorded.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

/// Source of the current time, injectable for tests.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A resolved session for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// `true` when the id was already in the table.
    pub resumed: bool,
}

/// Session ids and their creation times.
#[derive(Debug)]
pub struct SessionStore {
    clock: Arc<dyn Clock>,
    sessions: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl SessionStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve the session for a request.
    ///
    /// A missing or blank id mints a fresh UUID. A supplied id is recorded
    /// the first time it is seen and returned unchanged.
    pub fn resolve(&self, supplied: Option<&str>) -> Session {
        let id = match supplied.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => uuid::Uuid::new_v4().to_string(),
        };

        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match sessions.get(&id) {
            Some(created_at) => Session {
                created_at: *created_at,
                id,
                resumed: true,
            },
            None => {
                let created_at = self.clock.now();
                sessions.insert(id.clone(), created_at);
                Session {
                    id,
                    created_at,
                    resumed: false,
                }
            }
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
