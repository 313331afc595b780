//! Session store — one conversation history per session id.
//!
//! Each session sits behind its own async mutex; holding it for the whole of
//! one `handle` call serializes concurrent requests for the same session
//! while different sessions proceed independently.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use super::history::ConversationHistory;

/// Shared handle to a session.
pub type SessionHandle = Arc<Mutex<Session>>;

/// One user's conversation.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub history: ConversationHistory,
}

impl Session {
    fn new(id: Uuid, max_turns: Option<usize>) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            last_active: now,
            history: ConversationHistory::with_capacity_limit(max_turns),
        }
    }

    /// Mark the session as used now.
    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }
}

/// In-memory registry of live sessions.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
    max_turns: Option<usize>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(max_turns: Option<usize>, idle_timeout: Duration) -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
            max_turns,
            idle_timeout,
        })
    }

    /// Look up a session, or start a new one.
    ///
    /// An unknown or absent id yields a fresh session with a newly generated id.
    pub async fn get_or_create(&self, id: Option<Uuid>) -> (Uuid, SessionHandle) {
        if let Some(id) = id {
            if let Some(handle) = self.get(id).await {
                return (id, handle);
            }
            debug!(session_id = %id, "Unknown session id, starting a new session");
        }

        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(Session::new(id, self.max_turns)));
        self.sessions.write().await.insert(id, Arc::clone(&handle));
        info!(session_id = %id, "Session started");
        (id, handle)
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// End a session. Returns whether it existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(session_id = %id, "Session ended");
        }
        removed
    }

    /// Drop sessions idle for longer than the idle timeout.
    ///
    /// A session is kept while any handle to it is held outside the store,
    /// so a request that has looked a session up never loses it mid-turn.
    pub async fn prune_idle(&self) -> usize {
        let Some(cutoff) = chrono::Duration::from_std(self.idle_timeout)
            .ok()
            .and_then(|idle| Utc::now().checked_sub_signed(idle))
        else {
            return 0;
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| {
            if Arc::strong_count(handle) > 1 {
                return true;
            }
            match handle.try_lock() {
                Ok(session) => session.last_active > cutoff,
                Err(_) => true,
            }
        });
        let pruned = before - sessions.len();

        if pruned > 0 {
            info!(count = pruned, "Pruned idle sessions");
        }
        pruned
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Spawn a background task that periodically prunes idle sessions.
pub fn spawn_prune_task(
    store: Arc<SessionStore>,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            store.prune_idle().await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Turn;
    use crate::sentiment::Sentiment;

    #[tokio::test]
    async fn creates_and_reuses_sessions() {
        let store = SessionStore::new(Some(10), Duration::from_secs(60));
        assert!(store.is_empty().await);

        let (id, _) = store.get_or_create(None).await;
        assert_eq!(store.len().await, 1);

        let (same, _) = store.get_or_create(Some(id)).await;
        assert_eq!(same, id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn unknown_id_starts_fresh_session() {
        let store = SessionStore::new(None, Duration::from_secs(60));
        let stale = Uuid::new_v4();
        let (id, _) = store.get_or_create(Some(stale)).await;
        assert_ne!(id, stale);
        assert!(store.get(stale).await.is_none());
        assert!(store.get(id).await.is_some());
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = SessionStore::new(Some(10), Duration::from_secs(60));
        let (_, a) = store.get_or_create(None).await;
        let (_, b) = store.get_or_create(None).await;

        a.lock().await.history.record(Turn::new(
            "hi",
            Sentiment::Neutral,
            0,
            "greeting",
            1.0,
            "Hello!",
        ));

        assert_eq!(a.lock().await.history.len(), 1);
        assert!(b.lock().await.history.is_empty());
    }

    #[tokio::test]
    async fn session_history_uses_store_cap() {
        let store = SessionStore::new(Some(3), Duration::from_secs(60));
        let (_, handle) = store.get_or_create(None).await;
        assert_eq!(handle.lock().await.history.max_turns(), Some(3));
    }

    #[tokio::test]
    async fn remove_ends_session() {
        let store = SessionStore::new(None, Duration::from_secs(60));
        let (id, _) = store.get_or_create(None).await;
        assert!(store.remove(id).await);
        assert!(!store.remove(id).await);
        assert!(store.get(id).await.is_none());
    }

    #[tokio::test]
    async fn prune_removes_only_idle_sessions() {
        let store = SessionStore::new(None, Duration::from_secs(60));
        let (stale_id, stale) = store.get_or_create(None).await;
        let (fresh_id, _) = store.get_or_create(None).await;

        stale.lock().await.last_active = Utc::now() - chrono::Duration::seconds(120);
        drop(stale);

        assert_eq!(store.prune_idle().await, 1);
        assert!(store.get(stale_id).await.is_none());
        assert!(store.get(fresh_id).await.is_some());
    }

    #[tokio::test]
    async fn prune_skips_busy_sessions() {
        let store = SessionStore::new(None, Duration::from_secs(60));
        let (id, handle) = store.get_or_create(None).await;

        let mut guard = handle.lock().await;
        guard.last_active = Utc::now() - chrono::Duration::seconds(120);

        assert_eq!(store.prune_idle().await, 0);
        drop(guard);
        drop(handle);
        assert_eq!(store.prune_idle().await, 1);
        assert!(store.get(id).await.is_none());
    }

    #[tokio::test]
    async fn prune_keeps_session_looked_up_but_not_yet_locked() {
        let store = SessionStore::new(None, Duration::from_secs(60));
        let (id, handle) = store.get_or_create(None).await;
        handle.lock().await.last_active = Utc::now() - chrono::Duration::seconds(120);
        drop(handle);

        // A request resolves the stale session, then a prune tick runs
        // before the request takes the session lock.
        let (same, in_flight) = store.get_or_create(Some(id)).await;
        assert_eq!(same, id);
        assert_eq!(store.prune_idle().await, 0);

        in_flight.lock().await.touch();
        assert!(store.get(id).await.is_some());
        drop(in_flight);
        assert_eq!(store.prune_idle().await, 0);
    }
}
