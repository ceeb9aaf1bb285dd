//! Session-scoped chat memory.
//!
//! Chat histories live in process memory for the process lifetime. There is
//! no eviction: a "new session" in the UI just starts using a fresh ID, and
//! the old history stays behind. The map is shared by every concurrent
//! request; individual reads and appends are serialized by the lock, but two
//! concurrent exchanges on the same session can still interleave their
//! appends — a documented limitation, not a handled one.

use crate::types::{ChatTurn, TurnRole};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Default number of recent turns replayed into prompts.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Concurrency-safe mapping from session ID to its ordered chat history.
///
/// Cloning is cheap and shares the underlying map.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Vec<ChatTurn>>>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the history for a session, creating an empty one if the session
    /// has not been seen before.
    pub fn history(&self, session_id: &str) -> Vec<ChatTurn> {
        let mut sessions = self.inner.write();
        sessions.entry(session_id.to_string()).or_default().clone()
    }

    /// Append a turn to a session's history, creating the session if needed.
    pub fn append(&self, session_id: &str, turn: ChatTurn) {
        let mut sessions = self.inner.write();
        sessions.entry(session_id.to_string()).or_default().push(turn);
    }

    /// Number of sessions seen so far.
    pub fn session_count(&self) -> usize {
        self.inner.read().len()
    }

    /// Number of turns recorded for a session; zero if unseen. Does not
    /// create the session.
    pub fn turn_count(&self, session_id: &str) -> usize {
        self.inner
            .read()
            .get(session_id)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

/// Mint a fresh opaque session ID.
///
/// The UI's "new session" button calls this and simply stops using the old
/// ID; the old history stays in the store.
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Truncate a history to its most recent `window_size` turns.
///
/// Bounds what gets replayed into prompts; the stored history is never
/// truncated.
pub fn truncate_history(history: &[ChatTurn], window_size: usize) -> Vec<ChatTurn> {
    if history.len() <= window_size {
        history.to_vec()
    } else {
        history[history.len() - window_size..].to_vec()
    }
}

/// Count the user turns in a history.
pub fn user_turns(history: &[ChatTurn]) -> usize {
    history.iter().filter(|t| t.role == TurnRole::User).count()
}
