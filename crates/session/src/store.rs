//! Session store trait and in-memory implementation

use crate::SessionError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use hr_agent_core::{merge, Clock, ConversationState, Intent, SessionKey, SlotMap};
use std::sync::Arc;

/// Persistence for per-conversation state.
///
/// `merge_slots` exists as its own operation (rather than load + save at the
/// call site) so implementations can apply the merge atomically per key.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the current state, or None if absent or expired
    async fn load(&self, key: &SessionKey) -> Result<Option<ConversationState>, SessionError>;

    /// Replace the state, resetting its TTL
    async fn save(&self, key: &SessionKey, state: &ConversationState) -> Result<(), SessionError>;

    /// Set the intent and merge new slots into the stored state, atomically
    /// per key. Returns the state after the merge.
    async fn merge_slots(
        &self,
        key: &SessionKey,
        intent: Intent,
        new_slots: &SlotMap,
    ) -> Result<ConversationState, SessionError>;

    /// Remove the state entirely
    async fn clear(&self, key: &SessionKey) -> Result<(), SessionError>;
}

struct StoredEntry {
    state: ConversationState,
    expires_at: DateTime<Utc>,
}

/// In-memory session store with absolute TTL from last write.
pub struct MemorySessionStore {
    entries: DashMap<String, StoredEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl MemorySessionStore {
    pub fn new(ttl: std::time::Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::seconds(1800)),
            clock,
        }
    }

    fn fresh_deadline(&self) -> DateTime<Utc> {
        self.clock.now() + self.ttl
    }

    /// Number of live (possibly expired, not yet reaped) sessions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, key: &SessionKey) -> Result<Option<ConversationState>, SessionError> {
        let storage_key = key.storage_key();
        let now = self.clock.now();

        if let Some(entry) = self.entries.get(&storage_key) {
            if entry.expires_at > now {
                return Ok(Some(entry.state.clone()));
            }
        }

        // Expired entries are reaped lazily on access
        self.entries
            .remove_if(&storage_key, |_, entry| entry.expires_at <= now);
        Ok(None)
    }

    async fn save(&self, key: &SessionKey, state: &ConversationState) -> Result<(), SessionError> {
        self.entries.insert(
            key.storage_key(),
            StoredEntry {
                state: state.clone(),
                expires_at: self.fresh_deadline(),
            },
        );
        tracing::debug!(session = %key, intent = %state.intent, "Session state saved");
        Ok(())
    }

    async fn merge_slots(
        &self,
        key: &SessionKey,
        intent: Intent,
        new_slots: &SlotMap,
    ) -> Result<ConversationState, SessionError> {
        let now = self.clock.now();
        let deadline = self.fresh_deadline();

        // The entry guard holds the shard lock, making read-merge-write
        // atomic per key: concurrent turns with disjoint fields both land.
        let mut entry = self
            .entries
            .entry(key.storage_key())
            .or_insert_with(|| StoredEntry {
                state: ConversationState::default(),
                expires_at: deadline,
            });

        if entry.expires_at <= now {
            entry.state = ConversationState::default();
        }

        entry.state.intent = intent;
        entry.state.slots = merge(&entry.state.slots, new_slots);
        entry.expires_at = deadline;

        tracing::debug!(
            session = %key,
            intent = %intent,
            slots = entry.state.slots.len(),
            "Session slots merged"
        );
        Ok(entry.state.clone())
    }

    async fn clear(&self, key: &SessionKey) -> Result<(), SessionError> {
        self.entries.remove(&key.storage_key());
        tracing::debug!(session = %key, "Session state cleared");
        Ok(())
    }
}
