//! Session state persistence and reference-data caching
//!
//! Conversation turns are stateless requests against a shared store keyed by
//! (user, session). Records expire on an absolute TTL from last write, not a
//! sliding window per read. The in-memory store applies the slot merge
//! atomically under its per-key lock, so concurrent turns supplying disjoint
//! fields converge to the union of both.

pub mod cache;
pub mod store;

pub use cache::TtlCache;
pub use store::{MemorySessionStore, SessionStore};

use thiserror::Error;

/// Session storage errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<SessionError> for hr_agent_core::Error {
    fn from(err: SessionError) -> Self {
        hr_agent_core::Error::Session(err.to_string())
    }
}
