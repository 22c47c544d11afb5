//! Core traits and types for the HR conversation engine
//!
//! This crate provides foundational types used across all other crates:
//! - Error types
//! - The closed intent enum and per-intent dispatch helpers
//! - Slot map and the pure merge reducer
//! - Conversation state record and phase state machine
//! - Injected clock abstraction

pub mod clock;
pub mod error;
pub mod intent;
pub mod slots;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use intent::Intent;
pub use slots::{merge, SlotMap};
pub use state::{ConversationPhase, ConversationState, SessionKey};
