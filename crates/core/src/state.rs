//! Conversation state record and phase state machine

use crate::intent::Intent;
use crate::slots::SlotMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key for one conversation: a (user, session) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub user_id: String,
    pub session_id: String,
}

impl SessionKey {
    pub fn new(user_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: session_id.into(),
        }
    }

    /// Storage key, mirroring the session record naming convention.
    pub fn storage_key(&self) -> String {
        format!("conversation_state:{}:{}", self.user_id, self.session_id)
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.user_id, self.session_id)
    }
}

/// Lifecycle phase of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    /// Gathering slots; initial and re-entrant on recoverable failure
    #[default]
    Collecting,
    /// All required slots present, policy checks running
    Validating,
    /// Validation passed, executing without human approval
    AutoExecute,
    /// Validation passed, submitted for manager approval
    PendingApproval,
    /// Action executed successfully (terminal)
    Executed,
    /// Action failed (terminal for the turn; slots are preserved)
    Failed,
}

static PHASE_TRANSITIONS: Lazy<HashMap<ConversationPhase, &'static [ConversationPhase]>> =
    Lazy::new(|| {
        use ConversationPhase::*;
        let mut map = HashMap::new();
        map.insert(Collecting, &[Collecting, Validating] as &[_]);
        map.insert(Validating, &[Collecting, AutoExecute, PendingApproval, Failed] as &[_]);
        map.insert(AutoExecute, &[Executed, Failed] as &[_]);
        map.insert(PendingApproval, &[Executed, Failed] as &[_]);
        map.insert(Executed, &[] as &[_]);
        map.insert(Failed, &[Collecting] as &[_]);
        map
    });

impl ConversationPhase {
    /// Allowed transitions from this phase
    pub fn allowed_transitions(&self) -> &'static [ConversationPhase] {
        PHASE_TRANSITIONS.get(self).copied().unwrap_or(&[])
    }

    /// Check whether a transition is legal
    pub fn can_transition_to(&self, target: ConversationPhase) -> bool {
        self.allowed_transitions().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversationPhase::Executed)
    }
}

impl std::fmt::Display for ConversationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConversationPhase::Collecting => "collecting",
            ConversationPhase::Validating => "validating",
            ConversationPhase::AutoExecute => "auto_execute",
            ConversationPhase::PendingApproval => "pending_approval",
            ConversationPhase::Executed => "executed",
            ConversationPhase::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// One conversation's persisted record.
///
/// Created on the first message of a conversation, enriched on every
/// subsequent message of the same (user, session) pair, cleared on successful
/// execution or unrecoverable failure. Slots are monotonically enriched until
/// cleared: a merge may overwrite a field with a newer value but never drops
/// a known field unless the user explicitly switched intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConversationState {
    /// Currently resolved intent, `unknown` when unset
    #[serde(default)]
    pub intent: Intent,
    /// Accumulated slot values
    #[serde(default)]
    pub slots: SlotMap,
    /// Current phase
    #[serde(default)]
    pub phase: ConversationPhase,
}

impl ConversationState {
    pub fn new(intent: Intent) -> Self {
        Self {
            intent,
            slots: SlotMap::new(),
            phase: ConversationPhase::Collecting,
        }
    }

    /// Whether a conversation is actually in progress
    pub fn is_active(&self) -> bool {
        self.intent != Intent::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        use ConversationPhase::*;
        assert!(Collecting.can_transition_to(Validating));
        assert!(Validating.can_transition_to(Collecting)); // re-entrant
        assert!(Validating.can_transition_to(AutoExecute));
        assert!(Validating.can_transition_to(PendingApproval));
        assert!(AutoExecute.can_transition_to(Executed));
        assert!(PendingApproval.can_transition_to(Executed));
        assert!(!Executed.can_transition_to(Collecting));
        assert!(Failed.can_transition_to(Collecting));
        assert!(!Collecting.can_transition_to(Executed));
    }

    #[test]
    fn test_state_roundtrip() {
        let mut state = ConversationState::new(Intent::ApplyLeave);
        state
            .slots
            .insert("from_date".to_string(), "2025-11-22".to_string());

        let json = serde_json::to_string(&state).unwrap();
        let back: ConversationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_default_state_is_inactive() {
        let state = ConversationState::default();
        assert!(!state.is_active());
        assert_eq!(state.phase, ConversationPhase::Collecting);
    }
}
