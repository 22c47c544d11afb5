//! Conversation engine: the turn boundary
//!
//! One inbound utterance becomes exactly one reply. Load prior state,
//! extract, merge, persist, route the intent's workflow, then persist or
//! clear per the outcome. Every failure inside the turn is converted to a
//! bilingual user-facing message here; nothing propagates to the caller.

use crate::dst::IntentExtractor;
use crate::policy::ValidationPolicy;
use crate::responses;
use crate::workflow::{generic_flow, leave_flow, WorkflowContext, WorkflowGraph, WorkflowState};
use crate::EngineError;
use hr_agent_config::{DomainConfig, SessionSettings};
use hr_agent_core::{Clock, ConversationPhase, ConversationState, Intent, SessionKey};
use hr_agent_llm::StructuredExtractor;
use hr_agent_session::{SessionStore, TtlCache};
use hr_agent_tools::ToolExecutor;
use serde_json::{json, Value};
use std::sync::Arc;

/// One user-facing turn result
#[derive(Debug, Clone)]
pub struct TurnReply {
    pub response: String,
    pub session_id: String,
    /// Opaque payload reference for document-producing intents
    pub document: Option<Value>,
}

/// Outcome of processing one turn
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// The engine handled the message
    Reply(TurnReply),
    /// Policy question: hand off to the external knowledge layer
    Delegated { session_id: String },
}

/// The conversation orchestration engine
pub struct ConversationEngine {
    store: Arc<dyn SessionStore>,
    extractor: IntentExtractor,
    reference_cache: TtlCache<Vec<String>>,
    ctx: WorkflowContext,
    generic: WorkflowGraph,
    leave: WorkflowGraph,
}

impl ConversationEngine {
    pub fn new(
        domain: Arc<DomainConfig>,
        store: Arc<dyn SessionStore>,
        model: Arc<dyn StructuredExtractor>,
        executor: Arc<dyn ToolExecutor>,
        clock: Arc<dyn Clock>,
        session_settings: &SessionSettings,
    ) -> Self {
        let policy = Arc::new(ValidationPolicy::new(domain.clone(), clock.clone()));
        let extractor = IntentExtractor::new(domain.clone(), model, clock.clone());

        Self {
            store,
            extractor,
            reference_cache: TtlCache::new(session_settings.reference_ttl(), clock),
            ctx: WorkflowContext {
                executor,
                policy,
                domain,
            },
            generic: generic_flow(),
            leave: leave_flow(),
        }
    }

    /// Process one inbound message. A missing session id starts a new
    /// conversation. Never fails: internal errors become a generic reply.
    pub async fn process_turn(
        &self,
        user_id: &str,
        session_id: Option<&str>,
        utterance: &str,
    ) -> TurnOutcome {
        let session_id = session_id
            .map(|s| s.to_string())
            .unwrap_or_else(new_session_id);
        let key = SessionKey::new(user_id, session_id.clone());

        match self.handle(&key, utterance).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(session = %key, error = %err, "Turn failed");
                TurnOutcome::Reply(TurnReply {
                    response: responses::turn_error(),
                    session_id,
                    document: None,
                })
            }
        }
    }

    async fn handle(&self, key: &SessionKey, utterance: &str) -> Result<TurnOutcome, EngineError> {
        let prior = self.store.load(key).await?.unwrap_or_default();
        let leave_types = self.leave_types(&key.user_id).await;

        let extraction = self
            .extractor
            .extract(utterance, &prior, &leave_types)
            .await;

        match extraction.intent {
            // Out-of-scope knowledge questions; state not advanced
            Intent::PolicyQuestion => {
                return Ok(TurnOutcome::Delegated {
                    session_id: key.session_id.clone(),
                })
            }
            // Nothing resolvable; clarify without touching stored state
            Intent::Unknown => {
                return Ok(TurnOutcome::Reply(TurnReply {
                    response: extraction
                        .next_question
                        .unwrap_or_else(responses::clarify_unknown),
                    session_id: key.session_id.clone(),
                    document: None,
                }))
            }
            _ => {}
        }

        // Persist the merged view. On explicit intent switch the accumulated
        // slots were already discarded by the extractor, so replace;
        // otherwise merge atomically so concurrent turns cannot drop fields.
        let state = if extraction.intent_reset {
            let fresh = ConversationState {
                intent: extraction.intent,
                slots: extraction.slots.clone(),
                phase: ConversationPhase::Collecting,
            };
            self.store.save(key, &fresh).await?;
            fresh
        } else {
            self.store
                .merge_slots(key, extraction.intent, &extraction.slots)
                .await?
        };

        let mut wf_state = WorkflowState::new(
            key.user_id.clone(),
            state.intent,
            state.slots.clone(),
            extraction.next_question.clone(),
            leave_types,
        );

        let graph = match state.intent {
            Intent::ApplyLeave => &self.leave,
            _ => &self.generic,
        };
        graph.run(&mut wf_state, &self.ctx).await?;

        if wf_state.clear_session {
            self.store.clear(key).await?;
        }

        tracing::info!(
            session = %key,
            intent = %state.intent,
            phase = %wf_state.phase,
            cleared = wf_state.clear_session,
            "Turn complete"
        );

        Ok(TurnOutcome::Reply(TurnReply {
            response: wf_state.response.unwrap_or_else(responses::fallback),
            session_id: key.session_id.clone(),
            document: wf_state.document,
        }))
    }

    /// Leave-type names, cached per user with a fixed TTL. Failures degrade
    /// to an empty list rather than failing the turn.
    async fn leave_types(&self, user_id: &str) -> Vec<String> {
        if let Some(cached) = self.reference_cache.get(user_id) {
            return cached;
        }

        let result = self
            .ctx
            .executor
            .execute("get_leave_types", json!({ "user_id": user_id }))
            .await;

        let types = match result {
            Ok(output) if output.is_success() => output
                .get("leave_types")
                .and_then(|v| v.as_array())
                .map(|entries| {
                    entries
                        .iter()
                        .filter_map(|e| e.get("name")?.as_str().map(|s| s.to_string()))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default(),
            Ok(output) => {
                tracing::warn!(message = ?output.message, "Leave type fetch returned error");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(error = %err, "Leave type fetch failed");
                Vec::new()
            }
        };

        if !types.is_empty() {
            self.reference_cache.put(user_id, types.clone());
        }
        types
    }
}

/// Short unique conversation id
fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_shape() {
        let id = new_session_id();
        assert_eq!(id.len(), 8);
        assert_ne!(id, new_session_id());
    }
}
