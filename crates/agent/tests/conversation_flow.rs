//! End-to-end conversation scenarios against the simulated HR back end.
//!
//! The model is either absent (forcing the deterministic extraction path) or
//! scripted per turn, so every scenario is fully reproducible.

use async_trait::async_trait;
use chrono::NaiveDate;
use hr_agent_agent::{ConversationEngine, TurnOutcome, TurnReply};
use hr_agent_config::{DomainConfig, SessionSettings};
use hr_agent_core::{Clock, ManualClock, SessionKey};
use hr_agent_llm::{ExtractionRequest, LlmError, ModelExtraction, StructuredExtractor};
use hr_agent_session::{MemorySessionStore, SessionStore};
use hr_agent_tools::{simulated_registry, SimulatedHrmsState};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Arc;

/// Model that is always down: exercises the deterministic layers alone.
struct DownModel;

#[async_trait]
impl StructuredExtractor for DownModel {
    async fn extract(&self, _request: &ExtractionRequest) -> Result<ModelExtraction, LlmError> {
        Err(LlmError::Timeout)
    }
}

/// Model that replays a scripted sequence of extractions, then goes down.
struct ScriptedModel {
    responses: Mutex<VecDeque<ModelExtraction>>,
}

impl ScriptedModel {
    fn new(responses: Vec<ModelExtraction>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl StructuredExtractor for ScriptedModel {
    async fn extract(&self, _request: &ExtractionRequest) -> Result<ModelExtraction, LlmError> {
        self.responses
            .lock()
            .pop_front()
            .ok_or(LlmError::Timeout)
    }
}

fn model_extraction(intent: &str, data: &[(&str, serde_json::Value)]) -> ModelExtraction {
    ModelExtraction {
        intent: intent.to_string(),
        confidence: 0.95,
        extracted_data: data
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
        ..ModelExtraction::default()
    }
}

struct Harness {
    engine: ConversationEngine,
    store: Arc<MemorySessionStore>,
    hrms: Arc<SimulatedHrmsState>,
}

impl Harness {
    fn new(model: Arc<dyn StructuredExtractor>) -> Self {
        // RUST_LOG=debug cargo test -- --nocapture to watch a scenario
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let clock: Arc<ManualClock> = Arc::new(ManualClock::at_date(
            NaiveDate::from_ymd_opt(2025, 11, 10).unwrap(),
        ));
        let clock_dyn: Arc<dyn Clock> = clock;
        let settings = SessionSettings::default();
        let store = Arc::new(MemorySessionStore::new(settings.ttl(), clock_dyn.clone()));
        let hrms = Arc::new(SimulatedHrmsState::new());
        let executor = Arc::new(simulated_registry(hrms.clone()));

        let engine = ConversationEngine::new(
            Arc::new(DomainConfig::default()),
            store.clone(),
            model,
            executor,
            clock_dyn,
            &settings,
        );

        Self {
            engine,
            store,
            hrms,
        }
    }

    async fn turn(&self, session: &str, utterance: &str) -> TurnReply {
        match self.engine.process_turn("240611", Some(session), utterance).await {
            TurnOutcome::Reply(reply) => reply,
            TurnOutcome::Delegated { .. } => panic!("unexpected delegation for '{}'", utterance),
        }
    }

    async fn session_state(&self, session: &str) -> Option<hr_agent_core::ConversationState> {
        self.store
            .load(&SessionKey::new("240611", session))
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn test_four_turn_leave_conversation_with_model_down() {
    let harness = Harness::new(Arc::new(DownModel));

    // Turn 1: intent resolved by keywords, first question asks the leave type
    let reply = harness.turn("sess1", "apply leave").await;
    assert!(reply.response.contains("What type of leave"));
    assert!(reply.response.contains("Sick Leave"));
    assert_eq!(reply.session_id, "sess1");

    // Turn 2: bare answer is fuzzy-matched against reference data
    let reply = harness.turn("sess1", "sick").await;
    assert!(reply.response.contains("From which date"));

    // Turn 3: date without a year rolls forward past 2025-11-10
    let reply = harness.turn("sess1", "6 nov").await;
    assert!(reply.response.contains("reason"));
    let state = harness.session_state("sess1").await.unwrap();
    assert_eq!(state.slots.get("from_date").unwrap(), "2026-11-06");
    assert_eq!(state.slots.get("leave_type").unwrap(), "Sick Leave");

    // Turn 4: whole message becomes the reason; 1 day <= threshold, so the
    // action auto-executes and the session is cleared
    let reply = harness.turn("sess1", "health issues").await;
    assert!(reply.response.contains("Leave applied successfully"));

    let applied = harness.hrms.applied();
    let (tool, args) = applied
        .iter()
        .find(|(tool, _)| tool.as_str() == "apply_leave")
        .expect("apply_leave was invoked");
    assert_eq!(tool.as_str(), "apply_leave");
    assert_eq!(args["leave_type_name"], "Sick Leave");
    assert_eq!(args["from_date"], "2026-11-06");
    assert_eq!(args["reasons"], "health issues");
    assert!(args.get("requires_approval").is_none());

    assert!(harness.session_state("sess1").await.is_none());
}

#[tokio::test]
async fn test_one_shot_leave_via_model_extraction() {
    let harness = Harness::new(Arc::new(ScriptedModel::new(vec![model_extraction(
        "apply_leave",
        &[
            ("leave_type", json!("Sick Leave")),
            ("from_date", json!("2025-11-20")),
            ("to_date", json!("2025-11-22")),
            ("reason", json!("fever")),
        ],
    )])));

    let reply = harness
        .turn("sess1", "apply sick leave from 20 to 22 nov, fever")
        .await;
    assert!(reply.response.contains("Leave applied successfully"));
    assert!(reply.response.contains("3 days"));
    assert!(harness.session_state("sess1").await.is_none());
}

#[tokio::test]
async fn test_approval_boundary_above_threshold() {
    // 4 days with threshold 3: submitted pending manager approval
    let harness = Harness::new(Arc::new(ScriptedModel::new(vec![model_extraction(
        "apply_leave",
        &[
            ("leave_type", json!("Earned Leave")),
            ("from_date", json!("2025-11-20")),
            ("to_date", json!("2025-11-23")),
            ("reason", json!("travel")),
        ],
    )])));

    let reply = harness.turn("sess1", "need 4 days off for travel").await;
    assert!(reply.response.contains("manager"));
    assert!(!reply.response.contains("applied successfully"));

    let applied = harness.hrms.applied();
    let (_, args) = applied
        .iter()
        .find(|(tool, _)| tool.as_str() == "apply_leave")
        .expect("request was still submitted");
    assert_eq!(args["requires_approval"], json!(true));
}

#[tokio::test]
async fn test_insufficient_balance_suggests_alternatives() {
    // Casual Leave balance is 2.0 in the simulated back end; ask for 3 days
    let harness = Harness::new(Arc::new(ScriptedModel::new(vec![model_extraction(
        "apply_leave",
        &[
            ("leave_type", json!("Casual Leave")),
            ("from_date", json!("2025-11-20")),
            ("to_date", json!("2025-11-22")),
            ("reason", json!("family function")),
        ],
    )])));

    let reply = harness.turn("sess1", "3 days casual leave for a function").await;
    assert!(reply.response.contains("not enough"));
    assert!(reply.response.contains("Sick Leave"));

    // No execution happened and the collected slots survive
    assert!(harness
        .hrms
        .applied()
        .iter()
        .all(|(tool, _)| tool.as_str() != "apply_leave"));
    let state = harness.session_state("sess1").await.unwrap();
    assert_eq!(state.slots.get("leave_type").unwrap(), "Casual Leave");
}

#[tokio::test]
async fn test_executor_failure_preserves_state_for_retry() {
    let harness = Harness::new(Arc::new(DownModel));
    harness.hrms.fail_tool("apply_leave", "HRMS maintenance window");

    harness.turn("sess1", "apply leave").await;
    harness.turn("sess1", "sick").await;
    harness.turn("sess1", "6 nov").await;
    let reply = harness.turn("sess1", "health issues").await;

    // The failure reaches the user, and nothing is lost
    assert!(reply.response.contains("HRMS maintenance window"));
    let state = harness.session_state("sess1").await.unwrap();
    assert_eq!(state.slots.get("reason").unwrap(), "health issues");

    // Back end recovers; a nudge re-validates and executes without re-asking
    harness.hrms.clear_failures();
    let reply = harness.turn("sess1", "please try again").await;
    assert!(reply.response.contains("Leave applied successfully"));
    assert!(harness.session_state("sess1").await.is_none());
}

#[tokio::test]
async fn test_onduty_flow_always_pending_approval() {
    let harness = Harness::new(Arc::new(DownModel));

    let reply = harness.turn("sess1", "apply on duty").await;
    assert!(reply.response.contains("For which date"));

    // In-flow force-selection keeps the intent even though "tomorrow"
    // matches no on-duty keyword
    let reply = harness.turn("sess1", "tomorrow").await;
    assert!(reply.response.contains("time range"));

    let reply = harness.turn("sess1", "9am to 6pm").await;
    assert!(reply.response.contains("reason"));

    let reply = harness.turn("sess1", "client meeting").await;
    assert!(reply.response.contains("approval"));

    let applied = harness.hrms.applied();
    let (_, args) = applied
        .iter()
        .find(|(tool, _)| tool.as_str() == "apply_onduty")
        .expect("apply_onduty was invoked");
    assert_eq!(args["from_datetime"], "2025-11-11 09:00:00");
    assert_eq!(args["to_datetime"], "2025-11-11 18:00:00");
    assert_eq!(args["total_hours"], "09:00:00");
    assert_eq!(args["reason"], "client meeting");
    assert_eq!(args["requires_approval"], json!(true));
    assert!(harness.session_state("sess1").await.is_none());
}

#[tokio::test]
async fn test_time_range_answer_is_not_swallowed_as_reason() {
    let harness = Harness::new(Arc::new(DownModel));

    harness.turn("sess1", "regularize my attendance").await;
    harness.turn("sess1", "yesterday 9/11").await;
    let reply = harness.turn("sess1", "9am to 6pm").await;

    // The range filled the time slots, so the engine must still ask for the
    // reason instead of recording "9am to 6pm" as the reason
    assert!(reply.response.contains("reason"));
    let state = harness.session_state("sess1").await.unwrap();
    assert_eq!(state.slots.get("from_time").unwrap(), "09:00");
    assert!(state.slots.get("reason").is_none());
}

#[tokio::test]
async fn test_recent_regularization_auto_executes() {
    let harness = Harness::new(Arc::new(DownModel));

    harness.turn("sess1", "forgot to punch").await;
    harness.turn("sess1", "9/11 from 9am to 6pm").await;
    let reply = harness.turn("sess1", "badge left at home").await;

    assert!(reply.response.contains("regularization submitted"));
    let applied = harness.hrms.applied();
    let (_, args) = applied
        .iter()
        .find(|(tool, _)| tool.as_str() == "apply_regularization")
        .expect("apply_regularization was invoked");
    assert_eq!(args["date"], "2025-11-09");
    assert!(args.get("requires_approval").is_none());
}

#[tokio::test]
async fn test_simple_queries_answer_in_one_turn() {
    let harness = Harness::new(Arc::new(DownModel));

    let reply = harness.turn("sess1", "leave balance").await;
    assert!(reply.response.contains("Sick Leave"));
    assert!(reply.response.contains("6"));
    assert!(harness.session_state("sess1").await.is_none());

    let reply = harness.turn("sess2", "upcoming holidays").await;
    assert!(reply.response.contains("Diwali"));
}

#[tokio::test]
async fn test_salary_slip_returns_document_reference() {
    let harness = Harness::new(Arc::new(DownModel));

    let reply = harness.turn("sess1", "salary slip for last month").await;
    assert!(reply.response.contains("10/2025"));
    let document = reply.document.expect("document payload present");
    assert_eq!(document["reference"], "payslip-2025-10.pdf");
    assert!(harness.session_state("sess1").await.is_none());
}

#[tokio::test]
async fn test_unknown_message_asks_clarification_without_state() {
    let harness = Harness::new(Arc::new(DownModel));

    let reply = harness.turn("sess1", "qwerty asdf").await;
    assert!(reply.response.contains("didn't understand"));
    assert!(harness.session_state("sess1").await.is_none());
}

#[tokio::test]
async fn test_policy_question_is_delegated() {
    let harness = Harness::new(Arc::new(DownModel));

    let outcome = harness
        .engine
        .process_turn("240611", Some("sess1"), "what is the leave policy")
        .await;
    assert!(matches!(outcome, TurnOutcome::Delegated { .. }));
    assert!(harness.session_state("sess1").await.is_none());
}

#[tokio::test]
async fn test_intent_switch_resets_accumulated_slots() {
    let harness = Harness::new(Arc::new(DownModel));

    harness.turn("sess1", "apply leave").await;
    harness.turn("sess1", "sick").await;

    // Explicit switch mid-conversation: balance answers immediately and the
    // stale leave slots do not survive
    let reply = harness.turn("sess1", "what is my leave balance").await;
    assert!(reply.response.contains("current leave balance"));
    assert!(harness.session_state("sess1").await.is_none());
}

#[tokio::test]
async fn test_concurrent_disjoint_turns_preserve_both_fields() {
    let harness = Arc::new(Harness::new(Arc::new(DownModel)));

    harness.turn("sess1", "apply leave").await;

    let a = {
        let harness = harness.clone();
        tokio::spawn(async move { harness.turn("sess1", "sick").await })
    };
    let b = {
        let harness = harness.clone();
        tokio::spawn(async move { harness.turn("sess1", "6 nov").await })
    };
    a.await.unwrap();
    b.await.unwrap();

    // Whichever turn wrote last, the union of both contributions must be in
    // the session record
    let state = harness.session_state("sess1").await.unwrap();
    assert_eq!(state.slots.get("leave_type").unwrap(), "Sick Leave");
    assert_eq!(state.slots.get("from_date").unwrap(), "2026-11-06");
}

#[tokio::test]
async fn test_session_expiry_forgets_conversation() {
    let clock = Arc::new(ManualClock::at_date(
        NaiveDate::from_ymd_opt(2025, 11, 10).unwrap(),
    ));
    let clock_dyn: Arc<dyn Clock> = clock.clone();
    let settings = SessionSettings::default();
    let store = Arc::new(MemorySessionStore::new(settings.ttl(), clock_dyn.clone()));
    let hrms = Arc::new(SimulatedHrmsState::new());
    let engine = ConversationEngine::new(
        Arc::new(DomainConfig::default()),
        store.clone(),
        Arc::new(DownModel),
        Arc::new(simulated_registry(hrms)),
        clock_dyn,
        &settings,
    );

    let reply = match engine.process_turn("240611", Some("sess1"), "apply leave").await {
        TurnOutcome::Reply(reply) => reply,
        other => panic!("unexpected outcome {:?}", other),
    };
    assert!(reply.response.contains("What type of leave"));

    clock.advance(chrono::Duration::minutes(31));
    assert!(store
        .load(&SessionKey::new("240611", "sess1"))
        .await
        .unwrap()
        .is_none());
}
