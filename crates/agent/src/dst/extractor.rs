//! Layered intent and slot extractor

use chrono::NaiveDate;
use hr_agent_config::DomainConfig;
use hr_agent_core::slots::keys;
use hr_agent_core::{merge, Clock, ConversationState, Intent, SlotMap};
use hr_agent_llm::{ExtractionRequest, ModelExtraction, StructuredExtractor};
use hr_agent_text_processing::{
    dates, fuzzy::match_leave_type, intent::KeywordIntentDetector, time::parse_time_range,
};
use std::sync::Arc;

/// Output of one extraction pass. `slots` is the merged view (prior plus
/// everything this utterance contributed); readiness and the next question
/// are recomputed deterministically from it.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub intent: Intent,
    pub confidence: f32,
    pub slots: SlotMap,
    pub missing: Vec<String>,
    pub next_question: Option<String>,
    pub ready: bool,
    /// The user explicitly switched to a different intent; prior slots were
    /// discarded rather than merged.
    pub intent_reset: bool,
}

/// Layered extractor: keyword prefilter, model extraction, deterministic
/// backstops.
pub struct IntentExtractor {
    domain: Arc<DomainConfig>,
    model: Arc<dyn StructuredExtractor>,
    detector: KeywordIntentDetector,
    clock: Arc<dyn Clock>,
}

impl IntentExtractor {
    pub fn new(
        domain: Arc<DomainConfig>,
        model: Arc<dyn StructuredExtractor>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let detector = KeywordIntentDetector::from_domain(&domain);
        Self {
            domain,
            model,
            detector,
            clock,
        }
    }

    /// Run one extraction pass against the utterance and prior state.
    ///
    /// Infallible by design: model failures degrade to the deterministic
    /// layers, and an utterance nothing can interpret comes back as
    /// `Intent::Unknown` with a clarification question.
    pub async fn extract(
        &self,
        utterance: &str,
        prior: &ConversationState,
        leave_types: &[String],
    ) -> ExtractionResult {
        let today = self.clock.today();
        let prior_active = prior.is_active();

        // Layer 1: keyword prefilter, with in-flow force-selection
        let keyword_intent = self.detector.detect(utterance);
        let forced = if prior_active && prior.intent.is_in_flow() {
            Some(prior.intent)
        } else {
            keyword_intent
        };

        // An explicit switch to a different intent resets accumulated slots
        let intent_reset =
            prior_active && forced.is_some_and(|f| f != prior.intent);
        let prior_slots = if intent_reset {
            SlotMap::new()
        } else {
            prior.slots.clone()
        };

        // Keyword-only intents never need the model or any slots
        if let Some(intent) = forced {
            if intent.is_simple_query() || intent == Intent::PolicyQuestion {
                return ExtractionResult {
                    intent,
                    confidence: 1.0,
                    slots: SlotMap::new(),
                    missing: Vec::new(),
                    next_question: None,
                    ready: true,
                    intent_reset,
                };
            }
        }

        // Layer 2: structured model extraction (advisory)
        let request = ExtractionRequest {
            utterance: utterance.to_string(),
            prior_slots: prior_slots.clone(),
            current_date: today,
            reference_leave_types: leave_types.to_vec(),
        };
        let model_out = match self.model.extract(&request).await {
            Ok(out) => Some(out),
            Err(err) => {
                tracing::warn!(error = %err, "Model extraction failed, using deterministic path");
                None
            }
        };

        let (intent, confidence) =
            self.resolve_intent(forced, prior_active, prior.intent, model_out.as_ref());

        if intent == Intent::Unknown {
            return ExtractionResult {
                intent: Intent::Unknown,
                confidence: 0.0,
                slots: prior_slots,
                missing: Vec::new(),
                next_question: Some(crate::responses::clarify_unknown()),
                ready: false,
                intent_reset,
            };
        }

        // Model slot candidates, normalized to canonical forms
        let mut new_slots = model_out
            .as_ref()
            .map(|m| m.slot_values())
            .unwrap_or_default();
        self.normalize_slots(intent, &mut new_slots, leave_types, today);

        // Layer 3: regex time backstop
        if intent.requires_time_range() {
            let has_times = |slots: &SlotMap| {
                slots.contains_key(keys::FROM_TIME) && slots.contains_key(keys::TO_TIME)
            };
            if !has_times(&new_slots) && !has_times(&prior_slots) {
                if let Some((from, to)) = parse_time_range(utterance) {
                    tracing::debug!(from = %from, to = %to, "Time range filled by regex backstop");
                    new_slots.insert(keys::FROM_TIME.to_string(), from);
                    new_slots.insert(keys::TO_TIME.to_string(), to);
                }
            }
        }

        let mut merged = merge(&prior_slots, &new_slots);

        // Layers 4-5 and intent-specific derivations from the raw message
        self.derive_missing(intent, &mut merged, &prior_slots, utterance, leave_types, today);

        // Readiness is recomputed from the merged set, never taken from the
        // model's claim
        let required = self.domain.required_slots(intent);
        let missing: Vec<String> = required
            .iter()
            .filter(|slot| !merged.contains_key(*slot))
            .cloned()
            .collect();
        let ready = missing.is_empty();
        let next_question = missing
            .first()
            .map(|slot| self.question_for(slot, leave_types));

        tracing::debug!(
            intent = %intent,
            ready,
            filled = merged.len(),
            missing = ?missing,
            "Extraction complete"
        );

        ExtractionResult {
            intent,
            confidence,
            slots: merged,
            missing,
            next_question,
            ready,
            intent_reset,
        }
    }

    /// Intent precedence: forced (in-flow or keyword) > active prior >
    /// model classification > unknown.
    fn resolve_intent(
        &self,
        forced: Option<Intent>,
        prior_active: bool,
        prior_intent: Intent,
        model_out: Option<&ModelExtraction>,
    ) -> (Intent, f32) {
        if let Some(intent) = forced {
            if let Some(out) = model_out {
                let model_intent = Intent::parse(&out.intent);
                if model_intent != intent && model_intent != Intent::Unknown {
                    tracing::warn!(
                        model = %model_intent,
                        forced = %intent,
                        "Model disagreed with prefilter, forcing intent"
                    );
                }
            }
            return (intent, 1.0);
        }

        // An active conversation stays on its intent when the new message
        // carries no keywords of its own (answers like "sick" or "6 nov").
        if prior_active {
            return (prior_intent, 1.0);
        }

        if let Some(out) = model_out {
            let intent = Intent::parse(&out.intent);
            if intent != Intent::Unknown && out.confidence >= self.domain.intents.min_confidence {
                return (intent, out.confidence);
            }
        }

        (Intent::Unknown, 0.0)
    }

    /// Canonicalize model-supplied values: leave types to reference names,
    /// date fields to `YYYY-MM-DD` (with year inference), attendance actions
    /// to `check_in`/`check_out`.
    fn normalize_slots(
        &self,
        intent: Intent,
        slots: &mut SlotMap,
        leave_types: &[String],
        today: NaiveDate,
    ) {
        if let Some(raw) = slots.get(keys::LEAVE_TYPE).cloned() {
            if !leave_types.contains(&raw) {
                if let Some(canonical) = match_leave_type(&raw, leave_types) {
                    slots.insert(keys::LEAVE_TYPE.to_string(), canonical);
                }
            }
        }

        let resolve = if intent == Intent::ApplyRegularization {
            dates::resolve_past_date
        } else {
            dates::resolve_date
        };
        for key in [keys::FROM_DATE, keys::TO_DATE, keys::DATE] {
            if let Some(raw) = slots.get(key).cloned() {
                if NaiveDate::parse_from_str(&raw, "%Y-%m-%d").is_err() {
                    match resolve(&raw, today) {
                        Some(date) => {
                            slots.insert(key.to_string(), date.to_string());
                        }
                        None => {
                            tracing::debug!(slot = key, value = %raw, "Dropping unparseable date");
                            slots.remove(key);
                        }
                    }
                }
            }
        }

        if intent == Intent::MarkAttendance {
            if let Some(raw) = slots.get(keys::ACTION).cloned() {
                let normalized = raw.to_lowercase().replace(['-', ' '], "_");
                if normalized.contains("out") {
                    slots.insert(keys::ACTION.to_string(), "check_out".to_string());
                } else if normalized.contains("in") {
                    slots.insert(keys::ACTION.to_string(), "check_in".to_string());
                }
            }
        }
    }

    /// Deterministic gap-filling from the raw utterance. Each rule fills only
    /// fields the intent requires and only when still missing, so model
    /// output always takes precedence.
    fn derive_missing(
        &self,
        intent: Intent,
        merged: &mut SlotMap,
        prior_slots: &SlotMap,
        utterance: &str,
        leave_types: &[String],
        today: NaiveDate,
    ) {
        let required = self.domain.required_slots(intent);
        let requires = |slot: &str| required.iter().any(|s| s == slot);

        if requires(keys::LEAVE_TYPE) && !merged.contains_key(keys::LEAVE_TYPE) {
            if let Some(canonical) = match_leave_type(utterance, leave_types) {
                merged.insert(keys::LEAVE_TYPE.to_string(), canonical);
            }
        }

        // Regularization is about a punch that already happened, so a
        // year-less date anchors to the past instead of rolling forward.
        let resolve = if intent == Intent::ApplyRegularization {
            dates::resolve_past_date
        } else {
            dates::resolve_date
        };
        for key in [keys::FROM_DATE, keys::DATE] {
            if requires(key) && !merged.contains_key(key) {
                if let Some(date) = resolve(utterance, today) {
                    merged.insert(key.to_string(), date.to_string());
                }
            }
        }

        // A single-date leave request spans one day
        if intent == Intent::ApplyLeave
            && merged.contains_key(keys::FROM_DATE)
            && !merged.contains_key(keys::TO_DATE)
        {
            let from = merged[keys::FROM_DATE].clone();
            merged.insert(keys::TO_DATE.to_string(), from);
        }

        if intent.requires_time_range()
            && (!merged.contains_key(keys::FROM_TIME) || !merged.contains_key(keys::TO_TIME))
        {
            if let Some((from, to)) = parse_time_range(utterance) {
                merged.insert(keys::FROM_TIME.to_string(), from);
                merged.insert(keys::TO_TIME.to_string(), to);
            }
        }

        if intent == Intent::MarkAttendance && !merged.contains_key(keys::ACTION) {
            let lower = utterance.to_lowercase();
            if lower.contains("out") {
                merged.insert(keys::ACTION.to_string(), "check_out".to_string());
            } else if lower.contains("in") {
                merged.insert(keys::ACTION.to_string(), "check_in".to_string());
            }
        }

        if intent == Intent::GetSalarySlip {
            let (month, year) = dates::resolve_salary_period(utterance, today);
            merged
                .entry(keys::MONTH.to_string())
                .or_insert_with(|| month.to_string());
            merged
                .entry(keys::YEAR.to_string())
                .or_insert_with(|| year.to_string());
        }

        // Whole-message-as-reason fallback: only when reason is the single
        // missing field AND this utterance contributed nothing else, so a
        // date or time answer is never swallowed as the reason.
        if requires(keys::REASON) && !merged.contains_key(keys::REASON) {
            let others_missing = required
                .iter()
                .any(|slot| slot != keys::REASON && !merged.contains_key(slot));
            let contributed_other = merged
                .iter()
                .any(|(k, v)| k != keys::REASON && prior_slots.get(k) != Some(v));
            let trimmed = utterance.trim();
            if !others_missing && !contributed_other && !trimmed.is_empty() {
                tracing::debug!(reason = %trimmed, "Using entire message as reason");
                merged.insert(keys::REASON.to_string(), trimmed.to_string());
            }
        }
    }

    /// Clarifying question for a slot; the leave-type question lists the
    /// valid choices.
    fn question_for(&self, slot: &str, leave_types: &[String]) -> String {
        let question = self.domain.question_for(slot);
        if slot == keys::LEAVE_TYPE && !leave_types.is_empty() {
            format!("{}\n\nAvailable: {}", question, leave_types.join(", "))
        } else {
            question
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hr_agent_core::ManualClock;
    use hr_agent_llm::LlmError;

    struct NoModel;

    #[async_trait]
    impl StructuredExtractor for NoModel {
        async fn extract(&self, _req: &ExtractionRequest) -> Result<ModelExtraction, LlmError> {
            Err(LlmError::Timeout)
        }
    }

    struct FixedModel(ModelExtraction);

    #[async_trait]
    impl StructuredExtractor for FixedModel {
        async fn extract(&self, _req: &ExtractionRequest) -> Result<ModelExtraction, LlmError> {
            Ok(self.0.clone())
        }
    }

    fn extractor(model: Arc<dyn StructuredExtractor>) -> IntentExtractor {
        let clock = Arc::new(ManualClock::at_date(
            NaiveDate::from_ymd_opt(2025, 11, 10).unwrap(),
        ));
        IntentExtractor::new(Arc::new(DomainConfig::default()), model, clock)
    }

    fn leave_types() -> Vec<String> {
        vec![
            "Sick Leave".to_string(),
            "Casual Leave".to_string(),
            "Earned Leave".to_string(),
        ]
    }

    fn state_with(intent: Intent, pairs: &[(&str, &str)]) -> ConversationState {
        let mut state = ConversationState::new(intent);
        state.slots = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        state
    }

    #[tokio::test]
    async fn test_in_flow_intent_forced_over_new_keywords() {
        let extractor = extractor(Arc::new(NoModel));
        let prior = state_with(Intent::ApplyOnDuty, &[("date", "2025-11-12")]);

        // "apply leave" would normally trigger apply_leave, but the on-duty
        // conversation is in flight
        let result = extractor
            .extract("apply leave please", &prior, &leave_types())
            .await;
        assert_eq!(result.intent, Intent::ApplyOnDuty);
        assert!(!result.intent_reset);
        assert_eq!(result.slots.get("date").unwrap(), "2025-11-12");
    }

    #[tokio::test]
    async fn test_model_readiness_claim_is_advisory() {
        let model = FixedModel(ModelExtraction {
            intent: "apply_leave".to_string(),
            confidence: 0.9,
            ready_to_execute: true, // wrong: nothing extracted
            ..ModelExtraction::default()
        });
        let extractor = extractor(Arc::new(model));

        let result = extractor
            .extract("apply leave", &ConversationState::default(), &leave_types())
            .await;
        assert!(!result.ready);
        assert_eq!(result.missing[0], "leave_type");
    }

    #[tokio::test]
    async fn test_empty_model_values_cannot_erase_prior_slots() {
        let model = FixedModel(ModelExtraction {
            intent: "apply_leave".to_string(),
            confidence: 0.9,
            extracted_data: [
                ("leave_type".to_string(), serde_json::Value::String(String::new())),
                ("from_date".to_string(), serde_json::Value::Null),
            ]
            .into_iter()
            .collect(),
            ..ModelExtraction::default()
        });
        let extractor = extractor(Arc::new(model));
        let prior = state_with(
            Intent::ApplyLeave,
            &[("leave_type", "Sick Leave"), ("from_date", "2025-11-20")],
        );

        let result = extractor.extract("hmm", &prior, &leave_types()).await;
        assert_eq!(result.slots.get("leave_type").unwrap(), "Sick Leave");
        assert_eq!(result.slots.get("from_date").unwrap(), "2025-11-20");
    }

    #[tokio::test]
    async fn test_prefilter_overrides_model_intent() {
        let model = FixedModel(ModelExtraction {
            intent: "apply_leave".to_string(),
            confidence: 0.9,
            ..ModelExtraction::default()
        });
        let extractor = extractor(Arc::new(model));

        let result = extractor
            .extract(
                "on duty tomorrow",
                &ConversationState::default(),
                &leave_types(),
            )
            .await;
        assert_eq!(result.intent, Intent::ApplyOnDuty);
    }

    #[tokio::test]
    async fn test_low_confidence_model_intent_is_ignored() {
        let model = FixedModel(ModelExtraction {
            intent: "apply_leave".to_string(),
            confidence: 0.1,
            ..ModelExtraction::default()
        });
        let extractor = extractor(Arc::new(model));

        let result = extractor
            .extract("hello there", &ConversationState::default(), &leave_types())
            .await;
        assert_eq!(result.intent, Intent::Unknown);
        assert!(result.next_question.is_some());
    }

    #[tokio::test]
    async fn test_time_backstop_fills_missing_range() {
        let extractor = extractor(Arc::new(NoModel));
        let prior = state_with(Intent::ApplyRegularization, &[("date", "2025-11-09")]);

        let result = extractor.extract("9am to 6pm", &prior, &leave_types()).await;
        assert_eq!(result.slots.get("from_time").unwrap(), "09:00");
        assert_eq!(result.slots.get("to_time").unwrap(), "18:00");
        assert_eq!(result.missing, vec!["reason".to_string()]);
    }

    #[tokio::test]
    async fn test_whole_message_becomes_reason_when_only_reason_missing() {
        let extractor = extractor(Arc::new(NoModel));
        let prior = state_with(
            Intent::ApplyRegularization,
            &[
                ("date", "2025-11-09"),
                ("from_time", "09:00"),
                ("to_time", "18:00"),
            ],
        );

        let result = extractor
            .extract("not feeling well", &prior, &leave_types())
            .await;
        assert!(result.ready);
        assert_eq!(result.slots.get("reason").unwrap(), "not feeling well");
    }

    #[tokio::test]
    async fn test_keyword_switch_resets_slots() {
        let extractor = extractor(Arc::new(NoModel));
        let prior = state_with(Intent::ApplyLeave, &[("leave_type", "Sick Leave")]);

        let result = extractor
            .extract("upcoming holidays", &prior, &leave_types())
            .await;
        assert_eq!(result.intent, Intent::GetHolidays);
        assert!(result.intent_reset);
        assert!(result.slots.is_empty());
    }
}
