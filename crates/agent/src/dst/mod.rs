//! Dialogue state tracking
//!
//! The extractor turns one utterance plus prior conversation state into an
//! `ExtractionResult`: resolved intent, merged slot values, ordered missing
//! fields, and the single next clarifying question. Layering, in strict
//! precedence order:
//!
//! 1. keyword prefilter (ordered trigger table; in-flow intents are
//!    force-selected to prevent mid-conversation drift)
//! 2. structured model extraction (advisory; may fail or return garbage)
//! 3. deterministic regex backstop for time ranges
//! 4. whole-message-as-reason fallback
//! 5. date-without-year inference
//!
//! Readiness is always recomputed from the merged slot set against the
//! intent's configured required list; the model's own readiness claim is
//! never trusted.

mod extractor;

pub use extractor::{ExtractionResult, IntentExtractor};
