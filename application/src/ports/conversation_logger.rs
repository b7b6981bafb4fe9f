//! Port for structured transcript logging.
//!
//! Defines the [`ConversationLogger`] trait for recording what happened
//! during a research run (stage starts, raw service responses, fallbacks,
//! failures) to a structured log.
//!
//! This is separate from `tracing`: tracing carries human-readable
//! diagnostics, while this port captures the transcript in a
//! machine-readable format (JSONL).

use foodtruck_domain::Stage;
use serde_json::Value;

/// A structured transcript event.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. Adapters add the timestamp when writing.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEvent {
    /// Event type identifier (e.g., "stage_started", "llm_response").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    /// An event about one stage. `stage` is merged into an object payload.
    pub fn for_stage(event_type: &'static str, stage: Stage, payload: Value) -> Self {
        let payload = match payload {
            Value::Object(mut map) => {
                map.insert("stage".to_string(), Value::String(stage.as_str().to_string()));
                Value::Object(map)
            }
            Value::Null => serde_json::json!({ "stage": stage.as_str() }),
            other => serde_json::json!({ "stage": stage.as_str(), "data": other }),
        };
        Self::new(event_type, payload)
    }
}

/// Port for logging transcript events.
///
/// Implementations write each event as a single record (e.g., one JSONL
/// line). `log` is synchronous and infallible; write failures are dropped
/// so the pipeline never stops because of its transcript.
pub trait ConversationLogger: Send + Sync {
    /// Record a transcript event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_stage_merges_into_object() {
        let event = ConversationEvent::for_stage(
            "llm_response",
            Stage::FinancialAdvisor,
            serde_json::json!({ "bytes": 42 }),
        );
        assert_eq!(event.payload["stage"], "financial_advisor");
        assert_eq!(event.payload["bytes"], 42);
    }

    #[test]
    fn test_for_stage_wraps_non_objects() {
        let event = ConversationEvent::for_stage("stage_started", Stage::MarketResearch, Value::Null);
        assert_eq!(event.payload, serde_json::json!({ "stage": "market_research" }));

        let event =
            ConversationEvent::for_stage("stage_failed", Stage::MarketResearch, Value::from("boom"));
        assert_eq!(event.payload["data"], "boom");
    }
}
