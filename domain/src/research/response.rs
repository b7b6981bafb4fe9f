//! Stage execution result envelope

use crate::research::records::StageRecord;
use crate::research::stage::Stage;
use serde::Serialize;

/// Whether a stage produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Result of executing one stage.
///
/// Built only through [`AgentResponse::success`], [`AgentResponse::fallback`]
/// and [`AgentResponse::error`], so `data` is present exactly when the
/// status is success and `error_details` exactly when it is error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentResponse {
    stage: Stage,
    status: ResponseStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<StageRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_details: Option<String>,
    next_stage: Option<Stage>,
    degraded: bool,
}

impl AgentResponse {
    /// A record validated from the service response
    pub fn success(record: StageRecord) -> Self {
        let stage = record.stage();
        Self {
            stage,
            status: ResponseStatus::Success,
            message: format!("{} completed successfully", stage.activity()),
            data: Some(record),
            error_details: None,
            next_stage: stage.next(),
            degraded: false,
        }
    }

    /// A fallback record substituted after validation failed
    pub fn fallback(record: StageRecord, validation_error: impl std::fmt::Display) -> Self {
        let stage = record.stage();
        Self {
            stage,
            status: ResponseStatus::Success,
            message: format!(
                "{} completed with fallback data ({})",
                stage.activity(),
                validation_error
            ),
            data: Some(record),
            error_details: None,
            next_stage: stage.next(),
            degraded: true,
        }
    }

    /// The service call failed for good
    pub fn error(stage: Stage, details: impl Into<String>) -> Self {
        Self {
            stage,
            status: ResponseStatus::Error,
            message: format!("Failed to complete {}", stage.activity().to_lowercase()),
            data: None,
            error_details: Some(details.into()),
            next_stage: stage.next(),
            degraded: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn status(&self) -> ResponseStatus {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> Option<&StageRecord> {
        self.data.as_ref()
    }

    pub fn error_details(&self) -> Option<&str> {
        self.error_details.as_deref()
    }

    pub fn next_stage(&self) -> Option<Stage> {
        self.next_stage
    }

    /// True when the record came from the fallback generator
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Consume the envelope, yielding the record or the error details
    pub fn into_result(self) -> Result<StageRecord, String> {
        match (self.data, self.error_details) {
            (Some(record), _) => Ok(record),
            (None, Some(details)) => Err(details),
            (None, None) => Err(self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::location::Location;
    use crate::research::state::ResearchState;

    fn market_record() -> StageRecord {
        let state = ResearchState::new(Location::try_new("Austin, TX").unwrap());
        Stage::MarketResearch.fallback(&state)
    }

    #[test]
    fn test_success_carries_data_only() {
        let response = AgentResponse::success(market_record());
        assert!(response.is_success());
        assert!(response.data().is_some());
        assert!(response.error_details().is_none());
        assert_eq!(response.next_stage(), Some(Stage::FinancialAdvisor));
        assert!(!response.is_degraded());
    }

    #[test]
    fn test_fallback_is_degraded_success() {
        let response = AgentResponse::fallback(market_record(), "no JSON");
        assert!(response.is_success());
        assert!(response.is_degraded());
        assert!(response.message().contains("fallback"));
        assert!(response.into_result().is_ok());
    }

    #[test]
    fn test_error_carries_details_only() {
        let response = AgentResponse::error(Stage::BusinessSynthesis, "HTTP 401 unauthorized");
        assert!(!response.is_success());
        assert!(response.data().is_none());
        assert_eq!(response.error_details(), Some("HTTP 401 unauthorized"));
        assert_eq!(response.next_stage(), None);
        assert_eq!(
            response.into_result().unwrap_err(),
            "HTTP 401 unauthorized"
        );
    }

    #[test]
    fn test_serializes_status() {
        let response = AgentResponse::error(Stage::MarketResearch, "boom");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["stage"], "market_research");
        assert!(json.get("data").is_none());
    }
}
