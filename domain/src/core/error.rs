//! Domain error types

use crate::research::stage::Stage;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("{stage} cannot run before {missing} has completed")]
    StageOutOfOrder { stage: Stage, missing: Stage },

    #[error("{0} has already produced a record")]
    StageAlreadyRecorded(Stage),

    #[error("Research run is already {0}")]
    AlreadyTerminal(&'static str),
}

impl DomainError {
    /// Check if this error was caused by an attempt to mutate a finished run
    pub fn is_terminal_violation(&self) -> bool {
        matches!(self, DomainError::AlreadyTerminal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_order_display() {
        let error = DomainError::StageOutOfOrder {
            stage: Stage::OperationsConsultant,
            missing: Stage::FinancialAdvisor,
        };
        assert_eq!(
            error.to_string(),
            "Operations Consultant cannot run before Financial Advisor has completed"
        );
    }

    #[test]
    fn test_is_terminal_violation() {
        assert!(DomainError::AlreadyTerminal("succeeded").is_terminal_violation());
        assert!(!DomainError::InvalidLocation(String::new()).is_terminal_violation());
        assert!(!DomainError::StageAlreadyRecorded(Stage::MarketResearch).is_terminal_violation());
    }
}
