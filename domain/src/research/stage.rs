//! Pipeline stages
//!
//! The research pipeline is a closed set of four stages that always run in
//! the same order. Each [`Stage`] bundles the pure half of its contract:
//! prompt construction, response validation and the fallback record. The
//! side-effecting half (calling the text-generation service) lives in the
//! application layer.

use crate::prompt::{PromptTemplate, StagePrompt};
use crate::research::context::{comprehensive_context, format_context};
use crate::research::fallback;
use crate::research::records::{
    FinancialAnalysis, MarketAnalysis, OperationsAnalysis, Recommendation, StageRecord,
};
use crate::research::state::ResearchState;
use crate::research::validation::{ValidationFailure, parse_record};
use serde::{Deserialize, Serialize};

/// One ordered step of the research pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Competition, customers and demand
    MarketResearch,
    /// Costs, revenue and profitability
    FinancialAdvisor,
    /// Permits, staffing and logistics
    OperationsConsultant,
    /// Go / no-go synthesis of everything above
    BusinessSynthesis,
}

impl Stage {
    /// All stages in execution order
    pub const ALL: [Stage; 4] = [
        Stage::MarketResearch,
        Stage::FinancialAdvisor,
        Stage::OperationsConsultant,
        Stage::BusinessSynthesis,
    ];

    pub fn first() -> Stage {
        Stage::MarketResearch
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::MarketResearch => "market_research",
            Stage::FinancialAdvisor => "financial_advisor",
            Stage::OperationsConsultant => "operations_consultant",
            Stage::BusinessSynthesis => "business_synthesis",
        }
    }

    /// Name of the role the model plays in this stage
    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::MarketResearch => "Market Research Analyst",
            Stage::FinancialAdvisor => "Financial Advisor",
            Stage::OperationsConsultant => "Operations Consultant",
            Stage::BusinessSynthesis => "Business Consultant",
        }
    }

    /// Human-readable name of the work this stage produces
    pub fn activity(&self) -> &'static str {
        match self {
            Stage::MarketResearch => "Market Research",
            Stage::FinancialAdvisor => "Financial Analysis",
            Stage::OperationsConsultant => "Operations Analysis",
            Stage::BusinessSynthesis => "Business Recommendation",
        }
    }

    /// 1-based position in the pipeline
    pub fn position(&self) -> usize {
        match self {
            Stage::MarketResearch => 1,
            Stage::FinancialAdvisor => 2,
            Stage::OperationsConsultant => 3,
            Stage::BusinessSynthesis => 4,
        }
    }

    /// The stage that runs after this one, or `None` for the last stage
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::MarketResearch => Some(Stage::FinancialAdvisor),
            Stage::FinancialAdvisor => Some(Stage::OperationsConsultant),
            Stage::OperationsConsultant => Some(Stage::BusinessSynthesis),
            Stage::BusinessSynthesis => None,
        }
    }

    /// The stage that must have completed before this one may run
    pub fn previous(&self) -> Option<Stage> {
        match self {
            Stage::MarketResearch => None,
            Stage::FinancialAdvisor => Some(Stage::MarketResearch),
            Stage::OperationsConsultant => Some(Stage::FinancialAdvisor),
            Stage::BusinessSynthesis => Some(Stage::OperationsConsultant),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    /// Build the instructions for this stage from whatever the state holds.
    ///
    /// Pure: identical states always produce identical prompts.
    pub fn build_prompt(&self, state: &ResearchState) -> StagePrompt {
        let location = state.location().as_str();
        match self {
            Stage::BusinessSynthesis => StagePrompt::new(
                PromptTemplate::system(*self),
                PromptTemplate::synthesis_prompt(location, &comprehensive_context(state)),
            ),
            _ => {
                let context = format_context(state);
                let context = (!context.is_empty()).then_some(context.as_str());
                StagePrompt::new(
                    PromptTemplate::system(*self),
                    PromptTemplate::analysis_prompt(location, context),
                )
            }
        }
    }

    /// Interpret raw service output as this stage's record.
    pub fn parse_and_validate(&self, raw: &str) -> Result<StageRecord, ValidationFailure> {
        Ok(match self {
            Stage::MarketResearch => StageRecord::Market(parse_record::<MarketAnalysis>(raw)?),
            Stage::FinancialAdvisor => {
                StageRecord::Financial(parse_record::<FinancialAnalysis>(raw)?)
            }
            Stage::OperationsConsultant => {
                StageRecord::Operations(parse_record::<OperationsAnalysis>(raw)?)
            }
            Stage::BusinessSynthesis => {
                StageRecord::Recommendation(parse_record::<Recommendation>(raw)?)
            }
        })
    }

    /// Deterministic, schema-valid substitute used when validation fails.
    pub fn fallback(&self, state: &ResearchState) -> StageRecord {
        match self {
            Stage::MarketResearch => StageRecord::Market(fallback::market_analysis(state.location())),
            Stage::FinancialAdvisor => StageRecord::Financial(fallback::financial_analysis()),
            Stage::OperationsConsultant => {
                StageRecord::Operations(fallback::operations_analysis())
            }
            Stage::BusinessSynthesis => {
                StageRecord::Recommendation(fallback::recommendation(state))
            }
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::location::Location;
    use crate::research::records::{Level, RecommendationKind};

    fn austin() -> ResearchState {
        ResearchState::new(Location::try_new("Austin, TX").unwrap())
    }

    #[test]
    fn test_order_is_fixed() {
        let mut walked = vec![Stage::first()];
        while let Some(next) = walked.last().and_then(|s| s.next()) {
            walked.push(next);
        }
        assert_eq!(walked, Stage::ALL.to_vec());
        for pair in Stage::ALL.windows(2) {
            assert_eq!(pair[1].previous(), Some(pair[0]));
            assert!(pair[0] < pair[1]);
        }
        assert!(Stage::BusinessSynthesis.is_terminal());
    }

    #[test]
    fn test_positions() {
        let positions: Vec<usize> = Stage::ALL.iter().map(|s| s.position()).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_build_prompt_without_context() {
        let prompt = Stage::MarketResearch.build_prompt(&austin());
        assert!(prompt.user.contains("Austin, TX"));
        assert!(!prompt.user.contains("Context from previous analysis"));
        assert!(prompt.system.contains("\"competition_level\""));
    }

    #[test]
    fn test_build_prompt_is_deterministic() {
        let mut state = austin();
        state
            .record(Stage::MarketResearch.fallback(&state))
            .unwrap();
        for stage in Stage::ALL {
            assert_eq!(stage.build_prompt(&state), stage.build_prompt(&state));
        }
    }

    #[test]
    fn test_build_prompt_includes_prior_records() {
        let mut state = austin();
        state
            .record(Stage::MarketResearch.fallback(&state))
            .unwrap();
        let prompt = Stage::FinancialAdvisor.build_prompt(&state);
        assert!(prompt.user.contains("Context from previous analysis"));
        assert!(prompt.user.contains("Competition Level: Medium"));
    }

    #[test]
    fn test_synthesis_prompt_uses_comprehensive_context() {
        let mut state = austin();
        for stage in &Stage::ALL[..3] {
            let record = stage.fallback(&state);
            state.record(record).unwrap();
        }
        let prompt = Stage::BusinessSynthesis.build_prompt(&state);
        assert!(prompt.user.contains("=== MARKET RESEARCH ANALYSIS ==="));
        assert!(prompt.user.contains("=== OPERATIONS ANALYSIS ==="));
        assert!(prompt.user.contains("go/no_go/conditional"));
    }

    #[test]
    fn test_parse_and_validate_rejects_garbage() {
        for stage in Stage::ALL {
            assert!(stage.parse_and_validate("Sorry, I cannot help with that.").is_err());
        }
    }

    #[test]
    fn test_fallback_round_trips_through_validation() {
        let mut state = austin();
        for stage in Stage::ALL {
            let record = stage.fallback(&state);
            assert_eq!(record.stage(), stage);
            let raw = serde_json::to_string(&record.to_json()).unwrap();
            let reparsed = stage.parse_and_validate(&raw).unwrap();
            assert_eq!(reparsed, record);
            state.record(record).unwrap();
        }
    }

    #[test]
    fn test_synthesis_keeps_verdict_without_alternatives() {
        let raw = r#"{
            "recommendation": "go",
            "confidence_level": "High",
            "key_strengths": ["Busy downtown lunch crowd"],
            "key_risks": ["Summer heat"],
            "success_factors": ["Fast service"],
            "next_steps": ["Apply for a mobile vending permit"],
            "timeline_recommendation": "Launch in 4 months",
            "alternative_suggestions": []
        }"#;

        let record = Stage::BusinessSynthesis.parse_and_validate(raw).unwrap();
        let StageRecord::Recommendation(recommendation) = record else {
            panic!("expected a recommendation record");
        };
        assert_eq!(recommendation.recommendation, RecommendationKind::Go);
        assert_eq!(recommendation.confidence_level, Level::High);
        assert!(recommendation.alternative_suggestions.is_empty());
    }
}
