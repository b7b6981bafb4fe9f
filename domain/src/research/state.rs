//! Research state - the accumulator one pipeline run owns.
//!
//! ```text
//!  NotStarted ──▶ Running(Market) ──▶ Running(Financial) ──▶ Running(Operations)
//!                      │                    │                      │
//!                      ▼                    ▼                      ▼
//!                   Failed               Failed                 Failed
//!
//!  Running(Operations) ──▶ Running(Synthesis) ──▶ Succeeded
//!                               │
//!                               ▼
//!                            Failed
//! ```
//!
//! Every mutation is checked: records arrive in stage order and only once,
//! at most one failure is recorded, and nothing changes after the run is
//! terminal.

use crate::core::error::DomainError;
use crate::core::location::Location;
use crate::research::records::{
    FinancialAnalysis, MarketAnalysis, OperationsAnalysis, Recommendation, StageRecord,
};
use crate::research::stage::Stage;
use serde::Serialize;

/// Coarse run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl PipelineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStatus::Pending => "pending",
            PipelineStatus::Running => "running",
            PipelineStatus::Succeeded => "succeeded",
            PipelineStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStatus::Succeeded | PipelineStatus::Failed)
    }
}

impl std::fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which stage halted the run, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureDescriptor {
    pub stage: Stage,
    pub reason: String,
}

/// Position of a run in the pipeline state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelinePhase {
    NotStarted,
    Running(Stage),
    Succeeded,
    Failed(FailureDescriptor),
}

impl PipelinePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelinePhase::Succeeded | PipelinePhase::Failed(_))
    }
}

/// Accumulated results of one research run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearchState {
    location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    market_research: Option<MarketAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    financial_analysis: Option<FinancialAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    operations_analysis: Option<OperationsAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    business_recommendation: Option<Recommendation>,
    messages: Vec<String>,
    status: PipelineStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<FailureDescriptor>,
}

impl ResearchState {
    /// A fresh run that carries only its location
    pub fn new(location: Location) -> Self {
        Self {
            location,
            market_research: None,
            financial_analysis: None,
            operations_analysis: None,
            business_recommendation: None,
            messages: Vec::new(),
            status: PipelineStatus::Pending,
            current_stage: None,
            failure: None,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn market(&self) -> Option<&MarketAnalysis> {
        self.market_research.as_ref()
    }

    pub fn financial(&self) -> Option<&FinancialAnalysis> {
        self.financial_analysis.as_ref()
    }

    pub fn operations(&self) -> Option<&OperationsAnalysis> {
        self.operations_analysis.as_ref()
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        self.business_recommendation.as_ref()
    }

    /// Progress messages in the order they were appended
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn status(&self) -> PipelineStatus {
        self.status
    }

    pub fn failure(&self) -> Option<&FailureDescriptor> {
        self.failure.as_ref()
    }

    pub fn current_stage(&self) -> Option<Stage> {
        self.current_stage
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn has_record(&self, stage: Stage) -> bool {
        match stage {
            Stage::MarketResearch => self.market_research.is_some(),
            Stage::FinancialAdvisor => self.financial_analysis.is_some(),
            Stage::OperationsConsultant => self.operations_analysis.is_some(),
            Stage::BusinessSynthesis => self.business_recommendation.is_some(),
        }
    }

    /// Stages that have produced a record, in stage order
    pub fn completed_stages(&self) -> Vec<Stage> {
        Stage::ALL
            .into_iter()
            .filter(|stage| self.has_record(*stage))
            .collect()
    }

    /// The first stage that has not produced a record yet
    pub fn next_pending_stage(&self) -> Option<Stage> {
        Stage::ALL.into_iter().find(|stage| !self.has_record(*stage))
    }

    /// Where the run sits in the pipeline state machine
    pub fn phase(&self) -> PipelinePhase {
        match self.status {
            PipelineStatus::Pending => PipelinePhase::NotStarted,
            PipelineStatus::Running => match self.current_stage.or_else(|| self.next_pending_stage())
            {
                Some(stage) => PipelinePhase::Running(stage),
                None => PipelinePhase::Succeeded,
            },
            PipelineStatus::Succeeded => PipelinePhase::Succeeded,
            PipelineStatus::Failed => match &self.failure {
                Some(failure) => PipelinePhase::Failed(failure.clone()),
                None => PipelinePhase::Failed(FailureDescriptor {
                    stage: self.current_stage.unwrap_or(Stage::first()),
                    reason: String::new(),
                }),
            },
        }
    }

    fn ensure_open(&self) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::AlreadyTerminal(self.status.as_str()));
        }
        Ok(())
    }

    fn ensure_next(&self, stage: Stage) -> Result<(), DomainError> {
        if self.has_record(stage) {
            return Err(DomainError::StageAlreadyRecorded(stage));
        }
        if let Some(previous) = stage.previous()
            && !self.has_record(previous)
        {
            return Err(DomainError::StageOutOfOrder {
                stage,
                missing: previous,
            });
        }
        Ok(())
    }

    /// Leave `NotStarted` and log the start of the run
    pub fn begin(&mut self) -> Result<(), DomainError> {
        self.ensure_open()?;
        if self.status == PipelineStatus::Running {
            return Ok(());
        }
        self.status = PipelineStatus::Running;
        self.messages
            .push(format!("Starting food truck research for {}", self.location));
        Ok(())
    }

    /// Mark `stage` as the one currently executing
    pub fn start_stage(&mut self, stage: Stage) -> Result<(), DomainError> {
        self.ensure_open()?;
        self.ensure_next(stage)?;
        self.status = PipelineStatus::Running;
        self.current_stage = Some(stage);
        Ok(())
    }

    /// Store a stage's record.
    ///
    /// Logs "<activity> completed for <location>". The run succeeds once the
    /// last stage's record is stored.
    pub fn record(&mut self, record: StageRecord) -> Result<(), DomainError> {
        self.ensure_open()?;
        let stage = record.stage();
        self.ensure_next(stage)?;

        match record {
            StageRecord::Market(r) => self.market_research = Some(r),
            StageRecord::Financial(r) => self.financial_analysis = Some(r),
            StageRecord::Operations(r) => self.operations_analysis = Some(r),
            StageRecord::Recommendation(r) => self.business_recommendation = Some(r),
        }
        self.current_stage = None;
        self.messages.push(format!(
            "{} completed for {}",
            stage.activity(),
            self.location
        ));
        self.status = if stage.is_terminal() {
            PipelineStatus::Succeeded
        } else {
            PipelineStatus::Running
        };
        Ok(())
    }

    /// Halt the run at `stage`. Only the first failure is ever recorded.
    pub fn fail(&mut self, stage: Stage, reason: impl Into<String>) -> Result<(), DomainError> {
        self.ensure_open()?;
        let reason = reason.into();
        self.messages
            .push(format!("{} failed: {}", stage.activity(), reason));
        self.failure = Some(FailureDescriptor { stage, reason });
        self.current_stage = None;
        self.status = PipelineStatus::Failed;
        Ok(())
    }
}
