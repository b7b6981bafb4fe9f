//! Run Research use case
//!
//! Drives one research run through the four stages in fixed order. Each
//! stage builds its prompt from the state so far, calls the service through
//! the retry executor, validates the response (or substitutes the fallback)
//! and hands its record to the next stage. The first stage whose service
//! call fails for good halts the run.

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::retry::{RetryExecutor, RetryObserver};
use foodtruck_domain::util::preview;
use foodtruck_domain::{
    AgentResponse, DomainError, ErrorClassification, FailureDescriptor, Location, Model,
    ResearchState, Stage, StagePrompt,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that keep a research run from starting.
///
/// Stage failures are not errors here: they end the run in a failed
/// [`PipelineOutcome`].
#[derive(Error, Debug)]
pub enum RunResearchError {
    #[error("Location must not be empty")]
    EmptyLocation,

    #[error("Pipeline state error: {0}")]
    State(#[from] DomainError),
}

/// Input for the RunResearch use case
#[derive(Debug, Clone)]
pub struct RunResearchInput {
    /// Where to research opening a food truck
    pub location: String,
    /// Model every stage talks to
    pub model: Model,
}

impl RunResearchInput {
    pub fn new(location: impl Into<String>, model: Model) -> Self {
        Self {
            location: location.into(),
            model,
        }
    }
}

/// Terminal result of a research run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    state: ResearchState,
    responses: Vec<AgentResponse>,
}

impl PipelineOutcome {
    pub fn state(&self) -> &ResearchState {
        &self.state
    }

    pub fn into_state(self) -> ResearchState {
        self.state
    }

    /// One response per stage that ran, in order
    pub fn responses(&self) -> &[AgentResponse] {
        &self.responses
    }

    pub fn is_success(&self) -> bool {
        self.state.failure().is_none() && self.state.is_terminal()
    }

    pub fn failure(&self) -> Option<&FailureDescriptor> {
        self.state.failure()
    }

    /// Stages whose record came from the fallback generator
    pub fn degraded_stages(&self) -> Vec<Stage> {
        self.responses
            .iter()
            .filter(|r| r.is_degraded())
            .map(|r| r.stage())
            .collect()
    }
}

/// Forwards backoff waits of one stage to the progress notifier
struct StageRetryObserver<'a> {
    stage: Stage,
    progress: &'a dyn ProgressNotifier,
}

impl RetryObserver for StageRetryObserver<'_> {
    fn on_attempt(&self, attempt: u32, max_attempts: u32) {
        debug!(
            "{}: attempt {}/{}",
            self.stage.display_name(),
            attempt,
            max_attempts
        );
    }

    fn on_backoff(&self, attempt: u32, delay: Duration, error: &str) {
        self.progress.on_retry(self.stage, attempt, delay, error);
    }

    fn on_give_up(&self, attempts: u32, classification: ErrorClassification, error: &str) {
        debug!(
            "{}: giving up after {} attempt(s) ({}): {}",
            self.stage.display_name(),
            attempts,
            classification,
            error
        );
    }
}

/// Use case for running the food truck research pipeline
pub struct RunResearchUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    params: ExecutionParams,
    retry: RetryExecutor,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> RunResearchUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        let params = ExecutionParams::default();
        Self {
            gateway,
            retry: RetryExecutor::new(params.retry.clone()),
            params,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Set retry and logging parameters
    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.retry = RetryExecutor::new(params.retry.clone());
        self.params = params;
        self
    }

    /// Set a transcript logger
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunResearchInput,
    ) -> Result<PipelineOutcome, RunResearchError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunResearchInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<PipelineOutcome, RunResearchError> {
        let location =
            Location::try_new(&input.location).ok_or(RunResearchError::EmptyLocation)?;
        let mut state = ResearchState::new(location);
        state.begin()?;

        info!("Starting food truck research for {}", state.location());
        progress.on_pipeline_start(state.location());

        let mut responses = Vec::with_capacity(Stage::ALL.len());

        for stage in Stage::ALL {
            state.start_stage(stage)?;
            info!(
                "Stage {}/{}: {}",
                stage.position(),
                Stage::ALL.len(),
                stage.display_name()
            );
            progress.on_stage_start(stage);
            self.conversation_logger.log(ConversationEvent::for_stage(
                "stage_started",
                stage,
                serde_json::json!({
                    "location": state.location().as_str(),
                    "model": input.model.to_string(),
                }),
            ));

            let response = self
                .execute_stage(stage, &state, &input.model, progress)
                .await;

            match response.data() {
                Some(record) => {
                    state.record(record.clone())?;
                    info!("{} completed for {}", stage.activity(), state.location());
                    progress.on_stage_complete(stage, response.is_degraded());
                    self.conversation_logger.log(ConversationEvent::for_stage(
                        "stage_completed",
                        stage,
                        serde_json::json!({
                            "degraded": response.is_degraded(),
                            "record": record,
                        }),
                    ));
                }
                None => {
                    let reason = response
                        .error_details()
                        .unwrap_or(response.message())
                        .to_string();
                    error!("{} failed: {}", stage.display_name(), reason);
                    state.fail(stage, reason.clone())?;
                    progress.on_stage_failed(stage, &reason);
                    self.conversation_logger.log(ConversationEvent::for_stage(
                        "stage_failed",
                        stage,
                        serde_json::json!({ "reason": reason }),
                    ));
                }
            }

            responses.push(response);
            if state.is_terminal() {
                break;
            }
        }

        let outcome = PipelineOutcome { state, responses };

        self.conversation_logger.log(ConversationEvent::new(
            "pipeline_completed",
            serde_json::json!({
                "location": outcome.state.location().as_str(),
                "status": outcome.state.status().as_str(),
                "completed_stages": outcome
                    .state
                    .completed_stages()
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>(),
                "degraded_stages": outcome
                    .degraded_stages()
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>(),
            }),
        ));
        progress.on_pipeline_complete(&outcome.state);

        Ok(outcome)
    }

    /// Run one stage: prompt, call with retries, validate or fall back.
    async fn execute_stage(
        &self,
        stage: Stage,
        state: &ResearchState,
        model: &Model,
        progress: &dyn ProgressNotifier,
    ) -> AgentResponse {
        let prompt = stage.build_prompt(state);
        debug!(
            "{} prompt: {} system bytes, {} user bytes",
            stage.display_name(),
            prompt.system.len(),
            prompt.user.len()
        );

        let gateway: &G = &self.gateway;
        let prompt_ref = &prompt;
        let observer = StageRetryObserver { stage, progress };

        let raw = match self
            .retry
            .wrap(move || Self::invoke(gateway, model, prompt_ref))
            .with_observer(&observer)
            .call()
            .await
        {
            Ok(raw) => raw,
            Err(e) => return AgentResponse::error(stage, e.to_string()),
        };

        debug!(
            "{} response: {}",
            stage.display_name(),
            preview(&raw, self.params.response_preview_bytes)
        );
        self.conversation_logger.log(ConversationEvent::for_stage(
            "llm_response",
            stage,
            serde_json::json!({
                "model": model.to_string(),
                "bytes": raw.len(),
                "response": raw,
            }),
        ));

        match stage.parse_and_validate(&raw) {
            Ok(record) => AgentResponse::success(record),
            Err(failure) => {
                warn!(
                    "{} response failed validation, using fallback data: {}",
                    stage.display_name(),
                    failure
                );
                progress.on_validation_fallback(stage, &failure);
                self.conversation_logger.log(ConversationEvent::for_stage(
                    "validation_fallback",
                    stage,
                    serde_json::json!({ "reason": failure.to_string() }),
                ));
                AgentResponse::fallback(stage.fallback(state), &failure)
            }
        }
    }

    /// One attempt: open a session with the stage's system prompt and send
    /// the user prompt
    async fn invoke(
        gateway: &G,
        model: &Model,
        prompt: &StagePrompt,
    ) -> Result<String, GatewayError> {
        let session = gateway
            .create_session_with_system_prompt(model, &prompt.system)
            .await?;
        session.send(&prompt.user).await
    }
}
