use thiserror::Error;

/// Failure taxonomy for the advisory core.
///
/// Only `BadRequest` and `RateLimited` short-circuit a request; every other
/// variant is recovered locally and surfaces, at most, as an entry in the
/// orchestrator result's `agent_errors`.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("query text is required")]
    BadRequest,

    #[error("rate limit exceeded, retry in {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: i64 },

    #[error("upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("learning store unavailable: {0}")]
    StorageUnavailable(String),

    #[error("{agent} agent failed: {message}")]
    AgentFailure { agent: &'static str, message: String },

    #[error("orchestrator failure: {0}")]
    OrchestratorFailure(String),
}

/// Internal agent error, captured into `agent_errors` by the orchestrator.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct AgentError(pub String);

impl AgentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
