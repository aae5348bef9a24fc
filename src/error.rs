//! Error types for the stock orchestrator

use thiserror::Error;

/// Result type alias for orchestrator operations
pub type Result<T> = std::result::Result<T, OrchestrationError>;

#[derive(Error, Debug)]
pub enum OrchestrationError {

    // =============================
    // Expert Agent Failures
    // =============================

    /// The expert agent could not be reached at all: connection refused,
    /// DNS failure, or timeout. Maps to 503 at the API surface.
    #[error("Expert agent '{agent}' unavailable: {detail}")]
    AgentUnavailable { agent: String, detail: String },

    /// The expert agent was reachable but answered with a non-success
    /// status. The original status and body are kept for diagnostics.
    #[error("Expert agent '{agent}' returned {status}: {detail}")]
    AgentFailed {
        agent: String,
        status: u16,
        detail: String,
    },

    /// The expert agent answered 2xx but the body was not the JSON shape
    /// the orchestrator expects.
    #[error("Invalid response from expert agent '{agent}': {detail}")]
    InvalidAgentResponse { agent: String, detail: String },

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl OrchestrationError {
    /// True when the failure means the collaborator could not be reached,
    /// as opposed to having answered with an error.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, OrchestrationError::AgentUnavailable { .. })
    }
}
