use thiserror::Error;

use super::ExplorationState;
use crate::extract::ExtractError;
use crate::graph::GraphError;
use crate::llm::LLMError;

/// Errors that end an exploration.
#[derive(Debug, Error)]
pub enum ExploreError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("LLM error: {0}")]
    LLM(#[from] LLMError),

    /// The decider's output could not be turned into a decision.
    #[error("Decision error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Failed to serialize subgraph for the decider: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The stepwise API was driven out of order.
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: ExplorationState,
        action: &'static str,
    },
}

impl ExploreError {
    /// Raw model output, when the failure came from parsing it.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            ExploreError::Extract(e) => Some(e.raw()),
            _ => None,
        }
    }
}
