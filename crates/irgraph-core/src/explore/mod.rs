//! The bounded, decider-guided expansion loop.
//!
//! A run seeds a subgraph from planner labels, then alternates between
//! asking an [`ExpansionDecider`] which leaf nodes to grow and expanding
//! them by one round of hops. It stops when the decider asks for nothing,
//! asks for the same nodes twice in a row, or the round cap is hit.

mod decider;
mod engine;
mod error;
mod state;

pub use decider::{ExpansionDecider, LlmExplorer};
pub use engine::{ExpansionLoop, ExplorationOutcome, RoundRecord};
pub use error::ExploreError;
pub use state::ExplorationState;
