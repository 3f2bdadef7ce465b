mod error;
mod file;

pub use error::StorageError;
pub use file::FileRunStore;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

use crate::config::FINGERPRINT_LENGTH;
use crate::decision::{Decision, Playbook, SeedDecision};
use crate::explore::{ExplorationOutcome, ExplorationState, RoundRecord};
use crate::subgraph::Subgraph;

/// Identifies one persisted run of one incident.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunKey {
    /// Hex SHA-256 prefix of the incident text.
    pub fingerprint: String,
    /// Timestamp plus random suffix, sortable by start time.
    pub run_id: String,
}

impl RunKey {
    /// Key for a new run of `incident`.
    pub fn new(incident: &str) -> Self {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self {
            fingerprint: fingerprint(incident),
            run_id: format!("{}-{}", Utc::now().format("%Y%m%dT%H%M%SZ"), &suffix[..8]),
        }
    }

    pub fn existing(fingerprint: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            run_id: run_id.into(),
        }
    }
}

impl std::fmt::Display for RunKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.fingerprint, self.run_id)
    }
}

/// Stable short fingerprint of an incident text.
pub fn fingerprint(incident: &str) -> String {
    let digest = Sha256::digest(incident.trim().as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(FINGERPRINT_LENGTH);
    hex
}

/// Exploration trace without the subgraph, which is stored on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorationTrace {
    pub state: ExplorationState,
    pub rounds: usize,
    pub seeds: Vec<String>,
    pub unresolved_labels: Vec<String>,
    pub history: Vec<RoundRecord>,
    pub node_count: usize,
    pub relationship_count: usize,
}

impl From<&ExplorationOutcome> for ExplorationTrace {
    fn from(outcome: &ExplorationOutcome) -> Self {
        Self {
            state: outcome.state,
            rounds: outcome.rounds,
            seeds: outcome.seeds.clone(),
            unresolved_labels: outcome.unresolved_labels.clone(),
            history: outcome.history.clone(),
            node_count: outcome.subgraph.node_count(),
            relationship_count: outcome.subgraph.relationship_count(),
        }
    }
}

/// Trait for run storage backends.
///
/// A run only persists once its stages complete; a failed run leaves
/// whatever earlier stages already wrote.
pub trait RunStore {
    /// Saves the planner decision.
    fn save_seed(&self, key: &RunKey, seed: &SeedDecision) -> Result<PathBuf, StorageError>;

    /// Saves the final subgraph and the exploration trace.
    fn save_exploration(
        &self,
        key: &RunKey,
        outcome: &ExplorationOutcome,
    ) -> Result<PathBuf, StorageError>;

    /// Saves the synthesized playbook.
    fn save_playbook(&self, key: &RunKey, playbook: &Playbook) -> Result<PathBuf, StorageError>;

    /// Saves the ordered log of model decisions.
    fn save_decisions(&self, key: &RunKey, decisions: &[Decision]) -> Result<PathBuf, StorageError>;

    /// Loads the persisted decision log of a run.
    fn load_decisions(&self, key: &RunKey) -> Result<Vec<Decision>, StorageError>;

    /// Loads the persisted subgraph of a run.
    fn load_subgraph(&self, key: &RunKey) -> Result<Subgraph, StorageError>;

    /// Loads the persisted exploration trace of a run.
    fn load_trace(&self, key: &RunKey) -> Result<ExplorationTrace, StorageError>;

    /// Run ids recorded for an incident, oldest first.
    fn list_runs(&self, fingerprint: &str) -> Result<Vec<String>, StorageError>;
}
