use serde::{Deserialize, Serialize};

/// Where an exploration currently stands.
///
/// ```text
/// Seeding → Deciding → Expanding → (Deciding | Converged | Exhausted)
/// ```
///
/// `Seeding` is only ever the initial state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplorationState {
    /// Resolving seed labels and building the initial subgraph
    #[default]
    Seeding,
    /// Waiting for the decider to pick leaf nodes
    Deciding,
    /// Expanding the chosen nodes by one round of hops
    Expanding,
    /// Nothing left worth expanding
    Converged,
    /// Round cap reached
    Exhausted,
}

impl ExplorationState {
    /// Returns true if the loop stops in this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExplorationState::Converged | ExplorationState::Exhausted)
    }

    /// Returns a human-readable name for the state.
    pub fn display_name(&self) -> &'static str {
        match self {
            ExplorationState::Seeding => "Seeding",
            ExplorationState::Deciding => "Deciding",
            ExplorationState::Expanding => "Expanding",
            ExplorationState::Converged => "Converged",
            ExplorationState::Exhausted => "Exhausted",
        }
    }
}

impl std::fmt::Display for ExplorationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
