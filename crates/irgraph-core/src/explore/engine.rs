use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{ExpansionDecider, ExplorationState, ExploreError};
use crate::config::ExplorationConfig;
use crate::decision::ExpandDecision;
use crate::graph::GraphStore;
use crate::subgraph::{Subgraph, SubgraphBuilder};

/// What happened in one decide/expand round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: usize,
    /// URIs expanded this round, after validation.
    pub requested: Vec<String>,
    /// URIs the decider named that were not current leaves.
    pub rejected: Vec<String>,
    pub nodes_added: usize,
    pub relationships_added: usize,
    /// Decider output as received, before validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<ExpandDecision>,
}

/// Final result of an exploration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorationOutcome {
    pub subgraph: Subgraph,
    pub state: ExplorationState,
    pub rounds: usize,
    pub seeds: Vec<String>,
    pub unresolved_labels: Vec<String>,
    pub history: Vec<RoundRecord>,
}

/// Bounded decide/expand loop over a working subgraph.
///
/// Drive it with [`run`](Self::run), or step by step with
/// [`seed`](Self::seed) and [`step`](Self::step) to stop between rounds.
pub struct ExpansionLoop<'g, D: ExpansionDecider> {
    builder: SubgraphBuilder<'g>,
    decider: D,
    config: ExplorationConfig,
    state: ExplorationState,
    subgraph: Subgraph,
    incident: String,
    round: usize,
    previous: Option<BTreeSet<String>>,
    seeds: Vec<String>,
    unresolved: Vec<String>,
    history: Vec<RoundRecord>,
}

impl<'g, D: ExpansionDecider> ExpansionLoop<'g, D> {
    pub fn new(store: &'g dyn GraphStore, decider: D, config: ExplorationConfig) -> Self {
        let builder = SubgraphBuilder::new(store).with_neighbor_limit(config.neighbor_limit);
        Self {
            builder,
            decider,
            config,
            state: ExplorationState::Seeding,
            subgraph: Subgraph::new(),
            incident: String::new(),
            round: 0,
            previous: None,
            seeds: Vec::new(),
            unresolved: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> ExplorationState {
        self.state
    }

    pub fn subgraph(&self) -> &Subgraph {
        &self.subgraph
    }

    /// Rounds started so far.
    pub fn rounds(&self) -> usize {
        self.round
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    /// Builds the initial subgraph from `seed_labels`.
    pub async fn seed(&mut self, seed_labels: &[String], incident: &str) -> Result<(), ExploreError> {
        if self.state != ExplorationState::Seeding {
            return Err(ExploreError::InvalidTransition {
                state: self.state,
                action: "seed",
            });
        }

        let report = self
            .builder
            .build_initial(seed_labels, self.config.initial_depth)
            .await?;

        if report.all_unresolved() {
            tracing::warn!(labels = ?seed_labels, "no seed label resolved, continuing with an empty subgraph");
        }

        tracing::info!(
            nodes = report.subgraph.node_count(),
            relationships = report.subgraph.relationship_count(),
            unresolved = report.unresolved.len(),
            "initial subgraph built"
        );

        self.subgraph = report.subgraph;
        self.seeds = report.seeds;
        self.unresolved = report.unresolved;
        self.incident = incident.to_string();
        self.state = ExplorationState::Deciding;
        Ok(())
    }

    /// Runs one decide/expand round and returns the resulting state.
    pub async fn step(&mut self) -> Result<ExplorationState, ExploreError> {
        if self.state != ExplorationState::Deciding {
            return Err(ExploreError::InvalidTransition {
                state: self.state,
                action: "step",
            });
        }

        if self.round >= self.config.max_rounds {
            tracing::info!(rounds = self.round, "round cap reached");
            self.state = ExplorationState::Exhausted;
            return Ok(self.state);
        }
        self.round += 1;
        let round = self.round;

        let leaves = self.subgraph.leaf_set();
        if leaves.is_empty() {
            tracing::info!(round, "no leaf nodes to offer, converged");
            self.history.push(RoundRecord {
                round,
                ..RoundRecord::default()
            });
            self.state = ExplorationState::Converged;
            return Ok(self.state);
        }

        let decision = self
            .decider
            .decide(&self.subgraph.view(), &self.incident)
            .await?;

        let raw = decision.clone();
        let (decision, rejected) = if self.config.validate_decisions {
            decision.partition(&leaves)
        } else {
            (decision, Vec::new())
        };
        for request in &rejected {
            tracing::warn!(round, uri = %request.node_uri, "requested node is not a leaf, dropped");
        }
        let rejected: Vec<String> = rejected.into_iter().map(|r| r.node_uri).collect();

        let requested = decision.uri_set();
        if requested.is_empty() {
            tracing::info!(round, "decider requested no expansion, converged");
            self.history.push(RoundRecord {
                round,
                rejected,
                decision: Some(raw),
                ..RoundRecord::default()
            });
            self.state = ExplorationState::Converged;
            return Ok(self.state);
        }

        self.state = ExplorationState::Expanding;
        let frontier: Vec<String> = requested.iter().cloned().collect();
        let addition = self
            .builder
            .expand_subgraph(&self.subgraph, &frontier, self.config.hops_per_round)
            .await?;
        let stats = self.subgraph.merge(addition);

        tracing::info!(
            round,
            expanded = frontier.len(),
            nodes_added = stats.nodes_added,
            relationships_added = stats.relationships_added,
            total_nodes = self.subgraph.node_count(),
            "expansion round done"
        );

        self.history.push(RoundRecord {
            round,
            requested: frontier,
            rejected,
            nodes_added: stats.nodes_added,
            relationships_added: stats.relationships_added,
            decision: Some(raw),
        });

        if self.previous.as_ref() == Some(&requested) {
            tracing::info!(round, "same nodes requested twice in a row, converged");
            self.state = ExplorationState::Converged;
        } else {
            self.state = ExplorationState::Deciding;
        }
        self.previous = Some(requested);

        Ok(self.state)
    }

    /// Seeds and steps until a terminal state.
    pub async fn run(
        mut self,
        seed_labels: &[String],
        incident: &str,
    ) -> Result<ExplorationOutcome, ExploreError> {
        self.seed(seed_labels, incident).await?;
        while !self.state.is_terminal() {
            self.step().await?;
        }
        tracing::info!(state = %self.state, rounds = self.round, "exploration finished");
        Ok(self.into_outcome())
    }

    /// Stops here and hands back the subgraph as it stands.
    pub fn into_outcome(self) -> ExplorationOutcome {
        ExplorationOutcome {
            subgraph: self.subgraph,
            state: self.state,
            rounds: self.round,
            seeds: self.seeds,
            unresolved_labels: self.unresolved,
            history: self.history,
        }
    }
}
