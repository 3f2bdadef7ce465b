//! One incident-response run: plan, explore, synthesize.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ExplorationConfig;
use crate::decision::{Decision, Playbook, SeedDecision};
use crate::explore::{ExpansionLoop, ExplorationOutcome, ExploreError, LlmExplorer};
use crate::extract::ExtractError;
use crate::graph::GraphStore;
use crate::llm::{LLMError, LLM};
use crate::prompts::{
    build_planner_prompt, build_playbook_prompt, Example, PLANNER_SYSTEM_PROMPT,
    PLAYBOOK_SYSTEM_PROMPT,
};
use crate::storage::{RunKey, RunStore, StorageError};
use crate::subgraph::Subgraph;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("LLM error: {0}")]
    LLM(#[from] LLMError),

    #[error("Unusable model response: {0}")]
    Extract(#[from] ExtractError),

    #[error("Exploration failed: {0}")]
    Explore(#[from] ExploreError),

    #[error("Failed to serialize subgraph for the prompt: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Per-run choices.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Use these labels instead of asking the planner.
    pub seed_labels: Option<Vec<String>>,
    /// Ask for a playbook once exploration ends.
    pub synthesize_playbook: bool,
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub key: RunKey,
    pub seed: SeedDecision,
    pub exploration: ExplorationOutcome,
    pub playbook: Option<Playbook>,
}

impl RunReport {
    /// Every model decision of the run in the order it was made.
    pub fn decisions(&self) -> Vec<Decision> {
        let mut log = vec![Decision::Seed(self.seed.clone())];
        log.extend(
            self.exploration
                .history
                .iter()
                .filter_map(|r| r.decision.clone())
                .map(Decision::Expand),
        );
        if let Some(playbook) = &self.playbook {
            log.push(Decision::Playbook(Box::new(playbook.clone())));
        }
        log
    }

    /// Writes every artifact of the run and returns its directory.
    pub fn persist(&self, store: &dyn RunStore) -> Result<PathBuf, StorageError> {
        store.save_seed(&self.key, &self.seed)?;
        let dir = store.save_exploration(&self.key, &self.exploration)?;
        if let Some(playbook) = &self.playbook {
            store.save_playbook(&self.key, playbook)?;
        }
        store.save_decisions(&self.key, &self.decisions())?;
        Ok(dir)
    }
}

/// Few-shot examples for each model stage.
#[derive(Debug, Clone, Default)]
pub struct StageExamples {
    pub planner: Vec<Example>,
    pub explorer: Vec<Example>,
    pub playbook: Vec<Example>,
}

/// Runs the model stages of one incident against a graph store.
///
/// The store handle is borrowed for the whole run; each run should own its
/// own handle so concurrent runs never share a connection lifecycle.
pub struct IncidentRun<'g, L: LLM> {
    llm: L,
    store: &'g dyn GraphStore,
    config: ExplorationConfig,
    examples: StageExamples,
}

impl<'g, L: LLM> IncidentRun<'g, L> {
    pub fn new(llm: L, store: &'g dyn GraphStore, config: ExplorationConfig) -> Self {
        Self {
            llm,
            store,
            config,
            examples: StageExamples::default(),
        }
    }

    pub fn with_examples(mut self, examples: StageExamples) -> Self {
        self.examples = examples;
        self
    }

    /// Runs all stages for `incident`.
    pub async fn execute(&self, incident: &str, options: RunOptions) -> Result<RunReport, RunError> {
        let key = RunKey::new(incident);
        tracing::info!(run = %key, model = self.llm.model(), "starting run");

        let seed = match options.seed_labels {
            Some(labels) => {
                tracing::info!(labels = ?labels, "using supplied seed labels");
                SeedDecision::from_labels(labels)
            }
            None => self.plan(incident).await?,
        };

        let exploration = self.explore(&seed, incident).await?;

        let playbook = if options.synthesize_playbook {
            Some(self.synthesize(incident, &exploration.subgraph).await?)
        } else {
            None
        };

        Ok(RunReport {
            key,
            seed,
            exploration,
            playbook,
        })
    }

    /// Asks the planner for seed labels.
    pub async fn plan(&self, incident: &str) -> Result<SeedDecision, RunError> {
        let prompt = build_planner_prompt(incident, &self.examples.planner);
        let response = self
            .llm
            .complete_with_system(PLANNER_SYSTEM_PROMPT, &prompt)
            .await?;
        let seed = SeedDecision::parse(&response)?;

        tracing::info!(labels = ?seed.initial_nodes, steps = seed.exploration_plan.len(), "planner chose seeds");
        Ok(seed)
    }

    /// Runs the expansion loop from the planner's labels.
    pub async fn explore(
        &self,
        seed: &SeedDecision,
        incident: &str,
    ) -> Result<ExplorationOutcome, RunError> {
        let explorer = LlmExplorer::new(&self.llm).with_examples(self.examples.explorer.clone());
        let outcome = ExpansionLoop::new(self.store, explorer, self.config.clone())
            .run(&seed.initial_nodes, incident)
            .await?;
        Ok(outcome)
    }

    /// Asks for a playbook grounded in `subgraph`.
    pub async fn synthesize(&self, incident: &str, subgraph: &Subgraph) -> Result<Playbook, RunError> {
        if subgraph.is_empty() {
            tracing::warn!("synthesizing playbook without ontology context");
        }
        let prompt = build_playbook_prompt(incident, &subgraph.view(), &self.examples.playbook)?;
        let response = self
            .llm
            .complete_with_system(PLAYBOOK_SYSTEM_PROMPT, &prompt)
            .await?;
        let playbook = Playbook::parse(&response)?;

        tracing::info!(
            iocs = playbook.investigation_steps.indicators_of_compromise.len(),
            "playbook synthesized"
        );
        Ok(playbook)
    }
}
