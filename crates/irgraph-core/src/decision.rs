//! Typed payloads returned by the model at each stage of a run.
//!
//! Raw responses are decoded with [`extract_as`](crate::extract::extract_as)
//! straight into these records, so nothing downstream handles loose JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::extract::{self, ExtractError};

/// One step of the planner's exploration plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub step: u32,
    pub description: String,
}

/// Planner output: the seed labels to start exploring from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedDecision {
    /// The planner's restatement of the incident as a search query.
    #[serde(default)]
    pub query: String,
    pub initial_nodes: Vec<String>,
    #[serde(default)]
    pub exploration_plan: Vec<PlanStep>,
}

impl SeedDecision {
    /// Decision built from caller-supplied labels, skipping the planner.
    pub fn from_labels(labels: Vec<String>) -> Self {
        Self {
            query: String::new(),
            initial_nodes: labels,
            exploration_plan: Vec::new(),
        }
    }

    pub fn parse(response: &str) -> Result<Self, ExtractError> {
        let mut decision: SeedDecision = extract::extract_as(response)?;
        decision.initial_nodes = decision
            .initial_nodes
            .into_iter()
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .collect();
        Ok(decision)
    }
}

/// A single node the explorer wants expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandRequest {
    pub node_uri: String,
    /// Free-text rationale, kept for the trace only.
    #[serde(default)]
    pub reason: String,
}

/// Explorer output for one round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandDecision {
    pub nodes_to_expand: Vec<ExpandRequest>,
}

impl ExpandDecision {
    pub fn new(requests: Vec<ExpandRequest>) -> Self {
        Self {
            nodes_to_expand: requests,
        }
    }

    /// Decision requesting `uris` with no rationale.
    pub fn of<I, S>(uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            uris.into_iter()
                .map(|uri| ExpandRequest {
                    node_uri: uri.into(),
                    reason: String::new(),
                })
                .collect(),
        )
    }

    pub fn parse(response: &str) -> Result<Self, ExtractError> {
        extract::extract_as(response)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes_to_expand.is_empty()
    }

    /// Requested URIs as a set.
    pub fn uri_set(&self) -> BTreeSet<String> {
        self.nodes_to_expand
            .iter()
            .map(|r| r.node_uri.clone())
            .collect()
    }

    /// Splits the requests into those naming a URI in `allowed` and the rest.
    pub fn partition(self, allowed: &BTreeSet<String>) -> (ExpandDecision, Vec<ExpandRequest>) {
        let (kept, rejected): (Vec<_>, Vec<_>) = self
            .nodes_to_expand
            .into_iter()
            .partition(|r| allowed.contains(&r.node_uri));
        (ExpandDecision::new(kept), rejected)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentSummary {
    pub overview: String,
    pub technical_classification: String,
    pub severity_assessment: String,
    pub potential_impact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceCommand {
    pub description: String,
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCommand {
    pub tool: String,
    pub usage: String,
    pub example: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestigationSteps {
    pub triage_steps: String,
    pub evidence_collection: Vec<EvidenceCommand>,
    pub technical_analysis: String,
    pub tools_and_commands: Vec<ToolCommand>,
    pub indicators_of_compromise: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainmentProcedures {
    pub immediate_actions: String,
    pub system_isolation: String,
    pub malicious_activity_blocking: String,
    pub evidence_preservation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EradicationSteps {
    pub threat_removal: String,
    pub vulnerability_fix: String,
    pub lateral_movement_check: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryProcedures {
    pub system_restoration: String,
    pub integrity_validation: String,
    pub return_to_operations: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonsLearned {
    pub preventive_recommendations: String,
    pub security_improvements: String,
    pub policy_updates: String,
}

/// The incident-response playbook synthesized from the final subgraph.
///
/// Sections the model leaves out decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playbook {
    pub incident_summary: IncidentSummary,
    pub investigation_steps: InvestigationSteps,
    pub containment_procedures: ContainmentProcedures,
    pub eradication_steps: EradicationSteps,
    pub recovery_procedures: RecoveryProcedures,
    pub lessons_learned_and_prevention: LessonsLearned,
}

impl Playbook {
    pub fn parse(response: &str) -> Result<Self, ExtractError> {
        extract::extract_as(response)
    }
}

/// Any model decision, tagged by the stage that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    Seed(SeedDecision),
    Expand(ExpandDecision),
    Playbook(Box<Playbook>),
}

impl Decision {
    pub fn kind(&self) -> &'static str {
        match self {
            Decision::Seed(_) => "seed",
            Decision::Expand(_) => "expand",
            Decision::Playbook(_) => "playbook",
        }
    }
}
