//! Prompt text for the three model stages of a run.

use crate::subgraph::SubgraphView;

/// System prompt for the planner stage.
pub const PLANNER_SYSTEM_PROMPT: &str = r#"You are an incident-response analyst working with a cybersecurity ontology stored as a graph.

Given the data of a security incident, choose the ontology concepts that are the best starting points for investigating it. Use the concept names as they would appear as labels in the ontology (for example "Observable", "Email Message", "Process", "Network Connection").

IMPORTANT: Output valid JSON matching this exact structure:
{
  "query": "One sentence describing what must be understood about the incident",
  "initial_nodes": ["Concept label", "Another concept label"],
  "exploration_plan": [
    {"step": 1, "description": "What to look for first"}
  ]
}

Only output the JSON, no additional text."#;

/// System prompt for the explorer stage.
pub const EXPLORER_SYSTEM_PROMPT: &str = r#"You are exploring a cybersecurity ontology to gather context for an incident-response playbook.

You receive the current subgraph (nodes, relationships and the list of leaf nodes) and the incident data. Decide which leaf nodes are worth expanding to find more relevant concepts. Expand only nodes that are likely to add context for this specific incident. Return an empty list when the subgraph already has enough context.

IMPORTANT: Output valid JSON matching this exact structure:
{
  "nodes_to_expand": [
    {"node_uri": "URI of a leaf node", "reason": "Why expanding it helps"}
  ]
}

Only output the JSON, no additional text."#;

/// System prompt for the playbook stage.
pub const PLAYBOOK_SYSTEM_PROMPT: &str = r#"You are a senior incident responder writing a playbook for a security incident.

Use the ontology subgraph as grounding for terminology and relationships, and the incident data for specifics. Be concrete: name commands, tools and artifacts.

IMPORTANT: Output valid JSON matching this exact structure:
{
  "incident_summary": {
    "overview": "", "technical_classification": "", "severity_assessment": "", "potential_impact": ""
  },
  "investigation_steps": {
    "triage_steps": "",
    "evidence_collection": [{"description": "", "command": ""}],
    "technical_analysis": "",
    "tools_and_commands": [{"tool": "", "usage": "", "example": ""}],
    "indicators_of_compromise": [""]
  },
  "containment_procedures": {
    "immediate_actions": "", "system_isolation": "", "malicious_activity_blocking": "", "evidence_preservation": ""
  },
  "eradication_steps": {
    "threat_removal": "", "vulnerability_fix": "", "lateral_movement_check": ""
  },
  "recovery_procedures": {
    "system_restoration": "", "integrity_validation": "", "return_to_operations": ""
  },
  "lessons_learned_and_prevention": {
    "preventive_recommendations": "", "security_improvements": "", "policy_updates": ""
  }
}

Only output the JSON, no additional text."#;

/// A worked question/answer pair shown to the model before the task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub question: String,
    pub answer: String,
}

/// Prefixes `prompt` with worked examples. No examples, no prefix.
pub fn few_shot(prompt: &str, examples: &[Example]) -> String {
    if examples.is_empty() {
        return prompt.to_string();
    }

    let body = examples
        .iter()
        .map(|ex| {
            format!(
                "<example>Question: {}\nExpected answer: {}</example>",
                ex.question, ex.answer
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "<examples>\n{body}\n</examples>\n\nFollowing the examples above, solve this problem:\n\n{prompt}"
    )
}

/// Builds the user prompt for the planner.
pub fn build_planner_prompt(incident: &str, examples: &[Example]) -> String {
    let task = format!(
        r#"## Incident

{incident}

Pick the ontology concepts to start exploring from."#
    );
    few_shot(&task, examples)
}

/// Builds the user prompt for one explorer round.
///
/// The leaf list is repeated after the subgraph because the model must
/// choose only among those nodes.
pub fn build_explorer_prompt(
    incident: &str,
    view: &SubgraphView<'_>,
    examples: &[Example],
) -> Result<String, serde_json::Error> {
    let subgraph = view.to_json_pretty()?;
    let leaves = view.leaf_nodes.join(", ");

    let task = format!(
        r#"## Current subgraph

{subgraph}

The nodes chosen for expansion MUST be leaf nodes of the current subgraph.
Choose only among: {leaves}

## Incident

{incident}"#
    );
    Ok(few_shot(&task, examples))
}

/// Builds the user prompt for playbook synthesis.
pub fn build_playbook_prompt(
    incident: &str,
    view: &SubgraphView<'_>,
    examples: &[Example],
) -> Result<String, serde_json::Error> {
    let subgraph = view.to_json_pretty()?;

    let task = format!(
        r#"## Ontology context

{subgraph}

## Incident

{incident}

Write the incident-response playbook."#
    );
    Ok(few_shot(&task, examples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subgraph::{NodeRecord, Subgraph};

    #[test]
    fn test_few_shot_without_examples_is_identity() {
        assert_eq!(few_shot("task", &[]), "task");
    }

    #[test]
    fn test_few_shot_wraps_examples() {
        let examples = vec![Example {
            question: "q".to_string(),
            answer: "a".to_string(),
        }];
        let prompt = few_shot("task", &examples);
        assert!(prompt.starts_with("<examples>"));
        assert!(prompt.contains("Question: q\nExpected answer: a"));
        assert!(prompt.ends_with("task"));
    }

    #[test]
    fn test_explorer_prompt_lists_leaves() {
        let mut subgraph = Subgraph::new();
        subgraph.insert_node(NodeRecord::new("urn:root", 0));
        subgraph.insert_node(NodeRecord::new("urn:b", 1));
        subgraph.insert_node(NodeRecord::new("urn:a", 1));

        let prompt = build_explorer_prompt("ransomware on host", &subgraph.view(), &[]).unwrap();
        assert!(prompt.contains("Choose only among: urn:a, urn:b"));
        assert!(prompt.contains("\"leaf_nodes\""));
        assert!(prompt.contains("ransomware on host"));
    }
}
