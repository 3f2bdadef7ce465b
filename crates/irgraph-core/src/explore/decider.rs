use async_trait::async_trait;

use super::ExploreError;
use crate::decision::ExpandDecision;
use crate::llm::LLM;
use crate::prompts::{build_explorer_prompt, Example, EXPLORER_SYSTEM_PROMPT};
use crate::subgraph::SubgraphView;

/// Chooses which leaf nodes to expand next.
///
/// Receives the current subgraph with its leaf list and the incident text.
/// An empty decision means the subgraph is good enough.
#[async_trait]
pub trait ExpansionDecider: Send + Sync {
    async fn decide(
        &self,
        view: &SubgraphView<'_>,
        incident: &str,
    ) -> Result<ExpandDecision, ExploreError>;
}

#[async_trait]
impl ExpansionDecider for Box<dyn ExpansionDecider> {
    async fn decide(
        &self,
        view: &SubgraphView<'_>,
        incident: &str,
    ) -> Result<ExpandDecision, ExploreError> {
        (**self).decide(view, incident).await
    }
}

#[async_trait]
impl<'a, T: ExpansionDecider + ?Sized> ExpansionDecider for &'a T {
    async fn decide(
        &self,
        view: &SubgraphView<'_>,
        incident: &str,
    ) -> Result<ExpandDecision, ExploreError> {
        (**self).decide(view, incident).await
    }
}

/// Decider backed by a language model.
pub struct LlmExplorer<L: LLM> {
    llm: L,
    examples: Vec<Example>,
}

impl<L: LLM> LlmExplorer<L> {
    pub fn new(llm: L) -> Self {
        Self {
            llm,
            examples: Vec::new(),
        }
    }

    /// Adds few-shot examples to every explorer prompt.
    pub fn with_examples(mut self, examples: Vec<Example>) -> Self {
        self.examples = examples;
        self
    }
}

#[async_trait]
impl<L: LLM> ExpansionDecider for LlmExplorer<L> {
    async fn decide(
        &self,
        view: &SubgraphView<'_>,
        incident: &str,
    ) -> Result<ExpandDecision, ExploreError> {
        let prompt = build_explorer_prompt(incident, view, &self.examples)?;
        let response = self
            .llm
            .complete_with_system(EXPLORER_SYSTEM_PROMPT, &prompt)
            .await?;

        let decision = ExpandDecision::parse(&response).map_err(|e| {
            tracing::warn!(excerpt = %e.excerpt(), "explorer response unusable");
            e
        })?;

        tracing::debug!(
            model = self.llm.model(),
            requested = decision.nodes_to_expand.len(),
            "explorer decided"
        );
        Ok(decision)
    }
}
