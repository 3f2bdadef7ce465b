//! In-memory graph store.
//!
//! Answers the builder's query shapes directly from a node table and an
//! edge list, applying the same filters as the Cypher templates. Used for
//! tests and for offline runs against an exported JSON fixture.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;

use super::{GraphError, GraphQuery, GraphStore, QueryShape, Row};
use crate::config::BLANK_NODE_PREFIX;

/// A node as stored in a fixture file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureNode {
    pub uri: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub comments: Vec<String>,
}

/// A directed edge as stored in a fixture file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub rel_type: String,
}

/// Serialized form of a [`MemoryGraph`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphFixture {
    #[serde(default)]
    pub nodes: Vec<FixtureNode>,
    #[serde(default)]
    pub edges: Vec<FixtureEdge>,
}

/// Property graph held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    nodes: Vec<FixtureNode>,
    index: HashMap<String, usize>,
    edges: Vec<FixtureEdge>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a fixture file.
    pub fn from_fixture_file(path: &Path) -> Result<Self, GraphError> {
        let content = std::fs::read_to_string(path).map_err(|e| GraphError::Fixture {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let fixture: GraphFixture =
            serde_json::from_str(&content).map_err(|e| GraphError::Fixture {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(Self::from_fixture(fixture))
    }

    pub fn from_fixture(fixture: GraphFixture) -> Self {
        let mut graph = Self::new();
        for node in fixture.nodes {
            graph.add_node(node.uri, node.labels, node.comments);
        }
        for edge in fixture.edges {
            graph.add_edge(edge.source, edge.target, edge.rel_type);
        }
        graph
    }

    /// Adds or replaces a node.
    pub fn add_node(
        &mut self,
        uri: impl Into<String>,
        labels: Vec<String>,
        comments: Vec<String>,
    ) -> &mut Self {
        let node = FixtureNode {
            uri: uri.into(),
            labels,
            comments,
        };
        match self.index.get(&node.uri) {
            Some(&i) => self.nodes[i] = node,
            None => {
                self.index.insert(node.uri.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
        self
    }

    /// Adds a node with a single label and no comment.
    pub fn add_labeled(&mut self, uri: impl Into<String>, label: impl Into<String>) -> &mut Self {
        self.add_node(uri, vec![label.into()], Vec::new())
    }

    /// Adds a directed edge. Endpoints need not exist yet.
    pub fn add_edge(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        rel_type: impl Into<String>,
    ) -> &mut Self {
        self.edges.push(FixtureEdge {
            source: source.into(),
            target: target.into(),
            rel_type: rel_type.into(),
        });
        self
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Same visibility rule as the Cypher templates.
    fn visible(&self, uri: &str) -> Option<&FixtureNode> {
        let node = &self.nodes[*self.index.get(uri)?];
        if node.uri.starts_with(BLANK_NODE_PREFIX) || node.labels.is_empty() {
            return None;
        }
        Some(node)
    }

    fn node_row(node: &FixtureNode) -> Row {
        let mut row = Row::new();
        row.insert("uri".to_string(), json!(node.uri));
        row.insert("labels".to_string(), json!(node.labels));
        row.insert("comments".to_string(), json!(node.comments));
        row
    }

    fn neighbor_rows(&self, uri: &str, limit: usize) -> Vec<Row> {
        let mut rows = Vec::new();

        for edge in &self.edges {
            if rows.len() >= limit {
                break;
            }
            let (other, outgoing) = if edge.source == uri {
                (&edge.target, true)
            } else if edge.target == uri {
                (&edge.source, false)
            } else {
                continue;
            };
            let Some(target) = self.visible(other) else {
                continue;
            };

            let mut row = Row::new();
            row.insert("target_uri".to_string(), json!(target.uri));
            row.insert("relationship_type".to_string(), json!(edge.rel_type));
            row.insert("target_labels".to_string(), json!(target.labels));
            row.insert("target_comments".to_string(), json!(target.comments));
            row.insert("outgoing".to_string(), Value::Bool(outgoing));
            rows.push(row);
        }

        rows
    }
}

#[async_trait]
impl GraphStore for MemoryGraph {
    async fn run(&self, query: &GraphQuery) -> Result<Vec<Row>, GraphError> {
        let str_param = |name: &str| {
            query
                .get(name)
                .and_then(|p| p.as_str())
                .ok_or_else(|| GraphError::Query(format!("missing string parameter ${}", name)))
        };

        let rows = match query.shape {
            QueryShape::NodesByExactLabel => {
                let label = str_param("label")?;
                self.nodes
                    .iter()
                    .filter(|n| n.labels.iter().any(|l| l == label))
                    .filter_map(|n| self.visible(&n.uri))
                    .map(Self::node_row)
                    .collect()
            }
            QueryShape::NodesByLabelSubstring => {
                let label = str_param("label")?;
                self.nodes
                    .iter()
                    .filter(|n| n.labels.iter().any(|l| l.contains(label)))
                    .filter_map(|n| self.visible(&n.uri))
                    .map(Self::node_row)
                    .take(1)
                    .collect()
            }
            QueryShape::NodeByUri => {
                let uri = str_param("uri")?;
                self.visible(uri).map(Self::node_row).into_iter().collect()
            }
            QueryShape::Neighbors => {
                let uri = str_param("uri")?;
                let limit = query
                    .get("limit")
                    .and_then(|p| p.as_int())
                    .ok_or_else(|| GraphError::Query("missing integer parameter $limit".into()))?;
                self.neighbor_rows(uri, usize::try_from(limit).unwrap_or(0))
            }
        };

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::queries;

    #[tokio::test]
    async fn test_blank_and_unlabeled_nodes_hidden() {
        let mut graph = MemoryGraph::new();
        graph
            .add_labeled("urn:a", "A")
            .add_labeled("bnode://x", "Blank")
            .add_node("urn:bare", Vec::new(), Vec::new())
            .add_edge("urn:a", "bnode://x", "t")
            .add_edge("urn:bare", "urn:a", "t");

        let rows = graph.run(&queries::neighbors("urn:a", 10)).await.unwrap();
        assert!(rows.is_empty());

        let rows = graph.run(&queries::node_by_uri("urn:bare")).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_incoming_edge_reported_as_not_outgoing() {
        let mut graph = MemoryGraph::new();
        graph
            .add_labeled("urn:a", "A")
            .add_labeled("urn:b", "B")
            .add_edge("urn:b", "urn:a", "uses");

        let rows = graph.run(&queries::neighbors("urn:a", 10)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["outgoing"], Value::Bool(false));
        assert_eq!(rows[0]["target_uri"], json!("urn:b"));
    }

    #[test]
    fn test_fixture_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        std::fs::write(
            &path,
            r#"{"nodes": [{"uri": "urn:a", "labels": ["A"]}],
                "edges": [{"source": "urn:a", "target": "urn:a", "type": "self"}]}"#,
        )
        .unwrap();

        let graph = MemoryGraph::from_fixture_file(&path).unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 1);
    }
}
