//! In-memory representation of an explored region of the ontology graph.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// A node of the subgraph, identified by its URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub uri: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub comments: Vec<String>,
    /// Hops from the nearest seed when the node was first discovered.
    pub depth: u32,
}

impl NodeRecord {
    pub fn new(uri: impl Into<String>, depth: u32) -> Self {
        Self {
            uri: uri.into(),
            labels: Vec::new(),
            comments: Vec::new(),
            depth,
        }
    }

    /// First label, or the URI when the node has none.
    pub fn display_label(&self) -> &str {
        self.labels.first().map(String::as_str).unwrap_or(&self.uri)
    }
}

/// A directed, typed edge between two subgraph nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub rel_type: String,
}

impl Relationship {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        rel_type: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            rel_type: rel_type.into(),
        }
    }
}

/// Growth caused by a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    pub nodes_added: usize,
    pub relationships_added: usize,
}

/// Nodes and relationships discovered so far.
///
/// The subgraph only grows. A node keeps the depth it was first inserted
/// with, and a `(source, target, type)` triple is stored at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SubgraphRepr")]
pub struct Subgraph {
    nodes: BTreeMap<String, NodeRecord>,
    relationships: Vec<Relationship>,
    #[serde(skip)]
    relationship_keys: HashSet<Relationship>,
}

/// Wire shape used to route deserialization through the insert path.
#[derive(Deserialize)]
struct SubgraphRepr {
    #[serde(default)]
    nodes: BTreeMap<String, NodeRecord>,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

impl From<SubgraphRepr> for Subgraph {
    fn from(repr: SubgraphRepr) -> Self {
        let mut subgraph = Subgraph::new();
        for (uri, mut node) in repr.nodes {
            node.uri = uri;
            subgraph.insert_node(node);
        }
        for rel in repr.relationships {
            subgraph.insert_relationship(rel);
        }
        subgraph
    }
}

impl Subgraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn node(&self, uri: &str) -> Option<&NodeRecord> {
        self.nodes.get(uri)
    }

    pub fn contains_node(&self, uri: &str) -> bool {
        self.nodes.contains_key(uri)
    }

    /// Nodes keyed by URI.
    pub fn nodes(&self) -> &BTreeMap<String, NodeRecord> {
        &self.nodes
    }

    /// Relationships in discovery order.
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn contains_relationship(&self, rel: &Relationship) -> bool {
        self.relationship_keys.contains(rel)
    }

    /// Inserts a node unless one with the same URI exists.
    ///
    /// Returns `true` if the node was added. An existing node is never
    /// overwritten, so its first-seen depth survives.
    pub fn insert_node(&mut self, node: NodeRecord) -> bool {
        if self.nodes.contains_key(&node.uri) {
            return false;
        }
        self.nodes.insert(node.uri.clone(), node);
        true
    }

    /// Appends a relationship unless the same triple is already present.
    pub fn insert_relationship(&mut self, rel: Relationship) -> bool {
        if !self.relationship_keys.insert(rel.clone()) {
            return false;
        }
        self.relationships.push(rel);
        true
    }

    /// Deepest recorded depth, `None` for an empty subgraph.
    pub fn max_depth(&self) -> Option<u32> {
        self.nodes.values().map(|n| n.depth).max()
    }

    /// URIs of the nodes at the maximum recorded depth, sorted.
    ///
    /// These are the only valid targets for the next expansion round.
    pub fn leaf_nodes(&self) -> Vec<String> {
        let Some(max) = self.max_depth() else {
            return Vec::new();
        };
        self.nodes
            .values()
            .filter(|n| n.depth == max)
            .map(|n| n.uri.clone())
            .collect()
    }

    /// Leaf URIs as a set, for membership checks.
    pub fn leaf_set(&self) -> BTreeSet<String> {
        self.leaf_nodes().into_iter().collect()
    }

    /// Merges `addition` into this subgraph.
    ///
    /// Nodes are unioned by URI keeping the depth already recorded here;
    /// relationships are unioned by triple. Merging a subgraph into itself
    /// changes nothing.
    pub fn merge(&mut self, addition: Subgraph) -> MergeStats {
        let mut stats = MergeStats::default();

        for (_, node) in addition.nodes {
            if self.insert_node(node) {
                stats.nodes_added += 1;
            }
        }
        for rel in addition.relationships {
            if self.insert_relationship(rel) {
                stats.relationships_added += 1;
            }
        }

        stats
    }

    /// Returns a new subgraph holding the union of `self` and `other`.
    pub fn merged(&self, other: &Subgraph) -> Subgraph {
        let mut result = self.clone();
        result.merge(other.clone());
        result
    }

    /// View handed to the expansion decider.
    pub fn view(&self) -> SubgraphView<'_> {
        SubgraphView {
            nodes: &self.nodes,
            relationships: &self.relationships,
            leaf_nodes: self.leaf_nodes(),
        }
    }

    /// Pretty JSON in the persisted `{"nodes", "relationships"}` shape.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Serialized subgraph plus the current leaf list.
#[derive(Debug, Clone, Serialize)]
pub struct SubgraphView<'a> {
    pub nodes: &'a BTreeMap<String, NodeRecord>,
    pub relationships: &'a [Relationship],
    pub leaf_nodes: Vec<String>,
}

impl SubgraphView<'_> {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(uri: &str, depth: u32) -> NodeRecord {
        NodeRecord {
            uri: uri.to_string(),
            labels: vec![uri.to_uppercase()],
            comments: Vec::new(),
            depth,
        }
    }

    #[test]
    fn test_insert_keeps_first_depth() {
        let mut subgraph = Subgraph::new();
        assert!(subgraph.insert_node(node("a", 1)));
        assert!(!subgraph.insert_node(node("a", 0)));
        assert_eq!(subgraph.node("a").unwrap().depth, 1);
    }

    #[test]
    fn test_leaf_nodes_are_deepest() {
        let mut subgraph = Subgraph::new();
        subgraph.insert_node(node("seed", 0));
        subgraph.insert_node(node("b", 1));
        subgraph.insert_node(node("a", 1));
        assert_eq!(subgraph.leaf_nodes(), vec!["a".to_string(), "b".to_string()]);
        assert!(Subgraph::new().leaf_nodes().is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let mut subgraph = Subgraph::new();
        subgraph.insert_node(node("a", 0));
        subgraph.insert_relationship(Relationship::new("a", "a", "rdfs__seeAlso"));

        let value = serde_json::to_value(&subgraph).unwrap();
        assert_eq!(value["nodes"]["a"]["depth"], 0);
        assert_eq!(value["relationships"][0]["type"], "rdfs__seeAlso");
        assert!(value.get("relationship_keys").is_none());
    }

    #[test]
    fn test_deserialize_dedups_relationships() {
        let json = r#"{
            "nodes": {"a": {"uri": "a", "labels": ["A"], "comments": [], "depth": 0}},
            "relationships": [
                {"source": "a", "target": "b", "type": "t"},
                {"source": "a", "target": "b", "type": "t"}
            ]
        }"#;
        let subgraph: Subgraph = serde_json::from_str(json).unwrap();
        assert_eq!(subgraph.relationship_count(), 1);
        assert!(subgraph.contains_relationship(&Relationship::new("a", "b", "t")));
    }
}
