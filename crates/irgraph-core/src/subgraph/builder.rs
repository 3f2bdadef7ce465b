//! Breadth-first construction and expansion of subgraphs.

use std::collections::HashSet;

use crate::config::DEFAULT_NEIGHBOR_LIMIT;
use crate::graph::queries::{self, NeighborRow, NodeRow};
use crate::graph::{GraphError, GraphQuery, GraphStore};

use super::model::{NodeRecord, Relationship, Subgraph};

/// Result of resolving seed labels and traversing from them.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub subgraph: Subgraph,
    /// URIs of the depth-0 seed nodes, in resolution order.
    pub seeds: Vec<String>,
    /// Labels that matched no node.
    pub unresolved: Vec<String>,
}

impl BuildReport {
    pub fn all_unresolved(&self) -> bool {
        self.seeds.is_empty()
    }
}

/// Grows subgraphs by querying a [`GraphStore`].
///
/// Every traversal is bounded by a hop count and by `neighbor_limit` rows
/// per node, so a single hub node cannot blow up a round.
pub struct SubgraphBuilder<'g> {
    store: &'g dyn GraphStore,
    neighbor_limit: usize,
}

impl<'g> SubgraphBuilder<'g> {
    pub fn new(store: &'g dyn GraphStore) -> Self {
        Self {
            store,
            neighbor_limit: DEFAULT_NEIGHBOR_LIMIT,
        }
    }

    pub fn with_neighbor_limit(mut self, limit: usize) -> Self {
        self.neighbor_limit = limit;
        self
    }

    pub fn neighbor_limit(&self) -> usize {
        self.neighbor_limit
    }

    /// Resolves `seed_labels` to depth-0 seeds and traverses `max_depth` hops.
    ///
    /// A label first tries an exact match (every hit becomes a seed) and then
    /// a substring match (first hit only). Labels matching nothing are
    /// reported, not fatal.
    pub async fn build_initial(
        &self,
        seed_labels: &[String],
        max_depth: u32,
    ) -> Result<BuildReport, GraphError> {
        let mut seeds: Vec<NodeRecord> = Vec::new();
        let mut seen = HashSet::new();
        let mut unresolved = Vec::new();

        for label in seed_labels {
            let matches = self.resolve_label(label).await?;
            if matches.is_empty() {
                tracing::warn!(label = %label, "seed label matched no node");
                unresolved.push(label.clone());
                continue;
            }
            for row in matches {
                if seen.insert(row.uri.clone()) {
                    seeds.push(record_from_row(row, 0));
                }
            }
        }

        let seed_uris: Vec<String> = seeds.iter().map(|n| n.uri.clone()).collect();
        tracing::info!(
            seeds = seed_uris.len(),
            unresolved = unresolved.len(),
            max_depth,
            "building initial subgraph"
        );

        let subgraph = self.traverse(seeds, max_depth).await?;

        Ok(BuildReport {
            subgraph,
            seeds: seed_uris,
            unresolved,
        })
    }

    /// Traverses `hop_count` hops from `frontier`, stamping the frontier at
    /// depth 0.
    pub async fn expand_from(
        &self,
        frontier: &[String],
        hop_count: u32,
    ) -> Result<Subgraph, GraphError> {
        let mut starts = Vec::new();
        for uri in dedup(frontier) {
            if let Some(node) = self.lookup(uri, 0).await? {
                starts.push(node);
            }
        }
        self.traverse(starts, hop_count).await
    }

    /// Like [`expand_from`](Self::expand_from), but frontier nodes already
    /// in `base` keep their recorded depth, so discovered nodes are stamped
    /// relative to the original seeds. The result is the addition only;
    /// merge it into `base` to grow it.
    pub async fn expand_subgraph(
        &self,
        base: &Subgraph,
        frontier: &[String],
        hop_count: u32,
    ) -> Result<Subgraph, GraphError> {
        let leaf_depth = base.max_depth().unwrap_or(0);
        let mut starts = Vec::new();

        for uri in dedup(frontier) {
            match base.node(uri) {
                Some(node) => starts.push(node.clone()),
                None => {
                    if let Some(node) = self.lookup(uri, leaf_depth).await? {
                        starts.push(node);
                    }
                }
            }
        }

        self.traverse(starts, hop_count).await
    }

    async fn resolve_label(&self, label: &str) -> Result<Vec<NodeRow>, GraphError> {
        let exact = self.fetch_nodes(queries::nodes_by_exact_label(label)).await?;
        if !exact.is_empty() {
            return Ok(exact);
        }

        let mut fuzzy = self
            .fetch_nodes(queries::nodes_by_label_substring(label))
            .await?;
        fuzzy.truncate(1);
        if let Some(row) = fuzzy.first() {
            tracing::debug!(label = %label, uri = %row.uri, "label resolved by substring");
        }
        Ok(fuzzy)
    }

    async fn lookup(&self, uri: &str, depth: u32) -> Result<Option<NodeRecord>, GraphError> {
        let mut rows = self.fetch_nodes(queries::node_by_uri(uri)).await?;
        if rows.is_empty() {
            tracing::warn!(uri = %uri, "frontier node not found, skipping");
            return Ok(None);
        }
        Ok(Some(record_from_row(rows.swap_remove(0), depth)))
    }

    async fn fetch_nodes(&self, query: GraphQuery) -> Result<Vec<NodeRow>, GraphError> {
        let shape = query.shape;
        self.store
            .run(&query)
            .await?
            .iter()
            .map(|row| NodeRow::from_row(shape, row))
            .collect()
    }

    async fn neighbors(&self, uri: &str) -> Result<Vec<NeighborRow>, GraphError> {
        self.store
            .run(&queries::neighbors(uri, self.neighbor_limit))
            .await?
            .iter()
            .map(NeighborRow::from_row)
            .collect()
    }

    /// Level-by-level BFS from `starts`. A node is enqueued at most once per
    /// call; edges are recorded in their stored direction.
    async fn traverse(&self, starts: Vec<NodeRecord>, hops: u32) -> Result<Subgraph, GraphError> {
        let mut subgraph = Subgraph::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut level: Vec<(String, u32)> = Vec::new();

        for node in starts {
            if visited.insert(node.uri.clone()) {
                level.push((node.uri.clone(), node.depth));
                subgraph.insert_node(node);
            }
        }

        for hop in 0..hops {
            if level.is_empty() {
                break;
            }
            let mut next = Vec::new();

            for (uri, depth) in &level {
                for row in self.neighbors(uri).await? {
                    let rel = if row.outgoing {
                        Relationship::new(uri.as_str(), row.target_uri.as_str(), row.relationship_type)
                    } else {
                        Relationship::new(row.target_uri.as_str(), uri.as_str(), row.relationship_type)
                    };
                    subgraph.insert_relationship(rel);

                    if visited.insert(row.target_uri.clone()) {
                        next.push((row.target_uri.clone(), depth + 1));
                        subgraph.insert_node(NodeRecord {
                            uri: row.target_uri,
                            labels: row.target_labels,
                            comments: row.target_comments,
                            depth: depth + 1,
                        });
                    }
                }
            }

            tracing::debug!(hop = hop + 1, discovered = next.len(), "traversal level done");
            level = next;
        }

        Ok(subgraph)
    }
}

fn record_from_row(row: NodeRow, depth: u32) -> NodeRecord {
    NodeRecord {
        uri: row.uri,
        labels: row.labels,
        comments: row.comments,
        depth,
    }
}

fn dedup(ids: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(String::as_str)
        .filter(|id| seen.insert(*id))
        .collect()
}
