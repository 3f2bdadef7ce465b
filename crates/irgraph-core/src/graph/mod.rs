//! Read-only access to the ontology property graph.
//!
//! The exploration engine issues four query shapes (see [`QueryShape`])
//! through the [`GraphStore`] trait and decodes the returned rows in
//! [`queries`]. Two stores are provided:
//!
//! - [`Neo4jGraph`] - Bolt connection to the Neo4j instance holding the
//!   imported ontology
//! - [`MemoryGraph`] - in-memory graph, loadable from a JSON fixture
//!
//! A store handle is owned by a single run and dropped when the run ends.
//! Stores only read, so independent runs may query concurrently.

mod error;
mod memory;
mod neo4j;
pub mod queries;

pub use error::GraphError;
pub use memory::{FixtureEdge, FixtureNode, GraphFixture, MemoryGraph};
pub use neo4j::Neo4jGraph;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::config::GraphConfig;

/// A result row, column name to value.
pub type Row = Map<String, Value>;

/// The query shapes issued by the subgraph builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryShape {
    /// Nodes carrying a label equal to `$label`.
    NodesByExactLabel,
    /// First node carrying a label containing `$label`.
    NodesByLabelSubstring,
    /// The node whose identifier is `$uri`.
    NodeByUri,
    /// Up to `$limit` labeled, non-blank neighbors of `$uri`, both directions.
    Neighbors,
}

impl QueryShape {
    /// Columns every row of this shape carries.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            QueryShape::NodesByExactLabel
            | QueryShape::NodesByLabelSubstring
            | QueryShape::NodeByUri => &["uri", "labels", "comments"],
            QueryShape::Neighbors => &[
                "target_uri",
                "relationship_type",
                "target_labels",
                "target_comments",
                "outgoing",
            ],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            QueryShape::NodesByExactLabel => "exact-label lookup",
            QueryShape::NodesByLabelSubstring => "substring-label lookup",
            QueryShape::NodeByUri => "node lookup",
            QueryShape::Neighbors => "neighbor fetch",
        }
    }
}

/// A query parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Str(String),
    Int(i64),
}

impl Param {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Param::Str(s) => Some(s),
            Param::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Param::Int(n) => Some(*n),
            Param::Str(_) => None,
        }
    }
}

/// A parameterized query template.
#[derive(Debug, Clone)]
pub struct GraphQuery {
    pub shape: QueryShape,
    pub cypher: &'static str,
    pub params: Vec<(&'static str, Param)>,
}

impl GraphQuery {
    pub fn new(shape: QueryShape, cypher: &'static str) -> Self {
        Self {
            shape,
            cypher,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, name: &'static str, value: Param) -> Self {
        self.params.push((name, value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

/// A store answering parameterized pattern queries over the graph.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Runs a query and collects its rows.
    async fn run(&self, query: &GraphQuery) -> Result<Vec<Row>, GraphError>;
}

#[async_trait]
impl GraphStore for Box<dyn GraphStore> {
    async fn run(&self, query: &GraphQuery) -> Result<Vec<Row>, GraphError> {
        (**self).run(query).await
    }
}

/// Opens the store described by the configuration.
pub async fn open_store(config: &GraphConfig) -> Result<Box<dyn GraphStore>, GraphError> {
    match config.backend.as_str() {
        "memory" => {
            let path = config.fixture.as_ref().ok_or_else(|| {
                GraphError::Config("memory backend requires a fixture path".to_string())
            })?;
            Ok(Box::new(MemoryGraph::from_fixture_file(path)?))
        }
        "neo4j" => Ok(Box::new(Neo4jGraph::connect(config).await?)),
        other => Err(GraphError::Config(format!("unknown graph backend: {}", other))),
    }
}
