//! Neo4j store over Bolt.

use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph};
use serde_json::Value;

use super::{GraphError, GraphQuery, GraphStore, Param, Row};
use crate::config::GraphConfig;

const CLASS_COUNT_QUERY: &str = "MATCH (c:Resource:owl__Class) RETURN count(c) AS count";

/// Connection pool to the Neo4j instance holding the ontology.
///
/// Each run constructs its own handle; dropping it closes the pool.
pub struct Neo4jGraph {
    graph: Graph,
    uri: String,
}

impl Neo4jGraph {
    /// Connects and verifies the store answers queries.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let password = config.password.clone().ok_or_else(|| {
            GraphError::Config("missing Neo4j password; set NEO4J_PASSWORD".to_string())
        })?;

        let neo4j_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(password.as_str())
            .db(config.database.as_str())
            .max_connections(config.max_connections)
            .build()
            .map_err(|e| GraphError::Config(e.to_string()))?;

        let graph = Graph::connect(neo4j_config)
            .await
            .map_err(|e| GraphError::Connection(format!("{}: {}", config.uri, e)))?;

        let store = Self {
            graph,
            uri: config.uri.clone(),
        };
        let classes = store.class_count().await?;
        tracing::info!(uri = %store.uri, classes, "connected to Neo4j");

        Ok(store)
    }

    /// Number of ontology classes in the store.
    pub async fn class_count(&self) -> Result<i64, GraphError> {
        let mut stream = self
            .graph
            .execute(query(CLASS_COUNT_QUERY))
            .await
            .map_err(|e| GraphError::Connection(format!("{}: {}", self.uri, e)))?;

        match stream.next().await? {
            Some(row) => row.get::<i64>("count").map_err(|e| GraphError::Decode {
                shape: "class count",
                message: e.to_string(),
            }),
            None => Ok(0),
        }
    }
}

#[async_trait]
impl GraphStore for Neo4jGraph {
    async fn run(&self, graph_query: &GraphQuery) -> Result<Vec<Row>, GraphError> {
        let mut q = query(graph_query.cypher);
        for (name, value) in &graph_query.params {
            q = match value {
                Param::Str(s) => q.param(name, s.as_str()),
                Param::Int(n) => q.param(name, *n),
            };
        }

        tracing::debug!(
            shape = graph_query.shape.name(),
            params = ?graph_query.params,
            "running graph query"
        );

        let mut stream = self.graph.execute(q).await?;
        let mut rows = Vec::new();

        while let Some(row) = stream.next().await? {
            let mut decoded = Row::new();
            for column in graph_query.shape.columns() {
                let value: Value = row.get(column).map_err(|e| GraphError::Decode {
                    shape: graph_query.shape.name(),
                    message: format!("column `{}`: {}", column, e),
                })?;
                decoded.insert(column.to_string(), value);
            }
            rows.push(decoded);
        }

        Ok(rows)
    }
}
