//! Cypher templates and row decoding for the builder's query shapes.
//!
//! The ontology import stores labels and comments as string arrays
//! (`rdfs__label`, `rdfs__comment`) and marks anonymous nodes with a
//! `bnode://` URI prefix. Every shape filters those nodes out.

use serde_json::Value;

use super::{GraphError, GraphQuery, Param, QueryShape, Row};

const NODES_BY_EXACT_LABEL: &str = r#"
MATCH (n)
WHERE ANY(rdfs_label IN n.rdfs__label WHERE rdfs_label = $label)
  AND NOT n.uri STARTS WITH 'bnode://'
  AND n.rdfs__label IS NOT NULL
  AND size(n.rdfs__label) > 0
RETURN n.uri AS uri, n.rdfs__label AS labels,
       coalesce(n.rdfs__comment, []) AS comments
"#;

const NODES_BY_LABEL_SUBSTRING: &str = r#"
MATCH (n)
WHERE ANY(rdfs_label IN n.rdfs__label WHERE rdfs_label CONTAINS $label)
  AND NOT n.uri STARTS WITH 'bnode://'
  AND n.rdfs__label IS NOT NULL
  AND size(n.rdfs__label) > 0
RETURN n.uri AS uri, n.rdfs__label AS labels,
       coalesce(n.rdfs__comment, []) AS comments
LIMIT 1
"#;

const NODE_BY_URI: &str = r#"
MATCH (n)
WHERE n.uri = $uri
  AND NOT n.uri STARTS WITH 'bnode://'
  AND n.rdfs__label IS NOT NULL
  AND size(n.rdfs__label) > 0
RETURN n.uri AS uri, n.rdfs__label AS labels,
       coalesce(n.rdfs__comment, []) AS comments
"#;

const NEIGHBORS: &str = r#"
MATCH (start)-[r]-(target)
WHERE start.uri = $uri
  AND NOT target.uri STARTS WITH 'bnode://'
  AND target.rdfs__label IS NOT NULL
  AND size(target.rdfs__label) > 0
RETURN target.uri AS target_uri, type(r) AS relationship_type,
       target.rdfs__label AS target_labels,
       coalesce(target.rdfs__comment, []) AS target_comments,
       startNode(r) = start AS outgoing
LIMIT $limit
"#;

/// Nodes whose label list contains `label` exactly.
pub fn nodes_by_exact_label(label: &str) -> GraphQuery {
    GraphQuery::new(QueryShape::NodesByExactLabel, NODES_BY_EXACT_LABEL)
        .param("label", Param::Str(label.to_string()))
}

/// First node with a label containing `label`.
pub fn nodes_by_label_substring(label: &str) -> GraphQuery {
    GraphQuery::new(QueryShape::NodesByLabelSubstring, NODES_BY_LABEL_SUBSTRING)
        .param("label", Param::Str(label.to_string()))
}

/// The labeled, non-blank node identified by `uri`.
pub fn node_by_uri(uri: &str) -> GraphQuery {
    GraphQuery::new(QueryShape::NodeByUri, NODE_BY_URI).param("uri", Param::Str(uri.to_string()))
}

/// Up to `limit` neighbors of `uri` over incoming and outgoing edges.
pub fn neighbors(uri: &str, limit: usize) -> GraphQuery {
    GraphQuery::new(QueryShape::Neighbors, NEIGHBORS)
        .param("uri", Param::Str(uri.to_string()))
        .param("limit", Param::Int(i64::try_from(limit).unwrap_or(i64::MAX)))
}

/// A decoded node row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRow {
    pub uri: String,
    pub labels: Vec<String>,
    pub comments: Vec<String>,
}

/// A decoded neighbor row, relative to the queried node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborRow {
    pub target_uri: String,
    pub relationship_type: String,
    pub target_labels: Vec<String>,
    pub target_comments: Vec<String>,
    /// The edge points from the queried node to the target.
    pub outgoing: bool,
}

impl NodeRow {
    pub fn from_row(shape: QueryShape, row: &Row) -> Result<Self, GraphError> {
        Ok(Self {
            uri: string_column(shape, row, "uri")?,
            labels: string_list_column(shape, row, "labels")?,
            comments: string_list_column(shape, row, "comments")?,
        })
    }
}

impl NeighborRow {
    pub fn from_row(row: &Row) -> Result<Self, GraphError> {
        let shape = QueryShape::Neighbors;
        let outgoing = match row.get("outgoing") {
            Some(Value::Bool(b)) => *b,
            other => return Err(decode_error(shape, "outgoing", "a boolean", other)),
        };

        Ok(Self {
            target_uri: string_column(shape, row, "target_uri")?,
            relationship_type: string_column(shape, row, "relationship_type")?,
            target_labels: string_list_column(shape, row, "target_labels")?,
            target_comments: string_list_column(shape, row, "target_comments")?,
            outgoing,
        })
    }
}

fn string_column(shape: QueryShape, row: &Row, column: &str) -> Result<String, GraphError> {
    match row.get(column) {
        Some(Value::String(s)) => Ok(s.clone()),
        other => Err(decode_error(shape, column, "a string", other)),
    }
}

/// Null and missing list columns decode as empty.
fn string_list_column(
    shape: QueryShape,
    row: &Row,
    column: &str,
) -> Result<Vec<String>, GraphError> {
    match row.get(column) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(items)) => Ok(items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect()),
        other => Err(decode_error(shape, column, "a list of strings", other)),
    }
}

fn decode_error(
    shape: QueryShape,
    column: &str,
    expected: &str,
    found: Option<&Value>,
) -> GraphError {
    let found = match found {
        Some(value) => value.to_string(),
        None => "nothing".to_string(),
    };
    GraphError::Decode {
        shape: shape.name(),
        message: format!("column `{}` should be {}, found {}", column, expected, found),
    }
}
