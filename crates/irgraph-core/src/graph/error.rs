//! Graph accessor error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a graph store. All of them abort the run.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The store could not be reached or the session failed.
    #[error("Graph connection error: {0}")]
    Connection(String),

    /// A query was rejected or failed while streaming rows.
    #[error("Graph query error: {0}")]
    Query(String),

    /// A returned row lacks a column or holds an unexpected type.
    #[error("Unexpected row in {shape} result: {message}")]
    Decode { shape: &'static str, message: String },

    /// A graph fixture could not be read or parsed.
    #[error("Graph fixture error at {}: {message}", path.display())]
    Fixture { path: PathBuf, message: String },

    /// Configuration does not describe a usable store.
    #[error("Graph configuration error: {0}")]
    Config(String),
}

impl From<neo4rs::Error> for GraphError {
    fn from(err: neo4rs::Error) -> Self {
        GraphError::Query(err.to_string())
    }
}
