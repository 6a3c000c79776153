//! Error types for the search crate.
//!
//! Leaf errors come from `common`; this module wraps them together with the
//! failures that only the engine can produce.

use common::{ConfigError, GraphError, QueryError};
use thiserror::Error;

/// Error types for graph construction, query setup and preprocessing.
#[derive(Debug, Error, Clone)]
pub enum SteinerError {
    /// Graph error.
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Query error.
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reading configuration failed.
    #[error("IO error: {0}")]
    Io(String),

    /// A preprocessing worker panicked.
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// A prepared index was built against a different graph.
    #[error("Index covers {index_vertices} vertices, graph has {graph_vertices}")]
    IndexMismatch {
        index_vertices: usize,
        graph_vertices: usize,
    },
}

/// Result type for search operations.
pub type SteinerResult<T> = std::result::Result<T, SteinerError>;
