//! Error types shared by the graph model, query construction and configuration.
//!
//! Infeasible queries are not errors: the engine reports them as a search
//! status. These types cover malformed input only.

use thiserror::Error;

/// Error types for building or addressing a labeled graph.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    /// Vertex name was never registered.
    #[error("Unknown vertex: {0}")]
    UnknownVertex(String),

    /// Vertex name registered twice.
    #[error("Duplicate vertex: {0}")]
    DuplicateVertex(String),

    /// Edge weight is negative, NaN or infinite.
    #[error("Invalid weight {weight} on edge {from} -- {to}")]
    InvalidWeight { from: String, to: String, weight: f64 },

    /// Dense vertex index outside the graph.
    #[error("Vertex index out of range: {0}")]
    VertexOutOfRange(usize),
}

/// Error types for query label sets.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// More distinct labels than the subset bitmask can hold.
    #[error("Query has {requested} labels, at most {max} are supported")]
    TooManyLabels { requested: usize, max: usize },
}

/// Error types for search configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("Configuration parse error: {0}")]
    Parse(String),

    /// A field holds a value outside its domain.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
