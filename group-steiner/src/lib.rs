//! **Group Steiner Search** - Minimum-weight trees covering a set of labels.
//!
//! Given an undirected graph with non-negative edge weights, where every
//! vertex carries a set of labels, and a query of labels, the engine finds
//! a connected tree of minimum total weight that contains at least one
//! carrier of every query label.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  LabeledGraph (read-only, shared)         Query (≤ 32 labels) │
//! └─────────────────────┬───────────────────────┬───────────────┘
//!                       │                       │
//!                       ▼                       ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  TerminalDistanceIndex: one multi-source Dijkstra per label │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  SearchEngine: best-first DP over (vertex, label mask)       │
//! │  ┌──────────────┬───────────────┬──────────────────────────┐ │
//! │  │ StateStore   │ Frontier      │ LowerBound / MergeMST    │ │
//! │  └──────────────┴───────────────┴──────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use group_steiner::prelude::*;
//!
//! let mut builder = LabeledGraph::builder();
//! builder.add_vertex("A", ["x"])?;
//! builder.add_vertex("B", ["y", "z"])?;
//! builder.add_vertex("C", ["y"])?;
//! builder.add_edge("A", "B", 1.0)?;
//! builder.add_edge("A", "C", 1.0)?;
//! let graph = builder.build();
//!
//! let engine = SearchEngine::new(&graph, SearchConfig::default());
//! let query = engine.query(["x", "y", "z"])?;
//! let outcome = engine.solve(&query)?;
//! assert_eq!(outcome.status, SearchStatus::Solved);
//! assert_eq!(outcome.weight, 1.0);
//! # Ok::<(), SteinerError>(())
//! ```
//!
//! # Modules
//!
//! - [graph]: the labeled graph and its builder
//! - [query]: label masks and queries
//! - [algorithms]: Dijkstra and Kruskal building blocks
//! - [search]: distance index, lower bounds and the search engine
//! - [config]: variants, pruning switches and budgets
//! - [errors]: error types

/// Search configuration.
pub mod config;

/// Error types.
pub mod errors;

/// Core data model.
pub mod core {
    pub mod graph;
    pub mod query;
}

/// Shortest paths and spanning trees.
pub mod algorithms;

/// Min-ordered heap entries.
pub mod scored;

/// The Group Steiner search.
pub mod search {
    pub mod distance;
    pub mod engine;
    pub mod frontier;
    pub mod lower_bound;
    pub mod merge_mst;
    pub mod observer;
    pub mod outcome;
    pub mod state;
    pub mod store;
}

/// Instance generators.
pub mod utils {
    pub mod graph_generator;
}

/// Commonly used imports.
pub mod prelude;

pub use crate::core::graph;
pub use crate::core::query;

pub use config::{SearchBudget, SearchConfig, SearchVariant};
pub use errors::{SteinerError, SteinerResult};
pub use search::engine::SearchEngine;
pub use search::outcome::{SearchOutcome, SearchStatus, SteinerTree};
