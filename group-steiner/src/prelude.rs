//! Prelude module for commonly used imports.
//!
//! This module re-exports the types needed to build a graph, pose a query
//! and run a search.

// Graph and query types
pub use crate::core::graph::{GraphModel, LabeledGraph, LabeledGraphBuilder};
pub use crate::core::query::{LabelMask, Query};

// Configuration
pub use crate::config::{PruningConfig, SearchBudget, SearchConfig, SearchVariant};

// Search
pub use crate::search::distance::TerminalDistanceIndex;
pub use crate::search::engine::SearchEngine;
pub use crate::search::observer::{CancelFlag, ProgressObserver, ProgressUpdate};
pub use crate::search::outcome::{InfeasibilityReason, SearchOutcome, SearchStats, SearchStatus, SteinerTree};

// Errors
pub use crate::errors::{SteinerError, SteinerResult};

// Shared primitives
pub use common::{LabelId, VertexId, Weight, INFINITE_WEIGHT};
