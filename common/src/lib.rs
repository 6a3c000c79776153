//! Common types shared across the Group Steiner search crates.
//!
//! This crate provides the foundational identifiers, the weight scalar and the
//! leaf error types used by the engine crate.
//!
//! # Architecture
//!
//! The `common` crate sits at the bottom of the dependency hierarchy:
//! - Has NO dependencies on other workspace crates
//! - Provides shared types that all other crates can use
//! - Ensures type consistency across the entire system

pub mod errors;

pub use errors::{ConfigError, GraphError, QueryError};

// --- Core Newtype Wrappers ---

/// Dense index of a vertex inside a labeled graph.
///
/// **Type Safety**: Using a newtype instead of a bare `usize` prevents accidental
/// mixing of vertex indices with label indices at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct VertexId(u32);

impl VertexId {
    /// Create a new VertexId from a dense index
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Get the dense index back
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v#{}", self.0)
    }
}

/// Dense index of a label (keyword, topic, entity class) in a graph's label registry.
///
/// **Type Safety**: Using newtype pattern prevents mixing with VertexId.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct LabelId(u32);

impl LabelId {
    /// Create a new LabelId from a dense index
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Get the dense index back
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for LabelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "l#{}", self.0)
    }
}

// --- Weights ---

/// Edge weight and tree cost scalar. Always non-negative.
pub type Weight = f64;

/// Sentinel for "unreachable" / "no feasible tree".
pub const INFINITE_WEIGHT: Weight = f64::INFINITY;

/// Adds two weights, keeping the infinity sentinel absorbing.
///
/// Both operands are non-negative, so the sum never produces NaN; the explicit
/// check keeps `∞ + x` at `∞` even for callers that pass `f64::MAX`-sized values.
#[inline]
pub fn saturating_add(a: Weight, b: Weight) -> Weight {
    if a.is_infinite() || b.is_infinite() {
        return INFINITE_WEIGHT;
    }
    let sum = a + b;
    if sum.is_finite() {
        sum
    } else {
        INFINITE_WEIGHT
    }
}

/// Returns true if `w` is a usable edge weight (finite and non-negative).
#[inline]
pub fn is_valid_weight(w: Weight) -> bool {
    w.is_finite() && w >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturating_add_keeps_infinity() {
        assert_eq!(saturating_add(1.0, 2.0), 3.0);
        assert!(saturating_add(INFINITE_WEIGHT, 5.0).is_infinite());
        assert!(saturating_add(5.0, INFINITE_WEIGHT).is_infinite());
        assert!(saturating_add(f64::MAX, f64::MAX).is_infinite());
    }

    #[test]
    fn test_weight_validation() {
        assert!(is_valid_weight(0.0));
        assert!(is_valid_weight(7.5));
        assert!(!is_valid_weight(-1.0));
        assert!(!is_valid_weight(f64::NAN));
        assert!(!is_valid_weight(INFINITE_WEIGHT));
    }
}
