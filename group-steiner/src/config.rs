//! Configuration constants and structures for the search engine.
//!
//! - No magic numbers in the engine: pruning ratios and limits live here
//! - `SearchConfig` is serde-friendly and loads from TOML

use std::path::Path;

use common::ConfigError;
use serde::{Deserialize, Serialize};

use crate::errors::{SteinerError, SteinerResult};

// ============================================================================
// Search Limits
// ============================================================================

/// Maximum number of labels in a query (width of [`crate::query::LabelMask`]).
pub const MAX_QUERY_LABELS: usize = 32;

/// A popped state with `cost >= best * EXPANSION_GATE_RATIO` is not grown or merged.
pub const EXPANSION_GATE_RATIO: f64 = 0.5;

/// A merged state is admitted only if `cost <= best * MERGE_GATE_RATIO`.
pub const MERGE_GATE_RATIO: f64 = 2.0 / 3.0;

/// Below this many query labels the distance index is built on the calling thread.
pub const DEFAULT_PARALLEL_LABEL_THRESHOLD: usize = 4;

// ============================================================================
// Search Configuration
// ============================================================================

/// Which member of the best-first family to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchVariant {
    /// Cost-ordered DP over label subsets, no pruning.
    Basic,
    /// Cost-ordered with the threshold rules and MST upper bounds.
    Pruned,
    /// Lower-bound ordered with every pruning rule.
    PrunedPlusPlus,
}

impl Default for SearchVariant {
    fn default() -> Self {
        Self::PrunedPlusPlus
    }
}

impl SearchVariant {
    /// Whether frontier priorities come from the lower-bound estimator.
    pub fn uses_lower_bounds(self) -> bool {
        matches!(self, Self::PrunedPlusPlus)
    }
}

/// Switches for the individual pruning and bound-tightening rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruningConfig {
    /// Skip grow/merge of states with `cost >= best / 2`.
    pub expansion_gate: bool,

    /// Drop merges whose cost exceeds `2/3 * best`.
    pub merge_gate: bool,

    /// Build a feasible tree from every finalized state to tighten `best`.
    pub merge_mst_bounds: bool,

    /// Combine a finalized state with its finalized complement at the same vertex.
    pub direct_completion: bool,
}

impl Default for PruningConfig {
    fn default() -> Self {
        Self::enabled()
    }
}

impl PruningConfig {
    /// Every rule on.
    pub fn enabled() -> Self {
        Self {
            expansion_gate: true,
            merge_gate: true,
            merge_mst_bounds: true,
            direct_completion: true,
        }
    }

    /// Every rule off.
    pub fn disabled() -> Self {
        Self {
            expansion_gate: false,
            merge_gate: false,
            merge_mst_bounds: false,
            direct_completion: false,
        }
    }
}

/// Cooperative cancellation budget, checked once per loop iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBudget {
    /// Maximum number of frontier pops.
    pub max_iterations: Option<u64>,

    /// Wall-clock limit in milliseconds.
    pub time_limit_ms: Option<u64>,
}

impl SearchBudget {
    /// No limits.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Limit the number of frontier pops.
    pub fn iterations(max_iterations: u64) -> Self {
        Self {
            max_iterations: Some(max_iterations),
            time_limit_ms: None,
        }
    }

    /// Limit wall-clock time.
    pub fn time_limit_ms(millis: u64) -> Self {
        Self {
            max_iterations: None,
            time_limit_ms: Some(millis),
        }
    }
}

/// Full configuration of one search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Algorithm variant.
    pub variant: SearchVariant,

    /// Pruning rule switches.
    pub pruning: PruningConfig,

    /// Add the two-label and half-MST terms to the lower bound.
    pub tight_lower_bounds: bool,

    /// Compute per-label distance columns on worker threads.
    pub parallel_preprocessing: bool,

    /// Cancellation budget.
    pub budget: SearchBudget,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::pruned_plus_plus()
    }
}

impl SearchConfig {
    /// Plain best-first DP ordered by cost.
    pub fn basic() -> Self {
        Self {
            variant: SearchVariant::Basic,
            pruning: PruningConfig::disabled(),
            tight_lower_bounds: false,
            parallel_preprocessing: true,
            budget: SearchBudget::unlimited(),
        }
    }

    /// Cost-ordered search with both thresholds and MST upper bounds.
    pub fn pruned() -> Self {
        Self {
            variant: SearchVariant::Pruned,
            pruning: PruningConfig::enabled(),
            tight_lower_bounds: false,
            parallel_preprocessing: true,
            budget: SearchBudget::unlimited(),
        }
    }

    /// Lower-bound ordered search with every rule enabled.
    pub fn pruned_plus_plus() -> Self {
        Self {
            variant: SearchVariant::PrunedPlusPlus,
            pruning: PruningConfig::enabled(),
            tight_lower_bounds: true,
            parallel_preprocessing: true,
            budget: SearchBudget::unlimited(),
        }
    }

    /// Same configuration with both threshold rules switched off.
    pub fn without_thresholds(mut self) -> Self {
        self.pruning.expansion_gate = false;
        self.pruning.merge_gate = false;
        self
    }

    /// Same configuration with a different budget.
    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Same configuration with preprocessing forced onto the calling thread.
    pub fn sequential(mut self) -> Self {
        self.parallel_preprocessing = false;
        self
    }

    /// Parses a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(source: &str) -> SteinerResult<Self> {
        let config: SearchConfig =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> SteinerResult<Self> {
        let source = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            SteinerError::Io(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml_str(&source)
    }

    /// Rejects combinations that cannot run.
    pub fn validate(&self) -> SteinerResult<()> {
        if self.budget.time_limit_ms == Some(0) {
            return Err(ConfigError::Invalid("time_limit_ms must be positive".into()).into());
        }
        if self.budget.max_iterations == Some(0) {
            return Err(ConfigError::Invalid("max_iterations must be positive".into()).into());
        }
        if self.tight_lower_bounds && !self.variant.uses_lower_bounds() {
            log::debug!("tight_lower_bounds has no effect for {:?}", self.variant);
        }
        Ok(())
    }
}
