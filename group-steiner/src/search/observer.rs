//! Progress reporting and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use common::Weight;
use serde::Serialize;

/// Emitted each time the best known tree improves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressUpdate {
    /// Weight of the new incumbent.
    pub best: Weight,
    /// Smallest priority still on the frontier, if any.
    pub frontier_min: Option<Weight>,
    /// Iterations completed when the improvement happened.
    pub iteration: u64,
}

impl ProgressUpdate {
    /// `best / frontier_min`, an upper bound on how far the incumbent is from optimal.
    ///
    /// `None` while the frontier is empty or its minimum is zero.
    pub fn approximation_ratio(&self) -> Option<f64> {
        match self.frontier_min {
            Some(min) if min > 0.0 && min < self.best => Some(self.best / min),
            Some(min) if min > 0.0 => Some(1.0),
            _ => None,
        }
    }
}

/// Receives incumbent improvements while a search runs.
pub trait ProgressObserver {
    fn on_improvement(&mut self, update: &ProgressUpdate);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&ProgressUpdate),
{
    fn on_improvement(&mut self, update: &ProgressUpdate) {
        self(update)
    }
}

/// Shared flag that stops a running search at its next iteration.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Clears the flag so the engine can be reused.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}
