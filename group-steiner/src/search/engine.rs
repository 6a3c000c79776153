//! Best-first dynamic programming over `(vertex, label set)` states.
//!
//! Each state `(v, X)` stands for the cheapest known tree that contains `v`
//! and covers the query labels in `X`. States are expanded in order of
//! their priority (the cost itself, or cost plus an admissible completion
//! bound) in two ways:
//!
//! * **grow** moves the root along an edge `(v, u)`, keeping `X`;
//! * **merge** joins two finalized trees rooted at the same vertex whose
//!   label sets are disjoint.
//!
//! A finalized state's cost is exact. Feasible trees discovered on the way
//! (a state meeting its complement, or the MST completion of a state) form
//! the incumbent `best`, which in turn prunes every state whose priority
//! cannot beat it.
//!
//! # Example
//!
//! ```rust
//! use group_steiner::graph::LabeledGraph;
//! use group_steiner::query::Query;
//! use group_steiner::search::engine::SearchEngine;
//! use group_steiner::config::SearchConfig;
//!
//! let mut builder = LabeledGraph::builder();
//! builder.add_vertex("a", ["x"]).unwrap();
//! builder.add_vertex("b", ["y"]).unwrap();
//! builder.add_edge("a", "b", 2.0).unwrap();
//! let graph = builder.build();
//!
//! let query = Query::from_names(&graph, ["x", "y"]).unwrap();
//! let outcome = SearchEngine::new(&graph, SearchConfig::default()).solve(&query).unwrap();
//! assert_eq!(outcome.weight, 2.0);
//! ```

use std::time::{Duration, Instant};

use common::{saturating_add, VertexId, Weight, INFINITE_WEIGHT};

use crate::config::{SearchConfig, EXPANSION_GATE_RATIO, MERGE_GATE_RATIO};
use crate::core::graph::GraphModel;
use crate::core::query::{LabelMask, Query};
use crate::errors::{SteinerError, SteinerResult};
use crate::search::distance::TerminalDistanceIndex;
use crate::search::frontier::PriorityFrontier;
use crate::search::lower_bound::LowerBoundEstimator;
use crate::search::merge_mst::MergeMstBuilder;
use crate::search::observer::{CancelFlag, ProgressObserver, ProgressUpdate};
use crate::search::outcome::{SearchOutcome, SearchStats, SearchStatus, SteinerTree};
use crate::search::state::{Provenance, StateKey};
use crate::search::store::StateStore;

// ============================================================================
// ENGINE
// ============================================================================

/// Group Steiner tree solver bound to one graph.
///
/// The engine holds no per-query state; `solve*` may be called repeatedly,
/// and concurrently from several threads sharing `&SearchEngine`.
pub struct SearchEngine<'g, G: GraphModel + ?Sized> {
    graph: &'g G,
    config: SearchConfig,
    cancel: Option<CancelFlag>,
}

impl<'g, G: GraphModel + ?Sized> SearchEngine<'g, G> {
    pub fn new(graph: &'g G, config: SearchConfig) -> Self {
        Self {
            graph,
            config,
            cancel: None,
        }
    }

    /// Attaches a flag that aborts running searches when set.
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn graph(&self) -> &'g G {
        self.graph
    }

    /// Resolves label names into a query against this engine's graph.
    pub fn query<I, S>(&self, names: I) -> SteinerResult<Query>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Query::from_names(self.graph, names)
    }

    /// Builds the distance index for `query`.
    ///
    /// The index can be reused by [`solve_prepared`](Self::solve_prepared)
    /// for any number of searches over the same query.
    pub fn prepare(&self, query: &Query) -> SteinerResult<TerminalDistanceIndex> {
        self.config.validate()?;
        let started = Instant::now();
        let index = TerminalDistanceIndex::build(self.graph, query, self.config.parallel_preprocessing)?;
        log::debug!(
            "prepared {} labels in {:?}",
            index.label_count(),
            started.elapsed()
        );
        Ok(index)
    }

    /// Finds a minimum-weight tree covering every label of `query`.
    pub fn solve(&self, query: &Query) -> SteinerResult<SearchOutcome> {
        self.solve_with_observer(query, &mut |_: &ProgressUpdate| {})
    }

    /// Like [`solve`](Self::solve), reporting each incumbent improvement to `observer`.
    pub fn solve_with_observer<O>(&self, query: &Query, observer: &mut O) -> SteinerResult<SearchOutcome>
    where
        O: ProgressObserver + ?Sized,
    {
        if query.is_empty() {
            self.config.validate()?;
            return Ok(SearchOutcome::empty_query());
        }
        let index = self.prepare(query)?;
        self.solve_prepared(&index, observer)
    }

    /// Runs a search over an index built by [`prepare`](Self::prepare).
    ///
    /// Fails with [`SteinerError::IndexMismatch`] if the index was prepared
    /// over a graph of a different size.
    pub fn solve_prepared<O>(&self, index: &TerminalDistanceIndex, observer: &mut O) -> SteinerResult<SearchOutcome>
    where
        O: ProgressObserver + ?Sized,
    {
        if index.vertex_count() != self.graph.vertex_count() {
            return Err(SteinerError::IndexMismatch {
                index_vertices: index.vertex_count(),
                graph_vertices: self.graph.vertex_count(),
            });
        }
        if index.label_count() == 0 {
            return Ok(SearchOutcome::empty_query());
        }
        if let Some(reason) = index.infeasibility() {
            log::info!("query is infeasible: {}", reason);
            return Ok(SearchOutcome::infeasible(reason));
        }
        Ok(SearchContext::new(self.graph, index, &self.config, self.cancel.as_ref(), observer).run())
    }
}

// ============================================================================
// PER-QUERY SEARCH
// ============================================================================

/// Lifecycle of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchPhase {
    Initialized,
    Running,
    Solved,
    Exhausted,
    Cancelled,
}

struct SearchContext<'a, G: GraphModel + ?Sized, O: ProgressObserver + ?Sized> {
    graph: &'a G,
    index: &'a TerminalDistanceIndex,
    config: &'a SearchConfig,
    cancel: Option<&'a CancelFlag>,
    observer: &'a mut O,
    estimator: LowerBoundEstimator<'a>,
    completions: MergeMstBuilder<'a>,
    store: StateStore,
    frontier: PriorityFrontier,
    full: LabelMask,
    best: Weight,
    incumbent: Option<SteinerTree>,
    stats: SearchStats,
    phase: SearchPhase,
    started: Instant,
}

impl<'a, G: GraphModel + ?Sized, O: ProgressObserver + ?Sized> SearchContext<'a, G, O> {
    fn new(
        graph: &'a G,
        index: &'a TerminalDistanceIndex,
        config: &'a SearchConfig,
        cancel: Option<&'a CancelFlag>,
        observer: &'a mut O,
    ) -> Self {
        Self {
            graph,
            index,
            config,
            cancel,
            observer,
            estimator: LowerBoundEstimator::new(index, config.tight_lower_bounds),
            completions: MergeMstBuilder::new(index),
            store: StateStore::new(),
            frontier: PriorityFrontier::new(),
            full: index.full_mask(),
            best: INFINITE_WEIGHT,
            incumbent: None,
            stats: SearchStats::default(),
            phase: SearchPhase::Initialized,
            started: Instant::now(),
        }
    }

    fn run(mut self) -> SearchOutcome {
        self.transition(SearchPhase::Running);
        self.seed();

        loop {
            if self.interrupted() {
                return self.finish(SearchPhase::Cancelled);
            }
            let Some(popped) = self.frontier.pop() else {
                return self.finish(SearchPhase::Exhausted);
            };
            self.stats.iterations += 1;

            // Nothing left can beat the incumbent.
            if popped.priority >= self.best {
                return self.finish(SearchPhase::Solved);
            }

            let key = popped.key;
            let Some(cost) = self.store.finalize(key) else {
                continue;
            };
            log::trace!("settle {} cost={} priority={}", key, cost, popped.priority);

            if key.mask == self.full {
                if let Some(tree) = self.completions.combine(&self.store, key.vertex, &[key]) {
                    self.offer_incumbent(tree);
                }
                if cost < self.best {
                    self.best = cost;
                }
                return self.finish(SearchPhase::Solved);
            }

            self.settle(key, cost);
        }
    }

    /// Pushes a leaf state for every (carrier, label) pair.
    fn seed(&mut self) {
        for i in 0..self.index.vertex_count() {
            let v = VertexId::new(i);
            for bit in self.index.vertex_mask(v).iter() {
                self.update(StateKey::new(v, LabelMask::single(bit)), 0.0, Provenance::Leaf);
            }
        }
        log::debug!("seeded {} leaf states", self.frontier.len());
    }

    fn settle(&mut self, key: StateKey, cost: Weight) {
        let pruning = self.config.pruning;

        if pruning.direct_completion {
            let complement = key.complement(self.full);
            if let Some(other) = self.store.finalized_cost(complement) {
                if saturating_add(cost, other) < self.best {
                    if let Some(tree) = self.completions.combine(&self.store, key.vertex, &[key, complement]) {
                        self.offer_incumbent(tree);
                    }
                }
            }
        }

        if pruning.merge_mst_bounds {
            if let Some(tree) = self.completions.candidate(&self.store, key) {
                self.offer_incumbent(tree);
            }
        }

        if pruning.expansion_gate && cost >= self.best * EXPANSION_GATE_RATIO {
            self.stats.expansion_gated += 1;
            return;
        }

        self.grow(key, cost);
        self.merge(key, cost);
    }

    fn grow(&mut self, key: StateKey, cost: Weight) {
        let graph = self.graph;
        for &(u, weight) in graph.neighbors(key.vertex) {
            self.stats.grows += 1;
            self.update(
                StateKey::new(u, key.mask),
                saturating_add(cost, weight),
                Provenance::Grow { from: key, weight },
            );
        }
    }

    fn merge(&mut self, key: StateKey, cost: Weight) {
        let partners: Vec<LabelMask> = self
            .store
            .settled_masks(key.vertex)
            .iter()
            .copied()
            .filter(|mask| !mask.intersects(key.mask))
            .collect();

        for mask in partners {
            let partner = StateKey::new(key.vertex, mask);
            let Some(partner_cost) = self.store.finalized_cost(partner) else {
                continue;
            };
            let merged = saturating_add(cost, partner_cost);
            if self.config.pruning.merge_gate && merged > self.best * MERGE_GATE_RATIO {
                self.stats.merge_gated += 1;
                continue;
            }
            self.stats.merges += 1;
            self.update(
                StateKey::new(key.vertex, key.mask.union(mask)),
                merged,
                Provenance::Merge { left: key, right: partner },
            );
        }
    }

    /// Records `cost` for `key` and queues it if it improves the state and
    /// its priority can still beat the incumbent.
    fn update(&mut self, key: StateKey, cost: Weight, provenance: Provenance) {
        if self.store.is_finalized(key) {
            return;
        }
        let priority = if self.config.variant.uses_lower_bounds() {
            self.estimator.estimate(key.vertex, key.mask, cost)
        } else {
            cost
        };
        if priority >= self.best {
            self.stats.pruned_by_bound += 1;
            return;
        }
        if !self.store.offer(key, cost, provenance) {
            return;
        }
        if self.frontier.upsert(key, priority, cost) {
            self.stats.pushes += 1;
        }
    }

    fn offer_incumbent(&mut self, tree: SteinerTree) {
        if tree.weight() >= self.best {
            return;
        }
        self.best = tree.weight();
        self.incumbent = Some(tree);
        self.stats.best_updates += 1;

        let update = ProgressUpdate {
            best: self.best,
            frontier_min: self.frontier.peek_priority(),
            iteration: self.stats.iterations,
        };
        log::debug!(
            "best improved to {} at iteration {} (frontier min {:?})",
            update.best,
            update.iteration,
            update.frontier_min
        );
        self.observer.on_improvement(&update);
    }

    fn interrupted(&self) -> bool {
        if self.cancel.is_some_and(CancelFlag::is_cancelled) {
            return true;
        }
        let budget = &self.config.budget;
        if budget
            .max_iterations
            .is_some_and(|max| self.stats.iterations >= max)
        {
            return true;
        }
        budget
            .time_limit_ms
            .is_some_and(|ms| self.started.elapsed() >= Duration::from_millis(ms))
    }

    fn transition(&mut self, next: SearchPhase) {
        log::trace!("search phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    fn finish(mut self, phase: SearchPhase) -> SearchOutcome {
        self.transition(phase);
        self.stats.stale_pops = self.frontier.stale_count();
        self.stats.states_discovered = self.store.len();
        self.stats.states_finalized = self.store.finalized_count();
        self.stats.elapsed_micros = self.started.elapsed().as_micros() as u64;

        let status = match self.phase {
            SearchPhase::Cancelled => SearchStatus::Cancelled,
            SearchPhase::Exhausted => SearchStatus::Exhausted,
            _ => SearchStatus::Solved,
        };
        let proven_optimal = status != SearchStatus::Cancelled;

        log::info!(
            "search {:?}: weight={} iterations={} finalized={} elapsed={}us",
            status,
            self.best,
            self.stats.iterations,
            self.stats.states_finalized,
            self.stats.elapsed_micros
        );

        SearchOutcome {
            status,
            weight: self.best,
            tree: self.incumbent,
            proven_optimal,
            stats: self.stats,
        }
    }
}
