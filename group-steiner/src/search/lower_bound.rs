//! Admissible lower bounds on the cost of completing a partial tree.
//!
//! For a state `(v, X)` with remaining labels `R = P \ X` the completion cost
//! is bounded below by the largest of
//!
//! * `f1 = max_{p ∈ R} dist(v, p)`
//! * `f2 = max_{p, q ∈ R} ½ (dist(v, p) + D(p, q) + dist(v, q))`
//! * `f3 = ½ (m1 + m2 + MST_D(R))` where `m1 ≤ m2` are the two smallest
//!   distances from `v` to distinct labels of `R` and `MST_D` spans `R`
//!   under the label-to-label distances `D(·, ·)`.
//!
//! Doubling any covering tree gives a closed walk from `v` through a carrier
//! of every remaining label, which is where all three come from.
//!
//! `f2` and `f3` are only evaluated when tight bounds are enabled. Every term
//! grows by at most `w` across a grow step of weight `w`, and by at most the
//! partner's cost across a merge, so priorities never decrease along a
//! derivation. A spanning tree over `{v} ∪ R` would be admissible too but
//! loses that property once `v` has several tree neighbors.

use common::{saturating_add, VertexId, Weight, INFINITE_WEIGHT};

use crate::algorithms::algo::half;
use crate::config::MAX_QUERY_LABELS;
use crate::core::query::LabelMask;
use crate::search::distance::TerminalDistanceIndex;

#[derive(Debug, Clone, Copy)]
pub struct LowerBoundEstimator<'a> {
    index: &'a TerminalDistanceIndex,
    tight: bool,
}

impl<'a> LowerBoundEstimator<'a> {
    pub fn new(index: &'a TerminalDistanceIndex, tight: bool) -> Self {
        Self { index, tight }
    }

    /// `cost(v, X) + max(f1, f2, f3)`, infinite if some label is unreachable.
    pub fn estimate(&self, v: VertexId, covered: LabelMask, cost: Weight) -> Weight {
        let rest = self.index.full_mask().difference(covered);
        if rest.is_empty() {
            return cost;
        }
        saturating_add(cost, self.completion_bound(v, rest))
    }

    /// Lower bound on the weight needed to attach every label of `rest` to `v`.
    pub fn completion_bound(&self, v: VertexId, rest: LabelMask) -> Weight {
        let f1 = self.one_label(v, rest);
        if f1.is_infinite() || !self.tight || rest.len() < 2 {
            return f1;
        }
        f1.max(self.two_label(v, rest)).max(self.half_tour(v, rest))
    }

    /// f1: the farthest remaining label.
    pub fn one_label(&self, v: VertexId, rest: LabelMask) -> Weight {
        rest.iter().map(|p| self.index.dist(v, p)).fold(0.0, Weight::max)
    }

    /// f2: the most expensive pair of remaining labels.
    pub fn two_label(&self, v: VertexId, rest: LabelMask) -> Weight {
        let bits: Vec<usize> = rest.iter().collect();
        let mut bound: Weight = 0.0;
        for (i, &p) in bits.iter().enumerate() {
            let dp = self.index.dist(v, p);
            for &q in &bits[i + 1..] {
                let through = saturating_add(
                    saturating_add(dp, self.index.label_distance(p, q)),
                    self.index.dist(v, q),
                );
                bound = bound.max(half(through));
            }
        }
        bound
    }

    /// f3: half of the two nearest labels plus the label spanning tree (Prim over `D`).
    pub fn half_tour(&self, v: VertexId, rest: LabelMask) -> Weight {
        let mut bits = [0usize; MAX_QUERY_LABELS];
        let mut m = 0;
        let (mut nearest, mut second) = (INFINITE_WEIGHT, INFINITE_WEIGHT);
        for bit in rest.iter() {
            bits[m] = bit;
            m += 1;
            let d = self.index.dist(v, bit);
            if d < nearest {
                second = nearest;
                nearest = d;
            } else if d < second {
                second = d;
            }
        }
        if m < 2 {
            return 0.0;
        }

        let mut key = [INFINITE_WEIGHT; MAX_QUERY_LABELS];
        let mut in_tree = [false; MAX_QUERY_LABELS];
        key[0] = 0.0;
        let mut spanning = 0.0;

        for _ in 0..m {
            let mut next = None;
            for node in 0..m {
                if !in_tree[node] && next.is_none_or(|best: usize| key[node] < key[best]) {
                    next = Some(node);
                }
            }
            let Some(u) = next else { break };
            if key[u].is_infinite() {
                return INFINITE_WEIGHT;
            }
            in_tree[u] = true;
            spanning += key[u];

            for node in 0..m {
                if !in_tree[node] {
                    let w = self.index.label_distance(bits[u], bits[node]);
                    if w < key[node] {
                        key[node] = w;
                    }
                }
            }
        }
        half(saturating_add(saturating_add(nearest, second), spanning))
    }
}
