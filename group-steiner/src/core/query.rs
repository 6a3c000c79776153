//! Query label sets and label-subset bitmasks.
//!
//! A query fixes an order over its labels; bit `i` of a [`LabelMask`] stands
//! for the `i`-th query label. Labels no vertex carries stay in the query
//! (with `id == None`) so the engine can report the query as infeasible.

use common::{QueryError, VertexId};
use serde::{Deserialize, Serialize};

use crate::config::MAX_QUERY_LABELS;
use crate::core::graph::GraphModel;
use crate::errors::SteinerResult;

/// Subset of the query labels, one bit per label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct LabelMask(u32);

impl LabelMask {
    /// The empty subset.
    pub const EMPTY: LabelMask = LabelMask(0);

    /// Subset holding only label `bit`.
    #[inline]
    pub fn single(bit: usize) -> Self {
        debug_assert!(bit < MAX_QUERY_LABELS);
        LabelMask(1u32 << bit)
    }

    /// Subset holding labels `0..n`.
    #[inline]
    pub fn full(n: usize) -> Self {
        debug_assert!(n <= MAX_QUERY_LABELS);
        if n >= 32 {
            LabelMask(u32::MAX)
        } else {
            LabelMask((1u32 << n) - 1)
        }
    }

    /// Raw bits.
    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Builds a mask from raw bits.
    #[inline]
    pub fn from_bits(bits: u32) -> Self {
        LabelMask(bits)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of labels in the subset.
    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn contains(self, bit: usize) -> bool {
        bit < 32 && self.0 & (1u32 << bit) != 0
    }

    #[inline]
    pub fn union(self, other: LabelMask) -> LabelMask {
        LabelMask(self.0 | other.0)
    }

    #[inline]
    pub fn intersection(self, other: LabelMask) -> LabelMask {
        LabelMask(self.0 & other.0)
    }

    /// Labels in `self` but not in `other`.
    #[inline]
    pub fn difference(self, other: LabelMask) -> LabelMask {
        LabelMask(self.0 & !other.0)
    }

    #[inline]
    pub fn intersects(self, other: LabelMask) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn is_subset_of(self, other: LabelMask) -> bool {
        self.0 & !other.0 == 0
    }

    /// Bit indices in increasing order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        let mut rest = self.0;
        std::iter::from_fn(move || {
            if rest == 0 {
                return None;
            }
            let bit = rest.trailing_zeros() as usize;
            rest &= rest - 1;
            Some(bit)
        })
    }
}

impl std::ops::BitOr for LabelMask {
    type Output = LabelMask;

    fn bitor(self, rhs: LabelMask) -> LabelMask {
        self.union(rhs)
    }
}

impl std::fmt::Display for LabelMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, bit) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", bit)?;
        }
        write!(f, "}}")
    }
}

/// One label of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryLabel {
    /// Name as given by the caller.
    pub name: String,
    /// Graph label id; `None` if no vertex carries it.
    pub id: Option<common::LabelId>,
}

/// The query label set P, resolved against one graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    labels: Vec<QueryLabel>,
}

impl Query {
    /// Resolves label names against `graph`. Duplicates collapse, order is kept.
    pub fn from_names<G, I, S>(graph: &G, names: I) -> SteinerResult<Self>
    where
        G: GraphModel + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut labels: Vec<QueryLabel> = Vec::new();
        for name in names {
            let name = name.as_ref();
            if labels.iter().any(|l| l.name == name) {
                continue;
            }
            labels.push(QueryLabel {
                name: name.to_string(),
                id: graph.label_id(name),
            });
        }
        if labels.len() > MAX_QUERY_LABELS {
            return Err(QueryError::TooManyLabels {
                requested: labels.len(),
                max: MAX_QUERY_LABELS,
            }
            .into());
        }
        Ok(Self { labels })
    }

    /// The empty query.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[QueryLabel] {
        &self.labels
    }

    /// Label at bit position `bit`.
    pub fn label(&self, bit: usize) -> Option<&QueryLabel> {
        self.labels.get(bit)
    }

    /// Mask holding every query label.
    pub fn full_mask(&self) -> LabelMask {
        LabelMask::full(self.labels.len())
    }

    /// Query labels carried by `v`.
    pub fn vertex_mask<G: GraphModel + ?Sized>(&self, graph: &G, v: VertexId) -> LabelMask {
        let carried = graph.labels(v);
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, label)| label.id.is_some_and(|id| carried.contains(&id)))
            .fold(LabelMask::EMPTY, |mask, (bit, _)| mask.union(LabelMask::single(bit)))
    }

    /// Names of the labels in `mask`.
    pub fn mask_names(&self, mask: LabelMask) -> Vec<&str> {
        mask.iter()
            .filter_map(|bit| self.labels.get(bit))
            .map(|label| label.name.as_str())
            .collect()
    }
}
