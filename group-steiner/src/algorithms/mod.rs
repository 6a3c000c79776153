//! Graph algorithms used by the search: shortest paths and spanning trees.

pub mod algo;
pub mod dijkstra;
pub mod min_spanning_tree;

pub use algo::{half, total_weight, TreeEdge};
pub use dijkstra::{dijkstra, multi_source_dijkstra, ShortestPathForest};
pub use min_spanning_tree::kruskal_mst;
