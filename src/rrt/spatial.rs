//! Incremental nearest / radius-range indexes over tree states.
//!
//! The planner only ever inserts; nodes are reparented, never removed, during a run.

use rstar::{primitives::GeomWithData, RTree};

use super::node::NodeId;
use super::State;

/// Spatial backend abstraction used by the planner.
pub trait SpatialIndex {
    fn clear(&mut self);

    fn insert(&mut self, point: State, node: NodeId);

    /// Closest inserted node, or `None` only when the index is empty.
    fn nearest(&self, point: &State) -> Option<NodeId>;

    /// Every node within `radius` of `point`, boundary included.
    fn range(&self, point: &State, radius: f64) -> Vec<NodeId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

type Entry = GeomWithData<[f64; 3], NodeId>;

fn coords(point: &State) -> [f64; 3] {
    [point.x, point.y, point.z]
}

/// R-tree backend with O(log n) inserts and queries.
#[derive(Default)]
pub struct RTreeIndex {
    tree: RTree<Entry>,
}

impl RTreeIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for RTreeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RTreeIndex")
            .field("size", &self.tree.size())
            .finish_non_exhaustive()
    }
}

impl SpatialIndex for RTreeIndex {
    fn clear(&mut self) {
        self.tree = RTree::new();
    }

    fn insert(&mut self, point: State, node: NodeId) {
        self.tree.insert(Entry::new(coords(&point), node));
    }

    fn nearest(&self, point: &State) -> Option<NodeId> {
        self.tree.nearest_neighbor(&coords(point)).map(|entry| entry.data)
    }

    fn range(&self, point: &State, radius: f64) -> Vec<NodeId> {
        self.tree
            .locate_within_distance(coords(point), radius * radius)
            .map(|entry| entry.data)
            .collect()
    }

    fn len(&self) -> usize {
        self.tree.size()
    }
}

/// Flat vector backend with linear scans. Small and simple; good for tiny trees.
#[derive(Debug, Default)]
pub struct FlatIndex {
    entries: Vec<(State, NodeId)>,
}

impl FlatIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpatialIndex for FlatIndex {
    fn clear(&mut self) {
        self.entries.clear();
    }

    fn insert(&mut self, point: State, node: NodeId) {
        self.entries.push((point, node));
    }

    fn nearest(&self, point: &State) -> Option<NodeId> {
        let mut best: Option<(f64, NodeId)> = None;
        for (state, node) in &self.entries {
            let dist_sq = (state - point).norm_squared();
            match best {
                Some((best_dist_sq, _)) if best_dist_sq <= dist_sq => {}
                _ => best = Some((dist_sq, *node)),
            }
        }
        best.map(|(_, node)| node)
    }

    fn range(&self, point: &State, radius: f64) -> Vec<NodeId> {
        let radius_sq = radius * radius;
        self.entries
            .iter()
            .filter(|(state, _)| (state - point).norm_squared() <= radius_sq)
            .map(|(_, node)| *node)
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
