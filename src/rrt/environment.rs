use std::collections::VecDeque;

use nalgebra::Vector3;

use super::informed::Ellipsoid;
use super::node::{NodePool, START};
use super::State;

/// Occupancy queries the planner consumes. Each answer is taken as-is: no caching, no retries.
pub trait CollisionChecker {
    fn is_state_valid(&self, state: &State) -> bool;

    fn is_segment_valid(&self, from: &State, to: &State) -> bool;

    /// Lower corner of the sampling box
    fn origin(&self) -> State;

    /// Side lengths of the sampling box
    fn extent(&self) -> Vector3<f64>;
}

/// Observer for the search process. Must not influence planning.
pub trait Visualizer {
    /// Whether per-iteration tree snapshots are wanted. Building one walks the whole tree.
    fn enabled(&self) -> bool {
        true
    }

    fn tree(&mut self, _snapshot: &TreeSnapshot) {}

    fn informed_region(&mut self, _ellipsoid: &Ellipsoid) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopVisualizer;

impl Visualizer for NoopVisualizer {
    fn enabled(&self) -> bool {
        false
    }
}

/// Vertices and parent/child edges reachable from the start.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeSnapshot {
    pub vertices: Vec<State>,
    pub edges: Vec<(State, State)>,
}

impl TreeSnapshot {
    pub fn capture(pool: &NodePool) -> Self {
        let mut snapshot = TreeSnapshot::default();
        let mut queue = VecDeque::from([START]);
        while let Some(node) = queue.pop_front() {
            let parent_state = pool[node].state;
            for &child in pool[node].children() {
                snapshot.vertices.push(pool[child].state);
                snapshot.edges.push((parent_state, pool[child].state));
                queue.push_back(child);
            }
        }
        snapshot
    }
}
