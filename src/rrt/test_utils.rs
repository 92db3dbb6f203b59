//! Shared fixtures for planner tests.

use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::{Matrix3, Vector3};

use super::environment::{CollisionChecker, TreeSnapshot, Visualizer};
use super::informed::Ellipsoid;
use super::node::{NodeId, NodePool, GOAL, START};
use super::sampler::Sampler;
use super::spatial::{FlatIndex, SpatialIndex};
use super::State;

/// Axis-aligned box with spherical obstacles.
#[derive(Clone, Debug)]
pub struct SphereWorld {
    pub origin: State,
    pub extent: Vector3<f64>,
    pub spheres: Vec<(State, f64)>,
}

impl SphereWorld {
    pub fn open(origin: State, extent: Vector3<f64>) -> Self {
        Self {
            origin,
            extent,
            spheres: Vec::new(),
        }
    }

    pub fn with_sphere(mut self, center: State, radius: f64) -> Self {
        self.spheres.push((center, radius));
        self
    }

    fn in_bounds(&self, state: &State) -> bool {
        let max = self.origin + self.extent;
        (0..3).all(|i| state[i] >= self.origin[i] && state[i] <= max[i])
    }
}

impl CollisionChecker for SphereWorld {
    fn is_state_valid(&self, state: &State) -> bool {
        self.in_bounds(state)
            && self
                .spheres
                .iter()
                .all(|(center, radius)| (state - center).norm() > *radius)
    }

    fn is_segment_valid(&self, from: &State, to: &State) -> bool {
        if !self.is_state_valid(from) || !self.is_state_valid(to) {
            return false;
        }
        let segment = to - from;
        let length_sq = segment.norm_squared();
        self.spheres.iter().all(|(center, radius)| {
            let t = if length_sq > 0.0 {
                ((center - from).dot(&segment) / length_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let closest = from + segment * t;
            (center - closest).norm() > *radius
        })
    }

    fn origin(&self) -> State {
        self.origin
    }

    fn extent(&self) -> Vector3<f64> {
        self.extent
    }
}

/// Accepts only the listed states; every segment between them is free.
#[derive(Clone, Debug)]
pub struct OnlyStates(pub Vec<State>);

impl CollisionChecker for OnlyStates {
    fn is_state_valid(&self, state: &State) -> bool {
        self.0.contains(state)
    }

    fn is_segment_valid(&self, from: &State, to: &State) -> bool {
        self.is_state_valid(from) && self.is_state_valid(to)
    }

    fn origin(&self) -> State {
        State::origin()
    }

    fn extent(&self) -> Vector3<f64> {
        Vector3::repeat(10.0)
    }
}

/// Every state is free; only the listed segments (either direction) are blocked.
#[derive(Clone, Debug, Default)]
pub struct BlockedSegments(pub Vec<(State, State)>);

impl CollisionChecker for BlockedSegments {
    fn is_state_valid(&self, _state: &State) -> bool {
        true
    }

    fn is_segment_valid(&self, from: &State, to: &State) -> bool {
        !self
            .0
            .iter()
            .any(|(a, b)| (a == from && b == to) || (a == to && b == from))
    }

    fn origin(&self) -> State {
        State::origin()
    }

    fn extent(&self) -> Vector3<f64> {
        Vector3::repeat(10.0)
    }
}

/// Replays a fixed list of states, wrapping around at the end.
#[derive(Clone, Debug)]
pub struct ScriptedSampler {
    states: Vec<State>,
    next: usize,
}

impl ScriptedSampler {
    pub fn new(states: Vec<State>) -> Self {
        Self { states, next: 0 }
    }
}

impl Sampler for ScriptedSampler {
    fn reset(&mut self) {}

    fn set_sampling_range(&mut self, _origin: State, _extent: Vector3<f64>) {}

    fn set_informed_region(
        &mut self,
        _translation: State,
        _rotation: Matrix3<f64>,
        _scale: Vector3<f64>,
    ) {
    }

    fn sample_once(&mut self) -> State {
        let state = self.states[self.next % self.states.len()];
        self.next += 1;
        state
    }
}

/// Stores entries like [`FlatIndex`] but never answers a nearest query.
#[derive(Debug, Default)]
pub struct NoNearestIndex(pub FlatIndex);

impl SpatialIndex for NoNearestIndex {
    fn clear(&mut self) {
        self.0.clear();
    }

    fn insert(&mut self, point: State, node: NodeId) {
        self.0.insert(point, node);
    }

    fn nearest(&self, _point: &State) -> Option<NodeId> {
        None
    }

    fn range(&self, point: &State, radius: f64) -> Vec<NodeId> {
        self.0.range(point, radius)
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Default)]
pub struct Recording {
    pub tree_updates: usize,
    pub last_tree: Option<TreeSnapshot>,
    pub ellipsoids: Vec<Ellipsoid>,
}

/// Visualizer that keeps everything it is shown.
#[derive(Clone, Debug, Default)]
pub struct RecordingVisualizer(pub Rc<RefCell<Recording>>);

impl Visualizer for RecordingVisualizer {
    fn tree(&mut self, snapshot: &TreeSnapshot) {
        let mut recording = self.0.borrow_mut();
        recording.tree_updates += 1;
        recording.last_tree = Some(snapshot.clone());
    }

    fn informed_region(&mut self, ellipsoid: &Ellipsoid) {
        self.0.borrow_mut().ellipsoids.push(ellipsoid.clone());
    }
}

/// Checks parent/children agreement, acyclicity and cost consistency over every live node.
pub fn assert_tree_invariants(pool: &NodePool) {
    assert_eq!(pool[START].parent(), None, "start must be the root");
    assert_eq!(pool[START].cost_from_start, 0.0);

    for id in pool.live_ids() {
        let node = &pool[id];
        for &child in node.children() {
            assert_eq!(pool[child].parent(), Some(id), "child {child} of {id} disagrees");
        }

        let Some(parent) = node.parent() else {
            assert!(
                id == START || (id == GOAL && node.cost_from_start.is_infinite()),
                "node {id} has no parent"
            );
            continue;
        };
        assert!(
            pool[parent].children().contains(&id),
            "node {id} missing from children of {parent}"
        );
        assert!(node.cost_from_parent >= 0.0);
        let expected = pool[parent].cost_from_start + node.cost_from_parent;
        assert!(
            (node.cost_from_start - expected).abs() <= 1e-9 * expected.max(1.0),
            "node {id}: cost {} != {expected}",
            node.cost_from_start
        );

        // Reaches the root within valid_count steps
        let mut current = id;
        let mut steps = 0;
        while let Some(next) = pool[current].parent() {
            current = next;
            steps += 1;
            assert!(steps <= pool.len(), "cycle through node {id}");
        }
        assert_eq!(current, START, "node {id} does not reach the start");
    }
}
