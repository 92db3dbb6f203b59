use std::ops::Index;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use tracing::{debug, error, info, warn};

use super::environment::{CollisionChecker, NoopVisualizer, TreeSnapshot, Visualizer};
use super::informed::{Ellipsoid, InformedRegion};
use super::node::{NodeId, NodePool, GOAL, START};
use super::path::extract_path;
use super::sampler::{BiasSampler, Sampler};
use super::spatial::{RTreeIndex, SpatialIndex};
use super::steer::{distance, steer};
use super::State;
use crate::config::RrtStarConfig;
use crate::error::ConfigError;

/// One strict improvement of the goal's cost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolutionRecord {
    pub cost: f64,
    /// Time since the start of the `plan()` call that found it
    pub elapsed: Duration,
}

// Counters for the most recent plan() call
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanningStats {
    pub iterations: usize,
    pub rejected_states: usize,
    pub rejected_segments: usize,
    pub tree_size: usize,
    pub first_path_time: Option<Duration>,
    pub final_path_time: Option<Duration>,
}

/// Anytime RRT* over a 3D state space, with optional informed sampling.
pub struct RrtStar<C, S = BiasSampler, I = RTreeIndex> {
    config: RrtStarConfig,
    // Storage reused by every plan() call
    pool: NodePool,
    index: I,
    sampler: S,
    checker: C,
    visualizer: Box<dyn Visualizer>,
    region: Option<InformedRegion>,
    ellipsoid: Option<Ellipsoid>,
    final_path: Vec<State>,
    path_list: Vec<Vec<State>>,
    solutions: Vec<SolutionRecord>,
    stats: PlanningStats,
}

impl<C: CollisionChecker> RrtStar<C> {
    /// Planner with an entropy-seeded [`BiasSampler`] and an R-tree index.
    pub fn new(config: RrtStarConfig, checker: C) -> Result<Self, ConfigError> {
        Self::with_components(config, checker, BiasSampler::new(), RTreeIndex::new())
    }

    pub fn seeded(config: RrtStarConfig, checker: C, seed: u64) -> Result<Self, ConfigError> {
        Self::with_components(config, checker, BiasSampler::from_seed(seed), RTreeIndex::new())
    }
}

impl<C, S, I> RrtStar<C, S, I>
where
    C: CollisionChecker,
    S: Sampler,
    I: SpatialIndex,
{
    pub fn with_components(
        config: RrtStarConfig,
        checker: C,
        mut sampler: S,
        index: I,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            steer_length = config.steer_length,
            search_radius = config.search_radius,
            search_time = config.search_time,
            max_tree_node_nums = config.max_tree_node_nums,
            use_informed_sampling = config.use_informed_sampling,
            "RRT* planner configured"
        );

        sampler.set_sampling_range(checker.origin(), checker.extent());
        Ok(Self {
            pool: NodePool::with_capacity(config.max_tree_node_nums),
            config,
            index,
            sampler,
            checker,
            visualizer: Box::new(NoopVisualizer),
            region: None,
            ellipsoid: None,
            final_path: Vec::new(),
            path_list: Vec::new(),
            solutions: Vec::new(),
            stats: PlanningStats::default(),
        })
    }

    pub fn set_visualizer(&mut self, visualizer: impl Visualizer + 'static) {
        self.visualizer = Box::new(visualizer);
    }

    pub fn config(&self) -> &RrtStarConfig {
        &self.config
    }

    pub fn tree(&self) -> &NodePool {
        &self.pool
    }

    // Empty if no solution was found
    pub fn get_path(&self) -> &[State] {
        &self.final_path
    }

    pub fn get_all_paths(&self) -> &[Vec<State>] {
        &self.path_list
    }

    pub fn get_solution_history(&self) -> &[SolutionRecord] {
        &self.solutions
    }

    pub fn informed_region(&self) -> Option<&Ellipsoid> {
        self.ellipsoid.as_ref()
    }

    pub fn stats(&self) -> &PlanningStats {
        &self.stats
    }

    /// Grow a tree from `start` until the time budget or node capacity runs out.
    ///
    /// Returns `Ok(false)` when either endpoint is invalid or no connection to the goal was found.
    /// `Err` means the spatial index broke its contract and the run was abandoned.
    pub fn plan(&mut self, start: State, goal: State) -> anyhow::Result<bool> {
        self.reset(start, goal);
        if !self.checker.is_state_valid(&start) {
            warn!(?start, "Start position collides or is out of bounds");
            return Ok(false);
        }
        if !self.checker.is_state_valid(&goal) {
            warn!(?goal, "Goal position collides or is out of bounds");
            return Ok(false);
        }

        info!(?start, ?goal, "Planning started");
        // Uniform until the first solution exists
        self.sampler.reset();
        if self.config.use_informed_sampling {
            self.region = Some(InformedRegion::new(&start, &goal));
        }
        self.rrt_star()
    }

    fn reset(&mut self, start: State, goal: State) {
        self.final_path.clear();
        self.path_list.clear();
        self.solutions.clear();
        self.stats = PlanningStats::default();
        self.region = None;
        self.ellipsoid = None;
        self.pool.reset(start, goal);
        self.index.clear();
    }

    fn rrt_star(&mut self) -> anyhow::Result<bool> {
        let started = Instant::now();
        let budget = self.config.search_duration();

        self.index.insert(self.pool[START].state, START);
        // The start gets the same goal check as every new node; a single steer may already reach it
        let reach = self.config.steer_length.max(self.config.search_radius);
        self.connect_to_goal(START, reach, started);

        while started.elapsed() < budget && !self.pool.is_full() {
            self.stats.iterations += 1;
            let x_rand = self.sampler.sample_once();
            if !self.checker.is_state_valid(&x_rand) {
                self.stats.rejected_states += 1;
                continue;
            }

            let Some(nearest) = self.index.nearest(&x_rand) else {
                error!(
                    entries = self.index.len(),
                    "Nearest query returned nothing from a non-empty index"
                );
                return Err(anyhow!(
                    "spatial index returned no nearest node with {} entries",
                    self.index.len()
                ));
            };
            let nearest_state = self.pool[nearest].state;
            let x_new = steer(&nearest_state, &x_rand, self.config.steer_length);
            if !self.checker.is_segment_valid(&nearest_state, &x_new) {
                self.stats.rejected_segments += 1;
                continue;
            }

            // Kept for the rewire step so the index is only queried once
            let neighbours = self.index.range(&x_new, self.config.search_radius);
            let (parent, cost_from_parent) = self.select_parent(nearest, &x_new, &neighbours);
            let cost_from_start = self.pool[parent].cost_from_start + cost_from_parent;
            let Some(new_node) = self
                .pool
                .allocate(parent, x_new, cost_from_start, cost_from_parent)
            else {
                break;
            };
            self.index.insert(x_new, new_node);

            self.connect_to_goal(new_node, self.config.search_radius, started);
            self.rewire(new_node, &neighbours, started);

            if self.visualizer.enabled() {
                self.visualizer.tree(&TreeSnapshot::capture(&self.pool));
            }
        }

        self.stats.tree_size = self.pool.len();
        if self.visualizer.enabled() {
            self.visualizer.tree(&TreeSnapshot::capture(&self.pool));
        }
        if let Some(ellipsoid) = &self.ellipsoid {
            self.visualizer.informed_region(ellipsoid);
        }

        let goal_found = self.pool[GOAL].parent().is_some();
        if goal_found {
            self.stats.final_path_time = Some(started.elapsed());
            self.final_path = extract_path(&self.pool, GOAL);
            info!(
                first_cost = self.solutions.first().map_or(f64::INFINITY, |s| s.cost),
                first_time = ?self.stats.first_path_time,
                final_cost = self.pool[GOAL].cost_from_start,
                nodes = self.pool.len(),
                "Path found"
            );
        } else if self.pool.is_full() {
            info!(
                nodes = self.pool.capacity(),
                "Not connected to goal after filling the node pool"
            );
        } else {
            info!(
                seconds = started.elapsed().as_secs_f64(),
                "Not connected to goal within the time budget"
            );
        }
        Ok(goal_found)
    }

    // Returns the parent and the edge cost to it
    fn select_parent(&self, nearest: NodeId, x_new: &State, neighbours: &[NodeId]) -> (NodeId, f64) {
        let mut best_parent = nearest;
        let mut cost_from_parent = distance(&self.pool[nearest].state, x_new);
        let mut best_cost = self.pool[nearest].cost_from_start + cost_from_parent;

        for &candidate in neighbours {
            let candidate_state = &self.pool[candidate].state;
            let edge = distance(candidate_state, x_new);
            let cost = self.pool[candidate].cost_from_start + edge;
            if cost < best_cost && self.checker.is_segment_valid(candidate_state, x_new) {
                best_parent = candidate;
                cost_from_parent = edge;
                best_cost = cost;
            }
        }
        (best_parent, cost_from_parent)
    }

    fn connect_to_goal(&mut self, node: NodeId, reach: f64, started: Instant) {
        let node_state = self.pool[node].state;
        let goal_state = self.pool[GOAL].state;
        let dist_to_goal = distance(&node_state, &goal_state);
        if dist_to_goal > reach {
            return;
        }
        let is_better_path =
            self.pool[GOAL].cost_from_start > dist_to_goal + self.pool[node].cost_from_start;
        if is_better_path && self.checker.is_segment_valid(&node_state, &goal_state) {
            self.pool.reparent(GOAL, node, dist_to_goal);
            self.record_solution(started);
        }
    }

    fn rewire(&mut self, new_node: NodeId, neighbours: &[NodeId], started: Instant) {
        let new_state = self.pool[new_node].state;
        let goal_state = self.pool[GOAL].state;
        for &neighbour in neighbours {
            let best_cost_before_rewire = self.pool[GOAL].cost_from_start;
            let neighbour_state = self.pool[neighbour].state;
            let edge = distance(&new_state, &neighbour_state);
            let candidate_cost = self.pool[new_node].cost_from_start + edge;

            // Straight-line distance to the goal never overestimates, so this only prunes hopeless rewires
            let promising_cost = candidate_cost + distance(&neighbour_state, &goal_state);
            if candidate_cost < self.pool[neighbour].cost_from_start
                && promising_cost < best_cost_before_rewire
                && self.checker.is_segment_valid(&new_state, &neighbour_state)
            {
                self.pool.reparent(neighbour, new_node, edge);
                if self.pool[GOAL].cost_from_start < best_cost_before_rewire {
                    self.record_solution(started);
                }
            }
        }
    }

    fn record_solution(&mut self, started: Instant) {
        let elapsed = started.elapsed();
        let cost = self.pool[GOAL].cost_from_start;
        if self.stats.first_path_time.is_none() {
            self.stats.first_path_time = Some(elapsed);
            info!(cost, ?elapsed, "First path found");
        }
        debug!(cost, ?elapsed, nodes = self.pool.len(), "Solution improved");
        self.path_list.push(extract_path(&self.pool, GOAL));
        self.solutions.push(SolutionRecord { cost, elapsed });

        if let Some(region) = &self.region {
            let ellipsoid = region.ellipsoid(cost);
            self.sampler
                .set_informed_region(ellipsoid.translation, ellipsoid.rotation, ellipsoid.scale);
            self.visualizer.informed_region(&ellipsoid);
            self.ellipsoid = Some(ellipsoid);
        }
    }
}

impl<C, S, I> Index<NodeId> for RrtStar<C, S, I> {
    type Output = State;

    fn index(&self, index: NodeId) -> &Self::Output {
        &self.pool[index].state
    }
}
