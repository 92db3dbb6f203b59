mod environment;
mod informed;
mod node;
mod path;
mod rrt_star;
mod sampler;
mod spatial;
mod steer;

#[cfg(test)]
pub(crate) mod test_utils;

/// A configuration: a point in 3D space.
pub type State = nalgebra::Point3<f64>;

pub use self::environment::{CollisionChecker, NoopVisualizer, TreeSnapshot, Visualizer};
pub use self::informed::{Ellipsoid, InformedRegion, MIN_SEMI_AXIS};
pub use self::node::{NodeId, NodePool, TreeNode, GOAL, START};
pub use self::path::{extract_path, path_length};
pub use self::rrt_star::{PlanningStats, RrtStar, SolutionRecord};
pub use self::sampler::{BiasSampler, Sampler};
pub use self::spatial::{FlatIndex, RTreeIndex, SpatialIndex};
pub use self::steer::{distance, steer};
