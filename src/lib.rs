//! Anytime, asymptotically-optimal RRT* planning between two 3D poses.
//!
//! The planner grows a tree from the start, rewires it as cheaper connections appear, and once a
//! path to the goal exists can restrict sampling to the informed ellipsoid around start and goal.
//! Occupancy is supplied by the caller through [`rrt::CollisionChecker`].
//!
//! ```no_run
//! use informed_explorers::rrt::{CollisionChecker, RrtStar, State};
//! use informed_explorers::RrtStarConfig;
//! use nalgebra::Vector3;
//!
//! struct Open;
//!
//! impl CollisionChecker for Open {
//!     fn is_state_valid(&self, _: &State) -> bool { true }
//!     fn is_segment_valid(&self, _: &State, _: &State) -> bool { true }
//!     fn origin(&self) -> State { State::origin() }
//!     fn extent(&self) -> Vector3<f64> { Vector3::repeat(10.0) }
//! }
//!
//! let mut planner = RrtStar::new(RrtStarConfig::default(), Open)?;
//! if planner.plan(State::new(1.0, 1.0, 1.0), State::new(9.0, 9.0, 9.0))? {
//!     println!("{:?}", planner.get_path());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod rrt;

pub use config::RrtStarConfig;
pub use error::ConfigError;
