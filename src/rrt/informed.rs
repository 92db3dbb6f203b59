use nalgebra::{Matrix3, Rotation3, Vector3};

use super::State;

/// Smallest semi-axis an informed ellipsoid may have. Keeps the region sampleable when the best
/// cost approaches the straight-line start/goal distance.
pub const MIN_SEMI_AXIS: f64 = 1e-6;

/// Prolate spheroid `translation + rotation * diag(scale) * unit_ball`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ellipsoid {
    pub translation: State,
    /// Columns are the ellipsoid axes, major axis first
    pub rotation: Matrix3<f64>,
    /// Semi-axis lengths along the rotation columns
    pub scale: Vector3<f64>,
}

impl Ellipsoid {
    pub fn major_semi_axis(&self) -> f64 {
        self.scale[0]
    }

    pub fn minor_semi_axis(&self) -> f64 {
        self.scale[1]
    }

    pub fn contains(&self, point: &State) -> bool {
        let local = self.rotation.transpose() * (point - self.translation);
        let normalized = local.component_div(&self.scale);
        normalized.norm_squared() <= 1.0 + 1e-9
    }
}

/// Region of states that could lie on a path cheaper than the current best, for a fixed start and
/// goal. The transform is fixed per query; only the scale follows the best cost.
#[derive(Clone, Debug)]
pub struct InformedRegion {
    translation: State,
    rotation: Matrix3<f64>,
    half_focal_sq: f64,
}

impl InformedRegion {
    pub fn new(start: &State, goal: &State) -> Self {
        let diff = goal - start;
        let translation = nalgebra::center(start, goal);
        let half_focal_sq = diff.norm_squared() / 4.0;

        let rotation = match diff.try_normalize(f64::EPSILON) {
            None => Matrix3::identity(),
            Some(major) => {
                // Flatten onto the horizontal plane, then turn a quarter about up
                let flat = Vector3::new(diff.x, diff.y, 0.0)
                    .try_normalize(f64::EPSILON)
                    .unwrap_or_else(Vector3::x);
                let second =
                    Rotation3::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2)
                        * flat;
                let third = major.cross(&second);
                Matrix3::from_columns(&[major, second, third])
            }
        };

        Self {
            translation,
            rotation,
            half_focal_sq,
        }
    }

    /// Ellipsoid containing every path with cost below `best_cost`.
    pub fn ellipsoid(&self, best_cost: f64) -> Ellipsoid {
        let major = best_cost / 2.0;
        let minor = (major * major - self.half_focal_sq)
            .max(0.0)
            .sqrt()
            .max(MIN_SEMI_AXIS);
        Ellipsoid {
            translation: self.translation,
            rotation: self.rotation,
            scale: Vector3::new(major.max(MIN_SEMI_AXIS), minor, minor),
        }
    }
}
