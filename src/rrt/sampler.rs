use nalgebra::{Matrix3, Vector3};
use rand::prelude::*;
use rand_distr::UnitBall;

use super::State;

/// Source of candidate states for tree growth.
pub trait Sampler {
    /// Revert to uniform sampling over the configured box.
    fn reset(&mut self);

    fn set_sampling_range(&mut self, origin: State, extent: Vector3<f64>);

    /// Switch to sampling inside `translation + rotation * diag(scale) * unit_ball` until the next
    /// [`Sampler::reset`].
    fn set_informed_region(
        &mut self,
        translation: State,
        rotation: Matrix3<f64>,
        scale: Vector3<f64>,
    );

    fn sample_once(&mut self) -> State;
}

/// Uniform box sampler that can be narrowed to an informed ellipsoid.
#[derive(Clone, Debug)]
pub struct BiasSampler<R = StdRng> {
    rng: R,
    origin: State,
    extent: Vector3<f64>,
    informed: Option<(State, Matrix3<f64>)>,
}

impl BiasSampler<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for BiasSampler<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> BiasSampler<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            origin: State::origin(),
            extent: Vector3::repeat(1.0),
            informed: None,
        }
    }

    pub fn is_informed(&self) -> bool {
        self.informed.is_some()
    }
}

impl<R: Rng> Sampler for BiasSampler<R> {
    fn reset(&mut self) {
        self.informed = None;
    }

    fn set_sampling_range(&mut self, origin: State, extent: Vector3<f64>) {
        self.origin = origin;
        self.extent = extent;
    }

    fn set_informed_region(
        &mut self,
        translation: State,
        rotation: Matrix3<f64>,
        scale: Vector3<f64>,
    ) {
        // Fold the axis scaling into the linear map once
        let transform = rotation * Matrix3::from_diagonal(&scale);
        self.informed = Some((translation, transform));
    }

    fn sample_once(&mut self) -> State {
        match &self.informed {
            Some((translation, transform)) => {
                let [x, y, z]: [f64; 3] = UnitBall.sample(&mut self.rng);
                translation + transform * Vector3::new(x, y, z)
            }
            None => {
                let unit = Vector3::new(
                    self.rng.random::<f64>(),
                    self.rng.random::<f64>(),
                    self.rng.random::<f64>(),
                );
                self.origin + self.extent.component_mul(&unit)
            }
        }
    }
}
