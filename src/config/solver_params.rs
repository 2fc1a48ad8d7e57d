use bevy::prelude::*;

use super::constants;
use crate::core::CollisionPolicy;
use crate::error::{MpmError, MpmResult};
use crate::materials::MaterialType;
use crate::materials::families::{LameParameters, SandParams, SnowParams};
use crate::materials::utils::{check, physics};
use crate::math::{GridSize, Real, Vector};

/// Solver parameters for one simulation run.
///
/// Passed by reference into `Engine` / `Grid` construction; nothing in the
/// core reads configuration from anywhere else.
#[derive(Resource, Clone, Debug)]
pub struct SolverParams {
    /// Material shared by every particle of the run.
    pub material: MaterialType,

    pub young_modulus: Real,
    pub poisson_ratio: Real,

    /// Reference density; particle volume is `mass / density`.
    pub density: Real,

    /// Node count per axis.
    pub grid_resolution: GridSize,
    /// Distance between neighbouring grid nodes.
    pub spacing: Real,

    pub dt: Real,
    pub gravity: Vector,

    pub collision: CollisionPolicy,
    /// Coulomb friction coefficient used by the sticky policy.
    pub friction: Real,

    pub snow: SnowParams,
    pub sand: SandParams,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            material: MaterialType::Snow,
            young_modulus: constants::DEFAULT_YOUNG_MODULUS,
            poisson_ratio: constants::DEFAULT_POISSON_RATIO,
            density: constants::DEFAULT_DENSITY,
            grid_resolution: UVec3::splat(constants::DEFAULT_GRID_RESOLUTION),
            spacing: constants::DEFAULT_GRID_SPACING,
            dt: constants::DEFAULT_TIME_STEP,
            gravity: constants::GRAVITY,
            collision: CollisionPolicy::Sticky,
            friction: constants::DEFAULT_FRICTION,
            snow: SnowParams::default(),
            sand: SandParams::default(),
        }
    }
}

impl SolverParams {
    pub fn with_material(mut self, material: MaterialType) -> Self {
        self.material = material;
        self
    }

    pub fn with_elasticity(mut self, young_modulus: Real, poisson_ratio: Real) -> Self {
        self.young_modulus = young_modulus;
        self.poisson_ratio = poisson_ratio;
        self
    }

    pub fn with_density(mut self, density: Real) -> Self {
        self.density = density;
        self
    }

    pub fn with_grid(mut self, resolution: GridSize, spacing: Real) -> Self {
        self.grid_resolution = resolution;
        self.spacing = spacing;
        self
    }

    pub fn with_time_step(mut self, dt: Real) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_gravity(mut self, gravity: Vector) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_collision(mut self, policy: CollisionPolicy, friction: Real) -> Self {
        self.collision = policy;
        self.friction = friction;
        self
    }

    pub fn with_snow(mut self, snow: SnowParams) -> Self {
        self.snow = snow;
        self
    }

    pub fn with_sand(mut self, sand: SandParams) -> Self {
        self.sand = sand;
        self
    }

    /// Lamé parameters derived from Young's modulus and Poisson ratio.
    pub fn lame(&self) -> LameParameters {
        LameParameters::from_young_poisson(self.young_modulus, self.poisson_ratio)
    }

    /// Longest time step for which a pressure wave crosses at most one cell.
    pub fn stable_time_step(&self) -> Real {
        let lame = self.lame();
        self.spacing / physics::p_wave_speed(lame.lambda, lame.mu, self.density)
    }

    /// Largest velocity component a grid node may carry, half a cell per step.
    pub fn max_node_speed(&self) -> Real {
        0.5 * self.spacing / self.dt
    }

    pub fn validate(&self) -> MpmResult<()> {
        if self.grid_resolution.min_element() < 4 {
            return Err(MpmError::InvalidConfig(format!(
                "grid resolution {} needs at least 4 nodes per axis",
                self.grid_resolution
            )));
        }
        if !(self.spacing > 0.0 && self.spacing.is_finite()) {
            return Err(MpmError::InvalidConfig(format!(
                "grid spacing must be positive, got {}",
                self.spacing
            )));
        }
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(MpmError::InvalidConfig(format!(
                "time step must be positive, got {}",
                self.dt
            )));
        }
        if !check::density_ok(self.density) {
            return Err(MpmError::InvalidConfig(format!(
                "density {} is not physical",
                self.density
            )));
        }
        if !check::young_modulus_ok(self.young_modulus) {
            return Err(MpmError::InvalidConfig(format!(
                "Young's modulus {} is not physical",
                self.young_modulus
            )));
        }
        if !check::poisson_ratio_ok(self.poisson_ratio) {
            return Err(MpmError::InvalidConfig(format!(
                "Poisson ratio {} must lie in (-1, 0.5)",
                self.poisson_ratio
            )));
        }
        if !check::friction_ok(self.friction) {
            return Err(MpmError::InvalidConfig(format!(
                "friction coefficient {} must be non-negative",
                self.friction
            )));
        }
        if !self.gravity.is_finite() {
            return Err(MpmError::InvalidConfig("gravity must be finite".into()));
        }
        if !check::snow_threshold_ok(self.snow.theta_c) || !check::snow_threshold_ok(self.snow.theta_s)
        {
            return Err(MpmError::InvalidConfig(format!(
                "snow thresholds ({}, {}) must lie in [0, 1)",
                self.snow.theta_c, self.snow.theta_s
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(SolverParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_tiny_grid() {
        let params = SolverParams::default().with_grid(UVec3::new(3, 16, 16), 0.1);
        assert!(matches!(params.validate(), Err(MpmError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_incompressible_poisson_ratio() {
        let params = SolverParams::default().with_elasticity(1.0e4, 0.5);
        assert!(matches!(params.validate(), Err(MpmError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_non_positive_time_step() {
        let params = SolverParams::default().with_time_step(0.0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn default_time_step_is_stable() {
        let params = SolverParams::default();
        assert!(params.dt < params.stable_time_step());
    }

    #[test]
    fn node_speed_bound_is_half_a_cell() {
        let params = SolverParams::default()
            .with_grid(UVec3::splat(8), 0.1)
            .with_time_step(0.01);
        assert!((params.max_node_speed() - 5.0).abs() < 1e-5);
    }
}
