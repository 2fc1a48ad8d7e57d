// Physical constants and reference-scene defaults for the MPM core
use bevy::math::Vec3;

use crate::math::Real;

// Global physics
pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.8, 0.0);

// Grid
pub const DEFAULT_GRID_RESOLUTION: u32 = 64;
pub const DEFAULT_GRID_SPACING: Real = 0.02;
pub const DEFAULT_TIME_STEP: Real = 1.0e-4;

// Elasticity (snow-like reference material)
pub const DEFAULT_YOUNG_MODULUS: Real = 1.4e5;
pub const DEFAULT_POISSON_RATIO: Real = 0.2;
pub const DEFAULT_DENSITY: Real = 400.0;

// Snow plasticity: critical compression / stretch and hardening coefficient
pub const SNOW_THETA_C: Real = 2.5e-2;
pub const SNOW_THETA_S: Real = 7.5e-3;
pub const SNOW_HARDENING: Real = 10.0;

// Sand friction-angle hardening curve, degrees
pub const SAND_H0: Real = 35.0;
pub const SAND_H1: Real = 9.0;
pub const SAND_H2: Real = 0.2;
pub const SAND_H3: Real = 10.0;

// Boundary friction
pub const DEFAULT_FRICTION: Real = 0.3;

/// Distance baked into grid nodes that no level set reaches.
pub const FAR_FIELD_DISTANCE: Real = 1.0e6;
