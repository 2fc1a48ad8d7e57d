//! Shared parameter packs for material families.
//!
//! These structs define the vocabulary we use when configuring families of
//! constitutive models. They are plain data so scene setup and tooling can
//! populate material data without touching the solver.

use crate::config;
use crate::materials::utils::physics;
use crate::math::Real;

/// Lamé parameters, derived once per run from Young's modulus and Poisson ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LameParameters {
    pub mu: Real,
    pub lambda: Real,
}

impl LameParameters {
    pub fn from_young_poisson(young_modulus: Real, poisson_ratio: Real) -> Self {
        let (lambda, mu) = physics::lame_lambda_mu(young_modulus, poisson_ratio);
        Self { mu, lambda }
    }

    /// Both parameters scaled by a hardening factor.
    pub fn scaled(self, factor: Real) -> Self {
        Self {
            mu: self.mu * factor,
            lambda: self.lambda * factor,
        }
    }
}

/// Snow plasticity: critical compression/stretch band and hardening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnowParams {
    /// Critical compression, singular values below `1 - theta_c` yield.
    pub theta_c: Real,
    /// Critical stretch, singular values above `1 + theta_s` yield.
    pub theta_s: Real,
    /// Hardening coefficient `xi` in `exp(xi * (1 - Jp))`.
    pub hardening: Real,
}

impl SnowParams {
    pub const fn new(theta_c: Real, theta_s: Real, hardening: Real) -> Self {
        Self {
            theta_c,
            theta_s,
            hardening,
        }
    }
}

impl Default for SnowParams {
    fn default() -> Self {
        Self::new(
            config::constants::SNOW_THETA_C,
            config::constants::SNOW_THETA_S,
            config::constants::SNOW_HARDENING,
        )
    }
}

/// Sand friction-angle hardening curve `phi(q) = h0 + (h1 q - h3) exp(-h2 q)`,
/// angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SandParams {
    pub h0: Real,
    pub h1: Real,
    pub h2: Real,
    pub h3: Real,
}

impl SandParams {
    pub const fn new(h0: Real, h1: Real, h2: Real, h3: Real) -> Self {
        Self { h0, h1, h2, h3 }
    }

    /// Internal friction angle in degrees for accumulated plastic strain `q`.
    #[inline]
    pub fn friction_angle(&self, q: Real) -> Real {
        self.h0 + (self.h1 * q - self.h3) * (-self.h2 * q).exp()
    }

    /// Drucker-Prager yield-surface size for accumulated plastic strain `q`.
    #[inline]
    pub fn yield_alpha(&self, q: Real) -> Real {
        let sin_phi = self.friction_angle(q).to_radians().sin();
        (2.0 as Real / 3.0).sqrt() * 2.0 * sin_phi / (3.0 - sin_phi)
    }
}

impl Default for SandParams {
    fn default() -> Self {
        Self::new(
            config::constants::SAND_H0,
            config::constants::SAND_H1,
            config::constants::SAND_H2,
            config::constants::SAND_H3,
        )
    }
}
