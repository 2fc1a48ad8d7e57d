//! Fixed corotated elasticity
//!
//! `P = 2 mu (F - R) + lambda (J - 1) J F^-T`, penalizing both departure
//! from a rigid rotation and volume change.

use crate::core::Particle;
use crate::materials::MaterialModel;
use crate::materials::families::LameParameters;
use crate::math::{Matrix, Real, decompose_polar};

/// First Piola-Kirchhoff stress of the fixed corotated model.
pub fn fixed_corotated(f: &Matrix, lame: LameParameters) -> Matrix {
    let rotation = decompose_polar(f).rotation;
    let j = f.determinant();
    let f_inv_t = f.inverse().transpose();
    (*f - rotation) * (2.0 * lame.mu) + f_inv_t * (lame.lambda * (j - 1.0) * j)
}

/// Fixed corotated on the elastic factor, stiffened as the plastic factor
/// compacts: `mu, lambda` scale by `exp(xi (1 - det Fp))`.
pub fn fixed_corotated_snow(fe: &Matrix, fp: &Matrix, lame: LameParameters, xi: Real) -> Matrix {
    let hardening = (xi * (1.0 - fp.determinant())).exp();
    fixed_corotated(fe, lame.scaled(hardening))
}

/// Purely elastic solid. Plastic deformation stays the identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElasticSolid {
    pub lame: LameParameters,
}

impl MaterialModel for ElasticSolid {
    fn first_piola_kirchhoff(&self, particle: &Particle) -> Matrix {
        fixed_corotated(&particle.elastic_deformation, self.lame)
    }

    fn project_deformation(&self, _particle: &mut Particle) {}
}
