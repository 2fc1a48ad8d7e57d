//! Snow: hardened fixed corotated elasticity with singular-value clamping
//! plasticity.

use crate::core::Particle;
use crate::materials::MaterialModel;
use crate::materials::families::{LameParameters, SnowParams};
use crate::math::{Matrix, Real, Vector, decompose_svd, diagonal_from_vec};

use super::corotated::fixed_corotated_snow;

/// Clamp the singular values of `fe` into `[1 - theta_c, 1 + theta_s]` and
/// move the yielded part into the plastic factor.
///
/// Returns `(Fe', Fp')` with `Fe' · Fp' = fe · fp`.
pub fn clamp_and_split(fe: &Matrix, fp: &Matrix, theta_c: Real, theta_s: Real) -> (Matrix, Matrix) {
    let svd = decompose_svd(fe);
    let clamped = svd
        .sigma
        .clamp(Vector::splat(1.0 - theta_c), Vector::splat(1.0 + theta_s));
    let elastic = svd.u * diagonal_from_vec(clamped) * svd.v.transpose();
    let plastic =
        svd.v * diagonal_from_vec(clamped.recip()) * svd.u.transpose() * (*fe * *fp);
    (elastic, plastic)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snow {
    pub lame: LameParameters,
    pub params: SnowParams,
}

impl MaterialModel for Snow {
    fn first_piola_kirchhoff(&self, particle: &Particle) -> Matrix {
        fixed_corotated_snow(
            &particle.elastic_deformation,
            &particle.plastic_deformation,
            self.lame,
            self.params.hardening,
        )
    }

    fn project_deformation(&self, particle: &mut Particle) {
        let (elastic, plastic) = clamp_and_split(
            &particle.elastic_deformation,
            &particle.plastic_deformation,
            self.params.theta_c,
            self.params.theta_s,
        );
        particle.elastic_deformation = elastic;
        particle.plastic_deformation = plastic;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{decompose_svd, frobenius_norm};
    use bevy::math::{Mat3, Quat, Vec3};

    const THETA_C: Real = 0.025;
    const THETA_S: Real = 0.0075;

    #[test]
    fn values_inside_band_are_untouched() {
        let fe = Mat3::from_quat(Quat::from_rotation_x(0.3))
            * Mat3::from_diagonal(Vec3::new(1.005, 0.99, 0.98));
        let (elastic, plastic) = clamp_and_split(&fe, &Mat3::IDENTITY, THETA_C, THETA_S);
        assert!(frobenius_norm(&(elastic - fe)) < 1e-4);
        assert!(frobenius_norm(&(plastic - Mat3::IDENTITY)) < 1e-4);
    }

    #[test]
    fn values_outside_band_clamp_to_bounds() {
        let fe = Mat3::from_diagonal(Vec3::new(1.2, 1.0, 0.8));
        let (elastic, _) = clamp_and_split(&fe, &Mat3::IDENTITY, THETA_C, THETA_S);
        let sigma = decompose_svd(&elastic).sigma;
        assert!((sigma.x - (1.0 + THETA_S)).abs() < 1e-5);
        assert!((sigma.y - 1.0).abs() < 1e-5);
        assert!((sigma.z - (1.0 - THETA_C)).abs() < 1e-5);
    }

    #[test]
    fn total_deformation_is_preserved() {
        let fe = Mat3::from_quat(Quat::from_rotation_z(-0.2))
            * Mat3::from_diagonal(Vec3::new(1.3, 0.7, 1.01));
        let fp = Mat3::from_diagonal(Vec3::new(0.98, 1.0, 1.01));
        let (elastic, plastic) = clamp_and_split(&fe, &fp, THETA_C, THETA_S);
        assert!(frobenius_norm(&(elastic * plastic - fe * fp)) < 1e-4);
    }
}
