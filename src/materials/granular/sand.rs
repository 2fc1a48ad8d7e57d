//! Sand: St. Venant-Kirchhoff elasticity in log-strain with Drucker-Prager
//! plasticity and friction-angle hardening.
//!
//! All plastic work happens in the principal frame given by the SVD of the
//! elastic deformation gradient, on the log-principal strains
//! `eps = log(sigma)`.

use crate::core::Particle;
use crate::materials::MaterialModel;
use crate::materials::families::{LameParameters, SandParams};
use crate::math::{Matrix, Real, Vector, decompose_svd, diagonal_from_vec};

/// First Piola-Kirchhoff stress of St. Venant-Kirchhoff in Hencky strain.
///
/// `_need_projected` is reserved for an implicit solver and currently has no
/// effect on the result.
pub fn st_venant_kirchhoff(fe: &Matrix, lame: LameParameters, _need_projected: bool) -> Matrix {
    let svd = decompose_svd(fe);
    let ln_sigma = Vector::new(svd.sigma.x.ln(), svd.sigma.y.ln(), svd.sigma.z.ln());
    let inv_sigma = svd.sigma.recip();
    let trace = ln_sigma.x + ln_sigma.y + ln_sigma.z;
    let principal = 2.0 * lame.mu * inv_sigma * ln_sigma + lame.lambda * trace * inv_sigma;
    svd.u * diagonal_from_vec(principal) * svd.v.transpose()
}

/// Result of projecting principal stretches onto the yield surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DruckerPragerProjection {
    /// Projected principal stretches (diagonal of `T`).
    pub stretches: Vector,
    /// Plastic strain increment added to `q`.
    pub delta_q: Real,
}

/// Return mapping of principal stretches `sigma` onto the Drucker-Prager cone
/// of size `alpha`.
pub fn project(sigma: Vector, alpha: Real, lame: LameParameters) -> DruckerPragerProjection {
    let epsilon = Vector::new(sigma.x.ln(), sigma.y.ln(), sigma.z.ln());
    let epsilon_trace = epsilon.x + epsilon.y + epsilon.z;
    let epsilon_hat = epsilon - Vector::splat(epsilon_trace / 3.0);
    let epsilon_norm = epsilon.length();
    let epsilon_hat_norm = epsilon_hat.length();

    // Expansion, or no deviatoric part: the cone tip.
    if epsilon_hat_norm == 0.0 || epsilon_trace > 0.0 {
        return DruckerPragerProjection {
            stretches: Vector::ONE,
            delta_q: epsilon_norm,
        };
    }

    let delta_gamma = epsilon_hat_norm
        + ((3.0 * lame.lambda) / (2.0 * lame.mu) + 1.0) * epsilon_trace * alpha;
    if delta_gamma <= 0.0 {
        return DruckerPragerProjection {
            stretches: sigma,
            delta_q: 0.0,
        };
    }

    let h = epsilon - epsilon_hat * (delta_gamma / epsilon_hat_norm);
    DruckerPragerProjection {
        stretches: Vector::new(h.x.exp(), h.y.exp(), h.z.exp()),
        delta_q: delta_gamma,
    }
}

/// Project the particle's elastic deformation onto the yield surface, push the
/// remainder into `Fp`, and advance the hardening state.
pub fn plasticity_hardening(particle: &mut Particle, lame: LameParameters, sand: &SandParams) {
    let svd = decompose_svd(&particle.elastic_deformation);
    let projection = project(svd.sigma, particle.alpha, lame);
    let t = projection.stretches;

    particle.elastic_deformation = svd.u * diagonal_from_vec(t) * svd.v.transpose();
    particle.plastic_deformation = svd.v
        * diagonal_from_vec(t.recip() * svd.sigma)
        * svd.v.transpose()
        * particle.plastic_deformation;
    particle.hardening_state += projection.delta_q;
    particle.alpha = sand.yield_alpha(particle.hardening_state);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sand {
    pub lame: LameParameters,
    pub params: SandParams,
}

impl MaterialModel for Sand {
    fn first_piola_kirchhoff(&self, particle: &Particle) -> Matrix {
        st_venant_kirchhoff(&particle.elastic_deformation, self.lame, false)
    }

    fn project_deformation(&self, particle: &mut Particle) {
        plasticity_hardening(particle, self.lame, &self.params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::frobenius_norm;
    use bevy::math::{Mat3, Quat, Vec3};

    fn lame() -> LameParameters {
        LameParameters::from_young_poisson(3.5e5, 0.3)
    }

    #[test]
    fn pure_expansion_projects_to_cone_tip() {
        let sigma = Vec3::new(1.1, 1.05, 1.02);
        let result = project(sigma, 0.2, lame());
        let epsilon = Vec3::new(1.1f32.ln(), 1.05f32.ln(), 1.02f32.ln());
        assert_eq!(result.stretches, Vec3::ONE);
        assert!((result.delta_q - epsilon.length()).abs() < 1e-6);
    }

    #[test]
    fn hydrostatic_compression_projects_to_cone_tip() {
        let result = project(Vec3::splat(0.9), 0.2, lame());
        assert_eq!(result.stretches, Vec3::ONE);
        assert!(result.delta_q > 0.0);
    }

    #[test]
    fn state_inside_cone_is_unchanged() {
        // Strong compression with a small deviatoric part.
        let sigma = Vec3::new(0.99, 0.985, 0.98);
        let result = project(sigma, 0.3, lame());
        assert_eq!(result.stretches, sigma);
        assert_eq!(result.delta_q, 0.0);
    }

    #[test]
    fn shear_beyond_cone_is_returned_to_surface() {
        let sigma = Vec3::new(1.05, 0.99, 0.9);
        let alpha = 0.1;
        let result = project(sigma, alpha, lame());
        assert!(result.delta_q > 0.0);

        // The returned state keeps the volumetric strain and sits on the cone.
        let epsilon = Vec3::new(sigma.x.ln(), sigma.y.ln(), sigma.z.ln());
        let projected = Vec3::new(
            result.stretches.x.ln(),
            result.stretches.y.ln(),
            result.stretches.z.ln(),
        );
        let trace = epsilon.x + epsilon.y + epsilon.z;
        assert!((projected.x + projected.y + projected.z - trace).abs() < 1e-5);
        let hat = projected - Vec3::splat(trace / 3.0);
        let lame = lame();
        let cone = hat.length() + ((3.0 * lame.lambda) / (2.0 * lame.mu) + 1.0) * trace * alpha;
        assert!(cone.abs() < 1e-4);
    }

    #[test]
    fn hardening_preserves_total_deformation() {
        let sand = SandParams::default();
        let fe = Mat3::from_quat(Quat::from_rotation_x(0.25))
            * Mat3::from_diagonal(Vec3::new(1.04, 0.99, 0.93));
        let mut particle = Particle::new(Vec3::ZERO, 1.0).with_state(
            Mat3::ZERO,
            fe,
            Mat3::IDENTITY,
            sand.yield_alpha(0.0),
            0.0,
        );
        let before = particle.deformation_gradient();
        plasticity_hardening(&mut particle, lame(), &sand);
        assert!(frobenius_norm(&(particle.deformation_gradient() - before)) < 1e-4);
        assert!(particle.hardening_state > 0.0);
        assert!((particle.alpha - sand.yield_alpha(particle.hardening_state)).abs() < 1e-6);
    }

    #[test]
    fn st_venant_rest_state_is_stress_free() {
        let stress = st_venant_kirchhoff(&Mat3::IDENTITY, lame(), false);
        assert!(frobenius_norm(&stress) < 1e-2);
        let projected = st_venant_kirchhoff(&Mat3::IDENTITY, lame(), true);
        assert_eq!(stress, projected);
    }

    #[test]
    fn st_venant_compression_pushes_back() {
        let stress = st_venant_kirchhoff(&Mat3::from_diagonal(Vec3::splat(0.95)), lame(), false);
        assert!(stress.x_axis.x < 0.0);
        assert!(stress.y_axis.y < 0.0);
        assert!(stress.z_axis.z < 0.0);
    }
}
