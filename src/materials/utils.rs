//! Helper functions for materials
//!
//! Math and utility functions that different materials can use.

use crate::math::Real;

/// Exact zero check inverse (prevents NaN from division by zero)
#[inline(always)]
pub fn inv_exact(e: Real) -> Real {
    if e == 0.0 { 0.0 } else { 1.0 / e }
}

/// Physics parameter conversions shared by every constitutive model.
pub mod physics {
    use crate::math::Real;

    /// Computes the Lamé parameters (lambda, mu) from Young's modulus and Poisson ratio
    #[inline]
    pub fn lame_lambda_mu(young_modulus: Real, poisson_ratio: Real) -> (Real, Real) {
        let lambda =
            young_modulus * poisson_ratio / ((1.0 + poisson_ratio) * (1.0 - 2.0 * poisson_ratio));
        let mu = shear_modulus(young_modulus, poisson_ratio);
        (lambda, mu)
    }

    /// Shear modulus (mu) from Young's modulus and Poisson ratio
    #[inline]
    pub fn shear_modulus(young_modulus: Real, poisson_ratio: Real) -> Real {
        young_modulus / (2.0 * (1.0 + poisson_ratio))
    }

    /// Bulk modulus from Lamé parameters
    #[inline]
    pub fn bulk_modulus_from_lame(lambda: Real, mu: Real) -> Real {
        lambda + 2.0 * mu / 3.0
    }

    /// Speed of pressure waves, `sqrt((K + 4/3 mu) / rho)`.
    #[inline]
    pub fn p_wave_speed(lambda: Real, mu: Real, density: Real) -> Real {
        ((bulk_modulus_from_lame(lambda, mu) + 4.0 * mu / 3.0) / density).sqrt()
    }
}

/// Check if material properties make sense
pub mod check {
    use crate::math::Real;

    #[inline]
    pub fn density_ok(density: Real) -> bool {
        density > 0.0 && density < 50000.0 && density.is_finite()
    }

    /// Check if deformation gradient determinant is reasonable
    #[inline]
    pub fn deformation_gradient_ok(det: Real) -> bool {
        det > 1e-6 && det < 1e6 && det.is_finite()
    }

    /// Check if Young's modulus is physically reasonable
    #[inline]
    pub fn young_modulus_ok(e: Real) -> bool {
        e > 0.0 && e < 1e12 && e.is_finite()
    }

    /// Check if Poisson ratio is in valid range
    #[inline]
    pub fn poisson_ratio_ok(nu: Real) -> bool {
        nu > -1.0 && nu < 0.5 && nu.is_finite()
    }

    #[inline]
    pub fn friction_ok(mu: Real) -> bool {
        mu >= 0.0 && mu.is_finite()
    }

    /// Snow critical compression / stretch must keep `1 - theta` positive.
    #[inline]
    pub fn snow_threshold_ok(theta: Real) -> bool {
        (0.0..1.0).contains(&theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lame_parameters_from_young_poisson() {
        let (lambda, mu) = physics::lame_lambda_mu(50.0, 0.2);
        assert!((mu - 50.0 / 2.4).abs() < 1e-4);
        assert!((lambda - 50.0 * 0.2 / (1.2 * 0.6)).abs() < 1e-4);
        assert!(physics::bulk_modulus_from_lame(lambda, mu) > 0.0);
    }

    #[test]
    fn p_wave_speed_uses_constrained_modulus() {
        let (lambda, mu) = physics::lame_lambda_mu(1.0e4, 0.25);
        let speed = physics::p_wave_speed(lambda, mu, 100.0);
        assert!((speed * speed * 100.0 - (lambda + 2.0 * mu)).abs() < 1e-1);
    }

    #[test]
    fn inv_exact_of_zero_is_zero() {
        assert_eq!(inv_exact(0.0), 0.0);
        assert_eq!(inv_exact(4.0), 0.25);
    }

    #[test]
    fn deformation_checks() {
        assert!(check::deformation_gradient_ok(1.0));
        assert!(!check::deformation_gradient_ok(-0.5));
        assert!(!check::deformation_gradient_ok(Real::NAN));
        assert!(check::snow_threshold_ok(0.025));
        assert!(!check::snow_threshold_ok(1.0));
    }
}
