//! 3×3 singular value and polar decompositions.
//!
//! The raw factorization comes from `nalgebra`; on top of it we enforce the
//! conventions the constitutive and plasticity code rely on: singular values
//! sorted in descending order, and `U`, `V` proper rotations
//! (`det(U) = det(V) = 1`). A reflection is pushed into the sign of the last
//! singular value instead.

use bevy::math::Mat3;
use nalgebra::Matrix3;

use super::{Matrix, Real, Vector, diagonal_from_vec};

/// `M = U · diag(sigma) · Vᵗ`
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SvdDecomposition {
    pub u: Matrix,
    /// Singular values, largest first. Only `sigma.z` can be negative, and
    /// only when `det(M) < 0`.
    pub sigma: Vector,
    pub v: Matrix,
}

impl SvdDecomposition {
    #[inline]
    pub fn sigma_matrix(&self) -> Matrix {
        diagonal_from_vec(self.sigma)
    }

    #[inline]
    pub fn recompose(&self) -> Matrix {
        self.u * self.sigma_matrix() * self.v.transpose()
    }
}

/// `M = R · S` with `R` a rotation and `S` symmetric.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PolarDecomposition {
    pub rotation: Matrix,
    pub stretch: Matrix,
}

#[inline]
fn to_nalgebra(m: &Matrix) -> Matrix3<Real> {
    Matrix3::from_column_slice(&m.to_cols_array())
}

#[inline]
fn from_nalgebra(m: &Matrix3<Real>) -> Matrix {
    Mat3::from_cols_slice(m.as_slice())
}

#[inline]
fn permute_columns(m: &Matrix, order: [usize; 3]) -> Matrix {
    Mat3::from_cols(m.col(order[0]), m.col(order[1]), m.col(order[2]))
}

pub fn decompose_svd(m: &Matrix) -> SvdDecomposition {
    let svd = to_nalgebra(m).svd(true, true);
    let u = svd
        .u
        .as_ref()
        .map(from_nalgebra)
        .unwrap_or(Mat3::IDENTITY);
    let v = svd
        .v_t
        .as_ref()
        .map(|v_t| from_nalgebra(&v_t.transpose()))
        .unwrap_or(Mat3::IDENTITY);
    let values = [
        svd.singular_values[0],
        svd.singular_values[1],
        svd.singular_values[2],
    ];

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let mut u = permute_columns(&u, order);
    let mut v = permute_columns(&v, order);
    let mut sigma = Vector::new(values[order[0]], values[order[1]], values[order[2]]);

    // Both corrections may fire; each flips the smallest singular value.
    if u.determinant() < 0.0 {
        *u.col_mut(2) = -u.col(2);
        sigma.z = -sigma.z;
    }
    if v.determinant() < 0.0 {
        *v.col_mut(2) = -v.col(2);
        sigma.z = -sigma.z;
    }

    SvdDecomposition { u, sigma, v }
}

pub fn decompose_polar(m: &Matrix) -> PolarDecomposition {
    let SvdDecomposition { u, sigma, v } = decompose_svd(m);
    PolarDecomposition {
        rotation: u * v.transpose(),
        stretch: v * diagonal_from_vec(sigma) * v.transpose(),
    }
}
