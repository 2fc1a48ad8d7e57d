use bevy::math::{IVec3, Mat3, UVec3, Vec3};

pub mod decomposition;

pub use decomposition::{PolarDecomposition, SvdDecomposition, decompose_polar, decompose_svd};

pub type Real = f32;

pub type Vector = Vec3;
pub type Matrix = Mat3;
pub type Point = Vec3;
pub type GridCoord = IVec3;
pub type GridSize = UVec3;

#[inline(always)]
pub fn zero_vector() -> Vector {
    Vec3::ZERO
}

#[inline(always)]
pub fn zero_matrix() -> Matrix {
    Mat3::ZERO
}

#[inline(always)]
pub fn identity_matrix() -> Matrix {
    Mat3::IDENTITY
}

#[inline(always)]
pub fn matrix_determinant(m: &Matrix) -> Real {
    m.determinant()
}

#[inline(always)]
pub fn diagonal_from_vec(vec: Vector) -> Matrix {
    Matrix::from_diagonal(vec)
}

/// `a · bᵗ`
#[inline(always)]
pub fn outer_product(a: Vector, b: Vector) -> Matrix {
    Mat3::from_cols(a * b.x, a * b.y, a * b.z)
}

/// Frobenius norm, `sqrt(Σ m_ij²)`.
#[inline(always)]
pub fn frobenius_norm(m: &Matrix) -> Real {
    (m.x_axis.length_squared() + m.y_axis.length_squared() + m.z_axis.length_squared()).sqrt()
}

#[inline(always)]
pub fn matrix_is_finite(m: &Matrix) -> bool {
    m.x_axis.is_finite() && m.y_axis.is_finite() && m.z_axis.is_finite()
}
