//! Quadratic B-spline transfer kernel.
//!
//! Each particle touches the 3×3×3 block of nodes starting at
//! `floor(x / h - 0.5)`. Weights and their gradients are cached once per step
//! because positions only change at advection.

use crate::math::{GridCoord, Point, Real, Vector};

/// Nodes per axis in the stencil.
pub const KERNEL_SIZE: usize = 3;
/// Nodes touched by one particle.
pub const NEIGHBOR_COUNT: usize = KERNEL_SIZE * KERNEL_SIZE * KERNEL_SIZE;

/// APIC `D⁻¹` for the quadratic kernel, `4 / h²`.
#[inline]
pub fn inv_d(spacing: Real) -> Real {
    4.0 / (spacing * spacing)
}

/// `N(x)`, support radius 1.5.
#[inline(always)]
pub fn bspline_weight(x: Real) -> Real {
    let ax = x.abs();
    if ax < 0.5 {
        0.75 - ax * ax
    } else if ax < 1.5 {
        0.5 * (1.5 - ax) * (1.5 - ax)
    } else {
        0.0
    }
}

/// `N'(x)`
#[inline(always)]
pub fn bspline_derivative(x: Real) -> Real {
    let ax = x.abs();
    if ax < 0.5 {
        -2.0 * x
    } else if ax < 1.5 {
        -(1.5 - ax) * x.signum()
    } else {
        0.0
    }
}

/// First node of the particle's stencil.
#[inline]
pub fn base_node(position: Point, spacing: Real) -> GridCoord {
    (position / spacing - 0.5).floor().as_ivec3()
}

/// One node of a particle's stencil.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransferNeighbor {
    pub coord: GridCoord,
    pub weight: Real,
    /// `∇w` with respect to the particle position, in world units.
    pub weight_gradient: Vector,
    /// `x_i - x_p`
    pub offset: Vector,
}

impl TransferNeighbor {
    const EMPTY: Self = Self {
        coord: GridCoord::ZERO,
        weight: 0.0,
        weight_gradient: Vector::ZERO,
        offset: Vector::ZERO,
    };
}

/// Per-axis kernel values for one particle.
pub struct GridInterpolation {
    pub base_node: GridCoord,
    pub position: Point,
    pub spacing: Real,
    /// `[k]` holds the x, y, z weights of the `k`-th node along each axis.
    pub weights: [Vector; KERNEL_SIZE],
    pub derivatives: [Vector; KERNEL_SIZE],
}

impl GridInterpolation {
    #[inline]
    pub fn compute_for_particle(position: Point, spacing: Real) -> Self {
        let base_node = base_node(position, spacing);
        let position_index = position / spacing;

        let mut weights = [Vector::ZERO; KERNEL_SIZE];
        let mut derivatives = [Vector::ZERO; KERNEL_SIZE];
        for k in 0..KERNEL_SIZE {
            let d = position_index - (base_node + GridCoord::splat(k as i32)).as_vec3();
            weights[k] = Vector::new(
                bspline_weight(d.x),
                bspline_weight(d.y),
                bspline_weight(d.z),
            );
            derivatives[k] = Vector::new(
                bspline_derivative(d.x),
                bspline_derivative(d.y),
                bspline_derivative(d.z),
            );
        }

        Self {
            base_node,
            position,
            spacing,
            weights,
            derivatives,
        }
    }

    /// Stencil nodes in x-fastest order.
    pub fn iter_neighbors(&self) -> impl Iterator<Item = TransferNeighbor> + '_ {
        (0..NEIGHBOR_COUNT).map(move |idx| {
            let i = idx % KERNEL_SIZE;
            let j = (idx / KERNEL_SIZE) % KERNEL_SIZE;
            let k = idx / (KERNEL_SIZE * KERNEL_SIZE);
            let (wx, wy, wz) = (self.weights[i].x, self.weights[j].y, self.weights[k].z);
            let (dx, dy, dz) = (
                self.derivatives[i].x,
                self.derivatives[j].y,
                self.derivatives[k].z,
            );
            let coord = self.base_node + GridCoord::new(i as i32, j as i32, k as i32);
            TransferNeighbor {
                coord,
                weight: wx * wy * wz,
                weight_gradient: Vector::new(dx * wy * wz, wx * dy * wz, wx * wy * dz)
                    / self.spacing,
                offset: coord.as_vec3() * self.spacing - self.position,
            }
        })
    }
}

/// Stencil of one particle for the current step.
#[derive(Clone, Copy, Debug)]
pub struct ParticleTransferCache {
    pub neighbors: [TransferNeighbor; NEIGHBOR_COUNT],
}

impl Default for ParticleTransferCache {
    fn default() -> Self {
        Self {
            neighbors: [TransferNeighbor::EMPTY; NEIGHBOR_COUNT],
        }
    }
}

impl ParticleTransferCache {
    pub fn base_node(&self) -> GridCoord {
        self.neighbors[0].coord
    }
}

/// Fill `cache` with the particle's stencil at `position`.
#[inline]
pub fn populate_transfer_cache(position: Point, spacing: Real, cache: &mut ParticleTransferCache) {
    let interpolation = GridInterpolation::compute_for_particle(position, spacing);
    for (entry, neighbor) in cache.neighbors.iter_mut().zip(interpolation.iter_neighbors()) {
        *entry = neighbor;
    }
}
