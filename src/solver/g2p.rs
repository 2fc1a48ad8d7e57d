//! Grid-to-Particle (G2P) transfer operations
//!
//! Transfers velocities and velocity gradients from grid nodes back to particles.
//! Updates particle positions and deformation state.

use crate::core::{Grid, Particle, ParticleTransferCache};
use crate::error::MpmResult;
use crate::materials::{Material, MaterialModel};
use crate::math::{Matrix, Real, Vector, identity_matrix, outer_product};

/// Gather velocity and `Bp` from the integrated grid, and the velocity
/// gradient `Σ v_i ∇wᵗ` into `velocity_gradients`.
pub fn grid_to_particle(
    grid: &Grid,
    particles: &mut [Particle],
    transfer_cache: &[ParticleTransferCache],
    velocity_gradients: &mut [Matrix],
) -> MpmResult<()> {
    for ((particle, transfer), gradient) in particles
        .iter_mut()
        .zip(transfer_cache)
        .zip(velocity_gradients.iter_mut())
    {
        let mut velocity = Vector::ZERO;
        let mut affine = Matrix::ZERO;
        let mut velocity_gradient = Matrix::ZERO;

        for neighbor in &transfer.neighbors {
            let node_velocity = grid.node_at(neighbor.coord)?.velocity;
            let weighted_velocity = node_velocity * neighbor.weight;

            velocity += weighted_velocity;
            affine += outer_product(weighted_velocity, neighbor.offset);
            velocity_gradient += outer_product(node_velocity, neighbor.weight_gradient);
        }

        particle.velocity = velocity;
        particle.affine_momentum_matrix = affine;
        *gradient = velocity_gradient;
    }
    Ok(())
}

/// `Fe ← (I + dt ∇v) Fe`
pub fn update_deformation_gradient(particles: &mut [Particle], velocity_gradients: &[Matrix], dt: Real) {
    for (particle, gradient) in particles.iter_mut().zip(velocity_gradients) {
        let deformation_update = identity_matrix() + *gradient * dt;
        particle.elastic_deformation = deformation_update * particle.elastic_deformation;
    }
}

/// Return mapping of every particle onto its material's yield surface.
pub fn plasticity_hardening(particles: &mut [Particle], material: &Material) {
    for particle in particles.iter_mut() {
        material.project_deformation(particle);
    }
}

/// `x ← x + dt v`
pub fn advect_particles(particles: &mut [Particle], dt: Real) {
    for particle in particles.iter_mut() {
        particle.position += particle.velocity * dt;
    }
}
