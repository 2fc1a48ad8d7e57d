//! Particle-to-Grid (P2G) transfer operations
//!
//! Transfers mass, momentum, and forces from particles to grid nodes.
//! Includes stress calculation and APIC momentum transfer.

use crate::core::{Grid, Particle, ParticleTransferCache, kernel::inv_d};
use crate::error::{MpmError, MpmResult};
use crate::materials::{Material, MaterialModel};
use crate::math::Real;

/// Scatter mass and APIC momentum, then turn node momentum into velocity.
pub fn particle_to_grid(
    grid: &mut Grid,
    particles: &[Particle],
    transfer_cache: &[ParticleTransferCache],
) -> MpmResult<()> {
    let inv_d = inv_d(grid.spacing());

    for (particle, transfer) in particles.iter().zip(transfer_cache) {
        let affine = particle.affine_momentum_matrix * inv_d;
        for neighbor in &transfer.neighbors {
            let mass_contribution = neighbor.weight * particle.mass;
            let velocity = particle.velocity + affine * neighbor.offset;
            grid.accumulate(neighbor.coord, mass_contribution, velocity * mass_contribution)?;
        }
    }

    grid.normalize_velocities();
    Ok(())
}

/// Scatter internal elastic forces `-V P Feᵗ ∇w`.
pub fn particle_to_grid_forces(
    grid: &mut Grid,
    particles: &[Particle],
    transfer_cache: &[ParticleTransferCache],
    material: &Material,
    density: Real,
    step: u64,
) -> MpmResult<()> {
    for (particle, transfer) in particles.iter().zip(transfer_cache) {
        let stress = material.first_piola_kirchhoff(particle);
        let ap = stress * particle.elastic_deformation.transpose() * particle.volume(density);

        for neighbor in &transfer.neighbors {
            grid.add_force(neighbor.coord, -(ap * neighbor.weight_gradient))?;
        }
    }

    if let Some((node, force)) = grid.first_non_finite_force() {
        return Err(MpmError::NonFiniteForce { node, force, step });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverParams;
    use crate::core::populate_transfer_cache;
    use crate::materials::MaterialType;
    use bevy::math::{Mat3, UVec3, Vec3};

    fn scatter(particle: Particle, material: MaterialType, step: u64) -> MpmResult<Grid> {
        let params = SolverParams::default().with_material(material);
        let mut grid = Grid::new(UVec3::splat(16), 0.1);
        let mut cache = ParticleTransferCache::default();
        populate_transfer_cache(particle.position, grid.spacing(), &mut cache);
        let particles = [particle];
        let caches = [cache];

        particle_to_grid(&mut grid, &particles, &caches)?;
        particle_to_grid_forces(
            &mut grid,
            &particles,
            &caches,
            &Material::from_params(&params),
            params.density,
            step,
        )?;
        Ok(grid)
    }

    #[test]
    fn mass_and_momentum_reach_the_grid() {
        let particle = Particle::new(Vec3::splat(0.8), 2.0).with_velocity(Vec3::new(0.5, 0.0, -1.0));
        let grid = scatter(particle, MaterialType::Elastic, 0).unwrap();
        assert!((grid.total_mass() - 2.0).abs() < 1e-5);
        assert!((grid.total_momentum() - Vec3::new(1.0, 0.0, -2.0)).length() < 1e-4);
    }

    #[test]
    fn inverted_sand_particle_produces_non_finite_force() {
        // log of a negative singular value
        let particle = Particle::new(Vec3::splat(0.8), 1.0).with_state(
            Mat3::ZERO,
            Mat3::from_diagonal(Vec3::new(1.0, 1.0, -1.0)),
            Mat3::IDENTITY,
            0.2,
            0.0,
        );
        let result = scatter(particle, MaterialType::Sand, 7);
        assert!(matches!(result, Err(MpmError::NonFiniteForce { step: 7, .. })));
    }
}
