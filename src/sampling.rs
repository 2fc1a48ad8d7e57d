//! Particle seeding for scenes.

use rand::Rng;

use crate::core::{Particle, ParticleList};
use crate::materials::MaterialType;
use crate::math::{GridCoord, Real, Vector};

/// Cube of `cells_per_side³` grid cells starting at `min_cell`, each seeded
/// with `particles_per_cell` uniformly jittered particles.
///
/// Every particle carries `density · h³ / particles_per_cell`, so the cube's
/// mass matches `density` times its volume.
pub fn sample_cube<R: Rng + ?Sized>(
    material: MaterialType,
    min_cell: GridCoord,
    cells_per_side: u32,
    particles_per_cell: u32,
    spacing: Real,
    density: Real,
    rng: &mut R,
) -> ParticleList {
    let mass = density * spacing * spacing * spacing / particles_per_cell.max(1) as Real;
    let mut particles = ParticleList::new(material);

    for z in 0..cells_per_side {
        for y in 0..cells_per_side {
            for x in 0..cells_per_side {
                let cell = min_cell + GridCoord::new(x as i32, y as i32, z as i32);
                let corner = cell.as_vec3() * spacing;
                for _ in 0..particles_per_cell {
                    let jitter = Vector::new(
                        rng.random_range(0.0..1.0),
                        rng.random_range(0.0..1.0),
                        rng.random_range(0.0..1.0),
                    );
                    particles.push(Particle::new(corner + jitter * spacing, mass));
                }
            }
        }
    }
    particles
}
