//! The reference scene: a cube of material dropped onto the floor of a closed
//! box.

use bevy::math::{IVec3, UVec3, Vec3};
use rand::Rng;

use crate::config::SolverParams;
use crate::core::{Engine, ParticleList};
use crate::error::MpmResult;
use crate::geometry::LevelSet;
use crate::materials::MaterialType;
use crate::sampling::sample_cube;

pub const SCENE_RESOLUTION: u32 = 64;
pub const SCENE_SPACING: f32 = 0.02;
pub const CUBE_CELLS: u32 = 12;
pub const PARTICLES_PER_CELL: u32 = 8;

pub struct Scene {
    pub params: SolverParams,
    pub particles: ParticleList,
    pub level_sets: Vec<LevelSet>,
}

impl Scene {
    pub fn into_engine(self) -> MpmResult<Engine> {
        Engine::new(self.params, self.particles, &self.level_sets)
    }
}

/// Material constants of the reference scene.
pub fn reference_params(material: MaterialType) -> SolverParams {
    let params = SolverParams::default()
        .with_material(material)
        .with_grid(UVec3::splat(SCENE_RESOLUTION), SCENE_SPACING);
    match material {
        MaterialType::Snow => params,
        MaterialType::Sand => params.with_elasticity(3.537e5, 0.3).with_density(2200.0),
        MaterialType::Elastic => params.with_elasticity(5.0e4, 0.3).with_density(1000.0),
    }
}

/// Closed box three cells inside the grid, plus a floor.
pub fn reference_level_sets(params: &SolverParams) -> Vec<LevelSet> {
    let extent = params.grid_resolution.as_vec3() * params.spacing;
    let center = (extent - params.spacing) * 0.5;
    let wall = 3.0 * params.spacing;
    vec![
        LevelSet::container(center, center - Vec3::splat(wall)),
        LevelSet::plane(Vec3::new(0.0, 5.0 * params.spacing, 0.0), Vec3::Y),
    ]
}

pub fn reference_scene<R: Rng + ?Sized>(material: MaterialType, rng: &mut R) -> Scene {
    let params = reference_params(material);
    let min_cell = IVec3::new(
        ((SCENE_RESOLUTION - CUBE_CELLS) / 2) as i32,
        (SCENE_RESOLUTION / 3) as i32,
        ((SCENE_RESOLUTION - CUBE_CELLS) / 2) as i32,
    );
    let particles = sample_cube(
        material,
        min_cell,
        CUBE_CELLS,
        PARTICLES_PER_CELL,
        params.spacing,
        params.density,
        rng,
    );
    let level_sets = reference_level_sets(&params);
    Scene {
        params,
        particles,
        level_sets,
    }
}
