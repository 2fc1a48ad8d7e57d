#![allow(dead_code)]

use bevy::math::{IVec3, UVec3, Vec3};
use mpm3d::sampling::sample_cube;
use mpm3d::{Engine, LevelSet, MaterialType, ParticleList, SolverParams};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub const SPACING: f32 = 0.05;
pub const RESOLUTION: u32 = 32;

pub fn params(material: MaterialType) -> SolverParams {
    let params = SolverParams::default()
        .with_material(material)
        .with_grid(UVec3::splat(RESOLUTION), SPACING)
        .with_time_step(1.0e-3);
    match material {
        MaterialType::Sand => params
            .with_elasticity(3.537e5, 0.3)
            .with_density(2200.0)
            .with_time_step(5.0e-4),
        MaterialType::Elastic => params.with_elasticity(5.0e4, 0.3).with_density(1000.0),
        MaterialType::Snow => params,
    }
}

pub fn cube(params: &SolverParams, min_cell: IVec3, cells: u32, seed: u64) -> ParticleList {
    let mut rng = StdRng::seed_from_u64(seed);
    sample_cube(
        params.material,
        min_cell,
        cells,
        8,
        params.spacing,
        params.density,
        &mut rng,
    )
}

pub fn ground(height: f32) -> LevelSet {
    LevelSet::plane(Vec3::new(0.0, height, 0.0), Vec3::Y)
}

pub fn engine(params: SolverParams, particles: ParticleList, level_sets: &[LevelSet]) -> Engine {
    Engine::new(params, particles, level_sets).expect("scene should be valid")
}

pub fn run(engine: &mut Engine, steps: usize) {
    for _ in 0..steps {
        engine.exec_one_step().expect("step should succeed");
    }
}
