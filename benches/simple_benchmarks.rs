/// Simple custom benchmarking without criterion
use std::time::Instant;

use bevy::math::{IVec3, Mat3, Quat, UVec3, Vec3};
use mpm3d::core::{ParticleTransferCache, populate_transfer_cache};
use mpm3d::math::decompose_svd;
use mpm3d::sampling::sample_cube;
use mpm3d::scene::reference_level_sets;
use mpm3d::{Engine, MaterialType, SolverParams};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn time_it<F: FnMut()>(name: &str, iterations: usize, mut f: F) {
    // Warmup
    for _ in 0..5 {
        f();
    }

    let start = Instant::now();
    for _ in 0..iterations {
        f();
    }
    let elapsed = start.elapsed();

    let avg_ms = elapsed.as_secs_f64() * 1000.0 / iterations as f64;
    println!("{}: {:.3}ms avg ({} iterations)", name, avg_ms, iterations);
}

fn create_engine(material: MaterialType, cells_per_side: u32) -> Engine {
    let params = SolverParams::default()
        .with_material(material)
        .with_grid(UVec3::splat(48), 0.02);
    let mut rng = StdRng::seed_from_u64(1);
    let min_cell = IVec3::splat(24 - cells_per_side as i32 / 2);
    let particles = sample_cube(
        material,
        min_cell,
        cells_per_side,
        8,
        params.spacing,
        params.density,
        &mut rng,
    );
    let level_sets = reference_level_sets(&params);
    match Engine::new(params, particles, &level_sets) {
        Ok(engine) => engine,
        Err(err) => panic!("benchmark scene rejected: {err}"),
    }
}

fn main() {
    println!("\n=== MPM3D Benchmarks ===\n");

    println!("--- 3x3 SVD ---");
    let matrices: Vec<Mat3> = (0..1000)
        .map(|i| {
            let angle = i as f32 * 0.01;
            Mat3::from_quat(Quat::from_rotation_y(angle))
                * Mat3::from_diagonal(Vec3::new(1.0 + angle * 0.1, 0.9, 1.05))
        })
        .collect();
    time_it("decompose_svd (n=1000)", 50, || {
        for m in &matrices {
            std::hint::black_box(decompose_svd(m));
        }
    });

    println!("\n--- Transfer Cache ---");
    let mut cache = ParticleTransferCache::default();
    time_it("populate_transfer_cache (n=10000)", 50, || {
        for i in 0..10000 {
            let position = Vec3::splat(0.3) + Vec3::splat(i as f32 * 1.0e-5);
            populate_transfer_cache(position, 0.02, &mut cache);
            std::hint::black_box(&cache);
        }
    });

    println!("\n--- Full Step ---");
    for material in MaterialType::ALL {
        for &cells in &[4u32, 8, 12] {
            let mut engine = create_engine(material, cells);
            let count = engine.particle_count();
            time_it(&format!("{} step (n={})", material, count), 10, || {
                if let Err(err) = engine.exec_one_step() {
                    panic!("step failed: {err}");
                }
            });
        }
    }

    println!("\n=== Benchmark Complete ===\n");
}
