mod common;

use approx::assert_relative_eq;
use bevy::math::{IVec3, Mat3, Vec3};
use mpm3d::materials::families::LameParameters;
use mpm3d::materials::granular::project;
use mpm3d::materials::solids::clamp_and_split;
use mpm3d::math::decompose_svd;
use mpm3d::{MaterialType, Particle, ParticleList};

use common::{SPACING, cube, engine, ground, params, run};

#[test]
fn pure_expansion_yields_to_the_cone_tip() {
    let lame = LameParameters::from_young_poisson(3.537e5, 0.3);
    let fe = Mat3::from_diagonal(Vec3::new(1.2, 1.1, 1.05));
    let sigma = decompose_svd(&fe).sigma;
    let epsilon = Vec3::new(sigma.x.ln(), sigma.y.ln(), sigma.z.ln());

    let result = project(sigma, 0.2, lame);

    assert_eq!(result.stretches, Vec3::ONE);
    assert_relative_eq!(result.delta_q, epsilon.length(), max_relative = 1e-5);
}

#[test]
fn snow_clamp_keeps_total_deformation() {
    let fe = Mat3::from_diagonal(Vec3::new(1.05, 1.0, 0.9));
    let fp = Mat3::from_diagonal(Vec3::new(0.98, 1.0, 1.01));
    let (elastic, plastic) = clamp_and_split(&fe, &fp, 0.025, 0.0075);

    let sigma = decompose_svd(&elastic).sigma;
    assert_relative_eq!(sigma.x, 1.0075, max_relative = 1e-5);
    assert_relative_eq!(sigma.z, 0.975, max_relative = 1e-5);
    let total = elastic * plastic - fe * fp;
    assert!(total.abs_diff_eq(Mat3::ZERO, 1e-5));
}

#[test]
fn sand_hardens_on_impact() {
    let params = params(MaterialType::Sand);
    let floor = 4.0 * SPACING;
    let falling: Vec<Particle> = cube(&params, IVec3::new(13, 5, 13), 4, 4)
        .iter()
        .map(|particle| particle.clone().with_velocity(Vec3::new(0.0, -2.0, 0.0)))
        .collect();
    let particles = ParticleList::from_particles(MaterialType::Sand, falling);
    let mut engine = engine(params.clone(), particles, &[ground(floor)]);

    run(&mut engine, 200);

    let particles = engine.particles();
    let max_q = particles
        .iter()
        .map(|particle| particle.hardening_state)
        .fold(0.0f32, f32::max);
    assert!(max_q > 0.0, "no particle yielded");
    for particle in particles.iter() {
        assert!(particle.position.is_finite());
        assert!(particle.position.y > floor - 2.0 * SPACING);
        assert!(particle.elastic_deformation.determinant() > 0.0);
        assert_relative_eq!(
            particle.alpha,
            params.sand.yield_alpha(particle.hardening_state),
            max_relative = 1e-4
        );
    }
}

#[test]
fn snow_compaction_moves_deformation_into_plastic_part() {
    let params = params(MaterialType::Snow).with_time_step(5.0e-4);
    let floor = 4.0 * SPACING;
    let falling: Vec<Particle> = cube(&params, IVec3::new(13, 5, 13), 4, 5)
        .iter()
        .map(|particle| particle.clone().with_velocity(Vec3::new(0.0, -3.0, 0.0)))
        .collect();
    let particles = ParticleList::from_particles(MaterialType::Snow, falling);
    let mut engine = engine(params, particles, &[ground(floor)]);

    run(&mut engine, 100);

    let yielded = engine
        .particles()
        .iter()
        .filter(|particle| (particle.plastic_jacobian() - 1.0).abs() > 1e-4)
        .count();
    assert!(yielded > 0);
    for particle in engine.particles().iter() {
        let sigma = decompose_svd(&particle.elastic_deformation).sigma;
        assert!(sigma.x <= 1.0 + params_theta_s() + 1e-4);
        assert!(sigma.z >= 1.0 - params_theta_c() - 1e-4);
    }
}

fn params_theta_s() -> f32 {
    params(MaterialType::Snow).snow.theta_s
}

fn params_theta_c() -> f32 {
    params(MaterialType::Snow).snow.theta_c
}
