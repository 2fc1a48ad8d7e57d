mod common;

use bevy::math::{IVec3, Vec3};
use mpm3d::{CollisionPolicy, LevelSet, MaterialType, Particle, ParticleList};

use common::{SPACING, cube, engine, ground, params, run};

fn drop_onto_ground(policy: CollisionPolicy) -> (f32, ParticleList) {
    let params = params(MaterialType::Elastic).with_collision(policy, 0.3);
    let floor = 4.0 * SPACING;
    let falling: Vec<Particle> = cube(&params, IVec3::new(13, 6, 13), 4, 6)
        .iter()
        .map(|particle| particle.clone().with_velocity(Vec3::new(0.5, -1.0, 0.0)))
        .collect();
    let particles = ParticleList::from_particles(MaterialType::Elastic, falling);
    let mut engine = engine(params, particles, &[ground(floor)]);
    run(&mut engine, 300);
    (floor, engine.particles().clone())
}

#[test]
fn ground_stops_falling_cube() {
    for policy in [
        CollisionPolicy::Sticky,
        CollisionPolicy::Separating,
        CollisionPolicy::Slipping,
    ] {
        let (floor, particles) = drop_onto_ground(policy);
        for particle in particles.iter() {
            assert!(
                particle.position.y > floor - 1.5 * SPACING,
                "{policy}: particle sank to {}",
                particle.position.y
            );
        }
        assert!(particles.center_of_mass_velocity().y > -0.5, "{policy}");
    }
}

#[test]
fn sticky_ground_brakes_sliding_more_than_slipping() {
    let (_, sticky) = drop_onto_ground(CollisionPolicy::Sticky);
    let (_, slipping) = drop_onto_ground(CollisionPolicy::Slipping);
    assert!(sticky.center_of_mass_velocity().x < slipping.center_of_mass_velocity().x);
}

#[test]
fn container_keeps_material_inside() {
    let params = params(MaterialType::Elastic);
    let extent = 31.0 * SPACING;
    let walls = LevelSet::container(Vec3::splat(extent * 0.5), Vec3::splat(extent * 0.5 - 4.0 * SPACING));
    let moving: Vec<Particle> = cube(&params, IVec3::new(20, 13, 13), 4, 7)
        .iter()
        .map(|particle| particle.clone().with_velocity(Vec3::new(1.0, 0.0, 0.0)))
        .collect();
    let particles = ParticleList::from_particles(MaterialType::Elastic, moving);
    let mut engine = engine(params, particles, &[walls]);

    run(&mut engine, 200);

    let wall_x = extent - 4.0 * SPACING;
    for particle in engine.particles().iter() {
        assert!(particle.position.x < wall_x + 1.5 * SPACING);
    }
}
