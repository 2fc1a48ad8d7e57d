use std::env;
use std::process::ExitCode;
use std::time::Instant;

use bevy::log::LogPlugin;
use bevy::prelude::*;

use mpm3d::scene::reference_scene;
use mpm3d::{Engine, LogProfiler, MaterialType, MpmError, MpmPlugin, MpmResult, SnapshotWriter};

const DEFAULT_STEPS: u64 = 200;
const SNAPSHOT_INTERVAL: u64 = 50;

/// `mpm3d [snow|sand|elastic] [steps] [snapshot-dir]`
fn main() -> ExitCode {
    let mut app = App::new();
    app.add_plugins((LogPlugin::default(), MpmPlugin));

    match run(&mut app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(app: &mut App) -> MpmResult<()> {
    let mut args = env::args().skip(1);
    let material = args
        .next()
        .map(|name| name.parse::<MaterialType>())
        .transpose()?
        .unwrap_or(MaterialType::Snow);
    let steps = args
        .next()
        .map(|count| {
            count
                .parse::<u64>()
                .map_err(|_| MpmError::InvalidConfig(format!("step count {count:?} is not a number")))
        })
        .transpose()?
        .unwrap_or(DEFAULT_STEPS);

    if let Some(directory) = args.next() {
        info!("writing snapshots every {} steps to {}", SNAPSHOT_INTERVAL, directory);
        app.insert_resource(SnapshotWriter::new(directory, SNAPSHOT_INTERVAL));
    }

    let engine = reference_scene(material, &mut rand::rng())
        .into_engine()?
        .with_profiler(LogProfiler::new());
    let total_mass = engine.particles().total_mass();
    app.insert_resource(engine);

    let start = Instant::now();
    for _ in 0..steps {
        app.update();
        let halted = app
            .world()
            .get_resource::<Engine>()
            .is_none_or(Engine::is_halted);
        if halted {
            return Err(MpmError::InvalidConfig("simulation halted".into()));
        }
    }
    let elapsed = start.elapsed().as_secs_f64();

    if let Some(engine) = app.world().get_resource::<Engine>() {
        let particles = engine.particles();
        info!(
            "{} steps of {} in {:.2}s ({:.2}ms/step)",
            engine.step_count(),
            material,
            elapsed,
            elapsed * 1000.0 / steps.max(1) as f64
        );
        info!(
            "mass {:.6} -> {:.6}, center of mass {}, mean velocity {}",
            total_mass,
            particles.total_mass(),
            particles.center_of_mass(),
            particles.center_of_mass_velocity()
        );
        engine.report_profile();
    }
    Ok(())
}
