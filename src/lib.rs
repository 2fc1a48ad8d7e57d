use bevy::prelude::*;

pub mod config;
pub mod core;
pub mod error;
pub mod geometry;
pub mod io;
pub mod materials;
pub mod math;
pub mod sampling;
pub mod scene;
pub mod solver;
pub mod telemetry;

// Public re-exports for clean API
pub use config::SolverParams;
pub use crate::core::{CollisionPolicy, Engine, Grid, GridNode, Particle, ParticleList};
pub use error::{MpmError, MpmResult};
pub use geometry::{LevelSet, VoxelSdf};
pub use io::SnapshotWriter;
pub use materials::{Material, MaterialModel, MaterialType};
pub use telemetry::{LogProfiler, NoopProfiler, StepPhase, StepProfiler};

/// Steps the `Engine` resource once per `Update`.
pub struct MpmPlugin;

impl Plugin for MpmPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, step_simulation);
    }
}

/// One engine step, plus snapshot output when a `SnapshotWriter` exists.
/// A failed step halts the engine for the rest of the run.
pub fn step_simulation(engine: Option<ResMut<Engine>>, snapshots: Option<Res<SnapshotWriter>>) {
    let Some(mut engine) = engine else {
        return;
    };
    if engine.is_halted() {
        return;
    }

    let result = match snapshots.as_deref() {
        Some(writer) => engine.exec_one_step_with(|grid, particles, step| {
            writer.write_step(grid, particles, step)
        }),
        None => engine.exec_one_step(),
    };
    if let Err(err) = result {
        warn!("simulation halted at step {}: {}", engine.step_count(), err);
    }
}
