//! Binary snapshot output.

pub mod snapshot;

pub use snapshot::{
    GridVelocitySnapshot, SnapshotWriter, read_grid_velocities, read_particle_file, read_particle_positions,
    write_grid_velocities, write_particle_positions,
};
