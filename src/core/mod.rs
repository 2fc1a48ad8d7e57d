pub mod engine;
pub mod grid;
pub mod kernel;
pub mod particle;

pub use engine::Engine;
pub use grid::{CollisionPolicy, Grid, GridNode, GridUpdate, resolve_collision};
pub use kernel::{
    GridInterpolation, KERNEL_SIZE, NEIGHBOR_COUNT, ParticleTransferCache, TransferNeighbor,
    base_node, inv_d, populate_transfer_cache,
};
pub use particle::{Particle, ParticleList};
