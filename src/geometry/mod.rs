//! Collision geometry baked into the grid.

pub mod level_set;

pub use level_set::{LevelSet, VoxelSdf};
