//! Materials for MPM simulation
//!
//! Three families share one `MaterialModel` interface:
//!
//! * `solids` - fixed corotated elasticity, and snow on top of it
//! * `granular` - sand with Drucker-Prager plasticity

pub mod families;
pub mod granular;
pub mod material_types;
pub mod solids;
pub mod utils;

pub use material_types::{Material, MaterialModel, MaterialType};

pub use utils::check;
pub use utils::physics;
