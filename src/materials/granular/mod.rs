//! Granular materials.

pub mod sand;

pub use sand::{DruckerPragerProjection, Sand, plasticity_hardening, project, st_venant_kirchhoff};
