//! Elastic solids and snow.

pub mod corotated;
pub mod snow;

pub use corotated::{ElasticSolid, fixed_corotated, fixed_corotated_snow};
pub use snow::{Snow, clamp_and_split};
