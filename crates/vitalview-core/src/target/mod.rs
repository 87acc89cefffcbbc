//! Anatomical target domain module.
//!
//! - `model`: Geometry and target definitions (`Vec3`, `Orbit`, `TargetDefinition`)
//! - `registry`: The static lookup table and resolver (`TargetRegistry`)

mod model;
mod registry;

pub use model::{Orbit, TargetDefinition, Vec3};
pub use registry::{DEFAULT_TARGET_KEY, TargetRegistry};
