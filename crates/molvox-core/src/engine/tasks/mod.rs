//! The engine's computation passes, in execution order: voxel classification,
//! cavity labeling, shell resolution, volume aggregation, and the optional
//! surface measurement.

pub mod aggregate;
pub mod cavities;
pub mod classify;
pub mod shell;
pub mod surface_area;
