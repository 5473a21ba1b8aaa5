//! # Spatial Structures Module
//!
//! Pure geometric structures over immutable atom data.
//!
//! ## Key Components
//!
//! - [`bounds`] - Axis-aligned bounding boxes over atom spheres, used to size
//!   the voxel grid.
//! - [`tree`] - The balanced k-d tree (`AtomTree`) that answers the influence
//!   queries driving voxel classification.

pub mod bounds;
pub mod tree;
