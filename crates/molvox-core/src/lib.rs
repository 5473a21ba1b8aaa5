//! # MolVox Core Library
//!
//! A voxel-based engine for computing probe-occupiable volumes, cavity volumes,
//! and iso-surface areas of molecular and crystalline structures.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models (`Atom`, the element
//!   radius table) and pure spatial structures (`AtomTree`, bounding boxes) with no
//!   knowledge of the voxel grid.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer owns the multi-resolution
//!   voxel grid and implements the classification machinery: octree subdivision,
//!   neighbor-shell search tables, cavity flood fill, and the marching-cube surface
//!   lookup, together with configuration, progress, and error types.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer. It ties
//!   the `engine` and `core` together to execute a complete volume calculation from an
//!   atom list to a [`engine::results::VolumeReport`].

pub mod core;
pub mod engine;
pub mod workflows;
