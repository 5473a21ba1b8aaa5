//! # Core Module
//!
//! This module provides the fundamental building blocks for voxel-based molecular
//! volume analysis, serving as the stateless foundation of the library.
//!
//! ## Overview
//!
//! The core module implements the data structures and pure spatial algorithms the
//! classification engine is built on. Nothing in this module knows about voxel grids,
//! probes beyond a query parameter, or the phases of a calculation; everything here
//! is immutable input data and read-only queries over it.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atom records and the built-in
//!   element radius table.
//! - **Spatial Structures** ([`spatial`]) - Axis-aligned bounding boxes and the
//!   balanced k-d tree used for nearest-atom influence queries.

pub mod models;
pub mod spatial;
