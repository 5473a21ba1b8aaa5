//! # Core Models Module
//!
//! This module contains the data structures used to describe the structure under
//! analysis, providing the immutable input side of a volume calculation.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom representation with position, van der Waals radius,
//!   and identity.
//! - [`elements`] - Built-in element data table for resolving van der Waals radii
//!   and atomic numbers from element symbols.

pub mod atom;
pub mod elements;
