//! The computation engine for probe-occupiable volume analysis.
//!
//! # Overview
//!
//! This module owns the machinery that turns a set of placed atoms into
//! volumes, cavities, and surface areas: the multi-resolution voxel grid,
//! the classification and labeling tasks that run over it, the probe-reach
//! search tables, and the reporting surface (progress, results, errors).
//!
//! # Architecture
//!
//! - `config`: run parameters with builder-style validation.
//! - `grid` / `voxel`: the octree-structured grid and its cell states.
//! - `search` / `surface`: precomputed lookup tables.
//! - `context`: per-run shared state threaded through the tasks.
//! - `tasks`: the classification, labeling, aggregation, and surface passes.
//! - `progress` / `results` / `error`: the engine's reporting surface.

pub mod config;
pub mod context;
pub mod error;
pub mod grid;
pub mod progress;
pub mod results;
pub mod search;
pub mod surface;
pub mod tasks;
pub mod voxel;
