//! High-level entry points that drive the engine end to end.

pub mod volume;
