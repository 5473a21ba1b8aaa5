use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum EngineError {
    #[error("Atom list is empty")]
    EmptyAtomList,

    #[error("Atom {index} ({symbol}) has no valid van der Waals radius")]
    InvalidAtomRadius { index: usize, symbol: String },

    #[error("Grid step must be positive, got {value}")]
    NonPositiveGridStep { value: f64 },

    #[error("Probe radius must be non-negative, got {value}")]
    NegativeProbeRadius { value: f64 },

    #[error("Large probe radius {large} must be at least the small probe radius {small}")]
    ProbeOrdering { small: f64, large: f64 },

    #[error("Unit cell axis lengths must be positive, got {0:?}")]
    InvalidUnitCell([f64; 3]),

    #[error("Calculation aborted by the caller")]
    Aborted,

    #[error("Internal logic error: {0}")]
    Internal(String),
}
