use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// Parameters of one volume calculation.
///
/// `grid_step` is the edge length of a bottom-level voxel in Å; `max_depth` is
/// the number of octree levels above it (0 disables subdivision and classifies
/// every bottom voxel directly — same results, different performance).
/// `probe_radius` is the solvent probe; `large_probe_radius`, when set, enables
/// two-probe mode and must be ≥ `probe_radius`. `unit_cell` restricts volume
/// tallies to one orthogonal cell with the given axis lengths.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VolumeConfig {
    pub grid_step: f64,
    pub max_depth: u32,
    pub probe_radius: f64,
    pub large_probe_radius: Option<f64>,
    pub compute_surfaces: bool,
    pub unit_cell: Option<[f64; 3]>,
}

impl VolumeConfig {
    /// `true` when a large probe radius is configured.
    pub fn two_probe_mode(&self) -> bool {
        self.large_probe_radius.is_some()
    }

    /// The radius that determines the grid margin: the large probe when
    /// present, the small one otherwise.
    pub fn widest_probe_radius(&self) -> f64 {
        self.large_probe_radius.unwrap_or(self.probe_radius)
    }
}

#[derive(Default)]
pub struct VolumeConfigBuilder {
    grid_step: Option<f64>,
    max_depth: Option<u32>,
    probe_radius: Option<f64>,
    large_probe_radius: Option<f64>,
    compute_surfaces: bool,
    unit_cell: Option<[f64; 3]>,
}

impl VolumeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid_step(mut self, step: f64) -> Self {
        self.grid_step = Some(step);
        self
    }
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }
    pub fn probe_radius(mut self, radius: f64) -> Self {
        self.probe_radius = Some(radius);
        self
    }
    pub fn large_probe_radius(mut self, radius: f64) -> Self {
        self.large_probe_radius = Some(radius);
        self
    }
    pub fn compute_surfaces(mut self, enabled: bool) -> Self {
        self.compute_surfaces = enabled;
        self
    }
    pub fn unit_cell(mut self, axis_lengths: [f64; 3]) -> Self {
        self.unit_cell = Some(axis_lengths);
        self
    }

    pub fn build(self) -> Result<VolumeConfig, ConfigError> {
        Ok(VolumeConfig {
            grid_step: self
                .grid_step
                .ok_or(ConfigError::MissingParameter("grid_step"))?,
            max_depth: self
                .max_depth
                .ok_or(ConfigError::MissingParameter("max_depth"))?,
            probe_radius: self
                .probe_radius
                .ok_or(ConfigError::MissingParameter("probe_radius"))?,
            large_probe_radius: self.large_probe_radius,
            compute_surfaces: self.compute_surfaces,
            unit_cell: self.unit_cell,
        })
    }
}
