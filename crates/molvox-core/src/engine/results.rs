use crate::engine::voxel::VoxelType;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// The full outcome of a volume computation.
#[derive(Debug, Clone, Serialize)]
pub struct VolumeReport {
    /// Total volume per voxel type, in cubic length units.
    pub volumes: HashMap<VoxelType, f64>,
    /// Closed probe-occupiable regions, sorted by descending core volume.
    pub cavities: Vec<CavityRegion>,
    /// Set when the structure contained more disconnected regions than the
    /// label space admits; `cavities` is empty but `volumes` is still exact.
    pub cavity_overflow: bool,
    /// Iso-surface areas, present when surface computation was requested.
    pub surfaces: Option<SurfaceReport>,
    /// Wall-clock timings per phase.
    pub timings: Timings,
}

/// One connected probe-occupiable region.
#[derive(Debug, Clone, Serialize)]
pub struct CavityRegion {
    pub id: u8,
    /// Number of connected openings toward the large-probe-accessible region:
    /// 0 for an isolated cavity, 1 for a pocket, 2 or more for a tunnel.
    /// `None` in single-probe mode, where no outside reference exists.
    pub entrances: Option<usize>,
    /// Volume of the region's probe-center-accessible interior.
    pub core_volume: f64,
    /// Core volume plus the surrounding probe-touchable shell.
    pub shell_volume: f64,
    /// Inclusive bottom-level voxel index bounds of the region.
    pub index_bounds: ([usize; 3], [usize; 3]),
    /// Cartesian bounds of the region's voxels.
    pub cartesian_bounds: ([f64; 3], [f64; 3]),
    pub core_surface: Option<f64>,
    pub shell_surface: Option<f64>,
}

/// Iso-surface areas for the whole structure.
#[derive(Debug, Clone, Serialize)]
pub struct SurfaceReport {
    /// Area of the boundary of the small-probe-accessible core.
    pub core_area: f64,
    /// Area of the molecular (probe-excluded) surface.
    pub excluded_area: f64,
    /// Large-probe counterparts, present in two-probe mode.
    pub large_core_area: Option<f64>,
    pub large_excluded_area: Option<f64>,
}

/// Wall-clock durations of the computation phases.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Timings {
    #[serde(with = "duration_secs")]
    pub classification: Duration,
    #[serde(with = "duration_secs")]
    pub cavity_labeling: Duration,
    #[serde(with = "duration_secs")]
    pub shell_classification: Duration,
    #[serde(with = "duration_secs")]
    pub aggregation: Duration,
    #[serde(with = "option_duration_secs")]
    pub surface: Option<Duration>,
    #[serde(with = "duration_secs")]
    pub total: Duration,
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }
}

mod option_duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&d.as_secs_f64()),
            None => s.serialize_none(),
        }
    }
}

impl VolumeReport {
    /// Total volume recorded for `kind`, zero when the type never occurred.
    pub fn volume_of(&self, kind: VoxelType) -> f64 {
        self.volumes.get(&kind).copied().unwrap_or(0.0)
    }
}
