/// Precomputed neighbor-offset shells for one octree level.
///
/// Offsets are integer vectors in units of the level's voxel edge, bucketed by
/// their integer squared length so a search can enumerate neighbors in
/// increasing-distance order. `safe_sq` and `upper_sq` are squared-distance
/// thresholds in the same units: a core neighbor at or below `safe_sq` proves
/// the probe reaches this voxel, while exceeding `upper_sq` with no core
/// neighbor proves it cannot. Between the two, only a finer level can decide.
#[derive(Debug, Clone)]
pub struct LevelShells {
    pub safe_sq: f64,
    pub upper_sq: f64,
    shells: Vec<Vec<[i64; 3]>>,
}

impl LevelShells {
    /// Offset vectors of integer squared length `sq`, lexicographically ordered.
    #[inline]
    pub fn shell(&self, sq: usize) -> &[[i64; 3]] {
        &self.shells[sq]
    }

    /// Number of shells (largest stored squared distance + 1).
    #[inline]
    pub fn shell_count(&self) -> usize {
        self.shells.len()
    }
}

/// Per-level neighbor search tables for one probe radius.
///
/// Built once per (probe radius, grid step, max depth) combination and shared
/// read-only by every voxel of a classification pass; rebuilt only when those
/// parameters change.
#[derive(Debug, Clone)]
pub struct SearchIndexTable {
    levels: Vec<LevelShells>,
}

impl SearchIndexTable {
    /// Builds the tables for levels `0..=max_depth` (0 = finest).
    ///
    /// At level `l` the voxel edge is `grid_step · 2^l` and voxel centers sit on
    /// an integer lattice in that unit. Above the finest level the thresholds
    /// are widened by the half-diagonals of both the searching voxel and the
    /// candidate neighbor (√3 lattice units combined). At the finest level a
    /// probe centered anywhere inside a core voxel, not just at its lattice
    /// center, can touch the voxel under test, so both thresholds equal
    /// `(r/step + √3)²`; keeping them equal leaves no ambiguous band, which is
    /// what terminates the subdivide-and-retry recursion.
    pub fn build(probe_radius: f64, grid_step: f64, max_depth: u32) -> Self {
        let levels = (0..=max_depth)
            .map(|level| {
                let edge = grid_step * f64::from(1u32 << level);
                let ratio = probe_radius / edge;
                let (safe_sq, upper_sq) = if level == 0 {
                    let reach = ratio + 3f64.sqrt();
                    (reach * reach, reach * reach)
                } else {
                    let safe = (ratio - 3f64.sqrt()).max(0.0);
                    let upper = ratio + 3f64.sqrt();
                    (safe * safe, upper * upper)
                };
                LevelShells {
                    safe_sq,
                    upper_sq,
                    shells: enumerate_shells(upper_sq),
                }
            })
            .collect();
        Self { levels }
    }

    #[inline]
    pub fn level(&self, level: u32) -> &LevelShells {
        &self.levels[level as usize]
    }
}

fn enumerate_shells(upper_sq: f64) -> Vec<Vec<[i64; 3]>> {
    // A commensurate probe/step ratio can land the bound a float ulp below an
    // integer (0.6/0.2 squared is 8.999…); nudge so the boundary shell stays.
    let max_sq = (upper_sq + 1e-9).floor() as i64;
    let mut shells = vec![Vec::new(); (max_sq + 1) as usize];
    let reach = (max_sq as f64).sqrt().floor() as i64;
    for x in -reach..=reach {
        for y in -reach..=reach {
            for z in -reach..=reach {
                let sq = x * x + y * y + z * z;
                if sq <= max_sq {
                    shells[sq as usize].push([x, y, z]);
                }
            }
        }
    }
    shells
}
