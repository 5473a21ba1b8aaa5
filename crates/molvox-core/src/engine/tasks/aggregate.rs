//! Volume aggregation: fold the classified grid into per-type totals and
//! per-cavity records.
//!
//! A leaf at level `l` counts as `(2^l)³` bottom voxels; with a unit cell
//! configured, each voxel instead contributes the exact overlap of its
//! cartesian extent with the cell, so totals over a periodic structure sum to
//! the cell volume exactly and boundary voxels get their natural fractional
//! weights.

use crate::engine::config::VolumeConfig;
use crate::engine::grid::SpatialGrid;
use crate::engine::results::CavityRegion;
use crate::engine::tasks::cavities::CavityLabeling;
use crate::engine::voxel::VoxelType;
use std::collections::HashMap;

/// Totals and cavity records produced from a fully classified grid.
#[derive(Debug, Clone)]
pub struct AggregateOutput {
    pub volumes: HashMap<VoxelType, f64>,
    /// Sorted by descending core volume, ties broken by ascending id.
    /// Empty when labeling overflowed.
    pub cavities: Vec<CavityRegion>,
}

#[derive(Debug, Clone)]
struct CavityAccumulator {
    core_volume: f64,
    shell_volume: f64,
    index_min: [usize; 3],
    index_max: [usize; 3],
}

impl CavityAccumulator {
    fn new() -> Self {
        Self {
            core_volume: 0.0,
            shell_volume: 0.0,
            index_min: [usize::MAX; 3],
            index_max: [0; 3],
        }
    }
}

pub fn aggregate(
    grid: &SpatialGrid,
    config: &VolumeConfig,
    labeling: &CavityLabeling,
) -> AggregateOutput {
    let mut volumes: HashMap<VoxelType, f64> = HashMap::new();
    let mut accumulators = vec![CavityAccumulator::new(); labeling.count + 1];

    let top = grid.max_depth();
    let dims = grid.dims(top);
    for x in 0..dims[0] {
        for y in 0..dims[1] {
            for z in 0..dims[2] {
                grid.visit_leaves(top, [x, y, z], &mut |level, idx, voxel| {
                    let weight = leaf_weight(grid, config, level, idx);
                    *volumes.entry(voxel.kind).or_insert(0.0) += weight;

                    let id = voxel.cavity_id as usize;
                    if labeling.overflow || id == 0 {
                        return;
                    }
                    let acc = &mut accumulators[id];
                    acc.shell_volume += weight;
                    if voxel.kind == VoxelType::SmallCore {
                        acc.core_volume += weight;
                    }
                    let span = 1usize << level;
                    for axis in 0..3 {
                        let lo = idx[axis] * span;
                        let hi = lo + span - 1;
                        acc.index_min[axis] = acc.index_min[axis].min(lo);
                        acc.index_max[axis] = acc.index_max[axis].max(hi);
                    }
                });
            }
        }
    }

    let mut cavities = Vec::new();
    if !labeling.overflow {
        for (id, acc) in accumulators.iter().enumerate().skip(1) {
            if acc.index_min[0] == usize::MAX {
                continue;
            }
            cavities.push(CavityRegion {
                id: id as u8,
                entrances: None,
                core_volume: acc.core_volume,
                shell_volume: acc.shell_volume,
                index_bounds: (acc.index_min, acc.index_max),
                cartesian_bounds: cartesian_bounds(grid, acc.index_min, acc.index_max),
                core_surface: None,
                shell_surface: None,
            });
        }
        cavities.sort_by(|a, b| {
            b.core_volume
                .partial_cmp(&a.core_volume)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });
    }

    AggregateOutput { volumes, cavities }
}

/// Contribution of one leaf, in cubic length units.
fn leaf_weight(grid: &SpatialGrid, config: &VolumeConfig, level: u32, idx: [usize; 3]) -> f64 {
    let edge = grid.edge_length(level);
    match config.unit_cell {
        None => edge * edge * edge,
        Some(cell) => {
            let mut weight = 1.0;
            for axis in 0..3 {
                let lo = grid.origin()[axis] + idx[axis] as f64 * edge;
                let hi = lo + edge;
                weight *= (hi.min(cell[axis]) - lo.max(0.0)).max(0.0);
            }
            weight
        }
    }
}

fn cartesian_bounds(
    grid: &SpatialGrid,
    index_min: [usize; 3],
    index_max: [usize; 3],
) -> ([f64; 3], [f64; 3]) {
    let mut lo = [0.0; 3];
    let mut hi = [0.0; 3];
    for axis in 0..3 {
        lo[axis] = grid.origin()[axis] + index_min[axis] as f64 * grid.step();
        hi[axis] = grid.origin()[axis] + (index_max[axis] + 1) as f64 * grid.step();
    }
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::spatial::bounds::BoundingBox;
    use crate::engine::config::VolumeConfigBuilder;
    use crate::engine::context::{ClassificationContext, ProbePass};
    use crate::engine::progress::{AbortSignal, ProgressReporter};
    use crate::engine::tasks::cavities::{label_cores, propagate_to_shells};
    use crate::engine::tasks::classify::classify_grid;
    use crate::engine::tasks::shell::classify_shells;
    use nalgebra::Point3;

    fn pipeline(atoms: &[Atom], config: &VolumeConfig) -> (SpatialGrid, CavityLabeling) {
        let bounds = BoundingBox::from_atoms(atoms).unwrap();
        let margin = config.probe_radius + 2.0 * config.grid_step;
        let mut grid = SpatialGrid::new(&bounds, config.grid_step, config.max_depth, margin);
        let reporter = ProgressReporter::new();
        let abort = AbortSignal::new();
        let ctx = ClassificationContext::new(atoms, &reporter, &abort);
        let pass = ProbePass::small(config.probe_radius, config.grid_step, config.max_depth);
        classify_grid(&mut grid, &ctx, &pass).unwrap();
        let labeling = label_cores(&mut grid, &ctx, &pass).unwrap();
        classify_shells(&mut grid, &ctx, &pass).unwrap();
        propagate_to_shells(&mut grid, &pass);
        (grid, labeling)
    }

    #[test]
    fn totals_conserve_the_grid_box_volume() {
        let atoms = vec![Atom::new("C", Point3::origin(), 1.7)];
        let config = VolumeConfigBuilder::new()
            .grid_step(0.25)
            .max_depth(2)
            .probe_radius(1.2)
            .build()
            .unwrap();
        let (grid, labeling) = pipeline(&atoms, &config);
        let output = aggregate(&grid, &config, &labeling);
        let total: f64 = output.volumes.values().sum();
        assert!((total - grid.box_volume()).abs() < 1e-6 * grid.box_volume());
    }

    #[test]
    fn unit_cell_totals_conserve_the_cell_volume() {
        let atoms = vec![Atom::new("C", Point3::new(1.0, 1.0, 1.0), 1.0)];
        let config = VolumeConfigBuilder::new()
            .grid_step(0.3)
            .max_depth(1)
            .probe_radius(0.8)
            .unit_cell([2.0, 2.0, 2.0])
            .build()
            .unwrap();
        let (grid, labeling) = pipeline(&atoms, &config);
        let output = aggregate(&grid, &config, &labeling);
        let total: f64 = output.volumes.values().sum();
        assert!((total - 8.0).abs() < 1e-9);
    }

    #[test]
    fn atom_volume_approximates_the_sphere() {
        let atoms = vec![Atom::new("C", Point3::origin(), 1.7)];
        let config = VolumeConfigBuilder::new()
            .grid_step(0.1)
            .max_depth(2)
            .probe_radius(1.2)
            .build()
            .unwrap();
        let (grid, labeling) = pipeline(&atoms, &config);
        let output = aggregate(&grid, &config, &labeling);
        let atom_volume = output.volumes[&VoxelType::Atom];
        let exact = 4.0 / 3.0 * std::f64::consts::PI * 1.7f64.powi(3);
        assert!((atom_volume - exact).abs() / exact < 0.05);
    }

    #[test]
    fn cavity_bounds_cover_the_whole_region() {
        let atoms = vec![Atom::new("C", Point3::origin(), 1.7)];
        let config = VolumeConfigBuilder::new()
            .grid_step(0.25)
            .max_depth(2)
            .probe_radius(1.2)
            .build()
            .unwrap();
        let (grid, labeling) = pipeline(&atoms, &config);
        let output = aggregate(&grid, &config, &labeling);
        assert_eq!(output.cavities.len(), 1);
        let cavity = &output.cavities[0];
        assert_eq!(cavity.id, 1);
        assert!(cavity.core_volume > 0.0);
        assert!(cavity.shell_volume > cavity.core_volume);
        // The open-space region spans the whole grid.
        assert_eq!(cavity.index_bounds.0, [0, 0, 0]);
        let dims = grid.dims(0);
        assert_eq!(
            cavity.index_bounds.1,
            [dims[0] - 1, dims[1] - 1, dims[2] - 1]
        );
        let (lo, hi) = cavity.cartesian_bounds;
        for axis in 0..3 {
            assert!(lo[axis] < hi[axis]);
        }
    }
}
