//! Second classification pass: split probe-excluded space into shell and
//! inaccessible void.
//!
//! A voxel in the exclusion band belongs to the shell exactly when a probe
//! centered somewhere in the accessible core can touch it. The pass answers
//! that reachability question per excluded leaf by scanning the precomputed
//! neighbor shells in increasing distance order: a uniform core leaf within
//! the safe radius proves reachability, exhausting the upper radius disproves
//! it, and anything in between forces a retry at the next-finer level.

use crate::engine::context::{ClassificationContext, ProbePass};
use crate::engine::error::EngineError;
use crate::engine::grid::{children_of, SpatialGrid};
use crate::engine::progress::Progress;
use crate::engine::voxel::VoxelType;

/// Resolves every excluded leaf of the grid to shell or void for one pass.
///
/// Aborts are polled once per top-level x-slice. The scan order is fixed
/// (top-level lexicographic, then leaf order), and since no decision here
/// creates or removes core leaves, results do not depend on that order.
pub fn classify_shells(
    grid: &mut SpatialGrid,
    ctx: &ClassificationContext,
    pass: &ProbePass,
) -> Result<(), EngineError> {
    let top = grid.max_depth();
    let dims = grid.dims(top);
    ctx.reporter.report(Progress::TaskStart {
        total_steps: dims[0] as u64,
    });
    let mut pending = Vec::new();
    for x in 0..dims[0] {
        if ctx.abort.is_aborted() {
            return Err(EngineError::Aborted);
        }
        for y in 0..dims[1] {
            for z in 0..dims[2] {
                pending.clear();
                grid.visit_leaves(top, [x, y, z], &mut |level, idx, voxel| {
                    if voxel.kind == VoxelType::Excluded {
                        pending.push((level, idx));
                    }
                });
                for &(level, idx) in &pending {
                    resolve_excluded(grid, pass, level, idx);
                }
            }
        }
        ctx.reporter.report(Progress::TaskIncrement);
    }
    ctx.reporter.report(Progress::TaskFinish);
    Ok(())
}

fn resolve_excluded(grid: &mut SpatialGrid, pass: &ProbePass, level: u32, idx: [usize; 3]) {
    let shells = pass.table.level(level);
    let mut ambiguous = false;

    'scan: for sq in 1..shells.shell_count() {
        let decisive = (sq as f64) <= shells.safe_sq;
        if !decisive && ambiguous {
            break;
        }
        for offset in shells.shell(sq) {
            let signed = [
                idx[0] as i64 + offset[0],
                idx[1] as i64 + offset[1],
                idx[2] as i64 + offset[2],
            ];
            let Some(neighbor) = grid.checked_index(level, signed) else {
                continue;
            };
            let (leaf_level, leaf_idx) = grid.resolve_leaf(level, neighbor);
            let voxel = grid.voxel(leaf_level, leaf_idx);
            if voxel.has_children {
                // A finer-resolved neighbor: its summary mask tells whether
                // any core hides inside, but not where, so it can only raise
                // ambiguity.
                if voxel.mask.intersects(pass.core_mask()) {
                    ambiguous = true;
                    if !decisive {
                        break 'scan;
                    }
                }
            } else if voxel.kind == pass.core_type {
                if decisive {
                    grid.voxel_mut(level, idx).assign(pass.shell_type);
                    return;
                }
                ambiguous = true;
                break 'scan;
            }
        }
    }

    if ambiguous {
        // Between the thresholds only a finer level can decide. The equal
        // thresholds at level 0 guarantee this branch is never taken there.
        grid.subdivide(level, idx);
        for child in children_of(idx) {
            grid.voxel_mut(level - 1, child).assign(VoxelType::Excluded);
            resolve_excluded(grid, pass, level - 1, child);
        }
        grid.refresh_parent(level, idx);
    } else {
        grid.voxel_mut(level, idx).assign(VoxelType::InaccessibleVoid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::spatial::bounds::BoundingBox;
    use crate::engine::progress::{AbortSignal, ProgressReporter};
    use crate::engine::tasks::classify::classify_grid;
    use nalgebra::Point3;

    fn run_both_passes(
        atoms: &[Atom],
        probe: f64,
        step: f64,
        depth: u32,
    ) -> (SpatialGrid, ProbePass) {
        let bounds = BoundingBox::from_atoms(atoms).unwrap();
        let mut grid = SpatialGrid::new(&bounds, step, depth, probe + 2.0 * step);
        let reporter = ProgressReporter::new();
        let abort = AbortSignal::new();
        let ctx = ClassificationContext::new(atoms, &reporter, &abort);
        let pass = ProbePass::small(probe, step, depth);
        classify_grid(&mut grid, &ctx, &pass).unwrap();
        classify_shells(&mut grid, &ctx, &pass).unwrap();
        (grid, pass)
    }

    fn count_kinds(grid: &SpatialGrid) -> std::collections::HashMap<VoxelType, usize> {
        let top = grid.max_depth();
        let dims = grid.dims(top);
        let mut counts = std::collections::HashMap::new();
        for x in 0..dims[0] {
            for y in 0..dims[1] {
                for z in 0..dims[2] {
                    grid.visit_leaves(top, [x, y, z], &mut |level, _, voxel| {
                        *counts.entry(voxel.kind).or_insert(0) += 1usize << (3 * level);
                    });
                }
            }
        }
        counts
    }

    #[test]
    fn no_excluded_leaves_survive_the_pass() {
        let atoms = vec![Atom::new("C", Point3::origin(), 1.7)];
        let (grid, _) = run_both_passes(&atoms, 1.2, 0.25, 2);
        let counts = count_kinds(&grid);
        assert_eq!(counts.get(&VoxelType::Excluded), None);
    }

    #[test]
    fn a_single_atom_has_shell_but_no_void() {
        // Every point of a lone atom's exclusion band is touchable from open
        // space, so nothing can be inaccessible.
        let atoms = vec![Atom::new("C", Point3::origin(), 1.7)];
        let (grid, _) = run_both_passes(&atoms, 1.2, 0.25, 2);
        let counts = count_kinds(&grid);
        assert!(counts.get(&VoxelType::SmallShell).copied().unwrap_or(0) > 0);
        assert_eq!(counts.get(&VoxelType::InaccessibleVoid), None);
    }

    #[test]
    fn a_deep_pore_between_close_atoms_contains_void() {
        // Two atoms 4.2 apart leave a 0.8 gap between their van der Waals
        // spheres. A probe of radius 1.0 cannot enter the gap, so the band
        // midway between the atoms is inaccessible.
        let atoms = vec![
            Atom::new("C", Point3::new(-2.1, 0.0, 0.0), 1.7),
            Atom::new("C", Point3::new(2.1, 0.0, 0.0), 1.7),
        ];
        let (grid, _) = run_both_passes(&atoms, 1.0, 0.2, 2);
        let counts = count_kinds(&grid);
        assert!(
            counts
                .get(&VoxelType::InaccessibleVoid)
                .copied()
                .unwrap_or(0)
                > 0
        );
    }

    #[test]
    fn shell_voxels_sit_within_probe_reach_of_core() {
        let atoms = vec![Atom::new("C", Point3::origin(), 1.7)];
        let probe = 1.2;
        let step = 0.25;
        let (grid, _) = run_both_passes(&atoms, probe, step, 2);
        // Collect bottom-equivalent shell and core voxel centers and verify
        // each shell center has a core center within probe reach plus the
        // lattice slack of one voxel diagonal.
        let top = grid.max_depth();
        let dims = grid.dims(top);
        let mut cores = Vec::new();
        let mut shells = Vec::new();
        for x in 0..dims[0] {
            for y in 0..dims[1] {
                for z in 0..dims[2] {
                    grid.visit_leaves(top, [x, y, z], &mut |level, idx, voxel| {
                        match voxel.kind {
                            VoxelType::SmallCore => cores.push(grid.center(level, idx)),
                            VoxelType::SmallShell => shells.push(grid.center(level, idx)),
                            _ => {}
                        }
                    });
                }
            }
        }
        let slack = probe + 3f64.sqrt() * step * 4.0;
        for shell in &shells {
            let reachable = cores.iter().any(|core| (core - shell).norm() <= slack);
            assert!(reachable, "stranded shell voxel at {shell:?}");
        }
    }
}
