//! First classification pass: relate every voxel to the atom set.
//!
//! Each top-level voxel is classified against the k-d tree with its
//! half-diagonal as the radius of influence. Unambiguous regions become leaves
//! at the coarsest level that can decide them; ambiguous regions split into
//! their eight children and recurse. At the finest level the influence radius
//! is zero and every query is decidable, so the recursion always terminates.

use crate::core::spatial::tree::RegionClass;
use crate::engine::context::{ClassificationContext, ProbePass};
use crate::engine::error::EngineError;
use crate::engine::grid::{children_of, SpatialGrid};
use crate::engine::progress::Progress;
use crate::engine::voxel::VoxelType;

/// Classifies the whole grid for one probe pass.
///
/// Aborts are polled once per top-level x-slice.
pub fn classify_grid(
    grid: &mut SpatialGrid,
    ctx: &ClassificationContext,
    pass: &ProbePass,
) -> Result<(), EngineError> {
    let top = grid.max_depth();
    let dims = grid.dims(top);
    ctx.reporter.report(Progress::TaskStart {
        total_steps: dims[0] as u64,
    });
    for x in 0..dims[0] {
        if ctx.abort.is_aborted() {
            return Err(EngineError::Aborted);
        }
        for y in 0..dims[1] {
            for z in 0..dims[2] {
                classify_voxel(grid, ctx, pass, top, [x, y, z]);
            }
        }
        ctx.reporter.report(Progress::TaskIncrement);
    }
    ctx.reporter.report(Progress::TaskFinish);
    Ok(())
}

/// Re-runs classification for a second probe pass, restricted to the regions
/// the previous pass proved inaccessible. All other leaves keep their types;
/// parent masks are rebuilt afterwards.
pub fn reclassify_voids(
    grid: &mut SpatialGrid,
    ctx: &ClassificationContext,
    pass: &ProbePass,
) -> Result<(), EngineError> {
    let top = grid.max_depth();
    let dims = grid.dims(top);
    ctx.reporter.report(Progress::TaskStart {
        total_steps: dims[0] as u64,
    });
    let mut voids = Vec::new();
    for x in 0..dims[0] {
        if ctx.abort.is_aborted() {
            return Err(EngineError::Aborted);
        }
        for y in 0..dims[1] {
            for z in 0..dims[2] {
                voids.clear();
                grid.visit_leaves(top, [x, y, z], &mut |level, idx, voxel| {
                    if voxel.kind == VoxelType::InaccessibleVoid {
                        voids.push((level, idx));
                    }
                });
                for &(level, idx) in &voids {
                    classify_voxel(grid, ctx, pass, level, idx);
                }
            }
        }
        ctx.reporter.report(Progress::TaskIncrement);
    }
    grid.refresh_all_parents();
    ctx.reporter.report(Progress::TaskFinish);
    Ok(())
}

fn classify_voxel(
    grid: &mut SpatialGrid,
    ctx: &ClassificationContext,
    pass: &ProbePass,
    level: u32,
    idx: [usize; 3],
) {
    let center = grid.center(level, idx);
    let influence = grid.influence_radius(level);
    match ctx.tree.classify_region(&center, influence, pass.probe_radius) {
        RegionClass::InsideAtom => grid.voxel_mut(level, idx).assign(VoxelType::Atom),
        RegionClass::Excluded => grid.voxel_mut(level, idx).assign(VoxelType::Excluded),
        RegionClass::Core => grid.voxel_mut(level, idx).assign(pass.core_type),
        RegionClass::AtomBoundary | RegionClass::CoreBoundary => {
            // Zero influence at the bottom level makes every query decisive.
            debug_assert!(level > 0);
            grid.subdivide(level, idx);
            for child in children_of(idx) {
                classify_voxel(grid, ctx, pass, level - 1, child);
            }
            grid.refresh_parent(level, idx);
        }
    }
}
