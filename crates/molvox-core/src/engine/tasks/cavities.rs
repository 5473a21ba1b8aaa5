//! Connected-region labeling over the accessible core.
//!
//! Runs between the two classification passes: flood fill assigns each
//! connected core region a label while the grid still distinguishes core from
//! everything else cheaply, and after shell resolution the labels spread into
//! the surrounding shell voxels. Labels are `u8` tags stored inline in each
//! voxel; structures with more disconnected regions than the label space
//! admits degrade to totals-only results instead of failing.

use crate::engine::context::{ClassificationContext, ProbePass};
use crate::engine::error::EngineError;
use crate::engine::grid::{SpatialGrid, MAX_CAVITY_ID};
use crate::engine::progress::Progress;
use crate::engine::voxel::VoxelType;
use std::collections::VecDeque;

/// Outcome of the core flood fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CavityLabeling {
    /// Number of labels assigned, ids `1..=count`.
    pub count: usize,
    /// Set when the structure has more regions than [`MAX_CAVITY_ID`]; labels
    /// are unreliable and per-region reporting must be skipped.
    pub overflow: bool,
}

/// Labels every connected region of this pass's core type.
///
/// Seeds are visited in a fixed order (top-level lexicographic, then leaf
/// order), so labels are deterministic for a given structure and grid.
pub fn label_cores(
    grid: &mut SpatialGrid,
    ctx: &ClassificationContext,
    pass: &ProbePass,
) -> Result<CavityLabeling, EngineError> {
    let seeds = collect_leaves_of(grid, pass.core_type);
    ctx.reporter.report(Progress::TaskStart {
        total_steps: seeds.len() as u64,
    });

    let mut count = 0usize;
    let mut neighbors = Vec::new();
    for &(level, idx) in &seeds {
        if ctx.abort.is_aborted() {
            return Err(EngineError::Aborted);
        }
        ctx.reporter.report(Progress::TaskIncrement);
        if grid.voxel(level, idx).cavity_id != 0 {
            continue;
        }
        if count == MAX_CAVITY_ID as usize {
            return Ok(CavityLabeling {
                count,
                overflow: true,
            });
        }
        count += 1;
        let id = count as u8;

        let mut queue = VecDeque::new();
        grid.voxel_mut(level, idx).cavity_id = id;
        queue.push_back((level, idx));
        while let Some((level, idx)) = queue.pop_front() {
            neighbors.clear();
            adjacent_leaves(grid, level, idx, &mut neighbors);
            for &(nl, ni) in &neighbors {
                let voxel = grid.voxel(nl, ni);
                if voxel.kind == pass.core_type && voxel.cavity_id == 0 {
                    grid.voxel_mut(nl, ni).cavity_id = id;
                    queue.push_back((nl, ni));
                }
            }
        }
    }
    ctx.reporter.report(Progress::TaskFinish);
    Ok(CavityLabeling {
        count,
        overflow: false,
    })
}

/// Spreads core labels into the adjacent shell voxels of the same pass.
///
/// Multi-source breadth-first search seeded from every labeled core leaf, so
/// each shell voxel takes the label of its nearest (in hops) core region.
pub fn propagate_to_shells(grid: &mut SpatialGrid, pass: &ProbePass) {
    let mut queue: VecDeque<(u32, [usize; 3])> = collect_leaves_of(grid, pass.core_type)
        .into_iter()
        .filter(|&(level, idx)| grid.voxel(level, idx).cavity_id != 0)
        .collect();
    let mut neighbors = Vec::new();
    while let Some((level, idx)) = queue.pop_front() {
        let id = grid.voxel(level, idx).cavity_id;
        neighbors.clear();
        adjacent_leaves(grid, level, idx, &mut neighbors);
        for &(nl, ni) in &neighbors {
            let voxel = grid.voxel(nl, ni);
            if voxel.kind == pass.shell_type && voxel.cavity_id == 0 {
                grid.voxel_mut(nl, ni).cavity_id = id;
                queue.push_back((nl, ni));
            }
        }
    }
}

/// Counts the openings of cavity `id` toward the large-probe-accessible
/// outside: the number of connected patches of the cavity's leaves that touch
/// large-core or large-shell space. Zero means an isolated cavity, one a
/// pocket, two or more a tunnel.
pub fn count_entrances(grid: &SpatialGrid, id: u8) -> usize {
    let mut boundary = std::collections::HashSet::new();
    let mut neighbors = Vec::new();
    for (level, idx) in collect_labeled_leaves(grid, id) {
        neighbors.clear();
        adjacent_leaves(grid, level, idx, &mut neighbors);
        let touches_outside = neighbors.iter().any(|&(nl, ni)| {
            matches!(
                grid.voxel(nl, ni).kind,
                VoxelType::LargeCore | VoxelType::LargeShell
            )
        });
        if touches_outside {
            boundary.insert((level, idx));
        }
    }

    let mut components = 0usize;
    let mut visited = std::collections::HashSet::new();
    let mut ordered: Vec<_> = boundary.iter().copied().collect();
    ordered.sort_unstable();
    for seed in ordered {
        if !visited.insert(seed) {
            continue;
        }
        components += 1;
        let mut queue = VecDeque::new();
        queue.push_back(seed);
        while let Some((level, idx)) = queue.pop_front() {
            neighbors.clear();
            adjacent_leaves(grid, level, idx, &mut neighbors);
            for &next in &neighbors {
                if boundary.contains(&next) && visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }
    components
}

/// All leaves of kind `kind`, in the grid's canonical traversal order.
fn collect_leaves_of(grid: &SpatialGrid, kind: VoxelType) -> Vec<(u32, [usize; 3])> {
    let mut leaves = Vec::new();
    let top = grid.max_depth();
    let dims = grid.dims(top);
    for x in 0..dims[0] {
        for y in 0..dims[1] {
            for z in 0..dims[2] {
                grid.visit_leaves(top, [x, y, z], &mut |level, idx, voxel| {
                    if voxel.kind == kind {
                        leaves.push((level, idx));
                    }
                });
            }
        }
    }
    leaves
}

fn collect_labeled_leaves(grid: &SpatialGrid, id: u8) -> Vec<(u32, [usize; 3])> {
    let mut leaves = Vec::new();
    let top = grid.max_depth();
    let dims = grid.dims(top);
    for x in 0..dims[0] {
        for y in 0..dims[1] {
            for z in 0..dims[2] {
                grid.visit_leaves(top, [x, y, z], &mut |level, idx, voxel| {
                    if voxel.cavity_id == id {
                        leaves.push((level, idx));
                    }
                });
            }
        }
    }
    leaves
}

/// Enumerates the face-adjacent leaves of a leaf, across resolution levels.
///
/// Same-level neighbors that resolved more coarsely contribute their covering
/// leaf; neighbors that split further contribute the facing leaves of their
/// subtree. Coarse neighbors shared by several faces may appear more than
/// once; callers dedupe via labels or visited sets.
fn adjacent_leaves(
    grid: &SpatialGrid,
    level: u32,
    idx: [usize; 3],
    out: &mut Vec<(u32, [usize; 3])>,
) {
    for axis in 0..3 {
        for dir in [-1i64, 1i64] {
            let mut signed = [idx[0] as i64, idx[1] as i64, idx[2] as i64];
            signed[axis] += dir;
            let Some(neighbor) = grid.checked_index(level, signed) else {
                continue;
            };
            let (leaf_level, leaf_idx) = grid.resolve_leaf(level, neighbor);
            if leaf_level == level && grid.voxel(leaf_level, leaf_idx).has_children {
                grid.boundary_leaves(level, neighbor, axis, dir > 0, out);
            } else {
                out.push((leaf_level, leaf_idx));
            }
        }
    }
}
