//! Surface measurement: marching-cubes style area integration over a voxel
//! membership set.
//!
//! The pass projects the classified grid onto a boolean bottom-level bitmap
//! for the requested set of voxel states, then slides a 2×2×2 window over
//! every corner configuration, including the grid boundary where missing
//! corners count as outside. Each configuration's iso-surface patch area comes
//! from the precomputed [`SurfaceLut`]; the sum scaled by the squared grid
//! step is the surface area.

use crate::engine::grid::SpatialGrid;
use crate::engine::surface::SurfaceLut;
use crate::engine::voxel::Voxel;

/// Measures the iso-surface area of the set of bottom-level voxels whose
/// resolved leaf satisfies `in_set`, in squared length units.
pub fn measure(grid: &SpatialGrid, lut: &SurfaceLut, in_set: &dyn Fn(&Voxel) -> bool) -> f64 {
    let dims = grid.dims(0);
    let member = membership_bitmap(grid, in_set);
    let at = |x: i64, y: i64, z: i64| -> bool {
        if x < 0 || y < 0 || z < 0 {
            return false;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        if x >= dims[0] || y >= dims[1] || z >= dims[2] {
            return false;
        }
        member[x + dims[0] * (y + dims[1] * z)]
    };

    let mut total = 0.0;
    for z in -1..dims[2] as i64 {
        for y in -1..dims[1] as i64 {
            for x in -1..dims[0] as i64 {
                let mut config = 0u8;
                for corner in 0..8u8 {
                    let dx = i64::from(corner & 1);
                    let dy = i64::from((corner >> 1) & 1);
                    let dz = i64::from((corner >> 2) & 1);
                    if at(x + dx, y + dy, z + dz) {
                        config |= 1 << corner;
                    }
                }
                total += lut.area(config);
            }
        }
    }
    total * grid.step() * grid.step()
}

/// Expands the leaf structure into a dense bottom-level membership bitmap.
fn membership_bitmap(grid: &SpatialGrid, in_set: &dyn Fn(&Voxel) -> bool) -> Vec<bool> {
    let dims = grid.dims(0);
    let mut member = vec![false; dims[0] * dims[1] * dims[2]];
    let top = grid.max_depth();
    let top_dims = grid.dims(top);
    for tx in 0..top_dims[0] {
        for ty in 0..top_dims[1] {
            for tz in 0..top_dims[2] {
                grid.visit_leaves(top, [tx, ty, tz], &mut |level, idx, voxel| {
                    if !in_set(voxel) {
                        return;
                    }
                    let span = 1usize << level;
                    for z in idx[2] * span..(idx[2] + 1) * span {
                        for y in idx[1] * span..(idx[1] + 1) * span {
                            for x in idx[0] * span..(idx[0] + 1) * span {
                                member[x + dims[0] * (y + dims[1] * z)] = true;
                            }
                        }
                    }
                });
            }
        }
    }
    member
}
