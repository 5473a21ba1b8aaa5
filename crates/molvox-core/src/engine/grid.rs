use crate::core::spatial::bounds::BoundingBox;
use crate::engine::voxel::{TypeMask, Voxel, VoxelType};
use nalgebra::Point3;

/// Largest usable cavity label; 255 is reserved, 0 means "no cavity".
pub const MAX_CAVITY_ID: u8 = 254;

#[derive(Debug, Clone)]
struct Level {
    dims: [usize; 3],
    voxels: Vec<Voxel>,
}

impl Level {
    #[inline]
    fn index(&self, idx: [usize; 3]) -> usize {
        debug_assert!(idx[0] < self.dims[0] && idx[1] < self.dims[1] && idx[2] < self.dims[2]);
        idx[0] + self.dims[0] * (idx[1] + self.dims[1] * idx[2])
    }
}

/// The multi-resolution voxel grid.
///
/// One dense array per octree level, level 0 being the finest: level `L` has
/// `top_dims · 2^(max_depth − L)` voxels per axis and the eight children of
/// voxel `(x, y, z)` at level `L` are `(2x+dx, 2y+dy, 2z+dz)` at level `L−1`.
/// The grid exclusively owns every voxel; subdivision is a flag flip plus
/// classification of child slots that already exist.
///
/// The cartesian origin is aligned down to a grid-step multiple and the box
/// covers the padded atom bounds, with per-axis counts rounded up to whole
/// top-level voxels so every level tiles the same region exactly.
pub struct SpatialGrid {
    origin: Point3<f64>,
    step: f64,
    max_depth: u32,
    levels: Vec<Level>,
}

impl SpatialGrid {
    /// Sizes the grid to `bounds` grown by `margin` on every side.
    pub fn new(bounds: &BoundingBox, step: f64, max_depth: u32, margin: f64) -> Self {
        let padded = bounds.padded(margin);
        let chunk = 1usize << max_depth;

        let mut origin = Point3::origin();
        let mut bottom_dims = [0usize; 3];
        for axis in 0..3 {
            origin[axis] = (padded.min[axis] / step).floor() * step;
            let span = padded.max[axis] - origin[axis];
            let cells = (span / step).ceil().max(1.0) as usize;
            bottom_dims[axis] = cells.div_ceil(chunk) * chunk;
        }

        let levels = (0..=max_depth)
            .map(|level| {
                let dims = [
                    bottom_dims[0] >> level,
                    bottom_dims[1] >> level,
                    bottom_dims[2] >> level,
                ];
                Level {
                    dims,
                    voxels: vec![Voxel::default(); dims[0] * dims[1] * dims[2]],
                }
            })
            .collect();

        Self {
            origin,
            step,
            max_depth,
            levels,
        }
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[inline]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// Voxel counts per axis at `level`.
    #[inline]
    pub fn dims(&self, level: u32) -> [usize; 3] {
        self.levels[level as usize].dims
    }

    /// Voxel edge length at `level`.
    #[inline]
    pub fn edge_length(&self, level: u32) -> f64 {
        self.step * f64::from(1u32 << level)
    }

    /// The voxel half-diagonal used as the radius of influence during
    /// classification. Zero at the finest level, where voxel centers are
    /// treated as exact sample points.
    #[inline]
    pub fn influence_radius(&self, level: u32) -> f64 {
        if level == 0 {
            0.0
        } else {
            (3f64.sqrt() / 2.0) * self.edge_length(level)
        }
    }

    /// Cartesian center of a voxel.
    #[inline]
    pub fn center(&self, level: u32, idx: [usize; 3]) -> Point3<f64> {
        let edge = self.edge_length(level);
        Point3::new(
            self.origin.x + (idx[0] as f64 + 0.5) * edge,
            self.origin.y + (idx[1] as f64 + 0.5) * edge,
            self.origin.z + (idx[2] as f64 + 0.5) * edge,
        )
    }

    /// Bounds-checks a signed index at `level`.
    #[inline]
    pub fn checked_index(&self, level: u32, idx: [i64; 3]) -> Option<[usize; 3]> {
        let dims = self.dims(level);
        let valid = (0..3).all(|a| idx[a] >= 0 && (idx[a] as usize) < dims[a]);
        valid.then(|| [idx[0] as usize, idx[1] as usize, idx[2] as usize])
    }

    #[inline]
    pub fn voxel(&self, level: u32, idx: [usize; 3]) -> &Voxel {
        let l = &self.levels[level as usize];
        &l.voxels[l.index(idx)]
    }

    #[inline]
    pub fn voxel_mut(&mut self, level: u32, idx: [usize; 3]) -> &mut Voxel {
        let l = &mut self.levels[level as usize];
        let i = l.index(idx);
        &mut l.voxels[i]
    }

    /// Marks a voxel as split. Its eight child slots at the next-finer level
    /// are left for the caller to classify.
    pub fn subdivide(&mut self, level: u32, idx: [usize; 3]) {
        debug_assert!(level > 0, "cannot subdivide a finest-level voxel");
        let voxel = self.voxel_mut(level, idx);
        voxel.has_children = true;
        voxel.kind = VoxelType::Unassigned;
    }

    /// Recomputes a split voxel's mask as the union of its children's positive
    /// flags, with `ASSIGNED` set only when all eight children carry it.
    pub fn refresh_parent(&mut self, level: u32, idx: [usize; 3]) {
        debug_assert!(level > 0 && self.voxel(level, idx).has_children);
        let mut union = TypeMask::EMPTY;
        let mut all_assigned = true;
        for child in children_of(idx) {
            let mask = self.voxel(level - 1, child).mask;
            all_assigned &= mask.is_assigned();
            union |= mask;
        }
        // Strip the aggregated ASSIGNED bit and re-add it only if unanimous.
        let mut mask = union & TypeMask::positive();
        if all_assigned {
            mask |= TypeMask::ASSIGNED;
        }
        self.voxel_mut(level, idx).mask = mask;
    }

    /// Recomputes every split voxel's mask, bottom-up. Used after a pass that
    /// rewrites leaves in place without tracking its ancestors.
    pub fn refresh_all_parents(&mut self) {
        for level in 1..=self.max_depth {
            let dims = self.dims(level);
            for z in 0..dims[2] {
                for y in 0..dims[1] {
                    for x in 0..dims[0] {
                        if self.voxel(level, [x, y, z]).has_children {
                            self.refresh_parent(level, [x, y, z]);
                        }
                    }
                }
            }
        }
    }

    /// Resolves the effective leaf covering position `idx` of `level`.
    ///
    /// Walks down from the top-level ancestor into the child containing the
    /// position, stopping at the first voxel without children. The result is at
    /// a level ≥ `level` when the region was resolved more coarsely, or
    /// `(level, idx)` itself — possibly still split, which callers must handle
    /// by descending via [`SpatialGrid::boundary_leaves`] or the mask summary.
    pub fn resolve_leaf(&self, level: u32, idx: [usize; 3]) -> (u32, [usize; 3]) {
        let mut current = self.max_depth;
        while current > level {
            let shift = current - level;
            let ancestor = [idx[0] >> shift, idx[1] >> shift, idx[2] >> shift];
            if !self.voxel(current, ancestor).has_children {
                return (current, ancestor);
            }
            current -= 1;
        }
        (level, idx)
    }

    /// Collects the leaves of the subtree rooted at `(level, idx)` that touch
    /// the subtree's low (`low_side`) or high face along `axis`.
    pub fn boundary_leaves(
        &self,
        level: u32,
        idx: [usize; 3],
        axis: usize,
        low_side: bool,
        out: &mut Vec<(u32, [usize; 3])>,
    ) {
        if level == 0 || !self.voxel(level, idx).has_children {
            out.push((level, idx));
            return;
        }
        let face_bit = if low_side { 0 } else { 1 };
        for child in children_of(idx) {
            if child[axis] & 1 == face_bit {
                self.boundary_leaves(level - 1, child, axis, low_side, out);
            }
        }
    }

    /// Visits every leaf of the subtree rooted at `(level, idx)` in a fixed
    /// deterministic order (children in x-fastest order).
    pub fn visit_leaves(
        &self,
        level: u32,
        idx: [usize; 3],
        visit: &mut impl FnMut(u32, [usize; 3], &Voxel),
    ) {
        let voxel = self.voxel(level, idx);
        if level == 0 || !voxel.has_children {
            visit(level, idx, voxel);
            return;
        }
        for child in children_of(idx) {
            self.visit_leaves(level - 1, child, visit);
        }
    }

    /// Total cartesian volume of the grid box.
    pub fn box_volume(&self) -> f64 {
        let dims = self.dims(0);
        let s = self.step;
        (dims[0] as f64 * s) * (dims[1] as f64 * s) * (dims[2] as f64 * s)
    }
}

/// The eight children of a voxel index, x-fastest.
pub fn children_of(idx: [usize; 3]) -> [[usize; 3]; 8] {
    let [x, y, z] = [idx[0] * 2, idx[1] * 2, idx[2] * 2];
    [
        [x, y, z],
        [x + 1, y, z],
        [x, y + 1, z],
        [x + 1, y + 1, z],
        [x, y, z + 1],
        [x + 1, y, z + 1],
        [x, y + 1, z + 1],
        [x + 1, y + 1, z + 1],
    ]
}

impl TypeMask {
    /// All positive (type-presence) flags, excluding `ASSIGNED`.
    fn positive() -> TypeMask {
        TypeMask::ATOM
            | TypeMask::EXCLUDED
            | TypeMask::SMALL_CORE
            | TypeMask::SMALL_SHELL
            | TypeMask::LARGE_CORE
            | TypeMask::LARGE_SHELL
            | TypeMask::VOID
    }
}
