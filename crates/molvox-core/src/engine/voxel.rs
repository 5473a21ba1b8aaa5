/// Classification of one voxel region.
///
/// `Excluded` is a transient state between the atom/core phase and the
/// shell/void phase: the voxel is known not to admit a probe center but has not
/// yet been resolved into shell or inaccessible void. No `Excluded` (or
/// `Unassigned`) voxel survives a completed calculation.
///
/// In single-probe mode only the `Small*` variants are produced; the `Large*`
/// variants appear in two-probe mode, where the large probe defines the
/// bulk-accessible region and the small probe explores its inaccessible
/// interior.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum VoxelType {
    Unassigned,
    /// Inside an atom's van der Waals sphere.
    Atom,
    /// Probe-center-excluded, pending shell/void resolution.
    Excluded,
    /// Reachable by the (small) probe center.
    SmallCore,
    /// Within one small-probe radius of a `SmallCore` voxel.
    SmallShell,
    /// Reachable by the large probe center (two-probe mode).
    LargeCore,
    /// Within one large-probe radius of a `LargeCore` voxel (two-probe mode).
    LargeShell,
    /// Not reachable by any configured probe.
    InaccessibleVoid,
}

/// Bit-set summary of the voxel types present in a subtree.
///
/// Leaves carry the single bit of their type plus `ASSIGNED`; a subdivided
/// voxel carries the union of its children's positive flags, with `ASSIGNED`
/// set only once all eight children are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeMask(u8);

impl TypeMask {
    pub const EMPTY: TypeMask = TypeMask(0);
    pub const ASSIGNED: TypeMask = TypeMask(1);
    pub const ATOM: TypeMask = TypeMask(1 << 1);
    pub const EXCLUDED: TypeMask = TypeMask(1 << 2);
    pub const SMALL_CORE: TypeMask = TypeMask(1 << 3);
    pub const SMALL_SHELL: TypeMask = TypeMask(1 << 4);
    pub const LARGE_CORE: TypeMask = TypeMask(1 << 5);
    pub const LARGE_SHELL: TypeMask = TypeMask(1 << 6);
    pub const VOID: TypeMask = TypeMask(1 << 7);

    /// The positive flag for a voxel type; `Unassigned` maps to the empty mask.
    pub fn of(kind: VoxelType) -> TypeMask {
        match kind {
            VoxelType::Unassigned => TypeMask::EMPTY,
            VoxelType::Atom => TypeMask::ATOM,
            VoxelType::Excluded => TypeMask::EXCLUDED,
            VoxelType::SmallCore => TypeMask::SMALL_CORE,
            VoxelType::SmallShell => TypeMask::SMALL_SHELL,
            VoxelType::LargeCore => TypeMask::LARGE_CORE,
            VoxelType::LargeShell => TypeMask::LARGE_SHELL,
            VoxelType::InaccessibleVoid => TypeMask::VOID,
        }
    }

    #[inline]
    pub fn contains(self, other: TypeMask) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn intersects(self, other: TypeMask) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn is_assigned(self) -> bool {
        self.contains(TypeMask::ASSIGNED)
    }
}

impl std::ops::BitOr for TypeMask {
    type Output = TypeMask;
    #[inline]
    fn bitor(self, rhs: TypeMask) -> TypeMask {
        TypeMask(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for TypeMask {
    #[inline]
    fn bitor_assign(&mut self, rhs: TypeMask) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for TypeMask {
    type Output = TypeMask;
    #[inline]
    fn bitand(self, rhs: TypeMask) -> TypeMask {
        TypeMask(self.0 & rhs.0)
    }
}

/// One octree cell.
///
/// A voxel is either a resolved leaf (`has_children == false`, `kind` holds its
/// type) or a split parent (`has_children == true`, `kind` is `Unassigned` and
/// `mask` summarizes the subtree). `cavity_id` is 0 for non-cavity voxels,
/// 1–254 for labeled components; 255 is reserved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voxel {
    pub kind: VoxelType,
    pub mask: TypeMask,
    pub has_children: bool,
    pub cavity_id: u8,
}

impl Default for Voxel {
    fn default() -> Self {
        Self {
            kind: VoxelType::Unassigned,
            mask: TypeMask::EMPTY,
            has_children: false,
            cavity_id: 0,
        }
    }
}

impl Voxel {
    /// Assigns a leaf type, keeping the mask in sync.
    #[inline]
    pub fn assign(&mut self, kind: VoxelType) {
        self.kind = kind;
        self.mask = TypeMask::of(kind) | TypeMask::ASSIGNED;
    }

    /// `true` for a resolved leaf (assigned, not split).
    #[inline]
    pub fn is_leaf(&self) -> bool {
        !self.has_children && self.kind != VoxelType::Unassigned
    }
}
