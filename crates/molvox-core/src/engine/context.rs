use crate::core::models::atom::Atom;
use crate::core::spatial::tree::AtomTree;
use crate::engine::progress::{AbortSignal, ProgressReporter};
use crate::engine::search::SearchIndexTable;
use crate::engine::voxel::{TypeMask, VoxelType};

/// Shared, read-only state threaded through every classification task.
///
/// All per-run inputs travel through this struct instead of globals, so
/// concurrent runs over different structures never interfere.
pub struct ClassificationContext<'a> {
    pub atoms: &'a [Atom],
    pub tree: AtomTree<'a>,
    pub reporter: &'a ProgressReporter<'a>,
    pub abort: &'a AbortSignal<'a>,
}

impl<'a> ClassificationContext<'a> {
    pub fn new(
        atoms: &'a [Atom],
        reporter: &'a ProgressReporter<'a>,
        abort: &'a AbortSignal<'a>,
    ) -> Self {
        Self {
            atoms,
            tree: AtomTree::build(atoms),
            reporter,
            abort,
        }
    }
}

/// Everything one probe pass needs to know about itself: which probe it rolls
/// and which voxel types its accessible and shell regions map to.
pub struct ProbePass {
    pub probe_radius: f64,
    pub core_type: VoxelType,
    pub shell_type: VoxelType,
    pub table: SearchIndexTable,
}

impl ProbePass {
    /// A pass with the small probe, producing `SmallCore` / `SmallShell`.
    pub fn small(probe_radius: f64, grid_step: f64, max_depth: u32) -> Self {
        Self {
            probe_radius,
            core_type: VoxelType::SmallCore,
            shell_type: VoxelType::SmallShell,
            table: SearchIndexTable::build(probe_radius, grid_step, max_depth),
        }
    }

    /// A pass with the large probe, producing `LargeCore` / `LargeShell`.
    pub fn large(probe_radius: f64, grid_step: f64, max_depth: u32) -> Self {
        Self {
            probe_radius,
            core_type: VoxelType::LargeCore,
            shell_type: VoxelType::LargeShell,
            table: SearchIndexTable::build(probe_radius, grid_step, max_depth),
        }
    }

    /// Mask flag corresponding to this pass's core type.
    pub fn core_mask(&self) -> TypeMask {
        TypeMask::of(self.core_type)
    }
}
