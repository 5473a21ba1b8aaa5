//! The volume analysis workflow.
//!
//! # Overview
//!
//! Drives one complete calculation: validate the inputs, size the grid, run
//! the classification passes, label and resolve cavities, aggregate volumes,
//! and optionally measure surfaces. In single-probe mode one probe pass covers
//! the whole grid; in two-probe mode the large probe maps the reachable
//! outside first and the small probe then explores only the regions the large
//! probe could not enter.

use crate::core::models::atom::Atom;
use crate::core::spatial::bounds::BoundingBox;
use crate::engine::config::VolumeConfig;
use crate::engine::context::{ClassificationContext, ProbePass};
use crate::engine::error::EngineError;
use crate::engine::grid::SpatialGrid;
use crate::engine::progress::{AbortSignal, Progress, ProgressReporter};
use crate::engine::results::{SurfaceReport, Timings, VolumeReport};
use crate::engine::surface::SurfaceLut;
use crate::engine::tasks::aggregate::aggregate;
use crate::engine::tasks::cavities::{
    count_entrances, label_cores, propagate_to_shells, CavityLabeling,
};
use crate::engine::tasks::classify::{classify_grid, reclassify_voids};
use crate::engine::tasks::shell::classify_shells;
use crate::engine::tasks::surface_area;
use crate::engine::voxel::{Voxel, VoxelType};
use nalgebra::Point3;
use std::time::Instant;
use tracing::{info, instrument};

/// Runs one volume calculation over `atoms`.
///
/// Progress events go to `reporter`; `abort` is polled between grid slices
/// and a positive answer surfaces as [`EngineError::Aborted`]. The inputs are
/// read-only, so independent calculations can run concurrently.
#[instrument(skip_all, name = "volume_workflow")]
pub fn run(
    atoms: &[Atom],
    config: &VolumeConfig,
    reporter: &ProgressReporter,
    abort: &AbortSignal,
) -> Result<VolumeReport, EngineError> {
    validate(atoms, config)?;
    let started = Instant::now();
    let mut timings = Timings::default();

    let mut bounds = BoundingBox::from_atoms(atoms).ok_or(EngineError::EmptyAtomList)?;
    if let Some(cell) = config.unit_cell {
        // Totals are clipped to the cell, so the grid must cover all of it,
        // not just the padded atom bounds.
        bounds = bounds.union(&BoundingBox {
            min: Point3::origin(),
            max: Point3::new(cell[0], cell[1], cell[2]),
        });
    }
    let margin = config.widest_probe_radius() + 2.0 * config.grid_step;
    let mut grid = SpatialGrid::new(&bounds, config.grid_step, config.max_depth, margin);
    info!(
        dims = ?grid.dims(0),
        step = config.grid_step,
        max_depth = config.max_depth,
        "voxel grid initialized"
    );

    let ctx = ClassificationContext::new(atoms, reporter, abort);
    let small = ProbePass::small(config.probe_radius, config.grid_step, config.max_depth);

    // Classification: one pass per probe, coarse to fine.
    reporter.report(Progress::PhaseStart {
        name: "classification",
    });
    let clock = Instant::now();
    if let Some(large_radius) = config.large_probe_radius {
        let large = ProbePass::large(large_radius, config.grid_step, config.max_depth);
        classify_grid(&mut grid, &ctx, &large)?;
        classify_shells(&mut grid, &ctx, &large)?;
        reclassify_voids(&mut grid, &ctx, &small)?;
    } else {
        classify_grid(&mut grid, &ctx, &small)?;
    }
    timings.classification = clock.elapsed();
    reporter.report(Progress::PhaseFinish);

    // Connected-region labeling over the small-probe core.
    reporter.report(Progress::PhaseStart {
        name: "cavity labeling",
    });
    let clock = Instant::now();
    let labeling = label_cores(&mut grid, &ctx, &small)?;
    timings.cavity_labeling = clock.elapsed();
    reporter.report(Progress::PhaseFinish);
    if labeling.overflow {
        info!("cavity label space exhausted; reporting totals only");
    } else {
        info!(regions = labeling.count, "core regions labeled");
    }

    // Shell resolution for the small probe, then label propagation.
    reporter.report(Progress::PhaseStart {
        name: "shell classification",
    });
    let clock = Instant::now();
    classify_shells(&mut grid, &ctx, &small)?;
    timings.shell_classification = clock.elapsed();
    if !labeling.overflow {
        propagate_to_shells(&mut grid, &small);
    }
    reporter.report(Progress::PhaseFinish);

    // Volume totals and per-cavity records.
    reporter.report(Progress::PhaseStart {
        name: "aggregation",
    });
    let clock = Instant::now();
    let mut output = aggregate(&grid, config, &labeling);
    if config.two_probe_mode() {
        for cavity in &mut output.cavities {
            cavity.entrances = Some(count_entrances(&grid, cavity.id));
        }
    }
    timings.aggregation = clock.elapsed();
    reporter.report(Progress::PhaseFinish);

    let surfaces = if config.compute_surfaces {
        reporter.report(Progress::PhaseStart {
            name: "surface measurement",
        });
        let clock = Instant::now();
        let report = measure_surfaces(&grid, config, &labeling, &mut output.cavities);
        timings.surface = Some(clock.elapsed());
        reporter.report(Progress::PhaseFinish);
        Some(report)
    } else {
        None
    };

    timings.total = started.elapsed();
    info!(
        cavities = output.cavities.len(),
        elapsed_ms = timings.total.as_millis() as u64,
        "volume calculation finished"
    );
    Ok(VolumeReport {
        volumes: output.volumes,
        cavities: output.cavities,
        cavity_overflow: labeling.overflow,
        surfaces,
        timings,
    })
}

fn validate(atoms: &[Atom], config: &VolumeConfig) -> Result<(), EngineError> {
    if atoms.is_empty() {
        return Err(EngineError::EmptyAtomList);
    }
    for (index, atom) in atoms.iter().enumerate() {
        if !atom.has_valid_radius() {
            return Err(EngineError::InvalidAtomRadius {
                index,
                symbol: atom.symbol.clone(),
            });
        }
    }
    if config.grid_step <= 0.0 {
        return Err(EngineError::NonPositiveGridStep {
            value: config.grid_step,
        });
    }
    if config.probe_radius < 0.0 {
        return Err(EngineError::NegativeProbeRadius {
            value: config.probe_radius,
        });
    }
    if let Some(large) = config.large_probe_radius {
        if large < config.probe_radius {
            return Err(EngineError::ProbeOrdering {
                small: config.probe_radius,
                large,
            });
        }
    }
    if let Some(cell) = config.unit_cell {
        if cell.iter().any(|&c| c <= 0.0) {
            return Err(EngineError::InvalidUnitCell(cell));
        }
    }
    Ok(())
}

fn measure_surfaces(
    grid: &SpatialGrid,
    config: &VolumeConfig,
    labeling: &CavityLabeling,
    cavities: &mut [crate::engine::results::CavityRegion],
) -> SurfaceReport {
    let lut = SurfaceLut::new();
    // Each area is measured over the bounded side of its boundary; core-type
    // regions reach the grid edge, where the window scan would add a spurious
    // box cap, so their surfaces are taken from the complements instead.
    let core_area = surface_area::measure(grid, &lut, &|v: &Voxel| {
        !matches!(v.kind, VoxelType::SmallCore | VoxelType::LargeCore)
    });
    let excluded_area = surface_area::measure(grid, &lut, &|v: &Voxel| {
        matches!(v.kind, VoxelType::Atom | VoxelType::InaccessibleVoid)
    });
    let (large_core_area, large_excluded_area) = if config.two_probe_mode() {
        let core = surface_area::measure(grid, &lut, &|v: &Voxel| {
            v.kind != VoxelType::LargeCore
        });
        let excluded = surface_area::measure(grid, &lut, &|v: &Voxel| {
            !matches!(v.kind, VoxelType::LargeCore | VoxelType::LargeShell)
        });
        (Some(core), Some(excluded))
    } else {
        (None, None)
    };

    if !labeling.overflow {
        for cavity in cavities {
            let id = cavity.id;
            cavity.core_surface = Some(surface_area::measure(grid, &lut, &|v: &Voxel| {
                v.kind == VoxelType::SmallCore && v.cavity_id == id
            }));
            cavity.shell_surface = Some(surface_area::measure(grid, &lut, &|v: &Voxel| {
                matches!(v.kind, VoxelType::SmallCore | VoxelType::SmallShell)
                    && v.cavity_id == id
            }));
        }
    }

    SurfaceReport {
        core_area,
        excluded_area,
        large_core_area,
        large_excluded_area,
    }
}
