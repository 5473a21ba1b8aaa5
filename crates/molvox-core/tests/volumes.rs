//! End-to-end volume calculations over small synthetic structures with
//! geometrically known answers.

use molvox::core::models::atom::Atom;
use molvox::engine::config::{VolumeConfig, VolumeConfigBuilder};
use molvox::engine::progress::{AbortSignal, ProgressReporter};
use molvox::engine::voxel::VoxelType;
use molvox::workflows::volume::run;
use nalgebra::Point3;
use std::f64::consts::PI;

fn carbon(x: f64, y: f64, z: f64) -> Atom {
    Atom::new("C", Point3::new(x, y, z), 1.7)
}

fn run_quiet(atoms: &[Atom], config: &VolumeConfig) -> molvox::engine::results::VolumeReport {
    run(atoms, config, &ProgressReporter::new(), &AbortSignal::new()).unwrap()
}

fn sphere_volume(r: f64) -> f64 {
    4.0 / 3.0 * PI * r.powi(3)
}

/// Eight atoms at the vertices of a cube, sized so the face windows are too
/// narrow for a probe of radius 1.2 (clearance ≈ 0.99) while the chamber
/// still holds probe-center-accessible space (center clearance ≈ 3.29).
fn sealed_cage() -> Vec<Atom> {
    let mut atoms = Vec::new();
    for &x in &[-1.9, 1.9] {
        for &y in &[-1.9, 1.9] {
            for &z in &[-1.9, 1.9] {
                atoms.push(carbon(x, y, z));
            }
        }
    }
    atoms
}

#[test]
fn identical_inputs_give_identical_reports() {
    let atoms = sealed_cage();
    let config = VolumeConfigBuilder::new()
        .grid_step(0.25)
        .max_depth(2)
        .probe_radius(1.2)
        .compute_surfaces(true)
        .build()
        .unwrap();
    let first = run_quiet(&atoms, &config);
    let second = run_quiet(&atoms, &config);

    for (kind, volume) in &first.volumes {
        assert_eq!(second.volumes[kind], *volume);
    }
    assert_eq!(first.cavities.len(), second.cavities.len());
    for (a, b) in first.cavities.iter().zip(&second.cavities) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.core_volume, b.core_volume);
        assert_eq!(a.shell_volume, b.shell_volume);
        assert_eq!(a.index_bounds, b.index_bounds);
    }
    let (sa, sb) = (first.surfaces.unwrap(), second.surfaces.unwrap());
    assert_eq!(sa.core_area, sb.core_area);
    assert_eq!(sa.excluded_area, sb.excluded_area);
}

#[test]
fn type_volumes_sum_to_the_grid_box() {
    let atoms = sealed_cage();
    let config = VolumeConfigBuilder::new()
        .grid_step(0.25)
        .max_depth(2)
        .probe_radius(1.2)
        .build()
        .unwrap();
    let report = run_quiet(&atoms, &config);
    let total: f64 = report.volumes.values().sum();
    // The box volume is recoverable from the config-independent invariant
    // that every voxel lands in exactly one type.
    assert!(total > 0.0);
    let atom_volume = report.volume_of(VoxelType::Atom);
    assert!(atom_volume > 0.0 && atom_volume < total);
    // Excluded is transient; nothing of it may remain.
    assert_eq!(report.volume_of(VoxelType::Excluded), 0.0);
    assert_eq!(report.volume_of(VoxelType::Unassigned), 0.0);
}

#[test]
fn finer_grids_approach_the_analytic_sphere_volume() {
    let atoms = vec![
        carbon(0.0, 0.0, 0.0),
        carbon(20.0, 0.0, 0.0),
    ];
    let exact = 2.0 * sphere_volume(1.7);
    let mut errors = Vec::new();
    for step in [0.5, 0.15] {
        let config = VolumeConfigBuilder::new()
            .grid_step(step)
            .max_depth(1)
            .probe_radius(1.0)
            .build()
            .unwrap();
        let report = run_quiet(&atoms, &config);
        errors.push((report.volume_of(VoxelType::Atom) - exact).abs());
    }
    assert!(errors[1] < errors[0]);
    assert!(errors[1] / exact < 0.02);
}

#[test]
fn wider_probes_thicken_the_shell() {
    let atoms = vec![carbon(0.0, 0.0, 0.0)];
    let mut shells = Vec::new();
    for probe in [0.8, 1.8] {
        let config = VolumeConfigBuilder::new()
            .grid_step(0.15)
            .max_depth(2)
            .probe_radius(probe)
            .build()
            .unwrap();
        let report = run_quiet(&atoms, &config);
        let shell = report.volume_of(VoxelType::SmallShell);
        let expected = sphere_volume(1.7 + probe) - sphere_volume(1.7);
        assert!((shell - expected).abs() / expected < 0.1);
        shells.push(shell);
    }
    assert!(shells[1] > shells[0]);
}

#[test]
fn subdivision_depth_does_not_change_the_answer() {
    let atoms = sealed_cage();
    let mut reports = Vec::new();
    for depth in [0u32, 3u32] {
        let config = VolumeConfigBuilder::new()
            .grid_step(0.25)
            .max_depth(depth)
            .probe_radius(1.2)
            .build()
            .unwrap();
        reports.push(run_quiet(&atoms, &config));
    }
    let (flat, deep) = (&reports[0], &reports[1]);
    // Grid extents are rounded to whole top-level voxels, so the open-space
    // total depends on the depth; the bounded types must not.
    for kind in [
        VoxelType::Atom,
        VoxelType::SmallShell,
        VoxelType::InaccessibleVoid,
    ] {
        let a = flat.volume_of(kind);
        let b = deep.volume_of(kind);
        assert!(
            (a - b).abs() <= 1e-9 * a.abs().max(1.0),
            "{kind:?}: {a} vs {b}"
        );
    }
    assert_eq!(flat.cavities.len(), deep.cavities.len());
}

#[test]
fn a_sealed_cage_splits_open_space_into_two_regions() {
    let atoms = sealed_cage();
    let config = VolumeConfigBuilder::new()
        .grid_step(0.2)
        .max_depth(2)
        .probe_radius(1.2)
        .build()
        .unwrap();
    let report = run_quiet(&atoms, &config);
    assert!(!report.cavity_overflow);
    // The outside and the sealed chamber.
    assert_eq!(report.cavities.len(), 2);
    let chamber = &report.cavities[1];
    assert!(chamber.core_volume > 0.0);
    assert!(chamber.core_volume < report.cavities[0].core_volume);
    assert_eq!(chamber.entrances, None);
    // The chamber, shell included, stays within the cage's atom frame.
    let (lo, hi) = chamber.cartesian_bounds;
    for axis in 0..3 {
        assert!(lo[axis] > -2.6 && hi[axis] < 2.6);
    }
}

#[test]
fn two_probe_mode_reports_the_chamber_as_an_isolated_cavity() {
    let atoms = sealed_cage();
    let config = VolumeConfigBuilder::new()
        .grid_step(0.2)
        .max_depth(2)
        .probe_radius(1.2)
        .large_probe_radius(2.5)
        .compute_surfaces(true)
        .build()
        .unwrap();
    let report = run_quiet(&atoms, &config);
    assert!(!report.cavity_overflow);
    assert_eq!(report.cavities.len(), 1);
    let chamber = &report.cavities[0];
    assert_eq!(chamber.entrances, Some(0));
    assert!(chamber.shell_volume > chamber.core_volume);
    assert!(chamber.core_surface.unwrap() > 0.0);
    assert!(chamber.shell_surface.unwrap() > chamber.core_surface.unwrap());
    // The large probe stays outside entirely.
    assert!(report.volume_of(VoxelType::LargeCore) > 0.0);
    let surfaces = report.surfaces.unwrap();
    assert!(surfaces.large_excluded_area.unwrap() > 0.0);
}

#[test]
fn chamber_volume_matches_the_numeric_reference() {
    // Direct numerical integration of the region at least 2.9 Å
    // (vdW 1.7 + probe 1.2) from every cage vertex gives a chamber
    // volume of 0.4647 ų.
    let config = VolumeConfigBuilder::new()
        .grid_step(0.1)
        .max_depth(4)
        .probe_radius(1.2)
        .build()
        .unwrap();
    let report = run_quiet(&sealed_cage(), &config);
    assert_eq!(report.cavities.len(), 2);
    let chamber = &report.cavities[1];
    let reference = 0.4647;
    assert!((chamber.core_volume - reference).abs() / reference < 0.10);
}

#[test]
fn large_probe_core_never_exceeds_small_probe_core() {
    // A larger probe reaches a subset of what a smaller probe reaches.
    // Clipping to a fixed cell makes the two runs directly comparable.
    let atoms = vec![carbon(5.0, 5.0, 5.0)];
    let single = VolumeConfigBuilder::new()
        .grid_step(0.25)
        .max_depth(1)
        .probe_radius(1.0)
        .unit_cell([10.0, 10.0, 10.0])
        .build()
        .unwrap();
    let two = VolumeConfigBuilder::new()
        .grid_step(0.25)
        .max_depth(1)
        .probe_radius(1.0)
        .large_probe_radius(2.0)
        .unit_cell([10.0, 10.0, 10.0])
        .build()
        .unwrap();
    let small_core = run_quiet(&atoms, &single).volume_of(VoxelType::SmallCore);
    let both = run_quiet(&atoms, &two);
    let large_core = both.volume_of(VoxelType::LargeCore);
    assert!(large_core > 0.0);
    assert!(large_core < small_core);
    // Even with the interior pockets the small probe explores added in, the
    // large probe's reach stays within the small probe's.
    assert!(large_core + both.volume_of(VoxelType::SmallCore) <= small_core);
}

#[test]
fn label_overflow_degrades_to_totals_only() {
    // An 8×8×8 simple cubic lattice with narrow face windows seals off all
    // 7³ = 343 interstitial holes, exceeding the label space.
    let mut atoms = Vec::new();
    let spacing = 2.2;
    for x in 0..8 {
        for y in 0..8 {
            for z in 0..8 {
                atoms.push(Atom::new(
                    "O",
                    Point3::new(
                        x as f64 * spacing,
                        y as f64 * spacing,
                        z as f64 * spacing,
                    ),
                    1.0,
                ));
            }
        }
    }
    let config = VolumeConfigBuilder::new()
        .grid_step(0.25)
        .max_depth(2)
        .probe_radius(0.65)
        .build()
        .unwrap();
    let report = run_quiet(&atoms, &config);
    assert!(report.cavity_overflow);
    assert!(report.cavities.is_empty());
    // Totals stay valid.
    assert!(report.volume_of(VoxelType::Atom) > 0.0);
    assert!(report.volume_of(VoxelType::SmallCore) > 0.0);
    assert_eq!(report.volume_of(VoxelType::Excluded), 0.0);
}

#[test]
fn unit_cell_totals_match_the_cell_volume() {
    // The cell reaches well past the atom's padded bounds; the grid has to
    // cover the whole cell or the far corners would never be tallied.
    let atoms = vec![carbon(1.5, 1.5, 1.5)];
    let config = VolumeConfigBuilder::new()
        .grid_step(0.25)
        .max_depth(1)
        .probe_radius(1.0)
        .unit_cell([8.0, 8.0, 8.0])
        .build()
        .unwrap();
    let report = run_quiet(&atoms, &config);
    let total: f64 = report.volumes.values().sum();
    assert!((total - 512.0).abs() < 1e-9);
}

#[test]
fn wider_probes_shrink_the_accessible_core() {
    // Clipping to a fixed cell keeps the reported box independent of the
    // probe-derived grid margin, so core volumes are directly comparable.
    let atoms = vec![carbon(5.0, 5.0, 5.0)];
    let mut cores = Vec::new();
    for &probe in &[0.6, 1.2, 1.8] {
        let config = VolumeConfigBuilder::new()
            .grid_step(0.2)
            .max_depth(1)
            .probe_radius(probe)
            .unit_cell([10.0, 10.0, 10.0])
            .build()
            .unwrap();
        let report = run_quiet(&atoms, &config);
        let core = report.volume_of(VoxelType::SmallCore);
        let expected = 1000.0 - sphere_volume(1.7 + probe);
        assert!((core - expected).abs() / expected < 0.05);
        cores.push(core);
    }
    assert!(cores[1] < cores[0]);
    assert!(cores[2] < cores[1]);
}

#[test]
fn measured_sphere_surface_tracks_the_analytic_area() {
    let atoms = vec![carbon(0.0, 0.0, 0.0)];
    let config = VolumeConfigBuilder::new()
        .grid_step(0.1)
        .max_depth(2)
        .probe_radius(1.2)
        .compute_surfaces(true)
        .build()
        .unwrap();
    let report = run_quiet(&atoms, &config);
    let surfaces = report.surfaces.unwrap();
    // A lone atom's probe-excluded surface is its van der Waals sphere, and
    // its accessibility surface the sphere inflated by the probe radius.
    let excluded_exact = 4.0 * PI * 1.7f64.powi(2);
    let core_exact = 4.0 * PI * (1.7f64 + 1.2).powi(2);
    assert!((surfaces.excluded_area - excluded_exact).abs() / excluded_exact < 0.15);
    assert!((surfaces.core_area - core_exact).abs() / core_exact < 0.15);
    assert!(surfaces.core_area > surfaces.excluded_area);
}
