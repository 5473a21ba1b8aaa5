use crate::core::models::atom::Atom;
use nalgebra::Point3;
use std::cmp::Ordering;

/// The geometric relation of a cubic probe region (a point plus an influence
/// radius) to the atom set, as resolved by [`AtomTree::classify_region`].
///
/// Variants are ordered by increasing strength: when several atoms apply, the
/// strongest relation wins. `InsideAtom` is terminal — once any atom fully
/// contains the region, no other atom can change the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RegionClass {
    /// No atom reaches the region; it is free space for the probe center.
    Core,
    /// The region straddles some atom's probe-exclusion boundary (r + probe).
    CoreBoundary,
    /// The region lies fully inside some atom's probe-exclusion band: outside
    /// the atom itself, but too close for a probe center.
    Excluded,
    /// The region straddles some atom's van der Waals surface.
    AtomBoundary,
    /// The region lies fully inside an atom.
    InsideAtom,
}

/// Classifies a spherical influence region around `point` against one atom at
/// center distance `d` with van der Waals radius `r`.
fn classify_against(d: f64, r: f64, influence: f64, probe_radius: f64) -> RegionClass {
    if d + influence <= r {
        RegionClass::InsideAtom
    } else if d - influence < r {
        RegionClass::AtomBoundary
    } else if d + influence <= r + probe_radius {
        RegionClass::Excluded
    } else if d - influence < r + probe_radius {
        RegionClass::CoreBoundary
    } else {
        RegionClass::Core
    }
}

#[derive(Debug, Clone, Copy)]
struct Node {
    atom: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// A balanced k-d tree over an immutable atom slice.
///
/// The tree owns only indices; atom data stays in the caller's arena, so several
/// trees (or calculations) can coexist without shared mutable state. The split
/// axis cycles x→y→z with depth and each node holds the lower median of its
/// range, so for a node with axis `a` every left-subtree atom has
/// `position[a] ≤` the node's and every right-subtree atom `≥` it.
///
/// Built once per calculation in O(n log n) expected time (O(n²) worst case,
/// the usual quickselect trade-off).
pub struct AtomTree<'a> {
    atoms: &'a [Atom],
    nodes: Vec<Node>,
    root: Option<usize>,
    max_radius: f64,
}

impl<'a> AtomTree<'a> {
    /// Builds the tree over `atoms`. An empty slice yields an empty tree that
    /// classifies everything as [`RegionClass::Core`].
    pub fn build(atoms: &'a [Atom]) -> Self {
        let max_radius = atoms.iter().map(|a| a.radius).fold(0.0, f64::max);
        let mut nodes = Vec::with_capacity(atoms.len());
        let mut indices: Vec<usize> = (0..atoms.len()).collect();
        let root = Self::build_range(atoms, &mut nodes, &mut indices, 0);
        Self {
            atoms,
            nodes,
            root,
            max_radius,
        }
    }

    fn build_range(
        atoms: &[Atom],
        nodes: &mut Vec<Node>,
        range: &mut [usize],
        depth: usize,
    ) -> Option<usize> {
        if range.is_empty() {
            return None;
        }
        let axis = depth % 3;
        let mid = (range.len() - 1) / 2;
        range.select_nth_unstable_by(mid, |&a, &b| {
            atoms[a].position[axis]
                .partial_cmp(&atoms[b].position[axis])
                .unwrap_or(Ordering::Equal)
        });
        let atom = range[mid];
        let (left_range, rest) = range.split_at_mut(mid);
        let left = Self::build_range(atoms, nodes, left_range, depth + 1);
        let right = Self::build_range(atoms, nodes, &mut rest[1..], depth + 1);
        nodes.push(Node { atom, left, right });
        Some(nodes.len() - 1)
    }

    /// The largest van der Waals radius in the atom set (0 for an empty set).
    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// Classifies the cubic region of half-diagonal `influence` centered at
    /// `point` against the atom set, for a probe of radius `probe_radius`.
    ///
    /// Descends the tree with 1-D axis pruning: a subtree is skipped when the
    /// node's axis distance to the point exceeds
    /// `influence + max_radius + probe_radius`, since no atom beyond that can
    /// affect the region. Stops early once an atom fully contains the region.
    pub fn classify_region(
        &self,
        point: &Point3<f64>,
        influence: f64,
        probe_radius: f64,
    ) -> RegionClass {
        let mut strongest = RegionClass::Core;
        self.visit(self.root, 0, point, influence, probe_radius, &mut strongest);
        strongest
    }

    /// Returns `true` when a terminal conclusion was reached.
    fn visit(
        &self,
        node: Option<usize>,
        depth: usize,
        point: &Point3<f64>,
        influence: f64,
        probe_radius: f64,
        strongest: &mut RegionClass,
    ) -> bool {
        let Some(idx) = node else {
            return false;
        };
        let node = self.nodes[idx];
        let atom = &self.atoms[node.atom];

        let d = (atom.position - point).norm();
        let class = classify_against(d, atom.radius, influence, probe_radius);
        if class == RegionClass::InsideAtom {
            *strongest = RegionClass::InsideAtom;
            return true;
        }
        if class > *strongest {
            *strongest = class;
        }

        let axis = depth % 3;
        let t = point[axis] - atom.position[axis];
        let reach = influence + self.max_radius + probe_radius;
        // Left subtree holds coordinates ≤ the node's; beyond `reach` only the
        // near side can still influence the region.
        if t > reach {
            self.visit(node.right, depth + 1, point, influence, probe_radius, strongest)
        } else if t < -reach {
            self.visit(node.left, depth + 1, point, influence, probe_radius, strongest)
        } else {
            self.visit(node.left, depth + 1, point, influence, probe_radius, strongest)
                || self.visit(node.right, depth + 1, point, influence, probe_radius, strongest)
        }
    }
}
