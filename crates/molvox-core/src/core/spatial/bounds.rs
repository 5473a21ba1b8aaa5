use crate::core::models::atom::Atom;
use nalgebra::Point3;

/// An axis-aligned bounding box in cartesian space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    /// Computes the tight bounding box over the atom *spheres* (position ± radius).
    ///
    /// Returns `None` for an empty atom list.
    pub fn from_atoms(atoms: &[Atom]) -> Option<Self> {
        let first = atoms.first()?;
        let mut min = first.position - nalgebra::Vector3::repeat(first.radius);
        let mut max = first.position + nalgebra::Vector3::repeat(first.radius);
        for atom in &atoms[1..] {
            for axis in 0..3 {
                min[axis] = min[axis].min(atom.position[axis] - atom.radius);
                max[axis] = max[axis].max(atom.position[axis] + atom.radius);
            }
        }
        Some(Self { min, max })
    }

    /// Returns the box grown by `margin` on every side.
    pub fn padded(&self, margin: f64) -> Self {
        Self {
            min: self.min - nalgebra::Vector3::repeat(margin),
            max: self.max + nalgebra::Vector3::repeat(margin),
        }
    }

    /// Returns the smallest box covering both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        let mut min = self.min;
        let mut max = self.max;
        for axis in 0..3 {
            min[axis] = min[axis].min(other.min[axis]);
            max[axis] = max[axis].max(other.max[axis]);
        }
        Self { min, max }
    }

    /// Edge lengths along x, y, z.
    pub fn extent(&self) -> [f64; 3] {
        [
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        ]
    }
}
