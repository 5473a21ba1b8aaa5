use super::elements;
use nalgebra::Point3;

/// Sentinel radius marking an atom whose van der Waals radius could not be resolved.
///
/// Atoms carrying this value are rejected by the workflow before any grid is built;
/// the core classification code never sees it.
pub const INVALID_RADIUS: f64 = -1.0;

/// Represents an atom of the structure under analysis.
///
/// This struct carries everything the classification engine reads about an atom:
/// its element symbol, cartesian position, and van der Waals radius. The atomic
/// number and partial charge are passed through for callers (report writers,
/// front ends) and are not used by the engine itself. Atoms are immutable once a
/// calculation starts.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Atom {
    /// The element symbol (e.g., "C", "O", "Zn").
    pub symbol: String,
    /// The 3D coordinates of the atom in Angstroms.
    #[serde(with = "point3_serde")]
    pub position: Point3<f64>,
    /// The van der Waals radius in Angstroms (≥ 0 valid, [`INVALID_RADIUS`] otherwise).
    pub radius: f64,
    /// The atomic number, 0 if unknown.
    pub atomic_number: u8,
    /// The partial charge in elementary charge units.
    pub charge: f64,
}

impl Atom {
    /// Creates a new `Atom` with an explicit van der Waals radius.
    ///
    /// The atomic number is resolved from the built-in element table when the
    /// symbol is known, and the charge defaults to zero.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The element symbol.
    /// * `position` - The 3D coordinates of the atom in Angstroms.
    /// * `radius` - The van der Waals radius in Angstroms.
    pub fn new(symbol: &str, position: Point3<f64>, radius: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            position,
            radius,
            atomic_number: elements::atomic_number(symbol).unwrap_or(0),
            charge: 0.0,
        }
    }

    /// Creates a new `Atom` with the radius looked up in the built-in element table.
    ///
    /// Returns `None` if the element symbol is not present in the table; callers
    /// that want to proceed anyway can construct the atom with [`INVALID_RADIUS`]
    /// and let validation report it.
    pub fn from_element(symbol: &str, position: Point3<f64>) -> Option<Self> {
        let radius = elements::vdw_radius(symbol)?;
        Some(Self::new(symbol, position, radius))
    }

    /// Returns `true` if this atom carries a usable van der Waals radius.
    pub fn has_valid_radius(&self) -> bool {
        self.radius >= 0.0
    }
}

mod point3_serde {
    use nalgebra::Point3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(p: &Point3<f64>, s: S) -> Result<S::Ok, S::Error> {
        [p.x, p.y, p.z].serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Point3<f64>, D::Error> {
        let [x, y, z] = <[f64; 3]>::deserialize(d)?;
        Ok(Point3::new(x, y, z))
    }
}
