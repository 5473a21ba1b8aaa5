use phf::{Map, phf_map};

/// Built-in element data: symbol → (atomic number, van der Waals radius in Å).
///
/// Radii follow Bondi (1964) with the Mantina et al. (2009) extensions for the
/// main-group elements Bondi left out. Metals without an established van der
/// Waals radius are listed with commonly used crystallographic compromises so
/// that typical inorganic frameworks resolve without caller-side tables.
static ELEMENTS: Map<&'static str, (u8, f64)> = phf_map! {
    "H" => (1, 1.20),
    "He" => (2, 1.40),
    "Li" => (3, 1.82),
    "Be" => (4, 1.53),
    "B" => (5, 1.92),
    "C" => (6, 1.70),
    "N" => (7, 1.55),
    "O" => (8, 1.52),
    "F" => (9, 1.47),
    "Ne" => (10, 1.54),
    "Na" => (11, 2.27),
    "Mg" => (12, 1.73),
    "Al" => (13, 1.84),
    "Si" => (14, 2.10),
    "P" => (15, 1.80),
    "S" => (16, 1.80),
    "Cl" => (17, 1.75),
    "Ar" => (18, 1.88),
    "K" => (19, 2.75),
    "Ca" => (20, 2.31),
    "Ti" => (22, 2.15),
    "Cr" => (24, 2.05),
    "Mn" => (25, 2.05),
    "Fe" => (26, 2.04),
    "Co" => (27, 2.00),
    "Ni" => (28, 1.97),
    "Cu" => (29, 1.96),
    "Zn" => (30, 2.01),
    "Ga" => (31, 1.87),
    "Ge" => (32, 2.11),
    "As" => (33, 1.85),
    "Se" => (34, 1.90),
    "Br" => (35, 1.85),
    "Kr" => (36, 2.02),
    "Rb" => (37, 3.03),
    "Sr" => (38, 2.49),
    "Zr" => (40, 2.23),
    "Mo" => (42, 2.11),
    "Ru" => (44, 2.05),
    "Rh" => (45, 2.00),
    "Pd" => (46, 2.05),
    "Ag" => (47, 2.11),
    "Cd" => (48, 2.18),
    "In" => (49, 1.93),
    "Sn" => (50, 2.17),
    "Sb" => (51, 2.06),
    "Te" => (52, 2.06),
    "I" => (53, 1.98),
    "Xe" => (54, 2.16),
    "Cs" => (55, 3.43),
    "Ba" => (56, 2.68),
    "W" => (74, 2.10),
    "Pt" => (78, 2.05),
    "Au" => (79, 2.10),
    "Hg" => (80, 2.23),
    "Tl" => (81, 1.96),
    "Pb" => (82, 2.02),
    "Bi" => (83, 2.07),
    "U" => (92, 2.40),
};

/// Looks up the van der Waals radius (Å) for an element symbol.
pub fn vdw_radius(symbol: &str) -> Option<f64> {
    ELEMENTS.get(symbol).map(|&(_, r)| r)
}

/// Looks up the atomic number for an element symbol.
pub fn atomic_number(symbol: &str) -> Option<u8> {
    ELEMENTS.get(symbol).map(|&(z, _)| z)
}

/// Fills in the radius of every atom currently carrying the invalid sentinel
/// from the built-in table.
///
/// # Return
///
/// Returns the indices of the atoms whose symbol is unknown to the table and
/// whose radius therefore remains unresolved.
pub fn assign_missing_radii(atoms: &mut [super::atom::Atom]) -> Vec<usize> {
    let mut unresolved = Vec::new();
    for (i, atom) in atoms.iter_mut().enumerate() {
        if !atom.has_valid_radius() {
            match vdw_radius(&atom.symbol) {
                Some(radius) => atom.radius = radius,
                None => unresolved.push(i),
            }
        }
    }
    unresolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::{Atom, INVALID_RADIUS};
    use nalgebra::Point3;

    #[test]
    fn common_organic_elements_are_present() {
        assert_eq!(vdw_radius("H"), Some(1.20));
        assert_eq!(vdw_radius("C"), Some(1.70));
        assert_eq!(vdw_radius("N"), Some(1.55));
        assert_eq!(vdw_radius("O"), Some(1.52));
        assert_eq!(atomic_number("S"), Some(16));
    }

    #[test]
    fn unknown_symbol_yields_none() {
        assert_eq!(vdw_radius("Qq"), None);
        assert_eq!(atomic_number(""), None);
    }

    #[test]
    fn assign_missing_radii_fills_sentinels_and_reports_unknowns() {
        let mut atoms = vec![
            Atom::new("C", Point3::origin(), 1.7),
            Atom::new("O", Point3::origin(), INVALID_RADIUS),
            Atom::new("Qq", Point3::origin(), INVALID_RADIUS),
        ];
        let unresolved = assign_missing_radii(&mut atoms);
        assert_eq!(unresolved, vec![2]);
        assert!((atoms[1].radius - 1.52).abs() < 1e-12);
        assert_eq!(atoms[0].radius, 1.7);
        assert!(!atoms[2].has_valid_radius());
    }
}
