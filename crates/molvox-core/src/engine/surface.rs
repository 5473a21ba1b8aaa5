//! Marching-cube surface-area lookup.
//!
//! A 2×2×2 block of bottom-level voxels is encoded as an 8-bit corner
//! configuration (bit `i` = corner at offset `(dx, dy, dz)` with
//! `i = dx + 2·dy + 4·dz`, set when the corner voxel belongs to the target
//! set). Each configuration reduces, under the 24 proper cube rotations plus
//! corner complementation, to one of 15 canonical classes. Complementary
//! configurations cut the block along the same interface; the two mirror-image
//! four-corner chains stay distinct (reflections are not in the group) but
//! share an area. Each class carries the area of its midpoint-interpolated
//! triangulation in units of (voxel edge)².

const SQRT_2: f64 = std::f64::consts::SQRT_2;
const SQRT_3: f64 = 1.7320508075688772;

/// Canonical class representatives and their unit-cell surface areas.
///
/// Ordered by corner count: empty, one corner, the three two-corner classes
/// (edge, face diagonal, body diagonal), the three three-corner classes, and
/// the seven four-corner classes (face, antipodal edge pair, the two
/// mirror-image chains, claw, face triple + opposite corner, tetrahedral).
const CLASS_REPRESENTATIVES: [(u8, f64); 15] = [
    (0x00, 0.0),
    (0x01, SQRT_3 / 8.0),
    (0x03, SQRT_2 / 2.0),
    (0x09, SQRT_3 / 4.0),
    (0x81, SQRT_3 / 4.0),
    (0x0B, 0.5 + SQRT_3 / 4.0 + SQRT_3 / 8.0),
    (0x43, SQRT_2 / 2.0 + SQRT_3 / 8.0),
    (0x29, 3.0 * SQRT_3 / 8.0),
    (0x0F, 1.0),
    (0xC3, SQRT_2),
    (0x8B, SQRT_2 / 2.0 + SQRT_3 / 2.0),
    (0x1B, SQRT_2 / 2.0 + SQRT_3 / 2.0),
    (0x17, 3.0 * SQRT_3 / 4.0),
    (0x87, 0.5 + SQRT_3 / 4.0 + 2.0 * SQRT_3 / 8.0),
    (0x69, SQRT_3 / 2.0),
];

#[derive(Debug, Clone, Copy)]
struct LutEntry {
    class: u8,
    area: f64,
}

/// The 256-entry configuration → (canonical class, area) table.
#[derive(Debug)]
pub struct SurfaceLut {
    entries: [LutEntry; 256],
}

impl Default for SurfaceLut {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceLut {
    /// Builds the table by reducing every configuration to its canonical class
    /// under the rotation group and complementation.
    pub fn new() -> Self {
        let rotations = cube_rotations();

        let mut rep_class = [None::<u8>; 256];
        for (class, (bits, _)) in CLASS_REPRESENTATIVES.iter().enumerate() {
            rep_class[*bits as usize] = Some(class as u8);
        }

        let mut entries = [LutEntry { class: 0, area: 0.0 }; 256];
        for config in 0..=255u8 {
            let class = rotations
                .iter()
                .find_map(|perm| {
                    let rotated = permute_corners(config, perm);
                    rep_class[rotated as usize]
                        .or_else(|| rep_class[(rotated ^ 0xFF) as usize])
                })
                .unwrap_or_else(|| {
                    // The 15 classes partition all 256 configurations; a miss
                    // means the representative table itself is corrupt.
                    unreachable!("configuration {config:#04x} matches no canonical class")
                });
            entries[config as usize] = LutEntry {
                class,
                area: CLASS_REPRESENTATIVES[class as usize].1,
            };
        }
        Self { entries }
    }

    /// The canonical class (0–14) of a corner configuration.
    #[inline]
    pub fn class_of(&self, config: u8) -> u8 {
        self.entries[config as usize].class
    }

    /// The surface area contribution of a corner configuration, in units of
    /// (voxel edge length)².
    #[inline]
    pub fn area(&self, config: u8) -> f64 {
        self.entries[config as usize].area
    }
}

/// Applies a corner permutation to a configuration byte.
fn permute_corners(config: u8, perm: &[usize; 8]) -> u8 {
    let mut out = 0u8;
    for (from, &to) in perm.iter().enumerate() {
        if config & (1 << from) != 0 {
            out |= 1 << to;
        }
    }
    out
}

/// Generates the 24 rotations of the cube as corner permutations.
fn cube_rotations() -> Vec<[usize; 8]> {
    // Quarter turns about the x and z axes generate the full rotation group.
    let mut rot_x = [0usize; 8];
    let mut rot_z = [0usize; 8];
    for i in 0..8 {
        let (x, y, z) = (i & 1, (i >> 1) & 1, (i >> 2) & 1);
        rot_x[i] = x + 2 * (1 - z) + 4 * y;
        rot_z[i] = (1 - y) + 2 * x + 4 * z;
    }

    let identity: [usize; 8] = [0, 1, 2, 3, 4, 5, 6, 7];
    let mut rotations = vec![identity];
    let mut frontier = vec![identity];
    while let Some(current) = frontier.pop() {
        for generator in [&rot_x, &rot_z] {
            let mut next = [0usize; 8];
            for i in 0..8 {
                next[i] = generator[current[i]];
            }
            if !rotations.contains(&next) {
                rotations.push(next);
                frontier.push(next);
            }
        }
    }
    debug_assert_eq!(rotations.len(), 24);
    rotations
}
