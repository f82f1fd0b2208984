// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Maximum spatial dimension of the Cartesian mesh.
pub const MAX_DIMENSION: usize = 3;

/// Number of boundary sides of a 3D box.
pub const MAX_SIDES: usize = 2 * MAX_DIMENSION;

/// Side names in side-index order: `2*axis + {0 low, 1 high}`.
pub const SIDE_NAMES: [&str; MAX_SIDES] = ["west", "east", "south", "north", "bottom", "top"];

/// Magnitudes below this are treated as exact zeros in divisions.
pub const TINY: f64 = 1e-300;

/// Fraction of an isotropic angular flux crossing a surface as partial
/// current (∫ over a hemisphere of |μ| dΩ / 4π).
pub const PARTIAL_CURRENT_FACTOR: f64 = 0.25;

/// Side index for `axis` on the low (`false`) or high (`true`) face.
#[inline]
pub fn side_index(axis: usize, high: bool) -> usize {
    2 * axis + usize::from(high)
}

/// Axis normal to a side.
#[inline]
pub fn side_axis(side: usize) -> usize {
    side / 2
}
