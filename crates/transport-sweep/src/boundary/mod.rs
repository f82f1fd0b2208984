// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Boundary Flux
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Boundary flux containers.
//!
//! A container holds incident and outgoing boundary values for every
//! group on every side of the mesh. Three layouts are provided:
//!
//! - [`sn::BoundarySn`]: angular flux per face of a regular grid,
//! - [`moc::BoundaryMoc`]: angular flux per track end,
//! - [`diffusion::BoundaryDiffusion`]: partial currents per face.
//!
//! Reflective incident values are the unknowns of a Krylov within-group
//! solve; `set_incident` and `get_incident` move them in and out of a flat
//! buffer of length [`Boundary::reflective_size`]. The buffer lists the
//! reflective sides in increasing order, each side in its own native
//! ordering.

pub mod diffusion;
pub mod moc;
pub mod sn;

use transport_types::config::{BoundaryCondition, BoundaryConditions};
use transport_types::constants::SIDE_NAMES;
use transport_types::error::{TransportError, TransportResult};

pub use diffusion::BoundaryDiffusion;
pub use moc::{BoundaryMoc, TrackLayout};
pub use sn::BoundarySn;

pub trait Boundary {
    fn number_sides(&self) -> usize;

    fn is_reflective(&self, side: usize) -> bool;

    fn has_reflective(&self) -> bool {
        (0..self.number_sides()).any(|s| self.is_reflective(s))
    }

    /// Number of incident values stored for one group on `side`.
    fn boundary_flux_size(&self, side: usize) -> usize;

    /// Length of the buffer exchanged by `set_incident`/`get_incident`.
    fn reflective_size(&self) -> usize {
        (0..self.number_sides())
            .filter(|&s| self.is_reflective(s))
            .map(|s| self.boundary_flux_size(s))
            .sum()
    }

    /// Impose vacuum and fixed incident values for group `g`.
    fn set(&mut self, g: usize);

    /// Copy outgoing values into the incident slots of reflective sides.
    fn update(&mut self, g: usize);

    /// As `update`, restricted to the values written by direction `(o, a)`.
    fn update_angle(&mut self, g: usize, o: usize, a: usize);

    /// Zero all values of group `g`.
    fn clear(&mut self, g: usize);

    fn set_incident(&mut self, g: usize, values: &[f64]) -> TransportResult<()>;

    fn get_incident(&self, g: usize, values: &mut [f64]) -> TransportResult<()>;
}

/// Conditions for the first `number_sides` sides, checked against the
/// group count.
pub(crate) fn side_conditions(
    conditions: &BoundaryConditions,
    number_sides: usize,
    number_groups: usize,
) -> TransportResult<Vec<BoundaryCondition>> {
    (0..number_sides)
        .map(|side| {
            let condition = conditions.side(side).clone();
            if let BoundaryCondition::Fixed(values) = &condition {
                if values.len() != number_groups {
                    return Err(TransportError::ConfigError(format!(
                        "bc_{} fixed flux has {} values for {} groups",
                        SIDE_NAMES[side],
                        values.len(),
                        number_groups
                    )));
                }
            }
            Ok(condition)
        })
        .collect()
}

pub(crate) fn check_incident_len(expected: usize, actual: usize) -> TransportResult<()> {
    if expected != actual {
        return Err(TransportError::mismatch("incident boundary buffer", expected, actual));
    }
    Ok(())
}

/// Octant `o` enters the mesh through `side` when it points away from that
/// side: low sides take octants moving in `+axis`, high sides `-axis`.
#[inline]
pub(crate) fn enters_through(side: usize, o: usize) -> bool {
    let negative = (o >> (side / 2)) & 1 == 1;
    negative == (side % 2 == 1)
}
