// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Sources
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Isotropic volumetric sources seen by the sweep.
//!
//! The right-hand side of a within-group sweep is split in two parts:
//! a fixed part built once per group solve (in-scatter from other groups,
//! fission, external source), and the within-group scatter rebuilt every
//! inner iteration.

pub mod fission;
pub mod scatter;
pub mod sweep;

pub use fission::FissionSource;
pub use scatter::ScatterSource;
pub use sweep::SweepSource;
