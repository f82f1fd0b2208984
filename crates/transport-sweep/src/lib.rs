// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Transport Sweep
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Discretization layer: boundary flux containers, sweep sources and the
//! discrete-ordinates sweep.

pub mod boundary;
pub mod source;
pub mod sweeper;
