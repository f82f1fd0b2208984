// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Solver Stack
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Nested iteration for multigroup SN problems.
//!
//! Within-group (source iteration or GMRES, optional DSA) inside
//! Gauss-Seidel over groups inside power iteration on `k`.

pub mod diffusion;
pub mod dsa;
pub mod eigen;
pub mod manager;
pub mod multigroup;
pub mod wg;
