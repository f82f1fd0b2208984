// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Transport Math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Sparse linear algebra kernel for the SCPN transport solver.

pub mod gauss_seidel;
pub mod gmres;
pub mod jacobi;
pub mod matrix;
pub mod monitor;
pub mod operator;
pub mod solver;
pub mod vector;
