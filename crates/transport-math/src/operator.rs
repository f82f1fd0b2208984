// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Operators
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Abstract linear operators and preconditioners.
//!
//! Krylov methods only need the action `y = A x`, so they are written
//! against [`LinearOperator`]. Matrix-free operators (for example a
//! transport sweep) take `&mut self` because applying them updates
//! internal work storage.

use crate::matrix::Matrix;

/// Square linear operator `y = A x`.
pub trait LinearOperator {
    fn number_rows(&self) -> usize;

    fn multiply(&mut self, x: &[f64], y: &mut [f64]);
}

/// Approximate inverse `x ≈ M⁻¹ b`.
pub trait Preconditioner {
    fn apply(&mut self, b: &[f64], x: &mut [f64]);
}

/// Diagonal (Jacobi) preconditioner.
#[derive(Debug, Clone)]
pub struct JacobiPreconditioner {
    inverse_diagonal: Vec<f64>,
}

impl JacobiPreconditioner {
    /// Zero diagonals fall back to the identity on that row.
    pub fn new(matrix: &Matrix) -> Self {
        let inverse_diagonal = matrix
            .diagonal_values()
            .into_iter()
            .map(|d| if d != 0.0 { 1.0 / d } else { 1.0 })
            .collect();
        JacobiPreconditioner { inverse_diagonal }
    }
}

impl Preconditioner for JacobiPreconditioner {
    fn apply(&mut self, b: &[f64], x: &mut [f64]) {
        for ((xi, &bi), &di) in x.iter_mut().zip(b).zip(&self.inverse_diagonal) {
            *xi = bi * di;
        }
    }
}
