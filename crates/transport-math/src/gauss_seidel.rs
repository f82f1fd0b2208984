// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Gauss-Seidel
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Gauss-Seidel (and SOR) relaxation on a CSR matrix.
//!
//! Each sweep visits rows in order. Entries left of the diagonal use the
//! values already updated in this sweep; entries right of it use the
//! previous iterate:
//!
//! ```text
//! x_new[i] = (b[i] - Σ_{j<i} a_ij x_new[j] - Σ_{j>i} a_ij x_old[j]) / a_ii
//! ```
//!
//! With `ω ≠ 1` the update is relaxed as in the SOR kernel:
//! `x_new[i] = (1-ω) x_old[i] + ω x_gs[i]`.

use transport_types::error::{TransportError, TransportResult};

use crate::matrix::Matrix;
use crate::monitor::{LinearSolverConfig, Monitor, ResidualKind, SolveResult};
use crate::solver::LinearSolver;
use crate::vector::{norm, norm_difference};

#[derive(Debug, Clone)]
pub struct GaussSeidel {
    matrix: Matrix,
    inverse_diagonal: Vec<f64>,
    config: LinearSolverConfig,
    omega: f64,
}

impl GaussSeidel {
    /// Fails with `InvalidOperator` when any row lacks a usable diagonal.
    pub fn new(matrix: Matrix, config: LinearSolverConfig) -> TransportResult<Self> {
        if matrix.number_rows() != matrix.number_columns() {
            return Err(TransportError::mismatch(
                "Gauss-Seidel matrix columns",
                matrix.number_rows(),
                matrix.number_columns(),
            ));
        }
        matrix.require_diagonal()?;
        let inverse_diagonal = matrix.diagonal_values().iter().map(|d| 1.0 / d).collect();
        Ok(GaussSeidel {
            matrix,
            inverse_diagonal,
            config,
            omega: 1.0,
        })
    }

    /// Successive over-relaxation factor, `0 < ω < 2`.
    pub fn with_relaxation(mut self, omega: f64) -> TransportResult<Self> {
        if !(omega > 0.0 && omega < 2.0) {
            return Err(TransportError::ConfigError(format!(
                "relaxation factor must lie in (0, 2), got {omega}"
            )));
        }
        self.omega = omega;
        Ok(self)
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// One forward sweep from `x_old` into `x_new`.
    pub fn sweep(&self, b: &[f64], x_old: &[f64], x_new: &mut [f64]) {
        let a = &self.matrix;
        for i in 0..a.number_rows() {
            let mut sum = b[i];
            for p in a.start(i)..a.end(i) {
                let j = a.column(p);
                if j < i {
                    sum -= a.value(p) * x_new[j];
                } else if j > i {
                    sum -= a.value(p) * x_old[j];
                }
            }
            let gs = sum * self.inverse_diagonal[i];
            x_new[i] = (1.0 - self.omega) * x_old[i] + self.omega * gs;
        }
    }
}

impl LinearSolver for GaussSeidel {
    fn name(&self) -> &'static str {
        "gauss-seidel"
    }

    fn solve(&mut self, b: &[f64], x: &mut [f64]) -> SolveResult {
        let n = self.matrix.number_rows();
        let mut monitor = Monitor::new("gauss-seidel", &self.config);
        let mut work = vec![0.0; n];

        self.matrix.residual(b, x, &mut work);
        if monitor.init(norm(&work, self.config.norm)) {
            return monitor.finish(0);
        }

        let mut x_old = x.to_vec();
        let mut iteration = 0;
        loop {
            iteration += 1;
            self.sweep(b, &x_old, x);

            let r = match self.config.residual {
                ResidualKind::Residual => {
                    self.matrix.residual(b, x, &mut work);
                    norm(&work, self.config.norm)
                }
                ResidualKind::Difference => norm_difference(x.iter(), &x_old, self.config.norm),
            };
            if monitor.check(iteration, r) {
                break;
            }
            x_old.copy_from_slice(x);
        }
        monitor.finish(iteration)
    }
}
