// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Jacobi
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Point Jacobi iteration: every off-diagonal term uses the previous
//! iterate.

use transport_types::error::{TransportError, TransportResult};

use crate::matrix::Matrix;
use crate::monitor::{LinearSolverConfig, Monitor, ResidualKind, SolveResult};
use crate::solver::LinearSolver;
use crate::vector::{norm, norm_difference};

#[derive(Debug, Clone)]
pub struct Jacobi {
    matrix: Matrix,
    inverse_diagonal: Vec<f64>,
    config: LinearSolverConfig,
}

impl Jacobi {
    pub fn new(matrix: Matrix, config: LinearSolverConfig) -> TransportResult<Self> {
        if matrix.number_rows() != matrix.number_columns() {
            return Err(TransportError::mismatch(
                "Jacobi matrix columns",
                matrix.number_rows(),
                matrix.number_columns(),
            ));
        }
        matrix.require_diagonal()?;
        let inverse_diagonal = matrix.diagonal_values().iter().map(|d| 1.0 / d).collect();
        Ok(Jacobi {
            matrix,
            inverse_diagonal,
            config,
        })
    }

    fn sweep(&self, b: &[f64], x_old: &[f64], x_new: &mut [f64]) {
        let a = &self.matrix;
        for i in 0..a.number_rows() {
            let mut sum = b[i];
            for p in a.start(i)..a.end(i) {
                let j = a.column(p);
                if j != i {
                    sum -= a.value(p) * x_old[j];
                }
            }
            x_new[i] = sum * self.inverse_diagonal[i];
        }
    }
}

impl LinearSolver for Jacobi {
    fn name(&self) -> &'static str {
        "jacobi"
    }

    fn solve(&mut self, b: &[f64], x: &mut [f64]) -> SolveResult {
        let n = self.matrix.number_rows();
        let mut monitor = Monitor::new("jacobi", &self.config);
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
