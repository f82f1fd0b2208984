// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Linear Solver Selection
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use transport_types::error::{TransportError, TransportResult};

use crate::gauss_seidel::GaussSeidel;
use crate::gmres::{Gmres, GmresConfig};
use crate::jacobi::Jacobi;
use crate::matrix::Matrix;
use crate::monitor::{LinearSolverConfig, SolveResult};

/// Solver for `A x = b` with an owned, assembled operator.
pub trait LinearSolver {
    fn name(&self) -> &'static str;

    /// `x` holds the initial guess on entry and the best iterate on exit.
    fn solve(&mut self, b: &[f64], x: &mut [f64]) -> SolveResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinearSolverKind {
    GaussSeidel,
    Jacobi,
    Gmres,
}

impl LinearSolverKind {
    pub fn from_name(name: &str) -> TransportResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "gs" | "gauss-seidel" | "gauss_seidel" | "gaussseidel" => Ok(LinearSolverKind::GaussSeidel),
            "jacobi" => Ok(LinearSolverKind::Jacobi),
            "gmres" => Ok(LinearSolverKind::Gmres),
            _ => Err(TransportError::unsupported("linear solver", name)),
        }
    }
}

/// Build a matrix solver. Point relaxation fails with `InvalidOperator`
/// on a missing or zero diagonal.
pub fn build_matrix_solver(
    kind: LinearSolverKind,
    matrix: Matrix,
    config: LinearSolverConfig,
) -> TransportResult<Box<dyn LinearSolver>> {
    Ok(match kind {
        LinearSolverKind::GaussSeidel => Box::new(GaussSeidel::new(matrix, config)?),
        LinearSolverKind::Jacobi => Box::new(Jacobi::new(matrix, config)?),
        LinearSolverKind::Gmres => Box::new(Gmres::new(matrix, GmresConfig::from_linear(&config))),
    })
}
