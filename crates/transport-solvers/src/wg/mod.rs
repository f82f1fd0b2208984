// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Within-Group Solvers
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Within-group solvers: given the fixed source of one group, converge the
//! within-group scatter and reflective boundary flux.
//!
//! - [`source_iteration::SourceIteration`]: Richardson iteration on the
//!   sweep, optionally accelerated by DSA.
//! - [`krylov::KrylovWgSolver`]: GMRES on `(I − D L⁻¹ S) φ = D L⁻¹ q`
//!   with the reflective incident flux as extra unknowns.

pub mod krylov;
pub mod source_iteration;

use ndarray::Array1;
use transport_sweep::source::{ScatterSource, SweepSource};
use transport_sweep::sweeper::Sweep;
use transport_types::error::{TransportError, TransportResult};
use transport_types::problem::Problem;
use transport_types::state::State;

use crate::dsa::Dsa;

pub use krylov::KrylovWgSolver;
pub use source_iteration::SourceIteration;

/// Outcome of one within-group solve.
#[derive(Debug, Clone)]
pub struct WgResult {
    pub converged: bool,
    pub iterations: usize,
    pub residual: f64,
    pub history: Vec<f64>,
}

pub trait WithinGroupSolver {
    fn name(&self) -> &'static str;

    /// Solve group `g` with the fixed part of `source` already built.
    /// The converged flux is written into `state`.
    fn solve(&mut self, g: usize, state: &mut State, source: &mut SweepSource) -> TransportResult<WgResult>;
}

/// Inner iteration settings shared by the solvers.
#[derive(Debug, Clone, Copy)]
pub struct InnerControl {
    pub max_iters: usize,
    pub tolerance: f64,
    pub print_level: u32,
    pub print_interval: usize,
}

impl InnerControl {
    pub fn from_problem(problem: &Problem<'_>) -> Self {
        let input = problem.input;
        InnerControl {
            max_iters: input.inner_max_iters,
            tolerance: input.inner_tolerance,
            print_level: input.inner_print_level,
            print_interval: input.inner_print_interval,
        }
    }

    pub(crate) fn progress(&self, label: &str, g: usize, iteration: usize, residual: f64) {
        log::trace!("{label} group {g} iter {iteration}: residual = {residual:.6e}");
        if self.print_level >= 2 && iteration % self.print_interval == 0 {
            log::info!("    {label} group {g} iter {iteration:>4}  residual {residual:.3e}");
        }
    }

    pub(crate) fn summary(&self, label: &str, g: usize, result: &WgResult) {
        if !result.converged {
            log::warn!(
                "{label} group {g} did not converge in {} iterations: residual = {:.3e}",
                result.iterations,
                result.residual
            );
        } else if self.print_level >= 1 {
            log::info!(
                "    {label} group {g} converged in {} iterations, residual {:.3e}",
                result.iterations,
                result.residual
            );
        }
    }
}

/// `max|a − b| / max|a|`, or the absolute change when `a` vanishes.
pub fn relative_change(new: &Array1<f64>, old: &Array1<f64>) -> f64 {
    let diff = new
        .iter()
        .zip(old.iter())
        .fold(0.0f64, |m, (a, b)| m.max((a - b).abs()));
    let scale = new.iter().fold(0.0f64, |m, a| m.max(a.abs()));
    if scale > 0.0 {
        diff / scale
    } else {
        diff
    }
}

/// Build the solver named by `inner_solver` around `sweeper`.
pub fn build_wg_solver<'a>(
    problem: Problem<'a>,
    sweeper: Box<dyn Sweep + 'a>,
) -> TransportResult<Box<dyn WithinGroupSolver + 'a>> {
    let input = problem.input;
    let scatter = ScatterSource::new(problem.mesh, problem.material, input.adjoint);
    let dsa = if input.inner_use_dsa {
        Some(Dsa::new(problem)?)
    } else {
        None
    };
    let control = InnerControl::from_problem(&problem);
    match input.inner_solver.to_ascii_lowercase().as_str() {
        "si" | "source-iteration" => Ok(Box::new(SourceIteration::new(sweeper, scatter, dsa, control))),
        "gmres" | "krylov" => Ok(Box::new(KrylovWgSolver::new(
            sweeper,
            scatter,
            dsa,
            control,
            input.inner_gmres_restart,
        ))),
        _ => Err(TransportError::unsupported("within-group solver", &input.inner_solver)),
    }
}
