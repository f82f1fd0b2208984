// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Solver Managers
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Assemble the full solver stack from a [`Problem`]: boundary, sweeper,
//! within-group solver, multigroup solver, eigensolver and state.

use transport_sweep::sweeper::SnSweeper;
use transport_types::error::TransportResult;
use transport_types::problem::Problem;
use transport_types::state::State;

use crate::eigen::{EigenResult, EigenSolver, EigenSolverRegistry};
use crate::multigroup::{MgResult, MultigroupSolver};
use crate::wg::build_wg_solver;

/// SN sweeper, the configured within-group solver and Gauss-Seidel over
/// groups.
pub fn build_multigroup_solver(problem: Problem<'_>) -> TransportResult<MultigroupSolver<'_>> {
    let sweeper = SnSweeper::from_problem(problem)?;
    let wg = build_wg_solver(problem, Box::new(sweeper))?;
    MultigroupSolver::new(problem, wg)
}

fn initial_state(problem: &Problem<'_>) -> State {
    let input = problem.input;
    let state = State::new(problem.number_groups(), problem.number_cells()).with_adjoint(input.adjoint);
    if input.store_angular_flux {
        state.with_angular_flux(problem.quadrature.number_angles())
    } else {
        state
    }
}

/// Fixed-source problem driven by the external source and fixed boundary
/// flux. Fission is left out.
pub struct FixedSourceManager<'a> {
    mg: MultigroupSolver<'a>,
    state: State,
}

impl<'a> FixedSourceManager<'a> {
    pub fn new(problem: Problem<'a>) -> TransportResult<Self> {
        let mg = build_multigroup_solver(problem)?;
        if problem.external_source.is_none() {
            log::warn!("fixed-source problem without an external source; only boundary flux drives it");
        }
        Ok(FixedSourceManager {
            mg,
            state: initial_state(&problem),
        })
    }

    pub fn solve(&mut self) -> TransportResult<MgResult> {
        self.mg.solve(&mut self.state, None)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn into_state(self) -> State {
        self.state
    }
}

/// k-eigenvalue problem using the eigensolver named by `eigen_solver`.
pub struct EigenvalueManager<'a> {
    solver: Box<dyn EigenSolver + 'a>,
    state: State,
}

impl<'a> EigenvalueManager<'a> {
    pub fn new(problem: Problem<'a>) -> TransportResult<Self> {
        Self::with_registry(problem, &EigenSolverRegistry::default())
    }

    pub fn with_registry(problem: Problem<'a>, registry: &EigenSolverRegistry) -> TransportResult<Self> {
        let mg = build_multigroup_solver(problem)?;
        let solver = registry.build(&problem.input.eigen_solver, problem, mg)?;
        log::debug!("eigenvalue manager: {} over {} groups", solver.name(), problem.number_groups());
        Ok(EigenvalueManager {
            solver,
            state: initial_state(&problem),
        })
    }

    pub fn solver_name(&self) -> &'static str {
        self.solver.name()
    }

    pub fn solve(&mut self) -> TransportResult<EigenResult> {
        self.solver.solve(&mut self.state)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn into_state(self) -> State {
        self.state
    }
}
