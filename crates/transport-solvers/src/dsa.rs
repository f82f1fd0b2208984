// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Diffusion Synthetic Acceleration
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Diffusion synthetic acceleration.
//!
//! Within-group: after a transport sweep produces `φ^{l+½}`, solve
//!
//! ```text
//! (−∇·D∇ + σt − σs_gg) δ = σs_gg (φ^{l+½} − φ^l)
//! ```
//!
//! and set `φ^{l+1} = φ^{l+½} + δ`. Multigroup: after a Gauss-Seidel pass
//! over the upscatter block, solve the coupled diffusion system over the
//! block with the lagged scatter change as right-hand side.

use std::ops::Range;

use ndarray::Array1;
use transport_math::monitor::{LinearSolverConfig, SolveResult};
use transport_math::solver::{build_matrix_solver, LinearSolver, LinearSolverKind};
use transport_sweep::boundary::BoundaryDiffusion;
use transport_sweep::source::ScatterSource;
use transport_types::config::SolverInput;
use transport_types::error::{TransportError, TransportResult};
use transport_types::material::Material;
use transport_types::mesh::Mesh;
use transport_types::problem::Problem;
use transport_types::state::State;

use crate::diffusion::DiffusionLossOperator;

/// Linear solver settings for diffusion solves, from the input keys
/// `linear_solver_*`.
pub fn linear_config(input: &SolverInput) -> LinearSolverConfig {
    LinearSolverConfig {
        max_iters: input.linear_solver_max_iters,
        atol: input.linear_solver_atol,
        rtol: input.linear_solver_rtol,
        ..Default::default()
    }
}

fn report(label: &str, g: usize, result: &SolveResult) {
    if !result.converged() {
        log::warn!(
            "{label} diffusion solve for group {g} stopped after {} iterations ({:?}, residual {:.3e})",
            result.iterations,
            result.status,
            result.residual
        );
    }
}

/// Within-group DSA with one lazily assembled operator per group.
pub struct Dsa<'a> {
    mesh: &'a Mesh,
    material: &'a Material,
    boundary: BoundaryDiffusion,
    scatter: ScatterSource<'a>,
    adjoint: bool,
    kind: LinearSolverKind,
    config: LinearSolverConfig,
    solvers: Vec<Option<Box<dyn LinearSolver>>>,
}

impl<'a> Dsa<'a> {
    pub fn new(problem: Problem<'a>) -> TransportResult<Self> {
        let input = problem.input;
        let kind = LinearSolverKind::from_name(&input.linear_solver_type)?;
        let groups = problem.number_groups();
        Ok(Dsa {
            mesh: problem.mesh,
            material: problem.material,
            boundary: BoundaryDiffusion::new(&input.boundary, problem.mesh, groups)?,
            scatter: ScatterSource::new(problem.mesh, problem.material, input.adjoint),
            adjoint: input.adjoint,
            kind,
            config: linear_config(input),
            solvers: (0..groups).map(|_| None).collect(),
        })
    }

    fn solver(&mut self, g: usize) -> TransportResult<&mut Box<dyn LinearSolver>> {
        let slot = &mut self.solvers[g];
        if slot.is_none() {
            let matrix = DiffusionLossOperator::new(self.mesh, self.material, &self.boundary, g..g + 1, self.adjoint)
                .assemble()?;
            log::debug!("DSA: assembled group {g} operator, {} nonzeros", matrix.nnz());
            *slot = Some(build_matrix_solver(self.kind, matrix, self.config.clone())?);
        }
        slot.as_mut()
            .ok_or_else(|| TransportError::LinAlg(format!("no DSA operator for group {g}")))
    }

    /// `x = C_g⁻¹ rhs`, starting from zero.
    pub fn apply_inverse(&mut self, g: usize, rhs: &[f64], x: &mut [f64]) -> TransportResult<()> {
        x.fill(0.0);
        let result = self.solver(g)?.solve(rhs, x);
        report("DSA", g, &result);
        Ok(())
    }

    /// Diffusion estimate of the remaining error of a sweep.
    pub fn correction(&mut self, g: usize, phi_half: &Array1<f64>, phi_old: &Array1<f64>) -> TransportResult<Array1<f64>> {
        let change = phi_half - phi_old;
        let rhs = self.scatter.within_group(g, &change).to_vec();
        let mut delta = vec![0.0; rhs.len()];
        self.apply_inverse(g, &rhs, &mut delta)?;
        Ok(Array1::from(delta))
    }

    /// `phi += correction(g, phi, phi_old)`.
    pub fn correct(&mut self, g: usize, phi: &mut Array1<f64>, phi_old: &Array1<f64>) -> TransportResult<()> {
        let delta = self.correction(g, phi, phi_old)?;
        *phi += &delta;
        Ok(())
    }

    pub fn scatter(&self) -> &ScatterSource<'a> {
        &self.scatter
    }
}

/// Multigroup DSA over the block of groups coupled by upscatter.
pub struct MgDsa<'a> {
    mesh: &'a Mesh,
    scatter: ScatterSource<'a>,
    groups: Range<usize>,
    solver: Box<dyn LinearSolver>,
}

impl<'a> MgDsa<'a> {
    /// Assemble the block operator for the contiguous group range `groups`.
    pub fn new(problem: Problem<'a>, groups: Range<usize>) -> TransportResult<Self> {
        let input = problem.input;
        let kind = LinearSolverKind::from_name(&input.linear_solver_type)?;
        let boundary = BoundaryDiffusion::new(&input.boundary, problem.mesh, problem.number_groups())?;
        let matrix = DiffusionLossOperator::new(
            problem.mesh,
            problem.material,
            &boundary,
            groups.clone(),
            input.adjoint,
        )
        .assemble()?;
        log::debug!(
            "MG DSA: groups {:?}, {} unknowns, {} nonzeros",
            groups,
            matrix.number_rows(),
            matrix.nnz()
        );
        Ok(MgDsa {
            mesh: problem.mesh,
            scatter: ScatterSource::new(problem.mesh, problem.material, input.adjoint),
            groups,
            solver: build_matrix_solver(kind, matrix, linear_config(input))?,
        })
    }

    pub fn groups(&self) -> Range<usize> {
        self.groups.clone()
    }

    /// Correct the block fluxes of `state` after one Gauss-Seidel pass.
    ///
    /// `order` lists the block groups in solve order; `phi_old[p]` is the
    /// flux of `order[p]` before the pass. Group `g` saw the old flux of
    /// every group after it in `order`, so the residual is
    /// `r_g = Σ_{later g'} σs(g←g') (φ_g' − φ_g'^old)`.
    pub fn correct(&mut self, state: &mut State, order: &[usize], phi_old: &[Array1<f64>]) -> TransportResult<()> {
        let cells = self.mesh.number_cells();
        let start = self.groups.start;
        let mut rhs = vec![0.0; self.groups.len() * cells];
        for (p, &g) in order.iter().enumerate() {
            let mut r = Array1::zeros(cells);
            for (q, &gp) in order.iter().enumerate().skip(p + 1) {
                let change = state.phi(gp) - &phi_old[q];
                self.scatter.add_group(g, gp, &change, &mut r);
            }
            for (dst, &v) in rhs[(g - start) * cells..(g - start + 1) * cells].iter_mut().zip(r.iter()) {
                *dst = v;
            }
        }
        let mut delta = vec![0.0; rhs.len()];
        let result = self.solver.solve(&rhs, &mut delta);
        report("MG DSA", start, &result);
        for &g in order {
            let block = &delta[(g - start) * cells..(g - start + 1) * cells];
            for (p, &d) in state.phi_mut(g).iter_mut().zip(block) {
                *p += d;
            }
        }
        Ok(())
    }
}
