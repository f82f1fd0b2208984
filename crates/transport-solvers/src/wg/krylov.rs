// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Krylov Within-Group Solver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! GMRES on the within-group transport equation.
//!
//! Unknown vector `x = [φ ; ψ_b]`, where `ψ_b` is the incident flux on
//! reflective sides. One operator application:
//!
//! ```text
//! clear boundary, load ψ_b, sweep S φ with no per-angle update,
//! reflect, read back ψ_b'   →   A x = x − [D L⁻¹ S φ ; ψ_b']
//! ```
//!
//! The right-hand side is the same sweep applied to the fixed source with
//! the vacuum and fixed incident flux in place. With DSA the left
//! preconditioner is `P⁻¹ = I + C⁻¹ S` on the flux block.

use ndarray::Array1;
use transport_math::gmres::{gmres_solve, GmresConfig};
use transport_math::operator::{LinearOperator, Preconditioner};
use transport_sweep::source::{ScatterSource, SweepSource};
use transport_sweep::sweeper::Sweep;
use transport_types::error::{TransportError, TransportResult};
use transport_types::state::State;

use super::{InnerControl, WgResult, WithinGroupSolver};
use crate::dsa::Dsa;

pub struct KrylovWgSolver<'a> {
    sweeper: Box<dyn Sweep + 'a>,
    scatter: ScatterSource<'a>,
    dsa: Option<Dsa<'a>>,
    control: InnerControl,
    restart: usize,
}

impl<'a> KrylovWgSolver<'a> {
    pub fn new(
        sweeper: Box<dyn Sweep + 'a>,
        scatter: ScatterSource<'a>,
        dsa: Option<Dsa<'a>>,
        control: InnerControl,
        restart: usize,
    ) -> Self {
        KrylovWgSolver {
            sweeper,
            scatter,
            dsa,
            control,
            restart: restart.max(1),
        }
    }
}

/// `I − D L⁻¹ S` acting on `[φ ; ψ_b]`.
struct WgOperator<'s, 'a> {
    sweeper: &'s mut (dyn Sweep + 'a),
    scatter: &'s ScatterSource<'a>,
    source: &'s mut SweepSource,
    g: usize,
    cells: usize,
    phi: Array1<f64>,
    failure: Option<TransportError>,
}

impl WgOperator<'_, '_> {
    fn apply_transport(&mut self, x: &[f64], y: &mut [f64]) -> TransportResult<()> {
        let (x_phi, x_bnd) = x.split_at(self.cells);
        let (y_phi, y_bnd) = y.split_at_mut(self.cells);
        let x_phi = Array1::from(x_phi.to_vec());
        let q = self.source.build_scatter_only(self.g, &x_phi, self.scatter);

        let boundary = self.sweeper.boundary_mut();
        boundary.clear(self.g);
        boundary.set_incident(self.g, x_bnd)?;
        self.sweeper.sweep(q, &mut self.phi);
        self.sweeper.boundary_mut().update(self.g);
        self.sweeper.boundary().get_incident(self.g, y_bnd)?;

        for (yi, &p) in y_phi.iter_mut().zip(self.phi.iter()) {
            *yi = p;
        }
        Ok(())
    }
}

impl LinearOperator for WgOperator<'_, '_> {
    fn number_rows(&self) -> usize {
        self.cells + self.sweeper.boundary_size()
    }

    fn multiply(&mut self, x: &[f64], y: &mut [f64]) {
        if self.failure.is_some() {
            y.copy_from_slice(x);
            return;
        }
        match self.apply_transport(x, y) {
            Ok(()) => {
                for (yi, &xi) in y.iter_mut().zip(x) {
                    *yi = xi - *yi;
                }
            }
            Err(e) => {
                self.failure = Some(e);
                y.copy_from_slice(x);
            }
        }
    }
}

/// `P⁻¹ = I + C⁻¹ S` on the flux block, identity on the boundary block.
struct DsaPreconditioner<'s, 'a> {
    dsa: &'s mut Dsa<'a>,
    g: usize,
    cells: usize,
    failure: Option<TransportError>,
}

impl Preconditioner for DsaPreconditioner<'_, '_> {
    fn apply(&mut self, b: &[f64], x: &mut [f64]) {
        x.copy_from_slice(b);
        if self.failure.is_some() {
            return;
        }
        let b_phi = Array1::from(b[..self.cells].to_vec());
        let rhs = self.dsa.scatter().within_group(self.g, &b_phi).to_vec();
        let mut delta = vec![0.0; self.cells];
        match self.dsa.apply_inverse(self.g, &rhs, &mut delta) {
            Ok(()) => {
                for (xi, d) in x[..self.cells].iter_mut().zip(delta) {
                    *xi += d;
                }
            }
            Err(e) => self.failure = Some(e),
        }
    }
}

impl WithinGroupSolver for KrylovWgSolver<'_> {
    fn name(&self) -> &'static str {
        if self.dsa.is_some() {
            "GMRES+DSA"
        } else {
            "GMRES"
        }
    }

    fn solve(&mut self, g: usize, state: &mut State, source: &mut SweepSource) -> TransportResult<WgResult> {
        let label = self.name();
        let cells = state.number_cells();
        self.sweeper.setup_group(g);
        self.sweeper.set_update_boundary(false);
        let n_bnd = self.sweeper.boundary_size();

        // Initial guess: current flux and whatever incident flux the
        // boundary holds from the previous solve of this group.
        let mut x = vec![0.0; cells + n_bnd];
        for (xi, &p) in x.iter_mut().zip(state.phi(g).iter()) {
            *xi = p;
        }
        self.sweeper.boundary().get_incident(g, &mut x[cells..])?;

        // Right-hand side: uncollided response to the fixed source.
        let mut b = vec![0.0; cells + n_bnd];
        let mut phi = Array1::zeros(cells);
        {
            let boundary = self.sweeper.boundary_mut();
            boundary.clear(g);
            boundary.set(g);
        }
        self.sweeper.sweep(source.fixed(), &mut phi);
        self.sweeper.boundary_mut().update(g);
        self.sweeper.boundary().get_incident(g, &mut b[cells..])?;
        for (bi, &p) in b.iter_mut().zip(phi.iter()) {
            *bi = p;
        }

        let config = GmresConfig {
            restart: self.restart,
            max_iter: self.control.max_iters.div_ceil(self.restart).max(1),
            tol: self.control.tolerance,
            atol: 0.0,
        };

        let (solve_result, op_failure, pc_failure) = {
            let mut op = WgOperator {
                sweeper: self.sweeper.as_mut(),
                scatter: &self.scatter,
                source: &mut *source,
                g,
                cells,
                phi: Array1::zeros(cells),
                failure: None,
            };
            match self.dsa.as_mut() {
                Some(dsa) => {
                    let mut pc = DsaPreconditioner {
                        dsa,
                        g,
                        cells,
                        failure: None,
                    };
                    let r = gmres_solve(&mut op, &b, &mut x, Some(&mut pc), &config);
                    (r, op.failure, pc.failure)
                }
                None => {
                    let r = gmres_solve(&mut op, &b, &mut x, None, &config);
                    (r, op.failure, None)
                }
            }
        };
        if let Some(e) = op_failure.or(pc_failure) {
            return Err(e);
        }
        for (i, &r) in solve_result.history.iter().enumerate() {
            self.control.progress(label, g, i + 1, r);
        }

        // Final sweep with the full source leaves flux and boundary
        // consistent with the solution.
        let x_phi = Array1::from(x[..cells].to_vec());
        {
            let boundary = self.sweeper.boundary_mut();
            boundary.clear(g);
            boundary.set(g);
            boundary.set_incident(g, &x[cells..])?;
        }
        let q = source.build_within_group(g, &x_phi, &self.scatter);
        self.sweeper.sweep(q, &mut phi);
        self.sweeper.boundary_mut().update(g);

        state.set_phi(g, phi);
        if let Some(psi) = self.sweeper.angular_flux() {
            state.set_angular_flux(g, psi);
        }
        let result = WgResult {
            converged: solve_result.converged(),
            iterations: solve_result.iterations,
            residual: solve_result.residual,
            history: solve_result.history,
        };
        self.control.summary(label, g, &result);
        Ok(result)
    }
}
