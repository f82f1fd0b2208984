// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — GMRES
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Restarted GMRES(m) Krylov subspace solver for general linear
//! operators.
//!
//! Arnoldi with modified Gram-Schmidt builds the basis; plane rotations
//! keep the Hessenberg matrix triangular so the least-squares residual
//! is available after every step. The operator is only applied, so a
//! matrix-free transport sweep works as well as an assembled matrix.

use transport_types::constants::TINY;

use crate::matrix::Matrix;
use crate::monitor::{LinearSolverConfig, MonitorStatus, SolveResult};
use crate::operator::{JacobiPreconditioner, LinearOperator, Preconditioner};
use crate::solver::LinearSolver;
use crate::vector::{axpy, dot, norm, scale, sub, NormType};

#[derive(Debug, Clone)]
pub struct GmresConfig {
    /// Basis size before restart.
    pub restart: usize,
    /// Restart cycles.
    pub max_iter: usize,
    /// Relative to the initial true residual.
    pub tol: f64,
    pub atol: f64,
}

impl Default for GmresConfig {
    fn default() -> Self {
        GmresConfig {
            restart: 30,
            max_iter: 100,
            tol: 1e-8,
            atol: 0.0,
        }
    }
}

impl GmresConfig {
    /// Spread `config.max_iters` operator applications over restart cycles.
    pub fn from_linear(config: &LinearSolverConfig) -> Self {
        let restart = config.restart.max(1);
        GmresConfig {
            restart,
            max_iter: config.max_iters.div_ceil(restart).max(1),
            tol: config.rtol,
            atol: config.atol,
        }
    }
}

/// Plane rotation `(c, s)` that maps `(a, b)` to `(r, 0)`.
#[derive(Clone, Copy)]
struct Rotation {
    c: f64,
    s: f64,
}

impl Rotation {
    fn zeroing(a: f64, b: f64) -> Self {
        if b.abs() < TINY {
            return Rotation { c: 1.0, s: 0.0 };
        }
        let r = a.hypot(b);
        Rotation { c: a / r, s: -b / r }
    }

    #[inline]
    fn rotate(&self, pair: (f64, f64)) -> (f64, f64) {
        (self.c * pair.0 - self.s * pair.1, self.s * pair.0 + self.c * pair.1)
    }
}

/// One restart cycle: Krylov basis, triangularised Hessenberg columns and
/// the rotated right-hand side `g`.
struct Cycle {
    basis: Vec<Vec<f64>>,
    columns: Vec<Vec<f64>>,
    rotations: Vec<Rotation>,
    g: Vec<f64>,
}

impl Cycle {
    fn start(z: &[f64], beta: f64, m: usize) -> Self {
        let mut v0 = vec![0.0; z.len()];
        scale(1.0 / beta, z, &mut v0);
        let mut basis = Vec::with_capacity(m + 1);
        basis.push(v0);
        let mut g = vec![0.0; m + 1];
        g[0] = beta;
        Cycle {
            basis,
            columns: Vec::with_capacity(m),
            rotations: Vec::with_capacity(m),
            g,
        }
    }

    fn steps(&self) -> usize {
        self.columns.len()
    }

    /// Orthogonalise `w` against the basis (modified Gram-Schmidt), extend
    /// the basis and rotate the new Hessenberg column. Returns the residual
    /// estimate and the subdiagonal entry before rotation.
    fn extend(&mut self, mut w: Vec<f64>) -> (f64, f64) {
        let j = self.columns.len();
        let mut h = Vec::with_capacity(j + 2);
        for v in &self.basis {
            let hij = dot(&w, v);
            axpy(-hij, v, &mut w);
            h.push(hij);
        }
        let sub_diagonal = norm(&w, NormType::L2);
        h.push(sub_diagonal);
        if sub_diagonal > TINY {
            w.iter_mut().for_each(|wi| *wi /= sub_diagonal);
        } else {
            w.fill(0.0);
        }
        self.basis.push(w);

        for (i, rot) in self.rotations.iter().enumerate() {
            (h[i], h[i + 1]) = rot.rotate((h[i], h[i + 1]));
        }
        let rot = Rotation::zeroing(h[j], h[j + 1]);
        (h[j], h[j + 1]) = rot.rotate((h[j], h[j + 1]));
        (self.g[j], self.g[j + 1]) = rot.rotate((self.g[j], self.g[j + 1]));
        self.rotations.push(rot);
        self.columns.push(h);
        (self.g[j + 1].abs(), sub_diagonal)
    }

    /// `x += V y` with `R y = g` solved by back substitution.
    fn update(&self, x: &mut [f64]) {
        let k = self.steps();
        let mut y = vec![0.0; k];
        for i in (0..k).rev() {
            let sum = self.g[i] - (i + 1..k).map(|c| self.columns[c][i] * y[c]).sum::<f64>();
            let diag = self.columns[i][i];
            y[i] = if diag.abs() > TINY { sum / diag } else { 0.0 };
        }
        for (v, &yi) in self.basis.iter().zip(&y) {
            axpy(yi, v, x);
        }
    }
}

/// `z = M⁻¹ r`, or a plain copy without a preconditioner.
fn precondition(pc: &mut Option<&mut dyn Preconditioner>, r: &[f64], z: &mut [f64]) {
    match pc.as_deref_mut() {
        Some(p) => p.apply(r, z),
        None => z.copy_from_slice(r),
    }
}

/// `r = b - A x`, returning `‖r‖₂`.
fn true_residual<A>(op: &mut A, b: &[f64], x: &[f64], work: &mut [f64], r: &mut [f64]) -> f64
where
    A: LinearOperator + ?Sized,
{
    op.multiply(x, work);
    sub(b, work, r);
    norm(&*r, NormType::L2)
}

fn finished(status: MonitorStatus, iterations: usize, residual: f64, history: Vec<f64>) -> SolveResult {
    SolveResult {
        status,
        iterations,
        residual,
        history,
    }
}

/// Restarted GMRES(m) for `A x = b` with an optional left preconditioner.
///
/// `x` holds the initial guess on entry. Arnoldi steps stop when the
/// preconditioned residual estimate has dropped by the same factor as
/// `max(tol·‖r₀‖, atol)` asks of the true residual; convergence is only
/// reported once the true residual `‖b − A x‖₂` meets that target, so a
/// cycle that stops early on the estimate is followed by a restart.
/// `iterations` counts operator applications inside Arnoldi.
pub fn gmres_solve<A>(
    op: &mut A,
    b: &[f64],
    x: &mut [f64],
    mut pc: Option<&mut dyn Preconditioner>,
    config: &GmresConfig,
) -> SolveResult
where
    A: LinearOperator + ?Sized,
{
    let n = op.number_rows();
    let mut history = Vec::new();
    if n == 0 {
        return finished(MonitorStatus::Converged, 0, 0.0, history);
    }
    let m = config.restart.clamp(1, n);

    let mut work = vec![0.0; n];
    let mut r = vec![0.0; n];
    let mut z = vec![0.0; n];
    let mut applications = 0;

    let r0 = true_residual(op, b, x, &mut work, &mut r);
    if r0 <= config.atol.max(TINY) {
        return finished(MonitorStatus::Converged, 0, r0, history);
    }
    let target = (config.tol * r0).max(config.atol);
    // Target ratio carried over to the preconditioned norm of the first cycle.
    let mut estimate_target = None;

    for _ in 0..config.max_iter {
        let residual = true_residual(op, b, x, &mut work, &mut r);
        if residual < target && applications > 0 {
            return finished(MonitorStatus::Converged, applications, residual, history);
        }
        precondition(&mut pc, &r, &mut z);
        let beta = norm(&z, NormType::L2);
        if beta < TINY {
            let status = if residual < target {
                MonitorStatus::Converged
            } else {
                MonitorStatus::MaxIterations
            };
            return finished(status, applications, residual, history);
        }
        let cycle_target = *estimate_target.get_or_insert(beta * target / r0);

        let mut cycle = Cycle::start(&z, beta, m);
        while cycle.steps() < m {
            applications += 1;
            op.multiply(&cycle.basis[cycle.steps()], &mut work);
            let mut w = vec![0.0; n];
            precondition(&mut pc, &work, &mut w);

            let (estimate, sub_diagonal) = cycle.extend(w);
            history.push(estimate);
            log::trace!("GMRES iter {applications}: residual = {estimate:.6e}");
            // Small estimate, or an invariant subspace reached.
            if estimate < cycle_target || sub_diagonal < TINY {
                break;
            }
        }
        cycle.update(x);
    }

    let residual = true_residual(op, b, x, &mut work, &mut r);
    if residual < target {
        return finished(MonitorStatus::Converged, applications, residual, history);
    }
    log::warn!("GMRES did not converge in {applications} iterations: residual = {residual:.3e}");
    finished(MonitorStatus::MaxIterations, applications, residual, history)
}

// ───────────────────────── matrix wrapper ────────────────────────────

/// GMRES on an assembled matrix with a Jacobi left preconditioner.
#[derive(Debug, Clone)]
pub struct Gmres {
    matrix: Matrix,
    preconditioner: JacobiPreconditioner,
    config: GmresConfig,
}

impl Gmres {
    pub fn new(matrix: Matrix, config: GmresConfig) -> Self {
        let preconditioner = JacobiPreconditioner::new(&matrix);
        Gmres {
            matrix,
            preconditioner,
            config,
        }
    }
}

impl LinearSolver for Gmres {
    fn name(&self) -> &'static str {
        "gmres"
    }

    fn solve(&mut self, b: &[f64], x: &mut [f64]) -> SolveResult {
        let pc: &mut dyn Preconditioner = &mut self.preconditioner;
        gmres_solve(&mut self.matrix, b, x, Some(pc), &self.config)
    }
}

// ═══════════════════════════════ tests ═══════════════════════════════
