// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Convergence Monitor
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Residual bookkeeping shared by the iterative linear solvers.

use crate::vector::NormType;

/// Why an iteration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorStatus {
    Running,
    Converged,
    MaxIterations,
    Diverged,
}

/// Residual measured by stationary solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResidualKind {
    /// Norm of `b - A x`.
    #[default]
    Residual,
    /// Norm of the change between successive iterates.
    Difference,
}

/// Configuration for the matrix solvers.
#[derive(Debug, Clone)]
pub struct LinearSolverConfig {
    /// Maximum number of iterations (default: 1000).
    pub max_iters: usize,
    /// Absolute residual tolerance (default: 1e-12).
    pub atol: f64,
    /// Tolerance relative to the initial residual (default: 1e-8).
    pub rtol: f64,
    /// Divergence threshold relative to the initial residual (default: 1e8).
    pub dtol: f64,
    pub norm: NormType,
    pub residual: ResidualKind,
    /// Krylov subspace size before restart; GMRES only (default: 30).
    pub restart: usize,
}

impl Default for LinearSolverConfig {
    fn default() -> Self {
        LinearSolverConfig {
            max_iters: 1000,
            atol: 1e-12,
            rtol: 1e-8,
            dtol: 1e8,
            norm: NormType::L2,
            residual: ResidualKind::Residual,
            restart: 30,
        }
    }
}

/// Result of an iterative solve.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub status: MonitorStatus,
    pub iterations: usize,
    /// Final residual norm.
    pub residual: f64,
    /// Residual after each iteration.
    pub history: Vec<f64>,
}

impl SolveResult {
    pub fn converged(&self) -> bool {
        self.status == MonitorStatus::Converged
    }
}

/// Tracks residuals against absolute, relative and divergence limits.
#[derive(Debug, Clone)]
pub struct Monitor {
    label: &'static str,
    atol: f64,
    rtol: f64,
    dtol: f64,
    max_iters: usize,
    initial: f64,
    history: Vec<f64>,
    status: MonitorStatus,
}

impl Monitor {
    pub fn new(label: &'static str, config: &LinearSolverConfig) -> Self {
        Monitor {
            label,
            atol: config.atol,
            rtol: config.rtol,
            dtol: config.dtol,
            max_iters: config.max_iters,
            initial: 0.0,
            history: Vec::new(),
            status: MonitorStatus::Running,
        }
    }

    /// Record the initial residual. Returns `true` when it already
    /// satisfies the absolute tolerance.
    pub fn init(&mut self, r0: f64) -> bool {
        self.initial = r0;
        if r0 <= self.atol {
            self.status = MonitorStatus::Converged;
            return true;
        }
        false
    }

    /// Record the residual after `iteration` (1-based). Returns `true`
    /// when iteration must stop.
    pub fn check(&mut self, iteration: usize, r: f64) -> bool {
        self.history.push(r);
        log::trace!("{} iter {}: residual = {:.6e}", self.label, iteration, r);
        if r <= self.atol.max(self.rtol * self.initial) {
            self.status = MonitorStatus::Converged;
            return true;
        }
        if !r.is_finite() || (self.initial > 0.0 && r > self.dtol * self.initial) {
            self.status = MonitorStatus::Diverged;
            log::warn!("{} diverged at iteration {}: residual = {:.3e}", self.label, iteration, r);
            return true;
        }
        if iteration >= self.max_iters {
            self.status = MonitorStatus::MaxIterations;
            log::warn!(
                "{} did not converge in {} iterations: residual = {:.3e}",
                self.label,
                iteration,
                r
            );
            return true;
        }
        false
    }

    pub fn status(&self) -> MonitorStatus {
        self.status
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn finish(self, iterations: usize) -> SolveResult {
        let residual = self.history.last().copied().unwrap_or(self.initial);
        let status = match self.status {
            MonitorStatus::Running => MonitorStatus::MaxIterations,
            s => s,
        };
        SolveResult {
            status,
            iterations,
            residual,
            history: self.history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_convergence() {
        let cfg = LinearSolverConfig {
            rtol: 1e-3,
            atol: 0.0,
            ..Default::default()
        };
        let mut m = Monitor::new("test", &cfg);
        assert!(!m.init(1.0));
        assert!(!m.check(1, 0.1));
        assert!(m.check(2, 1e-4));
        let result = m.finish(2);
        assert!(result.converged());
        assert_eq!(result.history, vec![0.1, 1e-4]);
    }

    #[test]
    fn test_max_iterations_reported() {
        let cfg = LinearSolverConfig {
            max_iters: 2,
            ..Default::default()
        };
        let mut m = Monitor::new("test", &cfg);
        m.init(1.0);
        assert!(!m.check(1, 0.9));
        assert!(m.check(2, 0.8));
        assert_eq!(m.status(), MonitorStatus::MaxIterations);
        let result = m.finish(2);
        assert!(!result.converged());
        assert!((result.residual - 0.8).abs() < 1e-15);
    }

    #[test]
    fn test_divergence_detected() {
        let cfg = LinearSolverConfig {
            dtol: 10.0,
            ..Default::default()
        };
        let mut m = Monitor::new("test", &cfg);
        m.init(1.0);
        assert!(m.check(1, 100.0));
        assert_eq!(m.status(), MonitorStatus::Diverged);
    }

    #[test]
    fn test_zero_initial_residual_converged() {
        let mut m = Monitor::new("test", &LinearSolverConfig::default());
        assert!(m.init(0.0));
        assert!(m.finish(0).converged());
    }
}
