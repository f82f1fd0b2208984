// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Eigenvalue Iteration
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! k-eigenvalue solvers and the registry that selects them by name.
//!
//! Power iteration:
//!
//! ```text
//! q_g = χ_g d / k             (fission source with scale 1/k)
//! φ   = MG-solve(q)
//! d'  = Σ_g νσf_g φ_g
//! k'  = k · F(d') / F(d)      F = volume integral
//! ```

use std::collections::BTreeMap;
use std::time::Instant;

use transport_sweep::source::FissionSource;
use transport_types::error::{TransportError, TransportResult};
use transport_types::problem::Problem;
use transport_types::state::State;

use crate::multigroup::MultigroupSolver;

/// Outcome of an eigenvalue solve.
#[derive(Debug, Clone)]
pub struct EigenResult {
    pub keff: f64,
    pub converged: bool,
    pub iterations: usize,
    /// `|k − k_prev|` of the last iteration.
    pub k_residual: f64,
    /// L∞ change of the normalised fission density in the last iteration.
    pub flux_residual: f64,
    /// `k` after every iteration.
    pub history: Vec<f64>,
    /// Multigroup iterations summed over all power iterations.
    pub outer_iterations: usize,
    /// Some multigroup solve was a forced single pass over upscatter.
    pub approximate: bool,
    pub solve_time_ms: f64,
}

pub trait EigenSolver {
    fn name(&self) -> &'static str;

    /// Iterate from the flux and eigenvalue held in `state`; the converged
    /// flux and `k` are written back.
    fn solve(&mut self, state: &mut State) -> TransportResult<EigenResult>;
}

pub struct PowerIteration<'a> {
    problem: Problem<'a>,
    mg: MultigroupSolver<'a>,
    fission: FissionSource<'a>,
}

impl<'a> PowerIteration<'a> {
    pub fn new(problem: Problem<'a>, mg: MultigroupSolver<'a>) -> Self {
        let fission = FissionSource::new(problem.mesh, problem.material, problem.input.adjoint);
        PowerIteration { problem, mg, fission }
    }

    pub fn fission_source(&self) -> &FissionSource<'a> {
        &self.fission
    }
}

impl EigenSolver for PowerIteration<'_> {
    fn name(&self) -> &'static str {
        "power-iteration"
    }

    fn solve(&mut self, state: &mut State) -> TransportResult<EigenResult> {
        let start = Instant::now();
        let input = self.problem.input;

        self.fission.initialize(state);
        let mut f_old = self.fission.total();
        if !(f_old > 0.0) {
            return Err(TransportError::ConfigError(
                "eigenvalue problem has no fission production".to_string(),
            ));
        }
        let mut k = state.eigenvalue();
        let mut density_old = self.fission.density().clone();

        let mut history = Vec::new();
        let mut k_residual = f64::INFINITY;
        let mut flux_residual = f64::INFINITY;
        let mut outer_iterations = 0;
        let mut approximate = false;
        let mut converged = false;
        let mut iteration = 0;

        while iteration < input.eigen_max_iters {
            iteration += 1;
            self.fission.setup_outer(1.0 / k);
            let mg = self.mg.solve(state, Some(&self.fission))?;
            outer_iterations += mg.iterations;
            approximate |= mg.approximate;

            self.fission.update(state);
            let f_new = self.fission.total();
            if !(f_new > 0.0) {
                return Err(TransportError::LinAlg(format!(
                    "fission production vanished at power iteration {iteration}"
                )));
            }
            let k_new = k * f_new / f_old;

            self.fission.normalize();
            state.scale(1.0 / f_new);
            flux_residual = self
                .fission
                .density()
                .iter()
                .zip(density_old.iter())
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max);
            density_old.assign(self.fission.density());

            k_residual = (k_new - k).abs();
            k = k_new;
            f_old = 1.0;
            state.set_eigenvalue(k);
            history.push(k);

            log::trace!("PI iter {iteration}: k = {k:.8}, |dk| = {k_residual:.3e}, shape = {flux_residual:.3e}");
            if input.eigen_print_level >= 2 && iteration % input.eigen_print_interval == 0 {
                log::info!("PI iter {iteration:>4}  k {k:.8}  |dk| {k_residual:.3e}  shape {flux_residual:.3e}");
            }
            if k_residual < input.eigen_tolerance && flux_residual < input.eigen_tolerance {
                converged = true;
                break;
            }
        }

        let solve_time_ms = start.elapsed().as_secs_f64() * 1000.0;
        if converged && input.eigen_print_level >= 1 {
            log::info!("k-eigenvalue {k:.8} after {iteration} power iterations ({solve_time_ms:.1} ms)");
        } else if !converged {
            log::warn!(
                "power iteration did not converge in {iteration} iterations: k = {k:.8}, \
                 |dk| = {k_residual:.3e}, shape = {flux_residual:.3e}"
            );
        }
        Ok(EigenResult {
            keff: k,
            converged,
            iterations: iteration,
            k_residual,
            flux_residual,
            history,
            outer_iterations,
            approximate,
            solve_time_ms,
        })
    }
}

/// Builds an eigensolver around an assembled multigroup solver.
pub type EigenFactory =
    for<'a> fn(Problem<'a>, MultigroupSolver<'a>) -> TransportResult<Box<dyn EigenSolver + 'a>>;

/// Whether a name can be built by a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Available,
    /// Known name without a linked backend.
    Unavailable,
    Unknown,
}

fn power_iteration<'a>(problem: Problem<'a>, mg: MultigroupSolver<'a>) -> TransportResult<Box<dyn EigenSolver + 'a>> {
    Ok(Box::new(PowerIteration::new(problem, mg)))
}

/// Name to factory map. Names are matched case-insensitively.
#[derive(Clone)]
pub struct EigenSolverRegistry {
    factories: BTreeMap<String, Option<EigenFactory>>,
}

impl Default for EigenSolverRegistry {
    fn default() -> Self {
        let mut factories: BTreeMap<String, Option<EigenFactory>> = BTreeMap::new();
        factories.insert("pi".to_string(), Some(power_iteration));
        factories.insert("power-iteration".to_string(), Some(power_iteration));
        factories.insert("slepc".to_string(), None);
        EigenSolverRegistry { factories }
    }
}

impl EigenSolverRegistry {
    /// Install or replace the factory for `name`.
    pub fn register(&mut self, name: &str, factory: EigenFactory) {
        self.factories.insert(name.to_ascii_lowercase(), Some(factory));
    }

    pub fn status(&self, name: &str) -> BackendStatus {
        match self.factories.get(&name.to_ascii_lowercase()) {
            Some(Some(_)) => BackendStatus::Available,
            Some(None) => BackendStatus::Unavailable,
            None => BackendStatus::Unknown,
        }
    }

    /// Names with a usable factory.
    pub fn available(&self) -> Vec<&str> {
        self.factories
            .iter()
            .filter(|(_, f)| f.is_some())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn build<'a>(
        &self,
        name: &str,
        problem: Problem<'a>,
        mg: MultigroupSolver<'a>,
    ) -> TransportResult<Box<dyn EigenSolver + 'a>> {
        match self.factories.get(&name.to_ascii_lowercase()) {
            Some(Some(factory)) => factory(problem, mg),
            Some(None) => Err(TransportError::BackendUnavailable {
                kind: "eigen solver".to_string(),
                name: name.to_string(),
                reason: "no backend is linked into this build".to_string(),
            }),
            None => Err(TransportError::unsupported("eigen solver", name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::build_multigroup_solver;
    use transport_types::config::{BoundaryCondition, BoundaryConditions, SolverInput};
    use transport_types::material::Material;
    use transport_types::mesh::Mesh;
    use transport_types::quadrature::Quadrature;

    fn reflective_input(groups: usize) -> SolverInput {
        let mut input = SolverInput::new(groups);
        input.boundary = BoundaryConditions::uniform(BoundaryCondition::Reflect);
        input.eigen_tolerance = 1e-8;
        input.outer_tolerance = 1e-10;
        input.inner_tolerance = 1e-10;
        input
    }

    fn one_group() -> Material {
        let mut mat = Material::new(1, 1).unwrap();
        mat.set_group_data(0, &[1.0], &[0.6], &[1.0]).unwrap();
        mat.set_sigma_s(0, 0, 0, 0.5).unwrap();
        mat
    }

    #[test]
    fn test_reflective_slab_k_infinity() {
        let mesh = Mesh::uniform(1, 8, 4.0, 0).unwrap();
        let mat = one_group();
        let quad = Quadrature::gauss_legendre(4).unwrap();
        let input = reflective_input(1);
        let problem = Problem::new(&input, &mesh, &mat, &quad).unwrap();
        let mg = build_multigroup_solver(problem).unwrap();
        let mut pi = PowerIteration::new(problem, mg);
        let mut state = State::new(1, 8);
        let result = pi.solve(&mut state).unwrap();
        assert!(result.converged);
        assert!((result.keff - 1.2).abs() < 1e-6, "k = {}", result.keff);
        assert_eq!(state.eigenvalue(), result.keff);
        assert_eq!(result.history.len(), result.iterations);
        assert!((pi.fission_source().total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_fission_is_config_error() {
        let mesh = Mesh::uniform(1, 4, 4.0, 0).unwrap();
        let mut mat = Material::new(1, 1).unwrap();
        mat.set_group_data(0, &[1.0], &[0.0], &[0.0]).unwrap();
        let quad = Quadrature::gauss_legendre(2).unwrap();
        let input = reflective_input(1);
        let problem = Problem::new(&input, &mesh, &mat, &quad).unwrap();
        let mg = build_multigroup_solver(problem).unwrap();
        let err = PowerIteration::new(problem, mg).solve(&mut State::new(1, 4)).unwrap_err();
        assert!(matches!(err, TransportError::ConfigError(_)));
    }

    #[test]
    fn test_iteration_cap_reports_nonconvergence() {
        let mesh = Mesh::uniform(1, 10, 20.0, 0).unwrap();
        let mat = one_group();
        let quad = Quadrature::gauss_legendre(4).unwrap();
        let mut input = SolverInput::new(1);
        input.eigen_max_iters = 2;
        input.eigen_tolerance = 1e-12;
        let problem = Problem::new(&input, &mesh, &mat, &quad).unwrap();
        let mg = build_multigroup_solver(problem).unwrap();
        let result = PowerIteration::new(problem, mg).solve(&mut State::new(1, 10)).unwrap();
        assert!(!result.converged);
        assert_eq!(result.iterations, 2);
        assert!(result.keff.is_finite() && result.keff > 0.0);
    }

    #[test]
    fn test_capped_solves_resume_from_state() {
        use crate::manager::EigenvalueManager;

        let mesh = Mesh::uniform(1, 20, 10.0, 0).unwrap();
        let mat = one_group();
        let quad = Quadrature::gauss_legendre(4).unwrap();
        let mut input = SolverInput::new(1);
        input.boundary.bc_west = BoundaryCondition::Reflect;
        input.eigen_tolerance = 1e-8;
        input.outer_tolerance = 1e-10;
        input.inner_tolerance = 1e-10;

        let problem = Problem::new(&input, &mesh, &mat, &quad).unwrap();
        let full = EigenvalueManager::new(problem).unwrap().solve().unwrap();
        assert!(full.converged);

        input.eigen_max_iters = 3;
        let problem = Problem::new(&input, &mesh, &mat, &quad).unwrap();
        let mut manager = EigenvalueManager::new(problem).unwrap();
        let mut total = 0;
        let mut last = None;
        for _ in 0..200 {
            let result = manager.solve().unwrap();
            total += result.iterations;
            let done = result.converged;
            last = Some(result);
            if done {
                break;
            }
        }
        let last = last.unwrap();
        assert!(last.converged, "capped solves never converged");
        assert!((last.keff - full.keff).abs() < 1e-7, "{} vs {}", last.keff, full.keff);
        assert_eq!(manager.state().eigenvalue(), last.keff);
        // Each restart picks up the flux and k where the previous call stopped.
        assert!(
            total <= full.iterations + 6,
            "resumed total {total} vs uncapped {}",
            full.iterations
        );
    }

    #[test]
    fn test_registry_status() {
        let registry = EigenSolverRegistry::default();
        assert_eq!(registry.status("PI"), BackendStatus::Available);
        assert_eq!(registry.status("SLEPc"), BackendStatus::Unavailable);
        assert_eq!(registry.status("ARPACK"), BackendStatus::Unknown);
        assert!(registry.available().contains(&"pi"));
        assert!(!registry.available().contains(&"slepc"));
    }

    #[test]
    fn test_registry_build_errors_differ() {
        let mesh = Mesh::uniform(1, 2, 2.0, 0).unwrap();
        let mat = one_group();
        let quad = Quadrature::gauss_legendre(2).unwrap();
        let input = reflective_input(1);
        let problem = Problem::new(&input, &mesh, &mat, &quad).unwrap();
        let registry = EigenSolverRegistry::default();

        let err = registry
            .build("SLEPc", problem, build_multigroup_solver(problem).unwrap())
            .err()
            .unwrap();
        assert!(matches!(err, TransportError::BackendUnavailable { .. }));
        let err = registry
            .build("lanczos", problem, build_multigroup_solver(problem).unwrap())
            .err()
            .unwrap();
        assert!(matches!(err, TransportError::UnsupportedSolver { .. }));
        let solver = registry
            .build("Pi", problem, build_multigroup_solver(problem).unwrap())
            .unwrap();
        assert_eq!(solver.name(), "power-iteration");
    }

    #[test]
    fn test_register_external_backend() {
        fn custom<'a>(problem: Problem<'a>, mg: MultigroupSolver<'a>) -> TransportResult<Box<dyn EigenSolver + 'a>> {
            Ok(Box::new(PowerIteration::new(problem, mg)))
        }
        let mut registry = EigenSolverRegistry::default();
        registry.register("SLEPc", custom);
        assert_eq!(registry.status("slepc"), BackendStatus::Available);
    }
}
