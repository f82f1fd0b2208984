// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Multigroup Solver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Gauss-Seidel over energy groups.
//!
//! Groups are solved in order (ascending; descending for adjoint, whose
//! coupling is transposed). Groups ahead of the first one that receives
//! scatter from a later group need a single solve; the remaining block
//! is iterated until the relative flux change drops below
//! `outer_tolerance`.

use ndarray::Array1;
use transport_sweep::source::{FissionSource, ScatterSource, SweepSource};
use transport_types::error::{TransportError, TransportResult};
use transport_types::problem::Problem;
use transport_types::state::State;

use crate::dsa::MgDsa;
use crate::wg::{relative_change, WithinGroupSolver};

/// Outcome of one multigroup solve.
#[derive(Debug, Clone)]
pub struct MgResult {
    pub converged: bool,
    pub iterations: usize,
    pub residual: f64,
    pub history: Vec<f64>,
    /// Single pass forced on a problem with upscatter.
    pub approximate: bool,
    /// Within-group iterations summed over every group solve.
    pub inner_iterations: usize,
}

pub struct MultigroupSolver<'a> {
    problem: Problem<'a>,
    wg: Box<dyn WithinGroupSolver + 'a>,
    scatter: ScatterSource<'a>,
    source: SweepSource,
    order: Vec<usize>,
    lagged_start: usize,
    single_pass: bool,
    approximate: bool,
    mg_dsa: Option<MgDsa<'a>>,
}

/// First position in `order` whose group receives scatter from a group
/// later in `order`; `order.len()` when there is none.
pub fn lagged_start(order: &[usize], number_materials: usize, scatter: &ScatterSource<'_>) -> usize {
    (0..order.len())
        .find(|&p| {
            order[p + 1..]
                .iter()
                .any(|&gp| (0..number_materials).any(|m| scatter.coupling(m, order[p], gp) != 0.0))
        })
        .unwrap_or(order.len())
}

impl<'a> MultigroupSolver<'a> {
    pub fn new(problem: Problem<'a>, wg: Box<dyn WithinGroupSolver + 'a>) -> TransportResult<Self> {
        let input = problem.input;
        if !input.outer_solver.eq_ignore_ascii_case("gs") {
            return Err(TransportError::unsupported("multigroup solver", &input.outer_solver));
        }
        let groups = problem.number_groups();
        let order: Vec<usize> = if input.adjoint {
            (0..groups).rev().collect()
        } else {
            (0..groups).collect()
        };
        let scatter = ScatterSource::new(problem.mesh, problem.material, input.adjoint);
        let lagged_start = lagged_start(&order, problem.material.number_materials(), &scatter);
        let has_upscatter = lagged_start < groups;
        let single_pass = input.outer_downscatter.unwrap_or(!has_upscatter);
        let approximate = single_pass && has_upscatter;
        if approximate {
            log::warn!(
                "single-pass multigroup solve forced on a problem with upscatter into group {}; \
                 the result ignores lagged scatter",
                order[lagged_start]
            );
        }

        let mg_dsa = if input.outer_use_dsa && !single_pass && has_upscatter {
            let block = &order[lagged_start..];
            let lo = block.iter().copied().min().unwrap_or(0);
            let hi = block.iter().copied().max().unwrap_or(0);
            Some(MgDsa::new(problem, lo..hi + 1)?)
        } else {
            None
        };

        log::debug!(
            "multigroup GS: order {:?}, lagged block from position {}, single pass {}",
            order,
            lagged_start,
            single_pass
        );

        Ok(MultigroupSolver {
            problem,
            wg,
            scatter,
            source: SweepSource::new(problem.number_cells()),
            order,
            lagged_start,
            single_pass,
            approximate,
            mg_dsa,
        })
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn lagged_start(&self) -> usize {
        self.lagged_start
    }

    pub fn is_single_pass(&self) -> bool {
        self.single_pass
    }

    pub fn wg_solver_name(&self) -> &'static str {
        self.wg.name()
    }

    fn solve_group(&mut self, g: usize, state: &mut State, fission: Option<&FissionSource<'_>>) -> TransportResult<usize> {
        self.source
            .build_fixed(g, state, &self.scatter, fission, self.problem.external_source);
        let result = self.wg.solve(g, state, &mut self.source)?;
        Ok(result.iterations)
    }

    /// Solve every group of `state`. `fission` is the eigenvalue source
    /// already scaled by `1/k`; fixed-source problems pass `None`.
    pub fn solve(&mut self, state: &mut State, fission: Option<&FissionSource<'_>>) -> TransportResult<MgResult> {
        let input = self.problem.input;
        let order = self.order.clone();
        let mut inner_iterations = 0;

        if self.single_pass {
            let old: Vec<Array1<f64>> = order.iter().map(|&g| state.phi(g).clone()).collect();
            for &g in &order {
                inner_iterations += self.solve_group(g, state, fission)?;
            }
            let residual = order
                .iter()
                .zip(&old)
                .map(|(&g, o)| relative_change(state.phi(g), o))
                .fold(0.0, f64::max);
            if input.outer_print_level >= 1 {
                log::info!("  MG single pass: change {residual:.3e}, {inner_iterations} inner iterations");
            }
            return Ok(MgResult {
                converged: true,
                iterations: 1,
                residual,
                history: vec![residual],
                approximate: self.approximate,
                inner_iterations,
            });
        }

        for &g in &order[..self.lagged_start] {
            inner_iterations += self.solve_group(g, state, fission)?;
        }

        let block = &order[self.lagged_start..];
        let mut history = Vec::new();
        let mut converged = false;
        let mut iteration = 0;
        while iteration < input.outer_max_iters {
            iteration += 1;
            let old: Vec<Array1<f64>> = block.iter().map(|&g| state.phi(g).clone()).collect();
            for &g in block {
                inner_iterations += self.solve_group(g, state, fission)?;
            }
            if let Some(dsa) = self.mg_dsa.as_mut() {
                dsa.correct(state, block, &old)?;
            }

            let residual = block
                .iter()
                .zip(&old)
                .map(|(&g, o)| relative_change(state.phi(g), o))
                .fold(0.0, f64::max);
            history.push(residual);
            log::trace!("MG iter {iteration}: residual = {residual:.6e}");
            if input.outer_print_level >= 2 && iteration % input.outer_print_interval == 0 {
                log::info!("  MG iter {iteration:>4}  residual {residual:.3e}");
            }
            if residual < input.outer_tolerance {
                converged = true;
                break;
            }
        }

        let residual = history.last().copied().unwrap_or(0.0);
        if !converged {
            log::warn!("multigroup GS did not converge in {iteration} iterations: residual = {residual:.3e}");
        } else if input.outer_print_level >= 1 {
            log::info!("  MG converged in {iteration} iterations, residual {residual:.3e}");
        }
        Ok(MgResult {
            converged,
            iterations: iteration,
            residual,
            history,
            approximate: false,
            inner_iterations,
        })
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
    use transport_types::source::ExternalSource;

    fn three_group(upscatter: bool) -> Material {
        let mut mat = Material::new(1, 3).unwrap();
        mat.set_group_data(0, &[1.0, 1.5, 2.0], &[0.0; 3], &[0.0; 3]).unwrap();
        mat.set_sigma_s(0, 0, 0, 0.5).unwrap();
        mat.set_sigma_s(0, 1, 0, 0.3).unwrap();
        mat.set_sigma_s(0, 1, 1, 1.0).unwrap();
        mat.set_sigma_s(0, 2, 1, 0.3).unwrap();
        mat.set_sigma_s(0, 2, 2, 1.5).unwrap();
        if upscatter {
            mat.set_sigma_s(0, 1, 2, 0.2).unwrap();
        }
        mat
    }

    fn setup(input: &mut SolverInput) {
        input.boundary = BoundaryConditions::uniform(BoundaryCondition::Reflect);
        input.inner_tolerance = 1e-10;
        input.outer_tolerance = 1e-9;
    }

    #[test]
    fn test_lagged_start() {
        let mesh = Mesh::uniform(1, 2, 1.0, 0).unwrap();
        let down = three_group(false);
        let up = three_group(true);
        let fwd = [0, 1, 2];
        assert_eq!(lagged_start(&fwd, 1, &ScatterSource::new(&mesh, &down, false)), 3);
        assert_eq!(lagged_start(&fwd, 1, &ScatterSource::new(&mesh, &up, false)), 1);
        // Adjoint of downscatter: descending order sees no lag.
        let rev = [2, 1, 0];
        assert_eq!(lagged_start(&rev, 1, &ScatterSource::new(&mesh, &down, true)), 3);
        assert_eq!(lagged_start(&rev, 1, &ScatterSource::new(&mesh, &up, true)), 0);
    }

    #[test]
    fn test_downscatter_single_pass() {
        let mesh = Mesh::uniform(1, 4, 4.0, 0).unwrap();
        let mat = three_group(false);
        let quad = Quadrature::gauss_legendre(4).unwrap();
        let mut input = SolverInput::new(3);
        setup(&mut input);
        input.outer_tolerance = 1e-14;
        let ext = ExternalSource::uniform(&mesh, &[1.0, 0.0, 0.0]);
        let problem = Problem::new(&input, &mesh, &mat, &quad)
            .unwrap()
            .with_external_source(&ext)
            .unwrap();
        let mut mg = build_multigroup_solver(problem).unwrap();
        let mut state = State::new(3, 4);
        let result = mg.solve(&mut state, None).unwrap();
        assert!(result.converged && !result.approximate);
        assert_eq!(result.iterations, 1);

        // Infinite medium balance: σr_0 φ0 = 1, σr_1 φ1 = 0.3 φ0, σr_2 φ2 = 0.3 φ1.
        let phi0 = 1.0 / 0.5;
        let phi1 = 0.3 * phi0 / 0.5;
        let phi2 = 0.3 * phi1 / 0.5;
        for (g, expected) in [phi0, phi1, phi2].into_iter().enumerate() {
            assert!((state.phi(g)[0] - expected).abs() < 1e-7, "group {g}");
        }
    }

    #[test]
    fn test_upscatter_iterates_to_balance() {
        let mesh = Mesh::uniform(1, 4, 4.0, 0).unwrap();
        let mat = three_group(true);
        let quad = Quadrature::gauss_legendre(4).unwrap();
        let mut input = SolverInput::new(3);
        setup(&mut input);
        input.outer_max_iters = 500;
        let ext = ExternalSource::uniform(&mesh, &[1.0, 0.0, 0.0]);
        let problem = Problem::new(&input, &mesh, &mat, &quad)
            .unwrap()
            .with_external_source(&ext)
            .unwrap();
        let mut mg = build_multigroup_solver(problem).unwrap();
        assert_eq!(mg.lagged_start(), 1);
        let mut state = State::new(3, 4);
        let result = mg.solve(&mut state, None).unwrap();
        assert!(result.converged);
        assert!(result.iterations > 1);

        // 0.5 φ1 = 0.3 φ0 + 0.2 φ2 and 0.5 φ2 = 0.3 φ1.
        let phi0 = 2.0;
        let phi1 = 0.6 / (0.5 - 0.2 * 0.3 / 0.5);
        let phi2 = 0.3 * phi1 / 0.5;
        assert!((state.phi(0)[0] - phi0).abs() < 1e-6);
        assert!((state.phi(1)[0] - phi1).abs() < 1e-6, "{} vs {}", state.phi(1)[0], phi1);
        assert!((state.phi(2)[0] - phi2).abs() < 1e-6);
    }

    #[test]
    fn test_single_iteration_cap_reports_first_residual() {
        let mesh = Mesh::uniform(1, 4, 4.0, 0).unwrap();
        let mat = three_group(true);
        let quad = Quadrature::gauss_legendre(4).unwrap();
        let mut input = SolverInput::new(3);
        setup(&mut input);
        input.outer_max_iters = 1;
        let ext = ExternalSource::uniform(&mesh, &[1.0, 0.0, 0.0]);
        let problem = Problem::new(&input, &mesh, &mat, &quad)
            .unwrap()
            .with_external_source(&ext)
            .unwrap();
        let mut mg = build_multigroup_solver(problem).unwrap();
        let mut state = State::new(3, 4);
        let result = mg.solve(&mut state, None).unwrap();
        assert!(!result.converged);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.history.len(), 1);
        assert_eq!(result.residual, result.history[0]);
    }

    #[test]
    fn test_forced_single_pass_is_approximate() {
        let mesh = Mesh::uniform(1, 2, 2.0, 0).unwrap();
        let mat = three_group(true);
        let quad = Quadrature::gauss_legendre(2).unwrap();
        let mut input = SolverInput::new(3);
        setup(&mut input);
        input.outer_downscatter = Some(true);
        let problem = Problem::new(&input, &mesh, &mat, &quad).unwrap();
        let mut mg = build_multigroup_solver(problem).unwrap();
        let result = mg.solve(&mut State::new(3, 2), None).unwrap();
        assert_eq!(result.iterations, 1);
        assert!(result.approximate);
        drop(mg);

        // Disabling the fast path on a downscatter problem iterates.
        let down = three_group(false);
        input.outer_downscatter = Some(false);
        let problem = Problem::new(&input, &mesh, &down, &quad).unwrap();
        let mg = build_multigroup_solver(problem).unwrap();
        assert!(!mg.is_single_pass());
    }

    #[test]
    fn test_unknown_outer_solver() {
        let mesh = Mesh::uniform(1, 2, 2.0, 0).unwrap();
        let mat = three_group(false);
        let quad = Quadrature::gauss_legendre(2).unwrap();
        let mut input = SolverInput::new(3);
        input.outer_solver = "Jacobi".to_string();
        let problem = Problem::new(&input, &mesh, &mat, &quad).unwrap();
        assert!(matches!(
            build_multigroup_solver(problem),
            Err(TransportError::UnsupportedSolver { .. })
        ));
    }

    #[test]
    fn test_multigroup_dsa_same_answer_fewer_passes() {
        let mesh = Mesh::uniform(1, 10, 10.0, 0).unwrap();
        let mut mat = three_group(true);
        // Strong thermal upscatter coupling.
        mat.set_sigma_s(0, 1, 2, 0.45).unwrap();
        mat.set_sigma_s(0, 2, 2, 1.5).unwrap();
        let quad = Quadrature::gauss_legendre(4).unwrap();
        let ext = ExternalSource::uniform(&mesh, &[1.0, 0.0, 0.0]);
        let mut input = SolverInput::new(3);
        input.inner_tolerance = 1e-11;
        input.outer_tolerance = 1e-8;
        input.outer_max_iters = 1000;

        let run = |input: &SolverInput| {
            let problem = Problem::new(input, &mesh, &mat, &quad)
                .unwrap()
                .with_external_source(&ext)
                .unwrap();
            let mut mg = build_multigroup_solver(problem).unwrap();
            let mut state = State::new(3, 10);
            let result = mg.solve(&mut state, None).unwrap();
            (result, state)
        };
        let (plain, s_plain) = run(&input);
        input.outer_use_dsa = true;
        let (dsa, s_dsa) = run(&input);
        assert!(plain.converged && dsa.converged);
        assert!(dsa.iterations < plain.iterations, "MG DSA {} vs GS {}", dsa.iterations, plain.iterations);
        for g in 0..3 {
            for (a, b) in s_plain.phi(g).iter().zip(s_dsa.phi(g).iter()) {
                assert!((a - b).abs() < 1e-5 * a.abs().max(1.0), "group {g}: {a} vs {b}");
            }
        }
    }
}
