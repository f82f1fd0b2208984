// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Source Iteration
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Source iteration: `φ^{l+1} = D L⁻¹ (q + S φ^l)`.
//!
//! Reflective boundaries are updated after every direction, so the
//! incident flux converges together with the scatter source.

use ndarray::Array1;
use transport_sweep::source::{ScatterSource, SweepSource};
use transport_sweep::sweeper::Sweep;
use transport_types::error::TransportResult;
use transport_types::state::State;

use super::{relative_change, InnerControl, WgResult, WithinGroupSolver};
use crate::dsa::Dsa;

pub struct SourceIteration<'a> {
    sweeper: Box<dyn Sweep + 'a>,
    scatter: ScatterSource<'a>,
    dsa: Option<Dsa<'a>>,
    control: InnerControl,
}

impl<'a> SourceIteration<'a> {
    pub fn new(
        sweeper: Box<dyn Sweep + 'a>,
        scatter: ScatterSource<'a>,
        dsa: Option<Dsa<'a>>,
        control: InnerControl,
    ) -> Self {
        SourceIteration {
            sweeper,
            scatter,
            dsa,
            control,
        }
    }
}

impl WithinGroupSolver for SourceIteration<'_> {
    fn name(&self) -> &'static str {
        if self.dsa.is_some() {
            "SI+DSA"
        } else {
            "SI"
        }
    }

    fn solve(&mut self, g: usize, state: &mut State, source: &mut SweepSource) -> TransportResult<WgResult> {
        let label = self.name();
        self.sweeper.setup_group(g);
        self.sweeper.set_update_boundary(true);
        self.sweeper.boundary_mut().set(g);

        let mut phi_old = state.phi(g).clone();
        let mut phi = Array1::zeros(phi_old.len());
        let mut history = Vec::new();
        let mut converged = false;
        let mut iteration = 0;

        while iteration < self.control.max_iters {
            iteration += 1;
            let q = source.build_within_group(g, &phi_old, &self.scatter);
            self.sweeper.sweep(q, &mut phi);
            if let Some(dsa) = self.dsa.as_mut() {
                dsa.correct(g, &mut phi, &phi_old)?;
            }

            let residual = relative_change(&phi, &phi_old);
            history.push(residual);
            self.control.progress(label, g, iteration, residual);
            std::mem::swap(&mut phi, &mut phi_old);
            if residual < self.control.tolerance {
                converged = true;
                break;
            }
        }

        // phi_old now holds the latest iterate.
        state.set_phi(g, phi_old);
        if let Some(psi) = self.sweeper.angular_flux() {
            state.set_angular_flux(g, psi);
        }
        let result = WgResult {
            converged,
            iterations: iteration,
            residual: history.last().copied().unwrap_or(0.0),
            history,
        };
        self.control.summary(label, g, &result);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transport_sweep::sweeper::SnSweeper;
    use transport_types::config::{BoundaryCondition, BoundaryConditions, SolverInput};
    use transport_types::material::Material;
    use transport_types::mesh::Mesh;
    use transport_types::problem::Problem;
    use transport_types::quadrature::Quadrature;

    fn scatterer(sigma_t: f64, c: f64) -> Material {
        let mut mat = Material::new(1, 1).unwrap();
        mat.set_sigma_t(0, 0, sigma_t).unwrap();
        mat.set_sigma_s(0, 0, 0, c * sigma_t).unwrap();
        mat
    }

    fn run(input: &SolverInput, mesh: &Mesh, mat: &Material, quad: &Quadrature, q: f64) -> (WgResult, State) {
        let problem = Problem::new(input, mesh, mat, quad).unwrap();
        let sweeper = Box::new(SnSweeper::from_problem(problem).unwrap());
        let scatter = ScatterSource::new(mesh, mat, false);
        let dsa = input.inner_use_dsa.then(|| Dsa::new(problem).unwrap());
        let mut si = SourceIteration::new(sweeper, scatter, dsa, InnerControl::from_problem(&problem));
        let mut state = State::new(1, mesh.number_cells());
        let mut source = SweepSource::new(mesh.number_cells());
        source.set_fixed(Array1::from_elem(mesh.number_cells(), q));
        let result = si.solve(0, &mut state, &mut source).unwrap();
        (result, state)
    }

    #[test]
    fn test_infinite_medium_with_scatter() {
        let mesh = Mesh::uniform(1, 8, 8.0, 0).unwrap();
        let mat = scatterer(1.0, 0.5);
        let quad = Quadrature::gauss_legendre(4).unwrap();
        let mut input = SolverInput::new(1);
        input.boundary = BoundaryConditions::uniform(BoundaryCondition::Reflect);
        input.inner_tolerance = 1e-10;
        let (result, state) = run(&input, &mesh, &mat, &quad, 1.0);
        assert!(result.converged);
        // φ = q / σa
        for &p in state.phi(0).iter() {
            assert!((p - 2.0).abs() < 1e-8, "phi = {p}");
        }
    }

    #[test]
    fn test_cap_keeps_iterate() {
        let mesh = Mesh::uniform(1, 8, 8.0, 0).unwrap();
        let mat = scatterer(1.0, 0.99);
        let quad = Quadrature::gauss_legendre(4).unwrap();
        let mut input = SolverInput::new(1);
        input.inner_max_iters = 3;
        input.inner_tolerance = 1e-12;
        let (result, state) = run(&input, &mesh, &mat, &quad, 1.0);
        assert!(!result.converged);
        assert_eq!(result.iterations, 3);
        assert_eq!(result.history.len(), 3);
        assert!(state.phi(0).iter().all(|&p| p > 0.0));
    }

    #[test]
    fn test_dsa_reduces_iterations() {
        // Optically thin cells, high scattering ratio.
        let mesh = Mesh::uniform(1, 40, 10.0, 0).unwrap();
        let mat = scatterer(1.0, 0.95);
        let quad = Quadrature::gauss_legendre(8).unwrap();
        let mut input = SolverInput::new(1);
        input.inner_tolerance = 1e-8;
        input.inner_max_iters = 2000;
        let (plain, phi_plain) = run(&input, &mesh, &mat, &quad, 1.0);
        input.inner_use_dsa = true;
        let (accelerated, phi_dsa) = run(&input, &mesh, &mat, &quad, 1.0);

        assert!(plain.converged && accelerated.converged);
        assert!(
            accelerated.iterations * 2 < plain.iterations,
            "DSA {} vs SI {}",
            accelerated.iterations,
            plain.iterations
        );
        for (a, b) in phi_plain.phi(0).iter().zip(phi_dsa.phi(0).iter()) {
            assert!((a - b).abs() < 1e-5 * a.abs().max(1.0), "{a} vs {b}");
        }
    }
}
