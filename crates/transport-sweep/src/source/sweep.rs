// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Sweep Source
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::Array1;
use transport_types::source::ExternalSource;
use transport_types::state::State;

use super::fission::FissionSource;
use super::scatter::ScatterSource;

/// Right-hand side of a within-group sweep.
#[derive(Debug, Clone)]
pub struct SweepSource {
    fixed: Array1<f64>,
    total: Array1<f64>,
}

impl SweepSource {
    pub fn new(number_cells: usize) -> Self {
        SweepSource {
            fixed: Array1::zeros(number_cells),
            total: Array1::zeros(number_cells),
        }
    }

    pub fn number_cells(&self) -> usize {
        self.fixed.len()
    }

    /// Group-`g` source that stays constant during one within-group solve:
    /// in-scatter, fission and external contributions.
    pub fn build_fixed(
        &mut self,
        g: usize,
        state: &State,
        scatter: &ScatterSource<'_>,
        fission: Option<&FissionSource<'_>>,
        external: Option<&ExternalSource>,
    ) {
        self.fixed = scatter.in_scatter(g, state);
        if let Some(f) = fission {
            f.add_source(g, &mut self.fixed);
        }
        if let Some(ext) = external {
            self.fixed += &ext.group(g);
        }
    }

    pub fn set_fixed(&mut self, fixed: Array1<f64>) {
        self.fixed = fixed;
    }

    pub fn fixed(&self) -> &Array1<f64> {
        &self.fixed
    }

    /// Fixed source plus within-group scatter of `phi`.
    pub fn build_within_group(&mut self, g: usize, phi: &Array1<f64>, scatter: &ScatterSource<'_>) -> &Array1<f64> {
        self.total.assign(&self.fixed);
        scatter.add_within_group(g, phi, &mut self.total);
        &self.total
    }

    /// Within-group scatter of `phi` alone, for the homogeneous operator.
    pub fn build_scatter_only(&mut self, g: usize, phi: &Array1<f64>, scatter: &ScatterSource<'_>) -> &Array1<f64> {
        self.total.fill(0.0);
        scatter.add_within_group(g, phi, &mut self.total);
        &self.total
    }

    /// Source last built by one of the `build_*` calls.
    pub fn total(&self) -> &Array1<f64> {
        &self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transport_types::material::Material;
    use transport_types::mesh::Mesh;

    #[test]
    fn test_fixed_plus_within_group() {
        let mesh = Mesh::uniform(1, 3, 3.0, 0).unwrap();
        let mut mat = Material::new(1, 2).unwrap();
        mat.set_group_data(0, &[1.0, 1.0], &[0.5, 0.5], &[1.0, 0.0]).unwrap();
        mat.set_sigma_s(0, 0, 0, 0.2).unwrap();
        mat.set_sigma_s(0, 0, 1, 0.1).unwrap();
        let scatter = ScatterSource::new(&mesh, &mat, false);

        let mut state = State::new(2, 3);
        state.set_phi(1, Array1::from_elem(3, 2.0));
        let mut fission = FissionSource::new(&mesh, &mat, false);
        fission.update(&state);
        fission.setup_outer(1.0);
        let external = ExternalSource::uniform(&mesh, &[0.3, 0.0]);

        let mut q = SweepSource::new(3);
        q.build_fixed(0, &state, &scatter, Some(&fission), Some(&external));
        // 0.1·2 + 1.0·(0.5·2) + 0.3
        for &v in q.fixed().iter() {
            assert!((v - 1.5).abs() < 1e-14);
        }
        let total = q.build_within_group(0, &Array1::from_elem(3, 5.0), &scatter);
        assert!(total.iter().all(|&v| (v - 2.5).abs() < 1e-14));

        let homogeneous = q.build_scatter_only(0, &Array1::from_elem(3, 5.0), &scatter);
        assert!(homogeneous.iter().all(|&v| (v - 1.0).abs() < 1e-14));
    }
}
