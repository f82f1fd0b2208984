// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::Array1;

/// Solution state: per-group scalar flux, optional angular flux and the
/// multiplication factor.
///
/// After every outer iteration of an eigenvalue solve the state holds a
/// consistent flux and `k`, so a later solve can restart from it.
#[derive(Debug, Clone)]
pub struct State {
    number_cells: usize,
    phi: Vec<Array1<f64>>,
    /// `[group][direction]` when angular flux storage is enabled.
    psi: Option<Vec<Vec<Array1<f64>>>>,
    eigenvalue: f64,
    adjoint: bool,
}

impl State {
    pub fn new(number_groups: usize, number_cells: usize) -> Self {
        State {
            number_cells,
            phi: vec![Array1::zeros(number_cells); number_groups],
            psi: None,
            eigenvalue: 1.0,
            adjoint: false,
        }
    }

    /// Enable angular flux storage for `number_directions` directions.
    pub fn with_angular_flux(mut self, number_directions: usize) -> Self {
        let groups = self.phi.len();
        self.psi = Some(vec![
            vec![Array1::zeros(self.number_cells); number_directions];
            groups
        ]);
        self
    }

    pub fn with_adjoint(mut self, adjoint: bool) -> Self {
        self.adjoint = adjoint;
        self
    }

    pub fn number_groups(&self) -> usize {
        self.phi.len()
    }

    pub fn number_cells(&self) -> usize {
        self.number_cells
    }

    pub fn phi(&self, g: usize) -> &Array1<f64> {
        &self.phi[g]
    }

    pub fn phi_mut(&mut self, g: usize) -> &mut Array1<f64> {
        &mut self.phi[g]
    }

    pub fn set_phi(&mut self, g: usize, phi: Array1<f64>) {
        self.phi[g] = phi;
    }

    pub fn eigenvalue(&self) -> f64 {
        self.eigenvalue
    }

    pub fn set_eigenvalue(&mut self, k: f64) {
        self.eigenvalue = k;
    }

    pub fn adjoint(&self) -> bool {
        self.adjoint
    }

    pub fn store_angular_flux(&self) -> bool {
        self.psi.is_some()
    }

    pub fn angular_flux(&self, g: usize, direction: usize) -> Option<&Array1<f64>> {
        self.psi.as_ref().map(|psi| &psi[g][direction])
    }

    /// Store angular flux for group `g`; ignored when storage is disabled.
    pub fn set_angular_flux(&mut self, g: usize, directions: &[Array1<f64>]) {
        if let Some(psi) = self.psi.as_mut() {
            for (stored, new) in psi[g].iter_mut().zip(directions) {
                stored.assign(new);
            }
        }
    }

    /// True while no group has any flux.
    pub fn is_zero(&self) -> bool {
        self.phi.iter().all(|p| p.iter().all(|&v| v == 0.0))
    }

    /// Multiply every flux component by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for p in self.phi.iter_mut() {
            p.mapv_inplace(|v| v * factor);
        }
        if let Some(psi) = self.psi.as_mut() {
            for dir in psi.iter_mut().flat_map(|g| g.iter_mut()) {
                dir.mapv_inplace(|v| v * factor);
            }
        }
    }
}
