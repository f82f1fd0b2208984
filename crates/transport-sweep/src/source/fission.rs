// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Fission Source
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fission density and the group fission source of an eigenvalue
//! problem.
//!
//! ```text
//! forward:  d = Σ_g νσf_g φ_g     q_g = scale · χ_g   · d
//! adjoint:  d = Σ_g χ_g   φ_g     q_g = scale · νσf_g · d
//! ```
//!
//! `scale` is `1/k` during power iteration.

use ndarray::Array1;
use transport_types::material::Material;
use transport_types::mesh::Mesh;
use transport_types::state::State;

#[derive(Debug, Clone)]
pub struct FissionSource<'a> {
    mesh: &'a Mesh,
    material: &'a Material,
    adjoint: bool,
    density: Array1<f64>,
    scale: f64,
}

impl<'a> FissionSource<'a> {
    pub fn new(mesh: &'a Mesh, material: &'a Material, adjoint: bool) -> Self {
        FissionSource {
            mesh,
            material,
            adjoint,
            density: Array1::zeros(mesh.number_cells()),
            scale: 1.0,
        }
    }

    #[inline]
    fn production(&self, m: usize, g: usize) -> f64 {
        if self.adjoint {
            self.material.chi(m, g)
        } else {
            self.material.nu_sigma_f(m, g)
        }
    }

    #[inline]
    fn emission(&self, m: usize, g: usize) -> f64 {
        if self.adjoint {
            self.material.nu_sigma_f(m, g)
        } else {
            self.material.chi(m, g)
        }
    }

    /// Starting density. A state with no flux gets a flat flux guess in
    /// every fissile cell; otherwise the density follows the state.
    /// The result is normalised to unit total.
    pub fn initialize(&mut self, state: &State) {
        if state.is_zero() {
            let groups = self.material.number_groups();
            let guess: Vec<f64> = (0..self.density.len())
                .map(|cell| {
                    let m = self.mesh.material(cell);
                    if self.material.is_fissile(m) {
                        (0..groups).map(|g| self.production(m, g)).sum()
                    } else {
                        0.0
                    }
                })
                .collect();
            self.density = Array1::from(guess);
        } else {
            self.update(state);
        }
        self.normalize();
    }

    /// Recompute the density from the current flux.
    pub fn update(&mut self, state: &State) {
        self.density.fill(0.0);
        for g in 0..state.number_groups() {
            let phi = state.phi(g);
            for cell in 0..self.density.len() {
                let p = self.production(self.mesh.material(cell), g);
                if p != 0.0 {
                    self.density[cell] += p * phi[cell];
                }
            }
        }
    }

    pub fn setup_outer(&mut self, scale: f64) {
        self.scale = scale;
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn density(&self) -> &Array1<f64> {
        &self.density
    }

    /// Volume-integrated density.
    pub fn total(&self) -> f64 {
        self.density
            .iter()
            .enumerate()
            .map(|(cell, d)| d * self.mesh.volume(cell))
            .sum()
    }

    /// Rescale the density to unit total. No-op on a zero density.
    pub fn normalize(&mut self) {
        let total = self.total();
        if total > 0.0 {
            self.density.mapv_inplace(|d| d / total);
        }
    }

    /// Fission source of group `g`.
    pub fn source(&self, g: usize) -> Array1<f64> {
        let mut q = Array1::zeros(self.density.len());
        self.add_source(g, &mut q);
        q
    }

    pub fn add_source(&self, g: usize, q: &mut Array1<f64>) {
        for (cell, qc) in q.iter_mut().enumerate() {
            let e = self.emission(self.mesh.material(cell), g);
            if e != 0.0 {
                *qc += self.scale * e * self.density[cell];
            }
        }
    }
}
