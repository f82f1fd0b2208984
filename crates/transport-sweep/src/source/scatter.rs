// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Scatter Source
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Isotropic (P0) scattering source.

use ndarray::Array1;
use transport_types::material::Material;
use transport_types::mesh::Mesh;
use transport_types::state::State;

#[derive(Debug, Clone, Copy)]
pub struct ScatterSource<'a> {
    mesh: &'a Mesh,
    material: &'a Material,
    adjoint: bool,
}

impl<'a> ScatterSource<'a> {
    pub fn new(mesh: &'a Mesh, material: &'a Material, adjoint: bool) -> Self {
        ScatterSource {
            mesh,
            material,
            adjoint,
        }
    }

    pub fn adjoint(&self) -> bool {
        self.adjoint
    }

    /// Cross section carrying flux of group `gp` into group `g`.
    /// Adjoint problems use the transposed matrix.
    #[inline]
    pub fn coupling(&self, m: usize, g: usize, gp: usize) -> f64 {
        if self.adjoint {
            self.material.sigma_s(m, gp, g)
        } else {
            self.material.sigma_s(m, g, gp)
        }
    }

    /// `σs_gg φ_g` per cell.
    pub fn within_group(&self, g: usize, phi: &Array1<f64>) -> Array1<f64> {
        let mut q = Array1::zeros(phi.len());
        self.add_within_group(g, phi, &mut q);
        q
    }

    /// Add `σs_gg φ` to `q`.
    pub fn add_within_group(&self, g: usize, phi: &Array1<f64>, q: &mut Array1<f64>) {
        for (cell, (qc, &p)) in q.iter_mut().zip(phi.iter()).enumerate() {
            *qc += self.material.sigma_s(self.mesh.material(cell), g, g) * p;
        }
    }

    /// Scatter into `g` from every other group of `state`.
    pub fn in_scatter(&self, g: usize, state: &State) -> Array1<f64> {
        let mut q = Array1::zeros(state.number_cells());
        for gp in (0..state.number_groups()).filter(|&gp| gp != g) {
            self.add_group(g, gp, state.phi(gp), &mut q);
        }
        q
    }

    /// Add the contribution of flux `phi` in group `gp` to group `g`.
    pub fn add_group(&self, g: usize, gp: usize, phi: &Array1<f64>, q: &mut Array1<f64>) {
        for (cell, (qc, &p)) in q.iter_mut().zip(phi.iter()).enumerate() {
            let c = self.coupling(self.mesh.material(cell), g, gp);
            if c != 0.0 {
                *qc += c * p;
            }
        }
    }
}
