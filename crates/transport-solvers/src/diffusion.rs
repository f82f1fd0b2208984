// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Diffusion Loss Operator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Cell-centred finite-volume diffusion operator over a block of groups.
//!
//! Row `(g, i)` of the assembled matrix, per unit volume:
//!
//! ```text
//! Σ_faces κ_f (δ_i − δ_j) + (σt − σs_gg) δ_i − Σ_{g'≠g} σs(g←g') δ_{g',i}
//! interior:  κ = 2 D_i D_j / (h_i (D_i h_j + D_j h_i))
//! Marshak:   κ = 2 D / (h (h + 4D))       (vacuum, fixed)
//! reflect:   κ = 0
//! ```
//!
//! Group coupling is restricted to the block; a single-group block gives
//! the within-group operator used by DSA.

use std::ops::Range;

use ndarray::Array1;
use transport_math::matrix::{InsertMode, Matrix, MatrixBuilder};
use transport_sweep::boundary::{Boundary, BoundaryDiffusion};
use transport_types::config::BoundaryCondition;
use transport_types::constants::side_axis;
use transport_types::error::TransportResult;
use transport_types::material::Material;
use transport_types::mesh::Mesh;

pub struct DiffusionLossOperator<'a> {
    mesh: &'a Mesh,
    material: &'a Material,
    boundary: &'a BoundaryDiffusion,
    groups: Range<usize>,
    adjoint: bool,
}

impl<'a> DiffusionLossOperator<'a> {
    pub fn new(
        mesh: &'a Mesh,
        material: &'a Material,
        boundary: &'a BoundaryDiffusion,
        groups: Range<usize>,
        adjoint: bool,
    ) -> Self {
        DiffusionLossOperator {
            mesh,
            material,
            boundary,
            groups,
            adjoint,
        }
    }

    /// Unknowns in the block.
    pub fn size(&self) -> usize {
        self.groups.len() * self.mesh.number_cells()
    }

    /// Row of cell `cell` in group `g` (an absolute group index).
    #[inline]
    pub fn index(&self, g: usize, cell: usize) -> usize {
        (g - self.groups.start) * self.mesh.number_cells() + cell
    }

    fn coupling(&self, m: usize, g: usize, gp: usize) -> f64 {
        if self.adjoint {
            self.material.sigma_s(m, gp, g)
        } else {
            self.material.sigma_s(m, g, gp)
        }
    }

    pub fn assemble(&self) -> TransportResult<Matrix> {
        let mesh = self.mesh;
        let n = self.size();
        let mut builder = MatrixBuilder::new(n, n);
        builder.preallocate_uniform(1 + mesh.number_sides() + self.groups.len() - 1)?;

        for g in self.groups.clone() {
            for cell in 0..mesh.number_cells() {
                let m = mesh.material(cell);
                let row = self.index(g, cell);
                let d_i = self.material.diff_coef(m, g);
                let mut diagonal = self.material.sigma_t(m, g) - self.coupling(m, g, g);

                for side in 0..mesh.number_sides() {
                    let axis = side_axis(side);
                    let h_i = mesh.cell_width(cell, axis);
                    match mesh.neighbor(cell, side) {
                        Some(nb) => {
                            let h_j = mesh.cell_width(nb, axis);
                            let d_j = self.material.diff_coef(mesh.material(nb), g);
                            let kappa = 2.0 * d_i * d_j / (h_i * (d_i * h_j + d_j * h_i));
                            diagonal += kappa;
                            builder.insert(row, self.index(g, nb), -kappa, InsertMode::Add)?;
                        }
                        None => diagonal += self.boundary_coefficient(side, d_i, h_i),
                    }
                }
                builder.insert(row, row, diagonal, InsertMode::Add)?;

                for gp in self.groups.clone().filter(|&gp| gp != g) {
                    let c = self.coupling(m, g, gp);
                    if c != 0.0 {
                        builder.insert(row, self.index(gp, cell), -c, InsertMode::Add)?;
                    }
                }
            }
        }
        builder.assemble()
    }

    fn boundary_coefficient(&self, side: usize, d: f64, h: f64) -> f64 {
        match self.boundary.condition(side) {
            BoundaryCondition::Reflect => 0.0,
            _ => 2.0 * d / (h * (h + 4.0 * d)),
        }
    }

    /// Source from incident partial currents on Marshak sides,
    /// `8 D J⁻ / (h (h + 4D))` per boundary cell.
    ///
    /// Only needed for a standalone diffusion solve of the flux itself.
    /// DSA corrections solve for an error with zero incident current and
    /// never add this term.
    pub fn boundary_source(&self) -> Array1<f64> {
        let mesh = self.mesh;
        let mut q = Array1::zeros(self.size());
        for side in 0..mesh.number_sides() {
            if self.boundary.is_reflective(side) {
                continue;
            }
            let axis = side_axis(side);
            for g in self.groups.clone() {
                let incident = self.boundary.incident(side, g);
                for cell in (0..mesh.number_cells()).filter(|&c| mesh.neighbor(c, side).is_none()) {
                    let ijk = mesh.cell_to_ijk(cell);
                    let j_in = incident[mesh.face_index(axis, ijk)];
                    if j_in == 0.0 {
                        continue;
                    }
                    let d = self.material.diff_coef(mesh.material(cell), g);
                    let h = mesh.cell_width(cell, axis);
                    q[self.index(g, cell)] += 8.0 * d * j_in / (h * (h + 4.0 * d));
                }
            }
        }
        q
    }
}
