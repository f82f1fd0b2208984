// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Discrete-Ordinates Sweep
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Transport sweep: one application of `L⁻¹` for every direction of the
//! quadrature, accumulated into the scalar flux.
//!
//! Cell balance for direction `Ω` with incident face fluxes `ψin_d`:
//!
//! ```text
//! ψc = (q + Σ_d c_d ψin_d) / (σt + Σ_d c_d)
//! dd:  c_d = 2|μ_d|/h_d    ψout_d = 2ψc − ψin_d
//! sd:  c_d =  |μ_d|/h_d    ψout_d = ψc
//! ```
//!
//! Cells are visited upwind: `k` outermost, `i` innermost, each axis in
//! the direction of travel. Face buffers carry the outgoing flux of one
//! cell to the next and start from the boundary container's incident
//! values.

use ndarray::Array1;
use transport_types::constants::side_index;
use transport_types::error::{TransportError, TransportResult};
use transport_types::material::Material;
use transport_types::mesh::Mesh;
use transport_types::problem::Problem;
use transport_types::quadrature::Quadrature;

use crate::boundary::{Boundary, BoundarySn};

/// Spatial closure of the cell balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equation {
    DiamondDifference,
    StepDifference,
}

impl Equation {
    pub fn from_name(name: &str) -> TransportResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "dd" | "diamond-difference" => Ok(Equation::DiamondDifference),
            "sd" | "step-difference" => Ok(Equation::StepDifference),
            _ => Err(TransportError::unsupported("spatial equation", name)),
        }
    }

    #[inline]
    fn factor(self) -> f64 {
        match self {
            Equation::DiamondDifference => 2.0,
            Equation::StepDifference => 1.0,
        }
    }
}

/// Inverts the streaming-plus-collision operator for one group.
pub trait Sweep {
    /// Select the group whose cross sections the next sweeps use.
    fn setup_group(&mut self, g: usize);

    /// Overwrite `phi` with `Σ w L⁻¹ source` for the current group.
    fn sweep(&mut self, source: &Array1<f64>, phi: &mut Array1<f64>);

    fn boundary(&self) -> &dyn Boundary;

    fn boundary_mut(&mut self) -> &mut dyn Boundary;

    fn boundary_size(&self) -> usize {
        self.boundary().reflective_size()
    }

    /// Toggle the reflective update after each direction.
    fn set_update_boundary(&mut self, update: bool);

    /// Angular flux of the last sweep, when stored.
    fn angular_flux(&self) -> Option<&[Array1<f64>]>;
}

/// Octant visiting order: a Gray-code sequence, flipped on every axis
/// whose two sides are both reflective.
pub fn octant_order(dimension: usize, reflective: impl Fn(usize) -> bool) -> Vec<usize> {
    let mask = (0..dimension)
        .filter(|&d| reflective(side_index(d, false)) && reflective(side_index(d, true)))
        .fold(0usize, |m, d| m | (1 << d));
    (0..1usize << dimension).map(|i| (i ^ (i >> 1)) ^ mask).collect()
}

/// Discrete-ordinates sweeper for 1D, 2D and 3D Cartesian meshes.
pub struct SnSweeper<'a> {
    mesh: &'a Mesh,
    material: &'a Material,
    quadrature: &'a Quadrature,
    boundary: BoundarySn,
    equation: Equation,
    group: usize,
    sigma_t: Vec<f64>,
    octant_order: Vec<usize>,
    update_boundary: bool,
    psi: Option<Vec<Array1<f64>>>,
    faces: [Vec<f64>; 3],
    /// Per axis: cell indices ascending, then descending.
    cell_order: [[Vec<usize>; 2]; 3],
}

impl<'a> SnSweeper<'a> {
    /// Sweeper with a boundary built from the problem's conditions.
    pub fn from_problem(problem: Problem<'a>) -> TransportResult<Self> {
        let boundary = BoundarySn::new(
            &problem.input.boundary,
            problem.mesh,
            problem.quadrature,
            problem.number_groups(),
        )?;
        Self::new(problem, boundary)
    }

    pub fn new(problem: Problem<'a>, boundary: BoundarySn) -> TransportResult<Self> {
        let mesh = problem.mesh;
        if boundary.number_sides() != mesh.number_sides() {
            return Err(TransportError::mismatch(
                "boundary sides",
                mesh.number_sides(),
                boundary.number_sides(),
            ));
        }
        if boundary.number_groups() != problem.number_groups() {
            return Err(TransportError::mismatch(
                "boundary groups",
                problem.number_groups(),
                boundary.number_groups(),
            ));
        }
        let equation = Equation::from_name(&problem.input.equation)?;
        let dimension = mesh.dimension();
        let octant_order = octant_order(dimension, |s| boundary.is_reflective(s));

        let faces = [0, 1, 2].map(|axis| {
            if axis < dimension {
                vec![0.0; mesh.side_faces(side_index(axis, false))]
            } else {
                Vec::new()
            }
        });
        let cell_order = [0, 1, 2].map(|axis| {
            let n = mesh.number_cells_axis(axis);
            [(0..n).collect(), (0..n).rev().collect()]
        });
        let psi = problem
            .input
            .store_angular_flux
            .then(|| vec![Array1::zeros(mesh.number_cells()); problem.quadrature.number_angles()]);

        log::debug!(
            "SN sweeper: {}D, {} cells, {} directions, {:?}, octant order {:?}",
            dimension,
            mesh.number_cells(),
            problem.quadrature.number_angles(),
            equation,
            octant_order
        );

        let mut sweeper = SnSweeper {
            mesh,
            material: problem.material,
            quadrature: problem.quadrature,
            boundary,
            equation,
            group: 0,
            sigma_t: vec![0.0; mesh.number_cells()],
            octant_order,
            update_boundary: true,
            psi,
            faces,
            cell_order,
        };
        sweeper.setup_group(0);
        Ok(sweeper)
    }

    pub fn equation(&self) -> Equation {
        self.equation
    }

    pub fn octants(&self) -> &[usize] {
        &self.octant_order
    }

    pub fn group(&self) -> usize {
        self.group
    }

    pub fn sn_boundary(&self) -> &BoundarySn {
        &self.boundary
    }

    pub fn sn_boundary_mut(&mut self) -> &mut BoundarySn {
        &mut self.boundary
    }
}

impl Sweep for SnSweeper<'_> {
    fn setup_group(&mut self, g: usize) {
        self.group = g;
        for (cell, st) in self.sigma_t.iter_mut().enumerate() {
            *st = self.material.sigma_t(self.mesh.material(cell), g);
        }
    }

    fn sweep(&mut self, source: &Array1<f64>, phi: &mut Array1<f64>) {
        let mesh = self.mesh;
        let quad = self.quadrature;
        let dimension = mesh.dimension();
        let g = self.group;
        let factor = self.equation.factor();
        let diamond = self.equation == Equation::DiamondDifference;

        phi.fill(0.0);
        for oi in 0..self.octant_order.len() {
            let o = self.octant_order[oi];
            let sign = quad.octant_sign(o);
            let reverse = sign.map(|s| usize::from(s < 0.0));

            for a in 0..quad.angles_per_octant() {
                let w = quad.weight(a);
                let direction = quad.index(o, a);

                for d in 0..dimension {
                    let side = side_index(d, sign[d] < 0.0);
                    self.faces[d].copy_from_slice(self.boundary.face_flux(side, g, o, a));
                }

                for &k in &self.cell_order[2][reverse[2]] {
                    for &j in &self.cell_order[1][reverse[1]] {
                        for &i in &self.cell_order[0][reverse[0]] {
                            let ijk = [i, j, k];
                            let cell = mesh.index(i, j, k);
                            let mut numerator = source[cell];
                            let mut denominator = self.sigma_t[cell];
                            let mut face = [0usize; 3];
                            for d in 0..dimension {
                                face[d] = mesh.face_index(d, ijk);
                                let c = factor * quad.cosine(a, d) / mesh.width(d, ijk[d]);
                                numerator += c * self.faces[d][face[d]];
                                denominator += c;
                            }
                            let psi_c = numerator / denominator;
                            for d in 0..dimension {
                                let incoming = &mut self.faces[d][face[d]];
                                *incoming = if diamond { 2.0 * psi_c - *incoming } else { psi_c };
                            }
                            phi[cell] += w * psi_c;
                            if let Some(psi) = self.psi.as_mut() {
                                psi[direction][cell] = psi_c;
                            }
                        }
                    }
                }

                for d in 0..dimension {
                    let side = side_index(d, sign[d] > 0.0);
                    self.boundary
                        .face_flux_mut(side, g, o, a)
                        .copy_from_slice(&self.faces[d]);
                }
                if self.update_boundary {
                    self.boundary.update_angle(g, o, a);
                }
            }
        }
    }

    fn boundary(&self) -> &dyn Boundary {
        &self.boundary
    }

    fn boundary_mut(&mut self) -> &mut dyn Boundary {
        &mut self.boundary
    }

    fn set_update_boundary(&mut self, update: bool) {
        self.update_boundary = update;
    }

    fn angular_flux(&self) -> Option<&[Array1<f64>]> {
        self.psi.as_deref()
    }
}
