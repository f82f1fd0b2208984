// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Diffusion Boundary
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Partial currents on the boundary faces of a diffusion problem.
//!
//! `J⁻` is the incident current, `J⁺` the outgoing one. A fixed isotropic
//! angular flux `ψ` gives `J⁻ = ψ/4`; a reflective side returns `J⁻ = J⁺`.

use transport_types::config::{BoundaryCondition, BoundaryConditions};
use transport_types::constants::PARTIAL_CURRENT_FACTOR;
use transport_types::error::TransportResult;
use transport_types::mesh::Mesh;

use super::{check_incident_len, side_conditions, Boundary};

#[derive(Debug, Clone)]
pub struct BoundaryDiffusion {
    conditions: Vec<BoundaryCondition>,
    faces: Vec<usize>,
    number_groups: usize,
    incident: Vec<Vec<f64>>,
    outgoing: Vec<Vec<f64>>,
}

impl BoundaryDiffusion {
    pub fn new(conditions: &BoundaryConditions, mesh: &Mesh, number_groups: usize) -> TransportResult<Self> {
        let sides = mesh.number_sides();
        let conditions = side_conditions(conditions, sides, number_groups)?;
        let faces: Vec<usize> = (0..sides).map(|s| mesh.side_faces(s)).collect();
        let incident: Vec<Vec<f64>> = faces.iter().map(|&f| vec![0.0; f * number_groups]).collect();
        let outgoing = incident.clone();
        let mut boundary = BoundaryDiffusion {
            conditions,
            faces,
            number_groups,
            incident,
            outgoing,
        };
        for g in 0..number_groups {
            boundary.set(g);
        }
        Ok(boundary)
    }

    pub fn condition(&self, side: usize) -> &BoundaryCondition {
        &self.conditions[side]
    }

    pub fn number_groups(&self) -> usize {
        self.number_groups
    }

    pub fn faces(&self, side: usize) -> usize {
        self.faces[side]
    }

    /// Incident partial current `J⁻` per face.
    pub fn incident(&self, side: usize, g: usize) -> &[f64] {
        let f = self.faces[side];
        &self.incident[side][g * f..(g + 1) * f]
    }

    /// Outgoing partial current `J⁺` per face.
    pub fn outgoing(&self, side: usize, g: usize) -> &[f64] {
        let f = self.faces[side];
        &self.outgoing[side][g * f..(g + 1) * f]
    }

    pub fn outgoing_mut(&mut self, side: usize, g: usize) -> &mut [f64] {
        let f = self.faces[side];
        &mut self.outgoing[side][g * f..(g + 1) * f]
    }

    fn incident_mut(&mut self, side: usize, g: usize) -> &mut [f64] {
        let f = self.faces[side];
        &mut self.incident[side][g * f..(g + 1) * f]
    }
}

impl Boundary for BoundaryDiffusion {
    fn number_sides(&self) -> usize {
        self.conditions.len()
    }

    fn is_reflective(&self, side: usize) -> bool {
        matches!(self.conditions[side], BoundaryCondition::Reflect)
    }

    fn boundary_flux_size(&self, side: usize) -> usize {
        self.faces[side]
    }

    fn set(&mut self, g: usize) {
        for side in 0..self.number_sides() {
            let value = match &self.conditions[side] {
                BoundaryCondition::Vacuum => 0.0,
                BoundaryCondition::Fixed(values) => PARTIAL_CURRENT_FACTOR * values[g],
                BoundaryCondition::Reflect => continue,
            };
            self.incident_mut(side, g).fill(value);
        }
    }

    fn update(&mut self, g: usize) {
        for side in 0..self.number_sides() {
            if self.is_reflective(side) {
                let f = self.faces[side];
                let range = g * f..(g + 1) * f;
                self.incident[side][range.clone()].copy_from_slice(&self.outgoing[side][range]);
            }
        }
    }

    fn update_angle(&mut self, g: usize, _o: usize, _a: usize) {
        self.update(g);
    }

    fn clear(&mut self, g: usize) {
        for side in 0..self.number_sides() {
            self.incident_mut(side, g).fill(0.0);
            self.outgoing_mut(side, g).fill(0.0);
        }
    }

    fn set_incident(&mut self, g: usize, values: &[f64]) -> TransportResult<()> {
        check_incident_len(self.reflective_size(), values.len())?;
        let mut pos = 0;
        for side in 0..self.number_sides() {
            if self.is_reflective(side) {
                let f = self.faces[side];
                self.incident_mut(side, g).copy_from_slice(&values[pos..pos + f]);
                pos += f;
            }
        }
        Ok(())
    }

    fn get_incident(&self, g: usize, values: &mut [f64]) -> TransportResult<()> {
        check_incident_len(self.reflective_size(), values.len())?;
        let mut pos = 0;
        for side in 0..self.number_sides() {
            if self.is_reflective(side) {
                let f = self.faces[side];
                values[pos..pos + f].copy_from_slice(self.incident(side, g));
                pos += f;
            }
        }
        Ok(())
    }
}
