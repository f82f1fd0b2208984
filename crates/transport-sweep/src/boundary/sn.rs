// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Discrete-Ordinates Boundary
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Angular boundary flux on the faces of a Cartesian grid.
//!
//! Each side stores a flat block `[group][octant][angle][face]`, with face
//! numbering from [`Mesh::face_index`]. Both incident and outgoing octants
//! are stored: the sweep reads incident blocks and writes outgoing ones.

use transport_types::config::{BoundaryCondition, BoundaryConditions};
use transport_types::constants::side_axis;
use transport_types::error::TransportResult;
use transport_types::mesh::Mesh;
use transport_types::quadrature::Quadrature;

use super::{check_incident_len, enters_through, side_conditions, Boundary};

#[derive(Debug, Clone)]
pub struct BoundarySn {
    conditions: Vec<BoundaryCondition>,
    faces: Vec<usize>,
    number_groups: usize,
    number_octants: usize,
    angles_per_octant: usize,
    data: Vec<Vec<f64>>,
}

impl BoundarySn {
    pub fn new(
        conditions: &BoundaryConditions,
        mesh: &Mesh,
        quadrature: &Quadrature,
        number_groups: usize,
    ) -> TransportResult<Self> {
        let sides = mesh.number_sides();
        let conditions = side_conditions(conditions, sides, number_groups)?;
        let faces: Vec<usize> = (0..sides).map(|s| mesh.side_faces(s)).collect();
        let number_octants = quadrature.number_octants();
        let angles_per_octant = quadrature.angles_per_octant();
        let data = faces
            .iter()
            .map(|&f| vec![0.0; number_groups * number_octants * angles_per_octant * f])
            .collect();
        let mut boundary = BoundarySn {
            conditions,
            faces,
            number_groups,
            number_octants,
            angles_per_octant,
            data,
        };
        for g in 0..number_groups {
            boundary.set(g);
        }
        Ok(boundary)
    }

    pub fn condition(&self, side: usize) -> &BoundaryCondition {
        &self.conditions[side]
    }

    pub fn faces(&self, side: usize) -> usize {
        self.faces[side]
    }

    pub fn number_groups(&self) -> usize {
        self.number_groups
    }

    /// True when octant `o` enters the mesh through `side`.
    #[inline]
    pub fn is_incident(&self, side: usize, o: usize) -> bool {
        enters_through(side, o)
    }

    #[inline]
    fn offset(&self, side: usize, g: usize, o: usize, a: usize) -> usize {
        ((g * self.number_octants + o) * self.angles_per_octant + a) * self.faces[side]
    }

    /// Face values of direction `(o, a)` on `side`.
    pub fn face_flux(&self, side: usize, g: usize, o: usize, a: usize) -> &[f64] {
        let start = self.offset(side, g, o, a);
        &self.data[side][start..start + self.faces[side]]
    }

    pub fn face_flux_mut(&mut self, side: usize, g: usize, o: usize, a: usize) -> &mut [f64] {
        let start = self.offset(side, g, o, a);
        let len = self.faces[side];
        &mut self.data[side][start..start + len]
    }

    /// Copy the outgoing block of `(o, a)` into its mirror on a
    /// reflective side. No-op when `o` is incident on `side`.
    fn reflect_block(&mut self, side: usize, g: usize, o: usize, a: usize) {
        if self.is_incident(side, o) {
            return;
        }
        let mirror = o ^ (1 << side_axis(side));
        let len = self.faces[side];
        let src = self.offset(side, g, o, a);
        let dst = self.offset(side, g, mirror, a);
        self.data[side].copy_within(src..src + len, dst);
    }

    /// Incident octants of `side` in increasing order.
    fn incident_octants(&self, side: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.number_octants).filter(move |&o| self.is_incident(side, o))
    }
}

impl Boundary for BoundarySn {
    fn number_sides(&self) -> usize {
        self.conditions.len()
    }

    fn is_reflective(&self, side: usize) -> bool {
        matches!(self.conditions[side], BoundaryCondition::Reflect)
    }

    fn boundary_flux_size(&self, side: usize) -> usize {
        (self.number_octants / 2) * self.angles_per_octant * self.faces[side]
    }

    fn set(&mut self, g: usize) {
        for side in 0..self.number_sides() {
            let value = match &self.conditions[side] {
                BoundaryCondition::Vacuum => 0.0,
                BoundaryCondition::Fixed(values) => values[g],
                BoundaryCondition::Reflect => continue,
            };
            for o in 0..self.number_octants {
                if !self.is_incident(side, o) {
                    continue;
                }
                for a in 0..self.angles_per_octant {
                    self.face_flux_mut(side, g, o, a).fill(value);
                }
            }
        }
    }

    fn update(&mut self, g: usize) {
        for side in 0..self.number_sides() {
            if !self.is_reflective(side) {
                continue;
            }
            for o in 0..self.number_octants {
                for a in 0..self.angles_per_octant {
                    self.reflect_block(side, g, o, a);
                }
            }
        }
    }

    fn update_angle(&mut self, g: usize, o: usize, a: usize) {
        for side in 0..self.number_sides() {
            if self.is_reflective(side) {
                self.reflect_block(side, g, o, a);
            }
        }
    }

    fn clear(&mut self, g: usize) {
        let block = self.number_octants * self.angles_per_octant;
        for (side, data) in self.data.iter_mut().enumerate() {
            let len = block * self.faces[side];
            data[g * len..(g + 1) * len].fill(0.0);
        }
    }

    fn set_incident(&mut self, g: usize, values: &[f64]) -> TransportResult<()> {
        check_incident_len(self.reflective_size(), values.len())?;
        let mut pos = 0;
        for side in 0..self.number_sides() {
            if !self.is_reflective(side) {
                continue;
            }
            let octants: Vec<usize> = self.incident_octants(side).collect();
            let len = self.faces[side];
            for o in octants {
                for a in 0..self.angles_per_octant {
                    self.face_flux_mut(side, g, o, a)
                        .copy_from_slice(&values[pos..pos + len]);
                    pos += len;
                }
            }
        }
        Ok(())
    }

    fn get_incident(&self, g: usize, values: &mut [f64]) -> TransportResult<()> {
        check_incident_len(self.reflective_size(), values.len())?;
        let mut pos = 0;
        for side in 0..self.number_sides() {
            if !self.is_reflective(side) {
                continue;
            }
            let len = self.faces[side];
            for o in self.incident_octants(side) {
                for a in 0..self.angles_per_octant {
                    values[pos..pos + len].copy_from_slice(self.face_flux(side, g, o, a));
                    pos += len;
                }
            }
        }
        Ok(())
    }
}
