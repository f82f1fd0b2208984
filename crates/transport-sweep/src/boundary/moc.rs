// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Characteristics Boundary
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Angular boundary flux stored per track end.
//!
//! The tracking itself is external. A [`TrackLayout`] tells the container
//! how many track ends cross each side for each direction and where an
//! outgoing track continues after reflection.

use transport_types::config::{BoundaryCondition, BoundaryConditions};
use transport_types::constants::side_axis;
use transport_types::error::{TransportError, TransportResult};

use super::{check_incident_len, enters_through, side_conditions, Boundary};

/// Incident track end reached by reflecting an outgoing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackLink {
    pub direction: usize,
    pub track: usize,
}

/// Track ends per side per direction, plus reflection links.
///
/// Directions use the flat quadrature index `o * angles_per_octant + a`.
#[derive(Debug, Clone)]
pub struct TrackLayout {
    dimension: usize,
    angles_per_octant: usize,
    /// `[side][direction]`
    tracks: Vec<Vec<usize>>,
    /// `[side][outgoing direction][track]`
    links: Vec<Vec<Vec<Option<TrackLink>>>>,
}

impl TrackLayout {
    /// Layout with no reflection links. `tracks[side][direction]` counts
    /// track ends; one row per side (`2 * dimension`).
    pub fn new(
        dimension: usize,
        angles_per_octant: usize,
        tracks: Vec<Vec<usize>>,
    ) -> TransportResult<Self> {
        let directions = (1usize << dimension) * angles_per_octant;
        if tracks.len() != 2 * dimension {
            return Err(TransportError::mismatch("track layout sides", 2 * dimension, tracks.len()));
        }
        for row in &tracks {
            if row.len() != directions {
                return Err(TransportError::mismatch("track layout directions", directions, row.len()));
            }
        }
        let links = tracks
            .iter()
            .map(|row| row.iter().map(|&n| vec![None; n]).collect())
            .collect();
        Ok(TrackLayout {
            dimension,
            angles_per_octant,
            tracks,
            links,
        })
    }

    /// Standard pairing: track `t` of angle `a` leaving through a side
    /// continues as track `t` of the same angle in the mirrored octant.
    /// `tracks_per_angle[side][a]` is shared by all octants.
    pub fn cyclic(
        dimension: usize,
        angles_per_octant: usize,
        tracks_per_angle: &[Vec<usize>],
    ) -> TransportResult<Self> {
        let octants = 1usize << dimension;
        let tracks = tracks_per_angle
            .iter()
            .map(|row| {
                if row.len() != angles_per_octant {
                    return Err(TransportError::mismatch(
                        "tracks per angle",
                        angles_per_octant,
                        row.len(),
                    ));
                }
                Ok((0..octants).flat_map(|_| row.iter().copied()).collect())
            })
            .collect::<TransportResult<Vec<Vec<usize>>>>()?;
        let mut layout = Self::new(dimension, angles_per_octant, tracks)?;
        for side in 0..2 * dimension {
            let axis = side_axis(side);
            for o in (0..octants).filter(|&o| !enters_through(side, o)) {
                for a in 0..angles_per_octant {
                    let dir = o * angles_per_octant + a;
                    let mirror = (o ^ (1 << axis)) * angles_per_octant + a;
                    for t in 0..layout.tracks[side][dir] {
                        layout.links[side][dir][t] = Some(TrackLink {
                            direction: mirror,
                            track: t,
                        });
                    }
                }
            }
        }
        Ok(layout)
    }

    /// Connect an outgoing track end to an incident one on the same side.
    pub fn link(
        &mut self,
        side: usize,
        outgoing: (usize, usize),
        incident: (usize, usize),
    ) -> TransportResult<()> {
        let sides = self.tracks.len();
        if side >= sides {
            return Err(TransportError::out_of_bounds("track side", side, sides));
        }
        for (dir, track) in [outgoing, incident] {
            let dirs = self.tracks[side].len();
            if dir >= dirs {
                return Err(TransportError::out_of_bounds("track direction", dir, dirs));
            }
            if track >= self.tracks[side][dir] {
                return Err(TransportError::out_of_bounds("track", track, self.tracks[side][dir]));
            }
        }
        let o_out = outgoing.0 / self.angles_per_octant;
        let o_in = incident.0 / self.angles_per_octant;
        if enters_through(side, o_out) || !enters_through(side, o_in) {
            return Err(TransportError::ConfigError(format!(
                "track link on side {side} must go from an outgoing to an incident direction"
            )));
        }
        self.links[side][outgoing.0][outgoing.1] = Some(TrackLink {
            direction: incident.0,
            track: incident.1,
        });
        Ok(())
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn number_directions(&self) -> usize {
        (1usize << self.dimension) * self.angles_per_octant
    }

    pub fn tracks(&self, side: usize, direction: usize) -> usize {
        self.tracks[side][direction]
    }
}

#[derive(Debug, Clone)]
pub struct BoundaryMoc {
    conditions: Vec<BoundaryCondition>,
    layout: TrackLayout,
    number_groups: usize,
    /// `[side][direction]` start of each direction's track block within a group.
    offsets: Vec<Vec<usize>>,
    /// Values per group per side.
    stride: Vec<usize>,
    data: Vec<Vec<f64>>,
}

impl BoundaryMoc {
    pub fn new(
        conditions: &BoundaryConditions,
        layout: TrackLayout,
        number_groups: usize,
    ) -> TransportResult<Self> {
        let sides = 2 * layout.dimension;
        let conditions = side_conditions(conditions, sides, number_groups)?;
        let mut offsets = Vec::with_capacity(sides);
        let mut stride = Vec::with_capacity(sides);
        for side in 0..sides {
            let mut acc = 0;
            let row: Vec<usize> = layout.tracks[side]
                .iter()
                .map(|&n| {
                    let start = acc;
                    acc += n;
                    start
                })
                .collect();
            offsets.push(row);
            stride.push(acc);
        }
        let data = stride.iter().map(|&s| vec![0.0; s * number_groups]).collect();
        let mut boundary = BoundaryMoc {
            conditions,
            layout,
            number_groups,
            offsets,
            stride,
            data,
        };
        for g in 0..number_groups {
            boundary.set(g);
        }
        Ok(boundary)
    }

    pub fn layout(&self) -> &TrackLayout {
        &self.layout
    }

    pub fn number_groups(&self) -> usize {
        self.number_groups
    }

    fn is_incident_direction(&self, side: usize, direction: usize) -> bool {
        enters_through(side, direction / self.layout.angles_per_octant)
    }

    fn start(&self, side: usize, g: usize, direction: usize) -> usize {
        g * self.stride[side] + self.offsets[side][direction]
    }

    /// Track-end values of `direction` on `side`.
    pub fn track_flux(&self, side: usize, g: usize, direction: usize) -> &[f64] {
        let start = self.start(side, g, direction);
        &self.data[side][start..start + self.layout.tracks[side][direction]]
    }

    pub fn track_flux_mut(&mut self, side: usize, g: usize, direction: usize) -> &mut [f64] {
        let start = self.start(side, g, direction);
        let len = self.layout.tracks[side][direction];
        &mut self.data[side][start..start + len]
    }

    fn reflect_direction(&mut self, side: usize, g: usize, direction: usize) {
        if self.is_incident_direction(side, direction) {
            return;
        }
        let src = self.start(side, g, direction);
        for t in 0..self.layout.tracks[side][direction] {
            if let Some(link) = self.layout.links[side][direction][t] {
                let dst = self.start(side, g, link.direction) + link.track;
                self.data[side][dst] = self.data[side][src + t];
            }
        }
    }
}

impl Boundary for BoundaryMoc {
    fn number_sides(&self) -> usize {
        self.conditions.len()
    }

    fn is_reflective(&self, side: usize) -> bool {
        matches!(self.conditions[side], BoundaryCondition::Reflect)
    }

    fn boundary_flux_size(&self, side: usize) -> usize {
        (0..self.layout.number_directions())
            .filter(|&d| self.is_incident_direction(side, d))
            .map(|d| self.layout.tracks[side][d])
            .sum()
    }

    fn set(&mut self, g: usize) {
        for side in 0..self.number_sides() {
            let value = match &self.conditions[side] {
                BoundaryCondition::Vacuum => 0.0,
                BoundaryCondition::Fixed(values) => values[g],
                BoundaryCondition::Reflect => continue,
            };
            for d in 0..self.layout.number_directions() {
                if self.is_incident_direction(side, d) {
                    self.track_flux_mut(side, g, d).fill(value);
                }
            }
        }
    }

    fn update(&mut self, g: usize) {
        for side in 0..self.number_sides() {
            if self.is_reflective(side) {
                for d in 0..self.layout.number_directions() {
                    self.reflect_direction(side, g, d);
                }
            }
        }
    }

    fn update_angle(&mut self, g: usize, o: usize, a: usize) {
        let direction = o * self.layout.angles_per_octant + a;
        for side in 0..self.number_sides() {
            if self.is_reflective(side) {
                self.reflect_direction(side, g, direction);
            }
        }
    }

    fn clear(&mut self, g: usize) {
        for (side, data) in self.data.iter_mut().enumerate() {
            let s = self.stride[side];
            data[g * s..(g + 1) * s].fill(0.0);
        }
    }

    fn set_incident(&mut self, g: usize, values: &[f64]) -> TransportResult<()> {
        check_incident_len(self.reflective_size(), values.len())?;
        let mut pos = 0;
        for side in 0..self.number_sides() {
            if !self.is_reflective(side) {
                continue;
            }
            for d in 0..self.layout.number_directions() {
                if self.is_incident_direction(side, d) {
                    let len = self.layout.tracks[side][d];
                    self.track_flux_mut(side, g, d)
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
            for d in 0..self.layout.number_directions() {
                if self.is_incident_direction(side, d) {
                    let len = self.layout.tracks[side][d];
                    values[pos..pos + len].copy_from_slice(self.track_flux(side, g, d));
                    pos += len;
                }
            }
        }
        Ok(())
    }
}
