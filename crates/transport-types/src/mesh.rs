// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Cartesian Mesh
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Orthogonal Cartesian mesh in one, two or three dimensions.
//!
//! Cells are numbered with `x` fastest: `cell = i + j·nx + k·nx·ny`.
//! Unused axes carry a single cell of unit width so that volumes and
//! face counts work the same in every dimension.

use crate::constants::{side_axis, MAX_DIMENSION};
use crate::error::{TransportError, TransportResult};

#[derive(Debug, Clone)]
pub struct Mesh {
    dimension: usize,
    widths: [Vec<f64>; MAX_DIMENSION],
    material_map: Vec<usize>,
}

impl Mesh {
    pub fn new_1d(dx: Vec<f64>, material_map: Vec<usize>) -> TransportResult<Self> {
        Self::build(1, [dx, vec![1.0], vec![1.0]], material_map)
    }

    pub fn new_2d(dx: Vec<f64>, dy: Vec<f64>, material_map: Vec<usize>) -> TransportResult<Self> {
        Self::build(2, [dx, dy, vec![1.0]], material_map)
    }

    pub fn new_3d(
        dx: Vec<f64>,
        dy: Vec<f64>,
        dz: Vec<f64>,
        material_map: Vec<usize>,
    ) -> TransportResult<Self> {
        Self::build(3, [dx, dy, dz], material_map)
    }

    /// Homogeneous mesh with `n` equal cells per axis over `[0, length]`.
    pub fn uniform(dimension: usize, n: usize, length: f64, material: usize) -> TransportResult<Self> {
        if dimension == 0 || dimension > MAX_DIMENSION {
            return Err(TransportError::ConfigError(format!(
                "mesh dimension must be 1, 2 or 3, got {dimension}"
            )));
        }
        if n == 0 {
            return Err(TransportError::ConfigError("mesh needs at least one cell".to_string()));
        }
        let h = vec![length / n as f64; n];
        let mut widths = [vec![1.0], vec![1.0], vec![1.0]];
        for w in widths.iter_mut().take(dimension) {
            *w = h.clone();
        }
        let cells = n.pow(dimension as u32);
        Self::build(dimension, widths, vec![material; cells])
    }

    /// 1D mesh from coarse region edges, each region split into
    /// `fine[r]` equal cells carrying `materials[r]`.
    pub fn coarse_1d(edges: &[f64], fine: &[usize], materials: &[usize]) -> TransportResult<Self> {
        let dx = refine(edges, fine)?;
        if materials.len() != fine.len() {
            return Err(TransportError::mismatch("coarse material map", fine.len(), materials.len()));
        }
        let mut material_map = Vec::with_capacity(dx.len());
        for (region, &count) in fine.iter().enumerate() {
            material_map.extend(std::iter::repeat(materials[region]).take(count));
        }
        Self::new_1d(dx, material_map)
    }

    /// 2D mesh from coarse edges on each axis. `materials` is indexed
    /// `[cx + cy·ncx]` over coarse regions.
    pub fn coarse_2d(
        x_edges: &[f64],
        x_fine: &[usize],
        y_edges: &[f64],
        y_fine: &[usize],
        materials: &[usize],
    ) -> TransportResult<Self> {
        let dx = refine(x_edges, x_fine)?;
        let dy = refine(y_edges, y_fine)?;
        let ncx = x_fine.len();
        if materials.len() != ncx * y_fine.len() {
            return Err(TransportError::mismatch(
                "coarse material map",
                ncx * y_fine.len(),
                materials.len(),
            ));
        }
        let coarse_x = expand_regions(x_fine);
        let coarse_y = expand_regions(y_fine);
        let mut material_map = Vec::with_capacity(dx.len() * dy.len());
        for &cy in &coarse_y {
            for &cx in &coarse_x {
                material_map.push(materials[cx + cy * ncx]);
            }
        }
        Self::new_2d(dx, dy, material_map)
    }

    fn build(
        dimension: usize,
        widths: [Vec<f64>; MAX_DIMENSION],
        material_map: Vec<usize>,
    ) -> TransportResult<Self> {
        for (axis, w) in widths.iter().enumerate() {
            if w.is_empty() {
                return Err(TransportError::ConfigError(format!("axis {axis} has no cells")));
            }
            if let Some(bad) = w.iter().find(|h| !(h.is_finite() && **h > 0.0)) {
                return Err(TransportError::ConfigError(format!(
                    "axis {axis} has non-positive cell width {bad}"
                )));
            }
        }
        let cells: usize = widths.iter().map(Vec::len).product();
        if material_map.len() != cells {
            return Err(TransportError::mismatch("material map", cells, material_map.len()));
        }
        Ok(Mesh {
            dimension,
            widths,
            material_map,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn number_cells(&self) -> usize {
        self.material_map.len()
    }

    /// Cells along `axis`; 1 for axes beyond the mesh dimension.
    pub fn number_cells_axis(&self, axis: usize) -> usize {
        self.widths[axis].len()
    }

    pub fn width(&self, axis: usize, i: usize) -> f64 {
        self.widths[axis][i]
    }

    pub fn widths(&self, axis: usize) -> &[f64] {
        &self.widths[axis]
    }

    pub fn number_sides(&self) -> usize {
        2 * self.dimension
    }

    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        i + self.widths[0].len() * (j + self.widths[1].len() * k)
    }

    #[inline]
    pub fn cell_to_ijk(&self, cell: usize) -> [usize; 3] {
        let nx = self.widths[0].len();
        let ny = self.widths[1].len();
        [cell % nx, (cell / nx) % ny, cell / (nx * ny)]
    }

    pub fn volume(&self, cell: usize) -> f64 {
        let ijk = self.cell_to_ijk(cell);
        (0..self.dimension).map(|d| self.widths[d][ijk[d]]).product()
    }

    /// Width of `cell` along `axis`.
    pub fn cell_width(&self, cell: usize, axis: usize) -> f64 {
        self.widths[axis][self.cell_to_ijk(cell)[axis]]
    }

    pub fn material(&self, cell: usize) -> usize {
        self.material_map[cell]
    }

    pub fn material_map(&self) -> &[usize] {
        &self.material_map
    }

    /// Neighbouring cell across `side` of `cell`, or `None` on the boundary.
    pub fn neighbor(&self, cell: usize, side: usize) -> Option<usize> {
        let axis = side_axis(side);
        if axis >= self.dimension {
            return None;
        }
        let mut ijk = self.cell_to_ijk(cell);
        if side % 2 == 0 {
            if ijk[axis] == 0 {
                return None;
            }
            ijk[axis] -= 1;
        } else {
            if ijk[axis] + 1 == self.widths[axis].len() {
                return None;
            }
            ijk[axis] += 1;
        }
        Some(self.index(ijk[0], ijk[1], ijk[2]))
    }

    /// Number of cell faces on `side`.
    pub fn side_faces(&self, side: usize) -> usize {
        let axis = side_axis(side);
        (0..MAX_DIMENSION)
            .filter(|&d| d != axis)
            .map(|d| self.widths[d].len())
            .product()
    }

    /// Face index on a side normal to `axis` for the transverse cell
    /// coordinates of `ijk`. Transverse axes are taken in increasing order.
    #[inline]
    pub fn face_index(&self, axis: usize, ijk: [usize; 3]) -> usize {
        match axis {
            0 => ijk[1] + ijk[2] * self.widths[1].len(),
            1 => ijk[0] + ijk[2] * self.widths[0].len(),
            _ => ijk[0] + ijk[1] * self.widths[0].len(),
        }
    }

    /// Total extent along `axis`.
    pub fn length(&self, axis: usize) -> f64 {
        self.widths[axis].iter().sum()
    }

    pub fn total_volume(&self) -> f64 {
        (0..self.dimension).map(|d| self.length(d)).product()
    }
}

fn refine(edges: &[f64], fine: &[usize]) -> TransportResult<Vec<f64>> {
    if edges.len() != fine.len() + 1 {
        return Err(TransportError::mismatch("coarse mesh edges", fine.len() + 1, edges.len()));
    }
    let mut widths = Vec::with_capacity(fine.iter().sum());
    for (r, &count) in fine.iter().enumerate() {
        let span = edges[r + 1] - edges[r];
        if count == 0 || span <= 0.0 {
            return Err(TransportError::ConfigError(format!(
                "coarse region {r} must have positive width and at least one cell"
            )));
        }
        widths.extend(std::iter::repeat(span / count as f64).take(count));
    }
    Ok(widths)
}

fn expand_regions(fine: &[usize]) -> Vec<usize> {
    fine.iter()
        .enumerate()
        .flat_map(|(r, &count)| std::iter::repeat(r).take(count))
        .collect()
}
