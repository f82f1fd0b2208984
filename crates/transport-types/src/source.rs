// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — External Source
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::{Array2, ArrayView1};

use crate::error::{TransportError, TransportResult};
use crate::mesh::Mesh;

/// Isotropic volumetric source, `[group, cell]`.
#[derive(Debug, Clone)]
pub struct ExternalSource {
    values: Array2<f64>,
}

impl ExternalSource {
    pub fn new(number_groups: usize, number_cells: usize) -> Self {
        ExternalSource {
            values: Array2::zeros((number_groups, number_cells)),
        }
    }

    /// Same spectrum in every cell.
    pub fn uniform(mesh: &Mesh, spectrum: &[f64]) -> Self {
        let mut source = Self::new(spectrum.len(), mesh.number_cells());
        for (g, &q) in spectrum.iter().enumerate() {
            source.values.row_mut(g).fill(q);
        }
        source
    }

    /// Spectrum chosen per cell through `region_map[cell]`.
    pub fn by_region(mesh: &Mesh, region_map: &[usize], spectra: &[Vec<f64>]) -> TransportResult<Self> {
        if region_map.len() != mesh.number_cells() {
            return Err(TransportError::mismatch("source region map", mesh.number_cells(), region_map.len()));
        }
        let groups = spectra.first().map_or(0, Vec::len);
        if groups == 0 || spectra.iter().any(|s| s.len() != groups) {
            return Err(TransportError::ConfigError(
                "source spectra must be non-empty and share a group count".to_string(),
            ));
        }
        let mut source = Self::new(groups, mesh.number_cells());
        for (cell, &region) in region_map.iter().enumerate() {
            let spectrum = spectra
                .get(region)
                .ok_or_else(|| TransportError::out_of_bounds("source region", region, spectra.len()))?;
            for (g, &q) in spectrum.iter().enumerate() {
                source.values[[g, cell]] = q;
            }
        }
        Ok(source)
    }

    pub fn set(&mut self, g: usize, cell: usize, value: f64) -> TransportResult<()> {
        let (groups, cells) = self.values.dim();
        if g >= groups {
            return Err(TransportError::out_of_bounds("group", g, groups));
        }
        if cell >= cells {
            return Err(TransportError::out_of_bounds("cell", cell, cells));
        }
        self.values[[g, cell]] = value;
        Ok(())
    }

    pub fn number_groups(&self) -> usize {
        self.values.nrows()
    }

    pub fn number_cells(&self) -> usize {
        self.values.ncols()
    }

    pub fn group(&self, g: usize) -> ArrayView1<'_, f64> {
        self.values.row(g)
    }
}
