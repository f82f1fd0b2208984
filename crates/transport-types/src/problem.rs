// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Problem
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::config::SolverInput;
use crate::error::{TransportError, TransportResult};
use crate::material::Material;
use crate::mesh::Mesh;
use crate::quadrature::Quadrature;
use crate::source::ExternalSource;

/// Read-only problem description shared by every solver in a stack.
///
/// The referenced data outlives all solvers built from it.
#[derive(Debug, Clone, Copy)]
pub struct Problem<'a> {
    pub input: &'a SolverInput,
    pub mesh: &'a Mesh,
    pub material: &'a Material,
    pub quadrature: &'a Quadrature,
    pub external_source: Option<&'a ExternalSource>,
}

impl<'a> Problem<'a> {
    /// Check that input, mesh, material and quadrature agree.
    pub fn new(
        input: &'a SolverInput,
        mesh: &'a Mesh,
        material: &'a Material,
        quadrature: &'a Quadrature,
    ) -> TransportResult<Self> {
        input.validate()?;
        material.validate()?;
        if material.number_groups() != input.number_groups {
            return Err(TransportError::mismatch(
                "material groups",
                input.number_groups,
                material.number_groups(),
            ));
        }
        if quadrature.dimension() != mesh.dimension() {
            return Err(TransportError::mismatch(
                "quadrature dimension",
                mesh.dimension(),
                quadrature.dimension(),
            ));
        }
        if let Some(&m) = mesh
            .material_map()
            .iter()
            .find(|&&m| m >= material.number_materials())
        {
            return Err(TransportError::out_of_bounds("material id", m, material.number_materials()));
        }
        Ok(Problem {
            input,
            mesh,
            material,
            quadrature,
            external_source: None,
        })
    }

    pub fn with_external_source(mut self, source: &'a ExternalSource) -> TransportResult<Self> {
        if source.number_groups() != self.input.number_groups {
            return Err(TransportError::mismatch(
                "source groups",
                self.input.number_groups,
                source.number_groups(),
            ));
        }
        if source.number_cells() != self.mesh.number_cells() {
            return Err(TransportError::mismatch(
                "source cells",
                self.mesh.number_cells(),
                source.number_cells(),
            ));
        }
        self.external_source = Some(source);
        Ok(self)
    }

    pub fn number_groups(&self) -> usize {
        self.input.number_groups
    }

    pub fn number_cells(&self) -> usize {
        self.mesh.number_cells()
    }
}
