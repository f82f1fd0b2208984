// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_SIDES, SIDE_NAMES};
use crate::error::{TransportError, TransportResult};

/// Solver input database.
///
/// Only `number_groups` is required; every other key falls back to the
/// default listed on the field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverInput {
    pub number_groups: usize,

    /// Eigensolver backend name (default: "PI").
    #[serde(default = "default_eigen_solver")]
    pub eigen_solver: String,
    #[serde(default = "default_eigen_max_iters")]
    pub eigen_max_iters: usize,
    #[serde(default = "default_tolerance")]
    pub eigen_tolerance: f64,
    /// Power-iteration logging: 1 prints the final `k`, 2 adds a line
    /// every `eigen_print_interval` iterations.
    #[serde(default)]
    pub eigen_print_level: u32,
    #[serde(default = "default_print_interval")]
    pub eigen_print_interval: usize,

    /// Multigroup solver name (default: "GS").
    #[serde(default = "default_outer_solver")]
    pub outer_solver: String,
    #[serde(default = "default_outer_max_iters")]
    pub outer_max_iters: usize,
    #[serde(default = "default_tolerance")]
    pub outer_tolerance: f64,
    #[serde(default)]
    pub outer_print_level: u32,
    #[serde(default = "default_print_interval")]
    pub outer_print_interval: usize,
    /// Overrides the material's downscatter detection when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_downscatter: Option<bool>,
    #[serde(default)]
    pub outer_use_dsa: bool,

    /// Within-group solver name: "SI" or "GMRES" (default: "SI").
    #[serde(default = "default_inner_solver")]
    pub inner_solver: String,
    #[serde(default = "default_inner_max_iters")]
    pub inner_max_iters: usize,
    #[serde(default = "default_tolerance")]
    pub inner_tolerance: f64,
    #[serde(default)]
    pub inner_print_level: u32,
    #[serde(default = "default_print_interval")]
    pub inner_print_interval: usize,
    #[serde(default)]
    pub inner_use_dsa: bool,
    /// Krylov subspace size before restart (default: 20).
    #[serde(default = "default_gmres_restart")]
    pub inner_gmres_restart: usize,

    #[serde(default)]
    pub adjoint: bool,
    /// Spatial discretization: "dd" (diamond difference) or "sd" (step).
    #[serde(default = "default_equation")]
    pub equation: String,
    #[serde(default)]
    pub store_angular_flux: bool,

    /// Linear solver used for diffusion acceleration systems.
    #[serde(default = "default_linear_solver_type")]
    pub linear_solver_type: String,
    #[serde(default = "default_linear_max_iters")]
    pub linear_solver_max_iters: usize,
    #[serde(default = "default_linear_atol")]
    pub linear_solver_atol: f64,
    #[serde(default = "default_linear_rtol")]
    pub linear_solver_rtol: f64,

    #[serde(flatten)]
    pub boundary: BoundaryConditions,
}

/// Condition applied on one side of the mesh.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryCondition {
    /// Zero incident flux.
    #[default]
    Vacuum,
    /// Incident flux mirrors the outgoing flux.
    #[serde(alias = "reflective")]
    Reflect,
    /// Isotropic incident angular flux, one value per group.
    Fixed(Vec<f64>),
}

/// Per-side boundary conditions. Sides beyond the mesh dimension are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoundaryConditions {
    #[serde(default)]
    pub bc_west: BoundaryCondition,
    #[serde(default)]
    pub bc_east: BoundaryCondition,
    #[serde(default)]
    pub bc_south: BoundaryCondition,
    #[serde(default)]
    pub bc_north: BoundaryCondition,
    #[serde(default)]
    pub bc_bottom: BoundaryCondition,
    #[serde(default)]
    pub bc_top: BoundaryCondition,
}

fn default_eigen_solver() -> String {
    "PI".to_string()
}
fn default_eigen_max_iters() -> usize {
    200
}
fn default_tolerance() -> f64 {
    1e-6
}
fn default_outer_solver() -> String {
    "GS".to_string()
}
fn default_outer_max_iters() -> usize {
    100
}
fn default_print_interval() -> usize {
    10
}
fn default_inner_solver() -> String {
    "SI".to_string()
}
fn default_inner_max_iters() -> usize {
    500
}
fn default_gmres_restart() -> usize {
    20
}
fn default_equation() -> String {
    "dd".to_string()
}
fn default_linear_solver_type() -> String {
    "gauss-seidel".to_string()
}
fn default_linear_max_iters() -> usize {
    10_000
}
fn default_linear_atol() -> f64 {
    1e-12
}
fn default_linear_rtol() -> f64 {
    1e-9
}

impl BoundaryConditions {
    /// Same condition on every side.
    pub fn uniform(condition: BoundaryCondition) -> Self {
        BoundaryConditions {
            bc_west: condition.clone(),
            bc_east: condition.clone(),
            bc_south: condition.clone(),
            bc_north: condition.clone(),
            bc_bottom: condition.clone(),
            bc_top: condition,
        }
    }

    /// Condition on side `side` (see [`crate::constants::SIDE_NAMES`]).
    pub fn side(&self, side: usize) -> &BoundaryCondition {
        match side {
            0 => &self.bc_west,
            1 => &self.bc_east,
            2 => &self.bc_south,
            3 => &self.bc_north,
            4 => &self.bc_bottom,
            _ => &self.bc_top,
        }
    }

    pub fn set_side(&mut self, side: usize, condition: BoundaryCondition) {
        match side {
            0 => self.bc_west = condition,
            1 => self.bc_east = condition,
            2 => self.bc_south = condition,
            3 => self.bc_north = condition,
            4 => self.bc_bottom = condition,
            _ => self.bc_top = condition,
        }
    }
}

impl SolverInput {
    /// Input with every optional key at its default.
    pub fn new(number_groups: usize) -> Self {
        SolverInput {
            number_groups,
            eigen_solver: default_eigen_solver(),
            eigen_max_iters: default_eigen_max_iters(),
            eigen_tolerance: default_tolerance(),
            eigen_print_level: 0,
            eigen_print_interval: default_print_interval(),
            outer_solver: default_outer_solver(),
            outer_max_iters: default_outer_max_iters(),
            outer_tolerance: default_tolerance(),
            outer_print_level: 0,
            outer_print_interval: default_print_interval(),
            outer_downscatter: None,
            outer_use_dsa: false,
            inner_solver: default_inner_solver(),
            inner_max_iters: default_inner_max_iters(),
            inner_tolerance: default_tolerance(),
            inner_print_level: 0,
            inner_print_interval: default_print_interval(),
            inner_use_dsa: false,
            inner_gmres_restart: default_gmres_restart(),
            adjoint: false,
            equation: default_equation(),
            store_angular_flux: false,
            linear_solver_type: default_linear_solver_type(),
            linear_solver_max_iters: default_linear_max_iters(),
            linear_solver_atol: default_linear_atol(),
            linear_solver_rtol: default_linear_rtol(),
            boundary: BoundaryConditions::default(),
        }
    }

    /// Load from a JSON file and validate.
    pub fn from_file(path: &str) -> TransportResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse from a JSON document and validate.
    pub fn from_json_str(contents: &str) -> TransportResult<Self> {
        let value: serde_json::Value = serde_json::from_str(contents)?;
        if value.get("number_groups").is_none() {
            return Err(TransportError::MissingKey("number_groups".to_string()));
        }
        let input: Self = serde_json::from_value(value)?;
        input.validate()?;
        Ok(input)
    }

    /// Reject inputs no solver could run with.
    pub fn validate(&self) -> TransportResult<()> {
        if self.number_groups == 0 {
            return Err(TransportError::ConfigError(
                "number_groups must be positive".to_string(),
            ));
        }
        let tolerances = [
            ("eigen_tolerance", self.eigen_tolerance),
            ("outer_tolerance", self.outer_tolerance),
            ("inner_tolerance", self.inner_tolerance),
            ("linear_solver_rtol", self.linear_solver_rtol),
        ];
        for (key, tol) in tolerances {
            if !(tol.is_finite() && tol > 0.0) {
                return Err(TransportError::ConfigError(format!(
                    "{key} must be positive and finite, got {tol}"
                )));
            }
        }
        if !(self.linear_solver_atol.is_finite() && self.linear_solver_atol >= 0.0) {
            return Err(TransportError::ConfigError(format!(
                "linear_solver_atol must be non-negative, got {}",
                self.linear_solver_atol
            )));
        }
        let caps = [
            ("eigen_max_iters", self.eigen_max_iters),
            ("outer_max_iters", self.outer_max_iters),
            ("inner_max_iters", self.inner_max_iters),
            ("linear_solver_max_iters", self.linear_solver_max_iters),
            ("inner_gmres_restart", self.inner_gmres_restart),
            ("eigen_print_interval", self.eigen_print_interval),
            ("outer_print_interval", self.outer_print_interval),
            ("inner_print_interval", self.inner_print_interval),
        ];
        for (key, cap) in caps {
            if cap == 0 {
                return Err(TransportError::ConfigError(format!("{key} must be at least 1")));
            }
        }
        for side in 0..MAX_SIDES {
            if let BoundaryCondition::Fixed(values) = self.boundary.side(side) {
                if values.len() != self.number_groups {
                    return Err(TransportError::ConfigError(format!(
                        "bc_{} fixed flux has {} values for {} groups",
                        SIDE_NAMES[side],
                        values.len(),
                        self.number_groups
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// CARGO_MANIFEST_DIR points to crates/transport-types/, two levels
    /// below the workspace root that holds `configs/`.
    fn project_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
    }

    fn config_path(relative: &str) -> String {
        project_root().join(relative).to_string_lossy().to_string()
    }

    #[test]
    fn test_load_two_group_slab() {
        let input = SolverInput::from_file(&config_path("configs/two_group_slab.json")).unwrap();
        assert_eq!(input.number_groups, 2);
        assert_eq!(input.eigen_solver, "PI");
        assert_eq!(input.inner_solver, "SI");
        assert_eq!(input.boundary.bc_west, BoundaryCondition::Reflect);
        assert_eq!(input.boundary.bc_east, BoundaryCondition::Vacuum);
        assert!((input.eigen_tolerance - 1e-7).abs() < 1e-20);
    }

    #[test]
    fn test_load_all_configs() {
        for relative in ["configs/two_group_slab.json", "configs/box_2d_fixed.json"] {
            let path = config_path(relative);
            let result = SolverInput::from_file(&path);
            assert!(result.is_ok(), "Failed to load config {}: {:?}", path, result.err());
        }
    }

    #[test]
    fn test_defaults_applied() {
        let input = SolverInput::from_json_str(r#"{ "number_groups": 3 }"#).unwrap();
        assert_eq!(input.outer_solver, "GS");
        assert_eq!(input.outer_downscatter, None);
        assert_eq!(input.eigen_print_level, 0);
        assert_eq!(input.eigen_print_interval, 10);
        assert_eq!(input.equation, "dd");
        assert_eq!(input.boundary.bc_top, BoundaryCondition::Vacuum);
        assert!(!input.adjoint);
    }

    #[test]
    fn test_zero_eigen_print_interval_rejected() {
        let err = SolverInput::from_json_str(r#"{ "number_groups": 1, "eigen_print_interval": 0 }"#).unwrap_err();
        assert!(matches!(err, TransportError::ConfigError(ref m) if m.contains("eigen_print_interval")));
    }

    #[test]
    fn test_missing_number_groups_is_reported() {
        let err = SolverInput::from_json_str(r#"{ "eigen_solver": "PI" }"#).unwrap_err();
        assert!(matches!(err, TransportError::MissingKey(ref k) if k == "number_groups"));
    }

    #[test]
    fn test_zero_groups_rejected() {
        let err = SolverInput::from_json_str(r#"{ "number_groups": 0 }"#).unwrap_err();
        assert!(matches!(err, TransportError::ConfigError(_)));
    }

    #[test]
    fn test_fixed_boundary_length_checked() {
        let text = r#"{ "number_groups": 2, "bc_north": { "fixed": [1.0] } }"#;
        let err = SolverInput::from_json_str(text).unwrap_err();
        assert!(err.to_string().contains("north"), "got: {err}");
    }

    #[test]
    fn test_boundary_aliases() {
        let text = r#"{ "number_groups": 1, "bc_west": "reflective", "bc_east": { "fixed": [0.5] } }"#;
        let input = SolverInput::from_json_str(text).unwrap();
        assert!(input.boundary.side(0) == &BoundaryCondition::Reflect);
        assert_eq!(input.boundary.side(1), &BoundaryCondition::Fixed(vec![0.5]));
    }

    #[test]
    fn test_roundtrip_serialization() {
        let mut input = SolverInput::new(2);
        input.outer_downscatter = Some(true);
        input.boundary.set_side(3, BoundaryCondition::Reflect);
        let json = serde_json::to_string_pretty(&input).unwrap();
        let back = SolverInput::from_json_str(&json).unwrap();
        assert_eq!(back.outer_downscatter, Some(true));
        assert_eq!(back.boundary.bc_north, BoundaryCondition::Reflect);
    }
}
