// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Errors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

/// Failures raised by the transport solver stack.
///
/// Iteration caps being reached is not an error: solvers report it through
/// the `converged` flag of their result structs.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Missing required input key: {0}")]
    MissingKey(String),

    #[error("Unsupported {kind} '{name}'")]
    UnsupportedSolver { kind: String, name: String },

    #[error("{kind} '{name}' is unavailable: {reason}")]
    BackendUnavailable {
        kind: String,
        name: String,
        reason: String,
    },

    #[error("Invalid operator at row {row}: {reason}")]
    InvalidOperator { row: usize, reason: String },

    #[error("Index out of bounds for {what}: {index} >= {bound}")]
    IndexOutOfBounds {
        what: String,
        index: usize,
        bound: usize,
    },

    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("Matrix assembly error: {0}")]
    Assembly(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Linear algebra error: {0}")]
    LinAlg(String),
}

impl TransportError {
    pub fn unsupported(kind: &str, name: &str) -> Self {
        TransportError::UnsupportedSolver {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }

    pub fn out_of_bounds(what: &str, index: usize, bound: usize) -> Self {
        TransportError::IndexOutOfBounds {
            what: what.to_string(),
            index,
            bound,
        }
    }

    pub fn mismatch(what: &str, expected: usize, actual: usize) -> Self {
        TransportError::DimensionMismatch {
            what: what.to_string(),
            expected,
            actual,
        }
    }
}

pub type TransportResult<T> = Result<T, TransportError>;
