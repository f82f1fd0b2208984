// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Sparse Matrix
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Compressed sparse row matrix with a triplet assembly protocol.
//!
//! Assembly runs in three phases: [`MatrixBuilder::preallocate`],
//! any number of [`MatrixBuilder::insert`] calls in arbitrary order, then
//! [`MatrixBuilder::assemble`], which consumes the builder. Inserting into
//! an assembled matrix is therefore impossible by construction.

use transport_types::error::{TransportError, TransportResult};

use crate::operator::LinearOperator;

/// How an inserted value combines with earlier entries at the same
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// Replace whatever was inserted before.
    Insert,
    /// Sum with whatever was inserted before.
    Add,
}

/// One `(row, column, value)` entry awaiting assembly.
#[derive(Debug, Clone, Copy)]
struct Triplet {
    row: usize,
    col: usize,
    value: f64,
    mode: InsertMode,
}

/// Collects triplets before assembly.
#[derive(Debug, Clone)]
pub struct MatrixBuilder {
    rows: usize,
    cols: usize,
    nnz_per_row: Option<Vec<usize>>,
    triplets: Vec<Triplet>,
}

impl MatrixBuilder {
    pub fn new(rows: usize, cols: usize) -> Self {
        MatrixBuilder {
            rows,
            cols,
            nnz_per_row: None,
            triplets: Vec::new(),
        }
    }

    /// Reserve storage for an expected number of entries per row.
    pub fn preallocate(&mut self, nnz_per_row: &[usize]) -> TransportResult<()> {
        if self.nnz_per_row.is_some() || !self.triplets.is_empty() {
            return Err(TransportError::Assembly(
                "preallocate must be called once, before any insert".to_string(),
            ));
        }
        if nnz_per_row.len() != self.rows {
            return Err(TransportError::mismatch("nnz per row", self.rows, nnz_per_row.len()));
        }
        self.triplets.reserve(nnz_per_row.iter().sum());
        self.nnz_per_row = Some(nnz_per_row.to_vec());
        Ok(())
    }

    /// Same reservation for every row.
    pub fn preallocate_uniform(&mut self, nnz: usize) -> TransportResult<()> {
        let per_row = vec![nnz; self.rows];
        self.preallocate(&per_row)
    }

    pub fn insert(&mut self, row: usize, col: usize, value: f64, mode: InsertMode) -> TransportResult<()> {
        if self.nnz_per_row.is_none() {
            return Err(TransportError::Assembly(
                "insert called before preallocate".to_string(),
            ));
        }
        if row >= self.rows {
            return Err(TransportError::out_of_bounds("matrix row", row, self.rows));
        }
        if col >= self.cols {
            return Err(TransportError::out_of_bounds("matrix column", col, self.cols));
        }
        self.triplets.push(Triplet {
            row,
            col,
            value,
            mode,
        });
        Ok(())
    }

    /// Sort triplets into CSR order and merge duplicates.
    pub fn assemble(mut self) -> TransportResult<Matrix> {
        if self.nnz_per_row.is_none() {
            return Err(TransportError::Assembly(
                "assemble called before preallocate".to_string(),
            ));
        }
        // Stable sort keeps insertion order among duplicates.
        self.triplets.sort_by_key(|t| (t.row, t.col));

        let mut row_ptr = vec![0usize; self.rows + 1];
        let mut col_idx: Vec<usize> = Vec::with_capacity(self.triplets.len());
        let mut values: Vec<f64> = Vec::with_capacity(self.triplets.len());
        let mut last: Option<(usize, usize)> = None;

        for t in &self.triplets {
            if last == Some((t.row, t.col)) {
                if let Some(v) = values.last_mut() {
                    match t.mode {
                        InsertMode::Add => *v += t.value,
                        InsertMode::Insert => *v = t.value,
                    }
                }
                continue;
            }
            col_idx.push(t.col);
            values.push(t.value);
            row_ptr[t.row + 1] += 1;
            last = Some((t.row, t.col));
        }
        for i in 0..self.rows {
            row_ptr[i + 1] += row_ptr[i];
        }

        let diagonal = (0..self.rows)
            .map(|i| (row_ptr[i]..row_ptr[i + 1]).find(|&p| col_idx[p] == i))
            .collect();

        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            row_ptr,
            col_idx,
            values,
            diagonal,
        })
    }
}

/// Assembled CSR matrix. Column indices within a row are sorted and the
/// position of each row's diagonal entry is cached.
#[derive(Debug, Clone)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
    diagonal: Vec<Option<usize>>,
}

impl Matrix {
    pub fn number_rows(&self) -> usize {
        self.rows
    }

    pub fn number_columns(&self) -> usize {
        self.cols
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// First storage position of row `i`.
    #[inline]
    pub fn start(&self, i: usize) -> usize {
        self.row_ptr[i]
    }

    /// One past the last storage position of row `i`.
    #[inline]
    pub fn end(&self, i: usize) -> usize {
        self.row_ptr[i + 1]
    }

    #[inline]
    pub fn column(&self, p: usize) -> usize {
        self.col_idx[p]
    }

    #[inline]
    pub fn value(&self, p: usize) -> f64 {
        self.values[p]
    }

    /// Storage position of the diagonal of row `i`, if present.
    #[inline]
    pub fn diagonal(&self, i: usize) -> Option<usize> {
        self.diagonal[i]
    }

    /// Entry `(i, j)`, zero when not stored.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let cols = &self.col_idx[self.row_ptr[i]..self.row_ptr[i + 1]];
        match cols.binary_search(&j) {
            Ok(p) => self.values[self.row_ptr[i] + p],
            Err(_) => 0.0,
        }
    }

    /// Diagonal values; rows without a stored diagonal give zero.
    pub fn diagonal_values(&self) -> Vec<f64> {
        self.diagonal
            .iter()
            .map(|d| d.map_or(0.0, |p| self.values[p]))
            .collect()
    }

    /// Every row must hold a non-zero diagonal for point relaxation.
    pub fn require_diagonal(&self) -> TransportResult<()> {
        for (row, d) in self.diagonal.iter().enumerate() {
            match d {
                None => {
                    return Err(TransportError::InvalidOperator {
                        row,
                        reason: "missing diagonal entry".to_string(),
                    })
                }
                Some(p) if self.values[*p] == 0.0 => {
                    return Err(TransportError::InvalidOperator {
                        row,
                        reason: "zero diagonal entry".to_string(),
                    })
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// `y = A x`.
    pub fn multiply(&self, x: &[f64], y: &mut [f64]) {
        for (i, yi) in y.iter_mut().enumerate().take(self.rows) {
            let mut sum = 0.0;
            for p in self.row_ptr[i]..self.row_ptr[i + 1] {
                sum += self.values[p] * x[self.col_idx[p]];
            }
            *yi = sum;
        }
    }

    /// `out = b - A x`.
    pub fn residual(&self, b: &[f64], x: &[f64], out: &mut [f64]) {
        self.multiply(x, out);
        for (o, &bi) in out.iter_mut().zip(b.iter()) {
            *o = bi - *o;
        }
    }
}

impl LinearOperator for Matrix {
    fn number_rows(&self) -> usize {
        self.rows
    }

    fn multiply(&mut self, x: &[f64], y: &mut [f64]) {
        Matrix::multiply(self, x, y);
    }
}
