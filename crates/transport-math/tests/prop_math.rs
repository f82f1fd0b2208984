// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Property-Based Tests (proptest) for transport-math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for transport-math using proptest.
//!
//! Covers: CSR assembly, Gauss-Seidel residual monotonicity on
//! diagonally dominant systems, agreement between GMRES and Gauss-Seidel.

use proptest::prelude::*;
use transport_math::gauss_seidel::GaussSeidel;
use transport_math::gmres::{gmres_solve, GmresConfig};
use transport_math::matrix::{InsertMode, Matrix, MatrixBuilder};
use transport_math::monitor::{LinearSolverConfig, ResidualKind};
use transport_math::solver::LinearSolver;
use transport_math::vector::{norm, NormType};

/// Banded strictly diagonally dominant matrix with pseudo-random
/// off-diagonal entries in [-1, 1].
fn dominant_matrix(n: usize, bandwidth: usize, seed: u32, margin: f64) -> Matrix {
    let mut b = MatrixBuilder::new(n, n);
    b.preallocate_uniform(2 * bandwidth + 1).unwrap();
    for i in 0..n {
        let lo = i.saturating_sub(bandwidth);
        let hi = (i + bandwidth + 1).min(n);
        let mut off_sum = 0.0;
        for j in lo..hi {
            if j == i {
                continue;
            }
            let v = ((i * 31 + j * 17) as f64 + seed as f64 * 0.37).sin();
            off_sum += v.abs();
            b.insert(i, j, v, InsertMode::Insert).unwrap();
        }
        b.insert(i, i, off_sum + margin, InsertMode::Insert).unwrap();
    }
    b.assemble().unwrap()
}

// ── Assembly Properties ──────────────────────────────────────────────

proptest! {
    /// Splitting a value into several Add inserts assembles to the sum.
    #[test]
    fn add_duplicates_sum(parts in proptest::collection::vec(-10.0f64..10.0, 1..8), row in 0usize..5, col in 0usize..5) {
        let mut b = MatrixBuilder::new(5, 5);
        b.preallocate_uniform(parts.len()).unwrap();
        for &p in &parts {
            b.insert(row, col, p, InsertMode::Add).unwrap();
        }
        let m = b.assemble().unwrap();
        let expected: f64 = parts.iter().sum();
        prop_assert_eq!(m.nnz(), 1);
        prop_assert!((m.get(row, col) - expected).abs() < 1e-12);
    }

    /// Column indices are strictly increasing within every row.
    #[test]
    fn columns_sorted(n in 2usize..25, bandwidth in 1usize..4, seed in 0u32..1000) {
        let m = dominant_matrix(n, bandwidth, seed, 1.0);
        for i in 0..n {
            for p in m.start(i) + 1..m.end(i) {
                prop_assert!(m.column(p - 1) < m.column(p));
            }
            prop_assert!(m.diagonal(i).is_some());
        }
    }
}

// ── Gauss-Seidel Properties ──────────────────────────────────────────

proptest! {
    /// On a strictly diagonally dominant matrix the L∞ change between
    /// successive iterates never grows, and the solve converges.
    #[test]
    fn gauss_seidel_monotone(
        n in 3usize..30,
        bandwidth in 1usize..3,
        seed in 0u32..1000,
        margin in 0.1f64..2.0,
    ) {
        let a = dominant_matrix(n, bandwidth, seed, margin);
        let rhs: Vec<f64> = (0..n).map(|i| 1.0 + (i as f64 * 0.5).cos()).collect();
        let config = LinearSolverConfig {
            max_iters: 10_000,
            rtol: 1e-10,
            atol: 0.0,
            norm: NormType::LInf,
            residual: ResidualKind::Difference,
            ..Default::default()
        };
        let mut gs = GaussSeidel::new(a.clone(), config).unwrap();
        let mut x = vec![0.0; n];
        let result = gs.solve(&rhs, &mut x);

        prop_assert!(result.converged(), "status {:?} after {}", result.status, result.iterations);
        for w in result.history.windows(2) {
            prop_assert!(w[1] <= w[0] * (1.0 + 1e-10) + 1e-15,
                "difference residual grew: {} -> {}", w[0], w[1]);
        }

        let mut r = vec![0.0; n];
        a.residual(&rhs, &x, &mut r);
        prop_assert!(norm(&r, NormType::LInf) < 1e-6);
    }

    /// GMRES and Gauss-Seidel reach the same solution.
    #[test]
    fn gmres_matches_gauss_seidel(n in 3usize..25, seed in 0u32..1000) {
        let a = dominant_matrix(n, 2, seed, 0.5);
        let rhs: Vec<f64> = (0..n).map(|i| (i as f64).sin() + 2.0).collect();

        let mut x_gs = vec![0.0; n];
        let config = LinearSolverConfig { max_iters: 10_000, rtol: 1e-12, ..Default::default() };
        let gs_result = GaussSeidel::new(a.clone(), config).unwrap().solve(&rhs, &mut x_gs);
        prop_assert!(gs_result.converged());

        let mut op = a;
        let mut x_kr = vec![0.0; n];
        let kr = gmres_solve(&mut op, &rhs, &mut x_kr, None,
            &GmresConfig { restart: n, max_iter: 10, tol: 1e-12, atol: 0.0 });
        prop_assert!(kr.converged());

        for (p, q) in x_gs.iter().zip(&x_kr) {
            prop_assert!((p - q).abs() < 1e-7, "{} vs {}", p, q);
        }
    }
}
