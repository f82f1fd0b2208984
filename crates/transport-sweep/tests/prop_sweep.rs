// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Property-Based Tests (proptest) for transport-sweep
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for transport-sweep using proptest.
//!
//! Covers: incident boundary round-trips for every container, mirror
//! symmetry of a reflective slab, non-negativity of step-difference flux.

use ndarray::Array1;
use proptest::prelude::*;
use transport_sweep::boundary::{Boundary, BoundaryDiffusion, BoundaryMoc, BoundarySn, TrackLayout};
use transport_sweep::sweeper::{SnSweeper, Sweep};
use transport_types::config::{BoundaryCondition, BoundaryConditions, SolverInput};
use transport_types::material::Material;
use transport_types::mesh::Mesh;
use transport_types::problem::Problem;
use transport_types::quadrature::Quadrature;

fn conditions_from_mask(mask: u8) -> BoundaryConditions {
    let mut bc = BoundaryConditions::default();
    for side in 0..6 {
        if (mask >> side) & 1 == 1 {
            bc.set_side(side, BoundaryCondition::Reflect);
        }
    }
    bc
}

fn mesh_of(dimension: usize, n: usize) -> Mesh {
    Mesh::uniform(dimension, n, n as f64, 0).unwrap()
}

fn quadrature_of(dimension: usize) -> Quadrature {
    match dimension {
        1 => Quadrature::gauss_legendre(4).unwrap(),
        d => Quadrature::product(d, 2, 1).unwrap(),
    }
}

// ── Boundary Round-Trip ──────────────────────────────────────────────

proptest! {
    /// On an untouched container, `set_incident` then `get_incident`
    /// returns the same buffer.
    #[test]
    fn sn_incident_roundtrip(dimension in 1usize..4, n in 1usize..4, mask in 0u8..64, groups in 1usize..3, seed in 0u32..1000) {
        let mesh = mesh_of(dimension, n);
        let quad = quadrature_of(dimension);
        let mut b = BoundarySn::new(&conditions_from_mask(mask), &mesh, &quad, groups).unwrap();
        let size = b.reflective_size();
        let expected: usize = (0..mesh.number_sides())
            .filter(|&s| (mask >> s) & 1 == 1)
            .map(|s| quad.number_angles() / 2 * mesh.side_faces(s))
            .sum();
        prop_assert_eq!(size, expected);

        let g = groups - 1;
        let input: Vec<f64> = (0..size).map(|i| ((i as u32 + seed) as f64).sin()).collect();
        b.set_incident(g, &input).unwrap();
        let mut output = vec![0.0; size];
        b.get_incident(g, &mut output).unwrap();
        prop_assert_eq!(input, output);
    }

    #[test]
    fn moc_incident_roundtrip(dimension in 1usize..4, tracks in 1usize..5, mask in 0u8..64) {
        let angles = 2;
        let per_angle: Vec<Vec<usize>> = (0..2 * dimension).map(|s| vec![tracks + s; angles]).collect();
        let layout = TrackLayout::cyclic(dimension, angles, &per_angle).unwrap();
        let mut b = BoundaryMoc::new(&conditions_from_mask(mask), layout, 1).unwrap();
        let size = b.reflective_size();
        let input: Vec<f64> = (0..size).map(|i| i as f64 * 0.25).collect();
        b.set_incident(0, &input).unwrap();
        let mut output = vec![0.0; size];
        b.get_incident(0, &mut output).unwrap();
        prop_assert_eq!(input, output);
    }

    #[test]
    fn diffusion_incident_roundtrip(dimension in 1usize..4, n in 1usize..5, mask in 0u8..64) {
        let mesh = mesh_of(dimension, n);
        let mut b = BoundaryDiffusion::new(&conditions_from_mask(mask), &mesh, 2).unwrap();
        let size = b.reflective_size();
        let input: Vec<f64> = (0..size).map(|i| 1.0 + i as f64).collect();
        b.set_incident(1, &input).unwrap();
        let mut output = vec![0.0; size];
        b.get_incident(1, &mut output).unwrap();
        prop_assert_eq!(input, output);
    }
}

// ── Sweep Properties ─────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// A slab whose widths and materials mirror about the midplane, with
    /// both sides reflective, converges to a mirror-symmetric flux.
    #[test]
    fn reflective_slab_symmetric(
        half in proptest::collection::vec((0.2f64..1.0, 0usize..2), 1..5),
        sigma in proptest::collection::vec(0.5f64..2.0, 2),
    ) {
        let mut widths: Vec<f64> = half.iter().map(|&(w, _)| w).collect();
        let mut materials: Vec<usize> = half.iter().map(|&(_, m)| m).collect();
        widths.extend(widths.clone().into_iter().rev());
        materials.extend(materials.clone().into_iter().rev());
        let cells = widths.len();

        let mesh = Mesh::new_1d(widths, materials.clone()).unwrap();
        let mut mat = Material::new(2, 1).unwrap();
        mat.set_sigma_t(0, 0, sigma[0]).unwrap();
        mat.set_sigma_t(1, 0, sigma[1]).unwrap();
        let quad = Quadrature::gauss_legendre(8).unwrap();
        let mut input = SolverInput::new(1);
        input.boundary = BoundaryConditions::uniform(BoundaryCondition::Reflect);
        let problem = Problem::new(&input, &mesh, &mat, &quad).unwrap();

        let mut sweeper = SnSweeper::from_problem(problem).unwrap();
        let q: Array1<f64> = materials.iter().map(|&m| 1.0 + m as f64).collect();
        let mut phi = Array1::zeros(cells);
        for _ in 0..300 {
            sweeper.sweep(&q, &mut phi);
        }
        for i in 0..cells / 2 {
            let (a, b) = (phi[i], phi[cells - 1 - i]);
            prop_assert!((a - b).abs() <= 1e-9 * a.abs().max(1.0), "cell {}: {} vs {}", i, a, b);
        }
    }

    /// Step difference is positive: a non-negative source with vacuum
    /// boundaries never yields negative flux.
    #[test]
    fn step_difference_non_negative(dimension in 1usize..4, n in 1usize..5, sigma_t in 0.1f64..10.0, hot in 0usize..64) {
        let mesh = mesh_of(dimension, n);
        let mut mat = Material::new(1, 1).unwrap();
        mat.set_sigma_t(0, 0, sigma_t).unwrap();
        let quad = quadrature_of(dimension);
        let mut input = SolverInput::new(1);
        input.equation = "sd".to_string();
        let problem = Problem::new(&input, &mesh, &mat, &quad).unwrap();
        let mut sweeper = SnSweeper::from_problem(problem).unwrap();

        let mut q = Array1::zeros(mesh.number_cells());
        q[hot % mesh.number_cells()] = 1.0;
        let mut phi = Array1::zeros(mesh.number_cells());
        sweeper.sweep(&q, &mut phi);
        prop_assert!(phi.iter().all(|&p| p >= 0.0));
        prop_assert!(phi[hot % mesh.number_cells()] > 0.0);
    }
}
