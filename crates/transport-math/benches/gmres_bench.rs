use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use transport_math::gmres::{gmres_solve, Gmres, GmresConfig};
use transport_math::matrix::{InsertMode, Matrix, MatrixBuilder};
use transport_math::solver::LinearSolver;

/// Upwinded convection-diffusion on a line: non-symmetric, tridiagonal.
fn convection_diffusion(n: usize) -> Matrix {
    let mut b = MatrixBuilder::new(n, n);
    b.preallocate_uniform(3).unwrap();
    for i in 0..n {
        if i > 0 {
            b.insert(i, i - 1, -1.4, InsertMode::Insert).unwrap();
        }
        b.insert(i, i, 2.5, InsertMode::Insert).unwrap();
        if i + 1 < n {
            b.insert(i, i + 1, -0.6, InsertMode::Insert).unwrap();
        }
    }
    b.assemble().unwrap()
}

fn bench_gmres_1000(c: &mut Criterion) {
    let a = convection_diffusion(1000);
    let rhs = vec![1.0; 1000];
    let config = GmresConfig::default();

    c.bench_function("gmres_1000", |b| {
        b.iter(|| {
            let mut op = a.clone();
            let mut x = vec![0.0; 1000];
            let res = gmres_solve(&mut op, &rhs, &mut x, None, &config);
            black_box(res.iterations);
        })
    });
}

fn bench_gmres_jacobi_1000(c: &mut Criterion) {
    let a = convection_diffusion(1000);
    let rhs = vec![1.0; 1000];

    c.bench_function("gmres_jacobi_1000", |b| {
        b.iter(|| {
            let mut solver = Gmres::new(a.clone(), GmresConfig::default());
            let mut x = vec![0.0; 1000];
            black_box(solver.solve(&rhs, &mut x).iterations);
        })
    });
}

criterion_group!(benches, bench_gmres_1000, bench_gmres_jacobi_1000);
criterion_main!(benches);
