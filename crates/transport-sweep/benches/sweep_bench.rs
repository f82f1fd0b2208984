use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::Array1;
use std::hint::black_box;
use transport_sweep::sweeper::{SnSweeper, Sweep};
use transport_types::config::{BoundaryCondition, BoundaryConditions, SolverInput};
use transport_types::material::Material;
use transport_types::mesh::Mesh;
use transport_types::problem::Problem;
use transport_types::quadrature::Quadrature;

fn absorber() -> Material {
    let mut mat = Material::new(1, 1).unwrap();
    mat.set_sigma_t(0, 0, 1.0).unwrap();
    mat.set_sigma_s(0, 0, 0, 0.5).unwrap();
    mat
}

fn bench_sweep_1d(c: &mut Criterion) {
    let mesh = Mesh::uniform(1, 1000, 100.0, 0).unwrap();
    let mat = absorber();
    let quad = Quadrature::gauss_legendre(16).unwrap();
    let input = SolverInput::new(1);
    let problem = Problem::new(&input, &mesh, &mat, &quad).unwrap();
    let mut sweeper = SnSweeper::from_problem(problem).unwrap();
    let q = Array1::from_elem(1000, 1.0);
    let mut phi = Array1::zeros(1000);

    c.bench_function("sn_sweep_1d_1000_s16", |b| {
        b.iter(|| {
            sweeper.sweep(&q, &mut phi);
            black_box(phi[500]);
        })
    });
}

fn bench_sweep_2d(c: &mut Criterion) {
    let mesh = Mesh::uniform(2, 64, 64.0, 0).unwrap();
    let mat = absorber();
    let quad = Quadrature::product(2, 4, 2).unwrap();
    let mut input = SolverInput::new(1);
    input.boundary = BoundaryConditions::uniform(BoundaryCondition::Reflect);
    let problem = Problem::new(&input, &mesh, &mat, &quad).unwrap();
    let mut sweeper = SnSweeper::from_problem(problem).unwrap();
    let q = Array1::from_elem(mesh.number_cells(), 1.0);
    let mut phi = Array1::zeros(mesh.number_cells());

    c.bench_function("sn_sweep_2d_64x64", |b| {
        b.iter(|| {
            sweeper.sweep(&q, &mut phi);
            black_box(phi[0]);
        })
    });
}

fn bench_sweep_3d(c: &mut Criterion) {
    let mesh = Mesh::uniform(3, 16, 16.0, 0).unwrap();
    let mat = absorber();
    let quad = Quadrature::product(3, 2, 2).unwrap();
    let input = SolverInput::new(1);
    let problem = Problem::new(&input, &mesh, &mat, &quad).unwrap();
    let mut sweeper = SnSweeper::from_problem(problem).unwrap();
    let q = Array1::from_elem(mesh.number_cells(), 1.0);
    let mut phi = Array1::zeros(mesh.number_cells());

    let mut group = c.benchmark_group("sn_sweep_3d");
    group.sample_size(20);
    group.bench_function("16^3", |b| {
        b.iter(|| {
            sweeper.sweep(&q, &mut phi);
            black_box(phi[0]);
        })
    });
    group.finish();
}

criterion_group!(benches, bench_sweep_1d, bench_sweep_2d, bench_sweep_3d);
criterion_main!(benches);
