use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use transport_solvers::manager::EigenvalueManager;
use transport_types::config::{BoundaryCondition, BoundaryConditions, SolverInput};
use transport_types::material::Material;
use transport_types::mesh::Mesh;
use transport_types::problem::Problem;
use transport_types::quadrature::Quadrature;

/// Two-group fuel with thermal upscatter.
fn two_group_fuel() -> Material {
    let mut mat = Material::new(1, 2).unwrap();
    mat.set_group_data(0, &[1.0, 1.5], &[0.1, 0.4], &[1.0, 0.0]).unwrap();
    mat.set_sigma_s(0, 0, 0, 0.6).unwrap();
    mat.set_sigma_s(0, 1, 0, 0.3).unwrap();
    mat.set_sigma_s(0, 0, 1, 0.05).unwrap();
    mat.set_sigma_s(0, 1, 1, 1.2).unwrap();
    mat
}

fn input_for(inner: &str, dsa: bool) -> SolverInput {
    let mut input = SolverInput::new(2);
    input.inner_solver = inner.to_string();
    input.inner_use_dsa = dsa;
    input.eigen_tolerance = 1e-6;
    input.outer_tolerance = 1e-7;
    input.inner_tolerance = 1e-8;
    input.boundary.bc_west = BoundaryCondition::Reflect;
    input
}

fn bench_slab_inner_solvers(c: &mut Criterion) {
    let mesh = Mesh::uniform(1, 100, 50.0, 0).unwrap();
    let mat = two_group_fuel();
    let quad = Quadrature::gauss_legendre(8).unwrap();

    let mut group = c.benchmark_group("eigen_slab_100_s8");
    for (label, inner, dsa) in [("si", "si", false), ("si_dsa", "si", true), ("gmres", "gmres", false)] {
        let input = input_for(inner, dsa);
        group.bench_with_input(BenchmarkId::from_parameter(label), &input, |b, input| {
            b.iter(|| {
                let problem = Problem::new(input, &mesh, &mat, &quad).unwrap();
                let mut manager = EigenvalueManager::new(problem).unwrap();
                black_box(manager.solve().unwrap().keff)
            })
        });
    }
    group.finish();
}

fn bench_reflective_2d(c: &mut Criterion) {
    let mesh = Mesh::uniform(2, 16, 16.0, 0).unwrap();
    let mat = two_group_fuel();
    let quad = Quadrature::product(2, 2, 2).unwrap();
    let mut input = input_for("gmres", true);
    input.boundary = BoundaryConditions::uniform(BoundaryCondition::Reflect);

    c.bench_function("eigen_2d_16x16_reflective", |b| {
        b.iter(|| {
            let problem = Problem::new(&input, &mesh, &mat, &quad).unwrap();
            let mut manager = EigenvalueManager::new(problem).unwrap();
            black_box(manager.solve().unwrap().keff)
        })
    });
}

criterion_group!(benches, bench_slab_inner_solvers, bench_reflective_2d);
criterion_main!(benches);
