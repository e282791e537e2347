//! Benchmarks for the blade design pipeline.
//!
//! Covers the polar surface build, a single BEM sweep, the full fixed-iteration
//! design and the 3D projection of all stations.
//!
//! Run with: `cargo bench`

use std::f64::consts::PI;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use windblade_calc::{
    AirfoilShape, BladeDesign, BladeSolver, GeometryProjector, PolarSample, PolarSurface,
    RotorConstants, RotorState, Vec2,
};

/// Generate a polar table with a linear lift range and a parabolic drag polar
fn generate_polar(re_count: usize, alpha_count: usize) -> Vec<PolarSample> {
    let mut samples = Vec::with_capacity(re_count * alpha_count);
    for i in 0..re_count {
        let re = 50000.0 + 450000.0 * i as f64 / (re_count - 1) as f64;
        for k in 0..alpha_count {
            let alpha = -10.0 + 24.0 * k as f64 / (alpha_count - 1) as f64;
            let cl = if alpha <= 10.0 { 0.1 + 0.1 * alpha } else { 1.1 - 0.05 * (alpha - 10.0) };
            let cd = (0.01 + 0.0004 * alpha * alpha) * (200000.0 / re).powf(0.2);
            samples.push(PolarSample::new(re, alpha, cl, cd, cl / cd));
        }
    }
    samples
}

/// Generate a closed 61-point symmetric profile, leading edge at index 30
fn generate_shape() -> AirfoilShape {
    let points = (0..61)
        .map(|i| {
            let theta = PI * i as f64 / 30.0;
            let x = 0.5 * (1.0 + theta.cos());
            let t = 0.6 * (0.2969 * x.sqrt() - 0.126 * x - 0.3516 * x * x + 0.2843 * x.powi(3) - 0.1015 * x.powi(4));
            Vec2::new(x, if i <= 30 { t } else { -t })
        })
        .collect();
    AirfoilShape::new(points)
}

/// Benchmark polar surface construction at several table sizes
fn bench_polar_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("PolarSurface");

    for &(re_count, alpha_count) in &[(4, 13), (8, 49), (16, 97)] {
        let samples = generate_polar(re_count, alpha_count);
        group.throughput(Throughput::Elements(samples.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("build", samples.len()),
            &samples,
            |bencher, samples| bencher.iter(|| PolarSurface::build(samples)),
        );
    }

    let polar = PolarSurface::build(&generate_polar(8, 49)).unwrap();
    group.bench_function("best_alpha_100", |bencher| {
        bencher.iter(|| polar.best_alpha(120000.0, -10.0, 14.0, 100))
    });

    group.finish();
}

/// Benchmark one sweep and the full solve
fn bench_solver(c: &mut Criterion) {
    let polar = PolarSurface::build(&generate_polar(8, 49)).unwrap();
    let constants = RotorConstants::small_s822();
    let solver = BladeSolver::new(&polar, &constants);
    let initial = RotorState::new(&constants).unwrap();

    let mut group = c.benchmark_group("BladeSolver");
    group.throughput(Throughput::Elements(constants.section_count as u64));

    group.bench_function("sweep", |bencher| bencher.iter(|| solver.sweep(&initial)));
    group.bench_function("solve_10", |bencher| {
        bencher.iter(|| solver.solve(initial.clone(), 10))
    });

    // More stations, same rotor
    let mut fine = constants.clone();
    fine.section_count = 64;
    let fine_solver = BladeSolver::new(&polar, &fine);
    let fine_initial = RotorState::new(&fine).unwrap();
    group.bench_function("solve_10_64_stations", |bencher| {
        bencher.iter(|| fine_solver.solve(fine_initial.clone(), 10))
    });

    group.finish();
}

/// Benchmark projection and the end-to-end design
fn bench_design(c: &mut Criterion) {
    let polar = PolarSurface::build(&generate_polar(8, 49)).unwrap();
    let constants = RotorConstants::small_s822();
    let shape = generate_shape();
    let state = BladeSolver::new(&polar, &constants)
        .solve(RotorState::new(&constants).unwrap(), 10)
        .unwrap()
        .state;
    let projector = GeometryProjector::new(constants.projection);

    let mut group = c.benchmark_group("Design");

    group.bench_function("project_rotor", |bencher| {
        bencher.iter(|| projector.project_rotor(&state, &shape))
    });
    group.bench_function("run", |bencher| {
        bencher.iter(|| BladeDesign::new(&constants, &polar).run(&shape))
    });

    group.finish();
}

criterion_group!(benches, bench_polar_build, bench_solver, bench_design);
criterion_main!(benches);
