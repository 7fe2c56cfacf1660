//! Criterion micro-benchmarks for the array and grid kernels.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use eddy_core::{BoundaryMode, Device};
use eddy_kernels::{add, axpy_in_place, pad_edge};
use eddy_solver::{project, set_boundary_condition, solve_linear_system};
use eddy_test_utils::fixtures::{random_halo_field, rng, uniform};
use eddy_test_utils::{view, view_mut};

const DEVICES: [Device; 2] = [Device::Cpu, Device::VectorizedCompute];

fn bench_add(c: &mut Criterion) {
    let n = 1 << 20;
    let mut r = rng(1);
    let a = uniform::<f32>(&mut r, n, -1.0, 1.0);
    let b = uniform::<f32>(&mut r, n, -1.0, 1.0);
    let mut out = vec![0.0f32; n];

    let mut group = c.benchmark_group("add_1m");
    group.throughput(Throughput::Elements(n as u64));
    for device in DEVICES {
        group.bench_with_input(BenchmarkId::from_parameter(device), &device, |bench, &d| {
            let av = view(d, &[n], &a);
            let bv = view(d, &[n], &b);
            bench.iter(|| {
                add(&av, &bv, &mut view_mut(d, &[n], &mut out)).unwrap();
                black_box(out[0]);
            });
        });
    }
    group.finish();
}

fn bench_axpy_in_place(c: &mut Criterion) {
    let n = 1 << 20;
    let mut r = rng(2);
    let x = uniform::<f64>(&mut r, n, -1.0, 1.0);
    let mut y = vec![0.0f64; n];
    let scale = [1.0e-3f64];

    let mut group = c.benchmark_group("axpy_in_place_1m");
    group.throughput(Throughput::Elements(n as u64));
    for device in DEVICES {
        group.bench_with_input(BenchmarkId::from_parameter(device), &device, |bench, &d| {
            let av = view(d, &[1], &scale);
            let xv = view(d, &[n], &x);
            bench.iter(|| {
                axpy_in_place(&av, &xv, &mut view_mut(d, &[n], &mut y)).unwrap();
                black_box(y[0]);
            });
        });
    }
    group.finish();
}

fn bench_pad_edge(c: &mut Criterion) {
    let shape = [512, 512];
    let mut data = uniform::<f32>(&mut rng(3), shape[0] * shape[1], 0.0, 1.0);

    c.bench_function("pad_edge_512x512", |bench| {
        bench.iter(|| {
            let mut v = view_mut(Device::Cpu, &shape, &mut data);
            pad_edge(&mut v, [[4, 4], [4, 4], [0, 0]]).unwrap();
            black_box(data[0]);
        });
    });
}

fn bench_boundary(c: &mut Criterion) {
    let shape = [258, 258];
    let mut field = random_halo_field::<f32>(&mut rng(4), shape, -1.0, 1.0);

    c.bench_function("set_boundary_256", |bench| {
        bench.iter(|| {
            let mut v = view_mut(Device::Cpu, &shape, &mut field);
            set_boundary_condition(&mut v, BoundaryMode::Horizontal).unwrap();
            black_box(field[0]);
        });
    });
}

fn bench_relaxation(c: &mut Criterion) {
    let shape = [258, 258];
    let len = shape[0] * shape[1];
    let x0 = random_halo_field::<f32>(&mut rng(5), shape, 0.0, 1.0);
    let mut x = vec![0.0f32; len];
    let mut scratch = vec![0.0f32; len];

    let mut group = c.benchmark_group("relax_256");
    for device in DEVICES {
        group.bench_with_input(BenchmarkId::from_parameter(device), &device, |bench, &d| {
            let x0v = view(d, &shape, &x0);
            bench.iter(|| {
                solve_linear_system(
                    &mut view_mut(d, &shape, &mut x),
                    &x0v,
                    &mut view_mut(d, &shape, &mut scratch),
                    0.25,
                    2.0,
                    BoundaryMode::Scalar,
                )
                .unwrap();
                black_box(x[len / 2]);
            });
        });
    }
    group.finish();
}

fn bench_project(c: &mut Criterion) {
    let shape = [130, 130];
    let len = shape[0] * shape[1];
    let mut r = rng(6);
    let u0 = random_halo_field::<f32>(&mut r, shape, -1.0, 1.0);
    let v0 = random_halo_field::<f32>(&mut r, shape, -1.0, 1.0);
    let mut u = u0.clone();
    let mut v = v0.clone();
    let mut p = vec![0.0f32; len];
    let mut div = vec![0.0f32; len];
    let mut scratch = vec![0.0f32; len];

    c.bench_function("project_128", |bench| {
        bench.iter(|| {
            u.copy_from_slice(&u0);
            v.copy_from_slice(&v0);
            project(
                &mut view_mut(Device::Cpu, &shape, &mut u),
                &mut view_mut(Device::Cpu, &shape, &mut v),
                &mut view_mut(Device::Cpu, &shape, &mut p),
                &mut view_mut(Device::Cpu, &shape, &mut div),
                &mut view_mut(Device::Cpu, &shape, &mut scratch),
                128.0,
            )
            .unwrap();
            black_box(u[len / 2]);
        });
    });
}

criterion_group!(
    benches,
    bench_add,
    bench_axpy_in_place,
    bench_pad_edge,
    bench_boundary,
    bench_relaxation,
    bench_project
);
criterion_main!(benches);
