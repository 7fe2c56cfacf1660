//! Pressure projection drives the discrete divergence towards zero.

use eddy_core::{BoundaryMode, Device};
use eddy_solver::{project, set_boundary_condition};
use eddy_test_utils::fixtures::{random_halo_field, rng};
use eddy_test_utils::{interior_sum_sq, view_mut};

const SHAPE: [usize; 2] = [6, 6];
const SCALE: f64 = 4.0;

/// Central-difference divergence in the same units `project` uses.
fn divergence(u: &[f64], v: &[f64]) -> Vec<f64> {
    let [w, h] = SHAPE;
    let mut div = vec![0.0; w * h];
    for j in 1..h - 1 {
        for i in 1..w - 1 {
            let k = i + w * j;
            div[k] = -0.5 * ((u[k + 1] - u[k - 1]) + (v[k + w] - v[k - w])) / SCALE;
        }
    }
    div
}

fn residual(u: &[f64], v: &[f64]) -> f64 {
    interior_sum_sq(&divergence(u, v), SHAPE)
}

struct Flow {
    u: Vec<f64>,
    v: Vec<f64>,
    pressure: Vec<f64>,
    div: Vec<f64>,
    scratch: Vec<f64>,
}

impl Flow {
    fn random(seed: u64, device: Device) -> Self {
        let mut r = rng(seed);
        let mut u = random_halo_field(&mut r, SHAPE, -1.0, 1.0);
        let mut v = random_halo_field(&mut r, SHAPE, -1.0, 1.0);
        set_boundary_condition(&mut view_mut(device, &SHAPE, &mut u), BoundaryMode::Horizontal)
            .unwrap();
        set_boundary_condition(&mut view_mut(device, &SHAPE, &mut v), BoundaryMode::Vertical)
            .unwrap();
        let n = u.len();
        Self {
            u,
            v,
            pressure: vec![0.0; n],
            div: vec![0.0; n],
            scratch: vec![0.0; n],
        }
    }

    fn project(&mut self, device: Device) {
        project(
            &mut view_mut(device, &SHAPE, &mut self.u),
            &mut view_mut(device, &SHAPE, &mut self.v),
            &mut view_mut(device, &SHAPE, &mut self.pressure),
            &mut view_mut(device, &SHAPE, &mut self.div),
            &mut view_mut(device, &SHAPE, &mut self.scratch),
            SCALE,
        )
        .unwrap();
    }
}

#[test]
fn one_projection_reduces_divergence() {
    for seed in 0..16 {
        let mut flow = Flow::random(seed, Device::Cpu);
        let before = residual(&flow.u, &flow.v);
        flow.project(Device::Cpu);
        let after = residual(&flow.u, &flow.v);
        assert!(after < 0.75 * before, "seed {seed}: {before} -> {after}");
    }
}

#[test]
fn repeated_projection_converges() {
    for seed in 0..16 {
        let mut flow = Flow::random(seed, Device::VectorizedCompute);
        let initial = residual(&flow.u, &flow.v);
        let mut last = initial;
        for pass in 0..20 {
            flow.project(Device::VectorizedCompute);
            let now = residual(&flow.u, &flow.v);
            assert!(now <= last * (1.0 + 1e-9), "seed {seed} pass {pass}: {last} -> {now}");
            last = now;
        }
        assert!(last < 0.01 * initial, "seed {seed}: {initial} -> {last}");
    }
}

#[test]
fn projection_is_identical_across_backends() {
    let mut cpu = Flow::random(99, Device::Cpu);
    let mut lanes = Flow::random(99, Device::Cpu);
    cpu.project(Device::Cpu);
    lanes.project(Device::VectorizedCompute);
    assert_eq!(cpu.u, lanes.u);
    assert_eq!(cpu.v, lanes.v);
    assert_eq!(cpu.pressure, lanes.pressure);
}
