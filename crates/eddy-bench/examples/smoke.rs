//! Headless smoke plume.
//!
//! Injects density and an upward force near the bottom of the domain,
//! advances the solver frame by frame, and prints the density field as
//! ASCII shading every few frames.

use eddy_core::Device;
use eddy_solver::{Frame, GridFluidSolver, SolverConfig};

const N: usize = 48;
const FRAMES: u64 = 60;
const SHADES: &[u8] = b" .:-=+*#%@";

fn render(solver: &GridFluidSolver<f32>) {
    let Some(geometry) = solver.geometry() else {
        return;
    };
    let density = solver.density();
    // Two rows per character keeps the aspect roughly square.
    for j in (1..=N).rev().step_by(2) {
        let line: String = (1..=N)
            .map(|i| {
                let d = density[geometry.index(i, j)].clamp(0.0, 1.0);
                let k = (d * (SHADES.len() - 1) as f32).round() as usize;
                SHADES[k] as char
            })
            .collect();
        println!("|{line}|");
    }
}

fn main() {
    println!("=== Eddy Smoke Plume ===\n");

    let config = SolverConfig::builder()
        .device(Device::VectorizedCompute)
        .viscosity(0.0)
        .diffusion(1.0e-5)
        .build()
        .unwrap();
    let mut solver = GridFluidSolver::<f32>::new(config).unwrap();
    let h = 1.0 / N as f64;
    solver.resize_grid([N, N], [h, h], [0.0, 0.0]).unwrap();

    let mut frame = Frame::new(0, 0.1);
    solver.update(&frame).unwrap();

    for _ in 0..FRAMES {
        let geometry = *solver.geometry().unwrap();
        for i in N / 2 - 2..=N / 2 + 2 {
            let idx = geometry.index(i, 3);
            solver.density_source_mut()[idx] = 20.0;
            solver.v_source_mut()[idx] = 40.0;
        }

        frame.advance();
        solver.update(&frame).unwrap();

        if frame.index % 20 == 0 {
            let total: f32 = solver.density().iter().sum();
            println!(
                "frame {:3}  t={:.1}s  density={total:.3}  step={}us",
                frame.index,
                frame.time_in_seconds(),
                solver.last_metrics().total_us
            );
            render(&solver);
            println!();
        }
    }
}
