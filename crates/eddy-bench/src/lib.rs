//! Benchmark profiles and utilities for the Eddy fluid solver.
//!
//! - [`reference_profile`]: 64x64 interior with moderate viscosity
//! - [`stress_profile`]: 256x256 interior for throughput runs
//! - [`seed_sources`]: deterministic density and velocity injection

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use eddy_core::Device;
use eddy_solver::{GridFluidSolver, SolverConfig, SolverError};

/// Frame interval used by the profiles.
pub const PROFILE_DT: f64 = 1.0 / 60.0;

/// Build a solver with a square interior of `n` cells per axis.
///
/// Spacing is `1 / n`, so the domain is the unit square.
pub fn solver_profile(
    n: usize,
    device: Device,
    viscosity: f64,
    diffusion: f64,
) -> Result<GridFluidSolver<f32>, SolverError> {
    let config = SolverConfig::builder()
        .device(device)
        .viscosity(viscosity)
        .diffusion(diffusion)
        .build()?;
    let mut solver = GridFluidSolver::new(config)?;
    let h = 1.0 / n as f64;
    solver.resize_grid([n, n], [h, h], [0.0, 0.0])?;
    Ok(solver)
}

/// Reference profile: 64x64 interior (4K cells).
pub fn reference_profile(device: Device) -> Result<GridFluidSolver<f32>, SolverError> {
    solver_profile(64, device, 1.0e-4, 1.0e-5)
}

/// Stress profile: 256x256 interior (~65K cells), 16x the reference.
pub fn stress_profile(device: Device) -> Result<GridFluidSolver<f32>, SolverError> {
    solver_profile(256, device, 1.0e-4, 1.0e-5)
}

/// Deterministic interior cell indices `(i, j)` for `count` sources.
///
/// Uses a multiplicative hash of `seed`; the result is reproducible
/// and every index lies in `1..=n`.
pub fn source_cells(n: usize, count: usize, seed: u64) -> Vec<(usize, usize)> {
    (0..count as u64)
        .map(|k| {
            let h = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(k.wrapping_mul(1442695040888963407));
            let i = (h >> 33) as usize % n + 1;
            let j = (h >> 13) as usize % n + 1;
            (i, j)
        })
        .collect()
}

/// Inject density and an upward velocity kick at `count` seeded cells.
///
/// Does nothing if the solver has no grid.
pub fn seed_sources(solver: &mut GridFluidSolver<f32>, count: usize, seed: u64) {
    let Some(geometry) = solver.geometry().copied() else {
        return;
    };
    let n = geometry.resolution()[0].min(geometry.resolution()[1]);
    for (i, j) in source_cells(n, count, seed) {
        let idx = geometry.index(i, j);
        solver.density_source_mut()[idx] += 100.0;
        solver.v_source_mut()[idx] += 5.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_allocate_grids() {
        let solver = reference_profile(Device::Cpu).unwrap();
        assert_eq!(solver.geometry().unwrap().resolution(), [64, 64]);
        assert_eq!(solver.density().len(), 66 * 66);

        let solver = stress_profile(Device::VectorizedCompute).unwrap();
        assert_eq!(solver.geometry().unwrap().resolution(), [256, 256]);
    }

    #[test]
    fn source_cells_stay_in_the_interior() {
        for (i, j) in source_cells(10, 200, 7) {
            assert!((1..=10).contains(&i), "i = {i}");
            assert!((1..=10).contains(&j), "j = {j}");
        }
    }

    #[test]
    fn source_cells_deterministic() {
        assert_eq!(source_cells(64, 8, 42), source_cells(64, 8, 42));
    }

    #[test]
    fn seeded_sources_step_cleanly() {
        let mut solver = reference_profile(Device::Cpu).unwrap();
        seed_sources(&mut solver, 16, 42);
        solver.advance_time_step(PROFILE_DT).unwrap();
        assert!(solver.density().iter().all(|d| d.is_finite()));
        assert!(solver.density().iter().any(|&d| d > 0.0));
    }
}
