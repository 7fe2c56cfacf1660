//! Incompressibility projection.

use eddy_core::{dispatch_real, BoundaryMode, BufferViewMut, KernelError, Real, RealVisitor};
use eddy_kernels::grid_kernels;

use crate::check::{check_grid, GridLayout};
use crate::linear::relax;

const OP: &str = "project";

struct Project<'v> {
    u: BufferViewMut<'v>,
    v: BufferViewMut<'v>,
    pressure: BufferViewMut<'v>,
    divergence: BufferViewMut<'v>,
    scratch: BufferViewMut<'v>,
    layout: GridLayout,
    scale: f64,
}

impl RealVisitor for Project<'_> {
    type Output = Result<(), KernelError>;

    fn visit<R: Real>(self) -> Self::Output {
        let kernels = grid_kernels::<R>(OP, self.layout.device)?;
        let shape = self.layout.shape;
        let scale = R::from_f64(self.scale);
        let u = self.u.into_typed::<R>()?;
        let v = self.v.into_typed::<R>()?;
        let p = self.pressure.into_typed::<R>()?;
        let div = self.divergence.into_typed::<R>()?;
        let scratch = self.scratch.into_typed::<R>()?;

        kernels.divergence_2d(u, v, div, shape, scale);
        p.fill(R::ZERO);
        kernels.set_boundary_2d(div, shape, BoundaryMode::Scalar);

        relax(kernels, p, div, scratch, shape, [R::ONE, R::from_f64(4.0)], BoundaryMode::Scalar);

        kernels.subtract_gradient_2d(p, u, v, shape, scale);
        kernels.set_boundary_2d(u, shape, BoundaryMode::Horizontal);
        kernels.set_boundary_2d(v, shape, BoundaryMode::Vertical);
        Ok(())
    }
}

/// Remove the divergent part of the velocity `(u, v)`.
///
/// Computes the central-difference divergence into `divergence`, solves
/// the pressure Poisson equation into `pressure` starting from zero, and
/// subtracts the pressure gradient from the interior velocity. Finishes
/// with `Horizontal` boundaries on `u` and `Vertical` boundaries on `v`.
/// `scratch` is overwritten.
///
/// # Errors
///
/// Returns `Err` unless all five views share one device, one
/// floating-point element type, and one rank-2 shape of at least 3x3.
pub fn project(
    u: &mut BufferViewMut<'_>,
    v: &mut BufferViewMut<'_>,
    pressure: &mut BufferViewMut<'_>,
    divergence: &mut BufferViewMut<'_>,
    scratch: &mut BufferViewMut<'_>,
    scale: f64,
) -> Result<(), KernelError> {
    let layout = check_grid(
        OP,
        &[
            u.descriptor(),
            v.descriptor(),
            pressure.descriptor(),
            divergence.descriptor(),
            scratch.descriptor(),
        ],
    )?;
    dispatch_real(
        OP,
        layout.element_type,
        Project {
            u: u.reborrow(),
            v: v.reborrow(),
            pressure: pressure.reborrow(),
            divergence: divergence.reborrow(),
            scratch: scratch.reborrow(),
            layout,
            scale,
        },
    )?
}

#[cfg(test)]
mod tests {
    use super::*;
    use eddy_core::Device;
    use eddy_test_utils::view_mut;

    #[test]
    fn still_fluid_stays_still() {
        let mut u = vec![0.0f64; 25];
        let mut v = vec![0.0f64; 25];
        let (mut p, mut div, mut scratch) = (vec![1.0; 25], vec![1.0; 25], vec![1.0; 25]);
        let s = [5, 5];
        project(
            &mut view_mut(Device::Cpu, &s, &mut u),
            &mut view_mut(Device::Cpu, &s, &mut v),
            &mut view_mut(Device::Cpu, &s, &mut p),
            &mut view_mut(Device::Cpu, &s, &mut div),
            &mut view_mut(Device::Cpu, &s, &mut scratch),
            3.0,
        )
        .unwrap();
        assert!(u.iter().chain(&v).all(|&x| x == 0.0));
        assert!(p.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn integer_views_are_rejected() {
        let (mut a, mut b, mut c) = (vec![0i32; 16], vec![0i32; 16], vec![0i32; 16]);
        let (mut d, mut e) = (vec![0i32; 16], vec![0i32; 16]);
        let s = [4, 4];
        let err = project(
            &mut view_mut(Device::Cpu, &s, &mut a),
            &mut view_mut(Device::Cpu, &s, &mut b),
            &mut view_mut(Device::Cpu, &s, &mut c),
            &mut view_mut(Device::Cpu, &s, &mut d),
            &mut view_mut(Device::Cpu, &s, &mut e),
            4.0,
        )
        .unwrap_err();
        assert!(matches!(err, KernelError::Precondition { op: "project", .. }));
    }
}
