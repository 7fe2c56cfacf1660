//! Ghost-halo boundary conditions.

use eddy_core::{dispatch_real, BoundaryMode, BufferViewMut, KernelError, Real, RealVisitor};
use eddy_kernels::grid_kernels;

use crate::check::{check_grid, GridLayout};

const OP: &str = "set_boundary_condition";

struct SetBoundary<'v> {
    field: BufferViewMut<'v>,
    layout: GridLayout,
    mode: BoundaryMode,
}

impl RealVisitor for SetBoundary<'_> {
    type Output = Result<(), KernelError>;

    fn visit<R: Real>(self) -> Self::Output {
        let kernels = grid_kernels::<R>(OP, self.layout.device)?;
        kernels.set_boundary_2d(self.field.into_typed::<R>()?, self.layout.shape, self.mode);
        Ok(())
    }
}

/// Fill the one-cell halo of a rank-2 `field` from its adjacent interior
/// cells.
///
/// The mirrored value is negated across the left and right walls for
/// [`BoundaryMode::Horizontal`] and across the bottom and top walls for
/// [`BoundaryMode::Vertical`]. Each corner is then set to the mean of its
/// two edge neighbours.
///
/// # Errors
///
/// [`KernelError::Precondition`] unless `field` is a floating-point rank-2
/// view of at least 3x3 cells; [`KernelError::UnsupportedDevice`] if its
/// device has no grid kernels.
pub fn set_boundary_condition(
    field: &mut BufferViewMut<'_>,
    mode: BoundaryMode,
) -> Result<(), KernelError> {
    let layout = check_grid(OP, &[field.descriptor()])?;
    dispatch_real(
        OP,
        layout.element_type,
        SetBoundary {
            field: field.reborrow(),
            layout,
            mode,
        },
    )?
}

#[cfg(test)]
mod tests {
    use super::*;
    use eddy_core::Device;
    use eddy_test_utils::{fixtures::halo_field, view_mut};

    /// 3 x 3 interior with distinct values `10 * j + i`.
    fn distinct() -> Vec<f64> {
        halo_field([5, 5], |i, j| (10 * j + i) as f64)
    }

    fn at(f: &[f64], i: usize, j: usize) -> f64 {
        f[i + 5 * j]
    }

    #[test]
    fn scalar_mode_mirrors_without_sign_change() {
        let mut f = distinct();
        let mut view = view_mut(Device::Cpu, &[5, 5], &mut f);
        set_boundary_condition(&mut view, BoundaryMode::Scalar).unwrap();
        for k in 1..4 {
            assert_eq!(at(&f, 0, k), at(&f, 1, k));
            assert_eq!(at(&f, 4, k), at(&f, 3, k));
            assert_eq!(at(&f, k, 0), at(&f, k, 1));
            assert_eq!(at(&f, k, 4), at(&f, k, 3));
        }
    }

    #[test]
    fn horizontal_mode_negates_side_walls_only() {
        let mut f = distinct();
        let mut view = view_mut(Device::Cpu, &[5, 5], &mut f);
        set_boundary_condition(&mut view, BoundaryMode::Horizontal).unwrap();
        for k in 1..4 {
            assert_eq!(at(&f, 0, k), -at(&f, 1, k));
            assert_eq!(at(&f, 4, k), -at(&f, 3, k));
            assert_eq!(at(&f, k, 0), at(&f, k, 1));
            assert_eq!(at(&f, k, 4), at(&f, k, 3));
        }
    }

    #[test]
    fn vertical_mode_negates_end_walls_only() {
        let mut f = distinct();
        set_boundary_condition(
            &mut view_mut(Device::VectorizedCompute, &[5, 5], &mut f),
            BoundaryMode::Vertical,
        )
        .unwrap();
        for k in 1..4 {
            assert_eq!(at(&f, 0, k), at(&f, 1, k));
            assert_eq!(at(&f, k, 0), -at(&f, k, 1));
            assert_eq!(at(&f, k, 4), -at(&f, k, 3));
        }
    }

    #[test]
    fn corners_average_edge_neighbours() {
        for mode in [BoundaryMode::Scalar, BoundaryMode::Horizontal, BoundaryMode::Vertical] {
            let mut f = distinct();
            let mut view = view_mut(Device::Cpu, &[5, 5], &mut f);
            set_boundary_condition(&mut view, mode).unwrap();
            assert_eq!(at(&f, 0, 0), 0.5 * (at(&f, 1, 0) + at(&f, 0, 1)));
            assert_eq!(at(&f, 4, 0), 0.5 * (at(&f, 3, 0) + at(&f, 4, 1)));
            assert_eq!(at(&f, 0, 4), 0.5 * (at(&f, 1, 4) + at(&f, 0, 3)));
            assert_eq!(at(&f, 4, 4), 0.5 * (at(&f, 3, 4) + at(&f, 4, 3)));
        }
    }

    #[test]
    fn integer_fields_are_rejected() {
        let mut f = vec![0i32; 16];
        let mut view = view_mut(Device::Cpu, &[4, 4], &mut f);
        let err = set_boundary_condition(&mut view, BoundaryMode::Scalar).unwrap_err();
        assert!(matches!(err, KernelError::Precondition { .. }));
    }

    #[test]
    fn gpu_is_unsupported() {
        let mut f = vec![0.0f32; 16];
        let mut view = view_mut(Device::GpuCompute, &[4, 4], &mut f);
        let err = set_boundary_condition(&mut view, BoundaryMode::Scalar).unwrap_err();
        assert_eq!(
            err,
            KernelError::UnsupportedDevice {
                op: OP,
                device: Device::GpuCompute
            }
        );
    }
}
