//! Semi-Lagrangian advection.

use eddy_core::{
    dispatch_real, BoundaryMode, BufferView, BufferViewMut, KernelError, Real, RealVisitor,
};
use eddy_kernels::grid_kernels;

use crate::check::{check_grid, GridLayout};

const OP: &str = "advect";

struct Advect<'v> {
    field: BufferViewMut<'v>,
    prev: BufferView<'v>,
    u: BufferView<'v>,
    v: BufferView<'v>,
    layout: GridLayout,
    dt0: f64,
    mode: BoundaryMode,
}

impl RealVisitor for Advect<'_> {
    type Output = Result<(), KernelError>;

    fn visit<R: Real>(self) -> Self::Output {
        let kernels = grid_kernels::<R>(OP, self.layout.device)?;
        let prev = self.prev.typed::<R>()?;
        let u = self.u.typed::<R>()?;
        let v = self.v.typed::<R>()?;
        let field = self.field.into_typed::<R>()?;
        let shape = self.layout.shape;
        kernels.advect_2d(field, prev, u, v, shape, R::from_f64(self.dt0));
        kernels.set_boundary_2d(field, shape, self.mode);
        Ok(())
    }
}

/// Transport `prev` along the velocity `(u, v)` for `dt` into `field`.
///
/// Each interior cell is traced back by `dt * scale * (u, v)` cells, the
/// traced position is clamped to `[0.5, n + 0.5]` on each axis, and `prev`
/// is sampled there bilinearly. `mode` boundaries are applied afterwards.
/// `field` must not alias any input.
///
/// # Errors
///
/// Returns `Err` unless all four views share one device, one
/// floating-point element type, and one rank-2 shape of at least 3x3.
pub fn advect(
    field: &mut BufferViewMut<'_>,
    prev: &BufferView<'_>,
    u: &BufferView<'_>,
    v: &BufferView<'_>,
    dt: f64,
    mode: BoundaryMode,
    scale: f64,
) -> Result<(), KernelError> {
    let layout = check_grid(
        OP,
        &[field.descriptor(), prev.descriptor(), u.descriptor(), v.descriptor()],
    )?;
    dispatch_real(
        OP,
        layout.element_type,
        Advect {
            field: field.reborrow(),
            prev: *prev,
            u: *u,
            v: *v,
            layout,
            dt0: dt * scale,
            mode,
        },
    )?
}
