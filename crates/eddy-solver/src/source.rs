//! Source injection.

use eddy_core::{dispatch_real, BufferView, BufferViewMut, KernelError, Real, RealVisitor};
use eddy_kernels::axpy_in_place;

const OP: &str = "add_source";

struct AddSource<'a, 'v> {
    x: &'a mut BufferViewMut<'v>,
    s: &'a BufferView<'a>,
    dt: f64,
}

impl RealVisitor for AddSource<'_, '_> {
    type Output = Result<(), KernelError>;

    fn visit<R: Real>(self) -> Self::Output {
        let dt = R::from_f64(self.dt);
        axpy_in_place(&BufferView::scalar(self.x.device(), &dt), self.s, self.x)
    }
}

/// `x += dt * s`.
///
/// # Errors
///
/// [`KernelError::Precondition`] for integer element types; otherwise as
/// for [`axpy_in_place`].
pub fn add_source(
    x: &mut BufferViewMut<'_>,
    s: &BufferView<'_>,
    dt: f64,
) -> Result<(), KernelError> {
    dispatch_real(OP, x.element_type(), AddSource { x, s, dt })?
}
