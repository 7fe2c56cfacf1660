//! Fixed-iteration relaxation for the implicit diffusion and pressure
//! Poisson systems.

use eddy_core::{
    dispatch_real, BoundaryMode, BufferView, BufferViewMut, GridKernels, KernelError, Real,
    RealVisitor,
};
use eddy_kernels::grid_kernels;

use crate::check::{check_grid, GridLayout};

/// Number of relaxation sweeps per solve. No convergence test is made.
pub const RELAXATION_ITERATIONS: usize = 20;

// The iterate must end in the caller's `x` buffer.
const _: () = assert!(RELAXATION_ITERATIONS % 2 == 0);

/// Run [`RELAXATION_ITERATIONS`] sweeps of
/// `scratch = (x0 + a * neighbours(x)) / c`, applying `mode` to each new
/// iterate before it becomes `x`.
pub(crate) fn relax<'a, R: Real>(
    kernels: &dyn GridKernels<R>,
    mut x: &'a mut [R],
    x0: &[R],
    mut scratch: &'a mut [R],
    shape: [usize; 2],
    [a, c]: [R; 2],
    mode: BoundaryMode,
) {
    for _ in 0..RELAXATION_ITERATIONS {
        kernels.relax_sweep_2d(x, x0, scratch, shape, a, c);
        kernels.set_boundary_2d(scratch, shape, mode);
        std::mem::swap(&mut x, &mut scratch);
    }
}

struct Solve<'v> {
    x: BufferViewMut<'v>,
    x0: BufferView<'v>,
    scratch: BufferViewMut<'v>,
    layout: GridLayout,
    coefficients: [f64; 2],
    mode: BoundaryMode,
}

impl RealVisitor for Solve<'_> {
    type Output = Result<(), KernelError>;

    fn visit<R: Real>(self) -> Self::Output {
        let kernels = grid_kernels::<R>(SOLVE, self.layout.device)?;
        let x0 = self.x0.typed::<R>()?;
        let x = self.x.into_typed::<R>()?;
        let scratch = self.scratch.into_typed::<R>()?;
        let [a, c] = self.coefficients.map(R::from_f64);
        relax(kernels, x, x0, scratch, self.layout.shape, [a, c], self.mode);
        Ok(())
    }
}

const SOLVE: &str = "solve_linear_system";

/// Approximately solve `c * x - a * neighbours(x) = x0` over the interior
/// of `x` by fixed-count Jacobi relaxation, using `scratch` for the
/// alternate iterate.
///
/// `x` holds the initial guess on entry and the result on return.
/// `scratch` is overwritten.
///
/// # Errors
///
/// Returns `Err` unless all three views share one device, one
/// floating-point element type, and one rank-2 shape of at least 3x3.
pub fn solve_linear_system(
    x: &mut BufferViewMut<'_>,
    x0: &BufferView<'_>,
    scratch: &mut BufferViewMut<'_>,
    a: f64,
    c: f64,
    mode: BoundaryMode,
) -> Result<(), KernelError> {
    let layout = check_grid(SOLVE, &[x.descriptor(), x0.descriptor(), scratch.descriptor()])?;
    dispatch_real(
        SOLVE,
        layout.element_type,
        Solve {
            x: x.reborrow(),
            x0: *x0,
            scratch: scratch.reborrow(),
            layout,
            coefficients: [a, c],
            mode,
        },
    )?
}

/// Implicit diffusion of `x0` into `x` at `rate` over `dt`.
///
/// `scale` is cells per unit length. Solves with `a = dt * rate * scale²`
/// and `c = 1 + 4a`; a zero rate reproduces `x0` with `mode` boundaries.
///
/// # Errors
///
/// As for [`solve_linear_system`].
pub fn diffuse(
    x: &mut BufferViewMut<'_>,
    x0: &BufferView<'_>,
    scratch: &mut BufferViewMut<'_>,
    rate: f64,
    dt: f64,
    mode: BoundaryMode,
    scale: f64,
) -> Result<(), KernelError> {
    let a = dt * rate * scale * scale;
    solve_linear_system(x, x0, scratch, a, 1.0 + 4.0 * a, mode)
}
