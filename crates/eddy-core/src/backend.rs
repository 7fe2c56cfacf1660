//! Backend kernel traits.
//!
//! Each device backend implements [`ArrayKernels`] for every [`Element`]
//! type and [`GridKernels`] for every [`Real`] type. Operands reach these
//! traits already validated and reinterpreted as typed slices, so
//! implementations never re-check lengths or devices.

use crate::element::{Element, Real};
use crate::error::KernelError;

/// Elementwise operation with one input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// `out = a`.
    Copy,
}

impl UnaryOp {
    /// Apply to one element.
    #[inline]
    pub fn apply<T: Element>(self, a: T) -> T {
        match self {
            Self::Copy => a,
        }
    }

    /// Operation name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Copy => "copy",
        }
    }
}

/// Elementwise operation with two inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// `out = a + b`.
    Add,
    /// `out = a - b`.
    Sub,
    /// `out = a * b`.
    Mul,
    /// `out = a / b`.
    Div,
}

impl BinaryOp {
    /// All binary operations.
    pub const ALL: [BinaryOp; 4] = [BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul, BinaryOp::Div];

    /// Apply to one pair of elements.
    #[inline]
    pub fn apply<T: Element>(self, a: T, b: T) -> T {
        match self {
            Self::Add => a.plus(b),
            Self::Sub => a.minus(b),
            Self::Mul => a.times(b),
            Self::Div => a.over(b),
        }
    }

    /// Operation name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
        }
    }
}

/// Elementwise operation with three inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TernaryOp {
    /// `out = a * x + y`.
    Axpy,
}

impl TernaryOp {
    /// Apply to one triple of elements.
    #[inline]
    pub fn apply<T: Element>(self, a: T, x: T, y: T) -> T {
        match self {
            Self::Axpy => a.times(x).plus(y),
        }
    }

    /// Operation name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Axpy => "axpy",
        }
    }
}

/// The leading operand of an elementwise kernel: a broadcast scalar or a
/// vector of the output's length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operand<'a, T> {
    /// One value applied at every index.
    Scalar(T),
    /// One value per index.
    Vector(&'a [T]),
}

impl<'a, T: Element> Operand<'a, T> {
    /// Classify a typed slice: length 1 broadcasts.
    pub fn from_slice(s: &'a [T]) -> Self {
        if s.len() == 1 {
            Self::Scalar(s[0])
        } else {
            Self::Vector(s)
        }
    }

    /// Value at index `i`.
    #[inline]
    pub fn at(&self, i: usize) -> T {
        match self {
            Self::Scalar(v) => *v,
            Self::Vector(s) => s[i],
        }
    }
}

/// Which velocity component a boundary condition is applied to.
///
/// Selects which walls negate the mirrored value so that the normal
/// velocity component vanishes at solid walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryMode {
    /// Scalar field (density, pressure): no sign flips (mode 0).
    Scalar,
    /// Horizontal velocity: negated across left/right walls (mode 1).
    Horizontal,
    /// Vertical velocity: negated across top/bottom walls (mode 2).
    Vertical,
}

impl BoundaryMode {
    /// Returns `true` if the left/right halo columns take the negated value.
    #[inline]
    pub fn flips_side_walls(self) -> bool {
        self == Self::Horizontal
    }

    /// Returns `true` if the bottom/top halo rows take the negated value.
    #[inline]
    pub fn flips_end_walls(self) -> bool {
        self == Self::Vertical
    }
}

impl TryFrom<i32> for BoundaryMode {
    type Error = KernelError;

    fn try_from(mode: i32) -> Result<Self, Self::Error> {
        match mode {
            0 => Ok(Self::Scalar),
            1 => Ok(Self::Horizontal),
            2 => Ok(Self::Vertical),
            other => Err(KernelError::Precondition {
                op: "boundary_mode",
                reason: format!("unknown boundary mode {other}"),
            }),
        }
    }
}

/// Elementwise and padding kernels for one element type on one backend.
pub trait ArrayKernels<T: Element>: Send + Sync {
    /// Backend name for diagnostics.
    fn name(&self) -> &'static str;

    /// `out[i] = op(a[i])`.
    fn unary(&self, op: UnaryOp, a: Operand<'_, T>, out: &mut [T]);

    /// `out[i] = op(a[i], b[i])`. `b.len() == out.len()`.
    fn binary(&self, op: BinaryOp, a: Operand<'_, T>, b: &[T], out: &mut [T]);

    /// `out[i] = op(a[i], b[i], c[i])`.
    fn ternary(&self, op: TernaryOp, a: Operand<'_, T>, b: &[T], c: &[T], out: &mut [T]);

    /// `acc[i] = op(a[i], b[i], acc[i])`.
    fn ternary_assign(&self, op: TernaryOp, a: Operand<'_, T>, b: &[T], acc: &mut [T]);

    /// Edge-replicate the `[low, high]` halo of a rank-1 buffer.
    fn pad_edge_1d(&self, data: &mut [T], pad: [usize; 2]);

    /// Edge-replicate the halo of a rank-2 buffer of shape `[w, h]`.
    fn pad_edge_2d(&self, data: &mut [T], shape: [usize; 2], pad: [[usize; 2]; 2]);

    /// Edge-replicate the halo of a rank-3 buffer of shape `[w, h, d]`.
    fn pad_edge_3d(&self, data: &mut [T], shape: [usize; 3], pad: [[usize; 2]; 3]);
}

/// Stencil kernels over 2D fields with a one-cell ghost halo.
///
/// `shape` is the storage shape `[w, h]` including the halo; the interior
/// is `1..w-1 × 1..h-1`.
pub trait GridKernels<R: Real>: Send + Sync {
    /// Backend name for diagnostics.
    fn name(&self) -> &'static str;

    /// Fill the halo from the adjacent interior according to `mode`, then
    /// set each corner to the mean of its two edge neighbours.
    fn set_boundary_2d(&self, field: &mut [R], shape: [usize; 2], mode: BoundaryMode);

    /// One relaxation sweep over the interior:
    /// `out = (x0 + a * (x[W] + x[E] + x[S] + x[N])) / c`.
    fn relax_sweep_2d(&self, x: &[R], x0: &[R], out: &mut [R], shape: [usize; 2], a: R, c: R);

    /// Semi-Lagrangian backtrace of `prev` along `(u, v) * dt0` into the
    /// interior of `field`. Does not touch the halo.
    fn advect_2d(&self, field: &mut [R], prev: &[R], u: &[R], v: &[R], shape: [usize; 2], dt0: R);

    /// `div = -0.5 * ((u[E] - u[W]) + (v[N] - v[S])) / scale` over the interior.
    fn divergence_2d(&self, u: &[R], v: &[R], div: &mut [R], shape: [usize; 2], scale: R);

    /// `u -= 0.5 * scale * (p[E] - p[W])`, `v -= 0.5 * scale * (p[N] - p[S])`
    /// over the interior.
    fn subtract_gradient_2d(&self, p: &[R], u: &mut [R], v: &mut [R], shape: [usize; 2], scale: R);
}
