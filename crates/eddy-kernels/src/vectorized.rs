//! Lane-blocked backend.
//!
//! Runs on the calling thread and evaluates outputs in fixed blocks of
//! [`LANES`] elements so the optimiser can keep each block in vector
//! registers. The tail that does not fill a block is finished one element
//! at a time. Results are bit-identical to [`CpuBackend`](crate::CpuBackend).

use eddy_core::{
    ArrayKernels, BinaryOp, BoundaryMode, Element, GridKernels, Operand, Real, TernaryOp, UnaryOp,
};

use crate::stencil;

/// Elements evaluated per block.
pub const LANES: usize = 8;

/// Lane-blocked single-thread backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct VectorizedBackend;

/// `out[i] = f(i)` in blocks of [`LANES`].
#[inline]
fn fill_lanes<T: Copy>(out: &mut [T], f: impl Fn(usize) -> T) {
    let mut base = 0;
    let mut blocks = out.chunks_exact_mut(LANES);
    for block in &mut blocks {
        let lane: [T; LANES] = std::array::from_fn(|l| f(base + l));
        block.copy_from_slice(&lane);
        base += LANES;
    }
    for (l, slot) in blocks.into_remainder().iter_mut().enumerate() {
        *slot = f(base + l);
    }
}

/// `acc[i] = f(i, acc[i])` in blocks of [`LANES`].
#[inline]
fn update_lanes<T: Copy>(acc: &mut [T], f: impl Fn(usize, T) -> T) {
    let mut base = 0;
    let mut blocks = acc.chunks_exact_mut(LANES);
    for block in &mut blocks {
        let lane: [T; LANES] = std::array::from_fn(|l| f(base + l, block[l]));
        block.copy_from_slice(&lane);
        base += LANES;
    }
    for (l, slot) in blocks.into_remainder().iter_mut().enumerate() {
        *slot = f(base + l, *slot);
    }
}

impl<T: Element> ArrayKernels<T> for VectorizedBackend {
    fn name(&self) -> &'static str {
        "vectorized"
    }

    fn unary(&self, op: UnaryOp, a: Operand<'_, T>, out: &mut [T]) {
        match a {
            Operand::Scalar(s) => out.fill(op.apply(s)),
            Operand::Vector(a) => fill_lanes(out, |i| op.apply(a[i])),
        }
    }

    fn binary(&self, op: BinaryOp, a: Operand<'_, T>, b: &[T], out: &mut [T]) {
        match a {
            Operand::Scalar(s) => fill_lanes(out, |i| op.apply(s, b[i])),
            Operand::Vector(a) => fill_lanes(out, |i| op.apply(a[i], b[i])),
        }
    }

    fn ternary(&self, op: TernaryOp, a: Operand<'_, T>, b: &[T], c: &[T], out: &mut [T]) {
        fill_lanes(out, |i| op.apply(a.at(i), b[i], c[i]));
    }

    fn ternary_assign(&self, op: TernaryOp, a: Operand<'_, T>, b: &[T], acc: &mut [T]) {
        update_lanes(acc, |i, y| op.apply(a.at(i), b[i], y));
    }

    fn pad_edge_1d(&self, data: &mut [T], pad: [usize; 2]) {
        let n = data.len();
        stencil::replicate_slabs(data, 1, n, pad);
    }

    fn pad_edge_2d(&self, data: &mut [T], shape: [usize; 2], pad: [[usize; 2]; 2]) {
        let [w, h] = shape;
        let [px, py] = pad;
        for row in data.chunks_mut(w).skip(py[0]).take(h - py[0] - py[1]) {
            stencil::replicate_slabs(row, 1, w, px);
        }
        stencil::replicate_slabs(data, w, h, py);
    }

    fn pad_edge_3d(&self, data: &mut [T], shape: [usize; 3], pad: [[usize; 2]; 3]) {
        let [w, h, d] = shape;
        let plane = w * h;
        for slice in data.chunks_mut(plane).skip(pad[2][0]).take(d - pad[2][0] - pad[2][1]) {
            self.pad_edge_2d(slice, [w, h], [pad[0], pad[1]]);
        }
        stencil::replicate_slabs(data, plane, d, pad[2]);
    }
}

impl<R: Real> GridKernels<R> for VectorizedBackend {
    fn name(&self) -> &'static str {
        "vectorized"
    }

    fn set_boundary_2d(&self, field: &mut [R], shape: [usize; 2], mode: BoundaryMode) {
        let [w, h] = shape;
        let (side, end) = stencil::wall_signs::<R>(mode);

        let (bottom, rest) = field.split_at_mut(w);
        let above = &rest[..w];
        fill_lanes(&mut bottom[1..w - 1], |i| end * above[i + 1]);

        let (rest, top) = field.split_at_mut((h - 1) * w);
        let below = &rest[(h - 2) * w..];
        fill_lanes(&mut top[1..w - 1], |i| end * below[i + 1]);

        stencil::mirror_side_walls(field, w, h, side);
        stencil::average_corners(field, w, h);
    }

    fn relax_sweep_2d(&self, x: &[R], x0: &[R], out: &mut [R], shape: [usize; 2], a: R, c: R) {
        let [w, h] = shape;
        for j in 1..h - 1 {
            let base = 1 + w * j;
            fill_lanes(&mut out[base..base + w - 2], |l| {
                stencil::relax_point(x, x0, base + l, w, a, c)
            });
        }
    }

    fn advect_2d(&self, field: &mut [R], prev: &[R], u: &[R], v: &[R], shape: [usize; 2], dt0: R) {
        let [w, h] = shape;
        let bounds = stencil::backtrace_bounds::<R>(w, h);
        for j in 1..h - 1 {
            let base = 1 + w * j;
            fill_lanes(&mut field[base..base + w - 2], |l| {
                stencil::backtrace_sample(prev, u, v, w, (1 + l, j), dt0, bounds)
            });
        }
    }

    fn divergence_2d(&self, u: &[R], v: &[R], div: &mut [R], shape: [usize; 2], scale: R) {
        let [w, h] = shape;
        for j in 1..h - 1 {
            let base = 1 + w * j;
            fill_lanes(&mut div[base..base + w - 2], |l| {
                stencil::divergence_point(u, v, base + l, w, scale)
            });
        }
    }

    fn subtract_gradient_2d(&self, p: &[R], u: &mut [R], v: &mut [R], shape: [usize; 2], scale: R) {
        let [w, h] = shape;
        let k = R::HALF * scale;
        for j in 1..h - 1 {
            let base = 1 + w * j;
            update_lanes(&mut u[base..base + w - 2], |l, x| {
                let c = base + l;
                x - k * (p[c + 1] - p[c - 1])
            });
            update_lanes(&mut v[base..base + w - 2], |l, y| {
                let c = base + l;
                y - k * (p[c + w] - p[c - w])
            });
        }
    }
}
