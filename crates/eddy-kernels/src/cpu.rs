//! Reference backend: scalar kernels spread across the rayon pool.
//!
//! Elementwise kernels split the output into index ranges of at least
//! [`MIN_PAR_LEN`] elements. Stencil kernels parallelise over interior rows,
//! each worker writing only its own row of the output.

use rayon::prelude::*;

use eddy_core::{
    ArrayKernels, BinaryOp, BoundaryMode, Element, GridKernels, Operand, Real, TernaryOp, UnaryOp,
};

use crate::stencil;

/// Minimum number of elements handed to one rayon task.
pub const MIN_PAR_LEN: usize = 4096;

/// Rows per rayon task in stencil kernels.
const MIN_PAR_ROWS: usize = 16;

/// Scalar CPU backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuBackend;

/// Copy slab `lo` over the low halo and the last interior slab over the
/// high halo, one rayon task per destination slab.
fn replicate_slabs_par<T: Element>(data: &mut [T], slab: usize, count: usize, pad: [usize; 2]) {
    let [lo, hi] = pad;
    let (low, rest) = data.split_at_mut(lo * slab);
    let first = &rest[..slab];
    low.par_chunks_mut(slab).for_each(|dst| dst.copy_from_slice(first));

    let (body, high) = data.split_at_mut((count - hi) * slab);
    let last = &body[(count - hi - 1) * slab..];
    high.par_chunks_mut(slab).for_each(|dst| dst.copy_from_slice(last));
}

impl<T: Element> ArrayKernels<T> for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn unary(&self, op: UnaryOp, a: Operand<'_, T>, out: &mut [T]) {
        out.par_iter_mut()
            .with_min_len(MIN_PAR_LEN)
            .enumerate()
            .for_each(|(i, o)| *o = op.apply(a.at(i)));
    }

    fn binary(&self, op: BinaryOp, a: Operand<'_, T>, b: &[T], out: &mut [T]) {
        out.par_iter_mut()
            .with_min_len(MIN_PAR_LEN)
            .zip(b.par_iter())
            .enumerate()
            .for_each(|(i, (o, &bv))| *o = op.apply(a.at(i), bv));
    }

    fn ternary(&self, op: TernaryOp, a: Operand<'_, T>, b: &[T], c: &[T], out: &mut [T]) {
        out.par_iter_mut()
            .with_min_len(MIN_PAR_LEN)
            .enumerate()
            .for_each(|(i, o)| *o = op.apply(a.at(i), b[i], c[i]));
    }

    fn ternary_assign(&self, op: TernaryOp, a: Operand<'_, T>, b: &[T], acc: &mut [T]) {
        acc.par_iter_mut()
            .with_min_len(MIN_PAR_LEN)
            .enumerate()
            .for_each(|(i, y)| *y = op.apply(a.at(i), b[i], *y));
    }

    fn pad_edge_1d(&self, data: &mut [T], pad: [usize; 2]) {
        let n = data.len();
        stencil::replicate_slabs(data, 1, n, pad);
    }

    fn pad_edge_2d(&self, data: &mut [T], shape: [usize; 2], pad: [[usize; 2]; 2]) {
        let [w, h] = shape;
        let [px, py] = pad;
        data.par_chunks_mut(w)
            .skip(py[0])
            .take(h - py[0] - py[1])
            .for_each(|row| stencil::replicate_slabs(row, 1, w, px));
        replicate_slabs_par(data, w, h, py);
    }

    fn pad_edge_3d(&self, data: &mut [T], shape: [usize; 3], pad: [[usize; 2]; 3]) {
        let [w, h, d] = shape;
        let [px, py, pz] = pad;
        let plane = w * h;
        data.par_chunks_mut(plane)
            .skip(pz[0])
            .take(d - pz[0] - pz[1])
            .for_each(|slice| {
                for row in slice.chunks_mut(w).skip(py[0]).take(h - py[0] - py[1]) {
                    stencil::replicate_slabs(row, 1, w, px);
                }
                stencil::replicate_slabs(slice, w, h, py);
            });
        replicate_slabs_par(data, plane, d, pz);
    }
}

impl<R: Real> GridKernels<R> for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn set_boundary_2d(&self, field: &mut [R], shape: [usize; 2], mode: BoundaryMode) {
        let [w, h] = shape;
        let (side, end) = stencil::wall_signs::<R>(mode);
        for i in 1..w - 1 {
            field[i] = end * field[i + w];
            field[i + (h - 1) * w] = end * field[i + (h - 2) * w];
        }
        stencil::mirror_side_walls(field, w, h, side);
        stencil::average_corners(field, w, h);
    }

    fn relax_sweep_2d(&self, x: &[R], x0: &[R], out: &mut [R], shape: [usize; 2], a: R, c: R) {
        let [w, h] = shape;
        out.par_chunks_mut(w)
            .enumerate()
            .skip(1)
            .take(h - 2)
            .with_min_len(MIN_PAR_ROWS)
            .for_each(|(j, row)| {
                for (i, cell) in row.iter_mut().enumerate().take(w - 1).skip(1) {
                    *cell = stencil::relax_point(x, x0, i + w * j, w, a, c);
                }
            });
    }

    fn advect_2d(&self, field: &mut [R], prev: &[R], u: &[R], v: &[R], shape: [usize; 2], dt0: R) {
        let [w, h] = shape;
        let bounds = stencil::backtrace_bounds::<R>(w, h);
        field
            .par_chunks_mut(w)
            .enumerate()
            .skip(1)
            .take(h - 2)
            .with_min_len(MIN_PAR_ROWS)
            .for_each(|(j, row)| {
                for (i, cell) in row.iter_mut().enumerate().take(w - 1).skip(1) {
                    *cell = stencil::backtrace_sample(prev, u, v, w, (i, j), dt0, bounds);
                }
            });
    }

    fn divergence_2d(&self, u: &[R], v: &[R], div: &mut [R], shape: [usize; 2], scale: R) {
        let [w, h] = shape;
        div.par_chunks_mut(w)
            .enumerate()
            .skip(1)
            .take(h - 2)
            .with_min_len(MIN_PAR_ROWS)
            .for_each(|(j, row)| {
                for (i, cell) in row.iter_mut().enumerate().take(w - 1).skip(1) {
                    *cell = stencil::divergence_point(u, v, i + w * j, w, scale);
                }
            });
    }

    fn subtract_gradient_2d(&self, p: &[R], u: &mut [R], v: &mut [R], shape: [usize; 2], scale: R) {
        let [w, h] = shape;
        let k = R::HALF * scale;
        rayon::join(
            || {
                u.par_chunks_mut(w)
                    .enumerate()
                    .skip(1)
                    .take(h - 2)
                    .for_each(|(j, row)| {
                        for i in 1..w - 1 {
                            let c = i + w * j;
                            row[i] = row[i] - k * (p[c + 1] - p[c - 1]);
                        }
                    })
            },
            || {
                v.par_chunks_mut(w)
                    .enumerate()
                    .skip(1)
                    .take(h - 2)
                    .for_each(|(j, row)| {
                        for i in 1..w - 1 {
                            let c = i + w * j;
                            row[i] = row[i] - k * (p[c + w] - p[c - w]);
                        }
                    })
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kernels<T: Element>() -> &'static dyn ArrayKernels<T> {
        &CpuBackend
    }

    #[test]
    fn binary_broadcasts_scalar() {
        let b = [1.0f32, 2.0, 3.0];
        let mut out = [0.0f32; 3];
        kernels::<f32>().binary(BinaryOp::Mul, Operand::Scalar(2.0), &b, &mut out);
        assert_eq!(out, [2.0, 4.0, 6.0]);
    }

    #[test]
    fn large_inputs_split_across_tasks() {
        let n = MIN_PAR_LEN * 3 + 17;
        let a: Vec<u32> = (0..n as u32).collect();
        let b = vec![1u32; n];
        let mut out = vec![0u32; n];
        kernels::<u32>().binary(BinaryOp::Add, Operand::Vector(&a), &b, &mut out);
        assert!(out.iter().enumerate().all(|(i, &v)| v == i as u32 + 1));
    }

    #[test]
    fn ternary_assign_accumulates() {
        let x = [1i64, 2, 3];
        let mut y = [10i64, 20, 30];
        kernels::<i64>().ternary_assign(TernaryOp::Axpy, Operand::Scalar(3), &x, &mut y);
        assert_eq!(y, [13, 26, 39]);
    }

    #[test]
    fn pad_2d_replicates_edges_and_corners() {
        #[rustfmt::skip]
        let mut grid = [
            0, 0, 0, 0,
            0, 1, 2, 0,
            0, 3, 4, 0,
            0, 0, 0, 0,
        ];
        kernels::<i32>().pad_edge_2d(&mut grid, [4, 4], [[1, 1], [1, 1]]);
        #[rustfmt::skip]
        let expected = [
            1, 1, 2, 2,
            1, 1, 2, 2,
            3, 3, 4, 4,
            3, 3, 4, 4,
        ];
        assert_eq!(grid, expected);
    }

    #[test]
    fn scalar_boundary_copies_neighbours() {
        let mut f = vec![0.0f64; 16];
        for j in 1..3 {
            for i in 1..3 {
                f[i + 4 * j] = (i + 10 * j) as f64;
            }
        }
        GridKernels::set_boundary_2d(&CpuBackend, &mut f, [4, 4], BoundaryMode::Scalar);
        assert_eq!(f[1], f[5]);
        assert_eq!(f[4], f[5]);
        assert_eq!(f[7], f[6]);
        assert_eq!(f[13], f[9]);
        assert_eq!(f[0], 0.5 * (f[1] + f[4]));
    }

    #[test]
    fn horizontal_boundary_negates_side_walls() {
        let mut f = vec![1.0f32; 16];
        GridKernels::set_boundary_2d(&CpuBackend, &mut f, [4, 4], BoundaryMode::Horizontal);
        assert_eq!(f[4], -1.0);
        assert_eq!(f[7], -1.0);
        assert_eq!(f[1], 1.0);
        assert_eq!(f[14], 1.0);
        assert_eq!(f[0], 0.0);
    }

    #[test]
    fn divergence_of_uniform_flow_is_zero() {
        let u = vec![0.3f64; 25];
        let v = vec![-0.7f64; 25];
        let mut div = vec![1.0f64; 25];
        GridKernels::divergence_2d(&CpuBackend, &u, &v, &mut div, [5, 5], 3.0);
        for j in 1..4 {
            for i in 1..4 {
                assert_eq!(div[i + 5 * j], 0.0);
            }
        }
        // Halo is left alone.
        assert_eq!(div[0], 1.0);
    }
}
