//! Point formulas and halo copies shared by the backends.
//!
//! Fields are stored row-major with axis 0 fastest: cell `(i, j)` of a
//! field of width `w` lives at `i + w * j`.

use eddy_core::{BoundaryMode, Real};

/// Copy slab `lo` over slabs `0..lo` and slab `count - hi - 1` over slabs
/// `count - hi..count`. A slab is `slab` consecutive elements.
///
/// Requires `count > lo + hi`.
pub(crate) fn replicate_slabs<T: Copy>(data: &mut [T], slab: usize, count: usize, pad: [usize; 2]) {
    let [lo, hi] = pad;
    for k in 0..lo {
        data.copy_within(lo * slab..(lo + 1) * slab, k * slab);
    }
    let last = count - hi - 1;
    for k in count - hi..count {
        data.copy_within(last * slab..(last + 1) * slab, k * slab);
    }
}

/// Multipliers applied to the mirrored value at the side walls and at the
/// end walls.
#[inline]
pub(crate) fn wall_signs<R: Real>(mode: BoundaryMode) -> (R, R) {
    let side = if mode.flips_side_walls() { -R::ONE } else { R::ONE };
    let end = if mode.flips_end_walls() { -R::ONE } else { R::ONE };
    (side, end)
}

/// Set the four corner cells to the mean of their two edge neighbours.
pub(crate) fn average_corners<R: Real>(field: &mut [R], w: usize, h: usize) {
    let top = (h - 1) * w;
    let below_top = (h - 2) * w;
    field[0] = R::HALF * (field[1] + field[w]);
    field[top] = R::HALF * (field[top + 1] + field[below_top]);
    field[w - 1] = R::HALF * (field[w - 2] + field[2 * w - 1]);
    field[top + w - 1] = R::HALF * (field[top + w - 2] + field[below_top + w - 1]);
}

/// Mirror the left and right interior columns into the halo columns.
pub(crate) fn mirror_side_walls<R: Real>(field: &mut [R], w: usize, h: usize, sign: R) {
    for j in 1..h - 1 {
        let row = j * w;
        field[row] = sign * field[row + 1];
        field[row + w - 1] = sign * field[row + w - 2];
    }
}

/// Jacobi update for cell `k`.
#[inline]
pub(crate) fn relax_point<R: Real>(x: &[R], x0: &[R], k: usize, w: usize, a: R, c: R) -> R {
    (x0[k] + a * (x[k - 1] + x[k + 1] + x[k - w] + x[k + w])) / c
}

/// Upper clamp bounds `[nx + 0.5, ny + 0.5]` for backtraced positions.
#[inline]
pub(crate) fn backtrace_bounds<R: Real>(w: usize, h: usize) -> [R; 2] {
    [R::from_index(w - 2) + R::HALF, R::from_index(h - 2) + R::HALF]
}

/// Trace cell `(i, j)` back along the velocity and bilinearly sample `prev`.
#[inline]
pub(crate) fn backtrace_sample<R: Real>(
    prev: &[R],
    u: &[R],
    v: &[R],
    w: usize,
    (i, j): (usize, usize),
    dt0: R,
    bounds: [R; 2],
) -> R {
    let k = i + w * j;
    let x = clamp(R::from_index(i) - dt0 * u[k], bounds[0]);
    let y = clamp(R::from_index(j) - dt0 * v[k], bounds[1]);

    let i0 = x.to_index();
    let j0 = y.to_index();
    let s1 = x - R::from_index(i0);
    let s0 = R::ONE - s1;
    let t1 = y - R::from_index(j0);
    let t0 = R::ONE - t1;

    let k00 = i0 + w * j0;
    let k01 = k00 + w;
    s0 * (t0 * prev[k00] + t1 * prev[k01]) + s1 * (t0 * prev[k00 + 1] + t1 * prev[k01 + 1])
}

#[inline]
fn clamp<R: Real>(p: R, max: R) -> R {
    if p < R::HALF {
        R::HALF
    } else if p > max {
        max
    } else {
        p
    }
}

/// Central-difference divergence at cell `k`, scaled to cell units.
#[inline]
pub(crate) fn divergence_point<R: Real>(u: &[R], v: &[R], k: usize, w: usize, scale: R) -> R {
    -R::HALF * ((u[k + 1] - u[k - 1]) + (v[k + w] - v[k - w])) / scale
}
