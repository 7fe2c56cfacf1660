//! Seeded data generators.
//!
//! Every generator takes an explicit [`ChaCha8Rng`] so a failing test can
//! be reproduced from its seed.

use eddy_core::{Element, Real};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic generator for `seed`.
pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// `len` values drawn uniformly from `[lo, hi)`.
pub fn uniform<R: Real>(rng: &mut ChaCha8Rng, len: usize, lo: f64, hi: f64) -> Vec<R> {
    (0..len)
        .map(|_| R::from_f64(rng.random_range(lo..hi)))
        .collect()
}

/// `len` values drawn uniformly from `[lo, hi)`, then nudged away from zero
/// so they are safe divisors.
pub fn nonzero<R: Real>(rng: &mut ChaCha8Rng, len: usize, lo: f64, hi: f64) -> Vec<R> {
    (0..len)
        .map(|_| {
            let v: f64 = rng.random_range(lo..hi);
            R::from_f64(if v.abs() < 0.25 { v.signum() * 0.25 + v } else { v })
        })
        .collect()
}

/// `0, 1, 2, ...` in any element type, wrapping for narrow integers.
pub fn counting<T: Element>(len: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(len);
    let mut v = T::ZERO;
    for _ in 0..len {
        out.push(v);
        v = v.plus(T::ONE);
    }
    out
}

/// A `[w, h]` field with a one-cell halo. The interior is filled by
/// `f(i, j)` on storage coordinates; the halo is zero.
pub fn halo_field<R: Real>(shape: [usize; 2], f: impl Fn(usize, usize) -> R) -> Vec<R> {
    let [w, h] = shape;
    let mut out = vec![R::ZERO; w * h];
    for j in 1..h - 1 {
        for i in 1..w - 1 {
            out[i + w * j] = f(i, j);
        }
    }
    out
}

/// A `[w, h]` field with a random interior in `[lo, hi)` and a zero halo.
pub fn random_halo_field<R: Real>(
    rng: &mut ChaCha8Rng,
    shape: [usize; 2],
    lo: f64,
    hi: f64,
) -> Vec<R> {
    let [w, h] = shape;
    let mut out = vec![R::ZERO; w * h];
    for j in 1..h - 1 {
        for i in 1..w - 1 {
            out[i + w * j] = R::from_f64(rng.random_range(lo..hi));
        }
    }
    out
}
