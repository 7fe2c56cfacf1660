//! Test fixtures and assertions for Eddy development.
//!
//! Seeded random fields, view helpers that panic on bad layouts, and
//! tolerance comparisons for floating-point grids.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use eddy_core::{BufferView, BufferViewBuilder, BufferViewMut, Device, Element, Real};

/// Shared view over `data` with the given device and shape.
///
/// # Panics
///
/// If `shape` does not describe `data.len()` elements.
pub fn view<'a, T: Element>(device: Device, shape: &[usize], data: &'a [T]) -> BufferView<'a> {
    BufferViewBuilder::new()
        .with_device(device)
        .with_element_type(T::TYPE)
        .with_shape(shape)
        .build(T::wrap(data))
        .expect("test view layout")
}

/// Exclusive view over `data` with the given device and shape.
pub fn view_mut<'a, T: Element>(
    device: Device,
    shape: &[usize],
    data: &'a mut [T],
) -> BufferViewMut<'a> {
    BufferViewBuilder::new()
        .with_device(device)
        .with_element_type(T::TYPE)
        .with_shape(shape)
        .build_mut(T::wrap_mut(data))
        .expect("test view layout")
}

/// Rank-1 shared view on the CPU.
pub fn cpu_vec<T: Element>(data: &[T]) -> BufferView<'_> {
    view(Device::Cpu, &[data.len()], data)
}

/// Rank-1 exclusive view on the CPU.
pub fn cpu_vec_mut<T: Element>(data: &mut [T]) -> BufferViewMut<'_> {
    let len = data.len();
    view_mut(Device::Cpu, &[len], data)
}

/// Largest absolute elementwise difference.
pub fn max_abs_diff<R: Real>(a: &[R], b: &[R]) -> f64 {
    assert_eq!(a.len(), b.len(), "length mismatch");
    a.iter()
        .zip(b)
        .map(|(&x, &y)| (x.to_f64() - y.to_f64()).abs())
        .fold(0.0, f64::max)
}

/// Assert `a` and `b` agree to within `tol` at every index.
#[track_caller]
pub fn assert_close<R: Real>(a: &[R], b: &[R], tol: f64) {
    assert_eq!(a.len(), b.len(), "length mismatch");
    for (i, (&x, &y)) in a.iter().zip(b).enumerate() {
        let d = (x.to_f64() - y.to_f64()).abs();
        assert!(d <= tol, "index {i}: {x:?} vs {y:?} differ by {d} (tol {tol})");
    }
}

/// Sum of squares over the interior of a `[w, h]` field with a one-cell halo.
pub fn interior_sum_sq<R: Real>(field: &[R], shape: [usize; 2]) -> f64 {
    let [w, h] = shape;
    let mut acc = 0.0;
    for j in 1..h - 1 {
        for i in 1..w - 1 {
            let v = field[i + w * j].to_f64();
            acc += v * v;
        }
    }
    acc
}
