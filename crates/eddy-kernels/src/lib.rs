//! Device-dispatched kernels for the Eddy runtime.
//!
//! The public operations in [`array`] validate their [`BufferView`]
//! operands, resolve the element type, and route to the backend registered
//! for the operands' device in [`registry`].
//!
//! # Backends
//!
//! - [`CpuBackend`]: scalar kernels, data-parallel across rayon workers.
//! - [`VectorizedBackend`]: fixed-width lane blocks on the calling thread.
//! - GPU: no kernels registered; every operation reports
//!   [`KernelError::UnsupportedDevice`].
//!
//! [`BufferView`]: eddy_core::BufferView
//! [`KernelError::UnsupportedDevice`]: eddy_core::KernelError::UnsupportedDevice

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod cpu;
pub mod registry;
pub(crate) mod stencil;
pub mod vectorized;

pub use array::{add, axpy, axpy_in_place, copy, div, mul, pad_edge, sub, PadWidths};
pub use cpu::CpuBackend;
pub use registry::{array_kernels, grid_kernels};
pub use vectorized::VectorizedBackend;
