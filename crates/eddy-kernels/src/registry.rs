//! Device to backend lookup.
//!
//! The table is fixed at compile time: every [`Device`] maps to a static
//! backend or to nothing. A device without a backend fails at dispatch
//! with [`KernelError::UnsupportedDevice`], before any output is touched.

use eddy_core::{ArrayKernels, Device, Element, GridKernels, KernelError, Real};

use crate::cpu::CpuBackend;
use crate::vectorized::VectorizedBackend;

static CPU: CpuBackend = CpuBackend;
static VECTORIZED: VectorizedBackend = VectorizedBackend;

/// Elementwise and padding kernels for `T` on `device`.
///
/// # Errors
///
/// [`KernelError::UnsupportedDevice`] for [`Device::GpuCompute`].
pub fn array_kernels<T: Element>(
    op: &'static str,
    device: Device,
) -> Result<&'static dyn ArrayKernels<T>, KernelError> {
    let kernels: &'static dyn ArrayKernels<T> = match device {
        Device::Cpu => &CPU,
        Device::VectorizedCompute => &VECTORIZED,
        Device::GpuCompute => return Err(KernelError::UnsupportedDevice { op, device }),
    };
    Ok(kernels)
}

/// Grid stencil kernels for `R` on `device`.
///
/// # Errors
///
/// [`KernelError::UnsupportedDevice`] for [`Device::GpuCompute`].
pub fn grid_kernels<R: Real>(
    op: &'static str,
    device: Device,
) -> Result<&'static dyn GridKernels<R>, KernelError> {
    let kernels: &'static dyn GridKernels<R> = match device {
        Device::Cpu => &CPU,
        Device::VectorizedCompute => &VECTORIZED,
        Device::GpuCompute => return Err(KernelError::UnsupportedDevice { op, device }),
    };
    Ok(kernels)
}
