//! Device affinity tags.

use std::fmt;

/// Execution target a buffer is bound to.
///
/// Every operand of a kernel call must carry the same device. The
/// device selects which backend implementation runs; there is no
/// implicit transfer or fallback between devices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Device {
    /// Scalar CPU backend, data-parallel across worker threads.
    #[default]
    Cpu,
    /// Lane-blocked vectorized backend.
    VectorizedCompute,
    /// GPU compute backend.
    GpuCompute,
}

impl Device {
    /// All devices, in declaration order.
    pub const ALL: [Device; 3] = [Device::Cpu, Device::VectorizedCompute, Device::GpuCompute];
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::VectorizedCompute => write!(f, "vectorized"),
            Self::GpuCompute => write!(f, "gpu"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_cpu() {
        assert_eq!(Device::default(), Device::Cpu);
    }

    #[test]
    fn display_names() {
        assert_eq!(Device::Cpu.to_string(), "cpu");
        assert_eq!(Device::VectorizedCompute.to_string(), "vectorized");
        assert_eq!(Device::GpuCompute.to_string(), "gpu");
    }
}
