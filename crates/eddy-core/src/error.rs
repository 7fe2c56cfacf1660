//! Error types for view construction and kernel dispatch.
//!
//! Every kernel validates its operands at the dispatch boundary and
//! returns one of these before writing any output.

use std::error::Error;
use std::fmt;

use crate::device::Device;
use crate::element::ElementType;

/// Errors from [`BufferViewBuilder`](crate::BufferViewBuilder).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// The shape had more than three axes.
    RankTooHigh {
        /// Number of axes supplied.
        rank: usize,
    },
    /// The declared element type differs from the storage's.
    ElementTypeMismatch {
        /// Element type set on the builder.
        declared: ElementType,
        /// Element type of the supplied slice.
        actual: ElementType,
    },
    /// The shape's element count differs from the storage's.
    LengthMismatch {
        /// Product of the declared shape.
        shape_length: usize,
        /// Number of elements in the supplied slice.
        buffer_length: usize,
    },
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RankTooHigh { rank } => {
                write!(f, "rank {rank} exceeds the maximum of 3")
            }
            Self::ElementTypeMismatch { declared, actual } => {
                write!(f, "declared element type {declared} but storage holds {actual}")
            }
            Self::LengthMismatch {
                shape_length,
                buffer_length,
            } => {
                write!(
                    f,
                    "shape describes {shape_length} elements but storage holds {buffer_length}"
                )
            }
        }
    }
}

impl Error for ViewError {}

/// Errors from kernel dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KernelError {
    /// Operands are bound to different devices.
    DeviceMismatch {
        /// Operation name.
        op: &'static str,
        /// Device of the first operand.
        expected: Device,
        /// Device of the offending operand.
        found: Device,
    },
    /// Operand lengths are incompatible with the operation's broadcast rule.
    LengthMismatch {
        /// Operation name.
        op: &'static str,
        /// Required length.
        expected: usize,
        /// Offending operand's length.
        found: usize,
    },
    /// No kernel is registered for this operation on this device.
    UnsupportedDevice {
        /// Operation name.
        op: &'static str,
        /// Requested device.
        device: Device,
    },
    /// Operand element types differ, or the storage tag disagrees with the
    /// type the dispatcher selected.
    ElementTypeMismatch {
        /// Element type required.
        expected: ElementType,
        /// Element type found.
        found: ElementType,
    },
    /// Rank, extent, or element-type precondition violated.
    Precondition {
        /// Operation name.
        op: &'static str,
        /// What was violated.
        reason: String,
    },
    /// Requested padding leaves no interior to replicate from.
    InsufficientInterior {
        /// Axis that is too small.
        axis: usize,
        /// Extent of that axis.
        extent: usize,
        /// Requested `[low, high]` pad widths on that axis.
        pad: [usize; 2],
    },
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceMismatch {
                op,
                expected,
                found,
            } => write!(f, "{op}: operands on different devices ({expected} vs {found})"),
            Self::LengthMismatch {
                op,
                expected,
                found,
            } => write!(f, "{op}: expected length {expected}, got {found}"),
            Self::UnsupportedDevice { op, device } => {
                write!(f, "{op}: no kernel registered for device {device}")
            }
            Self::ElementTypeMismatch { expected, found } => {
                write!(f, "element type mismatch: expected {expected}, got {found}")
            }
            Self::Precondition { op, reason } => write!(f, "{op}: {reason}"),
            Self::InsufficientInterior { axis, extent, pad } => write!(
                f,
                "axis {axis} of extent {extent} has no interior after padding {} + {}",
                pad[0], pad[1]
            ),
        }
    }
}

impl Error for KernelError {}
