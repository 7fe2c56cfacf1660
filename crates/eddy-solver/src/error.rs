//! Solver error type.

use std::error::Error;
use std::fmt;

use eddy_core::{KernelError, ViewError};

use crate::config::ConfigError;

/// Errors from [`GridFluidSolver`](crate::GridFluidSolver).
#[derive(Clone, Debug, PartialEq)]
pub enum SolverError {
    /// The solver configuration is invalid.
    Config(ConfigError),
    /// A kernel rejected its operands.
    Kernel(KernelError),
    /// A view over solver storage could not be built.
    View(ViewError),
    /// A step or view was requested before [`resize_grid`](crate::GridFluidSolver::resize_grid).
    GridNotAllocated,
    /// Resolution, spacing or origin passed to `resize_grid` is unusable.
    InvalidGrid {
        /// What was wrong.
        reason: String,
    },
    /// The time step is negative, NaN, or infinite.
    InvalidTimeStep {
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid config: {e}"),
            Self::Kernel(e) => write!(f, "kernel error: {e}"),
            Self::View(e) => write!(f, "view error: {e}"),
            Self::GridNotAllocated => write!(f, "grid not allocated; call resize_grid first"),
            Self::InvalidGrid { reason } => write!(f, "invalid grid: {reason}"),
            Self::InvalidTimeStep { value } => {
                write!(f, "time step {value} is not a finite non-negative number")
            }
        }
    }
}

impl Error for SolverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Kernel(e) => Some(e),
            Self::View(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SolverError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<KernelError> for SolverError {
    fn from(e: KernelError) -> Self {
        Self::Kernel(e)
    }
}

impl From<ViewError> for SolverError {
    fn from(e: ViewError) -> Self {
        Self::View(e)
    }
}
