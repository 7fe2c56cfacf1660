//! Solver configuration, validation, and error types.
//!
//! [`SolverConfig`] selects the execution device and the physical
//! coefficients. [`validate()`](SolverConfig::validate) is called by
//! [`GridFluidSolver::new`](crate::GridFluidSolver::new); the builder
//! validates on [`build()`](SolverConfigBuilder::build).

use std::error::Error;
use std::fmt;

use eddy_core::Device;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`SolverConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Viscosity is negative, NaN, or infinite.
    InvalidViscosity {
        /// The invalid value.
        value: f64,
    },
    /// Diffusion rate is negative, NaN, or infinite.
    InvalidDiffusion {
        /// The invalid value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViscosity { value } => {
                write!(f, "viscosity must be finite and non-negative, got {value}")
            }
            Self::InvalidDiffusion { value } => {
                write!(f, "diffusion must be finite and non-negative, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

// ── SolverConfig ───────────────────────────────────────────────────

/// Configuration for [`GridFluidSolver`](crate::GridFluidSolver).
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig {
    /// Device every kernel runs on. Default: [`Device::Cpu`].
    pub device: Device,
    /// Kinematic viscosity applied to the velocity field. Default: 0.
    pub viscosity: f64,
    /// Diffusion rate applied to the density field. Default: 0.
    pub diffusion: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            device: Device::Cpu,
            viscosity: 0.0,
            diffusion: 0.0,
        }
    }
}

impl SolverConfig {
    /// Start a builder from the default configuration.
    pub fn builder() -> SolverConfigBuilder {
        SolverConfigBuilder {
            config: Self::default(),
        }
    }

    /// Check the coefficients.
    ///
    /// # Errors
    ///
    /// Returns `Err` if viscosity or diffusion is negative, NaN, or infinite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.viscosity.is_finite() && self.viscosity >= 0.0) {
            return Err(ConfigError::InvalidViscosity {
                value: self.viscosity,
            });
        }
        if !(self.diffusion.is_finite() && self.diffusion >= 0.0) {
            return Err(ConfigError::InvalidDiffusion {
                value: self.diffusion,
            });
        }
        Ok(())
    }
}

/// Builder for [`SolverConfig`].
#[derive(Clone, Debug)]
pub struct SolverConfigBuilder {
    config: SolverConfig,
}

impl SolverConfigBuilder {
    /// Set the execution device.
    pub fn device(mut self, device: Device) -> Self {
        self.config.device = device;
        self
    }

    /// Set the velocity viscosity.
    pub fn viscosity(mut self, viscosity: f64) -> Self {
        self.config.viscosity = viscosity;
        self
    }

    /// Set the density diffusion rate.
    pub fn diffusion(mut self, diffusion: f64) -> Self {
        self.config.diffusion = diffusion;
        self
    }

    /// Validate and return the configuration.
    ///
    /// # Errors
    ///
    /// As for [`SolverConfig::validate`].
    pub fn build(self) -> Result<SolverConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
