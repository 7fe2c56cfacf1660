//! Stable-fluids solver on a 2D grid with a one-cell ghost halo.
//!
//! The free functions are the building blocks of a step, each operating
//! on [`BufferView`](eddy_core::BufferView)s and dispatching to the
//! views' device:
//!
//! - [`add_source`]: `x += dt * s`.
//! - [`set_boundary_condition`]: halo fill with per-wall sign rules.
//! - [`solve_linear_system`] and [`diffuse`]: fixed-count relaxation.
//! - [`advect`]: semi-Lagrangian transport.
//! - [`project`]: pressure projection to a divergence-free velocity.
//!
//! [`GridFluidSolver`] owns the fields and sequences those steps.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod advect;
pub mod boundary;
pub(crate) mod check;
pub mod config;
pub mod error;
pub mod frame;
pub mod grid;
pub mod linear;
pub mod metrics;
pub mod project;
pub mod solver;
pub mod source;

pub use advect::advect;
pub use boundary::set_boundary_condition;
pub use config::{ConfigError, SolverConfig, SolverConfigBuilder};
pub use error::SolverError;
pub use frame::Frame;
pub use grid::GridGeometry;
pub use linear::{diffuse, solve_linear_system, RELAXATION_ITERATIONS};
pub use metrics::StepMetrics;
pub use project::project;
pub use solver::GridFluidSolver;
pub use source::add_source;
