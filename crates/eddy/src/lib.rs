//! Eddy: device-dispatched array kernels and a 2D stable-fluids solver.
//!
//! This is the top-level facade crate that re-exports the public API of the
//! Eddy sub-crates. Adding `eddy` as a single dependency is enough for most
//! users.
//!
//! # Quick start
//!
//! ```rust
//! use eddy::prelude::*;
//!
//! let config = SolverConfig::builder()
//!     .device(Device::Cpu)
//!     .viscosity(0.0)
//!     .diffusion(0.0)
//!     .build()
//!     .unwrap();
//! let mut solver = GridFluidSolver::<f32>::new(config).unwrap();
//! solver.resize_grid([16, 16], [1.0, 1.0], [0.0, 0.0]).unwrap();
//!
//! let cell = solver.geometry().unwrap().index(8, 8);
//! solver.density_source_mut()[cell] = 1.0;
//! solver.advance_time_step(0.1).unwrap();
//! assert!(solver.density()[cell] > 0.0);
//!
//! // Array kernels work on any typed view.
//! let a = vec![1.0f64, 2.0, 3.0];
//! let b = vec![10.0f64, 20.0, 30.0];
//! let mut out = vec![0.0f64; 3];
//! let layout = BufferViewBuilder::new()
//!     .with_element_type(ElementType::Float64)
//!     .with_shape(&[3]);
//! let va = layout.build(&a).unwrap();
//! let vb = layout.build(&b).unwrap();
//! add(&va, &vb, &mut layout.build_mut(&mut out).unwrap()).unwrap();
//! assert_eq!(out, [11.0, 22.0, 33.0]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `eddy-core` | Devices, element types, buffer views, kernel traits |
//! | [`kernels`] | `eddy-kernels` | Array operations and the CPU and vectorized backends |
//! | [`solver`] | `eddy-solver` | Grid stencils and [`solver::GridFluidSolver`] |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Devices, element types, buffer views and backend traits (`eddy-core`).
pub use eddy_core as types;

/// Elementwise array operations and device backends (`eddy-kernels`).
///
/// [`kernels::add`], [`kernels::axpy`] and [`kernels::pad_edge`] are the
/// usual entry points; the registry maps a [`types::Device`] to its backend.
pub use eddy_kernels as kernels;

/// Grid stencil operations and the fluid solver (`eddy-solver`).
pub use eddy_solver as solver;

/// Common imports for typical Eddy usage.
///
/// ```rust
/// use eddy::prelude::*;
/// ```
pub mod prelude {
    // Views and tags
    pub use eddy_core::{
        BoundaryMode, BufferView, BufferViewBuilder, BufferViewMut, Device, Element, ElementType,
        Real,
    };

    // Errors
    pub use eddy_core::{KernelError, ViewError};
    pub use eddy_solver::{ConfigError, SolverError};

    // Array operations
    pub use eddy_kernels::{add, axpy, axpy_in_place, copy, div, mul, pad_edge, sub};

    // Solver
    pub use eddy_solver::{Frame, GridFluidSolver, GridGeometry, SolverConfig, StepMetrics};
}
