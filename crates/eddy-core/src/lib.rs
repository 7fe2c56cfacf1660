//! Core types and traits for the Eddy kernel runtime.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Eddy workspace:
//! device and element tags, non-owning buffer views, error types, the
//! type/rank dispatch layer, and the backend kernel traits.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod backend;
pub mod device;
pub mod dispatch;
pub mod element;
pub mod error;
pub mod view;

pub use backend::{ArrayKernels, BinaryOp, BoundaryMode, GridKernels, Operand, TernaryOp, UnaryOp};
pub use device::Device;
pub use dispatch::{
    dispatch_element, dispatch_rank, dispatch_real, ElementVisitor, RankVisitor, RealVisitor,
};
pub use element::{Element, ElementType, Real};
pub use error::{KernelError, ViewError};
pub use view::{
    BufferData, BufferDataMut, BufferView, BufferViewBuilder, BufferViewMut, ViewDescriptor,
    MAX_RANK,
};
