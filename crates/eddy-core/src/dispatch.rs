//! Element-type and rank dispatch.
//!
//! Kernels are written once, generic over [`Element`] (or [`Real`]) and
//! specialised per rank. These functions bridge the runtime tags carried by
//! a [`BufferView`](crate::BufferView) to those compile-time parameters.
//!
//! ```
//! use eddy_core::{dispatch_element, Element, ElementType, ElementVisitor};
//!
//! struct Width;
//! impl ElementVisitor for Width {
//!     type Output = usize;
//!     fn visit<T: Element>(self) -> usize {
//!         std::mem::size_of::<T>()
//!     }
//! }
//!
//! assert_eq!(dispatch_element(ElementType::UInt16, Width), 2);
//! ```

use crate::element::{Element, ElementType, Real};
use crate::error::KernelError;

/// An operation generic over every [`Element`] type.
pub trait ElementVisitor {
    /// Result of the operation.
    type Output;

    /// Run the operation instantiated for `T`.
    fn visit<T: Element>(self) -> Self::Output;
}

/// An operation generic over the floating-point [`Real`] types.
pub trait RealVisitor {
    /// Result of the operation.
    type Output;

    /// Run the operation instantiated for `R`.
    fn visit<R: Real>(self) -> Self::Output;
}

/// An operation with separate code paths per rank.
pub trait RankVisitor {
    /// Result of the operation.
    type Output;

    /// One-dimensional path.
    fn rank1(self) -> Self::Output;
    /// Two-dimensional path.
    fn rank2(self) -> Self::Output;
    /// Three-dimensional path.
    fn rank3(self) -> Self::Output;
}

/// Invoke `visitor` with the primitive type matching `element_type`.
pub fn dispatch_element<V: ElementVisitor>(element_type: ElementType, visitor: V) -> V::Output {
    match element_type {
        ElementType::Int8 => visitor.visit::<i8>(),
        ElementType::UInt8 => visitor.visit::<u8>(),
        ElementType::Int16 => visitor.visit::<i16>(),
        ElementType::UInt16 => visitor.visit::<u16>(),
        ElementType::Int32 => visitor.visit::<i32>(),
        ElementType::UInt32 => visitor.visit::<u32>(),
        ElementType::Int64 => visitor.visit::<i64>(),
        ElementType::UInt64 => visitor.visit::<u64>(),
        ElementType::Float32 => visitor.visit::<f32>(),
        ElementType::Float64 => visitor.visit::<f64>(),
    }
}

/// Invoke `visitor` with the float type matching `element_type`.
///
/// # Errors
///
/// Returns [`KernelError::Precondition`] for integer element types.
pub fn dispatch_real<V: RealVisitor>(
    op: &'static str,
    element_type: ElementType,
    visitor: V,
) -> Result<V::Output, KernelError> {
    match element_type {
        ElementType::Float32 => Ok(visitor.visit::<f32>()),
        ElementType::Float64 => Ok(visitor.visit::<f64>()),
        other => Err(KernelError::Precondition {
            op,
            reason: format!("element type {other} is not floating point"),
        }),
    }
}

/// Invoke the `visitor` path matching `rank`.
///
/// # Errors
///
/// Returns [`KernelError::Precondition`] for rank 0 or ranks above 3.
pub fn dispatch_rank<V: RankVisitor>(
    op: &'static str,
    rank: usize,
    visitor: V,
) -> Result<V::Output, KernelError> {
    match rank {
        1 => Ok(visitor.rank1()),
        2 => Ok(visitor.rank2()),
        3 => Ok(visitor.rank3()),
        other => Err(KernelError::Precondition {
            op,
            reason: format!("rank {other} has no kernel"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tag;
    impl ElementVisitor for Tag {
        type Output = ElementType;
        fn visit<T: Element>(self) -> ElementType {
            T::TYPE
        }
    }

    struct RealTag;
    impl RealVisitor for RealTag {
        type Output = ElementType;
        fn visit<R: Real>(self) -> ElementType {
            R::TYPE
        }
    }

    struct Which;
    impl RankVisitor for Which {
        type Output = usize;
        fn rank1(self) -> usize {
            1
        }
        fn rank2(self) -> usize {
            2
        }
        fn rank3(self) -> usize {
            3
        }
    }

    #[test]
    fn element_dispatch_selects_matching_type() {
        for ty in ElementType::ALL {
            assert_eq!(dispatch_element(ty, Tag), ty);
        }
    }

    #[test]
    fn real_dispatch_rejects_integers() {
        assert_eq!(
            dispatch_real("test", ElementType::Float64, RealTag).unwrap(),
            ElementType::Float64
        );
        let err = dispatch_real("test", ElementType::Int32, RealTag).unwrap_err();
        assert!(matches!(err, KernelError::Precondition { op: "test", .. }));
    }

    #[test]
    fn rank_dispatch_covers_one_to_three() {
        assert_eq!(dispatch_rank("test", 1, Which).unwrap(), 1);
        assert_eq!(dispatch_rank("test", 2, Which).unwrap(), 2);
        assert_eq!(dispatch_rank("test", 3, Which).unwrap(), 3);
        assert!(dispatch_rank("test", 0, Which).is_err());
        assert!(dispatch_rank("test", 4, Which).is_err());
    }
}
