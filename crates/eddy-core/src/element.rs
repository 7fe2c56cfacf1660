//! Element type tags and the [`Element`] / [`Real`] traits.
//!
//! [`ElementType`] is the runtime tag carried by every buffer view.
//! [`Element`] is its compile-time counterpart: the ten primitive numeric
//! types implement it, and the dispatch layer maps one to the other.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::view::{BufferData, BufferDataMut};

/// Runtime tag for the numeric type stored in a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum ElementType {
    /// `i8`.
    Int8 = 0,
    /// `u8`.
    UInt8 = 1,
    /// `i16`.
    Int16 = 2,
    /// `u16`.
    UInt16 = 3,
    /// `i32`.
    Int32 = 4,
    /// `u32`.
    UInt32 = 5,
    /// `i64`.
    Int64 = 6,
    /// `u64`.
    UInt64 = 7,
    /// `f32`.
    Float32 = 8,
    /// `f64`.
    Float64 = 9,
}

impl ElementType {
    /// All element types, in tag order.
    pub const ALL: [ElementType; 10] = [
        ElementType::Int8,
        ElementType::UInt8,
        ElementType::Int16,
        ElementType::UInt16,
        ElementType::Int32,
        ElementType::UInt32,
        ElementType::Int64,
        ElementType::UInt64,
        ElementType::Float32,
        ElementType::Float64,
    ];

    /// Size of one element in bytes.
    pub fn size_bytes(self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }

    /// Returns `true` for the two floating-point kinds.
    pub fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Rust spelling of the type (`"f32"`, `"u16"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Self::Int8 => "i8",
            Self::UInt8 => "u8",
            Self::Int16 => "i16",
            Self::UInt16 => "u16",
            Self::Int32 => "i32",
            Self::UInt32 => "u32",
            Self::Int64 => "i64",
            Self::UInt64 => "u64",
            Self::Float32 => "f32",
            Self::Float64 => "f64",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fixed-width numeric type that kernels can operate on.
///
/// Integer arithmetic wraps on overflow. Integer division by zero panics,
/// which is the native behaviour of the primitive; it is not special-cased.
pub trait Element: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Runtime tag for this type.
    const TYPE: ElementType;
    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity.
    const ONE: Self;

    /// `self + rhs`.
    fn plus(self, rhs: Self) -> Self;
    /// `self - rhs`.
    fn minus(self, rhs: Self) -> Self;
    /// `self * rhs`.
    fn times(self, rhs: Self) -> Self;
    /// `self / rhs`.
    fn over(self, rhs: Self) -> Self;

    /// Reinterpret tagged data as a typed slice. `None` if the tag differs.
    fn slice(data: BufferData<'_>) -> Option<&[Self]>;
    /// Mutable counterpart of [`slice`](Element::slice).
    fn slice_mut(data: BufferDataMut<'_>) -> Option<&mut [Self]>;
    /// Tag a typed slice.
    fn wrap(slice: &[Self]) -> BufferData<'_>;
    /// Tag a mutable typed slice.
    fn wrap_mut(slice: &mut [Self]) -> BufferDataMut<'_>;
}

/// Floating-point elements usable by the grid solver kernels.
pub trait Real:
    Element
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// `0.5`.
    const HALF: Self;

    /// Convert from `f64`, rounding to the nearest representable value.
    fn from_f64(v: f64) -> Self;
    /// Widen to `f64`.
    fn to_f64(self) -> f64;
    /// Truncate a non-negative value to a cell index.
    fn to_index(self) -> usize;
    /// Convert a cell index to this type.
    fn from_index(i: usize) -> Self;
    /// Returns `true` if the value is neither infinite nor NaN.
    fn is_finite(self) -> bool;
}

macro_rules! impl_integer_element {
    ($($t:ty => $tag:ident),* $(,)?) => {$(
        impl Element for $t {
            const TYPE: ElementType = ElementType::$tag;
            const ZERO: Self = 0;
            const ONE: Self = 1;

            #[inline]
            fn plus(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }
            #[inline]
            fn minus(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }
            #[inline]
            fn times(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }
            #[inline]
            fn over(self, rhs: Self) -> Self {
                self.wrapping_div(rhs)
            }

            fn slice(data: BufferData<'_>) -> Option<&[Self]> {
                match data {
                    BufferData::$tag(s) => Some(s),
                    _ => None,
                }
            }
            fn slice_mut(data: BufferDataMut<'_>) -> Option<&mut [Self]> {
                match data {
                    BufferDataMut::$tag(s) => Some(s),
                    _ => None,
                }
            }
            fn wrap(slice: &[Self]) -> BufferData<'_> {
                BufferData::$tag(slice)
            }
            fn wrap_mut(slice: &mut [Self]) -> BufferDataMut<'_> {
                BufferDataMut::$tag(slice)
            }
        }
    )*};
}

macro_rules! impl_float_element {
    ($($t:ty => $tag:ident),* $(,)?) => {$(
        impl Element for $t {
            const TYPE: ElementType = ElementType::$tag;
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;

            #[inline]
            fn plus(self, rhs: Self) -> Self {
                self + rhs
            }
            #[inline]
            fn minus(self, rhs: Self) -> Self {
                self - rhs
            }
            #[inline]
            fn times(self, rhs: Self) -> Self {
                self * rhs
            }
            #[inline]
            fn over(self, rhs: Self) -> Self {
                self / rhs
            }

            fn slice(data: BufferData<'_>) -> Option<&[Self]> {
                match data {
                    BufferData::$tag(s) => Some(s),
                    _ => None,
                }
            }
            fn slice_mut(data: BufferDataMut<'_>) -> Option<&mut [Self]> {
                match data {
                    BufferDataMut::$tag(s) => Some(s),
                    _ => None,
                }
            }
            fn wrap(slice: &[Self]) -> BufferData<'_> {
                BufferData::$tag(slice)
            }
            fn wrap_mut(slice: &mut [Self]) -> BufferDataMut<'_> {
                BufferDataMut::$tag(slice)
            }
        }

        impl Real for $t {
            const HALF: Self = 0.5;

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }
            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
            #[inline]
            fn to_index(self) -> usize {
                self as usize
            }
            #[inline]
            fn from_index(i: usize) -> Self {
                i as $t
            }
            #[inline]
            fn is_finite(self) -> bool {
                <$t>::is_finite(self)
            }
        }
    )*};
}

impl_integer_element! {
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
}

impl_float_element! {
    f32 => Float32,
    f64 => Float64,
}
