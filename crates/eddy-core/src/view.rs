//! Non-owning buffer views and their builder.
//!
//! A view pairs a [`ViewDescriptor`] (device, element type, rank, shape)
//! with a borrowed, type-tagged slice. Views never own memory: they are
//! built over storage owned elsewhere and cannot outlive it.
//!
//! Axis 0 is the fastest-varying axis. A rank-2 view of shape `[w, h]`
//! stores cell `(i, j)` at flat index `i + w * j`.

use crate::device::Device;
use crate::element::{Element, ElementType};
use crate::error::{KernelError, ViewError};

/// Maximum supported rank.
pub const MAX_RANK: usize = 3;

macro_rules! tagged_data {
    ($($tag:ident($t:ty)),* $(,)?) => {
        /// A borrowed slice tagged with its element type.
        #[derive(Clone, Copy, Debug, PartialEq)]
        pub enum BufferData<'a> {
            $(
                #[doc = concat!("`", stringify!($t), "` data.")]
                $tag(&'a [$t]),
            )*
        }

        /// A mutably borrowed slice tagged with its element type.
        #[derive(Debug, PartialEq)]
        pub enum BufferDataMut<'a> {
            $(
                #[doc = concat!("`", stringify!($t), "` data.")]
                $tag(&'a mut [$t]),
            )*
        }

        impl<'a> BufferData<'a> {
            /// Element type of the tagged slice.
            pub fn element_type(&self) -> ElementType {
                match self {
                    $(Self::$tag(_) => ElementType::$tag,)*
                }
            }

            /// Number of elements in the tagged slice.
            pub fn len(&self) -> usize {
                match self {
                    $(Self::$tag(s) => s.len(),)*
                }
            }

            /// Returns `true` if the slice has no elements.
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }
        }

        impl<'a> BufferDataMut<'a> {
            /// Element type of the tagged slice.
            pub fn element_type(&self) -> ElementType {
                match self {
                    $(Self::$tag(_) => ElementType::$tag,)*
                }
            }

            /// Number of elements in the tagged slice.
            pub fn len(&self) -> usize {
                match self {
                    $(Self::$tag(s) => s.len(),)*
                }
            }

            /// Returns `true` if the slice has no elements.
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            /// Shorter-lived mutable reborrow.
            pub fn reborrow(&mut self) -> BufferDataMut<'_> {
                match self {
                    $(Self::$tag(s) => BufferDataMut::$tag(&mut **s),)*
                }
            }

            /// Shared reborrow.
            pub fn as_shared(&self) -> BufferData<'_> {
                match self {
                    $(Self::$tag(s) => BufferData::$tag(&**s),)*
                }
            }
        }

        $(
            impl<'a> From<&'a [$t]> for BufferData<'a> {
                fn from(s: &'a [$t]) -> Self {
                    Self::$tag(s)
                }
            }

            impl<'a> From<&'a Vec<$t>> for BufferData<'a> {
                fn from(s: &'a Vec<$t>) -> Self {
                    Self::$tag(s.as_slice())
                }
            }

            impl<'a> From<&'a mut [$t]> for BufferDataMut<'a> {
                fn from(s: &'a mut [$t]) -> Self {
                    Self::$tag(s)
                }
            }

            impl<'a> From<&'a mut Vec<$t>> for BufferDataMut<'a> {
                fn from(s: &'a mut Vec<$t>) -> Self {
                    Self::$tag(s.as_mut_slice())
                }
            }
        )*
    };
}

tagged_data! {
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
}

/// Device, element type, rank, and shape of a buffer.
///
/// Inactive axes (at or beyond `rank`) always hold 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewDescriptor {
    device: Device,
    element_type: ElementType,
    rank: usize,
    shape: [usize; MAX_RANK],
}

impl ViewDescriptor {
    /// Device the buffer is bound to.
    pub fn device(&self) -> Device {
        self.device
    }

    /// Element type of the buffer.
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Number of active axes (0..=3).
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Extents of the active axes.
    pub fn shape(&self) -> &[usize] {
        &self.shape[..self.rank]
    }

    /// Extent of axis `axis`, or 1 for inactive axes.
    pub fn extent(&self, axis: usize) -> usize {
        self.shape.get(axis).copied().unwrap_or(1)
    }

    /// Product of the active extents; 0 for rank 0.
    pub fn length(&self) -> usize {
        if self.rank == 0 {
            return 0;
        }
        self.shape[..self.rank].iter().product()
    }
}

impl Default for ViewDescriptor {
    fn default() -> Self {
        Self {
            device: Device::Cpu,
            element_type: ElementType::Float32,
            rank: 1,
            shape: [1; MAX_RANK],
        }
    }
}

/// A shared, non-owning view of a numeric buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BufferView<'a> {
    desc: ViewDescriptor,
    data: BufferData<'a>,
}

impl<'a> BufferView<'a> {
    /// A rank-1, length-1 view over a single value, usable as a
    /// broadcast operand.
    pub fn scalar<T: Element>(device: Device, value: &'a T) -> Self {
        Self {
            desc: ViewDescriptor {
                device,
                element_type: T::TYPE,
                rank: 1,
                shape: [1; MAX_RANK],
            },
            data: T::wrap(std::slice::from_ref(value)),
        }
    }

    /// The view's descriptor.
    pub fn descriptor(&self) -> &ViewDescriptor {
        &self.desc
    }

    /// Device the buffer is bound to.
    pub fn device(&self) -> Device {
        self.desc.device
    }

    /// Element type of the buffer.
    pub fn element_type(&self) -> ElementType {
        self.desc.element_type
    }

    /// Number of active axes.
    pub fn rank(&self) -> usize {
        self.desc.rank
    }

    /// Extents of the active axes.
    pub fn shape(&self) -> &[usize] {
        self.desc.shape()
    }

    /// Number of elements described by the shape.
    pub fn length(&self) -> usize {
        self.desc.length()
    }

    /// Returns `true` if this view is a broadcastable scalar operand.
    pub fn is_scalar(&self) -> bool {
        self.length() == 1
    }

    /// The tagged storage.
    pub fn data(&self) -> BufferData<'a> {
        self.data
    }

    /// Reinterpret the storage as `&[T]`.
    ///
    /// This is the single reinterpretation point used by the dispatch
    /// layer after the runtime tag has been matched to `T`.
    pub fn typed<T: Element>(&self) -> Result<&'a [T], KernelError> {
        T::slice(self.data).ok_or(KernelError::ElementTypeMismatch {
            expected: T::TYPE,
            found: self.desc.element_type,
        })
    }
}

/// An exclusive, non-owning view of a numeric buffer.
#[derive(Debug, PartialEq)]
pub struct BufferViewMut<'a> {
    desc: ViewDescriptor,
    data: BufferDataMut<'a>,
}

impl<'a> BufferViewMut<'a> {
    /// The view's descriptor.
    pub fn descriptor(&self) -> &ViewDescriptor {
        &self.desc
    }

    /// Device the buffer is bound to.
    pub fn device(&self) -> Device {
        self.desc.device
    }

    /// Element type of the buffer.
    pub fn element_type(&self) -> ElementType {
        self.desc.element_type
    }

    /// Number of active axes.
    pub fn rank(&self) -> usize {
        self.desc.rank
    }

    /// Extents of the active axes.
    pub fn shape(&self) -> &[usize] {
        self.desc.shape()
    }

    /// Number of elements described by the shape.
    pub fn length(&self) -> usize {
        self.desc.length()
    }

    /// Shared view over the same storage, borrowed from `self`.
    pub fn as_view(&self) -> BufferView<'_> {
        BufferView {
            desc: self.desc,
            data: self.data.as_shared(),
        }
    }

    /// Shorter-lived exclusive view over the same storage.
    pub fn reborrow(&mut self) -> BufferViewMut<'_> {
        BufferViewMut {
            desc: self.desc,
            data: self.data.reborrow(),
        }
    }

    /// Reinterpret the storage as `&mut [T]`.
    pub fn typed_mut<T: Element>(&mut self) -> Result<&mut [T], KernelError> {
        let found = self.desc.element_type;
        T::slice_mut(self.data.reborrow()).ok_or(KernelError::ElementTypeMismatch {
            expected: T::TYPE,
            found,
        })
    }

    /// Consume the view, yielding the typed storage for its full lifetime.
    pub fn into_typed<T: Element>(self) -> Result<&'a mut [T], KernelError> {
        let found = self.desc.element_type;
        T::slice_mut(self.data).ok_or(KernelError::ElementTypeMismatch {
            expected: T::TYPE,
            found,
        })
    }
}

/// Builder for [`BufferView`] and [`BufferViewMut`].
///
/// Defaults to a CPU, `f32`, rank-1 descriptor. [`with_view`](Self::with_view)
/// copies device, element type and shape from an existing view so the
/// same logical layout can be laid over different storage:
///
/// ```
/// use eddy_core::{BufferViewBuilder, Device, ElementType};
///
/// let a = vec![0.0f32; 12];
/// let b = vec![1.0f32; 12];
/// let va = BufferViewBuilder::new()
///     .with_device(Device::Cpu)
///     .with_element_type(ElementType::Float32)
///     .with_shape(&[4, 3])
///     .build(&a)
///     .unwrap();
/// let vb = BufferViewBuilder::new().with_view(va.descriptor()).build(&b).unwrap();
/// assert_eq!(vb.shape(), &[4, 3]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct BufferViewBuilder {
    desc: ViewDescriptor,
    rank_error: Option<usize>,
}

impl BufferViewBuilder {
    /// Start from the default descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy device, element type, rank and shape from `desc`.
    pub fn with_view(mut self, desc: &ViewDescriptor) -> Self {
        self.desc = *desc;
        self.rank_error = None;
        self
    }

    /// Set the device.
    pub fn with_device(mut self, device: Device) -> Self {
        self.desc.device = device;
        self
    }

    /// Set the element type.
    pub fn with_element_type(mut self, element_type: ElementType) -> Self {
        self.desc.element_type = element_type;
        self
    }

    /// Set the shape; its length becomes the rank.
    pub fn with_shape(mut self, shape: &[usize]) -> Self {
        if shape.len() > MAX_RANK {
            self.rank_error = Some(shape.len());
            return self;
        }
        self.rank_error = None;
        self.desc.shape = [1; MAX_RANK];
        self.desc.shape[..shape.len()].copy_from_slice(shape);
        self.desc.rank = shape.len();
        self
    }

    fn finish(&self, element_type: ElementType, len: usize) -> Result<ViewDescriptor, ViewError> {
        if let Some(rank) = self.rank_error {
            return Err(ViewError::RankTooHigh { rank });
        }
        if element_type != self.desc.element_type {
            return Err(ViewError::ElementTypeMismatch {
                declared: self.desc.element_type,
                actual: element_type,
            });
        }
        if self.desc.length() != len {
            return Err(ViewError::LengthMismatch {
                shape_length: self.desc.length(),
                buffer_length: len,
            });
        }
        Ok(self.desc)
    }

    /// Build a shared view over `data`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the shape had more than three axes, if the declared
    /// element type differs from `data`'s, or if the shape's length differs
    /// from the number of elements in `data`.
    pub fn build<'a>(&self, data: impl Into<BufferData<'a>>) -> Result<BufferView<'a>, ViewError> {
        let data = data.into();
        let desc = self.finish(data.element_type(), data.len())?;
        Ok(BufferView { desc, data })
    }

    /// Build an exclusive view over `data`. Same checks as [`build`](Self::build).
    pub fn build_mut<'a>(
        &self,
        data: impl Into<BufferDataMut<'a>>,
    ) -> Result<BufferViewMut<'a>, ViewError> {
        let data = data.into();
        let desc = self.finish(data.element_type(), data.len())?;
        Ok(BufferViewMut { desc, data })
    }
}
