//! Validated elementwise and padding operations over buffer views.
//!
//! Each operation checks, in order: that every operand is bound to the
//! same device, that all element types agree, that lengths satisfy the
//! broadcast rule, and that a backend is registered for the device. Only
//! then does it write. A failed call leaves every output untouched.
//!
//! A leading operand of length 1 is broadcast against every element of
//! the remaining operands:
//!
//! ```
//! use eddy_core::{BufferView, BufferViewBuilder, Device, ElementType};
//! use eddy_kernels::mul;
//!
//! let two = 2.0f64;
//! let b = vec![1.0f64, 2.0, 3.0];
//! let mut out = vec![0.0f64; 3];
//! let layout = BufferViewBuilder::new()
//!     .with_element_type(ElementType::Float64)
//!     .with_shape(&[3]);
//! let vb = layout.build(&b).unwrap();
//! let mut vo = layout.build_mut(&mut out).unwrap();
//! mul(&BufferView::scalar(Device::Cpu, &two), &vb, &mut vo).unwrap();
//! assert_eq!(out, [2.0, 4.0, 6.0]);
//! ```

use eddy_core::{
    dispatch_element, dispatch_rank, ArrayKernels, BinaryOp, BufferView, BufferViewMut, Device,
    Element, ElementType, ElementVisitor, KernelError, Operand, RankVisitor, TernaryOp, UnaryOp,
};

use crate::registry;

/// `[low, high]` halo widths for each of the three axes. Entries for
/// axes beyond the buffer's rank are ignored.
pub type PadWidths = [[usize; 2]; 3];

fn check_devices(op: &'static str, first: Device, rest: &[Device]) -> Result<(), KernelError> {
    match rest.iter().find(|&&d| d != first) {
        Some(&found) => Err(KernelError::DeviceMismatch {
            op,
            expected: first,
            found,
        }),
        None => Ok(()),
    }
}

fn check_types(first: ElementType, rest: &[ElementType]) -> Result<(), KernelError> {
    match rest.iter().find(|&&t| t != first) {
        Some(&found) => Err(KernelError::ElementTypeMismatch {
            expected: first,
            found,
        }),
        None => Ok(()),
    }
}

fn check_length(op: &'static str, expected: usize, found: usize) -> Result<(), KernelError> {
    if expected == found {
        Ok(())
    } else {
        Err(KernelError::LengthMismatch {
            op,
            expected,
            found,
        })
    }
}

/// A leading operand broadcasts when it holds one element; otherwise it
/// must match `expected`.
fn check_leading(
    op: &'static str,
    lead: &BufferView<'_>,
    expected: usize,
) -> Result<(), KernelError> {
    if lead.is_scalar() {
        Ok(())
    } else {
        check_length(op, expected, lead.length())
    }
}

struct Unary<'v> {
    op: UnaryOp,
    a: BufferView<'v>,
    out: BufferViewMut<'v>,
}

impl ElementVisitor for Unary<'_> {
    type Output = Result<(), KernelError>;

    fn visit<T: Element>(self) -> Self::Output {
        let kernels = registry::array_kernels::<T>(self.op.name(), self.out.device())?;
        let a = Operand::from_slice(self.a.typed::<T>()?);
        kernels.unary(self.op, a, self.out.into_typed::<T>()?);
        Ok(())
    }
}

struct Binary<'v> {
    op: BinaryOp,
    a: BufferView<'v>,
    b: BufferView<'v>,
    out: BufferViewMut<'v>,
}

impl ElementVisitor for Binary<'_> {
    type Output = Result<(), KernelError>;

    fn visit<T: Element>(self) -> Self::Output {
        let kernels = registry::array_kernels::<T>(self.op.name(), self.out.device())?;
        let a = Operand::from_slice(self.a.typed::<T>()?);
        let b = self.b.typed::<T>()?;
        kernels.binary(self.op, a, b, self.out.into_typed::<T>()?);
        Ok(())
    }
}

struct Ternary<'v> {
    op: TernaryOp,
    a: BufferView<'v>,
    b: BufferView<'v>,
    c: Option<BufferView<'v>>,
    out: BufferViewMut<'v>,
}

impl ElementVisitor for Ternary<'_> {
    type Output = Result<(), KernelError>;

    fn visit<T: Element>(self) -> Self::Output {
        let kernels = registry::array_kernels::<T>(self.op.name(), self.out.device())?;
        let a = Operand::from_slice(self.a.typed::<T>()?);
        let b = self.b.typed::<T>()?;
        match self.c {
            Some(c) => {
                let c = c.typed::<T>()?;
                kernels.ternary(self.op, a, b, c, self.out.into_typed::<T>()?);
            }
            None => kernels.ternary_assign(self.op, a, b, self.out.into_typed::<T>()?),
        }
        Ok(())
    }
}

/// Copy `input` into `output`. Both must hold the same number of elements.
///
/// # Errors
///
/// Returns `Err` on a device, element type, or length mismatch, or if the
/// device has no backend.
pub fn copy(input: &BufferView<'_>, output: &mut BufferViewMut<'_>) -> Result<(), KernelError> {
    let op = UnaryOp::Copy.name();
    check_devices(op, input.device(), &[output.device()])?;
    check_types(input.element_type(), &[output.element_type()])?;
    check_length(op, output.length(), input.length())?;
    dispatch_element(
        input.element_type(),
        Unary {
            op: UnaryOp::Copy,
            a: *input,
            out: output.reborrow(),
        },
    )
}

fn binary(
    op: BinaryOp,
    a: &BufferView<'_>,
    b: &BufferView<'_>,
    result: &mut BufferViewMut<'_>,
) -> Result<(), KernelError> {
    let name = op.name();
    check_devices(name, a.device(), &[b.device(), result.device()])?;
    check_types(a.element_type(), &[b.element_type(), result.element_type()])?;
    check_leading(name, a, b.length())?;
    check_length(name, b.length(), result.length())?;
    dispatch_element(
        a.element_type(),
        Binary {
            op,
            a: *a,
            b: *b,
            out: result.reborrow(),
        },
    )
}

/// `result = a + b`.
///
/// # Errors
///
/// As for [`copy`].
pub fn add(
    a: &BufferView<'_>,
    b: &BufferView<'_>,
    result: &mut BufferViewMut<'_>,
) -> Result<(), KernelError> {
    binary(BinaryOp::Add, a, b, result)
}

/// `result = a - b`.
///
/// # Errors
///
/// As for [`copy`].
pub fn sub(
    a: &BufferView<'_>,
    b: &BufferView<'_>,
    result: &mut BufferViewMut<'_>,
) -> Result<(), KernelError> {
    binary(BinaryOp::Sub, a, b, result)
}

/// `result = a * b`.
///
/// # Errors
///
/// As for [`copy`].
pub fn mul(
    a: &BufferView<'_>,
    b: &BufferView<'_>,
    result: &mut BufferViewMut<'_>,
) -> Result<(), KernelError> {
    binary(BinaryOp::Mul, a, b, result)
}

/// `result = a / b`. Integer division by zero panics.
///
/// # Errors
///
/// As for [`copy`].
pub fn div(
    a: &BufferView<'_>,
    b: &BufferView<'_>,
    result: &mut BufferViewMut<'_>,
) -> Result<(), KernelError> {
    binary(BinaryOp::Div, a, b, result)
}

/// `result = a * x + y`.
///
/// # Errors
///
/// As for [`copy`].
pub fn axpy(
    a: &BufferView<'_>,
    x: &BufferView<'_>,
    y: &BufferView<'_>,
    result: &mut BufferViewMut<'_>,
) -> Result<(), KernelError> {
    let name = TernaryOp::Axpy.name();
    check_devices(name, a.device(), &[x.device(), y.device(), result.device()])?;
    check_types(
        a.element_type(),
        &[x.element_type(), y.element_type(), result.element_type()],
    )?;
    check_leading(name, a, x.length())?;
    check_length(name, x.length(), y.length())?;
    check_length(name, x.length(), result.length())?;
    dispatch_element(
        a.element_type(),
        Ternary {
            op: TernaryOp::Axpy,
            a: *a,
            b: *x,
            c: Some(*y),
            out: result.reborrow(),
        },
    )
}

/// `y = a * x + y`, accumulating into `y`.
///
/// # Errors
///
/// As for [`copy`].
pub fn axpy_in_place(
    a: &BufferView<'_>,
    x: &BufferView<'_>,
    y: &mut BufferViewMut<'_>,
) -> Result<(), KernelError> {
    let name = TernaryOp::Axpy.name();
    check_devices(name, a.device(), &[x.device(), y.device()])?;
    check_types(a.element_type(), &[x.element_type(), y.element_type()])?;
    check_leading(name, a, x.length())?;
    check_length(name, x.length(), y.length())?;
    dispatch_element(
        a.element_type(),
        Ternary {
            op: TernaryOp::Axpy,
            a: *a,
            b: *x,
            c: None,
            out: y.reborrow(),
        },
    )
}

struct PadEdge<'v> {
    view: BufferViewMut<'v>,
    pad: PadWidths,
}

struct PadRank<'v, T: Element> {
    kernels: &'static dyn ArrayKernels<T>,
    data: &'v mut [T],
    shape: [usize; 3],
    pad: PadWidths,
}

impl<T: Element> RankVisitor for PadRank<'_, T> {
    type Output = ();

    fn rank1(self) {
        self.kernels.pad_edge_1d(self.data, self.pad[0]);
    }

    fn rank2(self) {
        let [w, h, _] = self.shape;
        self.kernels
            .pad_edge_2d(self.data, [w, h], [self.pad[0], self.pad[1]]);
    }

    fn rank3(self) {
        self.kernels.pad_edge_3d(self.data, self.shape, self.pad);
    }
}

impl ElementVisitor for PadEdge<'_> {
    type Output = Result<(), KernelError>;

    fn visit<T: Element>(self) -> Self::Output {
        const OP: &str = "pad_edge";
        let kernels = registry::array_kernels::<T>(OP, self.view.device())?;
        let desc = *self.view.descriptor();
        let shape = [desc.extent(0), desc.extent(1), desc.extent(2)];
        let data = self.view.into_typed::<T>()?;
        dispatch_rank(
            OP,
            desc.rank(),
            PadRank {
                kernels,
                data,
                shape,
                pad: self.pad,
            },
        )
    }
}

/// Fill the halo of `buffer` by replicating its outermost interior
/// values, axis 0 first, then 1, then 2. Each later axis copies rows or
/// planes already padded along earlier axes, so corners take the value
/// of the nearest interior corner. The interior is not modified.
///
/// # Errors
///
/// [`KernelError::InsufficientInterior`] if any active axis has no
/// interior left after padding, [`KernelError::Precondition`] for rank 0,
/// and [`KernelError::UnsupportedDevice`] if the device has no backend.
pub fn pad_edge(buffer: &mut BufferViewMut<'_>, pad: PadWidths) -> Result<(), KernelError> {
    for (axis, (&extent, widths)) in buffer.shape().iter().zip(pad).enumerate() {
        if extent <= widths[0] + widths[1] {
            return Err(KernelError::InsufficientInterior {
                axis,
                extent,
                pad: widths,
            });
        }
    }
    dispatch_element(
        buffer.element_type(),
        PadEdge {
            view: buffer.reborrow(),
            pad,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use eddy_core::BufferViewBuilder;

    fn layout(ty: ElementType, shape: &[usize]) -> BufferViewBuilder {
        BufferViewBuilder::new().with_element_type(ty).with_shape(shape)
    }

    #[test]
    fn add_vectors() {
        let a = vec![1i32, 2, 3];
        let b = vec![10i32, 20, 30];
        let mut r = vec![0i32; 3];
        let l = layout(ElementType::Int32, &[3]);
        add(
            &l.build(&a).unwrap(),
            &l.build(&b).unwrap(),
            &mut l.build_mut(&mut r).unwrap(),
        )
        .unwrap();
        assert_eq!(r, [11, 22, 33]);
    }

    #[test]
    fn device_mismatch_reported_first() {
        let a = vec![1.0f32; 4];
        let b = vec![1.0f64; 3];
        let mut r = vec![0.0f32; 4];
        let va = layout(ElementType::Float32, &[4]).build(&a).unwrap();
        let vb = layout(ElementType::Float64, &[3])
            .with_device(Device::VectorizedCompute)
            .build(&b)
            .unwrap();
        let mut vr = layout(ElementType::Float32, &[4]).build_mut(&mut r).unwrap();
        let err = add(&va, &vb, &mut vr).unwrap_err();
        assert!(matches!(err, KernelError::DeviceMismatch { op: "add", .. }));
        assert_eq!(r, [0.0; 4]);
    }

    #[test]
    fn type_mismatch_before_length() {
        let a = vec![1u8; 4];
        let b = vec![1i8; 3];
        let mut r = vec![0u8; 4];
        let err = sub(
            &layout(ElementType::UInt8, &[4]).build(&a).unwrap(),
            &layout(ElementType::Int8, &[3]).build(&b).unwrap(),
            &mut layout(ElementType::UInt8, &[4]).build_mut(&mut r).unwrap(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            KernelError::ElementTypeMismatch {
                expected: ElementType::UInt8,
                found: ElementType::Int8
            }
        );
    }

    #[test]
    fn length_mismatch_leaves_result_untouched() {
        let a = vec![1.0f64; 4];
        let b = vec![1.0f64; 3];
        let mut r = vec![7.0f64; 4];
        let err = mul(
            &layout(ElementType::Float64, &[4]).build(&a).unwrap(),
            &layout(ElementType::Float64, &[3]).build(&b).unwrap(),
            &mut layout(ElementType::Float64, &[4]).build_mut(&mut r).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, KernelError::LengthMismatch { op: "mul", .. }));
        assert_eq!(r, [7.0; 4]);
    }

    #[test]
    fn axpy_in_place_accumulates() {
        let dt = 0.5f32;
        let s = vec![2.0f32, 4.0];
        let mut x = vec![1.0f32, 1.0];
        let l = layout(ElementType::Float32, &[2]);
        axpy_in_place(
            &BufferView::scalar(Device::Cpu, &dt),
            &l.build(&s).unwrap(),
            &mut l.build_mut(&mut x).unwrap(),
        )
        .unwrap();
        assert_eq!(x, [2.0, 3.0]);
    }

    #[test]
    fn pad_1d() {
        let mut data = vec![0u16, 4, 5, 6, 0, 0];
        pad_edge(
            &mut layout(ElementType::UInt16, &[6]).build_mut(&mut data).unwrap(),
            [[1, 2], [0, 0], [0, 0]],
        )
        .unwrap();
        assert_eq!(data, [4, 4, 5, 6, 6, 6]);
    }

    #[test]
    fn pad_rejects_axis_without_interior() {
        let mut data = vec![0.0f32; 12];
        let err = pad_edge(
            &mut layout(ElementType::Float32, &[3, 4]).build_mut(&mut data).unwrap(),
            [[1, 1], [2, 2], [0, 0]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            KernelError::InsufficientInterior {
                axis: 1,
                extent: 4,
                pad: [2, 2]
            }
        );
    }

    #[test]
    fn pad_rejects_rank_zero() {
        let mut data: Vec<f32> = Vec::new();
        let err = pad_edge(
            &mut layout(ElementType::Float32, &[]).build_mut(&mut data).unwrap(),
            [[0, 0]; 3],
        )
        .unwrap_err();
        assert!(matches!(err, KernelError::Precondition { op: "pad_edge", .. }));
    }
}
