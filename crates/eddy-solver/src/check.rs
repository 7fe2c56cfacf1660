//! Shared precondition checks for grid operations.

use eddy_core::{Device, ElementType, KernelError, ViewDescriptor};

/// Layout common to every view passed to one grid operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct GridLayout {
    pub device: Device,
    pub element_type: ElementType,
    /// Storage shape `[w, h]`, halo included.
    pub shape: [usize; 2],
}

/// Check that `views` share one device, one element type, rank 2, and one
/// shape of at least 3 cells per axis.
pub(crate) fn check_grid(
    op: &'static str,
    views: &[&ViewDescriptor],
) -> Result<GridLayout, KernelError> {
    let Some((first, rest)) = views.split_first() else {
        return Err(KernelError::Precondition {
            op,
            reason: "no operands".to_string(),
        });
    };

    for view in rest {
        if view.device() != first.device() {
            return Err(KernelError::DeviceMismatch {
                op,
                expected: first.device(),
                found: view.device(),
            });
        }
    }
    for view in rest {
        if view.element_type() != first.element_type() {
            return Err(KernelError::ElementTypeMismatch {
                expected: first.element_type(),
                found: view.element_type(),
            });
        }
    }

    match first.rank() {
        2 => {}
        3 => {
            return Err(KernelError::Precondition {
                op,
                reason: "rank 3 grids have no kernel".to_string(),
            })
        }
        other => {
            return Err(KernelError::Precondition {
                op,
                reason: format!("grid operations need rank 2, got rank {other}"),
            })
        }
    }

    let shape = [first.extent(0), first.extent(1)];
    if shape.iter().any(|&n| n < 3) {
        return Err(KernelError::Precondition {
            op,
            reason: format!("grid shape {}x{} is smaller than 3x3", shape[0], shape[1]),
        });
    }
    for view in rest {
        if view.shape() != first.shape() {
            return Err(KernelError::Precondition {
                op,
                reason: format!("shape {:?} differs from {:?}", view.shape(), first.shape()),
            });
        }
    }

    Ok(GridLayout {
        device: first.device(),
        element_type: first.element_type(),
        shape,
    })
}
