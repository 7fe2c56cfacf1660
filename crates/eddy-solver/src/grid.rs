//! Grid geometry.

use crate::error::SolverError;

/// Resolution and placement of a solver grid.
///
/// `resolution` counts interior cells; storage adds a one-cell halo on
/// every side. The solver works on a domain one unit wide, so its
/// coefficients depend only on the resolution. `spacing` and `origin`
/// place cells in world space and must be isotropic and finite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    resolution: [usize; 2],
    spacing: [f64; 2],
    origin: [f64; 2],
}

impl GridGeometry {
    /// Validate and record a grid description.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidGrid`] if either resolution is zero, spacing is
    /// not positive and finite, the two spacings differ, or the origin is
    /// not finite.
    pub fn new(
        resolution: [usize; 2],
        spacing: [f64; 2],
        origin: [f64; 2],
    ) -> Result<Self, SolverError> {
        let invalid = |reason: String| Err(SolverError::InvalidGrid { reason });
        if resolution.contains(&0) {
            return invalid(format!("resolution {resolution:?} has an empty axis"));
        }
        if resolution[0]
            .checked_add(2)
            .zip(resolution[1].checked_add(2))
            .and_then(|(w, h)| w.checked_mul(h))
            .is_none()
        {
            return invalid(format!("resolution {resolution:?} overflows storage size"));
        }
        if spacing.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return invalid(format!("spacing {spacing:?} must be positive and finite"));
        }
        if spacing[0] != spacing[1] {
            return invalid(format!("spacing {spacing:?} must be equal on both axes"));
        }
        if origin.iter().any(|o| !o.is_finite()) {
            return invalid(format!("origin {origin:?} must be finite"));
        }
        Ok(Self {
            resolution,
            spacing,
            origin,
        })
    }

    /// Interior cells per axis.
    pub fn resolution(&self) -> [usize; 2] {
        self.resolution
    }

    /// Cell size per axis.
    pub fn spacing(&self) -> [f64; 2] {
        self.spacing
    }

    /// World position of the lower-left corner of the interior.
    pub fn origin(&self) -> [f64; 2] {
        self.origin
    }

    /// Storage extents including the halo: `resolution + 2`.
    pub fn storage_shape(&self) -> [usize; 2] {
        [self.resolution[0] + 2, self.resolution[1] + 2]
    }

    /// Number of stored cells.
    pub fn storage_len(&self) -> usize {
        let [w, h] = self.storage_shape();
        w * h
    }

    /// Solver scale `N`: interior cells across the unit-wide domain.
    ///
    /// Independent of `spacing`.
    pub fn scale(&self) -> f64 {
        self.resolution[0] as f64
    }

    /// Flat storage index of cell `(i, j)`, halo coordinates included.
    pub fn index(&self, i: usize, j: usize) -> usize {
        i + self.storage_shape()[0] * j
    }

    /// World position of the centre of storage cell `(i, j)`. Interior
    /// cells are `1..=resolution` on each axis.
    pub fn cell_center(&self, i: usize, j: usize) -> [f64; 2] {
        [
            self.origin[0] + (i as f64 - 0.5) * self.spacing[0],
            self.origin[1] + (j as f64 - 0.5) * self.spacing[1],
        ]
    }
}
