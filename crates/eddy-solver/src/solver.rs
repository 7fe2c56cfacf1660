//! The stable-fluids grid solver.
//!
//! [`GridFluidSolver`] owns every field on the grid and sequences the
//! kernels of one time step. The three source buffers double as
//! intermediate storage during a step, so their contents are consumed:
//! they are zeroed when [`advance_time_step`](GridFluidSolver::advance_time_step)
//! returns and callers write fresh forcing before each step.

use std::time::Instant;

use eddy_core::{BoundaryMode, BufferView, BufferViewBuilder, BufferViewMut, Real, ViewError};
use tracing::{debug, trace, warn};

use crate::advect::advect;
use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::frame::Frame;
use crate::grid::GridGeometry;
use crate::linear::diffuse;
use crate::metrics::StepMetrics;
use crate::project::project;
use crate::source::add_source;

fn shared<'a, R: Real>(
    layout: &BufferViewBuilder,
    data: &'a [R],
) -> Result<BufferView<'a>, ViewError> {
    layout.build(R::wrap(data))
}

fn exclusive<'a, R: Real>(
    layout: &BufferViewBuilder,
    data: &'a mut [R],
) -> Result<BufferViewMut<'a>, ViewError> {
    layout.build_mut(R::wrap_mut(data))
}

/// 2D stable-fluids solver over a grid with a one-cell ghost halo.
///
/// Each step runs a velocity step (add sources, diffuse, project, advect,
/// project) followed by a density step (add source, diffuse, advect) on
/// the configured device.
///
/// ```
/// use eddy_solver::{GridFluidSolver, SolverConfig};
///
/// let mut solver = GridFluidSolver::<f32>::new(SolverConfig::default()).unwrap();
/// solver.resize_grid([8, 8], [0.125, 0.125], [0.0, 0.0]).unwrap();
/// let k = solver.geometry().unwrap().index(4, 4);
/// solver.density_source_mut()[k] = 10.0;
/// solver.advance_time_step(0.1).unwrap();
/// assert!(solver.density()[k] > 0.0);
/// ```
#[derive(Debug)]
pub struct GridFluidSolver<R: Real = f32> {
    config: SolverConfig,
    geometry: Option<GridGeometry>,
    layout: BufferViewBuilder,
    u: Vec<R>,
    v: Vec<R>,
    u_source: Vec<R>,
    v_source: Vec<R>,
    density: Vec<R>,
    density_source: Vec<R>,
    scratch: Vec<R>,
    current_frame: Option<u64>,
    last_metrics: StepMetrics,
}

impl<R: Real> GridFluidSolver<R> {
    /// Create a solver with no grid allocated.
    ///
    /// # Errors
    ///
    /// [`SolverError::Config`] if `config` fails validation.
    pub fn new(config: SolverConfig) -> Result<Self, SolverError> {
        config.validate()?;
        debug!(
            device = %config.device,
            precision = R::TYPE.name(),
            viscosity = config.viscosity,
            diffusion = config.diffusion,
            "grid fluid solver created"
        );
        let layout = BufferViewBuilder::new()
            .with_device(config.device)
            .with_element_type(R::TYPE);
        Ok(Self {
            config,
            geometry: None,
            layout,
            u: Vec::new(),
            v: Vec::new(),
            u_source: Vec::new(),
            v_source: Vec::new(),
            density: Vec::new(),
            density_source: Vec::new(),
            scratch: Vec::new(),
            current_frame: None,
            last_metrics: StepMetrics::default(),
        })
    }

    /// Allocate zeroed fields for `size` interior cells per axis.
    ///
    /// Any existing field contents are discarded. The solver scale is the
    /// interior width `size[0]`; `spacing` and `origin` are recorded in
    /// [`geometry`](Self::geometry) for placing cells in world space and
    /// do not change the simulation.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidGrid`] as for [`GridGeometry::new`].
    pub fn resize_grid(
        &mut self,
        size: [usize; 2],
        spacing: [f64; 2],
        origin: [f64; 2],
    ) -> Result<(), SolverError> {
        let geometry = GridGeometry::new(size, spacing, origin)?;
        let len = geometry.storage_len();
        for field in [
            &mut self.u,
            &mut self.v,
            &mut self.u_source,
            &mut self.v_source,
            &mut self.density,
            &mut self.density_source,
            &mut self.scratch,
        ] {
            field.clear();
            field.resize(len, R::ZERO);
        }
        self.layout = self.layout.clone().with_shape(&geometry.storage_shape());
        self.geometry = Some(geometry);
        debug!(
            nx = size[0],
            ny = size[1],
            spacing = spacing[0],
            cells = len,
            "grid resized"
        );
        Ok(())
    }

    fn require_grid(&self) -> Result<GridGeometry, SolverError> {
        self.geometry.ok_or(SolverError::GridNotAllocated)
    }

    // ── Stepping ───────────────────────────────────────────────────

    /// Advance the velocity field by `dt`.
    ///
    /// Leaves intermediate values in the velocity source buffers.
    ///
    /// # Errors
    ///
    /// [`SolverError::GridNotAllocated`] before the first resize;
    /// [`SolverError::Kernel`] if the device has no grid kernels.
    pub fn velocity_step(&mut self, dt: f64) -> Result<(), SolverError> {
        let scale = self.require_grid()?.scale();
        let viscosity = self.config.viscosity;
        let layout = &self.layout;
        let mut u = exclusive(layout, &mut self.u)?;
        let mut v = exclusive(layout, &mut self.v)?;
        let mut u0 = exclusive(layout, &mut self.u_source)?;
        let mut v0 = exclusive(layout, &mut self.v_source)?;
        let mut scratch = exclusive(layout, &mut self.scratch)?;

        add_source(&mut u, &u0.as_view(), dt)?;
        add_source(&mut v, &v0.as_view(), dt)?;

        // Diffuse into the source buffers, then make them divergence free
        // using u and v as pressure and divergence storage.
        let (horizontal, vertical) = (BoundaryMode::Horizontal, BoundaryMode::Vertical);
        diffuse(&mut u0, &u.as_view(), &mut scratch, viscosity, dt, horizontal, scale)?;
        diffuse(&mut v0, &v.as_view(), &mut scratch, viscosity, dt, vertical, scale)?;
        project(&mut u0, &mut v0, &mut u, &mut v, &mut scratch, scale)?;

        // Self-advect back into u and v.
        let (prev_u, prev_v) = (u0.as_view(), v0.as_view());
        advect(&mut u, &prev_u, &prev_u, &prev_v, dt, horizontal, scale)?;
        advect(&mut v, &prev_v, &prev_u, &prev_v, dt, vertical, scale)?;

        project(&mut u, &mut v, &mut u0, &mut v0, &mut scratch, scale)?;
        Ok(())
    }

    /// Advance the density field by `dt` through the current velocity.
    ///
    /// Leaves intermediate values in the density source buffer.
    ///
    /// # Errors
    ///
    /// As for [`velocity_step`](Self::velocity_step).
    pub fn density_step(&mut self, dt: f64) -> Result<(), SolverError> {
        let scale = self.require_grid()?.scale();
        let diffusion = self.config.diffusion;
        let layout = &self.layout;
        let mut density = exclusive(layout, &mut self.density)?;
        let mut density0 = exclusive(layout, &mut self.density_source)?;
        let mut scratch = exclusive(layout, &mut self.scratch)?;
        let u = shared(layout, &self.u)?;
        let v = shared(layout, &self.v)?;

        add_source(&mut density, &density0.as_view(), dt)?;
        let mode = BoundaryMode::Scalar;
        diffuse(&mut density0, &density.as_view(), &mut scratch, diffusion, dt, mode, scale)?;
        advect(&mut density, &density0.as_view(), &u, &v, dt, mode, scale)?;
        Ok(())
    }

    /// Run one velocity step and one density step of `dt` seconds, then
    /// zero the source buffers.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidTimeStep`] unless `dt` is finite and
    /// non-negative; otherwise as for [`velocity_step`](Self::velocity_step).
    pub fn advance_time_step(&mut self, dt: f64) -> Result<(), SolverError> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(SolverError::InvalidTimeStep { value: dt });
        }
        self.require_grid()?;

        let start = Instant::now();
        self.velocity_step(dt)?;
        let velocity_us = start.elapsed().as_micros() as u64;

        let density_start = Instant::now();
        self.density_step(dt)?;
        let density_us = density_start.elapsed().as_micros() as u64;

        self.clear_sources();
        let total_us = start.elapsed().as_micros() as u64;
        self.last_metrics = StepMetrics {
            total_us,
            velocity_us,
            density_us,
        };
        trace!(dt, total_us, velocity_us, density_us, "time step");
        Ok(())
    }

    /// Advance to `frame`.
    ///
    /// The first call only records the frame index. Later calls run one
    /// [`advance_time_step`](Self::advance_time_step) of
    /// `frame.time_interval` per frame between the recorded index and
    /// `frame.index`. A frame at or before the recorded one is ignored.
    ///
    /// # Errors
    ///
    /// As for [`advance_time_step`](Self::advance_time_step). On error the
    /// recorded index is that of the last completed step.
    pub fn update(&mut self, frame: &Frame) -> Result<(), SolverError> {
        let Some(current) = self.current_frame else {
            self.current_frame = Some(frame.index);
            debug!(frame = frame.index, "solver frame counter initialised");
            return Ok(());
        };
        if frame.index <= current {
            warn!(
                frame = frame.index,
                current, "frame does not advance the solver; ignoring"
            );
            return Ok(());
        }

        let dt = frame.time_interval;
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(SolverError::InvalidTimeStep { value: dt });
        }
        let steps = frame.index - current;
        if steps > 1 {
            debug!(from = current, to = frame.index, steps, "advancing several frames");
        }
        for index in current + 1..=frame.index {
            self.advance_time_step(dt)?;
            self.current_frame = Some(index);
        }
        Ok(())
    }

    fn clear_sources(&mut self) {
        self.u_source.fill(R::ZERO);
        self.v_source.fill(R::ZERO);
        self.density_source.fill(R::ZERO);
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// The configuration the solver was built with.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Grid geometry, once allocated.
    pub fn geometry(&self) -> Option<&GridGeometry> {
        self.geometry.as_ref()
    }

    /// Index of the last frame reached through [`update`](Self::update).
    pub fn current_frame(&self) -> Option<u64> {
        self.current_frame
    }

    /// Timings of the most recent [`advance_time_step`](Self::advance_time_step).
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// Density, halo included.
    pub fn density(&self) -> &[R] {
        &self.density
    }

    /// Mutable density, for seeding initial conditions.
    pub fn density_mut(&mut self) -> &mut [R] {
        &mut self.density
    }

    /// Horizontal velocity, halo included.
    pub fn velocity_u(&self) -> &[R] {
        &self.u
    }

    /// Vertical velocity, halo included.
    pub fn velocity_v(&self) -> &[R] {
        &self.v
    }

    /// Density source, consumed by the next step.
    pub fn density_source_mut(&mut self) -> &mut [R] {
        &mut self.density_source
    }

    /// Horizontal velocity source, consumed by the next step.
    pub fn u_source_mut(&mut self) -> &mut [R] {
        &mut self.u_source
    }

    /// Vertical velocity source, consumed by the next step.
    pub fn v_source_mut(&mut self) -> &mut [R] {
        &mut self.v_source
    }

    /// Read-only rank-2 view of the density.
    ///
    /// # Errors
    ///
    /// [`SolverError::GridNotAllocated`] before the first resize.
    pub fn density_view(&self) -> Result<BufferView<'_>, SolverError> {
        self.require_grid()?;
        Ok(shared(&self.layout, &self.density)?)
    }

    /// Read-only rank-2 views of the horizontal and vertical velocity.
    ///
    /// # Errors
    ///
    /// [`SolverError::GridNotAllocated`] before the first resize.
    pub fn velocity_views(&self) -> Result<(BufferView<'_>, BufferView<'_>), SolverError> {
        self.require_grid()?;
        Ok((shared(&self.layout, &self.u)?, shared(&self.layout, &self.v)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eddy_core::{Device, KernelError};

    fn solver(n: usize) -> GridFluidSolver<f64> {
        let mut s = GridFluidSolver::new(SolverConfig::default()).unwrap();
        s.resize_grid([n, n], [1.0 / n as f64; 2], [0.0, 0.0]).unwrap();
        s
    }

    #[test]
    fn stepping_before_resize_fails() {
        let mut s = GridFluidSolver::<f32>::new(SolverConfig::default()).unwrap();
        assert_eq!(s.advance_time_step(0.1), Err(SolverError::GridNotAllocated));
        assert!(s.density_view().is_err());
    }

    #[test]
    fn resize_allocates_halo() {
        let s = solver(4);
        assert_eq!(s.density().len(), 36);
        assert_eq!(s.velocity_u().len(), 36);
        let view = s.density_view().unwrap();
        assert_eq!(view.shape(), &[6, 6]);
    }

    #[test]
    fn invalid_time_steps_are_rejected() {
        let mut s = solver(4);
        for dt in [-0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                s.advance_time_step(dt),
                Err(SolverError::InvalidTimeStep { .. })
            ));
        }
    }

    #[test]
    fn sources_are_cleared_after_a_step() {
        let mut s = solver(4);
        s.density_source_mut()[14] = 1.0;
        s.u_source_mut()[14] = 1.0;
        s.v_source_mut()[15] = -1.0;
        s.advance_time_step(0.05).unwrap();
        assert!(s.density_source_mut().iter().all(|&x| x == 0.0));
        assert!(s.u_source_mut().iter().all(|&x| x == 0.0));
        assert!(s.v_source_mut().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn first_update_only_records_the_frame() {
        let mut s = solver(4);
        s.density_source_mut()[14] = 1.0;
        s.update(&Frame::new(5, 0.1)).unwrap();
        assert_eq!(s.current_frame(), Some(5));
        assert_eq!(s.density()[14], 0.0);
        assert_eq!(s.density_source_mut()[14], 1.0);
    }

    #[test]
    fn update_steps_once_per_frame() {
        let mut s = solver(4);
        let mut frame = Frame::new(0, 0.1);
        s.update(&frame).unwrap();

        s.density_source_mut()[14] = 1.0;
        frame.advance();
        s.update(&frame).unwrap();
        assert_eq!(s.current_frame(), Some(1));
        assert!((s.density()[14] - 0.1).abs() < 1e-12);

        // Going backwards is ignored.
        s.density_source_mut()[14] = 1.0;
        s.update(&Frame::new(0, 0.1)).unwrap();
        assert_eq!(s.current_frame(), Some(1));
        assert!((s.density()[14] - 0.1).abs() < 1e-12);

        // Skipping ahead runs one step per frame; the source is consumed by
        // the first of them.
        frame.advance_by(3);
        s.update(&frame).unwrap();
        assert_eq!(s.current_frame(), Some(4));
        assert!((s.density()[14] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn gpu_steps_are_unsupported() {
        let config = SolverConfig::builder()
            .device(Device::GpuCompute)
            .build()
            .unwrap();
        let mut s = GridFluidSolver::<f32>::new(config).unwrap();
        s.resize_grid([4, 4], [0.25, 0.25], [0.0, 0.0]).unwrap();
        s.density_source_mut()[14] = 1.0;
        let err = s.advance_time_step(0.1).unwrap_err();
        assert!(matches!(
            err,
            SolverError::Kernel(KernelError::UnsupportedDevice {
                device: Device::GpuCompute,
                ..
            })
        ));
        assert_eq!(s.density()[14], 0.0);
    }

    #[test]
    fn metrics_cover_both_stages() {
        let mut s = solver(8);
        s.advance_time_step(0.01).unwrap();
        let m = *s.last_metrics();
        assert!(m.total_us >= m.velocity_us);
        assert!(m.total_us >= m.density_us);
    }
}
