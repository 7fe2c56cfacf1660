//! Per-step timing.

/// Wall-clock timings of the most recent time step, in microseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Whole step, including source clearing.
    pub total_us: u64,
    /// Velocity step: sources, diffusion, advection, and both projections.
    pub velocity_us: u64,
    /// Density step: source, diffusion, and advection.
    pub density_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.velocity_us, 0);
        assert_eq!(m.density_us, 0);
    }
}
