//! Explicit simulation state shared by the views.
//!
//! A [`SimulationContext`] owns the current parameters, the source array
//! built from them, the view region, and the simulation clock. It is passed
//! by reference into every evaluation pass; there is no ambient state.

use crate::error::WaveError;
use crate::evaluator::{EvaluationMode, FieldEvaluator, WaveConstants};
use crate::params::ArrayParameters;
use crate::region::ViewRegion;
use crate::source::SourceArray;

/// Scalar and array inputs consumed by a rendering backend for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUniforms {
    /// Sources flattened as `[x, y, phase]` triples.
    pub sources: Vec<f32>,
    pub source_count: usize,
    pub view_width: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub time: f32,
    pub amplitude: f32,
    pub wavenumber: f32,
    pub angular_frequency: f32,
}

/// Parameters, sources, region, and clock for one simulation.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    params: ArrayParameters,
    sources: SourceArray,
    region: ViewRegion,
    time: f64,
}

impl SimulationContext {
    /// Validates `params`, builds the source array, and starts the clock at 0.
    pub fn new(params: ArrayParameters, region: ViewRegion) -> Result<Self, WaveError> {
        let sources = SourceArray::build(&params)?;
        Ok(Self {
            params,
            sources,
            region,
            time: 0.0,
        })
    }

    /// Replaces the parameters and rebuilds the sources, resetting the clock.
    ///
    /// On error nothing changes.
    pub fn restart(&mut self, params: ArrayParameters) -> Result<(), WaveError> {
        let sources = SourceArray::build(&params)?;
        self.params = params;
        self.sources = sources;
        self.time = 0.0;
        Ok(())
    }

    /// Advances the clock by `seconds`. Negative or non-finite steps are ignored.
    pub fn advance(&mut self, seconds: f64) {
        if seconds.is_finite() && seconds > 0.0 {
            self.time += seconds;
        }
    }

    /// Sets the clock to an absolute time, for one-off renders.
    pub fn set_time(&mut self, seconds: f64) -> Result<(), WaveError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(WaveError::invalid_parameter(
                "time",
                format!("must be a non-negative finite number, got {seconds}"),
            ));
        }
        self.time = seconds;
        Ok(())
    }

    pub fn set_region(&mut self, region: ViewRegion) {
        self.region = region;
    }

    pub fn params(&self) -> &ArrayParameters {
        &self.params
    }

    pub fn sources(&self) -> &SourceArray {
        &self.sources
    }

    pub fn region(&self) -> &ViewRegion {
        &self.region
    }

    /// Simulation time in seconds since the last restart.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn constants(&self) -> WaveConstants {
        WaveConstants::from(&self.params)
    }

    /// Evaluator over the current sources in the given mode.
    pub fn evaluator(&self, mode: EvaluationMode) -> FieldEvaluator<'_> {
        FieldEvaluator::new(self.sources.as_slice(), self.constants(), mode)
    }

    /// Backend inputs for the current state.
    pub fn uniforms(&self) -> FrameUniforms {
        FrameUniforms {
            sources: self.sources.to_flat(),
            source_count: self.sources.len(),
            view_width: self.region.view_width() as f32,
            canvas_width: self.region.pixel_width() as f32,
            canvas_height: self.region.pixel_height() as f32,
            time: self.time as f32,
            amplitude: self.params.amplitude as f32,
            wavenumber: self.params.wavenumber as f32,
            angular_frequency: self.params.angular_frequency as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ArrayLayout;

    fn context() -> SimulationContext {
        SimulationContext::new(ArrayParameters::default(), ViewRegion::default()).unwrap()
    }

    #[test]
    fn new_builds_sources_and_starts_at_zero() {
        let ctx = context();
        assert_eq!(ctx.sources().len(), ArrayParameters::default().count);
        assert_eq!(ctx.time(), 0.0);
    }

    #[test]
    fn new_rejects_invalid_parameters() {
        let params = ArrayParameters {
            count: 0,
            ..ArrayParameters::default()
        };
        assert!(SimulationContext::new(params, ViewRegion::default()).is_err());
    }

    #[test]
    fn overflowing_geometry_is_a_configuration_error() {
        let params = ArrayParameters {
            count: 8,
            layout: ArrayLayout::Spacing { spacing: 1e308 },
            ..ArrayParameters::default()
        };
        assert!(matches!(
            SimulationContext::new(params, ViewRegion::default()),
            Err(WaveError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn advance_accumulates_and_ignores_bad_steps() {
        let mut ctx = context();
        ctx.advance(0.25);
        ctx.advance(0.5);
        ctx.advance(-1.0);
        ctx.advance(f64::NAN);
        assert!((ctx.time() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn restart_resets_time_and_rebuilds_sources() {
        let mut ctx = context();
        ctx.advance(3.0);
        let params = ArrayParameters {
            count: 3,
            layout: ArrayLayout::Spacing { spacing: 2.0 },
            ..ArrayParameters::default()
        };
        ctx.restart(params).unwrap();
        assert_eq!(ctx.time(), 0.0);
        assert_eq!(ctx.sources().len(), 3);
        assert_eq!(ctx.sources().as_slice()[0].y, -2.0);
    }

    #[test]
    fn failed_restart_keeps_previous_state() {
        let mut ctx = context();
        ctx.advance(1.0);
        let before = ctx.sources().clone();
        let bad = ArrayParameters {
            wavenumber: f64::INFINITY,
            ..ArrayParameters::default()
        };
        assert!(ctx.restart(bad).is_err());
        assert_eq!(ctx.sources(), &before);
        assert_eq!(ctx.time(), 1.0);
    }

    #[test]
    fn set_time_rejects_negative() {
        let mut ctx = context();
        assert!(ctx.set_time(-0.1).is_err());
        ctx.set_time(2.5).unwrap();
        assert_eq!(ctx.time(), 2.5);
    }

    #[test]
    fn uniforms_mirror_context() {
        let mut ctx = context();
        ctx.advance(0.5);
        let u = ctx.uniforms();
        assert_eq!(u.source_count, ctx.sources().len());
        assert_eq!(u.sources.len(), 3 * u.source_count);
        assert_eq!(u.canvas_width, 640.0);
        assert_eq!(u.canvas_height, 360.0);
        assert_eq!(u.view_width, 40.0);
        assert_eq!(u.time, 0.5);
    }
}
