//! Point emitters and the array geometry that lays them out.
//!
//! A [`SourceArray`] is always rebuilt wholesale from [`ArrayParameters`];
//! individual sources are never mutated after construction.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::WaveError;
use crate::evaluator::SINGULARITY_RADIUS;
use crate::params::ArrayParameters;

/// An idealized isotropic point emitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Horizontal position in meters.
    pub x: f64,
    /// Vertical position in meters.
    pub y: f64,
    /// Phase offset in radians, accumulated from array steering.
    pub phase: f64,
}

impl Source {
    pub fn new(x: f64, y: f64, phase: f64) -> Self {
        Self { x, y, phase }
    }

    /// Position as a vector.
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

/// How the emitters of an array are placed.
///
/// `Spacing` and `HalfWidth` generate a uniform linear array on the line
/// `x = origin_x`, centered on `y = 0`. `Fixed` takes an explicit list and
/// uses it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArrayLayout {
    /// Uniform spacing between adjacent emitters, in meters.
    Spacing { spacing: f64 },
    /// Array spans `[-half_width, half_width]`; spacing is derived from the count.
    HalfWidth { half_width: f64 },
    /// Explicit emitter positions and phases.
    Fixed { sources: Vec<Source> },
}

impl ArrayLayout {
    /// Spacing between adjacent emitters for a generated array of `count` sources.
    ///
    /// Returns `None` for fixed layouts and for half-width layouts with a single
    /// source, where spacing is undefined.
    pub fn spacing(&self, count: usize) -> Option<f64> {
        match self {
            ArrayLayout::Spacing { spacing } => Some(*spacing),
            ArrayLayout::HalfWidth { half_width } if count > 1 => {
                Some(2.0 * half_width / (count - 1) as f64)
            }
            ArrayLayout::HalfWidth { .. } | ArrayLayout::Fixed { .. } => None,
        }
    }
}

/// Uniform linear array along `x = origin_x`.
fn generate(params: &ArrayParameters) -> Result<Vec<Source>, WaveError> {
    let name = layout_parameter(&params.layout);
    let count = params.count;
    let d = params.layout.spacing(count).unwrap_or(0.0);
    let phase_step = params.wavenumber * d * params.steering_angle.sin();
    let y_start = -((count - 1) as f64) * d / 2.0;
    if !d.is_finite() || !phase_step.is_finite() || !y_start.is_finite() {
        return Err(WaveError::invalid_parameter(
            name,
            format!("array of {count} overflows with spacing {d}"),
        ));
    }

    let mut sources = Vec::with_capacity(count);
    let mut phase: f64 = 0.0;
    for i in 0..count {
        let y = y_start + i as f64 * d;
        if !y.is_finite() || !phase.is_finite() {
            return Err(WaveError::invalid_parameter(
                name,
                format!("source {i} of {count} overflows with spacing {d}"),
            ));
        }
        sources.push(Source::new(params.origin_x, y, phase));
        phase += phase_step;
    }

    tracing::debug!(count, spacing = d, phase_step, "built source array");
    Ok(sources)
}

/// Parameter name blamed when a layout's geometry overflows.
fn layout_parameter(layout: &ArrayLayout) -> &'static str {
    match layout {
        ArrayLayout::Spacing { .. } => "spacing",
        ArrayLayout::HalfWidth { .. } => "half_width",
        ArrayLayout::Fixed { .. } => "sources",
    }
}

/// Ordered, immutable collection of emitters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceArray {
    sources: Vec<Source>,
}

impl SourceArray {
    /// Builds the array described by `params`.
    ///
    /// Parameters are validated first. Generated layouts place source `i` at
    /// `y_i = y_start + i * d` and accumulate phase by `k * d * sin(angle)`
    /// per step, starting from 0. A single source sits at `(origin_x, 0)`
    /// with phase 0.
    ///
    /// Finite inputs can still describe an array whose positions, phases, or
    /// near-source amplitude overflow. Those are rejected here as
    /// `WaveError::InvalidParameter` instead of surfacing later as
    /// non-finite samples.
    pub fn build(params: &ArrayParameters) -> Result<Self, WaveError> {
        params.validate()?;

        if !(params.amplitude / SINGULARITY_RADIUS).is_finite() {
            return Err(WaveError::invalid_parameter(
                "amplitude",
                format!("{} overflows next to a source", params.amplitude),
            ));
        }

        let sources = match &params.layout {
            ArrayLayout::Fixed { sources } => sources.clone(),
            ArrayLayout::Spacing { .. } | ArrayLayout::HalfWidth { .. } => generate(params)?,
        };

        let name = layout_parameter(&params.layout);
        for s in &sources {
            if !(params.wavenumber * s.x.hypot(s.y)).is_finite() {
                return Err(WaveError::invalid_parameter(
                    name,
                    format!(
                        "source at ({}, {}) is too far out for k = {}",
                        s.x, s.y, params.wavenumber
                    ),
                ));
            }
        }

        Ok(Self { sources })
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn as_slice(&self) -> &[Source] {
        &self.sources
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> + '_ {
        self.sources.iter()
    }

    /// Flattens the array into `[x0, y0, phase0, x1, ...]` for uniform upload.
    pub fn to_flat(&self) -> Vec<f32> {
        self.sources
            .iter()
            .flat_map(|s| [s.x as f32, s.y as f32, s.phase as f32])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_6, PI, TAU};

    fn params(count: usize, layout: ArrayLayout, angle: f64) -> ArrayParameters {
        ArrayParameters {
            count,
            layout,
            origin_x: 1.5,
            steering_angle: angle,
            amplitude: 1.0,
            angular_frequency: TAU,
            wavenumber: TAU,
        }
    }

    #[test]
    fn spacing_layout_is_centered_on_zero() {
        let array = SourceArray::build(&params(5, ArrayLayout::Spacing { spacing: 1.0 }, 0.0))
            .unwrap();
        let ys: Vec<f64> = array.iter().map(|s| s.y).collect();
        assert_eq!(ys, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert!(array.iter().all(|s| s.x == 1.5));
    }

    #[test]
    fn half_width_layout_spans_both_edges() {
        let array =
            SourceArray::build(&params(3, ArrayLayout::HalfWidth { half_width: 2.0 }, 0.0))
                .unwrap();
        let ys: Vec<f64> = array.iter().map(|s| s.y).collect();
        assert_eq!(ys, vec![-2.0, 0.0, 2.0]);
    }

    #[test]
    fn single_source_half_width_does_not_divide_by_zero() {
        let array =
            SourceArray::build(&params(1, ArrayLayout::HalfWidth { half_width: 3.0 }, 0.7))
                .unwrap();
        assert_eq!(array.len(), 1);
        let s = array.as_slice()[0];
        assert_eq!((s.x, s.y, s.phase), (1.5, 0.0, 0.0));
    }

    #[test]
    fn single_source_spacing_sits_at_center() {
        let array = SourceArray::build(&params(1, ArrayLayout::Spacing { spacing: 4.0 }, 1.0))
            .unwrap();
        assert_eq!(array.as_slice(), &[Source::new(1.5, 0.0, 0.0)]);
    }

    #[test]
    fn unsteered_array_has_zero_phases() {
        let array = SourceArray::build(&params(4, ArrayLayout::Spacing { spacing: 0.5 }, 0.0))
            .unwrap();
        assert!(array.iter().all(|s| s.phase == 0.0));
    }

    #[test]
    fn first_phase_is_zero_when_steered() {
        let array =
            SourceArray::build(&params(6, ArrayLayout::Spacing { spacing: 0.3 }, FRAC_PI_6))
                .unwrap();
        assert_eq!(array.as_slice()[0].phase, 0.0);
        assert!(array.as_slice()[1].phase > 0.0);
    }

    #[test]
    fn fixed_layout_is_used_verbatim() {
        let fixed = vec![Source::new(0.0, -2.0, 0.0), Source::new(3.0, 1.0, PI)];
        let mut p = params(2, ArrayLayout::Fixed { sources: fixed.clone() }, 0.0);
        p.origin_x = 99.0;
        let array = SourceArray::build(&p).unwrap();
        assert_eq!(array.as_slice(), fixed.as_slice());
    }

    #[test]
    fn invalid_count_is_rejected() {
        let result = SourceArray::build(&params(0, ArrayLayout::Spacing { spacing: 1.0 }, 0.0));
        assert!(matches!(result, Err(WaveError::InvalidParameter { .. })));
    }

    fn rejected_parameter(result: Result<SourceArray, WaveError>) -> String {
        match result {
            Err(WaveError::InvalidParameter { name, .. }) => name,
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn overflowing_spacing_is_rejected() {
        let result = SourceArray::build(&params(8, ArrayLayout::Spacing { spacing: 1e308 }, 0.0));
        assert_eq!(rejected_parameter(result), "spacing");
    }

    #[test]
    fn overflowing_half_width_is_rejected() {
        let result =
            SourceArray::build(&params(3, ArrayLayout::HalfWidth { half_width: 1.5e308 }, 0.0));
        assert_eq!(rejected_parameter(result), "half_width");
    }

    #[test]
    fn overflowing_steering_phase_is_rejected() {
        let mut p = params(4, ArrayLayout::Spacing { spacing: 1e300 }, FRAC_PI_6);
        p.wavenumber = 1e10;
        assert_eq!(rejected_parameter(SourceArray::build(&p)), "spacing");
    }

    #[test]
    fn amplitude_that_overflows_near_a_source_is_rejected() {
        let mut p = params(2, ArrayLayout::Spacing { spacing: 1.0 }, 0.0);
        p.amplitude = 1e300;
        assert_eq!(rejected_parameter(SourceArray::build(&p)), "amplitude");
    }

    #[test]
    fn fixed_source_out_of_reach_is_rejected() {
        let fixed = vec![Source::new(1e308, 0.0, 0.0)];
        let result = SourceArray::build(&params(1, ArrayLayout::Fixed { sources: fixed }, 0.0));
        assert_eq!(rejected_parameter(result), "sources");
    }

    #[test]
    fn layout_spacing_reports_derived_interval() {
        let layout = ArrayLayout::HalfWidth { half_width: 1.0 };
        assert_eq!(layout.spacing(5), Some(0.5));
        assert_eq!(layout.spacing(1), None);
        assert_eq!(ArrayLayout::Spacing { spacing: 0.2 }.spacing(1), Some(0.2));
    }

    #[test]
    fn to_flat_interleaves_position_and_phase() {
        let fixed = vec![Source::new(1.0, 2.0, 3.0), Source::new(4.0, 5.0, 6.0)];
        let array = SourceArray::build(&params(2, ArrayLayout::Fixed { sources: fixed }, 0.0))
            .unwrap();
        assert_eq!(array.to_flat(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn layout_serializes_with_kind_tag() {
        let json = serde_json::to_value(ArrayLayout::HalfWidth { half_width: 2.5 }).unwrap();
        assert_eq!(json["kind"], "half_width");
        assert_eq!(json["half_width"], 2.5);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn adjacent_phase_difference_matches_steering_gradient(
                count in 2_usize..=64,
                spacing in 0.01_f64..5.0,
                angle in -1.5_f64..1.5,
                wavelength in 0.05_f64..10.0,
            ) {
                let mut p = params(count, ArrayLayout::Spacing { spacing }, angle);
                p.wavenumber = TAU / wavelength;
                let array = SourceArray::build(&p).unwrap();
                let expected = p.wavenumber * spacing * angle.sin();
                let sources = array.as_slice();
                prop_assert_eq!(sources.len(), count);
                for pair in sources.windows(2) {
                    let diff = pair[1].phase - pair[0].phase;
                    prop_assert!(
                        (diff - expected).abs() <= 1e-9 * (1.0 + pair[1].phase.abs()),
                        "phase step {} != {}", diff, expected
                    );
                    prop_assert!(((pair[1].y - pair[0].y) - spacing).abs() < 1e-9);
                }
            }

            #[test]
            fn generated_array_is_symmetric_about_zero(
                count in 1_usize..=40,
                half_width in 0.0_f64..20.0,
            ) {
                let array = SourceArray::build(
                    &params(count, ArrayLayout::HalfWidth { half_width }, 0.0),
                ).unwrap();
                let first = array.as_slice()[0].y;
                let last = array.as_slice()[count - 1].y;
                prop_assert!((first + last).abs() < 1e-9, "first {} last {}", first, last);
            }
        }
    }
}
