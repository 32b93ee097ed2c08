//! Superposition of point-source waves at a single point.
//!
//! [`FieldEvaluator`] is one evaluator for both views, parameterized by
//! [`EvaluationMode`]:
//!
//! - `Instantaneous`: `Σ a/d · cos(ωt − kd + φ)`, with each term gated out
//!   while its phase is still negative (the wavefront has not arrived).
//! - `SteadyState`: `|Σ a/d · e^{i(−kd + φ)}|`, the envelope the
//!   instantaneous field oscillates within once every wavefront has arrived.
//!
//! Amplitude falls off as exactly `1/d`. Terms whose distance is below
//! [`SINGULARITY_RADIUS`] are skipped, so evaluation at a source position
//! sums the remaining sources and stays finite.

use glam::DVec2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::params::ArrayParameters;
use crate::source::Source;

/// Distances at or below this many meters are treated as coincident with the source.
pub const SINGULARITY_RADIUS: f64 = 1e-9;

/// Which quantity the evaluator computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Signed amplitude at time `t`, causality gated.
    Instantaneous,
    /// Non-negative magnitude of the phasor sum, time independent.
    SteadyState,
}

/// Global physical constants shared by every source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveConstants {
    /// Per-source amplitude `a`.
    pub amplitude: f64,
    /// Wavenumber `k` in rad/m.
    pub wavenumber: f64,
    /// Angular frequency `ω` in rad/s.
    pub angular_frequency: f64,
}

impl From<&ArrayParameters> for WaveConstants {
    fn from(params: &ArrayParameters) -> Self {
        Self {
            amplitude: params.amplitude,
            wavenumber: params.wavenumber,
            angular_frequency: params.angular_frequency,
        }
    }
}

/// Per-point wave superposition over a borrowed source list.
///
/// Evaluation is pure: the same point, time, and sources always give the
/// same value, so pixels can be evaluated in any order or in parallel.
#[derive(Debug, Clone, Copy)]
pub struct FieldEvaluator<'a> {
    sources: &'a [Source],
    constants: WaveConstants,
    mode: EvaluationMode,
}

impl<'a> FieldEvaluator<'a> {
    pub fn new(sources: &'a [Source], constants: WaveConstants, mode: EvaluationMode) -> Self {
        Self {
            sources,
            constants,
            mode,
        }
    }

    /// Instantaneous amplitude `Σ a/d · cos(ωt − kd + φ)` over arrived wavefronts.
    pub fn instantaneous(&self, point: DVec2, t: f64) -> f64 {
        let WaveConstants {
            amplitude: a,
            wavenumber: k,
            angular_frequency: omega,
        } = self.constants;

        self.sources
            .iter()
            .filter_map(|s| {
                let d = point.distance(s.position());
                if d <= SINGULARITY_RADIUS {
                    return None;
                }
                let phase = omega * t - k * d + s.phase;
                // wavefront has not reached this point yet
                if phase < 0.0 {
                    return None;
                }
                Some(a / d * phase.cos())
            })
            .sum()
    }

    /// Complex phasor sum `Σ a/d · e^{i(−kd + φ)}`, without the causality gate.
    pub fn phasor(&self, point: DVec2) -> Complex64 {
        let a = self.constants.amplitude;
        let k = self.constants.wavenumber;

        self.sources
            .iter()
            .filter_map(|s| {
                let d = point.distance(s.position());
                if d <= SINGULARITY_RADIUS {
                    return None;
                }
                Some(Complex64::from_polar(a / d, -k * d + s.phase))
            })
            .sum()
    }

    /// Steady-state magnitude `|Σ|`.
    pub fn steady_state(&self, point: DVec2) -> f64 {
        self.phasor(point).norm()
    }

    /// Evaluates according to the configured mode.
    pub fn evaluate(&self, point: DVec2, t: f64) -> f64 {
        match self.mode {
            EvaluationMode::Instantaneous => self.instantaneous(point, t),
            EvaluationMode::SteadyState => self.steady_state(point),
        }
    }
}
