//! Simulation parameters and the JSON helpers used to read them.
//!
//! [`ArrayParameters`] is the validated physical description of the array and
//! the medium. [`ControlValues`] mirrors the interactive controls, where
//! frequency and wavelength arrive in log space and the overall intensity is
//! shared between sources.
//!
//! The `param_*` helpers take a JSON value, a key name, and a default. If the
//! key is missing or the value is not the expected type, the default is
//! returned. They never fail.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::WaveError;
use crate::source::{ArrayLayout, Source};

/// Default number of emitters.
pub const DEFAULT_COUNT: usize = 8;
/// Default distance between adjacent emitters, in meters.
pub const DEFAULT_SPACING: f64 = 0.5;
/// Default horizontal position of the array, in meters.
pub const DEFAULT_ORIGIN_X: f64 = 2.0;
/// Default per-source amplitude.
pub const DEFAULT_AMPLITUDE: f64 = 1.0;
/// Default frequency in Hz (`omega = 2π`).
pub const DEFAULT_FREQUENCY: f64 = 1.0;
/// Default wavelength in meters (`k = 2π`).
pub const DEFAULT_WAVELENGTH: f64 = 1.0;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// Accepts both JSON numbers (including integers) and converts them to f64.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `usize` from `params[name]`, returning `default` if missing or wrong type.
///
/// Only succeeds if the JSON value is a non-negative integer that fits in `u64`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

/// Physical description of a source array and its medium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayParameters {
    /// Number of emitters, at least 1.
    pub count: usize,
    /// Placement strategy.
    pub layout: ArrayLayout,
    /// Horizontal position of the array line, in meters.
    pub origin_x: f64,
    /// Beam steering angle in radians.
    pub steering_angle: f64,
    /// Amplitude contributed by each source at unit distance.
    pub amplitude: f64,
    /// Angular frequency ω in rad/s.
    pub angular_frequency: f64,
    /// Wavenumber k in rad/m.
    pub wavenumber: f64,
}

impl Default for ArrayParameters {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            layout: ArrayLayout::Spacing {
                spacing: DEFAULT_SPACING,
            },
            origin_x: DEFAULT_ORIGIN_X,
            steering_angle: 0.0,
            amplitude: DEFAULT_AMPLITUDE,
            angular_frequency: TAU * DEFAULT_FREQUENCY,
            wavenumber: TAU / DEFAULT_WAVELENGTH,
        }
    }
}

impl ArrayParameters {
    /// Parameters for an explicit list of emitters.
    pub fn fixed(
        sources: Vec<Source>,
        amplitude: f64,
        angular_frequency: f64,
        wavenumber: f64,
    ) -> Self {
        Self {
            count: sources.len(),
            layout: ArrayLayout::Fixed { sources },
            origin_x: 0.0,
            steering_angle: 0.0,
            amplitude,
            angular_frequency,
            wavenumber,
        }
    }

    /// Extracts parameters from a JSON object, falling back to defaults.
    ///
    /// Recognized keys: `count`, `spacing`, `half_width` (selects the
    /// half-width layout when present), `sources` (a list of `{x, y, phase}`
    /// selecting the fixed layout, whose length overrides `count`),
    /// `origin_x`, `angle`, `amplitude`, `frequency` (Hz), and `wavelength` (m).
    pub fn from_json(params: &Value) -> Self {
        let fixed = params
            .get("sources")
            .and_then(|v| serde_json::from_value::<Vec<Source>>(v.clone()).ok());
        let layout = if let Some(sources) = fixed {
            ArrayLayout::Fixed { sources }
        } else if params.get("half_width").is_some() {
            ArrayLayout::HalfWidth {
                half_width: param_f64(params, "half_width", 0.0),
            }
        } else {
            ArrayLayout::Spacing {
                spacing: param_f64(params, "spacing", DEFAULT_SPACING),
            }
        };
        let count = match &layout {
            ArrayLayout::Fixed { sources } => sources.len(),
            _ => param_usize(params, "count", DEFAULT_COUNT),
        };
        Self {
            count,
            layout,
            origin_x: param_f64(params, "origin_x", DEFAULT_ORIGIN_X),
            steering_angle: param_f64(params, "angle", 0.0),
            amplitude: param_f64(params, "amplitude", DEFAULT_AMPLITUDE),
            angular_frequency: TAU * param_f64(params, "frequency", DEFAULT_FREQUENCY),
            wavenumber: TAU / param_f64(params, "wavelength", DEFAULT_WAVELENGTH),
        }
    }

    /// Wavelength `2π / k` in meters.
    pub fn wavelength(&self) -> f64 {
        TAU / self.wavenumber
    }

    /// Frequency `ω / 2π` in Hz.
    pub fn frequency(&self) -> f64 {
        self.angular_frequency / TAU
    }

    /// Phase speed `ω / k` in m/s.
    pub fn wave_speed(&self) -> f64 {
        self.angular_frequency / self.wavenumber
    }

    /// Rejects parameter sets that would make source construction or
    /// evaluation undefined.
    pub fn validate(&self) -> Result<(), WaveError> {
        if self.count < 1 {
            return Err(WaveError::invalid_parameter("count", "must be at least 1"));
        }
        require_finite("origin_x", self.origin_x)?;
        require_finite("angle", self.steering_angle)?;
        require_finite("amplitude", self.amplitude)?;
        require_finite("angular_frequency", self.angular_frequency)?;
        if self.angular_frequency < 0.0 {
            return Err(WaveError::invalid_parameter(
                "angular_frequency",
                "must not be negative",
            ));
        }
        require_finite("wavenumber", self.wavenumber)?;
        if self.wavenumber <= 0.0 {
            return Err(WaveError::invalid_parameter("wavenumber", "must be positive"));
        }
        match &self.layout {
            ArrayLayout::Spacing { spacing } => require_finite("spacing", *spacing),
            ArrayLayout::HalfWidth { half_width } => require_finite("half_width", *half_width),
            ArrayLayout::Fixed { sources } => {
                if sources.len() != self.count {
                    return Err(WaveError::invalid_parameter(
                        "count",
                        format!(
                            "fixed layout lists {} sources but count is {}",
                            sources.len(),
                            self.count
                        ),
                    ));
                }
                sources.iter().try_for_each(|s| {
                    require_finite("source.x", s.x)?;
                    require_finite("source.y", s.y)?;
                    require_finite("source.phase", s.phase)
                })
            }
        }
    }

    /// Current values as a JSON object, using the same keys as [`Self::from_json`].
    pub fn to_json(&self) -> Value {
        let mut value = json!({
            "count": self.count,
            "origin_x": self.origin_x,
            "angle": self.steering_angle,
            "amplitude": self.amplitude,
            "frequency": self.frequency(),
            "wavelength": self.wavelength(),
        });
        match &self.layout {
            ArrayLayout::Spacing { spacing } => value["spacing"] = json!(spacing),
            ArrayLayout::HalfWidth { half_width } => value["half_width"] = json!(half_width),
            ArrayLayout::Fixed { sources } => value["sources"] = json!(sources),
        }
        value
    }

    /// Schema describing every JSON parameter: type, range, default, description.
    pub fn param_schema() -> Value {
        json!({
            "count": {
                "type": "integer",
                "default": DEFAULT_COUNT,
                "min": 1,
                "max": 64,
                "description": "Number of emitters in the array"
            },
            "spacing": {
                "type": "number",
                "default": DEFAULT_SPACING,
                "min": 0.0,
                "max": 5.0,
                "description": "Distance between adjacent emitters in meters"
            },
            "half_width": {
                "type": "number",
                "default": null,
                "min": 0.0,
                "max": 20.0,
                "description": "Half of the array length in meters; overrides spacing when set"
            },
            "origin_x": {
                "type": "number",
                "default": DEFAULT_ORIGIN_X,
                "min": 0.0,
                "max": 40.0,
                "description": "Horizontal position of the array in meters"
            },
            "angle": {
                "type": "number",
                "default": 0.0,
                "min": -1.5708,
                "max": 1.5708,
                "description": "Beam steering angle in radians"
            },
            "amplitude": {
                "type": "number",
                "default": DEFAULT_AMPLITUDE,
                "min": 0.0,
                "max": 10.0,
                "description": "Amplitude of each emitter at unit distance"
            },
            "frequency": {
                "type": "number",
                "default": DEFAULT_FREQUENCY,
                "min": 0.01,
                "max": 100.0,
                "description": "Emitter frequency in Hz"
            },
            "wavelength": {
                "type": "number",
                "default": DEFAULT_WAVELENGTH,
                "min": 0.01,
                "max": 100.0,
                "description": "Wavelength in meters"
            },
            "sources": {
                "type": "array",
                "default": null,
                "description": "Explicit emitters as {x, y, phase}; replaces the uniform layout"
            }
        })
    }
}

/// Raw values of the interactive controls.
///
/// Frequency and wavelength are exponentiated before use, and the overall
/// intensity is divided evenly between emitters so that the combined level
/// stays comparable as the count changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlValues {
    pub count: usize,
    pub spacing: f64,
    pub origin_x: f64,
    pub angle: f64,
    pub intensity: f64,
    pub log_frequency: f64,
    pub log_wavelength: f64,
}

impl Default for ControlValues {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            spacing: DEFAULT_SPACING,
            origin_x: DEFAULT_ORIGIN_X,
            angle: 0.0,
            intensity: DEFAULT_AMPLITUDE,
            log_frequency: DEFAULT_FREQUENCY.ln(),
            log_wavelength: DEFAULT_WAVELENGTH.ln(),
        }
    }
}

impl ControlValues {
    /// Extracts control values from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            count: param_usize(params, "count", d.count),
            spacing: param_f64(params, "spacing", d.spacing),
            origin_x: param_f64(params, "origin_x", d.origin_x),
            angle: param_f64(params, "angle", d.angle),
            intensity: param_f64(params, "intensity", d.intensity),
            log_frequency: param_f64(params, "log_frequency", d.log_frequency),
            log_wavelength: param_f64(params, "log_wavelength", d.log_wavelength),
        }
    }

    /// Converts the controls into validated physical parameters.
    pub fn to_parameters(&self) -> Result<ArrayParameters, WaveError> {
        if self.count < 1 {
            return Err(WaveError::invalid_parameter("count", "must be at least 1"));
        }
        let frequency = self.log_frequency.exp();
        let wavelength = self.log_wavelength.exp();
        require_positive("frequency", frequency)?;
        require_positive("wavelength", wavelength)?;
        let params = ArrayParameters {
            count: self.count,
            layout: ArrayLayout::Spacing {
                spacing: self.spacing,
            },
            origin_x: self.origin_x,
            steering_angle: self.angle,
            amplitude: self.intensity / self.count as f64,
            angular_frequency: TAU * frequency,
            wavenumber: TAU / wavelength,
        };
        params.validate()?;
        Ok(params)
    }
}

fn require_finite(name: &str, value: f64) -> Result<(), WaveError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(WaveError::invalid_parameter(
            name,
            format!("must be finite, got {value}"),
        ))
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), WaveError> {
    require_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(WaveError::invalid_parameter(
            name,
            format!("must be positive, got {value}"),
        ))
    }
}
