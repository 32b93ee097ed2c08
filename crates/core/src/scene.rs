//! Reproducible description of a single render.
//!
//! A [`Scene`] captures everything needed to recreate an image: view name,
//! canvas dimensions, visible width, simulation time, and array parameters.

use serde::{Deserialize, Serialize};

use crate::error::WaveError;
use crate::params::ArrayParameters;
use crate::region::{ViewRegion, DEFAULT_PIXEL_HEIGHT, DEFAULT_PIXEL_WIDTH, DEFAULT_VIEW_WIDTH};

/// Reproducible render request.
///
/// Two identical `Scene` values rendered by the same binary produce
/// identical pixels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    pub view: String,
    pub width: usize,
    pub height: usize,
    #[serde(default = "default_view_width")]
    pub view_width: f64,
    #[serde(default)]
    pub time: f64,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
}

fn default_view_width() -> f64 {
    DEFAULT_VIEW_WIDTH
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Scene {
    /// Creates a scene with the default canvas, view width, time 0, and empty params.
    pub fn new(view: &str) -> Self {
        Self {
            view: view.to_string(),
            width: DEFAULT_PIXEL_WIDTH,
            height: DEFAULT_PIXEL_HEIGHT,
            view_width: DEFAULT_VIEW_WIDTH,
            time: 0.0,
            params: empty_params(),
        }
    }

    /// The pixel-to-meter mapping for this scene.
    pub fn region(&self) -> Result<ViewRegion, WaveError> {
        ViewRegion::new(self.width, self.height, self.view_width)
    }

    /// Array parameters parsed from `params`, with defaults for missing keys.
    pub fn array_parameters(&self) -> ArrayParameters {
        ArrayParameters::from_json(&self.params)
    }

    /// Checks dimensions, view width, time, and parameters.
    pub fn validate(&self) -> Result<(), WaveError> {
        self.region()?;
        if !self.time.is_finite() || self.time < 0.0 {
            return Err(WaveError::invalid_parameter(
                "time",
                format!("must be a non-negative finite number, got {}", self.time),
            ));
        }
        self.array_parameters().validate()
    }
}
