//! Scene resolution from command-line flags or a scene file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use wavefront_core::params::ControlValues;
use wavefront_core::region::{DEFAULT_PIXEL_HEIGHT, DEFAULT_PIXEL_WIDTH, DEFAULT_VIEW_WIDTH};
use wavefront_core::Scene;

use crate::error::CliError;

/// Flags shared by every command that renders a scene.
#[derive(Args, Debug, Clone)]
pub struct SceneArgs {
    /// Scene JSON file; replaces the size, time, and params flags below.
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Canvas width in pixels.
    #[arg(short = 'W', long, default_value_t = DEFAULT_PIXEL_WIDTH)]
    pub width: usize,

    /// Canvas height in pixels.
    #[arg(short = 'H', long, default_value_t = DEFAULT_PIXEL_HEIGHT)]
    pub height: usize,

    /// Visible width of the plane in meters.
    #[arg(long, default_value_t = DEFAULT_VIEW_WIDTH)]
    pub view_width: f64,

    /// Simulation time in seconds.
    #[arg(short, long, default_value_t = 0.0)]
    pub time: f64,

    /// Array parameters as a JSON string.
    #[arg(long, default_value = "{}")]
    pub params: String,

    /// Read the params as slider values (intensity, log_frequency, log_wavelength, ...).
    #[arg(long)]
    pub controls: bool,
}

impl SceneArgs {
    /// Builds and validates the scene.
    ///
    /// `view` overrides the view named in a scene file; without a file it
    /// defaults to `"wave"`.
    pub fn resolve(&self, view: Option<&str>) -> Result<Scene, CliError> {
        let mut scene = match &self.scene {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|e| {
                    CliError::Io(format!("cannot read scene {}: {e}", path.display()))
                })?;
                let mut scene: Scene = serde_json::from_str(&text).map_err(|e| {
                    CliError::Input(format!("invalid scene file {}: {e}", path.display()))
                })?;
                if let Some(view) = view {
                    scene.view = view.to_string();
                }
                scene
            }
            None => Scene {
                view: view.unwrap_or("wave").to_string(),
                width: self.width,
                height: self.height,
                view_width: self.view_width,
                time: self.time,
                params: serde_json::from_str(&self.params)
                    .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?,
            },
        };

        if self.controls {
            scene.params = ControlValues::from_json(&scene.params)
                .to_parameters()?
                .to_json();
        }
        scene.validate()?;
        tracing::debug!(view = %scene.view, width = scene.width, height = scene.height, "scene resolved");
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args() -> SceneArgs {
        SceneArgs {
            scene: None,
            width: 64,
            height: 32,
            view_width: 20.0,
            time: 1.5,
            params: "{}".into(),
            controls: false,
        }
    }

    #[test]
    fn flags_build_a_scene() {
        let scene = args().resolve(Some("gain")).unwrap();
        assert_eq!(scene.view, "gain");
        assert_eq!((scene.width, scene.height), (64, 32));
        assert_eq!(scene.view_width, 20.0);
        assert_eq!(scene.time, 1.5);
    }

    #[test]
    fn view_defaults_to_wave() {
        assert_eq!(args().resolve(None).unwrap().view, "wave");
    }

    #[test]
    fn malformed_params_are_input_errors() {
        let mut a = args();
        a.params = "{count:".into();
        assert_eq!(a.resolve(None).unwrap_err().exit_code(), 12);
    }

    #[test]
    fn invalid_params_are_simulation_errors() {
        let mut a = args();
        a.params = r#"{"count": 0}"#.into();
        assert_eq!(a.resolve(None).unwrap_err().exit_code(), 10);
    }

    #[test]
    fn controls_are_converted_to_physical_parameters() {
        let mut a = args();
        a.params = r#"{"count": 4, "intensity": 2.0, "log_wavelength": 0.0}"#.into();
        a.controls = true;
        let scene = a.resolve(None).unwrap();
        let p = scene.array_parameters();
        assert_eq!(p.count, 4);
        assert!((p.amplitude - 0.5).abs() < 1e-12);
        assert!((p.wavelength() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn scene_file_replaces_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        let file_scene = json!({
            "view": "gain", "width": 10, "height": 6, "view_width": 5.0,
            "params": {"count": 3}
        });
        fs::write(&path, file_scene.to_string()).unwrap();

        let mut a = args();
        a.scene = Some(path);
        let scene = a.resolve(None).unwrap();
        assert_eq!(scene.view, "gain");
        assert_eq!((scene.width, scene.height), (10, 6));
        assert_eq!(scene.time, 0.0);
        assert_eq!(scene.array_parameters().count, 3);

        assert_eq!(a.resolve(Some("wave")).unwrap().view, "wave");
    }

    #[test]
    fn missing_scene_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args();
        a.scene = Some(dir.path().join("nope.json"));
        assert_eq!(a.resolve(None).unwrap_err().exit_code(), 11);
    }

    #[test]
    fn garbled_scene_file_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        fs::write(&path, "not json").unwrap();
        let mut a = args();
        a.scene = Some(path);
        assert_eq!(a.resolve(None).unwrap_err().exit_code(), 12);
    }
}
