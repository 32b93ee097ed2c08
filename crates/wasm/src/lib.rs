#![deny(unsafe_code)]
//! Browser bindings for the wavefront renderer.
//!
//! `WavefrontApp` owns the animation driver. The page feeds it slider values
//! as JSON, runs the frame loop through `pending_frame`/`on_frame`, and
//! either blits the CPU pixel buffers or attaches WebGL2 canvases so the
//! same frames are drawn on the GPU.

mod gpu;
mod host;

use wasm_bindgen::prelude::*;
use wavefront_core::color::ColorMapper;
use wavefront_core::params::{ArrayParameters, ControlValues};
use wavefront_core::region::ViewRegion;
use wavefront_core::render::{check_source_count, ProgramKind};
use wavefront_core::{View, WaveError};
use wavefront_views::pixel::field_to_rgba;
use wavefront_views::{AnimationDriver, FrameHandle, FrameOutcome};

use gpu::GpuCanvas;
use host::HostScheduler;

/// Parses slider values into validated array parameters.
fn parse_controls(json: &str) -> Result<ArrayParameters, WaveError> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| WaveError::invalid_parameter("controls", e.to_string()))?;
    ControlValues::from_json(&value).to_parameters()
}

/// The live wavefront view and gain map behind one page.
#[wasm_bindgen]
pub struct WavefrontApp {
    driver: AnimationDriver<HostScheduler>,
    wave_canvas: Option<GpuCanvas>,
    gain_canvas: Option<GpuCanvas>,
}

#[wasm_bindgen]
impl WavefrontApp {
    /// Creates the app for a `width` x `height` canvas showing `view_width` meters.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: u32,
        height: u32,
        view_width: f64,
        controls: &str,
    ) -> Result<WavefrontApp, JsError> {
        let region = ViewRegion::new(width as usize, height as usize, view_width)?;
        let driver = AnimationDriver::new(
            parse_controls(controls)?,
            region,
            ColorMapper::gain_decibel(),
            HostScheduler::default(),
        )?;
        Ok(Self {
            driver,
            wave_canvas: None,
            gain_canvas: None,
        })
    }

    /// Applies new slider values; the animation restarts from `t = 0`.
    pub fn restart(&mut self, controls: &str) -> Result<(), JsError> {
        let params = parse_controls(controls)?;
        if self.wave_canvas.is_some() || self.gain_canvas.is_some() {
            check_source_count(params.count)?;
        }
        self.driver.restart(params)?;
        self.draw_gain()?;
        Ok(())
    }

    /// Follows a canvas resize or a change of the visible width.
    pub fn resize(&mut self, width: u32, height: u32, view_width: f64) -> Result<(), JsError> {
        let region = ViewRegion::new(width as usize, height as usize, view_width)?;
        self.driver.resize(region)?;
        self.draw_gain()?;
        Ok(())
    }

    pub fn start(&mut self) {
        self.driver.start();
    }

    pub fn stop(&mut self) {
        self.driver.stop();
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    /// Id of the frame the page should request, or `undefined` when stopped.
    pub fn pending_frame(&self) -> Option<f64> {
        self.driver
            .scheduler()
            .pending()
            .map(|handle| handle.id() as f64)
    }

    /// Animation frame callback. Returns whether a new frame was produced.
    pub fn on_frame(&mut self, frame: f64, now_ms: f64) -> bool {
        let outcome = self.driver.on_frame(FrameHandle::new(frame as u64), now_ms);
        if outcome != FrameOutcome::Rendered {
            return false;
        }
        if let Some(canvas) = &self.wave_canvas {
            if let Err(err) = canvas.draw(&self.driver.context().uniforms()) {
                tracing::warn!(error = %err, "GPU wave frame dropped");
                return false;
            }
        }
        true
    }

    /// Simulation time in seconds.
    pub fn time(&self) -> f64 {
        self.driver.time()
    }

    /// RGBA8 pixels of the latest CPU wave frame; not refreshed while a
    /// wave canvas is attached.
    pub fn wave_pixels(&self) -> Vec<u8> {
        let wave = self.driver.wave();
        field_to_rgba(wave.field(), &wave.mapper())
    }

    /// RGBA8 pixels of the gain map.
    pub fn gain_pixels(&self) -> Vec<u8> {
        self.driver.gain().pixels().to_vec()
    }

    /// Gain in dB under the pointer, decoded from the gain map colors.
    ///
    /// Always reads the CPU snapshot, which holds the same colors as an
    /// attached gain canvas without depending on its drawing buffer.
    pub fn probe_gain(&self, px: u32, py: u32) -> Option<f64> {
        self.driver.probe_gain(px as usize, py as usize)
    }

    /// Parameter schema as a JSON string.
    pub fn param_schema() -> String {
        ArrayParameters::param_schema().to_string()
    }

    /// Draws the wave view into a WebGL2 canvas from now on.
    #[cfg(target_arch = "wasm32")]
    pub fn attach_wave_canvas(&mut self, gl: web_sys::WebGl2RenderingContext) -> Result<(), JsError> {
        self.attach(glow::Context::from_webgl2_context(gl), ProgramKind::Wave)?;
        Ok(())
    }

    /// Draws the gain map into a WebGL2 canvas from now on.
    #[cfg(target_arch = "wasm32")]
    pub fn attach_gain_canvas(&mut self, gl: web_sys::WebGl2RenderingContext) -> Result<(), JsError> {
        let scale = match self.driver.gain().mapper() {
            ColorMapper::GainDecibel(scale) => scale,
            _ => Default::default(),
        };
        self.attach(glow::Context::from_webgl2_context(gl), ProgramKind::Gain(scale))?;
        Ok(())
    }
}

impl WavefrontApp {
    /// Builds a GPU canvas for `kind` and draws the current state into it.
    pub fn attach(&mut self, gl: glow::Context, kind: ProgramKind) -> Result<(), WaveError> {
        check_source_count(self.driver.context().sources().len())?;
        let canvas = GpuCanvas::new(gl, kind)?;
        canvas.draw(&self.driver.context().uniforms())?;
        match kind {
            ProgramKind::Wave => {
                self.wave_canvas = Some(canvas);
                self.driver.set_cpu_wave(false);
            }
            ProgramKind::Gain(_) => self.gain_canvas = Some(canvas),
        }
        tracing::debug!(?kind, "GPU canvas attached");
        Ok(())
    }

    fn draw_gain(&self) -> Result<(), WaveError> {
        match &self.gain_canvas {
            Some(canvas) => canvas.draw(&self.driver.context().uniforms()),
            None => Ok(()),
        }
    }
}
