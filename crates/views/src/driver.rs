//! Frame loop state machine for the live view.
//!
//! The driver owns the [`SimulationContext`], the animated view, and the gain
//! snapshot. The host supplies a [`FrameScheduler`] (a browser animation
//! frame, or a fixed-rate clock in the CLI) and calls
//! [`AnimationDriver::on_frame`] with the handle it was given. At most one
//! frame is pending at any time.

use wavefront_core::color::ColorMapper;
use wavefront_core::error::WaveError;
use wavefront_core::params::ArrayParameters;
use wavefront_core::region::ViewRegion;
use wavefront_core::simulation::SimulationContext;
use wavefront_core::view::View;

use crate::gain::GainMapSnapshot;
use crate::wave::AnimatedView;

/// Identifies one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// Source of frame callbacks.
pub trait FrameScheduler {
    /// Asks for one callback; the host later calls `on_frame` with this handle.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraws a previously requested callback.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Whether a frame is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Stopped,
    Running { pending: FrameHandle },
}

/// What happened to one frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The animated view now shows the new time.
    Rendered,
    /// Evaluation failed; the previous frame is still shown.
    Failed,
    /// The callback did not match the pending frame and was ignored.
    Stale,
}

/// Drives the animated view from frame callbacks.
pub struct AnimationDriver<S: FrameScheduler> {
    scheduler: S,
    ctx: SimulationContext,
    wave: AnimatedView,
    gain: GainMapSnapshot,
    state: DriverState,
    last_frame_ms: Option<f64>,
    dropped_frames: u64,
    cpu_wave: bool,
}

impl<S: FrameScheduler> AnimationDriver<S> {
    /// Builds the context and the gain snapshot. The driver starts `Stopped`.
    pub fn new(
        params: ArrayParameters,
        region: ViewRegion,
        gain_mapper: ColorMapper,
        scheduler: S,
    ) -> Result<Self, WaveError> {
        let ctx = SimulationContext::new(params, region)?;
        let wave = AnimatedView::new(region.pixel_width(), region.pixel_height())?;
        let gain = GainMapSnapshot::compute(&ctx, gain_mapper)?;
        Ok(Self {
            scheduler,
            ctx,
            wave,
            gain,
            state: DriverState::Stopped,
            last_frame_ms: None,
            dropped_frames: 0,
            cpu_wave: true,
        })
    }

    /// Requests the first frame. No effect when already running.
    pub fn start(&mut self) {
        if self.state == DriverState::Stopped {
            self.last_frame_ms = None;
            self.state = DriverState::Running {
                pending: self.scheduler.request_frame(),
            };
        }
    }

    /// Cancels the pending frame, if any.
    pub fn stop(&mut self) {
        if let DriverState::Running { pending } = self.state {
            self.scheduler.cancel_frame(pending);
        }
        self.state = DriverState::Stopped;
    }

    /// Handles a frame callback at host time `now_ms`.
    ///
    /// The first frame after a start or restart has a zero time step.
    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: f64) -> FrameOutcome {
        match self.state {
            DriverState::Running { pending } if pending == handle => {}
            _ => {
                tracing::warn!(handle = handle.id(), "ignoring stale frame callback");
                return FrameOutcome::Stale;
            }
        }

        let delta = match self.last_frame_ms {
            Some(then) => (now_ms - then) / 1000.0,
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        self.ctx.advance(delta);

        if !self.cpu_wave {
            tracing::trace!(t = self.ctx.time(), delta, "clock advanced, frame drawn elsewhere");
            self.state = DriverState::Running {
                pending: self.scheduler.request_frame(),
            };
            return FrameOutcome::Rendered;
        }

        let outcome = match self.wave.render(&self.ctx) {
            Ok(()) => {
                tracing::trace!(t = self.ctx.time(), delta, "frame rendered");
                FrameOutcome::Rendered
            }
            Err(err) => {
                self.dropped_frames += 1;
                tracing::warn!(
                    error = %err,
                    t = self.ctx.time(),
                    dropped = self.dropped_frames,
                    "frame dropped, keeping previous frame"
                );
                FrameOutcome::Failed
            }
        };

        self.state = DriverState::Running {
            pending: self.scheduler.request_frame(),
        };
        outcome
    }

    /// Applies new parameters and resumes from `t = 0`.
    ///
    /// Parameters are validated and the new gain snapshot is computed before
    /// anything changes; on error the driver is untouched.
    pub fn restart(&mut self, params: ArrayParameters) -> Result<(), WaveError> {
        let mut next = self.ctx.clone();
        next.restart(params)?;
        let gain = GainMapSnapshot::compute(&next, self.gain.mapper())?;

        if let DriverState::Running { pending } = self.state {
            self.scheduler.cancel_frame(pending);
        }
        self.ctx = next;
        self.gain = gain;
        self.last_frame_ms = None;
        tracing::debug!(
            sources = self.ctx.sources().len(),
            wavelength = self.ctx.params().wavelength(),
            frequency = self.ctx.params().frequency(),
            speed = self.ctx.params().wave_speed(),
            "simulation restarted"
        );

        self.state = DriverState::Running {
            pending: self.scheduler.request_frame(),
        };
        Ok(())
    }

    /// Changes the canvas size or visible width, re-rendering both views.
    pub fn resize(&mut self, region: ViewRegion) -> Result<(), WaveError> {
        let mut next = self.ctx.clone();
        next.set_region(region);
        let gain = GainMapSnapshot::compute(&next, self.gain.mapper())?;
        let mut wave = AnimatedView::new(region.pixel_width(), region.pixel_height())?;
        if let Err(err) = wave.render(&next) {
            tracing::warn!(error = %err, "frame dropped after resize");
        }
        self.ctx = next;
        self.gain = gain;
        self.wave = wave;
        Ok(())
    }

    /// Turns the CPU evaluation of the animated view on or off.
    ///
    /// With it off, frames only advance the clock; the host draws the wave
    /// from [`SimulationContext::uniforms`] and [`Self::wave`] keeps its last
    /// CPU frame.
    pub fn set_cpu_wave(&mut self, enabled: bool) {
        self.cpu_wave = enabled;
    }

    /// Gain in decibels at a canvas pixel, read from the gain snapshot.
    pub fn probe_gain(&self, px: usize, py: usize) -> Option<f64> {
        self.gain.probe(px, py)
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, DriverState::Running { .. })
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    /// Simulation time in seconds.
    pub fn time(&self) -> f64 {
        self.ctx.time()
    }

    pub fn wave(&self) -> &AnimatedView {
        &self.wave
    }

    pub fn gain(&self) -> &GainMapSnapshot {
        &self.gain
    }

    /// Frames whose evaluation failed since the driver was created.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
