//! Fixed-rate frame clock for offline animation.

use wavefront_views::{FrameHandle, FrameScheduler};

use crate::error::CliError;

/// Simulated display clock ticking at a constant frame rate.
///
/// Holds at most one pending frame. [`FixedRateClock::tick`] fires it at the
/// current clock time and then advances the clock by one interval.
#[derive(Debug)]
pub struct FixedRateClock {
    interval_ms: f64,
    now_ms: f64,
    next_id: u64,
    pending: Option<FrameHandle>,
}

impl FixedRateClock {
    pub fn new(fps: f64) -> Result<Self, CliError> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(CliError::Input(format!(
                "--fps must be a positive number, got {fps}"
            )));
        }
        Ok(Self {
            interval_ms: 1000.0 / fps,
            now_ms: 0.0,
            next_id: 0,
            pending: None,
        })
    }

    /// The pending frame and its timestamp, or `None` if nothing was requested.
    pub fn tick(&mut self) -> Option<(FrameHandle, f64)> {
        let handle = self.pending.take()?;
        let at = self.now_ms;
        self.now_ms += self.interval_ms;
        Some((handle, at))
    }
}

impl FrameScheduler for FixedRateClock {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle::new(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}
