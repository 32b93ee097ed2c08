//! Frame scheduling delegated to the page's `requestAnimationFrame`.
//!
//! Rust cannot hold the browser callback, so the scheduler only records
//! which frame is wanted. The page polls `pending_frame()`, requests an
//! animation frame, and passes the id back to `on_frame`.

use wavefront_views::{FrameHandle, FrameScheduler};

#[derive(Debug, Default)]
pub struct HostScheduler {
    next_id: u64,
    pending: Option<FrameHandle>,
}

impl HostScheduler {
    /// The frame the page should request next, if any.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }
}

impl FrameScheduler for HostScheduler {
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
