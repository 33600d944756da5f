//! Frame scheduling: an explicit "call me on the next presented frame"
//! request, the way a browser's animation-frame callback works.
//!
//! The field asks its [`FrameScheduler`] for exactly one future frame at the
//! end of each frame and cancels the outstanding request on teardown. The host
//! side, [`FrameClock`], holds at most one pending request and hands it back as
//! a [`FrameTick`] when the display refreshes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Identifies one frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequest(u64);

impl FrameRequest {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// A presented frame, delivered for a specific request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTick {
    pub request: FrameRequest,
    /// Presentation time since the host started.
    pub timestamp: Duration,
}

/// Requests and cancels future frame callbacks.
pub trait FrameScheduler {
    /// Request one callback on the next presented frame.
    fn request_frame(&mut self) -> FrameRequest;

    /// Cancel a pending request. Cancelling a request that already fired or
    /// was never issued does nothing.
    fn cancel_frame(&mut self, request: FrameRequest);
}

#[derive(Debug, Default)]
struct ClockState {
    next_id: u64,
    pending: Option<FrameRequest>,
    presented: u64,
}

/// Host-side frame clock with a single pending request slot.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    state: Arc<Mutex<ClockState>>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ClockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Scheduler handle to hand to a field.
    pub fn scheduler(&self) -> ClockScheduler {
        ClockScheduler {
            clock: self.clone(),
        }
    }

    /// Present a frame at `timestamp`. Returns the tick to deliver if a
    /// request was pending; the request is consumed.
    pub fn present(&self, timestamp: Duration) -> Option<FrameTick> {
        let mut state = self.lock();
        let request = state.pending.take()?;
        state.presented += 1;
        Some(FrameTick { request, timestamp })
    }

    /// Whether a request is waiting for the next frame.
    pub fn has_pending(&self) -> bool {
        self.lock().pending.is_some()
    }

    /// Number of ticks handed out so far.
    pub fn presented(&self) -> u64 {
        self.lock().presented
    }
}

/// [`FrameScheduler`] backed by a [`FrameClock`].
#[derive(Clone, Debug)]
pub struct ClockScheduler {
    clock: FrameClock,
}

impl FrameScheduler for ClockScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        let mut state = self.clock.lock();
        if let Some(previous) = state.pending {
            log::warn!(
                "frame request {} replaced before it was presented",
                previous.id()
            );
        }
        let request = FrameRequest(state.next_id);
        state.next_id += 1;
        state.pending = Some(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let mut state = self.clock.lock();
        if state.pending == Some(request) {
            state.pending = None;
        }
    }
}
