//! Viewport geometry and resize notifications.
//!
//! The host owns a [`Viewport`] and calls [`Viewport::resize`] from whatever
//! thread its windowing events arrive on. Subscribers receive a notification
//! per resize and read the current size back in one locked read, so width and
//! height are never observed torn.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::surface::SurfaceSize;

struct ViewportState {
    size: SurfaceSize,
    next_id: u64,
    subscribers: Vec<(u64, Sender<SurfaceSize>)>,
}

/// Shared handle to the host viewport.
#[derive(Clone)]
pub struct Viewport {
    state: Arc<Mutex<ViewportState>>,
}

impl Viewport {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            state: Arc::new(Mutex::new(ViewportState {
                size,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ViewportState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current viewport size.
    pub fn size(&self) -> SurfaceSize {
        self.lock().size
    }

    /// Record a new viewport size and notify every subscriber.
    pub fn resize(&self, size: SurfaceSize) {
        let mut state = self.lock();
        state.size = size;
        state.subscribers.retain(|(_, tx)| tx.send(size).is_ok());
    }

    /// Subscribe to resize notifications. Dropping the subscription
    /// unsubscribes.
    pub fn subscribe(&self) -> ResizeSubscription {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.subscribers.push((id, tx));
        ResizeSubscription {
            id,
            rx,
            viewport: self.clone(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Viewport")
            .field("size", &state.size)
            .field("subscribers", &state.subscribers.len())
            .finish()
    }
}

/// A live resize subscription.
pub struct ResizeSubscription {
    id: u64,
    rx: Receiver<SurfaceSize>,
    viewport: Viewport,
}

impl ResizeSubscription {
    /// Drain pending notifications. Returns the viewport's current size if at
    /// least one resize arrived since the last call.
    pub fn poll(&self) -> Option<SurfaceSize> {
        let mut notified = false;
        loop {
            match self.rx.try_recv() {
                Ok(_) => notified = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        notified.then(|| self.viewport.size())
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        let id = self.id;
        self.viewport
            .lock()
            .subscribers
            .retain(|(sub_id, _)| *sub_id != id);
    }
}
