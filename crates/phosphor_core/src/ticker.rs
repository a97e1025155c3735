//! The frame-scheduling capability.
//!
//! The continuous per-frame loop is not hardcoded to any host API: the
//! driver asks an injected [`Ticker`] for the next callback and re-arms it
//! exactly once per tick. Omitting the re-arm (or cancelling the pending
//! handle) stops the loop deterministically - that is the entire
//! cancellation story.
//!
//! [`FakeTicker`] ships in the crate proper, not behind `cfg(test)`: the
//! driver's integration tests and any headless embedding drive frames with
//! it using synthetic time steps.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Opaque handle to one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    /// Creates a handle from a host-assigned id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The host-assigned id.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Host-provided frame scheduling.
///
/// `schedule` requests one callback on the next display refresh and
/// returns a cancellable handle; the host consumes the handle when it
/// fires the callback. Implementations for hosts that cannot cancel a
/// queued frame (winit redraw requests) may make `cancel` a no-op and
/// rely on the driver never ticking after teardown.
pub trait Ticker {
    /// Requests one frame callback.
    fn schedule(&mut self) -> TickHandle;

    /// Cancels a pending callback.
    fn cancel(&mut self, handle: TickHandle);
}

/// Shared state behind a [`FakeTicker`] and its clones.
#[derive(Debug, Default)]
struct FakeTickerState {
    next_id: AtomicU64,
    pending: Mutex<VecDeque<TickHandle>>,
}

/// Deterministic ticker for tests and headless use.
///
/// Clones share state, so a test can hold one clone while the driver owns
/// another and observe scheduling from outside.
#[derive(Debug, Clone, Default)]
pub struct FakeTicker {
    state: Arc<FakeTickerState>,
}

impl FakeTicker {
    /// Creates a ticker with no pending callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks scheduled but not yet fired or cancelled.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.state.pending.lock().expect("ticker lock").len()
    }

    /// Consumes the oldest pending callback, as the host would when the
    /// display refreshes. Returns `None` when nothing is scheduled.
    pub fn fire(&self) -> Option<TickHandle> {
        self.state.pending.lock().expect("ticker lock").pop_front()
    }
}

impl Ticker for FakeTicker {
    fn schedule(&mut self) -> TickHandle {
        let handle = TickHandle::new(self.state.next_id.fetch_add(1, Ordering::Relaxed));
        self.state.pending.lock().expect("ticker lock").push_back(handle);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.state
            .pending
            .lock()
            .expect("ticker lock")
            .retain(|pending| *pending != handle);
    }
}
