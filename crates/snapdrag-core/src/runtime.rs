use crate::collections::map::HashMap;
use crate::frame_clock::FrameClock;
use crate::platform::RuntimeScheduler;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Arc;

pub type FrameCallbackId = u64;

type FrameCallback = Box<dyn FnMut(u64)>;

struct RuntimeInner {
    next_callback_id: Cell<FrameCallbackId>,
    frame_callbacks: RefCell<HashMap<FrameCallbackId, FrameCallback>>,
    scheduler: Option<Arc<dyn RuntimeScheduler>>,
    last_frame_nanos: Cell<Option<u64>>,
}

/// Owner of the frame callback queue.
///
/// The runtime lives on the UI thread. Handles are weak: once the `Runtime`
/// is dropped, registrations become inactive and draining does nothing.
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a runtime that asks `scheduler` for a frame whenever the first
    /// callback is queued after the queue went idle.
    pub fn with_scheduler(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self::build(Some(scheduler))
    }

    fn build(scheduler: Option<Arc<dyn RuntimeScheduler>>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner {
                next_callback_id: Cell::new(1),
                frame_callbacks: RefCell::new(HashMap::default()),
                scheduler,
                last_frame_nanos: Cell::new(None),
            }),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub(crate) fn register_frame_callback(
        &self,
        callback: impl FnMut(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        let inner = self.inner.upgrade()?;
        let id = inner.next_callback_id.get();
        inner.next_callback_id.set(id + 1);
        let was_idle = {
            let mut callbacks = inner.frame_callbacks.borrow_mut();
            let was_idle = callbacks.is_empty();
            callbacks.insert(id, Box::new(callback));
            was_idle
        };
        if was_idle {
            if let Some(scheduler) = inner.scheduler.as_ref() {
                scheduler.schedule_frame();
            }
        }
        Some(id)
    }

    pub(crate) fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.frame_callbacks.borrow_mut().remove(&id);
        }
    }

    /// Whether any callback is waiting for the next frame.
    pub fn has_frame_callbacks(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| !inner.frame_callbacks.borrow().is_empty())
            .unwrap_or(false)
    }

    /// Timestamp of the most recently drained frame.
    pub fn last_frame_nanos(&self) -> Option<u64> {
        self.inner.upgrade().and_then(|inner| inner.last_frame_nanos.get())
    }

    /// Run every callback that was registered before this call, in
    /// registration order. Callbacks registered while draining wait for the
    /// next frame; callbacks cancelled while draining are skipped.
    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        inner.last_frame_nanos.set(Some(frame_time_nanos));

        let mut pending: Vec<FrameCallbackId> =
            inner.frame_callbacks.borrow().keys().copied().collect();
        pending.sort_unstable();
        log::trace!(
            "draining {} frame callbacks at {frame_time_nanos}ns",
            pending.len()
        );

        for id in pending {
            let callback = inner.frame_callbacks.borrow_mut().remove(&id);
            if let Some(mut callback) = callback {
                callback(frame_time_nanos);
            }
        }
    }
}
