//! Display-refresh scheduling.
//!
//! [`FrameScheduler`] is the "call me on the next display refresh" primitive
//! the animation loop re-arms itself with. Callbacks are one-shot and run on
//! the thread that owns the scheduler.

use std::cell::RefCell;
use std::rc::Rc;

/// One-shot callback run on the next display refresh.
pub type FrameCallback = Box<dyn FnOnce()>;

/// Identifies a pending frame request so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequestId(pub u64);

pub trait FrameScheduler {
    /// Queues `callback` for the next refresh.
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId;

    /// Drops a pending request. Unknown or already-run ids are ignored.
    fn cancel_frame(&self, id: FrameRequestId);
}

// ============================================================================
// Host-pumped scheduler
// ============================================================================

#[derive(Default)]
struct ManualQueue {
    next_id: u64,
    pending: Vec<(FrameRequestId, FrameCallback)>,
}

/// Scheduler driven by the host's own event loop.
///
/// The host calls [`run_frame`](Self::run_frame) once per presented frame.
/// Requests made while a frame is running are deferred to the next one, so a
/// self re-arming callback runs exactly once per frame.
#[derive(Clone, Default)]
pub struct ManualFrameScheduler {
    queue: Rc<RefCell<ManualQueue>>,
}

impl ManualFrameScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every callback queued before this call. Returns how many ran.
    pub fn run_frame(&self) -> usize {
        // Take the batch out first: callbacks re-enter `request_frame`.
        let batch = std::mem::take(&mut self.queue.borrow_mut().pending);
        let count = batch.len();
        for (_, callback) in batch {
            callback();
        }
        count
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.queue.borrow().pending.len()
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId {
        let mut queue = self.queue.borrow_mut();
        queue.next_id += 1;
        let id = FrameRequestId(queue.next_id);
        queue.pending.push((id, callback));
        id
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        self.queue
            .borrow_mut()
            .pending
            .retain(|(pending_id, _)| *pending_id != id);
    }
}

// ============================================================================
// Browser scheduler
// ============================================================================

/// Scheduler backed by `window.requestAnimationFrame`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationFrameScheduler;

#[cfg(target_arch = "wasm32")]
impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::closure::Closure;

        let Some(window) = web_sys::window() else {
            log::error!("requestAnimationFrame unavailable: no global window");
            return FrameRequestId(0);
        };

        let js_callback = Closure::once_into_js(move |_timestamp: f64| callback());
        match window.request_animation_frame(js_callback.unchecked_ref()) {
            Ok(handle) => FrameRequestId(u64::from(handle.unsigned_abs())),
            Err(err) => {
                log::error!("requestAnimationFrame failed: {err:?}");
                FrameRequestId(0)
            }
        }
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        let (Some(window), Ok(handle)) = (web_sys::window(), i32::try_from(id.0)) else {
            return;
        };
        if let Err(err) = window.cancel_animation_frame(handle) {
            log::warn!("cancelAnimationFrame failed: {err:?}");
        }
    }
}
