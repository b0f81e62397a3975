use std::cell::Cell;
use std::rc::{Rc, Weak};

use crate::controller::AnimationController;
use crate::scheduler::{FrameRequestId, FrameScheduler};

#[derive(Default)]
struct LoopState {
    running: Cell<bool>,
    pending: Cell<Option<FrameRequestId>>,
}

/// The single frame callback that ticks every registered model.
///
/// Exactly one request is outstanding while the loop runs; each callback
/// ticks the controller and re-arms the next one. N models therefore share
/// one scheduling slot and one clock reading per frame.
pub struct AnimationLoop {
    controller: AnimationController,
    scheduler: Rc<dyn FrameScheduler>,
    state: Rc<LoopState>,
}

impl AnimationLoop {
    #[must_use]
    pub fn new(controller: AnimationController, scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            controller,
            scheduler,
            state: Rc::new(LoopState::default()),
        }
    }

    #[inline]
    #[must_use]
    pub fn controller(&self) -> &AnimationController {
        &self.controller
    }

    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    /// Starts ticking on every refresh. A no-op while already running.
    pub fn start(&self) {
        if self.state.running.replace(true) {
            return;
        }
        log::debug!("Animation loop started");
        arm(
            self.controller.clone(),
            Rc::downgrade(&self.scheduler),
            Rc::clone(&self.state),
        );
    }

    /// Cancels the pending frame request. A no-op while stopped.
    pub fn stop(&self) {
        if !self.state.running.replace(false) {
            return;
        }
        if let Some(id) = self.state.pending.take() {
            self.scheduler.cancel_frame(id);
        }
        log::debug!("Animation loop stopped");
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn arm(controller: AnimationController, scheduler: Weak<dyn FrameScheduler>, state: Rc<LoopState>) {
    let Some(strong) = scheduler.upgrade() else {
        state.running.set(false);
        state.pending.set(None);
        return;
    };

    let callback_state = Rc::clone(&state);
    let id = strong.request_frame(Box::new(move || {
        callback_state.pending.set(None);
        if !callback_state.running.get() {
            return;
        }
        controller.tick_now();
        arm(controller, scheduler, callback_state);
    }));

    state.pending.set(Some(id));
}
