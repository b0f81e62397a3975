//! Terra Animation
//!
//! Drives the pause → half-turn → pause cycle of every model overlay from a
//! single clock:
//!
//! - [`AnimationState`]: one model's phase and running rotation
//! - [`AnimationController`]: the id-keyed registry, advanced by `tick`
//! - [`FrameScheduler`]: "run on next refresh" abstraction
//! - [`AnimationLoop`]: the one re-arming callback that ticks the controller

pub mod animation_loop;
pub mod controller;
pub mod scheduler;
pub mod state;

pub use animation_loop::AnimationLoop;
pub use controller::AnimationController;
#[cfg(target_arch = "wasm32")]
pub use scheduler::AnimationFrameScheduler;
pub use scheduler::{FrameCallback, FrameRequestId, FrameScheduler, ManualFrameScheduler};
pub use state::{AnimationState, HALF_TURN, ease_in_out};
pub use terra_core::RotationCycle;
