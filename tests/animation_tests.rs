//! Animation Controller Tests
//!
//! Tests for:
//! - AnimationState: pause -> half-turn -> pause cycle law
//! - Continuity: bounded per-tick rotation change
//! - AnimationController: register / unregister / safe defaults
//! - AnimationLoop: single re-armed callback, idempotent start, stop

mod support;

use std::f64::consts::PI;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use support::approx;
use terra::animation::{
    AnimationController, AnimationLoop, AnimationState, FrameScheduler, ManualFrameScheduler,
    RotationCycle, ease_in_out,
};
use terra::core::{Clock, ManualClock};

fn controller_with_clock() -> (AnimationController, ManualClock) {
    let clock = ManualClock::new();
    let controller = AnimationController::new(Arc::new(clock.clone()));
    (controller, clock)
}

fn step(controller: &AnimationController, clock: &ManualClock, dt: Duration) {
    clock.advance(dt);
    controller.tick_now();
}

// ============================================================================
// Cycle Law
// ============================================================================

#[test]
fn full_cycle_adds_exactly_half_turn() {
    let (controller, clock) = controller_with_clock();
    controller.register("statue");

    let dt = Duration::from_millis(10);
    for _ in 0..700 {
        step(&controller, &clock, dt);
    }

    let state = controller.state("statue").unwrap();
    assert!(approx(state.current_rotation(), PI));
    assert!(!state.is_animating());
    assert_eq!(state.pause_start_time(), Some(Duration::from_millis(7000)));
}

#[test]
fn rotation_starts_only_after_pause() {
    let (controller, clock) = controller_with_clock();
    controller.register("statue");

    clock.set(Duration::from_millis(4999));
    controller.tick_now();
    assert!(!controller.state("statue").unwrap().is_animating());

    clock.set(Duration::from_millis(5000));
    controller.tick_now();
    let state = controller.state("statue").unwrap();
    assert!(state.is_animating());
    assert_eq!(state.animation_start_time(), Some(Duration::from_millis(5000)));
    assert!(approx(state.target_rotation(), PI));
    assert!(approx(state.current_rotation(), 0.0));
}

#[test]
fn midpoint_of_rotation_is_quarter_turn() {
    let (controller, clock) = controller_with_clock();
    controller.register("statue");

    clock.set(Duration::from_millis(5000));
    controller.tick_now();
    clock.set(Duration::from_millis(6000));
    controller.tick_now();

    assert!(approx(controller.current_rotation("statue"), PI / 2.0));
}

#[test]
fn repeated_cycles_accumulate() {
    let (controller, clock) = controller_with_clock();
    controller.register("statue");

    let dt = Duration::from_millis(50);
    // Three full 7 s cycles.
    for _ in 0..(3 * 7000 / 50) {
        step(&controller, &clock, dt);
    }

    assert!(approx(controller.current_rotation("statue"), 3.0 * PI));
}

#[test]
fn custom_cycle_is_honored() {
    let clock = ManualClock::new();
    let cycle = RotationCycle {
        pause: Duration::from_millis(100),
        rotation: Duration::from_millis(100),
    };
    let controller = AnimationController::with_cycle(Arc::new(clock.clone()), cycle);
    controller.register("tower");

    for _ in 0..20 {
        step(&controller, &clock, Duration::from_millis(10));
    }
    assert!(approx(controller.current_rotation("tower"), PI));
}

// ============================================================================
// Continuity
// ============================================================================

#[test]
fn rotation_changes_are_bounded_per_tick() {
    let (controller, clock) = controller_with_clock();
    controller.register("statue");

    let dt_ms = 16.0;
    // Steepest slope of the eased curve is π/2 per unit progress.
    let bound = PI * (PI / 2.0) * dt_ms / 2000.0 + 1e-12;

    let mut previous = controller.current_rotation("statue");
    let mut completed = 0.0;
    for _ in 0..2000 {
        step(&controller, &clock, Duration::from_millis(16));
        let state = controller.state("statue").unwrap();
        let current = state.current_rotation();

        assert!(current >= previous, "rotation went backwards");
        assert!(current - previous <= bound, "jump of {}", current - previous);
        assert!(current <= completed + PI + 1e-12);

        if !state.is_animating() {
            completed = current;
        }
        previous = current;
    }
}

#[test]
fn ease_curve_endpoints_and_symmetry() {
    assert!(approx(ease_in_out(0.0), 0.0));
    assert!(approx(ease_in_out(0.5), 0.5));
    assert!(approx(ease_in_out(1.0), 1.0));
    assert!(approx(ease_in_out(0.25) + ease_in_out(0.75), 1.0));
}

#[test]
fn zero_length_rotation_snaps() {
    let mut state = AnimationState::new(Duration::ZERO);
    let cycle = RotationCycle {
        pause: Duration::ZERO,
        rotation: Duration::ZERO,
    };
    state.advance(Duration::from_millis(1), &cycle);
    assert!(state.is_animating());
    state.advance(Duration::from_millis(1), &cycle);
    assert!(!state.is_animating());
    assert!(approx(state.current_rotation(), PI));
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn unknown_asset_has_zero_rotation() {
    let (controller, _clock) = controller_with_clock();
    assert!(approx(controller.current_rotation("ghost"), 0.0));
    assert!(controller.state("ghost").is_none());
}

#[test]
fn unregister_twice_is_harmless() {
    let (controller, clock) = controller_with_clock();
    controller.register("statue");
    clock.set(Duration::from_millis(6000));
    controller.tick_now();

    assert!(controller.unregister("statue"));
    assert!(!controller.unregister("statue"));
    assert!(approx(controller.current_rotation("statue"), 0.0));
    assert!(controller.is_empty());
}

#[test]
fn register_stamps_current_clock() {
    let clock = ManualClock::starting_at(Duration::from_secs(42));
    let controller = AnimationController::new(Arc::new(clock.clone()));
    controller.register("statue");

    let state = controller.state("statue").unwrap();
    assert_eq!(state.pause_start_time(), Some(clock.now()));
    assert!(!state.is_animating());
}

#[test]
fn clones_share_one_registry() {
    let (controller, _clock) = controller_with_clock();
    let other = controller.clone();
    controller.register("b");
    other.register("a");

    assert_eq!(controller.registered_ids(), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(other.len(), 2);
}

// ============================================================================
// Animation Loop
// ============================================================================

#[test]
fn loop_keeps_exactly_one_request_outstanding() {
    let (controller, clock) = controller_with_clock();
    let scheduler = ManualFrameScheduler::new();
    let animation_loop = AnimationLoop::new(controller.clone(), Rc::new(scheduler.clone()));

    animation_loop.start();
    animation_loop.start();
    assert!(animation_loop.is_running());
    assert_eq!(scheduler.pending_count(), 1);

    controller.register("statue");
    controller.register("tower");
    for _ in 0..14 {
        clock.advance(Duration::from_millis(500));
        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(scheduler.pending_count(), 1);
    }

    // Both models see the same ticks and stay in phase.
    assert!(approx(controller.current_rotation("statue"), PI));
    assert!(approx(
        controller.current_rotation("statue"),
        controller.current_rotation("tower")
    ));
}

#[test]
fn stop_cancels_pending_request() {
    let (controller, clock) = controller_with_clock();
    let scheduler = ManualFrameScheduler::new();
    let animation_loop = AnimationLoop::new(controller.clone(), Rc::new(scheduler.clone()));
    controller.register("statue");

    animation_loop.start();
    animation_loop.stop();
    animation_loop.stop();
    assert!(!animation_loop.is_running());
    assert_eq!(scheduler.pending_count(), 0);

    clock.set(Duration::from_millis(6000));
    assert_eq!(scheduler.run_frame(), 0);
    assert!(!controller.state("statue").unwrap().is_animating());

    animation_loop.start();
    assert_eq!(scheduler.pending_count(), 1);
}

#[test]
fn dropping_loop_cancels_request() {
    let (controller, _clock) = controller_with_clock();
    let scheduler = ManualFrameScheduler::new();
    {
        let animation_loop = AnimationLoop::new(controller, Rc::new(scheduler.clone()));
        animation_loop.start();
        assert_eq!(scheduler.pending_count(), 1);
    }
    assert_eq!(scheduler.pending_count(), 0);
}

#[test]
fn cancel_unknown_request_is_ignored() {
    let scheduler = ManualFrameScheduler::new();
    let id = scheduler.request_frame(Box::new(|| {}));
    scheduler.cancel_frame(id);
    scheduler.cancel_frame(id);
    assert_eq!(scheduler.run_frame(), 0);
}
