use std::f64::consts::PI;
use std::time::Duration;

use terra_core::RotationCycle;

/// Angle swept by one rotation phase (180°).
pub const HALF_TURN: f64 = PI;

/// Cosine ease-in-out over `progress ∈ [0, 1]`.
///
/// Zero slope at both ends, steepest (π/2) at the midpoint.
#[inline]
#[must_use]
pub fn ease_in_out(progress: f64) -> f64 {
    0.5 - (progress * PI).cos() / 2.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Paused { since: Duration },
    Rotating { started: Duration, target: f64 },
}

/// Rotation state of one model.
///
/// A state is either paused or rotating, never both. `current_rotation` is a
/// running total in radians: it only ever grows, by exactly one
/// [`HALF_TURN`] per completed rotation phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    phase: Phase,
    current_rotation: f64,
}

impl AnimationState {
    /// A fresh state, at rest since `now` with no rotation applied.
    #[must_use]
    pub fn new(now: Duration) -> Self {
        Self {
            phase: Phase::Paused { since: now },
            current_rotation: 0.0,
        }
    }

    /// Steps the state machine to `now`.
    pub fn advance(&mut self, now: Duration, cycle: &RotationCycle) {
        match self.phase {
            Phase::Paused { since } => {
                if now.saturating_sub(since) >= cycle.pause {
                    self.phase = Phase::Rotating {
                        started: now,
                        target: self.current_rotation + HALF_TURN,
                    };
                }
            }
            Phase::Rotating { started, target } => {
                let progress = rotation_progress(now.saturating_sub(started), cycle.rotation);

                if progress >= 1.0 {
                    self.current_rotation = target;
                    self.phase = Phase::Paused { since: now };
                } else {
                    self.current_rotation = (target - HALF_TURN) + HALF_TURN * ease_in_out(progress);
                }
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Rotating { .. })
    }

    #[inline]
    #[must_use]
    pub fn current_rotation(&self) -> f64 {
        self.current_rotation
    }

    /// Rotation the current (or last completed) phase ends at.
    #[must_use]
    pub fn target_rotation(&self) -> f64 {
        match self.phase {
            Phase::Rotating { target, .. } => target,
            Phase::Paused { .. } => self.current_rotation,
        }
    }

    /// When the current pause began; `None` while rotating.
    #[must_use]
    pub fn pause_start_time(&self) -> Option<Duration> {
        match self.phase {
            Phase::Paused { since } => Some(since),
            Phase::Rotating { .. } => None,
        }
    }

    /// When the current rotation began; `None` while paused.
    #[must_use]
    pub fn animation_start_time(&self) -> Option<Duration> {
        match self.phase {
            Phase::Rotating { started, .. } => Some(started),
            Phase::Paused { .. } => None,
        }
    }
}

fn rotation_progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}
