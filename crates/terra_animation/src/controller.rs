//! Animation Controller
//!
//! One registry of [`AnimationState`]s, keyed by asset id and advanced on a
//! single shared clock. The controller is a cheap handle: clones share the
//! same registry, so the frame loop and every model layer can hold one
//! without any global state.
//!
//! ```rust,ignore
//! let controller = AnimationController::new(Arc::new(SystemClock::new()));
//!
//! controller.register("statue");
//! controller.tick_now();
//! let yaw = controller.yaw("statue");
//!
//! controller.unregister("statue");
//! assert_eq!(controller.current_rotation("statue"), 0.0);
//! ```

use std::sync::Arc;
use std::time::Duration;

use glam::Quat;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use terra_core::{Clock, RotationCycle};

use crate::state::AnimationState;

struct Registry {
    states: FxHashMap<String, AnimationState>,
    cycle: RotationCycle,
}

#[derive(Clone)]
pub struct AnimationController {
    registry: Arc<Mutex<Registry>>,
    clock: Arc<dyn Clock>,
}

impl AnimationController {
    /// Creates a controller running the default 5 s pause / 2 s half-turn cycle.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_cycle(clock, RotationCycle::default())
    }

    #[must_use]
    pub fn with_cycle(clock: Arc<dyn Clock>, cycle: RotationCycle) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                states: FxHashMap::default(),
                cycle,
            })),
            clock,
        }
    }

    #[inline]
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    #[must_use]
    pub fn cycle(&self) -> RotationCycle {
        self.registry.lock().cycle
    }

    /// Inserts a fresh, paused state stamped with the current clock reading.
    ///
    /// Registering an id that is already present restarts its cycle.
    pub fn register(&self, asset_id: &str) {
        let now = self.clock.now();
        let previous = self
            .registry
            .lock()
            .states
            .insert(asset_id.to_string(), AnimationState::new(now));

        if previous.is_some() {
            log::debug!("Animation state for '{asset_id}' re-registered, cycle restarted");
        }
    }

    /// Removes the state for `asset_id`. Returns whether it was present.
    pub fn unregister(&self, asset_id: &str) -> bool {
        self.registry.lock().states.remove(asset_id).is_some()
    }

    /// Advances every registered state to `now`.
    pub fn tick(&self, now: Duration) {
        let mut registry = self.registry.lock();
        let cycle = registry.cycle;
        for state in registry.states.values_mut() {
            state.advance(now, &cycle);
        }
    }

    /// Advances every registered state to the controller clock's reading.
    #[inline]
    pub fn tick_now(&self) {
        self.tick(self.clock.now());
    }

    /// Current rotation in radians; `0.0` for unknown ids.
    #[must_use]
    pub fn current_rotation(&self, asset_id: &str) -> f64 {
        self.registry
            .lock()
            .states
            .get(asset_id)
            .map_or(0.0, AnimationState::current_rotation)
    }

    /// Current rotation as a yaw (rotation about the model's up axis).
    #[must_use]
    pub fn yaw(&self, asset_id: &str) -> Quat {
        Quat::from_rotation_y(self.current_rotation(asset_id) as f32)
    }

    /// Snapshot of a state, for inspection.
    #[must_use]
    pub fn state(&self, asset_id: &str) -> Option<AnimationState> {
        self.registry.lock().states.get(asset_id).copied()
    }

    #[must_use]
    pub fn contains(&self, asset_id: &str) -> bool {
        self.registry.lock().states.contains_key(asset_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.lock().states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.lock().states.is_empty()
    }

    /// Ids of every registered state, sorted.
    #[must_use]
    pub fn registered_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.registry.lock().states.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for AnimationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationController")
            .field("registered", &self.len())
            .field("cycle", &self.cycle())
            .finish_non_exhaustive()
    }
}
