//! Model layer
//!
//! [`ModelLayer`] is the [`CustomLayer`] that draws one animated model into
//! the host's shared graphics context.
//!
//! # Lifecycle
//!
//! ```text
//! Unattached --on_add--> Attaching --load ok--> Ready
//!                            |     \--load err--> Failed
//!                            \-------on_remove (any time)--> Detached
//! ```
//!
//! The geometry load runs as a detached task. It only holds a weak pointer
//! to the layer state and checks the `attached` flag before touching it, so
//! a load that resolves after `on_remove` (or after the layer was dropped)
//! is discarded.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use terra_animation::AnimationController;
use terra_assets::{ModelEntry, ModelLoader};
use terra_core::{LightingProfile, LngLat};
use terra_scene::{Camera, NodeHandle, Prefab, Scene, lighting_rig};

use crate::host::{CustomLayer, HostView, LayerContext, ProjectionData, RepaintHandle};
use crate::placement::ModelPlacement;
use crate::renderer::{RendererBackend, SceneRenderer};
use crate::task::TaskSpawner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerPhase {
    /// Constructed, not yet registered with a host.
    Unattached,
    /// Registered; geometry still loading.
    Attaching,
    /// Geometry loaded and animated.
    Ready,
    /// Geometry failed to load; the layer stays registered and draws nothing.
    Failed,
    /// Removed from the host.
    Detached,
}

/// Everything model layers share: one controller, one loader, one backend.
#[derive(Clone)]
pub struct LayerServices {
    pub controller: AnimationController,
    pub loader: ModelLoader,
    pub spawner: Rc<dyn TaskSpawner>,
    pub backend: Rc<dyn RendererBackend>,
    pub lighting: LightingProfile,
}

/// State the load task may reach after `on_add` returned.
struct LayerState {
    attached: bool,
    phase: LayerPhase,
    scene: Scene,
    visual: Option<NodeHandle>,
}

pub struct ModelLayer {
    id: String,
    entry: ModelEntry,
    placement: ModelPlacement,
    services: LayerServices,

    state: Rc<RefCell<LayerState>>,
    camera: Camera,
    renderer: Option<Box<dyn SceneRenderer>>,
}

impl ModelLayer {
    /// Host layer id used for a given asset.
    #[must_use]
    pub fn layer_id(asset_id: &str) -> String {
        format!("3d-model-{asset_id}")
    }

    #[must_use]
    pub fn new(entry: ModelEntry, placement: ModelPlacement, services: LayerServices) -> Self {
        Self {
            id: Self::layer_id(&entry.asset_id),
            entry,
            placement,
            services,
            state: Rc::new(RefCell::new(LayerState {
                attached: false,
                phase: LayerPhase::Unattached,
                scene: Scene::new(),
                visual: None,
            })),
            camera: Camera::new(),
            renderer: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn asset_id(&self) -> &str {
        &self.entry.asset_id
    }

    #[inline]
    #[must_use]
    pub fn coordinates(&self) -> LngLat {
        self.placement.lng_lat
    }

    #[must_use]
    pub fn phase(&self) -> LayerPhase {
        self.state.borrow().phase
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    fn spawn_load(&self, repaint: RepaintHandle) {
        let state = Rc::downgrade(&self.state);
        let entry = self.entry.clone();
        let loader = self.services.loader.clone();
        let controller = self.services.controller.clone();

        self.services.spawner.spawn(Box::pin(async move {
            let result = loader.load(&entry).await;
            finish_load(&state, &entry, result, &controller, &repaint);
        }));
    }
}

fn finish_load(
    state: &Weak<RefCell<LayerState>>,
    entry: &ModelEntry,
    result: terra_core::Result<Prefab>,
    controller: &AnimationController,
    repaint: &RepaintHandle,
) {
    let Some(state) = state.upgrade() else {
        log::debug!("Layer for '{}' dropped before its model loaded", entry.asset_id);
        return;
    };
    let mut state = state.borrow_mut();
    if !state.attached {
        log::debug!("Discarding late model load for detached '{}'", entry.asset_id);
        return;
    }

    match result {
        Ok(prefab) => {
            let visual = state.scene.instantiate(&prefab);
            state.visual = Some(visual);
            state.phase = LayerPhase::Ready;
            controller.register(&entry.asset_id);
            log::debug!("Model '{}' ready", entry.file_name);
            repaint.request();
        }
        Err(err) => {
            state.phase = LayerPhase::Failed;
            log::error!("Failed to load {}: {err}", entry.file_name);
        }
    }
}

impl CustomLayer for ModelLayer {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_add(&mut self, _host: &dyn HostView, context: LayerContext) {
        {
            let mut state = self.state.borrow_mut();
            if state.phase != LayerPhase::Unattached {
                log::warn!("Layer '{}' attached twice; ignoring", self.id);
                return;
            }
            state.scene.add_lights(lighting_rig(self.services.lighting));
            state.attached = true;
            state.phase = LayerPhase::Attaching;
        }

        self.renderer = Some(self.services.backend.create_renderer(&context.graphics));
        log::debug!("Layer '{}' attached to {}", self.id, context.graphics.label());

        self.spawn_load(context.repaint);
    }

    fn render(&mut self, host: &dyn HostView, projection: &ProjectionData) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let mut state = self.state.borrow_mut();
        let Some(visual) = state.visual else {
            return;
        };

        let yaw = self.services.controller.yaw(&self.entry.asset_id);
        if let Some(node) = state.scene.get_node_mut(visual) {
            node.transform.rotation = yaw;
        }
        state.scene.update_matrix_world();

        self.camera
            .set_projection_matrix(self.placement.projection_matrix(host, projection));

        // The host drew into the same context since our last frame.
        renderer.reset_state();
        renderer.render(&state.scene, &self.camera);
        host.trigger_repaint();
    }

    fn on_remove(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.phase == LayerPhase::Detached {
            return;
        }
        state.attached = false;
        state.phase = LayerPhase::Detached;
        let visual = state.visual.take();
        if let Some(visual) = visual {
            state.scene.remove_node(visual);
        }
        drop(state);

        // Only a loaded visual was registered with the controller.
        if visual.is_some() {
            self.services.controller.unregister(&self.entry.asset_id);
        }
        if let Some(mut renderer) = self.renderer.take() {
            renderer.dispose();
        }
        log::debug!("Layer '{}' detached", self.id);
    }
}

impl Drop for ModelLayer {
    fn drop(&mut self) {
        self.on_remove();
    }
}
