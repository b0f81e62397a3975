//! Host map contract
//!
//! What an overlay needs from the map it is injected into, and what the map
//! needs from an overlay. A host implements [`HostView`] (per-frame queries)
//! and [`HostMap`] (layer registry); overlays implement [`CustomLayer`].

use std::fmt;
use std::rc::Rc;

use glam::{DMat4, Mat4};
use terra_core::{LngLat, Result};

use crate::renderer::GraphicsContext;

/// Asks the host to schedule another frame.
///
/// Clonable and `'static`, so it can be kept by tasks that outlive the call
/// that handed it over.
#[derive(Clone)]
pub struct RepaintHandle {
    request: Rc<dyn Fn()>,
}

impl RepaintHandle {
    pub fn new(request: impl Fn() + 'static) -> Self {
        Self {
            request: Rc::new(request),
        }
    }

    /// A handle that does nothing.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    #[inline]
    pub fn request(&self) {
        (self.request)();
    }
}

impl fmt::Debug for RepaintHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepaintHandle").finish_non_exhaustive()
    }
}

/// Snapshot of the host camera for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionData {
    /// World (mercator) to clip space.
    pub main_matrix: DMat4,
}

impl ProjectionData {
    #[must_use]
    pub fn new(main_matrix: DMat4) -> Self {
        Self { main_matrix }
    }

    /// From a column-major array, as hosts typically hand it over.
    #[must_use]
    pub fn from_cols_array(cols: &[f64; 16]) -> Self {
        Self::new(DMat4::from_cols_array(cols))
    }
}

impl Default for ProjectionData {
    fn default() -> Self {
        Self::new(DMat4::IDENTITY)
    }
}

impl From<Mat4> for ProjectionData {
    fn from(matrix: Mat4) -> Self {
        Self::new(matrix.as_dmat4())
    }
}

/// Handed to a layer once, when the host registers it.
#[derive(Debug, Clone)]
pub struct LayerContext {
    pub graphics: GraphicsContext,
    pub repaint: RepaintHandle,
}

/// Per-frame services the host exposes to its layers.
pub trait HostView {
    /// Matrix placing a model at `lng_lat`, `altitude` meters up, in the
    /// space `ProjectionData::main_matrix` projects from.
    fn matrix_for_model(&self, lng_lat: LngLat, altitude: f64) -> DMat4;

    fn trigger_repaint(&self);
}

/// A foreign layer taking part in the host's draw loop.
pub trait CustomLayer {
    fn id(&self) -> &str;

    /// Called once when the host registers the layer.
    fn on_add(&mut self, host: &dyn HostView, context: LayerContext);

    /// Called every host frame, synchronously, while the layer is registered.
    fn render(&mut self, host: &dyn HostView, projection: &ProjectionData);

    /// Called when the host drops the layer. Must be safe to call twice.
    fn on_remove(&mut self);
}

/// The host's layer registry.
pub trait HostMap: HostView {
    /// Registers `layer` and calls its [`CustomLayer::on_add`].
    ///
    /// Fails with [`LayerError::DuplicateLayer`](terra_core::LayerError) if
    /// the id is taken.
    fn add_layer(&mut self, layer: Box<dyn CustomLayer>) -> Result<()>;

    /// Unregisters the layer, calling its [`CustomLayer::on_remove`].
    /// Returns whether a layer was removed.
    fn remove_layer(&mut self, id: &str) -> bool;

    fn has_layer(&self, id: &str) -> bool;

    fn layer_ids(&self) -> Vec<String>;
}
