//! In-process host
//!
//! A minimal [`HostMap`] over a flat web-mercator camera. It keeps layers in
//! registration order, renders them on demand and counts repaint requests.
//! Useful for headless runs and for exercising layers without a real map.

use std::cell::Cell;
use std::rc::Rc;

use glam::DMat4;
use terra_core::{LayerError, LngLat, Result};

use crate::host::{CustomLayer, HostMap, HostView, LayerContext, ProjectionData, RepaintHandle};
use crate::placement::MercatorHostTransform;
use crate::renderer::GraphicsContext;

/// The parts of the host a layer may see while the layer list is borrowed.
struct HostCore {
    transform: MercatorHostTransform,
    repaints: Rc<Cell<u64>>,
}

impl HostView for HostCore {
    fn matrix_for_model(&self, lng_lat: LngLat, altitude: f64) -> DMat4 {
        self.transform.matrix_for_model(lng_lat, altitude)
    }

    fn trigger_repaint(&self) {
        self.repaints.set(self.repaints.get() + 1);
    }
}

pub struct HeadlessHost {
    core: HostCore,
    graphics: GraphicsContext,
    projection: ProjectionData,
    layers: Vec<Box<dyn CustomLayer>>,
}

impl HeadlessHost {
    #[must_use]
    pub fn new(graphics: GraphicsContext) -> Self {
        Self {
            core: HostCore {
                transform: MercatorHostTransform,
                repaints: Rc::new(Cell::new(0)),
            },
            graphics,
            projection: ProjectionData::default(),
            layers: Vec::new(),
        }
    }

    #[must_use]
    pub fn graphics(&self) -> &GraphicsContext {
        &self.graphics
    }

    pub fn set_projection(&mut self, projection: ProjectionData) {
        self.projection = projection;
    }

    #[must_use]
    pub fn projection(&self) -> ProjectionData {
        self.projection
    }

    /// Total repaint requests received so far.
    #[must_use]
    pub fn repaint_requests(&self) -> u64 {
        self.core.repaints.get()
    }

    /// Renders every layer once, in registration order. Returns the number
    /// of layers rendered.
    pub fn render_frame(&mut self) -> usize {
        for layer in &mut self.layers {
            layer.render(&self.core, &self.projection);
        }
        self.layers.len()
    }
}

impl HostView for HeadlessHost {
    fn matrix_for_model(&self, lng_lat: LngLat, altitude: f64) -> DMat4 {
        self.core.matrix_for_model(lng_lat, altitude)
    }

    fn trigger_repaint(&self) {
        self.core.trigger_repaint();
    }
}

impl HostMap for HeadlessHost {
    fn add_layer(&mut self, mut layer: Box<dyn CustomLayer>) -> Result<()> {
        if self.has_layer(layer.id()) {
            return Err(LayerError::DuplicateLayer(layer.id().to_string()).into());
        }

        let repaints = Rc::clone(&self.core.repaints);
        let context = LayerContext {
            graphics: self.graphics.clone(),
            repaint: RepaintHandle::new(move || repaints.set(repaints.get() + 1)),
        };
        layer.on_add(&self.core, context);
        self.layers.push(layer);
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) -> bool {
        let Some(index) = self.layers.iter().position(|l| l.id() == id) else {
            return false;
        };
        let mut layer = self.layers.remove(index);
        layer.on_remove();
        true
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|l| l.id() == id)
    }

    fn layer_ids(&self) -> Vec<String> {
        self.layers.iter().map(|l| l.id().to_string()).collect()
    }
}
