//! Renderer seam
//!
//! The host map owns the one graphics context (a WebGL context, a wgpu
//! surface, ...). Overlays never create their own: at attach time they get a
//! [`GraphicsContext`] handle and ask a [`RendererBackend`] for a
//! [`SceneRenderer`] bound to exactly that context.
//!
//! # Shared context discipline
//!
//! The host draws into the same context between overlay draws and does not
//! restore anything on the overlay's behalf. Every overlay therefore calls
//! [`SceneRenderer::reset_state`] immediately before each
//! [`SceneRenderer::render`], and leaves the context as-is afterwards.

use std::fmt;
use std::rc::Rc;

use terra_scene::{Camera, Scene};

/// The drawing target a host shares with its overlays.
pub trait SharedSurface: fmt::Debug {
    /// Human readable name, for logs.
    fn label(&self) -> &str;
}

/// Cheap-clone handle to the host's graphics context.
#[derive(Clone, Debug)]
pub struct GraphicsContext {
    surface: Rc<dyn SharedSurface>,
}

impl GraphicsContext {
    pub fn new(surface: Rc<dyn SharedSurface>) -> Self {
        Self { surface }
    }

    #[inline]
    #[must_use]
    pub fn surface(&self) -> &Rc<dyn SharedSurface> {
        &self.surface
    }

    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        self.surface.label()
    }

    /// Whether both handles point at the same underlying context.
    #[must_use]
    pub fn same_context(&self, other: &GraphicsContext) -> bool {
        Rc::ptr_eq(&self.surface, &other.surface)
    }
}

/// Draws one overlay scene into the shared context.
pub trait SceneRenderer {
    /// Forgets every piece of context state this renderer may have cached.
    fn reset_state(&mut self);

    fn render(&mut self, scene: &Scene, camera: &Camera);

    /// Releases renderer-owned resources. Called once, on detach.
    fn dispose(&mut self) {}
}

/// Creates renderers bound to a given context.
pub trait RendererBackend {
    fn create_renderer(&self, context: &GraphicsContext) -> Box<dyn SceneRenderer>;
}
