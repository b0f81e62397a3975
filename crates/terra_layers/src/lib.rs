//! Terra Layers
//!
//! The integration layer between a host map and animated 3D models:
//!
//! - [`host`]: the custom-layer contract ([`HostMap`], [`HostView`],
//!   [`CustomLayer`])
//! - [`renderer`]: the shared graphics context and the renderer seam
//! - [`placement`]: geographic placement matrices
//! - [`bridge`]: [`ModelLayer`], one animated model per host layer
//! - [`orchestrator`]: [`LayerOrchestrator`], listing to registered layers
//! - [`headless`]: an in-process host for headless runs
//! - [`task`]: local task spawning for asset loads

pub mod bridge;
pub mod headless;
pub mod host;
pub mod orchestrator;
pub mod placement;
pub mod renderer;
pub mod task;

pub use bridge::{LayerPhase, LayerServices, ModelLayer};
pub use headless::HeadlessHost;
pub use host::{CustomLayer, HostMap, HostView, LayerContext, ProjectionData, RepaintHandle};
pub use orchestrator::{LayerOrchestrator, OverlayRuntime};
pub use placement::{MercatorHostTransform, ModelPlacement, compose_model_matrix};
pub use renderer::{GraphicsContext, RendererBackend, SceneRenderer, SharedSurface};
#[cfg(not(target_arch = "wasm32"))]
pub use task::TokioLocalSpawner;
pub use task::TaskSpawner;
#[cfg(target_arch = "wasm32")]
pub use task::WasmSpawner;
