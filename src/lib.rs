//! # Terra
//!
//! Geo-referenced, continuously animated 3D models for map renderers that
//! accept custom layers.
//!
//! A [`LayerOrchestrator`](layers::LayerOrchestrator) reads a model listing,
//! resolves each model's coordinates and registers one
//! [`ModelLayer`](layers::ModelLayer) per placed model with the host map.
//! Every layer draws into the host's own graphics context, placed by the
//! host's camera matrix and spun by one shared
//! [`AnimationController`](animation::AnimationController).
//!
//! ```rust,ignore
//! use terra::prelude::*;
//!
//! terra::init_logger();
//!
//! let mut orchestrator = LayerOrchestrator::from_settings(settings, runtime)?;
//! let locations = orchestrator.initialize(&mut host).await;
//! for location in &locations {
//!     log::info!("{} at {:?}", location.name, location.coordinates);
//! }
//! ```
//!
//! # Crates
//!
//! | Module        | Crate             |
//! |---------------|-------------------|
//! | [`core`]      | `terra_core`      |
//! | [`animation`] | `terra_animation` |
//! | [`scene`]     | `terra_scene`     |
//! | [`assets`]    | `terra_assets`    |
//! | [`layers`]    | `terra_layers`    |

pub use terra_animation as animation;
pub use terra_assets as assets;
pub use terra_core as core;
pub use terra_layers as layers;
pub use terra_scene as scene;

pub use terra_core::{AssetLocation, Error, LngLat, OverlaySettings, Result};

pub mod prelude {
    pub use terra_animation::{AnimationController, AnimationLoop, FrameScheduler, ManualFrameScheduler};
    pub use terra_assets::{AssetListing, AssetReaderVariant, MemoryAssetReader, ModelEntry, StaticListing};
    pub use terra_core::{
        AssetLocation, Clock, Error, LightingProfile, LngLat, ManualClock, OverlaySettings, Result,
        SystemClock,
    };
    pub use terra_layers::{
        CustomLayer, GraphicsContext, HeadlessHost, HostMap, HostView, LayerOrchestrator, LayerPhase,
        ModelLayer, OverlayRuntime, ProjectionData, RendererBackend, SceneRenderer, SharedSurface,
        TaskSpawner,
    };
    pub use terra_scene::{Camera, Scene};
}

/// Installs the platform logger.
///
/// Natively this is `env_logger` filtered by `RUST_LOG` (default `info`);
/// on `wasm32` it is `console_log` plus a panic hook forwarding to the
/// browser console. Calling it more than once is harmless.
pub fn init_logger() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init();
    }

    #[cfg(target_arch = "wasm32")]
    {
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        if console_log::init_with_level(log::Level::Info).is_err() {
            log::debug!("Logger already initialized");
        }
    }
}
