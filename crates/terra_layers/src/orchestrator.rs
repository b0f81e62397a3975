//! Layer Orchestrator
//!
//! Turns a model listing into registered host layers:
//!
//! 1. list the model files ([`AssetListing`]);
//! 2. start the shared animation loop;
//! 3. resolve every model's coordinates concurrently;
//! 4. for each model with coordinates, in listing order, add a
//!    [`ModelLayer`] to the host unless its id is already taken.
//!
//! The returned [`AssetLocation`]s are exactly the models that got a layer.
//! No per-model failure escapes: missing coordinates and duplicate ids are
//! logged and skipped, and a failed listing yields an empty result.

use std::rc::Rc;
use std::sync::Arc;

use futures::future::join_all;
use terra_animation::{AnimationController, AnimationLoop, FrameScheduler};
use terra_assets::{AssetListing, AssetReaderVariant, CoordinateResolver, JsonListing, ModelLoader};
use terra_core::{AssetLocation, Clock, OverlaySettings, Result};

use crate::bridge::{LayerServices, ModelLayer};
use crate::host::HostMap;
use crate::placement::ModelPlacement;
use crate::renderer::RendererBackend;
use crate::task::TaskSpawner;

/// Platform pieces the overlay runs on.
#[derive(Clone)]
pub struct OverlayRuntime {
    pub clock: Arc<dyn Clock>,
    pub scheduler: Rc<dyn FrameScheduler>,
    pub spawner: Rc<dyn TaskSpawner>,
    pub backend: Rc<dyn RendererBackend>,
}

pub struct LayerOrchestrator {
    settings: OverlaySettings,
    listing: Box<dyn AssetListing>,
    resolver: CoordinateResolver,
    services: LayerServices,
    animation_loop: AnimationLoop,
    layer_ids: Vec<String>,
}

impl LayerOrchestrator {
    /// Builds an orchestrator reading everything through `reader`, listing
    /// models from `settings.listing_uri`.
    #[must_use]
    pub fn new(settings: OverlaySettings, reader: AssetReaderVariant, runtime: OverlayRuntime) -> Self {
        let controller = AnimationController::with_cycle(runtime.clock, settings.rotation);
        let animation_loop = AnimationLoop::new(controller.clone(), runtime.scheduler);

        let listing = JsonListing::new(
            reader.clone(),
            settings.listing_uri.clone(),
            settings.model_extensions.clone(),
        );
        let resolver = CoordinateResolver::from_settings(reader.clone(), &settings);
        let services = LayerServices {
            controller,
            loader: ModelLoader::from_settings(reader, &settings),
            spawner: runtime.spawner,
            backend: runtime.backend,
            lighting: settings.lighting,
        };

        Self {
            settings,
            listing: Box::new(listing),
            resolver,
            services,
            animation_loop,
            layer_ids: Vec::new(),
        }
    }

    /// Like [`new`](Self::new), picking the reader from `settings.asset_root`.
    pub fn from_settings(settings: OverlaySettings, runtime: OverlayRuntime) -> Result<Self> {
        let reader = AssetReaderVariant::from_source(&settings.asset_root)?;
        Ok(Self::new(settings, reader, runtime))
    }

    /// Replaces the JSON listing with another source.
    #[must_use]
    pub fn with_listing(mut self, listing: impl AssetListing + 'static) -> Self {
        self.listing = Box::new(listing);
        self
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn controller(&self) -> &AnimationController {
        &self.services.controller
    }

    #[inline]
    #[must_use]
    pub fn animation_loop(&self) -> &AnimationLoop {
        &self.animation_loop
    }

    /// Ids of the layers this orchestrator added and has not torn down.
    #[inline]
    #[must_use]
    pub fn layer_ids(&self) -> &[String] {
        &self.layer_ids
    }

    pub async fn initialize(&mut self, host: &mut dyn HostMap) -> Vec<AssetLocation> {
        let entries = match self.listing.list().await {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("Model listing unavailable, placing no models: {err}");
                return Vec::new();
            }
        };

        self.animation_loop.start();

        let resolver = &self.resolver;
        let coordinates =
            join_all(entries.iter().map(|entry| resolver.resolve(&entry.asset_id))).await;

        let mut locations = Vec::with_capacity(entries.len());
        for (entry, coordinates) in entries.into_iter().zip(coordinates) {
            let Some(lng_lat) = coordinates else {
                log::info!("Skipping '{}': no coordinates", entry.asset_id);
                continue;
            };

            let layer_id = ModelLayer::layer_id(&entry.asset_id);
            if host.has_layer(&layer_id) {
                log::warn!("Layer '{layer_id}' already exists; skipping '{}'", entry.file_name);
                continue;
            }

            let asset_id = entry.asset_id.clone();
            let placement = ModelPlacement::from_defaults(lng_lat, &self.settings.placement);
            let layer = ModelLayer::new(entry, placement, self.services.clone());

            match host.add_layer(Box::new(layer)) {
                Ok(()) => {
                    self.layer_ids.push(layer_id);
                    locations.push(AssetLocation::new(asset_id, lng_lat));
                }
                Err(err) => log::warn!("Host rejected layer '{layer_id}': {err}"),
            }
        }

        log::info!("Placed {} model(s)", locations.len());
        locations
    }

    /// Removes every layer this orchestrator added and stops the loop.
    pub fn teardown(&mut self, host: &mut dyn HostMap) {
        for id in self.layer_ids.drain(..) {
            host.remove_layer(&id);
        }
        self.animation_loop.stop();
    }
}
