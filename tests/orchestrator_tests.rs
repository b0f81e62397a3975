//! Layer Orchestrator Tests
//!
//! Tests for:
//! - Listing to layers: order, longitude-first locations, skipped models
//! - Duplicate ids and pre-existing host layers
//! - Missing listing
//! - Shared animation loop lifecycle
//! - Teardown

mod support;

use std::f64::consts::PI;
use std::time::Duration;

use futures::executor::block_on;
use support::{Harness, RenderEvent};
use terra::assets::StaticListing;
use terra::core::{LightingProfile, LngLat, OverlaySettings};
use terra::layers::{
    CustomLayer, HostMap, HostView, LayerContext, LayerOrchestrator, ProjectionData,
};

const STATUE: &str = r#"{"lat": 40.0, "lon": -74.0}"#;
const TOWER: &str = r#"{"location": {"geo": {"lat": 51.5, "lon": -0.1}}}"#;

/// A foreign layer already registered with the host.
struct Placeholder(&'static str);

impl CustomLayer for Placeholder {
    fn id(&self) -> &str {
        self.0
    }

    fn on_add(&mut self, _host: &dyn HostView, _context: LayerContext) {}

    fn render(&mut self, _host: &dyn HostView, _projection: &ProjectionData) {}

    fn on_remove(&mut self) {}
}

fn initialize(h: &mut Harness, orchestrator: &mut LayerOrchestrator) -> Vec<terra::AssetLocation> {
    let locations = block_on(orchestrator.initialize(&mut h.host));
    h.run_tasks();
    locations
}

// ============================================================================
// Placement
// ============================================================================

#[test]
fn places_models_with_coordinates_in_listing_order() {
    let mut h = Harness::new();
    h.set_listing(&["statue.glb", "bogus.glb", "tower.glb"]);
    h.add_model("statue", Some(STATUE));
    h.add_model("bogus", Some("{}"));
    h.add_model("tower", Some(TOWER));

    let mut orchestrator = h.orchestrator();
    let locations = initialize(&mut h, &mut orchestrator);

    let names: Vec<_> = locations.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["statue", "tower"]);
    assert_eq!(locations[0].coordinates, LngLat::new(-74.0, 40.0));
    assert_eq!(locations[1].coordinates, LngLat::new(-0.1, 51.5));

    assert_eq!(h.host.layer_ids(), ["3d-model-statue", "3d-model-tower"]);
    assert_eq!(orchestrator.layer_ids(), ["3d-model-statue", "3d-model-tower"]);

    let controller = orchestrator.controller();
    assert!(controller.contains("statue"));
    assert!(controller.contains("tower"));
    assert!(!controller.contains("bogus"));
}

#[test]
fn models_without_metadata_are_skipped() {
    let mut h = Harness::new();
    h.set_listing(&["statue.glb", "orphan.glb"]);
    h.add_model("statue", Some(STATUE));
    h.add_model("orphan", None);

    let mut orchestrator = h.orchestrator();
    let locations = initialize(&mut h, &mut orchestrator);

    assert_eq!(locations.len(), 1);
    assert!(!h.host.has_layer("3d-model-orphan"));
}

#[test]
fn layers_share_the_host_context() {
    let mut h = Harness::new();
    h.set_listing(&["statue.glb", "tower.glb"]);
    h.add_model("statue", Some(STATUE));
    h.add_model("tower", Some(TOWER));

    let mut orchestrator = h.orchestrator();
    initialize(&mut h, &mut orchestrator);

    let contexts = h.backend.contexts.borrow();
    assert_eq!(contexts.len(), 2);
    assert!(contexts.iter().all(|c| c.same_context(h.host.graphics())));
}

#[test]
fn empty_listing_places_nothing() {
    let mut h = Harness::new();
    h.set_listing(&[]);

    let mut orchestrator = h.orchestrator();
    let locations = initialize(&mut h, &mut orchestrator);

    assert!(locations.is_empty());
    assert!(h.host.layer_ids().is_empty());
}

#[test]
fn static_listing_replaces_json_listing() {
    let mut h = Harness::new();
    h.add_model("statue", Some(STATUE));

    let mut orchestrator = h
        .orchestrator()
        .with_listing(StaticListing::new(["statue.glb"].as_slice(), ["glb"].as_slice()));
    let locations = initialize(&mut h, &mut orchestrator);

    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].name, "statue");
}

#[test]
fn lighting_profile_comes_from_settings() {
    let mut h = Harness::new();
    h.set_listing(&["statue.glb"]);
    h.add_model("statue", Some(STATUE));

    let mut settings = OverlaySettings::default();
    settings.lighting = LightingProfile::Enhanced;
    let mut orchestrator = LayerOrchestrator::new(settings, h.reader.clone().into(), h.runtime());
    initialize(&mut h, &mut orchestrator);

    h.host.render_frame();
    let Some(RenderEvent::Render { lights, .. }) = h.backend.last_render() else {
        panic!("expected a render");
    };
    assert_eq!(lights, 3);
}

// ============================================================================
// Duplicates
// ============================================================================

#[test]
fn duplicate_asset_ids_keep_the_first_entry() {
    let mut h = Harness::new();
    h.set_listing(&["statue.glb", "statue.gltf"]);
    h.add_model("statue", Some(STATUE));

    let mut orchestrator = h.orchestrator();
    let locations = initialize(&mut h, &mut orchestrator);

    assert_eq!(locations.len(), 1);
    assert_eq!(h.host.layer_ids(), ["3d-model-statue"]);
    assert_eq!(h.backend.contexts.borrow().len(), 1);
    assert!(orchestrator.controller().contains("statue"));
}

#[test]
fn existing_host_layer_is_left_alone() {
    let mut h = Harness::new();
    h.set_listing(&["statue.glb", "tower.glb"]);
    h.add_model("statue", Some(STATUE));
    h.add_model("tower", Some(TOWER));
    h.host.add_layer(Box::new(Placeholder("3d-model-statue"))).unwrap();

    let mut orchestrator = h.orchestrator();
    let locations = initialize(&mut h, &mut orchestrator);

    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].name, "tower");
    assert_eq!(orchestrator.layer_ids(), ["3d-model-tower"]);
    assert!(!orchestrator.controller().contains("statue"));
}

// ============================================================================
// Listing Failure
// ============================================================================

#[test]
fn missing_listing_yields_no_locations_and_no_loop() {
    let mut h = Harness::new();
    h.add_model("statue", Some(STATUE));

    let mut orchestrator = h.orchestrator();
    let locations = initialize(&mut h, &mut orchestrator);

    assert!(locations.is_empty());
    assert!(!orchestrator.animation_loop().is_running());
    assert_eq!(h.scheduler.pending_count(), 0);
}

#[test]
fn malformed_listing_yields_no_locations() {
    let mut h = Harness::new();
    h.reader.insert_text("api/models.json", r#"{"models": []}"#);

    let mut orchestrator = h.orchestrator();
    assert!(initialize(&mut h, &mut orchestrator).is_empty());
}

// ============================================================================
// Animation Loop
// ============================================================================

#[test]
fn initialize_starts_a_single_loop() {
    let mut h = Harness::new();
    h.set_listing(&["statue.glb", "tower.glb"]);
    h.add_model("statue", Some(STATUE));
    h.add_model("tower", Some(TOWER));

    let mut orchestrator = h.orchestrator();
    initialize(&mut h, &mut orchestrator);

    assert!(orchestrator.animation_loop().is_running());
    assert_eq!(h.scheduler.pending_count(), 1);
    h.frame(Duration::from_millis(16));
    assert_eq!(h.scheduler.pending_count(), 1);
}

#[test]
fn frames_rotate_every_model_in_phase() {
    let mut h = Harness::new();
    h.set_listing(&["statue.glb", "tower.glb"]);
    h.add_model("statue", Some(STATUE));
    h.add_model("tower", Some(TOWER));

    let mut orchestrator = h.orchestrator();
    initialize(&mut h, &mut orchestrator);

    for _ in 0..14 {
        h.frame(Duration::from_millis(500));
    }

    let controller = orchestrator.controller();
    assert!((controller.current_rotation("statue") - PI).abs() < 1e-9);
    assert!((controller.current_rotation("tower") - PI).abs() < 1e-9);
    assert!(h.backend.renders() >= 28);
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn teardown_removes_layers_and_stops_loop() {
    let mut h = Harness::new();
    h.set_listing(&["statue.glb", "tower.glb"]);
    h.add_model("statue", Some(STATUE));
    h.add_model("tower", Some(TOWER));
    h.host.add_layer(Box::new(Placeholder("3d-model-other"))).unwrap();

    let mut orchestrator = h.orchestrator();
    initialize(&mut h, &mut orchestrator);
    orchestrator.teardown(&mut h.host);

    assert_eq!(h.host.layer_ids(), ["3d-model-other"]);
    assert!(orchestrator.layer_ids().is_empty());
    assert!(orchestrator.controller().is_empty());
    assert!(!orchestrator.animation_loop().is_running());
    assert_eq!(h.scheduler.pending_count(), 0);
}
