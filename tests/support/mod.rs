//! Shared doubles for the integration tests: a recording renderer backend,
//! a hand-built GLB model and a harness wiring a headless host to an
//! orchestrator over in-memory assets.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use futures::executor::LocalPool;
use glam::{Mat4, Vec3};
use terra::animation::ManualFrameScheduler;
use terra::assets::MemoryAssetReader;
use terra::core::{ManualClock, OverlaySettings};
use terra::layers::{
    GraphicsContext, HeadlessHost, LayerOrchestrator, OverlayRuntime, RendererBackend,
    SceneRenderer, SharedSurface,
};
use terra::scene::{Camera, Scene};

// ============================================================================
// Graphics doubles
// ============================================================================

#[derive(Debug)]
pub struct TestSurface(pub &'static str);

impl SharedSurface for TestSurface {
    fn label(&self) -> &str {
        self.0
    }
}

pub fn test_context(label: &'static str) -> GraphicsContext {
    GraphicsContext::new(Rc::new(TestSurface(label)))
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Created { context: String },
    Reset,
    Render {
        projection: Mat4,
        /// World position of vertex (1, 0, 0) of the first visible mesh.
        probe: Option<Vec3>,
        meshes: usize,
        lights: usize,
    },
    Dispose,
}

pub type EventLog = Rc<RefCell<Vec<(usize, RenderEvent)>>>;

/// Backend whose renderers append every call to one shared log, tagged with
/// the renderer's creation index.
#[derive(Default)]
pub struct RecordingBackend {
    pub events: EventLog,
    pub contexts: RefCell<Vec<GraphicsContext>>,
}

impl RecordingBackend {
    pub fn events(&self) -> Vec<(usize, RenderEvent)> {
        self.events.borrow().clone()
    }

    pub fn renders(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|(_, e)| matches!(e, RenderEvent::Render { .. }))
            .count()
    }

    pub fn last_render(&self) -> Option<RenderEvent> {
        self.events
            .borrow()
            .iter()
            .rev()
            .find(|(_, e)| matches!(e, RenderEvent::Render { .. }))
            .map(|(_, e)| e.clone())
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl RendererBackend for RecordingBackend {
    fn create_renderer(&self, context: &GraphicsContext) -> Box<dyn SceneRenderer> {
        let mut contexts = self.contexts.borrow_mut();
        let index = contexts.len();
        contexts.push(context.clone());
        self.events.borrow_mut().push((
            index,
            RenderEvent::Created {
                context: context.label().to_string(),
            },
        ));
        Box::new(RecordingRenderer {
            index,
            events: Rc::clone(&self.events),
        })
    }
}

struct RecordingRenderer {
    index: usize,
    events: EventLog,
}

impl SceneRenderer for RecordingRenderer {
    fn reset_state(&mut self) {
        self.events.borrow_mut().push((self.index, RenderEvent::Reset));
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) {
        let meshes = scene.visible_meshes();
        let probe = meshes
            .first()
            .map(|(world, _)| world.transform_point3(Vec3::X));
        self.events.borrow_mut().push((
            self.index,
            RenderEvent::Render {
                projection: camera.projection_matrix(),
                probe,
                meshes: meshes.len(),
                lights: scene.lights.len(),
            },
        ));
    }

    fn dispose(&mut self) {
        self.events.borrow_mut().push((self.index, RenderEvent::Dispose));
    }
}

// ============================================================================
// Assets
// ============================================================================

/// A one-triangle GLB: node "tri" at (0, 1, 0) carrying an indexed triangle
/// with a vertex at (1, 0, 0).
pub fn triangle_glb() -> Vec<u8> {
    let mut bin = Vec::new();
    for v in [[1.0f32, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]] {
        for c in v {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    let data_len = bin.len();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let mut json = format!(
        r#"{{"asset":{{"version":"2.0"}},"scene":0,"scenes":[{{"nodes":[0]}}],
        "nodes":[{{"name":"tri","mesh":0,"translation":[0,1,0]}}],
        "meshes":[{{"primitives":[{{"attributes":{{"POSITION":0}},"indices":1}}]}}],
        "buffers":[{{"byteLength":{data_len}}}],
        "bufferViews":[{{"buffer":0,"byteOffset":0,"byteLength":36}},{{"buffer":0,"byteOffset":36,"byteLength":6}}],
        "accessors":[
          {{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","min":[0,0,0],"max":[1,1,1]}},
          {{"bufferView":1,"componentType":5123,"count":3,"type":"SCALAR"}}]}}"#
    )
    .into_bytes();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut glb = Vec::with_capacity(total);
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total as u32).to_le_bytes());
    glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"JSON");
    glb.extend_from_slice(&json);
    glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"BIN\0");
    glb.extend_from_slice(&bin);
    glb
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

pub fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

// ============================================================================
// Harness
// ============================================================================

/// A headless host plus everything an orchestrator needs, all manual.
pub struct Harness {
    pub clock: ManualClock,
    pub scheduler: ManualFrameScheduler,
    pub pool: LocalPool,
    pub reader: MemoryAssetReader,
    pub backend: Rc<RecordingBackend>,
    pub host: HeadlessHost,
}

impl Harness {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            clock: ManualClock::new(),
            scheduler: ManualFrameScheduler::new(),
            pool: LocalPool::new(),
            reader: MemoryAssetReader::new(),
            backend: Rc::new(RecordingBackend::default()),
            host: HeadlessHost::new(test_context("shared-canvas")),
        }
    }

    pub fn runtime(&self) -> OverlayRuntime {
        OverlayRuntime {
            clock: Arc::new(self.clock.clone()),
            scheduler: Rc::new(self.scheduler.clone()),
            spawner: Rc::new(self.pool.spawner()),
            backend: Rc::clone(&self.backend) as Rc<dyn RendererBackend>,
        }
    }

    pub fn orchestrator(&self) -> LayerOrchestrator {
        LayerOrchestrator::new(
            OverlaySettings::default(),
            self.reader.clone().into(),
            self.runtime(),
        )
    }

    pub fn set_listing(&self, file_names: &[&str]) {
        let json = serde_json::to_string(file_names).unwrap();
        self.reader.insert_text("api/models.json", &json);
    }

    /// Adds `models/<id>.glb` and, if given, `models/<id>.txt`.
    pub fn add_model(&self, asset_id: &str, metadata: Option<&str>) {
        self.reader
            .insert(format!("models/{asset_id}.glb"), triangle_glb());
        if let Some(metadata) = metadata {
            self.reader
                .insert_text(format!("models/{asset_id}.txt"), metadata);
        }
    }

    /// Completes every pending asset load.
    pub fn run_tasks(&mut self) {
        self.pool.run_until_stalled();
    }

    /// Advances the clock, runs one scheduler frame, renders every layer.
    pub fn frame(&mut self, dt: Duration) {
        self.clock.advance(dt);
        self.scheduler.run_frame();
        self.host.render_frame();
    }
}
