//! Headless globe
//!
//! Runs the whole overlay against [`HeadlessHost`]: reads the listing and
//! metadata under an asset root, places every model, then pumps a fixed
//! number of 60 Hz frames and logs where each model's rotation stands.
//!
//! ```text
//! cargo run -p headless_globe -- ./public 600
//! RUST_LOG=debug cargo run -p headless_globe -- https://example.org/globe/
//! ```
//!
//! The second argument is the frame count; an optional third names a JSON
//! settings file.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use terra::layers::TokioLocalSpawner;
use terra::prelude::*;

const FRAME: Duration = Duration::from_micros(16_667);
/// How long to wait for model files before animating whatever loaded.
const LOAD_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
struct DemoSurface;

impl SharedSurface for DemoSurface {
    fn label(&self) -> &str {
        "headless-canvas"
    }
}

/// Logs what a GPU renderer would draw.
struct LoggingBackend;

impl RendererBackend for LoggingBackend {
    fn create_renderer(&self, context: &GraphicsContext) -> Box<dyn SceneRenderer> {
        log::debug!("Renderer created on {}", context.label());
        Box::new(LoggingRenderer { frames: 0 })
    }
}

struct LoggingRenderer {
    frames: u64,
}

impl SceneRenderer for LoggingRenderer {
    fn reset_state(&mut self) {}

    fn render(&mut self, scene: &Scene, camera: &Camera) {
        self.frames += 1;
        if self.frames % 60 == 1 {
            let origin = camera.projection_matrix().project_point3(glam::Vec3::ZERO);
            log::trace!(
                "frame {}: {} mesh(es), {} light(s), origin at {origin:?}",
                self.frames,
                scene.visible_meshes().len(),
                scene.lights.len(),
            );
        }
    }

    fn dispose(&mut self) {
        log::debug!("Renderer disposed after {} frame(s)", self.frames);
    }
}

fn load_settings(asset_root: String, path: Option<String>) -> anyhow::Result<OverlaySettings> {
    let mut settings = match path {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading settings file {path}"))?;
            OverlaySettings::from_json_str(&json).context("parsing settings")?
        }
        None => OverlaySettings::default(),
    };
    settings.asset_root = asset_root;
    Ok(settings)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    terra::init_logger();

    // Layers spawn their loads with `spawn_local`.
    tokio::task::LocalSet::new().run_until(run()).await
}

async fn run() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let asset_root = args.next().unwrap_or_else(|| "./public".to_string());
    let frames: u32 = args.next().and_then(|n| n.parse().ok()).unwrap_or(600);
    let settings = load_settings(asset_root, args.next())?;

    let clock = ManualClock::new();
    let scheduler = ManualFrameScheduler::new();

    let runtime = OverlayRuntime {
        clock: Arc::new(clock.clone()),
        scheduler: Rc::new(scheduler.clone()),
        spawner: Rc::new(TokioLocalSpawner),
        backend: Rc::new(LoggingBackend),
    };

    let mut host = HeadlessHost::new(GraphicsContext::new(Rc::new(DemoSurface)));
    let mut orchestrator = LayerOrchestrator::from_settings(settings, runtime)
        .context("selecting an asset reader")?;

    let locations = orchestrator.initialize(&mut host).await;
    for location in &locations {
        log::info!(
            "{} at lng {:.4}, lat {:.4}",
            location.name,
            location.coordinates.lng,
            location.coordinates.lat
        );
    }
    if locations.is_empty() {
        log::warn!("Nothing to animate under '{}'", orchestrator.settings().asset_root);
        return Ok(());
    }

    let started = std::time::Instant::now();
    while orchestrator.controller().len() < locations.len() {
        if started.elapsed() > LOAD_TIMEOUT {
            log::warn!(
                "Only {} of {} model(s) loaded; animating those",
                orchestrator.controller().len(),
                locations.len()
            );
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    for frame in 1..=frames {
        clock.advance(FRAME);
        scheduler.run_frame();
        host.render_frame();

        if frame % 60 == 0 {
            let controller = orchestrator.controller();
            for location in &locations {
                log::info!(
                    "t={:>5.1}s {:<16} {:>6.1} deg",
                    clock.now().as_secs_f64(),
                    location.name,
                    controller.current_rotation(&location.name).to_degrees(),
                );
            }
        }
    }

    orchestrator.teardown(&mut host);
    log::info!(
        "Done: {frames} frame(s), {} repaint request(s)",
        host.repaint_requests()
    );
    Ok(())
}
