//! Local task spawning
//!
//! Asset loads are futures that must run on the thread that owns the host's
//! draw loop (they touch `Rc` state and, in the browser, JS promises). A
//! [`TaskSpawner`] is where layers hand them off.

use futures::future::LocalBoxFuture;

pub trait TaskSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// Spawns onto a `futures` [`LocalPool`](futures::executor::LocalPool);
/// the host drives the pool between frames.
impl TaskSpawner for futures::executor::LocalSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        use futures::task::LocalSpawnExt;

        if let Err(err) = self.spawn_local(task) {
            log::error!("Failed to spawn local task: {err}");
        }
    }
}

/// Spawns with `tokio::task::spawn_local`. Must be used from inside a
/// `tokio::task::LocalSet`.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioLocalSpawner;

#[cfg(not(target_arch = "wasm32"))]
impl TaskSpawner for TokioLocalSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        drop(tokio::task::spawn_local(task));
    }
}

/// Spawns onto the browser microtask queue.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct WasmSpawner;

#[cfg(target_arch = "wasm32")]
impl TaskSpawner for WasmSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
