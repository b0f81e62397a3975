//! Terra Scene
//!
//! The small scene graph each model overlay owns: a slotmap of nodes with
//! TRS transforms, decoded mesh data, a lighting rig and an externally driven
//! camera. Asset loaders produce [`Prefab`]s; [`Scene::instantiate`] turns
//! them into live nodes under one group root.

pub mod camera;
pub mod light;
pub mod node;
pub mod prefab;
pub mod scene;
pub mod transform;

pub use camera::Camera;
pub use light::{Light, LightKind, lighting_rig};
pub use node::Node;
pub use prefab::{MeshData, Prefab, PrefabNode};
pub use scene::Scene;
pub use transform::Transform;

slotmap::new_key_type! {
    /// Stable handle to a [`Node`] inside a [`Scene`].
    pub struct NodeHandle;
    /// Stable handle to a [`MeshData`] inside a [`Scene`].
    pub struct MeshHandle;
}
