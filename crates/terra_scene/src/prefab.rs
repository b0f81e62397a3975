use crate::transform::Transform;

/// CPU-side triangle geometry of one mesh primitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub name: Option<String>,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// Triangle list indices; `None` means positions are already a triangle list.
    pub indices: Option<Vec<u32>>,
}

impl MeshData {
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices
            .as_ref()
            .map_or(self.positions.len(), Vec::len)
            / 3
    }
}

/// Prefab node: plain data, children referenced by index into [`Prefab::nodes`].
#[derive(Debug, Clone, Default)]
pub struct PrefabNode {
    pub name: Option<String>,
    pub transform: Transform,
    pub children_indices: Vec<usize>,
    pub meshes: Vec<MeshData>,
}

/// A decoded model, independent of any scene.
///
/// Produced by asset loaders and turned into live nodes with
/// [`Scene::instantiate`](crate::Scene::instantiate).
#[derive(Debug, Clone, Default)]
pub struct Prefab {
    pub name: Option<String>,
    pub nodes: Vec<PrefabNode>,
    pub root_indices: Vec<usize>,
}

impl Prefab {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.nodes.iter().map(|n| n.meshes.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
