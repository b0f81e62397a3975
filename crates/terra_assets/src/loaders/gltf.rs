use glam::{Quat, Vec3};
use terra_core::{AssetError, Error, Result};
use terra_scene::{MeshData, Prefab, PrefabNode, Transform};

fn format_error(err: &gltf::Error) -> Error {
    AssetError::Format(format!("glTF: {err}")).into()
}

fn hierarchy_error(detail: String) -> Error {
    AssetError::Format(format!("glTF node hierarchy: {detail}")).into()
}

/// Decodes glTF 2.0 (binary `.glb` or JSON `.gltf`) into a [`Prefab`].
///
/// Only what an overlay draws is kept: the default scene's node hierarchy,
/// TRS transforms and triangle geometry (positions, normals, indices).
/// Materials, skins and animations are ignored.
pub struct GltfLoader;

impl GltfLoader {
    /// Decodes a self-contained document. External buffers are not allowed
    /// here; use [`parse`](Self::parse) + [`build_prefab`](Self::build_prefab)
    /// when they must be fetched first.
    pub fn load_prefab(bytes: &[u8]) -> Result<Prefab> {
        let gltf = Self::parse(bytes)?;
        let buffers = Self::embedded_buffers(&gltf)?;
        Self::build_prefab(&gltf, &buffers)
    }

    pub fn parse(bytes: &[u8]) -> Result<gltf::Gltf> {
        gltf::Gltf::from_slice(bytes).map_err(|e| format_error(&e))
    }

    /// URIs of buffers stored outside the document, by buffer index.
    #[must_use]
    pub fn external_buffer_uris(gltf: &gltf::Gltf) -> Vec<(usize, String)> {
        gltf.buffers()
            .filter_map(|buffer| match buffer.source() {
                gltf::buffer::Source::Uri(uri) => Some((buffer.index(), uri.to_string())),
                gltf::buffer::Source::Bin => None,
            })
            .collect()
    }

    fn embedded_buffers(gltf: &gltf::Gltf) -> Result<Vec<Vec<u8>>> {
        let mut external = Self::external_buffer_uris(gltf).into_iter();
        if let Some((_, uri)) = external.next() {
            return Err(AssetError::Format(format!(
                "glTF references external buffer '{uri}'"
            ))
            .into());
        }
        Self::collect_buffers(gltf, Vec::new())
    }

    /// Orders buffer data by index: the GLB blob for `Bin` sources, the
    /// supplied bytes for `Uri` sources.
    pub fn collect_buffers(
        gltf: &gltf::Gltf,
        mut fetched: Vec<(usize, Vec<u8>)>,
    ) -> Result<Vec<Vec<u8>>> {
        let mut buffer_data = Vec::with_capacity(gltf.buffers().len());
        for buffer in gltf.buffers() {
            match buffer.source() {
                gltf::buffer::Source::Bin => {
                    let Some(blob) = gltf.blob.as_deref() else {
                        return Err(AssetError::Format("Missing GLB binary chunk".into()).into());
                    };
                    buffer_data.push(blob.to_vec());
                }
                gltf::buffer::Source::Uri(uri) => {
                    let position = fetched
                        .iter()
                        .position(|(index, _)| *index == buffer.index())
                        .ok_or_else(|| AssetError::NotFound(uri.to_string()))?;
                    buffer_data.push(fetched.swap_remove(position).1);
                }
            }

            if buffer_data.last().map_or(0, Vec::len) < buffer.length() {
                return Err(AssetError::Format(format!(
                    "buffer {} shorter than declared {} bytes",
                    buffer.index(),
                    buffer.length()
                ))
                .into());
            }
        }
        Ok(buffer_data)
    }

    pub fn build_prefab(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> Result<Prefab> {
        let mut prefab = Prefab::new();

        for node in gltf.nodes() {
            let (t, r, s) = node.transform().decomposed();
            let mut prefab_node = PrefabNode {
                name: node.name().map(str::to_string),
                transform: Transform::from_trs(
                    Vec3::from_array(t),
                    Quat::from_array(r),
                    Vec3::from_array(s),
                ),
                children_indices: node.children().map(|child| child.index()).collect(),
                meshes: Vec::new(),
            };

            if let Some(mesh) = node.mesh() {
                for primitive in mesh.primitives() {
                    if let Some(data) = Self::load_primitive(&mesh, &primitive, buffers) {
                        prefab_node.meshes.push(data);
                    }
                }
            }

            prefab.nodes.push(prefab_node);
        }

        if let Some(scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) {
            prefab.name = scene.name().map(str::to_string);
            prefab.root_indices = scene.nodes().map(|node| node.index()).collect();
        } else {
            // No scene: every parentless node is a root.
            let mut is_child = vec![false; prefab.nodes.len()];
            for node in &prefab.nodes {
                for &child in &node.children_indices {
                    if let Some(flag) = is_child.get_mut(child) {
                        *flag = true;
                    }
                }
            }
            prefab.root_indices = (0..prefab.nodes.len()).filter(|&i| !is_child[i]).collect();
        }

        Self::check_hierarchy(&prefab)?;

        log::debug!(
            "Decoded glTF: {} node(s), {} mesh primitive(s)",
            prefab.nodes.len(),
            prefab.mesh_count()
        );
        Ok(prefab)
    }

    /// The node graph must be a forest: every node has at most one parent,
    /// scene roots have none, and no parent chain loops back on itself.
    fn check_hierarchy(prefab: &Prefab) -> Result<()> {
        let count = prefab.nodes.len();
        let mut parents: Vec<Option<usize>> = vec![None; count];

        for (index, node) in prefab.nodes.iter().enumerate() {
            for &child in &node.children_indices {
                let Some(slot) = parents.get_mut(child) else {
                    return Err(hierarchy_error(format!("node {index} lists missing child {child}")));
                };
                if slot.replace(index).is_some() {
                    return Err(hierarchy_error(format!("node {child} has more than one parent")));
                }
            }
        }

        if let Some(root) = prefab
            .root_indices
            .iter()
            .find(|&&root| parents.get(root).copied().flatten().is_some())
        {
            return Err(hierarchy_error(format!("scene root {root} is also a child")));
        }

        for start in 0..count {
            let mut current = start;
            // A chain longer than the node count can only be a loop.
            for _ in 0..count {
                let Some(parent) = parents[current] else {
                    break;
                };
                if parent == start {
                    return Err(hierarchy_error(format!("node {start} is its own ancestor")));
                }
                current = parent;
            }
        }
        Ok(())
    }

    fn load_primitive(
        mesh: &gltf::Mesh,
        primitive: &gltf::Primitive,
        buffers: &[Vec<u8>],
    ) -> Option<MeshData> {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!(
                "Skipping primitive {} of mesh {:?}: mode {:?} is not drawn",
                primitive.index(),
                mesh.name(),
                primitive.mode()
            );
            return None;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

        let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
        if positions.is_empty() {
            return None;
        }
        let normals: Vec<[f32; 3]> = reader
            .read_normals()
            .map(Iterator::collect)
            .unwrap_or_default();
        let indices: Option<Vec<u32>> = reader.read_indices().map(|i| i.into_u32().collect());

        Some(MeshData {
            name: mesh.name().map(str::to_string),
            positions,
            normals,
            indices,
        })
    }
}
