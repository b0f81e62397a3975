use glam::{Affine3A, Mat4};
use slotmap::SlotMap;

use crate::light::Light;
use crate::node::Node;
use crate::prefab::{MeshData, Prefab};
use crate::{MeshHandle, NodeHandle};

/// Scene graph root owned by one model layer.
///
/// Pure data: nodes, their meshes and the lighting rig. Renderers read it,
/// they never mutate it.
#[derive(Debug, Default)]
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,
    pub meshes: SlotMap<MeshHandle, MeshData>,
    pub lights: Vec<Light>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Inserts `node` as a new root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Re-parents `child` under `parent`.
    ///
    /// Ignored when either handle is stale or when it would create a cycle.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent
            || !self.nodes.contains_key(child)
            || !self.nodes.contains_key(parent)
            || self.is_ancestor(child, parent)
        {
            log::warn!("Scene::attach ignored: invalid or cyclic parenting");
            return;
        }

        self.detach(child);

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
            node.transform.mark_dirty();
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        self.root_nodes.retain(|&h| h != child);
    }

    /// Removes `handle`, its whole subtree and the meshes they reference.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }
        self.detach(handle);
        self.root_nodes.retain(|&h| h != handle);

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                if let Some(mesh) = node.mesh {
                    self.meshes.remove(mesh);
                }
                stack.extend(node.children);
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name.as_deref() == Some(name))
            .map(|(handle, _)| handle)
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ========================================================================
    // Components
    // ========================================================================

    pub fn add_mesh(&mut self, mesh: MeshData) -> MeshHandle {
        self.meshes.insert(mesh)
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn add_lights(&mut self, lights: impl IntoIterator<Item = Light>) {
        self.lights.extend(lights);
    }

    /// Turns a prefab into live nodes under a single new root.
    ///
    /// The returned handle is the group root: rotating it rotates the whole
    /// model about its local origin.
    pub fn instantiate(&mut self, prefab: &Prefab) -> NodeHandle {
        let root = self.add_node(Node {
            name: prefab.name.clone(),
            ..Node::new()
        });

        let mut created: Vec<NodeHandle> = Vec::with_capacity(prefab.nodes.len());
        for prefab_node in &prefab.nodes {
            let mut node = Node::new();
            node.name.clone_from(&prefab_node.name);
            node.transform = prefab_node.transform.clone();
            node.transform.mark_dirty();

            let mut meshes = prefab_node.meshes.iter().cloned();
            node.mesh = meshes.next().map(|mesh| self.meshes.insert(mesh));

            let handle = self.nodes.insert(node);

            // Extra primitives hang off the node as identity children.
            for extra in meshes {
                let mesh = self.meshes.insert(extra);
                let child = self.nodes.insert(Node {
                    mesh: Some(mesh),
                    parent: Some(handle),
                    ..Node::new()
                });
                if let Some(node) = self.nodes.get_mut(handle) {
                    node.children.push(child);
                }
            }

            created.push(handle);
        }

        for (index, prefab_node) in prefab.nodes.iter().enumerate() {
            for &child_index in &prefab_node.children_indices {
                if let Some(&child) = created.get(child_index) {
                    self.link_prefab_edge(child, created[index]);
                }
            }
        }

        for &root_index in &prefab.root_indices {
            if let Some(&child) = created.get(root_index) {
                self.link_prefab_edge(child, root);
            }
        }

        root
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Propagates local matrices down from every root.
    pub fn update_matrix_world(&mut self) {
        let mut stack: Vec<(NodeHandle, Affine3A, bool)> = self
            .root_nodes
            .iter()
            .rev()
            .map(|&h| (h, Affine3A::IDENTITY, false))
            .collect();

        while let Some((handle, parent_world, parent_changed)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };

            let local_changed = node.transform.update_local_matrix();
            let changed = local_changed || parent_changed;
            if changed {
                let world = parent_world * *node.transform.local_matrix();
                node.transform.set_world_matrix(world);
            }

            let world = *node.transform.world_matrix();
            for &child in node.children.iter().rev() {
                stack.push((child, world, changed));
            }
        }
    }

    /// World matrix and mesh of every visible mesh node.
    ///
    /// Visibility is inherited: a hidden node hides its subtree.
    #[must_use]
    pub fn visible_meshes(&self) -> Vec<(Mat4, MeshHandle)> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeHandle> = self.root_nodes.iter().rev().copied().collect();

        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            if let Some(mesh) = node.mesh {
                out.push((node.transform.world_matrix_as_mat4(), mesh));
            }
            stack.extend(node.children.iter().rev());
        }

        out
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    /// Links one prefab edge, skipping edges that would give `child` a
    /// second parent or close a cycle. The scene stays a forest either way.
    fn link_prefab_edge(&mut self, child: NodeHandle, parent: NodeHandle) {
        let has_parent = self.nodes.get(child).is_none_or(|n| n.parent.is_some());
        if child == parent || has_parent || self.is_ancestor(child, parent) {
            log::warn!("Prefab edge skipped: node would get a second parent or a cycle");
            return;
        }
        self.link(child, parent);
    }

    fn link(&mut self, child: NodeHandle, parent: NodeHandle) {
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
    }

    fn detach(&mut self, child: NodeHandle) {
        let Some(parent) = self.nodes.get_mut(child).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|&h| h != child);
        }
        self.root_nodes.push(child);
    }

    fn is_ancestor(&self, ancestor: NodeHandle, mut node: NodeHandle) -> bool {
        while let Some(parent) = self.nodes.get(node).and_then(Node::parent) {
            if parent == ancestor {
                return true;
            }
            node = parent;
        }
        false
    }
}
