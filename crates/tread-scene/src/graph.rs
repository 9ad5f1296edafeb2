//! SceneGraph - named node hierarchy with local transforms

use std::collections::HashMap;
use tread_core::{NodeId, Result, Transform, TreadError, Vec3};

/// Name of the root node every graph starts with
pub const ROOT_NAME: &str = "render";

/// A single node in the graph
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    /// Transform relative to the parent
    pub local: Transform,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Take position from the parent but keep rotation in world space
    compass: bool,
}

impl SceneNode {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            local: Transform::default(),
            parent,
            children: Vec::new(),
            compass: false,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_compass(&self) -> bool {
        self.compass
    }
}

/// Node hierarchy with name lookup.
///
/// Every node except the root has exactly one parent; `reparent` refuses to
/// create cycles.
pub struct SceneGraph {
    nodes: HashMap<NodeId, SceneNode>,
    /// Node name -> NodeId mapping
    name_map: HashMap<String, NodeId>,
    root: NodeId,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph containing only the root node
    pub fn new() -> Self {
        let root = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(root, SceneNode::new(ROOT_NAME.to_string(), None));
        let mut name_map = HashMap::new();
        name_map.insert(ROOT_NAME.to_string(), root);
        Self {
            nodes,
            name_map,
            root,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a new node under `parent`
    pub fn attach_new_node(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId> {
        let name = name.into();

        if self.name_map.contains_key(&name) {
            return Err(TreadError::DuplicateNodeName(name));
        }
        let parent_node = self
            .nodes
            .get_mut(&parent)
            .ok_or_else(|| TreadError::NodeNotFound(parent.to_string()))?;

        let id = NodeId::new();
        parent_node.children.push(id);
        self.nodes.insert(id, SceneNode::new(name.clone(), Some(parent)));
        self.name_map.insert(name, id);

        tracing::debug!(node = %id, parent = %parent, "attached scene node");
        Ok(id)
    }

    /// Move a node (and its subtree) under a new parent
    pub fn reparent(&mut self, node: NodeId, new_parent: NodeId) -> Result<()> {
        if node == self.root {
            return Err(TreadError::InvalidReparent("cannot reparent the root".into()));
        }
        if !self.nodes.contains_key(&new_parent) {
            return Err(TreadError::NodeNotFound(new_parent.to_string()));
        }
        // Walk up from the new parent; meeting `node` means a cycle
        let mut cursor = Some(new_parent);
        while let Some(current) = cursor {
            if current == node {
                return Err(TreadError::InvalidReparent(format!(
                    "{} is an ancestor of {}",
                    node, new_parent
                )));
            }
            cursor = self.nodes.get(&current).and_then(|n| n.parent);
        }

        let old_parent = self.node(node)?.parent;
        if let Some(old) = old_parent.and_then(|p| self.nodes.get_mut(&p)) {
            old.children.retain(|c| *c != node);
        }
        if let Some(parent) = self.nodes.get_mut(&new_parent) {
            parent.children.push(node);
        }
        if let Some(n) = self.nodes.get_mut(&node) {
            n.parent = Some(new_parent);
        }
        Ok(())
    }

    /// Remove a node and everything below it
    pub fn remove_node(&mut self, node: NodeId) -> Result<()> {
        if node == self.root {
            return Err(TreadError::InvalidReparent("cannot remove the root".into()));
        }
        let parent = self.node(node)?.parent;
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.retain(|c| *c != node);
        }

        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.nodes.remove(&id) {
                self.name_map.remove(&removed.name);
                stack.extend(removed.children);
            }
        }
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Result<&SceneNode> {
        self.nodes
            .get(&id)
            .ok_or_else(|| TreadError::NodeNotFound(id.to_string()))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| TreadError::NodeNotFound(id.to_string()))
    }

    /// Look up a node by name
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.name_map.get(name).copied()
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.name.as_str())
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // --- Local transform accessors ---

    pub fn set_compass(&mut self, id: NodeId, compass: bool) -> Result<()> {
        self.node_mut(id)?.compass = compass;
        Ok(())
    }

    pub fn local(&self, id: NodeId) -> Result<Transform> {
        Ok(self.node(id)?.local)
    }

    pub fn pos(&self, id: NodeId) -> Result<Vec3> {
        Ok(self.node(id)?.local.position)
    }

    pub fn set_pos(&mut self, id: NodeId, position: Vec3) -> Result<()> {
        self.node_mut(id)?.local.position = position;
        Ok(())
    }

    /// Heading in degrees
    pub fn h(&self, id: NodeId) -> Result<f32> {
        Ok(self.node(id)?.local.rotation.y)
    }

    pub fn set_h(&mut self, id: NodeId, heading: f32) -> Result<()> {
        self.node_mut(id)?.local.rotation.y = heading;
        Ok(())
    }

    /// Pitch in degrees
    pub fn p(&self, id: NodeId) -> Result<f32> {
        Ok(self.node(id)?.local.rotation.x)
    }

    pub fn set_p(&mut self, id: NodeId, pitch: f32) -> Result<()> {
        self.node_mut(id)?.local.rotation.x = pitch;
        Ok(())
    }

    /// Compose the parent chain into a world-space transform
    pub fn world_transform(&self, id: NodeId) -> Result<Transform> {
        let (position, rotation, scale) = self.world_parts(id)?;
        let (h, p, r) = rotation.to_euler(glam::EulerRot::YXZ);
        Ok(Transform {
            position,
            rotation: Vec3::new(p.to_degrees(), h.to_degrees(), r.to_degrees()),
            scale,
        })
    }

    pub fn world_position(&self, id: NodeId) -> Result<Vec3> {
        Ok(self.world_parts(id)?.0)
    }

    fn world_parts(&self, id: NodeId) -> Result<(Vec3, glam::Quat, Vec3)> {
        let node = self.node(id)?;
        let local_rot = node.local.to_quat();

        let Some(parent) = node.parent else {
            return Ok((node.local.position, local_rot, node.local.scale));
        };

        let (parent_pos, parent_rot, parent_scale) = self.world_parts(parent)?;
        let scaled = glam::Vec3::from(node.local.position) * glam::Vec3::from(parent_scale);
        let position = Vec3::from(parent_rot * scaled) + parent_pos;
        let rotation = if node.compass {
            local_rot
        } else {
            parent_rot * local_rot
        };
        let scale = Vec3::new(
            parent_scale.x * node.local.scale.x,
            parent_scale.y * node.local.scale.y,
            parent_scale.z * node.local.scale.z,
        );
        Ok((position, rotation, scale))
    }
}
