//! Arena-backed transform hierarchy
//!
//! Nodes live in a flat vector and refer to each other by [`NodeId`]. What a
//! node *is* (plain group, renderable mesh, annotation marker) is carried by
//! the [`NodeKind`] tag rather than by separate node types, so traversals can
//! ask "is this a hotspot" with a match.

use crate::bounds::BoundingBox;
use crate::hotspot::Hotspot;
use crate::mesh::Primitive;
use crate::transform::Transform3D;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Index of a node inside a [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// What a node carries besides its transform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeKind {
    Group,
    Mesh(Primitive),
    Hotspot(Hotspot),
}

/// A node of the hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    /// Transform relative to the parent
    pub transform: Transform3D,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn primitive(&self) -> Option<&Primitive> {
        match &self.kind {
            NodeKind::Mesh(primitive) => Some(primitive),
            _ => None,
        }
    }

    pub fn hotspot(&self) -> Option<&Hotspot> {
        match &self.kind {
            NodeKind::Hotspot(hotspot) => Some(hotspot),
            _ => None,
        }
    }

    pub fn hotspot_mut(&mut self) -> Option<&mut Hotspot> {
        match &mut self.kind {
            NodeKind::Hotspot(hotspot) => Some(hotspot),
            _ => None,
        }
    }
}

/// A transform hierarchy with a single root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneGraph {
    nodes: Vec<Option<Node>>,
    /// Vacant slots, reused before the arena grows
    #[serde(default)]
    free: Vec<usize>,
    root: NodeId,
}

impl SceneGraph {
    /// Create a graph holding only an identity root group
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Some(Node {
                name: root_name.into(),
                transform: Transform3D::identity(),
                kind: NodeKind::Group,
                parent: None,
                children: Vec::new(),
            })],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    /// Convenience constructor for a single-mesh model
    pub fn from_primitive(name: impl Into<String>, primitive: Primitive) -> Self {
        let mut graph = Self::new("Model");
        graph.nodes.push(Some(Node {
            name: name.into(),
            transform: Transform3D::identity(),
            kind: NodeKind::Mesh(primitive),
            parent: Some(graph.root),
            children: Vec::new(),
        }));
        if let Some(root) = graph.nodes[0].as_mut() {
            root.children.push(NodeId(1));
        }
        graph
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Allocated arena slots, live or vacant
    pub fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(|n| n.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(|n| n.as_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or(Error::NodeNotFound(id.0))
    }

    /// Children of `id`, empty for unknown ids
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// Attach a new node under `parent`
    pub fn add_node(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        kind: NodeKind,
        transform: Transform3D,
    ) -> Result<NodeId> {
        self.node(parent)?;
        let node = Some(Node {
            name: name.into(),
            transform,
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        let id = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                NodeId(slot)
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        };
        if let Some(parent) = self.get_mut(parent) {
            parent.children.push(id);
        }
        Ok(id)
    }

    pub fn add_group(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId> {
        self.add_node(parent, name, NodeKind::Group, Transform3D::identity())
    }

    /// Detach `id` and drop its whole subtree. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::InvalidData("cannot remove the scene root".to_string()));
        }
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent.and_then(|p| self.get_mut(p)) {
            parent.children.retain(|c| *c != id);
        }
        for descendant in self.descendants(id) {
            self.nodes[descendant.0] = None;
            self.free.push(descendant.0);
        }
        Ok(())
    }

    /// Drop every child subtree of `id`
    pub fn clear_children(&mut self, id: NodeId) -> Result<()> {
        let children = self.node(id)?.children.clone();
        for child in children {
            self.remove(child)?;
        }
        Ok(())
    }

    /// `id` followed by all of its descendants in depth-first pre-order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            order.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        order
    }

    /// Product of local transforms from the root down to `id`
    pub fn world_transform(&self, id: NodeId) -> Transform3D {
        let mut transform = Transform3D::identity();
        let mut current = self.get(id);
        while let Some(node) = current {
            transform = node.transform * transform;
            current = node.parent.and_then(|p| self.get(p));
        }
        transform
    }

    /// Copy every node of `other` under `parent`, returning the id that
    /// `other`'s root received.
    pub fn graft(&mut self, parent: NodeId, other: &SceneGraph) -> Result<NodeId> {
        self.node(parent)?;
        let mut grafted_root = None;
        let mut stack = vec![(other.root, parent)];
        while let Some((source, target_parent)) = stack.pop() {
            let Some(node) = other.get(source) else {
                continue;
            };
            let id = self.add_node(target_parent, node.name.clone(), node.kind.clone(), node.transform)?;
            grafted_root.get_or_insert(id);
            stack.extend(node.children.iter().rev().map(|c| (*c, id)));
        }
        grafted_root.ok_or_else(|| Error::InvalidData("grafted graph has no root".to_string()))
    }

    /// Bounds of `id`'s subtree in `id`'s local space from each primitive's
    /// own box. Cheaper than visiting every vertex, but may be loose under
    /// rotation.
    pub fn loose_bounds(&self, id: NodeId) -> BoundingBox {
        let mut bounds = BoundingBox::empty();
        let mut stack = vec![(id, Transform3D::identity())];
        while let Some((current, relative)) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            if let Some(primitive) = node.primitive() {
                let local = primitive.local_bounds();
                for instance in primitive.instance_transforms() {
                    bounds = bounds.union(&local.transformed(&(relative * instance)));
                }
            }
            for child in &node.children {
                if let Some(child_node) = self.get(*child) {
                    stack.push((*child, relative * child_node.transform));
                }
            }
        }
        bounds
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new("Scene")
    }
}
