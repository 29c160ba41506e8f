// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document: arena of model nodes
//!
//! Nodes live in a [`SlotMap`] and reference their materialized children by
//! [`NodeId`]. A document either has a scene (interactive, nodes get a
//! display root and ghost previews can be shown) or is headless.

use crate::error::{Error, Result};
use crate::node::{ModelNode, NodeId, RepresentationMode, ViewRoot};
use nativeifc_core::ElementId;
use nativeifc_geometry::color::sanitize;
use nativeifc_geometry::{Color, MeshGroup};
use rustc_hash::FxHashSet;
use slotmap::{SecondaryMap, SlotMap};

/// Scene graph root of an interactive document
#[derive(Debug, Clone, Default)]
pub struct Scene {
    ghost: Option<MeshGroup>,
}

/// Host document holding model nodes
#[derive(Debug, Default)]
pub struct Document {
    nodes: SlotMap<NodeId, ModelNode>,
    parents: SecondaryMap<NodeId, NodeId>,
    roots: Vec<NodeId>,
    scene: Option<Scene>,
}

impl Document {
    /// Headless document
    pub fn new() -> Self {
        Self::default()
    }

    /// Document with a scene: nodes get display roots
    pub fn with_scene() -> Self {
        Self {
            scene: Some(Scene::default()),
            ..Self::default()
        }
    }

    #[inline]
    pub fn has_scene(&self) -> bool {
        self.scene.is_some()
    }

    fn insert(&mut self, mut node: ModelNode) -> NodeId {
        if self.scene.is_some() && node.view.is_none() {
            node.view = Some(ViewRoot::new());
        }
        self.nodes.insert(node)
    }

    /// Add a top-level node
    pub fn add_node(&mut self, node: ModelNode) -> NodeId {
        let id = self.insert(node);
        self.roots.push(id);
        id
    }

    /// Add `node` to the group of `parent`
    pub fn add_child(&mut self, parent: NodeId, node: ModelNode) -> Result<NodeId> {
        if !self.nodes.contains_key(parent) {
            return Err(Error::NodeNotFound(parent));
        }
        let id = self.insert(node);
        self.nodes[parent].group.push(id);
        self.parents.insert(id, parent);
        Ok(id)
    }

    /// Remove a node and its whole sub-tree
    pub fn remove_node(&mut self, id: NodeId) -> Option<ModelNode> {
        let descendants = self.out_list_recursive(id);
        let node = self.nodes.remove(id)?;
        for child in descendants {
            self.nodes.remove(child);
            self.parents.remove(child);
        }
        if let Some(parent) = self.parents.remove(id) {
            if let Some(p) = self.nodes.get_mut(parent) {
                p.group.retain(|&c| c != id);
            }
        }
        self.roots.retain(|&r| r != id);
        Some(node)
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&ModelNode> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut ModelNode> {
        self.nodes.get_mut(id)
    }

    pub fn require(&self, id: NodeId) -> Result<&ModelNode> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    pub fn require_mut(&mut self, id: NodeId) -> Result<&mut ModelNode> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id).copied()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct materialized children
    pub fn group(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.group.as_slice()).unwrap_or(&[])
    }

    /// All nodes below `id`, depth first, each once
    pub fn out_list_recursive(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut seen = FxHashSet::default();
        seen.insert(id);
        let mut stack: Vec<NodeId> = self.group(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            result.push(current);
            stack.extend(self.group(current).iter().rev());
        }
        result
    }

    /// Elements backing the direct children of `id`
    pub fn child_elements(&self, id: NodeId) -> Vec<ElementId> {
        self.group(id)
            .iter()
            .filter_map(|&c| self.nodes.get(c)?.element)
            .collect()
    }

    /// Elements backing any node below `id`
    pub fn descendant_elements(&self, id: NodeId) -> Vec<ElementId> {
        self.out_list_recursive(id)
            .into_iter()
            .filter_map(|c| self.nodes.get(c)?.element)
            .collect()
    }

    /// Commit face colors onto a node
    ///
    /// Channels are made non-negative; the node's shape color becomes the
    /// first color. An empty list leaves the node untouched.
    pub fn set_colors(&mut self, id: NodeId, colors: &[Color]) -> Result<()> {
        let node = self.require_mut(id)?;
        let colors = sanitize(colors);
        let Some(first) = colors.first() else {
            return Ok(());
        };
        node.shape_color = Some([first[0], first[1], first[2]]);
        node.diffuse_color = colors;
        Ok(())
    }

    /// Concatenate the color lists of the direct children onto `id`
    ///
    /// The node keeps its own colors when no child has any.
    pub fn aggregate_child_colors(&mut self, id: NodeId) -> Result<Vec<Color>> {
        let colors: Vec<Color> = self
            .require(id)?
            .group
            .iter()
            .filter_map(|&c| self.nodes.get(c))
            .flat_map(|c| c.diffuse_color.iter().copied())
            .collect();
        if !colors.is_empty() {
            self.require_mut(id)?.diffuse_color = colors.clone();
        }
        Ok(colors)
    }

    /// Toggle a node between solid and mesh representation
    ///
    /// Switching away from solid drops the solid. Nodes without
    /// representation are left alone. Returns whether the mode changed.
    pub fn switch_shape(&mut self, id: NodeId) -> Result<bool> {
        let node = self.require_mut(id)?;
        match node.mode {
            RepresentationMode::Solid => {
                node.mode = RepresentationMode::Mesh;
                node.shape = None;
                Ok(true)
            }
            RepresentationMode::Mesh => {
                node.mode = RepresentationMode::Solid;
                Ok(true)
            }
            RepresentationMode::None => Ok(false),
        }
    }

    /// Reveal a node and its hidden descendants as meshes
    ///
    /// Every node in [`RepresentationMode::None`] among `id` and its
    /// descendants switches to [`RepresentationMode::Mesh`]. Returns the
    /// changed nodes.
    pub fn switch_mesh(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        self.require(id)?;
        let mut changed = Vec::new();
        for node_id in std::iter::once(id).chain(self.out_list_recursive(id)) {
            if let Some(node) = self.nodes.get_mut(node_id) {
                if node.mode == RepresentationMode::None {
                    node.mode = RepresentationMode::Mesh;
                    changed.push(node_id);
                }
            }
        }
        Ok(changed)
    }

    /// Re-arm cached generation after the document was loaded
    ///
    /// Every descendant of `root` that does not hold its geometry becomes
    /// fresh again. Returns the nodes that need a recompute.
    pub fn mark_restored(&mut self, root: NodeId) -> Result<Vec<NodeId>> {
        self.require(root)?;
        let mut touched = Vec::new();
        for id in self.out_list_recursive(root) {
            if let Some(node) = self.nodes.get_mut(id) {
                if !node.hold_shape {
                    node.fresh = true;
                    touched.push(id);
                }
            }
        }
        Ok(touched)
    }

    /// Current ghost preview
    pub fn ghost(&self) -> Option<&MeshGroup> {
        self.scene.as_ref()?.ghost.as_ref()
    }

    pub(crate) fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }
}

impl Scene {
    pub(crate) fn set_ghost(&mut self, ghost: MeshGroup) {
        self.ghost = Some(ghost);
    }

    pub(crate) fn take_ghost(&mut self) -> Option<MeshGroup> {
        self.ghost.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nativeifc_core::{Element, IfcModel, IfcType};
    use std::sync::Arc;

    fn file() -> Arc<IfcModel> {
        let mut model = IfcModel::new();
        for (id, ty) in [(1, IfcType::IfcBuilding), (2, IfcType::IfcBuildingStorey), (3, IfcType::IfcWall)] {
            model.add_element(Element::new(id, ty)).unwrap();
        }
        Arc::new(model)
    }

    fn tree(doc: &mut Document) -> (NodeId, NodeId, NodeId) {
        let file = file();
        let root = doc.add_node(ModelNode::new(file.clone(), Some(ElementId(1)), RepresentationMode::Solid));
        let storey = doc
            .add_child(root, ModelNode::new(file.clone(), Some(ElementId(2)), RepresentationMode::None))
            .unwrap();
        let wall = doc
            .add_child(storey, ModelNode::new(file, Some(ElementId(3)), RepresentationMode::None))
            .unwrap();
        (root, storey, wall)
    }

    #[test]
    fn test_tree_queries() {
        let mut doc = Document::new();
        let (root, storey, wall) = tree(&mut doc);
        assert_eq!(doc.group(root), &[storey]);
        assert_eq!(doc.out_list_recursive(root), vec![storey, wall]);
        assert_eq!(doc.child_elements(root), vec![ElementId(2)]);
        assert_eq!(doc.descendant_elements(root), vec![ElementId(2), ElementId(3)]);
        assert_eq!(doc.parent(wall), Some(storey));
    }

    #[test]
    fn test_scene_gives_display_roots() {
        let mut headless = Document::new();
        let (root, _, _) = tree(&mut headless);
        assert!(headless.node(root).unwrap().view.is_none());

        let mut interactive = Document::with_scene();
        let (root, _, wall) = tree(&mut interactive);
        assert!(interactive.node(root).unwrap().view.is_some());
        assert!(interactive.node(wall).unwrap().view.is_some());
    }

    #[test]
    fn test_remove_node() {
        let mut doc = Document::new();
        let (root, storey, wall) = tree(&mut doc);
        assert!(doc.remove_node(storey).is_some());
        assert!(doc.node(wall).is_none());
        assert!(doc.group(root).is_empty());
        assert_eq!(doc.len(), 1);
        assert!(matches!(doc.require(storey), Err(Error::NodeNotFound(_))));
    }

    #[test]
    fn test_set_colors_sanitizes() {
        let mut doc = Document::new();
        let (root, _, _) = tree(&mut doc);
        doc.set_colors(root, &[[-1.0, -1.0, -1.0, 0.0], [0.5, 0.5, 0.5, 0.0]]).unwrap();
        let node = doc.node(root).unwrap();
        assert_eq!(node.shape_color, Some([1.0, 1.0, 1.0]));
        assert_eq!(node.diffuse_color.len(), 2);

        doc.set_colors(root, &[]).unwrap();
        assert_eq!(doc.node(root).unwrap().diffuse_color.len(), 2);
    }

    #[test]
    fn test_aggregate_child_colors() {
        let mut doc = Document::new();
        let (root, storey, wall) = tree(&mut doc);
        doc.set_colors(wall, &[[1.0, 0.0, 0.0, 0.0]; 6]).unwrap();
        assert!(doc.aggregate_child_colors(root).unwrap().is_empty());
        assert_eq!(doc.aggregate_child_colors(storey).unwrap().len(), 6);
        assert_eq!(doc.aggregate_child_colors(root).unwrap().len(), 6);
        assert_eq!(doc.node(root).unwrap().diffuse_color.len(), 6);
    }

    #[test]
    fn test_mode_switching() {
        let mut doc = Document::new();
        let (root, storey, wall) = tree(&mut doc);
        doc.node_mut(root).unwrap().shape = Some(nativeifc_geometry::Shape::make_box(1.0, 1.0, 1.0));

        assert!(doc.switch_shape(root).unwrap());
        assert_eq!(doc.node(root).unwrap().mode, RepresentationMode::Mesh);
        assert!(doc.node(root).unwrap().shape.is_none());
        assert!(doc.switch_shape(root).unwrap());
        assert_eq!(doc.node(root).unwrap().mode, RepresentationMode::Solid);
        assert!(!doc.switch_shape(storey).unwrap());

        assert_eq!(doc.switch_mesh(root).unwrap(), vec![storey, wall]);
        assert_eq!(doc.node(wall).unwrap().mode, RepresentationMode::Mesh);
        assert!(doc.switch_mesh(root).unwrap().is_empty());
    }

    #[test]
    fn test_mark_restored() {
        let mut doc = Document::new();
        let (root, storey, wall) = tree(&mut doc);
        for id in [storey, wall] {
            doc.node_mut(id).unwrap().fresh = false;
        }
        doc.node_mut(wall).unwrap().hold_shape = true;
        assert_eq!(doc.mark_restored(root).unwrap(), vec![storey]);
        assert!(doc.node(storey).unwrap().is_fresh());
        assert!(!doc.node(wall).unwrap().is_fresh());
    }

    #[test]
    fn test_mark_restored_rearms_nodes_without_element() {
        let mut doc = Document::new();
        let (root, storey, _) = tree(&mut doc);
        let file = doc.node(root).unwrap().file.clone();
        let loose = doc
            .add_child(storey, ModelNode::new(file, None, RepresentationMode::Solid))
            .unwrap();
        doc.node_mut(loose).unwrap().fresh = false;

        assert!(doc.mark_restored(root).unwrap().contains(&loose));
        assert!(doc.node(loose).unwrap().is_fresh());
    }
}
