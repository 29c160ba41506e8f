// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model nodes: the document side of an element
//!
//! A [`ModelNode`] is what the host document stores for one materialized
//! element: the representation it asks for, the child nodes already
//! materialized under it, and the geometry, placement and colors the
//! generator commits onto it.

use nativeifc_core::{ElementId, IfcModel};
use nativeifc_geometry::{Color, MeshGroup, Placement, Shape};
use slotmap::new_key_type;
use std::sync::Arc;

new_key_type! {
    /// Key of a node inside its [`Document`](crate::Document).
    pub struct NodeId;
}

/// Representation a node asks for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RepresentationMode {
    /// Nothing is generated
    #[default]
    None,
    /// Triangulated scene graph node
    Mesh,
    /// Exact solid
    Solid,
}

/// Display root of a node
///
/// Holds the slot reserved for injected mesh content; at most one group is
/// attached at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewRoot {
    injected: Option<MeshGroup>,
}

impl ViewRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `group` to the slot, replacing what was there
    pub fn attach(&mut self, group: MeshGroup) {
        self.injected = Some(group);
    }

    /// Remove the slot's content
    pub fn detach(&mut self) -> Option<MeshGroup> {
        self.injected.take()
    }

    #[inline]
    pub fn content(&self) -> Option<&MeshGroup> {
        self.injected.as_ref()
    }
}

/// Document object of one element (or of a whole file, for a root node)
#[derive(Debug, Clone)]
pub struct ModelNode {
    pub label: String,
    /// Backing element, `None` for nodes not tied to an element
    pub element: Option<ElementId>,
    /// Source file the element lives in
    pub file: Arc<IfcModel>,
    pub mode: RepresentationMode,
    /// Materialized child nodes
    pub group: Vec<NodeId>,
    pub shape: Option<Shape>,
    pub placement: Placement,
    /// Overall color (RGB of the first face color)
    pub shape_color: Option<[f32; 3]>,
    /// Per-face color list
    pub diffuse_color: Vec<Color>,
    /// Display root, absent in headless documents
    pub view: Option<ViewRoot>,
    /// Geometry is stored with the document and survives a restore
    ///
    /// Off for every new node, element-less ones included, so a restored
    /// node recomputes from cache. Objects lacking the flag entirely would
    /// keep their geometry, but documents only hold model nodes.
    pub hold_shape: bool,
    pub(crate) fresh: bool,
}

impl ModelNode {
    /// Node for `element` of `file`
    ///
    /// New nodes are fresh: their first generation may be served from cache.
    pub fn new(file: Arc<IfcModel>, element: Option<ElementId>, mode: RepresentationMode) -> Self {
        let label = match element.and_then(|id| file.element(id)) {
            Some(e) => e.name.clone().unwrap_or_else(|| format!("{} {}", e.ifc_type, e.id)),
            None => file.id().to_string(),
        };
        Self {
            label,
            element,
            file,
            mode,
            group: Vec::new(),
            shape: None,
            placement: Placement::identity(),
            shape_color: None,
            diffuse_color: Vec::new(),
            view: None,
            hold_shape: false,
            fresh: true,
        }
    }

    /// Node holding a whole file, backed by its root element
    pub fn root(file: Arc<IfcModel>, element: ElementId, mode: RepresentationMode) -> Self {
        Self::new(file, Some(element), mode)
    }

    /// Whether the next generation may be served from cache
    #[inline]
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Mesh content attached to the display root
    pub fn mesh(&self) -> Option<&MeshGroup> {
        self.view.as_ref().and_then(ViewRoot::content)
    }
}
