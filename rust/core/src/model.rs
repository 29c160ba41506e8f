// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory element graph of one opened IFC file
//!
//! [`IfcModel`] is what the geometry pipeline sees of a source file: the
//! elements, the decomposition relations between them (aggregation, spatial
//! containment, nesting, voids) and the geometric representation contexts.
//! Each model carries a process-unique [`FileId`] which is the identity used
//! to key per-file state such as the geometry cache.

use crate::element::{Element, ElementId};
use crate::error::{Error, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_FILE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an opened source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u64);

impl FileId {
    fn next() -> Self {
        Self(NEXT_FILE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file:{}", self.0)
    }
}

/// Kind of decomposition relationship between two elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// IfcRelAggregates
    Aggregates,
    /// IfcRelContainedInSpatialStructure
    Contains,
    /// IfcRelNests
    Nests,
    /// IfcRelVoidsElement (host -> opening)
    Voids,
}

/// IfcGeometricRepresentationContext or IfcGeometricRepresentationSubContext
#[derive(Debug, Clone, PartialEq)]
pub struct RepresentationContext {
    pub id: u32,
    /// ContextType, e.g. "Model" or "Plan"
    pub context_type: Option<String>,
    /// ContextIdentifier, e.g. "Body", "Axis", "Facetation"
    pub identifier: Option<String>,
    /// Parent context for sub-contexts
    pub parent: Option<u32>,
}

impl RepresentationContext {
    /// Top-level geometric representation context
    pub fn model(id: u32, context_type: &str) -> Self {
        Self {
            id,
            context_type: Some(context_type.to_string()),
            identifier: None,
            parent: None,
        }
    }

    /// Sub-context of `parent`
    pub fn sub(id: u32, parent: u32, identifier: &str) -> Self {
        Self {
            id,
            context_type: None,
            identifier: Some(identifier.to_string()),
            parent: Some(parent),
        }
    }

    #[inline]
    pub fn is_sub_context(&self) -> bool {
        self.parent.is_some()
    }
}

type Children = SmallVec<[(RelationKind, ElementId); 4]>;

/// Element graph of one opened source file
pub struct IfcModel {
    id: FileId,
    elements: FxHashMap<ElementId, Element>,
    children: FxHashMap<ElementId, Children>,
    contexts: Vec<RepresentationContext>,
}

impl IfcModel {
    /// Create an empty model with a fresh file identity
    pub fn new() -> Self {
        Self {
            id: FileId::next(),
            elements: FxHashMap::default(),
            children: FxHashMap::default(),
            contexts: Vec::new(),
        }
    }

    /// Identity of this file handle
    #[inline]
    pub fn id(&self) -> FileId {
        self.id
    }

    /// Add an element to the graph
    pub fn add_element(&mut self, element: Element) -> Result<ElementId> {
        let id = element.id;
        if self.elements.contains_key(&id) {
            return Err(Error::DuplicateElement(id));
        }
        self.elements.insert(id, element);
        Ok(id)
    }

    /// Record that `child` decomposes `parent`
    ///
    /// Children keep the order in which they were related. Relating the same
    /// pair twice is a no-op.
    pub fn relate(&mut self, kind: RelationKind, parent: ElementId, child: ElementId) -> Result<()> {
        if parent == child {
            return Err(Error::SelfRelation(parent));
        }
        for id in [parent, child] {
            if !self.elements.contains_key(&id) {
                return Err(Error::UnknownElement(id));
            }
        }
        let children = self.children.entry(parent).or_default();
        if !children.iter().any(|&(_, c)| c == child) {
            children.push((kind, child));
        }
        Ok(())
    }

    /// Add a geometric representation context
    pub fn add_context(&mut self, context: RepresentationContext) {
        self.contexts.push(context);
    }

    /// Get element by id
    #[inline]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Get element by id, failing for unknown ids
    pub fn require(&self, id: ElementId) -> Result<&Element> {
        self.element(id).ok_or(Error::UnknownElement(id))
    }

    /// Direct children with their relation kind
    pub fn children(&self, id: ElementId) -> &[(RelationKind, ElementId)] {
        self.children.get(&id).map(|c| c.as_slice()).unwrap_or(&[])
    }

    /// Elements decomposing `id`
    ///
    /// With `recursive`, the whole sub-tree is returned flat in depth-first
    /// pre-order. Every id appears at most once even if the graph contains
    /// a cycle.
    pub fn decomposition(&self, id: ElementId, recursive: bool) -> Vec<ElementId> {
        if !recursive {
            return self.children(id).iter().map(|&(_, c)| c).collect();
        }

        let mut result = Vec::new();
        let mut seen = FxHashSet::default();
        seen.insert(id);
        let mut stack: Vec<ElementId> = self.children(id).iter().rev().map(|&(_, c)| c).collect();
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            result.push(current);
            stack.extend(self.children(current).iter().rev().map(|&(_, c)| c));
        }
        result
    }

    /// Ids of the contexts holding body geometry
    ///
    /// "Body" and "Facetation" sub-contexts first (Facetation accommodates
    /// broken Revit exports), then top-level contexts of type "Model" since
    /// some applications put representations directly in the main context.
    pub fn body_context_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .contexts
            .iter()
            .filter(|c| c.is_sub_context())
            .filter(|c| matches!(c.identifier.as_deref(), Some("Body") | Some("Facetation")))
            .map(|c| c.id)
            .collect();
        ids.extend(
            self.contexts
                .iter()
                .filter(|c| !c.is_sub_context())
                .filter(|c| c.context_type.as_deref() == Some("Model"))
                .map(|c| c.id),
        );
        ids
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for IfcModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IfcModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IfcModel")
            .field("id", &self.id)
            .field("elements", &self.elements.len())
            .field("contexts", &self.contexts.len())
            .finish()
    }
}
