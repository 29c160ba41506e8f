// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decomposition resolver
//!
//! Works out which elements must be drawn directly by a node: its own
//! element when it has a representation, plus every decomposition child
//! that has not been materialized as a node of its own, flattened with the
//! child's whole sub-tree.

use crate::document::Document;
use crate::error::Result;
use crate::node::NodeId;
use nativeifc_core::{ElementId, IfcModel};
use rustc_hash::FxHashSet;

/// Elements to render under `node`, in discovery order
///
/// Elements already materialized anywhere below the node are left out.
pub fn resolve(doc: &Document, node: NodeId) -> Result<Vec<ElementId>> {
    let model_node = doc.require(node)?;
    let Some(element) = model_node.element else {
        return Ok(Vec::new());
    };
    let file = &model_node.file;

    let children = doc.child_elements(node);
    let elements = decomposed_elements(file, element, &children);
    let excluded = doc.descendant_elements(node);
    let elements = filter_types(file, &elements, &excluded);

    tracing::debug!(node = %model_node.label, elements = elements.len(), "Resolved decomposition");
    Ok(elements)
}

/// Element plus its decomposition, skipping sub-trees rooted at `child_ids`
pub fn decomposed_elements(file: &IfcModel, element: ElementId, child_ids: &[ElementId]) -> Vec<ElementId> {
    let mut seen = FxHashSet::default();
    let mut result = Vec::new();
    let mut push = |id: ElementId, result: &mut Vec<ElementId>| {
        if seen.insert(id) {
            result.push(id);
        }
    };

    if file.element(element).is_some_and(|e| e.has_representation()) {
        push(element, &mut result);
    }
    for child in file.decomposition(element, false) {
        if child_ids.contains(&child) {
            continue;
        }
        push(child, &mut result);
        for descendant in file.decomposition(child, true) {
            push(descendant, &mut result);
        }
    }
    result
}

/// Keep renderable products only
///
/// Drops non-products, features (openings included), spaces, furnishings,
/// annotations and every id in `exclude`. Ids missing from `file` are
/// dropped too.
pub fn filter_types(file: &IfcModel, elements: &[ElementId], exclude: &[ElementId]) -> Vec<ElementId> {
    let exclude: FxHashSet<ElementId> = exclude.iter().copied().collect();
    elements
        .iter()
        .copied()
        .filter(|id| !exclude.contains(id))
        .filter(|&id| {
            file.element(id).is_some_and(|e| {
                let t = e.ifc_type;
                t.is_product()
                    && !t.is_feature_element()
                    && !t.is_opening()
                    && !t.is_space()
                    && !t.is_furnishing()
                    && !t.is_annotation()
            })
        })
        .collect()
}
