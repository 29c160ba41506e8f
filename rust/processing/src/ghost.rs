// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ghost previews: transient whole-file meshes shown before any node exists

use crate::decomposition::{decomposed_elements, filter_types};
use crate::document::Document;
use crate::error::Result;
use crate::generator::Generator;
use nativeifc_core::{ElementId, IfcModel};
use nativeifc_geometry::{CacheRegistry, LogProgress, MeshAssembler};

/// Show a preview of everything below `root_element`
///
/// Bypasses the geometry cache. Replaces any ghost already shown and
/// returns whether a new one was attached. Headless documents are left
/// untouched. Fails when `root_element` is not part of `file`.
pub fn create_ghost(doc: &mut Document, generator: &Generator, file: &IfcModel, root_element: ElementId) -> Result<bool> {
    if !doc.has_scene() {
        return Ok(false);
    }
    file.require(root_element)?;
    delete_ghost(doc);

    let elements = decomposed_elements(file, root_element, &[]);
    let elements = filter_types(file, &elements, &[]);

    let mut scratch = CacheRegistry::new();
    let mut progress = LogProgress::new();
    let assembler = MeshAssembler::new(generator.engine(), generator.config());
    let Some(assembled) = assembler.assemble(file, &elements, false, &mut scratch, &mut progress) else {
        tracing::debug!(file = %file.id(), "Nothing to show in ghost preview");
        return Ok(false);
    };

    let mut group = assembled.group;
    // A lone node keeps its placement separately; bake it for the preview
    if let Some(placement) = assembled.placement {
        for child in group.children.iter_mut() {
            child.apply_placement(&placement);
        }
    }

    tracing::debug!(file = %file.id(), nodes = group.len(), "Created ghost preview");
    match doc.scene_mut() {
        Some(scene) => {
            scene.set_ghost(group);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Remove the ghost preview, if any
pub fn delete_ghost(doc: &mut Document) -> bool {
    doc.scene_mut().and_then(|scene| scene.take_ghost()).is_some()
}
