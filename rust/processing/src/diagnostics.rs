// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Diagnostics for elements that produced no geometry

use nativeifc_core::{ElementId, IfcModel};
use serde::{Deserialize, Serialize};

/// Record of an element that should have been drawn but was not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub id: u32,
    /// Schema name, e.g. `IfcWall`
    pub ifc_type: String,
    pub name: Option<String>,
}

/// Report `element` as unrenderable
///
/// Contexts and spatial structure elements normally carry no geometry of
/// their own and are not reported.
pub fn report_unrenderable(file: &IfcModel, element: ElementId) -> Option<Diagnostic> {
    let (ifc_type, name) = match file.element(element) {
        Some(e) => {
            if e.ifc_type.is_context() || e.ifc_type.is_spatial_structure() {
                return None;
            }
            (e.ifc_type.name().to_string(), e.name.clone())
        }
        None => ("Unknown".to_string(), None),
    };

    let diagnostic = Diagnostic {
        id: element.get(),
        ifc_type,
        name,
    };
    tracing::warn!(
        id = diagnostic.id,
        ifc_type = %diagnostic.ifc_type,
        name = diagnostic.name.as_deref().unwrap_or(""),
        "No geometry produced for element"
    );
    Some(diagnostic)
}
