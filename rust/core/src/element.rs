// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Elements: immutable references into the source model

use crate::schema::IfcType;
use smallvec::SmallVec;
use std::fmt;

/// Stable integer identity of an element (the STEP instance id)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementId(pub u32);

impl ElementId {
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ElementId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One shape representation of an element, tied to a geometric context
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeRepresentation {
    /// Id of the IfcGeometricRepresentation(Sub)Context the items live in
    pub context_id: u32,
    /// RepresentationIdentifier, e.g. "Body" or "Axis"
    pub identifier: Option<String>,
}

/// Representation payload of an element (its IfcProductDefinitionShape)
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Representation {
    pub representations: SmallVec<[ShapeRepresentation; 2]>,
}

impl Representation {
    /// Single representation in the given context
    pub fn in_context(context_id: u32, identifier: &str) -> Self {
        let mut representations = SmallVec::new();
        representations.push(ShapeRepresentation {
            context_id,
            identifier: Some(identifier.to_string()),
        });
        Self { representations }
    }

    /// Check if any representation lives in one of the given contexts.
    /// An empty context list matches everything.
    pub fn uses_any_context(&self, context_ids: &[u32]) -> bool {
        context_ids.is_empty()
            || self
                .representations
                .iter()
                .any(|r| context_ids.contains(&r.context_id))
    }
}

/// A node of the source model's product/spatial graph
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    pub id: ElementId,
    pub ifc_type: IfcType,
    pub name: Option<String>,
    pub representation: Option<Representation>,
}

impl Element {
    /// Create an element without representation
    pub fn new(id: u32, ifc_type: IfcType) -> Self {
        Self {
            id: ElementId(id),
            ifc_type,
            name: None,
            representation: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.representation = Some(representation);
        self
    }

    /// Tells if the element has an own, non-empty representation
    #[inline]
    pub fn has_representation(&self) -> bool {
        self.representation
            .as_ref()
            .is_some_and(|r| !r.representations.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_representation() {
        let wall = Element::new(10, IfcType::IfcWall);
        assert!(!wall.has_representation());

        let wall = wall.with_representation(Representation::in_context(3, "Body"));
        assert!(wall.has_representation());

        let empty = Element::new(11, IfcType::IfcSlab).with_representation(Representation::default());
        assert!(!empty.has_representation());
    }

    #[test]
    fn test_context_matching() {
        let repr = Representation::in_context(3, "Body");
        assert!(repr.uses_any_context(&[]));
        assert!(repr.uses_any_context(&[2, 3]));
        assert!(!repr.uses_any_context(&[4]));
    }

    #[test]
    fn test_display() {
        assert_eq!(ElementId(42).to_string(), "#42");
    }
}
