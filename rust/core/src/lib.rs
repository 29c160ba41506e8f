// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # NativeIFC Core
//!
//! The element side of NativeIFC geometry generation: what an opened IFC
//! file looks like to the pipeline that turns its elements into solids and
//! meshes.
//!
//! - **Schema categories**: [`IfcType`] answers the "is this a product, an
//!   opening, a space..." questions that drive render filtering
//! - **Elements**: [`Element`] with its stable [`ElementId`] and optional
//!   [`Representation`] payload
//! - **Element graph**: [`IfcModel`] holds decomposition relations and
//!   geometric representation contexts, and carries the [`FileId`] that
//!   identifies the file handle
//!
//! ## Quick Start
//!
//! ```rust
//! use nativeifc_core::{Element, ElementId, IfcModel, IfcType, RelationKind, Representation};
//!
//! let mut model = IfcModel::new();
//! model.add_element(Element::new(1, IfcType::IfcBuildingStorey)).unwrap();
//! model
//!     .add_element(Element::new(2, IfcType::IfcWall).with_representation(Representation::in_context(9, "Body")))
//!     .unwrap();
//! model.relate(RelationKind::Contains, ElementId(1), ElementId(2)).unwrap();
//!
//! assert_eq!(model.decomposition(ElementId(1), true), vec![ElementId(2)]);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for elements and schema types

pub mod element;
pub mod error;
pub mod model;
pub mod schema;

pub use element::{Element, ElementId, Representation, ShapeRepresentation};
pub use error::{Error, Result};
pub use model::{FileId, IfcModel, RelationKind, RepresentationContext};
pub use schema::IfcType;
