// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! NativeIFC Processing
//!
//! Document side of geometry generation: model nodes, decomposition of
//! their elements, and the [`Generator`] that commits solids, meshes and
//! colors onto them.
//!
//! ```no_run
//! use nativeifc_core::{ElementId, IfcModel};
//! use nativeifc_geometry::{GeneratorConfig, JsonBrepKernel, MemoryEngine};
//! use nativeifc_processing::{Document, Generator, ModelNode, RepresentationMode};
//! use std::sync::Arc;
//!
//! # fn main() -> nativeifc_processing::Result<()> {
//! let file = Arc::new(IfcModel::new());
//! let kernel = Arc::new(JsonBrepKernel);
//! let engine = Arc::new(MemoryEngine::new(kernel.clone()));
//! let mut generator = Generator::new(engine, kernel, GeneratorConfig::from_env());
//! generator.register_file(&file);
//!
//! let mut doc = Document::with_scene();
//! let node = doc.add_node(ModelNode::root(file, ElementId(1), RepresentationMode::Solid));
//! generator.execute(&mut doc, node)?;
//! # Ok(())
//! # }
//! ```

pub mod decomposition;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod generator;
pub mod ghost;
pub mod node;

pub use decomposition::{decomposed_elements, filter_types, resolve};
pub use diagnostics::{report_unrenderable, Diagnostic};
pub use document::{Document, Scene};
pub use error::{Error, Result};
pub use generator::{GenerationOutcome, Generator};
pub use ghost::{create_ghost, delete_ghost};
pub use node::{ModelNode, NodeId, RepresentationMode, ViewRoot};
