// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! NativeIFC Geometry
//!
//! Turns IFC elements into solids and meshes through a geometry extraction
//! engine, with a per-file cache of everything already computed.
//!
//! The engine works in meters; everything produced here is scaled by
//! [`GeneratorConfig::scale`] (millimeters by default).

pub mod assemble;
pub mod cache;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod iterator;
pub mod kernel;
pub mod mesh;
pub mod placement;
pub mod progress;
pub mod shape;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3};

pub use assemble::{AssembledMesh, AssembledShape, MeshAssembler, ShapeAssembler};
pub use cache::{CacheRegistry, GeometryCache};
pub use color::{Color, DEFAULT_FACE_COLOR, DEFAULT_MESH_COLOR};
pub use config::GeneratorConfig;
pub use engine::{GeometryEngine, MemoryEngine, SourceGeometry};
pub use error::{Error, Result};
pub use iterator::{ExtractionMode, GeometryIterator, ItemGeometry, IteratorItem};
pub use kernel::{BrepKernel, JsonBrepKernel};
pub use mesh::{Material, MeshGroup, MeshNode};
pub use placement::Placement;
pub use progress::{LogProgress, NoProgress, ProgressSink};
pub use shape::{Face, Shape, Solid};
