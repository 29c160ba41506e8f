// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry extraction engine capability
//!
//! The engine turns a list of elements into a stream of raw geometry items.
//! It may parallelize internally but exposes a synchronous pull interface:
//! [`EngineIterator::initialize`] must succeed before items are read,
//! [`EngineIterator::get`] returns the current item and
//! [`EngineIterator::advance`] moves to the next one, returning `false`
//! once the stream is exhausted. Failures are signalled through these
//! booleans rather than errors.

mod memory;

pub use memory::{MemoryEngine, SourceGeometry};

use nativeifc_core::{ElementId, IfcModel};

/// Extraction settings handed to the engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IteratorSettings {
    /// Skip triangulation, keep exact faces
    pub disable_triangulation: bool,
    /// Export boundary representation payloads instead of triangles
    pub use_brep_data: bool,
    /// Sew open shells into closed ones
    pub sew_shells: bool,
    /// Restrict to representations in these contexts (empty = all)
    pub context_ids: Vec<u32>,
}

/// Material as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawMaterial {
    pub diffuse: [f64; 3],
    pub transparency: f64,
}

/// One untyped engine result
///
/// Which payload fields are filled depends on the settings the iterator was
/// opened with: `brep_data` and `surface_styles` in brep mode, `verts`,
/// `faces` and `materials` otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawItem {
    pub id: ElementId,
    /// 12-value column-major transformation, origin in meters
    pub matrix: Vec<f64>,
    pub brep_data: Option<Vec<u8>>,
    /// Flat (r, g, b, transparency) groups, one per style
    pub surface_styles: Vec<f64>,
    /// Flat vertex coordinates in meters
    pub verts: Vec<f64>,
    /// Flat triangle indices
    pub faces: Vec<i32>,
    pub materials: Vec<RawMaterial>,
}

/// Pull interface over an engine run
pub trait EngineIterator {
    /// Start extraction; `false` when nothing can be produced
    fn initialize(&mut self) -> bool;

    /// Current item, if any
    fn get(&self) -> Option<&RawItem>;

    /// Move to the next item; `false` once exhausted
    fn advance(&mut self) -> bool;
}

/// Multi-threaded geometry extraction engine
pub trait GeometryEngine: Send + Sync {
    /// Create an iterator over the geometry of `include` in `file`
    fn iterator<'a>(
        &'a self,
        settings: IteratorSettings,
        file: &'a IfcModel,
        workers: usize,
        include: &[ElementId],
    ) -> Box<dyn EngineIterator + 'a>;
}
