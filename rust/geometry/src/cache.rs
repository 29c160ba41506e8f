// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-file geometry cache
//!
//! [`GeometryCache`] maps element ids to the solid, face colors, mesh node
//! and placement computed for them. The shape assembler owns the solid and
//! color maps, the mesh assembler the mesh and placement maps. Entries are
//! only ever written whole.
//!
//! [`CacheRegistry`] holds one cache per open file. Generation takes the
//! cache out with [`CacheRegistry::get`] and hands it back with
//! [`CacheRegistry::put`] once done.

use crate::color::Color;
use crate::mesh::MeshNode;
use crate::placement::Placement;
use crate::shape::Shape;
use crate::{Error, Result};
use nativeifc_core::{ElementId, FileId};
use rustc_hash::FxHashMap;

/// Computed geometry of one file, keyed by element
#[derive(Debug, Clone, Default)]
pub struct GeometryCache {
    shapes: FxHashMap<ElementId, Shape>,
    colors: FxHashMap<ElementId, Vec<Color>>,
    meshes: FxHashMap<ElementId, MeshNode>,
    placements: FxHashMap<ElementId, Placement>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the solid of an element with its face colors
    pub fn insert_solid(&mut self, id: ElementId, shape: Shape, colors: Vec<Color>) {
        self.shapes.insert(id, shape);
        self.colors.insert(id, colors);
    }

    /// Store the unplaced mesh node of an element with its placement
    pub fn insert_mesh(&mut self, id: ElementId, node: MeshNode, placement: Placement) {
        self.meshes.insert(id, node);
        self.placements.insert(id, placement);
    }

    #[inline]
    pub fn shape(&self, id: ElementId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    #[inline]
    pub fn colors(&self, id: ElementId) -> Option<&[Color]> {
        self.colors.get(&id).map(Vec::as_slice)
    }

    #[inline]
    pub fn mesh(&self, id: ElementId) -> Option<&MeshNode> {
        self.meshes.get(&id)
    }

    #[inline]
    pub fn placement(&self, id: ElementId) -> Option<&Placement> {
        self.placements.get(&id)
    }

    /// Number of cached solids
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Number of cached mesh nodes
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.meshes.is_empty()
    }
}

/// Caches of all open files
///
/// A file must be registered before its cache can be stored. Files are
/// registered when opened and unregistered when closed, which drops the
/// cache.
#[derive(Debug, Default)]
pub struct CacheRegistry {
    caches: FxHashMap<FileId, Option<GeometryCache>>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `file` an owner of a cache slot
    pub fn register(&mut self, file: FileId) {
        self.caches.entry(file).or_insert(None);
    }

    /// Drop the cache slot of `file`
    pub fn unregister(&mut self, file: FileId) -> Option<GeometryCache> {
        self.caches.remove(&file).flatten()
    }

    #[inline]
    pub fn is_registered(&self, file: FileId) -> bool {
        self.caches.contains_key(&file)
    }

    /// Take the cache of `file` out of the registry
    ///
    /// Yields a fresh, empty cache when the file has none yet or is not
    /// registered.
    pub fn get(&mut self, file: FileId) -> GeometryCache {
        self.caches
            .get_mut(&file)
            .and_then(Option::take)
            .unwrap_or_default()
    }

    /// Store the cache of `file`, replacing the previous one
    pub fn put(&mut self, file: FileId, cache: GeometryCache) -> Result<()> {
        match self.caches.get_mut(&file) {
            Some(slot) => {
                *slot = Some(cache);
                Ok(())
            }
            None => Err(Error::CacheOwnerMissing(file)),
        }
    }

    /// Read access to the stored cache of `file`
    pub fn peek(&self, file: FileId) -> Option<&GeometryCache> {
        self.caches.get(&file).and_then(Option::as_ref)
    }
}
