// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Solid and mesh assembly from engine results
//!
//! Both assemblers follow the same cycle: take the file's cache out of the
//! registry, satisfy what they can from it, run the engine over the rest,
//! write every fresh result into the cache and hand the cache back.
//! Per-item failures are logged and skipped; a run that produces nothing
//! yields `None`.

mod mesh;
mod shape;

pub use mesh::{AssembledMesh, MeshAssembler};
pub use shape::{AssembledShape, ShapeAssembler};

use crate::cache::{CacheRegistry, GeometryCache};
use nativeifc_core::FileId;

/// Hand a cache back to the registry
///
/// A file without registered owner loses its cache; this is only logged.
fn store(caches: &mut CacheRegistry, file: FileId, cache: GeometryCache) {
    if let Err(e) = caches.put(file, cache) {
        tracing::debug!(error = %e, "Geometry cache discarded");
    }
}
