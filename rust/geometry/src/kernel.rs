// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Solid kernel capability: brep byte streams to and from [`Shape`]s

use crate::{Error, Result, Shape};

/// Converts boundary representation payloads into usable solids
pub trait BrepKernel: Send + Sync {
    /// Rehydrate a solid from a brep payload
    fn import_brep(&self, data: &[u8]) -> Result<Shape>;

    /// Serialize a solid into a brep payload
    fn export_brep(&self, shape: &Shape) -> Result<Vec<u8>>;
}

/// Kernel exchanging shapes as JSON documents
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBrepKernel;

impl BrepKernel for JsonBrepKernel {
    fn import_brep(&self, data: &[u8]) -> Result<Shape> {
        serde_json::from_slice(data).map_err(|e| Error::Brep(e.to_string()))
    }

    fn export_brep(&self, shape: &Shape) -> Result<Vec<u8>> {
        serde_json::to_vec(shape).map_err(|e| Error::Brep(e.to_string()))
    }
}
