// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use nativeifc_core::FileId;
use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry generation
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid brep payload: {0}")]
    Brep(String),

    #[error("Invalid engine matrix: expected 12 values, got {0}")]
    InvalidMatrix(usize),

    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Engine initialization failed: {0}")]
    EngineInit(String),

    #[error("No cache owner registered for {0}")]
    CacheOwnerMissing(FileId),
}
