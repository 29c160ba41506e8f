// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for document and generation operations.

use crate::node::NodeId;

/// Result type alias for processing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating node geometry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced node is not part of the document.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// The source file rejected a lookup
    #[error("model error: {0}")]
    Core(#[from] nativeifc_core::Error),
}
