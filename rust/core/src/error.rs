// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for element graph operations.

use crate::element::ElementId;
use thiserror::Error;

/// Result type for element graph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying an element graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown element: {0}")]
    UnknownElement(ElementId),

    #[error("Duplicate element: {0}")]
    DuplicateElement(ElementId),

    #[error("Element {0} cannot decompose itself")]
    SelfRelation(ElementId),
}
