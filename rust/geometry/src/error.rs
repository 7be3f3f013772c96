// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry processing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("Plane is vertical and cannot carry a roof facet (normal {0:?})")]
    VerticalPlane([f64; 3]),

    #[error("Invalid rotary profile: {0}")]
    InvalidProfile(String),
}

impl Error {
    pub(crate) fn polygon(msg: impl Into<String>) -> Self {
        Error::InvalidPolygon(msg.into())
    }
}
