// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for roof building
pub type Result<T> = std::result::Result<T, RoofError>;

/// Errors that reject a whole roof build
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoofError {
    #[error("Wall is not closed: chain ends at ({x}, {y})")]
    WallNotClosed { x: f64, y: f64 },

    #[error("Wall has no nodes")]
    EmptyWall,

    #[error("Unsupported roof shape: {0}")]
    UnsupportedShape(String),

    #[error(transparent)]
    Geometry(#[from] roofmesh_geometry::Error),
}
