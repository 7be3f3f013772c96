// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! What a roof build left out or guessed

use roofmesh_geometry::SkippedFace;
use std::fmt;

/// Roof element that did not make it into the mesh
#[derive(Debug, Clone, PartialEq)]
pub enum SkippedElement {
    /// Skeleton face that could not be built
    Face(SkippedFace),
    /// Facet that could not be projected or triangulated
    Facet { index: usize, reason: String },
}

impl fmt::Display for SkippedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkippedElement::Face(face) => write!(
                f,
                "face of edge ({}, {}) -> ({}, {}): {}",
                face.edge.begin.x, face.edge.begin.y, face.edge.end.x, face.edge.end.y, face.reason
            ),
            SkippedElement::Facet { index, reason } => write!(f, "facet {}: {}", index, reason),
        }
    }
}

/// Outcome of one roof build besides the meshes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub skipped: Vec<SkippedElement>,
    /// Measurement or configuration fallbacks that were applied
    pub fallbacks: Vec<String>,
}

impl BuildReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nothing was skipped
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn skip_faces(&mut self, faces: impl IntoIterator<Item = SkippedFace>) {
        self.skipped.extend(faces.into_iter().map(SkippedElement::Face));
    }

    pub fn skip_facet(&mut self, index: usize, reason: impl fmt::Display) {
        let reason = reason.to_string();
        tracing::warn!(index, reason = %reason, "roof facet skipped");
        self.skipped.push(SkippedElement::Facet { index, reason });
    }

    pub fn fallback(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(message = %message, "roof fallback");
        self.fallbacks.push(message);
    }
}
