// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roof registry - dispatch from roof shape to builder function

use crate::config::RoofConfig;
use crate::error::{Result, RoofError};
use crate::output::{RoofRequest, RoofTypeOutput};
use crate::types;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::fmt;
use std::str::FromStr;

/// Roof topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoofShape {
    Flat,
    Hipped,
    Pyramidal,
    Gabled,
    Mansard,
    Dome,
}

impl RoofShape {
    pub const ALL: [RoofShape; 6] = [
        RoofShape::Flat,
        RoofShape::Hipped,
        RoofShape::Pyramidal,
        RoofShape::Gabled,
        RoofShape::Mansard,
        RoofShape::Dome,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoofShape::Flat => "flat",
            RoofShape::Hipped => "hipped",
            RoofShape::Pyramidal => "pyramidal",
            RoofShape::Gabled => "gabled",
            RoofShape::Mansard => "mansard",
            RoofShape::Dome => "dome",
        }
    }
}

impl fmt::Display for RoofShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoofShape {
    type Err = RoofError;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().to_ascii_lowercase();
        RoofShape::ALL
            .into_iter()
            .find(|shape| shape.as_str() == tag)
            .ok_or(RoofError::UnsupportedShape(tag))
    }
}

/// Builder for one roof shape
pub type RoofBuilder = fn(&RoofRequest, &RoofConfig) -> Result<RoofTypeOutput>;

/// Roof registry - maps shapes to builder functions
pub struct RoofRegistry {
    builders: FxHashMap<RoofShape, RoofBuilder>,
    config: RoofConfig,
}

impl RoofRegistry {
    /// Create registry with all built-in roof shapes
    pub fn new() -> Self {
        Self::with_config(RoofConfig::default())
    }

    pub fn with_config(config: RoofConfig) -> Self {
        let mut registry = Self {
            builders: FxHashMap::default(),
            config,
        };
        registry.register(RoofShape::Flat, types::flat::build);
        registry.register(RoofShape::Hipped, types::hipped::build);
        registry.register(RoofShape::Pyramidal, types::pyramidal::build);
        registry.register(RoofShape::Gabled, types::gabled::build);
        registry.register(RoofShape::Mansard, types::mansard::build);
        registry.register(RoofShape::Dome, types::dome::build);
        registry
    }

    /// Registry without any builder
    pub fn empty(config: RoofConfig) -> Self {
        Self {
            builders: FxHashMap::default(),
            config,
        }
    }

    /// Register or replace the builder of a shape
    pub fn register(&mut self, shape: RoofShape, builder: RoofBuilder) {
        self.builders.insert(shape, builder);
    }

    pub fn config(&self) -> &RoofConfig {
        &self.config
    }

    pub fn supports(&self, shape: RoofShape) -> bool {
        self.builders.contains_key(&shape)
    }

    /// Build one roof
    pub fn build(&self, request: &RoofRequest) -> Result<RoofTypeOutput> {
        let builder = self
            .builders
            .get(&request.shape)
            .ok_or_else(|| RoofError::UnsupportedShape(request.shape.to_string()))?;

        let output = builder(request, &self.config)?;
        tracing::debug!(
            shape = %request.shape,
            height = output.height,
            roof_triangles = output.roof.triangle_count(),
            facade_triangles = output.facade.triangle_count(),
            skipped = output.report.skipped.len(),
            "roof built"
        );
        Ok(output)
    }
}

impl Default for RoofRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build independent roofs in parallel, results in request order
pub fn build_roofs_parallel(
    registry: &RoofRegistry,
    requests: &[RoofRequest],
) -> Vec<Result<RoofTypeOutput>> {
    requests
        .par_iter()
        .map(|request| registry.build(request))
        .collect()
}
