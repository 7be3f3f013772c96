// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roofmesh Roof Builders
//!
//! Turns a building footprint, a roof shape and its measurements into
//! textured roof meshes.
//!
//! ```no_run
//! use roofmesh_roof::{RoofRegistry, RoofRequest, RoofShape};
//! use roofmesh_roof::building::{building_part_to_polygon_with_holes, BuildingPart};
//!
//! # fn run(part: &BuildingPart) -> roofmesh_roof::Result<()> {
//! let footprint = building_part_to_polygon_with_holes(part)?;
//! let request = RoofRequest::new(RoofShape::Hipped, footprint, 12.0);
//! let output = RoofRegistry::new().build(&request)?;
//! let mesh = output.world_mesh();
//! # let _ = mesh;
//! # Ok(())
//! # }
//! ```

pub mod building;
pub mod config;
pub mod error;
pub mod measurement;
pub mod output;
pub mod registry;
pub mod report;
pub mod types;

pub use building::{wall_to_polygon, BuildingPart, Wall, WallNode, WallPart};
pub use config::RoofConfig;
pub use error::{Result, RoofError};
pub use measurement::{HeightSpec, Measurement, MeasurementKey, MeasurementTable, MeasurementUnit};
pub use output::{RoofMaterials, RoofRequest, RoofTypeOutput};
pub use registry::{build_roofs_parallel, RoofBuilder, RoofRegistry, RoofShape};
pub use report::{BuildReport, SkippedElement};
