// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roofmesh Geometry Kernel
//!
//! Plan-view polygon kernel, straight skeleton, and the mesh factory used by
//! the roof builders. Triangulation goes through earcutr, transforms through
//! nalgebra.

pub mod circle;
pub mod error;
pub mod factory;
pub mod mesh;
pub mod plane;
pub mod polygon;
pub mod rectangle;
pub mod roof_mesh;
pub mod rotary;
pub mod skeleton;
pub mod transform;
pub mod triangulation;
pub mod vector;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector2, Vector3};

pub use circle::{largest_inscribed_circle, Circle};
pub use error::{Error, Result};
pub use factory::{Face, FaceType, MeshFactory, TextCoord, TextureData};
pub use mesh::{Bounds, Mesh};
pub use plane::Plane3D;
pub use polygon::{Bounds2D, Polygon2D, PolygonWithHoles2D, Shape2D};
pub use rectangle::{find_rectangle, Rectangle2D};
pub use roof_mesh::{add_extruded_polygon, add_polygon_to_roof_mesh, add_wall_profile};
pub use rotary::{build_dome, build_rotary_shape, TextureQuadIndex};
pub use skeleton::{skeleton, EdgeOutput, SkeletonOutput, SkipReason, SkippedFace};
pub use triangulation::triangulate_polygon;
pub use vector::LineSegment2D;
