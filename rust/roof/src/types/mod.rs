// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roof type builders
//!
//! Every builder follows the same steps:
//!
//! - `flat`: one horizontal facet
//! - `hipped`: straight skeleton facets, all at one slope
//! - `pyramidal`: one triangle per outer edge up to a single apex
//! - `gabled`: two slopes split along the ridge of the fitted rectangle
//! - `mansard`: skeleton facets broken into a steep lower and shallow upper band
//! - `dome`: flat base with a quarter-circle dome on the inscribed circle
//!
//! The footprint is moved into local coordinates around the request origin,
//! measurements are resolved, the meshes are built at a roof base of
//! height 0, and finally [`RoofTypeOutput::place`] sets the roof height and
//! the transform back to the world.

pub mod dome;
pub mod flat;
pub mod gabled;
pub mod hipped;
pub mod mansard;
pub mod pyramidal;

use crate::measurement::{HeightSpec, MeasurementKey, MeasurementTable};
use crate::output::{RoofRequest, RoofTypeOutput};
use crate::report::BuildReport;
use roofmesh_geometry::transform::{plan_to_model, translation_matrix_2d};
use roofmesh_geometry::vector::orthogonal_left;
use roofmesh_geometry::{
    add_polygon_to_roof_mesh, find_rectangle, LineSegment2D, MeshFactory, Plane3D, Point2,
    Polygon2D, PolygonWithHoles2D, Shape2D, TextureData, Vector2, Vector3,
};

/// Footprint relative to the request origin, outer ring counter-clockwise
/// and holes clockwise
pub(crate) fn local_footprint(request: &RoofRequest) -> PolygonWithHoles2D {
    let to_local = translation_matrix_2d(-request.origin.x, -request.origin.y);
    let local = request.footprint.transformed(&to_local);
    let holes = local.holes.iter().map(Polygon2D::to_cw).collect();
    PolygonWithHoles2D::new(local.outer.to_ccw(), holes)
}

/// Output with meshes ready and the bounding rectangle of `footprint`
pub(crate) fn start_output(request: &RoofRequest, footprint: &PolygonWithHoles2D) -> RoofTypeOutput {
    let mut output = RoofTypeOutput::empty(request);
    output.rectangle = find_rectangle(footprint.outer.points(), 0.0);
    output
}

/// Roof height or slope, noting a fallback when it is missing or unusable
pub(crate) fn primary_height(
    measurements: &MeasurementTable,
    default: f64,
    report: &mut BuildReport,
) -> HeightSpec {
    let (resolved, note) = measurements.roof_height(default);
    if let Some(note) = note {
        report.fallback(note);
    }
    resolved
}

/// Length under `key`, noting a fallback when the value is unusable
pub(crate) fn length(
    measurements: &MeasurementTable,
    key: MeasurementKey,
    default: f64,
    report: &mut BuildReport,
) -> f64 {
    let (value, note) = measurements.length_meters(key, default);
    if let Some(note) = note {
        report.fallback(note);
    }
    value
}

/// Plane through `(origin, height)` rising along the plan-view `gradient`
/// (meters of height per meter of plan distance)
pub(crate) fn gradient_plane(origin: &Point2<f64>, height: f64, gradient: &Vector2<f64>) -> Plane3D {
    Plane3D::new(
        plan_to_model(origin, height),
        Vector3::new(-gradient.x, 1.0, gradient.y),
    )
}

/// Plane rising with `slope` away from `edge` into its left side, at
/// `base_height` when `base_distance` away from the edge line
pub(crate) fn edge_plane(
    edge: &LineSegment2D,
    base_distance: f64,
    base_height: f64,
    slope: f64,
) -> Option<Plane3D> {
    let inward = orthogonal_left(&edge.direction()?);
    let origin = edge.begin + inward * base_distance;
    Some(gradient_plane(&origin, base_height, &(inward * slope)))
}

/// Texture line along a plan-view edge
pub(crate) fn edge_line(edge: &LineSegment2D) -> Vector3<f64> {
    let d = edge.direction().unwrap_or_else(Vector2::x);
    Vector3::new(d.x, 0.0, -d.y)
}

/// Add one facet, recording it in the report instead of failing the roof
pub(crate) fn add_facet(
    mesh: &mut MeshFactory,
    report: &mut BuildReport,
    index: usize,
    shape: Shape2D,
    plane: Option<Plane3D>,
    line: &Vector3<f64>,
    texture: &TextureData,
) {
    let Some(plane) = plane else {
        report.skip_facet(index, "facet edge has no length");
        return;
    };
    if let Err(e) = add_polygon_to_roof_mesh(mesh, &shape, &plane, line, texture) {
        report.skip_facet(index, e);
    }
}

/// Ring as a polygon, `None` when clipping left fewer than three points
pub(crate) fn ring(points: Vec<Point2<f64>>) -> Option<Polygon2D> {
    Polygon2D::new(points).ok().filter(|p| p.area() > 1e-12)
}
