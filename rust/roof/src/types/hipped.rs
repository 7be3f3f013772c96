// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Complex hipped roof
//!
//! Every straight skeleton facet is raised with the same slope from its
//! boundary edge. The slope comes from `HEIGHT_1`: an angle is used
//! directly, a height is spread over the deepest facet.

use super::{add_facet, edge_line, edge_plane, local_footprint, primary_height, start_output};
use crate::config::RoofConfig;
use crate::error::Result;
use crate::measurement::HeightSpec;
use crate::output::{RoofRequest, RoofTypeOutput};
use roofmesh_geometry::skeleton::skeleton_with_tolerance;
use roofmesh_geometry::vector::EPSILON;

pub fn build(request: &RoofRequest, config: &RoofConfig) -> Result<RoofTypeOutput> {
    let footprint = local_footprint(request);
    let mut output = start_output(request, &footprint);

    let skeleton = skeleton_with_tolerance(
        &footprint.outer,
        &footprint.holes,
        config.skeleton_tolerance,
    )?;
    output.report.skip_faces(skeleton.skipped.iter().copied());

    let max_distance = skeleton.max_distance();
    let resolved = primary_height(&request.measurements, config.default_height, &mut output.report);
    let height_factor = match resolved {
        HeightSpec::Angle(deg) => deg.to_radians().tan(),
        HeightSpec::Height(h) if max_distance > EPSILON => h / max_distance,
        HeightSpec::Height(_) => {
            output
                .report
                .fallback("footprint has no depth, using a 1:1 slope");
            1.0
        }
    };

    for (index, face) in skeleton.faces.iter().enumerate() {
        add_facet(
            &mut output.roof,
            &mut output.report,
            index,
            face.polygon.clone().into(),
            edge_plane(&face.edge, 0.0, 0.0, height_factor),
            &edge_line(&face.edge),
            &request.materials.roof,
        );
    }

    output.place(request, max_distance * height_factor);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::{Measurement, MeasurementKey, MeasurementTable};
    use crate::registry::RoofShape;
    use approx::assert_relative_eq;
    use roofmesh_geometry::polygon::rectangle;
    use roofmesh_geometry::{Polygon2D, PolygonWithHoles2D};

    fn request(width: f64, depth: f64, h1: Option<Measurement>) -> RoofRequest {
        let outer = Polygon2D::new(rectangle(0.0, 0.0, width, depth)).unwrap();
        let mut table = MeasurementTable::new();
        if let Some(m) = h1 {
            table = table.with(MeasurementKey::Height1, m);
        }
        RoofRequest::new(RoofShape::Hipped, PolygonWithHoles2D::from_outer(outer), 10.0)
            .with_measurements(table)
    }

    #[test]
    fn test_ridge_height_follows_height_1() {
        let req = request(10.0, 6.0, Some(Measurement::meters(2.0)));
        let output = build(&req, &RoofConfig::default()).unwrap();
        assert_relative_eq!(output.height, 2.0, epsilon = 1e-9);
        let top = output.roof.bounds().unwrap().max.y;
        assert_relative_eq!(top, 2.0, epsilon = 1e-9);
        assert!(output.report.is_clean());
        assert!(output.report.fallbacks.is_empty());
    }

    #[test]
    fn test_all_facets_point_up() {
        let req = request(10.0, 6.0, Some(Measurement::degrees(30.0)));
        let output = build(&req, &RoofConfig::default()).unwrap();
        assert_eq!(output.roof.normals.len(), 4);
        for n in &output.roof.normals {
            assert_relative_eq!(n.y, 30f64.to_radians().cos(), epsilon = 1e-9);
        }
        assert_relative_eq!(output.height, 3.0 * 30f64.to_radians().tan(), epsilon = 1e-9);
    }

    #[test]
    fn test_missing_height_uses_default() {
        let output = build(&request(10.0, 10.0, None), &RoofConfig::default()).unwrap();
        assert_relative_eq!(output.height, 2.5, epsilon = 1e-9);
        assert_eq!(output.report.fallbacks.len(), 1);
    }

    #[test]
    fn test_eaves_stay_at_base() {
        let req = request(10.0, 6.0, Some(Measurement::meters(2.0)));
        let output = build(&req, &RoofConfig::default()).unwrap();
        for p in &output.roof.vertices {
            let on_border = p.x.abs() < 1e-9
                || (p.x - 10.0).abs() < 1e-9
                || p.z.abs() < 1e-9
                || (p.z + 6.0).abs() < 1e-9;
            if on_border {
                assert_relative_eq!(p.y, 0.0, epsilon = 1e-9);
            }
        }
    }
}
