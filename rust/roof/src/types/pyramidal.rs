// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pyramidal roof: every outer edge rises to one apex above the centre of
//! the largest inscribed circle

use super::{add_facet, edge_line, local_footprint, primary_height, start_output};
use crate::config::RoofConfig;
use crate::error::Result;
use crate::measurement::HeightSpec;
use crate::output::{RoofRequest, RoofTypeOutput};
use roofmesh_geometry::transform::plan_to_model;
use roofmesh_geometry::{largest_inscribed_circle, Plane3D, Polygon2D};

pub fn build(request: &RoofRequest, config: &RoofConfig) -> Result<RoofTypeOutput> {
    let footprint = local_footprint(request);
    let mut output = start_output(request, &footprint);
    if !footprint.holes.is_empty() {
        output
            .report
            .fallback(format!("pyramidal roof ignores {} hole(s)", footprint.holes.len()));
    }

    let circle = largest_inscribed_circle(&footprint, config.circle_tolerance);
    let resolved = primary_height(&request.measurements, config.default_height, &mut output.report);
    let height = match resolved {
        HeightSpec::Height(h) => h,
        angle => angle.height_over(circle.radius),
    };
    let apex = plan_to_model(&circle.center, height);

    for (index, edge) in footprint.outer.edges().enumerate() {
        let begin = plan_to_model(&edge.begin, 0.0);
        let end = plan_to_model(&edge.end, 0.0);
        let normal = (end - begin).cross(&(apex - begin));
        let Some(plane) = normal
            .try_normalize(1e-12)
            .filter(|n| n.y > 0.0)
            .map(|n| Plane3D::new(begin, n))
        else {
            output.report.skip_facet(index, "edge faces away from the apex");
            continue;
        };

        let triangle = match Polygon2D::new(vec![edge.begin, edge.end, circle.center]) {
            Ok(t) => t,
            Err(e) => {
                output.report.skip_facet(index, e);
                continue;
            }
        };
        add_facet(
            &mut output.roof,
            &mut output.report,
            index,
            triangle.into(),
            Some(plane),
            &edge_line(&edge),
            &request.materials.roof,
        );
    }

    output.place(request, height);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::{Measurement, MeasurementKey, MeasurementTable};
    use crate::registry::RoofShape;
    use approx::assert_abs_diff_eq;
    use roofmesh_geometry::polygon::rectangle;
    use roofmesh_geometry::PolygonWithHoles2D;

    #[test]
    fn test_square_pyramid() {
        let outer = Polygon2D::new(rectangle(0.0, 0.0, 8.0, 8.0)).unwrap();
        let footprint = PolygonWithHoles2D::from_outer(outer);
        let table = MeasurementTable::new().with(MeasurementKey::Height1, Measurement::degrees(45.0));
        let req = RoofRequest::new(RoofShape::Pyramidal, footprint, 12.0).with_measurements(table);
        let output = build(&req, &RoofConfig::default()).unwrap();

        // apothem of the 8 m square
        assert_abs_diff_eq!(output.height, 4.0, epsilon = 0.02);
        assert_eq!(output.roof.triangle_count(), 4);
        assert!(output.report.is_clean());
        let top = output
            .roof
            .vertices
            .iter()
            .max_by(|a, b| a.y.total_cmp(&b.y))
            .unwrap();
        assert_abs_diff_eq!(top.x, 4.0, epsilon = 0.02);
        assert_abs_diff_eq!(top.z, -4.0, epsilon = 0.02);
    }
}
