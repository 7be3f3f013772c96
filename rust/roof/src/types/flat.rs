// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flat roof
//!
//! One horizontal facet over the footprint. A metric `HEIGHT_1` turns the
//! roof into a slab of that thickness whose border goes to the facade mesh.

use super::{add_facet, length, local_footprint, start_output};
use crate::config::RoofConfig;
use crate::error::Result;
use crate::measurement::MeasurementKey;
use crate::output::{RoofRequest, RoofTypeOutput};
use roofmesh_geometry::{add_extruded_polygon, Plane3D, Vector3};

pub fn build(request: &RoofRequest, _config: &RoofConfig) -> Result<RoofTypeOutput> {
    let footprint = local_footprint(request);
    let mut output = start_output(request, &footprint);

    let thickness = length(
        &request.measurements,
        MeasurementKey::Height1,
        0.0,
        &mut output.report,
    );

    add_facet(
        &mut output.roof,
        &mut output.report,
        0,
        footprint.clone().into(),
        Some(Plane3D::horizontal(thickness)),
        &Vector3::new(-1.0, 0.0, 0.0),
        &request.materials.roof,
    );

    for ring in footprint.rings() {
        add_extruded_polygon(
            &mut output.facade,
            ring.points(),
            0.0,
            thickness,
            &request.materials.facade,
        );
    }

    output.place(request, thickness);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::{Measurement, MeasurementTable};
    use crate::registry::RoofShape;
    use roofmesh_geometry::polygon::rectangle;
    use roofmesh_geometry::{Polygon2D, PolygonWithHoles2D};

    fn request() -> RoofRequest {
        let outer = Polygon2D::new(rectangle(10.0, 20.0, 16.0, 24.0)).unwrap();
        RoofRequest::new(RoofShape::Flat, PolygonWithHoles2D::from_outer(outer), 9.0)
    }

    #[test]
    fn test_flat_roof_sits_on_the_wall() {
        let output = build(&request(), &RoofConfig::default()).unwrap();
        assert_eq!(output.height, 0.0);
        assert!(output.facade.is_empty());
        assert_eq!(output.roof.triangle_count(), 2);
        // local coordinates start at the first footprint point
        assert!(output.roof.vertices.iter().any(|p| p.x == 0.0 && p.z == 0.0));

        let world = output.world_mesh();
        let (min, max) = world.bounds();
        assert_eq!((min.x, max.x), (10.0, 16.0));
        assert_eq!((min.y, max.y), (9.0, 9.0));
        assert_eq!((min.z, max.z), (-24.0, -20.0));
        assert!(output.report.is_clean());
        let rect = output.rectangle.unwrap();
        assert!((rect.area() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_slab_border() {
        let req = request().with_measurements(
            MeasurementTable::new().with(MeasurementKey::Height1, Measurement::meters(0.5)),
        );
        let output = build(&req, &RoofConfig::default()).unwrap();
        assert_eq!(output.height, 0.5);
        assert_eq!(output.facade.triangle_count(), 8);
        assert!(output.roof.vertices.iter().all(|p| p.y == 0.5));
    }
}
