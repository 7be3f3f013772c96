// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gabled roof
//!
//! The ridge runs along the long axis of the fitted rectangle, through its
//! centre. The footprint is cut in two along the ridge and each half gets
//! one slope falling to the long sides of the rectangle. Walls under the
//! slopes (the gables) go to the facade mesh.

use super::{add_facet, gradient_plane, local_footprint, primary_height, ring, start_output};
use crate::config::RoofConfig;
use crate::error::{Result, RoofError};
use crate::measurement::HeightSpec;
use crate::output::{RoofRequest, RoofTypeOutput};
use roofmesh_geometry::polygon::clip_half_plane;
use roofmesh_geometry::vector::{orthogonal_left, EPSILON};
use roofmesh_geometry::{add_wall_profile, Error, Point2, PolygonWithHoles2D, Vector2, Vector3};

/// Height profile across the ridge
struct Ridge {
    center: Point2<f64>,
    /// Unit vector across the ridge
    across: Vector2<f64>,
    half_width: f64,
    height: f64,
}

impl Ridge {
    fn offset(&self, p: &Point2<f64>) -> f64 {
        (p - self.center).dot(&self.across)
    }

    fn height_at(&self, p: &Point2<f64>) -> f64 {
        (self.height * (1.0 - self.offset(p).abs() / self.half_width)).max(0.0)
    }
}

pub fn build(request: &RoofRequest, config: &RoofConfig) -> Result<RoofTypeOutput> {
    let footprint = local_footprint(request);
    let mut output = start_output(request, &footprint);

    let rect = output
        .rectangle
        .ok_or_else(|| Error::InvalidPolygon("footprint has no bounding rectangle".into()))?;
    let half_width = rect.width.min(rect.height) / 2.0;
    if half_width <= EPSILON {
        return Err(RoofError::Geometry(Error::InvalidPolygon(
            "footprint has no width".into(),
        )));
    }

    let axis = rect.long_axis();
    let resolved = primary_height(&request.measurements, config.default_height, &mut output.report);
    let height = match resolved {
        HeightSpec::Height(h) => h,
        angle => angle.height_over(half_width),
    };
    let ridge = Ridge {
        center: rect.center(),
        across: orthogonal_left(&axis),
        half_width,
        height,
    };
    let line = Vector3::new(axis.x, 0.0, -axis.y);

    for (index, side) in [1.0, -1.0].into_iter().enumerate() {
        let normal = ridge.across * side;
        let Some(outer) = ring(clip_half_plane(footprint.outer.points(), &ridge.center, &normal)) else {
            continue;
        };
        let holes = footprint
            .holes
            .iter()
            .filter_map(|h| ring(clip_half_plane(h.points(), &ridge.center, &normal)))
            .collect();

        let gradient = -normal * (height / half_width);
        add_facet(
            &mut output.roof,
            &mut output.report,
            index,
            PolygonWithHoles2D::new(outer, holes).into(),
            Some(gradient_plane(&ridge.center, height, &gradient)),
            &line,
            &request.materials.roof,
        );
    }

    for r in footprint.rings() {
        for edge in r.edges() {
            let length = edge.length();
            let (db, de) = (ridge.offset(&edge.begin), ridge.offset(&edge.end));
            let mut profile = vec![(0.0, ridge.height_at(&edge.begin))];
            if db * de < 0.0 {
                profile.push((length * db / (db - de), height));
            }
            profile.push((length, ridge.height_at(&edge.end)));
            add_wall_profile(&mut output.facade, &edge, &profile, &request.materials.facade);
        }
    }

    output.place(request, height);
    Ok(output)
}
