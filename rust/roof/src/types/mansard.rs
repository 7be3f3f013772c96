// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mansard roof
//!
//! Skeleton facets broken in two at a fixed distance from their edge: a
//! steep lower band up to `HEIGHT_2` and a shallow upper part up to the
//! total height.

use super::{
    add_facet, edge_line, edge_plane, length, local_footprint, primary_height, ring, start_output,
};
use crate::config::RoofConfig;
use crate::error::Result;
use crate::measurement::MeasurementKey;
use crate::output::{RoofRequest, RoofTypeOutput};
use roofmesh_geometry::polygon::clip_half_plane;
use roofmesh_geometry::skeleton::skeleton_with_tolerance;
use roofmesh_geometry::vector::{orthogonal_left, EPSILON};

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

    let m = &request.measurements;
    let report = &mut output.report;
    let height = primary_height(m, config.default_height, report).height_over(max_distance);
    if m.get(MeasurementKey::Length1).is_none() {
        report.fallback("LENGTH_1 missing, lower slope is a third of the roof depth");
    }
    let depth = length(m, MeasurementKey::Length1, max_distance / 3.0, report).min(max_distance);
    let lower_height = length(m, MeasurementKey::Height2, height * 2.0 / 3.0, report).min(height);

    let lower_slope = if depth > EPSILON { lower_height / depth } else { 0.0 };
    let upper_slope = if max_distance - depth > EPSILON {
        (height - lower_height) / (max_distance - depth)
    } else {
        0.0
    };
    tracing::debug!(height, depth, lower_height, lower_slope, upper_slope, "mansard slopes");

    for (i, face) in skeleton.faces.iter().enumerate() {
        let Some(dir) = face.edge.direction() else {
            output.report.skip_facet(2 * i, "facet edge has no length");
            continue;
        };
        let inward = orthogonal_left(&dir);
        let fold = face.edge.begin + inward * depth;
        let line = edge_line(&face.edge);

        let bands = [
            (-inward, edge_plane(&face.edge, 0.0, 0.0, lower_slope)),
            (inward, edge_plane(&face.edge, depth, lower_height, upper_slope)),
        ];
        for (k, (keep, plane)) in bands.into_iter().enumerate() {
            let Some(part) = ring(clip_half_plane(face.polygon.points(), &fold, &keep)) else {
                continue;
            };
            add_facet(
                &mut output.roof,
                &mut output.report,
                2 * i + k,
                part.into(),
                plane,
                &line,
                &request.materials.roof,
            );
        }
    }

    output.place(request, height);
    Ok(output)
}
