// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dome roof
//!
//! A flat base over the whole footprint with a quarter-circle dome standing
//! on the largest inscribed circle. The dome radius is the inscribed radius,
//! capped by `HEIGHT_1`.

use super::{add_facet, length, local_footprint, start_output};
use crate::config::RoofConfig;
use crate::error::Result;
use crate::measurement::MeasurementKey;
use crate::output::{RoofRequest, RoofTypeOutput};
use roofmesh_geometry::{build_dome, largest_inscribed_circle, Plane3D, Vector3};

pub fn build(request: &RoofRequest, config: &RoofConfig) -> Result<RoofTypeOutput> {
    let footprint = local_footprint(request);
    let mut output = start_output(request, &footprint);

    let m = &request.measurements;
    if m.get(MeasurementKey::Height1).is_none() {
        output
            .report
            .fallback(format!("HEIGHT_1 missing, using {} m", config.default_height));
    }
    let max_height = length(m, MeasurementKey::Height1, config.default_height, &mut output.report);

    let (cross_splits, sections) = config.dome_resolution();
    if (cross_splits, sections) != (config.dome_cross_splits, config.dome_sections) {
        output.report.fallback(format!(
            "dome resolution {}x{} too coarse, using {}x{}",
            config.dome_cross_splits, config.dome_sections, cross_splits, sections
        ));
    }

    add_facet(
        &mut output.roof,
        &mut output.report,
        0,
        footprint.clone().into(),
        Some(Plane3D::horizontal(0.0)),
        &Vector3::new(-1.0, 0.0, 0.0),
        &request.materials.roof,
    );

    let mut circle = largest_inscribed_circle(&footprint, config.circle_tolerance);
    circle.radius = circle.radius.min(max_height).max(0.0);
    build_dome(
        &mut output.roof,
        &circle,
        cross_splits,
        sections,
        config.dome_soft_normals,
    )?;

    output.place(request, circle.radius);
    Ok(output)
}
