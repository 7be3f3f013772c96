// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Builder input and output

use crate::measurement::MeasurementTable;
use crate::registry::RoofShape;
use crate::report::BuildReport;
use roofmesh_geometry::transform::translation_matrix;
use roofmesh_geometry::{
    Bounds, Matrix4, Mesh, MeshFactory, Point2, PolygonWithHoles2D, Rectangle2D, TextureData,
};

/// Textures handed through to the meshes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoofMaterials {
    pub roof: TextureData,
    pub facade: TextureData,
}

/// Everything needed to build one roof
#[derive(Debug, Clone)]
pub struct RoofRequest {
    pub shape: RoofShape,
    /// Footprint in world plan coordinates
    pub footprint: PolygonWithHoles2D,
    /// Local origin, usually the first footprint point
    pub origin: Point2<f64>,
    /// Height of the roof top above ground, the roof base ends up at
    /// `wall_height - roof height`
    pub wall_height: f64,
    pub measurements: MeasurementTable,
    pub materials: RoofMaterials,
}

impl RoofRequest {
    /// Request with the origin at the first footprint point and no
    /// measurements
    pub fn new(shape: RoofShape, footprint: PolygonWithHoles2D, wall_height: f64) -> Self {
        let origin = footprint
            .outer
            .points()
            .first()
            .copied()
            .unwrap_or_else(Point2::origin);
        Self {
            shape,
            footprint,
            origin,
            wall_height,
            measurements: MeasurementTable::default(),
            materials: RoofMaterials::default(),
        }
    }

    pub fn with_measurements(mut self, measurements: MeasurementTable) -> Self {
        self.measurements = measurements;
        self
    }

    pub fn with_materials(mut self, materials: RoofMaterials) -> Self {
        self.materials = materials;
        self
    }

    pub fn with_origin(mut self, origin: Point2<f64>) -> Self {
        self.origin = origin;
        self
    }
}

/// Finished roof in builder-local coordinates
#[derive(Debug, Clone)]
pub struct RoofTypeOutput {
    /// Vertical walls: gables, borders
    pub facade: MeshFactory,
    /// Roof surfaces
    pub roof: MeshFactory,
    /// Height of the roof from its base to its top
    pub height: f64,
    /// Oriented bounding rectangle of the local footprint
    pub rectangle: Option<Rectangle2D>,
    /// Local to world transform
    pub transform: Matrix4<f64>,
    pub report: BuildReport,
}

impl RoofTypeOutput {
    /// Empty output for `request`, meshes named and textured
    pub(crate) fn empty(request: &RoofRequest) -> Self {
        Self {
            facade: MeshFactory::with_material("facade", request.materials.facade.clone()),
            roof: MeshFactory::with_material("roof", request.materials.roof.clone()),
            height: 0.0,
            rectangle: None,
            transform: Matrix4::identity(),
            report: BuildReport::new(),
        }
    }

    /// Set the height and the transform that puts the roof base at
    /// `wall_height - height` and moves it back to the request origin
    pub(crate) fn place(&mut self, request: &RoofRequest, height: f64) {
        self.height = height;
        self.transform = translation_matrix(
            request.origin.x,
            request.wall_height - height,
            -request.origin.y,
        );
    }

    pub fn meshes(&self) -> [&MeshFactory; 2] {
        [&self.facade, &self.roof]
    }

    /// Bounds of both meshes before the transform
    pub fn local_bounds(&self) -> Option<Bounds> {
        match (self.facade.bounds(), self.roof.bounds()) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        }
    }

    /// Both meshes flattened into one triangle mesh in world space
    pub fn world_mesh(&self) -> Mesh {
        let mut out = Mesh::new();
        for factory in self.meshes() {
            let mut mesh = factory.to_render_mesh();
            mesh.transform(&self.transform);
            out.merge(&mesh);
        }
        out
    }
}
