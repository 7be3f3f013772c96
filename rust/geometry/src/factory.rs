// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Indexed mesh accumulator
//!
//! A [`MeshFactory`] collects vertices, normals and texture coordinates in
//! append-only arrays and faces that reference them by index. Nothing is
//! deduplicated on insert: a caller that wants a shared normal keeps the
//! returned index and reuses it. [`MeshFactory::to_render_mesh`] expands
//! every face topology into plain triangles for the renderer.

use crate::mesh::{Bounds, Mesh};
use nalgebra::{Point2, Point3, Vector3};
use rustc_hash::FxHashMap;

/// Texture handle plus the world size of one texture tile
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub file: String,
    /// Tile width in meters
    pub width: f64,
    /// Tile height in meters
    pub height: f64,
}

impl TextureData {
    pub fn new(file: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            file: file.into(),
            width,
            height,
        }
    }
}

impl Default for TextureData {
    fn default() -> Self {
        Self::new("", 1.0, 1.0)
    }
}

/// Texture coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextCoord {
    pub u: f64,
    pub v: f64,
}

impl TextCoord {
    #[inline]
    pub fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }
}

/// Face topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceType {
    /// Convex polygon, rendered as a fan
    Polygon,
    /// Independent triangles, three corners each
    Triangles,
    /// Fan around the first corner
    TriangleFan,
    /// Strip, winding alternates every triangle
    TriangleStrip,
    /// Independent quads, four corners each
    Quads,
    /// Strip of quads sharing their last two corners
    QuadStrip,
}

/// One face corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceVertex {
    pub vertex: usize,
    pub text_coord: Option<usize>,
    pub normal: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub face_type: FaceType,
    pub corners: Vec<FaceVertex>,
}

impl Face {
    pub fn new(face_type: FaceType) -> Self {
        Self {
            face_type,
            corners: Vec::new(),
        }
    }

    /// Triangles as triples of corner positions, following the topology
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        let n = self.corners.len();
        let mut out = Vec::new();
        match self.face_type {
            FaceType::Triangles => {
                for i in (0..n.saturating_sub(2)).step_by(3) {
                    out.push([i, i + 1, i + 2]);
                }
            }
            FaceType::Polygon | FaceType::TriangleFan => {
                for i in 1..n.saturating_sub(1) {
                    out.push([0, i, i + 1]);
                }
            }
            FaceType::TriangleStrip => {
                for i in 0..n.saturating_sub(2) {
                    if i % 2 == 0 {
                        out.push([i, i + 1, i + 2]);
                    } else {
                        out.push([i + 1, i, i + 2]);
                    }
                }
            }
            FaceType::Quads => {
                for i in (0..n.saturating_sub(3)).step_by(4) {
                    out.push([i, i + 1, i + 2]);
                    out.push([i, i + 2, i + 3]);
                }
            }
            FaceType::QuadStrip => {
                let mut k = 0;
                while 2 * k + 3 < n {
                    let (a, b, c, d) = (2 * k, 2 * k + 1, 2 * k + 3, 2 * k + 2);
                    out.push([a, b, c]);
                    out.push([a, c, d]);
                    k += 1;
                }
            }
        }
        out
    }
}

/// Appends corners to a face opened with [`MeshFactory::add_face`]
pub struct FaceBuilder<'a> {
    face: &'a mut Face,
}

impl FaceBuilder<'_> {
    pub fn add_vert(&mut self, vertex: usize, text_coord: Option<usize>, normal: usize) -> &mut Self {
        self.face.corners.push(FaceVertex {
            vertex,
            text_coord,
            normal,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.face.corners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.face.corners.is_empty()
    }
}

/// Indexed mesh under construction
#[derive(Debug, Clone, Default)]
pub struct MeshFactory {
    pub name: String,
    pub material: Option<TextureData>,
    pub vertices: Vec<Point3<f64>>,
    pub normals: Vec<Vector3<f64>>,
    pub text_coords: Vec<TextCoord>,
    pub faces: Vec<Face>,
}

impl MeshFactory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_material(name: impl Into<String>, material: TextureData) -> Self {
        Self {
            name: name.into(),
            material: Some(material),
            ..Self::default()
        }
    }

    #[inline]
    pub fn add_vertex(&mut self, point: Point3<f64>) -> usize {
        self.vertices.push(point);
        self.vertices.len() - 1
    }

    #[inline]
    pub fn add_normal(&mut self, normal: Vector3<f64>) -> usize {
        self.normals.push(normal);
        self.normals.len() - 1
    }

    #[inline]
    pub fn add_text_coord(&mut self, tc: TextCoord) -> usize {
        self.text_coords.push(tc);
        self.text_coords.len() - 1
    }

    /// Open a new face
    pub fn add_face(&mut self, face_type: FaceType) -> FaceBuilder<'_> {
        self.faces.push(Face::new(face_type));
        let last = self.faces.len() - 1;
        FaceBuilder {
            face: &mut self.faces[last],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.faces.iter().all(|f| f.corners.is_empty())
    }

    /// Bounds of all vertices, `None` when there are none
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of(&self.vertices)
    }

    /// Number of triangles the faces expand to
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|f| f.triangles().len()).sum()
    }

    /// Flatten into a triangle-only render mesh.
    ///
    /// Corners with the same vertex, texture coordinate and normal indices
    /// share one render vertex. Missing texture coordinates become `(0, 0)`.
    pub fn to_render_mesh(&self) -> Mesh {
        let mut mesh = Mesh::with_capacity(self.vertices.len(), self.triangle_count() * 3);
        let mut emitted: FxHashMap<FaceVertex, u32> = FxHashMap::default();

        for face in &self.faces {
            for tri in face.triangles() {
                let mut ids = [0u32; 3];
                for (slot, &corner) in ids.iter_mut().zip(tri.iter()) {
                    let fv = face.corners[corner];
                    *slot = *emitted.entry(fv).or_insert_with(|| {
                        let uv = fv
                            .text_coord
                            .map(|t| self.text_coords[t])
                            .unwrap_or_default();
                        mesh.add_vertex(
                            self.vertices[fv.vertex],
                            self.normals[fv.normal],
                            Point2::new(uv.u, uv.v),
                        )
                    });
                }
                mesh.add_triangle(ids[0], ids[1], ids[2]);
            }
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory_with_points(n: usize) -> MeshFactory {
        let mut f = MeshFactory::new("test");
        for i in 0..n {
            f.add_vertex(Point3::new(i as f64, 0.0, 0.0));
        }
        f.add_normal(Vector3::y());
        f
    }

    fn face_of(face_type: FaceType, n: usize) -> Face {
        Face {
            face_type,
            corners: (0..n)
                .map(|i| FaceVertex {
                    vertex: i,
                    text_coord: None,
                    normal: 0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_indices_are_returned_in_order() {
        let mut f = MeshFactory::new("roof");
        assert_eq!(f.add_vertex(Point3::origin()), 0);
        assert_eq!(f.add_vertex(Point3::origin()), 1);
        assert_eq!(f.add_normal(Vector3::y()), 0);
        assert_eq!(f.add_text_coord(TextCoord::new(0.0, 1.0)), 0);
        // no dedup on insert
        assert_eq!(f.add_normal(Vector3::y()), 1);
    }

    #[test]
    fn test_expansion_rules() {
        assert_eq!(
            face_of(FaceType::Triangles, 6).triangles(),
            vec![[0, 1, 2], [3, 4, 5]]
        );
        assert_eq!(
            face_of(FaceType::TriangleFan, 5).triangles(),
            vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]]
        );
        assert_eq!(
            face_of(FaceType::Polygon, 4).triangles(),
            vec![[0, 1, 2], [0, 2, 3]]
        );
        assert_eq!(
            face_of(FaceType::TriangleStrip, 5).triangles(),
            vec![[0, 1, 2], [2, 1, 3], [2, 3, 4]]
        );
        assert_eq!(
            face_of(FaceType::Quads, 8).triangles(),
            vec![[0, 1, 2], [0, 2, 3], [4, 5, 6], [4, 6, 7]]
        );
        assert_eq!(
            face_of(FaceType::QuadStrip, 6).triangles(),
            vec![[0, 1, 3], [0, 3, 2], [2, 3, 5], [2, 5, 4]]
        );
    }

    #[test]
    fn test_incomplete_faces_expand_to_nothing() {
        assert!(face_of(FaceType::Triangles, 2).triangles().is_empty());
        assert!(face_of(FaceType::Quads, 3).triangles().is_empty());
        assert!(face_of(FaceType::QuadStrip, 3).triangles().is_empty());
    }

    #[test]
    fn test_render_mesh_shares_identical_corners() {
        let mut f = factory_with_points(4);
        let t = f.add_text_coord(TextCoord::new(0.5, 0.5));
        f.add_face(FaceType::Quads)
            .add_vert(0, Some(t), 0)
            .add_vert(1, Some(t), 0)
            .add_vert(2, Some(t), 0)
            .add_vert(3, Some(t), 0);

        let mesh = f.to_render_mesh();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(&mesh.uvs[..2], &[0.5, 0.5]);
    }

    #[test]
    fn test_bounds() {
        let f = factory_with_points(3);
        let b = f.bounds().unwrap();
        assert_eq!(b.max.x, 2.0);
        assert!(MeshFactory::new("empty").bounds().is_none());
    }
}
