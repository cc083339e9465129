//! Flat polygon mesh buffers.
//!
//! [`PolyMesh`] is the snapshot a caller hands to the subdivision engine and
//! receives back from it: per-vertex attribute arrays, a uniform-arity index
//! buffer and a list of crease edges. It carries no adjacency; see
//! [`Topology`](super::Topology) for that.

use std::collections::HashSet;
use std::slice::ChunksExact;

use nalgebra::{Point2, Point3, Vector3};

/// Number of vertices per polygon in a [`PolyMesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Three vertices per face.
    Triangle,
    /// Four vertices per face.
    Quad,
}

impl Arity {
    /// Number of vertices per face.
    #[inline]
    pub fn size(self) -> usize {
        match self {
            Arity::Triangle => 3,
            Arity::Quad => 4,
        }
    }

    /// Arity for a face size, if supported.
    pub fn from_size(n: usize) -> Option<Self> {
        match n {
            3 => Some(Arity::Triangle),
            4 => Some(Arity::Quad),
            _ => None,
        }
    }
}

/// A flat triangle or quad mesh.
///
/// Face `i` occupies `indices[i * arity .. (i + 1) * arity]`. Winding order is
/// preserved by every operation in this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyMesh {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,
    /// Optional per-vertex texture coordinates.
    pub texcoords: Option<Vec<Point2<f64>>>,
    /// Optional per-vertex normals.
    pub normals: Option<Vec<Vector3<f64>>>,
    /// Polygon arity shared by every face.
    pub arity: Arity,
    /// Flat polygon index buffer.
    pub indices: Vec<usize>,
    /// Crease edges as pairs of vertex indices.
    pub creases: Vec<[usize; 2]>,
}

impl PolyMesh {
    /// Create a mesh from positions and a flat index buffer.
    ///
    /// No validation happens here; it is deferred to
    /// [`Topology::build`](super::Topology::build).
    pub fn new(positions: Vec<Point3<f64>>, arity: Arity, indices: Vec<usize>) -> Self {
        Self {
            positions,
            texcoords: None,
            normals: None,
            arity,
            indices,
            creases: Vec::new(),
        }
    }

    /// Create a triangle mesh.
    ///
    /// # Example
    /// ```
    /// use crease::mesh::PolyMesh;
    /// use nalgebra::Point3;
    ///
    /// let vertices = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.5, 1.0, 0.0),
    /// ];
    /// let mesh = PolyMesh::from_triangles(&vertices, &[[0, 1, 2]]);
    /// assert_eq!(mesh.num_faces(), 1);
    /// ```
    pub fn from_triangles(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Self {
        Self::new(
            vertices.to_vec(),
            Arity::Triangle,
            faces.iter().flatten().copied().collect(),
        )
    }

    /// Create a quad mesh. Faces should be wound counter-clockwise.
    pub fn from_quads(vertices: &[Point3<f64>], faces: &[[usize; 4]]) -> Self {
        Self::new(
            vertices.to_vec(),
            Arity::Quad,
            faces.iter().flatten().copied().collect(),
        )
    }

    /// Attach texture coordinates.
    pub fn with_texcoords(mut self, texcoords: Vec<Point2<f64>>) -> Self {
        self.texcoords = Some(texcoords);
        self
    }

    /// Attach vertex normals.
    pub fn with_normals(mut self, normals: Vec<Vector3<f64>>) -> Self {
        self.normals = Some(normals);
        self
    }

    /// Mark edges as creases.
    pub fn with_creases(mut self, creases: Vec<[usize; 2]>) -> Self {
        self.creases = creases;
        self
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of complete faces in the index buffer.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.indices.len() / self.arity.size()
    }

    /// Vertex indices of face `i`.
    #[inline]
    pub fn face(&self, i: usize) -> &[usize] {
        let n = self.arity.size();
        &self.indices[i * n..(i + 1) * n]
    }

    /// Iterate over faces as index slices.
    pub fn faces(&self) -> ChunksExact<'_, usize> {
        self.indices.chunks_exact(self.arity.size())
    }

    /// Iterate over faces as triangles. Empty for quad meshes.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.faces().filter_map(|f| f.try_into().ok())
    }

    /// Iterate over faces as quads. Empty for triangle meshes.
    pub fn quads(&self) -> impl Iterator<Item = [usize; 4]> + '_ {
        self.faces().filter_map(|f| f.try_into().ok())
    }

    /// Number of distinct undirected edges referenced by the faces.
    pub fn num_edges(&self) -> usize {
        let mut edges = HashSet::new();
        for face in self.faces() {
            for i in 0..face.len() {
                let a = face[i];
                let b = face[(i + 1) % face.len()];
                edges.insert(if a < b { (a, b) } else { (b, a) });
            }
        }
        edges.len()
    }

    /// Euler characteristic `V - E + F`.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_vertices() as i64 - self.num_edges() as i64 + self.num_faces() as i64
    }

    /// Recompute area-weighted vertex normals from the current faces.
    ///
    /// Subdivision clears normals; call this afterwards if they are needed.
    /// Vertices with no incident area get a zero normal. Faces that reference
    /// a missing vertex are skipped.
    pub fn compute_vertex_normals(&mut self) {
        let nv = self.positions.len();
        let mut normals = vec![Vector3::zeros(); nv];

        for face in self.indices.chunks_exact(self.arity.size()) {
            if face.iter().any(|&vi| vi >= nv) {
                continue;
            }
            let p0 = self.positions[face[0]];
            // Fan triangulation; for planar quads this is twice the area vector.
            let mut area_normal = Vector3::zeros();
            for i in 1..face.len() - 1 {
                let e1 = self.positions[face[i]] - p0;
                let e2 = self.positions[face[i + 1]] - p0;
                area_normal += e1.cross(&e2);
            }
            for &vi in face {
                normals[vi] += area_normal;
            }
        }

        self.normals = Some(
            normals
                .into_iter()
                .map(|n| n.try_normalize(1e-12).unwrap_or_else(Vector3::zeros))
                .collect(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> PolyMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let faces = vec![
            [0, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [2, 3, 7, 6],
            [0, 4, 7, 3],
            [1, 2, 6, 5],
        ];
        PolyMesh::from_quads(&vertices, &faces)
    }

    #[test]
    fn test_arity() {
        assert_eq!(Arity::Triangle.size(), 3);
        assert_eq!(Arity::from_size(4), Some(Arity::Quad));
        assert_eq!(Arity::from_size(5), None);
    }

    #[test]
    fn test_face_access() {
        let mesh = unit_cube();
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_faces(), 6);
        assert_eq!(mesh.face(2), &[0, 1, 5, 4]);
        assert_eq!(mesh.quads().count(), 6);
        assert_eq!(mesh.triangles().count(), 0);
    }

    #[test]
    fn test_cube_edges_and_euler() {
        let mesh = unit_cube();
        assert_eq!(mesh.num_edges(), 12);
        assert_eq!(mesh.euler_characteristic(), 2);
    }

    #[test]
    fn test_vertex_normals_planar_quad() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mut mesh = PolyMesh::from_quads(&vertices, &[[0, 1, 2, 3]]);
        mesh.compute_vertex_normals();

        let normals = mesh.normals.as_ref().unwrap();
        assert_eq!(normals.len(), 4);
        for n in normals {
            assert!((n - Vector3::z()).norm() < 1e-10);
        }
    }

    #[test]
    fn test_isolated_vertex_gets_zero_normal() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(5.0, 5.0, 5.0),
        ];
        let mut mesh = PolyMesh::from_triangles(&vertices, &[[0, 1, 2]]);
        mesh.compute_vertex_normals();

        let normals = mesh.normals.unwrap();
        assert_eq!(normals[3], Vector3::zeros());
        assert!((normals[0] - Vector3::z()).norm() < 1e-10);
    }

    #[test]
    fn test_normals_skip_out_of_range_face() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let mut mesh = PolyMesh::from_triangles(&vertices, &[[0, 1, 2], [0, 2, 9]]);
        mesh.compute_vertex_normals();

        let normals = mesh.normals.unwrap();
        assert_eq!(normals.len(), 3);
        for n in &normals {
            assert!((n - Vector3::z()).norm() < 1e-10);
        }
    }
}
