//! Edge/face adjacency reconstructed from a flat mesh.
//!
//! A [`Topology`] is built once from a [`PolyMesh`] snapshot and is read-only
//! afterwards. It records, for every vertex, the deduplicated list of
//! `(edge, neighbor)` links; for every undirected edge, its endpoints and the
//! faces that use it; and for every face, its vertices and edges in winding
//! order, where edge `i` joins vertex `i` to vertex `(i + 1) % n`.
//!
//! Construction validates eagerly: an out-of-range index, a degenerate face,
//! an edge shared by more than two faces or a crease that names no edge all
//! fail the build, and no partially built graph is returned. So does a mesh
//! with more vertices, edges or faces than the index type `I` can name.

use std::collections::BTreeSet;

use log::trace;
use nalgebra::{Point2, Point3, Vector3};

use super::index::{EdgeId, FaceId, MeshIndex, VertexId};
use super::poly::{Arity, PolyMesh};
use crate::error::{MeshError, Result};

/// A vertex and its incident connectivity.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// Position of the vertex.
    pub position: Point3<f64>,
    /// Texture coordinate, when the source mesh has them.
    pub texcoord: Option<Point2<f64>>,
    /// Normal, when the source mesh has them.
    pub normal: Option<Vector3<f64>>,
    links: Vec<(EdgeId<I>, VertexId<I>)>,
}

impl<I: MeshIndex> Vertex<I> {
    fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            texcoord: None,
            normal: None,
            links: Vec::new(),
        }
    }

    /// Incident `(edge, neighbor)` pairs, one per neighbor.
    #[inline]
    pub fn links(&self) -> &[(EdgeId<I>, VertexId<I>)] {
        &self.links
    }
}

/// An undirected edge.
#[derive(Debug, Clone)]
pub struct Edge<I: MeshIndex = u32> {
    vertices: [VertexId<I>; 2],
    faces: Vec<FaceId<I>>,
}

impl<I: MeshIndex> Edge<I> {
    /// Endpoints, in the order the edge was first seen.
    #[inline]
    pub fn vertices(&self) -> [VertexId<I>; 2] {
        self.vertices
    }

    /// Incident faces (one for a boundary edge, two for an interior edge).
    #[inline]
    pub fn faces(&self) -> &[FaceId<I>] {
        &self.faces
    }
}

/// A polygon with parallel vertex and edge lists.
#[derive(Debug, Clone)]
pub struct Face<I: MeshIndex = u32> {
    vertices: Vec<VertexId<I>>,
    edges: Vec<EdgeId<I>>,
}

impl<I: MeshIndex> Face<I> {
    /// Vertices in winding order.
    #[inline]
    pub fn vertices(&self) -> &[VertexId<I>] {
        &self.vertices
    }

    /// Edges in winding order; edge `i` joins vertex `i` and vertex `i + 1`.
    #[inline]
    pub fn edges(&self) -> &[EdgeId<I>] {
        &self.edges
    }

    /// Number of sides.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True for a face with no vertices (never produced by the builder).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Immutable adjacency graph of a triangle or quad mesh.
#[derive(Debug, Clone)]
pub struct Topology<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Vertex<I>>,
    pub(crate) edges: Vec<Edge<I>>,
    pub(crate) faces: Vec<Face<I>>,
    pub(crate) creases: BTreeSet<EdgeId<I>>,
    arity: Arity,
    has_texcoords: bool,
}

impl<I: MeshIndex> Topology<I> {
    /// Build the adjacency graph of a mesh.
    ///
    /// # Example
    /// ```
    /// use crease::mesh::{PolyMesh, Topology};
    /// use nalgebra::Point3;
    ///
    /// let vertices = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(1.0, 1.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// ];
    /// let mesh = PolyMesh::from_quads(&vertices, &[[0, 1, 2, 3]]).with_creases(vec![[0, 1]]);
    ///
    /// let topo: Topology = Topology::build(&mesh).unwrap();
    /// assert_eq!(topo.num_edges(), 4);
    /// assert_eq!(topo.num_creases(), 1);
    /// ```
    pub fn build(mesh: &PolyMesh) -> Result<Self> {
        validate::<I>(mesh)?;

        let mut builder = TopologyBuilder::new(mesh);
        for (fi, face) in mesh.faces().enumerate() {
            builder.add_face(fi, face)?;
        }
        for &[a, b] in &mesh.creases {
            builder.add_crease(a, b)?;
        }

        let topo = builder.finish();
        trace!(
            "built topology: {} vertices, {} edges, {} faces, {} creases",
            topo.num_vertices(),
            topo.num_edges(),
            topo.num_faces(),
            topo.num_creases()
        );
        Ok(topo)
    }

    /// Polygon arity of the source mesh.
    #[inline]
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of undirected edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Number of distinct crease edges.
    #[inline]
    pub fn num_creases(&self) -> usize {
        self.creases.len()
    }

    /// Whether the source mesh carried texture coordinates.
    #[inline]
    pub fn has_texcoords(&self) -> bool {
        self.has_texcoords
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get an edge by ID.
    #[inline]
    pub fn edge(&self, id: EdgeId<I>) -> &Edge<I> {
        &self.edges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all edge IDs.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over crease edges in ascending id order.
    pub fn crease_ids(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        self.creases.iter().copied()
    }

    /// Find the edge joining `a` and `b`, in either direction.
    pub fn find_edge(&self, a: VertexId<I>, b: VertexId<I>) -> Option<EdgeId<I>> {
        find_edge(&self.vertices, a, b)
    }
}

/// Search `a`'s links for `b`, then `b`'s links for `a`.
fn find_edge<I: MeshIndex>(
    vertices: &[Vertex<I>],
    a: VertexId<I>,
    b: VertexId<I>,
) -> Option<EdgeId<I>> {
    let lookup = |from: VertexId<I>, to: VertexId<I>| {
        vertices[from.index()]
            .links
            .iter()
            .find(|&&(_, n)| n == to)
            .map(|&(e, _)| e)
    };
    lookup(a, b).or_else(|| lookup(b, a))
}

/// Fail if `count` elements would need an id larger than `I::MAX`.
fn check_capacity<I: MeshIndex>(element: &'static str, count: usize) -> Result<()> {
    let max = I::MAX.to_usize();
    match count.checked_sub(1) {
        Some(last) if last > max => Err(MeshError::IndexOverflow { element, count, max }),
        _ => Ok(()),
    }
}

fn validate<I: MeshIndex>(mesh: &PolyMesh) -> Result<()> {
    let n = mesh.arity.size();
    if mesh.indices.len() % n != 0 {
        return Err(MeshError::IndexBufferLength {
            len: mesh.indices.len(),
            arity: n,
        });
    }

    let nv = mesh.num_vertices();
    check_capacity::<I>("vertex", nv)?;
    check_capacity::<I>("face", mesh.num_faces())?;

    if let Some(texcoords) = &mesh.texcoords {
        if texcoords.len() != nv {
            return Err(MeshError::AttributeLength {
                attribute: "texcoord",
                expected: nv,
                actual: texcoords.len(),
            });
        }
    }
    if let Some(normals) = &mesh.normals {
        if normals.len() != nv {
            return Err(MeshError::AttributeLength {
                attribute: "normal",
                expected: nv,
                actual: normals.len(),
            });
        }
    }

    for (fi, face) in mesh.faces().enumerate() {
        for &vi in face {
            if vi >= nv {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        for i in 0..face.len() {
            if face[i + 1..].contains(&face[i]) {
                return Err(MeshError::DegenerateFace { face: fi });
            }
        }
    }

    Ok(())
}

/// Owned state for one [`Topology::build`] call.
struct TopologyBuilder<I: MeshIndex> {
    vertices: Vec<Vertex<I>>,
    edges: Vec<Edge<I>>,
    faces: Vec<Face<I>>,
    creases: BTreeSet<EdgeId<I>>,
    arity: Arity,
    has_texcoords: bool,
}

impl<I: MeshIndex> TopologyBuilder<I> {
    fn new(mesh: &PolyMesh) -> Self {
        let mut vertices: Vec<Vertex<I>> = mesh.positions.iter().map(|&p| Vertex::new(p)).collect();
        if let Some(texcoords) = &mesh.texcoords {
            for (v, &uv) in vertices.iter_mut().zip(texcoords) {
                v.texcoord = Some(uv);
            }
        }
        if let Some(normals) = &mesh.normals {
            for (v, &n) in vertices.iter_mut().zip(normals) {
                v.normal = Some(n);
            }
        }

        Self {
            vertices,
            edges: Vec::with_capacity(mesh.num_faces() * mesh.arity.size() / 2 + 1),
            faces: Vec::with_capacity(mesh.num_faces()),
            creases: BTreeSet::new(),
            arity: mesh.arity,
            has_texcoords: mesh.texcoords.is_some(),
        }
    }

    fn add_face(&mut self, fi: usize, face: &[usize]) -> Result<()> {
        let face_id = FaceId::new(fi);
        let n = face.len();
        let mut edges = Vec::with_capacity(n);

        for i in 0..n {
            let a = VertexId::new(face[i]);
            let b = VertexId::new(face[(i + 1) % n]);

            let e = match find_edge(&self.vertices, a, b) {
                Some(e) => e,
                None => self.allocate_edge(a, b)?,
            };
            self.link(a, e, b);
            self.link(b, e, a);

            let edge = &mut self.edges[e.index()];
            edge.faces.push(face_id);
            if edge.faces.len() > 2 {
                return Err(MeshError::NonManifoldEdge {
                    v0: edge.vertices[0].index(),
                    v1: edge.vertices[1].index(),
                });
            }
            edges.push(e);
        }

        self.faces.push(Face {
            vertices: face.iter().map(|&v| VertexId::new(v)).collect(),
            edges,
        });
        Ok(())
    }

    fn allocate_edge(&mut self, a: VertexId<I>, b: VertexId<I>) -> Result<EdgeId<I>> {
        // Edge count is only known once faces are linked.
        check_capacity::<I>("edge", self.edges.len() + 1)?;
        let id = EdgeId::new(self.edges.len());
        self.edges.push(Edge {
            vertices: [a, b],
            faces: Vec::with_capacity(2),
        });
        Ok(id)
    }

    fn link(&mut self, v: VertexId<I>, e: EdgeId<I>, neighbor: VertexId<I>) {
        let links = &mut self.vertices[v.index()].links;
        if !links.iter().any(|&(_, n)| n == neighbor) {
            links.push((e, neighbor));
        }
    }

    fn add_crease(&mut self, a: usize, b: usize) -> Result<()> {
        let nv = self.vertices.len();
        let edge = if a < nv && b < nv {
            find_edge(&self.vertices, VertexId::new(a), VertexId::new(b))
        } else {
            None
        };
        match edge {
            Some(e) => {
                self.creases.insert(e);
                Ok(())
            }
            None => Err(MeshError::UnknownCreaseEdge { v0: a, v1: b }),
        }
    }

    fn finish(self) -> Topology<I> {
        Topology {
            vertices: self.vertices,
            edges: self.edges,
            faces: self.faces,
            creases: self.creases,
            arity: self.arity,
            has_texcoords: self.has_texcoords,
        }
    }
}
