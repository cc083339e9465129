//! Adjacency queries over a [`Topology`].
//!
//! Edges are classified as crease (explicitly marked), boundary (fewer than
//! two incident faces) or smooth. An edge that is either crease or boundary
//! is called *sharp*; the subdivision stencils only distinguish sharp from
//! smooth. All queries are pure functions of the immutable graph.

use super::index::{EdgeId, FaceId, MeshIndex, VertexId};
use super::topology::Topology;

/// Selects one of the (up to two) faces incident to an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The first face recorded for the edge.
    First,
    /// The second face recorded for the edge, absent on boundaries.
    Second,
}

impl Side {
    /// Both sides, in order.
    pub const BOTH: [Side; 2] = [Side::First, Side::Second];

    #[inline]
    fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }
}

/// How a vertex is updated, decided by its sharp-edge count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexClass<I: MeshIndex = u32> {
    /// Zero or one sharp edge: smooth valence stencil.
    Smooth,
    /// Exactly two sharp edges; holds the neighbors along them.
    Crease([VertexId<I>; 2]),
    /// More than two sharp edges: the vertex is frozen.
    Corner,
}

impl<I: MeshIndex> Topology<I> {
    /// Whether the edge is marked as a crease.
    #[inline]
    pub fn is_crease(&self, e: EdgeId<I>) -> bool {
        self.creases.contains(&e)
    }

    /// Whether the edge has fewer than two incident faces.
    #[inline]
    pub fn is_boundary(&self, e: EdgeId<I>) -> bool {
        self.edge(e).faces().len() < 2
    }

    /// Whether the edge is a crease or a boundary.
    #[inline]
    pub fn is_sharp(&self, e: EdgeId<I>) -> bool {
        self.is_crease(e) || self.is_boundary(e)
    }

    /// Crease edges incident to a vertex.
    pub fn crease_edges_of(&self, v: VertexId<I>) -> Vec<EdgeId<I>> {
        self.incident_edges(v).filter(|&e| self.is_crease(e)).collect()
    }

    /// Boundary edges incident to a vertex.
    pub fn boundary_edges_of(&self, v: VertexId<I>) -> Vec<EdgeId<I>> {
        self.incident_edges(v).filter(|&e| self.is_boundary(e)).collect()
    }

    /// Edges incident to a vertex that are crease or boundary, each once.
    pub fn sharp_edges_of(&self, v: VertexId<I>) -> Vec<EdgeId<I>> {
        self.incident_edges(v).filter(|&e| self.is_sharp(e)).collect()
    }

    /// Edges incident to a vertex.
    pub fn incident_edges(&self, v: VertexId<I>) -> impl Iterator<Item = EdgeId<I>> + '_ {
        self.vertex(v).links().iter().map(|&(e, _)| e)
    }

    /// Vertices adjacent to a vertex.
    pub fn neighbors_of(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex(v).links().iter().map(|&(_, n)| n)
    }

    /// Number of edges incident to a vertex.
    #[inline]
    pub fn valence(&self, v: VertexId<I>) -> usize {
        self.vertex(v).links().len()
    }

    /// Faces incident to a vertex, each once, in first-encountered order.
    pub fn faces_of(&self, v: VertexId<I>) -> Vec<FaceId<I>> {
        let mut faces = Vec::new();
        for e in self.incident_edges(v) {
            for &f in self.edge(e).faces() {
                if !faces.contains(&f) {
                    faces.push(f);
                }
            }
        }
        faces
    }

    /// The endpoint of `e` that is not `v`.
    #[inline]
    pub fn other_endpoint(&self, e: EdgeId<I>, v: VertexId<I>) -> VertexId<I> {
        let [a, b] = self.edge(e).vertices();
        if a == v {
            b
        } else {
            a
        }
    }

    /// The vertex two edges have in common.
    pub fn shared_vertex(&self, e1: EdgeId<I>, e2: EdgeId<I>) -> Option<VertexId<I>> {
        let [a, b] = self.edge(e1).vertices();
        let other = self.edge(e2).vertices();
        if other.contains(&a) {
            Some(a)
        } else if other.contains(&b) {
            Some(b)
        } else {
            None
        }
    }

    /// The remaining edges of one face incident to `pivot`, in winding order.
    ///
    /// The face's edge list is rotated to start just after `pivot` and then
    /// reversed if needed, so the returned sequence always begins with the
    /// edge that touches `pivot`'s first endpoint. A side with no face
    /// yields an empty list.
    pub fn edges_around_face(&self, pivot: EdgeId<I>, side: Side) -> Vec<EdgeId<I>> {
        let edge = self.edge(pivot);
        let Some(&f) = edge.faces().get(side.index()) else {
            return Vec::new();
        };

        let edges = self.face(f).edges();
        let n = edges.len();
        let Some(k) = edges.iter().position(|&e| e == pivot) else {
            return Vec::new();
        };

        let mut around: Vec<EdgeId<I>> = (1..n).map(|i| edges[(k + i) % n]).collect();
        if let Some(&first) = around.first() {
            if self.shared_vertex(first, pivot) != Some(edge.vertices()[0]) {
                around.reverse();
            }
        }
        around
    }

    /// The vertex of a triangle across from `e` on the given side.
    ///
    /// Returns `None` when that side has no face or the face is not a triangle.
    pub fn opposite_vertex(&self, e: EdgeId<I>, side: Side) -> Option<VertexId<I>> {
        match self.edges_around_face(e, side).as_slice() {
            &[a, b] => self.shared_vertex(a, b),
            _ => None,
        }
    }

    /// Classify a vertex by its number of sharp edges.
    pub fn classify_vertex(&self, v: VertexId<I>) -> VertexClass<I> {
        match self.sharp_edges_of(v).as_slice() {
            [] | [_] => VertexClass::Smooth,
            &[a, b] => VertexClass::Crease([self.other_endpoint(a, v), self.other_endpoint(b, v)]),
            _ => VertexClass::Corner,
        }
    }
}
