//! Loop subdivision for triangle meshes.

use nalgebra::{Point2, Point3, SVector, Vector2};

use crate::mesh::{Arity, MeshIndex, PolyMesh, Side, Topology, VertexClass};

use super::{
    classify_vertices, crease_vertex, face_corners, gather, refined_creases, sum_over, PointLayout,
    Scheme,
};

/// Performs one pass of Loop subdivision.
///
/// Every edge gains an "odd" vertex and every original vertex is moved to
/// its "even" position. Each triangle is replaced by three corner triangles
/// and one center triangle. Normals are not carried over.
///
/// # Vertex Rules
///
/// - **Interior edge vertex**: `3/8 * (v0 + v1) + 1/8 * (v_left + v_right)`
/// - **Boundary or crease edge vertex**: `1/2 * (v0 + v1)`
/// - **Smooth vertex** (valence n): `(1 - n*β) * v + β * Σ(neighbors)` with
///   `β = 3/16` for n = 3 and `β = 3/(8n)` otherwise
/// - **Crease vertex** (two sharp edges): `3/4 * v + 1/8 * (left + right)`
/// - **Corner** (more than two sharp edges): unchanged
///
/// # Example
///
/// ```
/// use crease::algo::subdivide::loop_pass;
/// use crease::mesh::{PolyMesh, Topology};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let mesh = PolyMesh::from_triangles(&vertices, &[[0, 1, 2]]);
/// let topo: Topology = Topology::build(&mesh).unwrap();
///
/// let refined = loop_pass(&topo);
/// assert_eq!(refined.num_vertices(), 6);
/// assert_eq!(refined.num_faces(), 4);
/// ```
pub fn loop_pass<I: MeshIndex>(topo: &Topology<I>) -> PolyMesh {
    debug_assert_eq!(topo.arity(), Arity::Triangle);

    let layout = PointLayout::new(Scheme::Loop, topo);
    let classes = classify_vertices(topo);

    let positions: Vec<Point3<f64>> =
        compute_points(topo, &layout, &classes, &gather(topo, |v| v.position.coords))
            .into_iter()
            .map(Point3::from)
            .collect();

    let texcoords = topo.has_texcoords().then(|| {
        let source = gather(topo, |v| v.texcoord.map_or_else(Vector2::zeros, |t| t.coords));
        compute_points(topo, &layout, &classes, &source)
            .into_iter()
            .map(Point2::from)
            .collect::<Vec<_>>()
    });

    PolyMesh {
        positions,
        texcoords,
        normals: None,
        arity: Arity::Triangle,
        indices: build_faces(topo, &layout),
        creases: refined_creases(topo, &layout),
    }
}

/// Loop weight for a smooth vertex of valence `n`.
///
/// This is Warren's simplified weight rather than Loop's original
/// cosine-based formula; valence 3 uses 3/16.
fn loop_beta(n: usize) -> f64 {
    if n == 3 {
        3.0 / 16.0
    } else {
        3.0 / (8.0 * n as f64)
    }
}

/// Apply the Loop stencils to one vertex attribute.
fn compute_points<I: MeshIndex, const D: usize>(
    topo: &Topology<I>,
    layout: &PointLayout,
    classes: &[VertexClass<I>],
    source: &[SVector<f64, D>],
) -> Vec<SVector<f64, D>> {
    let mut points = vec![SVector::<f64, D>::zeros(); layout.num_points()];

    // Odd vertices
    for e in topo.edge_ids() {
        let [a, b] = topo.edge(e).vertices();
        let ends = source[a.index()] + source[b.index()];

        let opposite = if topo.is_sharp(e) {
            None
        } else {
            topo.opposite_vertex(e, Side::First)
                .zip(topo.opposite_vertex(e, Side::Second))
        };

        points[layout.edge_point(e)] = match opposite {
            Some((c, d)) => ends * (3.0 / 8.0) + (source[c.index()] + source[d.index()]) * (1.0 / 8.0),
            None => ends * 0.5,
        };
    }

    // Even vertices
    for v in topo.vertex_ids() {
        let old = source[v.index()];
        points[layout.vertex_point(v)] = match classes[v.index()] {
            VertexClass::Smooth => {
                let n = topo.valence(v);
                if n == 0 {
                    old
                } else {
                    let beta = loop_beta(n);
                    old * (1.0 - n as f64 * beta) + sum_over(source, topo.neighbors_of(v)) * beta
                }
            }
            VertexClass::Crease([a, b]) => crease_vertex(old, source[a.index()], source[b.index()]),
            VertexClass::Corner => old,
        };
    }

    points
}

/// Split every triangle into three corner triangles and a center triangle.
fn build_faces<I: MeshIndex>(topo: &Topology<I>, layout: &PointLayout) -> Vec<usize> {
    let mut indices = Vec::with_capacity(topo.num_faces() * 12);

    for f in topo.face_ids() {
        for (v, incoming, outgoing) in face_corners(topo, f) {
            indices.extend_from_slice(&[
                layout.vertex_point(v),
                layout.edge_point(outgoing),
                layout.edge_point(incoming),
            ]);
        }
        indices.extend(topo.face(f).edges().iter().map(|&e| layout.edge_point(e)));
    }

    indices
}
