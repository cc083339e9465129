//! Catmull-Clark subdivision for quad meshes.

use nalgebra::{Point2, Point3, SVector, Vector2};

use crate::mesh::{Arity, MeshIndex, PolyMesh, Topology, VertexClass};

use super::{
    classify_vertices, crease_vertex, face_corners, gather, refined_creases, sum_over, PointLayout,
    Scheme,
};

/// Performs one pass of Catmull-Clark subdivision.
///
/// The output has one vertex per original vertex, edge and face, laid out as
/// described by [`PointLayout`], and one quad per corner of every original
/// face. Normals are not carried over.
///
/// # Vertex Rules
///
/// - **Face point**: centroid of the face vertices
/// - **Edge point**: `(v0 + v1 + f0 + f1) / 4` on smooth interior edges, the
///   midpoint on boundary and crease edges
/// - **Smooth vertex** (valence n): `(1 - 2/n) * S + (ΣR + ΣF) / n²` where R
///   are the neighbor vertices and F the incident face points
/// - **Crease vertex** (two sharp edges): `3/4 * S + 1/8 * (a + b)`
/// - **Corner** (more than two sharp edges): unchanged
///
/// # Example
///
/// ```
/// use crease::algo::subdivide::catmull_clark_pass;
/// use crease::mesh::{PolyMesh, Topology};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh = PolyMesh::from_quads(&vertices, &[[0, 1, 2, 3]]);
/// let topo: Topology = Topology::build(&mesh).unwrap();
///
/// let refined = catmull_clark_pass(&topo);
/// assert_eq!(refined.num_vertices(), 9);
/// assert_eq!(refined.num_faces(), 4);
/// ```
pub fn catmull_clark_pass<I: MeshIndex>(topo: &Topology<I>) -> PolyMesh {
    debug_assert_eq!(topo.arity(), Arity::Quad);

    let layout = PointLayout::new(Scheme::CatmullClark, topo);
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
        arity: Arity::Quad,
        indices: build_faces(topo, &layout),
        creases: refined_creases(topo, &layout),
    }
}

/// Apply the Catmull-Clark stencils to one vertex attribute.
///
/// Returns every output point, indexed by `layout`.
fn compute_points<I: MeshIndex, const D: usize>(
    topo: &Topology<I>,
    layout: &PointLayout,
    classes: &[VertexClass<I>],
    source: &[SVector<f64, D>],
) -> Vec<SVector<f64, D>> {
    let mut points = vec![SVector::<f64, D>::zeros(); layout.num_points()];

    // Step 1: Face points (centroids)
    let face_points: Vec<SVector<f64, D>> = topo
        .face_ids()
        .map(|f| {
            let face = topo.face(f);
            sum_over(source, face.vertices().iter().copied()) / face.len() as f64
        })
        .collect();
    for (f, fp) in topo.face_ids().zip(&face_points) {
        if let Some(i) = layout.face_point(f) {
            points[i] = *fp;
        }
    }

    // Step 2: Edge points
    for e in topo.edge_ids() {
        let edge = topo.edge(e);
        let [a, b] = edge.vertices();
        let ends = source[a.index()] + source[b.index()];

        points[layout.edge_point(e)] = match edge.faces() {
            [f0, f1] if !topo.is_crease(e) => {
                (ends + face_points[f0.index()] + face_points[f1.index()]) * 0.25
            }
            _ => ends * 0.5,
        };
    }

    // Step 3: Updated original vertices
    for v in topo.vertex_ids() {
        let old = source[v.index()];
        points[layout.vertex_point(v)] = match classes[v.index()] {
            VertexClass::Smooth => {
                let n = topo.valence(v);
                if n == 0 {
                    old
                } else {
                    let n_f = n as f64;
                    let neighbor_sum = sum_over(source, topo.neighbors_of(v));
                    let face_sum = topo
                        .faces_of(v)
                        .into_iter()
                        .fold(SVector::<f64, D>::zeros(), |acc, f| acc + face_points[f.index()]);
                    old * (1.0 - 2.0 / n_f) + (neighbor_sum + face_sum) / (n_f * n_f)
                }
            }
            VertexClass::Crease([a, b]) => crease_vertex(old, source[a.index()], source[b.index()]),
            VertexClass::Corner => old,
        };
    }

    points
}

/// Split every face into one quad per corner.
///
/// The quad at corner `v` between edges `e_in` and `e_out` is
/// `(v, edge_point(e_out), face_point, edge_point(e_in))`, which keeps the
/// original winding.
fn build_faces<I: MeshIndex>(topo: &Topology<I>, layout: &PointLayout) -> Vec<usize> {
    let mut indices = Vec::with_capacity(topo.num_faces() * 16);

    for f in topo.face_ids() {
        let Some(fp) = layout.face_point(f) else {
            continue;
        };
        for (v, incoming, outgoing) in face_corners(topo, f) {
            indices.extend_from_slice(&[
                layout.vertex_point(v),
                layout.edge_point(outgoing),
                fp,
                layout.edge_point(incoming),
            ]);
        }
    }

    indices
}

#[cfg(test)]
mod tests {
    use nalgebra::Vector3;

    use super::*;
    use crate::mesh::{EdgeId, FaceId, VertexId};

    fn build(mesh: &PolyMesh) -> Topology {
        Topology::build(mesh).unwrap()
    }

    fn single_quad() -> PolyMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        PolyMesh::from_quads(&vertices, &[[0, 1, 2, 3]])
    }

    fn two_quads() -> PolyMesh {
        // Two quads sharing edge (1, 2)
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        PolyMesh::from_quads(&vertices, &[[0, 1, 2, 3], [1, 4, 5, 2]])
    }

    fn quad_cube() -> PolyMesh {
        let vertices = vec![
            // Bottom face (z = 0)
            Point3::new(0.0, 0.0, 0.0), // 0
            Point3::new(1.0, 0.0, 0.0), // 1
            Point3::new(1.0, 1.0, 0.0), // 2
            Point3::new(0.0, 1.0, 0.0), // 3
            // Top face (z = 1)
            Point3::new(0.0, 0.0, 1.0), // 4
            Point3::new(1.0, 0.0, 1.0), // 5
            Point3::new(1.0, 1.0, 1.0), // 6
            Point3::new(0.0, 1.0, 1.0), // 7
        ];
        let faces = vec![
            [0, 3, 2, 1], // Bottom (CCW when viewed from below)
            [4, 5, 6, 7], // Top
            [0, 1, 5, 4], // Front
            [2, 3, 7, 6], // Back
            [0, 4, 7, 3], // Left
            [1, 2, 6, 5], // Right
        ];
        PolyMesh::from_quads(&vertices, &faces)
    }

    fn edge_point(topo: &Topology, refined: &PolyMesh, a: usize, b: usize) -> Point3<f64> {
        let e = topo.find_edge(VertexId::new(a), VertexId::new(b)).unwrap();
        let layout = PointLayout::new(Scheme::CatmullClark, topo);
        refined.positions[layout.edge_point(e)]
    }

    #[test]
    fn test_single_quad() {
        let mesh = single_quad();
        let topo = build(&mesh);
        let refined = catmull_clark_pass(&topo);

        // 4 original + 1 face point + 4 edge points = 9
        assert_eq!(refined.num_vertices(), 9);
        assert_eq!(refined.num_faces(), 4);
        assert_eq!(refined.arity, Arity::Quad);

        // Every edge is a boundary: edge points are midpoints
        assert!((edge_point(&topo, &refined, 0, 1) - Point3::new(0.5, 0.0, 0.0)).norm() < 1e-10);
        assert!((edge_point(&topo, &refined, 3, 0) - Point3::new(0.0, 0.5, 0.0)).norm() < 1e-10);

        // Boundary vertex rule: 3/4 * v + 1/8 * (left + right)
        assert!((refined.positions[2] - Point3::new(0.875, 0.875, 0.0)).norm() < 1e-10);
    }

    #[test]
    fn test_two_quads_interior_edge_point() {
        let mesh = two_quads();
        let topo = build(&mesh);
        let refined = catmull_clark_pass(&topo);

        // 6 original + 2 face points + 7 edge points = 15
        assert_eq!(refined.num_vertices(), 15);
        assert_eq!(refined.num_faces(), 8);

        // Shared edge: ((1,0) + (1,1) + (0.5,0.5) + (1.5,0.5)) / 4
        let shared = edge_point(&topo, &refined, 1, 2);
        assert!((shared - Point3::new(1.0, 0.5, 0.0)).norm() < 1e-10);

        // Boundary edge keeps the midpoint
        let boundary = edge_point(&topo, &refined, 4, 5);
        assert!((boundary - Point3::new(2.0, 0.5, 0.0)).norm() < 1e-10);
    }

    #[test]
    fn test_interior_edge_point_off_plane() {
        // Lift the far corners so the face points differ from the edge midpoint
        let mut mesh = two_quads();
        mesh.positions[0].z = 1.0;
        mesh.positions[4].z = 1.0;
        let topo = build(&mesh);
        let refined = catmull_clark_pass(&topo);

        // Face points: z = 0.25 each; ends z = 0 -> (0 + 0 + 0.25 + 0.25) / 4
        let shared = edge_point(&topo, &refined, 1, 2);
        assert!((shared - Point3::new(1.0, 0.5, 0.125)).norm() < 1e-10);
    }

    #[test]
    fn test_crease_edge_uses_midpoint() {
        let mut mesh = two_quads().with_creases(vec![[1, 2]]);
        mesh.positions[0].z = 1.0;
        let topo = build(&mesh);
        let refined = catmull_clark_pass(&topo);

        let shared = edge_point(&topo, &refined, 1, 2);
        assert!((shared - Point3::new(1.0, 0.5, 0.0)).norm() < 1e-10);
        assert_eq!(refined.creases.len(), 2);
    }

    #[test]
    fn test_crease_on_boundary_edge_counted_once() {
        let mesh = single_quad().with_creases(vec![[0, 1]]);
        let topo = build(&mesh);
        let refined = catmull_clark_pass(&topo);

        // (0, 1) is both crease and boundary; with (3, 0) that makes two sharp edges
        assert_eq!(
            topo.classify_vertex(VertexId::new(0)),
            VertexClass::Crease([VertexId::new(1), VertexId::new(3)])
        );
        // 3/4 * (0,0,0) + 1/8 * ((1,0,0) + (0,1,0))
        assert!((refined.positions[0] - Point3::new(0.125, 0.125, 0.0)).norm() < 1e-10);
        assert!((edge_point(&topo, &refined, 0, 1) - Point3::new(0.5, 0.0, 0.0)).norm() < 1e-10);
        assert_eq!(refined.creases.len(), 2);
    }

    #[test]
    fn test_cube_smooth_vertex_stencil() {
        let mesh = quad_cube();
        let topo = build(&mesh);
        let refined = catmull_clark_pass(&topo);

        // Valence 3: (1 - 2/3) * S + (ΣR + ΣF) / 9
        // S = (0,0,0), ΣR = (1,0,0)+(0,1,0)+(0,0,1), faces: bottom, front, left
        // ΣF = (0.5,0.5,0) + (0.5,0,0.5) + (0,0.5,0.5) = (1,1,1)
        let expected = Point3::new(2.0 / 9.0, 2.0 / 9.0, 2.0 / 9.0);
        assert!((refined.positions[0] - expected).norm() < 1e-10);
    }

    #[test]
    fn test_cube_with_two_creases() {
        // Creases (0,1) and (1,2) meet at vertex 1
        let mesh = quad_cube().with_creases(vec![[0, 1], [1, 2]]);
        let topo = build(&mesh);
        let refined = catmull_clark_pass(&topo);

        assert_eq!(refined.num_vertices(), 8 + 12 + 6);
        assert_eq!(refined.creases.len(), 4);

        // Vertex 1 follows the crease: 0.75 * (1,0,0) + 0.125 * ((0,0,0) + (1,1,0))
        assert!((refined.positions[1] - Point3::new(0.875, 0.125, 0.0)).norm() < 1e-10);

        // Vertex 0 touches a single crease and stays on the smooth stencil
        let expected = Point3::new(2.0 / 9.0, 2.0 / 9.0, 2.0 / 9.0);
        assert!((refined.positions[0] - expected).norm() < 1e-10);

        // Vertex 6 is untouched by creases
        let expected = Point3::new(7.0 / 9.0, 7.0 / 9.0, 7.0 / 9.0);
        assert!((refined.positions[6] - expected).norm() < 1e-10);
    }

    #[test]
    fn test_corner_vertex_is_frozen() {
        let mesh = quad_cube().with_creases(vec![[0, 1], [0, 3], [0, 4]]);
        let topo = build(&mesh);
        let refined = catmull_clark_pass(&topo);

        assert_eq!(refined.positions[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(refined.creases.len(), 6);
    }

    #[test]
    fn test_refined_creases_pass_through_edge_point() {
        let mesh = quad_cube().with_creases(vec![[5, 6]]);
        let topo = build(&mesh);
        let refined = catmull_clark_pass(&topo);

        let e = topo.find_edge(VertexId::new(5), VertexId::new(6)).unwrap();
        let ep = PointLayout::new(Scheme::CatmullClark, &topo).edge_point(e);
        let [a, b] = topo.edge(e).vertices();
        assert_eq!(refined.creases, vec![[a.index(), ep], [ep, b.index()]]);

        // The refined crease edges are real edges of the refined mesh
        let next = build(&refined);
        for &[x, y] in &refined.creases {
            assert!(next.find_edge(VertexId::new(x), VertexId::new(y)).is_some());
        }
    }

    #[test]
    fn test_faces_keep_winding() {
        let mesh = single_quad();
        let topo = build(&mesh);
        let refined = catmull_clark_pass(&topo);

        let layout = PointLayout::new(Scheme::CatmullClark, &topo);
        let fp = layout.face_point(FaceId::<u32>::new(0)).unwrap();
        let e0 = layout.edge_point(EdgeId::<u32>::new(0));
        let e3 = layout.edge_point(EdgeId::<u32>::new(3));
        assert_eq!(refined.face(0), &[0, e0, fp, e3]);

        // All child quads face +z like the parent
        let mut refined = refined;
        refined.compute_vertex_normals();
        for n in refined.normals.unwrap() {
            assert!((n - Vector3::z()).norm() < 1e-10);
        }
    }

    #[test]
    fn test_closed_mesh_stays_closed() {
        let topo = build(&quad_cube());
        let refined = catmull_clark_pass(&topo);
        let next = build(&refined);

        assert_eq!(next.num_edges(), 2 * 12 + 4 * 6);
        for e in next.edge_ids() {
            assert!(!next.is_boundary(e));
        }
        assert_eq!(refined.euler_characteristic(), 2);
    }

    #[test]
    fn test_boundary_preserved() {
        let topo = build(&two_quads());
        let refined = catmull_clark_pass(&topo);
        let next = build(&refined);

        let boundary_before = topo.edge_ids().filter(|&e| topo.is_boundary(e)).count();
        let boundary_after = next.edge_ids().filter(|&e| next.is_boundary(e)).count();
        assert_eq!(boundary_after, 2 * boundary_before);

        // Boundary vertices never take the smooth stencil: they stay on the plane's border
        for v in topo.vertex_ids() {
            assert!(matches!(topo.classify_vertex(v), VertexClass::Crease(_)));
        }
        assert!((refined.positions[0] - Point3::new(0.125, 0.125, 0.0)).norm() < 1e-10);
    }

    #[test]
    fn test_texcoords_interpolated() {
        let uvs = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let mesh = single_quad().with_texcoords(uvs);
        let refined = catmull_clark_pass(&build(&mesh));

        let uvs = refined.texcoords.unwrap();
        assert_eq!(uvs.len(), 9);
        assert!((uvs[4] - Point2::new(0.5, 0.5)).norm() < 1e-10);
        assert!((uvs[0] - Point2::new(0.125, 0.125)).norm() < 1e-10);
    }

    #[test]
    fn test_normals_cleared() {
        let mesh = single_quad().with_normals(vec![Vector3::z(); 4]);
        let refined = catmull_clark_pass(&build(&mesh));
        assert!(refined.normals.is_none());
        assert!(refined.texcoords.is_none());
    }
}
