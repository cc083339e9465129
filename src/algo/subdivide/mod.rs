//! Mesh subdivision with crease edges.
//!
//! Two approximating schemes are provided, each selected explicitly through
//! [`Scheme`]:
//!
//! # Catmull-Clark Subdivision (Quad Meshes)
//!
//! Each pass:
//!
//! 1. Creates a face point at each face centroid
//! 2. Creates an edge point per edge: the average of its endpoints and both
//!    face points, or the plain midpoint on boundary and crease edges
//! 3. Updates original vertices according to how many sharp edges meet there
//! 4. Splits each quad into four quads around its face point
//!
//! # Loop Subdivision (Triangle Meshes)
//!
//! Each pass:
//!
//! 1. Inserts an "odd" vertex on every edge (weighted by the two opposite
//!    vertices on interior edges, the midpoint on sharp edges)
//! 2. Updates original "even" vertices from their one-ring
//! 3. Splits each triangle into four
//!
//! # Sharp Features
//!
//! Boundary edges and edges listed in [`PolyMesh::creases`] are *sharp*. A
//! vertex with exactly two sharp edges follows the curve they form, and a
//! vertex with more than two stays where it is. Every crease edge becomes two
//! crease edges in the refined mesh, so creases survive repeated passes.
//!
//! Texture coordinates go through the same stencils as positions. Normals are
//! cleared by every pass; see [`PolyMesh::compute_vertex_normals`].
//!
//! # Example
//!
//! ```
//! use crease::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh = PolyMesh::from_quads(&vertices, &[[0, 1, 2, 3]]);
//!
//! let refined = refine(&mesh, &SubdivideOptions::catmull_clark(2)).unwrap();
//! assert_eq!(refined.num_faces(), 16);
//! ```
//!
//! # References
//!
//! - Loop, C. (1987). "Smooth Subdivision Surfaces Based on Triangles."
//!   Master's thesis, University of Utah.
//! - Catmull, E. & Clark, J. (1978). "Recursively generated B-spline surfaces
//!   on arbitrary topological meshes." Computer-Aided Design, 10(6), 350-355.

mod catmull_clark;
mod loop_subdivision;

pub use catmull_clark::catmull_clark_pass;
pub use loop_subdivision::loop_pass;

use log::{debug, warn};
use nalgebra::SVector;
use rayon::prelude::*;

use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{Arity, EdgeId, FaceId, MeshIndex, PolyMesh, Topology, Vertex, VertexClass, VertexId};

/// Subdivision scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Catmull-Clark, for quad meshes.
    CatmullClark,
    /// Loop, for triangle meshes.
    Loop,
}

impl Scheme {
    /// The scheme that accepts meshes of the given arity.
    pub fn for_arity(arity: Arity) -> Self {
        match arity {
            Arity::Triangle => Scheme::Loop,
            Arity::Quad => Scheme::CatmullClark,
        }
    }

    /// The polygon arity this scheme consumes and produces.
    pub fn arity(self) -> Arity {
        match self {
            Scheme::CatmullClark => Arity::Quad,
            Scheme::Loop => Arity::Triangle,
        }
    }

    /// Face count after `levels` passes over a mesh with `faces` faces.
    ///
    /// Both schemes split every face into four. Saturates instead of overflowing.
    pub fn projected_faces(self, faces: usize, levels: usize) -> usize {
        (0..levels).fold(faces, |n, _| n.saturating_mul(4))
    }

    fn label(self) -> &'static str {
        match self {
            Scheme::CatmullClark => "Catmull-Clark subdivision",
            Scheme::Loop => "Loop subdivision",
        }
    }
}

/// Options for subdivision.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Which scheme to apply.
    pub scheme: Scheme,

    /// Number of sequential passes. Zero returns the input unchanged.
    pub levels: usize,

    /// Largest face count the final mesh may have.
    pub max_faces: usize,

    /// Whether [`refine_batch`] may refine meshes in parallel (default: true).
    /// A single pass is always sequential.
    pub parallel: bool,
}

impl SubdivideOptions {
    /// Default face limit.
    pub const DEFAULT_MAX_FACES: usize = 50_000_000;

    /// Create options for the given scheme and number of levels.
    pub fn new(scheme: Scheme, levels: usize) -> Self {
        Self {
            scheme,
            levels,
            max_faces: Self::DEFAULT_MAX_FACES,
            parallel: true,
        }
    }

    /// Catmull-Clark options.
    pub fn catmull_clark(levels: usize) -> Self {
        Self::new(Scheme::CatmullClark, levels)
    }

    /// Loop options.
    pub fn loop_subdivision(levels: usize) -> Self {
        Self::new(Scheme::Loop, levels)
    }

    /// Set the face limit.
    pub fn with_max_faces(mut self, max_faces: usize) -> Self {
        self.max_faces = max_faces;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Where each point of a refined mesh lands in the output vertex buffer.
///
/// Updated original vertices keep their indices. Catmull-Clark places face
/// points next, then edge points; Loop has no face points, so edge points
/// follow the original vertices directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointLayout {
    num_vertices: usize,
    num_edges: usize,
    num_faces: usize,
    scheme: Scheme,
}

impl PointLayout {
    /// Layout of one pass of `scheme` over `topo`.
    pub fn new<I: MeshIndex>(scheme: Scheme, topo: &Topology<I>) -> Self {
        Self {
            num_vertices: topo.num_vertices(),
            num_edges: topo.num_edges(),
            num_faces: topo.num_faces(),
            scheme,
        }
    }

    /// Output index of an updated original vertex.
    #[inline]
    pub fn vertex_point<I: MeshIndex>(&self, v: VertexId<I>) -> usize {
        v.index()
    }

    /// Output index of a face point (Catmull-Clark only).
    #[inline]
    pub fn face_point<I: MeshIndex>(&self, f: FaceId<I>) -> Option<usize> {
        match self.scheme {
            Scheme::CatmullClark => Some(self.num_vertices + f.index()),
            Scheme::Loop => None,
        }
    }

    /// Output index of an edge point.
    #[inline]
    pub fn edge_point<I: MeshIndex>(&self, e: EdgeId<I>) -> usize {
        match self.scheme {
            Scheme::CatmullClark => self.num_vertices + self.num_faces + e.index(),
            Scheme::Loop => self.num_vertices + e.index(),
        }
    }

    /// Total number of output vertices.
    pub fn num_points(&self) -> usize {
        match self.scheme {
            Scheme::CatmullClark => self.num_vertices + self.num_edges + self.num_faces,
            Scheme::Loop => self.num_vertices + self.num_edges,
        }
    }
}

/// Subdivide a mesh `options.levels` times.
///
/// The input is never modified. With zero levels the mesh is validated and
/// returned unchanged.
///
/// # Errors
///
/// - [`MeshError::UnsupportedTopology`] if the mesh arity does not match the scheme
/// - [`MeshError::MeshTooLarge`] if the result would exceed `options.max_faces`
/// - any malformed-input error from [`Topology::build`]
pub fn refine(mesh: &PolyMesh, options: &SubdivideOptions) -> Result<PolyMesh> {
    refine_with_progress(mesh, options, &Progress::none())
}

/// [`refine`] with progress reporting, once before each pass and once at the end.
pub fn refine_with_progress(
    mesh: &PolyMesh,
    options: &SubdivideOptions,
    progress: &Progress,
) -> Result<PolyMesh> {
    let scheme = options.scheme;
    if mesh.arity != scheme.arity() {
        return Err(MeshError::UnsupportedTopology {
            scheme,
            arity: mesh.arity,
        });
    }

    if options.levels == 0 {
        Topology::<u32>::build(mesh)?;
        return Ok(mesh.clone());
    }

    let projected = scheme.projected_faces(mesh.num_faces(), options.levels);
    if projected > options.max_faces {
        return Err(MeshError::MeshTooLarge {
            projected,
            max: options.max_faces,
        });
    }

    debug!(
        "Subdividing mesh: {} faces, {} vertices, {} creases, {} levels using {:?}",
        mesh.num_faces(),
        mesh.num_vertices(),
        mesh.creases.len(),
        options.levels,
        scheme
    );

    let mut current = subdivide_once(mesh, scheme, progress, 0, options.levels)?;
    for level in 1..options.levels {
        current = subdivide_once(&current, scheme, progress, level, options.levels)?;
    }
    progress.report(options.levels, options.levels, scheme.label());

    Ok(current)
}

/// Refine independent meshes with the same options.
///
/// Meshes are processed concurrently when `options.parallel` is set. Results
/// are returned in input order.
pub fn refine_batch(meshes: &[PolyMesh], options: &SubdivideOptions) -> Vec<Result<PolyMesh>> {
    if options.parallel {
        meshes.par_iter().map(|mesh| refine(mesh, options)).collect()
    } else {
        meshes.iter().map(|mesh| refine(mesh, options)).collect()
    }
}

fn subdivide_once(
    mesh: &PolyMesh,
    scheme: Scheme,
    progress: &Progress,
    level: usize,
    levels: usize,
) -> Result<PolyMesh> {
    progress.report(level, levels, scheme.label());

    let topo: Topology = Topology::build(mesh)?;
    let refined = match scheme {
        Scheme::CatmullClark => catmull_clark_pass(&topo),
        Scheme::Loop => loop_pass(&topo),
    };

    debug!(
        "Level {}: {} faces, {} vertices, {} creases",
        level + 1,
        refined.num_faces(),
        refined.num_vertices(),
        refined.creases.len()
    );
    Ok(refined)
}

/// Read one attribute of every vertex, in vertex order.
fn gather<I: MeshIndex, const D: usize>(
    topo: &Topology<I>,
    attr: impl Fn(&Vertex<I>) -> SVector<f64, D>,
) -> Vec<SVector<f64, D>> {
    topo.vertex_ids().map(|v| attr(topo.vertex(v))).collect()
}

/// Sum source values over a set of vertices.
fn sum_over<I: MeshIndex, const D: usize>(
    source: &[SVector<f64, D>],
    vertices: impl IntoIterator<Item = VertexId<I>>,
) -> SVector<f64, D> {
    vertices
        .into_iter()
        .fold(SVector::<f64, D>::zeros(), |acc, v| acc + source[v.index()])
}

/// Classify every vertex once per pass, warning about frozen corners.
fn classify_vertices<I: MeshIndex>(topo: &Topology<I>) -> Vec<VertexClass<I>> {
    let classes: Vec<VertexClass<I>> = topo.vertex_ids().map(|v| topo.classify_vertex(v)).collect();
    let corners = classes
        .iter()
        .filter(|c| matches!(c, VertexClass::Corner))
        .count();
    if corners > 0 {
        warn!(
            "{} vertices have more than two sharp edges and keep their positions",
            corners
        );
    }
    classes
}

/// Update rule shared by both schemes for vertices on exactly two sharp edges.
#[inline]
fn crease_vertex<const D: usize>(
    old: SVector<f64, D>,
    a: SVector<f64, D>,
    b: SVector<f64, D>,
) -> SVector<f64, D> {
    old * 0.75 + (a + b) * 0.125
}

/// Corners of a face starting at its first vertex: `(vertex, incoming edge, outgoing edge)`.
fn face_corners<I: MeshIndex>(
    topo: &Topology<I>,
    f: FaceId<I>,
) -> impl Iterator<Item = (VertexId<I>, EdgeId<I>, EdgeId<I>)> + '_ {
    let face = topo.face(f);
    let n = face.len();
    (0..n).map(move |i| {
        let incoming = face.edges()[(i + n - 1) % n];
        let outgoing = face.edges()[i];
        debug_assert_eq!(topo.shared_vertex(incoming, outgoing), Some(face.vertices()[i]));
        (face.vertices()[i], incoming, outgoing)
    })
}

/// Each crease edge becomes two crease edges through its edge point.
fn refined_creases<I: MeshIndex>(topo: &Topology<I>, layout: &PointLayout) -> Vec<[usize; 2]> {
    topo.crease_ids()
        .flat_map(|e| {
            let [a, b] = topo.edge(e).vertices();
            let ep = layout.edge_point(e);
            [[layout.vertex_point(a), ep], [ep, layout.vertex_point(b)]]
        })
        .collect()
}
