//! # Crease
//!
//! Catmull-Clark and Loop subdivision for quad and triangle meshes, with
//! support for sharp crease edges.
//!
//! Crease takes a flat mesh (positions, optional texture coordinates and
//! normals, a uniform-arity index buffer and a list of crease edges),
//! reconstructs its edge/face adjacency, and produces a refined flat mesh.
//!
//! ## Features
//!
//! - **Adjacency reconstruction**: undirected edges, incident faces and
//!   per-vertex links rebuilt from an unordered polygon list
//! - **Sharp features**: boundary and crease edges use midpoint rules, and
//!   creases are carried through every level
//! - **Attributes**: texture coordinates are refined alongside positions
//! - **Pure passes**: the input is never modified and identical inputs give
//!   identical outputs
//!
//! ## Quick Start
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
//! let mesh = PolyMesh::from_quads(&vertices, &[[0, 1, 2, 3]]).with_creases(vec![[0, 1]]);
//!
//! let refined = refine(&mesh, &SubdivideOptions::catmull_clark(1)).unwrap();
//! assert_eq!(refined.num_vertices(), 9);
//! assert_eq!(refined.num_faces(), 4);
//! assert_eq!(refined.creases.len(), 2);
//! ```
//!
//! ## Querying Topology
//!
//! ```
//! use crease::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! # ];
//! let mesh = PolyMesh::from_triangles(&vertices, &[[0, 1, 2]]);
//! let topo: Topology = Topology::build(&mesh).unwrap();
//!
//! let v = VertexId::new(0);
//! assert_eq!(topo.boundary_edges_of(v).len(), 2);
//! for e in topo.edge_ids() {
//!     assert!(topo.is_boundary(e));
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use crease::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::subdivide::{
        refine, refine_batch, refine_with_progress, Scheme, SubdivideOptions,
    };
    pub use crate::algo::Progress;
    pub use crate::error::{ErrorKind, MeshError, Result};
    pub use crate::mesh::{
        Arity, EdgeId, FaceId, MeshIndex, PolyMesh, Side, Topology, VertexClass, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
