//! Mesh data structures.
//!
//! This module provides the flat mesh representation that crosses the crate
//! boundary and the adjacency graph the subdivision schemes work on.
//!
//! # Overview
//!
//! - [`PolyMesh`] holds positions, optional texture coordinates and normals,
//!   a uniform-arity index buffer and a list of crease edges.
//! - [`Topology`] is built from a `PolyMesh` and answers adjacency queries:
//!   which faces use an edge, which edges meet at a vertex, whether an edge is
//!   a crease or lies on the boundary.
//!
//! # Index Types
//!
//! Topology elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`EdgeId`] - Identifies an undirected edge
//! - [`FaceId`] - Identifies a face
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! ```
//! use crease::mesh::{PolyMesh, Topology};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let mesh = PolyMesh::from_triangles(&vertices, &[[0, 1, 2]]);
//!
//! let topo: Topology = Topology::build(&mesh).unwrap();
//! assert_eq!(topo.num_edges(), 3);
//! ```

mod index;
mod poly;
mod query;
mod topology;

pub use index::{EdgeId, FaceId, MeshIndex, VertexId};
pub use poly::{Arity, PolyMesh};
pub use query::{Side, VertexClass};
pub use topology::{Edge, Face, Topology, Vertex};
