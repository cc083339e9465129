//! Error types for crease.
//!
//! Every fallible operation in the crate returns [`MeshError`]. Variants are
//! grouped into coarse [`ErrorKind`]s so callers can react to a class of
//! failure without matching on every variant.

use thiserror::Error;

use crate::algo::subdivide::Scheme;
use crate::mesh::Arity;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Coarse classification of a [`MeshError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input buffers do not describe a valid manifold mesh.
    MalformedInput,
    /// The mesh is valid but its polygons do not suit the selected scheme.
    UnsupportedTopology,
    /// The requested refinement would exceed a configured limit.
    ResourceLimit,
}

/// Errors that can occur while building topology or subdividing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// A face references a vertex index that does not exist.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// The index buffer length is not a multiple of the polygon arity.
    #[error("index buffer of length {len} is not a multiple of arity {arity}")]
    IndexBufferLength {
        /// Length of the index buffer.
        len: usize,
        /// Expected polygon arity.
        arity: usize,
    },

    /// A face repeats a vertex.
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// An edge has more than two incident faces.
    #[error("edge ({v0}, {v1}) has more than two incident faces")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// A crease pair names two vertices that share no edge.
    #[error("crease ({v0}, {v1}) does not match any mesh edge")]
    UnknownCreaseEdge {
        /// First vertex of the crease.
        v0: usize,
        /// Second vertex of the crease.
        v1: usize,
    },

    /// A per-vertex attribute buffer has the wrong length.
    #[error("{attribute} buffer has {actual} entries, expected {expected}")]
    AttributeLength {
        /// Attribute name.
        attribute: &'static str,
        /// Number of vertices.
        expected: usize,
        /// Number of attribute entries supplied.
        actual: usize,
    },

    /// The mesh arity does not match the subdivision scheme.
    #[error("{scheme:?} subdivision does not support {arity:?} meshes")]
    UnsupportedTopology {
        /// The requested scheme.
        scheme: Scheme,
        /// The arity of the supplied mesh.
        arity: Arity,
    },

    /// The mesh has more elements of one kind than the index type can name.
    #[error("mesh has {count} {element}s, but the index type holds at most {max}")]
    IndexOverflow {
        /// Element kind ("vertex", "edge" or "face").
        element: &'static str,
        /// Number of elements required.
        count: usize,
        /// Largest index the index type can hold.
        max: usize,
    },

    /// Subdivision would produce more faces than allowed.
    #[error("subdivision would produce {projected} faces (max {max})")]
    MeshTooLarge {
        /// Projected face count after all levels.
        projected: usize,
        /// Configured maximum.
        max: usize,
    },
}

impl MeshError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MeshError::InvalidVertexIndex { .. }
            | MeshError::IndexBufferLength { .. }
            | MeshError::DegenerateFace { .. }
            | MeshError::NonManifoldEdge { .. }
            | MeshError::UnknownCreaseEdge { .. }
            | MeshError::AttributeLength { .. } => ErrorKind::MalformedInput,
            MeshError::UnsupportedTopology { .. } => ErrorKind::UnsupportedTopology,
            MeshError::IndexOverflow { .. } | MeshError::MeshTooLarge { .. } => {
                ErrorKind::ResourceLimit
            }
        }
    }
}
