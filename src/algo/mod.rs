//! Mesh processing algorithms.
//!
//! - **Subdivision**: Catmull-Clark (quads) and Loop (triangles) with crease support
//! - **Progress**: callback plumbing shared by long-running operations

pub mod progress;
pub mod subdivide;

pub use progress::Progress;
