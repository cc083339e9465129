//! Progress reporting for multi-level refinement.
//!
//! [`refine_with_progress`](crate::algo::subdivide::refine_with_progress)
//! reports once before each subdivision pass and once when all passes are
//! done, so a two-level refinement sees `0/2`, `1/2` and `2/2`.
//!
//! # Example
//!
//! ```
//! use crease::algo::Progress;
//! use crease::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let mesh = PolyMesh::from_triangles(&vertices, &[[0, 1, 2]]);
//!
//! let progress = Progress::new(|pass, passes, scheme| {
//!     println!("pass {}/{}: {}", pass, passes, scheme);
//! });
//! let refined =
//!     refine_with_progress(&mesh, &SubdivideOptions::loop_subdivision(2), &progress).unwrap();
//! assert_eq!(refined.num_faces(), 16);
//! ```

/// Callback told which subdivision pass is about to run.
///
/// Arguments are the 0-based pass, the total number of passes, and the
/// scheme label. The final call has `pass == passes`.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report that `pass` of `passes` is starting.
    #[inline]
    pub fn report(&self, pass: usize, passes: usize, label: &str) {
        (self.callback)(pass, passes, label);
    }

    /// A reporter that ignores every pass.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
