//! # Sliver
//!
//! Adaptive refinement of architectural facade geometry.
//!
//! Sliver splits facade curves and meshes whose elements are larger than a
//! threshold into smaller, topologically consistent pieces, ready for
//! per-panel coloring or simulation downstream.
//!
//! ## Features
//!
//! - **Curve splitting**: polylines become 2, 3 or 4 straight segments by length tier
//! - **Mesh splitting**: oversized triangles and quads are split in four through
//!   their edge midpoints
//! - **Welding**: shared edge midpoints are deduplicated through a hash index, so
//!   refined meshes stay watertight
//! - **Host port**: all geometry access goes through the [`host::GeometryHost`]
//!   trait; [`host::MemoryDocument`] is an in-memory implementation
//! - **Batch runs**: every object on a group is processed with a final
//!   [`batch::RunReport`]
//!
//! ## Quick Start
//!
//! ```
//! use sliver::prelude::*;
//! use nalgebra::Point3;
//!
//! let mut doc = MemoryDocument::new();
//! doc.add_line("Facades", Point3::origin(), Point3::new(120.0, 0.0, 0.0)).unwrap();
//!
//! let panel = FaceMesh::from_parts(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(4.0, 0.0, 0.0),
//!         Point3::new(4.0, 0.0, 4.0),
//!         Point3::new(0.0, 0.0, 4.0),
//!     ],
//!     vec![Face::Quad([0, 1, 2, 3])],
//! )
//! .unwrap();
//! doc.add_mesh("Facades", panel).unwrap();
//!
//! let report = BatchProcessor::new(&mut doc, DivideOptions::default()).run("Facades");
//! println!("{}", report);
//!
//! assert_eq!(report.curves_processed, 1);
//! assert_eq!(report.meshes_processed, 1);
//! assert_eq!(report.created, 5);
//! ```
//!
//! ## Subdividing a Single Mesh
//!
//! ```
//! use sliver::prelude::*;
//! use nalgebra::Point3;
//!
//! let mesh = FaceMesh::from_parts(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(2.0, 0.0, 0.0),
//!         Point3::new(0.0, 2.0, 0.0),
//!     ],
//!     vec![Face::Triangle([0, 1, 2])],
//! )
//! .unwrap();
//!
//! let (refined, stats) = subdivide_faces(&mesh, 1.0, 0.0).unwrap();
//! assert_eq!(refined.num_faces(), 4);
//! assert_eq!(stats.vertices_added, 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod batch;
pub mod curve;
pub mod error;
pub mod host;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use sliver::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::subdivide::{
        subdivide_curve, subdivide_faces, subdivide_mesh, MeshOutcome, MeshSplitStats,
    };
    pub use crate::algo::weld::VertexWelder;
    pub use crate::algo::Progress;
    pub use crate::batch::{divide_all_facades, BatchProcessor, DivideOptions, RunReport, RunStatus};
    pub use crate::curve::Polyline;
    pub use crate::error::{DivideError, ErrorKind, Result};
    pub use crate::host::{GeometryHost, MemoryDocument, ObjectId, ObjectKind};
    pub use crate::mesh::{Face, FaceMesh};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_facade_strip_end_to_end() {
        // A 3x1 strip of 2m panels plus its outline.
        let mut vertices = Vec::new();
        for z in 0..2 {
            for x in 0..4 {
                vertices.push(Point3::new(2.0 * x as f64, 0.0, 2.0 * z as f64));
            }
        }
        let faces = (0..3).map(|i| Face::Quad([i, i + 1, i + 5, i + 4])).collect();
        let strip = FaceMesh::from_parts(vertices, faces).unwrap();

        let mut doc = MemoryDocument::new();
        doc.add_mesh("Facades", strip).unwrap();
        doc.add_polyline(
            "Facades",
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(6.0, 0.0, 0.0),
                Point3::new(6.0, 0.0, 2.0),
            ],
        )
        .unwrap();

        let report = divide_all_facades(&mut doc, "Facades", &DivideOptions::default());
        assert!(report.is_complete());
        assert_eq!(report.created, 2 + 1);
        assert_eq!(report.child_faces, 12);
        assert!(doc.objects_in_group("Facades").unwrap().is_empty());

        let mesh_id = doc
            .objects_in_group("Facades_Subdivided")
            .unwrap()
            .into_iter()
            .find(|&id| doc.is_mesh(id))
            .unwrap();
        let refined = doc.mesh_read(mesh_id).unwrap();
        // 8 corners + 10 distinct edge midpoints.
        assert_eq!(refined.num_vertices(), 18);
        assert!(refined.validate().is_ok());
    }
}
