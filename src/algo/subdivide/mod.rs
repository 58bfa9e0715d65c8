//! Threshold-driven subdivision of facade curves and meshes.
//!
//! Unlike smoothing schemes, nothing here moves existing geometry: elements
//! that are already small enough are left alone, and larger ones are split
//! into pieces that lie exactly on the original.
//!
//! # Curves
//!
//! [`subdivide_curve`] replaces a curve with 2, 3 or 4 straight segments
//! depending on its length (see [`segment_count`]). Curves shorter than the
//! minimum length are not touched.
//!
//! # Meshes
//!
//! [`subdivide_mesh`] splits each triangle or quad that has an edge longer
//! than the threshold into four children through its edge midpoints. The
//! midpoints are welded so faces sharing an edge also share its midpoint,
//! which keeps the refined mesh watertight. The geometric core is the pure
//! function [`subdivide_faces`].
//!
//! # Example
//!
//! ```
//! use sliver::algo::subdivide::{subdivide_curve, subdivide_mesh};
//! use sliver::host::{GeometryHost, MemoryDocument};
//! use sliver::mesh::{Face, FaceMesh};
//! use nalgebra::Point3;
//!
//! let mut doc = MemoryDocument::new();
//! doc.ensure_group_exists("Facades_Subdivided").unwrap();
//!
//! let line = doc
//!     .add_line("Facades", Point3::origin(), Point3::new(60.0, 0.0, 0.0))
//!     .unwrap();
//! assert_eq!(subdivide_curve(&mut doc, line, "Facades_Subdivided", 1.0).unwrap(), 3);
//!
//! let panel = FaceMesh::from_parts(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(3.0, 0.0, 0.0),
//!         Point3::new(3.0, 0.0, 3.0),
//!         Point3::new(0.0, 0.0, 3.0),
//!     ],
//!     vec![Face::Quad([0, 1, 2, 3])],
//! )
//! .unwrap();
//! let mesh = doc.add_mesh("Facades", panel).unwrap();
//! let outcome = subdivide_mesh(&mut doc, mesh, "Facades_Subdivided", 1.0, 0.0).unwrap();
//! assert_eq!(outcome.created_count(), 1);
//! assert_eq!(outcome.face_count(), 4);
//! ```

mod curve;
mod mesh;

pub use curve::{sample_curve, segment_count, subdivide_curve, MIN_SEGMENTS, SEGMENT_TIERS};
pub use mesh::{subdivide_faces, subdivide_mesh, MeshOutcome, MeshSplitStats};
