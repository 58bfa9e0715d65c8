//! Core mesh data structures.
//!
//! Facade meshes are exchanged with the geometry host as plain face-vertex
//! lists: a dense vertex array and a list of triangle or quad faces that
//! index into it. Faces of any other arity cannot be represented.
//!
//! ```
//! use sliver::mesh::{Face, FaceMesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let mesh = FaceMesh::from_parts(vertices, vec![Face::Triangle([0, 1, 2])]).unwrap();
//! assert!(mesh.is_triangle_mesh());
//! ```

mod face_mesh;

pub use face_mesh::{Face, FaceMesh};
