//! The geometry host port.
//!
//! Subdivision never owns geometry. Curves and meshes live in a host
//! document (a CAD scene, a viewer, or the in-memory [`MemoryDocument`]),
//! and every read or mutation goes through the [`GeometryHost`] trait that
//! the caller injects.
//!
//! # Example
//!
//! ```
//! use sliver::host::{classify, GeometryHost, MemoryDocument, ObjectKind};
//! use nalgebra::Point3;
//!
//! let mut doc = MemoryDocument::new();
//! let id = doc
//!     .add_line("Facades", Point3::origin(), Point3::new(10.0, 0.0, 0.0))
//!     .unwrap();
//!
//! assert_eq!(classify(&doc, id), ObjectKind::Curve);
//! assert_eq!(doc.objects_in_group("Facades").unwrap(), vec![id]);
//! ```

mod memory;

use std::fmt;

use nalgebra::Point3;

use crate::error::Result;
use crate::mesh::FaceMesh;

pub use memory::{Geometry, MemoryDocument, DEFAULT_GROUP};

/// Opaque handle to a host-owned object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Wrap a raw host handle.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw host handle.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capabilities the subdivision engine needs from a geometry host.
///
/// Calls are synchronous and not cancelable mid-call. Hosts report failures
/// as [`DivideError::HostOperation`](crate::error::DivideError::HostOperation)
/// for create/delete/assign/enumerate problems,
/// [`DivideError::Coercion`](crate::error::DivideError::Coercion) when an
/// object cannot be read as a mesh, and
/// [`DivideError::Geometry`](crate::error::DivideError::Geometry) when curve
/// evaluation fails.
pub trait GeometryHost {
    /// All objects on a group, in the host's enumeration order.
    fn objects_in_group(&self, group: &str) -> Result<Vec<ObjectId>>;

    /// Whether the object is a curve.
    fn is_curve(&self, object: ObjectId) -> bool;

    /// Whether the object is a mesh.
    fn is_mesh(&self, object: ObjectId) -> bool;

    /// Length of a curve object.
    fn curve_length(&self, object: ObjectId) -> Result<f64>;

    /// Evaluate a curve at normalized parameter `t ∈ [0, 1]` over its native domain.
    fn curve_point_at(&self, object: ObjectId, t: f64) -> Result<Point3<f64>>;

    /// Read a mesh object.
    fn mesh_read(&self, object: ObjectId) -> Result<FaceMesh>;

    /// Create a straight line object.
    fn create_line(&mut self, start: Point3<f64>, end: Point3<f64>) -> Result<ObjectId>;

    /// Create a mesh object.
    fn create_mesh(&mut self, mesh: FaceMesh) -> Result<ObjectId>;

    /// Delete an object.
    fn delete(&mut self, object: ObjectId) -> Result<()>;

    /// Move an object to a named group.
    fn assign_to_group(&mut self, object: ObjectId, group: &str) -> Result<()>;

    /// Create a group if it does not exist yet.
    fn ensure_group_exists(&mut self, group: &str) -> Result<()>;

    /// Redraw the host's views.
    fn refresh_display(&mut self) {}

    /// Cooperative cancellation checkpoint. Hosts without one never cancel.
    fn check_cancel_requested(&mut self) -> bool {
        false
    }

    /// Enable or suspend view redraws.
    fn set_redraw_enabled(&mut self, _enabled: bool) {}

    /// Group the object currently belongs to, if the host tracks it.
    fn object_group(&self, _object: ObjectId) -> Option<String> {
        None
    }

    /// User-facing name of the object, if any.
    fn object_name(&self, _object: ObjectId) -> Option<String> {
        None
    }

    /// Number of vertices in a mesh object.
    fn mesh_vertex_count(&self, object: ObjectId) -> Result<usize> {
        self.mesh_read(object).map(|m| m.num_vertices())
    }
}

/// What a host object is, as far as subdivision cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// A curve; split into line segments.
    Curve,
    /// A mesh; faces split in four.
    Mesh,
    /// Anything else; skipped.
    Other,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Curve => write!(f, "curve"),
            ObjectKind::Mesh => write!(f, "mesh"),
            ObjectKind::Other => write!(f, "other"),
        }
    }
}

/// Classify an object. Curve wins if a host reports both.
pub fn classify<H: GeometryHost + ?Sized>(host: &H, object: ObjectId) -> ObjectKind {
    if host.is_curve(object) {
        ObjectKind::Curve
    } else if host.is_mesh(object) {
        ObjectKind::Mesh
    } else {
        ObjectKind::Other
    }
}

/// Diagnostic summary of a host object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDetails {
    /// The object.
    pub object: ObjectId,
    /// Its classification.
    pub kind: ObjectKind,
    /// Curve length, for curves the host could measure.
    pub length: Option<f64>,
    /// Vertex count, for meshes the host could read.
    pub vertex_count: Option<usize>,
    /// Group the object sits on.
    pub group: Option<String>,
    /// Object name.
    pub name: Option<String>,
}

impl ObjectDetails {
    /// Gather details for `object`. Failed host reads leave fields empty.
    pub fn collect<H: GeometryHost + ?Sized>(host: &H, object: ObjectId) -> Self {
        let kind = classify(host, object);
        let length = match kind {
            ObjectKind::Curve => host.curve_length(object).ok(),
            _ => None,
        };
        let vertex_count = match kind {
            ObjectKind::Mesh => host.mesh_vertex_count(object).ok(),
            _ => None,
        };
        Self {
            object,
            kind,
            length,
            vertex_count,
            group: host.object_group(object),
            name: host.object_name(object),
        }
    }
}

impl fmt::Display for ObjectDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Object: {}", self.object)?;
        match self.kind {
            ObjectKind::Curve => {
                writeln!(f, "Object is a curve")?;
                if let Some(length) = self.length {
                    writeln!(f, "Length: {}", length)?;
                }
            }
            ObjectKind::Mesh => {
                writeln!(f, "Object is a mesh")?;
                if let Some(count) = self.vertex_count {
                    writeln!(f, "Vertices: {}", count)?;
                }
            }
            ObjectKind::Other => writeln!(f, "Object is neither a curve nor a mesh")?,
        }
        writeln!(f, "Group: {}", self.group.as_deref().unwrap_or("(unknown)"))?;
        write!(f, "Name: {}", self.name.as_deref().unwrap_or("Unnamed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Face;

    #[test]
    fn test_classify() {
        let mut doc = MemoryDocument::new();
        let line = doc
            .add_line("F", Point3::origin(), Point3::new(1.0, 0.0, 0.0))
            .unwrap();
        let mesh = doc
            .add_mesh(
                "F",
                FaceMesh::from_parts(
                    vec![
                        Point3::origin(),
                        Point3::new(1.0, 0.0, 0.0),
                        Point3::new(0.0, 1.0, 0.0),
                    ],
                    vec![Face::Triangle([0, 1, 2])],
                )
                .unwrap(),
            )
            .unwrap();
        let point = doc.add_point("F", Point3::origin());

        assert_eq!(classify(&doc, line), ObjectKind::Curve);
        assert_eq!(classify(&doc, mesh), ObjectKind::Mesh);
        assert_eq!(classify(&doc, point), ObjectKind::Other);
        assert_eq!(classify(&doc, ObjectId::new(999)), ObjectKind::Other);
    }

    #[test]
    fn test_object_details_display() {
        let mut doc = MemoryDocument::new();
        let line = doc
            .add_line("Facades", Point3::origin(), Point3::new(2.0, 0.0, 0.0))
            .unwrap();
        doc.set_name(line, "north wall").unwrap();

        let details = ObjectDetails::collect(&doc, line);
        assert_eq!(details.kind, ObjectKind::Curve);
        assert_eq!(details.length, Some(2.0));

        let text = details.to_string();
        assert!(text.contains("Object is a curve"));
        assert!(text.contains("Length: 2"));
        assert!(text.contains("Group: Facades"));
        assert!(text.contains("Name: north wall"));

        let point = doc.add_point("Facades", Point3::origin());
        let text = ObjectDetails::collect(&doc, point).to_string();
        assert!(text.contains("neither a curve nor a mesh"));
        assert!(text.contains("Name: Unnamed"));
    }
}
