//! Threshold-driven midpoint splitting for triangle/quad meshes.

use std::fmt;

use nalgebra::Point3;

use crate::algo::weld::VertexWelder;
use crate::error::{ErrorKind, Result};
use crate::host::{GeometryHost, ObjectId};
use crate::mesh::{Face, FaceMesh};

use super::curve::roll_back;

/// Counts from one pass of [`subdivide_faces`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshSplitStats {
    /// Faces that had an edge above the threshold and were split in four.
    pub faces_split: usize,
    /// Faces copied through unchanged.
    pub faces_kept: usize,
    /// Midpoint vertices appended to the vertex array.
    pub vertices_added: usize,
}

impl MeshSplitStats {
    /// Faces in the refined mesh.
    pub fn output_faces(&self) -> usize {
        self.faces_split * 4 + self.faces_kept
    }

    /// Whether any face was split.
    pub fn was_subdivided(&self) -> bool {
        self.faces_split > 0
    }
}

/// Midpoint of an edge. Symmetric in its arguments, so a shared edge walked
/// in opposite directions by two faces gives bit-identical coordinates.
#[inline]
fn midpoint(a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    Point3::from((a.coords + b.coords) * 0.5)
}

/// Split every face that has an edge longer than `min_edge_length`.
///
/// Faces whose edges are all `<= min_edge_length` are kept as they are.
/// Other faces get one welded midpoint per edge and are replaced by four
/// children:
///
/// - triangle `[v0, v1, v2]` with midpoints `m0 (0-1), m1 (1-2), m2 (2-0)`:
///   `[v0, m0, m2]`, `[m0, v1, m1]`, `[m2, m1, v2]`, `[m0, m1, m2]`
/// - quad `[v0, v1, v2, v3]` with midpoints `m0 (0-1), m1 (1-2), m2 (2-3), m3 (3-0)`:
///   `[v0, m0, m3, v3]`, `[m0, v1, m1, m3]`, `[m3, m1, v2, v3]`, `[m0, m1, m2, m3]`
///
/// No centroid vertex is added to quads. All midpoints go through one
/// [`VertexWelder`] seeded with the input vertices, so adjacent faces share
/// the midpoint of their common edge.
///
/// # Example
///
/// ```
/// use sliver::algo::subdivide::subdivide_faces;
/// use sliver::mesh::{Face, FaceMesh};
/// use nalgebra::Point3;
///
/// let mesh = FaceMesh::from_parts(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(4.0, 0.0, 0.0),
///         Point3::new(4.0, 4.0, 0.0),
///         Point3::new(0.0, 4.0, 0.0),
///     ],
///     vec![Face::Quad([0, 1, 2, 3])],
/// )
/// .unwrap();
///
/// let (refined, stats) = subdivide_faces(&mesh, 1.0, 0.0).unwrap();
/// assert_eq!(refined.num_faces(), 4);
/// assert_eq!(stats.vertices_added, 4);
/// ```
pub fn subdivide_faces(
    mesh: &FaceMesh,
    min_edge_length: f64,
    weld_tolerance: f64,
) -> Result<(FaceMesh, MeshSplitStats)> {
    mesh.validate()?;

    let original_vertices = mesh.num_vertices();
    let mut welder = VertexWelder::from_vertices(mesh.vertices.clone(), weld_tolerance);
    let mut faces: Vec<Face> = Vec::with_capacity(mesh.num_faces() * 4);
    let mut stats = MeshSplitStats::default();

    for face in &mesh.faces {
        if mesh.edge_lengths(face).iter().all(|&l| l <= min_edge_length) {
            faces.push(*face);
            stats.faces_kept += 1;
            continue;
        }

        let mids: Vec<usize> = face
            .edges()
            .map(|(a, b)| welder.weld(midpoint(&mesh.vertices[a], &mesh.vertices[b])))
            .collect();

        match *face {
            Face::Triangle([v0, v1, v2]) => {
                let (m0, m1, m2) = (mids[0], mids[1], mids[2]);
                faces.push(Face::Triangle([v0, m0, m2]));
                faces.push(Face::Triangle([m0, v1, m1]));
                faces.push(Face::Triangle([m2, m1, v2]));
                faces.push(Face::Triangle([m0, m1, m2]));
            }
            Face::Quad([v0, v1, v2, v3]) => {
                let (m0, m1, m2, m3) = (mids[0], mids[1], mids[2], mids[3]);
                faces.push(Face::Quad([v0, m0, m3, v3]));
                faces.push(Face::Quad([m0, v1, m1, m3]));
                faces.push(Face::Quad([m3, m1, v2, v3]));
                faces.push(Face::Quad([m0, m1, m2, m3]));
            }
        }
        stats.faces_split += 1;
    }

    let vertices = welder.into_vertices();
    stats.vertices_added = vertices.len() - original_vertices;
    Ok((FaceMesh { vertices, faces }, stats))
}

/// Result of [`subdivide_mesh`].
#[derive(Debug, Clone, PartialEq)]
pub enum MeshOutcome {
    /// The object could not be read as a mesh and was left alone.
    Skipped {
        /// Why it could not be read.
        reason: String,
    },
    /// The object was replaced by a refined mesh.
    Replaced {
        /// The new mesh object.
        object: ObjectId,
        /// Split counts.
        stats: MeshSplitStats,
        /// Vertices in the new mesh.
        vertices: usize,
        /// Faces in the new mesh.
        faces: usize,
    },
}

impl MeshOutcome {
    /// Host objects created: the replacement mesh counts as one.
    pub fn created_count(&self) -> usize {
        match self {
            MeshOutcome::Skipped { .. } => 0,
            MeshOutcome::Replaced { .. } => 1,
        }
    }

    /// Faces in the replacement mesh, or zero when skipped.
    pub fn face_count(&self) -> usize {
        match self {
            MeshOutcome::Skipped { .. } => 0,
            MeshOutcome::Replaced { faces, .. } => *faces,
        }
    }
}

impl fmt::Display for MeshOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshOutcome::Skipped { reason } => write!(f, "skipped ({})", reason),
            MeshOutcome::Replaced {
                object,
                stats,
                vertices,
                faces,
            } => write!(
                f,
                "replaced by {}: {} vertices, {} faces ({} split, {} kept)",
                object, vertices, faces, stats.faces_split, stats.faces_kept
            ),
        }
    }
}

/// Replace a mesh object with its refined copy on `target_group`.
///
/// A source that cannot be read as a mesh yields [`MeshOutcome::Skipped`]
/// and nothing changes. The replacement is always created, even when no
/// face exceeded the threshold, so every processed mesh ends up on the
/// target group. Host failures while creating, assigning or deleting are
/// returned as errors after the new mesh has been removed again.
pub fn subdivide_mesh<H: GeometryHost + ?Sized>(
    host: &mut H,
    object: ObjectId,
    target_group: &str,
    min_edge_length: f64,
    weld_tolerance: f64,
) -> Result<MeshOutcome> {
    let refined = host
        .mesh_read(object)
        .and_then(|mesh| subdivide_faces(&mesh, min_edge_length, weld_tolerance));
    let (refined, stats) = match refined {
        Ok(r) => r,
        Err(e) if e.kind() == ErrorKind::Coercion => {
            log::debug!("mesh {} skipped: {}", object, e);
            return Ok(MeshOutcome::Skipped {
                reason: e.to_string(),
            });
        }
        Err(e) => return Err(e),
    };

    let vertices = refined.num_vertices();
    let faces = refined.num_faces();
    log::debug!(
        "mesh {}: adding {} vertices and {} faces",
        object,
        vertices,
        faces
    );

    let new_id = host.create_mesh(refined)?;
    if let Err(e) = host
        .assign_to_group(new_id, target_group)
        .and_then(|()| host.delete(object))
    {
        roll_back(host, &[new_id]);
        return Err(e);
    }

    Ok(MeshOutcome::Replaced {
        object: new_id,
        stats,
        vertices,
        faces,
    })
}
