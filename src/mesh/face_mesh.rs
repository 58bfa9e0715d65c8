//! Face-vertex mesh representation.

use nalgebra::{distance, Point3};

use crate::error::{DivideError, Result};

/// A mesh face: three or four indices into the vertex array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    /// Triangle `[v0, v1, v2]`.
    Triangle([usize; 3]),
    /// Quad `[v0, v1, v2, v3]`.
    Quad([usize; 4]),
}

impl Face {
    /// The vertex indices of this face, in order.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        match self {
            Face::Triangle(v) => &v[..],
            Face::Quad(v) => &v[..],
        }
    }

    /// Number of corners (3 or 4).
    #[inline]
    pub fn arity(&self) -> usize {
        self.indices().len()
    }

    /// Whether this is a quad face.
    #[inline]
    pub fn is_quad(&self) -> bool {
        matches!(self, Face::Quad(_))
    }

    /// Iterate over the face's edges as `(v_i, v_{i+1})`, wrapping around.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let idx = self.indices();
        let n = idx.len();
        (0..n).map(move |i| (idx[i], idx[(i + 1) % n]))
    }
}

impl From<[usize; 3]> for Face {
    fn from(v: [usize; 3]) -> Self {
        Face::Triangle(v)
    }
}

impl From<[usize; 4]> for Face {
    fn from(v: [usize; 4]) -> Self {
        Face::Quad(v)
    }
}

/// A mesh stored as a dense vertex array plus triangle/quad faces.
///
/// This is the exchange format between the geometry host and the
/// subdivision algorithms. It is a plain value: subdivision builds a new
/// `FaceMesh` rather than mutating one in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,
    /// Faces indexing into `vertices`.
    pub faces: Vec<Face>,
}

impl FaceMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from vertices and faces, validating the indices.
    ///
    /// # Example
    /// ```
    /// use sliver::mesh::{Face, FaceMesh};
    /// use nalgebra::Point3;
    ///
    /// let mesh = FaceMesh::from_parts(
    ///     vec![
    ///         Point3::new(0.0, 0.0, 0.0),
    ///         Point3::new(1.0, 0.0, 0.0),
    ///         Point3::new(1.0, 1.0, 0.0),
    ///         Point3::new(0.0, 1.0, 0.0),
    ///     ],
    ///     vec![Face::Quad([0, 1, 2, 3])],
    /// )
    /// .unwrap();
    /// assert_eq!(mesh.num_faces(), 1);
    /// ```
    pub fn from_parts(vertices: Vec<Point3<f64>>, faces: Vec<Face>) -> Result<Self> {
        let mesh = Self { vertices, faces };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Check that every face index is in range and no face repeats a vertex.
    pub fn validate(&self) -> Result<()> {
        for (fi, face) in self.faces.iter().enumerate() {
            let idx = face.indices();
            for &vi in idx {
                if vi >= self.vertices.len() {
                    return Err(DivideError::InvalidVertexIndex { face: fi, vertex: vi });
                }
            }
            for i in 0..idx.len() {
                if idx[i + 1..].contains(&idx[i]) {
                    return Err(DivideError::DegenerateFace { face: fi });
                }
            }
        }
        Ok(())
    }

    /// Edge lengths around a face, starting at edge `(v0, v1)`.
    pub fn edge_lengths(&self, face: &Face) -> Vec<f64> {
        face.edges()
            .map(|(a, b)| distance(&self.vertices[a], &self.vertices[b]))
            .collect()
    }

    /// Longest edge over all faces, or `0.0` for a mesh without faces.
    pub fn max_edge_length(&self) -> f64 {
        self.faces
            .iter()
            .flat_map(|f| self.edge_lengths(f))
            .fold(0.0, f64::max)
    }

    /// Whether every face is a triangle.
    pub fn is_triangle_mesh(&self) -> bool {
        !self.faces.is_empty() && self.faces.iter().all(|f| !f.is_quad())
    }

    /// Whether every face is a quad.
    pub fn is_quad_mesh(&self) -> bool {
        !self.faces.is_empty() && self.faces.iter().all(Face::is_quad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> FaceMesh {
        FaceMesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![Face::Quad([0, 1, 2, 3])],
        )
        .unwrap()
    }

    #[test]
    fn test_face_edges_wrap_around() {
        let face = Face::Triangle([4, 7, 9]);
        let edges: Vec<_> = face.edges().collect();
        assert_eq!(edges, vec![(4, 7), (7, 9), (9, 4)]);
        assert_eq!(face.arity(), 3);
        assert_eq!(Face::from([4, 7, 9]), face);
        assert!(Face::from([0, 1, 2, 3]).is_quad());
    }

    #[test]
    fn test_edge_lengths() {
        let mesh = unit_quad();
        let lengths = mesh.edge_lengths(&mesh.faces[0]);
        assert_eq!(lengths.len(), 4);
        for l in lengths {
            assert!((l - 1.0).abs() < 1e-12);
        }
        assert!((mesh.max_edge_length() - 1.0).abs() < 1e-12);
        assert!(mesh.is_quad_mesh());
        assert!(!mesh.is_triangle_mesh());
    }

    #[test]
    fn test_invalid_vertex_index() {
        let result = FaceMesh::from_parts(
            vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)],
            vec![Face::Triangle([0, 1, 2])],
        );
        assert_eq!(
            result.unwrap_err(),
            DivideError::InvalidVertexIndex { face: 0, vertex: 2 }
        );
    }

    #[test]
    fn test_degenerate_face() {
        let mut mesh = unit_quad();
        mesh.faces.push(Face::Quad([0, 1, 1, 3]));
        assert_eq!(mesh.validate(), Err(DivideError::DegenerateFace { face: 1 }));
    }

    #[test]
    fn test_empty_mesh_is_valid() {
        let mesh = FaceMesh::new();
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.max_edge_length(), 0.0);
        assert!(!mesh.is_quad_mesh());
    }
}
