//! Polyline curves.
//!
//! A [`Polyline`] is the curve representation used by the in-memory host.
//! Its parametrization is vertex-uniform: the normalized parameter `t` is
//! scaled onto the vertex index domain, so each segment receives an equal
//! share of `[0, 1]` regardless of its length. This mirrors how CAD hosts
//! evaluate polylines over their native domain, and it is the reason equal
//! parameter steps only give equal-length pieces on evenly spaced input.

use nalgebra::{distance, Point3};

use crate::error::{DivideError, Result};

/// A piecewise-linear curve through an ordered list of points.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    vertices: Vec<Point3<f64>>,
    length: f64,
}

impl Polyline {
    /// Create a polyline from at least two vertices.
    pub fn new(vertices: Vec<Point3<f64>>) -> Result<Self> {
        if vertices.len() < 2 {
            return Err(DivideError::InvalidCurve(format!(
                "polyline needs at least 2 vertices, got {}",
                vertices.len()
            )));
        }
        if vertices.iter().any(|p| !p.coords.iter().all(|c| c.is_finite())) {
            return Err(DivideError::InvalidCurve(
                "polyline vertex has a non-finite coordinate".to_string(),
            ));
        }
        let length = vertices.windows(2).map(|w| distance(&w[0], &w[1])).sum();
        Ok(Self { vertices, length })
    }

    /// A single straight segment.
    pub fn line(start: Point3<f64>, end: Point3<f64>) -> Result<Self> {
        Self::new(vec![start, end])
    }

    /// The polyline's vertices.
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Number of segments.
    pub fn num_segments(&self) -> usize {
        self.vertices.len() - 1
    }

    /// Total length.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// First vertex.
    pub fn start(&self) -> Point3<f64> {
        self.vertices[0]
    }

    /// Last vertex.
    pub fn end(&self) -> Point3<f64> {
        self.vertices[self.vertices.len() - 1]
    }

    /// Evaluate at normalized parameter `t`, clamped to `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        let t = t.clamp(0.0, 1.0);
        let segments = self.num_segments();
        let scaled = t * segments as f64;
        let seg = (scaled.floor() as usize).min(segments - 1);
        let local = scaled - seg as f64;

        let p0 = self.vertices[seg];
        let p1 = self.vertices[seg + 1];
        p0 + (p1 - p0) * local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_polyline_length() {
        let poly = Polyline::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(3.0, 4.0, 0.0),
        ])
        .unwrap();
        assert_relative_eq!(poly.length(), 7.0);
        assert_eq!(poly.num_segments(), 2);
    }

    #[test]
    fn test_point_at_is_vertex_uniform() {
        // Segments of length 3 and 4 each get half of the domain.
        let poly = Polyline::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(3.0, 4.0, 0.0),
        ])
        .unwrap();
        assert_relative_eq!(poly.point_at(0.5), Point3::new(3.0, 0.0, 0.0));
        assert_relative_eq!(poly.point_at(0.75), Point3::new(3.0, 2.0, 0.0));
        assert_relative_eq!(poly.point_at(1.0), Point3::new(3.0, 4.0, 0.0));
        assert_relative_eq!(poly.point_at(-1.0), Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_line_point_at() {
        let line = Polyline::line(Point3::origin(), Point3::new(10.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(line.point_at(0.25), Point3::new(2.5, 0.0, 0.0));
        assert_eq!(line.start(), Point3::origin());
        assert_eq!(line.end(), Point3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_rejects_degenerate_input() {
        assert!(matches!(
            Polyline::new(vec![Point3::origin()]),
            Err(DivideError::InvalidCurve(_))
        ));
        assert!(Polyline::line(Point3::origin(), Point3::new(f64::NAN, 0.0, 0.0)).is_err());
    }
}
