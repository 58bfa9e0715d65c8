//! Curve subdivision into straight segments.

use nalgebra::Point3;

use crate::error::{DivideError, Result};
use crate::host::{GeometryHost, ObjectId};

/// Length tiers: a curve strictly longer than the threshold gets that many
/// segments. Checked in order; shorter curves get [`MIN_SEGMENTS`].
pub const SEGMENT_TIERS: [(f64, usize); 2] = [(100.0, 4), (50.0, 3)];

/// Segment count for curves below every tier.
pub const MIN_SEGMENTS: usize = 2;

/// Number of segments a curve of `length` is split into.
///
/// ```
/// use sliver::algo::subdivide::segment_count;
///
/// assert_eq!(segment_count(120.0), 4);
/// assert_eq!(segment_count(100.0), 3);
/// assert_eq!(segment_count(50.0), 2);
/// ```
pub fn segment_count(length: f64) -> usize {
    SEGMENT_TIERS
        .iter()
        .find(|&&(threshold, _)| length > threshold)
        .map_or(MIN_SEGMENTS, |&(_, n)| n)
}

/// Sample `segments + 1` points at parameters `i / segments`.
///
/// Parameters are taken over the curve's native domain, not arc length, so
/// the pieces between samples are only equal in length when the curve is
/// uniformly parametrized.
pub fn sample_curve<H: GeometryHost + ?Sized>(
    host: &H,
    object: ObjectId,
    segments: usize,
) -> Result<Vec<Point3<f64>>> {
    if segments == 0 {
        return Err(DivideError::invalid_param("segments", segments, "must be at least 1"));
    }
    (0..=segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            let p = host.curve_point_at(object, t)?;
            if p.coords.iter().all(|c| c.is_finite()) {
                Ok(p)
            } else {
                Err(DivideError::geometry(
                    object,
                    format!("non-finite point at parameter {}", t),
                ))
            }
        })
        .collect()
}

/// Delete objects created so far, best effort.
pub(crate) fn roll_back<H: GeometryHost + ?Sized>(host: &mut H, created: &[ObjectId]) {
    for &id in created.iter().rev() {
        if let Err(e) = host.delete(id) {
            log::warn!("rollback could not delete {}: {}", id, e);
        }
    }
}

/// Replace a curve object with straight segments on `target_group`.
///
/// Returns the number of segments created. A curve shorter than
/// `min_length` is left untouched and yields `Ok(0)`.
///
/// The operation is all-or-nothing: every point is sampled before the host
/// is mutated, and if creating, assigning, or deleting fails, the segments
/// made so far are deleted again and the source curve stays in place.
pub fn subdivide_curve<H: GeometryHost + ?Sized>(
    host: &mut H,
    object: ObjectId,
    target_group: &str,
    min_length: f64,
) -> Result<usize> {
    let length = host.curve_length(object)?;
    if !length.is_finite() {
        return Err(DivideError::geometry(object, format!("curve length is {}", length)));
    }
    if length < min_length {
        log::debug!(
            "curve {} is shorter than {} ({:.3}), left as is",
            object,
            min_length,
            length
        );
        return Ok(0);
    }

    let segments = segment_count(length);
    let points = sample_curve(host, object, segments)?;

    let mut created = Vec::with_capacity(segments);
    for pair in points.windows(2) {
        let id = match host.create_line(pair[0], pair[1]) {
            Ok(id) => id,
            Err(e) => {
                roll_back(host, &created);
                return Err(e);
            }
        };
        created.push(id);
        if let Err(e) = host.assign_to_group(id, target_group) {
            roll_back(host, &created);
            return Err(e);
        }
    }

    if let Err(e) = host.delete(object) {
        roll_back(host, &created);
        return Err(e);
    }

    log::debug!(
        "curve {} (length {:.3}) split into {} segments",
        object,
        length,
        created.len()
    );
    Ok(created.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Geometry, MemoryDocument};
    use crate::mesh::FaceMesh;
    use approx::assert_relative_eq;
    use nalgebra::distance;

    const TARGET: &str = "Facades_Subdivided";

    fn doc_with_line(length: f64) -> (MemoryDocument, ObjectId) {
        let mut doc = MemoryDocument::new();
        let id = doc
            .add_line("Facades", Point3::origin(), Point3::new(length, 0.0, 0.0))
            .unwrap();
        doc.ensure_group_exists(TARGET).unwrap();
        (doc, id)
    }

    fn segments_on_target(doc: &MemoryDocument) -> Vec<(Point3<f64>, Point3<f64>)> {
        doc.objects_in_group(TARGET)
            .unwrap()
            .into_iter()
            .map(|id| match doc.geometry(id) {
                Some(Geometry::Curve(c)) => (c.start(), c.end()),
                other => panic!("expected a line, got {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_segment_tiers() {
        assert_eq!(segment_count(1000.0), 4);
        assert_eq!(segment_count(100.5), 4);
        assert_eq!(segment_count(100.0), 3);
        assert_eq!(segment_count(60.0), 3);
        assert_eq!(segment_count(50.0), 2);
        assert_eq!(segment_count(30.0), 2);
        assert_eq!(segment_count(0.0), 2);
    }

    #[test]
    fn test_long_line_gives_four_ordered_segments() {
        let (mut doc, id) = doc_with_line(120.0);

        let created = subdivide_curve(&mut doc, id, TARGET, 1.0).unwrap();
        assert_eq!(created, 4);
        assert!(!doc.contains(id));

        let segments = segments_on_target(&doc);
        assert_eq!(segments.len(), 4);

        let total: f64 = segments.iter().map(|(a, b)| distance(a, b)).sum();
        assert_relative_eq!(total, 120.0, epsilon = 1e-9);

        // Endpoints advance strictly along the line and chain together.
        for w in segments.windows(2) {
            assert!(w[0].0.x < w[1].0.x);
            assert_eq!(w[0].1, w[1].0);
        }
        assert_eq!(segments[0].0, Point3::origin());
        assert_eq!(segments[3].1, Point3::new(120.0, 0.0, 0.0));
    }

    #[test]
    fn test_medium_and_short_lines() {
        let (mut doc, id) = doc_with_line(60.0);
        assert_eq!(subdivide_curve(&mut doc, id, TARGET, 1.0).unwrap(), 3);

        let (mut doc, id) = doc_with_line(30.0);
        assert_eq!(subdivide_curve(&mut doc, id, TARGET, 1.0).unwrap(), 2);
        assert_eq!(segments_on_target(&doc).len(), 2);
    }

    #[test]
    fn test_curve_below_min_length_is_untouched() {
        let (mut doc, id) = doc_with_line(0.5);
        assert_eq!(subdivide_curve(&mut doc, id, TARGET, 1.0).unwrap(), 0);
        assert!(doc.contains(id));
        assert!(segments_on_target(&doc).is_empty());
    }

    #[test]
    fn test_native_parametrization_is_preserved() {
        // A polyline with a short first leg and a long second leg: vertex-uniform
        // sampling puts the middle sample on the corner, not at half the length.
        let mut doc = MemoryDocument::new();
        doc.ensure_group_exists(TARGET).unwrap();
        let id = doc
            .add_polyline(
                "Facades",
                vec![
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(10.0, 0.0, 0.0),
                    Point3::new(10.0, 30.0, 0.0),
                ],
            )
            .unwrap();

        assert_eq!(subdivide_curve(&mut doc, id, TARGET, 1.0).unwrap(), 2);
        let segments = segments_on_target(&doc);
        assert_eq!(segments[0].1, Point3::new(10.0, 0.0, 0.0));
        assert_relative_eq!(distance(&segments[0].0, &segments[0].1), 10.0);
        assert_relative_eq!(distance(&segments[1].0, &segments[1].1), 30.0);
    }

    #[test]
    fn test_missing_target_group_rolls_back() {
        let mut doc = MemoryDocument::new();
        let id = doc
            .add_line("Facades", Point3::origin(), Point3::new(120.0, 0.0, 0.0))
            .unwrap();

        let err = subdivide_curve(&mut doc, id, "Nowhere", 1.0).unwrap_err();
        assert!(matches!(err, DivideError::HostOperation { .. }));
        assert!(doc.contains(id));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_non_curve_is_a_geometry_error() {
        let mut doc = MemoryDocument::new();
        doc.ensure_group_exists(TARGET).unwrap();
        let mesh = doc.add_mesh("Facades", FaceMesh::new()).unwrap();
        let err = subdivide_curve(&mut doc, mesh, TARGET, 1.0).unwrap_err();
        assert!(matches!(err, DivideError::Geometry { .. }));
        assert!(doc.contains(mesh));
    }
}
