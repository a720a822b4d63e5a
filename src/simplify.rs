//! Ramer-Douglas-Peucker polyline simplification.
//!
//! Distances are planar, measured in raw coordinate deltas (x = lng,
//! y = lat), so `tolerance` is expressed in degrees. The projection onto the
//! chord is taken on the infinite line through it and is not clamped to the
//! segment; this is the classic Douglas-Peucker formulation and is relied on
//! by callers comparing against geometry simplified elsewhere.

use crate::polyline::LatLng;

/// Simplify a point sequence, keeping both endpoints and every point whose
/// deviation from its enclosing chord exceeds `tolerance`.
///
/// Sequences shorter than three points are returned unchanged.
pub fn simplify(points: &[LatLng], tolerance: f64) -> Vec<LatLng> {
    simplify_indices(points, tolerance)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

/// Same as [`simplify`], returning the indices of the kept points.
pub fn simplify_indices(points: &[LatLng], tolerance: f64) -> Vec<usize> {
    if points.len() < 3 {
        return (0..points.len()).collect();
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;
    mark_kept(points, 0, points.len() - 1, tolerance, &mut keep);

    keep.iter()
        .enumerate()
        .filter_map(|(i, &kept)| kept.then_some(i))
        .collect()
}

fn mark_kept(points: &[LatLng], start: usize, end: usize, tolerance: f64, keep: &mut [bool]) {
    if end <= start + 1 {
        return;
    }

    let first = points[start];
    let last = points[end];

    // Strict comparison: the leftmost point wins ties.
    let mut max_distance = 0.0;
    let mut split = None;
    for (offset, point) in points[start + 1..end].iter().enumerate() {
        let distance = perpendicular_distance(*point, first, last);
        if distance > max_distance {
            max_distance = distance;
            split = Some(start + 1 + offset);
        }
    }

    let Some(split) = split else {
        return;
    };
    if max_distance > tolerance {
        keep[split] = true;
        mark_kept(points, start, split, tolerance, keep);
        mark_kept(points, split, end, tolerance, keep);
    }
}

fn perpendicular_distance(point: LatLng, chord_start: LatLng, chord_end: LatLng) -> f64 {
    let dx = chord_end.lng - chord_start.lng;
    let dy = chord_end.lat - chord_start.lat;

    if dx == 0.0 && dy == 0.0 {
        return (point.lng - chord_start.lng).hypot(point.lat - chord_start.lat);
    }

    let t = ((point.lng - chord_start.lng) * dx + (point.lat - chord_start.lat) * dy)
        / (dx * dx + dy * dy);
    let nearest_x = chord_start.lng + t * dx;
    let nearest_y = chord_start.lat + t * dy;

    (point.lng - nearest_x).hypot(point.lat - nearest_y)
}
