//! Planar ray-casting containment tests.
//!
//! Only the exterior ring of each polygon is considered; holes are ignored.
//! Points exactly on an edge or vertex get whatever answer the crossing rule
//! produces, which is the same on every call.

use geo_types::{Coord, LineString, MultiPolygon, Polygon};

/// Even-odd test of a horizontal ray from `point` against `ring`
pub fn ring_contains(ring: &LineString<f64>, point: Coord<f64>) -> bool {
    let pts = &ring.0;
    if pts.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = pts.len() - 1;

    for i in 0..pts.len() {
        let (a, b) = (pts[i], pts[j]);

        let straddles = (a.y > point.y) != (b.y > point.y);
        if straddles && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }

        j = i;
    }

    inside
}

pub fn polygon_contains(polygon: &Polygon<f64>, point: Coord<f64>) -> bool {
    ring_contains(polygon.exterior(), point)
}

/// True on the first constituent polygon containing the point
pub fn multipolygon_contains(geometry: &MultiPolygon<f64>, point: Coord<f64>) -> bool {
    geometry.0.iter().any(|p| polygon_contains(p, point))
}
