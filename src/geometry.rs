// Point-in-polygon test with a boundary tolerance band.
// A pixel counts as inside when its center is inside the closed loop (even-odd
// crossing rule) or lies within `tolerance` of any edge, so pixels on a hand-drawn
// boundary are always part of the region instead of depending on float rounding.

use crate::types::{Point, Polygon};

/// Half a pixel width.
pub const DEFAULT_TOLERANCE: f64 = 0.5;

/// True if `pixel` is inside `polygon` or within `tolerance` of its boundary.
/// Degenerate polygons (< 3 points) contain nothing.
pub fn contains(polygon: &Polygon, pixel: Point, tolerance: f64) -> bool {
    let pts = polygon.points();
    if pts.len() < 3 {
        return false;
    }
    crossing_inside(pts, pixel) || near_boundary(pts, pixel, tolerance)
}

/// Even-odd rule: cast a ray towards +x and count edge crossings.
fn crossing_inside(pts: &[Point], p: Point) -> bool {
    let mut inside = false;
    let mut j = pts.len() - 1;
    for i in 0..pts.len() {
        let (a, b) = (pts[i], pts[j]);
        // Half-open test on y so a vertex exactly at p.y is counted once.
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Any edge (closing edge included) within `tolerance` of `p`.
fn near_boundary(pts: &[Point], p: Point, tolerance: f64) -> bool {
    let tol2 = tolerance * tolerance;
    let mut j = pts.len() - 1;
    for i in 0..pts.len() {
        if segment_distance_sq(p, pts[j], pts[i]) <= tol2 {
            return true;
        }
        j = i;
    }
    false
}

/// Squared distance from `p` to the segment [a, b].
pub fn segment_distance_sq(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    // Zero-length edge (repeated click): distance to the point itself.
    let t = if len2 > 0.0 {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.x + t * dx - p.x, a.y + t * dy - p.y);
    cx * cx + cy * cy
}
