//! Geometry utility functions
//!
//! Small vector helpers shared by the edit behavior actions: distances,
//! angles, infinite-line intersection and the 0/45/90 degree delta snap
//! used when the constrain modifier is held.

use kurbo::{Point, Vec2};

/// Cross products smaller than this are treated as parallel lines
const PARALLEL_EPSILON: f64 = 1e-9;

/// Result of intersecting two lines given as point pairs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub point: Point,
    /// Parameter along the first line (0.0 at `a1`, 1.0 at `a2`)
    pub t1: f64,
    /// Parameter along the second line (0.0 at `b1`, 1.0 at `b2`)
    pub t2: f64,
}

/// Euclidean distance between two points
pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).hypot()
}

/// Angle of a vector in radians, measured from the positive x axis
pub fn angle(v: Vec2) -> f64 {
    v.y.atan2(v.x)
}

/// Rotate a vector by 90 degrees clockwise
pub fn rotate_90_cw(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

/// Intersect the infinite lines through `a1`→`a2` and `b1`→`b2`
///
/// Returns `None` when the lines are parallel or either pair of points
/// coincides, since there is no single crossing point in that case.
pub fn intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Intersection> {
    let r = a2 - a1;
    let s = b2 - b1;
    let denominator = r.cross(s);
    if denominator.abs() < PARALLEL_EPSILON {
        return None;
    }
    let w = b1 - a1;
    let t1 = w.cross(s) / denominator;
    let t2 = w.cross(r) / denominator;
    Some(Intersection {
        point: a1 + r * t1,
        t1,
        t2,
    })
}

/// Project `point` perpendicularly onto the line through `pt1`→`pt2`
///
/// Built on [`intersect`] with a ray perpendicular to the reference line,
/// so a degenerate reference line (`pt1 == pt2`) yields `None`.
pub fn project_onto_line(point: Point, pt1: Point, pt2: Point) -> Option<Point> {
    let perpendicular = rotate_90_cw(pt2 - pt1);
    intersect(pt1, pt2, point, point + perpendicular).map(|hit| hit.point)
}

/// Snap a vector to the nearest horizontal, vertical or 45 degree direction
///
/// Vectors between 22.5 and 67.5 degrees from an axis become diagonal with
/// the average of both magnitudes; everything else keeps only its dominant
/// component (vertical wins a tie).
pub fn constrain_hor_ver_diag(v: Vec2) -> Vec2 {
    let ax = v.x.abs();
    let ay = v.y.abs();
    if ax > 0.001 {
        let tan = ay / ax;
        if 0.414 < tan && tan < 2.414 {
            let d = 0.5 * (ax + ay);
            return Vec2::new(d * v.x.signum(), d * v.y.signum());
        }
    }
    if ax > ay {
        Vec2::new(v.x, 0.0)
    } else {
        Vec2::new(0.0, v.y)
    }
}

/// Leave a vector untouched (the unconstrained behaviors use this)
pub fn unconstrained(v: Vec2) -> Vec2 {
    v
}
