//! Named geometry actions for edit behavior rules
//!
//! Every action works in two stages. The builder runs once per gesture
//! against the original neighborhood and captures whatever must stay fixed
//! while dragging (handle length, interpolation factor, reference lines).
//! The returned apply function runs for every pointer move and computes
//! the point's new position from the edit transform and the current
//! neighbor positions.
//!
//! Apply functions return `None` when the geometry is degenerate (parallel
//! lines, zero-length tangent or span); the caller then keeps the point at
//! its original position.

use crate::editing::rules::{CENTER, PATTERN_LENGTH};
use crate::geometry::{angle, distance, intersect, project_onto_line};
use kurbo::{Point, Vec2};
use std::collections::HashMap;
use std::fmt;

/// Lengths below this are treated as zero
const LENGTH_EPSILON: f64 = 1e-9;

/// Positions of a point and its neighbors, in action order
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Neighborhood(pub [Option<Point>; PATTERN_LENGTH]);

impl Neighborhood {
    /// Look up neighbor positions by contour-local index
    pub fn gather(indices: &[Option<usize>; PATTERN_LENGTH], positions: &[Point]) -> Self {
        Self(indices.map(|index| index.and_then(|index| positions.get(index).copied())))
    }

    pub fn prev_prev_prev(&self) -> Option<Point> {
        self.0[CENTER - 3]
    }

    pub fn prev_prev(&self) -> Option<Point> {
        self.0[CENTER - 2]
    }

    pub fn prev(&self) -> Option<Point> {
        self.0[CENTER - 1]
    }

    pub fn point(&self) -> Option<Point> {
        self.0[CENTER]
    }

    pub fn next(&self) -> Option<Point> {
        self.0[CENTER + 1]
    }

    pub fn next_next(&self) -> Option<Point> {
        self.0[CENTER + 2]
    }

    pub fn next_next_next(&self) -> Option<Point> {
        self.0[CENTER + 3]
    }
}

/// How the current gesture maps points
pub struct EditTransform<'a> {
    /// Mapping with the behavior's delta constraint applied
    pub constrained: &'a dyn Fn(Point) -> Point,
    /// Mapping without any constraint
    pub free: &'a dyn Fn(Point) -> Point,
    /// Snap applied to handle vectors by the constrain actions
    pub constrain_delta: fn(Vec2) -> Vec2,
}

impl fmt::Debug for EditTransform<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditTransform").finish_non_exhaustive()
    }
}

/// Second stage of an action
pub type ApplyFn = Box<dyn Fn(&EditTransform, &Neighborhood) -> Option<Point> + Send + Sync>;

/// First stage of an action; `None` when the neighborhood lacks a point
/// the action needs
pub type ActionBuilder = fn(&Neighborhood) -> Option<ApplyFn>;

/// Registry of actions by name
#[derive(Clone)]
pub struct ActionLibrary {
    builders: HashMap<String, ActionBuilder>,
}

impl fmt::Debug for ActionLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionLibrary")
            .field("actions", &self.names())
            .finish()
    }
}

impl Default for ActionLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ActionLibrary {
    pub fn empty() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut library = Self::empty();
        let builtin: [(&str, ActionBuilder); 16] = [
            ("Move", move_point),
            ("DontMove", dont_move),
            ("RotateNext", rotate_next),
            ("ConstrainPrevAngle", constrain_prev_angle),
            ("ConstrainMiddle", constrain_middle),
            ("ConstrainMiddleTwo", constrain_middle_two),
            ("TangentIntersect", tangent_intersect),
            ("TangentIntersectLive", tangent_intersect_live),
            ("HandleIntersect", handle_intersect),
            ("ConstrainHandle", constrain_handle),
            ("ConstrainHandleIntersect", constrain_handle_intersect),
            ("ConstrainHandleIntersectPrev", constrain_handle_intersect_prev),
            ("ConstrainAroundPrevPrev", constrain_around_prev_prev),
            ("ConstrainAroundPrevPrevPrev", constrain_around_prev_prev_prev),
            ("Interpolate", interpolate),
            ("InterpolatePrevPrevNext", interpolate_prev_prev_next),
        ];
        for (name, builder) in builtin {
            library.register(name, builder);
        }
        library
    }

    /// Add or replace an action
    pub fn register(&mut self, name: impl Into<String>, builder: ActionBuilder) {
        self.builders.insert(name.into(), builder);
    }

    pub fn get(&self, name: &str) -> Option<ActionBuilder> {
        self.builders.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    /// Sorted action names
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn move_point(original: &Neighborhood) -> Option<ApplyFn> {
    let point = original.point()?;
    Some(Box::new(move |transform, _| Some((transform.constrained)(point))))
}

fn dont_move(original: &Neighborhood) -> Option<ApplyFn> {
    let point = original.point()?;
    Some(Box::new(move |_, _| Some(point)))
}

/// Keep a handle's length while it follows the tangent entering `prev`
fn rotate_next(original: &Neighborhood) -> Option<ApplyFn> {
    let handle_length = distance(original.prev()?, original.point()?);
    Some(Box::new(move |_, current| {
        let anchor = current.prev()?;
        let tangent = anchor - current.prev_prev()?;
        if tangent.hypot() < LENGTH_EPSILON {
            return None;
        }
        Some(anchor + Vec2::from_angle(angle(tangent)) * handle_length)
    }))
}

/// Slide the point along a line fixed at gesture start
fn project_free_onto(point: Point, pt1: Point, pt2: Point) -> ApplyFn {
    Box::new(move |transform, _| project_onto_line((transform.free)(point), pt1, pt2))
}

fn constrain_prev_angle(original: &Neighborhood) -> Option<ApplyFn> {
    Some(project_free_onto(
        original.point()?,
        original.prev_prev()?,
        original.prev()?,
    ))
}

fn constrain_middle(original: &Neighborhood) -> Option<ApplyFn> {
    Some(project_free_onto(
        original.point()?,
        original.prev()?,
        original.next()?,
    ))
}

fn constrain_middle_two(original: &Neighborhood) -> Option<ApplyFn> {
    Some(project_free_onto(
        original.point()?,
        original.prev_prev()?,
        original.next()?,
    ))
}

/// Off-curve on a fixed tangent, following its moving on-curve neighbor
fn tangent_intersect(original: &Neighborhood) -> Option<ApplyFn> {
    let tangent_start = original.prev_prev()?;
    let tangent_end = original.prev()?;
    let handle = original.point()? - original.next()?;
    Some(Box::new(move |_, current| {
        let anchor = current.next()?;
        intersect(tangent_start, tangent_end, anchor, anchor + handle).map(|hit| hit.point)
    }))
}

/// Like [`tangent_intersect`], but the tangent itself moves
fn tangent_intersect_live(original: &Neighborhood) -> Option<ApplyFn> {
    let handle = original.point()? - original.next()?;
    Some(Box::new(move |_, current| {
        let anchor = current.next()?;
        intersect(current.prev_prev()?, current.prev()?, anchor, anchor + handle)
            .map(|hit| hit.point)
    }))
}

/// Single off-curve between two smooth points: meet both tangents
fn handle_intersect(original: &Neighborhood) -> Option<ApplyFn> {
    original.point()?;
    Some(Box::new(move |_, current| {
        let prev = current.prev()?;
        let next = current.next()?;
        let prev_tangent = prev - current.prev_prev()?;
        let next_tangent = next - current.next_next()?;
        intersect(prev, prev + prev_tangent, next, next + next_tangent).map(|hit| hit.point)
    }))
}

/// Snap the handle direction around a fixed anchor
///
/// The snapped vector is rounded before it is added, so a diagonal keeps
/// equal magnitudes on both axes once the result lands on the grid.
fn constrain_around(point: Point, anchor: Point) -> ApplyFn {
    Box::new(move |transform, _| {
        let handle = (transform.free)(point) - anchor;
        Some(anchor + (transform.constrain_delta)(handle).round())
    })
}

fn constrain_handle(original: &Neighborhood) -> Option<ApplyFn> {
    Some(constrain_around(original.point()?, original.prev()?))
}

fn constrain_around_prev_prev(original: &Neighborhood) -> Option<ApplyFn> {
    Some(constrain_around(original.point()?, original.prev_prev()?))
}

fn constrain_around_prev_prev_prev(original: &Neighborhood) -> Option<ApplyFn> {
    Some(constrain_around(
        original.point()?,
        original.prev_prev_prev()?,
    ))
}

fn constrain_handle_intersect(original: &Neighborhood) -> Option<ApplyFn> {
    let point = original.point()?;
    let prev = original.prev()?;
    let next = original.next()?;
    Some(Box::new(move |transform, _| {
        let moved = (transform.free)(point);
        let prev_handle = (transform.constrain_delta)(moved - prev);
        let next_handle = (transform.constrain_delta)(moved - next);
        intersect(prev, prev + prev_handle, next, next + next_handle).map(|hit| hit.point)
    }))
}

fn constrain_handle_intersect_prev(original: &Neighborhood) -> Option<ApplyFn> {
    let point = original.point()?;
    let tangent_start = original.prev_prev()?;
    let tangent_end = original.prev()?;
    let next = original.next()?;
    Some(Box::new(move |transform, _| {
        let moved = (transform.free)(point);
        let next_handle = (transform.constrain_delta)(moved - next);
        intersect(tangent_start, tangent_end, next, next + next_handle).map(|hit| hit.point)
    }))
}

/// Keep the point's relative position between two moving anchors
fn interpolate_between(
    original: &Neighborhood,
    anchors: fn(&Neighborhood) -> Option<(Point, Point)>,
) -> Option<ApplyFn> {
    let point = original.point()?;
    let (anchor1, anchor2) = anchors(original)?;
    let span = distance(anchor1, anchor2);
    let t = (span >= LENGTH_EPSILON).then(|| distance(point, anchor1) / span);
    Some(Box::new(move |_, current| {
        let (start, end) = anchors(current)?;
        Some(start + (end - start) * t?)
    }))
}

fn interpolate(original: &Neighborhood) -> Option<ApplyFn> {
    interpolate_between(original, |n| Some((n.prev()?, n.next()?)))
}

fn interpolate_prev_prev_next(original: &Neighborhood) -> Option<ApplyFn> {
    interpolate_between(original, |n| Some((n.prev_prev()?, n.next()?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{constrain_hor_ver_diag, unconstrained};

    fn neighborhood(points: [Option<(f64, f64)>; PATTERN_LENGTH]) -> Neighborhood {
        Neighborhood(points.map(|point| point.map(Point::from)))
    }

    fn translate(delta: Vec2) -> impl Fn(Point) -> Point {
        move |point| point + delta
    }

    fn apply(
        name: &str,
        original: &Neighborhood,
        current: &Neighborhood,
        delta: Vec2,
        constrain_delta: fn(Vec2) -> Vec2,
    ) -> Option<Point> {
        let library = ActionLibrary::builtin();
        let apply = library.get(name).unwrap()(original).unwrap();
        let free = translate(delta);
        let constrained = translate(constrain_delta(delta));
        let transform = EditTransform {
            constrained: &constrained,
            free: &free,
            constrain_delta,
        };
        apply(&transform, current)
    }

    #[test]
    fn test_move_and_dont_move() {
        let n = neighborhood([None, None, None, Some((10.0, 10.0)), None, None, None]);
        let delta = Vec2::new(5.0, -3.0);
        assert_eq!(
            apply("Move", &n, &n, delta, unconstrained),
            Some(Point::new(15.0, 7.0))
        );
        assert_eq!(
            apply("DontMove", &n, &n, delta, unconstrained),
            Some(Point::new(10.0, 10.0))
        );
    }

    #[test]
    fn test_rotate_next_keeps_length() {
        // selected (0,0) -> smooth (100,0) -> handle (150,0)
        let original = neighborhood([
            None,
            Some((0.0, 0.0)),
            Some((100.0, 0.0)),
            Some((150.0, 0.0)),
            None,
            None,
            None,
        ]);
        let mut current = original;
        current.0[1] = Some(Point::new(100.0, -100.0));
        let moved = apply("RotateNext", &original, &current, Vec2::ZERO, unconstrained).unwrap();
        assert!((moved.x - 100.0).abs() < 1e-9);
        assert!((moved.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_next_zero_tangent() {
        let original = neighborhood([
            None,
            Some((100.0, 0.0)),
            Some((100.0, 0.0)),
            Some((150.0, 0.0)),
            None,
            None,
            None,
        ]);
        assert_eq!(
            apply("RotateNext", &original, &original, Vec2::ZERO, unconstrained),
            None
        );
    }

    #[test]
    fn test_constrain_prev_angle_projects() {
        let original = neighborhood([
            None,
            Some((0.0, 0.0)),
            Some((100.0, 0.0)),
            Some((150.0, 0.0)),
            None,
            None,
            None,
        ]);
        let moved = apply(
            "ConstrainPrevAngle",
            &original,
            &original,
            Vec2::new(20.0, 30.0),
            unconstrained,
        )
        .unwrap();
        assert!((moved.x - 170.0).abs() < 1e-9);
        assert!(moved.y.abs() < 1e-9);
    }

    #[test]
    fn test_tangent_intersect() {
        // tangent along y = 0, handle hangs 50 above the selected on-curve
        let original = neighborhood([
            None,
            Some((0.0, 0.0)),
            Some((100.0, 0.0)),
            Some((150.0, 0.0)),
            Some((150.0, -50.0)),
            None,
            None,
        ]);
        let mut current = original;
        current.0[4] = Some(Point::new(200.0, -50.0));
        let moved =
            apply("TangentIntersect", &original, &current, Vec2::ZERO, unconstrained).unwrap();
        assert!((moved.x - 200.0).abs() < 1e-9);
        assert!(moved.y.abs() < 1e-9);
    }

    fn assert_near(actual: Point, expected: Point) {
        assert!(
            (actual - expected).hypot() < 1e-9,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn test_tangent_intersect_live() {
        let original = neighborhood([
            None,
            Some((0.0, 0.0)),
            Some((100.0, 0.0)),
            Some((150.0, 0.0)),
            Some((200.0, -50.0)),
            None,
            None,
        ]);
        // tangent turned onto y = x, the on-curve point moved right
        let mut current = original;
        current.0[2] = Some(Point::new(100.0, 100.0));
        current.0[4] = Some(Point::new(300.0, -50.0));
        let moved =
            apply("TangentIntersectLive", &original, &current, Vec2::ZERO, unconstrained).unwrap();
        assert_near(moved, Point::new(125.0, 125.0));
    }

    #[test]
    fn test_constrain_middle_slides_between_neighbors() {
        let original = neighborhood([
            None,
            None,
            Some((0.0, 0.0)),
            Some((50.0, 0.0)),
            Some((100.0, 0.0)),
            None,
            None,
        ]);
        let moved = apply(
            "ConstrainMiddle",
            &original,
            &original,
            Vec2::new(10.0, 20.0),
            unconstrained,
        )
        .unwrap();
        assert_near(moved, Point::new(60.0, 0.0));
    }

    #[test]
    fn test_constrain_middle_two_uses_outer_neighbors() {
        let original = neighborhood([
            None,
            Some((0.0, 0.0)),
            Some((25.0, 25.0)),
            Some((50.0, 50.0)),
            Some((100.0, 100.0)),
            None,
            None,
        ]);
        let moved = apply(
            "ConstrainMiddleTwo",
            &original,
            &original,
            Vec2::new(10.0, 0.0),
            unconstrained,
        )
        .unwrap();
        assert_near(moved, Point::new(55.0, 55.0));
    }

    #[test]
    fn test_handle_intersect_meets_both_tangents() {
        // horizontal tangent into (100, 0), vertical tangent into (200, 100)
        let original = neighborhood([
            None,
            Some((0.0, 0.0)),
            Some((100.0, 0.0)),
            Some((150.0, 50.0)),
            Some((200.0, 100.0)),
            Some((200.0, 200.0)),
            None,
        ]);
        let moved =
            apply("HandleIntersect", &original, &original, Vec2::ZERO, unconstrained).unwrap();
        assert_near(moved, Point::new(200.0, 0.0));
    }

    #[test]
    fn test_constrain_handle_intersect() {
        let original = neighborhood([
            None,
            None,
            Some((0.0, 0.0)),
            Some((50.0, 40.0)),
            Some((100.0, 0.0)),
            None,
            None,
        ]);
        // both handles snap to diagonals, which meet above the middle
        let moved = apply(
            "ConstrainHandleIntersect",
            &original,
            &original,
            Vec2::new(0.0, 5.0),
            constrain_hor_ver_diag,
        )
        .unwrap();
        assert_near(moved, Point::new(50.0, 50.0));
    }

    #[test]
    fn test_constrain_handle_intersect_prev_keeps_tangent() {
        let original = neighborhood([
            None,
            Some((-100.0, 0.0)),
            Some((0.0, 0.0)),
            Some((40.0, 10.0)),
            Some((100.0, 80.0)),
            None,
            None,
        ]);
        let moved = apply(
            "ConstrainHandleIntersectPrev",
            &original,
            &original,
            Vec2::ZERO,
            constrain_hor_ver_diag,
        )
        .unwrap();
        assert_near(moved, Point::new(20.0, 0.0));
    }

    #[test]
    fn test_constrain_around_prev_prev_stays_diagonal() {
        let original = neighborhood([
            None,
            Some((-20.0, 0.0)),
            Some((-15.0, 5.0)),
            Some((-10.0, 10.0)),
            None,
            None,
            None,
        ]);
        // (12, 13) snaps to a half-integer diagonal
        let moved = apply(
            "ConstrainAroundPrevPrev",
            &original,
            &original,
            Vec2::new(2.0, 3.0),
            constrain_hor_ver_diag,
        )
        .unwrap();
        assert_eq!(moved, Point::new(-7.0, 13.0));
    }

    #[test]
    fn test_constrain_around_prev_prev_prev() {
        let original = neighborhood([
            Some((10.0, 10.0)),
            Some((20.0, 10.0)),
            Some((40.0, 20.0)),
            Some((60.0, 20.0)),
            None,
            None,
            None,
        ]);
        let moved = apply(
            "ConstrainAroundPrevPrevPrev",
            &original,
            &original,
            Vec2::new(0.0, 50.0),
            constrain_hor_ver_diag,
        )
        .unwrap();
        assert_eq!(moved, Point::new(65.0, 65.0));
    }

    #[test]
    fn test_interpolate_prev_prev_next() {
        let original = neighborhood([
            None,
            Some((0.0, 0.0)),
            Some((10.0, 0.0)),
            Some((25.0, 0.0)),
            Some((100.0, 0.0)),
            None,
            None,
        ]);
        let mut current = original;
        current.0[1] = Some(Point::new(0.0, 100.0));
        current.0[4] = Some(Point::new(200.0, 100.0));
        let moved = apply(
            "InterpolatePrevPrevNext",
            &original,
            &current,
            Vec2::ZERO,
            unconstrained,
        )
        .unwrap();
        assert_near(moved, Point::new(50.0, 100.0));
    }

    #[test]
    fn test_handle_intersect_parallel_is_none() {
        let original = neighborhood([
            None,
            Some((0.0, 0.0)),
            Some((100.0, 0.0)),
            Some((150.0, 0.0)),
            Some((200.0, 0.0)),
            Some((300.0, 0.0)),
            None,
        ]);
        assert_eq!(
            apply("HandleIntersect", &original, &original, Vec2::ZERO, unconstrained),
            None
        );
    }

    #[test]
    fn test_constrain_handle_snaps() {
        let original = neighborhood([
            None,
            None,
            Some((0.0, 0.0)),
            Some((50.0, 50.0)),
            None,
            None,
            None,
        ]);
        let moved = apply(
            "ConstrainHandle",
            &original,
            &original,
            Vec2::new(40.0, -45.0),
            constrain_hor_ver_diag,
        )
        .unwrap();
        assert_eq!(moved, Point::new(90.0, 0.0));
    }

    #[test]
    fn test_interpolate_follows_anchors() {
        let original = neighborhood([
            None,
            None,
            Some((0.0, 0.0)),
            Some((25.0, 0.0)),
            Some((100.0, 0.0)),
            None,
            None,
        ]);
        let mut current = original;
        current.0[2] = Some(Point::new(0.0, 100.0));
        current.0[4] = Some(Point::new(200.0, 100.0));
        let moved = apply("Interpolate", &original, &current, Vec2::ZERO, unconstrained).unwrap();
        assert_eq!(moved, Point::new(50.0, 100.0));
    }

    #[test]
    fn test_interpolate_zero_span() {
        let original = neighborhood([
            None,
            None,
            Some((10.0, 10.0)),
            Some((25.0, 0.0)),
            Some((10.0, 10.0)),
            None,
            None,
        ]);
        assert_eq!(
            apply("Interpolate", &original, &original, Vec2::ZERO, unconstrained),
            None
        );
    }

    #[test]
    fn test_missing_neighbor_fails_to_build() {
        let library = ActionLibrary::builtin();
        let lonely = neighborhood([None, None, None, Some((0.0, 0.0)), None, None, None]);
        assert!(library.get("RotateNext").unwrap()(&lonely).is_none());
        assert!(library.get("Move").unwrap()(&lonely).is_some());
        assert!(library.get("NoSuchAction").is_none());
    }
}
