//! Intent triangle and barycentric containment
//!
//! The triangle's apex is the cursor position at the moment tracking
//! began; the other two vertices are the top-left and bottom-left corners
//! of the tracked element. Movement that stays inside this funnel is
//! treated as travel toward the element.

use super::point::{Bounds, Point};
use serde::{Deserialize, Serialize};

/// The three vertices of an intent triangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    /// Apex: cursor position when the triangle was established
    pub p0: Point,
    /// Tracked element's top-left corner
    pub p1: Point,
    /// Tracked element's bottom-left corner
    pub p2: Point,
}

impl Triangle {
    pub const fn new(p0: Point, p1: Point, p2: Point) -> Self {
        Self { p0, p1, p2 }
    }

    /// Build the triangle from the cursor and the tracked element's bounds
    pub fn from_mouse(mouse: Point, tracking: &Bounds) -> Self {
        Self {
            p0: mouse,
            p1: tracking.top_left(),
            p2: tracking.bottom_left(),
        }
    }

    /// Check whether `p` lies inside the triangle
    pub fn contains(&self, p: Point) -> bool {
        point_in_triangle(p, self)
    }

    /// True when the vertices are collinear, so no point can be contained.
    ///
    /// Only used for diagnostics; `contains` does not consult it.
    pub fn is_degenerate(&self) -> bool {
        let (ax, ay) = self.p1.offset_from(self.p0);
        let (bx, by) = self.p2.offset_from(self.p0);
        let cross = ax * by - ay * bx;
        cross == 0.0 || !cross.is_finite()
    }
}

fn dot(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.0 + a.1 * b.1
}

/// Barycentric point-in-triangle test
///
/// Points on the edges `p0-p1` and `p0-p2` count as inside; points on
/// `p1-p2` (where `u + v == 1`) count as outside. A degenerate triangle
/// yields a zero denominator, the coordinates become `NaN` or infinite,
/// and every comparison fails, so nothing is contained.
pub fn point_in_triangle(p: Point, triangle: &Triangle) -> bool {
    let v0 = triangle.p2.offset_from(triangle.p0);
    let v1 = triangle.p1.offset_from(triangle.p0);
    let v2 = p.offset_from(triangle.p0);

    let dot00 = dot(v0, v0);
    let dot01 = dot(v0, v1);
    let dot02 = dot(v0, v2);
    let dot11 = dot(v1, v1);
    let dot12 = dot(v1, v2);

    let inv_denom = 1.0 / (dot00 * dot11 - dot01 * dot01);

    let u = (dot11 * dot02 - dot01 * dot12) * inv_denom;
    let v = (dot00 * dot12 - dot01 * dot02) * inv_denom;

    u >= 0.0 && v >= 0.0 && u + v < 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn menu_triangle() -> Triangle {
        Triangle::from_mouse(
            Point::new(80.0, 100.0),
            &Bounds::new(100.0, 50.0, 250.0, 150.0),
        )
    }

    // Right-angled at the apex with a power-of-two denominator so edge
    // points land on exact barycentric values.
    fn unit_triangle() -> Triangle {
        Triangle::from_mouse(Point::new(0.0, 0.0), &Bounds::new(1.0, -1.0, 2.0, 1.0))
    }

    #[test]
    fn test_from_mouse_uses_left_edge() {
        let t = menu_triangle();
        assert_eq!(t.p0, Point::new(80.0, 100.0));
        assert_eq!(t.p1, Point::new(100.0, 50.0));
        assert_eq!(t.p2, Point::new(100.0, 150.0));
    }

    #[test]
    fn test_point_toward_element_is_inside() {
        assert!(menu_triangle().contains(Point::new(95.0, 100.0)));
    }

    #[test]
    fn test_point_away_from_element_is_outside() {
        assert!(!menu_triangle().contains(Point::new(80.0, 0.0)));
        assert!(!menu_triangle().contains(Point::new(60.0, 100.0)));
    }

    #[test]
    fn test_apex_is_inside() {
        let t = menu_triangle();
        assert!(t.contains(t.p0));
    }

    #[test]
    fn test_edges_adjacent_to_apex_are_inside() {
        let t = unit_triangle();
        // Midpoint of p0-p2
        assert!(t.contains(Point::new(0.5, 0.5)));
        // Midpoint of p0-p1
        assert!(t.contains(Point::new(0.5, -0.5)));
    }

    #[test]
    fn test_edge_opposite_apex_is_outside() {
        let t = unit_triangle();
        assert!(!t.contains(Point::new(1.0, 0.0)));
        assert!(!t.contains(t.p1));
        assert!(!t.contains(t.p2));
    }

    #[test]
    fn test_degenerate_triangle_contains_nothing() {
        let t = Triangle::new(
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
        );
        assert!(t.is_degenerate());
        for p in [
            Point::new(0.0, 0.0),
            Point::new(0.0, 5.0),
            Point::new(1.0, 1.0),
            Point::new(-3.0, 7.0),
        ] {
            assert!(!t.contains(p), "{:?} should not be contained", p);
        }
    }

    #[test]
    fn test_zero_height_element_is_degenerate() {
        let t = Triangle::from_mouse(Point::new(10.0, 10.0), &Bounds::new(50.0, 40.0, 90.0, 40.0));
        assert!(t.is_degenerate());
        assert!(!t.contains(Point::new(10.0, 10.0)));
        assert!(!t.contains(Point::new(30.0, 30.0)));
    }

    #[test]
    fn test_detached_element_is_degenerate() {
        let t = Triangle::from_mouse(Point::new(10.0, 10.0), &Bounds::default());
        assert!(t.is_degenerate());
        assert!(!t.contains(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_normal_triangle_is_not_degenerate() {
        assert!(!menu_triangle().is_degenerate());
    }

    fn coord() -> impl Strategy<Value = i32> {
        -1000i32..1000
    }

    fn cross(a: (i32, i32), b: (i32, i32), c: (i32, i32)) -> i64 {
        let (ax, ay) = ((b.0 - a.0) as i64, (b.1 - a.1) as i64);
        let (bx, by) = ((c.0 - a.0) as i64, (c.1 - a.1) as i64);
        ax * by - ay * bx
    }

    fn to_point(p: (i32, i32)) -> Point {
        Point::new(p.0 as f64, p.1 as f64)
    }

    proptest! {
        #[test]
        fn apex_is_always_contained(
            p0 in (coord(), coord()),
            p1 in (coord(), coord()),
            p2 in (coord(), coord()),
        ) {
            prop_assume!(cross(p0, p1, p2) != 0);
            let t = Triangle::new(to_point(p0), to_point(p1), to_point(p2));
            prop_assert!(t.contains(t.p0));
        }

        #[test]
        fn far_points_are_never_contained(
            p0 in (coord(), coord()),
            p1 in (coord(), coord()),
            p2 in (coord(), coord()),
            dx in 10_000i32..20_000,
            dy in -20_000i32..20_000,
            flip in any::<bool>(),
        ) {
            prop_assume!(cross(p0, p1, p2) != 0);
            let t = Triangle::new(to_point(p0), to_point(p1), to_point(p2));
            let dx = if flip { -dx } else { dx };
            prop_assert!(!t.contains(Point::new(dx as f64, dy as f64)));
        }

        #[test]
        fn collinear_triangles_contain_nothing(
            p0 in (coord(), coord()),
            dir in (-50i32..50, -50i32..50),
            a in -10i32..10,
            b in -10i32..10,
            q in (coord(), coord()),
        ) {
            let p1 = (p0.0 + a * dir.0, p0.1 + a * dir.1);
            let p2 = (p0.0 + b * dir.0, p0.1 + b * dir.1);
            let t = Triangle::new(to_point(p0), to_point(p1), to_point(p2));
            prop_assert!(!t.contains(to_point(q)));
            prop_assert!(!t.contains(t.p0));
        }
    }
}
