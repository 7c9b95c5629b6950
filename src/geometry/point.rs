use serde::{Deserialize, Serialize};

/// A position in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `origin` to `self`
    pub fn offset_from(self, origin: Point) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Bounding rectangle of a host element, in page coordinates
///
/// A detached element reports all-zero bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Top-left corner
    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Bottom-left corner
    pub fn bottom_left(&self) -> Point {
        Point::new(self.left, self.bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_corners() {
        let bounds = Bounds::new(100.0, 50.0, 300.0, 150.0);

        assert_eq!(bounds.top_left(), Point::new(100.0, 50.0));
        assert_eq!(bounds.bottom_left(), Point::new(100.0, 150.0));
        assert_eq!(bounds.width(), 200.0);
        assert_eq!(bounds.height(), 100.0);
    }

    #[test]
    fn test_detached_bounds_are_zero() {
        let bounds = Bounds::default();
        assert_eq!(bounds.top_left(), bounds.bottom_left());
        assert_eq!(bounds.height(), 0.0);
    }

    #[test]
    fn test_point_serializes_as_xy() {
        let json = serde_json::to_string(&Point::new(1.5, -2.0)).unwrap();
        assert_eq!(json, r#"{"x":1.5,"y":-2.0}"#);
    }
}
