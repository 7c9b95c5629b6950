use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// One recorded pointer position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    /// Time in milliseconds from recording start
    pub process_time_ms: f64,
}

impl PointerSample {
    pub fn new(x: f64, y: f64, process_time_ms: f64) -> Self {
        Self {
            x,
            y,
            process_time_ms,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
