//! Geometry for intent tracking
//!
//! Points and rectangles in page space, and the intent triangle spanned by
//! the cursor and the near edge of the tracked element.

pub mod point;
pub mod triangle;

pub use point::{Bounds, Point};
pub use triangle::{point_in_triangle, Triangle};
