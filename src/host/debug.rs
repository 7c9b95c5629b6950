//! Debug overlay capability
//!
//! When a tracker runs with `debug` enabled it describes what it sees as a
//! [`DebugFrame`] and hands it to a [`DebugRenderer`]. The tracker never
//! creates overlay resources itself.

use crate::geometry::{Point, Triangle};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Red,
    Blue,
    Green,
    Purple,
}

/// A dot drawn at one point of interest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebugMarker {
    pub at: Point,
    pub color: MarkerColor,
}

/// Border-triangle box covering the intent triangle
///
/// The overlay draws the triangle as a zero-size box with only its right
/// border colored, positioned at `(left, top)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayBox {
    pub left: f64,
    pub top: f64,
    pub border_top: f64,
    pub border_right: f64,
    pub border_bottom: f64,
    pub border_left: f64,
}

/// Everything an overlay needs to draw one movement event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugFrame {
    /// Current mouse, apex, top corner, bottom corner (in that order)
    pub markers: [DebugMarker; 4],
    pub overlay: OverlayBox,
}

impl DebugFrame {
    pub fn new(mouse: Point, triangle: &Triangle) -> Self {
        let Triangle { p0, p1, p2 } = *triangle;
        Self {
            markers: [
                DebugMarker {
                    at: mouse,
                    color: MarkerColor::Red,
                },
                DebugMarker {
                    at: p0,
                    color: MarkerColor::Blue,
                },
                DebugMarker {
                    at: p1,
                    color: MarkerColor::Green,
                },
                DebugMarker {
                    at: p2,
                    color: MarkerColor::Purple,
                },
            ],
            overlay: OverlayBox {
                left: p0.x,
                top: p1.y,
                border_top: p0.y,
                border_right: p1.x - p0.x,
                border_bottom: p2.y - p0.y,
                border_left: 0.0,
            },
        }
    }
}

/// Draws debug frames
///
/// `render` is called on every movement event once the triangle exists,
/// so implementations should create their resources on first use and
/// reuse them afterwards. `hide` is called when the session ends.
pub trait DebugRenderer: Send + Sync {
    fn render(&self, frame: &DebugFrame);
    fn hide(&self);
}

/// Renderer that writes frames to the log instead of the screen
#[derive(Debug, Default)]
pub struct TracingRenderer {
    created: AtomicBool,
    visible: AtomicBool,
    frames: AtomicU64,
}

impl TracingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Relaxed)
    }
}

impl DebugRenderer for TracingRenderer {
    fn render(&self, frame: &DebugFrame) {
        if !self.created.swap(true, Ordering::Relaxed) {
            tracing::debug!("Debug overlay created");
        }
        self.visible.store(true, Ordering::Relaxed);
        self.frames.fetch_add(1, Ordering::Relaxed);

        let [mouse, p0, p1, p2] = frame.markers;
        tracing::debug!(
            "Overlay: mouse=({}, {}) p0=({}, {}) p1=({}, {}) p2=({}, {}) box=({}, {}) borders={}/{}/{}/{}",
            mouse.at.x,
            mouse.at.y,
            p0.at.x,
            p0.at.y,
            p1.at.x,
            p1.at.y,
            p2.at.x,
            p2.at.y,
            frame.overlay.left,
            frame.overlay.top,
            frame.overlay.border_top,
            frame.overlay.border_right,
            frame.overlay.border_bottom,
            frame.overlay.border_left
        );
    }

    fn hide(&self) {
        if self.visible.swap(false, Ordering::Relaxed) {
            tracing::debug!("Debug overlay hidden");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;

    #[test]
    fn test_frame_markers_and_overlay() {
        let triangle = Triangle::from_mouse(
            Point::new(80.0, 100.0),
            &Bounds::new(100.0, 50.0, 250.0, 150.0),
        );
        let frame = DebugFrame::new(Point::new(90.0, 95.0), &triangle);

        let colors: Vec<MarkerColor> = frame.markers.iter().map(|m| m.color).collect();
        assert_eq!(
            colors,
            vec![MarkerColor::Red, MarkerColor::Blue, MarkerColor::Green, MarkerColor::Purple]
        );
        assert_eq!(frame.markers[0].at, Point::new(90.0, 95.0));
        assert_eq!(frame.markers[1].at, triangle.p0);

        assert_eq!(frame.overlay.left, 80.0);
        assert_eq!(frame.overlay.top, 50.0);
        assert_eq!(frame.overlay.border_top, 100.0);
        assert_eq!(frame.overlay.border_right, 20.0);
        assert_eq!(frame.overlay.border_bottom, 50.0);
        assert_eq!(frame.overlay.border_left, 0.0);
    }

    #[test]
    fn test_tracing_renderer_visibility() {
        let renderer = TracingRenderer::new();
        let triangle = Triangle::new(Point::new(0.0, 0.0), Point::new(1.0, -1.0), Point::new(1.0, 1.0));
        let frame = DebugFrame::new(Point::new(0.2, 0.0), &triangle);

        assert!(!renderer.is_visible());
        renderer.render(&frame);
        renderer.render(&frame);
        assert!(renderer.is_visible());
        assert_eq!(renderer.frames_rendered(), 2);

        renderer.hide();
        renderer.hide();
        assert!(!renderer.is_visible());
    }
}
