//! Annotation marker model for `annotated_image` blocks.
//!
//! Geometry is stored in percent-of-rendered-image space ([0, 100] on both
//! axes) so markers survive responsive resizing of the underlying image.
//! A marker carries the full geometry field set for *all four* shapes, seeded
//! consistently from the same anchor at creation time: switching a marker's
//! shape after the fact keeps it where the author put it instead of snapping
//! to a default position. The interaction engine in `sw-annotate` mutates
//! these fields; the invariants below are re-established after every write.
//!
//! Invariants:
//! - every percent coordinate is finite and within [0, 100]
//! - `rotation` is finite and normalized to [0, 2π)

use crate::id::Id;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Default dot diameter, pixels.
pub const DEFAULT_DOT_SIZE: f64 = 20.0;
/// Default rectangle extent, percent of image.
pub const DEFAULT_RECT_WIDTH: f64 = 20.0;
pub const DEFAULT_RECT_HEIGHT: f64 = 12.0;
/// Default arrow shaft length, pixels.
pub const DEFAULT_ARROW_LENGTH: f64 = 80.0;
/// Default half-span of a fresh line, percent.
pub const DEFAULT_LINE_HALF_SPAN: f64 = 10.0;
/// Default marker color.
pub const DEFAULT_COLOR: &str = "#EF4444";

/// Clamp a percent coordinate into [0, 100], mapping non-finite input to the
/// fallback. Guards every computed coordinate before it is stored.
pub fn clamp_pct(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 100.0) } else { fallback }
}

/// Normalize an angle in radians to [0, 2π). Non-finite input maps to 0.
pub fn normalize_angle(a: f64) -> f64 {
    if !a.is_finite() {
        return 0.0;
    }
    let r = a % TAU;
    if r < 0.0 { r + TAU } else { r }
}

/// The marker shape tag. Changing it re-interprets the stored geometry; it
/// does not erase the other shapes' fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    #[default]
    Dot,
    Rectangle,
    Arrow,
    Line,
}

/// A positioned interactive annotation overlaid on an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: Id,
    pub shape: MarkerShape,
    /// Hex color string.
    pub color: String,
    pub title: String,
    pub description: String,

    /// Anchor: dot/rectangle center, arrow tip. Percent.
    pub x: f64,
    pub y: f64,
    /// Dot diameter, pixels.
    pub size: f64,
    /// Rectangle extent, percent.
    pub width: f64,
    pub height: f64,
    /// Arrow shaft length, pixels.
    pub length: f64,
    /// Arrow direction; for lines an extra render-time rotation applied
    /// around the segment midpoint on top of the endpoints' own angle.
    /// Radians, [0, 2π).
    pub rotation: f64,
    /// Line endpoints, percent.
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Marker {
    /// A new dot marker anchored at a click point, with every shape's
    /// geometry seeded from the same anchor.
    pub fn at(x_pct: f64, y_pct: f64) -> Self {
        let x = clamp_pct(x_pct, 50.0);
        let y = clamp_pct(y_pct, 50.0);
        Self {
            id: Id::generate("mk"),
            shape: MarkerShape::Dot,
            color: DEFAULT_COLOR.to_string(),
            title: String::new(),
            description: String::new(),
            x,
            y,
            size: DEFAULT_DOT_SIZE,
            width: DEFAULT_RECT_WIDTH,
            height: DEFAULT_RECT_HEIGHT,
            length: DEFAULT_ARROW_LENGTH,
            rotation: 0.0,
            x1: clamp_pct(x - DEFAULT_LINE_HALF_SPAN, x),
            y1: y,
            x2: clamp_pct(x + DEFAULT_LINE_HALF_SPAN, x),
            y2: y,
        }
    }

    /// Midpoint of the line segment, percent.
    pub fn line_midpoint(&self) -> (f64, f64) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Re-establish the geometry invariants after a mutation.
    pub fn sanitize(&mut self) {
        self.x = clamp_pct(self.x, 50.0);
        self.y = clamp_pct(self.y, 50.0);
        self.x1 = clamp_pct(self.x1, self.x);
        self.y1 = clamp_pct(self.y1, self.y);
        self.x2 = clamp_pct(self.x2, self.x);
        self.y2 = clamp_pct(self.y2, self.y);
        self.width = if self.width.is_finite() {
            self.width.clamp(0.0, 100.0)
        } else {
            DEFAULT_RECT_WIDTH
        };
        self.height = if self.height.is_finite() {
            self.height.clamp(0.0, 100.0)
        } else {
            DEFAULT_RECT_HEIGHT
        };
        self.size = if self.size.is_finite() {
            self.size
        } else {
            DEFAULT_DOT_SIZE
        };
        self.length = if self.length.is_finite() {
            self.length
        } else {
            DEFAULT_ARROW_LENGTH
        };
        self.rotation = normalize_angle(self.rotation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_seeds_all_shapes_from_anchor() {
        let m = Marker::at(50.0, 40.0);
        assert_eq!(m.shape, MarkerShape::Dot);
        assert_eq!((m.x, m.y), (50.0, 40.0));
        // Line spans the anchor horizontally
        assert_eq!((m.x1, m.y1), (40.0, 40.0));
        assert_eq!((m.x2, m.y2), (60.0, 40.0));
        assert_eq!(m.line_midpoint(), (50.0, 40.0));
        assert_eq!(m.rotation, 0.0);
    }

    #[test]
    fn creation_clamps_out_of_range_anchor() {
        let m = Marker::at(130.0, -5.0);
        assert_eq!((m.x, m.y), (100.0, 0.0));
        assert!(m.x1 <= 100.0 && m.x2 <= 100.0);
    }

    #[test]
    fn normalize_angle_wraps_into_range() {
        assert!((normalize_angle(-0.5) - (TAU - 0.5)).abs() < 1e-12);
        assert!((normalize_angle(TAU + 1.0) - 1.0).abs() < 1e-12);
        assert_eq!(normalize_angle(f64::NAN), 0.0);
    }

    #[test]
    fn sanitize_repairs_non_finite_geometry() {
        let mut m = Marker::at(50.0, 50.0);
        m.x = f64::NAN;
        m.rotation = f64::INFINITY;
        m.width = -3.0;
        m.sanitize();
        assert_eq!(m.x, 50.0);
        assert_eq!(m.rotation, 0.0);
        assert_eq!(m.width, 0.0);
    }
}
